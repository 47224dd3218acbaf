//! The fixed set of asset keys tracked by the oracle.

use crate::{errors::AssetKeyError, felt::Felt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a tradable pair whose price the oracle publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKey {
	#[serde(rename = "eth/usd")]
	EthUsd,
	#[serde(rename = "btc/usd")]
	BtcUsd,
	#[serde(rename = "luna/usd")]
	LunaUsd,
	#[serde(rename = "sol/usd")]
	SolUsd,
	#[serde(rename = "avax/usd")]
	AvaxUsd,
	#[serde(rename = "doge/usd")]
	DogeUsd,
	#[serde(rename = "shib/usd")]
	ShibUsd,
	#[serde(rename = "temp/usd")]
	TempUsd,
	#[serde(rename = "eth/mxn")]
	EthMxn,
}

impl AssetKey {
	pub const ALL: [AssetKey; 9] = [
		AssetKey::EthUsd,
		AssetKey::BtcUsd,
		AssetKey::LunaUsd,
		AssetKey::SolUsd,
		AssetKey::AvaxUsd,
		AssetKey::DogeUsd,
		AssetKey::ShibUsd,
		AssetKey::TempUsd,
		AssetKey::EthMxn,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			AssetKey::EthUsd => "eth/usd",
			AssetKey::BtcUsd => "btc/usd",
			AssetKey::LunaUsd => "luna/usd",
			AssetKey::SolUsd => "sol/usd",
			AssetKey::AvaxUsd => "avax/usd",
			AssetKey::DogeUsd => "doge/usd",
			AssetKey::ShibUsd => "shib/usd",
			AssetKey::TempUsd => "temp/usd",
			AssetKey::EthMxn => "eth/mxn",
		}
	}

	/// Builds the key for a currency pair, e.g. `("ETH", "USD")` -> `eth/usd`.
	pub fn from_pair(base: &str, quote: &str) -> Result<Self, AssetKeyError> {
		let key = format!(
			"{}/{}",
			base.trim().to_lowercase(),
			quote.trim().to_lowercase()
		);
		key.parse()
	}

	/// The key packed into a single felt, as passed to `get_value`.
	pub fn to_felt(&self) -> Felt {
		// Every key is far below the 31 byte short string limit.
		Felt::pack_bytes(self.as_str().as_bytes())
	}

	/// The `0x`-prefixed hex rendering of [`AssetKey::to_felt`].
	pub fn encoded(&self) -> String {
		self.to_felt().to_hex_string()
	}
}

impl fmt::Display for AssetKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.pad(self.as_str())
	}
}

impl FromStr for AssetKey {
	type Err = AssetKeyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		AssetKey::ALL
			.iter()
			.copied()
			.find(|key| key.as_str() == s)
			.ok_or_else(|| AssetKeyError::Unknown(s.to_string()))
	}
}
