//! Network identifiers.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Name of a Starknet network, as reported by the wallet connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(String);

impl NetworkId {
	pub const MAINNET: &'static str = "mainnet-alpha";
	pub const TESTNET: &'static str = "goerli-alpha";

	pub fn new(name: impl Into<String>) -> Self {
		Self(name.into())
	}

	pub fn mainnet() -> Self {
		Self::new(Self::MAINNET)
	}

	pub fn testnet() -> Self {
		Self::new(Self::TESTNET)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Suffix used for per-network environment overrides: `goerli-alpha` -> `GOERLI_ALPHA`.
	pub fn env_suffix(&self) -> String {
		self.0
			.chars()
			.map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
			.collect()
	}
}

impl fmt::Display for NetworkId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl FromStr for NetworkId {
	type Err = Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::new(s))
	}
}

impl From<&str> for NetworkId {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_network_constants() {
		assert_eq!(NetworkId::mainnet().as_str(), "mainnet-alpha");
		assert_eq!(NetworkId::testnet().to_string(), "goerli-alpha");
	}

	#[test]
	fn test_env_suffix() {
		assert_eq!(NetworkId::testnet().env_suffix(), "GOERLI_ALPHA");
		assert_eq!(NetworkId::new("local.devnet").env_suffix(), "LOCAL_DEVNET");
	}
}
