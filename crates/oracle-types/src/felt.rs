//! Starknet field elements.
//!
//! A felt is an integer in `[0, P)` with `P = 2^251 + 17 * 2^192 + 1`. Contract
//! calldata and call results are sequences of felts, exchanged on the wire as
//! `0x`-prefixed hex strings. Short strings (at most 31 bytes) are packed into
//! a single felt by reading their UTF-8 bytes as one big-endian integer.

use crate::errors::FeltError;
use alloy::primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// Modulus of the Starknet field.
pub const FIELD_PRIME: U256 = U256::from_limbs([1, 0, 0, 0x0800_0000_0000_0011]);

/// A Starknet field element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Felt(U256);

impl Felt {
	pub const ZERO: Self = Self(U256::ZERO);

	/// Maximum number of bytes a short string may hold.
	pub const MAX_SHORT_STRING_LEN: usize = 31;

	/// Wraps a 256-bit integer, rejecting values outside the field.
	pub fn from_u256(value: U256) -> Result<Self, FeltError> {
		if value >= FIELD_PRIME {
			return Err(FeltError::OutOfRange(value.to_string()));
		}
		Ok(Self(value))
	}

	pub fn from_u64(value: u64) -> Self {
		Self(U256::from(value))
	}

	/// Packs a short string into a felt.
	///
	/// The UTF-8 bytes are concatenated left to right into one big-endian
	/// integer, so `"eth/usd"` becomes `0x6574682f757364`.
	pub fn from_short_string(value: &str) -> Result<Self, FeltError> {
		let bytes = value.as_bytes();
		if bytes.len() > Self::MAX_SHORT_STRING_LEN {
			return Err(FeltError::StringTooLong {
				len: bytes.len(),
				max: Self::MAX_SHORT_STRING_LEN,
			});
		}
		Ok(Self::pack_bytes(bytes))
	}

	/// Keccak-256 of `data` truncated to its low 250 bits.
	///
	/// This is how entry point selectors are derived from function names.
	pub fn starknet_keccak(data: &[u8]) -> Self {
		let mut digest: [u8; 32] = Keccak256::digest(data).into();
		digest[0] &= 0x03;
		Self::pack_bytes(&digest)
	}

	/// Packs big-endian bytes; callers keep the result below the prime.
	pub(crate) fn pack_bytes(bytes: &[u8]) -> Self {
		let packed = bytes
			.iter()
			.fold(U256::ZERO, |acc, byte| (acc << 8) | U256::from(*byte));
		Self(packed)
	}

	/// Unpacks a short string, ignoring leading zero bytes.
	pub fn to_short_string(&self) -> Result<String, FeltError> {
		let bytes = self.0.to_be_bytes_vec();
		let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
		String::from_utf8(bytes[start..].to_vec()).map_err(|_| FeltError::InvalidUtf8)
	}

	/// Parses a hex literal, with or without the `0x` prefix.
	pub fn from_hex(value: &str) -> Result<Self, FeltError> {
		let digits = value
			.strip_prefix("0x")
			.or_else(|| value.strip_prefix("0X"))
			.unwrap_or(value);
		if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
			return Err(FeltError::InvalidLiteral(value.to_string()));
		}
		let parsed = U256::from_str_radix(digits, 16)
			.map_err(|_| FeltError::OutOfRange(value.to_string()))?;
		Self::from_u256(parsed)
	}

	/// Parses a base-10 literal.
	pub fn from_dec_str(value: &str) -> Result<Self, FeltError> {
		if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
			return Err(FeltError::InvalidLiteral(value.to_string()));
		}
		let parsed = U256::from_str_radix(value, 10)
			.map_err(|_| FeltError::OutOfRange(value.to_string()))?;
		Self::from_u256(parsed)
	}

	/// Minimal `0x`-prefixed hex rendering, `0x0` for zero.
	pub fn to_hex_string(&self) -> String {
		format!("0x{:x}", self.0)
	}

	pub fn to_decimal_string(&self) -> String {
		self.0.to_string()
	}
}

impl From<u64> for Felt {
	fn from(value: u64) -> Self {
		Self::from_u64(value)
	}
}

impl fmt::Display for Felt {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_hex_string())
	}
}

impl FromStr for Felt {
	type Err = FeltError;

	/// Accepts `0x`-prefixed hex or plain decimal.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
			Self::from_hex(trimmed)
		} else {
			Self::from_dec_str(trimmed)
		}
	}
}

impl Serialize for Felt {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.to_hex_string())
	}
}

impl<'de> Deserialize<'de> for Felt {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Repr {
			Text(String),
			Number(u64),
		}

		match Repr::deserialize(deserializer)? {
			Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
			Repr::Number(number) => Ok(Felt::from_u64(number)),
		}
	}
}
