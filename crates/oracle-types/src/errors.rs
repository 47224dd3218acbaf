//! Error types for the shared oracle types.

use thiserror::Error;

/// Errors raised while building or reading a field element.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeltError {
	#[error("Invalid felt literal: {0}")]
	InvalidLiteral(String),

	#[error("Value {0} is not below the field prime")]
	OutOfRange(String),

	#[error("Short string is {len} bytes, at most {max} fit in a felt")]
	StringTooLong { len: usize, max: usize },

	#[error("Felt does not hold a UTF-8 short string")]
	InvalidUtf8,
}

/// Errors raised while resolving an asset key.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetKeyError {
	#[error("Unknown asset key: {0}")]
	Unknown(String),
}
