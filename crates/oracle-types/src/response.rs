//! Normalized oracle readings and the status views built on top of them.

use serde::{Deserialize, Serialize};

/// One normalized reading for an asset key.
///
/// A field is `None` when its raw word could not be parsed; the reading itself
/// exists whenever the contract call succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OracleResponse {
	pub value: Option<f64>,
	pub last_updated_timestamp: Option<u64>,
}

/// Status of a `get_value` query as seen by a consumer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetValueResult {
	pub oracle_response: Option<OracleResponse>,
	pub loading: bool,
	pub error: Option<String>,
}

/// Status of a `get_decimals` query as seen by a consumer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DecimalsReading {
	pub decimals: Option<u32>,
	pub loading: bool,
	pub error: Option<String>,
}
