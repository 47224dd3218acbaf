//! Conversion of raw oracle words into human-usable readings.

use crate::decode::{parse_integer, parse_unsigned, to_decimal_strings};
use oracle_types::OracleResponse;

/// Reads the decimals value from a `get_decimals` response.
///
/// Values beyond `u32` saturate; they scale every price to zero either way.
pub fn decode_decimals(raw: &[String]) -> Option<u32> {
	let words = to_decimal_strings(raw);
	words.first().and_then(|word| parse_unsigned(word, u32::MAX))
}

/// Builds a reading from a `get_value` response.
///
/// Word 0 is the raw price, word 1 the last update timestamp. The price is
/// scaled down by `10^decimals`; without decimals it cannot be scaled and is
/// left out. Each field is validated on its own, so one unreadable word
/// never hides the other.
pub fn normalize_value(raw: &[String], decimals: Option<u32>) -> OracleResponse {
	let words = to_decimal_strings(raw);

	let value = match (words.first().and_then(|w| parse_integer(w)), decimals) {
		(Some(price), Some(decimals)) => scale(price, decimals),
		_ => None,
	};
	let last_updated_timestamp = words.get(1).and_then(|w| parse_unsigned(w, u64::MAX));

	OracleResponse {
		value,
		last_updated_timestamp,
	}
}

/// `price / 10^decimals`; oversized exponents drive the divisor to infinity
/// and the result to zero.
fn scale(price: f64, decimals: u32) -> Option<f64> {
	let exponent = i32::try_from(decimals).unwrap_or(i32::MAX);
	Some(price / 10f64.powi(exponent)).filter(|value| value.is_finite())
}
