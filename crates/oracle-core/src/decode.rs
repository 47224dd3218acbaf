//! Decoding of raw contract words and the lenient integer parsing applied
//! to them.

use oracle_types::Felt;
use std::num::{IntErrorKind, ParseIntError};

/// Renders every raw word as a base-10 string.
///
/// Words that are not valid felt literals are passed through untouched so
/// that the parse step, not the decode step, decides what they are worth.
pub fn to_decimal_strings(raw: &[String]) -> Vec<String> {
	raw.iter()
		.map(|word| match word.parse::<Felt>() {
			Ok(felt) => felt.to_decimal_string(),
			Err(_) => word.clone(),
		})
		.collect()
}

/// Returns the signed leading integer of `input`.
///
/// Surrounding whitespace and an optional sign are accepted, then at least
/// one decimal digit; parsing stops at the first non-digit. `"12abc"` yields
/// `"12"`, `"abc"` yields `None`.
pub fn integer_prefix(input: &str) -> Option<&str> {
	let trimmed = input.trim_start();
	let sign_len = usize::from(trimmed.starts_with(['+', '-']));
	let digits = trimmed[sign_len..]
		.bytes()
		.take_while(u8::is_ascii_digit)
		.count();
	if digits == 0 {
		return None;
	}
	Some(&trimmed[..sign_len + digits])
}

/// Leading integer of `input` as a float; large felts lose precision, never validity.
pub fn parse_integer(input: &str) -> Option<f64> {
	integer_prefix(input)?
		.parse::<f64>()
		.ok()
		.filter(|value| value.is_finite())
}

/// Leading integer of `input` as an unsigned value, saturating at `max`.
///
/// Negative integers are not readings and yield `None`.
pub fn parse_unsigned<T>(input: &str, max: T) -> Option<T>
where
	T: std::str::FromStr<Err = ParseIntError>,
{
	match integer_prefix(input)?.parse::<T>() {
		Ok(value) => Some(value),
		Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(max),
		Err(_) => None,
	}
}
