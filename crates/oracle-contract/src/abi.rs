//! The slice of the oracle ABI this reader calls.

use crate::ContractError;
use oracle_types::Felt;
use std::fmt;

/// View functions exposed by the oracle contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OracleMethod {
	/// `get_decimals() -> (decimals: felt)`
	GetDecimals,
	/// `get_value(key: felt) -> (value: felt, last_updated_timestamp: felt)`
	GetValue,
}

impl OracleMethod {
	pub fn name(&self) -> &'static str {
		match self {
			OracleMethod::GetDecimals => "get_decimals",
			OracleMethod::GetValue => "get_value",
		}
	}

	pub fn inputs(&self) -> &'static [&'static str] {
		match self {
			OracleMethod::GetDecimals => &[],
			OracleMethod::GetValue => &["key"],
		}
	}

	pub fn outputs(&self) -> &'static [&'static str] {
		match self {
			OracleMethod::GetDecimals => &["decimals"],
			OracleMethod::GetValue => &["value", "last_updated_timestamp"],
		}
	}

	/// Entry point selector, `starknet_keccak(name)`.
	pub fn selector(&self) -> Felt {
		Felt::starknet_keccak(self.name().as_bytes())
	}

	pub fn check_arguments(&self, calldata: &[Felt]) -> Result<(), ContractError> {
		let expected = self.inputs().len();
		if calldata.len() != expected {
			return Err(ContractError::InvalidArguments {
				method: self.name().to_string(),
				expected,
				actual: calldata.len(),
			});
		}
		Ok(())
	}
}

impl fmt::Display for OracleMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}
