//! Contract access for the oracle reader.
//!
//! This crate turns an oracle deployment into a callable handle: the
//! [`ContractCaller`] trait abstracts the transport used to run read-only
//! calls, [`OracleContract`] binds a caller to a deployed address and the
//! oracle ABI, and [`ContractResolver`] picks the right deployment for the
//! active network.

use async_trait::async_trait;
use oracle_types::{Felt, NetworkId};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

pub mod abi;
pub mod resolver;

/// Re-export implementations
pub mod implementations {
	pub mod rpc;
}

pub use abi::OracleMethod;
pub use resolver::ContractResolver;

/// Raw words returned by a contract call, as received on the wire.
pub type RawResponse = Vec<String>;

/// Errors that can occur while calling the oracle contract.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContractError {
	/// No oracle deployment is known for the network.
	#[error("No oracle contract configured for network {0}")]
	AddressNotConfigured(NetworkId),
	/// The node answered with a JSON-RPC error, e.g. a reverted call.
	#[error("RPC error {code}: {message}")]
	Rpc { code: i64, message: String },
	/// The request never produced a usable answer.
	#[error("Transport error: {0}")]
	Transport(String),
	/// The node answered with something that is not a call result.
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
	/// Calldata does not match the ABI.
	#[error("Invalid arguments for {method}: expected {expected}, got {actual}")]
	InvalidArguments {
		method: String,
		expected: usize,
		actual: usize,
	},
}

/// Transport for read-only contract calls.
#[async_trait]
pub trait ContractCaller: Send + Sync {
	/// Calls `selector` on `contract` against the latest block.
	async fn call(
		&self,
		contract: Felt,
		selector: Felt,
		calldata: &[Felt],
	) -> Result<RawResponse, ContractError>;
}

/// Handle on a deployed oracle, bound to the oracle ABI.
#[derive(Clone)]
pub struct OracleContract {
	network: NetworkId,
	address: Felt,
	caller: Arc<dyn ContractCaller>,
}

impl std::fmt::Debug for OracleContract {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("OracleContract")
			.field("network", &self.network)
			.field("address", &self.address)
			.finish()
	}
}

impl OracleContract {
	pub fn new(network: NetworkId, address: Felt, caller: Arc<dyn ContractCaller>) -> Self {
		Self {
			network,
			address,
			caller,
		}
	}

	pub fn network(&self) -> &NetworkId {
		&self.network
	}

	pub fn address(&self) -> Felt {
		self.address
	}

	/// Invokes an oracle view function.
	pub async fn call(
		&self,
		method: OracleMethod,
		calldata: &[Felt],
	) -> Result<RawResponse, ContractError> {
		method.check_arguments(calldata)?;

		debug!(
			network = %self.network,
			contract = %self.address,
			method = %method,
			"Calling oracle"
		);

		let response = self
			.caller
			.call(self.address, method.selector(), calldata)
			.await?;

		let expected = method.outputs().len();
		if response.len() < expected {
			warn!(
				network = %self.network,
				method = %method,
				expected,
				actual = response.len(),
				"Oracle returned fewer words than its ABI declares"
			);
		}

		Ok(response)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Mutex;

	type RecordedCall = (Felt, Felt, Vec<Felt>);

	struct RecordingCaller {
		calls: Mutex<Vec<RecordedCall>>,
	}

	#[async_trait]
	impl ContractCaller for RecordingCaller {
		async fn call(
			&self,
			contract: Felt,
			selector: Felt,
			calldata: &[Felt],
		) -> Result<RawResponse, ContractError> {
			self.calls
				.lock()
				.unwrap()
				.push((contract, selector, calldata.to_vec()));
			Ok(vec!["0x8".to_string()])
		}
	}

	#[tokio::test]
	async fn test_call_uses_selector_and_address() {
		let caller = Arc::new(RecordingCaller {
			calls: Mutex::new(Vec::new()),
		});
		let contract = OracleContract::new(NetworkId::testnet(), Felt::from_u64(0x1234), caller.clone());

		let key = Felt::from_short_string("eth/usd").unwrap();
		let response = contract.call(OracleMethod::GetValue, &[key]).await.unwrap();
		assert_eq!(response, vec!["0x8".to_string()]);

		let calls = caller.calls.lock().unwrap();
		assert_eq!(calls.len(), 1);
		assert_eq!(calls[0].0, Felt::from_u64(0x1234));
		assert_eq!(calls[0].1, OracleMethod::GetValue.selector());
		assert_eq!(calls[0].2, vec![key]);
	}

	#[tokio::test]
	async fn test_call_rejects_bad_arity_without_calling() {
		let caller = Arc::new(RecordingCaller {
			calls: Mutex::new(Vec::new()),
		});
		let contract = OracleContract::new(NetworkId::testnet(), Felt::from_u64(1), caller.clone());

		let result = contract
			.call(OracleMethod::GetDecimals, &[Felt::from_u64(1)])
			.await;
		assert!(matches!(result, Err(ContractError::InvalidArguments { .. })));
		assert!(caller.calls.lock().unwrap().is_empty());
	}
}
