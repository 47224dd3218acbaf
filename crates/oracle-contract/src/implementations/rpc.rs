//! Starknet JSON-RPC contract caller.
//!
//! Runs read-only calls through `starknet_call` against the latest block of
//! a node reachable over HTTP.

use crate::{ContractCaller, ContractError, RawResponse};
use async_trait::async_trait;
use oracle_config::NetworkConfig;
use oracle_types::Felt;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct JsonRpcRequest {
	jsonrpc: &'static str,
	id: u64,
	method: &'static str,
	params: CallParams,
}

#[derive(Debug, Serialize)]
struct CallParams {
	request: FunctionCall,
	block_id: &'static str,
}

#[derive(Debug, Serialize)]
struct FunctionCall {
	contract_address: String,
	entry_point_selector: String,
	calldata: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
	#[serde(default)]
	result: Option<Vec<String>>,
	#[serde(default)]
	error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
	code: i64,
	message: String,
	#[serde(default)]
	data: Option<serde_json::Value>,
}

/// HTTP JSON-RPC implementation of [`ContractCaller`].
pub struct JsonRpcCaller {
	client: reqwest::Client,
	url: String,
	api_key: Option<String>,
	next_id: AtomicU64,
}

impl JsonRpcCaller {
	/// Creates a caller for `url`; every request is bounded by `timeout`.
	pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ContractError> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| ContractError::Transport(format!("Failed to build HTTP client: {}", e)))?;

		Ok(Self {
			client,
			url: url.into(),
			api_key: None,
			next_id: AtomicU64::new(1),
		})
	}

	/// Sends `key` as a bearer token with every request.
	pub fn with_api_key(mut self, key: Option<String>) -> Self {
		self.api_key = key;
		self
	}
}

#[async_trait]
impl ContractCaller for JsonRpcCaller {
	async fn call(
		&self,
		contract: Felt,
		selector: Felt,
		calldata: &[Felt],
	) -> Result<RawResponse, ContractError> {
		let request = JsonRpcRequest {
			jsonrpc: "2.0",
			id: self.next_id.fetch_add(1, Ordering::Relaxed),
			method: "starknet_call",
			params: CallParams {
				request: FunctionCall {
					contract_address: contract.to_hex_string(),
					entry_point_selector: selector.to_hex_string(),
					calldata: calldata.iter().map(Felt::to_hex_string).collect(),
				},
				block_id: "latest",
			},
		};

		debug!(url = %self.url, id = request.id, "Sending starknet_call");

		let mut builder = self.client.post(&self.url).json(&request);
		if let Some(key) = &self.api_key {
			builder = builder.bearer_auth(key);
		}

		let response = builder
			.send()
			.await
			.map_err(|e| ContractError::Transport(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			return Err(ContractError::Transport(format!(
				"RPC endpoint returned HTTP {}",
				status
			)));
		}

		let body: JsonRpcResponse = response
			.json()
			.await
			.map_err(|e| ContractError::InvalidResponse(e.to_string()))?;

		if let Some(error) = body.error {
			let message = match error.data {
				Some(data) => format!("{}: {}", error.message, data),
				None => error.message,
			};
			return Err(ContractError::Rpc {
				code: error.code,
				message,
			});
		}

		body.result.ok_or_else(|| {
			ContractError::InvalidResponse("Response carries neither result nor error".to_string())
		})
	}
}

/// Factory function to create a JSON-RPC caller from network configuration.
///
/// Configuration parameters:
/// - `rpc_url`: the HTTP endpoint of a Starknet node
/// - `api_key`: optional bearer token
pub fn create_rpc_caller(
	network: &NetworkConfig,
	timeout: Duration,
) -> Result<JsonRpcCaller, ContractError> {
	Ok(JsonRpcCaller::new(network.rpc_url.clone(), timeout)?.with_api_key(network.api_key.clone()))
}
