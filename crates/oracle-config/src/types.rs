//! Configuration types for the oracle reader.

use oracle_types::{Felt, NetworkId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete reader configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReaderConfig {
	/// Reader identity and polling behaviour
	pub reader: ReaderSettings,
	/// Per-network RPC endpoint and oracle deployment
	#[serde(default)]
	pub networks: HashMap<NetworkId, NetworkConfig>,
}

/// Reader identity and polling behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReaderSettings {
	/// Reader name for logging
	#[serde(default = "default_name")]
	pub name: String,
	/// Network queries are issued against until switched
	pub active_network: NetworkId,
	/// Seconds between re-evaluations of a live subscription
	#[serde(default = "default_refresh_interval_secs")]
	pub refresh_interval_secs: u64,
	/// Timeout applied to every contract call
	#[serde(default = "default_request_timeout_secs")]
	pub request_timeout_secs: u64,
	/// Default log filter when RUST_LOG is not set
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

/// Network-specific configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	/// Starknet JSON-RPC endpoint
	pub rpc_url: String,
	/// Deployed oracle contract
	pub oracle_address: Felt,
	/// Bearer token sent with every RPC request
	#[serde(default)]
	pub api_key: Option<String>,
}

fn default_name() -> String {
	"oracle-reader".to_string()
}

fn default_refresh_interval_secs() -> u64 {
	10
}

fn default_request_timeout_secs() -> u64 {
	15
}

fn default_log_level() -> String {
	"info".to_string()
}

impl ReaderConfig {
	pub fn network(&self, id: &NetworkId) -> Option<&NetworkConfig> {
		self.networks.get(id)
	}

	/// Oracle address per configured network.
	pub fn oracle_addresses(&self) -> HashMap<NetworkId, Felt> {
		self.networks
			.iter()
			.map(|(id, network)| (id.clone(), network.oracle_address))
			.collect()
	}
}

impl Default for ReaderConfig {
	fn default() -> Self {
		Self {
			reader: ReaderSettings {
				name: default_name(),
				active_network: NetworkId::testnet(),
				refresh_interval_secs: default_refresh_interval_secs(),
				request_timeout_secs: default_request_timeout_secs(),
				log_level: default_log_level(),
			},
			networks: HashMap::new(),
		}
	}
}
