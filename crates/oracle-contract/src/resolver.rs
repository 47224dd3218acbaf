//! Resolution of the oracle deployment for a network.

use crate::implementations::rpc::create_rpc_caller;
use crate::{ContractCaller, ContractError, OracleContract};
use oracle_config::ReaderConfig;
use oracle_types::{Felt, NetworkId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// A deployed oracle and the transport that reaches its network.
#[derive(Clone)]
struct Deployment {
	address: Felt,
	caller: Arc<dyn ContractCaller>,
}

/// Address book of oracle deployments keyed by network.
#[derive(Clone, Default)]
pub struct ContractResolver {
	deployments: HashMap<NetworkId, Deployment>,
}

impl ContractResolver {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers the oracle deployed at `address` on `network`.
	pub fn with_deployment(
		mut self,
		network: NetworkId,
		address: Felt,
		caller: Arc<dyn ContractCaller>,
	) -> Self {
		self.deployments
			.insert(network, Deployment { address, caller });
		self
	}

	/// Builds a resolver with one JSON-RPC caller per configured network.
	pub fn from_config(config: &ReaderConfig) -> Result<Self, ContractError> {
		let timeout = Duration::from_secs(config.reader.request_timeout_secs);
		let mut resolver = Self::new();

		for (network, settings) in &config.networks {
			let caller = create_rpc_caller(settings, timeout)?;
			info!(
				network = %network,
				oracle = %settings.oracle_address,
				"Registered oracle deployment"
			);
			resolver = resolver.with_deployment(
				network.clone(),
				settings.oracle_address,
				Arc::new(caller),
			);
		}

		Ok(resolver)
	}

	/// Networks with a registered deployment.
	pub fn networks(&self) -> impl Iterator<Item = &NetworkId> {
		self.deployments.keys()
	}

	/// Produces a contract handle for `network`.
	pub fn resolve(&self, network: &NetworkId) -> Result<OracleContract, ContractError> {
		let deployment = self
			.deployments
			.get(network)
			.ok_or_else(|| ContractError::AddressNotConfigured(network.clone()))?;

		Ok(OracleContract::new(
			network.clone(),
			deployment.address,
			deployment.caller.clone(),
		))
	}
}
