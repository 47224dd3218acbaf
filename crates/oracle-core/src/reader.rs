//! The oracle reader: contract handle management and the decimals and value
//! queries.

use crate::query::{decimals_reading, ValueQuery};
use crate::subscription::ValueSubscription;
use arc_swap::ArcSwap;
use oracle_config::ReaderConfig;
use oracle_contract::{ContractError, ContractResolver, OracleContract, OracleMethod, RawResponse};
use oracle_types::{AssetKey, DecimalsReading, GetValueResult, NetworkId, QueryState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

type ResolvedContract = Result<OracleContract, ContractError>;

/// Reads prices from the oracle deployed on the active network.
pub struct OracleReader {
	resolver: ContractResolver,
	/// Handle for the active network, or why there is none.
	contract: ArcSwap<ResolvedContract>,
	network: watch::Sender<NetworkId>,
	refresh_interval: Duration,
}

impl OracleReader {
	pub fn new(resolver: ContractResolver, network: NetworkId, refresh_interval: Duration) -> Self {
		let contract = resolver.resolve(&network);
		if let Err(e) = &contract {
			let configured: Vec<&str> = resolver.networks().map(NetworkId::as_str).collect();
			warn!(network = %network, configured = ?configured, "{}", e);
		}

		let (network_tx, _) = watch::channel(network);

		Self {
			resolver,
			contract: ArcSwap::from_pointee(contract),
			network: network_tx,
			refresh_interval,
		}
	}

	/// Builds a reader with JSON-RPC callers for every configured network.
	pub fn from_config(config: &ReaderConfig) -> Result<Self, ContractError> {
		let resolver = ContractResolver::from_config(config)?;
		Ok(Self::new(
			resolver,
			config.reader.active_network.clone(),
			Duration::from_secs(config.reader.refresh_interval_secs),
		))
	}

	pub fn network(&self) -> NetworkId {
		self.network.borrow().clone()
	}

	pub fn refresh_interval(&self) -> Duration {
		self.refresh_interval
	}

	/// Switches the active network; live subscriptions start over against
	/// the new deployment.
	///
	/// The handle is swapped while the network channel is write-locked, so
	/// concurrent switches never leave the handle on another network.
	pub fn set_network(&self, network: NetworkId) {
		self.network.send_if_modified(|current| {
			if *current == network {
				return false;
			}

			info!(network = %network, "Switching active network");
			self.contract
				.store(Arc::new(self.resolver.resolve(&network)));
			*current = network.clone();
			true
		});
	}

	/// The oracle handle for the active network.
	pub fn contract(&self) -> ResolvedContract {
		(**self.contract.load()).clone()
	}

	pub(crate) fn network_changes(&self) -> watch::Receiver<NetworkId> {
		self.network.subscribe()
	}

	/// Runs `get_decimals`.
	///
	/// The call takes no asset key: the oracle publishes one decimals value
	/// shared by every asset.
	pub(crate) async fn call_decimals(&self) -> Result<RawResponse, String> {
		let contract = self.contract().map_err(|e| e.to_string())?;
		contract
			.call(OracleMethod::GetDecimals, &[])
			.await
			.map_err(|e| e.to_string())
	}

	/// Runs `get_value` for `key`, logging failures.
	pub(crate) async fn call_value(&self, key: AssetKey) -> Result<RawResponse, String> {
		let arg = key.to_felt();
		let outcome = match self.contract() {
			Ok(contract) => contract.call(OracleMethod::GetValue, &[arg]).await,
			Err(e) => Err(e),
		};

		outcome.map_err(|e| {
			error!(
				asset_key = %key,
				encoded = %arg,
				error = %e,
				"Error retrieving price for {}, encoded as {}",
				key,
				arg
			);
			e.to_string()
		})
	}

	/// Reads the decimals value once.
	pub async fn get_decimals(&self) -> DecimalsReading {
		let mut state = QueryState::Pending;
		state.resolve(self.call_decimals().await);
		decimals_reading(&state)
	}

	/// Reads the value of `key` once, racing the decimals and value calls.
	pub async fn get_value(&self, key: AssetKey) -> GetValueResult {
		let mut query = ValueQuery::new(key);
		query.refresh();

		let (decimals, value) = tokio::join!(self.call_decimals(), self.call_value(key));
		query.decimals.resolve(decimals);
		query.value.resolve(value);

		query.snapshot()
	}

	/// Starts a live reading of `key`, refreshed on the reader's interval and
	/// whenever the active network changes.
	pub fn subscribe(self: &Arc<Self>, key: AssetKey) -> ValueSubscription {
		ValueSubscription::spawn(self.clone(), key)
	}
}
