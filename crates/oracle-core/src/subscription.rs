//! Live readings driven by a background task.

use crate::query::ValueQuery;
use crate::reader::OracleReader;
use oracle_types::{AssetKey, GetValueResult, NetworkId};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

/// Handle on a live reading of one asset key.
///
/// Dropping the handle stops the background task.
pub struct ValueSubscription {
	asset_key: AssetKey,
	receiver: watch::Receiver<GetValueResult>,
	task: JoinHandle<()>,
}

enum Evaluation {
	Completed,
	/// The active network changed mid-flight.
	Superseded,
}

impl ValueSubscription {
	pub(crate) fn spawn(reader: Arc<OracleReader>, asset_key: AssetKey) -> Self {
		let (tx, receiver) = watch::channel(GetValueResult {
			oracle_response: None,
			loading: true,
			error: None,
		});
		let task = tokio::spawn(drive(reader, asset_key, tx));

		Self {
			asset_key,
			receiver,
			task,
		}
	}

	pub fn asset_key(&self) -> AssetKey {
		self.asset_key
	}

	/// Latest published result.
	pub fn current(&self) -> GetValueResult {
		self.receiver.borrow().clone()
	}

	/// Waits for the next published result.
	pub async fn changed(&mut self) -> Option<GetValueResult> {
		self.receiver.changed().await.ok()?;
		Some(self.receiver.borrow_and_update().clone())
	}

	/// Waits until a published result satisfies `predicate`.
	pub async fn wait_for<F>(&mut self, mut predicate: F) -> Option<GetValueResult>
	where
		F: FnMut(&GetValueResult) -> bool,
	{
		self.receiver
			.wait_for(|result| predicate(result))
			.await
			.ok()
			.map(|result| result.clone())
	}

	/// Every published result, starting with the current one.
	pub fn stream(&self) -> WatchStream<GetValueResult> {
		WatchStream::new(self.receiver.clone())
	}
}

impl Drop for ValueSubscription {
	fn drop(&mut self) {
		self.task.abort();
	}
}

async fn drive(reader: Arc<OracleReader>, key: AssetKey, tx: watch::Sender<GetValueResult>) {
	let mut network_rx = reader.network_changes();
	let mut query = ValueQuery::new(key);
	let mut ticker = tokio::time::interval(reader.refresh_interval());
	ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

	debug!(asset_key = %key, network = %reader.network(), "Subscription started");

	loop {
		tokio::select! {
			_ = ticker.tick() => {}
			changed = network_rx.changed() => {
				if changed.is_err() {
					break;
				}
				query.reset();
				ticker.reset();
			}
		}

		while let Evaluation::Superseded = evaluate(&reader, &mut query, &tx, &mut network_rx).await {
			debug!(asset_key = %key, network = %reader.network(), "Inputs changed, re-evaluating");
			query.reset();
			ticker.reset();
		}

		if tx.is_closed() {
			break;
		}
	}

	debug!(asset_key = %key, "Subscription stopped");
}

/// Runs both calls and publishes after each one lands.
async fn evaluate(
	reader: &OracleReader,
	query: &mut ValueQuery,
	tx: &watch::Sender<GetValueResult>,
	network_rx: &mut watch::Receiver<NetworkId>,
) -> Evaluation {
	query.refresh();
	publish(tx, query.snapshot());

	let decimals_call = reader.call_decimals();
	let value_call = reader.call_value(query.asset_key());
	tokio::pin!(decimals_call, value_call);

	let mut decimals_done = false;
	let mut value_done = false;

	while !(decimals_done && value_done) {
		tokio::select! {
			outcome = &mut decimals_call, if !decimals_done => {
				decimals_done = true;
				query.decimals.resolve(outcome);
			}
			outcome = &mut value_call, if !value_done => {
				value_done = true;
				query.value.resolve(outcome);
			}
			Ok(()) = network_rx.changed() => {
				return Evaluation::Superseded;
			}
		}
		publish(tx, query.snapshot());
	}

	Evaluation::Completed
}

fn publish(tx: &watch::Sender<GetValueResult>, snapshot: GetValueResult) {
	tx.send_if_modified(|current| {
		if *current == snapshot {
			return false;
		}
		*current = snapshot;
		true
	});
}

#[cfg(test)]
mod tests {
	use crate::test_support::{reader_with, Reply, ScriptedCaller};
	use crate::OracleReader;
	use oracle_contract::ContractResolver;
	use oracle_types::{AssetKey, Felt, GetValueResult, NetworkId};
	use std::sync::Arc;
	use std::time::Duration;
	use tokio::sync::Notify;
	use tokio_stream::wrappers::WatchStream;
	use tokio_stream::StreamExt;

	/// Skips results until one carries a normalized value.
	async fn next_value(stream: &mut WatchStream<GetValueResult>) -> Option<f64> {
		loop {
			let result = stream.next().await?;
			if let Some(value) = result.oracle_response.and_then(|r| r.value) {
				return Some(value);
			}
		}
	}

	const TIMEOUT: Duration = Duration::from_secs(5);

	#[tokio::test]
	async fn test_pending_subscription() {
		let reader = reader_with(ScriptedCaller::new(Reply::Never, Reply::Never));
		let subscription = reader.subscribe(AssetKey::EthUsd);

		assert_eq!(
			subscription.current(),
			GetValueResult {
				oracle_response: None,
				loading: true,
				error: None,
			}
		);
	}

	#[tokio::test]
	async fn test_value_before_decimals() {
		let gate = Arc::new(Notify::new());
		let reader = reader_with(ScriptedCaller::new(
			Reply::After(gate.clone(), vec!["2".to_string()]),
			Reply::words(&["123450", "1656043200"]),
		));
		let mut subscription = reader.subscribe(AssetKey::EthUsd);

		let early = tokio::time::timeout(TIMEOUT, subscription.wait_for(|r| r.oracle_response.is_some()))
			.await
			.unwrap()
			.unwrap();
		let response = early.oracle_response.unwrap();
		assert_eq!(response.value, None);
		assert_eq!(response.last_updated_timestamp, Some(1656043200));
		assert!(!early.loading);

		gate.notify_one();

		let late = tokio::time::timeout(
			TIMEOUT,
			subscription.wait_for(|r| r.oracle_response.and_then(|o| o.value).is_some()),
		)
		.await
		.unwrap()
		.unwrap();
		assert_eq!(late.oracle_response.unwrap().value, Some(1234.5));
	}

	#[tokio::test]
	async fn test_failure_is_published() {
		let reader = reader_with(ScriptedCaller::new(
			Reply::words(&["2"]),
			Reply::Fail(oracle_contract::ContractError::Transport("boom".to_string())),
		));
		let mut subscription = reader.subscribe(AssetKey::EthUsd);

		let failed = tokio::time::timeout(TIMEOUT, subscription.wait_for(|r| r.error.is_some()))
			.await
			.unwrap()
			.unwrap();
		assert_eq!(failed.error.as_deref(), Some("Transport error: boom"));
		assert_eq!(failed.oracle_response, None);
		assert!(!failed.loading);
	}

	#[tokio::test]
	async fn test_network_switch_re_evaluates() {
		let resolver = ContractResolver::new()
			.with_deployment(
				NetworkId::testnet(),
				Felt::from_u64(1),
				Arc::new(ScriptedCaller::new(Reply::words(&["2"]), Reply::words(&["100", "1"]))),
			)
			.with_deployment(
				NetworkId::mainnet(),
				Felt::from_u64(2),
				Arc::new(ScriptedCaller::new(Reply::words(&["2"]), Reply::words(&["250", "2"]))),
			);
		let reader = Arc::new(OracleReader::new(
			resolver,
			NetworkId::testnet(),
			Duration::from_secs(3600),
		));

		let subscription = reader.subscribe(AssetKey::BtcUsd);
		let mut stream = subscription.stream();

		let first = tokio::time::timeout(TIMEOUT, next_value(&mut stream)).await.unwrap();
		assert_eq!(first, Some(1.0));

		reader.set_network(NetworkId::mainnet());

		let second = tokio::time::timeout(TIMEOUT, next_value(&mut stream)).await.unwrap();
		assert_eq!(second, Some(2.5));
	}

	#[tokio::test]
	async fn test_switch_to_unconfigured_network() {
		let reader = reader_with(ScriptedCaller::new(Reply::words(&["2"]), Reply::words(&["100", "1"])));
		let mut subscription = reader.subscribe(AssetKey::EthUsd);

		tokio::time::timeout(TIMEOUT, subscription.wait_for(|r| r.oracle_response.is_some()))
			.await
			.unwrap()
			.unwrap();

		reader.set_network(NetworkId::new("local-devnet"));

		let failed = tokio::time::timeout(TIMEOUT, subscription.wait_for(|r| r.error.is_some()))
			.await
			.unwrap()
			.unwrap();
		assert_eq!(
			failed.error.as_deref(),
			Some("No oracle contract configured for network local-devnet")
		);
		assert_eq!(failed.oracle_response, None);
	}

	#[tokio::test(start_paused = true)]
	async fn test_refresh_interval_reissues_calls() {
		let caller = ScriptedCaller::new(Reply::words(&["2"]), Reply::words(&["100", "1"]));
		let resolver = ContractResolver::new().with_deployment(
			NetworkId::testnet(),
			Felt::from_u64(1),
			Arc::new(caller.clone()),
		);
		let reader = Arc::new(OracleReader::new(
			resolver,
			NetworkId::testnet(),
			Duration::from_secs(10),
		));

		let mut subscription = reader.subscribe(AssetKey::EthUsd);
		subscription
			.wait_for(|r| r.oracle_response.is_some())
			.await
			.unwrap();
		assert_eq!(caller.value_calls(), 1);

		tokio::time::sleep(Duration::from_secs(25)).await;
		assert_eq!(caller.value_calls(), 3);

		// Refreshes keep the last reading instead of flashing back to loading
		let current = subscription.current();
		assert!(!current.loading);
		assert_eq!(current.oracle_response.unwrap().value, Some(1.0));
	}

	#[tokio::test]
	async fn test_drop_stops_task() {
		let caller = ScriptedCaller::new(Reply::words(&["2"]), Reply::words(&["100", "1"]));
		let reader = reader_with(caller.clone());

		let mut subscription = reader.subscribe(AssetKey::EthUsd);
		subscription
			.wait_for(|r| r.oracle_response.is_some())
			.await
			.unwrap();
		let stream = subscription.stream();
		drop(subscription);

		// The task owns the sender, so the stream ends after the last reading
		let remaining: Vec<GetValueResult> = tokio::time::timeout(TIMEOUT, stream.collect())
			.await
			.unwrap();
		assert_eq!(remaining.len(), 1);
		assert_eq!(caller.value_calls(), 1);
	}
}
