//! Scripted contract callers and log capture shared by the unit tests.

use crate::OracleReader;
use async_trait::async_trait;
use oracle_contract::{ContractCaller, ContractError, ContractResolver, OracleMethod, RawResponse};
use oracle_types::{Felt, NetworkId};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// How a scripted call answers.
#[derive(Clone)]
pub(crate) enum Reply {
	Words(Vec<String>),
	Fail(ContractError),
	/// Answers once the gate is notified.
	After(Arc<Notify>, Vec<String>),
	Never,
}

impl Reply {
	pub(crate) fn words(raw: &[&str]) -> Self {
		Reply::Words(raw.iter().map(|w| w.to_string()).collect())
	}

	async fn answer(&self) -> Result<RawResponse, ContractError> {
		match self {
			Reply::Words(words) => Ok(words.clone()),
			Reply::Fail(e) => Err(e.clone()),
			Reply::After(gate, words) => {
				gate.notified().await;
				Ok(words.clone())
			}
			Reply::Never => std::future::pending().await,
		}
	}
}

/// Answers `get_decimals` and `get_value` from a script and records calls.
#[derive(Clone)]
pub(crate) struct ScriptedCaller {
	decimals: Reply,
	value: Reply,
	value_calls: Arc<AtomicUsize>,
	value_calldata: Arc<Mutex<Vec<Vec<Felt>>>>,
}

impl ScriptedCaller {
	pub(crate) fn new(decimals: Reply, value: Reply) -> Self {
		Self {
			decimals,
			value,
			value_calls: Arc::new(AtomicUsize::new(0)),
			value_calldata: Arc::new(Mutex::new(Vec::new())),
		}
	}

	pub(crate) fn value_calls(&self) -> usize {
		self.value_calls.load(Ordering::SeqCst)
	}

	pub(crate) fn value_calldata(&self) -> Vec<Vec<Felt>> {
		self.value_calldata.lock().unwrap().clone()
	}
}

#[async_trait]
impl ContractCaller for ScriptedCaller {
	async fn call(
		&self,
		_contract: Felt,
		selector: Felt,
		calldata: &[Felt],
	) -> Result<RawResponse, ContractError> {
		if selector == OracleMethod::GetDecimals.selector() {
			return self.decimals.answer().await;
		}

		self.value_calls.fetch_add(1, Ordering::SeqCst);
		self.value_calldata.lock().unwrap().push(calldata.to_vec());
		self.value.answer().await
	}
}

/// Reader on the testnet with a single scripted deployment.
pub(crate) fn reader_with(caller: ScriptedCaller) -> Arc<OracleReader> {
	let resolver = ContractResolver::new().with_deployment(
		NetworkId::testnet(),
		Felt::from_u64(0x1234),
		Arc::new(caller),
	);
	Arc::new(OracleReader::new(
		resolver,
		NetworkId::testnet(),
		Duration::from_secs(3600),
	))
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub(crate) struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
	/// Routes this thread's logs into the buffer until the guard drops.
	pub(crate) fn install(&self) -> tracing::subscriber::DefaultGuard {
		let buffer = self.clone();
		let subscriber = tracing_subscriber::fmt()
			.with_writer(move || buffer.clone())
			.with_ansi(false)
			.with_max_level(tracing::Level::DEBUG)
			.finish();
		tracing::subscriber::set_default(subscriber)
	}

	pub(crate) fn contents(&self) -> String {
		String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
	}
}

impl io::Write for LogBuffer {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0.lock().unwrap().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}
