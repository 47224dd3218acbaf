//! Subcommand implementations.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::StreamExt;
use oracle_config::{ConfigLoader, ReaderConfig};
use oracle_core::OracleReader;
use oracle_types::{AssetKey, GetValueResult, NetworkId};
use serde_json::json;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Loads the configuration, applying the `--network` override.
pub async fn load_config(path: &Path, network: Option<NetworkId>) -> Result<ReaderConfig> {
	info!("Loading configuration from: {:?}", path);

	let mut config = ConfigLoader::new()
		.with_file(path)
		.load()
		.await
		.context("Failed to load configuration")?;

	if let Some(network) = network {
		config.reader.active_network = network;
	}

	Ok(config)
}

/// Log filter from the configuration file, `info` when it cannot be read.
pub async fn configured_log_level(path: &Path) -> String {
	ConfigLoader::new()
		.with_file(path)
		.load()
		.await
		.map(|config| config.reader.log_level)
		.unwrap_or_else(|_| "info".to_string())
}

pub async fn connect(path: &Path, network: Option<NetworkId>) -> Result<Arc<OracleReader>> {
	let config = load_config(path, network).await?;
	info!(
		name = %config.reader.name,
		network = %config.reader.active_network,
		"Configuration loaded"
	);

	let reader = OracleReader::from_config(&config).context("Failed to set up oracle contracts")?;
	Ok(Arc::new(reader))
}

pub fn assets() {
	for key in AssetKey::ALL {
		println!("{:<10} {}", key, key.encoded());
	}
}

pub async fn decimals(reader: &OracleReader) -> Result<()> {
	let reading = reader.get_decimals().await;
	if let Some(error) = reading.error {
		anyhow::bail!("Failed to read decimals: {}", error);
	}

	match reading.decimals {
		Some(decimals) => println!("{}", decimals),
		None => println!("n/a"),
	}
	Ok(())
}

pub async fn get(reader: &OracleReader, assets: &[AssetKey], as_json: bool) -> Result<()> {
	let results = futures::future::join_all(assets.iter().map(|key| reader.get_value(*key))).await;

	let mut failed = 0;
	for (key, result) in assets.iter().zip(&results) {
		if result.error.is_some() {
			failed += 1;
		}
		if as_json {
			println!("{}", to_json(*key, result));
		} else {
			println!("{}", render(*key, result));
		}
	}

	if failed > 0 {
		anyhow::bail!("{} of {} reads failed", failed, assets.len());
	}
	Ok(())
}

/// Prints every published reading until `shutdown` resolves.
pub async fn watch(
	reader: Arc<OracleReader>,
	assets: &[AssetKey],
	shutdown: impl Future<Output = ()>,
) -> Result<()> {
	let subscriptions: Vec<_> = assets.iter().map(|key| reader.subscribe(*key)).collect();
	let mut updates = futures::stream::select_all(subscriptions.iter().map(|subscription| {
		let key = subscription.asset_key();
		subscription.stream().map(move |result| (key, result))
	}));

	info!(
		network = %reader.network(),
		interval_secs = reader.refresh_interval().as_secs(),
		"Watching {} asset(s)",
		assets.len()
	);

	tokio::pin!(shutdown);
	loop {
		tokio::select! {
			_ = &mut shutdown => {
				info!("Shutdown signal received, stopping");
				break;
			}
			update = updates.next() => match update {
				Some((key, result)) => println!("{}", render(key, &result)),
				None => break,
			}
		}
	}

	Ok(())
}

pub async fn validate(path: &Path, network: Option<NetworkId>) -> Result<()> {
	let config = load_config(path, network).await?;

	info!("Configuration is valid");
	info!("Reader name: {}", config.reader.name);
	info!("Active network: {}", config.reader.active_network);
	info!("Refresh interval: {}s", config.reader.refresh_interval_secs);

	let mut deployments: Vec<_> = config.oracle_addresses().into_iter().collect();
	deployments.sort();
	for (network, address) in deployments {
		let rpc_url = config
			.network(&network)
			.map(|settings| settings.rpc_url.as_str())
			.unwrap_or_default();
		info!("  Network: {} ({}) oracle {}", network, rpc_url, address);
	}

	if config.network(&config.reader.active_network).is_none() {
		warn!(
			"No oracle configured for active network {}; reads will fail",
			config.reader.active_network
		);
	}

	Ok(())
}

/// One human-readable line per reading.
pub fn render(key: AssetKey, result: &GetValueResult) -> String {
	if let Some(error) = &result.error {
		return format!("{:<10} error: {}", key, error);
	}

	match (&result.oracle_response, result.loading) {
		(Some(response), _) => {
			let value = response
				.value
				.map(|v| v.to_string())
				.unwrap_or_else(|| "n/a".to_string());
			let updated = response
				.last_updated_timestamp
				.and_then(format_timestamp)
				.unwrap_or_else(|| "unknown".to_string());
			format!("{:<10} {} (updated {})", key, value, updated)
		}
		(None, true) => format!("{:<10} loading", key),
		(None, false) => format!("{:<10} n/a", key),
	}
}

fn to_json(key: AssetKey, result: &GetValueResult) -> serde_json::Value {
	json!({
		"asset_key": key,
		"encoded": key.encoded(),
		"oracle_response": result.oracle_response,
		"loading": result.loading,
		"error": result.error,
	})
}

fn format_timestamp(secs: u64) -> Option<String> {
	let secs = i64::try_from(secs).ok()?;
	DateTime::<Utc>::from_timestamp(secs, 0).map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use oracle_types::OracleResponse;
	use std::io::Write;

	#[tokio::test]
	async fn test_configured_log_level() {
		let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
		write!(
			file,
			r#"
[reader]
active_network = "goerli-alpha"
log_level = "debug"
"#
		)
		.unwrap();

		assert_eq!(configured_log_level(file.path()).await, "debug");
		assert_eq!(
			configured_log_level(Path::new("/nonexistent/oracle.toml")).await,
			"info"
		);
	}

	#[test]
	fn test_render_reading() {
		let result = GetValueResult {
			oracle_response: Some(OracleResponse {
				value: Some(1234.5),
				last_updated_timestamp: Some(1656043200),
			}),
			loading: false,
			error: None,
		};

		assert_eq!(
			render(AssetKey::EthUsd, &result),
			"eth/usd    1234.5 (updated 2022-06-24 04:00:00 UTC)"
		);
	}

	#[test]
	fn test_render_partial_and_states() {
		let partial = GetValueResult {
			oracle_response: Some(OracleResponse {
				value: None,
				last_updated_timestamp: None,
			}),
			loading: false,
			error: None,
		};
		assert_eq!(
			render(AssetKey::BtcUsd, &partial),
			"btc/usd    n/a (updated unknown)"
		);

		let loading = GetValueResult {
			loading: true,
			..Default::default()
		};
		assert_eq!(render(AssetKey::BtcUsd, &loading), "btc/usd    loading");

		let failed = GetValueResult {
			error: Some("Transport error: timed out".to_string()),
			..Default::default()
		};
		assert_eq!(
			render(AssetKey::EthMxn, &failed),
			"eth/mxn    error: Transport error: timed out"
		);
	}

	#[test]
	fn test_json_line() {
		let result = GetValueResult {
			oracle_response: Some(OracleResponse {
				value: Some(0.5),
				last_updated_timestamp: Some(7),
			}),
			loading: false,
			error: None,
		};

		assert_eq!(
			to_json(AssetKey::EthUsd, &result),
			json!({
				"asset_key": "eth/usd",
				"encoded": "0x6574682f757364",
				"oracle_response": { "value": 0.5, "last_updated_timestamp": 7 },
				"loading": false,
				"error": null,
			})
		);
	}
}
