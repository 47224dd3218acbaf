//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use oracle_types::{AssetKey, NetworkId};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "oracle-reader")]
#[command(about = "Read asset prices from the on-chain oracle", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
	/// Path to configuration file
	#[arg(short, long, value_name = "FILE", env = "ORACLE_CONFIG", default_value = "config/local.toml")]
	pub config: PathBuf,

	/// Network to read from, overriding the configured one
	#[arg(short, long)]
	pub network: Option<NetworkId>,

	/// Log level override (trace, debug, info, warn, error)
	#[arg(long, env = "ORACLE_LOG_LEVEL")]
	pub log_level: Option<String>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// List the supported asset keys and their on-chain encoding
	Assets,

	/// Read the oracle's decimals value
	Decimals,

	/// Read current prices once
	Get {
		/// Asset keys such as eth/usd
		#[arg(required = true)]
		assets: Vec<AssetKey>,

		/// Print one JSON object per asset
		#[arg(long)]
		json: bool,
	},

	/// Follow prices until interrupted
	Watch {
		/// Asset keys such as eth/usd
		#[arg(required = true)]
		assets: Vec<AssetKey>,
	},

	/// Validate the configuration file
	Validate,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_get() {
		let args = Args::try_parse_from([
			"oracle-reader",
			"--network",
			"mainnet-alpha",
			"get",
			"eth/usd",
			"btc/usd",
			"--json",
		])
		.unwrap();

		assert_eq!(args.network, Some(NetworkId::mainnet()));
		assert_eq!(args.config, PathBuf::from("config/local.toml"));
		assert_eq!(args.log_level, None);
		match args.command {
			Command::Get { assets, json } => {
				assert_eq!(assets, vec![AssetKey::EthUsd, AssetKey::BtcUsd]);
				assert!(json);
			}
			other => panic!("unexpected command: {:?}", other),
		}
	}

	#[test]
	fn test_rejects_unknown_asset() {
		let err = Args::try_parse_from(["oracle-reader", "watch", "eth/eur"]).unwrap_err();
		assert!(err.to_string().contains("eth/eur"));
	}

	#[test]
	fn test_get_requires_assets() {
		assert!(Args::try_parse_from(["oracle-reader", "get"]).is_err());
	}
}
