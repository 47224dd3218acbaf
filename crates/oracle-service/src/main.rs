use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	// Initialize tracing, falling back to the configured level
	let log_level = match &args.log_level {
		Some(level) => level.clone(),
		None => commands::configured_log_level(&args.config).await,
	};
	setup_tracing(&log_level)?;

	match args.command {
		Command::Assets => {
			commands::assets();
			Ok(())
		}
		Command::Decimals => {
			let reader = commands::connect(&args.config, args.network).await?;
			commands::decimals(&reader).await
		}
		Command::Get { assets, json } => {
			let reader = commands::connect(&args.config, args.network).await?;
			commands::get(&reader, &assets, json).await
		}
		Command::Watch { assets } => {
			let reader = commands::connect(&args.config, args.network).await?;
			commands::watch(reader, &assets, setup_shutdown_signal()).await
		}
		Command::Validate => commands::validate(&args.config, args.network).await,
	}
}

fn setup_tracing(log_level: &str) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	// Logs go to stderr so readings on stdout stay pipeable
	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	Ok(())
}

async fn setup_shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			warn!("Failed to listen for Ctrl+C: {}", e);
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			}
			Err(e) => {
				warn!("Failed to install SIGTERM handler: {}", e);
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
