//! Configuration loading for the oracle reader.
//!
//! Configuration files may be TOML, JSON or YAML (chosen by extension).
//! `${VAR}` placeholders are substituted from the environment before parsing,
//! and a handful of settings can be overridden afterwards through prefixed
//! environment variables.

use oracle_types::NetworkId;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod types;

pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Unsupported config format: {0}")]
	UnsupportedFormat(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
	Toml,
	Json,
	Yaml,
}

impl ConfigFormat {
	pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
		match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Ok(Self::Toml),
			Some("json") => Ok(Self::Json),
			Some("yaml") | Some("yml") => Ok(Self::Yaml),
			_ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
		}
	}
}

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
	file_path: Option<PathBuf>,
	env_prefix: String,
}

impl Default for ConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "ORACLE_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_path_buf());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub async fn load(&self) -> Result<ReaderConfig, ConfigError> {
		let file_path = self.file_path.as_ref().ok_or_else(|| {
			ConfigError::FileNotFound("No configuration file specified".to_string())
		})?;

		info!("Loading configuration from {:?}", file_path);

		let content = match tokio::fs::read_to_string(file_path).await {
			Ok(content) => content,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				return Err(ConfigError::FileNotFound(file_path.display().to_string()));
			}
			Err(e) => return Err(e.into()),
		};

		let format = ConfigFormat::from_path(file_path)?;
		self.load_from_str(&content, format, |name| env::var(name).ok())
	}

	/// Parses, overrides and validates configuration text.
	///
	/// `lookup` resolves environment variables, both for `${VAR}` placeholders
	/// and for the prefixed overrides.
	pub fn load_from_str<F>(
		&self,
		content: &str,
		format: ConfigFormat,
		lookup: F,
	) -> Result<ReaderConfig, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let substituted = substitute_env_vars(content, &lookup)?;

		let mut config: ReaderConfig = match format {
			ConfigFormat::Toml => {
				toml::from_str(&substituted).map_err(|e| ConfigError::ParseError(e.to_string()))?
			}
			ConfigFormat::Json => serde_json::from_str(&substituted)
				.map_err(|e| ConfigError::ParseError(e.to_string()))?,
			ConfigFormat::Yaml => serde_yaml::from_str(&substituted)
				.map_err(|e| ConfigError::ParseError(e.to_string()))?,
		};

		self.apply_env_overrides(&mut config, &lookup)?;
		validate_config(&config)?;

		Ok(config)
	}

	fn apply_env_overrides<F>(&self, config: &mut ReaderConfig, lookup: &F) -> Result<(), ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(network) = lookup(&format!("{}NETWORK", self.env_prefix)) {
			debug!("Overriding active network from environment");
			config.reader.active_network = NetworkId::new(network);
		}

		if let Some(log_level) = lookup(&format!("{}LOG_LEVEL", self.env_prefix)) {
			config.reader.log_level = log_level;
		}

		if let Some(interval) = lookup(&format!("{}REFRESH_INTERVAL_SECS", self.env_prefix)) {
			config.reader.refresh_interval_secs = interval.parse().map_err(|e| {
				ConfigError::ValidationError(format!("Invalid refresh interval: {}", e))
			})?;
		}

		for (id, network) in config.networks.iter_mut() {
			if let Some(url) = lookup(&format!("RPC_URL_{}", id.env_suffix())) {
				debug!("Overriding RPC URL for network {} from environment", id);
				network.rpc_url = url;
			}
		}

		Ok(())
	}
}

/// Replaces every `${VAR_NAME}` with the value `lookup` returns for it.
fn substitute_env_vars<F>(content: &str, lookup: &F) -> Result<String, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let re = regex::Regex::new(r"\$\{([^}]+)\}")
		.map_err(|e| ConfigError::ParseError(e.to_string()))?;

	let mut result = content.to_string();
	for cap in re.captures_iter(content) {
		let full_match = &cap[0];
		let var_name = &cap[1];

		let value = lookup(var_name).ok_or_else(|| ConfigError::EnvVarNotFound(var_name.to_string()))?;
		result = result.replace(full_match, &value);
	}

	Ok(result)
}

fn validate_config(config: &ReaderConfig) -> Result<(), ConfigError> {
	if config.reader.refresh_interval_secs == 0 {
		return Err(ConfigError::ValidationError(
			"refresh_interval_secs must be greater than zero".to_string(),
		));
	}

	if config.reader.request_timeout_secs == 0 {
		return Err(ConfigError::ValidationError(
			"request_timeout_secs must be greater than zero".to_string(),
		));
	}

	for (id, network) in &config.networks {
		if !(network.rpc_url.starts_with("http://") || network.rpc_url.starts_with("https://")) {
			return Err(ConfigError::ValidationError(format!(
				"RPC URL for network {} must start with http:// or https://",
				id
			)));
		}
	}

	// Not fatal: queries against it report the missing deployment.
	if !config.networks.contains_key(&config.reader.active_network) {
		warn!(
			"Active network {} has no oracle deployment configured",
			config.reader.active_network
		);
	}

	Ok(())
}
