//! Configuration module for the ridehail client.
//!
//! This module provides structures and utilities for managing client
//! configuration. It supports loading configuration from TOML files
//! with environment variable interpolation, and validates eagerly at
//! startup so misconfiguration surfaces before anything is submitted
//! to the ledger.

use regex::Regex;
use ridehail_types::{Address, SecretString};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the ridehail client.
///
/// Contains everything one run needs: the node endpoint and retry
/// settings, the deployed contract and its well-known objects, key
/// material for the three actors, and the flow parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration for the remote ledger node.
	pub ledger: LedgerConfig,
	/// Deployed contract and well-known object addresses.
	pub contract: ContractConfig,
	/// Key material for the actors driving the flow.
	#[serde(default)]
	pub actors: ActorsConfig,
	/// Parameters for the ride lifecycle run.
	#[serde(default)]
	pub flow: FlowConfig,
}

/// Configuration for the remote ledger node.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
	/// JSON-RPC endpoint URL of the node.
	pub rpc_url: String,
	/// Per-request timeout in seconds.
	#[serde(default = "default_request_timeout_secs")]
	pub request_timeout_secs: u64,
	/// Total submission attempts per transaction, including the first.
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
	/// Delay between submission attempts in milliseconds.
	#[serde(default = "default_retry_delay_ms")]
	pub retry_delay_ms: u64,
}

impl LedgerConfig {
	/// The per-request timeout as a [`Duration`].
	pub fn request_timeout(&self) -> Duration {
		Duration::from_secs(self.request_timeout_secs)
	}

	/// The delay between submission attempts as a [`Duration`].
	pub fn retry_delay(&self) -> Duration {
		Duration::from_millis(self.retry_delay_ms)
	}
}

/// Deployed contract and well-known object addresses.
///
/// All of these are opaque references configured externally; the
/// client forwards them as arguments without inspecting the objects.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContractConfig {
	/// Address of the deployed ride package.
	pub package_id: Address,
	/// Address of the shared ride-storage object.
	pub ride_storage: Address,
	/// Address of the admin capability object.
	pub admin_cap: Address,
	/// Address of the driver capability object to register.
	pub driver_cap: Address,
	/// Address of the designated driver.
	pub driver_address: Address,
}

/// Key material for the three actors.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ActorsConfig {
	/// Key material for the admin actor.
	#[serde(default)]
	pub admin: KeyMaterialConfig,
	/// Key material for the rider actor.
	#[serde(default)]
	pub rider: KeyMaterialConfig,
	/// Key material for the driver actor.
	#[serde(default)]
	pub driver: KeyMaterialConfig,
}

/// Key material for one actor.
///
/// At most one source may be set. An actor with neither gets a freshly
/// generated ephemeral keypair for the run.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KeyMaterialConfig {
	/// Mnemonic phrase to derive the keypair from.
	pub mnemonic: Option<SecretString>,
	/// Exported base64 secret key to import.
	pub secret_key: Option<SecretString>,
}

/// Parameters for the ride lifecycle run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlowConfig {
	/// Estimated distance submitted with the ride request.
	#[serde(default = "default_estimate_distance")]
	pub estimate_distance: u64,
	/// Actual distance submitted when ending the ride.
	#[serde(default = "default_actual_distance")]
	pub actual_distance: u64,
	/// Amount in base units sent to each test actor during funding.
	#[serde(default = "default_funding_amount")]
	pub funding_amount: u64,
	/// Whether to fund the rider and driver before the lifecycle.
	#[serde(default = "default_fund_actors")]
	pub fund_actors: bool,
}

impl Default for FlowConfig {
	fn default() -> Self {
		Self {
			estimate_distance: default_estimate_distance(),
			actual_distance: default_actual_distance(),
			funding_amount: default_funding_amount(),
			fund_actors: default_fund_actors(),
		}
	}
}

/// Returns the default per-request timeout in seconds.
fn default_request_timeout_secs() -> u64 {
	30
}

/// Returns the default number of submission attempts.
fn default_max_attempts() -> u32 {
	3
}

/// Returns the default delay between submission attempts.
fn default_retry_delay_ms() -> u64 {
	1000
}

/// Returns the default estimated ride distance.
fn default_estimate_distance() -> u64 {
	10
}

/// Returns the default actual ride distance.
fn default_actual_distance() -> u64 {
	10
}

/// Returns the default funding amount in base units.
fn default_funding_amount() -> u64 {
	2_000_000_000
}

/// Returns whether actors are funded by default.
fn default_fund_actors() -> bool {
	true
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable
/// VAR_NAME. Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let range = match cap.get(0) {
			Some(m) => m.range(),
			None => continue,
		};
		let var_name = cap.get(1).map(|m| m.as_str()).unwrap_or_default();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)))
				}
			},
		};

		replacements.push((range, value));
	}

	// Apply replacements in reverse order to maintain positions
	for (range, value) in replacements.into_iter().rev() {
		result.replace_range(range, &value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a TOML file.
	///
	/// Environment variables are resolved and the configuration is
	/// validated before being returned.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let raw = std::fs::read_to_string(path)?;
		raw.parse()
	}

	/// Validates the configuration to ensure all required fields are properly set.
	///
	/// This method performs validation across all configuration sections:
	/// - Ensures the RPC endpoint is a non-empty http(s) URL
	/// - Checks timeout and retry settings are usable
	/// - Rejects actors configured with more than one key source
	fn validate(&self) -> Result<(), ConfigError> {
		// Validate ledger config
		if self.ledger.rpc_url.is_empty() {
			return Err(ConfigError::Validation("rpc_url cannot be empty".into()));
		}
		if !self.ledger.rpc_url.starts_with("http://") && !self.ledger.rpc_url.starts_with("https://")
		{
			return Err(ConfigError::Validation(format!(
				"rpc_url must be an http(s) URL, got '{}'",
				self.ledger.rpc_url
			)));
		}
		if self.ledger.request_timeout_secs == 0 {
			return Err(ConfigError::Validation(
				"request_timeout_secs must be greater than 0".into(),
			));
		}
		if self.ledger.max_attempts == 0 {
			return Err(ConfigError::Validation(
				"max_attempts must be at least 1".into(),
			));
		}
		if self.ledger.max_attempts > 10 {
			return Err(ConfigError::Validation(
				"max_attempts cannot exceed 10".into(),
			));
		}

		// Validate actor key material
		for (name, material) in [
			("admin", &self.actors.admin),
			("rider", &self.actors.rider),
			("driver", &self.actors.driver),
		] {
			if material.mnemonic.is_some() && material.secret_key.is_some() {
				return Err(ConfigError::Validation(format!(
					"Actor '{}' has both mnemonic and secret_key set",
					name
				)));
			}
			if let Some(mnemonic) = &material.mnemonic {
				if mnemonic.is_empty() {
					return Err(ConfigError::Validation(format!(
						"Actor '{}' has an empty mnemonic",
						name
					)));
				}
			}
			if let Some(secret_key) = &material.secret_key {
				if secret_key.is_empty() {
					return Err(ConfigError::Validation(format!(
						"Actor '{}' has an empty secret_key",
						name
					)));
				}
			}
		}

		Ok(())
	}
}

/// Implementation of FromStr trait for Config to enable parsing from string.
///
/// Environment variables are resolved and the configuration is
/// automatically validated after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
