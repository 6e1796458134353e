//! Main entry point for the ridehail client.
//!
//! This binary drives one unattended run of the ride lifecycle against
//! the deployed contract: it loads and validates configuration, wires
//! the ledger service, and walks the fund -> register -> request ->
//! accept -> complete pipeline, reporting each confirmed step.

use anyhow::Context;
use clap::Parser;
use ridehail_config::Config;
use ridehail_flow::RideFlow;
use ridehail_ledger::implementations::http::HttpLedger;
use ridehail_ledger::{LedgerError, LedgerService, RetryPolicy};
use std::path::PathBuf;

/// Command-line arguments for the ridehail client.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the ridehail client.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads and validates configuration from file
/// 4. Wires the ledger service over the configured node endpoint
/// 5. Runs the full ride lifecycle once and reports the summary
#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	// Create env filter with default from args
	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt().with_env_filter(env_filter).with_target(true).init();

	tracing::info!("Started ridehail client");

	// Load configuration
	let config = Config::from_file(&args.config)
		.with_context(|| format!("failed to load configuration from {}", args.config.display()))?;
	tracing::info!(rpc_url = %config.ledger.rpc_url, "Loaded configuration");

	let ledger = build_ledger(&config).context("failed to build ledger service")?;
	let flow = RideFlow::new(ledger, &config).context("failed to build ride flow")?;

	match flow.run().await {
		Ok(summary) => {
			for step in &summary.steps {
				tracing::info!(step = step.name, digest = %step.digest, "Step confirmed");
			}
			tracing::info!(
				ride_id = %summary.ride_id,
				state = %summary.final_state,
				"Ride lifecycle finished"
			);
			Ok(())
		}
		Err(e) => {
			tracing::error!(error = %e, "Ride lifecycle aborted");
			Err(e.into())
		}
	}
}

/// Builds the ledger service from the validated configuration.
///
/// The HTTP transport gets the endpoint and per-request timeout; the
/// service wrapper applies the configured retry budget to transient
/// network failures.
fn build_ledger(config: &Config) -> Result<LedgerService, LedgerError> {
	let transport = HttpLedger::new(
		config.ledger.rpc_url.clone(),
		config.ledger.request_timeout(),
	)?;
	let retry = RetryPolicy::new(config.ledger.max_attempts, config.ledger.retry_delay());
	Ok(LedgerService::new(Box::new(transport), retry))
}
