//! Main entry point for the order dispatch service.
//!
//! Loads the configuration, builds the order engine with the configured
//! storage backend and distance provider, and serves the HTTP API.

use clap::Parser;
use dispatch_config::Config;
use dispatch_core::{DispatchBuilder, DispatchFactories};
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod server;

/// Command-line arguments for the dispatch service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml", env = "DISPATCH_CONFIG")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	// RUST_LOG wins over --log-level
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	let config_path = args
		.config
		.to_str()
		.ok_or("Configuration path is not valid UTF-8")?;
	let config = Config::from_file(config_path).await?;
	tracing::info!(
		execution_mode = %config.execution_mode(),
		"Loaded configuration [{}]",
		config.service.id
	);

	let api_config = config.api.clone().unwrap_or_default();
	if !api_config.enabled {
		tracing::warn!("API server disabled in configuration, nothing to serve");
		return Ok(());
	}

	let engine = DispatchBuilder::new(config)
		.build(DispatchFactories::builtin())
		.await?;

	server::start_server(api_config, Arc::new(engine)).await?;

	tracing::info!("Stopped dispatch service");
	Ok(())
}
