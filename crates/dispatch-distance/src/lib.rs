//! Distance module for the order dispatch service.
//!
//! This module turns a pair of `"lat,lng"` locations into a travel distance in
//! meters. Providers implement [`DistanceInterface`]; the engine only talks to
//! [`DistanceService`], which adds the integration-test short circuit.

use async_trait::async_trait;
use dispatch_types::{ConfigSchema, ExecutionMode, ImplementationRegistry};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod fixed;
	pub mod google_maps;
}

/// Distance returned without contacting a provider in integration-test mode.
pub const INTEGRATION_TEST_DISTANCE: u64 = 10;

/// Errors that can occur during distance resolution.
#[derive(Debug, Error)]
pub enum DistanceError {
	/// The provider could not be reached or returned a non-success status.
	#[error("Network error: {0}")]
	Network(String),
	/// The provider answered but could not compute a distance.
	#[error("Provider error: {0}")]
	Provider(String),
	/// Error that occurs when configuration is invalid.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for distance providers.
#[async_trait]
pub trait DistanceInterface: Send + Sync {
	/// Returns the configuration schema for this provider.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Resolves the travel distance in meters between two `"lat,lng"`
	/// locations.
	async fn get_distance(&self, origin: &str, destination: &str) -> Result<u64, DistanceError>;
}

/// Type alias for distance provider factory functions.
pub type DistanceFactory = fn(&toml::Value) -> Result<Box<dyn DistanceInterface>, DistanceError>;

/// Registry trait for distance provider implementations.
pub trait DistanceRegistry: ImplementationRegistry<Factory = DistanceFactory> {}

/// Get all registered distance provider implementations.
pub fn get_all_implementations() -> Vec<(&'static str, DistanceFactory)> {
	use implementations::{fixed, google_maps};

	vec![
		(fixed::Registry::NAME, fixed::Registry::factory()),
		(google_maps::Registry::NAME, google_maps::Registry::factory()),
	]
}

/// Distance resolver used by the engine.
pub struct DistanceService {
	provider: Box<dyn DistanceInterface>,
	mode: ExecutionMode,
}

impl DistanceService {
	pub fn new(provider: Box<dyn DistanceInterface>, mode: ExecutionMode) -> Self {
		Self { provider, mode }
	}

	/// Resolves the distance between two locations.
	///
	/// In integration-test mode the provider is never called and
	/// [`INTEGRATION_TEST_DISTANCE`] is returned. Provider errors are passed
	/// through unchanged.
	pub async fn get_distance(&self, origin: &str, destination: &str) -> Result<u64, DistanceError> {
		if self.mode.is_integration_test() {
			tracing::debug!(
				distance = INTEGRATION_TEST_DISTANCE,
				"Integration-test mode, skipping distance provider"
			);
			return Ok(INTEGRATION_TEST_DISTANCE);
		}
		self.provider.get_distance(origin, destination).await
	}
}
