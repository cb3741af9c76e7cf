//! Constant-distance provider for local development and tests.

use crate::{DistanceError, DistanceInterface};
use async_trait::async_trait;
use dispatch_types::{ConfigSchema, Field, FieldType, Schema, ValidationError};
use serde::Deserialize;

/// Settings of the `[distance.implementations.fixed]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct FixedDistanceConfig {
	#[serde(default = "default_meters")]
	pub meters: u64,
}

fn default_meters() -> u64 {
	crate::INTEGRATION_TEST_DISTANCE
}

/// Returns the same distance for every pair of locations.
pub struct FixedDistance {
	meters: u64,
}

impl FixedDistance {
	pub fn new(meters: u64) -> Self {
		Self { meters }
	}
}

#[async_trait]
impl DistanceInterface for FixedDistance {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FixedDistanceSchema)
	}

	async fn get_distance(&self, _origin: &str, _destination: &str) -> Result<u64, DistanceError> {
		Ok(self.meters)
	}
}

pub struct FixedDistanceSchema;

impl ConfigSchema for FixedDistanceSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![Field::new(
				"meters",
				FieldType::Integer {
					min: Some(0),
					max: None,
				},
			)],
		);
		schema.validate(config)
	}
}

/// Factory function to create a fixed provider from configuration.
///
/// Configuration parameters:
/// - `meters`: distance to return (default: 10)
pub fn create_distance(
	config: &toml::Value,
) -> Result<Box<dyn DistanceInterface>, DistanceError> {
	FixedDistanceSchema
		.validate(config)
		.map_err(|e| DistanceError::Configuration(format!("Invalid configuration: {}", e)))?;

	let config: FixedDistanceConfig = config
		.clone()
		.try_into()
		.map_err(|e| DistanceError::Configuration(format!("Invalid fixed config: {}", e)))?;

	Ok(Box::new(FixedDistance::new(config.meters)))
}

/// Registry for the fixed distance provider.
pub struct Registry;

impl dispatch_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "fixed";
	type Factory = crate::DistanceFactory;

	fn factory() -> Self::Factory {
		create_distance
	}
}

impl crate::DistanceRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_default_meters() {
		let provider = create_distance(&toml::Value::Table(toml::Table::new())).unwrap();
		assert_eq!(provider.get_distance("0,0", "1,1").await.unwrap(), 10);
	}

	#[tokio::test]
	async fn test_configured_meters() {
		let config: toml::Value = toml::from_str("meters = 2500").unwrap();
		let provider = create_distance(&config).unwrap();
		assert_eq!(provider.get_distance("0,0", "1,1").await.unwrap(), 2500);
	}

	#[test]
	fn test_negative_meters_rejected() {
		let config: toml::Value = toml::from_str("meters = -1").unwrap();
		assert!(matches!(
			create_distance(&config),
			Err(DistanceError::Configuration(_))
		));
	}
}
