//! Builder pattern for constructing the order engine.
//!
//! Composes an [`OrderEngine`] from the configured storage backend and
//! distance provider using name-keyed factory functions.

use crate::engine::OrderEngine;
use dispatch_config::Config;
use dispatch_distance::{DistanceError, DistanceInterface, DistanceService};
use dispatch_storage::{OrderStoreInterface, StorageError, StorageService};
use dispatch_types::ConfigSchema;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during engine construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Storage initialization failed: {0}")]
	Initialization(#[from] StorageError),
}

/// Factory functions for every pluggable component, keyed by
/// implementation name.
pub struct DispatchFactories<SF, DF> {
	pub storage_factories: HashMap<String, SF>,
	pub distance_factories: HashMap<String, DF>,
}

impl
	DispatchFactories<
		dispatch_storage::StorageFactory,
		dispatch_distance::DistanceFactory,
	>
{
	/// Every implementation bundled with the workspace.
	pub fn builtin() -> Self {
		Self {
			storage_factories: dispatch_storage::get_all_implementations()
				.into_iter()
				.map(|(name, factory)| (name.to_string(), factory))
				.collect(),
			distance_factories: dispatch_distance::get_all_implementations()
				.into_iter()
				.map(|(name, factory)| (name.to_string(), factory))
				.collect(),
		}
	}
}

/// Builder for constructing an OrderEngine from configuration.
pub struct DispatchBuilder {
	config: Config,
}

impl DispatchBuilder {
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Instantiates the primary storage backend and distance provider,
	/// initializes the store and returns the engine.
	pub async fn build<SF, DF>(
		self,
		factories: DispatchFactories<SF, DF>,
	) -> Result<OrderEngine, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn OrderStoreInterface>, StorageError>,
		DF: Fn(&toml::Value) -> Result<Box<dyn DistanceInterface>, DistanceError>,
	{
		let storage_backend = create_primary(
			"storage",
			&self.config.storage.primary,
			&self.config.storage.implementations,
			&factories.storage_factories,
		)?;
		let storage = Arc::new(StorageService::new(storage_backend));
		storage.initialize().await?;

		let provider = create_primary(
			"distance",
			&self.config.distance.primary,
			&self.config.distance.implementations,
			&factories.distance_factories,
		)?;
		let mode = self.config.execution_mode();
		let distance = Arc::new(DistanceService::new(provider, mode));

		tracing::info!(
			service_id = %self.config.service.id,
			execution_mode = %mode,
			"Order engine ready"
		);
		Ok(OrderEngine::new(storage, distance))
	}
}

/// A pluggable component that describes its own configuration table.
trait Configurable {
	fn config_schema(&self) -> Box<dyn ConfigSchema>;
}

impl Configurable for dyn OrderStoreInterface {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		OrderStoreInterface::config_schema(self)
	}
}

impl Configurable for dyn DistanceInterface {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		DistanceInterface::config_schema(self)
	}
}

/// Creates the primary implementation of one component and validates its
/// configuration table against the implementation's schema.
///
/// Only the primary is constructed, so a secondary entry with an
/// unreachable backend never blocks startup.
fn create_primary<T: Configurable + ?Sized, E: Display, F>(
	component: &str,
	primary: &str,
	implementations: &HashMap<String, toml::Value>,
	factories: &HashMap<String, F>,
) -> Result<Box<T>, BuilderError>
where
	F: Fn(&toml::Value) -> Result<Box<T>, E>,
{
	let config = implementations.get(primary).ok_or_else(|| {
		BuilderError::Config(format!(
			"Primary {} '{}' not found in implementations",
			component, primary
		))
	})?;
	let factory = factories.get(primary).ok_or_else(|| {
		BuilderError::Config(format!(
			"Unknown {} implementation '{}'",
			component, primary
		))
	})?;

	match factory(config) {
		Ok(implementation) => match implementation.config_schema().validate(config) {
			Ok(()) => {
				tracing::info!(component, implementation = %primary, "Loaded");
				Ok(implementation)
			},
			Err(e) => {
				tracing::error!(
					component,
					implementation = %primary,
					error = %e,
					"Invalid configuration for implementation"
				);
				Err(BuilderError::Config(format!(
					"Invalid configuration for {} implementation '{}': {}",
					component, primary, e
				)))
			},
		},
		Err(e) => {
			tracing::error!(
				component,
				implementation = %primary,
				error = %e,
				"Failed to create implementation"
			);
			Err(BuilderError::Config(format!(
				"Failed to create {} implementation '{}': {}",
				component, primary, e
			)))
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use dispatch_config::ConfigBuilder;
	use dispatch_types::{ExecutionMode, Field, FieldType, Schema};

	/// Provider whose factory accepts anything but whose schema requires a
	/// `region` string.
	struct RegionalDistance;

	#[async_trait]
	impl DistanceInterface for RegionalDistance {
		fn config_schema(&self) -> Box<dyn ConfigSchema> {
			Box::new(Schema::new(
				vec![Field::new("region", FieldType::String)],
				vec![],
			))
		}

		async fn get_distance(&self, _: &str, _: &str) -> Result<u64, DistanceError> {
			Ok(1)
		}
	}

	fn create_regional(_: &toml::Value) -> Result<Box<dyn DistanceInterface>, DistanceError> {
		Ok(Box::new(RegionalDistance))
	}

	fn meters(value: i64) -> toml::Value {
		let mut table = toml::Table::new();
		table.insert("meters".into(), toml::Value::Integer(value));
		toml::Value::Table(table)
	}

	#[tokio::test]
	async fn test_build_with_builtin_factories() {
		let config = ConfigBuilder::new().distance("fixed", meters(777)).build();
		let engine = DispatchBuilder::new(config)
			.build(DispatchFactories::builtin())
			.await
			.unwrap();

		let order = engine
			.place_order(&["0.0", "0.0"], &["1.0", "1.0"])
			.await
			.unwrap();
		assert_eq!(order.distance, 777);
	}

	#[tokio::test]
	async fn test_build_honours_execution_mode() {
		let config = ConfigBuilder::new()
			.distance("fixed", meters(777))
			.execution_mode(ExecutionMode::IntegrationTest)
			.build();
		let engine = DispatchBuilder::new(config)
			.build(DispatchFactories::builtin())
			.await
			.unwrap();

		let order = engine
			.place_order(&["0.0", "0.0"], &["1.0", "1.0"])
			.await
			.unwrap();
		assert_eq!(order.distance, dispatch_distance::INTEGRATION_TEST_DISTANCE);
	}

	#[tokio::test]
	async fn test_unknown_implementation() {
		let config = ConfigBuilder::new()
			.storage("redis", toml::Value::Table(toml::Table::new()))
			.build();
		let result = DispatchBuilder::new(config)
			.build(DispatchFactories::builtin())
			.await;

		assert!(
			matches!(result, Err(BuilderError::Config(m)) if m.contains("Unknown storage implementation 'redis'"))
		);
	}

	#[tokio::test]
	async fn test_factory_failure_is_reported() {
		let config = ConfigBuilder::new().distance("fixed", meters(-3)).build();
		let result = DispatchBuilder::new(config)
			.build(DispatchFactories::builtin())
			.await;

		assert!(
			matches!(result, Err(BuilderError::Config(m)) if m.contains("Failed to create distance implementation 'fixed'"))
		);
	}

	#[tokio::test]
	async fn test_schema_rejects_primary_config() {
		let config = ConfigBuilder::new()
			.distance("regional", toml::Value::Table(toml::Table::new()))
			.build();
		let mut factories = DispatchFactories::builtin();
		factories
			.distance_factories
			.insert("regional".into(), create_regional);

		let result = DispatchBuilder::new(config).build(factories).await;

		assert!(
			matches!(result, Err(BuilderError::Config(m)) if m.contains("Invalid configuration for distance implementation 'regional'"))
		);
	}

	#[tokio::test]
	async fn test_schema_accepts_primary_config() {
		let mut table = toml::Table::new();
		table.insert("region".into(), toml::Value::String("hk".into()));
		let config = ConfigBuilder::new()
			.distance("regional", toml::Value::Table(table))
			.build();
		let mut factories = DispatchFactories::builtin();
		factories
			.distance_factories
			.insert("regional".into(), create_regional);

		let engine = DispatchBuilder::new(config).build(factories).await.unwrap();
		let order = engine
			.place_order(&["0.0", "0.0"], &["1.0", "1.0"])
			.await
			.unwrap();
		assert_eq!(order.distance, 1);
	}
}
