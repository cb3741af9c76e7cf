//! Fluent construction of [`Config`] values for tests and local runs.

use crate::{Config, DistanceConfig, ExecutionMode, ServiceConfig, StorageConfig};
use std::collections::HashMap;

/// Builder for `Config` with in-process backends selected by default.
///
/// The defaults are an in-memory store and the fixed distance provider, so a
/// built configuration needs neither a database nor network access.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	service_id: String,
	execution_mode: ExecutionMode,
	storage_primary: String,
	storage_implementations: HashMap<String, toml::Value>,
	distance_primary: String,
	distance_implementations: HashMap<String, toml::Value>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	pub fn new() -> Self {
		Self {
			service_id: "dispatch-test".to_string(),
			execution_mode: ExecutionMode::Normal,
			storage_primary: "memory".to_string(),
			storage_implementations: HashMap::from([(
				"memory".to_string(),
				toml::Value::Table(toml::Table::new()),
			)]),
			distance_primary: "fixed".to_string(),
			distance_implementations: HashMap::from([(
				"fixed".to_string(),
				toml::Value::Table(toml::Table::new()),
			)]),
		}
	}

	pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
		self.execution_mode = mode;
		self
	}

	/// Adds a storage implementation and makes it primary.
	pub fn storage(mut self, name: impl Into<String>, config: toml::Value) -> Self {
		let name = name.into();
		self.storage_implementations.insert(name.clone(), config);
		self.storage_primary = name;
		self
	}

	/// Adds a distance provider and makes it primary.
	pub fn distance(mut self, name: impl Into<String>, config: toml::Value) -> Self {
		let name = name.into();
		self.distance_implementations.insert(name.clone(), config);
		self.distance_primary = name;
		self
	}

	pub fn build(self) -> Config {
		Config {
			service: ServiceConfig {
				id: self.service_id,
				execution_mode: self.execution_mode,
			},
			storage: StorageConfig {
				primary: self.storage_primary,
				implementations: self.storage_implementations,
			},
			distance: DistanceConfig {
				primary: self.distance_primary,
				implementations: self.distance_implementations,
			},
			api: None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_use_in_process_backends() {
		let config = ConfigBuilder::new().build();
		assert_eq!(config.storage.primary, "memory");
		assert_eq!(config.distance.primary, "fixed");
		assert!(config.storage.implementations.contains_key("memory"));
		assert_eq!(config.execution_mode(), ExecutionMode::Normal);
	}

	#[test]
	fn test_added_distance_becomes_primary() {
		let mut table = toml::Table::new();
		table.insert("meters".into(), toml::Value::Integer(500));
		let config = ConfigBuilder::new()
			.distance("fixed_500", toml::Value::Table(table))
			.execution_mode(ExecutionMode::IntegrationTest)
			.build();

		assert_eq!(config.distance.primary, "fixed_500");
		assert_eq!(config.distance.implementations.len(), 2);
		assert!(config.execution_mode().is_integration_test());
	}
}
