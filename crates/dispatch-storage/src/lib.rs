//! Storage module for the order dispatch service.
//!
//! This module defines the order store contract and the service wrapper the
//! engine talks to. Backends are pluggable: an in-memory store for tests and
//! single-process runs, and a MySQL store for shared deployments.
//!
//! The store owns the only claim arbiter in the system:
//! [`OrderStoreInterface::update_status_if_unassigned`] must move an order
//! from UNASSIGNED to TAKEN atomically and report when it did not.

use async_trait::async_trait;
use dispatch_types::{ConfigSchema, ImplementationRegistry, NewOrder, Order};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod memory;
	pub mod mysql;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// The requested order does not exist.
	#[error("Not found")]
	NotFound,
	/// A conditional update matched no row.
	#[error("Conditional update not applied")]
	NotApplied,
	/// A stored value could not be decoded.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for order store backends.
#[async_trait]
pub trait OrderStoreInterface: Send + Sync {
	/// Persists a new order and returns it with its assigned id and
	/// timestamps.
	async fn create(&self, order: &NewOrder) -> Result<Order, StorageError>;

	/// Atomically sets the order's status to TAKEN if and only if it is
	/// currently UNASSIGNED.
	///
	/// Returns [`StorageError::NotApplied`] when the predicate did not hold,
	/// which includes the case where the id does not exist.
	async fn update_status_if_unassigned(&self, id: u64) -> Result<(), StorageError>;

	/// Fetches one order by id.
	async fn find_by_id(&self, id: u64) -> Result<Order, StorageError>;

	/// Returns up to `limit` orders after skipping `offset`, in id order.
	async fn find_range(&self, limit: u64, offset: u64) -> Result<Vec<Order>, StorageError>;

	/// Prepares the backend before first use.
	async fn initialize(&self) -> Result<(), StorageError> {
		Ok(())
	}

	/// Returns the configuration schema for validation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;
}

/// Type alias for storage factory functions.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn OrderStoreInterface>, StorageError>;

/// Registry trait for storage implementations.
pub trait StorageRegistry: ImplementationRegistry<Factory = StorageFactory> {}

/// Get all registered storage implementations.
///
/// Returns a vector of (name, factory) tuples used by the service builder.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::{memory, mysql};

	vec![
		(memory::Registry::NAME, memory::Registry::factory()),
		(mysql::Registry::NAME, mysql::Registry::factory()),
	]
}

/// Order store service used by the engine.
///
/// Wraps the configured backend and logs at the storage boundary.
pub struct StorageService {
	backend: Box<dyn OrderStoreInterface>,
}

impl StorageService {
	pub fn new(backend: Box<dyn OrderStoreInterface>) -> Self {
		Self { backend }
	}

	pub async fn initialize(&self) -> Result<(), StorageError> {
		self.backend.initialize().await
	}

	pub async fn create(&self, order: &NewOrder) -> Result<Order, StorageError> {
		let order = self.backend.create(order).await?;
		tracing::debug!(order_id = order.id, distance = order.distance, "Order stored");
		Ok(order)
	}

	/// Compare-and-swap claim; see
	/// [`OrderStoreInterface::update_status_if_unassigned`].
	pub async fn update_status_if_unassigned(&self, id: u64) -> Result<(), StorageError> {
		self.backend.update_status_if_unassigned(id).await
	}

	pub async fn find_by_id(&self, id: u64) -> Result<Order, StorageError> {
		self.backend.find_by_id(id).await
	}

	pub async fn find_range(&self, limit: u64, offset: u64) -> Result<Vec<Order>, StorageError> {
		self.backend.find_range(limit, offset).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use implementations::memory::MemoryStorage;

	#[test]
	fn test_registered_implementations() {
		let names: Vec<_> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["memory", "mysql"]);
	}

	#[tokio::test]
	async fn test_service_delegates_to_backend() {
		let service = StorageService::new(Box::new(MemoryStorage::new()));
		service.initialize().await.unwrap();

		let order = service.create(&NewOrder::unassigned(120)).await.unwrap();
		assert_eq!(service.find_by_id(order.id).await.unwrap(), order);

		service.update_status_if_unassigned(order.id).await.unwrap();
		assert!(service.find_by_id(order.id).await.unwrap().is_taken());
		assert_eq!(service.find_range(10, 0).await.unwrap().len(), 1);
	}
}
