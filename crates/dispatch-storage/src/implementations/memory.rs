//! In-memory order store.
//!
//! Orders live in a `BTreeMap` keyed by id behind a single `RwLock`. The
//! conditional update reads and writes the status under one write guard, so
//! it is atomic with respect to every other store call in the process.

use crate::{OrderStoreInterface, StorageError};
use async_trait::async_trait;
use chrono::Utc;
use dispatch_types::{ConfigSchema, NewOrder, Order, OrderStatus, Schema, ValidationError};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct MemoryState {
	orders: BTreeMap<u64, Order>,
	last_id: u64,
}

/// In-memory storage implementation.
///
/// Ids are assigned sequentially from 1. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStorage {
	state: RwLock<MemoryState>,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl OrderStoreInterface for MemoryStorage {
	async fn create(&self, order: &NewOrder) -> Result<Order, StorageError> {
		let mut state = self.state.write().await;
		state.last_id += 1;
		let now = Utc::now();
		let stored = Order {
			id: state.last_id,
			distance: order.distance,
			status: order.status,
			created_at: now,
			updated_at: now,
		};
		state.orders.insert(stored.id, stored.clone());
		Ok(stored)
	}

	async fn update_status_if_unassigned(&self, id: u64) -> Result<(), StorageError> {
		let mut state = self.state.write().await;
		match state.orders.get_mut(&id) {
			Some(order) if order.status == OrderStatus::Unassigned => {
				order.status = OrderStatus::Taken;
				order.updated_at = Utc::now();
				Ok(())
			},
			_ => Err(StorageError::NotApplied),
		}
	}

	async fn find_by_id(&self, id: u64) -> Result<Order, StorageError> {
		let state = self.state.read().await;
		state.orders.get(&id).cloned().ok_or(StorageError::NotFound)
	}

	async fn find_range(&self, limit: u64, offset: u64) -> Result<Vec<Order>, StorageError> {
		let to_usize = |n: u64| usize::try_from(n).unwrap_or(usize::MAX);
		let state = self.state.read().await;
		Ok(state
			.orders
			.values()
			.skip(to_usize(offset))
			.take(to_usize(limit))
			.cloned()
			.collect())
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryStorageSchema)
	}
}

/// Configuration schema for MemoryStorage. The table takes no keys.
pub struct MemoryStorageSchema;

impl ConfigSchema for MemoryStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::default().validate(config)
	}
}

/// Factory function to create a memory storage backend from configuration.
pub fn create_storage(
	config: &toml::Value,
) -> Result<Box<dyn OrderStoreInterface>, StorageError> {
	MemoryStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(format!("Invalid configuration: {}", e)))?;
	Ok(Box::new(MemoryStorage::new()))
}

/// Registry for the memory storage implementation.
pub struct Registry;

impl dispatch_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = crate::StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl crate::StorageRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;

	#[tokio::test]
	async fn test_create_assigns_sequential_ids() {
		let storage = MemoryStorage::new();
		let first = storage.create(&NewOrder::unassigned(10)).await.unwrap();
		let second = storage.create(&NewOrder::unassigned(20)).await.unwrap();

		assert_eq!(first.id, 1);
		assert_eq!(second.id, 2);
		assert_eq!(second.distance, 20);
		assert_eq!(second.status, OrderStatus::Unassigned);
		assert_eq!(first.created_at, first.updated_at);
	}

	#[tokio::test]
	async fn test_conditional_update_applies_once() {
		let storage = MemoryStorage::new();
		let order = storage.create(&NewOrder::unassigned(10)).await.unwrap();

		storage.update_status_if_unassigned(order.id).await.unwrap();
		assert!(storage.find_by_id(order.id).await.unwrap().is_taken());

		let again = storage.update_status_if_unassigned(order.id).await;
		assert!(matches!(again, Err(StorageError::NotApplied)));
	}

	#[tokio::test]
	async fn test_conditional_update_on_missing_id() {
		let storage = MemoryStorage::new();
		let result = storage.update_status_if_unassigned(99).await;
		assert!(matches!(result, Err(StorageError::NotApplied)));
	}

	#[tokio::test]
	async fn test_find_by_id_not_found() {
		let storage = MemoryStorage::new();
		assert!(matches!(
			storage.find_by_id(1).await,
			Err(StorageError::NotFound)
		));
	}

	#[tokio::test]
	async fn test_find_range_windows() {
		let storage = MemoryStorage::new();
		for distance in 1..=5 {
			storage.create(&NewOrder::unassigned(distance)).await.unwrap();
		}

		let ids = |orders: Vec<Order>| orders.into_iter().map(|o| o.id).collect::<Vec<_>>();
		assert_eq!(ids(storage.find_range(2, 0).await.unwrap()), vec![1, 2]);
		assert_eq!(ids(storage.find_range(2, 2).await.unwrap()), vec![3, 4]);
		assert_eq!(ids(storage.find_range(2, 4).await.unwrap()), vec![5]);
		assert!(storage.find_range(2, 6).await.unwrap().is_empty());
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn test_concurrent_updates_single_winner() {
		let storage = Arc::new(MemoryStorage::new());
		let order = storage.create(&NewOrder::unassigned(10)).await.unwrap();

		let attempts = (0..16).map(|_| {
			let storage = Arc::clone(&storage);
			tokio::spawn(async move { storage.update_status_if_unassigned(order.id).await })
		});
		let results = futures::future::join_all(attempts).await;

		let winners = results
			.into_iter()
			.filter(|r| matches!(r, Ok(Ok(()))))
			.count();
		assert_eq!(winners, 1);
	}

	#[test]
	fn test_factory_rejects_non_table() {
		assert!(create_storage(&toml::Value::Integer(1)).is_err());
		assert!(create_storage(&toml::Value::Table(toml::Table::new())).is_ok());
	}
}
