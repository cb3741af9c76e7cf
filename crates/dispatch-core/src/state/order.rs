//! Order claim state machine.
//!
//! The only transition an order can make is UNASSIGNED -> TAKEN. The read
//! before the write is an optimisation; the store's conditional update
//! decides the winner.

use dispatch_storage::{StorageError, StorageService};
use dispatch_types::{NewOrder, Order, OrderStatus};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during order state management.
#[derive(Debug, Error)]
pub enum OrderStateError {
	#[error("Order {0} not found")]
	OrderNotFound(u64),
	/// The order was already TAKEN, either at read time or when the
	/// conditional update ran.
	#[error("Order {0} already taken")]
	AlreadyTaken(u64),
	#[error(transparent)]
	Storage(StorageError),
}

/// Manages order persistence and the claim transition.
pub struct OrderStateMachine {
	storage: Arc<StorageService>,
}

impl OrderStateMachine {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Persists a fresh UNASSIGNED order.
	pub async fn store_order(&self, distance: u64) -> Result<Order, OrderStateError> {
		self.storage
			.create(&NewOrder::unassigned(distance))
			.await
			.map_err(OrderStateError::Storage)
	}

	pub async fn get_order(&self, id: u64) -> Result<Order, OrderStateError> {
		self.storage.find_by_id(id).await.map_err(|e| match e {
			StorageError::NotFound => OrderStateError::OrderNotFound(id),
			other => OrderStateError::Storage(other),
		})
	}

	/// Moves an order from UNASSIGNED to TAKEN.
	pub async fn transition_to_taken(&self, id: u64) -> Result<(), OrderStateError> {
		let order = self.get_order(id).await?;
		if !order.status.can_transition_to(OrderStatus::Taken) {
			return Err(OrderStateError::AlreadyTaken(id));
		}

		match self.storage.update_status_if_unassigned(id).await {
			Ok(()) => Ok(()),
			Err(StorageError::NotApplied) => Err(OrderStateError::AlreadyTaken(id)),
			Err(e) => Err(OrderStateError::Storage(e)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use dispatch_storage::implementations::memory::MemoryStorage;

	fn machine() -> OrderStateMachine {
		OrderStateMachine::new(Arc::new(StorageService::new(Box::new(MemoryStorage::new()))))
	}

	#[tokio::test]
	async fn test_store_then_take() {
		let machine = machine();
		let order = machine.store_order(75).await.unwrap();
		assert_eq!(order.status, OrderStatus::Unassigned);

		machine.transition_to_taken(order.id).await.unwrap();
		assert!(machine.get_order(order.id).await.unwrap().is_taken());
	}

	#[tokio::test]
	async fn test_second_take_is_rejected() {
		let machine = machine();
		let order = machine.store_order(75).await.unwrap();
		machine.transition_to_taken(order.id).await.unwrap();

		let err = machine.transition_to_taken(order.id).await.unwrap_err();
		assert!(matches!(err, OrderStateError::AlreadyTaken(id) if id == order.id));
	}

	#[tokio::test]
	async fn test_missing_order() {
		let err = machine().transition_to_taken(5).await.unwrap_err();
		assert!(matches!(err, OrderStateError::OrderNotFound(5)));
	}
}
