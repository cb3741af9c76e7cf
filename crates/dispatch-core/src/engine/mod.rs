//! Order lifecycle engine.
//!
//! [`OrderEngine`] implements the three operations exposed over HTTP: placing
//! an order, claiming it, and listing orders a page at a time. It holds no
//! lock of its own; concurrent claims are arbitrated by the store.

use crate::state::{OrderStateError, OrderStateMachine};
use dispatch_distance::{DistanceError, DistanceService};
use dispatch_storage::{StorageError, StorageService};
use dispatch_types::{validate_pair, CoordinateError, Order, TakeOutcome};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

/// Errors returned by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
	#[error(transparent)]
	InvalidCoordinates(#[from] CoordinateError),
	#[error("Order {0} already taken")]
	OrderAlreadyTaken(u64),
	#[error("Order {0} not found")]
	OrderNotFound(u64),
	#[error("Invalid pagination: page {page}, limit {limit}")]
	InvalidPagination { page: i64, limit: i64 },
	#[error("Distance error: {0}")]
	Distance(#[from] DistanceError),
	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),
}

/// Coarse classification used by the transport to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// The caller sent something unacceptable.
	Validation,
	/// The order is in a state that forbids the request.
	Conflict,
	NotFound,
	/// A dependency (distance provider or store) failed.
	Upstream,
}

impl EngineError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			EngineError::InvalidCoordinates(_) | EngineError::InvalidPagination { .. } => {
				ErrorKind::Validation
			},
			EngineError::OrderAlreadyTaken(_) => ErrorKind::Conflict,
			EngineError::OrderNotFound(_) => ErrorKind::NotFound,
			EngineError::Distance(_) | EngineError::Storage(_) => ErrorKind::Upstream,
		}
	}

	/// Machine-readable error code.
	pub fn code(&self) -> &'static str {
		match self {
			EngineError::InvalidCoordinates(e) => e.code(),
			EngineError::OrderAlreadyTaken(_) => "order_already_taken",
			EngineError::OrderNotFound(_) => "order_not_found",
			EngineError::InvalidPagination { .. } => "invalid_pagination",
			EngineError::Distance(_) => "distance_unavailable",
			EngineError::Storage(_) => "storage_failure",
		}
	}
}

impl From<OrderStateError> for EngineError {
	fn from(err: OrderStateError) -> Self {
		match err {
			OrderStateError::OrderNotFound(id) => EngineError::OrderNotFound(id),
			OrderStateError::AlreadyTaken(id) => EngineError::OrderAlreadyTaken(id),
			OrderStateError::Storage(e) => EngineError::Storage(e),
		}
	}
}

/// Coordinates order placement, claiming and listing.
#[derive(Clone)]
pub struct OrderEngine {
	storage: Arc<StorageService>,
	distance: Arc<DistanceService>,
	state_machine: Arc<OrderStateMachine>,
}

impl OrderEngine {
	pub fn new(storage: Arc<StorageService>, distance: Arc<DistanceService>) -> Self {
		let state_machine = Arc::new(OrderStateMachine::new(Arc::clone(&storage)));
		Self {
			storage,
			distance,
			state_machine,
		}
	}

	/// Validates both coordinate pairs, resolves the distance and persists a
	/// new UNASSIGNED order.
	///
	/// Nothing is written when validation or distance resolution fails.
	#[instrument(skip_all)]
	pub async fn place_order<S: AsRef<str>>(
		&self,
		origin: &[S],
		destination: &[S],
	) -> Result<Order, EngineError> {
		let origin = validate_pair(origin)?;
		let destination = validate_pair(destination)?;

		let distance = self
			.distance
			.get_distance(origin.as_location(), destination.as_location())
			.await
			.inspect_err(|e| {
				tracing::error!(
					origin = origin.as_location(),
					destination = destination.as_location(),
					error = %e,
					"Failed to resolve distance"
				)
			})?;

		let order = self.state_machine.store_order(distance).await?;
		tracing::info!(order_id = order.id, distance = order.distance, "Order placed");
		Ok(order)
	}

	/// Claims an UNASSIGNED order.
	///
	/// Among concurrent calls for the same id at most one returns
	/// [`TakeOutcome::Success`]; the rest get
	/// [`EngineError::OrderAlreadyTaken`].
	#[instrument(skip(self))]
	pub async fn take_order(&self, order_id: u64) -> Result<TakeOutcome, EngineError> {
		match self.state_machine.transition_to_taken(order_id).await {
			Ok(()) => {
				tracing::info!(order_id, "Order taken");
				Ok(TakeOutcome::Success)
			},
			Err(OrderStateError::AlreadyTaken(id)) => {
				tracing::warn!(order_id = id, "Order already taken");
				Err(EngineError::OrderAlreadyTaken(id))
			},
			Err(e) => Err(e.into()),
		}
	}

	/// Returns page `page` (1-based) of at most `limit` orders in store order.
	#[instrument(skip(self))]
	pub async fn list_orders(&self, page: i64, limit: i64) -> Result<Vec<Order>, EngineError> {
		let invalid = || EngineError::InvalidPagination { page, limit };
		if page < 1 || limit < 1 {
			return Err(invalid());
		}
		let page_size = limit.unsigned_abs();
		let offset = (page.unsigned_abs() - 1)
			.checked_mul(page_size)
			.ok_or_else(invalid)?;

		Ok(self.storage.find_range(page_size, offset).await?)
	}
}
