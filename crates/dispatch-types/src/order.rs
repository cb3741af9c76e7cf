//! Order types for the dispatch service.
//!
//! An order moves through exactly one transition in its lifetime:
//! `UNASSIGNED -> TAKEN`. The identifier and timestamps are owned by the
//! store; the distance is fixed when the order is placed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A persisted delivery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
	/// Identifier assigned by the store on creation.
	pub id: u64,
	/// Travel distance in meters, resolved once at placement.
	pub distance: u64,
	/// Current claim status.
	pub status: OrderStatus,
	/// Timestamp when the store inserted the order.
	pub created_at: DateTime<Utc>,
	/// Timestamp of the last store write to the order.
	pub updated_at: DateTime<Utc>,
}

impl Order {
	/// Returns true once the order has been claimed.
	pub fn is_taken(&self) -> bool {
		self.status == OrderStatus::Taken
	}
}

/// An order that has not been persisted yet.
///
/// This is what the lifecycle engine hands to the store. It carries no
/// identifier or timestamps, so only the store can produce an [`Order`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
	pub distance: u64,
	pub status: OrderStatus,
}

impl NewOrder {
	/// Builds a fresh, unclaimed order for the given distance.
	pub fn unassigned(distance: u64) -> Self {
		Self {
			distance,
			status: OrderStatus::Unassigned,
		}
	}
}

/// Claim status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
	/// Placed and waiting for a worker.
	Unassigned,
	/// Claimed by a worker. Terminal.
	Taken,
}

impl OrderStatus {
	/// Returns the persisted representation of the status.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Unassigned => "UNASSIGNED",
			OrderStatus::Taken => "TAKEN",
		}
	}

	/// Returns whether `next` is a legal successor of this status.
	pub fn can_transition_to(&self, next: OrderStatus) -> bool {
		matches!((self, next), (OrderStatus::Unassigned, OrderStatus::Taken))
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when a stored status string is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
	type Err = UnknownStatus;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"UNASSIGNED" => Ok(Self::Unassigned),
			"TAKEN" => Ok(Self::Taken),
			other => Err(UnknownStatus(other.to_string())),
		}
	}
}

/// Result marker of a successful claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TakeOutcome {
	Success,
}

impl TakeOutcome {
	pub fn as_str(&self) -> &'static str {
		match self {
			TakeOutcome::Success => "SUCCESS",
		}
	}
}

impl fmt::Display for TakeOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
