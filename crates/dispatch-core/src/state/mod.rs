//! Order state management.
//!
//! Wraps the order store with the claim transition so the engine never
//! writes a status directly.

pub mod order;

pub use order::{OrderStateError, OrderStateMachine};
