//! Core of the order dispatch service.
//!
//! This crate holds the order lifecycle engine and the builder that wires it
//! from configuration. The engine validates coordinates, resolves distances,
//! persists orders and arbitrates claims through the store's conditional
//! update.

pub mod builder;
pub mod engine;
pub mod state;

pub use builder::{BuilderError, DispatchBuilder, DispatchFactories};
pub use engine::{EngineError, ErrorKind, OrderEngine};
