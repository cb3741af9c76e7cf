//! Common types module for the order dispatch service.
//!
//! This module defines the core data types shared by every dispatch crate:
//! the order model, coordinate validation, HTTP API shapes and the
//! configuration validation helpers used by pluggable implementations.

/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// Coordinate pair parsing and validation.
pub mod coordinates;
/// Process execution mode.
pub mod execution;
/// Order model and lifecycle status.
pub mod order;
/// Base trait for self-registering implementations.
pub mod registry;
/// Redacting wrapper for credentials.
pub mod secret_string;
/// Configuration validation types for pluggable implementations.
pub mod validation;

// Re-export all types for convenient access
pub use api::*;
pub use coordinates::{is_valid_pair, validate_pair, CoordinateError, Coordinates};
pub use execution::ExecutionMode;
pub use order::*;
pub use registry::ImplementationRegistry;
pub use secret_string::SecretString;
pub use validation::*;
