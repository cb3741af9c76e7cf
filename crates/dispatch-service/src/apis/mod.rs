//! HTTP API handlers.

pub mod order;
