//! API types for the dispatch HTTP API.
//!
//! This module defines the request and response bodies of the order
//! endpoints and the structured error type the handlers return.

use crate::{Order, OrderStatus, TakeOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
	/// `[latitude, longitude]` of the pickup point.
	pub origin: Vec<String>,
	/// `[latitude, longitude]` of the drop-off point.
	pub destination: Vec<String>,
}

/// Body of `PATCH /orders/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeOrderRequest {
	/// Requested status; only `"TAKEN"` is accepted.
	pub status: String,
}

/// Query string of `GET /orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListOrdersQuery {
	pub page: i64,
	pub limit: i64,
}

/// Public view of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
	pub id: u64,
	pub distance: u64,
	pub status: OrderStatus,
}

impl From<Order> for OrderResponse {
	fn from(order: Order) -> Self {
		Self {
			id: order.id,
			distance: order.distance,
			status: order.status,
		}
	}
}

/// Response of a successful claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakeOrderResponse {
	pub status: TakeOutcome,
}

/// API error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Human-readable description
	pub error: String,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum APIError {
	/// Malformed request or invalid input (400)
	BadRequest { message: String },
	/// Referenced order does not exist (404)
	NotFound { message: String },
	/// Business conflict, e.g. the order was already claimed (409)
	Conflict { message: String },
	/// Upstream or unexpected failure (500)
	InternalServerError { message: String },
}

impl APIError {
	pub fn bad_request(message: impl Into<String>) -> Self {
		APIError::BadRequest {
			message: message.into(),
		}
	}

	pub fn not_found(message: impl Into<String>) -> Self {
		APIError::NotFound {
			message: message.into(),
		}
	}

	pub fn conflict(message: impl Into<String>) -> Self {
		APIError::Conflict {
			message: message.into(),
		}
	}

	pub fn internal(message: impl Into<String>) -> Self {
		APIError::InternalServerError {
			message: message.into(),
		}
	}

	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			APIError::BadRequest { .. } => 400,
			APIError::NotFound { .. } => 404,
			APIError::Conflict { .. } => 409,
			APIError::InternalServerError { .. } => 500,
		}
	}

	fn message(&self) -> &str {
		match self {
			APIError::BadRequest { message }
			| APIError::NotFound { message }
			| APIError::Conflict { message }
			| APIError::InternalServerError { message } => message,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		ErrorResponse {
			error: self.message().to_string(),
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::BadRequest { message } => write!(f, "Bad Request: {}", message),
			APIError::NotFound { message } => write!(f, "Not Found: {}", message),
			APIError::Conflict { message } => write!(f, "Conflict: {}", message),
			APIError::InternalServerError { message } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

/// Header echoing the numeric status code on every response.
pub const STATUS_ECHO_HEADER: &str = "http";

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for APIError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

		(status, Json(self.to_error_response())).into_response()
	}
}
