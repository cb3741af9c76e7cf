//! Order endpoint handlers.
//!
//! Request bodies and query strings that fail to deserialize are answered
//! with 400 `invalid request params`. Engine errors are mapped by kind;
//! upstream failures are logged and hidden behind `internal server error`.

use crate::server::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use dispatch_core::{EngineError, ErrorKind};
use dispatch_types::{
	APIError, ListOrdersQuery, OrderResponse, OrderStatus, PlaceOrderRequest, TakeOrderRequest,
	TakeOrderResponse,
};

const INVALID_PARAMS: &str = "invalid request params";
const ORDER_TAKEN: &str = "order taken, you are too late";
const ORDER_NOT_FOUND: &str = "order not found";
const INTERNAL_ERROR: &str = "internal server error";

fn invalid_params(rejection: impl std::fmt::Display) -> APIError {
	tracing::debug!(rejection = %rejection, "Rejected request");
	APIError::bad_request(INVALID_PARAMS)
}

fn api_error(err: EngineError) -> APIError {
	match err.kind() {
		ErrorKind::Validation => match err {
			EngineError::InvalidCoordinates(e) => APIError::bad_request(e.to_string()),
			_ => APIError::bad_request(INVALID_PARAMS),
		},
		ErrorKind::Conflict => APIError::conflict(ORDER_TAKEN),
		ErrorKind::NotFound => APIError::not_found(ORDER_NOT_FOUND),
		ErrorKind::Upstream => {
			tracing::error!(code = err.code(), error = %err, "Request failed");
			APIError::internal(INTERNAL_ERROR)
		},
	}
}

/// Handles POST /orders.
pub async fn place_order(
	State(state): State<AppState>,
	payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, APIError> {
	let Json(request) = payload.map_err(invalid_params)?;

	let order = state
		.engine
		.place_order(&request.origin, &request.destination)
		.await
		.map_err(api_error)?;

	Ok(Json(order.into()))
}

/// Handles PATCH /orders/{id}. The body must be `{"status":"TAKEN"}`.
pub async fn take_order(
	id: Result<Path<u64>, PathRejection>,
	State(state): State<AppState>,
	payload: Result<Json<TakeOrderRequest>, JsonRejection>,
) -> Result<Json<TakeOrderResponse>, APIError> {
	let Path(id) = id.map_err(invalid_params)?;
	let Json(request) = payload.map_err(invalid_params)?;

	if request.status.parse::<OrderStatus>() != Ok(OrderStatus::Taken) {
		return Err(invalid_params(format_args!(
			"unsupported status {:?}",
			request.status
		)));
	}

	let status = state.engine.take_order(id).await.map_err(api_error)?;
	Ok(Json(TakeOrderResponse { status }))
}

/// Handles GET /orders?page=&limit=.
pub async fn list_orders(
	State(state): State<AppState>,
	query: Result<Query<ListOrdersQuery>, QueryRejection>,
) -> Result<Json<Vec<OrderResponse>>, APIError> {
	let Query(ListOrdersQuery { page, limit }) = query.map_err(invalid_params)?;
	if page < 1 || limit < 1 {
		return Err(invalid_params(format_args!("page {} limit {}", page, limit)));
	}

	let orders = state
		.engine
		.list_orders(page, limit)
		.await
		.map_err(api_error)?;

	Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}
