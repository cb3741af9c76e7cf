//! HTTP server for the order dispatch API.
//!
//! Routes:
//! - `POST /orders` places an order
//! - `PATCH /orders/{id}` claims an order
//! - `GET /orders?page=&limit=` lists orders

use crate::apis::order;
use axum::{
	extract::DefaultBodyLimit,
	http::{HeaderName, HeaderValue},
	middleware,
	response::Response,
	routing::{patch, post},
	Router,
};
use dispatch_config::ApiConfig;
use dispatch_core::OrderEngine;
use dispatch_types::STATUS_ECHO_HEADER;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	pub engine: Arc<OrderEngine>,
}

/// Builds the API router with its middleware stack.
pub fn router(state: AppState, api_config: &ApiConfig) -> Router {
	Router::new()
		.route("/orders", post(order::place_order).get(order::list_orders))
		.route("/orders/{id}", patch(order::take_order))
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(CorsLayer::permissive())
				.layer(TimeoutLayer::new(Duration::from_secs(
					api_config.timeout_seconds,
				)))
				.layer(DefaultBodyLimit::max(api_config.max_request_size)),
		)
		// Outermost, so timeouts and fallbacks get the header too
		.layer(middleware::map_response(echo_status))
		.with_state(state)
}

/// Copies the numeric status code into the status echo header.
async fn echo_status(mut response: Response) -> Response {
	let value = HeaderValue::from_str(response.status().as_str());
	if let Ok(value) = value {
		response
			.headers_mut()
			.insert(HeaderName::from_static(STATUS_ECHO_HEADER), value);
	}
	response
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn start_server(
	api_config: ApiConfig,
	engine: Arc<OrderEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = router(AppState { engine }, &api_config);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Order API server starting on {}", bind_address);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %e, "Failed to listen for shutdown signal");
		std::future::pending::<()>().await;
	}
	tracing::info!("Shutdown signal received");
}
