//! Google Maps Distance Matrix provider.
//!
//! Issues one `GET /maps/api/distancematrix/json` per lookup with a single
//! origin and a single destination and reads the first element of the first
//! row.

use crate::{DistanceError, DistanceInterface};
use async_trait::async_trait;
use dispatch_types::{ConfigSchema, Field, FieldType, Schema, SecretString, ValidationError};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";
const DISTANCE_MATRIX_PATH: &str = "/maps/api/distancematrix/json";
const NO_DISTANCE: &str = "cannot get distance from coordinates";

/// Settings of the `[distance.implementations.google_maps]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleMapsConfig {
	pub api_key: SecretString,
	#[serde(default = "default_timeout")]
	pub timeout_seconds: u64,
	/// Overrides the API host, e.g. for a local stub.
	#[serde(default = "default_base_url")]
	pub base_url: String,
}

fn default_timeout() -> u64 {
	10
}

fn default_base_url() -> String {
	DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
	status: String,
	#[serde(default)]
	error_message: Option<String>,
	#[serde(default)]
	rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
	#[serde(default)]
	elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
	status: String,
	distance: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
	value: u64,
}

impl DistanceMatrixResponse {
	/// Meters of the first element, if both the request and the element
	/// succeeded.
	fn meters(&self) -> Result<u64, DistanceError> {
		if self.status != "OK" {
			tracing::warn!(
				status = %self.status,
				message = self.error_message.as_deref().unwrap_or_default(),
				"Distance Matrix request rejected"
			);
			return Err(DistanceError::Provider(NO_DISTANCE.to_string()));
		}

		let element = self
			.rows
			.first()
			.and_then(|row| row.elements.first())
			.ok_or_else(|| DistanceError::Provider(NO_DISTANCE.to_string()))?;

		match (&element.status[..], &element.distance) {
			("OK", Some(distance)) => Ok(distance.value),
			(status, _) => {
				tracing::debug!(status, "Distance Matrix element not OK");
				Err(DistanceError::Provider(NO_DISTANCE.to_string()))
			},
		}
	}
}

/// Distance provider backed by the Google Maps Distance Matrix API.
pub struct GoogleMapsDistance {
	client: reqwest::Client,
	api_key: SecretString,
	endpoint: String,
}

impl GoogleMapsDistance {
	pub fn new(config: &GoogleMapsConfig) -> Result<Self, DistanceError> {
		let client = reqwest::Client::builder()
			.timeout(Duration::from_secs(config.timeout_seconds))
			.build()
			.map_err(|e| DistanceError::Configuration(format!("HTTP client: {}", e)))?;

		Ok(Self {
			client,
			api_key: config.api_key.clone(),
			endpoint: format!(
				"{}{}",
				config.base_url.trim_end_matches('/'),
				DISTANCE_MATRIX_PATH
			),
		})
	}
}

#[async_trait]
impl DistanceInterface for GoogleMapsDistance {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(GoogleMapsSchema)
	}

	async fn get_distance(&self, origin: &str, destination: &str) -> Result<u64, DistanceError> {
		let response = self
			.client
			.get(&self.endpoint)
			.query(&[
				("origins", origin),
				("destinations", destination),
				("units", "metric"),
				("key", self.api_key.expose_secret()),
			])
			.send()
			.await
			.map_err(|e| DistanceError::Network(e.without_url().to_string()))?;

		if !response.status().is_success() {
			return Err(DistanceError::Network(format!(
				"Distance Matrix returned HTTP {}",
				response.status()
			)));
		}

		let body: DistanceMatrixResponse = response
			.json()
			.await
			.map_err(|e| DistanceError::Provider(format!("Invalid Distance Matrix response: {}", e)))?;

		body.meters()
	}
}

pub struct GoogleMapsSchema;

impl ConfigSchema for GoogleMapsSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new("api_key", FieldType::String)],
			vec![
				Field::new(
					"timeout_seconds",
					FieldType::Integer {
						min: Some(1),
						max: Some(120),
					},
				),
				Field::new("base_url", FieldType::String),
			],
		);
		schema.validate(config)?;

		if config
			.get("api_key")
			.and_then(|v| v.as_str())
			.is_some_and(|key| key.trim().is_empty())
		{
			return Err(ValidationError::InvalidValue {
				field: "api_key".to_string(),
				message: "cannot be empty".to_string(),
			});
		}
		Ok(())
	}
}

/// Factory function to create a Google Maps provider from configuration.
///
/// Configuration parameters:
/// - `api_key`: Distance Matrix API key (required)
/// - `timeout_seconds`: request timeout (default: 10)
/// - `base_url`: API host (default: https://maps.googleapis.com)
pub fn create_distance(
	config: &toml::Value,
) -> Result<Box<dyn DistanceInterface>, DistanceError> {
	GoogleMapsSchema
		.validate(config)
		.map_err(|e| DistanceError::Configuration(format!("Invalid configuration: {}", e)))?;

	let config: GoogleMapsConfig = config
		.clone()
		.try_into()
		.map_err(|e| DistanceError::Configuration(format!("Invalid google_maps config: {}", e)))?;

	Ok(Box::new(GoogleMapsDistance::new(&config)?))
}

/// Registry for the Google Maps provider.
pub struct Registry;

impl dispatch_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "google_maps";
	type Factory = crate::DistanceFactory;

	fn factory() -> Self::Factory {
		create_distance
	}
}

impl crate::DistanceRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use wiremock::matchers::{method, path, query_param};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn provider(server: &MockServer) -> GoogleMapsDistance {
		GoogleMapsDistance::new(&GoogleMapsConfig {
			api_key: "test-key".into(),
			timeout_seconds: 2,
			base_url: server.uri(),
		})
		.unwrap()
	}

	async fn respond_with(server: &MockServer, body: serde_json::Value) {
		Mock::given(method("GET"))
			.and(path(DISTANCE_MATRIX_PATH))
			.respond_with(ResponseTemplate::new(200).set_body_json(body))
			.mount(server)
			.await;
	}

	#[tokio::test]
	async fn test_ok_response() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path(DISTANCE_MATRIX_PATH))
			.and(query_param("origins", "22.300789,114.167815"))
			.and(query_param("destinations", "22.3,114.2"))
			.and(query_param("units", "metric"))
			.and(query_param("key", "test-key"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"status": "OK",
				"rows": [{"elements": [{
					"status": "OK",
					"distance": {"text": "4.4 km", "value": 4391},
					"duration": {"text": "12 mins", "value": 720}
				}]}]
			})))
			.mount(&server)
			.await;

		let distance = provider(&server)
			.get_distance("22.300789,114.167815", "22.3,114.2")
			.await
			.unwrap();
		assert_eq!(distance, 4391);
	}

	#[tokio::test]
	async fn test_element_failure() {
		let server = MockServer::start().await;
		respond_with(
			&server,
			json!({"status": "OK", "rows": [{"elements": [{"status": "ZERO_RESULTS"}]}]}),
		)
		.await;

		let err = provider(&server).get_distance("0,0", "1,1").await.unwrap_err();
		assert!(matches!(err, DistanceError::Provider(m) if m == NO_DISTANCE));
	}

	#[tokio::test]
	async fn test_top_level_failure() {
		let server = MockServer::start().await;
		respond_with(
			&server,
			json!({"status": "REQUEST_DENIED", "error_message": "bad key", "rows": []}),
		)
		.await;

		let err = provider(&server).get_distance("0,0", "1,1").await.unwrap_err();
		assert!(matches!(err, DistanceError::Provider(_)));
	}

	#[tokio::test]
	async fn test_http_error_is_network_failure() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(503))
			.mount(&server)
			.await;

		let err = provider(&server).get_distance("0,0", "1,1").await.unwrap_err();
		assert!(matches!(err, DistanceError::Network(_)));
	}

	#[test]
	fn test_schema_requires_key() {
		let err = GoogleMapsSchema
			.validate(&toml::Value::Table(toml::Table::new()))
			.unwrap_err();
		assert!(matches!(err, ValidationError::MissingField(f) if f == "api_key"));

		let blank: toml::Value = toml::from_str("api_key = \"  \"").unwrap();
		assert!(GoogleMapsSchema.validate(&blank).is_err());
	}
}
