//! Execution mode of the service process.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selects between live distance lookups and the deterministic test path.
///
/// In `integration-test` mode distance resolution returns a fixed constant
/// without contacting the mapping provider, which keeps end-to-end suites
/// network independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
	#[default]
	Normal,
	IntegrationTest,
}

impl ExecutionMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			ExecutionMode::Normal => "normal",
			ExecutionMode::IntegrationTest => "integration-test",
		}
	}

	pub fn is_integration_test(&self) -> bool {
		matches!(self, ExecutionMode::IntegrationTest)
	}
}

impl fmt::Display for ExecutionMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
