//! Smoke test suite sidecar

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::core::error::{Error, Result};

/// The only smoke test format version this generator understands
pub const SUPPORTED_VERSION: i64 = 1;

/// Test suite for a service's integration smoke tests
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmokeTestSuite {
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub default_region: String,
    #[serde(default)]
    pub test_cases: Vec<SmokeTestCase>,
}

/// A single declarative integration scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmokeTestCase {
    #[serde(rename = "operationName")]
    pub operation_name: String,
    #[serde(default = "empty_input")]
    pub input: JsonValue,
    #[serde(rename = "errorExpectedFromService", default)]
    pub expect_error: bool,
}

fn empty_input() -> JsonValue {
    JsonValue::Object(serde_json::Map::new())
}

impl SmokeTestCase {
    pub fn new(operation_name: impl Into<String>, input: JsonValue, expect_error: bool) -> Self {
        Self {
            operation_name: operation_name.into(),
            input,
            expect_error,
        }
    }
}

/// Decodes a smoke test sidecar and checks its format version.
///
/// Overrides are not applied here; see [`crate::generation::rules::apply`].
pub fn load(raw: &str, source_name: &str) -> Result<SmokeTestSuite> {
    let suite: SmokeTestSuite =
        serde_json::from_str(raw).map_err(|e| Error::decode(source_name, e))?;

    if suite.version != SUPPORTED_VERSION {
        return Err(Error::VersionMismatch {
            found: suite.version,
        });
    }

    Ok(suite)
}
