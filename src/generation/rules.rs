//! Business rules for the generation domain
//!
//! Per-service smoke test overrides live in a closed table: [`rule_for`] is the
//! only place a service is mapped to an [`OverrideRule`].

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::core::error::{Error, Result};
use crate::generation::suite::{SmokeTestCase, SmokeTestSuite};

/// A transformation applied to a service's smoke test suite before synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideRule {
    /// Replace every case with nothing
    DropAll,
    /// Remove every case for the named operation, keeping the rest in order
    FilterOperation(&'static str),
    /// Group cases by operation, drop `remove`, make sure `ensure` has a case,
    /// and rebuild the list ordered by operation name
    CoalesceIdentity {
        remove: &'static str,
        ensure: &'static str,
    },
}

/// Looks up the override rule for a service
pub fn rule_for(service_id: &str) -> Option<OverrideRule> {
    match service_id {
        "sts" => Some(OverrideRule::CoalesceIdentity {
            remove: "GetSessionToken",
            ensure: "GetCallerIdentity",
        }),
        "waf" | "wafregional" => Some(OverrideRule::FilterOperation("CreateSqlInjectionMatchSet")),
        "iotdataplane" | "opsworks" | "cloudsearch" => Some(OverrideRule::DropAll),
        _ => None,
    }
}

impl OverrideRule {
    /// Applies the rule, returning the transformed suite
    pub fn apply(self, mut suite: SmokeTestSuite) -> Result<SmokeTestSuite> {
        suite.test_cases = match self {
            OverrideRule::DropAll => Vec::new(),
            OverrideRule::FilterOperation(name) => suite
                .test_cases
                .into_iter()
                .filter(|case| case.operation_name != name)
                .collect(),
            OverrideRule::CoalesceIdentity { remove, ensure } => {
                coalesce(suite.test_cases, remove, ensure)
            }
        };
        Ok(suite)
    }
}

fn coalesce(cases: Vec<SmokeTestCase>, remove: &str, ensure: &str) -> Vec<SmokeTestCase> {
    let mut groups: BTreeMap<String, Vec<SmokeTestCase>> = BTreeMap::new();
    for case in cases {
        groups
            .entry(case.operation_name.clone())
            .or_default()
            .push(case);
    }

    groups.remove(remove);
    groups.entry(ensure.to_string()).or_insert_with(|| {
        vec![SmokeTestCase::new(
            ensure,
            JsonValue::Object(serde_json::Map::new()),
            false,
        )]
    });

    groups.into_values().flatten().collect()
}

/// Applies the override registered for `service_id`, if any
pub fn apply(service_id: &str, suite: SmokeTestSuite) -> Result<SmokeTestSuite> {
    match rule_for(service_id) {
        Some(rule) => {
            debug!(service = %service_id, ?rule, "applying smoke test override");
            rule.apply(suite)
        }
        None => Ok(suite),
    }
}

static SERVICE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]*$").unwrap());

/// Validates a service id, which doubles as the Go package name
pub fn validate_service_id(service_id: &str) -> Result<()> {
    if service_id.is_empty() {
        return Err(Error::config("Service id cannot be empty"));
    }

    if !SERVICE_ID_RE.is_match(service_id) {
        return Err(Error::config(format!(
            "Service id {service_id:?} must be lower case letters and digits, starting with a letter"
        )));
    }

    Ok(())
}
