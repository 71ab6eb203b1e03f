//! Pagination sidecar normalization
//!
//! The paginator sidecar is loosely typed: a token field may be missing, a single
//! string, or a list of strings. This module turns it into [`PaginationConfig`]
//! values and attaches them to the operations of an [`Api`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::core::error::{Error, Result};
use crate::generation::utils::{go_string_literal, json_kind};
use crate::model::Api;

/// Pagination settings for a single operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationConfig {
    pub input_tokens: Vec<String>,
    pub output_tokens: Vec<String>,
    /// Empty when the operation has no page size parameter
    pub limit_key: String,
    /// Empty when the response carries no "more results" flag
    pub more_results: String,
    pub stop_on_same_token: bool,
}

impl PaginationConfig {
    /// Input tokens as a Go `[]string` literal
    pub fn input_tokens_literal(&self) -> String {
        string_slice_literal(&self.input_tokens)
    }

    /// Output tokens as a Go `[]string` literal
    pub fn output_tokens_literal(&self) -> String {
        string_slice_literal(&self.output_tokens)
    }
}

fn string_slice_literal(tokens: &[String]) -> String {
    let items: Vec<String> = tokens.iter().map(|t| go_string_literal(t)).collect();
    format!("[]string{{{}}}", items.join(", "))
}

/// Services whose paginators stop when the service echoes the same token back
pub fn enable_stop_on_same_token(service_id: &str) -> bool {
    matches!(service_id, "cloudwatchlogs")
}

#[derive(Debug, Deserialize)]
struct RawPaginator {
    #[serde(default)]
    input_token: Option<JsonValue>,
    #[serde(default)]
    output_token: Option<JsonValue>,
    #[serde(default)]
    limit_key: Option<String>,
    #[serde(default)]
    more_results: Option<String>,
}

/// Decodes a paginator sidecar into configs keyed by operation name.
///
/// Accepts the `{"pagination": {...}}` layout as well as a bare map of
/// operation name to entry. Entries without both tokens are left out. The
/// returned configs have `stop_on_same_token` unset; [`attach`] fills it in.
pub fn decode(raw: &str, source_name: &str) -> Result<BTreeMap<String, PaginationConfig>> {
    let document: JsonValue =
        serde_json::from_str(raw).map_err(|e| Error::decode(source_name, e))?;

    let entries = match document {
        JsonValue::Object(mut top) => match top.remove("pagination") {
            Some(JsonValue::Object(entries)) => entries,
            Some(other) => {
                return Err(Error::decode(
                    source_name,
                    format!("\"pagination\" must be an object, found {}", json_kind(&other)),
                ));
            }
            None => top,
        },
        other => {
            return Err(Error::decode(
                source_name,
                format!("expected an object at the top level, found {}", json_kind(&other)),
            ));
        }
    };

    let mut configs = BTreeMap::new();
    for (name, entry) in entries {
        let raw: RawPaginator = serde_json::from_value(entry)
            .map_err(|e| Error::decode(source_name, format!("operation {name}: {e}")))?;

        // Present tokens are checked even when the entry ends up skipped
        let input = raw
            .input_token
            .as_ref()
            .filter(|v| !v.is_null())
            .map(|v| normalize_tokens(v, "input_token", &name, source_name))
            .transpose()?;
        let output = raw
            .output_token
            .as_ref()
            .filter(|v| !v.is_null())
            .map(|v| normalize_tokens(v, "output_token", &name, source_name))
            .transpose()?;

        let (Some(input_tokens), Some(output_tokens)) = (input, output) else {
            debug!(operation = %name, "skipping paginator without input and output tokens");
            continue;
        };

        configs.insert(
            name,
            PaginationConfig {
                input_tokens,
                output_tokens,
                limit_key: raw.limit_key.unwrap_or_default(),
                more_results: raw.more_results.unwrap_or_default(),
                stop_on_same_token: false,
            },
        );
    }

    Ok(configs)
}

/// Coerces a token field into its ordered sequence form.
fn normalize_tokens(
    value: &JsonValue,
    field: &str,
    operation: &str,
    source_name: &str,
) -> Result<Vec<String>> {
    match value {
        JsonValue::String(token) => Ok(vec![token.clone()]),
        JsonValue::Array(items) if items.is_empty() => Err(Error::decode(
            source_name,
            format!("operation {operation}: {field} must not be empty"),
        )),
        JsonValue::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                JsonValue::String(token) => Ok(token.clone()),
                other => Err(Error::decode(
                    source_name,
                    format!(
                        "operation {operation}: {field}[{i}] must be a string, found {}",
                        json_kind(other)
                    ),
                )),
            })
            .collect(),
        other => Err(Error::decode(
            source_name,
            format!(
                "operation {operation}: {field} must be a string or list of strings, found {}",
                json_kind(other)
            ),
        )),
    }
}

/// Normalizes a paginator sidecar and attaches the result to `api`.
///
/// The whole document is validated before any operation is touched, so a
/// decode failure leaves `api` unchanged. Entries for operations the model
/// does not define are dropped as stale configuration.
pub fn attach(
    raw: &str,
    source_name: &str,
    api: &mut Api,
) -> Result<BTreeMap<String, PaginationConfig>> {
    let decoded = decode(raw, source_name)?;
    let stop_on_same_token = enable_stop_on_same_token(api.package_name());

    let mut attached = BTreeMap::new();
    for (name, mut config) in decoded {
        let Some(op) = api.operation_mut(&name) else {
            // TODO: confirm with model owners whether unknown operations should be reported
            debug!(operation = %name, "skipping paginator for unknown operation");
            continue;
        };
        config.stop_on_same_token = stop_on_same_token;
        op.paginator = Some(config.clone());
        attached.insert(name, config);
    }

    info!(
        service = %api.package_name(),
        count = attached.len(),
        "attached paginators"
    );
    Ok(attached)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Operation, Shape, ShapeRef};
    use tracing_test::traced_test;

    fn api(service: &str, ops: &[&str]) -> Api {
        let mut api = Api::new(service);
        for name in ops {
            api.add_operation(Operation::new(
                *name,
                ShapeRef::boxed(Shape::Structure {
                    name: format!("{name}Input"),
                    members: vec![],
                }),
            ));
        }
        api
    }

    #[test]
    fn test_string_token_becomes_single_element() {
        let raw = r#"{"pagination": {"ListBuckets": {
            "input_token": "NextToken", "output_token": "NextToken", "limit_key": "MaxKeys"
        }}}"#;
        let configs = decode(raw, "paginators-1.json").unwrap();
        let config = &configs["ListBuckets"];
        assert_eq!(config.input_tokens, vec!["NextToken"]);
        assert_eq!(config.output_tokens, vec!["NextToken"]);
        assert_eq!(config.limit_key, "MaxKeys");
        assert_eq!(config.more_results, "");
    }

    #[test]
    fn test_token_list_keeps_order() {
        let raw = r#"{"ListObjectVersions": {
            "input_token": ["A", "B"],
            "output_token": ["NextA", "NextB"],
            "more_results": "IsTruncated"
        }}"#;
        let configs = decode(raw, "p.json").unwrap();
        let config = &configs["ListObjectVersions"];
        assert_eq!(config.input_tokens, vec!["A", "B"]);
        assert_eq!(config.output_tokens, vec!["NextA", "NextB"]);
        assert_eq!(config.more_results, "IsTruncated");
    }

    #[test]
    fn test_missing_token_skips_entry() {
        let raw = r#"{"pagination": {
            "OnlyInput": {"input_token": "NextToken"},
            "OnlyOutput": {"output_token": "NextToken"},
            "NullInput": {"input_token": null, "output_token": "NextToken"},
            "ResultKeyOnly": {"result_key": "Items"}
        }}"#;
        let mut api = api("svc", &["OnlyInput", "OnlyOutput", "NullInput", "ResultKeyOnly"]);
        let attached = attach(raw, "p.json", &mut api).unwrap();

        assert!(attached.is_empty());
        assert!(api.operations().all(|op| op.paginator.is_none()));
    }

    #[test]
    #[traced_test]
    fn test_unknown_operation_is_skipped_without_error() {
        let raw = r#"{"pagination": {
            "ListThings": {"input_token": "NextToken", "output_token": "NextToken"},
            "ListGone": {"input_token": "NextToken", "output_token": "NextToken"}
        }}"#;
        let mut api = api("svc", &["ListThings"]);
        let attached = attach(raw, "p.json", &mut api).unwrap();

        assert_eq!(attached.keys().collect::<Vec<_>>(), vec!["ListThings"]);
        assert!(api.operation("ListThings").unwrap().paginator.is_some());
        assert!(logs_contain("skipping paginator for unknown operation"));
    }

    #[test]
    fn test_wrong_token_type_is_fatal_and_commits_nothing() {
        let raw = r#"{"pagination": {
            "AListThings": {"input_token": "NextToken", "output_token": "NextToken"},
            "BListOthers": {"input_token": 5, "output_token": "NextToken"}
        }}"#;
        let mut api = api("svc", &["AListThings", "BListOthers"]);
        let err = attach(raw, "p.json", &mut api).unwrap_err();

        assert!(matches!(err, Error::Decode { .. }));
        assert!(err.to_string().contains("p.json"));
        assert!(err.to_string().contains("input_token"));
        assert!(api.operations().all(|op| op.paginator.is_none()));
    }

    #[test]
    fn test_wrong_token_type_without_partner_is_fatal() {
        let raw = r#"{"ListThings": {"input_token": 5}}"#;
        let err = decode(raw, "p.json").unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
        assert!(err.to_string().contains("input_token"));

        let raw = r#"{"ListOthers": {"output_token": {"a": 1}}}"#;
        let err = decode(raw, "p.json").unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
        assert!(err.to_string().contains("output_token"));

        let raw = r#"{"ListEmpty": {"output_token": []}}"#;
        assert!(decode(raw, "p.json").is_err());
    }

    #[test]
    fn test_non_string_list_element_is_fatal() {
        let raw = r#"{"ListThings": {"input_token": ["A", 1], "output_token": "B"}}"#;
        let err = decode(raw, "p.json").unwrap_err();
        assert!(err.to_string().contains("input_token[1]"));
    }

    #[test]
    fn test_empty_token_list_is_fatal() {
        let raw = r#"{"ListThings": {"input_token": [], "output_token": "B"}}"#;
        assert!(decode(raw, "p.json").is_err());
    }

    #[test]
    fn test_malformed_top_level() {
        assert!(matches!(
            decode("[1, 2]", "p.json").unwrap_err(),
            Error::Decode { .. }
        ));
        assert!(matches!(
            decode("{not json", "p.json").unwrap_err(),
            Error::Decode { .. }
        ));
        assert!(decode(r#"{"pagination": []}"#, "p.json").is_err());
    }

    #[test]
    fn test_wrong_limit_key_type_is_fatal() {
        let raw = r#"{"ListThings": {"input_token": "A", "output_token": "B", "limit_key": 10}}"#;
        assert!(decode(raw, "p.json").is_err());
    }

    #[test]
    fn test_stop_on_same_token_follows_service() {
        let raw = r#"{"pagination": {"FilterLogEvents": {
            "input_token": "nextToken", "output_token": "nextToken"
        }}}"#;
        let mut logs = api("cloudwatchlogs", &["FilterLogEvents"]);
        let attached = attach(raw, "p.json", &mut logs).unwrap();
        assert!(attached["FilterLogEvents"].stop_on_same_token);

        let mut other = api("s3", &["FilterLogEvents"]);
        let attached = attach(raw, "p.json", &mut other).unwrap();
        assert!(!attached["FilterLogEvents"].stop_on_same_token);
    }

    #[test]
    fn test_token_literals() {
        let config = PaginationConfig {
            input_tokens: vec!["Marker".to_string(), "Key".to_string()],
            output_tokens: vec!["NextMarker".to_string()],
            limit_key: String::new(),
            more_results: String::new(),
            stop_on_same_token: false,
        };
        assert_eq!(config.input_tokens_literal(), r#"[]string{"Marker", "Key"}"#);
        assert_eq!(config.output_tokens_literal(), r#"[]string{"NextMarker"}"#);
    }
}
