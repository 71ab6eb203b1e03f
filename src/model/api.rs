//! The schema registry: one API model and its operations

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::generation::pagination::PaginationConfig;
use crate::generation::utils::to_exported_name;
use crate::model::ShapeRef;

/// A named API call with its input parameter shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub exported_name: Option<String>,
    pub input: ShapeRef,
    /// Written by the pagination normalizer; never part of the model document
    #[serde(skip)]
    pub paginator: Option<PaginationConfig>,
}

impl Operation {
    pub fn new(name: impl Into<String>, input: ShapeRef) -> Self {
        Self {
            name: name.into(),
            exported_name: None,
            input,
            paginator: None,
        }
    }

    /// Go identifier of the operation's client method
    pub fn exported_name(&self) -> String {
        self.exported_name
            .clone()
            .unwrap_or_else(|| to_exported_name(&self.name))
    }
}

#[derive(Deserialize)]
struct ApiDocument {
    service_id: String,
    #[serde(default)]
    operations: Vec<Operation>,
}

impl From<ApiDocument> for Api {
    fn from(doc: ApiDocument) -> Self {
        let mut api = Api::new(doc.service_id);
        for op in doc.operations {
            api.add_operation(op);
        }
        api
    }
}

/// Queryable registry of operations for a single service
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "ApiDocument")]
pub struct Api {
    /// Service identity, also the generated client's package name (e.g. `s3`)
    pub service_id: String,
    operations: BTreeMap<String, Operation>,
}

impl Api {
    pub fn new(service_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            operations: BTreeMap::new(),
        }
    }

    pub fn add_operation(&mut self, op: Operation) {
        self.operations.insert(op.name.clone(), op);
    }

    pub fn with_operation(mut self, op: Operation) -> Self {
        self.add_operation(op);
        self
    }

    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }

    pub fn operation_mut(&mut self, name: &str) -> Option<&mut Operation> {
        self.operations.get_mut(name)
    }

    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values()
    }

    pub fn package_name(&self) -> &str {
        &self.service_id
    }

    /// Import path of the generated service client package
    pub fn import_path(&self, sdk_import_root: &str) -> String {
        format!(
            "{}/service/{}",
            sdk_import_root.trim_end_matches('/'),
            self.package_name()
        )
    }
}
