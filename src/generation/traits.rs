//! Port interfaces for the generation domain

use std::path::Path;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::model::Api;

/// Reads sidecar and model documents
#[async_trait]
pub trait SourceLoader: Send + Sync {
    /// Read a whole document as text
    async fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Load a serialized schema registry
    async fn load_api(&self, path: &Path) -> Result<Api>;
}
