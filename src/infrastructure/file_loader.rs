//! File-based source loader
//!
//! Reads sidecars and serialized models from the local filesystem. The file
//! handle lives only inside `tokio::fs::read_to_string`: it is closed on every
//! return path, and a failed open never produces a handle to close.

use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use crate::core::error::{Error, Result};
use crate::generation::SourceLoader;
use crate::model::Api;

/// Loads documents from local files
pub struct FileSourceLoader;

impl FileSourceLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceLoader for FileSourceLoader {
    async fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .await
            .map_err(|source| Error::Resource {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn load_api(&self, path: &Path) -> Result<Api> {
        let content = self.read_to_string(path).await?;
        parse_api(&content, path)
    }
}

/// Parses a serialized schema registry, as JSON or YAML by extension
pub fn parse_api(content: &str, path: &Path) -> Result<Api> {
    let source_name = path.display().to_string();
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();

    match extension {
        "json" => serde_json::from_str::<Api>(content).map_err(|e| Error::decode(source_name, e)),
        "yaml" | "yml" => serde_yaml::from_str(content).map_err(|e| Error::decode(source_name, e)),
        // Try JSON first, then YAML
        _ => serde_json::from_str::<Api>(content)
            .or_else(|_| serde_yaml::from_str(content))
            .map_err(|e| Error::decode(source_name, e)),
    }
}
