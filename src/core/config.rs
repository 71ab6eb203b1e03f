//! Generator configuration
//!
//! A `smokegen.toml` file lists the API models to process in one run:
//!
//! ```toml
//! sdk_import_root = "github.com/aws/aws-sdk-go"
//!
//! [[models]]
//! model = "models/s3/api.json"
//! pagination = "models/s3/paginators-1.json"
//! smoke = "models/s3/smoke.json"
//! output = "service/s3/integ_test.go"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};
use crate::generation::rules::validate_service_id;

/// Import root of the Go SDK the generated code builds against
pub const DEFAULT_SDK_IMPORT_ROOT: &str = "github.com/aws/aws-sdk-go";

fn default_sdk_import_root() -> String {
    DEFAULT_SDK_IMPORT_ROOT.to_string()
}

/// Top-level configuration for a generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_sdk_import_root")]
    pub sdk_import_root: String,
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sdk_import_root: default_sdk_import_root(),
            models: Vec::new(),
        }
    }
}

/// Inputs and output for one API model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Expected service id; checked against the model when set
    #[serde(default)]
    pub service: Option<String>,
    /// Serialized schema registry (JSON or YAML)
    pub model: PathBuf,
    #[serde(default)]
    pub pagination: Option<PathBuf>,
    #[serde(default)]
    pub smoke: Option<PathBuf>,
    /// Where to write the smoke test file; stdout when unset
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl ModelConfig {
    pub fn new(model: impl Into<PathBuf>) -> Self {
        Self {
            service: None,
            model: model.into(),
            pagination: None,
            smoke: None,
            output: None,
        }
    }

    /// Resolves relative paths against `base`
    fn resolve(&mut self, base: &Path) {
        let optional = [&mut self.pagination, &mut self.smoke, &mut self.output];
        for path in std::iter::once(&mut self.model).chain(optional.into_iter().flatten()) {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

impl Config {
    /// Parses a TOML configuration document
    pub fn from_toml_str(content: &str, source_name: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| Error::decode(source_name, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file; relative model paths resolve against its directory
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::Resource {
                path: path.to_path_buf(),
                source,
            })?;
        let mut config = Self::from_toml_str(&content, &path.display().to_string())?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for model in &mut config.models {
            model.resolve(base);
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sdk_import_root.trim().is_empty() {
            return Err(Error::config("sdk_import_root cannot be empty"));
        }
        for model in &self.models {
            if let Some(service) = &model.service {
                validate_service_id(service)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("", "smokegen.toml").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.sdk_import_root, "github.com/aws/aws-sdk-go");
    }

    #[test]
    fn test_parse_models() {
        let config = Config::from_toml_str(
            r#"
            sdk_import_root = "example.com/sdk"

            [[models]]
            service = "sts"
            model = "sts/api.json"
            smoke = "sts/smoke.json"
            "#,
            "smokegen.toml",
        )
        .unwrap();

        assert_eq!(config.sdk_import_root, "example.com/sdk");
        assert_eq!(config.models.len(), 1);
        assert_eq!(config.models[0].service.as_deref(), Some("sts"));
        assert!(config.models[0].pagination.is_none());
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(
            Config::from_toml_str("models = 3", "smokegen.toml").unwrap_err(),
            Error::Decode { .. }
        ));
        assert!(matches!(
            Config::from_toml_str("sdk_import_root = \"\"", "smokegen.toml").unwrap_err(),
            Error::Config(_)
        ));
        assert!(Config::from_toml_str(
            "[[models]]\nservice = \"Bad-Name\"\nmodel = \"api.json\"",
            "smokegen.toml"
        )
        .is_err());
        assert!(Config::from_toml_str("unknown_key = 1", "smokegen.toml").is_err());
    }

    #[tokio::test]
    async fn test_load_resolves_relative_paths() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[models]]\nmodel = \"api.json\"\nsmoke = \"/abs/smoke.json\""
        )
        .unwrap();

        let config = Config::load(file.path()).await.unwrap();
        let dir = file.path().parent().unwrap();
        assert_eq!(config.models[0].model, dir.join("api.json"));
        assert_eq!(
            config.models[0].smoke.as_deref(),
            Some(Path::new("/abs/smoke.json"))
        );
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Resource { .. }));
    }
}
