//! Generation orchestration - one linear pass per API model

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::info;

use crate::core::config::ModelConfig;
use crate::core::error::{Error, Result};
use crate::generation::pagination::{self, PaginationConfig};
use crate::generation::rules::{self, validate_service_id};
use crate::generation::smoke::{SmokeTestGenerator, render_test_file};
use crate::generation::suite;
use crate::generation::SourceLoader;
use crate::model::Api;

/// A sidecar document already read into memory
#[derive(Debug, Clone)]
pub struct Sidecar {
    /// Name used in error messages, usually the file path
    pub name: String,
    pub content: String,
}

impl Sidecar {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Result of one model pass
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub service_id: String,
    /// Pagination configs attached to the model, by operation name
    pub paginators: BTreeMap<String, PaginationConfig>,
    /// Complete Go smoke test file, when a smoke sidecar was given
    pub smoke_tests: Option<String>,
    /// The model after the pass, paginators attached
    pub api: Api,
}

/// Orchestrates the per-model generation workflow
pub struct GenerationOrchestrator {
    loader: Arc<dyn SourceLoader>,
    generator: SmokeTestGenerator,
}

impl GenerationOrchestrator {
    /// Create a new generation orchestrator
    pub fn new(loader: Arc<dyn SourceLoader>, generator: SmokeTestGenerator) -> Self {
        Self { loader, generator }
    }

    /// Runs the pass over in-memory inputs.
    ///
    /// Paginators are attached first, then the smoke suite is loaded, overridden
    /// and synthesized. Any error aborts the pass.
    pub fn process(
        &self,
        mut api: Api,
        pagination: Option<&Sidecar>,
        smoke: Option<&Sidecar>,
    ) -> Result<GenerationOutput> {
        validate_service_id(api.package_name())?;

        let paginators = match pagination {
            Some(sidecar) => pagination::attach(&sidecar.content, &sidecar.name, &mut api)?,
            None => BTreeMap::new(),
        };

        let smoke_tests = match smoke {
            Some(sidecar) => {
                let loaded = suite::load(&sidecar.content, &sidecar.name)?;
                let overridden = rules::apply(api.package_name(), loaded)?;
                let body = self.generator.synthesize(&overridden, &api)?;
                Some(render_test_file(&api, &body))
            }
            None => None,
        };

        Ok(GenerationOutput {
            service_id: api.package_name().to_string(),
            paginators,
            smoke_tests,
            api,
        })
    }

    /// Loads the files named by `model` and runs the pass
    pub async fn run(&self, model: &ModelConfig) -> Result<GenerationOutput> {
        let api = self.loader.load_api(&model.model).await?;
        if let Some(expected) = model.service.as_ref().filter(|s| *s != api.package_name()) {
            return Err(Error::config(format!(
                "model {} describes service {:?}, expected {:?}",
                model.model.display(),
                api.package_name(),
                expected
            )));
        }

        let pagination = self.read_sidecar(model.pagination.as_deref()).await?;
        let smoke = self.read_sidecar(model.smoke.as_deref()).await?;

        let output = self.process(api, pagination.as_ref(), smoke.as_ref())?;
        info!(
            service = %output.service_id,
            paginators = output.paginators.len(),
            smoke_tests = output.smoke_tests.is_some(),
            "finished model pass"
        );
        Ok(output)
    }

    /// Runs independent model passes concurrently, failing on the first error
    pub async fn run_all(&self, models: &[ModelConfig]) -> Result<Vec<GenerationOutput>> {
        try_join_all(models.iter().map(|model| self.run(model))).await
    }

    async fn read_sidecar(&self, path: Option<&Path>) -> Result<Option<Sidecar>> {
        let Some(path) = path else {
            return Ok(None);
        };
        let content = self.loader.read_to_string(path).await?;
        Ok(Some(Sidecar::new(path.display().to_string(), content)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Operation, Shape, ShapeRef};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::PathBuf;

    struct MemoryLoader {
        files: HashMap<PathBuf, String>,
        apis: HashMap<PathBuf, Api>,
    }

    #[async_trait]
    impl SourceLoader for MemoryLoader {
        async fn read_to_string(&self, path: &Path) -> Result<String> {
            self.files.get(path).cloned().ok_or_else(|| Error::Resource {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            })
        }

        async fn load_api(&self, path: &Path) -> Result<Api> {
            self.apis
                .get(path)
                .cloned()
                .ok_or_else(|| Error::config(format!("no model at {}", path.display())))
        }
    }

    fn sts() -> Api {
        let empty = |name: &str| {
            ShapeRef::boxed(Shape::Structure {
                name: name.to_string(),
                members: vec![],
            })
        };
        Api::new("sts")
            .with_operation(Operation::new("GetCallerIdentity", empty("GetCallerIdentityInput")))
            .with_operation(Operation::new("GetSessionToken", empty("GetSessionTokenInput")))
    }

    fn orchestrator(loader: MemoryLoader) -> GenerationOrchestrator {
        GenerationOrchestrator::new(Arc::new(loader), SmokeTestGenerator::default())
    }

    const STS_SMOKE: &str = r#"{"version": 1, "defaultRegion": "us-west-2", "testCases": [
        {"operationName": "GetSessionToken", "input": {}, "errorExpectedFromService": false}
    ]}"#;

    #[test]
    fn test_process_applies_override_before_synthesis() {
        let output = orchestrator(MemoryLoader {
            files: HashMap::new(),
            apis: HashMap::new(),
        })
        .process(sts(), None, Some(&Sidecar::new("smoke.json", STS_SMOKE)))
        .unwrap();

        let code = output.smoke_tests.unwrap();
        assert!(code.contains("package sts_test"));
        assert!(code.contains("func TestInteg_00_GetCallerIdentity("));
        assert!(!code.contains("GetSessionToken"));
        assert!(output.paginators.is_empty());
    }

    #[test]
    fn test_process_version_mismatch_aborts() {
        let smoke = Sidecar::new("smoke.json", r#"{"version": 2, "testCases": []}"#);
        let err = orchestrator(MemoryLoader {
            files: HashMap::new(),
            apis: HashMap::new(),
        })
        .process(sts(), None, Some(&smoke))
        .unwrap_err();
        assert!(matches!(err, Error::VersionMismatch { found: 2 }));
    }

    #[tokio::test]
    async fn test_run_reads_sidecars_through_loader() {
        let mut files = HashMap::new();
        files.insert(PathBuf::from("sts/smoke.json"), STS_SMOKE.to_string());
        let mut apis = HashMap::new();
        apis.insert(PathBuf::from("sts/api.json"), sts());

        let mut model = ModelConfig::new("sts/api.json");
        model.smoke = Some(PathBuf::from("sts/smoke.json"));

        let output = orchestrator(MemoryLoader { files, apis })
            .run(&model)
            .await
            .unwrap();
        assert_eq!(output.service_id, "sts");
        assert!(output.smoke_tests.is_some());
    }

    #[tokio::test]
    async fn test_run_missing_sidecar_is_resource_error() {
        let mut apis = HashMap::new();
        apis.insert(PathBuf::from("sts/api.json"), sts());

        let mut model = ModelConfig::new("sts/api.json");
        model.pagination = Some(PathBuf::from("sts/paginators-1.json"));

        let err = orchestrator(MemoryLoader {
            files: HashMap::new(),
            apis,
        })
        .run(&model)
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Resource { .. }));
    }

    #[tokio::test]
    async fn test_run_rejects_service_mismatch() {
        let mut apis = HashMap::new();
        apis.insert(PathBuf::from("sts/api.json"), sts());

        let mut model = ModelConfig::new("sts/api.json");
        model.service = Some("s3".to_string());

        let err = orchestrator(MemoryLoader {
            files: HashMap::new(),
            apis,
        })
        .run(&model)
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("expected \"s3\""));
    }

    #[tokio::test]
    async fn test_run_accepts_matching_service() {
        let mut apis = HashMap::new();
        apis.insert(PathBuf::from("sts/api.json"), sts());

        let mut model = ModelConfig::new("sts/api.json");
        model.service = Some("sts".to_string());

        let output = orchestrator(MemoryLoader {
            files: HashMap::new(),
            apis,
        })
        .run(&model)
        .await
        .unwrap();
        assert_eq!(output.service_id, "sts");
        assert!(output.smoke_tests.is_none());
    }
}
