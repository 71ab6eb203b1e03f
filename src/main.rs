//! smokegen CLI entrypoint
//! Parses command-line arguments and dispatches to the generation pipeline.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use smokegen::{
    core::{Config, ModelConfig, config::DEFAULT_SDK_IMPORT_ROOT},
    generation::{GenerationOrchestrator, GenerationOutput, SmokeTestGenerator},
    infrastructure::FileSourceLoader,
};
use std::path::PathBuf;
use std::sync::Arc;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "smokegen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate smoke tests for a single API model
    Generate {
        #[command(flatten)]
        model: ModelArgs,
        /// Smoke test sidecar (JSON)
        #[arg(long)]
        smoke: Option<PathBuf>,
        /// Output file for the generated Go tests; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
        /// Import root of the Go SDK
        #[arg(long, default_value = DEFAULT_SDK_IMPORT_ROOT)]
        sdk_import_root: String,
    },
    /// Print normalized paginator metadata for a single API model as JSON
    Paginators {
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Process every model listed in a configuration file
    Batch {
        /// Path to smokegen.toml
        #[arg(long, default_value = "smokegen.toml")]
        config: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
pub struct ModelArgs {
    /// Serialized API model (JSON or YAML)
    #[arg(long)]
    model: PathBuf,
    /// Expected service id of the model
    #[arg(long)]
    service: Option<String>,
    /// Pagination sidecar (JSON)
    #[arg(long)]
    pagination: Option<PathBuf>,
}

impl ModelArgs {
    fn into_model_config(self) -> ModelConfig {
        let mut model = ModelConfig::new(self.model);
        model.service = self.service;
        model.pagination = self.pagination;
        model
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with default level INFO
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            model,
            smoke,
            output,
            sdk_import_root,
        } => {
            let mut model = model.into_model_config();
            model.smoke = smoke;
            model.output = output;
            let orchestrator = orchestrator(&sdk_import_root);
            let result = orchestrator
                .run(&model)
                .await
                .with_context(|| format!("Failed to generate {}", model.model.display()))?;
            write_output(&model, &result).await?;
        }
        Commands::Paginators { model } => {
            let model = model.into_model_config();
            let result = orchestrator(DEFAULT_SDK_IMPORT_ROOT)
                .run(&model)
                .await
                .with_context(|| format!("Failed to load {}", model.model.display()))?;
            println!("{}", serde_json::to_string_pretty(&result.paginators)?);
        }
        Commands::Batch { config } => {
            let config = Config::load(&config)
                .await
                .with_context(|| format!("Failed to load config {}", config.display()))?;
            info!(models = config.models.len(), "Starting batch generation");

            let results = orchestrator(&config.sdk_import_root)
                .run_all(&config.models)
                .await
                .context("Batch generation failed")?;
            for (model, result) in config.models.iter().zip(&results) {
                write_output(model, result).await?;
            }
        }
    }
    Ok(())
}

fn orchestrator(sdk_import_root: &str) -> GenerationOrchestrator {
    GenerationOrchestrator::new(
        Arc::new(FileSourceLoader::new()),
        SmokeTestGenerator::new(sdk_import_root),
    )
}

async fn write_output(model: &ModelConfig, result: &GenerationOutput) -> anyhow::Result<()> {
    let Some(code) = &result.smoke_tests else {
        info!(service = %result.service_id, "No smoke test sidecar, nothing to write");
        return Ok(());
    };

    match &model.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            tokio::fs::write(path, code)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(service = %result.service_id, path = %path.display(), "Wrote smoke tests");
        }
        None => print!("{code}"),
    }
    Ok(())
}
