//! smokegen library
//!
//! Generates Go SDK integration smoke tests and paginator metadata from an API
//! model plus its pagination and smoke test sidecar files.
#![deny(unsafe_code)]

pub mod core;
pub mod generation;
pub mod infrastructure;
pub mod model;

pub use crate::{
    core::{Config, Error, ModelConfig, Result},
    generation::{GenerationOrchestrator, GenerationOutput},
    model::Api,
};
