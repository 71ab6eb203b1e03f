//! Generation domain module - turns a model and its sidecars into Go source
//!
//! The pass is linear: paginators are normalized and attached, the smoke suite
//! is loaded and passed through the per-service override rules, and the
//! surviving cases are synthesized into test functions by way of the value
//! encoder.

pub mod encoder;
pub mod orchestrator;
pub mod pagination;
pub mod rules;
pub mod smoke;
pub mod suite;
pub mod traits;
pub mod utils;

pub use encoder::{ShapeValueBuilder, encode};
pub use orchestrator::{GenerationOrchestrator, GenerationOutput, Sidecar};
pub use pagination::PaginationConfig;
pub use rules::OverrideRule;
pub use smoke::{ImportSet, SmokeTestGenerator, synthesize};
pub use suite::{SmokeTestCase, SmokeTestSuite};
pub use traits::*;
