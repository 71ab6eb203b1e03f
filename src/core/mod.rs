//! Shared configuration and error types for the smokegen library.

pub mod config;
pub mod error;

pub use config::{Config, ModelConfig};
pub use error::{Error, Result};
