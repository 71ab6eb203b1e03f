//! Error handling for the smokegen code generation library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Every variant is fatal for the
//! model pass that produced it; sidecar entries that merely lag the schema are
//! skipped upstream and never surface here.
//!
//! # Examples
//!
//! ```
//! use smokegen::core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::config("missing service id"))
//! }
//!
//! assert!(might_fail().is_err());
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Result type for smokegen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for smokegen operations
#[derive(Debug, Error)]
pub enum Error {
    /// A sidecar or model file could not be opened or read
    #[error("failed to read {}: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON was structurally invalid or a field had an unexpected type
    #[error("failed to decode {source_name}: {message}")]
    Decode {
        source_name: String,
        message: String,
    },

    /// Smoke test suite format version other than 1
    #[error("invalid smoke test version, {found}")]
    VersionMismatch { found: i64 },

    /// A literal does not fit the shape it is being encoded against
    #[error("schema mismatch at {path}: expected {expected}, found {found}")]
    SchemaMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// A struct literal names a field the shape does not declare
    #[error("unknown field {field:?} at {path} for shape {shape}")]
    UnknownField {
        path: String,
        field: String,
        shape: String,
    },

    /// Template engine error
    #[error("Template engine error: {0}")]
    Template(#[from] tera::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new decode error for the named source
    pub fn decode<S: Into<String>, M: ToString>(source_name: S, message: M) -> Self {
        Self::Decode {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn mismatch(path: &str, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            path: path.to_string(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}
