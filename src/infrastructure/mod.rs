//! Infrastructure adapters for the generation domain

pub mod file_loader;

pub use file_loader::{FileSourceLoader, parse_api};
