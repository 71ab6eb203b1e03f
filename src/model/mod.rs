//! Schema registry consumed by the generators
//!
//! The registry is built elsewhere and handed to a generation pass. Apart from
//! the per-operation pagination slot it is read-only here.

pub mod api;
pub mod shape;

pub use api::{Api, Operation};
pub use shape::{Member, Shape, ShapeRef};
