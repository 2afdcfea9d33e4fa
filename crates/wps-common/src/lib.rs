//! Common types and utilities shared across the NAME WPS crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod literal;

pub use bbox::BoundingBoxValue;
pub use crs::CrsCode;
pub use error::WpsError;
pub use literal::{LiteralKind, LiteralValue};
