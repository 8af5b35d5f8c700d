//! GRC Common - Shared building blocks for the GRC rules engine
//!
//! This crate provides:
//! - The error taxonomy every engine operation reports through
//! - Engine configuration (heatmap axis size, out-of-range policy)
//! - Validated value objects (rating scale, actor identifier)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod value_objects;

pub use config::*;
pub use error::*;
pub use value_objects::*;
