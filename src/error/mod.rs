//! Crate-wide error type.
//!
//! The reconciliation engine never fails at runtime; these errors cover the
//! configuration and logging surfaces around it.

mod types;

pub use types::{LayoutError, Result};
