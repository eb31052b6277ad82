//! Bookkeeping of positioning writes per node.

mod core;

pub use core::PlacementRegistry;
