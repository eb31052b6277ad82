//! Layout computer.
//!
//! Maps the cached child geometry onto packed coordinates, in document order,
//! through whatever [`StripPacker`](crate::pack::StripPacker) the instance
//! currently owns.

mod core;

pub use core::{ChildGeometry, Placement, compute_placements};
