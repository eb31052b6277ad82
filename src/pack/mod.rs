//! Strip-packing primitive.
//!
//! The layout engine only depends on the [`StripPacker`] contract: a fixed
//! strip width, online insertion of width/height pairs and a running packed
//! height. [`BestFitStripPack`] is the stock implementation.

mod core;

pub use core::BestFitStripPack;

use crate::geometry::Point;

/// Contract consumed by the layout computer.
pub trait StripPacker {
    /// Build a packer for a strip of the given width.
    ///
    /// # Panics
    /// Implementations panic if `strip_width` is not a positive, finite number.
    fn with_strip_width(strip_width: f64) -> Self
    where
        Self: Sized;

    /// Width of the strip; immutable for the packer's lifetime.
    fn strip_width(&self) -> f64;

    /// Total height consumed by everything inserted since the last reset.
    fn packed_height(&self) -> f64;

    /// Reserve space for an item and return its top-left placement.
    ///
    /// # Panics
    /// Implementations panic on non-positive or non-finite dimensions. Callers
    /// are expected to filter zero-size items before packing.
    fn insert(&mut self, width: f64, height: f64) -> Point;

    /// Drop every reservation, keeping the strip width.
    fn reset(&mut self);
}
