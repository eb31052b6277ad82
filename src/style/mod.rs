//! Style applicator.
//!
//! Turns packed placements into positioning directives for the configured
//! mode and writes them through the host, then reverses those writes on
//! reset.

mod core;

pub use core::{ApplyOutcome, PositionDirective, apply, reset};
