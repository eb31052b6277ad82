//! Reactive best-fit strip-packing layout engine.
//!
//! A [`LayoutInstance`] watches a container and its children through a
//! [`Host`], packs every child into a strip as wide as the container and
//! writes the resulting positions back as translations or edge offsets. The
//! host delivers notifications as [`HostEvent`]s; the instance re-packs on
//! size changes and debounces structural changes to one restart per frame.

pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod pack;
pub mod registry;
pub mod runtime;
pub mod style;

pub use config::{LayoutConfig, Positioning, XDirection, YDirection};
pub use error::{LayoutError, Result};
pub use geometry::{Point, Size};
pub use host::{BoxSizing, Host, HostEvent, ResizeEntry};
pub use layout::{ChildGeometry, Placement, compute_placements};
pub use logging::{FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult};
pub use metrics::{LayoutMetrics, MetricSnapshot};
pub use pack::{BestFitStripPack, StripPacker};
pub use registry::PlacementRegistry;
pub use runtime::audit::{
    MemoryAudit, NullRuntimeAudit, RuntimeAudit, RuntimeAuditEvent, RuntimeAuditEventBuilder,
    RuntimeAuditStage,
};
pub use runtime::{LayoutInstance, RuntimeConfig, WatcherState};
pub use style::{ApplyOutcome, PositionDirective};
