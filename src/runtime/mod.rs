use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde_json::json;

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::host::{Host, HostEvent, ResizeEntry};
use crate::layout::{ChildGeometry, compute_placements};
use crate::logging::{FileSink, LogLevel, Logger, json_kv};
use crate::metrics::LayoutMetrics;
use crate::pack::{BestFitStripPack, StripPacker};
use crate::registry::PlacementRegistry;
use crate::style::{self, PositionDirective};

pub mod audit;
mod observe;
mod schedule;


use audit::{RuntimeAudit, RuntimeAuditEventBuilder, RuntimeAuditStage};

const LOG_TARGET: &str = "rectpackr::runtime";

/// Ambient knobs for a layout instance: logging, metrics and auditing.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Optional structured logger used by the instance.
    pub logger: Option<Logger>,
    /// Metrics accumulator; a snapshot is logged on teardown.
    pub metrics: Option<Arc<Mutex<LayoutMetrics>>>,
    /// Optional lifecycle audit sink.
    pub audit: Option<Arc<dyn RuntimeAudit>>,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            logger: None,
            metrics: None,
            audit: None,
            metrics_target: "rectpackr::runtime.metrics".to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Log JSON lines to `path`, truncating once the file exceeds `max_bytes`
    /// (zero disables truncation).
    pub fn with_file_logger(self, path: impl AsRef<Path>, max_bytes: u64) -> Result<Self> {
        let sink = FileSink::open(path, max_bytes)?;
        Ok(self.with_logger(Logger::new(sink)))
    }

    pub fn with_audit(mut self, audit: Arc<dyn RuntimeAudit>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(LayoutMetrics::new())));
        }
    }

    /// Disable metrics collection.
    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<LayoutMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Which watcher categories are currently live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatcherState {
    pub structure: bool,
    pub child_sizes: bool,
    pub container: bool,
}

/// One mounted strip-packing layout.
///
/// The instance owns its host, packer, geometry cache and every pending
/// flag. The host routes notifications in through [`handle`](Self::handle);
/// all work for an event runs to completion before `handle` returns, and the
/// only deferred work is the child watcher restart scheduled for the next
/// frame.
pub struct LayoutInstance<H: Host, P: StripPacker = BestFitStripPack> {
    host: H,
    config: LayoutConfig,
    runtime: RuntimeConfig,
    children: Vec<ChildGeometry<H::Node>>,
    packer: P,
    pending_restart: bool,
    loading_assets: HashSet<H::Node>,
    watchers: WatcherState,
    registry: PlacementRegistry<H::Node>,
    mounted: bool,
    created_at: Instant,
}

/// Strip width for a measured container width: at least one pixel.
fn strip_width_for(width: f64) -> f64 {
    if width.is_finite() { width.max(1.0) } else { 1.0 }
}

impl<H: Host, P: StripPacker> LayoutInstance<H, P> {
    pub fn create(host: H, config: LayoutConfig) -> Self {
        Self::create_with(host, config, RuntimeConfig::default())
    }

    pub fn create_with(host: H, config: LayoutConfig, runtime: RuntimeConfig) -> Self {
        let packer = P::with_strip_width(strip_width_for(host.container_width()));
        let mut instance = Self {
            host,
            config,
            runtime,
            children: Vec::new(),
            packer,
            pending_restart: false,
            loading_assets: HashSet::new(),
            watchers: WatcherState::default(),
            registry: PlacementRegistry::new(),
            mounted: false,
            created_at: Instant::now(),
        };
        instance.mount();
        instance
    }

    fn mount(&mut self) {
        self.mounted = true;
        let strip_width = self.packer.strip_width();
        self.audit(
            RuntimeAuditStage::InstanceCreated,
            [
                json_kv("config", json!(self.config)),
                json_kv("strip_width", json!(strip_width)),
            ],
        );
        self.log(
            LogLevel::Info,
            "instance_created",
            [
                json_kv("config", json!(self.config)),
                json_kv("strip_width", json!(strip_width)),
            ],
        );
        self.start_observing();
    }

    /// Route one host notification. Never fails; notifications for watchers
    /// that are no longer live are dropped.
    pub fn handle(&mut self, event: HostEvent<H::Node>) {
        if !self.mounted {
            self.log(
                LogLevel::Trace,
                "event_ignored",
                [json_kv("event", event.kind())],
            );
            return;
        }

        self.record_metric(LayoutMetrics::record_event);
        match event {
            HostEvent::ChildrenMutated { added, removed } => {
                self.on_children_mutated(&added, &removed)
            }
            HostEvent::ChildrenResized(entries) => self.on_children_resized(entries),
            HostEvent::ContainerResized { width } => self.on_container_resized(width),
            HostEvent::AssetLoaded(asset) => self.on_asset_loaded(asset),
            HostEvent::Frame => self.on_frame(),
        }
    }

    /// Tear down: stop every watcher, reverse every positioning write, and
    /// drop geometry, packer reservations and pending flags. Calling it again
    /// is a no-op.
    pub fn clear(&mut self) {
        if !self.mounted {
            return;
        }

        self.stop_observing();
        let cleared = style::reset(&mut self.host, &mut self.registry, &self.config);
        self.children.clear();
        self.packer.reset();
        self.pending_restart = false;
        self.mounted = false;

        self.audit(
            RuntimeAuditStage::InstanceCleared,
            [json_kv("cleared_nodes", json!(cleared))],
        );
        self.log(
            LogLevel::Info,
            "instance_cleared",
            [json_kv("cleared_nodes", json!(cleared))],
        );
        self.emit_metrics_snapshot();
    }

    /// Swap the configuration: a full teardown followed by a fresh mount, so
    /// nothing written under the old configuration survives.
    pub fn reconfigure(&mut self, config: LayoutConfig) {
        self.clear();
        self.config = config;
        self.packer = P::with_strip_width(strip_width_for(self.host.container_width()));
        self.mount();
    }

    /// Tear down and hand the host back.
    pub fn into_host(mut self) -> H {
        self.clear();
        self.host
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn children(&self) -> &[ChildGeometry<H::Node>] {
        &self.children
    }

    pub fn packer(&self) -> &P {
        &self.packer
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_restart_pending(&self) -> bool {
        self.pending_restart
    }

    pub fn watchers(&self) -> WatcherState {
        self.watchers
    }

    /// Whether any watcher is live.
    pub fn is_observing(&self) -> bool {
        let WatcherState {
            structure,
            child_sizes,
            container,
        } = self.watchers;
        structure || child_sizes || container
    }

    pub fn tracked_assets(&self) -> usize {
        self.loading_assets.len()
    }

    /// Directive last written on `node`, if it is currently positioned.
    pub fn placement_of(&self, node: &H::Node) -> Option<&PositionDirective> {
        self.registry.directive_of(node)
    }

    fn on_children_resized(&mut self, entries: Vec<ResizeEntry<H::Node>>) {
        if !self.watchers.child_sizes {
            return;
        }

        self.children.clear();
        for entry in entries {
            if self.host.is_positionable(&entry.node) {
                let size = entry.size();
                self.children.push(ChildGeometry::new(entry.node, size));
            }
        }

        self.packer.reset();
        self.render();
    }

    fn on_container_resized(&mut self, width: f64) {
        if !self.watchers.container {
            return;
        }

        let strip_width = strip_width_for(width);
        if strip_width == self.packer.strip_width() {
            self.audit(
                RuntimeAuditStage::LayoutSkipped,
                [json_kv("strip_width", json!(strip_width))],
            );
            return;
        }

        self.packer = P::with_strip_width(strip_width);
        self.record_metric(LayoutMetrics::record_packer_rebuild);
        self.audit(
            RuntimeAuditStage::PackerRebuilt,
            [json_kv("strip_width", json!(strip_width))],
        );
        self.log(
            LogLevel::Debug,
            "packer_rebuilt",
            [json_kv("strip_width", json!(strip_width))],
        );
        self.render();
    }

    /// Pack the cached geometry and write the result. Runs synchronously and
    /// never touches the watchers.
    fn render(&mut self) {
        let placements = compute_placements(&self.children, &mut self.packer);
        let packed_height = self.packer.packed_height();
        let outcome = style::apply(
            &mut self.host,
            &mut self.registry,
            &placements,
            &self.config,
            packed_height,
        );

        let placed = placements.len();
        self.record_metric(|metrics| metrics.record_layout(placed));
        self.audit(
            RuntimeAuditStage::LayoutCommitted,
            [
                json_kv("children", json!(placed)),
                json_kv("packed_height", json!(packed_height)),
            ],
        );
        self.log(
            LogLevel::Debug,
            "layout_committed",
            [
                json_kv("children", json!(placed)),
                json_kv("packed_height", json!(packed_height)),
                json_kv("written", json!(outcome.written)),
                json_kv("unchanged", json!(outcome.unchanged)),
                json_kv("released", json!(outcome.released)),
            ],
        );
    }

    /// Empty-container fast path: no size batch will arrive for an empty
    /// child set, so geometry, reservations and styles are dropped here.
    fn reset_layout(&mut self) {
        self.children.clear();
        self.packer.reset();
        style::reset(&mut self.host, &mut self.registry, &self.config);
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.runtime.logger.as_ref() {
            let _ = logger.emit(level, LOG_TARGET, message, fields);
        }
    }

    fn audit<I>(&self, stage: RuntimeAuditStage, details: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(audit) = self.runtime.audit.as_ref() {
            let mut builder = RuntimeAuditEventBuilder::new(stage);
            for (key, value) in details {
                builder.detail(key, value);
            }
            audit.record(builder.finish());
        }
    }

    fn record_metric(&self, record: impl FnOnce(&mut LayoutMetrics)) {
        if let Some(metrics) = self.runtime.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut *guard);
            }
        }
    }

    fn emit_metrics_snapshot(&self) {
        if let (Some(logger), Some(metrics)) =
            (self.runtime.logger.as_ref(), self.runtime.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let target = self.runtime.metrics_target.as_str();
                let snapshot_event = guard.snapshot(self.created_at.elapsed()).to_log_event(target);
                let _ = logger.log_event(snapshot_event);
            }
        }
    }
}
