//! Watcher binding for `LayoutInstance`.
//!
//! Starting or stopping a watcher never computes a layout by itself; only the
//! notifications delivered while a watcher is live do.

use std::collections::HashSet;

use serde_json::json;

use crate::host::{BoxSizing, Host};
use crate::logging::{LogLevel, json_kv};
use crate::pack::StripPacker;

use super::LayoutInstance;
use super::audit::RuntimeAuditStage;

impl<H: Host, P: StripPacker> LayoutInstance<H, P> {
    pub(super) fn start_observing(&mut self) {
        self.start_watching_child_sizes();
        self.start_watching_structure();
        self.start_watching_container();
        self.sync_asset_tracking();

        let observed = self.positionable_children().len();
        self.audit(
            RuntimeAuditStage::ObservationStarted,
            [json_kv("children", json!(observed))],
        );
        self.log(
            LogLevel::Debug,
            "observation_started",
            [json_kv("children", json!(observed))],
        );
    }

    pub(super) fn stop_observing(&mut self) {
        self.stop_watching_child_sizes();
        self.stop_watching_structure();
        self.stop_watching_container();
        self.stop_tracking_assets();

        self.audit(RuntimeAuditStage::ObservationStopped, []);
        self.log(LogLevel::Debug, "observation_stopped", []);
    }

    pub(super) fn start_watching_child_sizes(&mut self) {
        for child in self.positionable_children() {
            self.host.observe_child_size(&child, BoxSizing::BorderBox);
        }
        self.watchers.child_sizes = true;
    }

    /// Detach every per-child size watcher. With no positionable children
    /// left no batch will ever arrive to re-flow, so the layout is dropped
    /// here instead.
    pub(super) fn stop_watching_child_sizes(&mut self) {
        self.host.disconnect_child_sizes();
        self.watchers.child_sizes = false;

        if self.positionable_children().is_empty() {
            self.reset_layout();
        }
    }

    fn start_watching_structure(&mut self) {
        self.host.observe_children();
        self.watchers.structure = true;
    }

    /// Undelivered records are flushed before disconnecting so none can
    /// arrive after teardown.
    fn stop_watching_structure(&mut self) {
        let flushed = self.host.take_mutation_records();
        self.host.disconnect_children();
        self.watchers.structure = false;

        if flushed > 0 {
            self.log(
                LogLevel::Trace,
                "mutation_records_flushed",
                [json_kv("records", json!(flushed))],
            );
        }
    }

    fn start_watching_container(&mut self) {
        self.host.observe_container_size(BoxSizing::ContentBox);
        self.watchers.container = true;
    }

    fn stop_watching_container(&mut self) {
        self.host.disconnect_container_size();
        self.watchers.container = false;
    }

    /// Bring load listeners in line with the assets currently loading:
    /// listeners on assets that finished or left the tree are released,
    /// new loading assets gain one. Already-tracked assets are untouched.
    pub(super) fn sync_asset_tracking(&mut self) {
        let loading: HashSet<H::Node> = self.host.loading_assets().into_iter().collect();

        let stale: Vec<H::Node> = self
            .loading_assets
            .iter()
            .filter(|asset| !loading.contains(*asset))
            .cloned()
            .collect();
        for asset in stale {
            self.loading_assets.remove(&asset);
            self.host.unlisten_for_load(&asset);
            self.audit(
                RuntimeAuditStage::AssetReleased,
                [json_kv("asset", format!("{asset:?}"))],
            );
        }

        for asset in loading {
            if self.loading_assets.insert(asset.clone()) {
                self.host.listen_for_load(&asset);
                self.audit(
                    RuntimeAuditStage::AssetTracked,
                    [json_kv("asset", format!("{asset:?}"))],
                );
                self.log(
                    LogLevel::Debug,
                    "asset_tracked",
                    [json_kv("asset", format!("{asset:?}"))],
                );
            }
        }
    }

    fn stop_tracking_assets(&mut self) {
        for asset in std::mem::take(&mut self.loading_assets) {
            self.host.unlisten_for_load(&asset);
            self.audit(
                RuntimeAuditStage::AssetReleased,
                [json_kv("asset", format!("{asset:?}"))],
            );
        }
    }

    pub(super) fn positionable_children(&self) -> Vec<H::Node> {
        self.host
            .children()
            .into_iter()
            .filter(|child| self.host.is_positionable(child))
            .collect()
    }
}
