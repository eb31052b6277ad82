//! Restart debouncing.
//!
//! A burst of structural changes collapses into one child watcher restart on
//! the next frame. The per-child size watchers are detached as soon as the
//! restart is requested, so removed children cannot report sizes in the gap.

use serde_json::json;

use crate::host::Host;
use crate::logging::{LogLevel, json_kv};
use crate::metrics::LayoutMetrics;
use crate::pack::StripPacker;

use super::LayoutInstance;
use super::audit::RuntimeAuditStage;

impl<H: Host, P: StripPacker> LayoutInstance<H, P> {
    pub(super) fn on_children_mutated(&mut self, added: &[H::Node], removed: &[H::Node]) {
        if !self.watchers.structure {
            return;
        }

        self.log(
            LogLevel::Trace,
            "children_mutated",
            [
                json_kv("added", json!(added.len())),
                json_kv("removed", json!(removed.len())),
            ],
        );
        self.request_restart("children_mutated");
        self.sync_asset_tracking();
    }

    pub(super) fn on_asset_loaded(&mut self, asset: H::Node) {
        // Listeners are one-shot; an untracked asset was already released.
        if !self.loading_assets.remove(&asset) {
            return;
        }

        self.log(
            LogLevel::Debug,
            "asset_loaded",
            [json_kv("asset", format!("{asset:?}"))],
        );
        self.request_restart("asset_loaded");
    }

    pub(super) fn on_frame(&mut self) {
        if !self.pending_restart {
            return;
        }

        self.pending_restart = false;
        self.start_watching_child_sizes();

        let observed = self.positionable_children().len();
        self.record_metric(LayoutMetrics::record_restart);
        self.audit(
            RuntimeAuditStage::RestartExecuted,
            [json_kv("children", json!(observed))],
        );
        self.log(
            LogLevel::Debug,
            "restart_executed",
            [json_kv("children", json!(observed))],
        );
    }

    /// Schedule a child watcher restart for the next frame unless one is
    /// already pending.
    fn request_restart(&mut self, cause: &'static str) {
        if self.pending_restart {
            self.record_metric(LayoutMetrics::record_collapsed_restart);
            self.audit(
                RuntimeAuditStage::RestartCollapsed,
                [json_kv("cause", cause)],
            );
            return;
        }

        self.pending_restart = true;
        self.stop_watching_child_sizes();
        self.host.request_frame();

        self.audit(
            RuntimeAuditStage::RestartScheduled,
            [json_kv("cause", cause)],
        );
        self.log(
            LogLevel::Debug,
            "restart_scheduled",
            [json_kv("cause", cause)],
        );
    }
}
