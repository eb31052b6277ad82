use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct LayoutMetrics {
    events: u64,
    layouts: u64,
    placements: u64,
    restarts: u64,
    collapsed_restarts: u64,
    packer_rebuilds: u64,
}

impl LayoutMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self) {
        self.events = self.events.saturating_add(1);
    }

    pub fn record_layout(&mut self, placed: usize) {
        self.layouts = self.layouts.saturating_add(1);
        self.placements = self.placements.saturating_add(placed as u64);
    }

    pub fn record_restart(&mut self) {
        self.restarts = self.restarts.saturating_add(1);
    }

    pub fn record_collapsed_restart(&mut self) {
        self.collapsed_restarts = self.collapsed_restarts.saturating_add(1);
    }

    pub fn record_packer_rebuild(&mut self) {
        self.packer_rebuilds = self.packer_rebuilds.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            events: self.events,
            layouts: self.layouts,
            placements: self.placements,
            restarts: self.restarts,
            collapsed_restarts: self.collapsed_restarts,
            packer_rebuilds: self.packer_rebuilds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub events: u64,
    pub layouts: u64,
    pub placements: u64,
    pub restarts: u64,
    pub collapsed_restarts: u64,
    pub packer_rebuilds: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "layout_metrics".to_string(),
            self.as_fields(),
        )
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("events".to_string(), json!(self.events));
        map.insert("layouts".to_string(), json!(self.layouts));
        map.insert("placements".to_string(), json!(self.placements));
        map.insert("restarts".to_string(), json!(self.restarts));
        map.insert("collapsed_restarts".to_string(), json!(self.collapsed_restarts));
        map.insert("packer_rebuilds".to_string(), json!(self.packer_rebuilds));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_counters() {
        let mut metrics = LayoutMetrics::new();
        metrics.record_event();
        metrics.record_event();
        metrics.record_layout(4);
        metrics.record_layout(3);
        metrics.record_restart();
        metrics.record_collapsed_restart();
        metrics.record_packer_rebuild();

        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(
            snapshot,
            MetricSnapshot {
                uptime_ms: 1500,
                events: 2,
                layouts: 2,
                placements: 7,
                restarts: 1,
                collapsed_restarts: 1,
                packer_rebuilds: 1,
            }
        );

        let event = snapshot.to_log_event("rectpackr::metrics");
        assert_eq!(event.message, "layout_metrics");
        assert_eq!(event.fields.get("placements"), Some(&json!(7)));
    }
}
