//! Lifecycle audit hooks for `LayoutInstance`.
//!
//! Records capture a stage identifier plus structured metadata so callers can
//! log, buffer, or assert on the reconciliation flow without reaching into the
//! instance.

use std::sync::Mutex;
use std::time::SystemTime;

use serde_json::Value;

/// Distinct lifecycle checkpoints emitted by `LayoutInstance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeAuditStage {
    /// The instance was mounted (on create or after a reconfigure).
    InstanceCreated,
    /// All watchers were started.
    ObservationStarted,
    /// All watchers were stopped.
    ObservationStopped,
    /// A child watcher restart was deferred to the next frame.
    RestartScheduled,
    /// A restart request arrived while one was already pending.
    RestartCollapsed,
    /// The deferred restart ran and child watchers are live again.
    RestartExecuted,
    /// Placements were written and the container resized.
    LayoutCommitted,
    /// A container resize left the strip width unchanged.
    LayoutSkipped,
    /// A new packer replaced the old one for a new strip width.
    PackerRebuilt,
    /// A loading asset gained a load listener.
    AssetTracked,
    /// A load listener was dropped without firing.
    AssetReleased,
    /// Teardown completed.
    InstanceCleared,
}

/// Structured audit entry.
#[derive(Debug, Clone)]
pub struct RuntimeAuditEvent {
    pub timestamp: SystemTime,
    pub stage: RuntimeAuditStage,
    pub details: Vec<(String, Value)>,
}

impl RuntimeAuditEvent {
    fn new(stage: RuntimeAuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

/// Builder helper to append fields ergonomically.
pub struct RuntimeAuditEventBuilder {
    event: RuntimeAuditEvent,
}

impl RuntimeAuditEventBuilder {
    pub fn new(stage: RuntimeAuditStage) -> Self {
        Self {
            event: RuntimeAuditEvent::new(stage),
        }
    }

    pub fn detail(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.event.details.push((key.into(), value));
        self
    }

    pub fn finish(self) -> RuntimeAuditEvent {
        self.event
    }
}

/// Trait implemented by any audit sink.
pub trait RuntimeAudit: Send + Sync {
    fn record(&self, event: RuntimeAuditEvent);
}

/// Default no-op implementation used when auditing is disabled.
#[derive(Debug, Default)]
pub struct NullRuntimeAudit;

impl RuntimeAudit for NullRuntimeAudit {
    fn record(&self, _event: RuntimeAuditEvent) {}
}

/// Buffers every record in memory.
#[derive(Debug, Default)]
pub struct MemoryAudit {
    events: Mutex<Vec<RuntimeAuditEvent>>,
}

impl MemoryAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RuntimeAuditEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, stage: RuntimeAuditStage) -> usize {
        self.events
            .lock()
            .map(|guard| guard.iter().filter(|event| event.stage == stage).count())
            .unwrap_or(0)
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.events.lock() {
            guard.clear();
        }
    }
}

impl RuntimeAudit for MemoryAudit {
    fn record(&self, event: RuntimeAuditEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}
