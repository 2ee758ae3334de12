use std::sync::{Arc, RwLock};

use crate::AuditEntry;

/// Where audit entries go.
///
/// `record` must not block on slow IO or surface errors; a sink that cannot
/// store an entry drops it.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: AuditEntry);
}

impl<S> AuditSink for Arc<S>
where
    S: AuditSink + ?Sized,
{
    fn record(&self, entry: AuditEntry) {
        (**self).record(entry)
    }
}

/// In-memory audit log for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Newest first.
    pub fn entries(&self) -> Vec<AuditEntry> {
        match self.entries.read() {
            Ok(guard) => guard.iter().rev().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for InMemoryAuditLog {
    fn record(&self, entry: AuditEntry) {
        // A poisoned lock drops the entry.
        if let Ok(mut guard) = self.entries.write() {
            guard.push(entry);
        }
    }
}

/// Forwards entries to `tracing` as structured `info` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, entry: AuditEntry) {
        tracing::info!(
            target: "shelfwise::audit",
            audit_id = %entry.id,
            actor = %entry.actor,
            action = %entry.action,
            product_id = ?entry.product_id,
            product_name = ?entry.product_name,
            order_id = ?entry.order_id,
            "{}",
            entry.details
        );
    }
}

/// Fan an entry out to two sinks.
impl<A, B> AuditSink for (A, B)
where
    A: AuditSink,
    B: AuditSink,
{
    fn record(&self, entry: AuditEntry) {
        self.0.record(entry.clone());
        self.1.record(entry);
    }
}
