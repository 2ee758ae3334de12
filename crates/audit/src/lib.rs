//! Audit trail: what was done, by whom, to which product or order.
//!
//! Recording is fire-and-forget. A sink never reports failure back to the
//! operation that triggered it.

pub mod entry;
pub mod sink;

pub use entry::{AuditAction, AuditEntry};
pub use sink::{AuditSink, InMemoryAuditLog, TracingAuditSink};
