//! Audit destinations.

use super::AuditEvent;

/// A destination for admission audit events.
///
/// Sinks are shared between concurrent requests, so `record` takes `&self`.
pub trait AuditSink {
    /// Records one event.
    fn record(&self, event: &AuditEvent);
}

/// Emits audit events through the tracing infrastructure.
///
/// Each event becomes an `info` record on the `admission_audit` target with
/// one field per event attribute.
///
/// # Example
///
/// ```
/// use admission_core::audit::{AuditEvent, AuditSink, TracingAuditSink};
/// use admission_core::Verb;
///
/// let sink = TracingAuditSink;
/// sink.record(&AuditEvent::admitted("req-1", "/account", Verb::Get, "u1"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) {
        tracing::info!(
            target: "admission_audit",
            request_id = %event.request_id(),
            route = %event.route(),
            verb = %event.verb(),
            principal = %event.principal(),
            outcome = %event.outcome(),
            error_kind = ?event.error_kind().map(|k| k.as_str()),
            "audit event"
        );
    }
}
