//! Audit trail of admission decisions.
//!
//! This module provides:
//! - `AuditEvent`: Structured record of one admission decision
//! - `AuditSink`: Destination for audit events
//! - `AuditTrail`: In-memory, thread-safe recorder
//! - `TracingAuditSink`: Emits events as structured `tracing` records
//!
//! Audit events are safe by default: they carry argument-free metadata only,
//! so raw or validated request values never reach an audit destination.

mod event;
mod sink;
mod trail;

pub use event::{AuditEvent, AuditOutcome};
pub use sink::{AuditSink, TracingAuditSink};
pub use trail::AuditTrail;
