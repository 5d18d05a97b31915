//! In-memory audit trail recorder.

use std::sync::{Mutex, MutexGuard};

use super::{AuditEvent, AuditSink};

/// In-memory recorder for audit events.
///
/// Events are kept in the order they were recorded. The trail is `Sync`, so
/// one instance can be shared by every request of a pipeline.
///
/// # Example
///
/// ```
/// use admission_core::audit::{AuditEvent, AuditSink, AuditTrail};
/// use admission_core::Verb;
///
/// let trail = AuditTrail::new();
/// trail.record(&AuditEvent::admitted("req-123", "/account", Verb::Get, "u1"));
///
/// assert_eq!(trail.events().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct AuditTrail {
    events: Mutex<Vec<AuditEvent>>,
}

impl AuditTrail {
    /// Creates a new empty audit trail.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<AuditEvent>> {
        // Pushing a cloned event cannot leave the vector half-written.
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns a snapshot of all recorded events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.lock().clone()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Clears all recorded events.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl AuditSink for AuditTrail {
    fn record(&self, event: &AuditEvent) {
        self.lock().push(event.clone());
    }
}
