//! Audit event schema.

use std::fmt;

use crate::error::ErrorKind;
use crate::request::Verb;

/// Outcome of an admission decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// The request proceeded to its handler
    Admitted,
    /// The request was rejected
    Rejected,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOutcome::Admitted => write!(f, "admitted"),
            AuditOutcome::Rejected => write!(f, "rejected"),
        }
    }
}

/// A structured record of one admission decision.
///
/// # Safety Invariants
///
/// - No argument values, raw or validated
/// - No rejection details, only the error kind
/// - Only the route pattern, never a concrete request path
///
/// # Example
///
/// ```
/// use admission_core::audit::{AuditEvent, AuditOutcome};
/// use admission_core::{ErrorKind, Verb};
///
/// let event = AuditEvent::rejected("req-7", "/blog", Verb::Get, "<anonymous>", ErrorKind::Unauthenticated);
///
/// assert_eq!(event.outcome(), AuditOutcome::Rejected);
/// assert_eq!(event.error_kind(), Some(ErrorKind::Unauthenticated));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    request_id: String,
    route: String,
    verb: Verb,
    principal: String,
    outcome: AuditOutcome,
    error_kind: Option<ErrorKind>,
}

impl AuditEvent {
    /// Records an admitted request.
    pub fn admitted(
        request_id: impl Into<String>,
        route: impl Into<String>,
        verb: Verb,
        principal: impl Into<String>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            route: route.into(),
            verb,
            principal: principal.into(),
            outcome: AuditOutcome::Admitted,
            error_kind: None,
        }
    }

    /// Records a rejected request.
    pub fn rejected(
        request_id: impl Into<String>,
        route: impl Into<String>,
        verb: Verb,
        principal: impl Into<String>,
        kind: ErrorKind,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            route: route.into(),
            verb,
            principal: principal.into(),
            outcome: AuditOutcome::Rejected,
            error_kind: Some(kind),
        }
    }

    /// Returns the request identifier.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the route pattern.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Returns the verb.
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Returns the principal label (`<anonymous>` when there is no identity).
    pub fn principal(&self) -> &str {
        &self.principal
    }

    /// Returns the decision outcome.
    pub fn outcome(&self) -> AuditOutcome {
        self.outcome
    }

    /// Returns the rejection kind, for rejected requests.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AuditEvent[outcome={}, request_id={}, verb={}, route={}, principal={}",
            self.outcome, self.request_id, self.verb, self.route, self.principal
        )?;
        if let Some(kind) = self.error_kind {
            write!(f, ", error_kind={}", kind)?;
        }
        write!(f, "]")
    }
}
