use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::args::RawArgs;
use crate::audit::{AuditEvent, AuditSink};
use crate::collaborator::MembershipDirectory;
use crate::config::FeatureFlagStore;
use crate::context::AdmittedRequest;
use crate::error::{ConfigError, Rejection};
use crate::policy::{self, PolicyEnv};
use crate::registry::RouteRegistry;
use crate::request::{Principal, RequestMeta, Verb};

/// Result of admitting one request.
#[derive(Debug, Clone, PartialEq)]
pub enum AdmissionOutcome {
    /// Validation and the capability check passed.
    Proceed(AdmittedRequest),
    /// The request stops here with a client-visible error.
    Reject(Rejection),
}

impl AdmissionOutcome {
    /// Returns `true` for `Proceed`.
    pub fn is_proceed(&self) -> bool {
        matches!(self, AdmissionOutcome::Proceed(_))
    }

    /// Returns the rejection, if any.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            AdmissionOutcome::Proceed(_) => None,
            AdmissionOutcome::Reject(rejection) => Some(rejection),
        }
    }

    /// Converts into a `Result` for `?`-style handling.
    pub fn into_result(self) -> Result<AdmittedRequest, Rejection> {
        match self {
            AdmissionOutcome::Proceed(request) => Ok(request),
            AdmissionOutcome::Reject(rejection) => Err(rejection),
        }
    }
}

/// The admission gate in front of every handler.
///
/// `AdmissionPipeline` is the only way to obtain an [`AdmittedRequest`].
/// For each request it looks up the route binding, validates the raw
/// arguments against the bound schema, and only then evaluates the bound
/// policy against the validated arguments and a fresh feature flag snapshot.
///
/// The pipeline holds only shared read-only state and is `Send + Sync`.
///
/// # Examples
///
/// ```
/// use admission_core::{
///     AdmissionPipeline, CapabilityPolicy, ErrorKind, FeatureFlagStore,
///     InMemoryDirectory, Principal, RawArgs, RequestSchema, RouteRegistry, Verb,
/// };
/// use std::sync::Arc;
///
/// let registry = RouteRegistry::builder()
///     .register(
///         "/account",
///         Verb::Get,
///         RequestSchema::empty(),
///         CapabilityPolicy::RequiresAuthenticatedUser,
///     )
///     .build()
///     .unwrap();
/// let pipeline = AdmissionPipeline::new(
///     Arc::new(registry),
///     Arc::new(FeatureFlagStore::default()),
///     Arc::new(InMemoryDirectory::new()),
/// );
///
/// let outcome = pipeline
///     .admit("/account", Verb::Get, &RawArgs::new(), Principal::Anonymous)
///     .unwrap();
/// assert_eq!(outcome.rejection().unwrap().kind(), ErrorKind::Unauthenticated);
///
/// let outcome = pipeline
///     .admit("/account", Verb::Get, &RawArgs::new(), Principal::user("u1"))
///     .unwrap();
/// assert!(outcome.is_proceed());
/// ```
#[derive(Clone)]
pub struct AdmissionPipeline {
    registry: Arc<RouteRegistry>,
    flags: Arc<FeatureFlagStore>,
    memberships: Arc<dyn MembershipDirectory + Send + Sync>,
    audit: Option<Arc<dyn AuditSink + Send + Sync>>,
}

impl AdmissionPipeline {
    /// Creates a pipeline over a frozen registry and shared collaborators.
    pub fn new(
        registry: Arc<RouteRegistry>,
        flags: Arc<FeatureFlagStore>,
        memberships: Arc<dyn MembershipDirectory + Send + Sync>,
    ) -> Self {
        Self {
            registry,
            flags,
            memberships,
            audit: None,
        }
    }

    /// Records every admission decision into `sink`.
    pub fn with_audit(mut self, sink: Arc<dyn AuditSink + Send + Sync>) -> Self {
        self.audit = Some(sink);
        self
    }

    /// Returns the route registry.
    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// Returns the feature flag store, for administrative updates.
    pub fn flags(&self) -> &FeatureFlagStore {
        &self.flags
    }

    /// Admits a request under a freshly generated request id.
    ///
    /// Each call draws a new `req-N` id, so two identical calls differ in
    /// [`AdmittedRequest::request_id`]. Use [`admit_request`](Self::admit_request)
    /// with a caller-supplied [`RequestMeta`] for repeatable outcomes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnregisteredRoute`] if nothing is bound to
    /// `route` and `verb`. Client errors are never `Err`; they come back as
    /// [`AdmissionOutcome::Reject`].
    pub fn admit(
        &self,
        route: &str,
        verb: Verb,
        raw: &RawArgs,
        principal: Principal,
    ) -> Result<AdmissionOutcome, ConfigError> {
        let meta = RequestMeta {
            request_id: next_request_id(),
            principal,
        };
        self.admit_request(route, verb, raw, meta)
    }

    /// Admits a request whose id and principal were resolved upstream.
    ///
    /// The outcome depends only on the arguments, the registry and the
    /// current flag snapshot: identical inputs give equal outcomes.
    ///
    /// # Errors
    ///
    /// Same as [`admit`](Self::admit).
    pub fn admit_request(
        &self,
        route: &str,
        verb: Verb,
        raw: &RawArgs,
        meta: RequestMeta,
    ) -> Result<AdmissionOutcome, ConfigError> {
        let span = tracing::info_span!(
            "admission",
            route = %route,
            verb = %verb,
            request_id = %meta.request_id,
        );
        let _enter = span.enter();

        let binding = self.registry.lookup(route, verb)?;

        let args = match binding.schema().validate(raw) {
            Ok(args) => args,
            Err(err) => {
                tracing::debug!(argument = %err.argument(), "argument validation failed");
                return Ok(self.reject(route, verb, &meta, err.into()));
            }
        };
        tracing::debug!(arguments = args.len(), "arguments validated");

        // One snapshot for the whole check, even if an admin flips a flag meanwhile.
        let flags = self.flags.snapshot();
        let env = PolicyEnv {
            features: &*flags,
            memberships: &*self.memberships,
        };
        if let Some(rejection) =
            policy::check(binding.policy(), &meta.principal, &args, env).into_rejection()
        {
            return Ok(self.reject(route, verb, &meta, rejection));
        }

        tracing::info!(principal = %meta.principal.label(), "request admitted");
        if let Some(sink) = &self.audit {
            sink.record(&AuditEvent::admitted(
                &meta.request_id,
                route,
                verb,
                meta.principal.label(),
            ));
        }
        Ok(AdmissionOutcome::Proceed(AdmittedRequest::new(
            meta.request_id,
            route.to_string(),
            verb,
            meta.principal,
            args,
        )))
    }

    fn reject(
        &self,
        route: &str,
        verb: Verb,
        meta: &RequestMeta,
        rejection: Rejection,
    ) -> AdmissionOutcome {
        tracing::warn!(
            error_kind = %rejection.kind(),
            status = rejection.status().as_u16(),
            "request rejected"
        );
        if let Some(sink) = &self.audit {
            sink.record(&AuditEvent::rejected(
                &meta.request_id,
                route,
                verb,
                meta.principal.label(),
                rejection.kind(),
            ));
        }
        AdmissionOutcome::Reject(rejection)
    }
}

impl fmt::Debug for AdmissionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdmissionPipeline")
            .field("routes", &self.registry.len())
            .field("flags", &self.flags.snapshot())
            .field("audited", &self.audit.is_some())
            .finish_non_exhaustive()
    }
}

fn next_request_id() -> String {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    format!("req-{}", NEXT.fetch_add(1, Ordering::Relaxed))
}
