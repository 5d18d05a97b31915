use crate::args::ValidatedArgs;
use crate::logging::RequestLog;
use crate::request::{Principal, Verb};

/// A request that passed admission.
///
/// `AdmittedRequest` is the only thing a handler body receives. It carries
/// the validated arguments together with the principal that satisfied the
/// route's policy, so handlers never see raw input.
///
/// # Construction
///
/// `AdmittedRequest` cannot be constructed by user code. Use
/// [`AdmissionPipeline::admit`](crate::AdmissionPipeline::admit) to obtain one.
///
/// # Examples
///
/// ```
/// use admission_core::{
///     AdmissionOutcome, AdmissionPipeline, ArgSpec, ArgType, CapabilityPolicy,
///     FeatureFlagStore, InMemoryDirectory, Principal, RawArgs, RequestSchema,
///     RouteRegistry, Verb,
/// };
/// use std::sync::Arc;
///
/// let registry = RouteRegistry::builder()
///     .register(
///         "/profile/<username>",
///         Verb::Get,
///         RequestSchema::builder()
///             .arg(ArgSpec::path("username", ArgType::BaseString))
///             .build()
///             .unwrap(),
///         CapabilityPolicy::OpenAccess,
///     )
///     .build()
///     .unwrap();
/// let pipeline = AdmissionPipeline::new(
///     Arc::new(registry),
///     Arc::new(FeatureFlagStore::default()),
///     Arc::new(InMemoryDirectory::new()),
/// );
///
/// let raw = RawArgs::new().with_path("username", "alice");
/// let outcome = pipeline
///     .admit("/profile/<username>", Verb::Get, &raw, Principal::Anonymous)
///     .unwrap();
///
/// let AdmissionOutcome::Proceed(request) = outcome else { panic!("rejected") };
/// assert_eq!(request.args().get_str("username"), Some("alice"));
/// request.log().info(format_args!("looking up profile"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AdmittedRequest {
    request_id: String,
    route: String,
    verb: Verb,
    principal: Principal,
    args: ValidatedArgs,
}

impl AdmittedRequest {
    /// Only the pipeline builds admitted requests, after both checks pass.
    pub(crate) fn new(
        request_id: String,
        route: String,
        verb: Verb,
        principal: Principal,
        args: ValidatedArgs,
    ) -> Self {
        Self {
            request_id,
            route,
            verb,
            principal,
            args,
        }
    }

    /// Returns the request ID.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the route pattern the request was admitted for.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Returns the verb the request was admitted for.
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Returns the principal that satisfied the route's policy.
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Returns the validated arguments.
    pub fn args(&self) -> &ValidatedArgs {
        &self.args
    }

    /// Returns a logger stamped with this request's ID.
    pub fn log(&self) -> RequestLog<'_> {
        RequestLog::new(&self.request_id, &self.route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::RawArgs;
    use crate::schema::{ArgSpec, ArgType, RequestSchema};

    fn admitted(principal: Principal) -> AdmittedRequest {
        let schema = RequestSchema::builder()
            .arg(ArgSpec::query("tab", ArgType::BaseString).with_default("overview"))
            .build()
            .unwrap();
        let args = schema.validate(&RawArgs::new()).unwrap();
        AdmittedRequest::new(
            "req-1".to_string(),
            "/dashboard".to_string(),
            Verb::Get,
            principal,
            args,
        )
    }

    #[test]
    fn exposes_admission_inputs() {
        let request = admitted(Principal::user("u1"));
        assert_eq!(request.request_id(), "req-1");
        assert_eq!(request.route(), "/dashboard");
        assert_eq!(request.verb(), Verb::Get);
        assert_eq!(request.principal().user_id(), Some("u1"));
        assert_eq!(request.args().get_str("tab"), Some("overview"));
    }

    #[test]
    fn logger_carries_request_id() {
        let request = admitted(Principal::Anonymous);
        assert_eq!(request.log().request_id(), "req-1");
    }
}
