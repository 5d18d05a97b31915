//! Request adapter for mapping HTTP requests to admission inputs.

use std::collections::HashMap;

use crate::args::RawArgs;
use crate::collaborator::RoleDirectory;
use crate::request::{Principal, RequestMeta};

use super::{ExtractMetadata, ExtractRawArgs};

/// Adapter for converting framework-specific HTTP requests into admission inputs.
///
/// `RequestAdapter` is the primary integration point between web frameworks
/// and this crate. It holds simple, owned data (request id, the principal
/// resolved by upstream authentication, and the raw path and query
/// parameters) so it is not coupled to any framework's request types.
/// Framework-specific code should implement `From<FrameworkRequest>` for it.
///
/// # Examples
///
/// ```
/// use admission_core::web::{ExtractMetadata, ExtractRawArgs, RequestAdapter};
/// use admission_core::Principal;
///
/// let mut adapter = RequestAdapter::new("req-12345");
/// adapter.set_principal(Principal::user("uid-alice"));
/// adapter.add_query_param("classroom_url_fragment", "math");
///
/// let meta = adapter.extract_metadata();
/// assert_eq!(meta.request_id, "req-12345");
///
/// let raw = adapter.extract_raw_args();
/// assert!(raw.contains_query("classroom_url_fragment"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestAdapter {
    request_id: String,
    principal: Principal,
    query_params: HashMap<String, String>,
    path_params: HashMap<String, String>,
}

impl RequestAdapter {
    /// Creates an anonymous request adapter with the given request ID.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            principal: Principal::Anonymous,
            query_params: HashMap::new(),
            path_params: HashMap::new(),
        }
    }

    /// Sets the principal resolved by upstream authentication.
    pub fn set_principal(&mut self, principal: Principal) {
        self.principal = principal;
    }

    /// Resolves and sets the principal for an authenticated user id.
    pub fn authenticate(&mut self, user_id: Option<&str>, roles: &dyn RoleDirectory) {
        self.principal = Principal::resolve(user_id, roles);
    }

    /// Adds a query or body parameter.
    pub fn add_query_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query_params.insert(key.into(), value.into());
    }

    /// Adds a path parameter captured by the router.
    pub fn add_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.path_params.insert(key.into(), value.into());
    }

    /// Returns a reference to the request ID.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns a reference to the principal.
    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}

impl ExtractMetadata for RequestAdapter {
    fn extract_metadata(&self) -> RequestMeta {
        RequestMeta {
            request_id: self.request_id.clone(),
            principal: self.principal.clone(),
        }
    }
}

impl ExtractRawArgs for RequestAdapter {
    fn extract_raw_args(&self) -> RawArgs {
        let mut raw = RawArgs::new();
        for (k, v) in &self.path_params {
            raw.insert_path(k.as_str(), v.as_str());
        }
        for (k, v) in &self.query_params {
            raw.insert_query(k.as_str(), v.as_str());
        }
        raw
    }
}
