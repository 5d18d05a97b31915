use serde_json::Value;

use crate::collaborator::ResourceDirectory;
use crate::context::AdmittedRequest;
use crate::error::HandlerError;
use crate::request::Verb;

/// A handler body that runs after admission.
///
/// The handler names the route binding it serves. It only ever sees an
/// [`AdmittedRequest`], so its arguments are validated and its principal has
/// already satisfied the route's policy.
///
/// # Examples
///
/// ```
/// use admission_core::{require_arg, require_found, AdmittedRequest, Handler, HandlerError, ResourceDirectory};
/// use serde_json::{json, Value};
///
/// struct ProfileExists;
///
/// impl Handler for ProfileExists {
///     fn route(&self) -> &str {
///         "/profile/<username>"
///     }
///
///     fn handle(
///         &self,
///         request: &AdmittedRequest,
///         directory: &dyn ResourceDirectory,
///     ) -> Result<Value, HandlerError> {
///         let username = require_arg(request, "username")?;
///         require_found(directory.lookup_by_username(username), "profile")?;
///         Ok(json!({}))
///     }
/// }
/// ```
pub trait Handler {
    /// Route pattern this handler is bound to.
    fn route(&self) -> &str;

    /// Verb this handler serves.
    fn verb(&self) -> Verb {
        Verb::Get
    }

    /// Runs the handler body.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::NotFound`] when a looked-up resource is absent.
    fn handle(
        &self,
        request: &AdmittedRequest,
        directory: &dyn ResourceDirectory,
    ) -> Result<Value, HandlerError>;
}

/// Turns an entity-or-absent lookup into a value or a not-found failure.
///
/// `resource` is used for logs only and never reaches the client.
pub fn require_found<T>(found: Option<T>, resource: impl Into<String>) -> Result<T, HandlerError> {
    found.ok_or_else(|| HandlerError::not_found(resource))
}

/// Reads a string argument the route's schema declares as required.
///
/// A missing argument means the handler is bound to the wrong schema. It is
/// logged as an error and reported as not found, never looked up as `""`.
pub fn require_arg<'a>(request: &'a AdmittedRequest, name: &str) -> Result<&'a str, HandlerError> {
    match request.args().get_str(name) {
        Some(value) => Ok(value),
        None => {
            request
                .log()
                .error(format_args!("handler read undeclared argument '{}'", name));
            Err(HandlerError::not_found(format!("argument '{}'", name)))
        }
    }
}
