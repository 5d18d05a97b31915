//! Client-facing rendering of handler results and rejections.

use http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ErrorKind, Rejection};

/// Message shown for every `not_found` response.
///
/// Feature gates, membership checks and handler lookups all render with this
/// text so that clients cannot tell which one fired.
pub const NOT_FOUND_MESSAGE: &str = "The requested resource could not be found.";

/// JSON body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Snake-case error kind
    pub error: &'static str,
    /// Numeric HTTP status
    pub status_code: u16,
    /// Human-readable message
    pub message: String,
}

impl ErrorBody {
    /// Builds the body for `rejection`.
    pub fn from_rejection(rejection: &Rejection) -> Self {
        let message = match rejection.kind() {
            ErrorKind::NotFound => NOT_FOUND_MESSAGE.to_string(),
            _ => rejection.detail().to_string(),
        };
        Self {
            error: rejection.kind().as_str(),
            status_code: rejection.status().as_u16(),
            message,
        }
    }
}

/// A rendered response: status plus JSON body.
///
/// # Examples
///
/// ```
/// use admission_core::{ErrorKind, Rejection, Response};
///
/// let response = Response::from_rejection(&Rejection::new(ErrorKind::Forbidden, "role BLOG_ADMIN required"));
/// assert_eq!(response.status().as_u16(), 403);
/// assert_eq!(response.body()["error"], "forbidden");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: StatusCode,
    body: Value,
}

impl Response {
    /// A `200 OK` response with `body`.
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    /// A `200 OK` response with an empty JSON object.
    pub fn empty() -> Self {
        Self::ok(Value::Object(serde_json::Map::new()))
    }

    /// Renders `rejection` with its mapped status.
    pub fn from_rejection(rejection: &Rejection) -> Self {
        // Plain string and integer fields always serialize.
        let body = serde_json::to_value(ErrorBody::from_rejection(rejection)).unwrap_or_default();
        Self {
            status: rejection.status(),
            body,
        }
    }

    /// Returns the HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the JSON body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Serializes the body.
    pub fn body_string(&self) -> String {
        self.body.to_string()
    }
}
