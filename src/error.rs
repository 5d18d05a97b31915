use std::fmt;

use http::StatusCode;

use crate::request::Verb;

/// The kind of a request-level rejection.
///
/// Every reject produced by admission or by a handler body carries exactly one
/// of these kinds, and each kind maps to a single HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required argument was absent
    MissingArgument,
    /// An argument failed type coercion or one of its validators
    InvalidArgument,
    /// The principal carries no identity but one is required
    Unauthenticated,
    /// The principal is authenticated but lacks a required role
    Forbidden,
    /// The resource or feature is absent, or deliberately hidden
    NotFound,
}

impl ErrorKind {
    /// Returns the HTTP status this kind is rendered with.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::MissingArgument | ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Returns the stable snake_case name used in response bodies and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::MissingArgument => "missing_argument",
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
        }
    }

    /// Returns `true` for kinds produced by the schema validator.
    pub fn is_validation(self) -> bool {
        matches!(self, ErrorKind::MissingArgument | ErrorKind::InvalidArgument)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A terminal, request-level rejection with details about what failed.
///
/// The `detail` is meant for logs and for client-correctable errors; the
/// response layer decides how much of it reaches the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct Rejection {
    kind: ErrorKind,
    detail: String,
}

impl Rejection {
    /// Creates a new rejection.
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Returns the rejection kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable detail.
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Returns the HTTP status for this rejection.
    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }
}

/// Failure produced by the schema validator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required argument was absent from the raw request.
    #[error("missing required argument '{name}'")]
    MissingArgument {
        /// Name of the absent argument
        name: String,
    },
    /// An argument could not be coerced or failed a validator.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the offending argument
        name: String,
        /// Why it was rejected (never contains the raw value)
        reason: String,
    },
}

impl ValidationError {
    /// Returns the matching rejection kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::MissingArgument { .. } => ErrorKind::MissingArgument,
            ValidationError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
        }
    }

    /// Returns the name of the argument that failed.
    pub fn argument(&self) -> &str {
        match self {
            ValidationError::MissingArgument { name }
            | ValidationError::InvalidArgument { name, .. } => name,
        }
    }
}

impl From<ValidationError> for Rejection {
    fn from(err: ValidationError) -> Self {
        Rejection::new(err.kind(), err.to_string())
    }
}

/// Failure raised by a handler body after admission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    /// A looked-up resource does not exist.
    #[error("{resource} not found")]
    NotFound {
        /// What was looked up, for logs only
        resource: String,
    },
}

impl HandlerError {
    /// Creates a not-found signal for the named resource.
    pub fn not_found(resource: impl Into<String>) -> Self {
        HandlerError::NotFound {
            resource: resource.into(),
        }
    }
}

impl From<HandlerError> for Rejection {
    fn from(err: HandlerError) -> Self {
        match err {
            HandlerError::NotFound { .. } => Rejection::new(ErrorKind::NotFound, err.to_string()),
        }
    }
}

/// Configuration errors detected while declaring schemas, policies or routes.
///
/// These are fatal startup/deployment errors and are never turned into a
/// per-request response.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No binding exists for the requested route and verb.
    #[error("no admission binding registered for {verb} {route}")]
    UnregisteredRoute {
        /// Route pattern that was looked up
        route: String,
        /// Verb that was looked up
        verb: Verb,
    },
    /// The same route and verb were registered twice.
    #[error("duplicate admission binding for {verb} {route}")]
    DuplicateRoute {
        /// Route pattern
        route: String,
        /// Verb
        verb: Verb,
    },
    /// A schema declares the same argument name more than once.
    #[error("argument '{name}' is declared more than once")]
    DuplicateArgument {
        /// Duplicated argument name
        name: String,
    },
    /// Path arguments in a schema do not match the route's placeholders.
    #[error("path arguments do not match route pattern: {detail}")]
    PathArgumentMismatch {
        /// Which placeholder or argument is unmatched
        detail: String,
    },
    /// A path argument was declared optional.
    #[error("path argument '{name}' must be required")]
    OptionalPathArgument {
        /// Argument name
        name: String,
    },
    /// A regex validator could not be compiled.
    #[error("invalid regex for argument '{name}'")]
    InvalidRegex {
        /// Argument name
        name: String,
        /// Underlying compile error
        #[source]
        source: regex::Error,
    },
    /// A validator was attached to an argument type it cannot check.
    #[error("validator '{validator}' cannot apply to '{arg_type}' argument '{name}'")]
    IncompatibleValidator {
        /// Argument name
        name: String,
        /// Validator identifier
        validator: &'static str,
        /// Declared type tag
        arg_type: &'static str,
    },
    /// A numeric validator was declared with a NaN bound.
    #[error("validator '{validator}' on argument '{name}' has a NaN bound")]
    InvalidBound {
        /// Argument name
        name: String,
        /// Validator identifier
        validator: &'static str,
    },
    /// A declared default does not satisfy the argument's own schema.
    #[error("default for argument '{name}' is invalid: {reason}")]
    InvalidDefault {
        /// Argument name
        name: String,
        /// Why the default was rejected
        reason: String,
    },
    /// A policy reads an argument that the schema does not declare.
    #[error("policy refers to undeclared argument '{name}'")]
    UnknownPolicyArgument {
        /// Argument name
        name: String,
    },
    /// A policy reads an argument that may be absent after validation.
    #[error("policy refers to optional argument '{name}' without a default")]
    OptionalPolicyArgument {
        /// Argument name
        name: String,
    },
    /// An `AnyOf` policy with no alternatives can never allow.
    #[error("AnyOf policy must have at least one alternative")]
    EmptyAnyOf,
    /// Feature flags could not be parsed from JSON.
    #[error("invalid feature flag document")]
    InvalidFlagDocument(#[source] serde_json::Error),
    /// A feature flag environment variable held an unrecognised value.
    #[error("invalid value '{value}' for feature flag variable {var}")]
    InvalidFlagValue {
        /// Environment variable name
        var: String,
        /// Offending value
        value: String,
    },
    /// Wraps an error with the route it was detected on.
    #[error("{verb} {route}: {source}")]
    InRoute {
        /// Route pattern
        route: String,
        /// Verb
        verb: Verb,
        /// Underlying error
        #[source]
        source: Box<ConfigError>,
    },
}
