//! Request admission for HTTP handlers: schema validation, then capability
//! checks, then the handler body.
//!
//! Every route and verb is bound at startup to a declared [`RequestSchema`]
//! and a [`CapabilityPolicy`]. For each request the [`AdmissionPipeline`]:
//! - validates raw arguments against the schema (raw values are
//!   [`Tainted`] and unreadable until then),
//! - evaluates the policy against the validated arguments and a feature flag
//!   snapshot,
//! - hands an [`AdmittedRequest`] to the handler, or a typed [`Rejection`]
//!   to the caller.
//!
//! Authorization is never evaluated on unvalidated input, and every
//! `not_found` response is byte-identical whether a feature gate, a
//! membership check or a handler lookup produced it.
//!
//! # Core Types
//!
//! - [`RequestSchema`] / [`ArgSpec`]: Declared arguments and validators
//! - [`CapabilityPolicy`]: Policy value bound to a route
//! - [`RouteRegistry`]: Frozen table of route bindings
//! - [`AdmissionPipeline`]: The gate producing [`AdmissionOutcome`]s
//! - [`Handler`]: A handler body running on an [`AdmittedRequest`]
//!
//! # Examples
//!
//! ```
//! use admission_core::{
//!     AdmissionPipeline, ArgSpec, ArgType, CapabilityPolicy, ErrorKind, FeatureFlagStore,
//!     InMemoryDirectory, Principal, RawArgs, RequestSchema, RouteRegistry, Role, Verb,
//! };
//! use std::sync::Arc;
//!
//! let registry = RouteRegistry::builder()
//!     .register(
//!         "/release",
//!         Verb::Get,
//!         RequestSchema::empty(),
//!         CapabilityPolicy::RequiresRole(Role::ReleaseCoordinator),
//!     )
//!     .register(
//!         "/profile/<username>",
//!         Verb::Get,
//!         RequestSchema::builder()
//!             .arg(ArgSpec::path("username", ArgType::BaseString))
//!             .build()
//!             .expect("valid schema"),
//!         CapabilityPolicy::OpenAccess,
//!     )
//!     .build()
//!     .expect("consistent registry");
//!
//! let pipeline = AdmissionPipeline::new(
//!     Arc::new(registry),
//!     Arc::new(FeatureFlagStore::default()),
//!     Arc::new(InMemoryDirectory::new()),
//! );
//!
//! let outcome = pipeline
//!     .admit("/release", Verb::Get, &RawArgs::new(), Principal::user("u1"))
//!     .expect("route is registered");
//! assert_eq!(outcome.rejection().map(|r| r.kind()), Some(ErrorKind::Forbidden));
//!
//! let outcome = pipeline
//!     .admit("/profile/<username>", Verb::Get, &RawArgs::new(), Principal::Anonymous)
//!     .expect("route is registered");
//! assert_eq!(outcome.rejection().map(|r| r.kind()), Some(ErrorKind::MissingArgument));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod args;
pub mod audit;
mod collaborator;
mod config;
mod context;
mod error;
mod gate;
mod handler;
mod logging;
mod policy;
mod registry;
mod request;
mod response;
mod schema;
mod tainted;
pub mod web;

pub use args::{ArgLocation, ArgValue, RawArgs, ValidatedArgs};
pub use collaborator::{
    Entity, FeatureGate, FragmentKind, InMemoryDirectory, MembershipDirectory, ResourceDirectory,
    RoleDirectory, UserSettings,
};
pub use config::{FeatureFlagStore, FeatureFlags, FLAG_ENV_PREFIX, LEARNER_GROUPS_ARE_ENABLED};
pub use context::AdmittedRequest;
pub use error::{ConfigError, ErrorKind, HandlerError, Rejection, ValidationError};
pub use gate::{AdmissionOutcome, AdmissionPipeline};
pub use handler::{require_arg, require_found, Handler};
pub use logging::RequestLog;
pub use policy::{check, CapabilityPolicy, Decision, DenyReason, PolicyEnv, ResourceRelation};
pub use registry::{RouteBinding, RouteRegistry, RouteRegistryBuilder};
pub use request::{ParseVerbError, Principal, RequestMeta, Role, Verb};
pub use response::{ErrorBody, Response, NOT_FOUND_MESSAGE};
pub use schema::{ArgSpec, ArgType, RequestSchema, RequestSchemaBuilder, ValidatorSpec};
pub use tainted::Tainted;
