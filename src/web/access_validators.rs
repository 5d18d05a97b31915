//! Access-validation endpoints.
//!
//! Each endpoint answers a single question for the frontend ("may this
//! principal open this page?") with `200 {}` or an error response. All of
//! them are `GET` routes; their schemas and policies are declared in
//! [`register`], and their bodies only perform existence lookups.

use serde_json::Value;

use crate::collaborator::{FragmentKind, ResourceDirectory};
use crate::config::LEARNER_GROUPS_ARE_ENABLED;
use crate::context::AdmittedRequest;
use crate::error::{ConfigError, HandlerError};
use crate::handler::{require_arg, require_found, Handler};
use crate::policy::CapabilityPolicy;
use crate::registry::{RouteRegistry, RouteRegistryBuilder};
use crate::request::{Role, Verb};
use crate::schema::{ArgSpec, ArgType, RequestSchema, ValidatorSpec};

/// Format of learner group ids.
pub const LEARNER_GROUP_ID_REGEX: &str = "^[A-Za-z0-9]{12}$";

/// Classroom page, by URL fragment.
pub const CLASSROOM_ROUTE: &str = "/access_validation_handler/can_access_classroom_page";
/// Preferences page of the signed-in user.
pub const MANAGE_OWN_ACCOUNT_ROUTE: &str = "/access_validation_handler/can_manage_own_account";
/// Public profile page.
pub const PROFILE_ROUTE: &str = "/access_validation_handler/does_profile_exist/<username>";
/// Release coordinator page.
pub const RELEASE_COORDINATOR_ROUTE: &str =
    "/access_validation_handler/can_access_release_coordinator_page";
/// Learner group page.
pub const LEARNER_GROUP_ROUTE: &str =
    "/access_validation_handler/does_learner_group_exist/<learner_group_id>";
/// Blog home page.
pub const BLOG_HOME_ROUTE: &str = "/access_validation_handler/can_access_blog_home_page";
/// Blog post page, by URL fragment.
pub const BLOG_POST_ROUTE: &str = "/access_validation_handler/can_access_blog_post_page";

fn blog_dashboard_policy() -> CapabilityPolicy {
    CapabilityPolicy::all_of([
        CapabilityPolicy::RequiresAuthenticatedUser,
        CapabilityPolicy::any_of([
            CapabilityPolicy::RequiresRole(Role::BlogAdmin),
            CapabilityPolicy::RequiresRole(Role::BlogPostEditor),
        ]),
    ])
}

fn single_query_arg(name: &str) -> Result<RequestSchema, ConfigError> {
    RequestSchema::builder()
        .arg(ArgSpec::query(name, ArgType::BaseString))
        .build()
}

/// Adds every access-validation binding to `builder`.
///
/// # Errors
///
/// Returns a [`ConfigError`] if one of the schemas fails to compile.
pub fn register(builder: RouteRegistryBuilder) -> Result<RouteRegistryBuilder, ConfigError> {
    let learner_group = RequestSchema::builder()
        .arg(
            ArgSpec::path("learner_group_id", ArgType::BaseString)
                .validate(ValidatorSpec::IsRegexMatched(LEARNER_GROUP_ID_REGEX.to_string())),
        )
        .build()?;
    let profile = RequestSchema::builder()
        .arg(ArgSpec::path("username", ArgType::BaseString))
        .build()?;

    Ok(builder
        .register(
            CLASSROOM_ROUTE,
            Verb::Get,
            single_query_arg("classroom_url_fragment")?,
            CapabilityPolicy::OpenAccess,
        )
        .register(
            MANAGE_OWN_ACCOUNT_ROUTE,
            Verb::Get,
            RequestSchema::empty(),
            CapabilityPolicy::RequiresAuthenticatedUser,
        )
        .register(PROFILE_ROUTE, Verb::Get, profile, CapabilityPolicy::OpenAccess)
        .register(
            RELEASE_COORDINATOR_ROUTE,
            Verb::Get,
            RequestSchema::empty(),
            CapabilityPolicy::all_of([
                CapabilityPolicy::RequiresAuthenticatedUser,
                CapabilityPolicy::RequiresRole(Role::ReleaseCoordinator),
            ]),
        )
        .register(
            LEARNER_GROUP_ROUTE,
            Verb::Get,
            learner_group,
            CapabilityPolicy::all_of([
                CapabilityPolicy::RequiresAuthenticatedUser,
                CapabilityPolicy::requires_flag(LEARNER_GROUPS_ARE_ENABLED),
                CapabilityPolicy::member_of_group("learner_group_id"),
            ]),
        )
        .register(
            BLOG_HOME_ROUTE,
            Verb::Get,
            RequestSchema::empty(),
            blog_dashboard_policy(),
        )
        .register(
            BLOG_POST_ROUTE,
            Verb::Get,
            single_query_arg("blog_post_url_fragment")?,
            blog_dashboard_policy(),
        ))
}

/// A registry holding only the access-validation bindings.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the bindings are inconsistent.
pub fn registry() -> Result<RouteRegistry, ConfigError> {
    register(RouteRegistry::builder())?.build()
}

/// Every access-validation handler, in registration order.
pub fn handlers() -> Vec<Box<dyn Handler + Send + Sync>> {
    vec![
        Box::new(ClassroomAccess),
        Box::new(ManageOwnAccount),
        Box::new(ProfileExists),
        Box::new(ReleaseCoordinatorAccess),
        Box::new(LearnerGroupExists),
        Box::new(BlogHomePageAccess),
        Box::new(BlogPostPageAccess),
    ]
}

fn accepted() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Checks that the classroom named by `classroom_url_fragment` exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassroomAccess;

impl Handler for ClassroomAccess {
    fn route(&self) -> &str {
        CLASSROOM_ROUTE
    }

    fn handle(
        &self,
        request: &AdmittedRequest,
        directory: &dyn ResourceDirectory,
    ) -> Result<Value, HandlerError> {
        let fragment = require_arg(request, "classroom_url_fragment")?;
        require_found(
            directory.lookup_by_fragment(FragmentKind::Classroom, fragment),
            "classroom",
        )?;
        Ok(accepted())
    }
}

/// Any signed-in user may manage their own account.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManageOwnAccount;

impl Handler for ManageOwnAccount {
    fn route(&self) -> &str {
        MANAGE_OWN_ACCOUNT_ROUTE
    }

    fn handle(&self, _: &AdmittedRequest, _: &dyn ResourceDirectory) -> Result<Value, HandlerError> {
        Ok(accepted())
    }
}

/// Checks that a user with the given username exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileExists;

impl Handler for ProfileExists {
    fn route(&self) -> &str {
        PROFILE_ROUTE
    }

    fn handle(
        &self,
        request: &AdmittedRequest,
        directory: &dyn ResourceDirectory,
    ) -> Result<Value, HandlerError> {
        let username = require_arg(request, "username")?;
        let settings = require_found(directory.lookup_by_username(username), "profile")?;
        request
            .log()
            .debug(format_args!("profile belongs to {}", settings.user_id));
        Ok(accepted())
    }
}

/// Release coordinators only; the policy does all the work.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseCoordinatorAccess;

impl Handler for ReleaseCoordinatorAccess {
    fn route(&self) -> &str {
        RELEASE_COORDINATOR_ROUTE
    }

    fn handle(&self, _: &AdmittedRequest, _: &dyn ResourceDirectory) -> Result<Value, HandlerError> {
        Ok(accepted())
    }
}

/// Learner group page.
///
/// Feature flag and membership are both enforced by the route policy, so a
/// disabled feature and a foreign group look the same to the client.
#[derive(Debug, Clone, Copy, Default)]
pub struct LearnerGroupExists;

impl Handler for LearnerGroupExists {
    fn route(&self) -> &str {
        LEARNER_GROUP_ROUTE
    }

    fn handle(&self, _: &AdmittedRequest, _: &dyn ResourceDirectory) -> Result<Value, HandlerError> {
        Ok(accepted())
    }
}

/// Blog home page, for blog admins and post editors.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlogHomePageAccess;

impl Handler for BlogHomePageAccess {
    fn route(&self) -> &str {
        BLOG_HOME_ROUTE
    }

    fn handle(&self, _: &AdmittedRequest, _: &dyn ResourceDirectory) -> Result<Value, HandlerError> {
        Ok(accepted())
    }
}

/// Checks that the blog post named by `blog_post_url_fragment` exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlogPostPageAccess;

impl Handler for BlogPostPageAccess {
    fn route(&self) -> &str {
        BLOG_POST_ROUTE
    }

    fn handle(
        &self,
        request: &AdmittedRequest,
        directory: &dyn ResourceDirectory,
    ) -> Result<Value, HandlerError> {
        let fragment = require_arg(request, "blog_post_url_fragment")?;
        require_found(
            directory.lookup_by_fragment(FragmentKind::BlogPost, fragment),
            "blog post",
        )?;
        Ok(accepted())
    }
}
