use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::collaborator::RoleDirectory;

/// HTTP verb a schema and policy are declared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verb {
    /// HTTP GET method
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP DELETE method
    Delete,
    /// HTTP PATCH method
    Patch,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verb::Get => write!(f, "GET"),
            Verb::Post => write!(f, "POST"),
            Verb::Put => write!(f, "PUT"),
            Verb::Delete => write!(f, "DELETE"),
            Verb::Patch => write!(f, "PATCH"),
        }
    }
}

/// Error returned when a string is not a supported verb.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported HTTP verb '{0}'")]
pub struct ParseVerbError(String);

impl FromStr for Verb {
    type Err = ParseVerbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Verb::Get),
            "POST" => Ok(Verb::Post),
            "PUT" => Ok(Verb::Put),
            "DELETE" => Ok(Verb::Delete),
            "PATCH" => Ok(Verb::Patch),
            _ => Err(ParseVerbError(s.to_string())),
        }
    }
}

/// Elevated roles a principal may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Manages release and job tooling
    ReleaseCoordinator,
    /// Administers the blog
    BlogAdmin,
    /// Writes and edits blog posts
    BlogPostEditor,
    /// Administers curriculum content
    CurriculumAdmin,
    /// Moderates community content
    Moderator,
}

impl Role {
    /// Every role, in a stable order.
    pub const ALL: [Role; 5] = [
        Role::ReleaseCoordinator,
        Role::BlogAdmin,
        Role::BlogPostEditor,
        Role::CurriculumAdmin,
        Role::Moderator,
    ];

    /// Returns the canonical role identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::ReleaseCoordinator => "RELEASE_COORDINATOR",
            Role::BlogAdmin => "BLOG_ADMIN",
            Role::BlogPostEditor => "BLOG_POST_EDITOR",
            Role::CurriculumAdmin => "CURRICULUM_ADMIN",
            Role::Moderator => "MODERATOR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The calling identity, resolved upstream of admission.
///
/// Exactly one variant is active for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// No identity
    Anonymous,
    /// A signed-in user without elevated roles
    AuthenticatedUser {
        /// User identifier
        id: String,
    },
    /// A signed-in user holding one or more elevated roles
    ElevatedRole {
        /// User identifier
        id: String,
        /// Roles held by the user
        roles: BTreeSet<Role>,
    },
}

impl Principal {
    /// Convenience constructor for an authenticated user.
    pub fn user(id: impl Into<String>) -> Self {
        Principal::AuthenticatedUser { id: id.into() }
    }

    /// Convenience constructor for a user with elevated roles.
    ///
    /// An empty role set produces a plain `AuthenticatedUser`.
    pub fn elevated(id: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        let roles: BTreeSet<Role> = roles.into_iter().collect();
        if roles.is_empty() {
            Principal::AuthenticatedUser { id: id.into() }
        } else {
            Principal::ElevatedRole {
                id: id.into(),
                roles,
            }
        }
    }

    /// Builds the principal for an upstream-authenticated user id.
    ///
    /// `None` yields `Anonymous`. Otherwise every known role is checked
    /// against the directory.
    pub fn resolve(user_id: Option<&str>, directory: &dyn RoleDirectory) -> Self {
        match user_id {
            None => Principal::Anonymous,
            Some(id) => Principal::elevated(
                id,
                Role::ALL
                    .into_iter()
                    .filter(|role| directory.has_role(id, *role)),
            ),
        }
    }

    /// Returns the user id, if the principal has one.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Principal::Anonymous => None,
            Principal::AuthenticatedUser { id } | Principal::ElevatedRole { id, .. } => Some(id),
        }
    }

    /// Returns `true` if the principal carries an identity.
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Principal::Anonymous)
    }

    /// Returns `true` if the principal holds `role`.
    pub fn has_role(&self, role: Role) -> bool {
        matches!(self, Principal::ElevatedRole { roles, .. } if roles.contains(&role))
    }

    /// Short label for logs and audit events.
    pub fn label(&self) -> &str {
        self.user_id().unwrap_or("<anonymous>")
    }
}

/// Metadata about an incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMeta {
    /// Unique identifier for this request
    pub request_id: String,
    /// The calling identity
    pub principal: Principal,
}
