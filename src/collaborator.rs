//! Domain collaborators consumed by admission and handler bodies.
//!
//! These traits are the only view this crate has of the domain services that
//! answer existence, membership, role and feature questions. Implementations
//! live elsewhere; [`InMemoryDirectory`] is provided for tests and demos.

use std::collections::HashSet;
use std::fmt;

use crate::request::Role;

/// Kinds of resource addressed by a URL fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// A classroom page
    Classroom,
    /// A blog post
    BlogPost,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentKind::Classroom => write!(f, "classroom"),
            FragmentKind::BlogPost => write!(f, "blog post"),
        }
    }
}

/// A resource found by URL fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Kind of resource
    pub kind: FragmentKind,
    /// Stable identifier
    pub id: String,
    /// URL fragment the resource is published under
    pub url_fragment: String,
}

/// A user's public settings, found by username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSettings {
    /// Stable user identifier
    pub user_id: String,
    /// Public username
    pub username: String,
}

/// Existence lookups used by handler bodies.
pub trait ResourceDirectory {
    /// Finds a resource of `kind` published under `fragment`.
    fn lookup_by_fragment(&self, kind: FragmentKind, fragment: &str) -> Option<Entity>;

    /// Finds a user by username.
    fn lookup_by_username(&self, username: &str) -> Option<UserSettings>;
}

/// Group membership, used by relation policies.
pub trait MembershipDirectory {
    /// Returns `true` if `user_id` belongs to `group_id`.
    fn is_member(&self, user_id: &str, group_id: &str) -> bool;
}

/// Process-wide feature switches.
pub trait FeatureGate {
    /// Returns `true` if `flag` is enabled.
    fn is_feature_enabled(&self, flag: &str) -> bool;
}

/// Role assignments, used to resolve principals.
pub trait RoleDirectory {
    /// Returns `true` if `user_id` holds `role`.
    fn has_role(&self, user_id: &str, role: Role) -> bool;
}

/// In-memory collaborator backing all lookups.
///
/// # Examples
///
/// ```
/// use admission_core::{FragmentKind, InMemoryDirectory, MembershipDirectory, ResourceDirectory};
///
/// let directory = InMemoryDirectory::new()
///     .with_entity(FragmentKind::Classroom, "classroom-1", "math")
///     .with_user("uid-alice", "alice")
///     .with_member("uid-alice", "abcDEF123456");
///
/// assert!(directory.lookup_by_fragment(FragmentKind::Classroom, "math").is_some());
/// assert!(directory.lookup_by_username("bob").is_none());
/// assert!(directory.is_member("uid-alice", "abcDEF123456"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    entities: Vec<Entity>,
    users: Vec<UserSettings>,
    memberships: HashSet<(String, String)>,
    roles: HashSet<(String, Role)>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource published under `url_fragment`.
    pub fn with_entity(
        mut self,
        kind: FragmentKind,
        id: impl Into<String>,
        url_fragment: impl Into<String>,
    ) -> Self {
        self.entities.push(Entity {
            kind,
            id: id.into(),
            url_fragment: url_fragment.into(),
        });
        self
    }

    /// Adds a user.
    pub fn with_user(mut self, user_id: impl Into<String>, username: impl Into<String>) -> Self {
        self.users.push(UserSettings {
            user_id: user_id.into(),
            username: username.into(),
        });
        self
    }

    /// Records that `user_id` belongs to `group_id`.
    pub fn with_member(mut self, user_id: impl Into<String>, group_id: impl Into<String>) -> Self {
        self.memberships.insert((user_id.into(), group_id.into()));
        self
    }

    /// Grants `role` to `user_id`.
    pub fn with_role(mut self, user_id: impl Into<String>, role: Role) -> Self {
        self.roles.insert((user_id.into(), role));
        self
    }
}

impl ResourceDirectory for InMemoryDirectory {
    fn lookup_by_fragment(&self, kind: FragmentKind, fragment: &str) -> Option<Entity> {
        self.entities
            .iter()
            .find(|e| e.kind == kind && e.url_fragment == fragment)
            .cloned()
    }

    fn lookup_by_username(&self, username: &str) -> Option<UserSettings> {
        self.users.iter().find(|u| u.username == username).cloned()
    }
}

impl MembershipDirectory for InMemoryDirectory {
    fn is_member(&self, user_id: &str, group_id: &str) -> bool {
        self.memberships
            .contains(&(user_id.to_string(), group_id.to_string()))
    }
}

impl RoleDirectory for InMemoryDirectory {
    fn has_role(&self, user_id: &str, role: Role) -> bool {
        self.roles.contains(&(user_id.to_string(), role))
    }
}
