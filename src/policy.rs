//! Capability policies and the single function that evaluates them.

use std::fmt;

use crate::args::ValidatedArgs;
use crate::collaborator::{FeatureGate, MembershipDirectory};
use crate::error::{ConfigError, ErrorKind, Rejection};
use crate::request::{Principal, Role};
use crate::schema::RequestSchema;

/// A relation between the principal and a resource named by an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRelation {
    /// The principal is a member of the group whose id is in `group_arg`.
    MemberOfGroup {
        /// Validated argument holding the group id
        group_arg: String,
    },
}

impl ResourceRelation {
    /// Membership in the group named by `group_arg`.
    pub fn member_of_group(group_arg: impl Into<String>) -> Self {
        ResourceRelation::MemberOfGroup {
            group_arg: group_arg.into(),
        }
    }

    /// Name of the argument the relation reads.
    pub fn argument(&self) -> &str {
        match self {
            ResourceRelation::MemberOfGroup { group_arg } => group_arg,
        }
    }
}

/// A policy a route must satisfy before its handler runs.
///
/// Each route and verb binds exactly one top-level policy. Composite
/// variants let one policy express several requirements.
///
/// # Examples
///
/// ```
/// use admission_core::{CapabilityPolicy, ResourceRelation, Role};
///
/// let blog = CapabilityPolicy::all_of([
///     CapabilityPolicy::RequiresAuthenticatedUser,
///     CapabilityPolicy::any_of([
///         CapabilityPolicy::RequiresRole(Role::BlogAdmin),
///         CapabilityPolicy::RequiresRole(Role::BlogPostEditor),
///     ]),
/// ]);
/// assert!(matches!(blog, CapabilityPolicy::AllOf(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityPolicy {
    /// Always allows.
    OpenAccess,
    /// Allows any principal with an identity; denies as `Unauthenticated`.
    RequiresAuthenticatedUser,
    /// Allows principals holding the role; denies as `Forbidden`.
    RequiresRole(Role),
    /// Allows while the named flag is enabled; denies as `NotFound`.
    RequiresFeatureFlag(String),
    /// Allows when the relation holds; denies as `NotFound`.
    RequiresResourceRelation(ResourceRelation),
    /// Allows when every child allows; the first denial wins.
    AllOf(Vec<CapabilityPolicy>),
    /// Allows when any child allows; otherwise the first child's denial.
    AnyOf(Vec<CapabilityPolicy>),
}

impl CapabilityPolicy {
    /// Builds an `AllOf` policy.
    pub fn all_of(policies: impl IntoIterator<Item = CapabilityPolicy>) -> Self {
        CapabilityPolicy::AllOf(policies.into_iter().collect())
    }

    /// Builds an `AnyOf` policy.
    pub fn any_of(policies: impl IntoIterator<Item = CapabilityPolicy>) -> Self {
        CapabilityPolicy::AnyOf(policies.into_iter().collect())
    }

    /// Builds a feature flag policy.
    pub fn requires_flag(flag: impl Into<String>) -> Self {
        CapabilityPolicy::RequiresFeatureFlag(flag.into())
    }

    /// Builds a group membership policy reading `group_arg`.
    pub fn member_of_group(group_arg: impl Into<String>) -> Self {
        CapabilityPolicy::RequiresResourceRelation(ResourceRelation::member_of_group(group_arg))
    }

    /// Checks the policy against the schema it will be bound with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAnyOf`] for an `AnyOf` without
    /// alternatives, and an argument error when a relation reads an argument
    /// the schema does not guarantee.
    pub fn check_consistency(&self, schema: &RequestSchema) -> Result<(), ConfigError> {
        match self {
            CapabilityPolicy::OpenAccess
            | CapabilityPolicy::RequiresAuthenticatedUser
            | CapabilityPolicy::RequiresRole(_)
            | CapabilityPolicy::RequiresFeatureFlag(_) => Ok(()),
            CapabilityPolicy::RequiresResourceRelation(relation) => {
                let name = relation.argument();
                if schema.arg(name).is_none() {
                    Err(ConfigError::UnknownPolicyArgument {
                        name: name.to_string(),
                    })
                } else if !schema.guarantees(name) {
                    Err(ConfigError::OptionalPolicyArgument {
                        name: name.to_string(),
                    })
                } else {
                    Ok(())
                }
            }
            CapabilityPolicy::AllOf(children) => children
                .iter()
                .try_for_each(|child| child.check_consistency(schema)),
            CapabilityPolicy::AnyOf(children) => {
                if children.is_empty() {
                    return Err(ConfigError::EmptyAnyOf);
                }
                children
                    .iter()
                    .try_for_each(|child| child.check_consistency(schema))
            }
        }
    }
}

/// Why a policy denied a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// An identity is required
    Unauthenticated,
    /// A role is missing
    Forbidden,
    /// The feature or resource must look absent
    NotFound,
}

impl DenyReason {
    /// The error kind this reason is rendered as.
    pub fn kind(self) -> ErrorKind {
        match self {
            DenyReason::Unauthenticated => ErrorKind::Unauthenticated,
            DenyReason::Forbidden => ErrorKind::Forbidden,
            DenyReason::NotFound => ErrorKind::NotFound,
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind(), f)
    }
}

/// Result of evaluating a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The request may continue.
    Allow,
    /// The request is rejected.
    Deny {
        /// Category of the denial
        reason: DenyReason,
        /// Explanation for logs
        detail: String,
    },
}

impl Decision {
    fn deny(reason: DenyReason, detail: impl Into<String>) -> Self {
        Decision::Deny {
            reason,
            detail: detail.into(),
        }
    }

    /// Returns `true` for `Allow`.
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Converts a denial into a rejection; `Allow` yields `None`.
    pub fn into_rejection(self) -> Option<Rejection> {
        match self {
            Decision::Allow => None,
            Decision::Deny { reason, detail } => Some(Rejection::new(reason.kind(), detail)),
        }
    }
}

/// Read-only environment a policy is evaluated in.
#[derive(Clone, Copy)]
pub struct PolicyEnv<'a> {
    /// Feature flag snapshot for this request
    pub features: &'a dyn FeatureGate,
    /// Membership collaborator
    pub memberships: &'a dyn MembershipDirectory,
}

impl fmt::Debug for PolicyEnv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyEnv").finish_non_exhaustive()
    }
}

/// Evaluates `policy` for `principal` and already-validated `args`.
///
/// Evaluation is synchronous, has no side effects beyond the collaborator
/// calls, and is deterministic for a fixed environment.
pub fn check(
    policy: &CapabilityPolicy,
    principal: &Principal,
    args: &ValidatedArgs,
    env: PolicyEnv<'_>,
) -> Decision {
    match policy {
        CapabilityPolicy::OpenAccess => Decision::Allow,
        CapabilityPolicy::RequiresAuthenticatedUser => {
            if principal.is_authenticated() {
                Decision::Allow
            } else {
                Decision::deny(DenyReason::Unauthenticated, "authentication required")
            }
        }
        CapabilityPolicy::RequiresRole(role) => {
            if principal.has_role(*role) {
                Decision::Allow
            } else {
                Decision::deny(DenyReason::Forbidden, format!("role {} required", role))
            }
        }
        CapabilityPolicy::RequiresFeatureFlag(flag) => {
            if env.features.is_feature_enabled(flag) {
                Decision::Allow
            } else {
                Decision::deny(DenyReason::NotFound, format!("feature '{}' is disabled", flag))
            }
        }
        CapabilityPolicy::RequiresResourceRelation(relation) => {
            check_relation(relation, principal, args, env)
        }
        CapabilityPolicy::AllOf(children) => children
            .iter()
            .map(|child| check(child, principal, args, env))
            .find(|decision| !decision.is_allow())
            .unwrap_or(Decision::Allow),
        CapabilityPolicy::AnyOf(children) => {
            let mut first_denial = None;
            for child in children {
                match check(child, principal, args, env) {
                    Decision::Allow => return Decision::Allow,
                    denial => {
                        first_denial.get_or_insert(denial);
                    }
                }
            }
            first_denial
                .unwrap_or_else(|| Decision::deny(DenyReason::Forbidden, "no alternative allowed"))
        }
    }
}

fn check_relation(
    relation: &ResourceRelation,
    principal: &Principal,
    args: &ValidatedArgs,
    env: PolicyEnv<'_>,
) -> Decision {
    let Some(user_id) = principal.user_id() else {
        return Decision::deny(DenyReason::NotFound, "relation requires an identity");
    };
    let Some(value) = args.get(relation.argument()) else {
        return Decision::deny(
            DenyReason::NotFound,
            format!("argument '{}' is absent", relation.argument()),
        );
    };

    match relation {
        ResourceRelation::MemberOfGroup { .. } => {
            if env.memberships.is_member(user_id, &value.to_string()) {
                Decision::Allow
            } else {
                Decision::deny(DenyReason::NotFound, "principal is not a group member")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::args::RawArgs;
    use crate::config::FeatureFlags;
    use crate::schema::{ArgSpec, ArgType};

    struct CountingMembers {
        calls: Cell<usize>,
        member: bool,
    }

    impl MembershipDirectory for CountingMembers {
        fn is_member(&self, _user_id: &str, _group_id: &str) -> bool {
            self.calls.set(self.calls.get() + 1);
            self.member
        }
    }

    fn group_args() -> (RequestSchema, ValidatedArgs) {
        let schema = RequestSchema::builder()
            .arg(ArgSpec::path("group_id", ArgType::BaseString))
            .build()
            .unwrap();
        let args = schema
            .validate(&RawArgs::new().with_path("group_id", "g1"))
            .unwrap();
        (schema, args)
    }

    fn eval(policy: &CapabilityPolicy, principal: &Principal, flags: &FeatureFlags) -> Decision {
        let (_, args) = group_args();
        let members = CountingMembers {
            calls: Cell::new(0),
            member: true,
        };
        check(
            policy,
            principal,
            &args,
            PolicyEnv {
                features: flags,
                memberships: &members,
            },
        )
    }

    fn reason(decision: Decision) -> Option<DenyReason> {
        match decision {
            Decision::Allow => None,
            Decision::Deny { reason, .. } => Some(reason),
        }
    }

    #[test]
    fn open_access_allows_anonymous() {
        let decision = eval(&CapabilityPolicy::OpenAccess, &Principal::Anonymous, &FeatureFlags::new());
        assert!(decision.is_allow());
    }

    #[test]
    fn authenticated_user_policy() {
        let policy = CapabilityPolicy::RequiresAuthenticatedUser;
        let flags = FeatureFlags::new();
        assert_eq!(
            reason(eval(&policy, &Principal::Anonymous, &flags)),
            Some(DenyReason::Unauthenticated)
        );
        assert!(eval(&policy, &Principal::user("u1"), &flags).is_allow());
        assert!(eval(&policy, &Principal::elevated("u1", [Role::Moderator]), &flags).is_allow());
    }

    #[test]
    fn role_policy_denies_as_forbidden() {
        let policy = CapabilityPolicy::RequiresRole(Role::ReleaseCoordinator);
        let flags = FeatureFlags::new();
        assert_eq!(
            reason(eval(&policy, &Principal::user("u1"), &flags)),
            Some(DenyReason::Forbidden)
        );
        assert_eq!(
            reason(eval(&policy, &Principal::Anonymous, &flags)),
            Some(DenyReason::Forbidden)
        );
        assert_eq!(
            reason(eval(&policy, &Principal::elevated("u1", [Role::BlogAdmin]), &flags)),
            Some(DenyReason::Forbidden)
        );
        assert!(eval(
            &policy,
            &Principal::elevated("u1", [Role::ReleaseCoordinator]),
            &flags
        )
        .is_allow());
    }

    #[test]
    fn feature_flag_policy_hides_disabled_features() {
        let policy = CapabilityPolicy::requires_flag("learner_groups_are_enabled");
        let off = FeatureFlags::new();
        let on = FeatureFlags::new().with("learner_groups_are_enabled", true);

        let denied = eval(&policy, &Principal::user("u1"), &off);
        assert_eq!(reason(denied.clone()), Some(DenyReason::NotFound));
        assert_eq!(denied.into_rejection().unwrap().kind(), ErrorKind::NotFound);
        assert!(eval(&policy, &Principal::user("u1"), &on).is_allow());
    }

    #[test]
    fn relation_policy_consults_membership() {
        let (_, args) = group_args();
        let policy = CapabilityPolicy::member_of_group("group_id");
        let flags = FeatureFlags::new();
        let members = CountingMembers {
            calls: Cell::new(0),
            member: false,
        };
        let env = PolicyEnv {
            features: &flags,
            memberships: &members,
        };

        let decision = check(&policy, &Principal::user("u1"), &args, env);
        assert_eq!(reason(decision), Some(DenyReason::NotFound));
        assert_eq!(members.calls.get(), 1);

        // Anonymous principals never reach the collaborator.
        let decision = check(&policy, &Principal::Anonymous, &args, env);
        assert_eq!(reason(decision), Some(DenyReason::NotFound));
        assert_eq!(members.calls.get(), 1);
    }

    #[test]
    fn all_of_returns_first_denial() {
        let policy = CapabilityPolicy::all_of([
            CapabilityPolicy::RequiresAuthenticatedUser,
            CapabilityPolicy::requires_flag("off"),
            CapabilityPolicy::RequiresRole(Role::BlogAdmin),
        ]);
        let flags = FeatureFlags::new();
        assert_eq!(
            reason(eval(&policy, &Principal::Anonymous, &flags)),
            Some(DenyReason::Unauthenticated)
        );
        assert_eq!(
            reason(eval(&policy, &Principal::user("u1"), &flags)),
            Some(DenyReason::NotFound)
        );
        assert!(eval(&CapabilityPolicy::all_of([]), &Principal::Anonymous, &flags).is_allow());
    }

    #[test]
    fn any_of_allows_on_any_alternative() {
        let policy = CapabilityPolicy::any_of([
            CapabilityPolicy::RequiresRole(Role::BlogAdmin),
            CapabilityPolicy::RequiresRole(Role::BlogPostEditor),
        ]);
        let flags = FeatureFlags::new();
        assert!(eval(&policy, &Principal::elevated("u1", [Role::BlogPostEditor]), &flags).is_allow());
        let denied = eval(&policy, &Principal::user("u1"), &flags);
        assert_eq!(
            denied,
            Decision::Deny {
                reason: DenyReason::Forbidden,
                detail: "role BLOG_ADMIN required".to_string(),
            }
        );
    }

    #[test]
    fn consistency_rejects_unknown_and_optional_relation_arguments() {
        let (schema, _) = group_args();
        assert!(CapabilityPolicy::member_of_group("group_id")
            .check_consistency(&schema)
            .is_ok());
        assert!(matches!(
            CapabilityPolicy::member_of_group("other").check_consistency(&schema),
            Err(ConfigError::UnknownPolicyArgument { .. })
        ));

        let optional = RequestSchema::builder()
            .arg(ArgSpec::query("group_id", ArgType::BaseString).optional())
            .build()
            .unwrap();
        assert!(matches!(
            CapabilityPolicy::all_of([CapabilityPolicy::member_of_group("group_id")])
                .check_consistency(&optional),
            Err(ConfigError::OptionalPolicyArgument { .. })
        ));
    }

    #[test]
    fn consistency_rejects_empty_any_of() {
        let err = CapabilityPolicy::any_of([])
            .check_consistency(&RequestSchema::empty())
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyAnyOf));
    }
}
