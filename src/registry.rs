//! Route bindings declared at startup.

use std::collections::{BTreeSet, HashMap};

use crate::error::ConfigError;
use crate::policy::CapabilityPolicy;
use crate::request::Verb;
use crate::schema::RequestSchema;

/// The schema and policy bound to one route and verb.
#[derive(Debug, Clone)]
pub struct RouteBinding {
    route: String,
    verb: Verb,
    schema: RequestSchema,
    policy: CapabilityPolicy,
}

impl RouteBinding {
    /// Route pattern, with `<name>` placeholders for path arguments.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Verb the binding applies to.
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Argument schema.
    pub fn schema(&self) -> &RequestSchema {
        &self.schema
    }

    /// Capability policy.
    pub fn policy(&self) -> &CapabilityPolicy {
        &self.policy
    }

    fn check(&self) -> Result<(), ConfigError> {
        let placeholders = placeholders(&self.route)?;
        let declared: BTreeSet<&str> = self.schema.path_arg_names().collect();

        if let Some(missing) = placeholders.difference(&declared).next() {
            return Err(ConfigError::PathArgumentMismatch {
                detail: format!("placeholder <{}> has no path argument", missing),
            });
        }
        if let Some(extra) = declared.difference(&placeholders).next() {
            return Err(ConfigError::PathArgumentMismatch {
                detail: format!("path argument '{}' has no placeholder", extra),
            });
        }
        self.policy.check_consistency(&self.schema)
    }
}

fn placeholders(route: &str) -> Result<BTreeSet<&str>, ConfigError> {
    let mut names = BTreeSet::new();
    for segment in route.split('/') {
        let Some(name) = segment
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
        else {
            continue;
        };
        if name.is_empty() || !names.insert(name) {
            return Err(ConfigError::PathArgumentMismatch {
                detail: format!("placeholder <{}> is empty or repeated", name),
            });
        }
    }
    Ok(names)
}

/// Immutable table of route bindings.
///
/// Every (route, verb) pair has at most one binding. The registry is built
/// once at startup and shared read-only between requests.
///
/// # Examples
///
/// ```
/// use admission_core::{CapabilityPolicy, RequestSchema, RouteRegistry, Verb};
///
/// let registry = RouteRegistry::builder()
///     .register(
///         "/account",
///         Verb::Get,
///         RequestSchema::empty(),
///         CapabilityPolicy::RequiresAuthenticatedUser,
///     )
///     .build()
///     .unwrap();
///
/// assert!(registry.lookup("/account", Verb::Get).is_ok());
/// assert!(registry.lookup("/account", Verb::Post).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    bindings: HashMap<(String, Verb), RouteBinding>,
}

impl RouteRegistry {
    /// Starts a registry declaration.
    pub fn builder() -> RouteRegistryBuilder {
        RouteRegistryBuilder::default()
    }

    /// Finds the binding for `route` and `verb`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnregisteredRoute`] when nothing is bound.
    pub fn lookup(&self, route: &str, verb: Verb) -> Result<&RouteBinding, ConfigError> {
        self.bindings
            .get(&(route.to_string(), verb))
            .ok_or_else(|| ConfigError::UnregisteredRoute {
                route: route.to_string(),
                verb,
            })
    }

    /// Iterates over all bindings in no particular order.
    pub fn bindings(&self) -> impl Iterator<Item = &RouteBinding> {
        self.bindings.values()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Builder for [`RouteRegistry`].
#[derive(Debug, Clone, Default)]
pub struct RouteRegistryBuilder {
    pending: Vec<RouteBinding>,
}

impl RouteRegistryBuilder {
    /// Binds `schema` and `policy` to `route` and `verb`.
    pub fn register(
        mut self,
        route: impl Into<String>,
        verb: Verb,
        schema: RequestSchema,
        policy: CapabilityPolicy,
    ) -> Self {
        self.pending.push(RouteBinding {
            route: route.into(),
            verb,
            schema,
            policy,
        });
        self
    }

    /// Checks every binding and freezes the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateRoute`] for a repeated (route, verb),
    /// and [`ConfigError::InRoute`] wrapping the first inconsistency between
    /// a route pattern, its schema and its policy.
    pub fn build(self) -> Result<RouteRegistry, ConfigError> {
        let mut bindings = HashMap::with_capacity(self.pending.len());
        for binding in self.pending {
            binding.check().map_err(|source| ConfigError::InRoute {
                route: binding.route.clone(),
                verb: binding.verb,
                source: Box::new(source),
            })?;

            let key = (binding.route.clone(), binding.verb);
            if bindings.contains_key(&key) {
                return Err(ConfigError::DuplicateRoute {
                    route: binding.route,
                    verb: binding.verb,
                });
            }
            tracing::debug!(route = %binding.route, verb = %binding.verb, "route registered");
            bindings.insert(key, binding);
        }
        Ok(RouteRegistry { bindings })
    }
}
