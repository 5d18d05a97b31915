//! Process-wide feature flags.
//!
//! Flags are read through immutable [`FeatureFlags`] snapshots. The
//! [`FeatureFlagStore`] publishes a new snapshot whenever an administrator
//! changes a flag; requests already holding a snapshot keep seeing the old
//! values until they finish.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::collaborator::FeatureGate;
use crate::error::ConfigError;

/// Name of the flag gating learner-group pages.
pub const LEARNER_GROUPS_ARE_ENABLED: &str = "learner_groups_are_enabled";

/// Default prefix for flag environment variables.
pub const FLAG_ENV_PREFIX: &str = "ADMISSION_FLAG_";

/// An immutable set of feature flag values.
///
/// Unknown flags read as disabled.
///
/// # Examples
///
/// ```
/// use admission_core::{FeatureFlags, FeatureGate};
///
/// let flags = FeatureFlags::from_json(r#"{"learner_groups_are_enabled": true}"#).unwrap();
/// assert!(flags.is_feature_enabled("learner_groups_are_enabled"));
/// assert!(!flags.is_feature_enabled("unknown"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlags {
    flags: BTreeMap<String, bool>,
}

impl FeatureFlags {
    /// Creates a snapshot with every flag disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `flag` set to `enabled`.
    pub fn with(mut self, flag: impl Into<String>, enabled: bool) -> Self {
        self.flags.insert(flag.into(), enabled);
        self
    }

    /// Parses a JSON object mapping flag names to booleans.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFlagDocument`] if the document is not
    /// such an object.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(document).map_err(ConfigError::InvalidFlagDocument)
    }

    /// Reads flags from the process environment.
    ///
    /// Every variable starting with `prefix` becomes a flag whose name is the
    /// lower-cased remainder, e.g. `ADMISSION_FLAG_LEARNER_GROUPS_ARE_ENABLED=true`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFlagValue`] for values other than
    /// `true/false/1/0/on/off`.
    pub fn from_env_prefixed(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars(), prefix)
    }

    /// Same as [`from_env_prefixed`](Self::from_env_prefixed) over an explicit
    /// list of variables.
    pub fn from_vars(
        vars: impl IntoIterator<Item = (String, String)>,
        prefix: &str,
    ) -> Result<Self, ConfigError> {
        let mut flags = BTreeMap::new();
        for (var, value) in vars {
            let Some(name) = var.strip_prefix(prefix) else {
                continue;
            };
            let enabled = parse_switch(&value).ok_or_else(|| ConfigError::InvalidFlagValue {
                var: var.clone(),
                value: value.clone(),
            })?;
            flags.insert(name.to_ascii_lowercase(), enabled);
        }
        Ok(Self { flags })
    }

    /// Iterates over flags in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FeatureGate for FeatureFlags {
    fn is_feature_enabled(&self, flag: &str) -> bool {
        self.flags.get(flag).copied().unwrap_or(false)
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" => Some(true),
        "false" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// Holder of the current feature flag snapshot.
///
/// Reads are cheap clones of an `Arc`; writes go through [`set`](Self::set)
/// and [`replace`](Self::replace), which administrative tooling calls.
#[derive(Debug, Default)]
pub struct FeatureFlagStore {
    current: RwLock<Arc<FeatureFlags>>,
}

impl FeatureFlagStore {
    /// Creates a store publishing `flags`.
    pub fn new(flags: FeatureFlags) -> Self {
        Self {
            current: RwLock::new(Arc::new(flags)),
        }
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<FeatureFlags> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            // A writer panicked mid-swap; the Arc inside is still a whole snapshot.
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Publishes a snapshot with `flag` set to `enabled`.
    pub fn set(&self, flag: impl Into<String>, enabled: bool) {
        let flag = flag.into();
        tracing::info!(flag = %flag, enabled, "feature flag updated");
        // Read and swap under one guard.
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let next = (**guard).clone().with(flag, enabled);
        *guard = Arc::new(next);
    }

    /// Publishes `flags` as the new snapshot.
    pub fn replace(&self, flags: FeatureFlags) {
        tracing::info!(count = flags.flags.len(), "feature flags replaced");
        self.publish(flags);
    }

    fn publish(&self, flags: FeatureFlags) {
        let next = Arc::new(flags);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }
}

impl FeatureGate for FeatureFlagStore {
    fn is_feature_enabled(&self, flag: &str) -> bool {
        self.snapshot().is_feature_enabled(flag)
    }
}
