//! Raw and validated request arguments.

use std::collections::BTreeMap;
use std::fmt;

use crate::Tainted;

/// Where an argument is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgLocation {
    /// A `<placeholder>` segment of the route pattern
    Path,
    /// A query-string or body field
    Query,
}

impl fmt::Display for ArgLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgLocation::Path => write!(f, "path"),
            ArgLocation::Query => write!(f, "query"),
        }
    }
}

/// Raw request arguments as received from the client.
///
/// All values are [`Tainted`]; only the schema validator can read them.
///
/// # Examples
///
/// ```
/// use admission_core::RawArgs;
///
/// let raw = RawArgs::new()
///     .with_path("username", "alice")
///     .with_query("tab", "stats");
/// assert!(raw.contains_path("username"));
/// assert_eq!(raw.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArgs {
    path: BTreeMap<String, Tainted<String>>,
    query: BTreeMap<String, Tainted<String>>,
}

impl RawArgs {
    /// Creates an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a path argument, returning `self` for chaining.
    pub fn with_path(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_path(name, value);
        self
    }

    /// Adds a query/body argument, returning `self` for chaining.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_query(name, value);
        self
    }

    /// Inserts a path argument, replacing any previous value.
    pub fn insert_path(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.path.insert(name.into(), Tainted::new(value.into()));
    }

    /// Inserts a query/body argument, replacing any previous value.
    pub fn insert_query(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.query.insert(name.into(), Tainted::new(value.into()));
    }

    /// Returns the raw value at `location`, if present.
    pub fn get(&self, location: ArgLocation, name: &str) -> Option<&Tainted<String>> {
        match location {
            ArgLocation::Path => self.path.get(name),
            ArgLocation::Query => self.query.get(name),
        }
    }

    /// Returns `true` if a path argument named `name` is present.
    pub fn contains_path(&self, name: &str) -> bool {
        self.path.contains_key(name)
    }

    /// Returns `true` if a query argument named `name` is present.
    pub fn contains_query(&self, name: &str) -> bool {
        self.query.contains_key(name)
    }

    /// Total number of raw arguments.
    pub fn len(&self) -> usize {
        self.path.len() + self.query.len()
    }

    /// Returns `true` if there are no raw arguments.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty() && self.query.is_empty()
    }
}

/// A normalized argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// A string (`basestring`)
    Str(String),
    /// A signed integer (`int`)
    Int(i64),
    /// A finite float (`float`)
    Float(f64),
    /// A boolean (`bool`)
    Bool(bool),
}

impl ArgValue {
    /// Returns the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float value, if this is a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ArgValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Str(s) => f.write_str(s),
            ArgValue::Int(i) => write!(f, "{}", i),
            ArgValue::Float(x) => write!(f, "{}", x),
            ArgValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Str(s.to_string())
    }
}

impl From<i64> for ArgValue {
    fn from(i: i64) -> Self {
        ArgValue::Int(i)
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

impl From<f64> for ArgValue {
    fn from(x: f64) -> Self {
        ArgValue::Float(x)
    }
}

/// Arguments that passed schema validation.
///
/// Produced only by a successful validation, never partially populated, and
/// cannot be constructed outside this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedArgs {
    values: BTreeMap<String, ArgValue>,
}

impl ValidatedArgs {
    pub(crate) fn from_values(values: BTreeMap<String, ArgValue>) -> Self {
        Self { values }
    }

    /// Returns the value for `name`.
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    /// Returns the string value for `name`.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ArgValue::as_str)
    }

    /// Returns the integer value for `name`.
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ArgValue::as_int)
    }

    /// Returns the float value for `name`.
    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ArgValue::as_float)
    }

    /// Returns the boolean value for `name`.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ArgValue::as_bool)
    }

    /// Returns `true` if `name` has a value.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over values in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
