//! Declared argument schemas and the validator that applies them.
//!
//! A [`RequestSchema`] is declared once per route and verb and checked for
//! internal consistency when it is built. Validation is all-or-nothing: it
//! either yields a complete [`ValidatedArgs`] or the first
//! [`ValidationError`] in declaration order.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use regex::Regex;

use crate::args::{ArgLocation, ArgValue, RawArgs, ValidatedArgs};
use crate::error::{ConfigError, ValidationError};

/// Declared type of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    /// Any string, passed through unchanged
    BaseString,
    /// A signed 64-bit integer
    Int,
    /// A finite 64-bit float
    Float,
    /// `true` or `false`, case-insensitive
    Bool,
}

impl ArgType {
    /// Returns the schema type tag.
    pub fn as_str(self) -> &'static str {
        match self {
            ArgType::BaseString => "basestring",
            ArgType::Int => "int",
            ArgType::Float => "float",
            ArgType::Bool => "bool",
        }
    }

    fn coerce(self, raw: &str) -> Result<ArgValue, String> {
        match self {
            ArgType::BaseString => Ok(ArgValue::Str(raw.to_string())),
            ArgType::Int => raw
                .trim()
                .parse::<i64>()
                .map(ArgValue::Int)
                .map_err(|_| "expected an integer".to_string()),
            ArgType::Float => match raw.trim().parse::<f64>() {
                Ok(x) if x.is_finite() => Ok(ArgValue::Float(x)),
                _ => Err("expected a finite number".to_string()),
            },
            ArgType::Bool => {
                let raw = raw.trim();
                if raw.eq_ignore_ascii_case("true") {
                    Ok(ArgValue::Bool(true))
                } else if raw.eq_ignore_ascii_case("false") {
                    Ok(ArgValue::Bool(false))
                } else {
                    Err("expected 'true' or 'false'".to_string())
                }
            }
        }
    }

    fn accepts(self, value: &ArgValue) -> bool {
        matches!(
            (self, value),
            (ArgType::BaseString, ArgValue::Str(_))
                | (ArgType::Int, ArgValue::Int(_))
                | (ArgType::Float, ArgValue::Float(_))
                | (ArgType::Bool, ArgValue::Bool(_))
        )
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validator declared on an argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatorSpec {
    /// The string must match the pattern starting at its first character.
    IsRegexMatched(String),
    /// The string must have at most this many characters.
    HasLengthAtMost(usize),
    /// The string must not be empty.
    IsNonEmpty,
    /// The number must be greater than or equal to this bound.
    IsAtLeast(f64),
    /// The number must be less than or equal to this bound.
    IsAtMost(f64),
}

impl ValidatorSpec {
    fn id(&self) -> &'static str {
        match self {
            ValidatorSpec::IsRegexMatched(_) => "is_regex_matched",
            ValidatorSpec::HasLengthAtMost(_) => "has_length_at_most",
            ValidatorSpec::IsNonEmpty => "is_nonempty",
            ValidatorSpec::IsAtLeast(_) => "is_at_least",
            ValidatorSpec::IsAtMost(_) => "is_at_most",
        }
    }

    fn applies_to(&self, arg_type: ArgType) -> bool {
        match self {
            ValidatorSpec::IsRegexMatched(_)
            | ValidatorSpec::HasLengthAtMost(_)
            | ValidatorSpec::IsNonEmpty => arg_type == ArgType::BaseString,
            ValidatorSpec::IsAtLeast(_) | ValidatorSpec::IsAtMost(_) => {
                matches!(arg_type, ArgType::Int | ArgType::Float)
            }
        }
    }

    fn compile(&self, name: &str) -> Result<Validator, ConfigError> {
        Ok(match self {
            ValidatorSpec::IsRegexMatched(pattern) => Validator::RegexMatched(
                Regex::new(pattern).map_err(|source| ConfigError::InvalidRegex {
                    name: name.to_string(),
                    source,
                })?,
            ),
            ValidatorSpec::HasLengthAtMost(max) => Validator::LengthAtMost(*max),
            ValidatorSpec::IsNonEmpty => Validator::NonEmpty,
            ValidatorSpec::IsAtLeast(bound) | ValidatorSpec::IsAtMost(bound)
                if bound.is_nan() =>
            {
                return Err(ConfigError::InvalidBound {
                    name: name.to_string(),
                    validator: self.id(),
                });
            }
            ValidatorSpec::IsAtLeast(min) => Validator::AtLeast(*min),
            ValidatorSpec::IsAtMost(max) => Validator::AtMost(*max),
        })
    }
}

#[derive(Debug, Clone)]
enum Validator {
    RegexMatched(Regex),
    LengthAtMost(usize),
    NonEmpty,
    AtLeast(f64),
    AtMost(f64),
}

impl Validator {
    fn check(&self, value: &ArgValue) -> Result<(), String> {
        match (self, value) {
            (Validator::RegexMatched(re), ArgValue::Str(s)) => {
                if re.find(s).is_some_and(|m| m.start() == 0) {
                    Ok(())
                } else {
                    Err(format!("does not match pattern {}", re.as_str()))
                }
            }
            (Validator::LengthAtMost(max), ArgValue::Str(s)) => {
                if s.chars().count() <= *max {
                    Ok(())
                } else {
                    Err(format!("longer than {} characters", max))
                }
            }
            (Validator::NonEmpty, ArgValue::Str(s)) => {
                if s.is_empty() {
                    Err("must not be empty".to_string())
                } else {
                    Ok(())
                }
            }
            (Validator::AtLeast(min), value) => match compare_to_bound(value, *min) {
                Some(Ordering::Greater | Ordering::Equal) => Ok(()),
                _ => Err(format!("must be at least {}", min)),
            },
            (Validator::AtMost(max), value) => match compare_to_bound(value, *max) {
                Some(Ordering::Less | Ordering::Equal) => Ok(()),
                _ => Err(format!("must be at most {}", max)),
            },
            // Type/validator pairs are checked when the schema is built.
            _ => Err("validator does not apply to this value".to_string()),
        }
    }
}

/// Orders a numeric value against a bound without rounding integers.
fn compare_to_bound(value: &ArgValue, bound: f64) -> Option<Ordering> {
    match value {
        ArgValue::Int(i) => Some(compare_int(*i, bound)),
        ArgValue::Float(x) => x.partial_cmp(&bound),
        _ => None,
    }
}

fn compare_int(value: i64, bound: f64) -> Ordering {
    // 2^63 is exact in f64; every i64 lies in [-2^63, 2^63).
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if bound >= LIMIT {
        return Ordering::Less;
    }
    if bound < -LIMIT {
        return Ordering::Greater;
    }
    let floor = bound.floor();
    // In range and integral, so the cast is exact.
    match value.cmp(&(floor as i64)) {
        Ordering::Equal if bound > floor => Ordering::Less,
        ordering => ordering,
    }
}

/// Declaration of a single argument.
///
/// # Examples
///
/// ```
/// use admission_core::{ArgSpec, ArgType, ValidatorSpec};
///
/// let id = ArgSpec::path("learner_group_id", ArgType::BaseString)
///     .validate(ValidatorSpec::IsRegexMatched("^[A-Za-z0-9]{12}$".to_string()));
/// let page = ArgSpec::query("page", ArgType::Int).with_default(1_i64);
/// assert!(id.is_required());
/// assert!(!page.is_required());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSpec {
    name: String,
    location: ArgLocation,
    arg_type: ArgType,
    validators: Vec<ValidatorSpec>,
    required: bool,
    default: Option<ArgValue>,
}

impl ArgSpec {
    /// Declares a required path argument.
    pub fn path(name: impl Into<String>, arg_type: ArgType) -> Self {
        Self::new(name, ArgLocation::Path, arg_type)
    }

    /// Declares a required query/body argument.
    pub fn query(name: impl Into<String>, arg_type: ArgType) -> Self {
        Self::new(name, ArgLocation::Query, arg_type)
    }

    fn new(name: impl Into<String>, location: ArgLocation, arg_type: ArgType) -> Self {
        Self {
            name: name.into(),
            location,
            arg_type,
            validators: Vec::new(),
            required: true,
            default: None,
        }
    }

    /// Marks the argument optional without a default.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Marks the argument optional, filling `value` when it is absent.
    pub fn with_default(mut self, value: impl Into<ArgValue>) -> Self {
        self.required = false;
        self.default = Some(value.into());
        self
    }

    /// Appends a validator. Validators run in the order they are added.
    pub fn validate(mut self, validator: ValidatorSpec) -> Self {
        self.validators.push(validator);
        self
    }

    /// Argument name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the argument is read from.
    pub fn location(&self) -> ArgLocation {
        self.location
    }

    /// Declared type.
    pub fn arg_type(&self) -> ArgType {
        self.arg_type
    }

    /// Whether the argument must be present.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Declared default, if any.
    pub fn default_value(&self) -> Option<&ArgValue> {
        self.default.as_ref()
    }
}

#[derive(Debug, Clone)]
struct CompiledArg {
    spec: ArgSpec,
    validators: Vec<Validator>,
}

impl CompiledArg {
    fn compile(spec: ArgSpec) -> Result<Self, ConfigError> {
        if spec.location == ArgLocation::Path && !spec.required {
            return Err(ConfigError::OptionalPathArgument { name: spec.name });
        }

        let mut validators = Vec::with_capacity(spec.validators.len());
        for declared in &spec.validators {
            if !declared.applies_to(spec.arg_type) {
                return Err(ConfigError::IncompatibleValidator {
                    name: spec.name.clone(),
                    validator: declared.id(),
                    arg_type: spec.arg_type.as_str(),
                });
            }
            validators.push(declared.compile(&spec.name)?);
        }

        let compiled = Self { spec, validators };
        if let Some(default) = &compiled.spec.default {
            if !compiled.spec.arg_type.accepts(default) {
                return Err(ConfigError::InvalidDefault {
                    name: compiled.spec.name.clone(),
                    reason: format!("not a {}", compiled.spec.arg_type),
                });
            }
            compiled
                .run_validators(default)
                .map_err(|reason| ConfigError::InvalidDefault {
                    name: compiled.spec.name.clone(),
                    reason,
                })?;
        }
        Ok(compiled)
    }

    fn run_validators(&self, value: &ArgValue) -> Result<(), String> {
        self.validators.iter().try_for_each(|v| v.check(value))
    }

    fn normalize(&self, raw: &RawArgs) -> Result<Option<ArgValue>, ValidationError> {
        let name = &self.spec.name;
        let Some(tainted) = raw.get(self.spec.location, name) else {
            if self.spec.required {
                return Err(ValidationError::MissingArgument { name: name.clone() });
            }
            return Ok(self.spec.default.clone());
        };

        let invalid = |reason: String| ValidationError::InvalidArgument {
            name: name.clone(),
            reason,
        };
        let value = self.spec.arg_type.coerce(tainted.peek()).map_err(invalid)?;
        self.run_validators(&value).map_err(invalid)?;
        Ok(Some(value))
    }
}

/// Argument schema for one route and verb.
///
/// Built through [`RequestSchema::builder`]; immutable afterwards.
///
/// # Examples
///
/// ```
/// use admission_core::{ArgSpec, ArgType, RawArgs, RequestSchema};
///
/// let schema = RequestSchema::builder()
///     .arg(ArgSpec::query("classroom_url_fragment", ArgType::BaseString))
///     .build()
///     .expect("consistent schema");
///
/// let raw = RawArgs::new()
///     .with_query("classroom_url_fragment", "math")
///     .with_query("utm_source", "newsletter");
/// let args = schema.validate(&raw).expect("valid");
/// assert_eq!(args.get_str("classroom_url_fragment"), Some("math"));
/// assert!(!args.contains("utm_source"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestSchema {
    args: Vec<CompiledArg>,
}

impl RequestSchema {
    /// Starts a schema declaration.
    pub fn builder() -> RequestSchemaBuilder {
        RequestSchemaBuilder { specs: Vec::new() }
    }

    /// A schema that declares no arguments.
    pub fn empty() -> Self {
        Self { args: Vec::new() }
    }

    /// Validates `raw` against this schema.
    ///
    /// Arguments are checked path-first, then query, each in declaration
    /// order; the first failure is returned. Undeclared raw arguments are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingArgument`] for an absent required
    /// argument and [`ValidationError::InvalidArgument`] for a coercion or
    /// validator failure.
    pub fn validate(&self, raw: &RawArgs) -> Result<ValidatedArgs, ValidationError> {
        let mut values = BTreeMap::new();
        for arg in &self.args {
            if let Some(value) = arg.normalize(raw)? {
                values.insert(arg.spec.name.clone(), value);
            }
        }
        Ok(ValidatedArgs::from_values(values))
    }

    /// Returns the declaration for `name`.
    pub fn arg(&self, name: &str) -> Option<&ArgSpec> {
        self.args.iter().map(|a| &a.spec).find(|s| s.name == name)
    }

    /// Iterates over declarations in validation order.
    pub fn args(&self) -> impl Iterator<Item = &ArgSpec> {
        self.args.iter().map(|a| &a.spec)
    }

    /// Names of the declared path arguments.
    pub fn path_arg_names(&self) -> impl Iterator<Item = &str> {
        self.args()
            .filter(|s| s.location == ArgLocation::Path)
            .map(|s| s.name.as_str())
    }

    /// Returns `true` if `name` is guaranteed to be present after validation.
    pub fn guarantees(&self, name: &str) -> bool {
        self.arg(name)
            .is_some_and(|s| s.required || s.default.is_some())
    }
}

/// Builder for [`RequestSchema`].
#[derive(Debug, Clone)]
pub struct RequestSchemaBuilder {
    specs: Vec<ArgSpec>,
}

impl RequestSchemaBuilder {
    /// Declares an argument.
    pub fn arg(mut self, spec: ArgSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Checks the declarations and compiles validators.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for duplicate names, optional path
    /// arguments, validators that do not fit the type, invalid regexes, and
    /// defaults that fail their own validators.
    pub fn build(self) -> Result<RequestSchema, ConfigError> {
        let mut seen = HashSet::new();
        for spec in &self.specs {
            if !seen.insert(spec.name.as_str()) {
                return Err(ConfigError::DuplicateArgument {
                    name: spec.name.clone(),
                });
            }
        }

        let mut args = self
            .specs
            .into_iter()
            .map(CompiledArg::compile)
            .collect::<Result<Vec<_>, _>>()?;
        // Stable: keeps declaration order within each location.
        args.sort_by_key(|a| a.spec.location == ArgLocation::Query);
        Ok(RequestSchema { args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const GROUP_ID_REGEX: &str = "^[A-Za-z0-9]{12}$";

    fn group_schema() -> RequestSchema {
        RequestSchema::builder()
            .arg(
                ArgSpec::path("learner_group_id", ArgType::BaseString)
                    .validate(ValidatorSpec::IsRegexMatched(GROUP_ID_REGEX.to_string())),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn string_argument_passes_through() {
        let schema = RequestSchema::builder()
            .arg(ArgSpec::path("username", ArgType::BaseString))
            .build()
            .unwrap();
        let args = schema
            .validate(&RawArgs::new().with_path("username", " alice "))
            .unwrap();
        assert_eq!(args.get_str("username"), Some(" alice "));
    }

    #[test]
    fn missing_required_argument_is_reported() {
        let schema = RequestSchema::builder()
            .arg(ArgSpec::query("blog_post_url_fragment", ArgType::BaseString))
            .build()
            .unwrap();
        let err = schema.validate(&RawArgs::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingArgument);
        assert_eq!(err.argument(), "blog_post_url_fragment");
    }

    #[test]
    fn regex_validator_rejects_malformed_id() {
        let err = group_schema()
            .validate(&RawArgs::new().with_path("learner_group_id", "not-an-id!"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(!err.to_string().contains("not-an-id!"));
    }

    #[test]
    fn regex_validator_accepts_well_formed_id() {
        let args = group_schema()
            .validate(&RawArgs::new().with_path("learner_group_id", "abcDEF123456"))
            .unwrap();
        assert_eq!(args.get_str("learner_group_id"), Some("abcDEF123456"));
    }

    #[test]
    fn regex_match_is_anchored_at_start_only() {
        let schema = RequestSchema::builder()
            .arg(
                ArgSpec::query("code", ArgType::BaseString)
                    .validate(ValidatorSpec::IsRegexMatched("[a-z]+".to_string())),
            )
            .build()
            .unwrap();
        assert!(schema.validate(&RawArgs::new().with_query("code", "abc123")).is_ok());
        assert!(schema.validate(&RawArgs::new().with_query("code", "123abc")).is_err());
    }

    #[test]
    fn large_integers_compare_exactly_against_bounds() {
        // 2^53; 2^53 + 1 rounds down to it as f64.
        let schema = RequestSchema::builder()
            .arg(
                ArgSpec::query("n", ArgType::Int)
                    .validate(ValidatorSpec::IsAtMost(9_007_199_254_740_992.0)),
            )
            .build()
            .unwrap();
        let check = |n: &str| schema.validate(&RawArgs::new().with_query("n", n)).is_ok();
        assert!(check("9007199254740992"));
        assert!(!check("9007199254740993"));

        let schema = RequestSchema::builder()
            .arg(ArgSpec::query("n", ArgType::Int).validate(ValidatorSpec::IsAtLeast(1.5)))
            .build()
            .unwrap();
        let check = |n: &str| schema.validate(&RawArgs::new().with_query("n", n)).is_ok();
        assert!(!check("1"));
        assert!(check("2"));
        assert!(check(&i64::MAX.to_string()));
    }

    #[test]
    fn nan_bound_is_a_config_error() {
        let err = RequestSchema::builder()
            .arg(ArgSpec::query("n", ArgType::Float).validate(ValidatorSpec::IsAtLeast(f64::NAN)))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBound { validator: "is_at_least", .. }));
    }

    #[test]
    fn unknown_arguments_are_ignored() {
        let args = group_schema()
            .validate(
                &RawArgs::new()
                    .with_path("learner_group_id", "abcDEF123456")
                    .with_query("extra", "whatever"),
            )
            .unwrap();
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn numeric_and_bool_coercion() {
        let schema = RequestSchema::builder()
            .arg(ArgSpec::query("page", ArgType::Int).validate(ValidatorSpec::IsAtLeast(1.0)))
            .arg(ArgSpec::query("ratio", ArgType::Float).validate(ValidatorSpec::IsAtMost(1.0)))
            .arg(ArgSpec::query("draft", ArgType::Bool))
            .build()
            .unwrap();

        let args = schema
            .validate(
                &RawArgs::new()
                    .with_query("page", "2")
                    .with_query("ratio", "0.5")
                    .with_query("draft", "TRUE"),
            )
            .unwrap();
        assert_eq!(args.get_int("page"), Some(2));
        assert_eq!(args.get_float("ratio"), Some(0.5));
        assert_eq!(args.get_bool("draft"), Some(true));

        let err = schema
            .validate(
                &RawArgs::new()
                    .with_query("page", "0")
                    .with_query("ratio", "0.5")
                    .with_query("draft", "false"),
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid argument 'page': must be at least 1");

        let err = schema
            .validate(
                &RawArgs::new()
                    .with_query("page", "1")
                    .with_query("ratio", "NaN")
                    .with_query("draft", "false"),
            )
            .unwrap_err();
        assert_eq!(err.argument(), "ratio");

        let err = schema
            .validate(
                &RawArgs::new()
                    .with_query("page", "1")
                    .with_query("ratio", "0.1")
                    .with_query("draft", "yes"),
            )
            .unwrap_err();
        assert_eq!(err.argument(), "draft");
    }

    #[test]
    fn defaults_fill_absent_optional_arguments() {
        let schema = RequestSchema::builder()
            .arg(ArgSpec::query("page", ArgType::Int).with_default(1_i64))
            .arg(ArgSpec::query("filter", ArgType::BaseString).optional())
            .build()
            .unwrap();
        let args = schema.validate(&RawArgs::new()).unwrap();
        assert_eq!(args.get_int("page"), Some(1));
        assert!(!args.contains("filter"));
        assert!(schema.guarantees("page"));
        assert!(!schema.guarantees("filter"));
    }

    #[test]
    fn validation_order_is_path_then_declaration_order() {
        let schema = RequestSchema::builder()
            .arg(ArgSpec::query("b", ArgType::BaseString))
            .arg(ArgSpec::query("a", ArgType::BaseString))
            .arg(ArgSpec::path("id", ArgType::BaseString))
            .build()
            .unwrap();

        let names: Vec<_> = schema.args().map(ArgSpec::name).collect();
        assert_eq!(names, ["id", "b", "a"]);

        let err = schema.validate(&RawArgs::new()).unwrap_err();
        assert_eq!(err.argument(), "id");
        let err = schema.validate(&RawArgs::new().with_path("id", "x")).unwrap_err();
        assert_eq!(err.argument(), "b");
    }

    #[test]
    fn build_rejects_duplicate_names() {
        let err = RequestSchema::builder()
            .arg(ArgSpec::path("id", ArgType::BaseString))
            .arg(ArgSpec::query("id", ArgType::Int))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateArgument { name } if name == "id"));
    }

    #[test]
    fn build_rejects_optional_path_argument() {
        let err = RequestSchema::builder()
            .arg(ArgSpec::path("id", ArgType::BaseString).optional())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::OptionalPathArgument { .. }));
    }

    #[test]
    fn build_rejects_invalid_regex() {
        let err = RequestSchema::builder()
            .arg(
                ArgSpec::query("q", ArgType::BaseString)
                    .validate(ValidatorSpec::IsRegexMatched("([".to_string())),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRegex { .. }));
    }

    #[test]
    fn build_rejects_incompatible_validator() {
        let err = RequestSchema::builder()
            .arg(ArgSpec::query("n", ArgType::Int).validate(ValidatorSpec::IsNonEmpty))
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "validator 'is_nonempty' cannot apply to 'int' argument 'n'"
        );
    }

    #[test]
    fn build_rejects_default_that_fails_validators() {
        let err = RequestSchema::builder()
            .arg(
                ArgSpec::query("page", ArgType::Int)
                    .validate(ValidatorSpec::IsAtLeast(1.0))
                    .with_default(0_i64),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDefault { .. }));

        let err = RequestSchema::builder()
            .arg(ArgSpec::query("page", ArgType::Int).with_default("one"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDefault { .. }));
    }

    #[test]
    fn length_and_nonempty_validators() {
        let schema = RequestSchema::builder()
            .arg(
                ArgSpec::query("title", ArgType::BaseString)
                    .validate(ValidatorSpec::IsNonEmpty)
                    .validate(ValidatorSpec::HasLengthAtMost(5)),
            )
            .build()
            .unwrap();
        assert!(schema.validate(&RawArgs::new().with_query("title", "héllo")).is_ok());
        assert!(schema.validate(&RawArgs::new().with_query("title", "")).is_err());
        assert!(schema.validate(&RawArgs::new().with_query("title", "toolong")).is_err());
    }
}
