//! Flag type definitions.
//!
//! This module defines the declarative vocabulary command authors use to
//! describe their flags: the [`FlagKind`] of a flag, the [`FlagValue`]s it
//! produces, the [`FlagDefinition`] record and the ordered [`FlagSchema`]
//! that maps hyphen-case keys to definitions.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Kind of value a flag produces.
///
/// The kind decides the canonical conversion applied to raw tokens
/// (`Integer` → base-10 `i64`, `Float` → `f64`, everything else taken
/// verbatim) and the argument syntax the flag is bound with.
///
/// # Examples
///
/// ```
/// use cmdtree_core::FlagKind;
///
/// assert!(FlagKind::Boolean.is_boolean());
/// assert!(FlagKind::Array.is_array());
/// assert!(!FlagKind::Integer.is_array());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FlagKind {
    /// Free-form text (the default).
    #[default]
    String,
    /// Base-10 signed integer.
    Integer,
    /// Floating-point number.
    Float,
    /// Presence switch, never takes a value.
    Boolean,
    /// Ordered sequence accumulated from one or more tokens.
    Array,
}

impl FlagKind {
    /// Returns `true` for [`FlagKind::Boolean`].
    pub fn is_boolean(self) -> bool {
        matches!(self, Self::Boolean)
    }

    /// Returns `true` for [`FlagKind::Array`].
    pub fn is_array(self) -> bool {
        matches!(self, Self::Array)
    }

    /// Zero value used when a representative value is needed.
    pub fn zero_value(self) -> FlagValue {
        match self {
            Self::String => FlagValue::String(String::new()),
            Self::Integer => FlagValue::Integer(0),
            Self::Float => FlagValue::Float(0.0),
            Self::Boolean => FlagValue::Boolean(false),
            Self::Array => FlagValue::Array(Vec::new()),
        }
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Array => "array",
        };
        f.write_str(name)
    }
}

/// A parsed flag value.
///
/// Serializes untagged, so a value looks like a plain JSON scalar or array.
/// That is what lets [`ParsedOptions`](crate::ParsedOptions) deserialize
/// straight into a command's own options struct.
///
/// # Examples
///
/// ```
/// use cmdtree_core::FlagValue;
///
/// let value = FlagValue::from(vec!["a", "b"]);
/// assert_eq!(serde_json::to_string(&value).unwrap(), r#"["a","b"]"#);
/// assert_eq!(FlagValue::from(3).as_i64(), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// Boolean switch state.
    Boolean(bool),
    /// Integer value.
    Integer(i64),
    /// Floating-point value.
    Float(f64),
    /// Text value.
    String(String),
    /// Ordered sequence of values.
    Array(Vec<FlagValue>),
}

impl FlagValue {
    /// Returns the text if this is a [`FlagValue::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is a [`FlagValue::Integer`].
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number if this is a [`FlagValue::Float`] or an integer.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            Self::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Returns the switch state if this is a [`FlagValue::Boolean`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the elements if this is a [`FlagValue::Array`].
    pub fn as_array(&self) -> Option<&[FlagValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FlagValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for FlagValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<FlagValue>> From<Vec<T>> for FlagValue {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

/// Custom value parser.
///
/// Receives the raw token and the value accumulated so far (the default on
/// the first call, if any) and returns the new value. For array flags the
/// parser owns accumulation: it is called once per token and whatever it
/// returns last becomes the flag's value.
pub type ArgParser =
    Arc<dyn Fn(&str, Option<&FlagValue>) -> Result<FlagValue, String> + Send + Sync>;

/// Declarative description of one flag.
///
/// Create one with the constructor for its kind, then fill in the rest of
/// the record with the builder methods. Nothing here checks that a default
/// matches the kind; a mismatched default reaches the command as-is.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{FlagDefinition, FlagKind, FlagValue};
///
/// let flag = FlagDefinition::integer("How many times to retry")
///     .short('r')
///     .default_value(3);
/// assert_eq!(flag.kind, FlagKind::Integer);
/// assert_eq!(flag.default_value, Some(FlagValue::Integer(3)));
/// assert!(!flag.is_mandatory());
///
/// let targets = FlagDefinition::array("Targets to act on").required();
/// assert!(targets.is_mandatory());
/// ```
#[derive(Clone)]
pub struct FlagDefinition {
    /// Kind tag set by the constructor.
    pub kind: FlagKind,
    /// Single-character alias (`-b`).
    pub short: Option<char>,
    /// Help text.
    pub description: String,
    /// Value used when the flag is not supplied.
    pub default_value: Option<FlagValue>,
    /// Whether the flag must be supplied.
    pub required: bool,
    /// Replaces the kind's canonical conversion when set.
    pub parse_arg: Option<ArgParser>,
}

impl FlagDefinition {
    /// Tags a partial definition with `kind`.
    pub fn of_kind(kind: FlagKind, description: &str) -> Self {
        Self {
            kind,
            short: None,
            description: description.to_string(),
            default_value: None,
            required: false,
            parse_arg: None,
        }
    }

    /// Creates a string flag.
    pub fn string(description: &str) -> Self {
        Self::of_kind(FlagKind::String, description)
    }

    /// Creates an integer flag.
    pub fn integer(description: &str) -> Self {
        Self::of_kind(FlagKind::Integer, description)
    }

    /// Creates a float flag.
    pub fn float(description: &str) -> Self {
        Self::of_kind(FlagKind::Float, description)
    }

    /// Creates a boolean flag.
    pub fn boolean(description: &str) -> Self {
        Self::of_kind(FlagKind::Boolean, description)
    }

    /// Creates an array flag.
    pub fn array(description: &str) -> Self {
        Self::of_kind(FlagKind::Array, description)
    }

    /// Sets the single-character alias.
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Sets the default value.
    pub fn default_value(mut self, value: impl Into<FlagValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Marks the flag as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Installs a custom value parser.
    pub fn parse_arg<F>(mut self, parser: F) -> Self
    where
        F: Fn(&str, Option<&FlagValue>) -> Result<FlagValue, String> + Send + Sync + 'static,
    {
        self.parse_arg = Some(Arc::new(parser));
        self
    }

    /// Whether a missing flag is a usage error.
    ///
    /// Boolean flags and flags with a default always have a value, so they
    /// are never mandatory whatever `required` says.
    pub fn is_mandatory(&self) -> bool {
        self.required && !self.kind.is_boolean() && self.default_value.is_none()
    }

    /// Whether parsing always yields a value for this flag.
    ///
    /// Only optional scalars without a default can be absent.
    pub fn always_present(&self) -> bool {
        self.kind.is_boolean()
            || self.kind.is_array()
            || self.default_value.is_some()
            || self.is_mandatory()
    }
}

impl fmt::Debug for FlagDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagDefinition")
            .field("kind", &self.kind)
            .field("short", &self.short)
            .field("description", &self.description)
            .field("default_value", &self.default_value)
            .field("required", &self.required)
            .field("parse_arg", &self.parse_arg.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Ordered mapping from hyphen-case flag key to [`FlagDefinition`].
///
/// Keys are unique: adding a key that already exists replaces its
/// definition and keeps its position. The order only affects help output.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{FlagDefinition, FlagSchema};
///
/// let schema = FlagSchema::new()
///     .flag("base-dir", FlagDefinition::string("Base directory").short('b'))
///     .flag("verbose", FlagDefinition::boolean("Chatty output"));
///
/// assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["base-dir", "verbose"]);
/// assert!(schema.get("base-dir").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlagSchema {
    entries: Vec<(String, FlagDefinition)>,
}

impl FlagSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a flag, builder style.
    pub fn flag(mut self, key: &str, definition: FlagDefinition) -> Self {
        self.insert(key, definition);
        self
    }

    /// Adds or replaces a flag.
    pub fn insert(&mut self, key: &str, definition: FlagDefinition) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = definition,
            None => self.entries.push((key.to_string(), definition)),
        }
    }

    /// Looks up a flag by key.
    pub fn get(&self, key: &str) -> Option<&FlagDefinition> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, definition)| definition)
    }

    /// Iterates over `(key, definition)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagDefinition)> {
        self.entries.iter().map(|(k, d)| (k.as_str(), d))
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
