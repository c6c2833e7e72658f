//! Parsed option values handed to commands.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::naming::to_camel_case;
use crate::{FlagSchema, FlagValue};

/// Options produced for one command invocation, keyed by camelCase name.
///
/// Serializes as a JSON object, so it can be turned into a command's own
/// options struct with [`typed`](ParsedOptions::typed).
///
/// # Examples
///
/// ```
/// use cmdtree_core::{FlagValue, ParsedOptions};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct Options {
///     retry_count: i64,
///     targets: Vec<String>,
/// }
///
/// let mut parsed = ParsedOptions::new();
/// parsed.insert("retryCount", FlagValue::from(3));
/// parsed.insert("targets", FlagValue::from(vec!["a", "b"]));
///
/// let options: Options = parsed.typed().unwrap();
/// assert_eq!(options.retry_count, 3);
/// assert_eq!(options.targets, vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedOptions {
    values: BTreeMap<String, FlagValue>,
}

impl ParsedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the smallest options object parsing can produce for `schema`.
    ///
    /// Flags that always have a value (booleans, arrays, defaulted and
    /// mandatory flags) get their default, or the zero value of their kind.
    /// Flags that can be omitted are left out. Used to check at load time
    /// that a command's options struct can be filled from its schema.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_core::{FlagDefinition, FlagSchema, FlagValue, ParsedOptions};
    ///
    /// let schema = FlagSchema::new()
    ///     .flag("retry-count", FlagDefinition::integer("Retries").default_value(3))
    ///     .flag("targets", FlagDefinition::array("Targets").required());
    ///
    /// let sample = ParsedOptions::sample(&schema);
    /// assert_eq!(sample.get("retryCount"), Some(&FlagValue::Integer(3)));
    /// assert_eq!(sample.get("targets"), Some(&FlagValue::Array(vec![])));
    /// ```
    pub fn sample(schema: &FlagSchema) -> Self {
        let values = schema
            .iter()
            .filter(|(_, definition)| definition.always_present())
            .map(|(key, definition)| {
                let value = definition
                    .default_value
                    .clone()
                    .unwrap_or_else(|| definition.kind.zero_value());
                (to_camel_case(key), value)
            })
            .collect();
        Self { values }
    }

    /// Sets an option, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: FlagValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FlagValue::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FlagValue::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FlagValue::as_f64)
    }

    /// Returns the switch state, `false` when absent.
    pub fn get_bool(&self, name: &str) -> bool {
        self.get(name).and_then(FlagValue::as_bool).unwrap_or(false)
    }

    pub fn get_array(&self, name: &str) -> Option<&[FlagValue]> {
        self.get(name).and_then(FlagValue::as_array)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Deserializes the options into a typed struct.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] when a field is missing or has the
    /// wrong type.
    pub fn typed<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let value = serde_json::to_value(self)?;
        serde_json::from_value(value)
    }
}
