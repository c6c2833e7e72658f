//! Flag schema validation.
//!
//! Checks the structural rules a schema has to satisfy before it can be
//! bound to a command line: well-formed keys, single-character aliases, no
//! clashes with the help flag and no two keys that camelCase to the same
//! option name.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::*;
//!
//! let schema = FlagSchema::new()
//!     .flag("output-dir", FlagDefinition::string("Output directory").short('o'));
//! assert!(validate_flag_schema(&schema).is_empty());
//!
//! // Invalid: two keys produce `outputDir`
//! let bad = FlagSchema::new()
//!     .flag("output-dir", FlagDefinition::string("one"))
//!     .flag("outputDir", FlagDefinition::string("two"));
//! assert!(!validate_flag_schema(&bad).is_empty());
//! ```

use std::collections::HashMap;

use thiserror::Error;

use crate::FlagSchema;
use crate::naming::{is_valid_flag_key, to_camel_case};

/// Keys and aliases claimed by the generated help flag.
pub const RESERVED_KEYS: &[&str] = &["help"];
/// Short aliases claimed by the generated help flag.
pub const RESERVED_SHORTS: &[char] = &['h'];

/// Flag schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Key is empty, has a leading/trailing/doubled hyphen or other characters.
    #[error("invalid flag key: {0:?}")]
    InvalidFlagKey(String),
    /// Short alias is not a single ASCII alphanumeric character.
    #[error("invalid short alias {short:?} for --{key}")]
    InvalidShortFlag {
        /// Flag the alias belongs to.
        key: String,
        /// Offending alias.
        short: char,
    },
    /// Two flags share the same short alias.
    #[error("duplicate short alias -{0}")]
    DuplicateShortFlag(char),
    /// Key or alias clashes with the built-in help flag.
    #[error("flag {0} is reserved")]
    ReservedFlag(String),
    /// Two keys map to the same camelCase option name.
    #[error("flags --{first} and --{second} both become option {camel:?}")]
    CamelCaseCollision {
        /// Key seen first.
        first: String,
        /// Key seen second.
        second: String,
        /// Shared option name.
        camel: String,
    },
}

/// Validates a flag schema.
///
/// Returns at most one error: validation stops at the first problem.
pub fn validate_flag_schema(schema: &FlagSchema) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut shorts: Vec<char> = Vec::new();
    let mut camels: HashMap<String, &str> = HashMap::new();

    for (key, definition) in schema.iter() {
        if !is_valid_flag_key(key) {
            errors.push(ValidationError::InvalidFlagKey(key.to_string()));
            return errors;
        }
        if RESERVED_KEYS.contains(&key) {
            errors.push(ValidationError::ReservedFlag(format!("--{key}")));
            return errors;
        }

        if let Some(short) = definition.short {
            if !short.is_ascii_alphanumeric() {
                errors.push(ValidationError::InvalidShortFlag {
                    key: key.to_string(),
                    short,
                });
                return errors;
            }
            if RESERVED_SHORTS.contains(&short) {
                errors.push(ValidationError::ReservedFlag(format!("-{short}")));
                return errors;
            }
            if shorts.contains(&short) {
                errors.push(ValidationError::DuplicateShortFlag(short));
                return errors;
            }
            shorts.push(short);
        }

        let camel = to_camel_case(key);
        if let Some(first) = camels.get(&camel) {
            errors.push(ValidationError::CamelCaseCollision {
                first: first.to_string(),
                second: key.to_string(),
                camel,
            });
            return errors;
        }
        camels.insert(camel, key);
    }

    errors
}
