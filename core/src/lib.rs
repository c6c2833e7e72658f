//! Flag schema types for directory-driven command trees.
//!
//! This crate defines the declarative side of a command: which flags it
//! takes and what the command receives once they are parsed.
//!
//! - [`FlagDefinition`]: one flag: kind, short alias, description, default,
//!   required-ness and an optional custom parser.
//! - [`FlagSchema`]: ordered mapping from hyphen-case key to definition.
//! - [`FlagValue`]: a parsed value of any kind.
//! - [`ParsedOptions`]: the camelCased values delivered to a command,
//!   convertible into the command's own options struct.
//!
//! Validation ([`validate_flag_schema`]) catches malformed keys, alias
//! clashes and keys that would collide once camelCased.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::*;
//!
//! let schema = FlagSchema::new()
//!     .flag("retry-count", FlagDefinition::integer("Retries").default_value(3))
//!     .flag("targets", FlagDefinition::array("Targets").short('t').required());
//!
//! assert!(validate_flag_schema(&schema).is_empty());
//! assert_eq!(to_camel_case("retry-count"), "retryCount");
//! assert!(schema.get("targets").unwrap().is_mandatory());
//! ```

mod naming;
mod options;
mod types;
mod validate;

pub use naming::{is_hyphen_case, to_camel_case};
pub use options::ParsedOptions;
pub use types::*;
pub use validate::{RESERVED_KEYS, RESERVED_SHORTS, ValidationError, validate_flag_schema};
