//! Helpers for working with flag keys.

pub mod camel;
