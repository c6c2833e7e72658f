//! Salesforce project helpers.

pub mod extract;
