//! Discovery configuration.
//!
//! Controls which files in the command directory count as commands, how
//! directory entries are ordered and what happens when a command fails to
//! load. Every field has a default, so an empty YAML document is valid.
//!
//! # Example YAML
//!
//! ```yaml
//! extensions: [rs]
//! declaration_files: [mod.rs, lib.rs]
//! declaration_suffixes: []
//! sort_entries: true
//! on_load_error: skip
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What to do when a single command fails to load or violates the command
/// contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoadErrorPolicy {
    /// Stop discovery and report the error (the default).
    #[default]
    Abort,
    /// Log a warning, leave the command out and keep going.
    Skip,
}

/// Settings for walking a command directory.
///
/// # Examples
///
/// ```
/// use cmdtree_discovery::DiscoveryConfig;
///
/// let config = DiscoveryConfig::default();
/// assert!(config.is_command_file("deploy.rs"));
/// assert!(!config.is_command_file("mod.rs"));
/// assert!(!config.is_command_file("notes.md"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// File extensions (without the dot) that mark a command file.
    pub extensions: Vec<String>,
    /// Exact file names that only declare modules and never hold a command.
    pub declaration_files: Vec<String>,
    /// File name suffixes for declaration-only files (e.g. `.d.ts`).
    pub declaration_suffixes: Vec<String>,
    /// Sort directory entries by name instead of using listing order.
    pub sort_entries: bool,
    /// Failure policy for individual commands.
    pub on_load_error: LoadErrorPolicy,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["rs".to_string()],
            declaration_files: vec!["mod.rs".to_string(), "lib.rs".to_string()],
            declaration_suffixes: Vec::new(),
            sort_entries: true,
            on_load_error: LoadErrorPolicy::Abort,
        }
    }
}

impl DiscoveryConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigIo`](crate::Error::ConfigIo) if the file cannot be
    /// read, or [`Config`](crate::Error::Config) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Returns `true` if a file with this name should become a command.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_discovery::DiscoveryConfig;
    ///
    /// let config = DiscoveryConfig {
    ///     extensions: vec!["ts".into(), "js".into()],
    ///     declaration_suffixes: vec![".d.ts".into()],
    ///     ..DiscoveryConfig::default()
    /// };
    /// assert!(config.is_command_file("object.ts"));
    /// assert!(config.is_command_file("test.js"));
    /// assert!(!config.is_command_file("salesforce.d.ts"));
    /// ```
    pub fn is_command_file(&self, file_name: &str) -> bool {
        if self.declaration_files.iter().any(|name| name == file_name) {
            return false;
        }
        if self
            .declaration_suffixes
            .iter()
            .any(|suffix| file_name.ends_with(suffix.as_str()))
        {
            return false;
        }
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self.extensions.iter().any(|e| e == ext),
            _ => false,
        }
    }
}

/// Command name for a file: the text before the first `.`.
///
/// # Examples
///
/// ```
/// use cmdtree_discovery::command_name;
///
/// assert_eq!(command_name("object.rs"), "object");
/// assert_eq!(command_name("object.generated.rs"), "object");
/// ```
pub fn command_name(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}
