//! Parsing the process arguments against a built tree and running the
//! selected command.

use std::ffi::OsString;

use tracing::info;

use crate::bind::{bind_node, collect_options};
use crate::error::{Error, Result};
use crate::tree::CommandNode;

/// A complete command tree, ready to parse arguments exactly once.
#[derive(Debug)]
pub struct CommandTree {
    root: CommandNode,
    about: Option<String>,
    version: Option<String>,
}

impl CommandTree {
    /// Wraps a root namespace.
    pub fn new(root: CommandNode) -> Self {
        Self {
            root,
            about: None,
            version: None,
        }
    }

    /// Renames the root command (the program name in usage lines).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.root.rename(name);
        self
    }

    /// Sets the top-level help text.
    pub fn with_about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Enables `--version` on the root command.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn root(&self) -> &CommandNode {
        &self.root
    }

    /// Consumes the tree and returns the root for composition into a
    /// larger tree.
    pub fn into_root(self) -> CommandNode {
        self.root
    }

    /// Builds the clap command for the whole tree.
    pub fn to_clap(&mut self) -> clap::Command {
        let mut cmd = bind_node(&mut self.root);
        if let Some(about) = &self.about {
            cmd = cmd.about(about.clone());
        }
        if let Some(version) = &self.version {
            cmd = cmd.version(version.clone());
        }
        cmd
    }

    /// Parses `std::env::args_os()` and runs the selected command.
    pub fn run(self) -> Result<Vec<String>> {
        self.run_from(std::env::args_os())
    }

    /// Parses `args` (program name first) and runs the selected command.
    ///
    /// Returns the path of the command that ran.
    ///
    /// # Errors
    ///
    /// [`Error::Usage`] when parsing fails (the command is not run),
    /// [`Error::Options`] or [`Error::Command`] when the command fails.
    pub fn run_from<I, T>(mut self, args: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = self.to_clap();
        let matches = cli.try_get_matches_from(args)?;

        let mut path = Vec::new();
        let mut current = &matches;
        while let Some((name, sub)) = current.subcommand() {
            path.push(name.to_string());
            current = sub;
        }

        let shown = path.join(" ");
        let leaf = self
            .root
            .find_leaf_mut(&path)
            .ok_or_else(|| Error::NotANamespace(shown.clone()))?;
        let options = collect_options(leaf.schema(), current)?;

        info!(command = %shown, options = options.len(), "Dispatching command");
        leaf.invoke(&shown, options)?;
        Ok(path)
    }
}
