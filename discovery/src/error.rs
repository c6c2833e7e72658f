//! Error types for command discovery and dispatch.
//!
//! One error type covers the whole lifecycle: structural problems while
//! walking the command directory, leaves that fail to load, usage errors
//! from argument parsing and failures raised by the dispatched command.

use std::path::PathBuf;

use cmdtree_core::ValidationError;
use thiserror::Error;

/// Why a registered command could not be produced for a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// No factory is registered for the command path.
    #[error("no command registered for path {0:?}")]
    NotRegistered(String),
}

/// Errors that can occur while building or running a command tree.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem I/O failure while walking the command directory.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Directory or entry being read.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// The command root exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Configuration file could not be read.
    #[error("config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("config YAML error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// A command module could not be loaded.
    #[error("failed to load command {path:?}: {source}")]
    Load {
        /// Command path, slash separated.
        path: String,
        /// Underlying failure.
        #[source]
        source: LoadError,
    },

    /// A command's flag schema breaks a structural rule.
    #[error("command {path:?} has an invalid flag schema: {source}")]
    Contract {
        /// Command path, slash separated.
        path: String,
        /// First validation failure.
        #[source]
        source: ValidationError,
    },

    /// A command's options type cannot be filled from its flag schema.
    #[error("command {path:?} options do not match its flag schema: {source}")]
    OptionsShape {
        /// Command path, slash separated.
        path: String,
        /// Deserialization failure for the sample options.
        #[source]
        source: serde_json::Error,
    },

    /// Two siblings resolve to the same command name.
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),

    /// A child was attached to a leaf command.
    #[error("{0:?} is a command, not a namespace")]
    NotANamespace(String),

    /// Argument parsing failed, or help/version output was requested.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// Parsed options could not be converted for the dispatched command.
    #[error("invalid options for {path:?}: {source}")]
    Options {
        /// Command path, space separated.
        path: String,
        /// Deserialization failure.
        #[source]
        source: serde_json::Error,
    },

    /// The dispatched command returned an error.
    #[error("command {path:?} failed: {source:#}")]
    Command {
        /// Command path, space separated.
        path: String,
        /// Error returned by `run`.
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    /// Whether the error belongs to a single leaf rather than the whole tree.
    ///
    /// These are the failures the [`LoadErrorPolicy`](crate::LoadErrorPolicy)
    /// decides about.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::Load { .. } | Self::Contract { .. } | Self::OptionsShape { .. }
        )
    }

    /// Process exit code for this error.
    ///
    /// Usage errors defer to clap (`2`, or `0` for help and version
    /// output); everything else is `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(err) => err.exit_code(),
            _ => 1,
        }
    }
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
