//! Directory-driven command trees on top of clap.
//!
//! This crate turns a directory of command files into a nested CLI:
//! every subdirectory becomes a namespace, every command file becomes an
//! invocable leaf, and each leaf's [`FlagSchema`](cmdtree_core::FlagSchema)
//! is bound to clap arguments. After parsing, the selected leaf receives
//! its options camelCased and typed.
//!
//! # Main entry points
//!
//! - [`CommandRegistry`]: maps command paths (`sf/extract/test`) to
//!   command factories.
//! - [`Discovery::discover`]: walks a directory and builds a
//!   [`CommandTree`].
//! - [`Discovery::discover_into`]: builds into an existing namespace for
//!   composition, without parsing.
//! - [`CommandTree::run`]: parses the process arguments once and runs the
//!   selected command.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::{FlagDefinition, FlagSchema};
//! use cmdtree_discovery::{Command, CommandRegistry, Discovery, DiscoveryConfig};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! struct DeployOptions {
//!     retry_count: i64,
//!     targets: Vec<String>,
//! }
//!
//! #[derive(Default)]
//! struct Deploy;
//!
//! impl Command for Deploy {
//!     type Options = DeployOptions;
//!
//!     fn description(&self) -> &str {
//!         "Deploy to targets"
//!     }
//!
//!     fn flags(&self) -> FlagSchema {
//!         FlagSchema::new()
//!             .flag("retry-count", FlagDefinition::integer("Retries").default_value(3))
//!             .flag("targets", FlagDefinition::array("Targets").required())
//!     }
//!
//!     fn run(&mut self, options: DeployOptions) -> anyhow::Result<()> {
//!         assert_eq!(options.retry_count, 3);
//!         assert_eq!(options.targets, vec!["a", "b"]);
//!         Ok(())
//!     }
//! }
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::create_dir(dir.path().join("ops")).unwrap();
//! std::fs::write(dir.path().join("ops/deploy.rs"), "").unwrap();
//!
//! let mut registry = CommandRegistry::new();
//! registry.register::<Deploy>("ops/deploy");
//!
//! let tree = Discovery::new(registry, DiscoveryConfig::default())
//!     .discover(dir.path())
//!     .unwrap()
//!     .with_name("app");
//! let ran = tree
//!     .run_from(["app", "ops", "deploy", "--targets", "a", "b"])
//!     .unwrap();
//! assert_eq!(ran, vec!["ops", "deploy"]);
//! ```

pub mod bind;
mod command;
mod config;
mod discover;
mod dispatch;
mod error;
mod registry;
mod tree;

pub use command::{Command, DynCommand, InvokeError};
pub use config::{DiscoveryConfig, LoadErrorPolicy, command_name};
pub use discover::Discovery;
pub use dispatch::CommandTree;
pub use error::{Error, LoadError, Result};
pub use registry::CommandRegistry;
pub use tree::{CommandNode, CommandState, LeafCommand, NodeKind};
