//! Directory walk that builds the command tree.

use std::fs;
use std::path::Path;

use cmdtree_core::{ParsedOptions, validate_flag_schema};
use tracing::{debug, warn};

use crate::config::{DiscoveryConfig, LoadErrorPolicy, command_name};
use crate::dispatch::CommandTree;
use crate::error::{Error, Result};
use crate::registry::CommandRegistry;
use crate::tree::{CommandNode, LeafCommand};

/// Builds command trees from a directory (or from the registry alone).
///
/// Subdirectories become namespaces and command files become leaves whose
/// implementation comes from the [`CommandRegistry`] entry at the same
/// path. Construction is sequential and depth first: each subtree is
/// complete before the walk moves to the next entry.
///
/// # Examples
///
/// ```no_run
/// use cmdtree_discovery::{CommandRegistry, Discovery, DiscoveryConfig};
///
/// let registry = CommandRegistry::new();
/// let discovery = Discovery::new(registry, DiscoveryConfig::default());
/// let tree = discovery.discover("src/commands").unwrap();
/// tree.run().unwrap();
/// ```
#[derive(Debug)]
pub struct Discovery {
    registry: CommandRegistry,
    config: DiscoveryConfig,
}

impl Discovery {
    pub fn new(registry: CommandRegistry, config: DiscoveryConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Builds the tree for `root`. The root node is named after the
    /// directory.
    ///
    /// # Errors
    ///
    /// Structural errors ([`Error::Io`], [`Error::NotADirectory`],
    /// [`Error::DuplicateCommand`]) always abort. Load failures abort
    /// unless the policy is [`LoadErrorPolicy::Skip`].
    pub fn discover(&self, root: impl AsRef<Path>) -> Result<CommandTree> {
        let root = root.as_ref();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cli".to_string());
        let node = self.discover_into(root, CommandNode::namespace(name))?;
        Ok(CommandTree::new(node))
    }

    /// Builds the tree for `root` into an existing namespace and returns
    /// it without parsing anything.
    pub fn discover_into(&self, root: impl AsRef<Path>, mut parent: CommandNode) -> Result<CommandNode> {
        let root = root.as_ref();
        if parent.is_leaf() {
            return Err(Error::NotANamespace(parent.name().to_string()));
        }
        let metadata = fs::metadata(root).map_err(|source| Error::Io {
            path: root.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(Error::NotADirectory(root.to_path_buf()));
        }

        let mut prefix = Vec::new();
        self.walk(root, &mut prefix, &mut parent)?;
        Ok(parent)
    }

    /// Builds the tree from registered paths alone, without a filesystem.
    ///
    /// Produces the same shape the directory walk would for a directory
    /// holding exactly the registered commands.
    pub fn from_registry(&self, name: &str) -> Result<CommandTree> {
        let mut root = CommandNode::namespace(name);
        for path in self.registry.paths() {
            let segments: Vec<&str> = path.split('/').collect();
            let Some((leaf_name, namespaces)) = segments.split_last() else {
                continue;
            };

            let Some(leaf) = self.load_leaf(path)? else {
                continue;
            };

            let mut node = &mut root;
            for segment in namespaces {
                if node.find(&[*segment]).is_none() {
                    node.add_child(CommandNode::namespace(*segment))?;
                }
                node = node
                    .child_mut(segment)
                    .ok_or_else(|| Error::NotANamespace(segment.to_string()))?;
            }
            node.add_child(CommandNode::leaf(*leaf_name, leaf))?;
            debug!(command = path, "Registered command");
        }
        Ok(CommandTree::new(root))
    }

    fn walk(&self, dir: &Path, prefix: &mut Vec<String>, parent: &mut CommandNode) -> Result<()> {
        let io_err = |source| Error::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let file_type = entry.file_type().map_err(io_err)?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            entries.push((file_name, file_type, entry.path()));
        }
        if self.config.sort_entries {
            entries.sort_by(|a, b| a.0.cmp(&b.0));
        }

        for (file_name, file_type, path) in entries {
            if file_type.is_dir() {
                debug!(namespace = %file_name, dir = %path.display(), "Discovered namespace");
                let mut namespace = CommandNode::namespace(file_name.clone());
                prefix.push(file_name);
                let walked = self.walk(&path, prefix, &mut namespace);
                prefix.pop();
                walked?;
                parent.add_child(namespace)?;
            } else if file_type.is_file() {
                if !self.config.is_command_file(&file_name) {
                    debug!(file = %path.display(), "Skipping non-command file");
                    continue;
                }
                let name = command_name(&file_name).to_string();
                prefix.push(name.clone());
                let command_path = prefix.join("/");
                prefix.pop();

                if let Some(leaf) = self.load_leaf(&command_path)? {
                    parent.add_child(CommandNode::leaf(name, leaf))?;
                    debug!(command = %command_path, file = %path.display(), "Registered command");
                }
            } else {
                debug!(entry = %path.display(), "Ignoring entry that is neither file nor directory");
            }
        }

        Ok(())
    }

    /// Loads and checks one command, applying the load error policy.
    ///
    /// `Ok(None)` means the command was skipped.
    fn load_leaf(&self, path: &str) -> Result<Option<LeafCommand>> {
        match self.try_load_leaf(path) {
            Ok(leaf) => Ok(Some(leaf)),
            Err(err) if err.is_load_failure() && self.config.on_load_error == LoadErrorPolicy::Skip => {
                warn!(command = path, error = %err, "Skipping command that failed to load");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn try_load_leaf(&self, path: &str) -> Result<LeafCommand> {
        let command = self.registry.load(path).map_err(|source| Error::Load {
            path: path.to_string(),
            source,
        })?;
        let leaf = LeafCommand::new(command);

        if let Some(source) = validate_flag_schema(leaf.schema()).into_iter().next() {
            return Err(Error::Contract {
                path: path.to_string(),
                source,
            });
        }
        leaf.check_options(&ParsedOptions::sample(leaf.schema()))
            .map_err(|source| Error::OptionsShape {
                path: path.to_string(),
                source,
            })?;

        Ok(leaf)
    }
}
