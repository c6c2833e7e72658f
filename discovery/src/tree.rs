//! Command tree nodes.

use std::fmt;

use cmdtree_core::{FlagSchema, ParsedOptions};
use tracing::debug;

use crate::command::{DynCommand, InvokeError};
use crate::error::{Error, Result};

/// Lifecycle of a leaf command within one process run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    /// Loaded and its schema read.
    Declared,
    /// Its flags were turned into clap arguments.
    Bound,
    /// Options handed over, `run` in progress.
    Invoked,
    /// `run` returned successfully.
    Completed,
    /// Options conversion or `run` failed.
    Failed,
}

/// An invocable command.
pub struct LeafCommand {
    description: String,
    schema: FlagSchema,
    command: Box<dyn DynCommand>,
    state: CommandState,
}

impl LeafCommand {
    pub(crate) fn new(command: Box<dyn DynCommand>) -> Self {
        Self {
            description: command.description().to_string(),
            schema: command.flags(),
            command,
            state: CommandState::Declared,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn schema(&self) -> &FlagSchema {
        &self.schema
    }

    pub fn state(&self) -> CommandState {
        self.state
    }

    pub(crate) fn check_options(&self, sample: &ParsedOptions) -> std::result::Result<(), serde_json::Error> {
        self.command.check_options(sample)
    }

    pub(crate) fn mark_bound(&mut self) {
        if self.state == CommandState::Declared {
            self.state = CommandState::Bound;
        }
    }

    /// Hands `options` to the command and runs it.
    pub(crate) fn invoke(&mut self, path: &str, options: ParsedOptions) -> Result<()> {
        self.state = CommandState::Invoked;
        debug!(command = path, "Invoking command");

        let outcome = self.command.invoke(options);
        self.state = if outcome.is_ok() {
            CommandState::Completed
        } else {
            CommandState::Failed
        };
        debug!(command = path, state = ?self.state, "Command finished");

        outcome.map_err(|err| match err {
            InvokeError::Options(source) => Error::Options {
                path: path.to_string(),
                source,
            },
            InvokeError::Run(source) => Error::Command {
                path: path.to_string(),
                source,
            },
        })
    }
}

impl fmt::Debug for LeafCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafCommand")
            .field("description", &self.description)
            .field("schema", &self.schema)
            .field("state", &self.state)
            .finish()
    }
}

/// What a node holds.
#[derive(Debug)]
pub enum NodeKind {
    /// Grouping node for a subdirectory.
    Namespace(Vec<CommandNode>),
    /// Invocable command for a file.
    Leaf(Box<LeafCommand>),
}

/// A named node of the command tree.
///
/// # Examples
///
/// ```
/// use cmdtree_discovery::CommandNode;
///
/// let mut root = CommandNode::namespace("app");
/// root.add_child(CommandNode::namespace("sf")).unwrap();
///
/// assert!(root.find(&["sf"]).is_some());
/// assert!(root.add_child(CommandNode::namespace("sf")).is_err());
/// ```
#[derive(Debug)]
pub struct CommandNode {
    name: String,
    kind: NodeKind,
}

impl CommandNode {
    /// Creates an empty namespace.
    pub fn namespace(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Namespace(Vec::new()),
        }
    }

    pub(crate) fn leaf(name: impl Into<String>, leaf: LeafCommand) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Leaf(Box::new(leaf)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Children of a namespace; empty for a leaf.
    pub fn children(&self) -> &[CommandNode] {
        match &self.kind {
            NodeKind::Namespace(children) => children,
            NodeKind::Leaf(_) => &[],
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafCommand> {
        match &self.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Namespace(_) => None,
        }
    }

    /// Attaches a child to this namespace.
    ///
    /// # Errors
    ///
    /// [`Error::NotANamespace`] if this node is a leaf,
    /// [`Error::DuplicateCommand`] if a child with the same name exists.
    pub fn add_child(&mut self, child: CommandNode) -> Result<()> {
        let NodeKind::Namespace(children) = &mut self.kind else {
            return Err(Error::NotANamespace(self.name.clone()));
        };
        if children.iter().any(|c| c.name == child.name) {
            return Err(Error::DuplicateCommand(format!(
                "{} {}",
                self.name, child.name
            )));
        }
        children.push(child);
        Ok(())
    }

    pub(crate) fn child_mut(&mut self, name: &str) -> Option<&mut CommandNode> {
        match &mut self.kind {
            NodeKind::Namespace(children) => children.iter_mut().find(|c| c.name == name),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Looks up a descendant by path relative to this node.
    pub fn find(&self, path: &[&str]) -> Option<&CommandNode> {
        let mut node = self;
        for segment in path {
            node = node.children().iter().find(|c| c.name == *segment)?;
        }
        Some(node)
    }

    pub(crate) fn find_leaf_mut(&mut self, path: &[String]) -> Option<&mut LeafCommand> {
        let mut node = self;
        for segment in path {
            node = node.child_mut(segment)?;
        }
        match &mut node.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Namespace(_) => None,
        }
    }

    /// Every invocable path below this node, depth first in tree order.
    ///
    /// Paths are relative: they do not include this node's own name.
    pub fn leaf_paths(&self) -> Vec<Vec<String>> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        collect_leaf_paths(self, &mut prefix, &mut out);
        out
    }
}

fn collect_leaf_paths(node: &CommandNode, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
    for child in node.children() {
        prefix.push(child.name.clone());
        if child.is_leaf() {
            out.push(prefix.clone());
        } else {
            collect_leaf_paths(child, prefix, out);
        }
        prefix.pop();
    }
}
