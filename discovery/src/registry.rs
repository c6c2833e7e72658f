//! Command registry.
//!
//! Maps a command path (`sf/extract/test`: the file's location under the
//! command root, extension dropped) to a factory that produces a fresh
//! command. Discovery decides where a command sits in the tree by walking
//! the filesystem; the registry decides what runs there.

use std::collections::BTreeMap;
use std::fmt;

use crate::command::{Command, DynCommand, Erased};
use crate::error::LoadError;

type Factory = Box<dyn Fn() -> Box<dyn DynCommand> + Send + Sync>;

/// Table of command factories keyed by slash-separated command path.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{FlagSchema, ParsedOptions};
/// use cmdtree_discovery::{Command, CommandRegistry};
///
/// #[derive(Default)]
/// struct Noop;
///
/// impl Command for Noop {
///     type Options = ParsedOptions;
///     fn description(&self) -> &str { "Does nothing" }
///     fn flags(&self) -> FlagSchema { FlagSchema::new() }
///     fn run(&mut self, _: ParsedOptions) -> anyhow::Result<()> { Ok(()) }
/// }
///
/// let mut registry = CommandRegistry::new();
/// registry.register::<Noop>("tools/noop");
///
/// assert!(registry.contains("tools/noop"));
/// assert!(registry.load("tools/noop").is_ok());
/// assert!(registry.load("tools/missing").is_err());
/// ```
#[derive(Default)]
pub struct CommandRegistry {
    factories: BTreeMap<String, Factory>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `C::default()` under `path`.
    pub fn register<C>(&mut self, path: &str) -> &mut Self
    where
        C: Command + Default + 'static,
    {
        self.register_with(path, C::default)
    }

    /// Registers a factory under `path`, replacing any previous one.
    pub fn register_with<C, F>(&mut self, path: &str, factory: F) -> &mut Self
    where
        C: Command + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        let path = normalize_path(path);
        self.factories.insert(
            path,
            Box::new(move || Box::new(Erased(factory())) as Box<dyn DynCommand>),
        );
        self
    }

    /// Produces a fresh command for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotRegistered`] if nothing is registered there.
    pub fn load(&self, path: &str) -> Result<Box<dyn DynCommand>, LoadError> {
        let path = normalize_path(path);
        self.factories
            .get(&path)
            .map(|factory| factory())
            .ok_or(LoadError::NotRegistered(path))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.factories.contains_key(&normalize_path(path))
    }

    /// Registered paths in lexicographic order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("paths", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Trims stray separators so `/a/b/` and `a/b` name the same command.
fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
