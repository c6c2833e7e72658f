//! The command contract.
//!
//! A command describes itself (description and flag schema) and runs with
//! options built from that schema. Authors implement [`Command`]; the
//! engine only ever sees the object-safe [`DynCommand`].

use cmdtree_core::{FlagSchema, ParsedOptions};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// A command a leaf of the tree dispatches to.
///
/// `Options` is usually a struct deriving `Deserialize` with
/// `#[serde(rename_all = "camelCase")]`, one field per flag. Use
/// [`ParsedOptions`] to receive the untyped map instead.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{FlagDefinition, FlagSchema};
/// use cmdtree_discovery::Command;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct GreetOptions {
///     name: String,
///     loud: bool,
/// }
///
/// #[derive(Default)]
/// struct Greet;
///
/// impl Command for Greet {
///     type Options = GreetOptions;
///
///     fn description(&self) -> &str {
///         "Say hello"
///     }
///
///     fn flags(&self) -> FlagSchema {
///         FlagSchema::new()
///             .flag("name", FlagDefinition::string("Who to greet").required())
///             .flag("loud", FlagDefinition::boolean("Shout"))
///     }
///
///     fn run(&mut self, options: GreetOptions) -> anyhow::Result<()> {
///         let greeting = format!("hello {}", options.name);
///         if options.loud {
///             println!("{}", greeting.to_uppercase());
///         } else {
///             println!("{greeting}");
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Command: Send {
    /// Options the command runs with.
    type Options: DeserializeOwned;

    /// Help text. The first line is the short summary.
    fn description(&self) -> &str;

    /// Flags the command accepts.
    fn flags(&self) -> FlagSchema;

    /// Runs the command to completion.
    fn run(&mut self, options: Self::Options) -> anyhow::Result<()>;
}

/// Failure while invoking a command.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// Parsed options did not fit the command's options type.
    #[error("options do not fit the command: {0}")]
    Options(#[source] serde_json::Error),
    /// `run` returned an error.
    #[error("command failed: {0:#}")]
    Run(#[source] anyhow::Error),
}

/// Object-safe view of a [`Command`].
pub trait DynCommand: Send {
    fn description(&self) -> &str;

    fn flags(&self) -> FlagSchema;

    /// Checks that `sample` converts into the command's options type.
    fn check_options(&self, sample: &ParsedOptions) -> Result<(), serde_json::Error>;

    /// Converts `options` and runs the command.
    fn invoke(&mut self, options: ParsedOptions) -> Result<(), InvokeError>;
}

/// Adapter that erases a typed [`Command`].
pub(crate) struct Erased<C>(pub(crate) C);

impl<C: Command> DynCommand for Erased<C> {
    fn description(&self) -> &str {
        self.0.description()
    }

    fn flags(&self) -> FlagSchema {
        self.0.flags()
    }

    fn check_options(&self, sample: &ParsedOptions) -> Result<(), serde_json::Error> {
        sample.typed::<C::Options>().map(|_| ())
    }

    fn invoke(&mut self, options: ParsedOptions) -> Result<(), InvokeError> {
        let typed = options.typed::<C::Options>().map_err(InvokeError::Options)?;
        self.0.run(typed).map_err(InvokeError::Run)
    }
}
