//! Binding flag schemas to clap.
//!
//! Turns each [`FlagDefinition`] into a [`clap::Arg`] and, after parsing,
//! turns the matches back into [`ParsedOptions`]. Defaults are applied here
//! rather than handed to clap, so custom parsers see them as the previous
//! value and array flags supplied on the command line replace them.

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, value_parser};
use cmdtree_core::{FlagDefinition, FlagKind, FlagSchema, FlagValue, ParsedOptions, to_camel_case};

use crate::tree::{CommandNode, NodeKind};

/// Placeholder shown for flag values in usage lines.
pub const VALUE_NAME: &str = "value";

/// Builds the clap argument for one flag.
///
/// # Examples
///
/// ```
/// use cmdtree_core::FlagDefinition;
/// use cmdtree_discovery::bind::bind_flag;
///
/// let arg = bind_flag("targets", &FlagDefinition::array("Targets").short('t').required());
/// assert_eq!(arg.get_long(), Some("targets"));
/// assert_eq!(arg.get_short(), Some('t'));
/// assert!(arg.is_required_set());
/// ```
pub fn bind_flag(key: &str, definition: &FlagDefinition) -> Arg {
    let mut arg = Arg::new(key.to_string())
        .long(key.to_string())
        .help(help_text(definition))
        .required(definition.is_mandatory());

    if let Some(short) = definition.short {
        arg = arg.short(short);
    }

    match definition.kind {
        FlagKind::Boolean => {
            let on = matches!(definition.default_value, Some(FlagValue::Boolean(true)));
            arg.action(ArgAction::SetTrue)
                .default_value(if on { "true" } else { "false" })
        }
        FlagKind::Array => {
            let arg = arg
                .action(ArgAction::Append)
                .value_name(VALUE_NAME)
                .value_parser(value_parser!(String));
            // Arity follows the declared requirement, not mandatoriness.
            if definition.required {
                arg.num_args(1..)
            } else {
                arg.num_args(0..)
            }
        }
        FlagKind::Integer if definition.parse_arg.is_none() => arg
            .action(ArgAction::Append)
            .value_name(VALUE_NAME)
            .num_args(1)
            .allow_negative_numbers(true)
            .value_parser(value_parser!(i64)),
        FlagKind::Float if definition.parse_arg.is_none() => arg
            .action(ArgAction::Append)
            .value_name(VALUE_NAME)
            .num_args(1)
            .allow_negative_numbers(true)
            .value_parser(value_parser!(f64)),
        _ => arg
            .action(ArgAction::Append)
            .value_name(VALUE_NAME)
            .num_args(1)
            // A custom parser sees every token, including ones that look like flags.
            .allow_hyphen_values(definition.parse_arg.is_some())
            .value_parser(value_parser!(String)),
    }
}

fn help_text(definition: &FlagDefinition) -> String {
    match &definition.default_value {
        Some(FlagValue::Boolean(false)) | None => definition.description.clone(),
        Some(value) => format!("{} [default: {value}]", definition.description),
    }
}

/// Builds the clap command for a node and everything below it.
///
/// Leaves move to [`CommandState::Bound`](crate::CommandState::Bound).
pub fn bind_node(node: &mut CommandNode) -> clap::Command {
    let name = node.name().to_string();
    match node.kind_mut() {
        NodeKind::Namespace(children) => {
            let subcommands: Vec<clap::Command> = children.iter_mut().map(bind_node).collect();
            clap::Command::new(name)
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommands(subcommands)
        }
        NodeKind::Leaf(leaf) => {
            leaf.mark_bound();
            let description = leaf.description();
            let mut cmd = clap::Command::new(name);
            if let Some(summary) = description.lines().next() {
                cmd = cmd.about(summary.to_string());
            }
            if description.trim_end().contains('\n') {
                cmd = cmd.long_about(description.to_string());
            }
            cmd.args(
                leaf.schema()
                    .iter()
                    .map(|(key, definition)| bind_flag(key, definition)),
            )
        }
    }
}

/// Builds [`ParsedOptions`] from the matches of a leaf command.
///
/// # Errors
///
/// A [`clap::Error`] of kind `ValueValidation` when a custom parser
/// rejects a token.
pub fn collect_options(schema: &FlagSchema, matches: &ArgMatches) -> Result<ParsedOptions, clap::Error> {
    let mut options = ParsedOptions::new();

    for (key, definition) in schema.iter() {
        let name = to_camel_case(key);

        if definition.kind.is_boolean() {
            options.insert(name, FlagValue::Boolean(matches.get_flag(key)));
            continue;
        }

        let value = match &definition.parse_arg {
            Some(parser) => {
                let mut acc = definition.default_value.clone();
                if let Some(tokens) = matches.get_many::<String>(key) {
                    for token in tokens {
                        let next = parser(token, acc.as_ref()).map_err(|reason| {
                            clap::Error::raw(
                                ErrorKind::ValueValidation,
                                format!("invalid value '{token}' for '--{key}': {reason}\n"),
                            )
                        })?;
                        acc = Some(next);
                    }
                }
                acc
            }
            None => supplied_value(key, definition.kind, matches)
                .or_else(|| definition.default_value.clone()),
        };

        match value {
            Some(value) => options.insert(name, value),
            None if definition.kind.is_array() => options.insert(name, FlagValue::Array(Vec::new())),
            None => {}
        }
    }

    Ok(options)
}

/// Value given on the command line through the kind's canonical parser.
///
/// Scalars take the last occurrence; arrays keep every token in order.
fn supplied_value(key: &str, kind: FlagKind, matches: &ArgMatches) -> Option<FlagValue> {
    match kind {
        FlagKind::Integer => matches
            .get_many::<i64>(key)?
            .last()
            .map(|n| FlagValue::Integer(*n)),
        FlagKind::Float => matches
            .get_many::<f64>(key)?
            .last()
            .map(|n| FlagValue::Float(*n)),
        FlagKind::String => matches
            .get_many::<String>(key)?
            .last()
            .map(|s| FlagValue::String(s.clone())),
        FlagKind::Array => {
            let tokens = matches.get_many::<String>(key)?;
            Some(FlagValue::Array(
                tokens.map(|s| FlagValue::String(s.clone())).collect(),
            ))
        }
        FlagKind::Boolean => None,
    }
}
