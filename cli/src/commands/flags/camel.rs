//! `flags camel`: show the option names flag keys are delivered under.

use std::collections::BTreeMap;

use cmdtree_core::{FlagDefinition, FlagSchema, is_hyphen_case, to_camel_case};
use cmdtree_discovery::Command;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CamelOptions {
    pub keys: Vec<String>,
    pub json: bool,
}

#[derive(Debug, Default)]
pub struct Camel;

impl Command for Camel {
    type Options = CamelOptions;

    fn description(&self) -> &str {
        "Print the camelCase option name for each flag key"
    }

    fn flags(&self) -> FlagSchema {
        FlagSchema::new()
            .flag(
                "keys",
                FlagDefinition::array("Hyphen-case flag keys to convert")
                    .short('k')
                    .required(),
            )
            .flag("json", FlagDefinition::boolean("Print a JSON object instead of lines").short('j'))
    }

    fn run(&mut self, options: CamelOptions) -> anyhow::Result<()> {
        for key in options.keys.iter().filter(|key| !is_hyphen_case(key)) {
            warn!(key = %key, "Key is not hyphen-case");
        }
        println!("{}", render(&options.keys, options.json)?);
        Ok(())
    }
}

/// One camelCase name per line, or a pretty JSON object keyed by input.
pub fn render(keys: &[String], json: bool) -> serde_json::Result<String> {
    if json {
        let mapping: BTreeMap<&str, String> = keys
            .iter()
            .map(|key| (key.as_str(), to_camel_case(key)))
            .collect();
        serde_json::to_string_pretty(&mapping)
    } else {
        Ok(keys
            .iter()
            .map(|key| to_camel_case(key))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
