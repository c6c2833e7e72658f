use std::path::PathBuf;

use cmdtree_discovery::{CommandTree, Discovery, DiscoveryConfig, Error};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");
const PROGRAM_NAME: &str = "cmdtree";

/// Command directory this binary was built from.
const BUNDLED_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/src/commands");

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let result = build_tree().and_then(|tree| tree.run());

    match result {
        Ok(path) => debug!(command = %path.join(" "), "Command completed"),
        Err(Error::Usage(err)) => err.exit(),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.exit_code());
        }
    }
}

fn build_tree() -> cmdtree_discovery::Result<CommandTree> {
    let config = match std::env::var_os("CMDTREE_CONFIG") {
        Some(path) => {
            debug!(config = ?path, "Loading discovery config");
            DiscoveryConfig::load(PathBuf::from(path))?
        }
        None => DiscoveryConfig::default(),
    };
    let discovery = Discovery::new(commands::registry(), config);

    let tree = match command_root() {
        Some(root) => {
            debug!(root = %root.display(), "Discovering commands");
            discovery.discover(&root)?
        }
        None => {
            debug!("Command directory not available, building from registry");
            discovery.from_registry(PROGRAM_NAME)?
        }
    };

    Ok(tree
        .with_name(PROGRAM_NAME)
        .with_about("Directory-driven command tree")
        .with_version(PACKAGE_VERSION))
}

/// `CMDTREE_ROOT` when set, else the bundled directory if it still exists.
///
/// An explicit root is returned even when missing so discovery reports it.
fn command_root() -> Option<PathBuf> {
    if let Some(root) = std::env::var_os("CMDTREE_ROOT") {
        return Some(PathBuf::from(root));
    }
    let bundled = PathBuf::from(BUNDLED_ROOT);
    bundled.is_dir().then_some(bundled)
}
