use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use clap::error::ErrorKind;
use cmdtree_core::{FlagDefinition, FlagSchema, FlagValue, ParsedOptions};
use cmdtree_discovery::{
    Command, CommandNode, CommandRegistry, Discovery, DiscoveryConfig, Error, LoadErrorPolicy,
};
use serde::Deserialize;

type Calls = Arc<Mutex<Vec<ParsedOptions>>>;

/// Command that records the options it was invoked with.
struct Recorder {
    schema: FlagSchema,
    calls: Calls,
}

impl Command for Recorder {
    type Options = ParsedOptions;

    fn description(&self) -> &str {
        "Records its options"
    }

    fn flags(&self) -> FlagSchema {
        self.schema.clone()
    }

    fn run(&mut self, options: ParsedOptions) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(options);
        Ok(())
    }
}

fn register_recorder(registry: &mut CommandRegistry, path: &str, schema: FlagSchema) -> Calls {
    let calls: Calls = Arc::default();
    let shared = calls.clone();
    registry.register_with(path, move || Recorder {
        schema: schema.clone(),
        calls: shared.clone(),
    });
    calls
}

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "").unwrap();
}

fn deploy_schema() -> FlagSchema {
    FlagSchema::new()
        .flag("retry-count", FlagDefinition::integer("Retries").default_value(3))
        .flag("targets", FlagDefinition::array("Targets").short('t').required())
}

// ---------------------------------------------------------------------------
// Tree shape
// ---------------------------------------------------------------------------

#[test]
fn tree_mirrors_directory_layout() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a/b.rs");
    touch(dir.path(), "a/c/d.rs");
    touch(dir.path(), "a/mod.rs");
    touch(dir.path(), "a/c/mod.rs");
    touch(dir.path(), "a/README.md");

    let mut registry = CommandRegistry::new();
    register_recorder(&mut registry, "a/b", FlagSchema::new());
    register_recorder(&mut registry, "a/c/d", FlagSchema::new());

    let tree = Discovery::new(registry, DiscoveryConfig::default())
        .discover(dir.path())
        .unwrap();

    assert_eq!(
        tree.root().leaf_paths(),
        vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["a".to_string(), "c".to_string(), "d".to_string()],
        ]
    );
}

#[test]
fn both_paths_are_invocable() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a/b.rs");
    touch(dir.path(), "a/c/d.rs");

    for (args, expected) in [
        (vec!["app", "a", "b"], vec!["a", "b"]),
        (vec!["app", "a", "c", "d"], vec!["a", "c", "d"]),
    ] {
        let mut registry = CommandRegistry::new();
        let b = register_recorder(&mut registry, "a/b", FlagSchema::new());
        let d = register_recorder(&mut registry, "a/c/d", FlagSchema::new());

        let ran = Discovery::new(registry, DiscoveryConfig::default())
            .discover(dir.path())
            .unwrap()
            .run_from(args)
            .unwrap();
        assert_eq!(ran, expected);
        let total = b.lock().unwrap().len() + d.lock().unwrap().len();
        assert_eq!(total, 1, "exactly one leaf runs");
    }
}

#[test]
fn namespace_alone_is_not_invocable() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a/c/d.rs");

    let mut registry = CommandRegistry::new();
    register_recorder(&mut registry, "a/c/d", FlagSchema::new());

    let err = Discovery::new(registry, DiscoveryConfig::default())
        .discover(dir.path())
        .unwrap()
        .run_from(["app", "a", "c"])
        .unwrap_err();
    assert!(matches!(err, Error::Usage(_)));
    assert_ne!(err.exit_code(), 1);
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a/b.rs");

    let mut registry = CommandRegistry::new();
    let calls = register_recorder(&mut registry, "a/b", FlagSchema::new());

    let err = Discovery::new(registry, DiscoveryConfig::default())
        .discover(dir.path())
        .unwrap()
        .run_from(["app", "a", "zzz"])
        .unwrap_err();
    match err {
        Error::Usage(e) => assert_eq!(e.kind(), ErrorKind::InvalidSubcommand),
        other => panic!("expected usage error, got {other:?}"),
    }
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn declaration_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "sf/types/object.ts");
    touch(dir.path(), "sf/types/salesforce.d.ts");
    touch(dir.path(), "sf/extract/test.js");

    let config = DiscoveryConfig {
        extensions: vec!["ts".into(), "js".into()],
        declaration_suffixes: vec![".d.ts".into()],
        ..DiscoveryConfig::default()
    };
    let mut registry = CommandRegistry::new();
    register_recorder(&mut registry, "sf/types/object", FlagSchema::new());
    register_recorder(&mut registry, "sf/extract/test", FlagSchema::new());

    let tree = Discovery::new(registry, config).discover(dir.path()).unwrap();
    assert_eq!(
        tree.root().leaf_paths(),
        vec![
            vec!["sf".to_string(), "extract".to_string(), "test".to_string()],
            vec!["sf".to_string(), "types".to_string(), "object".to_string()],
        ]
    );
}

#[test]
fn duplicate_sibling_names_are_fatal() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "report.rs");
    touch(dir.path(), "report.summary.rs");

    let mut registry = CommandRegistry::new();
    register_recorder(&mut registry, "report", FlagSchema::new());

    let err = Discovery::new(registry, DiscoveryConfig::default())
        .discover(dir.path())
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateCommand(_)));
}

// ---------------------------------------------------------------------------
// Structural and load failures
// ---------------------------------------------------------------------------

#[test]
fn missing_root_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = Discovery::new(CommandRegistry::new(), DiscoveryConfig::default())
        .discover(dir.path().join("nope"))
        .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn file_root_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "file.rs");
    let err = Discovery::new(CommandRegistry::new(), DiscoveryConfig::default())
        .discover(dir.path().join("file.rs"))
        .unwrap_err();
    assert!(matches!(err, Error::NotADirectory(_)));
}

#[test]
fn unregistered_command_aborts_by_default() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a/b.rs");
    touch(dir.path(), "a/orphan.rs");

    let mut registry = CommandRegistry::new();
    register_recorder(&mut registry, "a/b", FlagSchema::new());

    let err = Discovery::new(registry, DiscoveryConfig::default())
        .discover(dir.path())
        .unwrap_err();
    assert!(matches!(err, Error::Load { ref path, .. } if path == "a/orphan"));
}

#[test]
fn skip_policy_keeps_siblings_usable() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a/b.rs");
    touch(dir.path(), "a/orphan.rs");
    touch(dir.path(), "a/broken.rs");

    let config = DiscoveryConfig {
        on_load_error: LoadErrorPolicy::Skip,
        ..DiscoveryConfig::default()
    };
    let mut registry = CommandRegistry::new();
    let calls = register_recorder(&mut registry, "a/b", FlagSchema::new());
    register_recorder(
        &mut registry,
        "a/broken",
        FlagSchema::new().flag("--bad", FlagDefinition::string("x")),
    );

    let tree = Discovery::new(registry, config).discover(dir.path()).unwrap();
    assert_eq!(
        tree.root().leaf_paths(),
        vec![vec!["a".to_string(), "b".to_string()]]
    );

    tree.run_from(["app", "a", "b"]).unwrap();
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[test]
fn invalid_schema_is_contract_error() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "host.rs");

    let mut registry = CommandRegistry::new();
    register_recorder(
        &mut registry,
        "host",
        FlagSchema::new().flag("host", FlagDefinition::string("h").short('h')),
    );

    let err = Discovery::new(registry, DiscoveryConfig::default())
        .discover(dir.path())
        .unwrap_err();
    assert!(matches!(err, Error::Contract { .. }));
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct NeedsUser {
    user_name: String,
}

#[derive(Default)]
struct Mismatched;

impl Command for Mismatched {
    type Options = NeedsUser;

    fn description(&self) -> &str {
        "Options struct wants a flag the schema does not declare"
    }

    fn flags(&self) -> FlagSchema {
        FlagSchema::new().flag("username", FlagDefinition::string("u"))
    }

    fn run(&mut self, _: NeedsUser) -> anyhow::Result<()> {
        Ok(())
    }
}

#[test]
fn options_struct_must_match_schema() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "login.rs");

    let mut registry = CommandRegistry::new();
    registry.register::<Mismatched>("login");

    let err = Discovery::new(registry, DiscoveryConfig::default())
        .discover(dir.path())
        .unwrap_err();
    assert!(matches!(err, Error::OptionsShape { .. }));
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct NeedsPresentUser {
    user: String,
}

#[derive(Default)]
struct AbsentableUser;

impl Command for AbsentableUser {
    type Options = NeedsPresentUser;

    fn description(&self) -> &str {
        "Options struct requires a flag that may be omitted"
    }

    fn flags(&self) -> FlagSchema {
        FlagSchema::new().flag("user", FlagDefinition::string("u"))
    }

    fn run(&mut self, _: NeedsPresentUser) -> anyhow::Result<()> {
        Ok(())
    }
}

#[test]
fn optional_flag_needs_optional_field() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "go.rs");

    let mut registry = CommandRegistry::new();
    registry.register::<AbsentableUser>("go");

    let err = Discovery::new(registry, DiscoveryConfig::default())
        .discover(dir.path())
        .unwrap_err();
    assert!(matches!(err, Error::OptionsShape { ref path, .. } if path == "go"));
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct MaybeUser {
    user: Option<String>,
}

#[derive(Default)]
struct OptionalUser;

impl Command for OptionalUser {
    type Options = MaybeUser;

    fn description(&self) -> &str {
        "Options struct accepts an omitted flag"
    }

    fn flags(&self) -> FlagSchema {
        FlagSchema::new().flag("user", FlagDefinition::string("u"))
    }

    fn run(&mut self, _: MaybeUser) -> anyhow::Result<()> {
        Ok(())
    }
}

#[test]
fn optional_flag_with_option_field_loads_and_runs() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "go.rs");

    let mut registry = CommandRegistry::new();
    registry.register::<OptionalUser>("go");

    let tree = Discovery::new(registry, DiscoveryConfig::default())
        .discover(dir.path())
        .unwrap();
    tree.run_from(["app", "go"]).unwrap();
}

// ---------------------------------------------------------------------------
// Binding and dispatch
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeployOptions {
    retry_count: i64,
    targets: Vec<String>,
}

struct Deploy {
    seen: Arc<Mutex<Option<(i64, Vec<String>)>>>,
}

impl Command for Deploy {
    type Options = DeployOptions;

    fn description(&self) -> &str {
        "Deploy to targets\n\nRetries each target on failure."
    }

    fn flags(&self) -> FlagSchema {
        deploy_schema()
    }

    fn run(&mut self, options: DeployOptions) -> anyhow::Result<()> {
        *self.seen.lock().unwrap() = Some((options.retry_count, options.targets));
        Ok(())
    }
}

fn deploy_tree(root: &Path) -> (cmdtree_discovery::CommandTree, Arc<Mutex<Option<(i64, Vec<String>)>>>) {
    touch(root, "deploy.rs");
    let seen = Arc::new(Mutex::new(None));
    let shared = seen.clone();
    let mut registry = CommandRegistry::new();
    registry.register_with("deploy", move || Deploy {
        seen: shared.clone(),
    });
    let tree = Discovery::new(registry, DiscoveryConfig::default())
        .discover(root)
        .unwrap();
    (tree, seen)
}

#[test]
fn end_to_end_typed_options() {
    let dir = tempfile::tempdir().unwrap();
    let (tree, seen) = deploy_tree(dir.path());

    tree.run_from(["app", "deploy", "--targets", "a", "b", "c"])
        .unwrap();
    assert_eq!(
        seen.lock().unwrap().clone(),
        Some((3, vec!["a".to_string(), "b".to_string(), "c".to_string()]))
    );
}

#[test]
fn end_to_end_missing_required_array() {
    let dir = tempfile::tempdir().unwrap();
    let (tree, seen) = deploy_tree(dir.path());

    let err = tree.run_from(["app", "deploy"]).unwrap_err();
    match err {
        Error::Usage(e) => assert_eq!(e.kind(), ErrorKind::MissingRequiredArgument),
        other => panic!("expected usage error, got {other:?}"),
    }
    assert!(seen.lock().unwrap().is_none(), "run must not be called");
}

#[test]
fn required_array_flag_without_tokens_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (tree, seen) = deploy_tree(dir.path());

    let err = tree.run_from(["app", "deploy", "--targets"]).unwrap_err();
    assert!(matches!(err, Error::Usage(_)));
    assert!(seen.lock().unwrap().is_none());
}

#[test]
fn malformed_integer_does_not_run() {
    let dir = tempfile::tempdir().unwrap();
    let (tree, seen) = deploy_tree(dir.path());

    let err = tree
        .run_from(["app", "deploy", "-t", "a", "--retry-count", "lots"])
        .unwrap_err();
    assert!(matches!(err, Error::Usage(_)));
    assert!(seen.lock().unwrap().is_none());
}

#[test]
fn untyped_options_are_camel_cased_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "sf/types/object.rs");

    let schema = FlagSchema::new()
        .flag("sobject", FlagDefinition::array("SObjects").short('s').required())
        .flag(
            "output-dir",
            FlagDefinition::string("Output directory")
                .short('o')
                .default_value("./types/"),
        )
        .flag("username", FlagDefinition::string("User").short('u').required())
        .flag("case-insensitive", FlagDefinition::boolean("Ignore case").short('i'))
        .flag("declare-module", FlagDefinition::boolean("Declare module").short('b'));
    let mut registry = CommandRegistry::new();
    let calls = register_recorder(&mut registry, "sf/types/object", schema);

    Discovery::new(registry, DiscoveryConfig::default())
        .discover(dir.path())
        .unwrap()
        .run_from([
            "app", "sf", "types", "object", "-u", "me@example.com", "-s", "Account", "Contact",
            "-i",
        ])
        .unwrap();

    let calls = calls.lock().unwrap();
    let options = &calls[0];
    assert_eq!(
        options.get("sobject"),
        Some(&FlagValue::from(vec!["Account", "Contact"]))
    );
    assert_eq!(options.get_str("outputDir"), Some("./types/"));
    assert_eq!(options.get_str("username"), Some("me@example.com"));
    assert_eq!(options.get("caseInsensitive"), Some(&FlagValue::Boolean(true)));
    assert_eq!(options.get("declareModule"), Some(&FlagValue::Boolean(false)));
    assert_eq!(options.len(), 5);
}

#[test]
fn custom_parser_output_is_used_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "scale.rs");

    let schema = FlagSchema::new().flag(
        "factor",
        FlagDefinition::float("Scale factor").parse_arg(|raw, _| {
            Ok(FlagValue::String(format!("custom:{raw}")))
        }),
    );
    let mut registry = CommandRegistry::new();
    let calls = register_recorder(&mut registry, "scale", schema);

    Discovery::new(registry, DiscoveryConfig::default())
        .discover(dir.path())
        .unwrap()
        .run_from(["app", "scale", "--factor", "not-a-number"])
        .unwrap();

    assert_eq!(
        calls.lock().unwrap()[0].get_str("factor"),
        Some("custom:not-a-number")
    );
}

#[test]
fn negative_numbers_reach_the_command() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "go.rs");

    let schema = FlagSchema::new()
        .flag("offset", FlagDefinition::integer("Offset"))
        .flag("ratio", FlagDefinition::float("Ratio"))
        .flag(
            "shift",
            FlagDefinition::integer("Shift").parse_arg(|raw, _| Ok(FlagValue::String(raw.to_string()))),
        );
    let mut registry = CommandRegistry::new();
    let calls = register_recorder(&mut registry, "go", schema);

    Discovery::new(registry, DiscoveryConfig::default())
        .discover(dir.path())
        .unwrap()
        .run_from(["app", "go", "--offset", "-5", "--ratio", "-0.5", "--shift", "-1"])
        .unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls[0].get_i64("offset"), Some(-5));
    assert_eq!(calls[0].get_f64("ratio"), Some(-0.5));
    assert_eq!(calls[0].get_str("shift"), Some("-1"));
}

#[derive(Default)]
struct Explodes;

impl Command for Explodes {
    type Options = ParsedOptions;

    fn description(&self) -> &str {
        "Always fails"
    }

    fn flags(&self) -> FlagSchema {
        FlagSchema::new()
    }

    fn run(&mut self, _: ParsedOptions) -> anyhow::Result<()> {
        anyhow::bail!("remote said no")
    }
}

#[test]
fn run_failure_propagates() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "explode.rs");

    let mut registry = CommandRegistry::new();
    registry.register::<Explodes>("explode");

    let err = Discovery::new(registry, DiscoveryConfig::default())
        .discover(dir.path())
        .unwrap()
        .run_from(["app", "explode"])
        .unwrap_err();
    assert!(matches!(err, Error::Command { ref path, .. } if path == "explode"));
    assert!(err.to_string().contains("remote said no"));
    assert_eq!(err.exit_code(), 1);
}

// ---------------------------------------------------------------------------
// Composition and registry-only trees
// ---------------------------------------------------------------------------

#[test]
fn discover_into_composes_under_parent() {
    let outer = tempfile::tempdir().unwrap();
    let inner = tempfile::tempdir().unwrap();
    touch(outer.path(), "status.rs");
    touch(inner.path(), "sync.rs");

    let mut registry = CommandRegistry::new();
    register_recorder(&mut registry, "status", FlagSchema::new());
    let calls = register_recorder(&mut registry, "sync", FlagSchema::new());
    let discovery = Discovery::new(registry, DiscoveryConfig::default());

    let plugins = discovery
        .discover_into(inner.path(), CommandNode::namespace("plugins"))
        .unwrap();
    let mut root = discovery
        .discover(outer.path())
        .unwrap()
        .with_name("app")
        .into_root();
    root.add_child(plugins).unwrap();

    let tree = cmdtree_discovery::CommandTree::new(root);
    assert_eq!(
        tree.root().leaf_paths(),
        vec![
            vec!["status".to_string()],
            vec!["plugins".to_string(), "sync".to_string()],
        ]
    );
    tree.run_from(["app", "plugins", "sync"]).unwrap();
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[test]
fn from_registry_builds_same_shape() {
    let mut registry = CommandRegistry::new();
    register_recorder(&mut registry, "a/b", FlagSchema::new());
    register_recorder(&mut registry, "a/c/d", FlagSchema::new());
    let calls = register_recorder(&mut registry, "top", deploy_schema());

    let tree = Discovery::new(registry, DiscoveryConfig::default())
        .from_registry("app")
        .unwrap();
    assert_eq!(
        tree.root().leaf_paths(),
        vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["a".to_string(), "c".to_string(), "d".to_string()],
            vec!["top".to_string()],
        ]
    );

    tree.run_from(["app", "top", "-t", "x"]).unwrap();
    let calls = calls.lock().unwrap();
    assert_eq!(calls[0].get_i64("retryCount"), Some(3));
    assert_eq!(calls[0].get("targets"), Some(&FlagValue::from(vec!["x"])));
}

#[test]
fn from_registry_rejects_leaf_used_as_namespace() {
    let mut registry = CommandRegistry::new();
    register_recorder(&mut registry, "a", FlagSchema::new());
    register_recorder(&mut registry, "a/b", FlagSchema::new());

    let err = Discovery::new(registry, DiscoveryConfig::default())
        .from_registry("app")
        .unwrap_err();
    assert!(matches!(err, Error::NotANamespace(_)));
}

#[test]
fn help_output_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    let (mut tree, _) = deploy_tree(dir.path());

    let help = tree.to_clap().render_help().to_string();
    assert!(help.contains("deploy"));
    assert!(help.contains("Deploy to targets"));

    let err = tree.run_from(["app", "--help"]).unwrap_err();
    assert_eq!(err.exit_code(), 0);
}
