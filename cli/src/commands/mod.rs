//! Commands bundled with the binary.
//!
//! The layout of this directory is the command tree: `sf/extract/test.rs`
//! is `cmdtree sf extract test`. Every command file needs a matching
//! registry entry below.

use cmdtree_discovery::CommandRegistry;

pub mod flags;
pub mod sf;

/// Registry entries for every command file under this directory.
pub fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry
        .register::<sf::extract::test::ExtractTests>("sf/extract/test")
        .register::<flags::camel::Camel>("flags/camel");
    registry
}
