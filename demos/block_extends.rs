//! Block inheritance from a `blocks.toml` description.
//!
//! This example shows how to:
//! - Build a style tree from declarations
//! - Resolve children through `extends`
//! - Inspect lazily derived bases
//!
//! Run with `RUST_LOG=style_inherit=trace` to see resolution events.

use style_inherit_build::{build, BlocksConfig};
use tracing_subscriber::EnvFilter;

const BLOCKS: &str = r#"
[blocks.Button]
classes = ["icon", "icon:hover", "label"]

[blocks.PrimaryButton]
extends = "Button"
classes = ["icon", "badge"]
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Block Extends Example ===\n");

    let built = build(&BlocksConfig::from_str(BLOCKS)?)?;
    let tree = &built.tree;
    let primary = built.block("PrimaryButton").ok_or("PrimaryButton not built")?;

    // 1. Inheritance chain
    let chain: Vec<String> = tree
        .resolve_inheritance(primary)
        .into_iter()
        .map(|id| tree.path(id))
        .collect();
    println!("PrimaryButton inherits from: {:?}", chain);

    // 2. Child resolution, direct before inherited
    for name in ["icon", "label", "badge", "missing"] {
        let resolved = tree.resolve_child(primary, name).map(|id| tree.path(id));
        println!("  resolve_child({:?}) → {:?}", name, resolved);
    }

    // 3. Lazily derived base of a redeclared class
    if let Some(icon) = tree.get_child(primary, "icon") {
        println!("\nbefore read: {:?}", tree.base_state(icon));
        let base = tree.base(icon).map(|id| tree.path(id));
        println!("base of PrimaryButton.icon → {:?}", base);
        println!("after read:  {:?}", tree.base_state(icon));
    }

    // 4. Everything visible on the derived block
    println!("\nvisible children:");
    for (name, id) in tree.resolved_children(primary) {
        println!("  {:<8} from {}", name, tree.path(id));
    }

    Ok(())
}
