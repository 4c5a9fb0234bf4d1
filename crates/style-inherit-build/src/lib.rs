//! Declarative builder for style-inherit trees.
//!
//! This crate provides tools for:
//! - Parsing `blocks.toml` declarations
//! - Building a fully wired [`StyleTree`], including `extends` declarations
//!
//! # Format
//!
//! ```toml
//! [blocks.Base]
//! classes = ["foo", "foo:hover", "bar"]
//!
//! [blocks.Derived]
//! extends = "Base"
//! classes = ["baz"]
//! ```
//!
//! A `class:state` entry implies its class. Only blocks carry explicit
//! `extends`; classes and states derive their bases lazily by name.
//!
//! # Usage
//!
//! ```ignore
//! let built = style_inherit_build::load("blocks.toml")?;
//! let derived = built.block("Derived").unwrap();
//! let foo = built.tree.resolve_child(derived, "foo");
//! ```

mod blocks_config;

pub use blocks_config::{BlockEntry, BlocksConfig, BlocksConfigError, SelectorEntry};

use std::collections::BTreeMap;
use std::path::Path;

use style_inherit::{InheritError, NodeId, StyleTree};
use thiserror::Error;
use tracing::{debug, info};

/// A built tree and its root-level blocks by name.
#[derive(Debug, Default)]
pub struct BuiltStyles {
    pub tree: StyleTree,
    pub blocks: BTreeMap<String, NodeId>,
}

impl BuiltStyles {
    #[inline]
    pub fn block(&self, name: &str) -> Option<NodeId> {
        self.blocks.get(name).copied()
    }
}

/// Read and build `blocks.toml` in one step.
pub fn load(config_path: impl AsRef<Path>) -> Result<BuiltStyles, BuildError> {
    let config = BlocksConfig::from_file(config_path)?;
    build(&config)
}

/// Build a tree from parsed declarations.
///
/// Every block, class and state is created before any base link is
/// declared, so the tree is structurally complete when the caller first
/// reads a base.
pub fn build(config: &BlocksConfig) -> Result<BuiltStyles, BuildError> {
    let mut built = BuiltStyles::default();

    // 1. Structure
    for entry in config.blocks() {
        let block = built.tree.add_block(entry.name.as_str());
        for selector in &entry.selectors {
            built
                .tree
                .ensure_selector(block, &selector.class, selector.state.as_deref())?;
        }
        built.blocks.insert(entry.name.clone(), block);
    }

    // 2. Explicit inheritance
    for entry in config.blocks() {
        let Some(target) = entry.extends.as_deref() else {
            continue;
        };
        // Targets were checked against declared blocks during parsing
        let derived = built.blocks[&entry.name];
        let base = built.blocks[target];
        debug!(block = %entry.name, extends = %target, "wiring extends");
        built.tree.extend(derived, base);
    }

    info!(
        blocks = built.blocks.len(),
        nodes = built.tree.len(),
        "built style tree"
    );
    Ok(built)
}

/// Errors that can occur while building.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Failed to read or parse blocks.toml
    #[error("Config error: {0}")]
    Config(#[from] BlocksConfigError),
    /// Tree construction rejected a node.
    ///
    /// Selectors stop at states and never ask a leaf for children, so the
    /// style family does not produce this today; `ensure_selector` stays
    /// fallible because `ensure_child` is.
    #[error("Tree error: {0}")]
    Tree(#[from] InheritError),
}
