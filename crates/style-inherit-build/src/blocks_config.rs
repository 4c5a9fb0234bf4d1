//! TOML configuration parser for blocks.toml.

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use thiserror::Error;

/// Parsed block declarations, sorted by block name.
#[derive(Debug, Clone, Default)]
pub struct BlocksConfig {
    blocks: Vec<BlockEntry>,
}

/// One declared block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEntry {
    pub name: String,
    /// Block this one extends, if any.
    pub extends: Option<String>,
    /// Declared selectors in source order.
    pub selectors: Vec<SelectorEntry>,
}

/// A `class` or `class:state` selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorEntry {
    pub class: String,
    pub state: Option<String>,
}

/// Raw TOML structure.
#[derive(Debug, Deserialize)]
struct RawBlocksConfig {
    #[serde(default)]
    blocks: BTreeMap<String, RawBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBlock {
    extends: Option<String>,
    /// `class` or `class:state` entries
    #[serde(default)]
    classes: Vec<String>,
}

impl BlocksConfig {
    /// Parse from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BlocksConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BlocksConfigError::Io(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_str(&content)
    }

    /// Parse from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, BlocksConfigError> {
        let raw: RawBlocksConfig =
            toml::from_str(content).map_err(|e| BlocksConfigError::Parse(e.to_string()))?;

        let mut blocks = Vec::with_capacity(raw.blocks.len());
        for (name, raw_block) in raw.blocks {
            validate_ident(&name, "block")?;
            let selectors = raw_block
                .classes
                .iter()
                .map(|s| parse_selector(&name, s))
                .collect::<Result<Vec<_>, _>>()?;
            blocks.push(BlockEntry {
                name,
                extends: raw_block.extends,
                selectors,
            });
        }

        let config = Self { blocks };
        config.validate_extends()?;
        Ok(config)
    }

    /// All blocks in name order.
    pub fn blocks(&self) -> impl Iterator<Item = &BlockEntry> {
        self.blocks.iter()
    }

    pub fn get(&self, name: &str) -> Option<&BlockEntry> {
        self.blocks.iter().find(|b| b.name == name)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Every `extends` names a declared block and the extends graph is acyclic.
    fn validate_extends(&self) -> Result<(), BlocksConfigError> {
        let names: HashSet<&str> = self.blocks.iter().map(|b| b.name.as_str()).collect();

        for block in &self.blocks {
            let Some(target) = block.extends.as_deref() else {
                continue;
            };
            if target == block.name {
                return Err(BlocksConfigError::Validation(format!(
                    "block '{}' extends itself",
                    block.name
                )));
            }
            if !names.contains(target) {
                return Err(BlocksConfigError::Validation(format!(
                    "block '{}' extends unknown block '{}'",
                    block.name, target
                )));
            }
        }

        for block in &self.blocks {
            let mut chain = vec![block.name.as_str()];
            let mut current = block.extends.as_deref();
            while let Some(next) = current {
                if chain.contains(&next) {
                    chain.push(next);
                    return Err(BlocksConfigError::Validation(format!(
                        "cyclic extends: {}",
                        chain.join(" -> ")
                    )));
                }
                chain.push(next);
                current = self.get(next).and_then(|b| b.extends.as_deref());
            }
        }

        Ok(())
    }
}

/// Split `class` or `class:state` and validate both parts.
fn parse_selector(block: &str, raw: &str) -> Result<SelectorEntry, BlocksConfigError> {
    let (class, state) = match raw.split_once(':') {
        Some((class, state)) => (class, Some(state)),
        None => (raw, None),
    };
    validate_ident(class, "class").map_err(|e| in_block(block, e))?;
    if let Some(state) = state {
        validate_ident(state, "state").map_err(|e| in_block(block, e))?;
    }
    Ok(SelectorEntry {
        class: class.to_string(),
        state: state.map(str::to_string),
    })
}

fn in_block(block: &str, err: BlocksConfigError) -> BlocksConfigError {
    match err {
        BlocksConfigError::Validation(msg) => {
            BlocksConfigError::Validation(format!("in block '{}': {}", block, msg))
        }
        other => other,
    }
}

/// Identifier rule: starts with a letter or underscore, then alphanumerics, `_` or `-`.
fn validate_ident(name: &str, what: &str) -> Result<(), BlocksConfigError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(BlocksConfigError::Validation(format!("empty {} name", what)));
    };
    if !first.is_alphabetic() && first != '_' {
        return Err(BlocksConfigError::Validation(format!(
            "invalid {} name '{}': must start with letter or underscore",
            what, name
        )));
    }
    if let Some(c) = chars.find(|&c| !c.is_alphanumeric() && c != '_' && c != '-') {
        return Err(BlocksConfigError::Validation(format!(
            "invalid {} name '{}': contains invalid character '{}'",
            what, name, c
        )));
    }
    Ok(())
}

/// Errors during config parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlocksConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}
