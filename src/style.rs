//! Style entity family: blocks own classes, classes own states.
//!
//! ```text
//! Block ─► Class ─► State (leaf)
//! ```
//!
//! A block may extend another block; every class and state of the derived
//! block then resolves its base by name through the base block.

use serde::Serialize;

use crate::entity::Entity;
use crate::error::InheritError;
use crate::node::NodeId;
use crate::tree::InheritTree;

/// Kind of a style node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    Block,
    Class,
    State,
}

impl StyleKind {
    /// Kind of children this kind may own.
    pub const fn child_kind(self) -> Option<StyleKind> {
        match self {
            StyleKind::Block => Some(StyleKind::Class),
            StyleKind::Class => Some(StyleKind::State),
            StyleKind::State => None,
        }
    }
}

/// Payload of a style node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StyleEntity {
    pub kind: StyleKind,
    /// Raw declarations attached by the compiler, in source order.
    pub declarations: Vec<String>,
}

impl StyleEntity {
    pub fn new(kind: StyleKind) -> Self {
        Self {
            kind,
            declarations: Vec::new(),
        }
    }

    pub fn block() -> Self {
        Self::new(StyleKind::Block)
    }
}

impl Entity for StyleEntity {
    fn child_entity(parent: &Self, _name: &str) -> Option<Self> {
        parent.kind.child_kind().map(StyleEntity::new)
    }
}

/// Tree of blocks for one compilation unit.
pub type StyleTree = InheritTree<StyleEntity>;

impl InheritTree<StyleEntity> {
    /// Declare a root-level block.
    pub fn add_block(&mut self, name: impl Into<String>) -> NodeId {
        self.add_root(name, StyleEntity::block())
    }

    /// Ensure the class `class` on `block`, and `state` under it when given.
    ///
    /// Returns the deepest node created or found.
    pub fn ensure_selector(
        &mut self,
        block: NodeId,
        class: &str,
        state: Option<&str>,
    ) -> Result<NodeId, InheritError> {
        let class = self.ensure_child(block, class)?;
        match state {
            Some(state) => self.ensure_child(class, state),
            None => Ok(class),
        }
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> StyleKind {
        self.entity(id).kind
    }

    /// Declarations visible on `id`: inherited ones first, most distant base first.
    pub fn effective_declarations(&self, id: NodeId) -> Vec<&str> {
        self.resolve_inheritance(id)
            .into_iter()
            .chain([id])
            .flat_map(|n| self.entity(n).declarations.iter().map(String::as_str))
            .collect()
    }
}
