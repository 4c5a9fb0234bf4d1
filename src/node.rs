//! Node records stored in an [`InheritTree`](crate::InheritTree) arena.

use std::cell::Cell;
use std::collections::HashMap;

use serde::Serialize;

/// Handle to a node inside the tree that created it.
///
/// Ids are dense indices; they are only meaningful for the tree that minted them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in its tree's arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Observable state of a node's base.
///
/// ```text
/// Unresolved ──first read / set_base──► Present(id) | Absent
/// ```
///
/// There is no transition back to `Unresolved`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BaseState {
    /// Never read and never set.
    #[default]
    Unresolved,
    /// Cached base node.
    Present(NodeId),
    /// Cached "no base" outcome.
    Absent,
}

impl BaseState {
    #[inline]
    pub fn is_resolved(self) -> bool {
        !matches!(self, BaseState::Unresolved)
    }
}

/// Cache cell behind [`BaseState`]; `Resolving` only lives while a lazy walk is on the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BaseSlot {
    Unresolved,
    Resolving,
    Present(NodeId),
    Absent,
}

impl BaseSlot {
    pub(crate) fn from_option(base: Option<NodeId>) -> Self {
        base.map_or(BaseSlot::Absent, BaseSlot::Present)
    }
}

/// A named entity with a parent, a root, owned children and an optional base.
#[derive(Debug)]
pub struct Node<E> {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) root: NodeId,
    pub(crate) children: HashMap<String, NodeId>,
    pub(crate) base: Cell<BaseSlot>,
    pub(crate) base_name: Option<String>,
    pub(crate) entity: E,
}

impl<E> Node<E> {
    pub(crate) fn new(name: String, parent: Option<NodeId>, root: NodeId, entity: E) -> Self {
        Self {
            name,
            parent,
            root,
            children: HashMap::new(),
            base: Cell::new(BaseSlot::Unresolved),
            base_name: None,
            entity,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning node, `None` for root-level nodes.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The tree root this node belongs to (itself for a root-level node built without one).
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Alias of [`Node::root`]; in a style tree the root is the block.
    #[inline]
    pub fn block(&self) -> NodeId {
        self.root
    }

    /// Diagnostic name recorded by an explicit `set_base`.
    #[inline]
    pub fn base_name(&self) -> Option<&str> {
        self.base_name.as_deref()
    }

    /// Current base cache, without triggering resolution.
    pub fn base_state(&self) -> BaseState {
        match self.base.get() {
            BaseSlot::Unresolved | BaseSlot::Resolving => BaseState::Unresolved,
            BaseSlot::Present(id) => BaseState::Present(id),
            BaseSlot::Absent => BaseState::Absent,
        }
    }

    #[inline]
    pub fn entity(&self) -> &E {
        &self.entity
    }

    #[inline]
    pub fn entity_mut(&mut self) -> &mut E {
        &mut self.entity
    }
}
