//! Inheritance tree — arena of named nodes with containment and base links.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, trace, warn};

use crate::entity::Entity;
use crate::error::InheritError;
use crate::node::{BaseSlot, BaseState, Node, NodeId};

/// Children of one node keyed by name, in name order.
pub type ChildrenRecord = BTreeMap<String, NodeId>;

/// Arena owning every node of one compilation unit.
///
/// Provides:
/// - Containment: each node owns a `name → child` map
/// - Inheritance: each node may have a base of the same family, anywhere in the tree
/// - Lazy base derivation, cached on first read
/// - Child resolution honoring direct-over-inherited precedence
///
/// Parent, root and base links are [`NodeId`] handles into the arena, so
/// dropping the tree frees everything at once.
///
/// Structure must be complete before the first `base` read. A cached base
/// is never recomputed, even if children are added to an ancestor later.
#[derive(Debug)]
pub struct InheritTree<E> {
    nodes: Vec<Node<E>>,
    /// Root-level nodes by name.
    roots: HashMap<String, NodeId>,
}

impl<E> Default for InheritTree<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InheritTree<E> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: HashMap::new(),
        }
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a root-level node. Its root is itself.
    pub fn add_root(&mut self, name: impl Into<String>, entity: E) -> NodeId {
        self.insert(name, entity, None, None)
    }

    /// Create a node without registering it as anyone's child.
    ///
    /// `root` defaults to the new node itself. Root-level nodes (no parent)
    /// become reachable through [`InheritTree::find`]; a later root with the
    /// same name replaces the earlier one in that index.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        entity: E,
        parent: Option<NodeId>,
        root: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let name = name.into();
        if parent.is_none() {
            self.roots.insert(name.clone(), id);
        }
        self.nodes.push(Node::new(name, parent, root.unwrap_or(id), entity));
        id
    }

    // =========================================================================
    // Node access
    // =========================================================================

    /// Node record for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not minted by this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node<E> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node<E>> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn name(&self, id: NodeId) -> &str {
        self.node(id).name()
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent()
    }

    #[inline]
    pub fn root(&self, id: NodeId) -> NodeId {
        self.node(id).root()
    }

    /// Alias of [`InheritTree::root`].
    #[inline]
    pub fn block(&self, id: NodeId) -> NodeId {
        self.node(id).block()
    }

    #[inline]
    pub fn base_name(&self, id: NodeId) -> Option<&str> {
        self.node(id).base_name()
    }

    #[inline]
    pub fn base_state(&self, id: NodeId) -> BaseState {
        self.node(id).base_state()
    }

    #[inline]
    pub fn entity(&self, id: NodeId) -> &E {
        self.node(id).entity()
    }

    #[inline]
    pub fn entity_mut(&mut self, id: NodeId) -> &mut E {
        self.nodes[id.index()].entity_mut()
    }

    /// Total number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All ids in creation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Root-level nodes, sorted by name.
    pub fn roots(&self) -> Vec<NodeId> {
        let mut roots: Vec<(&str, NodeId)> =
            self.roots.iter().map(|(n, &id)| (n.as_str(), id)).collect();
        roots.sort_by_key(|&(name, _)| name);
        roots.into_iter().map(|(_, id)| id).collect()
    }

    /// Dot-joined names from the root-level ancestor down to `id`.
    pub fn path(&self, id: NodeId) -> String {
        let mut segments = vec![self.name(id)];
        let mut current = self.parent(id);
        while let Some(parent) = current {
            segments.push(self.name(parent));
            current = self.parent(parent);
        }
        segments.reverse();
        segments.join(".")
    }

    /// Inverse of [`InheritTree::path`], following direct children only.
    ///
    /// ```text
    /// tree.find("Base.foo.hover") → Some(id)
    /// tree.find("Base.missing")   → None
    /// ```
    pub fn find(&self, path: &str) -> Option<NodeId> {
        let mut segments = path.split('.');
        let mut current = *self.roots.get(segments.next()?)?;
        for segment in segments {
            current = self.get_child(current, segment)?;
        }
        Some(current)
    }

    // =========================================================================
    // Child management
    // =========================================================================

    /// Direct child named `name`. Inheritance is not considered.
    #[inline]
    pub fn get_child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.node(id).children.get(name).copied()
    }

    /// Register `child` under `name`, replacing any previous entry.
    pub fn set_child(&mut self, id: NodeId, name: impl Into<String>, child: NodeId) -> NodeId {
        self.nodes[id.index()].children.insert(name.into(), child);
        child
    }

    /// Snapshot of direct children, sorted by name.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.children_record(id).into_values().collect()
    }

    /// Owned copy of the child map; mutating it leaves the tree untouched.
    pub fn children_map(&self, id: NodeId) -> HashMap<String, NodeId> {
        self.node(id).children.clone()
    }

    /// Name-ordered children, for downstream enumeration and serialization.
    pub fn children_record(&self, id: NodeId) -> ChildrenRecord {
        self.node(id)
            .children
            .iter()
            .map(|(name, &child)| (name.clone(), child))
            .collect()
    }

    // =========================================================================
    // Base resolution
    // =========================================================================

    /// The node `id` inherits from.
    ///
    /// Returns the cached value when one exists. Otherwise walks the parent's
    /// inheritance chain looking for a direct child with the same name, and
    /// caches the outcome, including absence.
    pub fn base(&self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id);
        match node.base.get() {
            BaseSlot::Present(base) => return Some(base),
            BaseSlot::Absent => return None,
            BaseSlot::Resolving => {
                warn!(node = %self.path(id), "base resolution re-entered itself, treating as absent");
                return None;
            }
            BaseSlot::Unresolved => {}
        }

        let Some(parent) = node.parent else {
            node.base.set(BaseSlot::Absent);
            return None;
        };

        node.base.set(BaseSlot::Resolving);
        let found = BaseChain::new(self, self.base(parent), Some(parent)).find_map(|candidate| {
            self.get_child(candidate, &node.name).filter(|&child| child != id)
        });
        node.base.set(BaseSlot::from_option(found));

        trace!(
            node = %self.path(id),
            base = ?found.map(|b| self.path(b)),
            "resolved base"
        );
        found
    }

    /// Declare the base of `id` explicitly.
    ///
    /// Replaces any cached value, resolved or not. `base_name` is diagnostic
    /// only and plays no part in resolution.
    pub fn set_base(&mut self, id: NodeId, base_name: impl Into<String>, base: Option<NodeId>) {
        let base_name = base_name.into();
        let node = &mut self.nodes[id.index()];
        if node.base_state().is_resolved() {
            debug!(
                node = %node.name,
                previous = ?node.base_state(),
                base = %base_name,
                "overwriting cached base"
            );
        }
        node.base.set(BaseSlot::from_option(base));
        node.base_name = Some(base_name);
    }

    /// Declare `base` as the base of `id`, named by its path.
    pub fn extend(&mut self, id: NodeId, base: NodeId) {
        let base_name = self.path(base);
        self.set_base(id, base_name, Some(base));
    }

    /// Lazy walk over `base`, `base.base`, ... nearest first, excluding `id`.
    pub fn base_chain(&self, id: NodeId) -> BaseChain<'_, E> {
        BaseChain::new(self, self.base(id), Some(id))
    }

    /// Whether `ancestor` appears anywhere in the inheritance chain of `id`.
    pub fn inherits_from(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.base_chain(id).any(|base| base == ancestor)
    }

    // =========================================================================
    // Derived queries
    // =========================================================================

    /// Full inheritance chain of `id`, most distant ancestor first.
    ///
    /// ```text
    /// A ◄── B ◄── C     resolve_inheritance(C) → [A, B]
    /// ```
    ///
    /// A cyclic chain is cut before the first repeated node.
    pub fn resolve_inheritance(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain: Vec<NodeId> = self.base_chain(id).collect();
        chain.reverse();
        chain
    }

    /// Like [`InheritTree::resolve_inheritance`], but reports a cycle as an error.
    pub fn try_resolve_inheritance(&self, id: NodeId) -> Result<Vec<NodeId>, InheritError> {
        let mut seen = HashSet::from([id]);
        let mut visited = vec![id];
        let mut current = self.base(id);
        while let Some(base) = current {
            visited.push(base);
            if !seen.insert(base) {
                return Err(InheritError::Cycle {
                    path: visited.iter().map(|&n| self.path(n)).collect(),
                });
            }
            current = self.base(base);
        }
        visited.remove(0);
        visited.reverse();
        Ok(visited)
    }

    /// Child named `name`, declared directly or inherited.
    ///
    /// A direct child always wins; otherwise the nearest base declaring a
    /// direct child with that name supplies it.
    pub fn resolve_child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.get_child(id, name)
            .or_else(|| self.base_chain(id).find_map(|base| self.get_child(base, name)))
    }

    /// Every child name visible from `id` with the node that supplies it.
    pub fn resolved_children(&self, id: NodeId) -> ChildrenRecord {
        let mut merged = ChildrenRecord::new();
        for ancestor in self.resolve_inheritance(id).into_iter().chain([id]) {
            for (name, &child) in &self.node(ancestor).children {
                merged.insert(name.clone(), child);
            }
        }
        merged
    }
}

impl<E: Entity> InheritTree<E> {
    /// Existing child named `name`, or a new one built by the entity family.
    ///
    /// Repeated calls with the same name return the same node.
    ///
    /// # Errors
    ///
    /// Returns [`InheritError::LeafKind`] if the node's kind cannot hold children.
    pub fn ensure_child(&mut self, id: NodeId, name: &str) -> Result<NodeId, InheritError> {
        if let Some(child) = self.get_child(id, name) {
            return Ok(child);
        }

        let node = self.node(id);
        let entity = E::child_entity(node.entity(), name).ok_or_else(|| InheritError::LeafKind {
            name: self.path(id),
            child: name.to_string(),
        })?;
        let root = node.root();

        let child = self.insert(name, entity, Some(id), Some(root));
        Ok(self.set_child(id, name, child))
    }
}

// =============================================================================
// Chain iterator
// =============================================================================

/// Iterator over an inheritance chain; see [`InheritTree::base_chain`].
///
/// A yielded node's base is only read when the next item is requested, so a
/// walk that stops early leaves the rest of the chain unresolved. Stops before
/// revisiting a node, so a cyclic chain ends instead of looping.
#[derive(Debug)]
pub struct BaseChain<'a, E> {
    tree: &'a InheritTree<E>,
    /// First node, not yet yielded.
    start: Option<NodeId>,
    /// Last yielded node, its base not yet followed.
    last: Option<NodeId>,
    seen: HashSet<NodeId>,
}

impl<'a, E> BaseChain<'a, E> {
    fn new(tree: &'a InheritTree<E>, start: Option<NodeId>, origin: Option<NodeId>) -> Self {
        let mut seen: HashSet<NodeId> = origin.into_iter().collect();
        let start = start.filter(|&s| {
            let fresh = seen.insert(s);
            if !fresh {
                warn!(node = %tree.path(s), "cyclic base chain, stopping walk");
            }
            fresh
        });
        Self {
            tree,
            start,
            last: None,
            seen,
        }
    }
}

impl<E> Iterator for BaseChain<'_, E> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if let Some(start) = self.start.take() {
            self.last = Some(start);
            return Some(start);
        }

        let current = self.last.take()?;
        let following = self.tree.base(current)?;
        if !self.seen.insert(following) {
            warn!(
                from = %self.tree.path(current),
                to = %self.tree.path(following),
                "cyclic base chain, stopping walk"
            );
            return None;
        }
        self.last = Some(following);
        Some(following)
    }
}

// =============================================================================
// Tests
// =============================================================================
