//! Per-kind child factory.

/// Payload carried by every node of an [`InheritTree`](crate::InheritTree).
///
/// A tree holds one entity family. The family decides which kind a child of
/// a given kind has; the tree only handles structure.
pub trait Entity: Sized {
    /// Entity for a new child named `name` under `parent`.
    ///
    /// Returns `None` when `parent` is a leaf-only kind.
    fn child_entity(parent: &Self, name: &str) -> Option<Self>;
}

impl Entity for () {
    fn child_entity(_parent: &Self, _name: &str) -> Option<Self> {
        Some(())
    }
}
