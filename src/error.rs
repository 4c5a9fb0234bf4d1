//! Errors raised by tree construction and strict chain walks.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InheritError {
    /// `ensure_child` was called on a node whose kind cannot have children.
    #[error("node '{name}' is a leaf kind and cannot hold child '{child}'")]
    LeafKind { name: String, child: String },

    /// A base chain leads back to a node already visited.
    #[error("cyclic base chain: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },
}
