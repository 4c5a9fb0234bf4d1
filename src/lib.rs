//! # Inheritable Style Trees (style-inherit)
//!
//! Named trees where every node takes part in two relations at once:
//!
//! - **containment**: a parent owns uniquely named children
//! - **inheritance**: a node may extend another node of the same family,
//!   anywhere in the tree
//!
//! ## Design
//!
//! All nodes live in one [`InheritTree`] arena and refer to each other by
//! [`NodeId`]. Parents own their children through a `name → NodeId` map;
//! parent, root and base links are plain ids, so there are no reference
//! cycles to break on drop.
//!
//! ```text
//!  Base ─┬─ foo            Derived ── foo
//!        └─ bar               │        ┆ base (lazy)
//!          ▲                  │        ▼
//!          └──── extends ─────┘     Base.foo
//! ```
//!
//! A node's base is either declared ([`InheritTree::set_base`]) or derived on
//! first read: the child with the same name on the nearest node of the
//! parent's inheritance chain. The outcome, including "no base", is cached
//! for good.
//!
//! ```ignore
//! use style_inherit::StyleTree;
//!
//! let mut tree = StyleTree::new();
//! let base = tree.add_block("Base");
//! let derived = tree.add_block("Derived");
//! let foo = tree.ensure_child(base, "foo")?;
//! tree.extend(derived, base);
//!
//! assert_eq!(tree.resolve_child(derived, "foo"), Some(foo));
//! ```
//!
//! Trees use interior mutability for the base cache and are not `Sync`.

pub mod entity;
pub mod error;
pub mod node;
pub mod style;
pub mod tree;

pub use entity::Entity;
pub use error::InheritError;
pub use node::{BaseState, Node, NodeId};
pub use style::{StyleEntity, StyleKind, StyleTree};
pub use tree::{BaseChain, ChildrenRecord, InheritTree};
