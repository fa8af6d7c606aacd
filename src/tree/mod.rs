//! Ordered maps stored as binary search trees.
//!
//! This module provides three maps that share one node type, one node
//! arena and one search/insert/remove skeleton, and differ only in how they
//! restructure the tree after an update:
//!
//! - [`BinarySearchTreeMap`]: never restructures
//! - [`AvlTreeMap`]: keeps every node's subtree heights within one of each other
//! - [`SplayTreeMap`]: moves every accessed node to the root
//!
//! All three implement [`OrderedMap`], hand out read-only [`NodeRef`]
//! handles for structural inspection, and report broken invariants through
//! [`TreeError`].
//!
//! # Examples
//!
//! ```rust
//! use arbormap::tree::{AvlTreeMap, BinarySearchTreeMap};
//!
//! let keys = [5, 1, 4, 2, 3];
//! let plain: BinarySearchTreeMap<i32, ()> = keys.iter().map(|&key| (key, ())).collect();
//! let avl: AvlTreeMap<i32, ()> = keys.iter().map(|&key| (key, ())).collect();
//!
//! assert!(plain.keys().eq(avl.keys()));
//! assert_eq!(plain.height(), 4);
//! assert_eq!(avl.height(), 2);
//! ```
//!
//! # Ownership
//!
//! Nodes live in an arena owned by the map and refer to each other by
//! index, so parent links carry no ownership and dropping a map of any
//! shape never recurses.

mod arena;
mod error;
mod node;
mod ordered_map;
mod raw;
mod traversal;

#[cfg(feature = "avl")]
mod avl;
#[cfg(feature = "bst")]
mod bst;
#[cfg(feature = "splay")]
mod splay;

pub use error::TreeError;
pub use node::NodeRef;
pub use ordered_map::OrderedMap;
pub use traversal::InOrder;
pub use traversal::Iter;
pub use traversal::LevelOrder;
pub use traversal::PostOrder;
pub use traversal::PreOrder;

#[cfg(feature = "avl")]
pub use avl::AvlTreeMap;
#[cfg(feature = "bst")]
pub use bst::BinarySearchTreeMap;
#[cfg(feature = "splay")]
pub use splay::SplayTreeMap;

#[cfg(feature = "avl")]
static_assertions::assert_impl_all!(AvlTreeMap<i32, String>: Send, Sync, Clone);
#[cfg(feature = "bst")]
static_assertions::assert_impl_all!(BinarySearchTreeMap<i32, String>: Send, Sync, Clone);
#[cfg(feature = "splay")]
static_assertions::assert_impl_all!(SplayTreeMap<i32, String>: Send, Sync, Clone);
static_assertions::assert_not_impl_any!(NodeRef<'static, i32, std::cell::Cell<i32>>: Sync);
