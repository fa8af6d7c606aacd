//! # arbormap
//!
//! Ordered maps backed by binary search trees, in three flavors that share
//! one node representation and one search/insert/remove skeleton.
//!
//! ## Overview
//!
//! - **Plain BST**: no restructuring; shape follows insertion order
//! - **AVL tree**: height-balanced by "3+4" reconstruction
//! - **Splay tree**: self-adjusting; every access moves a node to the root
//!
//! Every map exposes read-only node handles ([`tree::NodeRef`]) so the tree
//! itself can be inspected, and a `validate` method that checks all
//! structural invariants.
//!
//! ## Feature Flags
//!
//! - `bst`: [`tree::BinarySearchTreeMap`]
//! - `avl`: [`tree::AvlTreeMap`]
//! - `splay`: [`tree::SplayTreeMap`]
//! - `full`: Enable all features
//!
//! The node arena, traversals, [`tree::OrderedMap`] and [`tree::TreeError`]
//! are always available.
//!
//! ## Logging
//!
//! Rotations, splays and node removals emit `tracing` events at `TRACE`
//! level; `clear` emits one at `DEBUG`. The library never installs a
//! subscriber.
//!
//! ## Example
//!
//! ```rust
//! use arbormap::prelude::*;
//!
//! let mut map = AvlTreeMap::new();
//! for key in 1..=3 {
//!     map.insert(key, key * 100);
//! }
//! assert_eq!(map.root().map(|node| *node.key()), Some(2));
//! assert_eq!(format!("{map}"), "{1: 100, 2: 200, 3: 300}");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the map types, the shared trait and the error type.
///
/// # Usage
///
/// ```rust
/// use arbormap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::tree::{NodeRef, OrderedMap, TreeError};

    #[cfg(feature = "avl")]
    pub use crate::tree::AvlTreeMap;

    #[cfg(feature = "bst")]
    pub use crate::tree::BinarySearchTreeMap;

    #[cfg(feature = "splay")]
    pub use crate::tree::SplayTreeMap;
}

pub mod tree;
