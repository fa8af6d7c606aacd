//! Unbalanced binary search tree map.
//!
//! This module provides [`BinarySearchTreeMap`], an ordered map that never
//! restructures: the tree's shape is exactly the one produced by the order
//! of insertions and removals.
//!
//! # Overview
//!
//! - O(h) search, insert and remove, where h is the height of the tree
//! - O(1) len and `is_empty`
//!
//! The height is O(log N) for random insertion orders but degrades to
//! O(N) for sorted input. All traversals are iterative, so even a
//! list-shaped tree is handled without recursion.
//!
//! # Examples
//!
//! ```rust
//! use arbormap::tree::BinarySearchTreeMap;
//!
//! let mut map = BinarySearchTreeMap::new();
//! map.insert(2, "two");
//! map.insert(1, "one");
//! map.insert(3, "three");
//!
//! assert_eq!(map.get(&1), Some(&"one"));
//! assert_eq!(map.root().map(|node| *node.key()), Some(2));
//!
//! // Removing the root moves its inorder successor up.
//! assert!(map.remove(&2));
//! assert_eq!(map.root().map(|node| *node.key()), Some(3));
//! assert_eq!(format!("{map}"), "{1: one, 3: three}");
//! ```

use std::borrow::Borrow;

use super::error::TreeError;
use super::node::NodeRef;
use super::raw::{RawTree, ordered_map_api};

/// An ordered map backed by a plain binary search tree.
///
/// Heights are cached and kept exact, but no rotation is ever performed.
#[derive(Clone)]
pub struct BinarySearchTreeMap<K, V> {
    tree: RawTree<K, V>,
}

ordered_map_api!(BinarySearchTreeMap);

impl<K: Ord, V> BinarySearchTreeMap<K, V> {
    /// Returns a handle to the node holding `key`.
    ///
    /// # Complexity
    ///
    /// O(h)
    pub fn search<Q>(&self, key: &Q) -> Option<NodeRef<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.tree.search_path(key).hit?;
        Some(self.tree.node_ref(id))
    }

    /// Returns a reference to the value for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.tree.search_path(key).hit?;
        Some(self.tree.entry(id).1)
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.tree.search_path(key).hit?;
        Some(self.tree.value_mut(id))
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.search_path(key).hit.is_some()
    }

    /// Inserts `key` with `value` as a new leaf.
    ///
    /// If `key` is already present, nothing changes and the existing node
    /// is returned; `value` is dropped.
    pub fn insert(&mut self, key: K, value: V) -> NodeRef<'_, K, V> {
        let path = self.tree.search_path(&key);
        let id = match path.hit {
            Some(existing) => existing,
            None => {
                let id = self.tree.attach_leaf(&path, key, value);
                self.tree.arena.update_height_above(path.hot);
                id
            }
        };
        self.tree.node_ref(id)
    }

    /// Removes `key`, returning `true` if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).is_some()
    }

    /// Removes `key` and returns the entry that held it.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let target = self.tree.search_path(key).hit?;
        let removed = self.tree.remove_at(target);
        self.tree.arena.update_height_above(removed.hot);
        Some((removed.key, removed.value))
    }

    /// Checks parent links, key order, cached heights and the entry count.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a [`TreeError`].
    pub fn validate(&self) -> Result<(), TreeError> {
        self.tree.validate()
    }
}
