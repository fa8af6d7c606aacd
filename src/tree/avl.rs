//! Height-balanced (AVL) binary search tree map.
//!
//! This module provides [`AvlTreeMap`], an ordered map that keeps the
//! heights of every node's two subtrees within one of each other.
//!
//! # Overview
//!
//! - O(log N) search, insert and remove
//! - O(1) len and `is_empty`
//!
//! Updates descend like a plain binary search tree, then walk back up from
//! the parent of the changed position. An ancestor whose balance factor has
//! reached ±2 is repaired by a "3+4" reconstruction: the ancestor `g`, its
//! taller child `p` and `p`'s taller child `v` are renamed `a < b < c` in key
//! order, their four hanging subtrees `t0..t3` likewise, and the seven pieces
//! are reassembled as `b(a(t0, t1), c(t2, t3))`. This single routine covers
//! all four single and double rotation cases.
//!
//! An insertion is fixed by the first reconstruction, after which the
//! subtree has its old height again. A removal can shorten every subtree on
//! the way up, so it keeps walking to the root.
//!
//! # Examples
//!
//! ```rust
//! use arbormap::tree::AvlTreeMap;
//!
//! let map: AvlTreeMap<i32, i32> = (1..=7).map(|key| (key, key * key)).collect();
//!
//! // Sorted input still yields a perfect tree.
//! assert_eq!(map.height(), 2);
//! assert_eq!(map.root().map(|node| *node.key()), Some(4));
//! assert_eq!(map.get(&5), Some(&25));
//! assert!(map.validate().is_ok());
//! ```

use std::borrow::Borrow;

use super::arena::{Arena, NodeId};
use super::error::TreeError;
use super::node::NodeRef;
use super::raw::{RawTree, ordered_map_api};

/// An ordered map backed by an AVL tree.
#[derive(Clone)]
pub struct AvlTreeMap<K, V> {
    tree: RawTree<K, V>,
}

ordered_map_api!(AvlTreeMap);

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Returns a handle to the node holding `key`.
    ///
    /// # Complexity
    ///
    /// O(log N)
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

    /// Inserts `key` with `value`, rebalancing at most once.
    ///
    /// If `key` is already present, nothing changes and the existing node
    /// is returned; `value` is dropped.
    ///
    /// # Complexity
    ///
    /// O(log N)
    pub fn insert(&mut self, key: K, value: V) -> NodeRef<'_, K, V> {
        let path = self.tree.search_path(&key);
        if let Some(existing) = path.hit {
            return self.tree.node_ref(existing);
        }
        let id = self.tree.attach_leaf(&path, key, value);

        let mut cursor = path.hot;
        while let Some(ancestor) = cursor {
            if !self.tree.arena.is_avl_balanced(ancestor) {
                self.rebalance_at(ancestor);
                break;
            }
            self.tree.arena.update_height(ancestor);
            cursor = self.tree.arena[ancestor].parent;
        }
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
    ///
    /// # Complexity
    ///
    /// O(log N), with up to O(log N) reconstructions.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let target = self.tree.search_path(key).hit?;
        let removed = self.tree.remove_at(target);

        let mut cursor = removed.hot;
        while let Some(mut ancestor) = cursor {
            if !self.tree.arena.is_avl_balanced(ancestor) {
                ancestor = self.rebalance_at(ancestor);
            }
            self.tree.arena.update_height(ancestor);
            cursor = self.tree.arena[ancestor].parent;
        }
        Some((removed.key, removed.value))
    }

    /// Checks parent links, key order, cached heights, the entry count and
    /// the balance factor of every node.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a [`TreeError`].
    pub fn validate(&self) -> Result<(), TreeError> {
        self.tree.validate()?;
        self.tree.check_avl_balance()
    }
}

impl<K, V> AvlTreeMap<K, V> {
    /// Restructures the subtree rooted at the unbalanced node `grandparent`
    /// and returns the subtree's new root.
    fn rebalance_at(&mut self, grandparent: NodeId) -> NodeId {
        let link = self.tree.link_of(grandparent);
        let arena = &self.tree.arena;
        let Some(parent) = arena.higher_child(grandparent) else {
            unreachable!("unbalanced node {} has no children", grandparent.index());
        };
        let Some(node) = arena.higher_child(parent) else {
            unreachable!("taller child {} of an unbalanced node is a leaf", parent.index());
        };
        let top = rotate_at(&mut self.tree.arena, node, parent, grandparent);
        self.tree.relink(link, Some(top));
        top
    }
}

/// Chooses the reconstruction for the chain `grandparent -> parent -> node`.
fn rotate_at<K, V>(
    arena: &mut Arena<K, V>,
    node: NodeId,
    parent: NodeId,
    grandparent: NodeId,
) -> NodeId {
    let (v, p, g) = (&arena[node], &arena[parent], &arena[grandparent]);
    let parent_is_left = g.left == Some(parent);
    let node_is_left = p.left == Some(node);
    let (shape, trio, subtrees) = match (parent_is_left, node_is_left) {
        (true, true) => (
            "left-left",
            [node, parent, grandparent],
            [v.left, v.right, p.right, g.right],
        ),
        (true, false) => (
            "left-right",
            [parent, node, grandparent],
            [p.left, v.left, v.right, g.right],
        ),
        (false, false) => (
            "right-right",
            [grandparent, parent, node],
            [g.left, p.left, v.left, v.right],
        ),
        (false, true) => (
            "right-left",
            [grandparent, node, parent],
            [g.left, v.left, v.right, p.right],
        ),
    };
    tracing::trace!(shape, pivot = grandparent.index(), "avl reconstruction");
    connect34(arena, trio, subtrees)
}

/// Assembles `b(a(t0, t1), c(t2, t3))` and returns `b`.
///
/// `b`'s parent link is left for the caller to set.
fn connect34<K, V>(
    arena: &mut Arena<K, V>,
    [a, b, c]: [NodeId; 3],
    [t0, t1, t2, t3]: [Option<NodeId>; 4],
) -> NodeId {
    arena.attach_left(a, t0);
    arena.attach_right(a, t1);
    arena.update_height(a);
    arena.attach_left(c, t2);
    arena.attach_right(c, t3);
    arena.update_height(c);
    arena.attach_left(b, Some(a));
    arena.attach_right(b, Some(c));
    arena.update_height(b);
    b
}
