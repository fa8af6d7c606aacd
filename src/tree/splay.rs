//! Self-adjusting (splay) binary search tree map.
//!
//! This module provides [`SplayTreeMap`], an ordered map that moves every
//! node it touches to the root.
//!
//! # Overview
//!
//! - O(log N) amortized search, insert and remove
//! - O(1) len and `is_empty`
//!
//! After each access the accessed node (or, on a miss, the last node the
//! search visited) is splayed: lifted two levels at a time by zig-zig and
//! zig-zag steps, with a final single zig when only one level remains.
//! Recently used keys therefore sit near the root.
//!
//! Because lookups restructure the tree, [`search`](SplayTreeMap::search),
//! [`get`](SplayTreeMap::get) and [`contains_key`](SplayTreeMap::contains_key)
//! take `&mut self`. [`min`](SplayTreeMap::min), [`max`](SplayTreeMap::max)
//! and iteration do not splay.
//!
//! # Examples
//!
//! ```rust
//! use arbormap::tree::SplayTreeMap;
//!
//! let mut map = SplayTreeMap::new();
//! map.insert(1, "one");
//! map.insert(2, "two");
//! map.insert(3, "three");
//! assert_eq!(map.root().map(|node| *node.key()), Some(3));
//!
//! assert_eq!(map.get(&1), Some(&"one"));
//! assert_eq!(map.root().map(|node| *node.key()), Some(1));
//! ```

use std::borrow::Borrow;

use super::arena::NodeId;
use super::error::TreeError;
use super::node::{Node, NodeRef};
use super::raw::{Link, RawTree, ordered_map_api};

/// An ordered map backed by a splay tree.
#[derive(Clone)]
pub struct SplayTreeMap<K, V> {
    tree: RawTree<K, V>,
}

ordered_map_api!(SplayTreeMap);

impl<K: Ord, V> SplayTreeMap<K, V> {
    /// Descends towards `key` and splays the node where the search ended.
    ///
    /// Returns that node, which is then the root, or `None` on an empty map.
    fn splay_towards<Q>(&mut self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let path = self.tree.search_path(key);
        let last_visited = path.hit.or(path.hot)?;
        self.splay(last_visited);
        Some(last_visited)
    }

    /// Like [`splay_towards`](Self::splay_towards), but only returns the
    /// new root when it holds `key`.
    fn access<Q>(&mut self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.splay_towards(key)
            .filter(|&root| key.cmp(self.tree.arena[root].key.borrow()).is_eq())
    }

    /// Looks up `key`, splaying it (or the last node visited) to the root.
    ///
    /// # Complexity
    ///
    /// O(log N) amortized
    pub fn search<Q>(&mut self, key: &Q) -> Option<NodeRef<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.access(key)?;
        Some(self.tree.node_ref(id))
    }

    /// Returns a reference to the value for `key`, splaying as [`search`](Self::search) does.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.access(key)?;
        Some(self.tree.entry(id).1)
    }

    /// Returns a mutable reference to the value for `key`, splaying as
    /// [`search`](Self::search) does.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.access(key)?;
        Some(self.tree.value_mut(id))
    }

    /// Returns `true` if the map contains `key`, splaying as
    /// [`search`](Self::search) does.
    pub fn contains_key<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.access(key).is_some()
    }

    /// Inserts `key` with `value` and returns the new root.
    ///
    /// The search for `key` splays the closest existing node to the root.
    /// If that node holds `key`, nothing changes and it is returned. Otherwise
    /// the tree is split around it and the new node becomes the root with
    /// the two halves as children.
    pub fn insert(&mut self, key: K, value: V) -> NodeRef<'_, K, V> {
        let Some(last_visited) = self.splay_towards(&key) else {
            let id = self.tree.arena.allocate(Node::leaf(key, value, None));
            self.tree.root = Some(id);
            return self.tree.node_ref(id);
        };
        if self.tree.arena[last_visited].key == key {
            return self.tree.node_ref(last_visited);
        }

        let arena = &mut self.tree.arena;
        let goes_right = arena[last_visited].key < key;
        let id = arena.allocate(Node::leaf(key, value, None));
        if goes_right {
            let right = arena[last_visited].right.take();
            arena.attach_left(id, Some(last_visited));
            arena.attach_right(id, right);
        } else {
            let left = arena[last_visited].left.take();
            arena.attach_left(id, left);
            arena.attach_right(id, Some(last_visited));
        }
        arena.update_height(last_visited);
        arena.update_height(id);
        self.tree.root = Some(id);
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
    /// The search splays the target to the root. When it has two subtrees,
    /// the left one is set aside, the minimum of the right one is splayed to
    /// its top (leaving it without a left child) and the left subtree is
    /// hung back underneath.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let target = self.access(key)?;
        let (left, right) = {
            let node = &self.tree.arena[target];
            (node.left, node.right)
        };
        match (left, right) {
            (None, child) | (child, None) => self.tree.relink(Link::Root, child),
            (Some(left), Some(right)) => {
                self.tree.relink(Link::Root, Some(right));
                let minimum = self.tree.arena.leftmost(right);
                self.splay(minimum);
                self.tree.arena.attach_left(minimum, Some(left));
                self.tree.arena.update_height(minimum);
            }
        }
        tracing::trace!(freed = target.index(), "removed splay root");
        let Node { key, value, .. } = self.tree.arena.release(target);
        Some((key, value))
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

impl<K, V> SplayTreeMap<K, V> {
    /// Lifts `node` to the root.
    fn splay(&mut self, node: NodeId) {
        let arena = &mut self.tree.arena;
        let mut steps = 0_usize;
        while let Some(parent) = arena[node].parent {
            let Some(grandparent) = arena[parent].parent else {
                break;
            };
            let great_grandparent = arena[grandparent].parent;
            let grandparent_was_left =
                great_grandparent.is_some_and(|above| arena[above].left == Some(grandparent));
            let parent_is_left = arena[grandparent].left == Some(parent);
            let node_is_left = arena[parent].left == Some(node);
            let (node_left, node_right) = (arena[node].left, arena[node].right);
            let (parent_left, parent_right) = (arena[parent].left, arena[parent].right);

            match (node_is_left, parent_is_left) {
                // zig-zig
                (true, true) => {
                    arena.attach_left(grandparent, parent_right);
                    arena.attach_left(parent, node_right);
                    arena.attach_right(parent, Some(grandparent));
                    arena.attach_right(node, Some(parent));
                }
                (false, false) => {
                    arena.attach_right(grandparent, parent_left);
                    arena.attach_right(parent, node_left);
                    arena.attach_left(parent, Some(grandparent));
                    arena.attach_left(node, Some(parent));
                }
                // zig-zag
                (true, false) => {
                    arena.attach_left(parent, node_right);
                    arena.attach_right(grandparent, node_left);
                    arena.attach_left(node, Some(grandparent));
                    arena.attach_right(node, Some(parent));
                }
                (false, true) => {
                    arena.attach_right(parent, node_left);
                    arena.attach_left(grandparent, node_right);
                    arena.attach_right(node, Some(grandparent));
                    arena.attach_left(node, Some(parent));
                }
            }

            match great_grandparent {
                None => arena[node].parent = None,
                Some(above) if grandparent_was_left => arena.attach_left(above, Some(node)),
                Some(above) => arena.attach_right(above, Some(node)),
            }
            arena.update_height(grandparent);
            arena.update_height(parent);
            arena.update_height(node);
            steps += 1;
        }

        // zig
        if let Some(parent) = arena[node].parent {
            if arena[parent].left == Some(node) {
                let node_right = arena[node].right;
                arena.attach_left(parent, node_right);
                arena.attach_right(node, Some(parent));
            } else {
                let node_left = arena[node].left;
                arena.attach_right(parent, node_left);
                arena.attach_left(node, Some(parent));
            }
            arena.update_height(parent);
            arena.update_height(node);
            steps += 1;
        }

        arena[node].parent = None;
        self.tree.root = Some(node);
        tracing::trace!(node = node.index(), steps, "splayed to root");
    }
}
