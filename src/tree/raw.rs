//! The algorithm skeleton shared by every map variant.
//!
//! [`RawTree`] owns the node arena and the root link and implements the
//! parts of search, insertion and removal that do not depend on a balancing
//! policy. Each public map wraps a `RawTree` and adds its own restructuring
//! on top; the common public surface is stamped out by `ordered_map_api!`.

use std::borrow::Borrow;
use std::cmp::Ordering;

use smallvec::SmallVec;

use super::arena::{Arena, NodeId};
use super::error::TreeError;
use super::node::{Node, NodeRef};
use super::traversal::{InOrder, Iter, LevelOrder, PostOrder, PreOrder, STACK_INLINE};

/// Which child slot of the search endpoint's parent the search fell into.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Side {
    Left,
    Right,
}

/// Outcome of a descent from the root.
///
/// `hit` is the node holding the key, if any. `hot` is the parent of the
/// search endpoint: the hit's parent, or on a miss the node under which the
/// key would be attached (on `side`).
#[derive(Clone, Copy, Debug)]
pub(crate) struct SearchPath {
    pub(crate) hit: Option<NodeId>,
    pub(crate) hot: Option<NodeId>,
    pub(crate) side: Side,
}

/// The slot that holds a node: the root link or a child link of its parent.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Link {
    Root,
    Left(NodeId),
    Right(NodeId),
}

/// A physically unlinked node.
pub(crate) struct Removed<K, V> {
    /// Parent of the node that was freed; rebalancing starts here.
    pub(crate) hot: Option<NodeId>,
    pub(crate) key: K,
    pub(crate) value: V,
}

#[derive(Clone)]
pub(crate) struct RawTree<K, V> {
    pub(crate) arena: Arena<K, V>,
    pub(crate) root: Option<NodeId>,
}

impl<K, V> RawTree<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            root: None,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.arena.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    pub(crate) fn height(&self) -> isize {
        self.arena.stature(self.root)
    }

    pub(crate) fn clear(&mut self) {
        tracing::debug!(entries = self.arena.len(), "clearing tree");
        self.arena.clear();
        self.root = None;
    }

    pub(crate) fn node_ref(&self, id: NodeId) -> NodeRef<'_, K, V> {
        NodeRef::new(&self.arena, id)
    }

    pub(crate) fn root_ref(&self) -> Option<NodeRef<'_, K, V>> {
        self.root.map(|id| self.node_ref(id))
    }

    pub(crate) fn entry(&self, id: NodeId) -> (&K, &V) {
        let node = &self.arena[id];
        (&node.key, &node.value)
    }

    pub(crate) fn value_mut(&mut self, id: NodeId) -> &mut V {
        &mut self.arena[id].value
    }

    pub(crate) fn min(&self) -> Option<(&K, &V)> {
        self.root
            .map(|root| self.entry(self.arena.leftmost(root)))
    }

    pub(crate) fn max(&self) -> Option<(&K, &V)> {
        self.root
            .map(|root| self.entry(self.arena.rightmost(root)))
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.arena, self.root)
    }

    pub(crate) fn inorder(&self) -> InOrder<'_, K, V> {
        InOrder::new(&self.arena, self.root)
    }

    pub(crate) fn preorder(&self) -> PreOrder<'_, K, V> {
        PreOrder::new(&self.arena, self.root)
    }

    pub(crate) fn postorder(&self) -> PostOrder<'_, K, V> {
        PostOrder::new(&self.arena, self.root)
    }

    pub(crate) fn level_order(&self) -> LevelOrder<'_, K, V> {
        LevelOrder::new(&self.arena, self.root)
    }

    /// The slot currently holding `id`.
    pub(crate) fn link_of(&self, id: NodeId) -> Link {
        match self.arena[id].parent {
            None => Link::Root,
            Some(parent) if self.arena[parent].left == Some(id) => Link::Left(parent),
            Some(parent) => Link::Right(parent),
        }
    }

    /// Stores `child` in `link` and points the child back at the slot's owner.
    pub(crate) fn relink(&mut self, link: Link, child: Option<NodeId>) {
        match link {
            Link::Root => {
                self.root = child;
                if let Some(child) = child {
                    self.arena[child].parent = None;
                }
            }
            Link::Left(parent) => self.arena.attach_left(parent, child),
            Link::Right(parent) => self.arena.attach_right(parent, child),
        }
    }

    /// Allocates a leaf at the endpoint of a missed search.
    pub(crate) fn attach_leaf(&mut self, path: &SearchPath, key: K, value: V) -> NodeId {
        debug_assert!(path.hit.is_none(), "attach_leaf on a search hit");
        let id = self.arena.allocate(Node::leaf(key, value, path.hot));
        match (path.hot, path.side) {
            (None, _) => self.root = Some(id),
            (Some(parent), Side::Left) => self.arena[parent].left = Some(id),
            (Some(parent), Side::Right) => self.arena[parent].right = Some(id),
        }
        id
    }

    /// Unlinks `target` and frees exactly one node.
    ///
    /// With at most one child, `target` itself is spliced out and its child
    /// takes its slot. With two children, the inorder successor's entry is
    /// moved into `target` and the successor's node (which has no left child)
    /// is spliced out instead. Heights are left for the caller to repair,
    /// starting at the returned `hot`.
    pub(crate) fn remove_at(&mut self, target: NodeId) -> Removed<K, V> {
        let node = &self.arena[target];
        let (freed, replacement) = match (node.left, node.right) {
            (None, child) | (child, None) => (target, child),
            (Some(_), Some(right)) => {
                let successor = self.arena.leftmost(right);
                self.arena.swap_entries(target, successor);
                (successor, self.arena[successor].right)
            }
        };
        let hot = self.arena[freed].parent;
        let link = self.link_of(freed);
        self.relink(link, replacement);
        tracing::trace!(
            freed = freed.index(),
            two_children = freed != target,
            "unlinked node"
        );
        let Node { key, value, .. } = self.arena.release(freed);
        Removed { hot, key, value }
    }

    /// Checks parent links, cached heights and the recorded size.
    fn check_structure(&self) -> Result<(), TreeError> {
        if let Some(root) = self.root
            && self.arena[root].parent.is_some()
        {
            return Err(TreeError::BrokenParentLink { depth: 0 });
        }
        let recorded = self.arena.len();
        let mut reachable = 0;
        let mut stack: SmallVec<[(NodeId, usize); STACK_INLINE]> =
            self.root.map(|root| (root, 0)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            reachable += 1;
            if reachable > recorded {
                return Err(TreeError::SizeMismatch {
                    recorded,
                    reachable,
                });
            }
            let node = &self.arena[id];
            for child in [node.left, node.right].into_iter().flatten() {
                if self.arena[child].parent != Some(id) {
                    return Err(TreeError::BrokenParentLink { depth: depth + 1 });
                }
                stack.push((child, depth + 1));
            }
            let expected = 1 + self
                .arena
                .stature(node.left)
                .max(self.arena.stature(node.right));
            if node.height != expected {
                return Err(TreeError::StaleHeight {
                    depth,
                    cached: node.height,
                    expected,
                });
            }
        }
        if reachable == recorded {
            Ok(())
        } else {
            Err(TreeError::SizeMismatch {
                recorded,
                reachable,
            })
        }
    }

    /// Checks that every node's balance factor lies in `[-1, 1]`.
    #[cfg(feature = "avl")]
    pub(crate) fn check_avl_balance(&self) -> Result<(), TreeError> {
        let mut stack: SmallVec<[(NodeId, usize); STACK_INLINE]> =
            self.root.map(|root| (root, 0)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            if !self.arena.is_avl_balanced(id) {
                return Err(TreeError::Unbalanced {
                    depth,
                    balance_factor: self.arena.balance_factor(id),
                });
            }
            let node = &self.arena[id];
            stack.extend(
                [node.left, node.right]
                    .into_iter()
                    .flatten()
                    .map(|child| (child, depth + 1)),
            );
        }
        Ok(())
    }
}

impl<K: Ord, V> RawTree<K, V> {
    /// Descends from the root comparing `key` against each node.
    pub(crate) fn search_path<Q>(&self, key: &Q) -> SearchPath
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut hot = None;
        let mut side = Side::Left;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = &self.arena[id];
            match key.cmp(node.key.borrow()) {
                Ordering::Equal => {
                    return SearchPath {
                        hit: Some(id),
                        hot: node.parent,
                        side,
                    };
                }
                Ordering::Less => {
                    side = Side::Left;
                    cursor = node.left;
                }
                Ordering::Greater => {
                    side = Side::Right;
                    cursor = node.right;
                }
            }
            hot = Some(id);
        }
        SearchPath {
            hit: None,
            hot,
            side,
        }
    }

    /// Checks every structural invariant shared by the three variants.
    pub(crate) fn validate(&self) -> Result<(), TreeError> {
        self.check_structure()?;
        let mut previous: Option<&K> = None;
        for (position, (key, _)) in self.inorder().enumerate() {
            if previous.is_some_and(|previous| previous >= key) {
                return Err(TreeError::OrderViolation { position });
            }
            previous = Some(key);
        }
        Ok(())
    }
}

/// Implements the variant-independent public API of a map type.
///
/// The map must be a struct with a single `tree: RawTree<K, V>` field and
/// inherent `search`, `insert`, `remove`, `remove_entry` and `validate`
/// methods.
macro_rules! ordered_map_api {
    ($map:ident) => {
        impl<K, V> $map<K, V> {
            /// Creates an empty map.
            #[inline]
            #[must_use]
            pub const fn new() -> Self {
                Self {
                    tree: $crate::tree::raw::RawTree::new(),
                }
            }

            /// Creates an empty map with room for `capacity` nodes before
            /// the node arena reallocates.
            #[must_use]
            pub fn with_capacity(capacity: usize) -> Self {
                Self {
                    tree: $crate::tree::raw::RawTree::with_capacity(capacity),
                }
            }

            /// Returns the number of entries in the map.
            ///
            /// # Complexity
            ///
            /// O(1)
            #[inline]
            #[must_use]
            pub fn len(&self) -> usize {
                self.tree.len()
            }

            /// Returns `true` if the map contains no entries.
            #[inline]
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.tree.len() == 0
            }

            /// Returns the number of nodes the arena can hold without reallocating.
            #[must_use]
            pub fn capacity(&self) -> usize {
                self.tree.capacity()
            }

            /// Returns a handle to the root node.
            #[must_use]
            pub fn root(&self) -> Option<$crate::tree::NodeRef<'_, K, V>> {
                self.tree.root_ref()
            }

            /// Returns the height of the tree: `-1` when empty, `0` for a
            /// single entry.
            #[must_use]
            pub fn height(&self) -> isize {
                self.tree.height()
            }

            /// Returns the entry with the smallest key without restructuring.
            #[must_use]
            pub fn min(&self) -> Option<(&K, &V)> {
                self.tree.min()
            }

            /// Returns the entry with the largest key without restructuring.
            #[must_use]
            pub fn max(&self) -> Option<(&K, &V)> {
                self.tree.max()
            }

            /// Returns an iterator over the entries in ascending key order.
            pub fn iter(&self) -> $crate::tree::Iter<'_, K, V> {
                self.tree.iter()
            }

            /// Returns an iterator over the keys in ascending order.
            pub fn keys(&self) -> impl Iterator<Item = &K> {
                self.iter().map(|(key, _)| key)
            }

            /// Returns an iterator over the values in key order.
            pub fn values(&self) -> impl Iterator<Item = &V> {
                self.iter().map(|(_, value)| value)
            }

            /// Calls `visit` on every value in ascending key order.
            pub fn traverse_inorder<F: FnMut(&V)>(&self, mut visit: F) {
                self.tree.inorder().for_each(|(_, value)| visit(value));
            }

            /// Calls `visit` on every value, each node before its children.
            pub fn traverse_preorder<F: FnMut(&V)>(&self, mut visit: F) {
                self.tree.preorder().for_each(|(_, value)| visit(value));
            }

            /// Calls `visit` on every value, each node after its children.
            pub fn traverse_postorder<F: FnMut(&V)>(&self, mut visit: F) {
                self.tree.postorder().for_each(|(_, value)| visit(value));
            }

            /// Calls `visit` on every value breadth first.
            pub fn traverse_level_order<F: FnMut(&V)>(&self, mut visit: F) {
                self.tree.level_order().for_each(|(_, value)| visit(value));
            }

            /// Removes every entry.
            pub fn clear(&mut self) {
                self.tree.clear();
            }
        }

        impl<K, V> Default for $map<K, V> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<K: Ord, V> FromIterator<(K, V)> for $map<K, V> {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                let mut map = Self::new();
                map.extend(iter);
                map
            }
        }

        impl<K: Ord, V> Extend<(K, V)> for $map<K, V> {
            /// Inserts every pair; pairs whose key is already present are dropped.
            fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
                for (key, value) in iter {
                    $map::insert(self, key, value);
                }
            }
        }

        impl<'a, K, V> IntoIterator for &'a $map<K, V> {
            type Item = (&'a K, &'a V);
            type IntoIter = $crate::tree::Iter<'a, K, V>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }

        impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for $map<K, V> {
            fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.debug_map().entries(self.iter()).finish()
            }
        }

        impl<K: std::fmt::Display, V: std::fmt::Display> std::fmt::Display for $map<K, V> {
            fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{{")?;
                let mut first = true;
                for (key, value) in self {
                    if first {
                        first = false;
                    } else {
                        write!(formatter, ", ")?;
                    }
                    write!(formatter, "{key}: {value}")?;
                }
                write!(formatter, "}}")
            }
        }

        impl<K: Ord, V> $crate::tree::OrderedMap<K, V> for $map<K, V> {
            fn len(&self) -> usize {
                $map::len(self)
            }

            fn root(&self) -> Option<$crate::tree::NodeRef<'_, K, V>> {
                $map::root(self)
            }

            fn iter(&self) -> $crate::tree::Iter<'_, K, V> {
                $map::iter(self)
            }

            fn search<Q>(&mut self, key: &Q) -> Option<$crate::tree::NodeRef<'_, K, V>>
            where
                K: std::borrow::Borrow<Q>,
                Q: Ord + ?Sized,
            {
                $map::search(self, key)
            }

            fn insert(&mut self, key: K, value: V) -> $crate::tree::NodeRef<'_, K, V> {
                $map::insert(self, key, value)
            }

            fn remove<Q>(&mut self, key: &Q) -> bool
            where
                K: std::borrow::Borrow<Q>,
                Q: Ord + ?Sized,
            {
                $map::remove(self, key)
            }

            fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
            where
                K: std::borrow::Borrow<Q>,
                Q: Ord + ?Sized,
            {
                $map::remove_entry(self, key)
            }

            fn validate(&self) -> Result<(), $crate::tree::TreeError> {
                $map::validate(self)
            }

            fn traverse_inorder<F: FnMut(&V)>(&self, visit: F) {
                $map::traverse_inorder(self, visit);
            }

            fn traverse_level_order<F: FnMut(&V)>(&self, visit: F) {
                $map::traverse_level_order(self, visit);
            }
        }
    };
}

pub(crate) use ordered_map_api;
