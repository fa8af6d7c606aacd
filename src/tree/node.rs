//! Binary tree vertex shared by every map in the family.
//!
//! A [`Node`] stores one entry, links to its parent and children, and a
//! cached height. The height of an absent subtree is `-1`, so a leaf has
//! height `0` and the rule `height = 1 + max(left, right)` holds uniformly.
//!
//! The structural queries (`is_left_child`, `sibling`, `successor`, ...) need
//! to follow links, so they are implemented on [`Arena`] and take a
//! [`NodeId`]. [`NodeRef`] wraps the same queries in a borrowed, public
//! handle.

use std::fmt;

use super::arena::{Arena, NodeId};
use super::error::TreeError;
use super::traversal::{InOrder, LevelOrder, PostOrder, PreOrder};

/// Height reported for an absent subtree.
pub(crate) const EMPTY_HEIGHT: isize = -1;

#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) height: isize,
}

impl<K, V> Node<K, V> {
    /// Creates a childless node hanging under `parent`.
    pub(crate) const fn leaf(key: K, value: V, parent: Option<NodeId>) -> Self {
        Self {
            key,
            value,
            parent,
            left: None,
            right: None,
            height: 0,
        }
    }
}

// =============================================================================
// Structural queries
// =============================================================================

impl<K, V> Arena<K, V> {
    /// Height of an optional node, `-1` for `None`.
    #[inline]
    pub(crate) fn stature(&self, id: Option<NodeId>) -> isize {
        id.map_or(EMPTY_HEIGHT, |id| self[id].height)
    }

    #[inline]
    pub(crate) fn is_root(&self, id: NodeId) -> bool {
        self[id].parent.is_none()
    }

    #[inline]
    pub(crate) fn is_left_child(&self, id: NodeId) -> bool {
        self[id]
            .parent
            .is_some_and(|parent| self[parent].left == Some(id))
    }

    #[inline]
    pub(crate) fn is_right_child(&self, id: NodeId) -> bool {
        self[id]
            .parent
            .is_some_and(|parent| self[parent].right == Some(id))
    }

    #[inline]
    pub(crate) fn has_child(&self, id: NodeId) -> bool {
        self[id].left.is_some() || self[id].right.is_some()
    }

    #[inline]
    pub(crate) fn has_both_children(&self, id: NodeId) -> bool {
        self[id].left.is_some() && self[id].right.is_some()
    }

    /// The other child of `id`'s parent.
    pub(crate) fn sibling(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        let parent = self[id].parent.ok_or(TreeError::RootHasNoSibling)?;
        Ok(if self.is_left_child(id) {
            self[parent].right
        } else {
            self[parent].left
        })
    }

    #[inline]
    pub(crate) fn balance_factor(&self, id: NodeId) -> isize {
        self.stature(self[id].left) - self.stature(self[id].right)
    }

    #[inline]
    pub(crate) fn is_balanced(&self, id: NodeId) -> bool {
        self.balance_factor(id) == 0
    }

    #[inline]
    pub(crate) fn is_avl_balanced(&self, id: NodeId) -> bool {
        (-1..=1).contains(&self.balance_factor(id))
    }

    /// The taller child of `id`.
    ///
    /// On a tie the child on the same side that `id` occupies under its own
    /// parent wins; the root breaks ties to the left. The AVL rebalancer relies
    /// on this to pick a single rotation over a double one after a removal.
    pub(crate) fn higher_child(&self, id: NodeId) -> Option<NodeId> {
        let node = &self[id];
        let left_height = self.stature(node.left);
        let right_height = self.stature(node.right);
        if left_height > right_height {
            node.left
        } else if right_height > left_height {
            node.right
        } else if self.is_right_child(id) {
            node.right
        } else {
            node.left
        }
    }

    pub(crate) fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self[id].left {
            id = left;
        }
        id
    }

    pub(crate) fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self[id].right {
            id = right;
        }
        id
    }

    /// Inorder successor of `id`, or `None` for the rightmost node.
    pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(right) = self[id].right {
            return Some(self.leftmost(right));
        }
        let mut current = id;
        while self.is_right_child(current) {
            current = self[current].parent?;
        }
        self[current].parent
    }

    /// Number of nodes in the subtree rooted at `id`.
    pub(crate) fn subtree_size(&self, id: NodeId) -> usize {
        PreOrder::new(self, Some(id)).count()
    }

    /// Recomputes the cached height of `id` from its children.
    pub(crate) fn update_height(&mut self, id: NodeId) -> isize {
        let height = 1 + self.stature(self[id].left).max(self.stature(self[id].right));
        self[id].height = height;
        height
    }

    /// Recomputes heights from `id` up to the root.
    pub(crate) fn update_height_above(&mut self, mut cursor: Option<NodeId>) {
        while let Some(id) = cursor {
            self.update_height(id);
            cursor = self[id].parent;
        }
    }

    /// Makes `child` the left child of `parent`, fixing the child's parent link.
    pub(crate) fn attach_left(&mut self, parent: NodeId, child: Option<NodeId>) {
        self[parent].left = child;
        if let Some(child) = child {
            self[child].parent = Some(parent);
        }
    }

    /// Makes `child` the right child of `parent`, fixing the child's parent link.
    pub(crate) fn attach_right(&mut self, parent: NodeId, child: Option<NodeId>) {
        self[parent].right = child;
        if let Some(child) = child {
            self[child].parent = Some(parent);
        }
    }
}

// =============================================================================
// NodeRef
// =============================================================================

/// A read-only handle to one node of a map.
///
/// Handles borrow the map they came from, so the borrow checker guarantees
/// a handle is never used after a later `insert`, `remove` or splay has
/// reshaped the tree.
///
/// # Examples
///
/// ```rust
/// use arbormap::tree::AvlTreeMap;
///
/// let map: AvlTreeMap<i32, &str> = [(1, "one"), (2, "two"), (3, "three")]
///     .into_iter()
///     .collect();
///
/// let root = map.root().unwrap();
/// assert_eq!(root.key(), &2);
/// assert_eq!(root.height(), 1);
/// assert!(root.is_root());
///
/// let left = root.left().unwrap();
/// assert!(left.is_left_child());
/// assert_eq!(left.successor().map(|node| *node.key()), Some(2));
/// assert_eq!(left.sibling().unwrap().map(|node| *node.value()), Some("three"));
/// ```
pub struct NodeRef<'a, K, V> {
    arena: &'a Arena<K, V>,
    id: NodeId,
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<'a, K, V> NodeRef<'a, K, V> {
    pub(crate) const fn new(arena: &'a Arena<K, V>, id: NodeId) -> Self {
        Self { arena, id }
    }

    #[inline]
    fn node(&self) -> &'a Node<K, V> {
        let arena: &'a Arena<K, V> = self.arena;
        &arena[self.id]
    }

    #[inline]
    fn wrap(&self, id: Option<NodeId>) -> Option<Self> {
        id.map(|id| Self::new(self.arena, id))
    }

    /// Returns the key stored in this node.
    #[must_use]
    pub fn key(&self) -> &'a K {
        &self.node().key
    }

    /// Returns the value stored in this node.
    #[must_use]
    pub fn value(&self) -> &'a V {
        &self.node().value
    }

    /// Returns the key and value stored in this node.
    #[must_use]
    pub fn entry(&self) -> (&'a K, &'a V) {
        let node = self.node();
        (&node.key, &node.value)
    }

    /// Returns the cached height; a leaf has height `0`.
    #[must_use]
    pub fn height(&self) -> isize {
        self.node().height
    }

    /// Returns the height of the left subtree minus that of the right one.
    #[must_use]
    pub fn balance_factor(&self) -> isize {
        self.arena.balance_factor(self.id)
    }

    /// Returns `true` if both subtrees have the same height.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.arena.is_balanced(self.id)
    }

    /// Returns `true` if the balance factor lies in `[-1, 1]`.
    #[must_use]
    pub fn is_avl_balanced(&self) -> bool {
        self.arena.is_avl_balanced(self.id)
    }

    /// Returns `true` if this node has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.arena.is_root(self.id)
    }

    /// Returns `true` if this node is its parent's left child.
    #[must_use]
    pub fn is_left_child(&self) -> bool {
        self.arena.is_left_child(self.id)
    }

    /// Returns `true` if this node is its parent's right child.
    #[must_use]
    pub fn is_right_child(&self) -> bool {
        self.arena.is_right_child(self.id)
    }

    /// Returns `true` if this node has a parent.
    #[must_use]
    pub fn has_parent(&self) -> bool {
        !self.is_root()
    }

    /// Returns `true` if this node has a left child.
    #[must_use]
    pub fn has_left_child(&self) -> bool {
        self.node().left.is_some()
    }

    /// Returns `true` if this node has a right child.
    #[must_use]
    pub fn has_right_child(&self) -> bool {
        self.node().right.is_some()
    }

    /// Returns `true` if this node has at least one child.
    #[must_use]
    pub fn has_child(&self) -> bool {
        self.arena.has_child(self.id)
    }

    /// Returns `true` if this node has two children.
    #[must_use]
    pub fn has_both_children(&self) -> bool {
        self.arena.has_both_children(self.id)
    }

    /// Returns `true` if this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !self.has_child()
    }

    /// Returns the parent node.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.wrap(self.node().parent)
    }

    /// Returns the left child.
    #[must_use]
    pub fn left(&self) -> Option<Self> {
        self.wrap(self.node().left)
    }

    /// Returns the right child.
    #[must_use]
    pub fn right(&self) -> Option<Self> {
        self.wrap(self.node().right)
    }

    /// Returns the other child of this node's parent.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::RootHasNoSibling`] when called on the root.
    pub fn sibling(&self) -> Result<Option<Self>, TreeError> {
        self.arena.sibling(self.id).map(|id| self.wrap(id))
    }

    /// Returns the node holding the next larger key.
    #[must_use]
    pub fn successor(&self) -> Option<Self> {
        self.wrap(self.arena.successor(self.id))
    }

    /// Returns the taller child, breaking ties towards this node's own side.
    #[must_use]
    pub fn higher_child(&self) -> Option<Self> {
        self.wrap(self.arena.higher_child(self.id))
    }

    /// Returns the number of nodes in the subtree rooted here.
    #[must_use]
    pub fn subtree_size(&self) -> usize {
        self.arena.subtree_size(self.id)
    }

    /// Iterates over this subtree in key order.
    #[must_use]
    pub fn inorder(&self) -> InOrder<'a, K, V> {
        InOrder::new(self.arena, Some(self.id))
    }

    /// Iterates over this subtree node first, then left, then right.
    #[must_use]
    pub fn preorder(&self) -> PreOrder<'a, K, V> {
        PreOrder::new(self.arena, Some(self.id))
    }

    /// Iterates over this subtree children first.
    #[must_use]
    pub fn postorder(&self) -> PostOrder<'a, K, V> {
        PostOrder::new(self.arena, Some(self.id))
    }

    /// Iterates over this subtree breadth first.
    #[must_use]
    pub fn level_order(&self) -> LevelOrder<'a, K, V> {
        LevelOrder::new(self.arena, Some(self.id))
    }
}

impl<K, V> PartialEq for NodeRef<'_, K, V> {
    /// Two handles are equal when they point at the same node of the same map.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.arena, other.arena) && self.id == other.id
    }
}

impl<K, V> Eq for NodeRef<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node();
        formatter
            .debug_struct("NodeRef")
            .field("key", &node.key)
            .field("value", &node.value)
            .field("height", &node.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    /// Hand-built tree:
    ///
    /// ```text
    ///         4
    ///       /   \
    ///      2     6
    ///     / \     \
    ///    1   3     7
    /// ```
    struct Sample {
        arena: Arena<i32, i32>,
        ids: Vec<NodeId>,
    }

    #[fixture]
    fn sample() -> Sample {
        let mut arena = Arena::new();
        // Keys 0 and 5 are allocated but never linked into the tree.
        let ids: Vec<NodeId> = (0..8)
            .map(|key| arena.allocate(Node::leaf(key, key * 10, None)))
            .collect();
        arena.attach_left(ids[4], Some(ids[2]));
        arena.attach_right(ids[4], Some(ids[6]));
        arena.attach_left(ids[2], Some(ids[1]));
        arena.attach_right(ids[2], Some(ids[3]));
        arena.attach_right(ids[6], Some(ids[7]));
        for key in [1, 3, 7, 2, 6, 4] {
            arena.update_height(ids[key]);
        }
        Sample { arena, ids }
    }

    fn keys<'a>(iter: impl Iterator<Item = (&'a i32, &'a i32)>) -> Vec<i32> {
        iter.map(|(key, _)| *key).collect()
    }

    #[rstest]
    fn test_heights_follow_children(sample: Sample) {
        let Sample { arena, ids } = sample;
        assert_eq!(arena[ids[1]].height, 0);
        assert_eq!(arena[ids[6]].height, 1);
        assert_eq!(arena[ids[4]].height, 2);
        assert_eq!(arena.stature(None), EMPTY_HEIGHT);
    }

    #[rstest]
    fn test_child_predicates(sample: Sample) {
        let Sample { arena, ids } = sample;
        assert!(arena.is_root(ids[4]));
        assert!(arena.is_left_child(ids[2]));
        assert!(!arena.is_right_child(ids[2]));
        assert!(arena.is_right_child(ids[7]));
        assert!(!arena.is_left_child(ids[4]));
        assert!(arena.has_both_children(ids[2]));
        assert!(arena.has_child(ids[6]));
        assert!(!arena.has_both_children(ids[6]));
        assert!(!arena.has_child(ids[3]));
    }

    #[rstest]
    fn test_sibling(sample: Sample) {
        let Sample { arena, ids } = sample;
        assert_eq!(arena.sibling(ids[2]), Ok(Some(ids[6])));
        assert_eq!(arena.sibling(ids[3]), Ok(Some(ids[1])));
        assert_eq!(arena.sibling(ids[7]), Ok(None));
        assert_eq!(arena.sibling(ids[4]), Err(TreeError::RootHasNoSibling));
    }

    #[rstest]
    #[case(1, Some(2))]
    #[case(2, Some(3))]
    #[case(3, Some(4))]
    #[case(4, Some(6))]
    #[case(6, Some(7))]
    #[case(7, None)]
    fn test_successor(sample: Sample, #[case] key: usize, #[case] expected: Option<usize>) {
        let Sample { arena, ids } = sample;
        assert_eq!(arena.successor(ids[key]), expected.map(|key| ids[key]));
    }

    #[rstest]
    fn test_balance_factor(sample: Sample) {
        let Sample { arena, ids } = sample;
        assert_eq!(arena.balance_factor(ids[4]), 0);
        assert_eq!(arena.balance_factor(ids[6]), -1);
        assert!(arena.is_balanced(ids[2]));
        assert!(!arena.is_balanced(ids[6]));
        assert!(arena.is_avl_balanced(ids[6]));
    }

    #[rstest]
    fn test_higher_child_prefers_taller_subtree(sample: Sample) {
        let Sample { arena, ids } = sample;
        assert_eq!(arena.higher_child(ids[6]), Some(ids[7]));
    }

    #[rstest]
    fn test_higher_child_tie_breaks_by_own_side(sample: Sample) {
        let Sample { arena, ids } = sample;
        // 2 is a left child with equal subtrees: prefer its left child.
        assert_eq!(arena.higher_child(ids[2]), Some(ids[1]));
        // The root also breaks ties to the left.
        assert_eq!(arena.higher_child(ids[4]), Some(ids[2]));
    }

    #[rstest]
    fn test_higher_child_tie_on_right_child() {
        let mut arena = Arena::new();
        let root = arena.allocate(Node::leaf(1, (), None));
        let right = arena.allocate(Node::leaf(3, (), None));
        let right_left = arena.allocate(Node::leaf(2, (), None));
        let right_right = arena.allocate(Node::leaf(4, (), None));
        arena.attach_right(root, Some(right));
        arena.attach_left(right, Some(right_left));
        arena.attach_right(right, Some(right_right));
        arena.update_height_above(Some(right));

        assert_eq!(arena.higher_child(right), Some(right_right));
        assert_eq!(arena[root].height, 2);
    }

    #[rstest]
    fn test_subtree_size(sample: Sample) {
        let Sample { arena, ids } = sample;
        assert_eq!(arena.subtree_size(ids[4]), 6);
        assert_eq!(arena.subtree_size(ids[2]), 3);
        assert_eq!(arena.subtree_size(ids[7]), 1);
    }

    #[rstest]
    fn test_node_ref_navigation(sample: Sample) {
        let Sample { arena, ids } = sample;
        let root = NodeRef::new(&arena, ids[4]);
        let left = root.left().unwrap();
        assert_eq!(left.entry(), (&2, &20));
        assert_eq!(left.parent(), Some(root));
        assert!(left.has_parent());
        assert!(left.has_left_child() && left.has_right_child());
        assert!(root.right().unwrap().right().unwrap().is_leaf());
        assert_eq!(root.higher_child(), Some(left));
        assert_eq!(root.sibling(), Err(TreeError::RootHasNoSibling));
    }

    #[rstest]
    fn test_node_ref_traversals(sample: Sample) {
        let Sample { arena, ids } = sample;
        let root = NodeRef::new(&arena, ids[4]);
        assert_eq!(keys(root.inorder()), vec![1, 2, 3, 4, 6, 7]);
        assert_eq!(keys(root.preorder()), vec![4, 2, 1, 3, 6, 7]);
        assert_eq!(keys(root.postorder()), vec![1, 3, 2, 7, 6, 4]);
        assert_eq!(keys(root.level_order()), vec![4, 2, 6, 1, 3, 7]);
    }

    #[rstest]
    fn test_node_ref_debug(sample: Sample) {
        let Sample { arena, ids } = sample;
        let node = NodeRef::new(&arena, ids[7]);
        assert_eq!(
            format!("{node:?}"),
            "NodeRef { key: 7, value: 70, height: 0 }"
        );
    }
}
