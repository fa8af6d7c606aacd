//! Lazy traversals over a subtree.
//!
//! All four orders are iterative. Depth-first orders keep an explicit stack
//! whose first [`STACK_INLINE`] entries live inline, so walking a tree no
//! deeper than that never allocates for bookkeeping. Level order uses a
//! queue.
//!
//! Each iterator yields `(&K, &V)` pairs and visits every node of the
//! subtree exactly once.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use smallvec::SmallVec;

use super::arena::{Arena, NodeId};

/// Inline capacity of the depth-first traversal stacks.
pub(crate) const STACK_INLINE: usize = 32;

type Stack = SmallVec<[NodeId; STACK_INLINE]>;

// =============================================================================
// InOrder
// =============================================================================

/// Iterator over a subtree in ascending key order.
///
/// Pushes the left spine of each subtree, pops a node, then continues with
/// the left spine of its right child.
pub struct InOrder<'a, K, V> {
    arena: &'a Arena<K, V>,
    stack: Stack,
}

impl<'a, K, V> InOrder<'a, K, V> {
    pub(crate) fn new(arena: &'a Arena<K, V>, start: Option<NodeId>) -> Self {
        let mut iterator = Self {
            arena,
            stack: SmallVec::new(),
        };
        iterator.push_left_branch(start);
        iterator
    }

    fn push_left_branch(&mut self, mut cursor: Option<NodeId>) {
        while let Some(id) = cursor {
            self.stack.push(id);
            cursor = self.arena[id].left;
        }
    }
}

impl<'a, K, V> Iterator for InOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let arena: &'a Arena<K, V> = self.arena;
        let node = &arena[id];
        self.push_left_branch(node.right);
        Some((&node.key, &node.value))
    }
}

impl<K, V> FusedIterator for InOrder<'_, K, V> {}

// =============================================================================
// PreOrder
// =============================================================================

/// Iterator over a subtree visiting each node before its children.
pub struct PreOrder<'a, K, V> {
    arena: &'a Arena<K, V>,
    stack: Stack,
}

impl<'a, K, V> PreOrder<'a, K, V> {
    pub(crate) fn new(arena: &'a Arena<K, V>, start: Option<NodeId>) -> Self {
        Self {
            arena,
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a, K, V> Iterator for PreOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let arena: &'a Arena<K, V> = self.arena;
        let node = &arena[id];
        self.stack.extend(node.right);
        self.stack.extend(node.left);
        Some((&node.key, &node.value))
    }
}

impl<K, V> FusedIterator for PreOrder<'_, K, V> {}

// =============================================================================
// PostOrder
// =============================================================================

/// Iterator over a subtree visiting each node after both of its children.
///
/// Whenever the top of the stack is not the parent of the node visited last,
/// it roots an unexplored subtree: descend from it towards the highest leaf
/// visible from the left, stacking right siblings on the way.
pub struct PostOrder<'a, K, V> {
    arena: &'a Arena<K, V>,
    stack: Stack,
    last_visited: Option<NodeId>,
}

impl<'a, K, V> PostOrder<'a, K, V> {
    pub(crate) fn new(arena: &'a Arena<K, V>, start: Option<NodeId>) -> Self {
        Self {
            arena,
            stack: start.into_iter().collect(),
            last_visited: None,
        }
    }

    fn descend_to_first_leaf(&mut self) {
        while let Some(&top) = self.stack.last() {
            let node = &self.arena[top];
            match (node.left, node.right) {
                (Some(left), right) => {
                    self.stack.extend(right);
                    self.stack.push(left);
                }
                (None, Some(right)) => self.stack.push(right),
                (None, None) => break,
            }
        }
    }
}

impl<'a, K, V> Iterator for PostOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let &top = self.stack.last()?;
        let finished_children = self
            .last_visited
            .is_some_and(|last| self.arena[last].parent == Some(top));
        if !finished_children {
            self.descend_to_first_leaf();
        }
        let id = self.stack.pop()?;
        self.last_visited = Some(id);
        let arena: &'a Arena<K, V> = self.arena;
        let node = &arena[id];
        Some((&node.key, &node.value))
    }
}

impl<K, V> FusedIterator for PostOrder<'_, K, V> {}

// =============================================================================
// LevelOrder
// =============================================================================

/// Iterator over a subtree breadth first, left to right within a level.
pub struct LevelOrder<'a, K, V> {
    arena: &'a Arena<K, V>,
    queue: VecDeque<NodeId>,
}

impl<'a, K, V> LevelOrder<'a, K, V> {
    pub(crate) fn new(arena: &'a Arena<K, V>, start: Option<NodeId>) -> Self {
        Self {
            arena,
            queue: start.into_iter().collect(),
        }
    }
}

impl<'a, K, V> Iterator for LevelOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.queue.pop_front()?;
        let arena: &'a Arena<K, V> = self.arena;
        let node = &arena[id];
        self.queue.extend(node.left);
        self.queue.extend(node.right);
        Some((&node.key, &node.value))
    }
}

impl<K, V> FusedIterator for LevelOrder<'_, K, V> {}

// =============================================================================
// Iter
// =============================================================================

/// Iterator over the entries of a map in ascending key order.
///
/// Created by the `iter` method of each map.
pub struct Iter<'a, K, V> {
    inner: InOrder<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(arena: &'a Arena<K, V>, root: Option<NodeId>) -> Self {
        Self {
            inner: InOrder::new(arena, root),
            remaining: arena.len(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next()?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
