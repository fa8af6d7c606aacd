//! Slot storage for tree nodes.
//!
//! Every node of a map lives in one [`Arena`] owned by that map and is
//! addressed by a [`NodeId`]. Ownership therefore flows from the map to the
//! arena, never along the tree links: a parent link is just an id, so the
//! parent/child cycle needs no reference counting and no `unsafe`.
//!
//! The arena is a thin layer over [`Slab`]: released slots are handed out
//! again by the next allocation, most recent first. Dropping the arena drops
//! every remaining node in one linear pass, so tearing down even a degenerate
//! (list-shaped) tree cannot overflow the stack.

use std::ops::{Index, IndexMut};

use slab::Slab;

use super::node::Node;

/// Handle of a node inside an [`Arena`], wrapping its slab key.
///
/// Ids are only meaningful for the arena that issued them and only while
/// the slot is occupied.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct NodeId(usize);

impl NodeId {
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

/// A growable pool of nodes.
#[derive(Clone)]
pub(crate) struct Arena<K, V> {
    nodes: Slab<Node<K, V>>,
}

impl<K, V> Arena<K, V> {
    pub(crate) const fn new() -> Self {
        Self { nodes: Slab::new() }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
        }
    }

    /// Number of occupied slots.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Stores `node` and returns its id, reusing a vacant slot when one exists.
    pub(crate) fn allocate(&mut self, node: Node<K, V>) -> NodeId {
        NodeId(self.nodes.insert(node))
    }

    /// Removes the node at `id` from the arena and returns it.
    ///
    /// # Panics
    ///
    /// Panics if the slot is already vacant.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<K, V> {
        self.nodes
            .try_remove(id.index())
            .unwrap_or_else(|| panic!("double release of arena slot {}", id.index()))
    }

    /// Exchanges the key/value pairs of two nodes, leaving their links intact.
    pub(crate) fn swap_entries(&mut self, first: NodeId, second: NodeId) {
        if first == second {
            return;
        }
        let Some((first, second)) = self.nodes.get2_mut(first.index(), second.index()) else {
            panic!("swap_entries on a vacant arena slot");
        };
        std::mem::swap(&mut first.key, &mut second.key);
        std::mem::swap(&mut first.value, &mut second.value);
    }

    /// Drops every node.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl<K, V> Index<NodeId> for Arena<K, V> {
    type Output = Node<K, V>;

    #[inline]
    fn index(&self, id: NodeId) -> &Self::Output {
        self.nodes
            .get(id.index())
            .unwrap_or_else(|| panic!("arena slot {} is vacant", id.index()))
    }
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.nodes
            .get_mut(id.index())
            .unwrap_or_else(|| panic!("arena slot {} is vacant", id.index()))
    }
}
