//! The interface shared by the three map variants.

use std::borrow::Borrow;

use super::error::TreeError;
use super::node::NodeRef;
use super::traversal::Iter;

/// An ordered map stored as a binary search tree.
///
/// Implementors differ only in how they restructure the tree: not at all
/// ([`BinarySearchTreeMap`](super::BinarySearchTreeMap)), by AVL rotations
/// ([`AvlTreeMap`](super::AvlTreeMap)) or by splaying accessed nodes to the
/// root ([`SplayTreeMap`](super::SplayTreeMap)). `search` takes `&mut self`
/// because a splay tree restructures on every lookup.
///
/// Keys are unique. Inserting a key that is already present leaves the map
/// unchanged and returns the existing node.
///
/// # Examples
///
/// ```rust
/// use arbormap::tree::{AvlTreeMap, OrderedMap, SplayTreeMap};
///
/// fn fill<M: OrderedMap<i32, &'static str> + Default>() -> M {
///     let mut map = M::default();
///     map.insert(2, "two");
///     map.insert(1, "one");
///     map.insert(3, "three");
///     map
/// }
///
/// let mut avl: AvlTreeMap<_, _> = fill();
/// let mut splay: SplayTreeMap<_, _> = fill();
///
/// assert_eq!(avl.search(&1).map(|node| *node.value()), Some("one"));
/// assert!(splay.search(&1).is_some_and(|node| node.is_root()));
/// assert!(avl.remove(&2));
/// assert_eq!(avl.len(), 2);
/// assert!(avl.validate().is_ok() && splay.validate().is_ok());
/// ```
pub trait OrderedMap<K: Ord, V> {
    /// Returns the number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the map holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a handle to the root node, or `None` if the map is empty.
    fn root(&self) -> Option<NodeRef<'_, K, V>>;

    /// Returns an iterator over the entries in ascending key order.
    fn iter(&self) -> Iter<'_, K, V>;

    /// Looks up `key` and returns its node.
    fn search<Q>(&mut self, key: &Q) -> Option<NodeRef<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized;

    /// Returns `true` if `key` is present.
    fn contains<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).is_some()
    }

    /// Inserts `key` with `value` and returns the node holding `key`.
    ///
    /// If `key` is already present the map is left untouched, `value` is
    /// dropped and the existing node is returned.
    fn insert(&mut self, key: K, value: V) -> NodeRef<'_, K, V>;

    /// Removes `key`, returning `true` if it was present.
    fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized;

    /// Removes `key` and returns its entry.
    fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized;

    /// Checks the structural invariants of the variant.
    ///
    /// # Errors
    ///
    /// Returns the first [`TreeError`] found.
    fn validate(&self) -> Result<(), TreeError>;

    /// Calls `visit` on every value in ascending key order.
    fn traverse_inorder<F: FnMut(&V)>(&self, visit: F);

    /// Calls `visit` on every value breadth first.
    fn traverse_level_order<F: FnMut(&V)>(&self, visit: F);
}
