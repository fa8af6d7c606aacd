//! Error types for the tree family.
//!
//! Absence of a key is never an error: lookups return `Option` and removals
//! return `bool`. [`TreeError`] is reserved for structural misuse (asking the
//! root for its sibling) and for invariant violations reported by
//! `validate`.

use thiserror::Error;

/// Represents structural misuse of a tree or a broken tree invariant.
///
/// # Examples
///
/// ```rust
/// use arbormap::tree::TreeError;
///
/// let error = TreeError::SizeMismatch { recorded: 3, reachable: 2 };
/// assert_eq!(
///     format!("{error}"),
///     "size mismatch: map records 3 entries but 2 are reachable from the root"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// `sibling` was requested for the root node.
    #[error("the root node has no sibling")]
    RootHasNoSibling,

    /// A child does not point back to the node that owns it.
    #[error("broken parent link at depth {depth}")]
    BrokenParentLink {
        /// Depth of the child whose parent link is wrong.
        depth: usize,
    },

    /// An inorder walk met a key that is not strictly greater than its predecessor.
    #[error("keys out of order at inorder position {position}")]
    OrderViolation {
        /// Zero-based inorder position of the offending key.
        position: usize,
    },

    /// A cached height disagrees with the heights of the node's children.
    #[error("stale height at depth {depth}: cached {cached}, expected {expected}")]
    StaleHeight {
        /// Depth of the node.
        depth: usize,
        /// Height stored in the node.
        cached: isize,
        /// Height derived from the children.
        expected: isize,
    },

    /// An AVL node whose balance factor left the range `[-1, 1]`.
    #[error("unbalanced node at depth {depth}: balance factor {balance_factor}")]
    Unbalanced {
        /// Depth of the node.
        depth: usize,
        /// Left height minus right height.
        balance_factor: isize,
    },

    /// The recorded size differs from the number of reachable nodes.
    #[error(
        "size mismatch: map records {recorded} entries but {reachable} are reachable from the root"
    )]
    SizeMismatch {
        /// Number of entries the map believes it holds.
        recorded: usize,
        /// Number of nodes found by walking the tree.
        reachable: usize,
    },
}
