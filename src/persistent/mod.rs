//! Persistent (immutable) treap.
//!
//! This module provides [`PersistentTreap`], an ordered container that uses
//! structural sharing to keep every version alive and cheap:
//!
//! - [`PersistentTreap`]: the container handle (comparator + root)
//! - [`AscendIterator`]: pull-style ascending traversal from a pivot
//! - [`PersistentTreapIntoIterator`]: owning ascending traversal
//!
//! # Structural Sharing
//!
//! `upsert` and `delete` rebuild only the nodes on the path they touch.
//! Every other subtree is shared, by reference count, between the old and
//! the new version. Nodes are never mutated after construction.
//!
//! # Examples
//!
//! ```rust
//! use ptreap::persistent::PersistentTreap;
//!
//! let treap = PersistentTreap::new()
//!     .upsert(3, 30)
//!     .upsert(1, 10)
//!     .upsert(2, 20);
//!
//! // Items are always visited in ascending order
//! let mut seen = Vec::new();
//! treap.ascend(&2, |item| {
//!     seen.push(*item);
//!     true
//! });
//! assert_eq!(seen, vec![2, 3]);
//!
//! // Structural sharing: the original treap is preserved
//! let updated = treap.delete(&2);
//! assert_eq!(treap.len(), 3);   // Original unchanged
//! assert_eq!(updated.len(), 2); // New version
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

/// Caller-supplied balancing weight of an item.
///
/// Higher priorities sit closer to the root.
pub type Priority = i64;

mod iterator;
mod node;
mod treap;

pub use iterator::AscendIterator;
pub use iterator::PersistentTreapIntoIterator;
pub use treap::PersistentTreap;

// =============================================================================
// Tests
// =============================================================================
