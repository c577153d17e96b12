//! # ptreap
//!
//! A persistent (immutable, versioned) ordered container built on a treap.
//!
//! ## Overview
//!
//! A treap is a binary search tree whose shape is additionally constrained
//! by per-node priorities: items are ordered left-to-right by a comparator,
//! and priorities form a max-heap from the root down. This crate provides:
//!
//! - **Comparators**: a [`Comparator`](compare::Comparator) capability with a
//!   natural-order default and a blanket impl for closures
//! - **Persistent Treap**: [`PersistentTreap`](persistent::PersistentTreap),
//!   where every `upsert` and `delete` returns a new version while all older
//!   versions stay intact and share unmodified subtrees
//! - **Traversal**: push-style `ascend` with early stop and a pull-style
//!   [`AscendIterator`](persistent::AscendIterator) yielding the same sequence
//!
//! Priorities are supplied by the caller. The expected O(log N) height only
//! holds when they are well spread (for example, random).
//!
//! ## Feature Flags
//!
//! - `arc`: share nodes through `std::sync::Arc` instead of `std::rc::Rc`,
//!   making versions `Send + Sync`
//!
//! ## Example
//!
//! ```rust
//! use ptreap::prelude::*;
//!
//! let treap = PersistentTreap::new()
//!     .upsert("b", 200)
//!     .upsert("a", 100)
//!     .upsert("c", 300);
//!
//! let removed = treap.delete(&"a");
//! assert_eq!(treap.get(&"a"), Some(&"a")); // Original unchanged
//! assert_eq!(removed.get(&"a"), None);     // New version
//!
//! let items: Vec<&&str> = removed.iter().collect();
//! assert_eq!(items, vec![&"b", &"c"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use ptreap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::compare::*;
    pub use crate::error::*;
    pub use crate::persistent::*;
}

pub mod compare;
pub mod error;
pub mod persistent;
