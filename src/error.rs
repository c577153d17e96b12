//! Error types for treap diagnostics.
//!
//! The treap operations themselves never fail: a missing key is reported as
//! `None`. The only fallible API is
//! [`PersistentTreap::check_invariants`](crate::persistent::PersistentTreap::check_invariants),
//! which reports the first broken structural invariant it finds.

use crate::persistent::Priority;

/// Describes a violated treap invariant.
///
/// A treap built only through its public operations with a consistent
/// comparator never produces one of these. Seeing one means the comparator
/// broke its total-order contract.
///
/// # Examples
///
/// ```rust
/// use ptreap::error::InvariantViolation;
///
/// let error = InvariantViolation::HeapViolation { parent: 3, child: 7 };
/// assert_eq!(
///     format!("{}", error),
///     "heap invariant violated: child priority 7 exceeds parent priority 3"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// An item is not strictly between the bounds implied by its ancestors.
    OrderViolation {
        /// Depth of the offending node (the root has depth 0).
        depth: usize,
    },
    /// A child has a higher priority than its parent.
    HeapViolation {
        /// Priority of the parent node.
        parent: Priority,
        /// Priority of the child node.
        child: Priority,
    },
    /// The cached length disagrees with the number of reachable nodes.
    LengthMismatch {
        /// Length recorded on the handle.
        recorded: usize,
        /// Number of nodes actually reachable from the root.
        actual: usize,
    },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrderViolation { depth } => {
                write!(formatter, "order invariant violated at depth {depth}")
            }
            Self::HeapViolation { parent, child } => write!(
                formatter,
                "heap invariant violated: child priority {child} exceeds parent priority {parent}"
            ),
            Self::LengthMismatch { recorded, actual } => write!(
                formatter,
                "length mismatch: recorded {recorded}, found {actual} reachable nodes"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}
