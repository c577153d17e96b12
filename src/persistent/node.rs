//! Treap nodes and the split/union/join primitives.
//!
//! Everything here works on immutable, reference-counted nodes. A primitive
//! never changes a node it receives: it allocates fresh nodes along the path
//! it walks and re-attaches every untouched subtree as-is.
//!
//! Recursion depth equals the height of the trees involved, which is
//! O(log N) in expectation for well-spread priorities and O(N) at worst.

use std::cmp::Ordering;

use super::{Priority, ReferenceCounter};
use crate::compare::Comparator;
use crate::error::InvariantViolation;

/// An optional, shared reference to a subtree.
pub(crate) type Link<T> = Option<ReferenceCounter<Node<T>>>;

// =============================================================================
// Node Definition
// =============================================================================

/// Internal node structure for the treap.
pub(crate) struct Node<T> {
    pub(crate) item: T,
    pub(crate) priority: Priority,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
}

impl<T> Node<T> {
    /// Creates a node with no children.
    pub(crate) const fn leaf(item: T, priority: Priority) -> Self {
        Self {
            item,
            priority,
            left: None,
            right: None,
        }
    }

    /// Creates a copy of this node with new children.
    fn with_children(&self, left: Link<T>, right: Link<T>) -> Self
    where
        T: Clone,
    {
        Self {
            item: self.item.clone(),
            priority: self.priority,
            left,
            right,
        }
    }
}

// =============================================================================
// Split
// =============================================================================

/// Result of splitting a subtree around a key.
pub(crate) struct Split<T> {
    /// Items strictly less than the key.
    pub(crate) left: Link<T>,
    /// The node whose item equals the key, if any.
    pub(crate) middle: Link<T>,
    /// Items strictly greater than the key.
    pub(crate) right: Link<T>,
}

impl<T> Split<T> {
    const fn empty() -> Self {
        Self {
            left: None,
            middle: None,
            right: None,
        }
    }
}

/// Partitions `node` into items less than, equal to, and greater than `key`.
///
/// Only the nodes on the search path are reallocated. The returned `middle`
/// is the original node (children included), shared rather than copied.
pub(crate) fn split<T, C>(
    node: Option<&ReferenceCounter<Node<T>>>,
    key: &T,
    comparator: &C,
) -> Split<T>
where
    T: Clone,
    C: Comparator<T> + ?Sized,
{
    let Some(node) = node else {
        return Split::empty();
    };
    match comparator.compare(key, &node.item) {
        Ordering::Equal => Split {
            left: node.left.clone(),
            middle: Some(ReferenceCounter::clone(node)),
            right: node.right.clone(),
        },
        Ordering::Less => {
            let Split {
                left,
                middle,
                right,
            } = split(node.left.as_ref(), key, comparator);
            Split {
                left,
                middle,
                right: Some(ReferenceCounter::new(
                    node.with_children(right, node.right.clone()),
                )),
            }
        }
        Ordering::Greater => {
            let Split {
                left,
                middle,
                right,
            } = split(node.right.as_ref(), key, comparator);
            Split {
                left: Some(ReferenceCounter::new(
                    node.with_children(node.left.clone(), left),
                )),
                middle,
                right,
            }
        }
    }
}

// =============================================================================
// Union
// =============================================================================

/// Merges two subtrees; items of `that` win over equal items of `this`.
///
/// Returns the merged subtree and the number of items present in both
/// inputs, so callers can maintain an exact length.
///
/// When both roots carry the same item and `this` has the strictly higher
/// priority, the merged node keeps `this.priority` but takes the item from
/// `that`. Otherwise the node from `that` is used whole.
pub(crate) fn union<T, C>(this: Link<T>, that: Link<T>, comparator: &C) -> (Link<T>, usize)
where
    T: Clone,
    C: Comparator<T> + ?Sized,
{
    let (this, that) = match (this, that) {
        (None, other) | (other, None) => return (other, 0),
        (Some(this), Some(that)) => (this, that),
    };

    if this.priority > that.priority {
        let Split {
            left,
            middle,
            right,
        } = split(Some(&that), &this.item, comparator);
        let collisions = usize::from(middle.is_some());
        let item = middle.map_or_else(|| this.item.clone(), |middle| middle.item.clone());
        let (new_left, left_collisions) = union(this.left.clone(), left, comparator);
        let (new_right, right_collisions) = union(this.right.clone(), right, comparator);
        let merged = Node {
            item,
            priority: this.priority,
            left: new_left,
            right: new_right,
        };
        (
            Some(ReferenceCounter::new(merged)),
            collisions + left_collisions + right_collisions,
        )
    } else {
        // The middle of `this` is dropped: `that` has precedence.
        let Split {
            left,
            middle,
            right,
        } = split(Some(&this), &that.item, comparator);
        let collisions = usize::from(middle.is_some());
        let (new_left, left_collisions) = union(left, that.left.clone(), comparator);
        let (new_right, right_collisions) = union(right, that.right.clone(), comparator);
        (
            Some(ReferenceCounter::new(that.with_children(new_left, new_right))),
            collisions + left_collisions + right_collisions,
        )
    }
}

// =============================================================================
// Join
// =============================================================================

/// Concatenates two subtrees where every item of `this` sorts before every
/// item of `that`.
///
/// The root with the higher priority becomes the merged root, so the heap
/// invariant holds without any split.
pub(crate) fn join<T: Clone>(this: Link<T>, that: Link<T>) -> Link<T> {
    match (this, that) {
        (None, other) | (other, None) => other,
        (Some(this), Some(that)) => {
            let merged = if this.priority > that.priority {
                this.with_children(this.left.clone(), join(this.right.clone(), Some(that)))
            } else {
                that.with_children(join(Some(this), that.left.clone()), that.right.clone())
            };
            Some(ReferenceCounter::new(merged))
        }
    }
}

// =============================================================================
// Push Traversal
// =============================================================================

/// Visits items `>= pivot` in ascending order until `visitor` returns false.
///
/// Returns false once the visitor has asked to stop. A node below the pivot
/// is skipped together with its whole left subtree.
pub(crate) fn visit_ascend<T, C, F>(
    node: Option<&ReferenceCounter<Node<T>>>,
    pivot: &T,
    comparator: &C,
    visitor: &mut F,
) -> bool
where
    C: Comparator<T> + ?Sized,
    F: FnMut(&T) -> bool,
{
    let Some(node) = node else {
        return true;
    };
    if comparator.compare(pivot, &node.item) != Ordering::Greater {
        if !visit_ascend(node.left.as_ref(), pivot, comparator, visitor) {
            return false;
        }
        if !visitor(&node.item) {
            return false;
        }
    }
    visit_ascend(node.right.as_ref(), pivot, comparator, visitor)
}

// =============================================================================
// Diagnostics
// =============================================================================

/// Number of nodes on the longest root-to-leaf path.
pub(crate) fn height<T>(node: Option<&ReferenceCounter<Node<T>>>) -> usize {
    node.map_or(0, |node| {
        1 + height(node.left.as_ref()).max(height(node.right.as_ref()))
    })
}

/// Verifies the order and heap invariants below `node`.
///
/// `lower` and `upper` are the exclusive bounds inherited from ancestors.
/// Returns the number of nodes in the subtree.
pub(crate) fn check_subtree<T, C>(
    node: Option<&ReferenceCounter<Node<T>>>,
    comparator: &C,
    lower: Option<&T>,
    upper: Option<&T>,
    depth: usize,
) -> Result<usize, InvariantViolation>
where
    C: Comparator<T> + ?Sized,
{
    let Some(node) = node else {
        return Ok(0);
    };

    let above_lower =
        lower.is_none_or(|lower| comparator.compare(lower, &node.item) == Ordering::Less);
    let below_upper =
        upper.is_none_or(|upper| comparator.compare(&node.item, upper) == Ordering::Less);
    if !(above_lower && below_upper) {
        return Err(InvariantViolation::OrderViolation { depth });
    }

    for child in [node.left.as_ref(), node.right.as_ref()].into_iter().flatten() {
        if child.priority > node.priority {
            return Err(InvariantViolation::HeapViolation {
                parent: node.priority,
                child: child.priority,
            });
        }
    }

    let left_count = check_subtree(
        node.left.as_ref(),
        comparator,
        lower,
        Some(&node.item),
        depth + 1,
    )?;
    let right_count = check_subtree(
        node.right.as_ref(),
        comparator,
        Some(&node.item),
        upper,
        depth + 1,
    )?;
    Ok(left_count + right_count + 1)
}

// =============================================================================
// Tests
// =============================================================================
