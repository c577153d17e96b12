//! Persistent (immutable) treap.
//!
//! This module provides [`PersistentTreap`], an immutable ordered container
//! that uses structural sharing for efficient versioning.
//!
//! # Overview
//!
//! A treap is a binary search tree where each node also carries a priority.
//! Items are kept in comparator order from left to right, and priorities
//! never increase from a parent to its children. The priorities are supplied
//! by the caller; when they are random, the tree has expected O(log N)
//! height.
//!
//! - O(log N) get (expected)
//! - O(log N) upsert (expected)
//! - O(log N) delete (expected)
//! - O(log N) min/max (expected)
//! - O(log N + k) ascending traversal yielding k items (expected)
//! - O(1) len, `is_empty`, and clone
//!
//! All operations return new treaps without modifying the original,
//! and structural sharing ensures memory efficiency.
//!
//! # Examples
//!
//! ```rust
//! use ptreap::persistent::PersistentTreap;
//!
//! let treap = PersistentTreap::new()
//!     .upsert(3, 70)
//!     .upsert(1, 20)
//!     .upsert(2, 45);
//!
//! // Items are always visited in sorted order
//! let items: Vec<&i32> = treap.iter().collect();
//! assert_eq!(items, vec![&1, &2, &3]);
//!
//! // Traversal from a pivot
//! let tail: Vec<&i32> = treap.iter_from(&2).collect();
//! assert_eq!(tail, vec![&2, &3]);
//! ```
//!
//! # Internal Structure
//!
//! The treap maintains the following invariants for every node:
//! 1. Every item in the left subtree compares less than the node's item
//! 2. Every item in the right subtree compares greater than the node's item
//! 3. The node's priority is at least the priority of each child
//!
//! `upsert` merges a single-node treap into the root with a union that
//! splits around keys; `delete` splits out the key and joins the two halves.
//! Neither ever rotates or mutates an existing node.

use std::cmp::Ordering;
use std::fmt;

use super::iterator::{AscendIterator, PersistentTreapIntoIterator};
use super::node::{self, Link, Node, Split};
use super::{Priority, ReferenceCounter};
use crate::compare::{Comparator, NaturalOrder};
use crate::error::InvariantViolation;

// =============================================================================
// PersistentTreap Definition
// =============================================================================

/// A persistent (immutable) ordered container based on a treap.
///
/// `PersistentTreap` pairs a comparator with a shared root node. Every
/// `upsert` or `delete` returns a new handle; the handle it was derived from
/// keeps answering queries exactly as before, and both share all subtrees
/// the operation did not touch.
///
/// Items are opaque to the treap and are only ever compared through the
/// comparator `C`. An item doubles as its own key: to store values, use an
/// item type whose comparator looks at the key part only.
///
/// # Time Complexity
///
/// Bounds assume priorities with good statistical spread. Adversarial or
/// monotonic priorities degrade the height, and every bound, to O(N).
///
/// | Operation   | Complexity        |
/// |-------------|-------------------|
/// | `new`       | O(1)              |
/// | `get`       | O(log N)          |
/// | `upsert`    | O(log N)          |
/// | `delete`    | O(log N)          |
/// | `min`/`max` | O(log N)          |
/// | `iter_from` | O(log N + k)      |
/// | `len`       | O(1)              |
/// | `clone`     | O(1)              |
///
/// # Examples
///
/// ```rust
/// use ptreap::persistent::PersistentTreap;
///
/// let first = PersistentTreap::new().upsert("a", 100).upsert("b", 200);
/// let second = first.upsert("c", 300);
/// let third = second.delete(&"a");
///
/// assert_eq!(first.len(), 2);
/// assert_eq!(second.len(), 3);
/// assert_eq!(third.len(), 2);
/// assert_eq!(third.min(), Some(&"b"));
/// assert_eq!(first.get(&"a"), Some(&"a"));
/// ```
pub struct PersistentTreap<T, C = NaturalOrder> {
    /// Root node of the tree
    root: Link<T>,
    /// Number of items
    length: usize,
    /// Ordering shared by every version derived from this treap
    comparator: ReferenceCounter<C>,
}

// Rc-backed versions must stay on one thread; Arc-backed ones may be shared.
#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentTreap<i32>: Send, Sync);

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentTreap<i32>: Send, Sync);

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentTreap<String>: Send, Sync);

impl<T: Ord> PersistentTreap<T> {
    /// Creates a new empty treap ordered by `T`'s [`Ord`] implementation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptreap::persistent::PersistentTreap;
    ///
    /// let treap: PersistentTreap<i32> = PersistentTreap::new();
    /// assert!(treap.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T: Ord + Clone> PersistentTreap<T> {
    /// Creates a treap containing a single item.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptreap::persistent::PersistentTreap;
    ///
    /// let treap = PersistentTreap::singleton(42, 7);
    /// assert_eq!(treap.len(), 1);
    /// assert_eq!(treap.get_entry(&42), Some((&42, 7)));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(item: T, priority: Priority) -> Self {
        Self::new().upsert(item, priority)
    }
}

impl<T, C> PersistentTreap<T, C> {
    /// Creates a new empty treap ordered by `comparator`.
    ///
    /// The comparator is shared by every version derived from the returned
    /// treap. It must define a consistent total order for as long as any of
    /// those versions is in use.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptreap::persistent::PersistentTreap;
    ///
    /// let treap = PersistentTreap::with_comparator(|left: &String, right: &String| {
    ///     left.to_lowercase().cmp(&right.to_lowercase())
    /// })
    /// .upsert("Apple".to_string(), 1)
    /// .upsert("apple".to_string(), 2);
    ///
    /// assert_eq!(treap.len(), 1);
    /// assert_eq!(treap.get(&"APPLE".to_string()), Some(&"apple".to_string()));
    /// ```
    #[inline]
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            root: None,
            length: 0,
            comparator: ReferenceCounter::new(comparator),
        }
    }

    /// Returns the number of items in the treap.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the treap contains no items.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the comparator this treap orders its items by.
    #[inline]
    #[must_use]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the smallest item, or `None` if the treap is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptreap::persistent::PersistentTreap;
    ///
    /// let treap = PersistentTreap::new().upsert(3, 1).upsert(1, 2).upsert(2, 3);
    /// assert_eq!(treap.min(), Some(&1));
    ///
    /// let empty: PersistentTreap<i32> = PersistentTreap::new();
    /// assert_eq!(empty.min(), None);
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.item)
    }

    /// Returns the largest item, or `None` if the treap is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptreap::persistent::PersistentTreap;
    ///
    /// let treap = PersistentTreap::new().upsert(3, 1).upsert(1, 2).upsert(2, 3);
    /// assert_eq!(treap.max(), Some(&3));
    /// ```
    #[must_use]
    pub fn max(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.item)
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    ///
    /// Useful to judge the quality of the priorities in use: random
    /// priorities keep this within a small factor of log2(len).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptreap::persistent::PersistentTreap;
    ///
    /// // Priorities rising with the keys produce a degenerate path.
    /// let path: PersistentTreap<i32> = (0..8).map(|index| (index, i64::from(index))).collect();
    /// assert_eq!(path.height(), 8);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        node::height(self.root.as_ref())
    }

    /// Returns `true` if both treaps share the same root node.
    ///
    /// Two handles sharing a root are guaranteed to hold the same items.
    /// The converse does not hold: equal contents may live in distinct nodes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptreap::persistent::PersistentTreap;
    ///
    /// let treap = PersistentTreap::new().upsert(1, 10);
    /// let copy = treap.clone();
    /// assert!(treap.ptr_eq(&copy));
    /// assert!(!treap.ptr_eq(&treap.upsert(2, 20)));
    /// ```
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (None, None) => true,
            (Some(left), Some(right)) => ReferenceCounter::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl<T: Clone, C: Comparator<T>> PersistentTreap<T, C> {
    /// Walks the search path for `key` and returns the matching node.
    fn find(&self, key: &T) -> Option<&Node<T>> {
        let mut node = self.root.as_deref();
        while let Some(current) = node {
            match self.comparator.compare(key, &current.item) {
                Ordering::Less => node = current.left.as_deref(),
                Ordering::Greater => node = current.right.as_deref(),
                Ordering::Equal => return Some(current),
            }
        }
        None
    }

    /// Returns the stored item that compares equal to `key`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptreap::persistent::PersistentTreap;
    ///
    /// let treap = PersistentTreap::new().upsert("a", 100).upsert("b", 200);
    /// assert_eq!(treap.get(&"a"), Some(&"a"));
    /// assert_eq!(treap.get(&"x"), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &T) -> Option<&T> {
        self.find(key).map(|node| &node.item)
    }

    /// Returns the stored item equal to `key` together with its priority.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptreap::persistent::PersistentTreap;
    ///
    /// let treap = PersistentTreap::new().upsert('m', 20);
    /// assert_eq!(treap.get_entry(&'m'), Some((&'m', 20)));
    /// assert_eq!(treap.get_entry(&'z'), None);
    /// ```
    #[must_use]
    pub fn get_entry(&self, key: &T) -> Option<(&T, Priority)> {
        self.find(key).map(|node| (&node.item, node.priority))
    }

    /// Returns the priority stored with the item equal to `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptreap::persistent::PersistentTreap;
    ///
    /// let treap = PersistentTreap::new().upsert('m', 20).upsert('m', 4);
    /// assert_eq!(treap.priority(&'m'), Some(20));
    /// ```
    #[must_use]
    pub fn priority(&self, key: &T) -> Option<Priority> {
        self.find(key).map(|node| node.priority)
    }

    /// Returns `true` if an item equal to `key` is stored.
    #[must_use]
    pub fn contains(&self, key: &T) -> bool {
        self.find(key).is_some()
    }

    /// Inserts `item`, or replaces the stored item that compares equal to it.
    ///
    /// When the key is new, `priority` decides where the item settles:
    /// higher priorities sit closer to the root.
    ///
    /// When the key already exists, the stored item is always replaced by
    /// `item`. The stored priority is kept if it is strictly greater than
    /// `priority`; otherwise it is replaced by `priority` as well. To lower
    /// the priority of an existing item, `delete` it first.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptreap::persistent::PersistentTreap;
    ///
    /// let first = PersistentTreap::new().upsert('m', 20);
    /// let lowered = first.upsert('m', 4);
    /// let raised = first.upsert('m', 50);
    ///
    /// assert_eq!(lowered.priority(&'m'), Some(20)); // kept
    /// assert_eq!(raised.priority(&'m'), Some(50));  // replaced
    /// assert_eq!(first.priority(&'m'), Some(20));   // original unchanged
    /// ```
    #[must_use]
    pub fn upsert(&self, item: T, priority: Priority) -> Self {
        let singleton = Some(ReferenceCounter::new(Node::leaf(item, priority)));
        let (root, collisions) = node::union(self.root.clone(), singleton, &*self.comparator);
        Self {
            root,
            length: self.length + 1 - collisions,
            comparator: ReferenceCounter::clone(&self.comparator),
        }
    }

    /// Removes the item that compares equal to `key`.
    ///
    /// Returns a new treap without the item. If no such item exists, the
    /// result shares its root with `self`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptreap::persistent::PersistentTreap;
    ///
    /// let treap = PersistentTreap::new().upsert(1, 10).upsert(2, 20);
    /// let removed = treap.delete(&1);
    ///
    /// assert_eq!(treap.len(), 2);   // Original unchanged
    /// assert_eq!(removed.len(), 1); // New version
    /// assert_eq!(removed.get(&1), None);
    /// ```
    #[must_use]
    pub fn delete(&self, key: &T) -> Self {
        let Split {
            left,
            middle,
            right,
        } = node::split(self.root.as_ref(), key, &*self.comparator);
        if middle.is_none() {
            return self.clone();
        }
        Self {
            root: node::join(left, right),
            length: self.length - 1,
            comparator: ReferenceCounter::clone(&self.comparator),
        }
    }

    /// Visits every item `>= pivot` in ascending order.
    ///
    /// `visitor` returns `true` to continue and `false` to stop; after a
    /// `false` no further item is visited and no further subtree is walked.
    /// Subtrees lying entirely below the pivot are skipped without being
    /// visited.
    ///
    /// This yields exactly the sequence of [`iter_from`](Self::iter_from).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptreap::persistent::PersistentTreap;
    ///
    /// let treap: PersistentTreap<i32> = (1..=9).map(|item| (item, i64::from(item % 4))).collect();
    ///
    /// let mut seen = Vec::new();
    /// treap.ascend(&4, |item| {
    ///     seen.push(*item);
    ///     *item < 6
    /// });
    /// assert_eq!(seen, vec![4, 5, 6]);
    /// ```
    pub fn ascend<F>(&self, pivot: &T, mut visitor: F)
    where
        F: FnMut(&T) -> bool,
    {
        node::visit_ascend(self.root.as_ref(), pivot, &*self.comparator, &mut visitor);
    }

    /// Returns an iterator over the items `>= pivot`, in ascending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptreap::persistent::PersistentTreap;
    ///
    /// let treap = PersistentTreap::new()
    ///     .upsert("e", 0)
    ///     .upsert("d", 1)
    ///     .upsert("c", 2)
    ///     .upsert("a", 3)
    ///     .upsert("b", 4);
    ///
    /// let items: Vec<&&str> = treap.iter_from(&"c1").collect();
    /// assert_eq!(items, vec![&"d", &"e"]);
    /// ```
    pub fn iter_from<'a>(&'a self, pivot: &'a T) -> AscendIterator<'a, T, C> {
        AscendIterator::new(self.root.as_ref(), Some(pivot), &*self.comparator)
    }

    /// Returns an iterator over all items in ascending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptreap::persistent::PersistentTreap;
    ///
    /// let treap = PersistentTreap::new().upsert(3, 5).upsert(1, 9).upsert(2, 1);
    /// let items: Vec<&i32> = treap.iter().collect();
    /// assert_eq!(items, vec![&1, &2, &3]);
    /// ```
    pub fn iter(&self) -> AscendIterator<'_, T, C> {
        AscendIterator::new(self.root.as_ref(), None, &*self.comparator)
    }

    /// Verifies the order, heap, and length invariants of the whole tree.
    ///
    /// Walks every node, so this is O(N). It can only fail when the
    /// comparator is not a consistent total order.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] encountered.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptreap::persistent::PersistentTreap;
    ///
    /// let treap: PersistentTreap<i32> = (0..100)
    ///     .map(|item| (item, i64::from((item * 37) % 101)))
    ///     .collect();
    /// assert!(treap.check_invariants().is_ok());
    /// ```
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let actual = node::check_subtree(self.root.as_ref(), &*self.comparator, None, None, 0)?;
        if actual == self.length {
            Ok(())
        } else {
            Err(InvariantViolation::LengthMismatch {
                recorded: self.length,
                actual,
            })
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, C> Clone for PersistentTreap<T, C> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            length: self.length,
            comparator: ReferenceCounter::clone(&self.comparator),
        }
    }
}

impl<T: Ord> Default for PersistentTreap<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> FromIterator<(T, Priority)> for PersistentTreap<T> {
    fn from_iter<I: IntoIterator<Item = (T, Priority)>>(iter: I) -> Self {
        let mut treap = Self::new();
        treap.extend(iter);
        treap
    }
}

impl<T: Clone, C: Comparator<T>> Extend<(T, Priority)> for PersistentTreap<T, C> {
    fn extend<I: IntoIterator<Item = (T, Priority)>>(&mut self, iter: I) {
        for (item, priority) in iter {
            *self = self.upsert(item, priority);
        }
    }
}

impl<T: Clone, C> IntoIterator for PersistentTreap<T, C> {
    type Item = T;
    type IntoIter = PersistentTreapIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        PersistentTreapIntoIterator::new(self.root, self.length)
    }
}

impl<'a, T, C> IntoIterator for &'a PersistentTreap<T, C>
where
    T: Clone,
    C: Comparator<T>,
{
    type Item = &'a T;
    type IntoIter = AscendIterator<'a, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Two treaps are equal when they yield equal items in the same order.
///
/// Priorities and tree shape are ignored.
impl<T, C> PartialEq for PersistentTreap<T, C>
where
    T: Clone + PartialEq,
    C: Comparator<T>,
{
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && (self.ptr_eq(other) || self.iter().eq(other.iter()))
    }
}

impl<T, C> Eq for PersistentTreap<T, C>
where
    T: Clone + Eq,
    C: Comparator<T>,
{
}

impl<T, C> fmt::Debug for PersistentTreap<T, C>
where
    T: Clone + fmt::Debug,
    C: Comparator<T>,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> fmt::Display for PersistentTreap<T, C>
where
    T: Clone + fmt::Display,
    C: Comparator<T>,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for item in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{item}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Tests
// =============================================================================
