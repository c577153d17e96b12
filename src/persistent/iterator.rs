//! Ascending iterators over a [`PersistentTreap`](super::PersistentTreap).
//!
//! [`AscendIterator`] is the pull-style counterpart of
//! [`PersistentTreap::ascend`](super::PersistentTreap::ascend): it yields the
//! same items, in the same order, starting from the same pivot. Instead of
//! recursing, it keeps an explicit stack of pending nodes, so a caller can
//! stop, resume, or interleave several iterators freely.

use std::cmp::Ordering;
use std::iter::FusedIterator;

use smallvec::SmallVec;

use super::ReferenceCounter;
use super::node::Node;
use crate::compare::Comparator;

/// Number of stack frames kept inline before spilling to the heap.
///
/// A treap of a few million items with random priorities rarely exceeds
/// this depth.
const INLINE_STACK_DEPTH: usize = 48;

/// A pending node on the traversal stack.
struct Frame<'a, T> {
    node: &'a Node<T>,
    /// Set once the node has passed the pivot test and its left subtree has
    /// been scheduled ahead of it.
    visited: bool,
}

/// An iterator over the items of a [`PersistentTreap`](super::PersistentTreap)
/// that compare greater than or equal to a pivot, in ascending order.
///
/// Created by [`PersistentTreap::iter_from`](super::PersistentTreap::iter_from)
/// and [`PersistentTreap::iter`](super::PersistentTreap::iter).
///
/// Dropping the iterator before it is exhausted needs no cleanup. Once
/// exhausted, it keeps returning `None`.
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
/// let mut iterator = treap.iter_from(&"b");
/// assert_eq!(iterator.next(), Some(&"b"));
/// assert_eq!(iterator.next(), Some(&"c"));
/// let rest: Vec<&&str> = iterator.collect();
/// assert_eq!(rest, vec![&"d", &"e"]);
/// ```
pub struct AscendIterator<'a, T, C: ?Sized> {
    /// Lower bound; `None` admits every item.
    pivot: Option<&'a T>,
    comparator: &'a C,
    stack: SmallVec<[Frame<'a, T>; INLINE_STACK_DEPTH]>,
}

impl<'a, T, C> AscendIterator<'a, T, C>
where
    C: Comparator<T> + ?Sized,
{
    pub(crate) fn new(
        root: Option<&'a ReferenceCounter<Node<T>>>,
        pivot: Option<&'a T>,
        comparator: &'a C,
    ) -> Self {
        let mut iterator = Self {
            pivot,
            comparator,
            stack: SmallVec::new(),
        };
        if let Some(root) = root {
            iterator.push(root, false);
        }
        iterator
    }

    fn push(&mut self, node: &'a Node<T>, visited: bool) {
        self.stack.push(Frame { node, visited });
    }

    fn admits(&self, item: &T) -> bool {
        self.pivot
            .is_none_or(|pivot| self.comparator.compare(pivot, item) != Ordering::Greater)
    }
}

impl<'a, T, C> Iterator for AscendIterator<'a, T, C>
where
    C: Comparator<T> + ?Sized,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(Frame { node, visited }) = self.stack.pop() {
            if visited {
                // Only nodes that already passed the pivot test are marked.
                return Some(&node.item);
            }

            if let Some(right) = node.right.as_deref() {
                self.push(right, false);
            }
            if self.admits(&node.item) {
                match node.left.as_deref() {
                    None => return Some(&node.item),
                    Some(left) => {
                        self.push(node, true);
                        self.push(left, false);
                    }
                }
            }
        }
        None
    }
}

impl<T, C> FusedIterator for AscendIterator<'_, T, C> where C: Comparator<T> + ?Sized {}

/// An owning iterator over the items of a
/// [`PersistentTreap`](super::PersistentTreap), in ascending order.
///
/// Holds shared references to the nodes it has yet to visit, so the items
/// stay alive even after the originating treap is dropped. Items are cloned
/// out of the shared nodes.
pub struct PersistentTreapIntoIterator<T> {
    /// Left spine of the unvisited part of the tree, deepest node on top.
    stack: SmallVec<[ReferenceCounter<Node<T>>; INLINE_STACK_DEPTH]>,
    remaining: usize,
}

impl<T> PersistentTreapIntoIterator<T> {
    pub(crate) fn new(root: Option<ReferenceCounter<Node<T>>>, length: usize) -> Self {
        let mut iterator = Self {
            stack: SmallVec::new(),
            remaining: length,
        };
        iterator.push_left_spine(root);
        iterator
    }

    fn push_left_spine(&mut self, mut node: Option<ReferenceCounter<Node<T>>>) {
        while let Some(current) = node {
            node = current.left.clone();
            self.stack.push(current);
        }
    }
}

impl<T: Clone> Iterator for PersistentTreapIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.clone());
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.item.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Clone> ExactSizeIterator for PersistentTreapIntoIterator<T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T: Clone> FusedIterator for PersistentTreapIntoIterator<T> {}
