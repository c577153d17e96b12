//! Comparator capability for treap items.
//!
//! A [`PersistentTreap`](crate::persistent::PersistentTreap) never inspects
//! its items directly. Every ordering decision goes through a [`Comparator`]
//! supplied once at construction and shared by every version derived from
//! that treap.
//!
//! # Contract
//!
//! A comparator must define a consistent total order over all items it is
//! ever asked about, for as long as any derived version is alive. Nothing
//! checks this; an inconsistent comparator leaves the treap in an
//! unspecified (but memory-safe) state.
//!
//! # Examples
//!
//! ```rust
//! use ptreap::compare::{Comparator, NaturalOrder, Reverse};
//! use std::cmp::Ordering;
//!
//! assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
//! assert_eq!(Reverse(NaturalOrder).compare(&1, &2), Ordering::Greater);
//!
//! let by_length = |left: &&str, right: &&str| left.len().cmp(&right.len());
//! assert_eq!(by_length.compare(&"abc", &"xy"), Ordering::Greater);
//! ```

use std::cmp::Ordering;

/// A total order over items of type `T`.
///
/// Implemented for [`NaturalOrder`], [`Reverse`], and every closure or
/// function of shape `Fn(&T, &T) -> Ordering`.
pub trait Comparator<T: ?Sized> {
    /// Compares two items.
    ///
    /// Returns [`Ordering::Less`] when `left` sorts before `right`,
    /// [`Ordering::Greater`] when it sorts after, and [`Ordering::Equal`]
    /// when both denote the same key.
    fn compare(&self, left: &T, right: &T) -> Ordering;
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, left: &T, right: &T) -> Ordering {
        self(left, right)
    }
}

/// Orders items by their [`Ord`] implementation.
///
/// This is the default comparator of
/// [`PersistentTreap`](crate::persistent::PersistentTreap).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, left: &T, right: &T) -> Ordering {
        left.cmp(right)
    }
}

/// Inverts the order of the wrapped comparator.
///
/// # Examples
///
/// ```rust
/// use ptreap::compare::{NaturalOrder, Reverse};
/// use ptreap::persistent::PersistentTreap;
///
/// let treap = PersistentTreap::with_comparator(Reverse(NaturalOrder))
///     .upsert(1, 10)
///     .upsert(3, 30)
///     .upsert(2, 20);
///
/// let items: Vec<&i32> = treap.iter().collect();
/// assert_eq!(items, vec![&3, &2, &1]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reverse<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reverse<C> {
    #[inline]
    fn compare(&self, left: &T, right: &T) -> Ordering {
        self.0.compare(right, left)
    }
}
