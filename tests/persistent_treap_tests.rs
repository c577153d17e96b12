//! Unit tests for PersistentTreap.
//!
//! Covers lookups, versioning, priority handling on upsert, and the
//! equivalence of the push (`ascend`) and pull (`iter_from`) traversals.

use ptreap::compare::{NaturalOrder, Reverse};
use ptreap::persistent::{PersistentTreap, Priority};
use rstest::rstest;
use std::cmp::Ordering;

// =============================================================================
// Helpers
// =============================================================================

type StrTreap = PersistentTreap<&'static str>;

fn load(treap: StrTreap, items: &[&'static str]) -> StrTreap {
    items
        .iter()
        .zip(0..)
        .fold(treap, |treap, (&item, priority)| treap.upsert(item, priority))
}

fn via_ascend(treap: &StrTreap, pivot: &'static str) -> Vec<&'static str> {
    let mut seen = Vec::new();
    treap.ascend(&pivot, |item| {
        seen.push(*item);
        true
    });
    seen
}

fn via_iterator(treap: &StrTreap, pivot: &'static str) -> Vec<&'static str> {
    treap.iter_from(&pivot).copied().collect()
}

/// Stops at the first item greater than "c".
fn via_ascend_until_c(treap: &StrTreap, pivot: &'static str) -> Vec<&'static str> {
    let mut seen = Vec::new();
    treap.ascend(&pivot, |item| {
        if *item > "c" {
            return false;
        }
        seen.push(*item);
        true
    });
    seen
}

fn via_iterator_until_c(treap: &StrTreap, pivot: &'static str) -> Vec<&'static str> {
    treap
        .iter_from(&pivot)
        .take_while(|item| **item <= "c")
        .copied()
        .collect()
}

type Traversal = fn(&StrTreap, &'static str) -> Vec<&'static str>;

/// A keyed record; only `key` takes part in ordering.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Record {
    key: &'static str,
    value: u32,
}

fn record(key: &'static str, value: u32) -> Record {
    Record { key, value }
}

fn by_key(left: &Record, right: &Record) -> Ordering {
    left.key.cmp(right.key)
}

// =============================================================================
// Basic Construction Tests
// =============================================================================

#[rstest]
fn test_new_creates_empty_treap() {
    let treap: PersistentTreap<i32> = PersistentTreap::new();
    assert!(treap.is_empty());
    assert_eq!(treap.len(), 0);
}

#[rstest]
fn test_default_creates_empty_treap() {
    let treap: PersistentTreap<i32> = PersistentTreap::default();
    assert!(treap.is_empty());
}

#[rstest]
fn test_empty_treap_has_no_extremes() {
    let treap: PersistentTreap<String> = PersistentTreap::new();
    assert_eq!(treap.min(), None);
    assert_eq!(treap.max(), None);
    assert_eq!(treap.get(&"anything".to_string()), None);
}

#[rstest]
#[case("a")]
#[case("zzz")]
fn test_empty_treap_visits_nothing(#[case] pivot: &'static str) {
    let treap = PersistentTreap::new();
    assert!(via_ascend(&treap, pivot).is_empty());
    assert!(via_iterator(&treap, pivot).is_empty());
}

// =============================================================================
// Upsert / Get / Delete Tests
// =============================================================================

#[rstest]
fn test_upsert_get_delete_sequence() {
    let mut treap: PersistentTreap<&str> = PersistentTreap::new();
    assert_eq!(treap.get(&"not-there"), None);

    treap = treap.upsert("a", 100);
    assert_eq!(treap.get(&"a"), Some(&"a"));
    treap = treap.upsert("b", 200);
    treap = treap.upsert("c", 300);
    for key in ["a", "b", "c"] {
        assert_eq!(treap.get(&key), Some(&key));
    }
    assert_eq!(treap.get(&"not-there"), None);

    treap = treap.upsert("a", 400);
    assert_eq!(treap.get(&"a"), Some(&"a"));
    assert_eq!(treap.len(), 3);

    treap = treap.delete(&"a");
    assert_eq!(treap.get(&"a"), None);
    assert_eq!(treap.get(&"b"), Some(&"b"));
    assert_eq!(treap.get(&"c"), Some(&"c"));

    treap = treap.upsert("a", 10);
    assert_eq!(treap.get(&"a"), Some(&"a"));

    for key in ["a", "b", "c"] {
        treap = treap.delete(&key);
    }
    assert!(treap.is_empty());
    for key in ["a", "b", "c"] {
        treap = treap.delete(&key);
        assert_eq!(treap.get(&key), None);
    }
    assert!(treap.check_invariants().is_ok());
}

#[rstest]
fn test_delete_joins_both_sides() {
    // A high-priority key deleted from between two lower ones.
    let treap = PersistentTreap::new()
        .upsert("a", 10)
        .upsert("b", 1000)
        .upsert("c", 12);
    let removed = treap.delete(&"b");
    assert_eq!(via_iterator(&removed, ""), vec!["a", "c"]);
    assert!(removed.check_invariants().is_ok());

    let treap = PersistentTreap::new().upsert("b", 20).upsert("c", 12);
    let removed = treap.delete(&"b");
    assert_eq!(via_iterator(&removed, ""), vec!["c"]);
    assert!(removed.check_invariants().is_ok());
}

#[rstest]
fn test_delete_absent_key_keeps_items() {
    let treap = load(PersistentTreap::new(), &["e", "d", "c", "a", "b"]);
    let unchanged = treap.delete(&"x");
    assert_eq!(unchanged, treap);
    assert_eq!(unchanged.len(), 5);
}

#[rstest]
fn test_upsert_replaces_value_of_existing_key() {
    let treap = PersistentTreap::with_comparator(by_key)
        .upsert(record("a", 1), 10)
        .upsert(record("b", 2), 20);

    let lower = treap.upsert(record("a", 100), 5);
    let higher = treap.upsert(record("a", 200), 50);

    assert_eq!(lower.get(&record("a", 0)), Some(&record("a", 100)));
    assert_eq!(higher.get(&record("a", 0)), Some(&record("a", 200)));
    assert_eq!(treap.get(&record("a", 0)), Some(&record("a", 1)));
    assert_eq!(lower.len(), 2);
    assert_eq!(higher.len(), 2);
}

// =============================================================================
// Priority Retention Tests
// =============================================================================

#[rstest]
fn test_lower_priority_upsert_keeps_stored_priority() {
    let treap = PersistentTreap::new()
        .upsert("m", 20)
        .upsert("l", 18)
        .upsert("n", 19);
    let updated = treap.upsert("m", 4);

    for (key, priority) in [("m", 20), ("l", 18), ("n", 19)] {
        assert_eq!(updated.priority(&key), Some(priority));
    }
    assert_eq!(updated.get(&"m"), Some(&"m"));
    assert!(updated.check_invariants().is_ok());
}

#[rstest]
#[case(4, 20)]
#[case(19, 20)]
#[case(20, 20)]
#[case(21, 21)]
#[case(100, 100)]
fn test_upsert_priority_asymmetry(#[case] supplied: Priority, #[case] expected: Priority) {
    let treap = PersistentTreap::with_comparator(by_key)
        .upsert(record("m", 0), 20)
        .upsert(record("l", 0), 18)
        .upsert(record("n", 0), 19);
    let updated = treap.upsert(record("m", 1), supplied);

    assert_eq!(updated.get_entry(&record("m", 0)), Some((&record("m", 1), expected)));
    assert_eq!(treap.get_entry(&record("m", 0)), Some((&record("m", 0), 20)));
    assert!(updated.check_invariants().is_ok());
}

#[rstest]
fn test_delete_then_upsert_lowers_priority() {
    let treap = PersistentTreap::singleton("m", 20);
    let lowered = treap.delete(&"m").upsert("m", 4);
    assert_eq!(lowered.priority(&"m"), Some(4));
}

// =============================================================================
// Min / Max Tests
// =============================================================================

#[rstest]
fn test_min_max_follow_versions() {
    let x = load(PersistentTreap::new(), &["e", "d", "c", "c", "a", "b", "a"]);
    let y = x.upsert("f", 1).delete(&"a").upsert("cc", 2).delete(&"c");

    assert_eq!(x.min(), Some(&"a"));
    assert_eq!(x.max(), Some(&"e"));
    assert_eq!(y.min(), Some(&"b"));
    assert_eq!(y.max(), Some(&"f"));
}

#[rstest]
fn test_min_descends_left() {
    let treap = PersistentTreap::new().upsert("b", 2).upsert("a", 1);
    assert_eq!(treap.min(), Some(&"a"));
    assert_eq!(treap.max(), Some(&"b"));
}

// =============================================================================
// Traversal Tests
// =============================================================================

#[rstest]
fn test_traversals_from_pivot(
    #[values(via_ascend as Traversal, via_iterator as Traversal)] traversal: Traversal,
) {
    let x = load(PersistentTreap::new(), &["e", "d", "c", "c", "a", "b", "a"]);
    let expectations: [(&str, &[&str]); 10] = [
        ("a", &["a", "b", "c", "d", "e"]),
        ("a1", &["b", "c", "d", "e"]),
        ("b", &["b", "c", "d", "e"]),
        ("b1", &["c", "d", "e"]),
        ("c", &["c", "d", "e"]),
        ("c1", &["d", "e"]),
        ("d", &["d", "e"]),
        ("d1", &["e"]),
        ("e", &["e"]),
        ("f", &[]),
    ];
    for (pivot, expected) in expectations {
        assert_eq!(traversal(&x, pivot), expected, "pivot {pivot}");
    }

    let y = x.upsert("f", 1).delete(&"a").upsert("cc", 2).delete(&"c");
    let expectations: [(&str, &[&str]); 11] = [
        ("a", &["b", "cc", "d", "e", "f"]),
        ("a1", &["b", "cc", "d", "e", "f"]),
        ("b", &["b", "cc", "d", "e", "f"]),
        ("b1", &["cc", "d", "e", "f"]),
        ("c", &["cc", "d", "e", "f"]),
        ("c1", &["cc", "d", "e", "f"]),
        ("d", &["d", "e", "f"]),
        ("d1", &["e", "f"]),
        ("e", &["e", "f"]),
        ("f", &["f"]),
        ("z", &[]),
    ];
    for (pivot, expected) in expectations {
        assert_eq!(traversal(&y, pivot), expected, "pivot {pivot}");
    }

    // Deriving y must not have disturbed x.
    assert_eq!(traversal(&x, "a"), ["a", "b", "c", "d", "e"]);
}

#[rstest]
fn test_traversals_stop_early(
    #[values(via_ascend_until_c as Traversal, via_iterator_until_c as Traversal)]
    traversal: Traversal,
) {
    let empty = PersistentTreap::new();
    assert!(traversal(&empty, "a").is_empty());

    let x = load(PersistentTreap::new(), &["e", "d", "c", "c", "a", "b", "a", "e"]);
    let expectations: [(&str, &[&str]); 10] = [
        ("a", &["a", "b", "c"]),
        ("a1", &["b", "c"]),
        ("b", &["b", "c"]),
        ("b1", &["c"]),
        ("c", &["c"]),
        ("c1", &[]),
        ("d", &[]),
        ("d1", &[]),
        ("e", &[]),
        ("f", &[]),
    ];
    for (pivot, expected) in expectations {
        assert_eq!(traversal(&x, pivot), expected, "pivot {pivot}");
    }
}

#[rstest]
fn test_insertion_index_priorities_scenario() {
    let treap = load(PersistentTreap::new(), &["e", "d", "c", "a", "b"]);
    assert_eq!(via_ascend(&treap, "b"), vec!["b", "c", "d", "e"]);
    assert_eq!(via_iterator(&treap, "c1"), vec!["d", "e"]);
}

#[rstest]
fn test_ascend_does_not_visit_after_stop() {
    let treap: PersistentTreap<i32> = (0..50)
        .map(|item| (item, i64::from((item * 7919) % 97)))
        .collect();
    let mut calls = 0;
    treap.ascend(&10, |_| {
        calls += 1;
        calls < 5
    });
    assert_eq!(calls, 5);
}

#[rstest]
fn test_reverse_comparator_ascends_descending() {
    let treap = PersistentTreap::with_comparator(Reverse(NaturalOrder))
        .upsert(1, 30)
        .upsert(5, 10)
        .upsert(3, 20);
    let items: Vec<i32> = treap.iter_from(&4).copied().collect();
    assert_eq!(items, vec![3, 1]);
    assert_eq!(treap.min(), Some(&5));
}

// =============================================================================
// Version Isolation Tests
// =============================================================================

#[rstest]
fn test_versions_are_isolated() {
    let v1 = PersistentTreap::new().upsert(1, 10).upsert(2, 20);
    let v2 = v1.upsert(3, 30);
    let v3 = v2.delete(&1);
    let v4 = v1.upsert(1, 99);

    assert_eq!(v1.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(v2.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(v3.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
    assert_eq!(v4.priority(&1), Some(99));
    assert_eq!(v1.priority(&1), Some(10));
}

#[rstest]
fn test_divergent_writers_produce_independent_versions() {
    let base = PersistentTreap::new().upsert("base", 50);
    let left = base.upsert("left", 10);
    let right = base.upsert("right", 20);

    assert!(left.contains(&"left") && !left.contains(&"right"));
    assert!(right.contains(&"right") && !right.contains(&"left"));
    assert_eq!(base.len(), 1);
}

// =============================================================================
// Conversion and Formatting Tests
// =============================================================================

#[rstest]
fn test_from_iter_and_into_iter() {
    let treap: PersistentTreap<i32> = vec![(3, 1), (1, 2), (2, 3), (1, 4)].into_iter().collect();
    assert_eq!(treap.len(), 3);
    let items: Vec<i32> = treap.into_iter().collect();
    assert_eq!(items, vec![1, 2, 3]);
}

#[rstest]
fn test_borrowing_into_iter() {
    let treap = PersistentTreap::new().upsert(2, 1).upsert(1, 2);
    let mut total = 0;
    for item in &treap {
        total += item;
    }
    assert_eq!(total, 3);
}

#[rstest]
fn test_debug_and_display() {
    let treap = PersistentTreap::new().upsert("b", 1).upsert("a", 2);
    assert_eq!(format!("{treap:?}"), r#"{"a", "b"}"#);
    assert_eq!(format!("{treap}"), "{a, b}");
}
