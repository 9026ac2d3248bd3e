use counted_multiset::{ByKey, Error, MultiSet};

fn counts<T: Clone + Ord>(set: &MultiSet<T>) -> Vec<(T, usize)> {
    let mut counts: Vec<_> = set.counts().map(|(item, n)| (item.clone(), n)).collect();
    counts.sort();
    counts
}

#[test]
fn sequence_constructor_accumulates() {
    let set = MultiSet::from(["a", "a", "b"]);

    assert_eq!(set.multiplicity_of(&"a"), Ok(2));
    assert_eq!(set.multiplicity_of(&"b"), Ok(1));
    assert_eq!(set.len(), 3);
    assert_eq!(set.distinct_len(), 2);
}

#[test]
fn difference_removes_up_to_rhs_multiplicity() {
    let mut a = MultiSet::new();
    a.add("a", 2).unwrap().add("b", 1).unwrap();
    let b = MultiSet::from(["a", "c"]);

    let diff = &a - &b;

    assert_eq!(counts(&diff), [("a", 1), ("b", 1)]);
    assert_eq!(a.len(), 3);
    assert_eq!(b.len(), 2);
}

#[test]
fn intersection_takes_minimum() {
    let a = MultiSet::from(["a", "a", "a"]);
    let b = MultiSet::from(["a"]);

    assert_eq!(counts(&(&a * &b)), [("a", 1)]);
    assert_eq!(counts(&(a * b)), [("a", 1)]);
}

#[test]
fn union_sums_multiplicities() {
    let a = MultiSet::from([1, 1, 2]);
    let b = MultiSet::from([1, 3]);

    assert_eq!(counts(&(&a + &b)), [(1, 3), (2, 1), (3, 1)]);
    assert_eq!(counts(&(a + b)), [(1, 3), (2, 1), (3, 1)]);
}

#[test]
fn owned_difference_matches_borrowed() {
    let a = MultiSet::from([1, 1, 2, 4]);
    let b = MultiSet::from([1, 2, 2, 3]);

    assert_eq!(&a - &b, a - b);
}

#[test]
fn absent_items() {
    let mut set: MultiSet<&str> = MultiSet::new();

    assert_eq!(set.remove_all(&"x"), Ok(false));
    assert!(set.remove(&"x", 1).is_ok());
    assert!(set.is_empty());
    assert_eq!(set.multiplicity_of(&"x"), Err(Error::KeyNotFound));
    assert_eq!(set.get(&"x"), None);
}

#[test]
fn remove_all_ignores_multiplicity() {
    let mut set = MultiSet::from(["x", "x", "x", "y"]);

    assert_eq!(set.remove_all(&"x"), Ok(true));
    assert!(!set.contains(&"x"));
    assert_eq!(set.len(), 1);
}

#[test]
fn zero_count_is_noop() {
    let mut set = MultiSet::from(["a"]);

    set.add("b", 0).unwrap();
    set.remove(&"a", 0).unwrap();

    assert_eq!(counts(&set), [("a", 1)]);
}

#[test]
fn overlaps_ignores_multiplicity() {
    let set = MultiSet::from([1, 1, 2]);

    assert!(set.overlaps([5, 2]));
    assert!(!set.overlaps([5, 6]));
    assert!(!set.overlaps(Vec::new()));
}

#[test]
fn union_with_counts_each_occurrence() {
    let mut set = MultiSet::from(["a"]);
    set.union_with(["a", "b", "b"]).unwrap();

    assert_eq!(counts(&set), [("a", 2), ("b", 2)]);
}

#[test]
fn except_with_removes_sequence_multiplicity() {
    let mut set = MultiSet::from(["a", "a", "a", "b"]);
    set.except_with(["a", "a", "b", "b", "c"]).unwrap();

    assert_eq!(counts(&set), [("a", 1)]);
}

#[test]
fn intersect_with_drops_items_missing_from_sequence() {
    let mut set = MultiSet::from(["a", "a", "a", "b", "c", "c"]);
    set.intersect_with(["a", "c", "c", "c", "d"]).unwrap();

    assert_eq!(counts(&set), [("a", 1), ("c", 2)]);
}

#[test]
fn symmetric_except_with() {
    let mut set = MultiSet::from(["a", "a", "a", "b"]);
    set.symmetric_except_with(["a", "b", "b", "c", "c"]).unwrap();

    assert_eq!(counts(&set), [("a", 2), ("c", 2)]);
}

#[test]
fn in_place_operations_chain() {
    let mut set = MultiSet::new();
    set.union_with([1, 2, 2, 3])
        .unwrap()
        .except_with([3])
        .unwrap()
        .add(4, 2)
        .unwrap();

    assert_eq!(counts(&set), [(1, 1), (2, 2), (4, 2)]);
}

#[test]
fn relational_predicates() {
    let set = MultiSet::from(["a", "a", "b"]);

    assert!(set.is_subset_of(["a", "a", "b"]));
    assert!(set.is_subset_of(["a", "b", "a", "c"]));
    assert!(!set.is_subset_of(["a", "b", "c"]));

    assert!(set.is_superset_of(["a", "b"]));
    assert!(!set.is_superset_of(["a", "a", "a"]));
    assert!(!set.is_superset_of(["c"]));

    assert!(set.is_proper_subset_of(["a", "a", "b", "b"]));
    assert!(!set.is_proper_subset_of(["b", "a", "a"]));

    assert!(set.is_proper_superset_of(["a", "b"]));
    assert!(!set.is_proper_superset_of(["a", "a", "b"]));

    assert!(set.multiset_equals(["b", "a", "a"]));
    assert!(!set.multiset_equals(["a", "b"]));
    assert!(!set.multiset_equals(["a", "a", "b", "c"]));
}

#[test]
fn empty_set_relations() {
    let set: MultiSet<i32> = MultiSet::new();

    assert!(set.is_subset_of([1]));
    assert!(set.is_proper_subset_of([1]));
    assert!(!set.is_proper_subset_of(Vec::new()));
    assert!(set.multiset_equals(Vec::new()));
}

#[test]
fn clear_keeps_strategy() {
    let mut set = MultiSet::from_iter_with(
        ["A", "a"].map(String::from),
        ByKey::new(|s: &String| s.to_lowercase()),
    );
    set.clear().unwrap();

    assert!(set.is_empty());
    assert_eq!(set.len(), 0);

    set.insert("B".to_string()).unwrap();
    set.insert("b".to_string()).unwrap();
    assert_eq!(set.distinct_len(), 1);
    assert_eq!(set.get(&"b".to_string()), Some(2));
}

#[test]
fn strategy_applies_to_sequence_arguments() {
    let ignore_case = ByKey::new(|s: &String| s.to_lowercase());
    let mut set = MultiSet::from_iter_with(["Ab", "ab"].map(String::from), ignore_case);

    assert!(set.multiset_equals(["AB", "aB"].map(String::from)));
    set.except_with(["AB".to_string()]).unwrap();
    assert_eq!(set.len(), 1);
}

#[test]
fn frozen_set_rejects_mutation() {
    let mut set = MultiSet::from([1, 1]);
    set.freeze();

    assert!(set.is_read_only());
    assert_eq!(set.add(2, 1).err(), Some(Error::Unsupported));
    assert_eq!(set.remove(&1, 1).err(), Some(Error::Unsupported));
    assert_eq!(set.remove_all(&1), Err(Error::Unsupported));
    assert_eq!(set.clear(), Err(Error::Unsupported));
    assert_eq!(set.union_with([3]).err(), Some(Error::Unsupported));
    assert_eq!(set.except_with([1]).err(), Some(Error::Unsupported));
    assert_eq!(set.intersect_with([1]).err(), Some(Error::Unsupported));
    assert_eq!(set.symmetric_except_with([1]).err(), Some(Error::Unsupported));
    assert_eq!(counts(&set), [(1, 2)]);

    let other = MultiSet::from([1]);
    let sum = &set + &other;
    assert!(!sum.is_read_only());
    assert!(set.clone().is_read_only());
}

#[test]
fn fresh_sets_are_writable() {
    assert!(!MultiSet::<u8>::new().is_read_only());
    assert!(!MultiSet::from([1]).is_read_only());
}

#[test]
fn copy_to_repeats_items() {
    let set = MultiSet::from([5, 5, 5]);
    let mut buf = [0; 5];

    set.copy_to(&mut buf, 2).unwrap();

    assert_eq!(buf, [0, 0, 5, 5, 5]);
}

#[test]
fn copy_to_checks_capacity_before_writing() {
    let set = MultiSet::from([5, 5, 6]);
    let mut buf = [0; 4];

    assert_eq!(
        set.copy_to(&mut buf, 2),
        Err(Error::OutOfRange {
            needed: 3,
            available: 2
        })
    );
    assert_eq!(
        set.copy_to(&mut buf, 5),
        Err(Error::InvalidArgument(
            "offset is past the end of the destination"
        ))
    );
    assert_eq!(buf, [0; 4]);
}

#[test]
fn iteration_is_distinct_and_restartable() {
    let set = MultiSet::from(["a", "a", "b"]);

    let mut first: Vec<_> = set.iter().copied().collect();
    first.sort_unstable();
    let mut second: Vec<_> = (&set).into_iter().copied().collect();
    second.sort_unstable();

    assert_eq!(first, ["a", "b"]);
    assert_eq!(first, second);
    assert_eq!(set.iter().len(), 2);
    assert_eq!(set.occurrences().len(), 3);
}

#[test]
fn views() {
    let mut set = MultiSet::from(["a", "a", "b"]);

    let map = set.as_map();
    assert_eq!(map.get(&"a"), Some(2));
    assert_eq!(map.total(), 3);
    assert_eq!(map.len(), 2);

    let snapshot = set.to_set();
    set.clear().unwrap();

    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.contains("a"));
}

#[test]
fn into_iter_yields_counts() {
    let set = MultiSet::from(['x', 'y', 'x']);
    let mut entries: Vec<_> = set.into_iter().collect();
    entries.sort_unstable();

    assert_eq!(entries, [('x', 2), ('y', 1)]);
}

#[test]
fn debug_shows_counts() {
    let set = MultiSet::from([7, 7]);

    assert_eq!(format!("{:?}", set), "{7: 2}");
}

#[test]
fn error_messages() {
    assert_eq!(Error::Unsupported.to_string(), "multiset is read-only");
    assert_eq!(
        Error::OutOfRange {
            needed: 3,
            available: 1
        }
        .to_string(),
        "destination has room for 1 items, 3 required"
    );
}

#[test]
fn add_past_usize_max_fails_without_change() {
    let mut set = MultiSet::new();
    set.add("a", usize::MAX).unwrap();

    assert_eq!(set.add("b", 1).err(), Some(Error::Overflow));
    assert_eq!(set.add("a", 1).err(), Some(Error::Overflow));
    assert_eq!(set.len(), usize::MAX);
    assert_eq!(set.get(&"a"), Some(usize::MAX));
    assert!(!set.contains(&"b"));
    assert!(set.is_proper_superset_of(Vec::new()));
}

#[test]
fn in_place_growth_past_usize_max_fails_without_change() {
    let mut set = MultiSet::new();
    set.add("a", usize::MAX - 1).unwrap();

    assert_eq!(set.union_with(["b", "b"]).err(), Some(Error::Overflow));
    assert_eq!(set.symmetric_except_with(["b", "c"]).err(), Some(Error::Overflow));
    assert_eq!(counts(&set), [("a", usize::MAX - 1)]);

    set.union_with(["b"]).unwrap();
    set.symmetric_except_with(["a", "b"]).unwrap();
    assert_eq!(counts(&set), [("a", usize::MAX - 2)]);
}

#[test]
fn union_operator_saturates() {
    let mut a = MultiSet::new();
    a.add("a", usize::MAX - 1).unwrap();
    let b = MultiSet::from(["a", "b", "b"]);

    let sum = &a + &b;

    assert_eq!(sum.len(), usize::MAX);
    assert_eq!(
        sum.get(&"a").unwrap_or(0) + sum.get(&"b").unwrap_or(0),
        usize::MAX
    );
    assert_eq!((a + b).len(), usize::MAX);
}
