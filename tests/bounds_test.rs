// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for bounded enumeration: start, end, skip and pins.

mod common;

use common::{question_builder, question_space, text};
use permspace::{Bounds, Namespace, ParameterSpace, SpaceError, Value};

fn start_at<V: Into<Value>>(pairs: Vec<(&str, V)>) -> Namespace {
    Namespace::from_iter(pairs)
}

fn keys(space: &ParameterSpace, namespaces: impl Iterator<Item = permspace::Result<Namespace>>) -> Vec<String> {
    namespaces.map(|ns| space.unique_key(&ns.unwrap()).unwrap()).collect()
}

#[test]
fn test_iterate_from() {
    let space = question_space();
    let from = space.iterate_from(&start_at(vec![("arabic", 3)])).unwrap();
    assert_eq!(from.count(), 9);
}

#[test]
fn test_iterate_until() {
    let space = question_space();
    let until = space.iterate_until(&start_at(vec![("arabic", 2)])).unwrap();
    assert_eq!(until.count(), 9);
}

#[test]
fn test_iterate_between() {
    let space = question_space();
    let start = start_at(vec![("arabic", 1)]);
    let end = start_at(vec![("arabic", 2)]);
    assert_eq!(space.iterate_between(&start, &end, 0).unwrap().count(), 9);
    assert_eq!(space.iterate_between(&start, &end, 4).unwrap().count(), 5);
}

#[test]
fn test_between_matches_slice_of_full_enumeration() {
    let space = question_builder()
        .filter(["letter_lower", "roman_lower"], |args| {
            !(args["letter_lower"] == Value::from("b") && args["roman_lower"] == Value::from("ii"))
        })
        .build()
        .unwrap();
    let all = keys(&space, space.iter());

    let start = Namespace::from_iter([("arabic", Value::from(1)), ("letter_lower", Value::from("c"))]);
    let end = Namespace::from_iter([("arabic", Value::from(3)), ("roman_lower", Value::from("ii"))]);
    let lo = all
        .iter()
        .position(|k| k == "arabic=1,letter_lower=c,roman_lower=i")
        .unwrap();
    let hi = all
        .iter()
        .position(|k| k == "arabic=3,letter_lower=a,roman_lower=i")
        .unwrap()
        + 1;

    for skip in [0, 1, 5] {
        let between = keys(&space, space.iterate_between(&start, &end, skip).unwrap());
        let expected: Vec<String> = all[lo..hi].iter().skip(skip).cloned().collect();
        assert_eq!(between, expected, "skip {}", skip);
    }
}

#[test]
fn test_start_on_rejected_combination() {
    let space = question_builder()
        .filter(["arabic"], |args| args["arabic"] != Value::from(2))
        .build()
        .unwrap();
    let from = space.iterate_from(&start_at(vec![("arabic", 2)])).unwrap();
    let names: Vec<String> = from.map(|ns| text(&ns.unwrap(), "subpart_name")).collect();
    assert_eq!(names.len(), 9);
    assert_eq!(names[0], "3.a.i");
}

#[test]
fn test_iterate_only() {
    let space = question_space();
    let only = space.iterate_only("letter_lower", 'b').unwrap();
    let names: Vec<String> = only.map(|ns| text(&ns.unwrap(), "part_name")).collect();
    assert_eq!(names.len(), 9);
    assert!(names.iter().all(|name| name.ends_with(".b")));
    assert_eq!(names[0], "1.b");
    assert_eq!(names[8], "3.b");
}

#[test]
fn test_iterate_only_respects_filters() {
    let space = question_builder()
        .filter(["arabic", "letter_lower"], |args| {
            args["arabic"] != Value::from(2) || args["letter_lower"] != Value::from("c")
        })
        .build()
        .unwrap();
    assert_eq!(space.iterate_only("letter_lower", 'c').unwrap().count(), 6);
    assert_eq!(space.iterate_only("arabic", 2).unwrap().count(), 6);
}

#[test]
fn test_combined_bounds() {
    let space = question_space();
    let bounds = Bounds::new()
        .only("roman_lower", "iii")
        .start(start_at(vec![("arabic", 2)]))
        .skip(1);
    let found = keys(&space, space.enumerate_with(bounds).unwrap());
    assert_eq!(found.len(), 5);
    assert_eq!(found[0], "arabic=2,letter_lower=b,roman_lower=iii");
}

#[test]
fn test_start_after_pinned_value_moves_to_next_block() {
    let space = question_space();
    let bounds = Bounds::new()
        .start(start_at(vec![("arabic", Value::from(1)), ("letter_lower", Value::from("b"))]))
        .only("letter_lower", 'a');
    let found = keys(&space, space.enumerate_with(bounds).unwrap());
    assert_eq!(found.len(), 6);
    assert_eq!(found[0], "arabic=2,letter_lower=a,roman_lower=i");
}

#[test]
fn test_start_before_pinned_value_begins_at_pin() {
    let space = question_space();
    let bounds = Bounds::new()
        .start(start_at(vec![
            ("arabic", Value::from(1)),
            ("letter_lower", Value::from("a")),
            ("roman_lower", Value::from("ii")),
        ]))
        .only("letter_lower", 'b');
    let found = keys(&space, space.enumerate_with(bounds).unwrap());
    assert_eq!(found.len(), 9);
    assert_eq!(found[0], "arabic=1,letter_lower=b,roman_lower=i");
}

#[test]
fn test_start_past_last_pinned_block_is_empty() {
    let space = question_space();
    let bounds = Bounds::new()
        .start(start_at(vec![("arabic", Value::from(3)), ("letter_lower", Value::from("c"))]))
        .only("letter_lower", 'a');
    assert_eq!(space.enumerate_with(bounds).unwrap().count(), 0);
}

#[test]
fn test_pinned_start_matches_filtered_full_enumeration() {
    let space = question_space();
    let all = keys(&space, space.iter());
    for (start, letter) in [((1, "b"), "a"), ((2, "a"), "c"), ((2, "c"), "b"), ((1, "a"), "a")] {
        let start_ns = start_at(vec![("arabic", Value::from(start.0)), ("letter_lower", Value::from(start.1))]);
        let first = format!("arabic={},letter_lower={},roman_lower=i", start.0, start.1);
        let from = all.iter().position(|k| *k == first).unwrap();
        let expected: Vec<String> = all[from..]
            .iter()
            .filter(|k| k.contains(&format!("letter_lower={},", letter)))
            .cloned()
            .collect();
        let bounds = Bounds::new().start(start_ns).only("letter_lower", letter);
        assert_eq!(
            keys(&space, space.enumerate_with(bounds).unwrap()),
            expected,
            "start {:?}, only {}",
            start,
            letter
        );
    }
}

#[test]
fn test_invalid_bounds() {
    let space = question_space();
    let bad_value = space.iterate_from(&start_at(vec![("arabic", 4)]));
    assert!(matches!(bad_value, Err(SpaceError::InvalidValue { .. })));

    let unknown = space.iterate_until(&start_at(vec![("nope", 1)]));
    assert!(matches!(unknown, Err(SpaceError::InvalidValue { .. })));

    let dependent = space.iterate_only("part_name", "1.a");
    assert!(matches!(dependent, Err(SpaceError::InvalidValue { .. })));

    let constant = space.iterate_only("constant", "constant");
    assert!(matches!(constant, Err(SpaceError::InvalidValue { .. })));
}
