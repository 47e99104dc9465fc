#![cfg(test)]

use serde_json::{Value, json};

use crate::key::PathKey;
use crate::tree::TreeError;
use crate::tree::navigator::{self, parse_index};

fn key(s: &str) -> PathKey {
    PathKey::parse(s, "/")
}

#[test]
fn test_single_segment_returns_root() {
    let mut root = json!({ "a": 1 });
    assert_eq!(navigator::locate_parent(&root, &key("a")), Some(&json!({ "a": 1 })));

    let parent = navigator::locate_existing_parent_mut(&mut root, &key("zzz"));
    assert_eq!(parent, Some(&mut json!({ "a": 1 })));
}

#[test]
fn test_existing_walk_reports_missing_parent() {
    let mut root = json!({ "a": {} });
    assert!(navigator::locate_parent(&root, &key("a/b/c")).is_none());
    assert_eq!(navigator::locate_existing_parent_mut(&mut root, &key("a/b/c")), None);

    // An empty container is found, not missing
    assert_eq!(navigator::locate_parent(&root, &key("a/b")), Some(&json!({})));

    // The reading walk never creates anything
    assert_eq!(root, json!({ "a": {} }));
}

#[test]
fn test_create_walk_builds_intermediate_mappings() {
    let mut root = json!({});
    let parent = navigator::locate_or_create_parent(&mut root, &key("a/b/c")).unwrap();
    assert_eq!(parent, &mut json!({}));
    assert_eq!(root, json!({ "a": { "b": {} } }));
}

#[test]
fn test_create_walk_replaces_null() {
    let mut root = json!({ "a": null });
    navigator::locate_or_create_parent(&mut root, &key("a/b")).unwrap();
    assert_eq!(root, json!({ "a": {} }));

    // Null is missing for the reading walk
    let root = json!({ "a": null });
    assert!(navigator::locate_parent(&root, &key("a/b")).is_none());
}

#[test]
fn test_create_walk_refuses_to_descend_into_scalar() {
    let mut root = json!({ "a": 5 });
    let err = navigator::locate_or_create_parent(&mut root, &key("a/b/c")).unwrap_err();
    assert!(matches!(
        err,
        TreeError::PathConflict { ref segment, found: "number", .. } if segment == "b"
    ));
    assert_eq!(root, json!({ "a": 5 }));
}

#[test]
fn test_arrays_are_addressed_by_index() {
    let mut root = json!({ "list": [{ "name": "first" }, { "name": "second" }] });
    let parent = navigator::locate_parent(&root, &key("list/1/name")).unwrap();
    assert_eq!(navigator::child(parent, "name"), Some(&json!("second")));

    assert!(navigator::locate_parent(&root, &key("list/7/name")).is_none());
    assert!(navigator::locate_parent(&root, &key("list/01/name")).is_none());

    let err = navigator::locate_or_create_parent(&mut root, &key("list/7/name")).unwrap_err();
    assert_eq!(
        err,
        TreeError::IndexOutOfRange {
            key: key("list/7/name").to_string(),
            index: 7,
            len: 2
        }
    );
}

#[test]
fn test_put_and_take() {
    let mut parent = json!({});
    let stored = navigator::put(&mut parent, &key("x"), json!(1)).unwrap();
    *stored = json!(2);
    assert_eq!(parent, json!({ "x": 2 }));
    assert_eq!(navigator::take(&mut parent, &key("x")), Ok(Some(json!(2))));
    assert_eq!(navigator::take(&mut parent, &key("x")), Ok(None));

    let mut list = json!([1, 2]);
    navigator::put(&mut list, &key("2"), json!(3)).unwrap();
    navigator::put(&mut list, &key("0"), json!(0)).unwrap();
    assert_eq!(list, json!([0, 2, 3]));
    assert!(navigator::put(&mut list, &key("9"), json!(9)).is_err());
    assert_eq!(navigator::take(&mut list, &key("2")), Ok(Some(json!(3))));
    assert_eq!(list, json!([0, 2]));
    assert_eq!(navigator::take(&mut list, &key("5")), Ok(None));

    let mut scalar = Value::Bool(true);
    assert!(navigator::put(&mut scalar, &key("x"), json!(1)).is_err());
}

#[test]
fn test_take_never_shifts_array_elements() {
    let mut list = json!([{ "a": 1 }, { "b": 2 }]);
    let err = navigator::take(&mut list, &key("0")).unwrap_err();
    assert_eq!(
        err,
        TreeError::ArrayHole {
            key: key("0").to_string(),
            index: 0,
            len: 2
        }
    );
    assert_eq!(list, json!([{ "a": 1 }, { "b": 2 }]));
}

#[test]
fn test_check_writable_matches_insert() {
    let root = json!({ "x": 5, "list": [1, 2], "open": null, "map": { "k": "v" } });

    for ok in ["new/deep/key", "open/a/b", "map/k", "map/other", "list/0", "list/2", "x"] {
        assert_eq!(navigator::check_writable(&root, &key(ok)), Ok(()), "{ok}");
    }

    assert!(matches!(
        navigator::check_writable(&root, &key("x/y")),
        Err(TreeError::PathConflict { ref segment, found: "number", .. }) if segment == "y"
    ));
    assert!(matches!(
        navigator::check_writable(&root, &key("map/k/deeper")),
        Err(TreeError::PathConflict { found: "string", .. })
    ));
    assert!(matches!(
        navigator::check_writable(&root, &key("list/3")),
        Err(TreeError::IndexOutOfRange { index: 3, len: 2, .. })
    ));
    assert!(matches!(
        navigator::check_writable(&root, &key("list/name")),
        Err(TreeError::PathConflict { found: "array", .. })
    ));
}

#[test]
fn test_parse_index() {
    assert_eq!(parse_index("0"), Some(0));
    assert_eq!(parse_index("12"), Some(12));
    assert_eq!(parse_index("012"), None);
    assert_eq!(parse_index("-1"), None);
    assert_eq!(parse_index(""), None);
    assert_eq!(parse_index("1a"), None);
}

#[test]
fn test_deep_walk_has_no_depth_limit() {
    let segments: Vec<String> = (0..1500).map(|i| format!("n{}", i)).collect();
    let deep = PathKey::from_segments(segments).unwrap();
    let mut root = json!({});
    navigator::locate_or_create_parent(&mut root, &deep).unwrap();
    assert!(navigator::locate_parent(&root, &deep).is_some());
}
