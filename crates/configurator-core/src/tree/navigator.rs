//! Walks a [`PathKey`] through the tree to the container that holds its
//! terminal slot.
//!
//! Mappings are addressed by segment name, arrays by decimal index. A stored
//! `null` on the way counts as missing: the reading walk stops there and the
//! writing walk replaces it with an empty mapping.
use serde_json::map::Entry;
use serde_json::{Map, Value};

use crate::key::{PathKey, value_kind};
use crate::tree::error::TreeError;

/// Strict decimal index: no sign, no leading zeros.
pub(crate) fn parse_index(segment: &str) -> Option<usize> {
    let well_formed = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if well_formed { segment.parse().ok() } else { None }
}

/// Read-only walk. Returns `None` when an intermediate segment is missing.
///
/// A single-segment key returns `root` without iterating.
pub(crate) fn locate_parent<'a>(root: &'a Value, key: &PathKey) -> Option<&'a Value> {
    let mut current = root;
    for segment in key.parents() {
        match child(current, segment) {
            Some(next) if !next.is_null() => current = next,
            _ => return None,
        }
    }
    Some(current)
}

/// Mutable walk that never creates anything.
pub(crate) fn locate_existing_parent_mut<'a>(root: &'a mut Value, key: &PathKey) -> Option<&'a mut Value> {
    let mut current = root;
    for segment in key.parents() {
        let node = current;
        let next = match node {
            Value::Object(map) => map.get_mut(segment),
            Value::Array(items) => parse_index(segment).and_then(|index| items.get_mut(index)),
            _ => None,
        };
        match next {
            Some(next) if !next.is_null() => current = next,
            _ => return None,
        }
    }
    Some(current)
}

/// Mutable walk that creates missing intermediate mappings.
pub(crate) fn locate_or_create_parent<'a>(root: &'a mut Value, key: &PathKey) -> Result<&'a mut Value, TreeError> {
    let mut current = root;
    for segment in key.parents() {
        let node = current;
        current = match node {
            Value::Object(map) => map.entry(segment.clone()).or_insert(Value::Null),
            Value::Array(items) => {
                let len = items.len();
                let index = parse_index(segment).ok_or_else(|| conflict(key, segment, "array"))?;
                items.get_mut(index).ok_or_else(|| TreeError::IndexOutOfRange {
                    key: key.to_string(),
                    index,
                    len,
                })?
            }
            other => return Err(conflict(key, segment, value_kind(other))),
        };
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
    }
    Ok(current)
}

/// Look up one child of a container.
pub(crate) fn child<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => parse_index(segment).and_then(|index| items.get(index)),
        _ => None,
    }
}

/// Write `value` into the slot `key.last()` of `parent`.
///
/// Arrays accept an existing index (overwrite) or `len` (append).
pub(crate) fn put<'a>(parent: &'a mut Value, key: &PathKey, value: Value) -> Result<&'a mut Value, TreeError> {
    let segment = key.last();
    match parent {
        Value::Object(map) => match map.entry(segment.to_string()) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(value);
                Ok(occupied.into_mut())
            }
            Entry::Vacant(vacant) => Ok(vacant.insert(value)),
        },
        Value::Array(items) => {
            let len = items.len();
            match parse_index(segment) {
                Some(index) if index < len => {
                    items[index] = value;
                    Ok(&mut items[index])
                }
                Some(index) if index == len => {
                    items.push(value);
                    Ok(&mut items[index])
                }
                Some(index) => Err(TreeError::IndexOutOfRange {
                    key: key.to_string(),
                    index,
                    len,
                }),
                None => Err(conflict(key, segment, "array")),
            }
        }
        other => Err(conflict(key, segment, value_kind(other))),
    }
}

/// Remove the slot `key.last()` from `parent`, returning what was there.
///
/// Array elements never shift: only the last element can be removed, any
/// other index fails with [`TreeError::ArrayHole`].
pub(crate) fn take(parent: &mut Value, key: &PathKey) -> Result<Option<Value>, TreeError> {
    let segment = key.last();
    match parent {
        Value::Object(map) => Ok(map.shift_remove(segment)),
        Value::Array(items) => match parse_index(segment) {
            Some(index) if index + 1 == items.len() => Ok(items.pop()),
            Some(index) if index < items.len() => Err(TreeError::ArrayHole {
                key: key.to_string(),
                index,
                len: items.len(),
            }),
            _ => Ok(None),
        },
        _ => Ok(None),
    }
}

/// Check that [`locate_or_create_parent`] followed by [`put`] would succeed
/// for `key`, without touching the tree.
pub(crate) fn check_writable(root: &Value, key: &PathKey) -> Result<(), TreeError> {
    let mut current = root;
    for segment in key.parents() {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => {
                let index = parse_index(segment).ok_or_else(|| conflict(key, segment, "array"))?;
                Some(items.get(index).ok_or_else(|| TreeError::IndexOutOfRange {
                    key: key.to_string(),
                    index,
                    len: items.len(),
                })?)
            }
            other => return Err(conflict(key, segment, value_kind(other))),
        };
        match next {
            // Everything below a missing or null slot gets created
            None | Some(Value::Null) => return Ok(()),
            Some(next) => current = next,
        }
    }

    let segment = key.last();
    match current {
        Value::Object(_) => Ok(()),
        Value::Array(items) => match parse_index(segment) {
            Some(index) if index <= items.len() => Ok(()),
            Some(index) => Err(TreeError::IndexOutOfRange {
                key: key.to_string(),
                index,
                len: items.len(),
            }),
            None => Err(conflict(key, segment, "array")),
        },
        other => Err(conflict(key, segment, value_kind(other))),
    }
}

fn conflict(key: &PathKey, segment: &str, found: &'static str) -> TreeError {
    TreeError::PathConflict {
        key: key.to_string(),
        segment: segment.to_string(),
        found,
    }
}
