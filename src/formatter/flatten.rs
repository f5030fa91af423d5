//! Key flattening and unflattening for nested records
//!
//! Flattening joins nested object keys with a separator (`a.b.c`) down to a
//! configurable depth limit; a sub-object sitting exactly at the limit is
//! captured whole under its accumulated key. Unflattening is the inverse:
//! separator-delimited keys are expanded back into nested objects, creating
//! intermediate objects as needed and overwriting non-object intermediates.

use serde_json::{Map, Value};
use std::collections::HashSet;

/// Compute the flattened key set of one record, in first-appearance order.
///
/// Descends into nested non-array objects while the accumulated key has
/// fewer segments than `max_depth`. Empty objects and arrays are never
/// descended into; they are captured as leaf values.
pub fn flatten_keys(record: &Map<String, Value>, separator: &str, max_depth: usize) -> Vec<String> {
    let mut keys = Vec::new();
    collect_keys(record, separator, max_depth, "", 1, &mut keys);
    keys
}

fn collect_keys(
    record: &Map<String, Value>,
    separator: &str,
    max_depth: usize,
    prefix: &str,
    depth: usize,
    out: &mut Vec<String>,
) {
    for (key, value) in record {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}{}{}", prefix, separator, key)
        };

        match value {
            Value::Object(nested) if !nested.is_empty() && depth < max_depth => {
                collect_keys(nested, separator, max_depth, &full_key, depth + 1, out);
            }
            _ => out.push(full_key),
        }
    }
}

/// Ordered union of flattened keys across a sequence of records
pub fn flattened_key_union(
    records: &[&Map<String, Value>],
    separator: &str,
    max_depth: usize,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut union = Vec::new();

    for record in records {
        for key in flatten_keys(record, separator, max_depth) {
            if seen.insert(key.clone()) {
                union.push(key);
            }
        }
    }

    union
}

/// Ordered union of top-level keys across a sequence of records
pub fn key_union(records: &[&Map<String, Value>]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut union = Vec::new();

    for record in records {
        for key in record.keys() {
            if seen.insert(key.clone()) {
                union.push(key.clone());
            }
        }
    }

    union
}

/// Look up the value for a (possibly flattened) column in a record.
///
/// A literal key match wins over path traversal, so records whose keys
/// contain the separator verbatim are not misread as nested paths.
pub fn lookup_path<'a>(
    record: &'a Map<String, Value>,
    path: &str,
    separator: &str,
) -> Option<&'a Value> {
    if let Some(value) = record.get(path) {
        return Some(value);
    }

    let mut segments = path.split(separator);
    let first = segments.next()?;
    let mut current = record.get(first)?;

    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }

    Some(current)
}

/// Insert a value into a record under a separator-delimited path.
///
/// Intermediate objects are created as needed; an intermediate that is not
/// an object is overwritten.
pub fn insert_nested(target: &mut Map<String, Value>, path: &str, separator: &str, value: Value) {
    let segments: Vec<&str> = path.split(separator).collect();

    let mut current = target;
    for segment in &segments[..segments.len() - 1] {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = entry.as_object_mut().expect("entry was just made an object");
    }

    current.insert(segments[segments.len() - 1].to_string(), value);
}

/// Expand all separator-delimited keys of a flat record into nested objects
pub fn unflatten_record(
    record: &Map<String, Value>,
    separator: &str,
) -> Map<String, Value> {
    let mut result = Map::new();
    for (key, value) in record {
        if key.contains(separator) {
            insert_nested(&mut result, key, separator, value.clone());
        } else {
            result.insert(key.clone(), value.clone());
        }
    }
    result
}
