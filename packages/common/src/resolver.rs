//! # Path Resolver
//!
//! Pure read/write/splice operations on nested JSON values addressed by a
//! [`DataLocation`]. None of these functions mutate their inputs: writers clone
//! the root and return the updated value.
//!
//! Missing intermediate containers are tolerated everywhere (readers return
//! `None`, writers create them). Passing *through* a scalar is a contract
//! violation and fails with [`PathError::InvalidPathTarget`].

use crate::data_dictionary::DataType;
use crate::error::PathError;
use crate::location::{DataLocation, PathStep};
use crate::result::PathResult;
use serde_json::{Map, Value};

/// How many `null` slots a write may pad before the target index
pub const MAX_ARRAY_PADDING: usize = 1024;

/// Read the value at `location`, or `None` if any step is missing
pub fn read<'a>(value: &'a Value, location: &DataLocation) -> Option<&'a Value> {
    let mut current = value;
    for step in location.steps() {
        current = match (current, step) {
            (Value::Object(map), PathStep::Key(key)) => map.get(key)?,
            (Value::Object(map), PathStep::Index(index)) => map.get(&index.to_string())?,
            (Value::Array(items), PathStep::Index(index)) => items.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Return `value` with `new_value` placed at `location`
///
/// Intermediate containers are created as needed: an array when the next step
/// is an index, an object otherwise. An empty location replaces the whole value.
pub fn write(value: &Value, location: &DataLocation, new_value: Value) -> PathResult<Value> {
    let mut updated = value.clone();
    write_in_place(&mut updated, location, new_value)?;
    Ok(updated)
}

/// In-place variant of [`write`]; on error `target` may be partially padded
/// with empty containers, so callers wanting atomicity should use [`write`].
pub fn write_in_place(target: &mut Value, location: &DataLocation, new_value: Value) -> PathResult<()> {
    let mut current = target;
    for (depth, step) in location.steps().iter().enumerate() {
        current = step_into_or_create(current, step, location, depth)?;
    }
    *current = new_value;
    Ok(())
}

fn step_into_or_create<'a>(
    current: &'a mut Value,
    step: &PathStep,
    location: &DataLocation,
    depth: usize,
) -> PathResult<&'a mut Value> {
    if current.is_null() {
        *current = match step {
            PathStep::Key(_) => Value::Object(Map::new()),
            PathStep::Index(_) => Value::Array(Vec::new()),
        };
    }

    match (current, step) {
        (Value::Object(map), PathStep::Key(key)) => Ok(map.entry(key.clone()).or_insert(Value::Null)),
        (Value::Object(map), PathStep::Index(index)) => {
            Ok(map.entry(index.to_string()).or_insert(Value::Null))
        }
        (Value::Array(items), PathStep::Index(index)) => {
            if items.len() <= *index {
                let padding = *index - items.len();
                let len = index
                    .checked_add(1)
                    .filter(|_| padding <= MAX_ARRAY_PADDING)
                    .ok_or_else(|| {
                        PathError::invalid_target(
                            prefix_string(location, depth),
                            format!("index {} is too far past the end of an array of {}", index, items.len()),
                        )
                    })?;
                items.resize(len, Value::Null);
            }
            Ok(&mut items[*index])
        }
        (Value::Array(_), PathStep::Key(key)) => Err(PathError::invalid_target(
            prefix_string(location, depth),
            format!("cannot address key '{}' inside an array", key),
        )),
        (scalar, _) => Err(PathError::invalid_target(
            prefix_string(location, depth),
            format!("cannot step into {}", describe(scalar)),
        )),
    }
}

/// Return `value` with the node at `location` excised
///
/// Arrays close the gap, objects drop the key. A missing target leaves the
/// value unchanged; the empty location yields `null`.
pub fn remove_at(value: &Value, location: &DataLocation) -> PathResult<Value> {
    let (parent_location, last) = match (location.parent(), location.last()) {
        (Some(parent), Some(last)) => (parent, last),
        _ => return Ok(Value::Null),
    };

    let mut updated = value.clone();
    if let Some(parent) = lookup_mut(&mut updated, &parent_location)? {
        match (parent, last) {
            (Value::Array(items), PathStep::Index(index)) => {
                if *index < items.len() {
                    items.remove(*index);
                }
            }
            (Value::Object(map), step) => {
                let key = match step {
                    PathStep::Key(key) => key.clone(),
                    PathStep::Index(index) => index.to_string(),
                };
                map.shift_remove(&key);
            }
            (Value::Null, _) => {}
            (other, _) => {
                return Err(PathError::invalid_target(
                    parent_location.to_string(),
                    format!("cannot remove '{}' from {}", last, describe(other)),
                ))
            }
        }
    }
    Ok(updated)
}

/// Insert `source` at `location`, appending when the target is already an array
///
/// When nothing array-like is there yet, `target_type` decides between creating
/// a one-element array and overwriting the slot.
pub fn insert_source_into(
    value: &Value,
    location: &DataLocation,
    target_type: DataType,
    source: Value,
) -> PathResult<Value> {
    match read(value, location) {
        Some(Value::Array(existing)) => {
            let mut items = existing.clone();
            items.push(source);
            write(value, location, Value::Array(items))
        }
        _ if target_type == DataType::Array => write(value, location, Value::Array(vec![source])),
        _ => write(value, location, source),
    }
}

/// Deep-clone the array item at `location` and insert the copy right after it
///
/// Only repeatable array items can be duplicated; any other location returns
/// the value unchanged.
pub fn duplicate_at(value: &Value, location: &DataLocation) -> PathResult<Value> {
    let (parent_location, index) = match (location.parent(), location.last()) {
        (Some(parent), Some(PathStep::Index(index))) => (parent, *index),
        _ => return Ok(value.clone()),
    };

    let mut updated = value.clone();
    match lookup_mut(&mut updated, &parent_location)? {
        Some(Value::Array(items)) if index < items.len() => {
            let copy = items[index].clone();
            items.insert(index + 1, copy);
        }
        _ => {}
    }
    Ok(updated)
}

/// Mutable lookup that never creates containers
///
/// `Ok(None)` means some step is missing; an error means the path crosses a
/// scalar.
fn lookup_mut<'a>(value: &'a mut Value, location: &DataLocation) -> PathResult<Option<&'a mut Value>> {
    let mut current = value;
    for (depth, step) in location.steps().iter().enumerate() {
        let next = match (current, step) {
            (Value::Object(map), PathStep::Key(key)) => map.get_mut(key),
            (Value::Object(map), PathStep::Index(index)) => map.get_mut(&index.to_string()),
            (Value::Array(items), PathStep::Index(index)) => items.get_mut(*index),
            (Value::Null, _) => None,
            (other, _) => {
                return Err(PathError::invalid_target(
                    prefix_string(location, depth),
                    format!("cannot step into {}", describe(other)),
                ))
            }
        };
        match next {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

fn prefix_string(location: &DataLocation, depth: usize) -> String {
    DataLocation::new(location.steps()[..depth].to_vec()).to_string()
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
