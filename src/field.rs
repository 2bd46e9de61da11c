//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zinorm.
//! The Zinorm project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Field Addressing Module
//!
//! Reads, writes, and deletes values in a [`ZiEvent`] using dot-separated
//! paths such as `"winlog.event_data.LogonGuid"`.
//!
//! ## Resolution Rules
//!
//! 1. If the whole path exists as a literal top-level key (`{"a.b": 1}`), that
//!    key wins over nested traversal, for reads, writes and deletes alike.
//! 2. Otherwise the path is split on `.` and traversed through nested maps.
//! 3. An empty path or a path ending in `.` never addresses anything: reads
//!    return `None`, writes and deletes do nothing.
//!
//! None of these functions fail; absence is reported as `None`.

use serde_json::{Map, Value};

use crate::errors::{Result, ZiError};
use crate::event::ZiEvent;

/// Path separator used by every field path and by [`flatten_event`].
pub const PATH_SEPARATOR: char = '.';

fn is_addressable(path: &str) -> bool {
    !path.is_empty() && !path.ends_with(PATH_SEPARATOR)
}

/// Returns the value at `path`, or `None` if any segment is missing or an
/// intermediate value is not a map.
pub fn get_value<'a>(event: &'a ZiEvent, path: &str) -> Option<&'a Value> {
    if !is_addressable(path) {
        return None;
    }
    if let Some(value) = event.get(path) {
        return Some(value);
    }

    let mut parts = path.split(PATH_SEPARATOR);
    let mut current = event.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Writes `value` at `path`, creating intermediate maps as needed.
///
/// A literal top-level key equal to `path` is removed first, so
/// `set_value({"a.b": "old"}, "a.b", "new")` yields `{"a": {"b": "new"}}`.
/// Non-map values along the path are replaced by fresh maps.
pub fn set_value(event: &mut ZiEvent, path: &str, value: Value) {
    if !is_addressable(path) {
        return;
    }
    if !path.contains(PATH_SEPARATOR) {
        event.insert(path.to_string(), value);
        return;
    }

    event.remove(path);

    let parts: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    let (leaf, parents) = match parts.split_last() {
        Some(split) => split,
        None => return,
    };

    let mut current = event;
    for part in parents {
        let slot = current
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(map) => map,
            _ => return,
        };
    }
    current.insert(leaf.to_string(), value);
}

/// Removes the value at `path` and returns it.
///
/// A literal top-level key equal to `path` takes priority over traversal.
/// Missing paths return `None` and leave the event untouched.
pub fn delete_value(event: &mut ZiEvent, path: &str) -> Option<Value> {
    if !is_addressable(path) {
        return None;
    }
    if let Some(value) = event.remove(path) {
        return Some(value);
    }
    if !path.contains(PATH_SEPARATOR) {
        return None;
    }

    let parts: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    let (leaf, parents) = parts.split_last()?;

    let mut current = event;
    for part in parents {
        current = current.get_mut(*part)?.as_object_mut()?;
    }
    current.remove(*leaf)
}

/// Flattens nested maps into a single-level map with `.`-joined keys.
///
/// Only map values are descended into; arrays are kept whole. Empty maps
/// produce no key at all, so `{"a": {}, "x": 1}` flattens to `{"x": 1}`. Fails with [`ZiError::FlattenCollision`]
/// when two paths produce the same key (e.g. `{"a.b": 1, "a": {"b": 2}}`).
pub fn flatten_event(event: &ZiEvent) -> Result<ZiEvent> {
    let mut result = Map::new();
    flatten_into(event, None, &mut result)?;
    Ok(result)
}

fn flatten_into(
    obj: &Map<String, Value>,
    prefix: Option<&str>,
    out: &mut Map<String, Value>,
) -> Result<()> {
    for (key, value) in obj {
        let new_key = match prefix {
            Some(prefix) => format!("{}{}{}", prefix, PATH_SEPARATOR, key),
            None => key.clone(),
        };

        match value {
            Value::Object(nested) => {
                flatten_into(nested, Some(&new_key), out)?;
            }
            _ => {
                if out.contains_key(&new_key) {
                    return Err(ZiError::FlattenCollision { key: new_key });
                }
                out.insert(new_key, value.clone());
            }
        }
    }
    Ok(())
}
