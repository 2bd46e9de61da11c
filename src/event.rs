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

//! # Zinorm Event Module
//!
//! An event is a string-keyed map whose values may be strings, numbers,
//! booleans, null, nested maps, or arrays of any of these. Zinorm reuses
//! `serde_json`'s `Map`/`Value` so that events decoded from JSON flow through
//! pipelines without conversion.
//!
//! ```rust
//! use serde_json::json;
//! use zinorm::event::ZiEvent;
//!
//! let event: ZiEvent = json!({"user": {"name": "J"}, "x": 1})
//!     .as_object()
//!     .cloned()
//!     .unwrap_or_default();
//! ```

use serde_json::{Map, Value};

/// Nested key/value record transformed by pipelines.
///
/// Cloning an event is a deep copy; the pipeline manager relies on this to
/// give every run its own working copy.
pub type ZiEvent = Map<String, Value>;

/// Returns `true` for the values that transform steps silently skip:
/// `null`, `""`, `[]` and `{}`.
///
/// Numbers (including `0`) and booleans (including `false`) are never empty.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Human-readable JSON type name used in error messages.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
