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

//! # Zinorm Function Module
//!
//! This module defines the core `ZiFunction` trait, the contract for every
//! transform step that a Zinorm pipeline can run against an event.
//!
//! ## Function Design
//!
//! A function receives one event by value and returns the event that the next
//! step should see. It may edit the event in place (`rename`, `set`) or
//! replace it wholesale (`regex`, `parse_win_event_log`). Functions never
//! catch their own failures; the pipeline manager decides whether an error is
//! propagated or suppressed.
//!
//! ## Implementing Custom Functions
//!
//! ```rust
//! use serde_json::Value;
//! use zinorm::errors::Result;
//! use zinorm::event::ZiEvent;
//! use zinorm::function::ZiFunction;
//!
//! #[derive(Debug)]
//! struct Lowercase(String);
//!
//! impl ZiFunction for Lowercase {
//!     fn name(&self) -> &'static str {
//!         "lowercase"
//!     }
//!
//!     fn apply(&self, mut event: ZiEvent) -> Result<ZiEvent> {
//!         if let Some(Value::String(text)) = event.get_mut(&self.0) {
//!             *text = text.to_lowercase();
//!         }
//!         Ok(event)
//!     }
//! }
//! ```
//!
//! Functions are registered with a [`ZiFunctionFactory`] in a
//! [`ZiFunctionRegistry`](crate::functions::ZiFunctionRegistry), which turns
//! the step's argument object into a configured instance.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::errors::{Result, ZiError};
use crate::event::ZiEvent;
use crate::functions::win_event_log::mapping::ZiFieldMappingTable;

/// Contract that every transform step fulfills.
pub trait ZiFunction: std::fmt::Debug {
    /// Registry name of the step, also used in log lines.
    fn name(&self) -> &'static str;

    /// Transforms `event` and returns the event for the next step.
    fn apply(&self, event: ZiEvent) -> Result<ZiEvent>;
}

/// Builds a configured function from its argument object.
pub type ZiFunctionFactory =
    fn(&Value, &ZiFunctionContext) -> Result<Box<dyn ZiFunction + Send + Sync>>;

/// Shared, read-only resources handed to every factory.
#[derive(Clone, Debug)]
pub struct ZiFunctionContext {
    pub mapping: Arc<ZiFieldMappingTable>,
}

impl ZiFunctionContext {
    #[allow(non_snake_case)]
    pub fn new(mapping: Arc<ZiFieldMappingTable>) -> Self {
        Self { mapping }
    }
}

impl Default for ZiFunctionContext {
    fn default() -> Self {
        Self::new(ZiFieldMappingTable::bundled())
    }
}

/// Runs `function` on `event`, logging the step name at debug level.
pub fn execute_function(function: &dyn ZiFunction, event: ZiEvent) -> Result<ZiEvent> {
    log::debug!("applying step '{}'", function.name());
    function.apply(event)
}

/// Borrows the argument object of `step`. A missing (`null`) argument value
/// is treated as an empty object.
pub(crate) fn args_object<'a>(
    step: &str,
    args: &'a Value,
    empty: &'a Map<String, Value>,
) -> Result<&'a Map<String, Value>> {
    match args {
        Value::Null => Ok(empty),
        Value::Object(obj) => Ok(obj),
        _ => Err(ZiError::invalid_argument(step, "arguments must be an object")),
    }
}

pub(crate) fn required_str(step: &str, obj: &Map<String, Value>, key: &str) -> Result<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ZiError::invalid_argument(step, format!("requires string '{key}'")))
}

/// Reads a boolean flag given either as a JSON bool or as a case-insensitive
/// `"true"`/`"false"` string.
pub(crate) fn optional_bool(
    step: &str,
    obj: &Map<String, Value>,
    key: &str,
    default: bool,
) -> Result<bool> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(Value::String(text)) if text.eq_ignore_ascii_case("true") => Ok(true),
        Some(Value::String(text)) if text.eq_ignore_ascii_case("false") => Ok(false),
        Some(_) => Err(ZiError::invalid_argument(
            step,
            format!("'{key}' must be a boolean"),
        )),
    }
}
