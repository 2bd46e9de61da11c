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

//! # Zinorm Function Library
//!
//! The fixed set of transform steps a pipeline can reference by name, and the
//! registry that instantiates them from configuration.
//!
//! | Step | Arguments | Effect |
//! |---|---|---|
//! | `parse_json` | `field`, `in_place` | Decode embedded JSON text |
//! | `regex` | `pattern`, `field` | Replace the event with named capture groups |
//! | `rename` | `from_field`, `to_field` | Move a value between paths |
//! | `drop` | `fields` | Delete each listed path |
//! | `set` | `field`, `value` | Write a constant |
//! | `extract` | `field` | Merge a nested map into the top level |
//! | `parse_win_event_log` | `field` | Parse Windows Event Log text |

use std::collections::HashMap;

use serde_json::Value;

use crate::errors::{Result, ZiError};
use crate::function::{ZiFunction, ZiFunctionContext, ZiFunctionFactory};

pub mod drop;
pub mod extract;
pub mod parse_json;
pub mod regex;
pub mod rename;
pub mod set;
pub mod win_event_log;

/// Name-keyed table of function factories.
#[derive(Clone)]
pub struct ZiFunctionRegistry {
    factories: HashMap<String, ZiFunctionFactory>,
}

impl ZiFunctionRegistry {
    /// Creates an empty registry.
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Creates a registry pre-loaded with the seven bundled steps.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_defaults();
        registry
    }

    /// Registers a factory, replacing any previous factory of the same name.
    pub fn register(&mut self, name: impl Into<String>, factory: ZiFunctionFactory) {
        self.factories.insert(name.into(), factory);
    }

    fn register_defaults(&mut self) {
        self.register("parse_json", parse_json::parse_json_factory as ZiFunctionFactory);
        self.register("regex", regex::regex_factory as ZiFunctionFactory);
        self.register("rename", rename::rename_factory as ZiFunctionFactory);
        self.register("drop", drop::drop_factory as ZiFunctionFactory);
        self.register("set", set::set_factory as ZiFunctionFactory);
        self.register("extract", extract::extract_factory as ZiFunctionFactory);
        self.register(
            "parse_win_event_log",
            win_event_log::parse_win_event_log_factory as ZiFunctionFactory,
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered step names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Instantiates step `name` with `args`.
    pub fn build(
        &self,
        name: &str,
        args: &Value,
        context: &ZiFunctionContext,
    ) -> Result<Box<dyn ZiFunction + Send + Sync>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ZiError::unknown_step(name))?;
        factory(args, context)
    }
}

impl std::fmt::Debug for ZiFunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZiFunctionRegistry")
            .field("steps", &self.names())
            .finish()
    }
}

impl Default for ZiFunctionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
