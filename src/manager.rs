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

//! # Parser Manager Module
//!
//! The manager runs pipelines against events. A pipeline is a
//! [`ZiParserConfig`], authored as JSON/YAML, compiled from a text query, or
//! registered under a name as a predefined parser.
//!
//! ## Execution Semantics
//!
//! 1. The input event is cloned; the caller's event is never modified.
//! 2. Steps are built once per call from the function registry, each with
//!    the argument object stored under its name (or none), then run in
//!    order. Batch runs share the built steps across all events.
//! 3. With `flatten`, the result is flattened into `.`-joined keys.
//! 4. On failure the error is returned, unless `suppress_errors` is set, in
//!    which case the original event is returned unchanged (optionally logged
//!    at error level).
//!
//! ## Usage Example
//!
//! ```rust
//! use serde_json::json;
//! use zinorm::manager::{ZiParserManager, ZiRunOptions};
//!
//! let manager = ZiParserManager::new();
//! let event = json!({"raw": "{\"a\": 1}"}).as_object().cloned().unwrap_or_default();
//! let parsed = manager
//!     .run_query(&event, r#"parse_json(field="raw")"#, &ZiRunOptions::default())
//!     .unwrap_or_default();
//! assert_eq!(parsed.get("a"), Some(&json!(1)));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::dsl::{ZiParserConfig, ZiQueryNormalizer};
use crate::errors::{Result, ZiError};
use crate::event::ZiEvent;
use crate::field::flatten_event;
use crate::function::{execute_function, ZiFunction, ZiFunctionContext, ZiFunctionFactory};
use crate::functions::win_event_log::mapping::ZiFieldMappingTable;
use crate::functions::ZiFunctionRegistry;

/// Name of the bundled Windows Event Log parser.
pub const WINDOWS_EVENT_PARSER: &str = "windows_event";

type ZiBuiltStep = Box<dyn ZiFunction + Send + Sync>;

/// Per-run execution flags. All default to `false`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiRunOptions {
    /// Return the original event instead of an error.
    pub suppress_errors: bool,
    /// Log suppressed errors at error level.
    pub log_errors: bool,
    /// Flatten the result into `.`-joined keys.
    pub flatten: bool,
}

impl ZiRunOptions {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suppress_errors(mut self, suppress: bool) -> Self {
        self.suppress_errors = suppress;
        self
    }

    pub fn log_errors(mut self, log: bool) -> Self {
        self.log_errors = log;
        self
    }

    pub fn flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }
}

/// Entry point for running configured, query-compiled, and predefined
/// pipelines.
#[derive(Clone, Debug)]
pub struct ZiParserManager {
    registry: ZiFunctionRegistry,
    context: ZiFunctionContext,
    normalizer: ZiQueryNormalizer,
    predefined: HashMap<String, ZiParserConfig>,
}

impl ZiParserManager {
    /// Creates a manager using the bundled field mapping table.
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        Self::with_mapping(ZiFieldMappingTable::bundled())
    }

    /// Creates a manager whose `parse_win_event_log` steps use `mapping`.
    pub fn with_mapping(mapping: Arc<ZiFieldMappingTable>) -> Self {
        let mut manager = Self {
            registry: ZiFunctionRegistry::with_defaults(),
            context: ZiFunctionContext::new(mapping),
            normalizer: ZiQueryNormalizer::new(),
            predefined: HashMap::new(),
        };
        manager.register_predefined(
            WINDOWS_EVENT_PARSER,
            ZiParserConfig::new().with_step("parse_win_event_log", json!({"field": "_raw"})),
        );
        manager
    }

    /// Registers an additional step, or replaces a bundled one.
    pub fn register_function(&mut self, name: impl Into<String>, factory: ZiFunctionFactory) {
        self.registry.register(name, factory);
    }

    pub fn registry(&self) -> &ZiFunctionRegistry {
        &self.registry
    }

    /// Registers a named pipeline for [`predefined_parser`](Self::predefined_parser).
    pub fn register_predefined(&mut self, name: impl Into<String>, config: ZiParserConfig) {
        self.predefined.insert(name.into(), config);
    }

    /// Names of the registered predefined parsers, sorted.
    pub fn predefined_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.predefined.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Runs `config` against a copy of `event`.
    pub fn configured_parser(
        &self,
        event: &ZiEvent,
        config: &ZiParserConfig,
        options: &ZiRunOptions,
    ) -> Result<ZiEvent> {
        let steps = self.build_steps(config);
        Self::run_prepared(event, &steps, options)
    }

    /// Instantiates every step of `config` once, in order.
    fn build_steps(&self, config: &ZiParserConfig) -> Result<Vec<ZiBuiltStep>> {
        config
            .steps
            .iter()
            .map(|step| {
                let args = config.args_for(step).unwrap_or(&Value::Null);
                self.registry.build(step, args, &self.context)
            })
            .collect()
    }

    /// Applies prebuilt steps to a copy of `event`. A build failure is
    /// reported for the event like any step failure.
    fn run_prepared(
        event: &ZiEvent,
        steps: &Result<Vec<ZiBuiltStep>>,
        options: &ZiRunOptions,
    ) -> Result<ZiEvent> {
        let outcome = match steps {
            Ok(steps) => Self::apply_steps(event.clone(), steps, options.flatten),
            Err(err) => Err(err.clone()),
        };

        match outcome {
            Ok(result) => Ok(result),
            Err(err) if options.suppress_errors => {
                if options.log_errors {
                    log::error!("error parsing event: {err}");
                }
                Ok(event.clone())
            }
            Err(err) => Err(err),
        }
    }

    fn apply_steps(
        mut working: ZiEvent,
        steps: &[ZiBuiltStep],
        flatten: bool,
    ) -> Result<ZiEvent> {
        for function in steps {
            working = execute_function(function.as_ref(), working)?;
        }
        if flatten {
            working = flatten_event(&working)?;
        }
        Ok(working)
    }

    /// Runs the predefined parser `name` with default options.
    pub fn predefined_parser(&self, event: &ZiEvent, name: &str) -> Result<ZiEvent> {
        let config = self
            .predefined
            .get(name)
            .ok_or_else(|| ZiError::UnknownParser {
                name: name.to_string(),
            })?;
        self.configured_parser(event, config, &ZiRunOptions::default())
    }

    /// Compiles a text query into a config.
    pub fn query_parser(&self, query: &str) -> ZiParserConfig {
        self.normalizer.normalize(query)
    }

    /// Compiles `query` and runs it against a copy of `event`.
    pub fn run_query(
        &self,
        event: &ZiEvent,
        query: &str,
        options: &ZiRunOptions,
    ) -> Result<ZiEvent> {
        let config = self.query_parser(query);
        self.configured_parser(event, &config, options)
    }

    /// Runs `config` against every event independently. Results keep the
    /// input order.
    pub fn run_batch(
        &self,
        events: &[ZiEvent],
        config: &ZiParserConfig,
        options: &ZiRunOptions,
    ) -> Vec<Result<ZiEvent>> {
        let steps = self.build_steps(config);

        #[cfg(feature = "parallel")]
        let results: Vec<Result<ZiEvent>> = events
            .par_iter()
            .map(|event| Self::run_prepared(event, &steps, options))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let results: Vec<Result<ZiEvent>> = events
            .iter()
            .map(|event| Self::run_prepared(event, &steps, options))
            .collect();

        results
    }
}

impl Default for ZiParserManager {
    fn default() -> Self {
        Self::new()
    }
}
