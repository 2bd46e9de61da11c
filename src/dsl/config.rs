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

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::Result;

/// Structured pipeline definition: an ordered list of step names plus one
/// argument object per step name.
///
/// Arguments are keyed by name, so repeated steps share one argument object.
///
/// ```json
/// {"steps": ["parse_json", "drop"],
///  "args": {"parse_json": {"field": "raw"}, "drop": {"fields": "raw"}}}
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZiParserConfig {
    pub steps: Vec<String>,
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl ZiParserConfig {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `name` and stores `args` under it, replacing the arguments of
    /// any earlier step with the same name.
    pub fn with_step(mut self, name: impl Into<String>, args: Value) -> Self {
        let name = name.into();
        self.args.insert(name.clone(), args);
        self.steps.push(name);
        self
    }

    pub fn args_for(&self, step: &str) -> Option<&Value> {
        self.args.get(step)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Loads a config file. The format follows the `.json`, `.yaml` or
    /// `.yml` extension; other files are read as JSON when they start with
    /// `{` and as YAML otherwise.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "json" => Self::from_json_str(&content),
            "yaml" | "yml" => Self::from_yaml_str(&content),
            _ if content.trim_start().starts_with('{') => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Pretty-printed JSON form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
