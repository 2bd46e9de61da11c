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

use ::regex::Regex;
use serde_json::{Map, Value};

use crate::errors::{Result, ZiError};
use crate::event::{value_type_name, ZiEvent};
use crate::field::get_value;
use crate::function::{args_object, required_str, ZiFunction, ZiFunctionContext};

/// Searches `field` with `pattern` and replaces the event with the named
/// capture groups. Groups that did not take part in the match map to `null`.
#[derive(Debug)]
pub struct ZiRegexExtract {
    pattern: Regex,
    field: String,
}

impl ZiRegexExtract {
    #[allow(non_snake_case)]
    pub fn new(pattern: &str, field: impl Into<String>) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|err| ZiError::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            pattern,
            field: field.into(),
        })
    }
}

impl ZiFunction for ZiRegexExtract {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn apply(&self, event: ZiEvent) -> Result<ZiEvent> {
        let text = match get_value(&event, &self.field) {
            None | Some(Value::Null) => {
                return Err(ZiError::no_match(
                    &self.field,
                    self.pattern.as_str(),
                    "<None>",
                ))
            }
            Some(Value::String(text)) => text,
            Some(other) => {
                return Err(ZiError::field_type(
                    &self.field,
                    value_type_name(other),
                    "string",
                ))
            }
        };

        let captures = self
            .pattern
            .captures(text)
            .ok_or_else(|| ZiError::no_match(&self.field, self.pattern.as_str(), text))?;

        let mut groups = ZiEvent::new();
        for name in self.pattern.capture_names().flatten() {
            let value = captures
                .name(name)
                .map(|m| Value::String(m.as_str().to_string()))
                .unwrap_or(Value::Null);
            groups.insert(name.to_string(), value);
        }
        Ok(groups)
    }
}

#[allow(non_snake_case)]
pub fn regex_factory(
    args: &Value,
    _context: &ZiFunctionContext,
) -> Result<Box<dyn ZiFunction + Send + Sync>> {
    let empty = Map::new();
    let obj = args_object("regex", args, &empty)?;
    let pattern = required_str("regex", obj, "pattern")?;
    let field = required_str("regex", obj, "field")?;
    Ok(Box::new(ZiRegexExtract::new(&pattern, field)?))
}
