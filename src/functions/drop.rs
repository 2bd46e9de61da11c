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

use serde_json::{Map, Value};

use crate::errors::{Result, ZiError};
use crate::event::ZiEvent;
use crate::field::delete_value;
use crate::function::{args_object, ZiFunction, ZiFunctionContext};

/// Deletes every listed path; missing paths are ignored.
#[derive(Debug)]
pub struct ZiDrop {
    fields: Vec<String>,
}

impl ZiDrop {
    #[allow(non_snake_case)]
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Splits a comma-separated path list, skipping blank entries.
    pub fn from_list(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

impl ZiFunction for ZiDrop {
    fn name(&self) -> &'static str {
        "drop"
    }

    fn apply(&self, mut event: ZiEvent) -> Result<ZiEvent> {
        for field in &self.fields {
            delete_value(&mut event, field);
        }
        Ok(event)
    }
}

#[allow(non_snake_case)]
pub fn drop_factory(
    args: &Value,
    _context: &ZiFunctionContext,
) -> Result<Box<dyn ZiFunction + Send + Sync>> {
    let empty = Map::new();
    let obj = args_object("drop", args, &empty)?;

    match obj.get("fields") {
        Some(Value::String(list)) => Ok(Box::new(ZiDrop::from_list(list))),
        Some(Value::Array(items)) => {
            let fields = items
                .iter()
                .map(|v| {
                    v.as_str()
                        .map(|s| s.trim().to_string())
                        .ok_or_else(|| ZiError::invalid_argument("drop", "fields must be strings"))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Box::new(ZiDrop::new(
                fields.into_iter().filter(|f| !f.is_empty()).collect(),
            )))
        }
        _ => Err(ZiError::invalid_argument(
            "drop",
            "requires 'fields' as a comma-separated string or an array",
        )),
    }
}
