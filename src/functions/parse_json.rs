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
use crate::event::{is_empty_value, value_type_name, ZiEvent};
use crate::field::{get_value, set_value};
use crate::function::{args_object, optional_bool, required_str, ZiFunction, ZiFunctionContext};

/// Decodes JSON text stored at `field`.
///
/// With `in_place` the decoded value is written back at `field`; otherwise
/// the decoded object becomes the new event.
#[derive(Debug)]
pub struct ZiParseJson {
    field: String,
    in_place: bool,
}

impl ZiParseJson {
    #[allow(non_snake_case)]
    pub fn new(field: impl Into<String>, in_place: bool) -> Self {
        Self {
            field: field.into(),
            in_place,
        }
    }
}

impl ZiFunction for ZiParseJson {
    fn name(&self) -> &'static str {
        "parse_json"
    }

    fn apply(&self, mut event: ZiEvent) -> Result<ZiEvent> {
        let parsed: Value = match get_value(&event, &self.field) {
            None => return Ok(event),
            Some(value) if is_empty_value(value) => return Ok(event),
            Some(Value::String(text)) => serde_json::from_str(text)
                .map_err(|err| ZiError::parse(&self.field, err.to_string()))?,
            Some(other) => {
                return Err(ZiError::parse(
                    &self.field,
                    format!("expected JSON text, found {}", value_type_name(other)),
                ))
            }
        };

        if self.in_place {
            set_value(&mut event, &self.field, parsed);
            return Ok(event);
        }

        match parsed {
            Value::Object(object) => Ok(object),
            other => Err(ZiError::parse(
                &self.field,
                format!(
                    "unsupported data type {}, expected an object when in_place is false",
                    value_type_name(&other)
                ),
            )),
        }
    }
}

#[allow(non_snake_case)]
pub fn parse_json_factory(
    args: &Value,
    _context: &ZiFunctionContext,
) -> Result<Box<dyn ZiFunction + Send + Sync>> {
    let empty = Map::new();
    let obj = args_object("parse_json", args, &empty)?;
    let field = required_str("parse_json", obj, "field")?;
    let in_place = optional_bool("parse_json", obj, "in_place", false)?;
    Ok(Box::new(ZiParseJson::new(field, in_place)))
}
