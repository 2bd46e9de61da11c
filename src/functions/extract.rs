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
use crate::event::{is_empty_value, ZiEvent};
use crate::field::{delete_value, get_value};
use crate::function::{args_object, required_str, ZiFunction, ZiFunctionContext};

/// Lifts the entries of a nested map into the top level of the event.
/// Colliding top-level keys are overwritten.
#[derive(Debug)]
pub struct ZiExtract {
    field: String,
}

impl ZiExtract {
    #[allow(non_snake_case)]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl ZiFunction for ZiExtract {
    fn name(&self) -> &'static str {
        "extract"
    }

    fn apply(&self, mut event: ZiEvent) -> Result<ZiEvent> {
        match get_value(&event, &self.field) {
            None => return Ok(event),
            Some(Value::Object(_)) => {}
            Some(value) if is_empty_value(value) => return Ok(event),
            Some(_) => return Err(ZiError::type_mismatch(&self.field)),
        }

        if let Some(Value::Object(nested)) = delete_value(&mut event, &self.field) {
            event.extend(nested);
        }
        Ok(event)
    }
}

#[allow(non_snake_case)]
pub fn extract_factory(
    args: &Value,
    _context: &ZiFunctionContext,
) -> Result<Box<dyn ZiFunction + Send + Sync>> {
    let empty = Map::new();
    let obj = args_object("extract", args, &empty)?;
    let field = required_str("extract", obj, "field")?;
    Ok(Box::new(ZiExtract::new(field)))
}
