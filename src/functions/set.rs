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
use crate::field::set_value;
use crate::function::{args_object, required_str, ZiFunction, ZiFunctionContext};

#[derive(Debug)]
pub struct ZiSet {
    field: String,
    value: Value,
}

impl ZiSet {
    #[allow(non_snake_case)]
    pub fn new(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }
}

impl ZiFunction for ZiSet {
    fn name(&self) -> &'static str {
        "set"
    }

    fn apply(&self, mut event: ZiEvent) -> Result<ZiEvent> {
        set_value(&mut event, &self.field, self.value.clone());
        Ok(event)
    }
}

#[allow(non_snake_case)]
pub fn set_factory(
    args: &Value,
    _context: &ZiFunctionContext,
) -> Result<Box<dyn ZiFunction + Send + Sync>> {
    let empty = Map::new();
    let obj = args_object("set", args, &empty)?;
    let field = required_str("set", obj, "field")?;
    let value = obj
        .get("value")
        .cloned()
        .ok_or_else(|| ZiError::invalid_argument("set", "requires 'value'"))?;
    Ok(Box::new(ZiSet::new(field, value)))
}
