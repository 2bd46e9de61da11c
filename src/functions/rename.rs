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
use crate::field::{delete_value, get_value, set_value};
use crate::function::{args_object, required_str, ZiFunction, ZiFunctionContext};

#[derive(Debug)]
pub struct ZiRename {
    from_field: String,
    to_field: String,
}

impl ZiRename {
    #[allow(non_snake_case)]
    pub fn new(from_field: impl Into<String>, to_field: impl Into<String>) -> Self {
        Self {
            from_field: from_field.into(),
            to_field: to_field.into(),
        }
    }
}

impl ZiFunction for ZiRename {
    fn name(&self) -> &'static str {
        "rename"
    }

    fn apply(&self, mut event: ZiEvent) -> Result<ZiEvent> {
        if matches!(get_value(&event, &self.from_field), None | Some(Value::Null)) {
            return Err(ZiError::not_found(&self.from_field));
        }
        let value = delete_value(&mut event, &self.from_field)
            .ok_or_else(|| ZiError::not_found(&self.from_field))?;
        set_value(&mut event, &self.to_field, value);
        Ok(event)
    }
}

#[allow(non_snake_case)]
pub fn rename_factory(
    args: &Value,
    _context: &ZiFunctionContext,
) -> Result<Box<dyn ZiFunction + Send + Sync>> {
    let empty = Map::new();
    let obj = args_object("rename", args, &empty)?;
    let from_field = required_str("rename", obj, "from_field")?;
    let to_field = required_str("rename", obj, "to_field")?;
    Ok(Box::new(ZiRename::new(from_field, to_field)))
}
