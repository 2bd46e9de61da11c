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

//! # Windows Event Log Parser
//!
//! Turns the plain-text body of a Windows Security event, as exported by
//! Event Viewer or forwarded by agents, into a flat record of strings.
//!
//! ```text
//! 11/28/2023 01:44:53 PM
//! LogName=Security
//! EventCode=4648
//! Message=A logon was attempted using explicit credentials.
//!
//! Subject:
//!     Security ID:        S-1-5-18
//!     Account Name:       WS01$
//! ```
//!
//! ## Parsing Rules
//!
//! - The first line (timestamp header) is skipped.
//! - `EventCode=<n>` anywhere in the text seeds the `EventID` output field.
//! - `Name:` on a line of its own opens a section; a blank line ends value
//!   continuation but keeps the section open.
//! - Top-level `key=value` or `key: value` pairs are stored under their raw
//!   key and close any open section.
//! - Pairs inside a section are renamed through the [`ZiFieldMappingTable`];
//!   pairs without a mapping for the current event id are dropped.
//! - Any other non-blank line is appended to the previous value.
//!
//! Parsing never fails: lines that fit none of the rules are ignored.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::{Map, Value};

use crate::errors::{Result, ZiError};
use crate::event::{value_type_name, ZiEvent};
use crate::field::get_value;
use crate::function::{args_object, required_str, ZiFunction, ZiFunctionContext};

pub mod mapping;

use mapping::ZiFieldMappingTable;

/// Output key holding the event id found in the text.
pub const EVENT_ID_FIELD: &str = "EventID";

const EVENT_CODE_KEY: &str = "EventCode";

static EVENT_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"EventCode\s*=\s*(\d+)").expect("EVENT_ID_PATTERN pattern is valid")
});

static KV_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^:=\n]+?)\s*[:=]\s*(.*)$").expect("KV_PATTERN pattern is valid")
});

static SECTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z \(\)]+?):$").expect("SECTION_PATTERN pattern is valid")
});

/// Per-call parser state, discarded once the text is consumed.
struct ZiWinEventLogState<'a> {
    mapping: &'a ZiFieldMappingTable,
    event_id: Option<String>,
    section: Option<String>,
    last_key: Option<String>,
    output: ZiEvent,
}

impl<'a> ZiWinEventLogState<'a> {
    fn new(event_id: Option<String>, mapping: &'a ZiFieldMappingTable) -> Self {
        let mut output = ZiEvent::new();
        if let Some(id) = &event_id {
            output.insert(EVENT_ID_FIELD.to_string(), Value::String(id.clone()));
        }
        Self {
            mapping,
            event_id,
            section: None,
            last_key: None,
            output,
        }
    }

    fn process_line(&mut self, line: &str) {
        let stripped = line.trim();
        if stripped.is_empty() {
            self.last_key = None;
            return;
        }

        if let Some(caps) = SECTION_PATTERN.captures(stripped) {
            self.section = caps.get(1).map(|m| m.as_str().trim().to_string());
            self.last_key = None;
            return;
        }

        if let Some(caps) = KV_PATTERN.captures(line) {
            let key = caps.get(1).map_or("", |m| m.as_str()).trim();
            let value = caps.get(2).map_or("", |m| m.as_str());
            self.process_pair(line, key, value);
            return;
        }

        if let Some(key) = &self.last_key {
            if let Some(Value::String(existing)) = self.output.get_mut(key) {
                existing.push(' ');
                existing.push_str(stripped);
            }
        }
    }

    fn process_pair(&mut self, line: &str, key: &str, value: &str) {
        if key == EVENT_CODE_KEY {
            return;
        }
        if !line.starts_with([' ', '\t']) {
            self.section = None;
        }

        let resolved = match &self.section {
            None => key.to_string(),
            Some(section) => {
                let mapped = self
                    .event_id
                    .as_deref()
                    .and_then(|id| self.mapping.lookup(id, section, key));
                match mapped {
                    Some(canonical) => canonical.to_string(),
                    None => {
                        log::debug!(
                            "no mapping for '{key}' in section '{section}' of event {:?}, dropping",
                            self.event_id
                        );
                        return;
                    }
                }
            }
        };

        self.output
            .insert(resolved.clone(), Value::String(value.trim().to_string()));
        self.last_key = Some(resolved);
    }
}

/// Parses one event body. Empty or whitespace-only text yields an empty
/// record.
pub fn parse_event_log_text(text: &str, mapping: &ZiFieldMappingTable) -> ZiEvent {
    let body = text.trim();
    if body.is_empty() {
        return ZiEvent::new();
    }

    let event_id = EVENT_ID_PATTERN
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    let mut state = ZiWinEventLogState::new(event_id, mapping);
    for line in body.split('\n').skip(1) {
        state.process_line(line);
    }
    state.output
}

/// Replaces the event with the record parsed from the text at `field`.
#[derive(Debug)]
pub struct ZiParseWinEventLog {
    field: String,
    mapping: Arc<ZiFieldMappingTable>,
}

impl ZiParseWinEventLog {
    #[allow(non_snake_case)]
    pub fn new(field: impl Into<String>, mapping: Arc<ZiFieldMappingTable>) -> Self {
        Self {
            field: field.into(),
            mapping,
        }
    }
}

impl ZiFunction for ZiParseWinEventLog {
    fn name(&self) -> &'static str {
        "parse_win_event_log"
    }

    fn apply(&self, event: ZiEvent) -> Result<ZiEvent> {
        match get_value(&event, &self.field) {
            Some(Value::String(text)) => Ok(parse_event_log_text(text, &self.mapping)),
            None => Err(ZiError::not_found(&self.field)),
            Some(other) => Err(ZiError::field_type(
                &self.field,
                value_type_name(other),
                "string",
            )),
        }
    }
}

#[allow(non_snake_case)]
pub fn parse_win_event_log_factory(
    args: &Value,
    context: &ZiFunctionContext,
) -> Result<Box<dyn ZiFunction + Send + Sync>> {
    let empty = Map::new();
    let obj = args_object("parse_win_event_log", args, &empty)?;
    let field = required_str("parse_win_event_log", obj, "field")?;
    Ok(Box::new(ZiParseWinEventLog::new(
        field,
        Arc::clone(&context.mapping),
    )))
}
