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

//! # Query Normalizer
//!
//! Compiles a pipe-delimited query into a [`ZiParserConfig`].
//!
//! ```text
//! parse_json(field="raw")                       # decode the payload
//! | regex(pattern="^(?P<ip>\S+) ", field="log")
//! | drop(fields="event.count")
//! ```
//!
//! ## Compilation Steps
//!
//! 1. Comments are stripped per line. An unquoted `#` ends the line; a `#`
//!    inside a double-quoted literal is kept. A backslash escapes the next
//!    character. Lines left blank are removed.
//! 2. The text is split on `|` and each trimmed, non-empty segment is matched
//!    against the known step names by prefix.
//! 3. The step's argument grammar extracts its arguments. Whitespace around
//!    `(`, `)`, `=` and `,` is free.
//!
//! ## Step Grammars
//!
//! | Step | Arguments |
//! |---|---|
//! | `parse_json` | `field="…"` then optional `in_place=true\|false` (case-insensitive) |
//! | `regex` | `pattern="…"` and `field="…"`, either order |
//! | `rename` | `from="…"`, `to="…"` (stored as `from_field`/`to_field`) |
//! | `drop` | `fields="…"` |
//! | `set` | `field="…"`, `value="…"` |
//! | `extract` | `field="…"` |
//! | `parse_win_event_log` | `field="…"` |
//!
//! Field paths may contain letters, digits, `_`, `.` and `-`.
//!
//! ## Error Policy
//!
//! Compilation never fails. Unknown steps and segments whose arguments do not
//! fit the grammar are left out of the config; each omission is logged at
//! debug level and reported in [`ZiNormalizeResult::warnings`].

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::dsl::config::ZiParserConfig;

const STEP_SEPARATOR: char = '|';

/// Characters that end a query line, including lone carriage returns and the
/// Unicode line and paragraph separators.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}', '\u{2029}',
];

static PARSE_JSON_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)parse_json\s*\(\s*field\s*=\s*"(?P<field>[a-zA-Z0-9_\.\-]*)"(?:\s*,\s*in_place\s*=\s*(?P<in_place>true|false))?\s*\)"#,
    )
    .expect("PARSE_JSON_PATTERN pattern is valid")
});

static REGEX_PATTERN_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"regex\s*\(\s*pattern\s*=\s*"(?P<pattern>.*?)"\s*,\s*field\s*=\s*"(?P<field>[a-zA-Z0-9_\.\-]*)"\s*\)"#,
    )
    .expect("REGEX_PATTERN_FIRST pattern is valid")
});

static REGEX_FIELD_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"regex\s*\(\s*field\s*=\s*"(?P<field>[a-zA-Z0-9_\.\-]*)"\s*,\s*pattern\s*=\s*"(?P<pattern>.*?)"\s*\)"#,
    )
    .expect("REGEX_FIELD_FIRST pattern is valid")
});

static RENAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"rename\s*\(\s*from\s*=\s*"(?P<from>[a-zA-Z0-9_\.\-]*)"\s*,\s*to\s*=\s*"(?P<to>[a-zA-Z0-9_\.\-]*)"\s*\)"#,
    )
    .expect("RENAME_PATTERN pattern is valid")
});

static DROP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"drop\s*\(\s*fields\s*=\s*"(?P<fields>[a-zA-Z0-9_\.\-]*)"\s*\)"#)
        .expect("DROP_PATTERN pattern is valid")
});

static SET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"set\s*\(\s*field\s*=\s*"(?P<field>[a-zA-Z0-9_\.\-]*)"\s*,\s*value\s*=\s*"(?P<value>.*?)"\s*\)"#,
    )
    .expect("SET_PATTERN pattern is valid")
});

static WIN_EVENT_LOG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"parse_win_event_log\s*\(\s*field\s*=\s*"(?P<field>[a-zA-Z0-9_\.\-]*)"\s*\)"#)
        .expect("WIN_EVENT_LOG_PATTERN pattern is valid")
});

static EXTRACT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"extract\s*\(\s*field\s*=\s*"(?P<field>[a-zA-Z0-9_\.\-]*)"\s*\)"#)
        .expect("EXTRACT_PATTERN pattern is valid")
});

type ZiArgsMatcher = fn(&str) -> Option<Map<String, Value>>;

/// Known steps in the order segments are tested against them.
static MATCHERS: [(&str, ZiArgsMatcher); 7] = [
    ("parse_json", match_parse_json),
    ("regex", match_regex),
    ("rename", match_rename),
    ("drop", match_drop),
    ("set", match_set),
    ("parse_win_event_log", match_parse_win_event_log),
    ("extract", match_extract),
];

fn group(caps: &Captures<'_>, name: &str) -> Value {
    Value::String(caps.name(name).map_or("", |m| m.as_str()).to_string())
}

fn args_from(caps: &Captures<'_>, pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(key, name)| (key.to_string(), group(caps, name)))
        .collect()
}

fn match_parse_json(segment: &str) -> Option<Map<String, Value>> {
    let caps = PARSE_JSON_PATTERN.captures(segment)?;
    let mut args = args_from(&caps, &[("field", "field")]);
    if let Some(flag) = caps.name("in_place") {
        args.insert(
            "in_place".to_string(),
            Value::Bool(flag.as_str().eq_ignore_ascii_case("true")),
        );
    }
    Some(args)
}

fn match_regex(segment: &str) -> Option<Map<String, Value>> {
    let caps = REGEX_PATTERN_FIRST
        .captures(segment)
        .or_else(|| REGEX_FIELD_FIRST.captures(segment))?;
    Some(args_from(&caps, &[("pattern", "pattern"), ("field", "field")]))
}

fn match_rename(segment: &str) -> Option<Map<String, Value>> {
    let caps = RENAME_PATTERN.captures(segment)?;
    Some(args_from(&caps, &[("from_field", "from"), ("to_field", "to")]))
}

fn match_drop(segment: &str) -> Option<Map<String, Value>> {
    let caps = DROP_PATTERN.captures(segment)?;
    Some(args_from(&caps, &[("fields", "fields")]))
}

fn match_set(segment: &str) -> Option<Map<String, Value>> {
    let caps = SET_PATTERN.captures(segment)?;
    Some(args_from(&caps, &[("field", "field"), ("value", "value")]))
}

fn match_parse_win_event_log(segment: &str) -> Option<Map<String, Value>> {
    let caps = WIN_EVENT_LOG_PATTERN.captures(segment)?;
    Some(args_from(&caps, &[("field", "field")]))
}

fn match_extract(segment: &str) -> Option<Map<String, Value>> {
    let caps = EXTRACT_PATTERN.captures(segment)?;
    Some(args_from(&caps, &[("field", "field")]))
}

/// Removes `#` comments, keeping `#` characters inside double-quoted
/// literals, and drops lines that end up blank.
pub fn strip_comments(query: &str) -> String {
    let mut lines = Vec::new();
    for line in query.split(LINE_BREAKS) {
        let mut inside_string = false;
        let mut escape_next = false;
        let mut comment_start = None;

        for (idx, ch) in line.char_indices() {
            if escape_next {
                escape_next = false;
                continue;
            }
            match ch {
                '\\' => escape_next = true,
                '"' => inside_string = !inside_string,
                '#' if !inside_string => {
                    comment_start = Some(idx);
                    break;
                }
                _ => {}
            }
        }

        let kept = match comment_start {
            Some(idx) => line[..idx].trim_end(),
            None => line,
        };
        if !kept.trim().is_empty() {
            lines.push(kept);
        }
    }
    lines.join("\n")
}

/// Compiled config plus the segments that were left out.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZiNormalizeResult {
    pub config: ZiParserConfig,
    pub warnings: Vec<String>,
}

/// Compiles text queries into [`ZiParserConfig`] values.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZiQueryNormalizer;

impl ZiQueryNormalizer {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        Self
    }

    /// Step names the normalizer understands, in matching order.
    pub fn known_steps() -> Vec<&'static str> {
        MATCHERS.iter().map(|(name, _)| *name).collect()
    }

    pub fn normalize(&self, query: &str) -> ZiParserConfig {
        self.normalize_with_warnings(query).config
    }

    pub fn normalize_with_warnings(&self, query: &str) -> ZiNormalizeResult {
        let stripped = strip_comments(query);
        let mut result = ZiNormalizeResult::default();

        for segment in stripped.split(STEP_SEPARATOR) {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            match Self::normalize_segment(segment) {
                Ok((name, args)) => {
                    result.config.args.insert(name.to_string(), Value::Object(args));
                    result.config.steps.push(name.to_string());
                }
                Err(warning) => {
                    log::debug!("{warning}");
                    result.warnings.push(warning);
                }
            }
        }
        result
    }

    /// Tries every step whose name prefixes `segment`, in registry order, and
    /// keeps the first whose grammar matches.
    fn normalize_segment(
        segment: &str,
    ) -> std::result::Result<(&'static str, Map<String, Value>), String> {
        let mut candidates = MATCHERS
            .iter()
            .filter(|(name, _)| segment.starts_with(name))
            .peekable();

        let Some((first, _)) = candidates.peek().copied() else {
            return Err(format!("dropping segment '{segment}': unknown step"));
        };

        candidates
            .find_map(|(name, matcher)| matcher(segment).map(|args| (*name, args)))
            .ok_or_else(|| {
                format!("dropping segment '{segment}': arguments do not match the '{first}' grammar")
            })
    }
}
