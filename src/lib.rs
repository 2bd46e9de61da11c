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

//! # Zinorm Core Library
//!
//! This is the main library entry point for Zinorm, an event normalization
//! library. Zinorm runs semi-structured events (nested key/value maps)
//! through chains of small transform steps: decoding embedded JSON,
//! extracting fields with regular expressions, moving and dropping fields,
//! and parsing Windows Event Log text into structured records.
//!
//! ## Module Overview
//!
//! - **event**: The `ZiEvent` map type and value helpers
//! - **field**: Dot-path field addressing (`get_value`, `set_value`,
//!   `delete_value`) and flattening
//! - **function**: The `ZiFunction` trait implemented by every step
//! - **functions**: Bundled steps and the name-keyed function registry
//! - **dsl**: Structured pipeline configs and the text query normalizer
//! - **manager**: Pipeline execution, error suppression, predefined parsers
//!
//! ## Feature Flags
//!
//! - `parallel` (default): Process event batches with Rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use zinorm::{ZiParserManager, ZiRunOptions};
//!
//! let manager = ZiParserManager::new();
//! let config = manager.query_parser(
//!     r#"parse_json(field="raw") | extract(field="user") | drop(fields="debug")"#,
//! );
//!
//! let event = json!({"raw": "{\"user\": {\"name\": \"J\"}, \"debug\": true}"})
//!     .as_object()
//!     .cloned()
//!     .unwrap_or_default();
//!
//! let parsed = manager.configured_parser(&event, &config, &ZiRunOptions::default());
//! assert_eq!(parsed.ok(), json!({"name": "J"}).as_object().cloned());
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return `Result<T, ZiError>`. Steps never recover
//! from their own failures; `ZiParserManager` either returns the error or,
//! with `suppress_errors`, hands back the untouched input event. The query
//! normalizer and the Windows Event Log parser are best-effort and never
//! fail.

pub mod dsl;
pub mod errors;
pub mod event;
pub mod field;
pub mod function;
pub mod functions;
pub mod manager;

pub use dsl::{ZiNormalizeResult, ZiParserConfig, ZiQueryNormalizer};
pub use errors::{Result, ZiError};
pub use event::ZiEvent;
pub use field::{delete_value, flatten_event, get_value, set_value};
pub use function::{ZiFunction, ZiFunctionContext, ZiFunctionFactory};
pub use functions::win_event_log::mapping::ZiFieldMappingTable;
pub use functions::win_event_log::parse_event_log_text;
pub use functions::ZiFunctionRegistry;
pub use manager::{ZiParserManager, ZiRunOptions};
