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

//! # DSL (Domain Specific Language) Module
//!
//! Zinorm pipelines can be written in two forms that describe the same
//! [`ZiParserConfig`]:
//!
//! - **Structured**: JSON or YAML with `steps` and `args` keys, loaded through
//!   [`ZiParserConfig`]
//! - **Query**: a pipe-delimited text query compiled by
//!   [`ZiQueryNormalizer`]
//!
//! ## Usage Example (JSON)
//!
//! ```json
//! {
//!   "steps": ["parse_json", "rename"],
//!   "args": {
//!     "parse_json": {"field": "raw"},
//!     "rename": {"from_field": "event.user", "to_field": "user.name"}
//!   }
//! }
//! ```
//!
//! ## Usage Example (Query)
//!
//! ```text
//! parse_json(field="raw")            # decode the payload
//! | rename(from="event.user", to="user.name")
//! | set(field="event.type", value="http_access")
//! ```

pub mod config;
pub mod normalizer;

pub use config::ZiParserConfig;
pub use normalizer::{strip_comments, ZiNormalizeResult, ZiQueryNormalizer};
