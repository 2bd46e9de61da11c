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

//! # Zinorm Error Module
//!
//! This module defines the error types used throughout Zinorm for consistent
//! error handling and reporting.
//!
//! ## Error Handling Philosophy
//!
//! - **Explicit Error Types**: Each variant names one way a step can fail, so
//!   callers can match on the failure instead of parsing messages
//! - **Context-Rich**: Errors carry the field path, pattern, or step name that
//!   was involved
//! - **No Local Recovery**: Field addressing and the function library never
//!   catch their own errors; the pipeline manager is the single place where a
//!   failure is either propagated or suppressed
//! - **Serde Support**: Errors can be serialized for structured logging
//!
//! ## Error Categories
//!
//! - **FieldType**: Addressed value has the wrong type for the operation
//! - **NotFound** / **NoMatch**: A required field or regex match is absent
//! - **Parse**: Embedded JSON is malformed or has an unsupported shape
//! - **TypeMismatch**: `extract` target is not a map
//! - **UnknownStep** / **UnknownParser**: Configuration references a name that
//!   is not registered
//! - **InvalidArgument** / **InvalidPattern**: A step was configured with
//!   missing or unusable arguments
//! - **FlattenCollision**: Flattening would emit the same dotted key twice
//! - **Mapping**, **Io**, **Serde**: Resource and configuration loading

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Zinorm.
pub type Result<T> = std::result::Result<T, ZiError>;

/// Canonical error enumeration for Zinorm.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ZiError {
    /// The addressed value has the wrong type for the operation.
    #[error("field '{field}' has type {found}, expected {expected}")]
    FieldType {
        field: String,
        found: String,
        expected: String,
    },

    /// A required field is absent.
    #[error("field '{field}' not found in event")]
    NotFound { field: String },

    /// A regular expression did not match, or the field it targets is absent.
    #[error("failed to find pattern match '{pattern}' in field '{field}' with value '{value}'")]
    NoMatch {
        field: String,
        pattern: String,
        value: String,
    },

    /// Embedded JSON could not be decoded or decoded to an unsupported shape.
    #[error("failed to load JSON from field '{field}': {message}")]
    Parse { field: String, message: String },

    /// The target of `extract` is not a map.
    #[error("field '{field}' does not contain a dictionary")]
    TypeMismatch { field: String },

    /// A pipeline references a step that is not registered.
    #[error("function '{step}' not found")]
    UnknownStep { step: String },

    /// No predefined parser is registered under the requested name.
    #[error("parser '{name}' not found")]
    UnknownParser { name: String },

    /// A step received missing or ill-typed arguments.
    #[error("invalid arguments for '{step}': {message}")]
    InvalidArgument { step: String, message: String },

    /// A `regex` step was configured with a pattern that does not compile.
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Flattening produced the same dotted key from two different paths.
    #[error("flattening produced duplicate key '{key}'")]
    FlattenCollision { key: String },

    /// The field remapping table resource is malformed.
    #[error("field mapping error: {0}")]
    Mapping(String),

    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),
}

impl From<io::Error> for ZiError {
    fn from(err: io::Error) -> Self {
        ZiError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ZiError {
    fn from(err: serde_json::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for ZiError {
    fn from(err: serde_yaml::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl From<csv::Error> for ZiError {
    fn from(err: csv::Error) -> Self {
        ZiError::Mapping(err.to_string())
    }
}

/// Longest field value quoted verbatim inside a [`ZiError::NoMatch`] message.
const MAX_QUOTED_VALUE: usize = 100;

impl ZiError {
    /// Helper to construct field type errors.
    pub fn field_type(
        field: impl Into<String>,
        found: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        ZiError::FieldType {
            field: field.into(),
            found: found.into(),
            expected: expected.into(),
        }
    }

    /// Helper to construct not-found errors.
    pub fn not_found(field: impl Into<String>) -> Self {
        ZiError::NotFound {
            field: field.into(),
        }
    }

    /// Helper to construct no-match errors; long values are truncated.
    pub fn no_match(field: impl Into<String>, pattern: impl Into<String>, value: &str) -> Self {
        let value = match value.char_indices().nth(MAX_QUOTED_VALUE) {
            Some((cut, _)) => format!("{}...", &value[..cut]),
            None => value.to_string(),
        };
        ZiError::NoMatch {
            field: field.into(),
            pattern: pattern.into(),
            value,
        }
    }

    /// Helper to construct JSON parse errors.
    pub fn parse(field: impl Into<String>, message: impl Into<String>) -> Self {
        ZiError::Parse {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Helper to construct extract type mismatch errors.
    pub fn type_mismatch(field: impl Into<String>) -> Self {
        ZiError::TypeMismatch {
            field: field.into(),
        }
    }

    /// Helper to construct unknown step errors.
    pub fn unknown_step(step: impl Into<String>) -> Self {
        ZiError::UnknownStep { step: step.into() }
    }

    /// Helper to construct invalid argument errors.
    pub fn invalid_argument(step: impl Into<String>, message: impl Into<String>) -> Self {
        ZiError::InvalidArgument {
            step: step.into(),
            message: message.into(),
        }
    }
}
