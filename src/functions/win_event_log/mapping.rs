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

//! # Field Remapping Table
//!
//! Maps `(event id, section, viewer field name)` to the canonical field name
//! used in parsed Windows Event Log records, e.g.
//! `("4648", "Subject", "Account Name") -> "SubjectUserName"`.
//!
//! The table is read from CSV with the columns
//! `event_id, sigma_field, viewer_field_group, viewer_field_name`. A copy of
//! the bundled table is compiled into the crate and parsed once per process
//! by [`ZiFieldMappingTable::bundled`].

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::Deserialize;

use crate::errors::Result;

const BUNDLED_TABLE: &str = include_str!("../../../resources/field_mapping.csv");

static BUNDLED: OnceLock<Arc<ZiFieldMappingTable>> = OnceLock::new();

#[derive(Debug, Deserialize)]
struct ZiFieldMappingRow {
    event_id: String,
    sigma_field: String,
    viewer_field_group: String,
    viewer_field_name: String,
}

type ZiSectionFields = HashMap<String, HashMap<String, String>>;

/// Immutable lookup from viewer field names to canonical field names.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZiFieldMappingTable {
    events: HashMap<String, ZiSectionFields>,
}

impl ZiFieldMappingTable {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide table built from the bundled resource.
    ///
    /// A malformed bundled resource is logged and replaced by an empty table,
    /// so section fields are then dropped instead of remapped.
    pub fn bundled() -> Arc<Self> {
        BUNDLED
            .get_or_init(|| {
                let table = Self::from_reader(BUNDLED_TABLE.as_bytes()).unwrap_or_else(|err| {
                    log::error!("failed to load bundled field mapping table: {err}");
                    Self::new()
                });
                Arc::new(table)
            })
            .clone()
    }

    /// Parses a CSV table. Cells are trimmed; rows with a blank cell are
    /// skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut table = Self::new();
        for row in csv_reader.deserialize() {
            let row: ZiFieldMappingRow = row?;
            if row.event_id.is_empty()
                || row.sigma_field.is_empty()
                || row.viewer_field_group.is_empty()
                || row.viewer_field_name.is_empty()
            {
                continue;
            }
            table.insert(
                row.event_id,
                row.viewer_field_group,
                row.viewer_field_name,
                row.sigma_field,
            );
        }
        Ok(table)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Adds one mapping, replacing an earlier one for the same key.
    pub fn insert(
        &mut self,
        event_id: impl Into<String>,
        section: impl Into<String>,
        viewer_field: impl Into<String>,
        canonical_field: impl Into<String>,
    ) {
        self.events
            .entry(event_id.into())
            .or_default()
            .entry(section.into())
            .or_default()
            .insert(viewer_field.into(), canonical_field.into());
    }

    pub fn lookup(&self, event_id: &str, section: &str, viewer_field: &str) -> Option<&str> {
        self.events
            .get(event_id)?
            .get(section)?
            .get(viewer_field)
            .map(String::as_str)
    }

    /// Number of mappings across all events and sections.
    pub fn len(&self) -> usize {
        self.events
            .values()
            .flat_map(|sections| sections.values())
            .map(|fields| fields.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Event ids with at least one mapping, sorted.
    pub fn event_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.events.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
