//! Lookup table from legacy object names to canonical identifiers.
//!
//! The table is built once per run and is read-only afterwards. Two indexes
//! are kept:
//! - forward: legacy name → raw identifier value (possibly comma-joined)
//! - display: identifier key → display name, in first-insertion order with
//!   the last write for a repeated key winning

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;

use crate::constants::{
    TABLE_DISPLAY_NAME_COLUMN, TABLE_IDENTIFIER_COLUMN, TABLE_LEGACY_NAME_COLUMN,
};
use crate::error::{ExportError, Result};
use crate::reader::{RawTable, read_table};

/// One logical row of the identifier table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub legacy_name: String,
    pub identifier: String,
    pub display_name: String,
}

impl TableRow {
    #[must_use]
    pub fn new(
        legacy_name: impl Into<String>,
        identifier: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            legacy_name: legacy_name.into(),
            identifier: identifier.into(),
            display_name: display_name.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IdentifierTable {
    forward: HashMap<String, String>,
    display: IndexMap<String, Option<String>>,
}

impl IdentifierTable {
    /// Load the table from a CSV or spreadsheet file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = read_table(path).map_err(|err| match err {
            ExportError::Io(io) => {
                ExportError::data_load(format!("{}: {io}", path.display()))
            }
            other => other,
        })?;
        let table = Self::from_raw(&raw)?;
        tracing::info!(
            path = %path.display(),
            legacy_names = table.forward.len(),
            identifiers = table.display.len(),
            "loaded identifier table"
        );
        Ok(table)
    }

    /// Build the table from an already-read header + rows.
    pub fn from_raw(raw: &RawTable) -> Result<Self> {
        let columns = [
            TABLE_LEGACY_NAME_COLUMN,
            TABLE_IDENTIFIER_COLUMN,
            TABLE_DISPLAY_NAME_COLUMN,
        ];
        let missing: Vec<&str> = columns
            .iter()
            .copied()
            .filter(|name| raw.column(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ExportError::data_load(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }

        let (Some(legacy_col), Some(id_col), Some(name_col)) = (
            raw.column(TABLE_LEGACY_NAME_COLUMN),
            raw.column(TABLE_IDENTIFIER_COLUMN),
            raw.column(TABLE_DISPLAY_NAME_COLUMN),
        ) else {
            return Err(ExportError::data_load("missing required columns"));
        };

        Ok(Self::from_rows(raw.rows.iter().map(|row| {
            TableRow::new(
                raw.cell(row, legacy_col),
                raw.cell(row, id_col),
                raw.cell(row, name_col),
            )
        })))
    }

    /// Build the table from logical rows, in source order.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = TableRow>,
    {
        let mut table = Self::default();
        for row in rows {
            if row.identifier.is_empty() {
                if !row.legacy_name.is_empty() {
                    tracing::debug!(legacy_name = %row.legacy_name, "table row without identifier");
                }
                continue;
            }
            let display_name = (!row.display_name.is_empty()).then_some(row.display_name);
            table.display.insert(row.identifier.clone(), display_name);
            if !row.legacy_name.is_empty() {
                table.forward.insert(row.legacy_name, row.identifier);
            }
        }
        table
    }

    /// Raw identifier value stored for a legacy name. May hold several
    /// comma-separated identifiers; see [`split_identifiers`].
    #[must_use]
    pub fn forward_lookup(&self, legacy_name: &str) -> Option<&str> {
        self.forward.get(legacy_name).map(String::as_str)
    }

    /// Display name for a single identifier.
    ///
    /// Exact key match first; a key stored with an empty name yields `None`.
    /// Only when the key is absent, the first key in table order that
    /// contains `identifier` as a substring, which finds identifiers that were
    /// only ever stored inside a comma-joined composite key.
    #[must_use]
    pub fn display_name(&self, identifier: &str) -> Option<&str> {
        if let Some(entry) = self.display.get(identifier) {
            return entry.as_deref();
        }
        if identifier.is_empty() {
            return None;
        }
        self.display
            .iter()
            .filter(|(key, _)| key.contains(identifier))
            .find_map(|(_, name)| name.as_deref())
    }

    /// Number of distinct legacy names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Split a raw forward-index value into its identifiers, in stored order.
pub fn split_identifiers(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|id| !id.is_empty())
}
