//! Resolution of free-text legacy references to canonical identifiers.

use crate::missing::MissingContext;
use crate::table::{IdentifierTable, split_identifiers};
use crate::text::sanitize;
use crate::types::{ReferenceCategory, ResolvedReference};

/// Resolves reference values against an [`IdentifierTable`] and records every
/// miss in the [`MissingContext`] it owns.
#[derive(Debug)]
pub struct ReferenceResolver<'t> {
    table: &'t IdentifierTable,
    missing: MissingContext,
    resolved: usize,
}

impl<'t> ReferenceResolver<'t> {
    #[must_use]
    pub fn new(table: &'t IdentifierTable) -> Self {
        Self {
            table,
            missing: MissingContext::new(),
            resolved: 0,
        }
    }

    /// Resolve one legacy value.
    ///
    /// The value is looked up as-is, then as `"{value} - {disambiguator}"`.
    /// On a double miss the disambiguator is recorded under
    /// `(category, value)` and an empty list is returned. On a hit the stored
    /// identifiers are returned in stored order, each with its display name.
    pub fn resolve(
        &mut self,
        category: ReferenceCategory,
        legacy_value: &str,
        disambiguator: &str,
    ) -> Vec<ResolvedReference> {
        let Some(raw) = self.lookup(legacy_value, disambiguator) else {
            self.missing
                .record_miss(category, legacy_value, disambiguator);
            // Targets miss far more often than anything else; keep them quiet.
            if category == ReferenceCategory::Target {
                tracing::debug!(%category, legacy_value, disambiguator, "missing ref");
            } else {
                tracing::info!(%category, legacy_value, disambiguator, "missing ref");
            }
            return Vec::new();
        };

        self.resolved += 1;
        split_identifiers(raw)
            .map(|identifier| {
                let display_name = self.table.display_name(identifier);
                if display_name.is_none() {
                    tracing::error!(identifier, "missing display name for identifier");
                }
                ResolvedReference {
                    identifier: sanitize(identifier),
                    display_name: display_name.map(sanitize),
                }
            })
            .collect()
    }

    fn lookup(&self, legacy_value: &str, disambiguator: &str) -> Option<&'t str> {
        let table = self.table;
        table.forward_lookup(legacy_value).or_else(|| {
            if disambiguator.is_empty() {
                None
            } else {
                table.forward_lookup(&format!("{legacy_value} - {disambiguator}"))
            }
        })
    }

    #[must_use]
    pub fn missing(&self) -> &MissingContext {
        &self.missing
    }

    /// Number of values that resolved to at least a raw table entry.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.resolved
    }

    #[must_use]
    pub fn into_missing(self) -> MissingContext {
        self.missing
    }
}
