//! Accumulates unresolved references for the end-of-run audit report.

use std::io::Write;

use indexmap::IndexMap;

use crate::constants::REPORT_HEADER;
use crate::error::{ExportError, Result};
use crate::types::ReferenceCategory;

/// Every resolution miss of one run, keyed by `(category, legacy value)`.
///
/// Disambiguators are appended on every miss, repeats included, so the list
/// length is the true occurrence count. Entries iterate in order of their
/// first miss.
#[derive(Debug, Clone, Default)]
pub struct MissingContext {
    entries: IndexMap<(ReferenceCategory, String), Vec<String>>,
}

/// Borrowed view of one report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingEntry<'a> {
    pub category: ReferenceCategory,
    pub legacy_value: &'a str,
    pub disambiguators: &'a [String],
}

impl MissingContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_miss(
        &mut self,
        category: ReferenceCategory,
        legacy_value: &str,
        disambiguator: &str,
    ) {
        self.entries
            .entry((category, legacy_value.to_string()))
            .or_default()
            .push(disambiguator.to_string());
    }

    pub fn entries(&self) -> impl Iterator<Item = MissingEntry<'_>> {
        self.entries
            .iter()
            .map(|((category, legacy_value), disambiguators)| MissingEntry {
                category: *category,
                legacy_value,
                disambiguators,
            })
    }

    #[must_use]
    pub fn get(&self, category: ReferenceCategory, legacy_value: &str) -> Option<&[String]> {
        self.entries
            .get(&(category, legacy_value.to_string()))
            .map(Vec::as_slice)
    }

    /// Distinct `(category, legacy value)` pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total misses recorded, repeats included.
    #[must_use]
    pub fn total_misses(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Write the report: a header row, then one CSV row per entry with the
    /// disambiguators joined by newlines in a single quoted field.
    pub fn emit_report<W: Write>(&self, sink: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(sink);
        writer.write_record(REPORT_HEADER).map_err(report_error)?;
        for entry in self.entries() {
            let joined = entry.disambiguators.join("\n");
            writer
                .write_record([entry.category.ref_field(), entry.legacy_value, joined.as_str()])
                .map_err(report_error)?;
        }
        writer.flush()?;
        tracing::info!(
            distinct = self.len(),
            total = self.total_misses(),
            "wrote missing-context report"
        );
        Ok(())
    }
}

fn report_error(err: csv::Error) -> ExportError {
    ExportError::sink_write(format!("failed to write missing-context report: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeats_are_kept() {
        let mut missing = MissingContext::new();
        missing.record_miss(ReferenceCategory::Target, "VESTA", "DS-9");
        missing.record_miss(ReferenceCategory::Target, "VESTA", "DS-9");
        missing.record_miss(ReferenceCategory::Target, "VESTA", "DS-3");

        assert_eq!(missing.len(), 1);
        assert_eq!(missing.total_misses(), 3);
        assert_eq!(
            missing.get(ReferenceCategory::Target, "VESTA"),
            Some(&["DS-9".to_string(), "DS-9".to_string(), "DS-3".to_string()][..])
        );
    }

    #[test]
    fn same_name_under_two_categories_is_two_entries() {
        let mut missing = MissingContext::new();
        missing.record_miss(ReferenceCategory::Target, "MARS", "DS-1");
        missing.record_miss(ReferenceCategory::InstrumentHost, "MARS", "DS-1");
        assert_eq!(missing.len(), 2);
    }

    #[test]
    fn report_rows_follow_first_miss_order() {
        let mut missing = MissingContext::new();
        missing.record_miss(ReferenceCategory::Instrument, "CAM", "DS-1");
        missing.record_miss(ReferenceCategory::Target, "VESTA", "DS-9");
        missing.record_miss(ReferenceCategory::Instrument, "CAM", "DS-2");

        let mut out = Vec::new();
        missing.emit_report(&mut out).expect("report");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(
            text,
            "reference_type,pds3_name,data_set_ids\n\
             instrument_ref,CAM,\"DS-1\nDS-2\"\n\
             target_ref,VESTA,DS-9\n"
        );
    }

    #[test]
    fn empty_report_has_header_only() {
        let mut out = Vec::new();
        MissingContext::new().emit_report(&mut out).expect("report");
        assert_eq!(out, b"reference_type,pds3_name,data_set_ids\n");
    }
}
