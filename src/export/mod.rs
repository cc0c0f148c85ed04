//! The document export pipeline.
//!
//! Records are pulled one at a time, rendered to a `<doc>` element with
//! references resolved and text sanitized, and appended to the current batch
//! file. Every `batch_size` documents the batch file is closed and the next
//! one opened. After the last record the missing-context report is written.

mod batch;
mod document;
mod sink;

use std::borrow::Cow;

use serde::Serialize;
use uuid::Uuid;

pub use sink::{DirectorySink, SinkFactory};

use self::batch::BatchWriter;
use self::document::DocumentWriter;
use crate::constants::{FILE_REF_URL_FIELD, IDENTIFIER_FIELD, LID_FIELD, PACKAGE_ID_FIELD};
use crate::error::Result;
use crate::missing::MissingContext;
use crate::resolver::ReferenceResolver;
use crate::table::IdentifierTable;
use crate::text::sanitize;
use crate::types::{ExportOptions, LegacyRecord, ReferenceCategory};

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub package_id: Uuid,
    pub documents: usize,
    pub batch_files: usize,
    /// Reference values that resolved to a table entry.
    pub resolved_references: usize,
    /// Reference values that did not resolve, repeats included.
    pub misses: usize,
    /// Distinct `(category, legacy value)` pairs among the misses.
    pub distinct_misses: usize,
}

/// One export run over a record stream.
///
/// The pipeline owns the resolver, and with it the run's
/// [`MissingContext`]; it is consumed by [`ExportPipeline::run`].
pub struct ExportPipeline<'t> {
    resolver: ReferenceResolver<'t>,
    options: ExportOptions,
}

impl<'t> ExportPipeline<'t> {
    pub fn new(table: &'t IdentifierTable, options: ExportOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            resolver: ReferenceResolver::new(table),
            options,
        })
    }

    #[must_use]
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    #[must_use]
    pub fn missing(&self) -> &MissingContext {
        self.resolver.missing()
    }

    /// Export every record, then write the missing-context report.
    ///
    /// Any record-source or sink error aborts the run. Batch files finished
    /// before the error stay valid; the file that was open is closed as-is.
    pub fn run<I, F>(mut self, records: I, sinks: &mut F) -> Result<ExportSummary>
    where
        I: IntoIterator<Item = Result<LegacyRecord>>,
        F: SinkFactory,
    {
        let batch_size = self.options.batch_size;
        let mut current: Option<BatchWriter<F::Batch>> = None;
        let mut documents = 0usize;
        let mut batch_files = 0usize;

        tracing::info!(
            package_id = %self.options.package_id,
            batch_size,
            "starting export"
        );

        for record in records {
            let record = record?;
            if documents % batch_size == 0 {
                if let Some(done) = current.take() {
                    done.finish()?;
                }
                batch_files += 1;
                current = Some(BatchWriter::open(sinks.open_batch(batch_files)?, batch_files)?);
            }
            let document = self.render(&record)?;
            if let Some(batch) = current.as_mut() {
                batch.write_document(&document)?;
            }
            documents += 1;
        }

        if let Some(done) = current.take() {
            done.finish()?;
        }

        let resolved_references = self.resolver.resolved_count();
        let missing = self.resolver.into_missing();
        missing.emit_report(sinks.open_report()?)?;

        let summary = ExportSummary {
            package_id: self.options.package_id,
            documents,
            batch_files,
            resolved_references,
            misses: missing.total_misses(),
            distinct_misses: missing.len(),
        };
        tracing::info!(
            documents = summary.documents,
            batch_files = summary.batch_files,
            misses = summary.misses,
            "export finished"
        );
        Ok(summary)
    }

    /// Render one record as a complete `<doc>` element.
    ///
    /// Field order: `package_id`, the record identifier as `lid`, then the
    /// remaining fields in source order, one `<field>` per value.
    pub fn render(&mut self, record: &LegacyRecord) -> Result<Vec<u8>> {
        let mut doc = DocumentWriter::new()?;
        doc.field_text(PACKAGE_ID_FIELD, &self.options.package_id.to_string())?;
        match record.values(IDENTIFIER_FIELD) {
            Some(ids) => {
                for id in ids {
                    doc.field_text(LID_FIELD, id)?;
                }
            }
            None => tracing::warn!("record without identifier"),
        }

        let disambiguator = record.disambiguator().unwrap_or_default();
        for field in record.fields() {
            let name = field.name.as_str();
            if name == IDENTIFIER_FIELD || self.options.is_skipped(name) {
                continue;
            }

            if let Some(category) = ReferenceCategory::from_source_field(name) {
                for value in &field.values {
                    let refs = self.resolver.resolve(category, value, disambiguator);
                    // One ref/facet pair per value, from the first identifier.
                    if let Some(first) = refs.first() {
                        doc.field_escaped(category.ref_field(), &first.identifier)?;
                        if let Some(display_name) = &first.display_name {
                            doc.field_escaped(category.facet_field(), display_name)?;
                        }
                    }
                    if self.options.keep_legacy_reference_values {
                        doc.field_escaped(name, &sanitize(value))?;
                    }
                }
                continue;
            }

            for value in &field.values {
                let value = if name == FILE_REF_URL_FIELD {
                    self.options.rewrite_file_url(value)
                } else {
                    Cow::Borrowed(value.as_str())
                };
                doc.field_escaped(name, &sanitize(&value))?;
            }
        }

        tracing::trace!(
            identifier = record.identifier(),
            fields = doc.field_count(),
            "rendered document"
        );
        doc.finish()
    }
}

/// Run an export with a fresh pipeline.
pub fn run<I, F>(
    records: I,
    table: &IdentifierTable,
    options: ExportOptions,
    sinks: &mut F,
) -> Result<ExportSummary>
where
    I: IntoIterator<Item = Result<LegacyRecord>>,
    F: SinkFactory,
{
    ExportPipeline::new(table, options)?.run(records, sinks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableRow;

    fn table() -> IdentifierTable {
        IdentifierTable::from_rows([
            TableRow::new("MRO CAMERA X", "urn:p:inst:x", "Camera X"),
            TableRow::new(
                "MRO",
                "urn:p:host:mro,urn:p:host:mro2",
                "Mars Reconnaissance Orbiter",
            ),
        ])
    }

    fn options() -> ExportOptions {
        ExportOptions::builder()
            .package_id(Uuid::nil())
            .build()
            .expect("options")
    }

    fn render(pipeline: &mut ExportPipeline<'_>, record: &LegacyRecord) -> String {
        String::from_utf8(pipeline.render(record).expect("render")).expect("utf8")
    }

    #[test]
    fn resolved_reference_writes_ref_and_facet() {
        let table = table();
        let mut pipeline = ExportPipeline::new(&table, options()).expect("pipeline");
        let record = LegacyRecord::new()
            .with_field("instrument_name", ["MRO CAMERA X"])
            .with_field("identifier", ["urn:nasa:pds:ds1"])
            .with_field("data_set_id", ["DS-1"]);

        assert_eq!(
            render(&mut pipeline, &record),
            "<doc>\n\
             <field name=\"package_id\">00000000-0000-0000-0000-000000000000</field>\n\
             <field name=\"lid\">urn:nasa:pds:ds1</field>\n\
             <field name=\"instrument_ref\">urn:p:inst:x</field>\n\
             <field name=\"facet_instrument_name\">Camera X</field>\n\
             <field name=\"data_set_id\">DS-1</field>\n\
             </doc>\n"
        );
    }

    #[test]
    fn multi_identifier_match_emits_one_pair() {
        let table = table();
        let mut pipeline = ExportPipeline::new(&table, options()).expect("pipeline");
        let record = LegacyRecord::new()
            .with_field("identifier", ["x"])
            .with_field("instrument_host_name", ["MRO"]);

        let xml = render(&mut pipeline, &record);
        assert!(xml.contains("<field name=\"instrument_host_ref\">urn:p:host:mro</field>"));
        assert!(!xml.contains("urn:p:host:mro2"));
        assert_eq!(xml.matches("facet_instrument_host_name").count(), 1);
    }

    #[test]
    fn unresolved_reference_writes_nothing_and_is_recorded() {
        let table = table();
        let mut pipeline = ExportPipeline::new(&table, options()).expect("pipeline");
        let record = LegacyRecord::new()
            .with_field("identifier", ["x"])
            .with_field("data_set_id", ["DS-9"])
            .with_field("target_name", ["VESTA"]);

        let xml = render(&mut pipeline, &record);
        assert!(!xml.contains("target_ref"));
        assert!(!xml.contains("VESTA"));
        assert_eq!(
            pipeline.missing().get(ReferenceCategory::Target, "VESTA"),
            Some(&["DS-9".to_string()][..])
        );
    }

    #[test]
    fn legacy_reference_values_kept_on_request() {
        let table = table();
        let options = ExportOptions::builder()
            .package_id(Uuid::nil())
            .keep_legacy_reference_values(true)
            .build()
            .expect("options");
        let mut pipeline = ExportPipeline::new(&table, options).expect("pipeline");
        let record = LegacyRecord::new()
            .with_field("identifier", ["x"])
            .with_field("target_name", ["VESTA  4"]);

        let xml = render(&mut pipeline, &record);
        assert!(xml.contains("<field name=\"target_name\">VESTA 4</field>"));
    }

    #[test]
    fn plain_fields_are_sanitized_and_multi_valued() {
        let table = table();
        let mut pipeline = ExportPipeline::new(&table, options()).expect("pipeline");
        let record = LegacyRecord::new()
            .with_field("identifier", ["x"])
            .with_field("description", ["a  b=c\n", "R&D <draft>"])
            .with_field("score", ["1.0"])
            .with_field(
                "file_ref_url",
                ["http://starbase.jpl.nasa.gov/MRO-M-HIRISE/data"],
            );

        let xml = render(&mut pipeline, &record);
        assert!(xml.contains("<field name=\"description\">a b:c</field>"));
        assert!(xml.contains("<field name=\"description\">R&amp;D &lt;draft&gt;</field>"));
        assert!(!xml.contains("score"));
        assert!(xml.contains(
            "<field name=\"file_ref_url\">https://pds.nasa.gov/data/MRO-M-HIRISE/data</field>"
        ));
    }

    #[test]
    fn identifier_is_escaped_but_not_sanitized() {
        let table = table();
        let mut pipeline = ExportPipeline::new(&table, options()).expect("pipeline");
        let record = LegacyRecord::new().with_field("identifier", ["a&b=c"]);
        let xml = render(&mut pipeline, &record);
        assert!(xml.contains("<field name=\"lid\">a&amp;b=c</field>"));
    }
}
