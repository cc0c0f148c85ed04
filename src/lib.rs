#![deny(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![cfg_attr(test, allow(clippy::useless_vec, clippy::uninlined_format_args))]
#![allow(clippy::module_name_repetitions)]
//
// Documentation lints: internal helpers are self-describing; public APIs keep docs.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
//
// Builders take owned values intentionally.
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! Legacy catalog cross-reference resolution and chunked Solr document export.
//!
//! Legacy PDS3 catalog records name their investigation, instrument host,
//! instrument and target in free text. This crate resolves those names to
//! PDS4 context identifiers through an [`IdentifierTable`], rewrites each
//! record as a Solr `<doc>`, writes documents into numbered batch files, and
//! reports every name it could not resolve.
//!
//! ```no_run
//! use pds3_registry_export::{DirectorySink, ExportOptions, IdentifierTable, JsonlRecords, run};
//!
//! # fn main() -> pds3_registry_export::Result<()> {
//! let table = IdentifierTable::load("context.csv")?;
//! let records = JsonlRecords::open("pds3_datasets.jsonl")?;
//! let mut sinks = DirectorySink::new("out");
//! let summary = run(records, &table, ExportOptions::default(), &mut sinks)?;
//! println!("{} documents in {} files", summary.documents, summary.batch_files);
//! # Ok(())
//! # }
//! ```

/// The crate version (matches `Cargo.toml`).
pub const PDS3_REGISTRY_EXPORT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod constants;
pub mod error;
pub mod export;
pub mod missing;
pub mod reader;
pub mod resolver;
pub mod source;
pub mod table;
pub mod text;
pub mod types;

pub use error::{ExportError, Result};
pub use export::{DirectorySink, ExportPipeline, ExportSummary, SinkFactory, run};
pub use missing::{MissingContext, MissingEntry};
pub use reader::{RawTable, TableFormat, read_table};
pub use resolver::ReferenceResolver;
pub use source::{JsonlRecords, read_solr_response};
pub use table::{IdentifierTable, TableRow, split_identifiers};
pub use text::{escape_text, sanitize};
pub use types::{
    ExportOptions, ExportOptionsBuilder, LegacyRecord, RecordField, ReferenceCategory,
    ResolvedReference,
};
