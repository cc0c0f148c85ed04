//! Public types exposed by the `pds3-registry-export` crate.

pub mod options;
pub mod record;
pub mod reference;

pub use options::{ExportOptions, ExportOptionsBuilder};
pub use record::{LegacyRecord, RecordField};
pub use reference::{ReferenceCategory, ResolvedReference};
