//! Field names, defaults and fixed rewrite rules used by the exporter.

/// Documents written to a batch file before it is rotated.
pub const DEFAULT_BATCH_SIZE: usize = 1000;
/// File name prefix for batch files (`{prefix}.{n}.xml`).
pub const DEFAULT_FILE_PREFIX: &str = "solr_doc_deprecated";
/// Default file name of the missing-context report inside the output directory.
pub const DEFAULT_REPORT_FILE_NAME: &str = "missing_context.csv";

/// Host prefix of file references in legacy records.
pub const LEGACY_FILE_HOST: &str = "http://starbase.jpl.nasa.gov";
/// Replacement for [`LEGACY_FILE_HOST`].
pub const CURRENT_FILE_HOST: &str = "https://pds.nasa.gov/data";

/// Solr bookkeeping fields that never reach an exported document.
pub const DEFAULT_SKIP_FIELDS: &[&str] = &["score", "timestamp", "search_id"];

/// The record's own identifier field in legacy records.
pub const IDENTIFIER_FIELD: &str = "identifier";
/// Name the record identifier is written under.
pub const LID_FIELD: &str = "lid";
/// Run-scoped package identifier field stamped on every document.
pub const PACKAGE_ID_FIELD: &str = "package_id";
/// Disambiguator used for composite-key lookups.
pub const DATA_SET_ID_FIELD: &str = "data_set_id";
/// Field carrying a file reference URL subject to host rewriting.
pub const FILE_REF_URL_FIELD: &str = "file_ref_url";

/// Identifier table column holding the legacy object name.
pub const TABLE_LEGACY_NAME_COLUMN: &str = "pds3_name";
/// Identifier table column holding the canonical identifier(s).
pub const TABLE_IDENTIFIER_COLUMN: &str = "identifier";
/// Identifier table column holding the canonical display name.
pub const TABLE_DISPLAY_NAME_COLUMN: &str = "pds4_name";

/// Header row of the missing-context report.
pub const REPORT_HEADER: [&str; 3] = ["reference_type", "pds3_name", "data_set_ids"];

/// Container element wrapping every document in a batch file.
pub const BATCH_ROOT_ELEMENT: &str = "add";
pub const DOC_ELEMENT: &str = "doc";
pub const FIELD_ELEMENT: &str = "field";
