//! Tabular readers for the identifier table.
//!
//! Every reader produces a [`RawTable`]: a header row plus string cells. The
//! identifier table only cares about three named columns, so readers do no
//! typing beyond rendering cells as text.

mod csv;
mod xlsx;

use std::path::Path;

pub use self::csv::read_csv;
pub use self::xlsx::read_workbook;

use crate::Result;

/// Soft classification of table formats, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableFormat {
    Csv,
    Xlsx,
    Xls,
    Ods,
}

impl TableFormat {
    /// Guess the format from a path. Anything unrecognised is read as CSV.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("xlsx" | "xlsm") => Self::Xlsx,
            Some("xls") => Self::Xls,
            Some("ods") => Self::Ods,
            _ => Self::Csv,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
            Self::Ods => "ods",
        }
    }

    #[must_use]
    pub fn is_spreadsheet(self) -> bool {
        !matches!(self, Self::Csv)
    }
}

/// A header row and the data rows beneath it, all as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Index of the column whose trimmed header equals `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header.trim() == name)
    }

    /// Cell text at `(row, col)`; short rows read as empty.
    #[must_use]
    pub fn cell<'a>(&self, row: &'a [String], col: usize) -> &'a str {
        row.get(col).map_or("", |cell| cell.trim())
    }
}

/// Read a table file, dispatching on its extension.
pub fn read_table(path: &Path) -> Result<RawTable> {
    let format = TableFormat::from_path(path);
    tracing::debug!(path = %path.display(), format = format.label(), "reading identifier table");
    if format.is_spreadsheet() {
        read_workbook(path)
    } else {
        let file = fs_err::File::open(path)?;
        read_csv(std::io::BufReader::new(file))
    }
}
