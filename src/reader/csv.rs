use std::io::Read;

use super::RawTable;
use crate::error::{ExportError, Result};

/// Read a CSV stream whose first record is the header row.
///
/// Rows may be ragged; missing trailing cells read as empty.
pub fn read_csv<R: Read>(input: R) -> Result<RawTable> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|err| ExportError::data_load(format!("failed to read csv header: {err}")))?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|err| {
            ExportError::data_load(format!("failed to read csv row {}: {err}", idx + 2))
        })?;
        rows.push(record.iter().map(ToString::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_quoted_and_ragged_rows() {
        let input = "\u{feff}pds3_name,identifier,pds4_name\n\
                     \"MARS, PLANET\",urn:a,Mars\n\
                     PHOBOS,urn:b\n";
        let table = read_csv(input.as_bytes()).expect("csv");
        assert_eq!(table.headers, ["pds3_name", "identifier", "pds4_name"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], "MARS, PLANET");
        assert_eq!(table.cell(&table.rows[1], 2), "");
    }
}
