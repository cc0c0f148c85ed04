//! Record sources feeding the export pipeline.
//!
//! The pipeline pulls from any `IntoIterator<Item = Result<LegacyRecord>>`.
//! This module provides the file-backed sources the command-line tool uses:
//! JSON-lines dumps and saved Solr select responses.

use std::io::BufRead;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ExportError, Result};
use crate::types::LegacyRecord;

/// Iterator over a JSON-lines stream, one JSON object per record.
///
/// Blank lines are skipped. A line that is not a JSON object yields a
/// [`ExportError::RecordSource`] error naming the line.
pub struct JsonlRecords<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> JsonlRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl JsonlRecords<std::io::BufReader<fs_err::File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = fs_err::File::open(path.as_ref())
            .map_err(|err| ExportError::record_source(err.to_string()))?;
        Ok(Self::new(std::io::BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for JsonlRecords<R> {
    type Item = Result<LegacyRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => {
                    return Some(Err(ExportError::record_source(format!(
                        "read failed after line {}: {err}",
                        self.line_no
                    ))));
                }
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(parse_record(&line, self.line_no));
        }
    }
}

fn parse_record(line: &str, line_no: usize) -> Result<LegacyRecord> {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(object)) => Ok(LegacyRecord::from_json_object(object)),
        Ok(_) => Err(ExportError::record_source(format!(
            "line {line_no}: expected a JSON object"
        ))),
        Err(err) => Err(ExportError::record_source(format!("line {line_no}: {err}"))),
    }
}

#[derive(Deserialize)]
struct SolrResponse {
    response: SolrDocs,
}

#[derive(Deserialize)]
struct SolrDocs {
    #[serde(default)]
    docs: Vec<Map<String, Value>>,
}

/// Load the documents of a saved Solr select response
/// (`{"response": {"docs": [...]}}`).
pub fn read_solr_response(path: impl AsRef<Path>) -> Result<Vec<LegacyRecord>> {
    let path = path.as_ref();
    let bytes = fs_err::read(path).map_err(|err| ExportError::record_source(err.to_string()))?;
    let parsed: SolrResponse = serde_json::from_slice(&bytes).map_err(|err| {
        ExportError::record_source(format!("{}: {err}", path.display()))
    })?;
    Ok(parsed
        .response
        .docs
        .into_iter()
        .map(LegacyRecord::from_json_object)
        .collect())
}
