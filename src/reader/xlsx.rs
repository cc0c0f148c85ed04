use std::path::Path;

use calamine::{DataType, Reader as CalamineReader, open_workbook_auto};

use super::RawTable;
use crate::error::{ExportError, Result};

/// Read the first worksheet of a spreadsheet (`.xlsx`, `.xls`, `.ods`).
///
/// The first row is the header row. Numeric cells that hold whole numbers are
/// rendered without a fractional part so they compare equal to their CSV form.
pub fn read_workbook(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path).map_err(|err| {
        ExportError::data_load(format!(
            "failed to open workbook {}: {err}",
            path.display()
        ))
    })?;

    let sheet_names: Vec<String> = workbook.sheet_names().clone();
    let Some(first_sheet) = sheet_names.first() else {
        return Err(ExportError::data_load(format!(
            "workbook {} has no worksheets",
            path.display()
        )));
    };

    let range = match workbook.worksheet_range(first_sheet) {
        Some(Ok(range)) => range,
        Some(Err(err)) => {
            return Err(ExportError::data_load(format!(
                "failed to read worksheet '{first_sheet}': {err}"
            )));
        }
        None => {
            return Err(ExportError::data_load(format!(
                "worksheet '{first_sheet}' is missing"
            )));
        }
    };

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<String>>());
    let headers = rows.next().unwrap_or_default();
    let rows = rows.collect();

    Ok(RawTable { headers, rows })
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Float(v) => {
            if v.fract() == 0.0 && v.abs() < 1e15 {
                format!("{}", *v as i64)
            } else {
                format!("{v}")
            }
        }
        DataType::Int(v) => format!("{v}"),
        DataType::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        DataType::DateTime(v) | DataType::Duration(v) => format!("{v}"),
        DataType::DateTimeIso(s) | DataType::DurationIso(s) => s.clone(),
        DataType::Error(e) => format!("#{e:?}"),
        DataType::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_floats_render_as_integers() {
        assert_eq!(cell_text(&DataType::Float(42.0)), "42");
        assert_eq!(cell_text(&DataType::Float(1.5)), "1.5");
        assert_eq!(cell_text(&DataType::Empty), "");
        assert_eq!(cell_text(&DataType::String("MRO".into())), "MRO");
    }

    #[test]
    fn missing_workbook_is_a_load_error() {
        let dir = tempfile::tempdir().expect("tmp");
        let err = read_workbook(&dir.path().join("absent.xlsx")).unwrap_err();
        assert!(matches!(err, ExportError::DataLoad { .. }));
    }
}
