use crate::error::SchemaError;
use crate::normalize::{Cell, RawTable};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Read the first worksheet of an xlsx/xls/ods file. Import only; workbooks
/// are never written back.
pub fn read_table(path: &Path) -> Result<RawTable, SchemaError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| SchemaError::Workbook(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SchemaError::Workbook("workbook has no sheets".into()))?
        .map_err(|e| SchemaError::Workbook(e.to_string()))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .map(|r| r.iter().map(to_cell).collect())
        .unwrap_or_default();
    let rows = rows.map(|r| r.iter().map(to_cell).collect()).collect();
    Ok(RawTable { header, rows })
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::DateTime(d) => Cell::Number(d.as_f64()),
        _ => Cell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn cells_map_to_native_values() {
        assert_eq!(to_cell(&Data::Empty), Cell::Empty);
        assert_eq!(to_cell(&Data::String(String::new())), Cell::Empty);
        assert_eq!(
            to_cell(&Data::String("TRUE".into())),
            Cell::Text("TRUE".into())
        );
        assert_eq!(to_cell(&Data::Bool(true)), Cell::Bool(true));
        assert_eq!(to_cell(&Data::Int(0)), Cell::Number(0.0));
        assert_eq!(to_cell(&Data::Float(1.0)), Cell::Number(1.0));
    }

    #[test]
    fn missing_file_is_workbook_error() {
        let dir = TempDir::new().unwrap();
        let err = read_table(&dir.path().join("nope.xlsx")).unwrap_err();
        assert!(matches!(err, SchemaError::Workbook(_)));
    }

    #[test]
    fn non_workbook_content_is_workbook_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("roster.xlsx");
        std::fs::write(&path, "Name,Cycle 1\nA,TRUE\n").unwrap();
        assert!(matches!(read_table(&path), Err(SchemaError::Workbook(_))));
    }
}
