//! Schema normalization: the only place untyped external data is interpreted.
//!
//! Three inputs converge on one [`Roster`]:
//!
//! - structured documents (`{"people": [...], "columns": [...]}`),
//! - workbook tables read from a spreadsheet file,
//! - raw string grids fetched from a remote sheet, which may carry blank and
//!   duplicate headers.

use crate::error::SchemaError;
use crate::model::{Participant, Roster, NAME_COLUMN};
use serde_json::Value;
use std::collections::HashMap;

/// Data rows inspected when choosing between duplicate headers.
pub const DUPLICATE_SAMPLE_ROWS: usize = 5;

const TRUE_TOKENS: [&str; 3] = ["TRUE", "YES", "1"];
const BOOLEAN_TOKENS: [&str; 6] = ["TRUE", "FALSE", "YES", "NO", "1", "0"];

// ---------------------------------------------------------------------------
// Cells and tables
// ---------------------------------------------------------------------------

/// A single spreadsheet cell as read from a workbook.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Bool(bool),
    Number(f64),
}

impl Cell {
    /// Boolean coercion: text goes through [`coerce_text`], everything else
    /// uses its native truthiness.
    pub fn truthy(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Text(s) => coerce_text(s),
            Cell::Bool(b) => *b,
            Cell::Number(n) => *n != 0.0,
        }
    }

    /// Display form used for headers and names.
    pub fn render(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Bool(b) => b.to_string(),
            Cell::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
        }
    }
}

/// A workbook sheet: header row plus data rows, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub header: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
}

/// `TRUE`, `YES` or `1` (case-insensitive, trimmed) map to true.
pub fn coerce_text(value: &str) -> bool {
    let upper = value.trim().to_uppercase();
    TRUE_TOKENS.contains(&upper.as_str())
}

/// Whether a non-empty cell reads as one of the boolean tokens.
pub fn looks_boolean(value: &str) -> bool {
    let upper = value.trim().to_uppercase();
    BOOLEAN_TOKENS.contains(&upper.as_str())
}

// ---------------------------------------------------------------------------
// Structured document
// ---------------------------------------------------------------------------

/// Normalize a canonical-format document. Missing flags default to false;
/// keys that are not listed in `columns` are dropped.
pub fn from_document(doc: &Value) -> Result<Roster, SchemaError> {
    let obj = doc
        .as_object()
        .ok_or_else(|| SchemaError::InvalidDocument("expected a JSON object".into()))?;

    let columns: Vec<String> = match obj.get("columns") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|c| match c {
                Value::String(s) => Ok(s.clone()),
                other => Err(SchemaError::InvalidDocument(format!(
                    "column names must be strings, got {other}"
                ))),
            })
            .collect::<Result<_, _>>()?,
        Some(_) => {
            return Err(SchemaError::InvalidDocument(
                "'columns' must be an array".into(),
            ))
        }
    };
    let columns: Vec<String> = columns.into_iter().filter(|c| c != NAME_COLUMN).collect();

    let people_raw = match obj.get("people") {
        None | Some(Value::Null) => &[][..],
        Some(Value::Array(items)) => items.as_slice(),
        Some(_) => {
            return Err(SchemaError::InvalidDocument(
                "'people' must be an array".into(),
            ))
        }
    };

    let mut people = Vec::with_capacity(people_raw.len());
    for (i, entry) in people_raw.iter().enumerate() {
        let record = entry.as_object().ok_or_else(|| {
            SchemaError::InvalidDocument(format!("person {} is not an object", i + 1))
        })?;
        let name = match record.get(NAME_COLUMN) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                return Err(SchemaError::InvalidDocument(format!(
                    "person {} has no '{NAME_COLUMN}'",
                    i + 1
                )))
            }
        };
        if name.is_empty() {
            continue;
        }
        let mut person = Participant::new(name);
        for column in &columns {
            person.set_flag(column, record.get(column).map(json_truthy).unwrap_or(false));
        }
        people.push(person);
    }

    Ok(Roster::new(people, columns))
}

fn json_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => coerce_text(s),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Null => false,
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

// ---------------------------------------------------------------------------
// Workbook file
// ---------------------------------------------------------------------------

/// Normalize a workbook sheet. Requires a `Name` header; every other
/// non-blank header becomes a cycle column in file order. Repeated headers
/// are kept as `<header>.1`, `<header>.2`, ...
pub fn from_workbook(table: &RawTable) -> Result<Roster, SchemaError> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut headers: Vec<(usize, String)> = Vec::new();
    for (idx, cell) in table.header.iter().enumerate() {
        let text = cell.render();
        if text.trim().is_empty() {
            continue;
        }
        let count = seen.entry(text.clone()).or_insert(0);
        let label = if *count == 0 {
            text.clone()
        } else {
            format!("{text}.{count}")
        };
        *count += 1;
        headers.push((idx, label));
    }

    let name_idx = headers
        .iter()
        .find(|(_, h)| h == NAME_COLUMN)
        .map(|(idx, _)| *idx)
        .ok_or(SchemaError::MissingNameColumn)?;

    let cycles: Vec<(usize, String)> = headers
        .into_iter()
        .filter(|(_, h)| h != NAME_COLUMN)
        .collect();

    let mut people = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let name = row.get(name_idx).map(Cell::render).unwrap_or_default();
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let mut person = Participant::new(name);
        for (idx, column) in &cycles {
            person.set_flag(column, row.get(*idx).is_some_and(Cell::truthy));
        }
        people.push(person);
    }

    let columns = cycles.into_iter().map(|(_, c)| c).collect();
    Ok(Roster::new(people, columns))
}

// ---------------------------------------------------------------------------
// Remote sheet grid
// ---------------------------------------------------------------------------

/// Normalize a raw remote sheet grid (row 0 is the header).
///
/// Blank headers are dropped. When a header appears more than once, the
/// first candidate whose sampled cells contain a boolean-like token wins,
/// else the leftmost candidate. Rows with a blank `Name` are skipped.
pub fn from_sheet_values(values: &[Vec<String>]) -> Result<Roster, SchemaError> {
    if values.len() < 2 {
        return Err(SchemaError::EmptySheet);
    }
    let (header, data) = (&values[0], &values[1..]);
    let resolved = resolve_headers(header, data);

    if !resolved.iter().any(|(_, h)| h == NAME_COLUMN) {
        return Err(SchemaError::MissingNameColumn);
    }

    let mut people = Vec::with_capacity(data.len());
    for row in data {
        let mut name = String::new();
        let mut flags = Vec::with_capacity(resolved.len());
        for (idx, header) in &resolved {
            let Some(cell) = row.get(*idx) else { continue };
            if header == NAME_COLUMN {
                name = cell.trim().to_string();
            } else {
                flags.push((header.as_str(), coerce_text(cell)));
            }
        }
        if name.is_empty() {
            continue;
        }
        let mut person = Participant::new(name);
        for (column, value) in flags {
            person.set_flag(column, value);
        }
        people.push(person);
    }

    let columns = resolved
        .into_iter()
        .filter(|(_, h)| h != NAME_COLUMN)
        .map(|(_, h)| h)
        .collect();
    Ok(Roster::new(people, columns))
}

/// Map each distinct trimmed header to one column index, in order of first
/// appearance.
fn resolve_headers(header: &[String], data: &[Vec<String>]) -> Vec<(usize, String)> {
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    for (idx, raw) in header.iter().enumerate() {
        let name = raw.trim();
        if name.is_empty() {
            continue;
        }
        match groups.iter_mut().find(|(n, _)| n == name) {
            Some((_, indices)) => indices.push(idx),
            None => groups.push((name.to_string(), vec![idx])),
        }
    }

    groups
        .into_iter()
        .map(|(name, indices)| {
            let chosen = if indices.len() == 1 {
                indices[0]
            } else {
                pick_duplicate(&indices, data)
            };
            (chosen, name)
        })
        .collect()
}

fn pick_duplicate(candidates: &[usize], data: &[Vec<String>]) -> usize {
    let sample = &data[..data.len().min(DUPLICATE_SAMPLE_ROWS)];
    candidates
        .iter()
        .copied()
        .find(|&idx| {
            sample.iter().any(|row| {
                row.get(idx)
                    .is_some_and(|cell| !cell.is_empty() && looks_boolean(cell))
            })
        })
        .unwrap_or(candidates[0])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn boolean_coercion_true_tokens() {
        for value in ["true", "Yes", "1", " TRUE "] {
            assert!(coerce_text(value), "expected true: {value:?}");
        }
    }

    #[test]
    fn boolean_coercion_false_tokens() {
        for value in ["false", "no", "0", "", "maybe"] {
            assert!(!coerce_text(value), "expected false: {value:?}");
        }
    }

    #[test]
    fn native_cells_use_truthiness() {
        assert!(Cell::Bool(true).truthy());
        assert!(Cell::Number(1.0).truthy());
        assert!(!Cell::Number(0.0).truthy());
        assert!(!Cell::Empty.truthy());
        assert!(text("yes").truthy());
    }

    #[test]
    fn number_cells_render_without_fraction() {
        assert_eq!(Cell::Number(42.0).render(), "42");
        assert_eq!(Cell::Number(1.5).render(), "1.5");
    }

    // -- structured document -------------------------------------------------

    #[test]
    fn document_defaults_missing_flags() {
        let doc = json!({
            "people": [{"Name": "A", "Cycle 1": true}, {"Name": "B"}],
            "columns": ["Cycle 1"]
        });
        let roster = from_document(&doc).unwrap();
        assert!(roster.people[0].flag("Cycle 1"));
        assert_eq!(roster.people[1].flags.get("Cycle 1"), Some(&false));
    }

    #[test]
    fn document_without_columns_is_seeded() {
        let roster = from_document(&json!({"people": [{"Name": "A"}]})).unwrap();
        assert_eq!(roster.columns, vec!["Cycle 1"]);
    }

    #[test]
    fn document_rejects_non_object() {
        assert!(matches!(
            from_document(&json!([1, 2])),
            Err(SchemaError::InvalidDocument(_))
        ));
    }

    #[test]
    fn document_rejects_person_without_name() {
        let doc = json!({"people": [{"Cycle 1": true}], "columns": ["Cycle 1"]});
        assert!(matches!(
            from_document(&doc),
            Err(SchemaError::InvalidDocument(_))
        ));
    }

    #[test]
    fn document_skips_blank_names() {
        let doc = json!({
            "people": [
                {"Name": "   ", "Cycle 1": true},
                {"Name": ""},
                {"Name": "  Ruth  ", "Cycle 1": true}
            ],
            "columns": ["Cycle 1"]
        });
        let roster = from_document(&doc).unwrap();
        assert_eq!(roster.people.len(), 1);
        assert_eq!(roster.people[0].name, "Ruth");
        assert!(roster.people[0].flag("Cycle 1"));
    }

    #[test]
    fn document_coerces_textual_flags() {
        let doc = json!({
            "people": [{"Name": "A", "Cycle 1": "TRUE", "Cycle 2": 0}],
            "columns": ["Cycle 1", "Cycle 2"]
        });
        let roster = from_document(&doc).unwrap();
        assert!(roster.people[0].flag("Cycle 1"));
        assert!(!roster.people[0].flag("Cycle 2"));
    }

    // -- workbook --------------------------------------------------------------

    #[test]
    fn workbook_requires_name_column() {
        let table = RawTable {
            header: vec![text("Person"), text("Cycle 1")],
            rows: vec![vec![text("A"), Cell::Bool(true)]],
        };
        assert!(matches!(
            from_workbook(&table),
            Err(SchemaError::MissingNameColumn)
        ));
    }

    #[test]
    fn workbook_columns_in_file_order() {
        let table = RawTable {
            header: vec![text("Cycle 2"), text("Name"), text("Cycle 1")],
            rows: vec![
                vec![text("yes"), text("A"), Cell::Number(0.0)],
                vec![Cell::Bool(false), text("B"), Cell::Number(1.0)],
            ],
        };
        let roster = from_workbook(&table).unwrap();
        assert_eq!(roster.columns, vec!["Cycle 2", "Cycle 1"]);
        assert!(roster.people[0].flag("Cycle 2"));
        assert!(!roster.people[0].flag("Cycle 1"));
        assert!(roster.people[1].flag("Cycle 1"));
    }

    #[test]
    fn workbook_skips_blank_names_and_short_rows() {
        let table = RawTable {
            header: vec![text("Name"), text("Cycle 1")],
            rows: vec![
                vec![text("A")],
                vec![Cell::Empty, Cell::Bool(true)],
            ],
        };
        let roster = from_workbook(&table).unwrap();
        assert_eq!(roster.people.len(), 1);
        assert!(!roster.people[0].flag("Cycle 1"));
    }

    #[test]
    fn workbook_repeated_headers_get_suffixes() {
        let table = RawTable {
            header: vec![text("Name"), text("Cycle 1"), text("Cycle 1")],
            rows: vec![vec![text("A"), Cell::Bool(false), Cell::Bool(true)]],
        };
        let roster = from_workbook(&table).unwrap();
        assert_eq!(roster.columns, vec!["Cycle 1", "Cycle 1.1"]);
        assert!(roster.people[0].flag("Cycle 1.1"));
    }

    // -- remote sheet ----------------------------------------------------------

    #[test]
    fn sheet_needs_header_and_data() {
        assert!(matches!(
            from_sheet_values(&grid(&[&["Name", "Cycle 1"]])),
            Err(SchemaError::EmptySheet)
        ));
        assert!(matches!(from_sheet_values(&[]), Err(SchemaError::EmptySheet)));
    }

    #[test]
    fn sheet_requires_name_column() {
        let values = grid(&[&["Who", "Cycle 1"], &["A", "TRUE"]]);
        assert!(matches!(
            from_sheet_values(&values),
            Err(SchemaError::MissingNameColumn)
        ));
    }

    #[test]
    fn duplicate_header_prefers_boolean_column() {
        let values = grid(&[
            &["Name", "Cycle 1", "Cycle 1"],
            &["A", "", "TRUE"],
            &["B", "", "FALSE"],
        ]);
        let roster = from_sheet_values(&values).unwrap();
        assert_eq!(roster.columns, vec!["Cycle 1"]);
        assert!(roster.people[0].flag("Cycle 1"));
        assert!(!roster.people[1].flag("Cycle 1"));
    }

    #[test]
    fn duplicate_header_falls_back_to_first() {
        let values = grid(&[
            &["Name", "Cycle 1", "Cycle 1"],
            &["A", "prayed", "done"],
        ]);
        let headers = resolve_headers(&values[0], &values[1..]);
        assert_eq!(headers, vec![(0, "Name".to_string()), (1, "Cycle 1".to_string())]);
    }

    #[test]
    fn duplicate_resolution_only_samples_first_rows() {
        let mut values = grid(&[&["Name", "Cycle 1", "Cycle 1"]]);
        for i in 0..DUPLICATE_SAMPLE_ROWS {
            values.push(vec![format!("P{i}"), String::new(), String::new()]);
        }
        values.push(vec!["Late".into(), String::new(), "TRUE".into()]);
        let headers = resolve_headers(&values[0], &values[1..]);
        assert_eq!(headers[1], (1, "Cycle 1".to_string()));
    }

    #[test]
    fn blank_headers_are_dropped_and_names_trimmed() {
        let values = grid(&[
            &[" Name ", "", "Cycle 1"],
            &["  A  ", "junk", "yes"],
            &["   ", "", "TRUE"],
        ]);
        let roster = from_sheet_values(&values).unwrap();
        assert_eq!(roster.columns, vec!["Cycle 1"]);
        assert_eq!(roster.people.len(), 1);
        assert_eq!(roster.people[0].name, "A");
        assert!(roster.people[0].flag("Cycle 1"));
    }

    #[test]
    fn short_rows_default_missing_cells() {
        let values = grid(&[&["Name", "Cycle 1", "Cycle 2"], &["A", "TRUE"]]);
        let roster = from_sheet_values(&values).unwrap();
        assert!(roster.people[0].flag("Cycle 1"));
        assert_eq!(roster.people[0].flags.get("Cycle 2"), Some(&false));
    }

    #[test]
    fn normalization_is_deterministic() {
        let values = grid(&[
            &["Name", "Cycle 1", "Cycle 2", "Cycle 1"],
            &["A", "", "no", "1"],
        ]);
        assert_eq!(
            from_sheet_values(&values).unwrap(),
            from_sheet_values(&values).unwrap()
        );
    }
}
