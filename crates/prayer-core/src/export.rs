use crate::error::{PrayerError, Result};
use crate::model::Roster;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn default_file_name(self) -> &'static str {
        match self {
            ExportFormat::Json => "prayer_cycles.json",
            ExportFormat::Csv => "prayer_cycles.csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format '{other}' (expected json or csv)")),
        }
    }
}

/// Pretty-printed canonical document.
pub fn to_json(roster: &Roster) -> Result<String> {
    Ok(serde_json::to_string_pretty(roster)?)
}

/// `Name,<columns...>` header, then one row per participant with
/// `TRUE`/`FALSE` cells.
pub fn to_csv(roster: &Roster) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in roster.to_rows() {
        writer.write_record(&row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| PrayerError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        PrayerError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

pub fn render(roster: &Roster, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => to_json(roster),
        ExportFormat::Csv => to_csv(roster),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_has_header_and_literal_booleans() {
        let csv = to_csv(&Roster::builtin()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Name,Cycle 1,Cycle 2");
        assert_eq!(lines[1], "Name 1,TRUE,FALSE");
        assert_eq!(lines[2], "Name 2,TRUE,FALSE");
    }

    #[test]
    fn csv_quotes_names_with_commas() {
        let mut roster = Roster::builtin();
        roster.add_participant("George, Abel").unwrap();
        let csv = to_csv(&roster).unwrap();
        assert!(csv.contains("\"George, Abel\",FALSE,FALSE"));
    }

    #[test]
    fn json_export_parses_back() {
        let roster = Roster::builtin();
        let json = render(&roster, ExportFormat::Json).unwrap();
        let parsed: Roster = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, roster);
    }

    #[test]
    fn format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }
}
