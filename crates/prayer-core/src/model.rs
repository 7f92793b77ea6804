use serde::de::Error as _;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Header of the participant name column in every tabular format.
pub const NAME_COLUMN: &str = "Name";

/// Cycle seeded into a model that arrives with no columns at all.
pub const FIRST_CYCLE: &str = "Cycle 1";

// ---------------------------------------------------------------------------
// Participant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Display key. Not guaranteed unique.
    pub name: String,
    pub flags: HashMap<String, bool>,
}

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: HashMap::new(),
        }
    }

    /// Flag for `cycle`; a missing entry reads as `false`.
    pub fn flag(&self, cycle: &str) -> bool {
        self.flags.get(cycle).copied().unwrap_or(false)
    }

    pub fn set_flag(&mut self, cycle: &str, value: bool) {
        self.flags.insert(cycle.to_string(), value);
    }
}

// ---------------------------------------------------------------------------
// Roster (the canonical model)
// ---------------------------------------------------------------------------

/// People plus the ordered cycle list. The last column is the current cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Roster {
    pub people: Vec<Participant>,
    pub columns: Vec<String>,
}

impl Roster {
    pub fn new(people: Vec<Participant>, columns: Vec<String>) -> Self {
        let mut roster = Self { people, columns };
        roster.ensure_seeded();
        roster.materialize();
        roster
    }

    /// Built-in roster used when no configured source yields a model.
    pub fn builtin() -> Self {
        let columns = vec!["Cycle 1".to_string(), "Cycle 2".to_string()];
        let people = ["Name 1", "Name 2"]
            .into_iter()
            .map(|name| {
                let mut p = Participant::new(name);
                p.set_flag("Cycle 1", true);
                p.set_flag("Cycle 2", false);
                p
            })
            .collect();
        Self { people, columns }
    }

    pub fn current_cycle(&self) -> Option<&str> {
        self.columns.last().map(String::as_str)
    }

    pub fn has_cycle(&self, cycle: &str) -> bool {
        self.columns.iter().any(|c| c == cycle)
    }

    /// Seed `Cycle 1` when the column list is empty.
    pub fn ensure_seeded(&mut self) {
        if self.columns.is_empty() {
            self.columns.push(FIRST_CYCLE.to_string());
        }
    }

    /// Give every participant an explicit entry for every column.
    pub fn materialize(&mut self) {
        for person in &mut self.people {
            for column in &self.columns {
                person.flags.entry(column.clone()).or_insert(false);
            }
        }
    }

    /// Rows of `Name, <columns...>` with flags rendered as `TRUE`/`FALSE`.
    /// The first row is the header.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push(NAME_COLUMN.to_string());
        header.extend(self.columns.iter().cloned());

        let mut rows = Vec::with_capacity(self.people.len() + 1);
        rows.push(header);
        for person in &self.people {
            let mut row = Vec::with_capacity(self.columns.len() + 1);
            row.push(person.name.clone());
            row.extend(
                self.columns
                    .iter()
                    .map(|c| bool_cell(person.flag(c)).to_string()),
            );
            rows.push(row);
        }
        rows
    }
}

pub fn bool_cell(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}

// ---------------------------------------------------------------------------
// Canonical document serialization
// ---------------------------------------------------------------------------

/// One entry of `people` in the canonical document: `Name` first, then the
/// flags in column order.
struct PersonRecord<'a> {
    person: &'a Participant,
    columns: &'a [String],
}

impl Serialize for PersonRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len() + 1))?;
        map.serialize_entry(NAME_COLUMN, &self.person.name)?;
        for column in self.columns {
            if column == NAME_COLUMN {
                continue;
            }
            map.serialize_entry(column, &self.person.flag(column))?;
        }
        map.end()
    }
}

struct People<'a>(&'a Roster);

impl Serialize for People<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.people.iter().map(|person| PersonRecord {
            person,
            columns: &self.0.columns,
        }))
    }
}

impl Serialize for Roster {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut doc = serializer.serialize_struct("Roster", 2)?;
        doc.serialize_field("people", &People(self))?;
        doc.serialize_field("columns", &self.columns)?;
        doc.end()
    }
}

impl<'de> Deserialize<'de> for Roster {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        crate::normalize::from_document(&value).map_err(D::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
