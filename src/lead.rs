// src/lead.rs
//
// Core data shapes shared by every layer:
// - Criteria:   what the user typed (three free-text fields)
// - LeadRecord: the canonical row the table and every export understand
// - RawRow:     one decoded spreadsheet row, headers as found in the file
// - Field:      the five canonical columns, in fixed display/export order

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Location,
    Technology,
    Email,
    Phone,
}

impl Field {
    /// Fixed column order for the table and all exports.
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Location,
        Field::Technology,
        Field::Email,
        Field::Phone,
    ];

    /// Fields the criteria filter looks at.
    pub const SEARCHABLE: [Field; 3] = [Field::Name, Field::Location, Field::Technology];

    /// Lowercase key, as used in JSON payloads and the CSV header row.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Location => "location",
            Field::Technology => "technology",
            Field::Email => "email",
            Field::Phone => "phone",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Location => "Location",
            Field::Technology => "Technology",
            Field::Email => "Email",
            Field::Phone => "Phone",
        }
    }
}

/// Search criteria. Empty string means "not given" (wildcard).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    pub name: String,
    pub location: String,
    pub technology: String,
}

impl Criteria {
    /// Build from raw form input; values are trimmed.
    pub fn new(name: &str, location: &str, technology: &str) -> Self {
        Self {
            name: s!(name.trim()),
            location: s!(location.trim()),
            technology: s!(technology.trim()),
        }
    }

    /// True when all three fields are blank.
    pub fn is_empty(&self) -> bool {
        Field::SEARCHABLE.iter().all(|f| self.get(*f).trim().is_empty())
    }

    /// Criterion for a searchable field; `Email`/`Phone` are never filtered on.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Location => &self.location,
            Field::Technology => &self.technology,
            Field::Email | Field::Phone => "",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub name: String,
    pub location: String,
    pub technology: String,
    pub email: String,
    pub phone: String,
}

impl LeadRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Location => &self.location,
            Field::Technology => &self.technology,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Location => &mut self.location,
            Field::Technology => &mut self.technology,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
        };
        *slot = value.into();
    }

    /// Cells in `Field::ALL` order. The table and every exporter read
    /// records through this, so what is shown is what is written.
    pub fn cells(&self) -> [&str; 5] {
        Field::ALL.map(|f| self.get(f))
    }
}

/// One decoded spreadsheet row: `(header, value)` pairs in file column order.
/// Every header of the sheet is present; blank cells hold "".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.cells.push((header.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(h, _)| h.as_str())
    }

    /// Exact (case-sensitive) header lookup.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells.iter().find(|(h, _)| h == header).map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells blank (or no cells at all).
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.trim().is_empty())
    }
}

impl<H: Into<String>, V: Into<String>> FromIterator<(H, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (H, V)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(h, v)| (h.into(), v.into())).collect(),
        }
    }
}
