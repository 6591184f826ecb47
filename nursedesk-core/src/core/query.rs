//! Pure sorting and filtering over an in-memory record collection.
//!
//! Nothing in this module touches the store; every function takes a slice and
//! returns a new `Vec`, leaving the input untouched.

use crate::NurseRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A sortable table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Name,
    LicenseNumber,
    Dob,
    Age,
}

impl SortColumn {
    pub const ALL: [SortColumn; 4] = [
        SortColumn::Name,
        SortColumn::LicenseNumber,
        SortColumn::Dob,
        SortColumn::Age,
    ];

    /// Column heading as shown in tables and exports.
    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Name => "Name",
            SortColumn::LicenseNumber => "License Number",
            SortColumn::Dob => "Date of Birth",
            SortColumn::Age => "Age",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "name" => Ok(SortColumn::Name),
            "license" | "license_number" => Ok(SortColumn::LicenseNumber),
            "dob" | "date_of_birth" => Ok(SortColumn::Dob),
            "age" => Ok(SortColumn::Age),
            other => Err(format!("unknown column: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// The table's current sort, if any.
///
/// Toggling the active column flips its direction; toggling a different column
/// switches to it in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    active: Option<(SortColumn, SortDirection)>,
}

impl SortState {
    pub fn active(&self) -> Option<(SortColumn, SortDirection)> {
        self.active
    }

    pub fn toggle(&mut self, column: SortColumn) {
        self.active = match self.active {
            Some((current, direction)) if current == column => Some((column, direction.flipped())),
            _ => Some((column, SortDirection::Ascending)),
        };
    }

    /// Applies this sort to `records`; an unset sort keeps input order.
    pub fn apply(&self, records: &[NurseRecord]) -> Vec<NurseRecord> {
        match self.active {
            Some((column, direction)) => sort(records, column, direction),
            None => records.to_vec(),
        }
    }
}

/// Returns `records` ordered by `column`.
///
/// `Age` compares numerically, `Dob` chronologically, and the text columns
/// case-insensitively. The sort is stable, so ties keep their input order in
/// both directions.
pub fn sort(records: &[NurseRecord], column: SortColumn, direction: SortDirection) -> Vec<NurseRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ord = compare(a, b, column);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    sorted
}

fn compare(a: &NurseRecord, b: &NurseRecord, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Age => a.age.cmp(&b.age),
        SortColumn::Dob => a.dob.cmp(&b.dob),
        SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortColumn::LicenseNumber => a
            .license_number
            .to_lowercase()
            .cmp(&b.license_number.to_lowercase()),
    }
}

/// Returns the records matching `query`, in input order.
///
/// The query is trimmed and matched case-insensitively as a substring of the
/// name, the license number, the `YYYY-MM-DD` date of birth, or the decimal
/// age. A blank query matches everything.
pub fn filter(records: &[NurseRecord], query: &str) -> Vec<NurseRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| matches(record, &needle))
        .cloned()
        .collect()
}

fn matches(record: &NurseRecord, needle: &str) -> bool {
    record.name.to_lowercase().contains(needle)
        || record.license_number.to_lowercase().contains(needle)
        || record.dob_string().contains(needle)
        || record.age.to_string().contains(needle)
}
