//! Nurse record types and request-body validation.
//!
//! Three shapes exist for the same entity:
//!
//! - [`NurseRecord`] is a stored row, including the system-assigned `id` and
//!   timestamps.
//! - [`NurseFields`] holds the four editable fields after validation. It is the
//!   only shape the store accepts for writes.
//! - [`NurseInput`] is the loosely-typed body as it arrives over the network.
//!   [`NurseInput::validate`] converts it into [`NurseFields`] or rejects it.

use crate::{NursedeskError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire and storage format for dates of birth.
pub const DOB_FORMAT: &str = "%Y-%m-%d";

/// A nurse record as persisted in the database.
///
/// `age` is stored as submitted and is never recomputed from `dob`, so the two
/// may disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NurseRecord {
    pub id: i64,
    pub name: String,
    pub license_number: String,
    pub dob: NaiveDate,
    pub age: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NurseRecord {
    /// The editable part of this record.
    pub fn fields(&self) -> NurseFields {
        NurseFields {
            name: self.name.clone(),
            license_number: self.license_number.clone(),
            dob: self.dob,
            age: self.age,
        }
    }

    /// `dob` rendered the way it travels on the wire.
    pub fn dob_string(&self) -> String {
        self.dob.format(DOB_FORMAT).to_string()
    }
}

/// The four user-editable fields of a nurse record, already validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NurseFields {
    pub name: String,
    pub license_number: String,
    pub dob: NaiveDate,
    pub age: u32,
}

/// A create/update request body before validation.
///
/// Every field is optional so that a partial payload deserializes and can be
/// rejected with a message naming the missing field, rather than failing
/// with a generic JSON error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NurseInput {
    pub name: Option<String>,
    pub license_number: Option<String>,
    pub dob: Option<String>,
    /// Accepted as a JSON number or a numeric string, as HTML forms send it.
    pub age: Option<Value>,
}

impl NurseInput {
    /// Checks that all four fields are present and well-formed. Text fields are
    /// trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`NursedeskError::Validation`] naming the first field that is
    /// missing, blank, or cannot be coerced to its type.
    pub fn validate(self) -> Result<NurseFields> {
        let name = required_text(self.name, "name")?;
        let license_number = required_text(self.license_number, "license_number")?;
        let dob_raw = required_text(self.dob, "dob")?;
        let dob = NaiveDate::parse_from_str(dob_raw.trim(), DOB_FORMAT).map_err(|_| {
            NursedeskError::Validation(format!(
                "Invalid date of birth '{dob_raw}': expected YYYY-MM-DD"
            ))
        })?;
        let age = coerce_age(self.age)?;

        Ok(NurseFields {
            name,
            license_number,
            dob,
            age,
        })
    }
}

fn required_text(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(NursedeskError::Validation(format!(
            "Missing required field: {field}"
        ))),
    }
}

fn coerce_age(value: Option<Value>) -> Result<u32> {
    let invalid = || NursedeskError::Validation("Age must be a non-negative integer".to_string());

    match value {
        None | Some(Value::Null) => Err(NursedeskError::Validation(
            "Missing required field: age".to_string(),
        )),
        Some(Value::String(s)) if s.trim().is_empty() => Err(NursedeskError::Validation(
            "Missing required field: age".to_string(),
        )),
        Some(Value::String(s)) => s.trim().parse::<u32>().map_err(|_| invalid()),
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                u32::try_from(v).map_err(|_| invalid())
            } else if let Some(f) = n.as_f64() {
                if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) {
                    Ok(f as u32)
                } else {
                    Err(invalid())
                }
            } else {
                Err(invalid())
            }
        }
        Some(_) => Err(invalid()),
    }
}
