//! Request value objects for manual entry and edits
//!
//! Raw user input (form fields, CLI arguments, prompt answers) is turned into
//! validated values here, so the repository only ever sees numbers.

use crate::repository::error::ValidationError;
use crate::storage::{Vital, Vitals};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::Deserialize;

/// Format produced by the "set to now" action and accepted by the add form
pub const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Wall-clock formats accepted for the add form, interpreted in local time
const LOCAL_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// A validated entry waiting to be inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewEntry {
    pub ts: i64,
    pub vitals: Vitals,
}

/// The add form as typed by the user
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddForm {
    /// Date and time, usually `YYYY-MM-DDTHH:MM`
    pub at: String,
    pub systolic: String,
    pub diastolic: String,
    pub pulse: String,
}

impl AddForm {
    pub fn new(
        at: impl Into<String>,
        systolic: impl Into<String>,
        diastolic: impl Into<String>,
        pulse: impl Into<String>,
    ) -> Self {
        Self {
            at: at.into(),
            systolic: systolic.into(),
            diastolic: diastolic.into(),
            pulse: pulse.into(),
        }
    }

    /// Validate the form, reading wall-clock times in the local time zone
    pub fn parse(&self) -> Result<NewEntry, ValidationError> {
        self.parse_in(&Local)
    }

    /// Validate the form, reading wall-clock times in `tz`
    pub fn parse_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<NewEntry, ValidationError> {
        let ts = parse_timestamp_in(&self.at, tz)?;
        let vitals = parse_vitals(&self.systolic, &self.diastolic, &self.pulse)?;
        check_ranges(vitals)?;
        Ok(NewEntry { ts, vitals })
    }
}

/// Replacement values for an existing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EditRequest {
    pub systolic: i32,
    pub diastolic: i32,
    pub pulse: i32,
}

impl EditRequest {
    pub fn new(systolic: i32, diastolic: i32, pulse: i32) -> Self {
        Self {
            systolic,
            diastolic,
            pulse,
        }
    }

    /// Build a request from raw text fields
    pub fn parse(systolic: &str, diastolic: &str, pulse: &str) -> Result<Self, ValidationError> {
        let vitals = parse_vitals(systolic, diastolic, pulse)?;
        Ok(Self::new(vitals.systolic, vitals.diastolic, vitals.pulse))
    }

    pub fn vitals(&self) -> Vitals {
        Vitals::new(self.systolic, self.diastolic, self.pulse)
    }

    /// Range-check the requested values
    pub fn validate(&self) -> Result<Vitals, ValidationError> {
        let vitals = self.vitals();
        check_ranges(vitals)?;
        Ok(vitals)
    }
}

impl From<Vitals> for EditRequest {
    fn from(vitals: Vitals) -> Self {
        Self::new(vitals.systolic, vitals.diastolic, vitals.pulse)
    }
}

/// The edit form as typed by the user
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EditForm {
    pub systolic: String,
    pub diastolic: String,
    pub pulse: String,
}

impl EditForm {
    pub fn to_request(&self) -> Result<EditRequest, ValidationError> {
        EditRequest::parse(&self.systolic, &self.diastolic, &self.pulse)
    }
}

/// Reject the first vital outside its accepted range
pub fn check_ranges(vitals: Vitals) -> Result<(), ValidationError> {
    match vitals.first_out_of_range() {
        Some((vital, value)) => Err(ValidationError::out_of_range(vital, value)),
        None => Ok(()),
    }
}

/// Parse one vital as a whole number
pub fn parse_vital(vital: Vital, input: &str) -> Result<i32, ValidationError> {
    input
        .trim()
        .parse::<i32>()
        .map_err(|_| ValidationError::NotANumber {
            vital,
            input: input.to_string(),
        })
}

fn parse_vitals(systolic: &str, diastolic: &str, pulse: &str) -> Result<Vitals, ValidationError> {
    Ok(Vitals::new(
        parse_vital(Vital::Systolic, systolic)?,
        parse_vital(Vital::Diastolic, diastolic)?,
        parse_vital(Vital::Pulse, pulse)?,
    ))
}

/// Parse a user-supplied date/time into epoch milliseconds
///
/// Accepts epoch milliseconds, RFC 3339, and wall-clock `YYYY-MM-DD[T ]HH:MM[:SS]`
/// or `YYYY-MM-DD` read in `tz`.
pub fn parse_timestamp_in<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<i64, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::MissingTimestamp);
    }

    if let Ok(millis) = input.parse::<i64>() {
        return Ok(millis);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.timestamp_millis());
    }

    for fmt in LOCAL_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return local_millis(naive, tz, input);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return local_millis(naive, tz, input);
        }
    }

    Err(ValidationError::InvalidTimestamp(input.to_string()))
}

fn local_millis<Tz: TimeZone>(
    naive: NaiveDateTime,
    tz: &Tz,
    input: &str,
) -> Result<i64, ValidationError> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| ValidationError::InvalidTimestamp(input.to_string()))
}
