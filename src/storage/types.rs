//! Core data types for the blood-pressure book
//!
//! This module defines the fundamental types used throughout the storage layer:
//! - `Entry`: A single blood-pressure/pulse measurement
//! - `Vital`: The three measured quantities and their accepted ranges
//! - `Vitals`: A systolic/diastolic/pulse triple

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// A single measurement record
///
/// Field names are kept short because the whole collection is persisted as
/// one JSON blob (`{"id","ts","s","d","p"}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    /// Opaque unique identifier (UUID v4)
    pub id: String,
    /// Unix timestamp in milliseconds
    pub ts: i64,
    /// Systolic pressure (mmHg)
    pub s: i32,
    /// Diastolic pressure (mmHg)
    pub d: i32,
    /// Pulse rate (bpm)
    pub p: i32,
}

impl Entry {
    /// Create an entry with a freshly generated id
    pub fn new(ts: i64, vitals: Vitals) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), ts, vitals)
    }

    /// Create an entry with an explicit id
    pub fn with_id(id: impl Into<String>, ts: i64, vitals: Vitals) -> Self {
        Self {
            id: id.into(),
            ts,
            s: vitals.systolic,
            d: vitals.diastolic,
            p: vitals.pulse,
        }
    }

    /// The measured values of this entry
    pub fn vitals(&self) -> Vitals {
        Vitals::new(self.s, self.d, self.p)
    }

    /// Replace the measured values, keeping id and timestamp
    pub fn set_vitals(&mut self, vitals: Vitals) {
        self.s = vitals.systolic;
        self.d = vitals.diastolic;
        self.p = vitals.pulse;
    }
}

/// Systolic, diastolic and pulse values taken together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vitals {
    pub systolic: i32,
    pub diastolic: i32,
    pub pulse: i32,
}

impl Vitals {
    pub fn new(systolic: i32, diastolic: i32, pulse: i32) -> Self {
        Self {
            systolic,
            diastolic,
            pulse,
        }
    }

    /// First vital that falls outside its accepted range, if any
    pub fn first_out_of_range(&self) -> Option<(Vital, i32)> {
        [
            (Vital::Systolic, self.systolic),
            (Vital::Diastolic, self.diastolic),
            (Vital::Pulse, self.pulse),
        ]
        .into_iter()
        .find(|(vital, value)| !vital.accepts(*value))
    }
}

/// One of the three measured quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vital {
    Systolic,
    Diastolic,
    Pulse,
}

impl Vital {
    /// Get all vitals in column order
    pub fn all() -> &'static [Vital] {
        &[Vital::Systolic, Vital::Diastolic, Vital::Pulse]
    }

    /// Range accepted for manual entry and edits
    pub fn range(&self) -> RangeInclusive<i32> {
        match self {
            Vital::Systolic => 60..=250,
            Vital::Diastolic => 40..=200,
            Vital::Pulse => 30..=200,
        }
    }

    pub fn accepts(&self, value: i32) -> bool {
        self.range().contains(&value)
    }

    /// Unit of measurement
    pub fn unit(&self) -> &'static str {
        match self {
            Vital::Systolic | Vital::Diastolic => "mmHg",
            Vital::Pulse => "bpm",
        }
    }
}

impl std::fmt::Display for Vital {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Vital::Systolic => write!(f, "systolic"),
            Vital::Diastolic => write!(f, "diastolic"),
            Vital::Pulse => write!(f, "pulse"),
        }
    }
}

/// Sort entries newest first (the order the collection is always held in)
pub fn sort_descending(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.ts.cmp(&a.ts));
}
