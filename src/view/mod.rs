//! View Renderer
//!
//! Derives what the front ends display from the repository state:
//!
//! - `recent_rows`: the newest entries for the home page
//! - `all_rows`: every entry, newest first
//! - `ranged_series`: the oldest-first series feeding the chart
//!
//! Timestamps are shown as `YY/MM/DD HH:MM` wall-clock time.

pub mod table;

pub use table::render_table;

use crate::repository::DATETIME_INPUT_FORMAT;
use crate::storage::Entry;
use chrono::{DateTime, FixedOffset, Local, Utc};
use std::str::FromStr;
use thiserror::Error;

/// Number of entries on the home page
pub const RECENT_LIMIT: usize = 5;

/// Display format for timestamps
pub const ROW_TIME_FORMAT: &str = "%y/%m/%d %H:%M";

/// How many of the most recent entries feed the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeMode {
    #[default]
    Last30,
    Last90,
    All,
}

impl RangeMode {
    pub fn all() -> &'static [RangeMode] {
        &[RangeMode::Last30, RangeMode::Last90, RangeMode::All]
    }

    /// Maximum number of entries, None for everything
    pub fn limit(&self) -> Option<usize> {
        match self {
            RangeMode::Last30 => Some(30),
            RangeMode::Last90 => Some(90),
            RangeMode::All => None,
        }
    }

    /// Value used in query strings and config files
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeMode::Last30 => "30",
            RangeMode::Last90 => "90",
            RangeMode::All => "all",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            RangeMode::Last30 => "Last 30",
            RangeMode::Last90 => "Last 90",
            RangeMode::All => "All",
        }
    }
}

impl std::fmt::Display for RangeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown range mode string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown range {0:?}, expected 30, 90 or all")]
pub struct ParseRangeModeError(pub String);

impl FromStr for RangeMode {
    type Err = ParseRangeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "30" => Ok(RangeMode::Last30),
            "90" => Ok(RangeMode::Last90),
            "all" => Ok(RangeMode::All),
            other => Err(ParseRangeModeError(other.to_string())),
        }
    }
}

/// Time zone used when showing timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// The machine's local time zone
    #[default]
    Local,
    /// A fixed UTC offset
    Fixed(FixedOffset),
}

impl DisplayZone {
    /// Parse `local`, `utc` or an offset such as `+09:00`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" | "" => Some(DisplayZone::Local),
            "utc" | "z" => FixedOffset::east_opt(0).map(DisplayZone::Fixed),
            offset => offset.parse::<FixedOffset>().ok().map(DisplayZone::Fixed),
        }
    }

    /// Format a timestamp with a chrono format string
    pub fn format(&self, ts: i64, fmt: &str) -> String {
        let Some(utc) = DateTime::<Utc>::from_timestamp_millis(ts) else {
            return "-".to_string();
        };

        match self {
            DisplayZone::Local => utc.with_timezone(&Local).format(fmt).to_string(),
            DisplayZone::Fixed(offset) => utc.with_timezone(offset).format(fmt).to_string(),
        }
    }

    /// `YY/MM/DD HH:MM`
    pub fn format_row_time(&self, ts: i64) -> String {
        self.format(ts, ROW_TIME_FORMAT)
    }

    /// Current time as an add-form value (`YYYY-MM-DDTHH:MM`)
    pub fn now_input_value(&self) -> String {
        self.format(Utc::now().timestamp_millis(), DATETIME_INPUT_FORMAT)
    }
}

/// One table row, ready to display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: String,
    pub when: String,
    pub systolic: i32,
    pub diastolic: i32,
    pub pulse: i32,
}

/// Turns entries into rows and chart series
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewRenderer {
    zone: DisplayZone,
}

impl ViewRenderer {
    pub fn new(zone: DisplayZone) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> DisplayZone {
        self.zone
    }

    pub fn row(&self, entry: &Entry) -> Row {
        Row {
            id: entry.id.clone(),
            when: self.zone.format_row_time(entry.ts),
            systolic: entry.s,
            diastolic: entry.d,
            pulse: entry.p,
        }
    }

    /// The newest entries (input must be newest first)
    pub fn recent_rows(&self, entries: &[Entry]) -> Vec<Row> {
        entries.iter().take(RECENT_LIMIT).map(|e| self.row(e)).collect()
    }

    /// Every entry (input must be newest first)
    pub fn all_rows(&self, entries: &[Entry]) -> Vec<Row> {
        entries.iter().map(|e| self.row(e)).collect()
    }
}

/// Oldest-first series for the chart, limited to the most recent entries
pub fn ranged_series(entries: &[Entry], mode: RangeMode) -> Vec<Entry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|e| e.ts);

    match mode.limit() {
        Some(n) if sorted.len() > n => sorted.split_off(sorted.len() - n),
        _ => sorted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{sort_descending, Vitals};

    fn utc() -> DisplayZone {
        DisplayZone::parse("utc").unwrap()
    }

    fn entries(count: i64) -> Vec<Entry> {
        let mut entries: Vec<Entry> = (0..count)
            .map(|i| Entry::with_id(format!("e{}", i), i * 60_000, Vitals::new(120, 80, 65)))
            .collect();
        sort_descending(&mut entries);
        entries
    }

    #[test]
    fn test_range_mode_parse() {
        assert_eq!("30".parse::<RangeMode>().unwrap(), RangeMode::Last30);
        assert_eq!("90".parse::<RangeMode>().unwrap(), RangeMode::Last90);
        assert_eq!("ALL".parse::<RangeMode>().unwrap(), RangeMode::All);
        assert!("7".parse::<RangeMode>().is_err());
        assert_eq!(RangeMode::default(), RangeMode::Last30);
    }

    #[test]
    fn test_row_time_format() {
        assert_eq!(utc().format_row_time(1_700_000_000_000), "23/11/14 22:13");

        let tokyo = DisplayZone::parse("+09:00").unwrap();
        assert_eq!(tokyo.format_row_time(1_700_000_000_000), "23/11/15 07:13");
    }

    #[test]
    fn test_now_input_value_shape() {
        let value = utc().now_input_value();
        assert_eq!(value.len(), "2024-01-15T08:30".len());
        assert_eq!(&value[10..11], "T");
    }

    #[test]
    fn test_recent_rows_are_newest_five() {
        let renderer = ViewRenderer::new(utc());
        let rows = renderer.recent_rows(&entries(8));

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["e7", "e6", "e5", "e4", "e3"]);
    }

    #[test]
    fn test_recent_rows_with_few_entries() {
        let renderer = ViewRenderer::new(utc());
        assert_eq!(renderer.recent_rows(&entries(2)).len(), 2);
        assert!(renderer.recent_rows(&[]).is_empty());
    }

    #[test]
    fn test_all_rows_descending() {
        let renderer = ViewRenderer::new(utc());
        let rows = renderer.all_rows(&entries(3));

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].id, "e2");
        assert_eq!(rows[0].when, "70/01/01 00:02");
        assert_eq!(rows[0].systolic, 120);
    }

    #[test]
    fn test_ranged_series_is_ascending_suffix() {
        let all = entries(100);
        let mut ascending = all.clone();
        ascending.sort_by_key(|e| e.ts);

        let series = ranged_series(&all, RangeMode::Last30);
        assert_eq!(series.len(), 30);
        assert_eq!(series.as_slice(), &ascending[70..]);

        let series = ranged_series(&all, RangeMode::Last90);
        assert_eq!(series.as_slice(), &ascending[10..]);

        let series = ranged_series(&all, RangeMode::All);
        assert_eq!(series, ascending);
    }

    #[test]
    fn test_ranged_series_short_collection() {
        let series = ranged_series(&entries(4), RangeMode::Last30);
        let ts: Vec<i64> = series.iter().map(|e| e.ts).collect();
        assert_eq!(ts, vec![0, 60_000, 120_000, 180_000]);
    }

    #[test]
    fn test_display_zone_parse() {
        assert_eq!(DisplayZone::parse("local"), Some(DisplayZone::Local));
        assert!(matches!(DisplayZone::parse("-05:00"), Some(DisplayZone::Fixed(_))));
        assert_eq!(DisplayZone::parse("somewhere"), None);
    }
}
