//! CSV Import
//!
//! Parses `timestamp,systolic,diastolic,pulse` rows. The header is optional
//! and extra columns are ignored. Rows whose first four fields are not all
//! finite numbers are dropped without an error. An empty field makes its row
//! invalid; it is never read as 0. Values are not range-checked here;
//! imported rows are taken as they are.
//!
//! Every line is one record split on commas. Quotes have no special meaning,
//! so a stray `"` stays inside its field and cannot swallow the lines after it.

use crate::storage::Vitals;
use crate::transfer::CSV_HEADER_MARKER;

/// A row that survived parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportedRow {
    /// Unix timestamp in milliseconds
    pub ts: i64,
    pub vitals: Vitals,
}

/// Result of parsing a CSV document
#[derive(Debug, Default)]
pub struct CsvParseResult {
    pub rows: Vec<ImportedRow>,
    /// Whether the first record was recognised as a header
    pub header_skipped: bool,
    /// Non-blank records that were dropped
    pub rows_skipped: usize,
}

/// Parse CSV text into measurement rows
pub fn parse_csv(text: &str) -> CsvParseResult {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut result = CsvParseResult::default();
    let mut first_record = true;

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unreadable CSV record");
                result.rows_skipped += 1;
                continue;
            }
        };

        // Whitespace-only lines come through as a single empty field
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        if std::mem::take(&mut first_record) && is_header(&record) {
            result.header_skipped = true;
            continue;
        }

        match parse_row(&record) {
            Some(row) => result.rows.push(row),
            None => result.rows_skipped += 1,
        }
    }

    result
}

/// Header detection: the first field mentions "timestamp" in any case
fn is_header(record: &csv::StringRecord) -> bool {
    record
        .get(0)
        .map(|field| field.to_lowercase().contains(CSV_HEADER_MARKER))
        .unwrap_or(false)
}

fn parse_row(record: &csv::StringRecord) -> Option<ImportedRow> {
    if record.len() < 4 {
        return None;
    }

    let ts = parse_finite(record.get(0)?)?;
    let s = parse_finite(record.get(1)?)?;
    let d = parse_finite(record.get(2)?)?;
    let p = parse_finite(record.get(3)?)?;

    Some(ImportedRow {
        ts: ts.round() as i64,
        vitals: Vitals::new(s.round() as i32, d.round() as i32, p.round() as i32),
    })
}

/// Parse a field as a finite number (rejects empty, NaN and infinities)
fn parse_finite(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}
