//! CSV Export
//!
//! Writes the collection in held order (newest first) with a header line.
//! Rows are separated by `\n` and the document has no trailing newline.

use crate::storage::Entry;
use crate::transfer::{TransferResult, CSV_COLUMNS, EXPORT_FILENAME};

/// A downloadable CSV document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

impl CsvExport {
    pub fn content_type(&self) -> &'static str {
        "text/csv"
    }
}

/// Serialize entries to CSV
pub fn export_csv(entries: &[Entry]) -> TransferResult<CsvExport> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_COLUMNS)?;
    for entry in entries {
        writer.write_record(&[
            entry.ts.to_string(),
            entry.s.to_string(),
            entry.d.to_string(),
            entry.p.to_string(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let mut content = String::from_utf8(bytes)?;
    if content.ends_with('\n') {
        content.pop();
    }

    Ok(CsvExport {
        filename: EXPORT_FILENAME.to_string(),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Vitals;

    #[test]
    fn test_export_single_entry() {
        let entries = vec![Entry::with_id("a", 1_700_000_000_000, Vitals::new(120, 80, 65))];

        let export = export_csv(&entries).unwrap();

        assert_eq!(export.filename, "bpbook.csv");
        assert_eq!(export.content_type(), "text/csv");
        assert_eq!(
            export.content,
            "timestamp,systolic,diastolic,pulse\n1700000000000,120,80,65"
        );
    }

    #[test]
    fn test_export_keeps_given_order() {
        let entries = vec![
            Entry::with_id("b", 2, Vitals::new(130, 85, 70)),
            Entry::with_id("a", 1, Vitals::new(120, 80, 65)),
        ];

        let export = export_csv(&entries).unwrap();

        assert_eq!(
            export.content,
            "timestamp,systolic,diastolic,pulse\n2,130,85,70\n1,120,80,65"
        );
    }

    #[test]
    fn test_export_empty_collection_is_header_only() {
        let export = export_csv(&[]).unwrap();
        assert_eq!(export.content, "timestamp,systolic,diastolic,pulse");
    }
}
