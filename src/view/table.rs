//! Plain-text table for terminal output

use crate::view::Row;
use std::fmt::Write;

/// Render rows as an aligned text table
pub fn render_table(rows: &[Row]) -> String {
    let mut out = String::new();

    if rows.is_empty() {
        out.push_str("No entries yet\n");
        return out;
    }

    // Header
    let _ = writeln!(
        out,
        "{:<15} | {:>4} | {:>4} | {:>5} | {}",
        "Date", "Sys", "Dia", "Pulse", "ID"
    );

    // Separator
    let _ = writeln!(out, "{}", "-".repeat(76));

    // Data rows
    for row in rows {
        let _ = writeln!(
            out,
            "{:<15} | {:>4} | {:>4} | {:>5} | {}",
            row.when, row.systolic, row.diastolic, row.pulse, row.id
        );
    }

    out
}
