//! HTML page rendering
//!
//! Pages are plain server-rendered HTML; every form posts back and the
//! server answers with a redirect, so the browser never needs JavaScript.

use crate::app::Screen;
use crate::router::Route;
use crate::storage::{Entry, Vital};
use crate::view::{DisplayZone, RangeMode, Row};
use std::fmt::Write;

const STYLE: &str = "body{font-family:sans-serif;max-width:860px;margin:0 auto;padding:1rem;color:#1f2937}\
nav a{margin-right:1rem}\
table{border-collapse:collapse;width:100%}\
th,td{padding:.35rem .5rem;border-bottom:1px solid #e5e7eb;text-align:right}\
th:first-child,td:first-child{text-align:left}\
form.inline{display:inline}\
fieldset{border:1px solid #e5e7eb;margin:1rem 0}\
.message{padding:1rem;border:1px solid #fca5a5;background:#fef2f2}";

/// Escape text for HTML element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        STYLE,
        body
    )
}

fn nav(current: Route, range: RangeMode) -> String {
    let link = |route: Route, label: &str| {
        let marker = if route == current { " aria-current=\"page\"" } else { "" };
        format!(
            "<a href=\"/?page={}&amp;range={}\"{}>{}</a>",
            route, range, marker, label
        )
    };

    format!(
        "<nav>{}{}<a href=\"/export\">Export CSV</a></nav>\n",
        link(Route::Home, "Home"),
        link(Route::All, "All entries")
    )
}

fn vital_input(vital: Vital, value: &str) -> String {
    let range = vital.range();
    format!(
        "<label>{} ({}) <input type=\"number\" name=\"{}\" min=\"{}\" max=\"{}\" value=\"{}\" required></label>\n",
        capitalize(&vital.to_string()),
        vital.unit(),
        vital,
        range.start(),
        range.end(),
        escape(value)
    )
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// New-entry form; "Now" reloads the page to refresh the time field
fn add_form(now_input: &str, route: Route, range: RangeMode) -> String {
    let mut html = String::from("<form method=\"post\" action=\"/entries\">\n<fieldset>\n<legend>New measurement</legend>\n");
    let _ = writeln!(
        html,
        "<label>When <input type=\"datetime-local\" name=\"at\" value=\"{}\" required></label> \
<a href=\"/?page={}&amp;range={}\">Now</a>",
        escape(now_input),
        route,
        range
    );
    for vital in Vital::all() {
        html.push_str(&vital_input(*vital, ""));
    }
    html.push_str("<button type=\"submit\">Add</button>\n</fieldset>\n</form>\n");
    html
}

fn range_selector(route: Route, current: RangeMode) -> String {
    let mut html = String::from("<form method=\"get\" action=\"/\">\n");
    let _ = writeln!(html, "<input type=\"hidden\" name=\"page\" value=\"{}\">", route);
    html.push_str("<label>Chart range <select name=\"range\">\n");
    for mode in RangeMode::all() {
        let selected = if *mode == current { " selected" } else { "" };
        let _ = writeln!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            mode,
            selected,
            mode.label()
        );
    }
    html.push_str("</select></label>\n<button type=\"submit\">Show</button>\n</form>\n");
    html
}

fn entry_table(rows: &[Row]) -> String {
    if rows.is_empty() {
        return "<p>No entries yet</p>\n".to_string();
    }

    let mut html = String::from(
        "<table>\n<thead><tr><th>When</th><th>SYS</th><th>DIA</th><th>Pulse</th><th></th></tr></thead>\n<tbody>\n",
    );
    for row in rows {
        let id = escape(&row.id);
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
<td><a href=\"/entries/{id}/edit\">Edit</a> <a href=\"/entries/{id}/delete\">Delete</a></td></tr>",
            escape(&row.when),
            row.systolic,
            row.diastolic,
            row.pulse,
            id = id
        );
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn import_form() -> String {
    "<form method=\"post\" action=\"/import\" enctype=\"multipart/form-data\">\n<fieldset>\n\
<legend>Import CSV</legend>\n<input type=\"file\" name=\"file\" accept=\".csv,text/csv\" required>\n\
<button type=\"submit\">Import</button>\n</fieldset>\n</form>\n"
        .to_string()
}

/// The main page (home or all entries)
pub fn main_page(screen: &Screen) -> String {
    let mut body = String::from("<h1>Blood pressure log</h1>\n");
    body.push_str(&nav(screen.route, screen.range));
    body.push_str(&add_form(&screen.now_input, screen.route, screen.range));

    if let Some(chart) = &screen.chart {
        body.push_str("<section>\n");
        body.push_str(&range_selector(screen.route, screen.range));
        body.push_str(&chart.document);
        body.push_str("</section>\n");
    }

    let heading = match screen.route {
        Route::Home => "Recent entries",
        Route::All => "All entries",
    };
    let _ = writeln!(body, "<h2>{}</h2>", heading);
    body.push_str(&entry_table(screen.rows()));
    body.push_str(&import_form());

    layout("Blood pressure log", &body)
}

/// Edit form for one entry
pub fn edit_page(entry: &Entry, zone: DisplayZone) -> String {
    let id = escape(&entry.id);
    let mut body = String::from("<h1>Edit entry</h1>\n");
    let _ = writeln!(body, "<p>{}</p>", escape(&zone.format_row_time(entry.ts)));
    let _ = writeln!(body, "<form method=\"post\" action=\"/entries/{}\">", id);
    let values = entry.vitals();
    for vital in Vital::all() {
        let value = match vital {
            Vital::Systolic => values.systolic,
            Vital::Diastolic => values.diastolic,
            Vital::Pulse => values.pulse,
        };
        body.push_str(&vital_input(*vital, &value.to_string()));
    }
    body.push_str("<button type=\"submit\">Save</button> <a href=\"/\">Cancel</a>\n</form>\n");

    layout("Edit entry", &body)
}

/// Confirmation step before a delete
pub fn delete_page(entry: &Entry, zone: DisplayZone, prompt: &str) -> String {
    let id = escape(&entry.id);
    let mut body = format!("<h1>{}</h1>\n", escape(prompt));
    let _ = writeln!(
        body,
        "<p>{}: {}/{} mmHg, pulse {}</p>",
        escape(&zone.format_row_time(entry.ts)),
        entry.s,
        entry.d,
        entry.p
    );
    let _ = writeln!(
        body,
        "<form method=\"post\" action=\"/entries/{}/delete\">\n\
<input type=\"hidden\" name=\"confirm\" value=\"yes\">\n\
<button type=\"submit\">Delete</button> <a href=\"/\">Cancel</a>\n</form>",
        id
    );

    layout("Delete entry", &body)
}

/// A blocking message with a way back
pub fn message_page(title: &str, message: &str) -> String {
    let body = format!(
        "<h1>{}</h1>\n<p class=\"message\">{}</p>\n<p><a href=\"/\">Back</a></p>\n",
        escape(title),
        escape(message)
    );
    layout(title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Vitals;

    fn utc() -> DisplayZone {
        DisplayZone::parse("utc").unwrap()
    }

    fn screen(route: Route, rows: Vec<Row>) -> Screen {
        Screen {
            route,
            range: RangeMode::Last30,
            recent: rows.iter().take(5).cloned().collect(),
            all: rows,
            now_input: "2024-01-15T08:30".to_string(),
            chart: None,
        }
    }

    fn row(id: &str) -> Row {
        Row {
            id: id.to_string(),
            when: "24/01/15 08:30".to_string(),
            systolic: 120,
            diastolic: 80,
            pulse: 65,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_main_page_empty() {
        let html = main_page(&screen(Route::Home, vec![]));

        assert!(html.contains("No entries yet"));
        assert!(html.contains("value=\"2024-01-15T08:30\""));
        assert!(html.contains("action=\"/import\""));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_main_page_rows_follow_route() {
        let rows: Vec<Row> = (0..7).map(|i| row(&format!("id{}", i))).collect();

        let home = main_page(&screen(Route::Home, rows.clone()));
        assert_eq!(home.matches("/edit\"").count(), 5);
        assert!(home.contains("Recent entries"));

        let all = main_page(&screen(Route::All, rows));
        assert_eq!(all.matches("/edit\"").count(), 7);
        assert!(all.contains("All entries</h2>"));
    }

    #[test]
    fn test_vital_inputs_carry_bounds() {
        let html = main_page(&screen(Route::Home, vec![]));

        assert!(html.contains("name=\"systolic\" min=\"60\" max=\"250\""));
        assert!(html.contains("name=\"diastolic\" min=\"40\" max=\"200\""));
        assert!(html.contains("name=\"pulse\" min=\"30\" max=\"200\""));
    }

    #[test]
    fn test_vital_labels_show_units() {
        let html = main_page(&screen(Route::Home, vec![]));

        assert!(html.contains("Systolic (mmHg)"));
        assert!(html.contains("Diastolic (mmHg)"));
        assert!(html.contains("Pulse (bpm)"));
    }

    #[test]
    fn test_add_form_now_link_keeps_page_and_range() {
        let html = main_page(&screen(Route::All, vec![]));

        assert!(html.contains("<a href=\"/?page=all&amp;range=30\">Now</a>"));
    }

    #[test]
    fn test_edit_page_prefilled() {
        let entry = Entry::with_id("abc", 1_705_307_400_000, Vitals::new(131, 84, 70));
        let html = edit_page(&entry, utc());

        assert!(html.contains("action=\"/entries/abc\""));
        assert!(html.contains("value=\"131\""));
        assert!(html.contains("value=\"84\""));
        assert!(html.contains("24/01/15 08:30"));
    }

    #[test]
    fn test_delete_page_asks() {
        let entry = Entry::with_id("abc", 0, Vitals::new(120, 80, 65));
        let html = delete_page(&entry, utc(), "Delete this entry?");

        assert!(html.contains("Delete this entry?"));
        assert!(html.contains("name=\"confirm\" value=\"yes\""));
    }

    #[test]
    fn test_message_page_escapes() {
        let html = message_page("Oops", "<bad>");
        assert!(html.contains("&lt;bad&gt;"));
    }
}
