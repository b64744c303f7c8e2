//! Markdown rendering helpers for tool payloads
//!
//! Tool results are pre-formatted text by convention, and tabular data
//! (price history, financial statements) is rendered as a markdown table.

/// Render a markdown table from a header row and data rows.
///
/// Rows shorter than the header are padded with empty cells; longer rows
/// are truncated to the header width.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();

    out.push_str("| ");
    out.push_str(&headers.join(" | "));
    out.push_str(" |\n");

    out.push('|');
    for _ in headers {
        out.push_str(" --- |");
    }
    out.push('\n');

    for row in rows {
        out.push_str("| ");
        let mut cells: Vec<&str> = row.iter().map(String::as_str).collect();
        cells.resize(headers.len(), "");
        out.push_str(&cells.join(" | "));
        out.push_str(" |\n");
    }

    out
}
