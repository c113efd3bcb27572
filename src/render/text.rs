//! Rich-text and formatting helpers shared by the export renderer.
//!
//! The HTML here is owner-authored rich text from the editing widget, a
//! small well-formed subset. Hand-rolled scans are enough; no HTML parser.

use chrono::NaiveDate;

/// Strip tags and decode the entities the rich-text widget emits.
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    let out = out
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">");
    out.trim().to_string()
}

/// Whether the rich text contains a list; lists are exported as bulleted
/// lines instead of one flattened paragraph.
pub fn has_list_items(html: &str) -> bool {
    let lower = html.to_ascii_lowercase();
    lower.contains("<li>") || lower.contains("<li ")
}

/// Extract each `<li>` body as plain text, in document order.
pub fn extract_list_items(html: &str) -> Vec<String> {
    let lower = html.to_ascii_lowercase();
    let mut items = Vec::new();
    let mut pos = 0;

    while let Some(open) = lower[pos..].find("<li") {
        let open = pos + open;
        let Some(tag_end) = lower[open..].find('>') else {
            break;
        };
        let body_start = open + tag_end + 1;
        let Some(close) = lower[body_start..].find("</li") else {
            break;
        };
        let body_end = body_start + close;
        items.push(strip_html(&html[body_start..body_end]));
        pos = body_end + 1;
    }
    items
}

/// Format an ISO-ish date ("2023-05" or "2023-05-10") as "May 2023".
/// Empty input renders as empty; anything unparseable passes through
/// verbatim rather than losing what the user typed.
pub fn format_date(date: &str) -> String {
    if date.is_empty() {
        return String::new();
    }
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", date), "%Y-%m-%d"));
    match parsed {
        Ok(d) => d.format("%b %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Date range in export form; `current` shows "Present" in place of the end.
pub fn format_date_range(start: &str, end: &str, current: bool) -> String {
    let end = if current {
        "Present".to_string()
    } else {
        format_date(end)
    };
    format!("{} - {}", format_date(start), end)
}

/// Export artifact name: whitespace collapsed to underscores plus the
/// export extension.
pub fn export_file_name(document_name: &str) -> String {
    let base: String = document_name
        .trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    let base = if base.is_empty() { "CV".to_string() } else { base };
    format!("{}.{}", base, crate::config::EXPORT_EXTENSION)
}
