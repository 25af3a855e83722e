// ABOUTME: Flattening of scrape records into tabular rows and CSV serialization.
// ABOUTME: The CSV header comes from the first flattened row; later rows are projected onto it.

//! Flattening and CSV export.
//!
//! Each successful record becomes one row with the columns `url`, `title`,
//! `scraped_at` followed by one column per content group. List-valued groups
//! are joined with `"; "`. Error records are skipped.
//!
//! The column set is taken from the first row only. Columns that appear only
//! in later rows are dropped, and missing columns are written as empty cells.

use std::io::{self, Write};

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::HarvestError;
use crate::result::ScrapeOutcome;

/// Separator used when joining list-valued content groups into one cell.
pub const LIST_SEPARATOR: &str = "; ";

/// One flattened record: ordered column name to cell value.
pub type FlatRow = IndexMap<String, String>;

/// Flatten typed outcomes. Error records are skipped.
pub fn flatten(records: &[ScrapeOutcome]) -> Result<Vec<FlatRow>, HarvestError> {
    let values = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            HarvestError::parse("", "Flatten", Some(anyhow::anyhow!("serialize record: {}", e)))
        })?;
    flatten_values(&values)
}

/// Flatten raw JSON records as posted to the export endpoint.
///
/// Objects carrying an `error` key are skipped. Any other non-object entry is
/// rejected.
pub fn flatten_values(records: &[Value]) -> Result<Vec<FlatRow>, HarvestError> {
    let mut rows = Vec::new();
    for (i, item) in records.iter().enumerate() {
        let obj = item.as_object().ok_or_else(|| {
            HarvestError::validation(
                "",
                "Flatten",
                Some(anyhow::anyhow!("record {} is not an object", i)),
            )
        })?;
        if obj.contains_key("error") {
            continue;
        }

        let mut row = FlatRow::new();
        for key in ["url", "title", "scraped_at"] {
            let cell = match obj.get(key) {
                None | Some(Value::Null) => String::new(),
                Some(v) => render_scalar(v),
            };
            row.insert(key.to_string(), cell);
        }

        if let Some(Value::Object(content)) = obj.get("content") {
            for (name, value) in content {
                let cell = match value {
                    Value::Array(items) => items
                        .iter()
                        .map(render_scalar)
                        .collect::<Vec<_>>()
                        .join(LIST_SEPARATOR),
                    other => render_scalar(other),
                };
                row.insert(name.clone(), cell);
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Render a value as a single cell. Strings are written as-is, structured
/// values in a `{'key': 'value'}` form.
fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => render_repr(other),
    }
}

fn render_repr(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote_repr(s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(render_repr).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quote_repr(k), render_repr(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
    }
}

fn quote_repr(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row terminated by CRLF.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    write!(w, "\r\n")
}

/// Write `rows` as CSV with a header taken from the first row.
pub fn write_csv<W: Write>(mut w: W, rows: &[FlatRow]) -> io::Result<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    let header: Vec<&str> = first.keys().map(String::as_str).collect();
    write_row(&mut w, &header)?;
    for row in rows {
        let cells: Vec<&str> = header
            .iter()
            .map(|col| row.get(*col).map(String::as_str).unwrap_or(""))
            .collect();
        write_row(&mut w, &cells)?;
    }
    Ok(())
}

/// Render `rows` as a CSV string. No rows gives an empty string.
pub fn to_csv(rows: &[FlatRow]) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_csv(&mut buf, rows);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{Content, ContentValue, ErrorRecord, ScrapeRecord};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn page(url: &str, groups: &[(&str, Vec<ContentValue>)]) -> ScrapeOutcome {
        let mut content = Content::new();
        for (name, values) in groups {
            content.insert(name.to_string(), values.clone());
        }
        ScrapeOutcome::Page(ScrapeRecord {
            url: url.to_string(),
            title: "T".to_string(),
            scraped_at: "2024-05-01T10:00:00.000000".to_string(),
            content,
        })
    }

    fn text(s: &str) -> ContentValue {
        ContentValue::Text(s.to_string())
    }

    #[test]
    fn test_list_groups_are_joined() {
        let rows = flatten(&[page(
            "https://a.test",
            &[("headings", vec![text("H1"), text("H2")])],
        )])
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["headings"], "H1; H2");
        assert_eq!(
            to_csv(&rows),
            "url,title,scraped_at,headings\r\nhttps://a.test,T,2024-05-01T10:00:00.000000,H1; H2\r\n"
        );
    }

    #[test]
    fn test_error_records_skipped() {
        let rows = flatten(&[
            ScrapeOutcome::Failed(ErrorRecord::new("https://bad.test", "HTTP status 500")),
            page("https://a.test", &[]),
        ])
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["url"], "https://a.test");
    }

    #[test]
    fn test_header_from_first_record_only() {
        let rows = flatten(&[
            page("https://a.test", &[("a", vec![text("1")])]),
            page("https://b.test", &[("b", vec![text("2")])]),
        ])
        .unwrap();

        let csv = to_csv(&rows);
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(lines[0], "url,title,scraped_at,a");
        assert_eq!(lines[2], "https://b.test,T,2024-05-01T10:00:00.000000,");
    }

    #[test]
    fn test_links_render_as_mappings() {
        let rows = flatten(&[page(
            "https://a.test",
            &[(
                "links",
                vec![ContentValue::Link {
                    text: "Home".into(),
                    href: "https://a.test/".into(),
                }],
            )],
        )])
        .unwrap();
        assert_eq!(rows[0]["links"], "{'text': 'Home', 'href': 'https://a.test/'}");
    }

    #[test]
    fn test_cells_with_delimiters_are_quoted() {
        let rows = flatten(&[page(
            "https://a.test",
            &[("quote", vec![text("say \"hi\", then\nleave")])],
        )])
        .unwrap();
        let csv = to_csv(&rows);
        assert!(csv.contains("\"say \"\"hi\"\", then\nleave\"\r\n"));
    }

    #[test]
    fn test_flatten_raw_values() {
        let rows = flatten_values(&[
            json!({"error": "boom", "url": "x"}),
            json!({"url": "u", "content": {"count": 3, "tags": ["a", 1, null]}}),
        ])
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["title"], "");
        assert_eq!(rows[0]["count"], "3");
        assert_eq!(rows[0]["tags"], "a; 1; None");
    }

    #[test]
    fn test_null_fixed_columns_are_empty() {
        let rows = flatten_values(&[json!({"url": "u", "title": null, "scraped_at": null})]).unwrap();
        assert_eq!(rows[0]["title"], "");
        assert_eq!(rows[0]["scraped_at"], "");
    }

    #[test]
    fn test_link_text_escapes_control_characters() {
        let rows = flatten(&[page(
            "https://a.test",
            &[(
                "links",
                vec![ContentValue::Link {
                    text: "Line one\nLine\ttwo \\ it's".into(),
                    href: "https://a.test/".into(),
                }],
            )],
        )])
        .unwrap();
        assert_eq!(
            rows[0]["links"],
            r#"{'text': "Line one\nLine\ttwo \\ it's", 'href': 'https://a.test/'}"#
        );
    }

    #[test]
    fn test_flatten_rejects_non_objects() {
        let err = flatten_values(&[json!("just a string")]).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_empty_input_gives_empty_csv() {
        assert_eq!(to_csv(&[]), "");
    }
}
