// ABOUTME: Record types produced by the extractor: ScrapeRecord, TableScrape, ErrorRecord and batch envelopes.
// ABOUTME: Serialized shapes match the JSON returned by the HTTP API and the CLIs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::HarvestError;

/// Title used when the document has no `<title>` element.
pub const NO_TITLE: &str = "No title";

/// Named selector rules, kept in the order the caller supplied them.
pub type SelectorRules = IndexMap<String, String>;

/// Extracted content groups, keyed by group name.
pub type Content = IndexMap<String, Vec<ContentValue>>;

/// One extracted value inside a content group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentValue {
    Text(String),
    Link { text: String, href: String },
    Image { alt: String, src: String },
}

impl ContentValue {
    /// Returns the text if this is a plain text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for ContentValue {
    fn from(s: String) -> Self {
        ContentValue::Text(s)
    }
}

/// The result of a basic-mode extraction of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeRecord {
    pub url: String,
    pub title: String,
    /// ISO-8601 capture time.
    pub scraped_at: String,
    pub content: Content,
}

/// One table parsed in table mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Position among all tables matched by the selector, including ones
    /// that produced no rows.
    pub table_index: usize,
    pub headers: Vec<String>,
    pub data: Vec<Vec<String>>,
    pub total_rows: usize,
}

/// The result of a table-mode extraction of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableScrape {
    pub url: String,
    pub scraped_at: String,
    pub tables: Vec<TableRecord>,
}

/// Inline failure for a single URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub error: String,
    pub url: String,
}

impl ErrorRecord {
    pub fn new(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            url: url.into(),
        }
    }

    /// Build an error record from an extraction error, keeping the originating URL.
    pub fn from_error(url: &str, err: &HarvestError) -> Self {
        Self::new(url, err.message())
    }
}

/// Outcome of scraping one page in basic mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScrapeOutcome {
    // Failed is listed first so a record carrying an `error` key never
    // deserializes as a page.
    Failed(ErrorRecord),
    Page(ScrapeRecord),
}

/// Outcome of scraping one page in table mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableOutcome {
    Failed(ErrorRecord),
    Tables(TableScrape),
}

macro_rules! impl_outcome {
    ($outcome:ident, $ok:ident, $record:ty) => {
        impl $outcome {
            /// The URL this outcome belongs to, on success or failure.
            pub fn url(&self) -> &str {
                match self {
                    $outcome::$ok(r) => &r.url,
                    $outcome::Failed(e) => &e.url,
                }
            }

            pub fn is_error(&self) -> bool {
                matches!(self, $outcome::Failed(_))
            }

            pub fn error(&self) -> Option<&str> {
                match self {
                    $outcome::Failed(e) => Some(&e.error),
                    _ => None,
                }
            }

            /// Convert an extraction result into an outcome, capturing errors inline.
            pub fn capture(url: &str, result: Result<$record, HarvestError>) -> Self {
                match result {
                    Ok(record) => $outcome::$ok(record),
                    Err(err) => $outcome::Failed(ErrorRecord::from_error(url, &err)),
                }
            }
        }
    };
}

impl_outcome!(ScrapeOutcome, Page, ScrapeRecord);
impl_outcome!(TableOutcome, Tables, TableScrape);

impl ScrapeOutcome {
    pub fn as_page(&self) -> Option<&ScrapeRecord> {
        match self {
            ScrapeOutcome::Page(r) => Some(r),
            ScrapeOutcome::Failed(_) => None,
        }
    }
}

impl TableOutcome {
    pub fn as_tables(&self) -> Option<&TableScrape> {
        match self {
            TableOutcome::Tables(t) => Some(t),
            TableOutcome::Failed(_) => None,
        }
    }
}

/// Results of a sequential batch, one entry per input URL in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub results: Vec<ScrapeOutcome>,
    pub total_scraped: usize,
}

impl From<Vec<ScrapeOutcome>> for BatchResult {
    fn from(results: Vec<ScrapeOutcome>) -> Self {
        let total_scraped = results.len();
        Self {
            results,
            total_scraped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn error_record_serializes_with_url() {
        let outcome = ScrapeOutcome::Failed(ErrorRecord::new("https://x.test", "HTTP status 500"));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"error": "HTTP status 500", "url": "https://x.test"})
        );
        assert_eq!(outcome.url(), "https://x.test");
        assert!(outcome.is_error());
    }

    #[test]
    fn content_values_serialize_untagged() {
        let mut content = Content::new();
        content.insert("headings".into(), vec![ContentValue::Text("Hello".into())]);
        content.insert(
            "links".into(),
            vec![ContentValue::Link {
                text: "Home".into(),
                href: "https://x.test/".into(),
            }],
        );
        content.insert(
            "images".into(),
            vec![ContentValue::Image {
                alt: "".into(),
                src: "https://x.test/a.png".into(),
            }],
        );
        let record = ScrapeRecord {
            url: "https://x.test".into(),
            title: NO_TITLE.into(),
            scraped_at: "2024-01-01T00:00:00".into(),
            content,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value["content"],
            json!({
                "headings": ["Hello"],
                "links": [{"text": "Home", "href": "https://x.test/"}],
                "images": [{"alt": "", "src": "https://x.test/a.png"}]
            })
        );
    }

    #[test]
    fn outcome_deserializes_error_before_page() {
        let outcome: ScrapeOutcome =
            serde_json::from_value(json!({"error": "boom", "url": "https://x.test"})).unwrap();
        assert_eq!(outcome.error(), Some("boom"));

        let outcome: ScrapeOutcome = serde_json::from_value(json!({
            "url": "https://x.test",
            "title": "T",
            "scraped_at": "2024-01-01T00:00:00",
            "content": {"p": ["a", "b"]}
        }))
        .unwrap();
        let page = outcome.as_page().expect("page");
        assert_eq!(page.content["p"][1].as_text(), Some("b"));
    }

    #[test]
    fn batch_counts_every_entry() {
        let batch = BatchResult::from(vec![
            ScrapeOutcome::Failed(ErrorRecord::new("a", "x")),
            ScrapeOutcome::Failed(ErrorRecord::new("b", "y")),
        ]);
        assert_eq!(batch.total_scraped, 2);
    }
}
