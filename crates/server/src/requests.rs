// ABOUTME: Typed request bodies for the scrape API and their validation into jobs.
// ABOUTME: Validation happens here, before any fetch or extraction is attempted.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use digests_harvest::{SelectorRules, DEFAULT_BATCH_DELAY, DEFAULT_TABLE_SELECTOR};

use crate::error::ApiError;

/// Body of `POST /api/scrape`.
#[derive(Debug, Default, Deserialize)]
pub struct ScrapeRequest {
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub selectors: Option<SelectorRules>,
    pub table_selector: Option<String>,
}

/// A validated single-page scrape.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeJob {
    Basic {
        url: String,
        rules: Option<SelectorRules>,
    },
    Table {
        url: String,
        table_selector: String,
    },
}

impl ScrapeRequest {
    pub fn validate(self) -> Result<ScrapeJob, ApiError> {
        let url = non_empty(self.url).ok_or_else(|| ApiError::BadRequest("URL is required".into()))?;

        match self.kind.as_deref().unwrap_or("basic") {
            "basic" => Ok(ScrapeJob::Basic {
                url,
                rules: self.selectors.filter(|r| !r.is_empty()),
            }),
            "table" => Ok(ScrapeJob::Table {
                url,
                table_selector: non_empty(self.table_selector)
                    .unwrap_or_else(|| DEFAULT_TABLE_SELECTOR.to_string()),
            }),
            _ => Err(ApiError::BadRequest("Invalid scrape type".into())),
        }
    }
}

/// Body of `POST /api/scrape-multiple`.
#[derive(Debug, Default, Deserialize)]
pub struct BatchRequest {
    pub urls: Option<Vec<String>>,
    pub selectors: Option<SelectorRules>,
    /// Seconds between requests.
    pub delay: Option<f64>,
}

/// A validated batch scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchJob {
    pub urls: Vec<String>,
    pub rules: Option<SelectorRules>,
    pub delay: Duration,
}

impl BatchRequest {
    pub fn validate(self) -> Result<BatchJob, ApiError> {
        let urls = self
            .urls
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ApiError::BadRequest("URLs are required".into()))?;

        let delay = match self.delay {
            None => DEFAULT_BATCH_DELAY,
            Some(secs) => Duration::try_from_secs_f64(secs).map_err(|_| {
                ApiError::BadRequest("delay must be a non-negative number of seconds".into())
            })?,
        };

        Ok(BatchJob {
            urls,
            rules: self.selectors.filter(|r| !r.is_empty()),
            delay,
        })
    }
}

/// Body of `POST /api/export-csv`.
#[derive(Debug, Default, Deserialize)]
pub struct ExportRequest {
    pub data: Option<Vec<Value>>,
}

impl ExportRequest {
    pub fn validate(self) -> Result<Vec<Value>, ApiError> {
        self.data
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ApiError::BadRequest("No data to export".into()))
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scrape(body: Value) -> Result<ScrapeJob, ApiError> {
        serde_json::from_value::<ScrapeRequest>(body).unwrap().validate()
    }

    #[test]
    fn scrape_defaults_to_basic() {
        let job = scrape(json!({"url": "https://a.test"})).unwrap();
        assert_eq!(
            job,
            ScrapeJob::Basic {
                url: "https://a.test".into(),
                rules: None
            }
        );
    }

    #[test]
    fn empty_selectors_mean_defaults() {
        let job = scrape(json!({"url": "https://a.test", "selectors": {}})).unwrap();
        assert!(matches!(job, ScrapeJob::Basic { rules: None, .. }));
    }

    #[test]
    fn table_defaults_selector() {
        let job = scrape(json!({"url": "https://a.test", "type": "table"})).unwrap();
        assert_eq!(
            job,
            ScrapeJob::Table {
                url: "https://a.test".into(),
                table_selector: "table".into()
            }
        );
    }

    #[test]
    fn scrape_rejects_missing_url_and_bad_type() {
        let err = scrape(json!({"type": "basic"})).unwrap_err();
        assert_eq!(err.to_string(), "URL is required");

        let err = scrape(json!({"url": "", "type": "basic"})).unwrap_err();
        assert_eq!(err.to_string(), "URL is required");

        let err = scrape(json!({"url": "https://a.test", "type": "pdf"})).unwrap_err();
        assert_eq!(err.to_string(), "Invalid scrape type");
    }

    #[test]
    fn batch_validation() {
        let job = serde_json::from_value::<BatchRequest>(json!({"urls": ["a", "b"], "delay": 0.5}))
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(job.urls.len(), 2);
        assert_eq!(job.delay, Duration::from_millis(500));

        let job = serde_json::from_value::<BatchRequest>(json!({"urls": ["a"]}))
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(job.delay, Duration::from_secs(1));

        let err = BatchRequest::default().validate().unwrap_err();
        assert_eq!(err.to_string(), "URLs are required");

        let err = serde_json::from_value::<BatchRequest>(json!({"urls": ["a"], "delay": -1}))
            .unwrap()
            .validate()
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn export_requires_data() {
        let err = ExportRequest { data: Some(vec![]) }.validate().unwrap_err();
        assert_eq!(err.to_string(), "No data to export");
    }
}
