// ABOUTME: Sequential batch scraping: one URL at a time with a fixed pause between requests.
// ABOUTME: Failures are recorded per URL and never stop the batch.

use std::time::Duration;

use tracing::{debug, info};

use crate::client::Client;
use crate::result::{BatchResult, SelectorRules};

impl Client {
    /// Scrape `urls` in order, waiting `delay` between consecutive requests.
    ///
    /// Produces exactly one outcome per URL, in input order. There is no pause
    /// after the final URL.
    pub async fn scrape_many<S: AsRef<str>>(
        &self,
        urls: &[S],
        rules: Option<&SelectorRules>,
        delay: Duration,
    ) -> BatchResult {
        info!(count = urls.len(), delay_ms = delay.as_millis() as u64, "starting batch");
        let mut results = Vec::with_capacity(urls.len());

        for (i, url) in urls.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                debug!(delay_ms = delay.as_millis() as u64, "waiting before next request");
                tokio::time::sleep(delay).await;
            }
            results.push(self.scrape(url.as_ref(), rules).await);
        }

        let batch = BatchResult::from(results);
        let failed = batch.results.iter().filter(|r| r.is_error()).count();
        info!(total = batch.total_scraped, failed, "batch finished");
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_batch_preserves_order_and_isolates_failures() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/one");
            then.status(200).body("<title>One</title>");
        });
        server.mock(|when, then| {
            when.method(GET).path("/broken");
            then.status(500);
        });
        server.mock(|when, then| {
            when.method(GET).path("/three");
            then.status(200).body("<title>Three</title>");
        });

        let urls = vec![
            server.url("/one"),
            server.url("/broken"),
            "not a url".to_string(),
            server.url("/three"),
        ];
        let client = Client::builder().build().unwrap();
        let batch = client.scrape_many(&urls, None, Duration::ZERO).await;

        assert_eq!(batch.total_scraped, 4);
        let returned: Vec<&str> = batch.results.iter().map(|r| r.url()).collect();
        assert_eq!(returned, urls.iter().map(String::as_str).collect::<Vec<_>>());

        assert_eq!(batch.results[0].as_page().unwrap().title, "One");
        assert_eq!(batch.results[1].error(), Some("HTTP status 500"));
        assert!(batch.results[2].is_error());
        assert_eq!(batch.results[3].as_page().unwrap().title, "Three");
    }

    #[tokio::test]
    async fn test_batch_waits_between_requests() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(200).body("<p>x</p>");
        });

        let urls = vec![server.url("/a"), server.url("/b"), server.url("/c")];
        let delay = Duration::from_millis(100);
        let client = Client::builder().build().unwrap();

        let start = Instant::now();
        let batch = client.scrape_many(&urls, None, delay).await;

        assert!(start.elapsed() >= delay * 2);
        assert_eq!(batch.results.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let client = Client::builder().build().unwrap();
        let urls: Vec<String> = Vec::new();
        let batch = client.scrape_many(&urls, None, Duration::from_secs(5)).await;
        assert_eq!(batch.total_scraped, 0);
    }
}
