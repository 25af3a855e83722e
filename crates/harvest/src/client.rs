// ABOUTME: The main Client struct for harvest that fetches pages and runs the extractors.
// ABOUTME: Provides scrape/scrape_tables (errors captured inline) and try_* variants that return Result.

use tracing::{debug, warn};

use crate::error::HarvestError;
use crate::extractors::{extract_basic, extract_tables};
use crate::options::{ClientBuilder, Options};
use crate::resource::{fetch, FetchOptions};
use crate::result::{ScrapeOutcome, ScrapeRecord, SelectorRules, TableOutcome, TableScrape};

/// The harvest client. Holds configuration and an HTTP client; no per-request state.
#[derive(Debug, Clone)]
pub struct Client {
    opts: Options,
    http_client: reqwest::Client,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Result<Self, HarvestError> {
        let http_client = match opts.http_client.clone() {
            Some(client) => client,
            None => reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .cookie_store(true)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .map_err(|e| {
                    HarvestError::fetch(
                        "",
                        "BuildClient",
                        Some(anyhow::anyhow!("failed to build HTTP client: {}", e)),
                    )
                })?,
        };

        Ok(Self { opts, http_client })
    }

    /// The options this client was built with.
    pub fn options(&self) -> &Options {
        &self.opts
    }

    fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            headers: self.opts.headers.clone(),
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String, HarvestError> {
        let fetched = fetch(&self.http_client, url, &self.fetch_options()).await?;
        Ok(fetched.text_utf8())
    }

    /// Fetch `url` and extract a record in basic mode.
    pub async fn try_scrape(
        &self,
        url: &str,
        rules: Option<&SelectorRules>,
    ) -> Result<ScrapeRecord, HarvestError> {
        let html = self.fetch_text(url).await?;
        extract_basic(&html, url, rules)
    }

    /// Fetch `url` and extract a record in basic mode. Failures become an error record.
    pub async fn scrape(&self, url: &str, rules: Option<&SelectorRules>) -> ScrapeOutcome {
        let result = self.try_scrape(url, rules).await;
        if let Err(ref e) = result {
            warn!(url, error = %e, "scrape failed");
        } else {
            debug!(url, "scraped");
        }
        ScrapeOutcome::capture(url, result)
    }

    /// Fetch `url` and extract the tables matching `table_selector`.
    pub async fn try_scrape_tables(
        &self,
        url: &str,
        table_selector: &str,
    ) -> Result<TableScrape, HarvestError> {
        let html = self.fetch_text(url).await?;
        extract_tables(&html, url, table_selector)
    }

    /// Fetch `url` and extract tables. Failures, including "No tables found", become an error record.
    pub async fn scrape_tables(&self, url: &str, table_selector: &str) -> TableOutcome {
        let result = self.try_scrape_tables(url, table_selector).await;
        if let Err(ref e) = result {
            warn!(url, error = %e, "table scrape failed");
        }
        TableOutcome::capture(url, result)
    }

    /// Extract a basic-mode record from HTML that was already fetched from `url`.
    pub fn scrape_html(
        &self,
        html: &str,
        url: &str,
        rules: Option<&SelectorRules>,
    ) -> Result<ScrapeRecord, HarvestError> {
        extract_basic(html, url, rules)
    }

    /// Extract tables from HTML that was already fetched from `url`.
    pub fn scrape_tables_html(
        &self,
        html: &str,
        url: &str,
        table_selector: &str,
    ) -> Result<TableScrape, HarvestError> {
        extract_tables(html, url, table_selector)
    }
}
