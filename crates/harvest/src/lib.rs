// ABOUTME: Main library entry point for the harvest page extractor.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, record types, HarvestError, export helpers.

//! Harvest - fetch pages and extract structured records with CSS selector rules.
//!
//! A page is fetched once, parsed, and turned into a [`ScrapeRecord`] (title,
//! capture time, named content groups) or, in table mode, a [`TableScrape`].
//! Fetch and extraction failures are reported inline as an [`ErrorRecord`]
//! carrying the originating URL.
//!
//! # Example
//!
//! ```no_run
//! use digests_harvest::{Client, HarvestError, SelectorRules};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), HarvestError> {
//!     let client = Client::builder().build()?;
//!     let mut rules = SelectorRules::new();
//!     rules.insert("prices".into(), ".price".into());
//!     let record = client.try_scrape("https://example.com/shop", Some(&rules)).await?;
//!     println!("{}: {:?}", record.title, record.content["prices"]);
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod client;
pub mod error;
pub mod export;
pub mod extractors;
pub mod options;
pub mod resource;
pub mod result;

pub use crate::client::Client;
pub use crate::error::{ErrorCode, HarvestError};
pub use crate::export::{flatten, flatten_values, to_csv, FlatRow};
pub use crate::extractors::{extract_basic, extract_tables, DEFAULT_TABLE_SELECTOR};
pub use crate::options::{
    ClientBuilder, Options, DEFAULT_BATCH_DELAY, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
};
pub use crate::result::{
    BatchResult, Content, ContentValue, ErrorRecord, ScrapeOutcome, ScrapeRecord, SelectorRules,
    TableOutcome, TableRecord, TableScrape, NO_TITLE,
};
