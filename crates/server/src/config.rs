// ABOUTME: Server configuration loaded from environment variables (and a .env file when present).
// ABOUTME: Covers bind address, static asset directory and the upstream fetch timeout.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;

use digests_harvest::DEFAULT_TIMEOUT;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub scrape_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            static_dir: PathBuf::from("."),
            scrape_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();
        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: match env::var("PORT") {
                Ok(p) => p.parse().context("PORT must be a valid number")?,
                Err(_) => defaults.port,
            },
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            scrape_timeout: match env::var("SCRAPE_TIMEOUT_SECS") {
                Ok(s) => Duration::from_secs(
                    s.parse()
                        .context("SCRAPE_TIMEOUT_SECS must be a whole number of seconds")?,
                ),
                Err(_) => defaults.scrape_timeout,
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
