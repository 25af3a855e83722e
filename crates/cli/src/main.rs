// ABOUTME: CLI for batch scraping with the digests-harvest extractor.
// ABOUTME: Scrapes URLs sequentially and prints the batch as JSON or as flattened CSV.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use digests_harvest::{export, flatten, Client, SelectorRules};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Scrape one or more pages in order and output the results.
#[derive(Parser, Debug)]
#[command(name = "digests-cli")]
#[command(about = "Batch-scrape pages with digests-harvest and print JSON or CSV", long_about = None)]
struct Args {
    /// Page URL(s). Use "-" to read newline-separated URLs from stdin.
    #[arg(required_unless_present = "urls_file")]
    targets: Vec<String>,

    /// File with one URL per line (blank lines and lines starting with '#' ignored).
    #[arg(long)]
    urls_file: Option<PathBuf>,

    /// Selector rules as a JSON object, e.g. '{"prices": ".price"}'.
    #[arg(long)]
    selectors: Option<String>,

    /// Seconds to wait between requests.
    #[arg(long, default_value_t = 1.0)]
    delay: f64,

    /// Emit flattened CSV instead of JSON.
    #[arg(long, default_value_t = false)]
    csv: bool,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let delay = Duration::try_from_secs_f64(args.delay)
        .context("--delay must be a non-negative number of seconds")?;

    let rules = match &args.selectors {
        Some(raw) => {
            let rules: SelectorRules =
                serde_json::from_str(raw).context("--selectors must be a JSON object of strings")?;
            Some(rules).filter(|r| !r.is_empty())
        }
        None => None,
    };

    let urls = collect_urls(&args)?;
    if urls.is_empty() {
        bail!("no URLs to scrape");
    }

    let client = Client::builder().build()?;
    let batch = client.scrape_many(&urls, rules.as_ref(), delay).await;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.csv {
        let rows = flatten(&batch.results)?;
        export::write_csv(&mut out, &rows)?;
    } else if args.compact {
        writeln!(out, "{}", serde_json::to_string(&batch)?)?;
    } else {
        writeln!(out, "{}", serde_json::to_string_pretty(&batch)?)?;
    }

    Ok(())
}

fn collect_urls(args: &Args) -> Result<Vec<String>> {
    let mut urls = Vec::new();

    if let Some(path) = &args.urls_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        urls.extend(parse_url_list(&text));
    }

    for target in &args.targets {
        if target == "-" {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            urls.extend(parse_url_list(&buf));
        } else {
            urls.push(target.clone());
        }
    }

    Ok(urls)
}

fn parse_url_list(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
}
