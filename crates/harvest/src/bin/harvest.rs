// ABOUTME: CLI binary for the harvest extractor.
// ABOUTME: Scrapes URLs or a local HTML file in basic or table mode and prints JSON.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use digests_harvest::{
    Client, ScrapeOutcome, SelectorRules, TableOutcome, DEFAULT_TABLE_SELECTOR,
};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "harvest")]
#[command(about = "Fetch pages and extract structured records")]
struct Args {
    /// Extract tables instead of content groups
    #[arg(long = "table")]
    table: bool,

    /// CSS selector identifying table elements (table mode)
    #[arg(long = "table-selector", default_value = DEFAULT_TABLE_SELECTOR)]
    table_selector: String,

    /// Named selector rule as name=css; repeat for several groups
    #[arg(short = 's', long = "selector", value_parser = parse_rule)]
    selectors: Vec<(String, String)>,

    /// Seconds to wait between URLs
    #[arg(long = "delay", default_value_t = 1.0)]
    delay: f64,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// HTML file to extract from (requires --url)
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// Source URL of the HTML file, used to resolve relative links
    #[arg(long = "url")]
    url: Option<String>,

    /// Output compact JSON instead of pretty
    #[arg(long = "compact")]
    compact: bool,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// URLs to scrape
    #[arg()]
    urls: Vec<String>,
}

fn parse_rule(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, css)) if !name.trim().is_empty() && !css.trim().is_empty() => {
            Ok((name.trim().to_string(), css.trim().to_string()))
        }
        _ => Err(format!("expected name=selector, got '{}'", s)),
    }
}

fn render(value: &Value, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    if args.html.is_some() && args.url.is_none() {
        eprintln!("error: --url is required when using --html");
        return ExitCode::from(1);
    }

    if args.html.is_none() && args.urls.is_empty() {
        eprintln!("error: at least one URL is required, or use --html with --url");
        return ExitCode::from(1);
    }

    if args.html.is_some() && !args.urls.is_empty() {
        eprintln!("error: cannot use both --html and positional URLs");
        return ExitCode::from(1);
    }

    let delay = match Duration::try_from_secs_f64(args.delay) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: --delay must be a non-negative number of seconds: {}", e);
            return ExitCode::from(1);
        }
    };

    let client = match Client::builder().build() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    let rules: SelectorRules = args.selectors.iter().cloned().collect();
    let rules = (!rules.is_empty()).then_some(&rules);

    let start = Instant::now();
    let mut had_error = false;

    let output = if let (Some(html_path), Some(url)) = (&args.html, &args.url) {
        let html = match fs::read_to_string(html_path) {
            Ok(h) => h,
            Err(e) => {
                eprintln!("error reading file {:?}: {}", html_path, e);
                return ExitCode::from(1);
            }
        };
        let value = if args.table {
            serde_json::to_value(TableOutcome::capture(
                url,
                client.scrape_tables_html(&html, url, &args.table_selector),
            ))
        } else {
            serde_json::to_value(ScrapeOutcome::capture(
                url,
                client.scrape_html(&html, url, rules),
            ))
        };
        had_error |= value.as_ref().map(|v| v.get("error").is_some()).unwrap_or(true);
        value
    } else if args.table {
        let mut outcomes = Vec::with_capacity(args.urls.len());
        for (i, url) in args.urls.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let outcome = client.scrape_tables(url, &args.table_selector).await;
            had_error |= outcome.is_error();
            outcomes.push(outcome);
        }
        if outcomes.len() == 1 {
            serde_json::to_value(&outcomes[0])
        } else {
            serde_json::to_value(&outcomes)
        }
    } else {
        let batch = client
            .scrape_many(&args.urls, rules, delay)
            .await;
        had_error |= batch.results.iter().any(|r| r.is_error());
        if batch.results.len() == 1 {
            serde_json::to_value(&batch.results[0])
        } else {
            serde_json::to_value(&batch)
        }
    };

    let elapsed = start.elapsed();

    let output_str = match output {
        Ok(v) => render(&v, args.compact),
        Err(e) => {
            eprintln!("error serializing output: {}", e);
            return ExitCode::from(1);
        }
    };

    if let Some(output_path) = &args.output {
        if let Err(e) = fs::write(output_path, &output_str) {
            eprintln!("error writing to {:?}: {}", output_path, e);
            had_error = true;
        }
    } else {
        println!("{}", output_str);
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
