//! # Headline Feed
//!
//! A terminal reader for the NewsAPI top-headlines endpoint. Headlines are
//! fetched page by page for a country and category, accumulated into a feed,
//! and printed as text cards.
//!
//! ## Features
//!
//! - Seven categories (general, business, entertainment, health, science,
//!   sports, technology) and any two-letter country code
//! - "Load more" pagination that stops once the upstream total is reached
//! - Classified, human-readable errors for bad keys, rate limits and outages
//! - Interactive mode for switching category/country and paging on demand
//! - Optional JSON export of the loaded feed
//!
//! ## Usage
//!
//! ```sh
//! NEWSAPI_KEY=... headline_feed -c us -k technology -n 2
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: CLI flags, environment and an optional YAML file are
//!    resolved into a [`config::Config`]; a missing API key stops startup
//! 2. **Fetching**: [`api::NewsApiClient`] requests one page at a time
//! 3. **Accumulating**: [`feed::Feed`] keeps the list, page counter and total
//! 4. **Output**: cards on stdout, optional JSON on disk

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod feed;
mod models;
mod outputs;
mod session;
mod utils;

use api::NewsApiClient;
use cli::Cli;
use config::Config;
use feed::{Feed, NextPageOutcome, ResetOutcome};
use outputs::{cards, json};

#[tokio::main]
#[instrument]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("headline_feed starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.country, ?args.category, ?args.page_size, args.pages, "Parsed CLI arguments");

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            eprintln!("error: {e}");
            return Ok(ExitCode::from(2));
        }
    };
    info!(
        country = %config.selection.country,
        category = %config.selection.category,
        page_size = config.page_size,
        "Loaded configuration"
    );

    let client = NewsApiClient::new(
        config.endpoint.clone(),
        config.api_key.clone(),
        config.timeout,
    )?;
    let feed = Feed::new(client, config.page_size);

    // ---- First page ----
    let outcome = feed.reset(config.selection.clone()).await;
    if let ResetOutcome::Failed(e) = &outcome {
        print!("{}", cards::render_feed(&feed.snapshot(), 0, Utc::now()));
        if e.is_credential_problem() {
            println!();
            print!("{}", cards::credential_help());
        }
        if !args.interactive {
            return Ok(ExitCode::FAILURE);
        }
    }

    if args.interactive {
        if !matches!(outcome, ResetOutcome::Failed(_)) {
            print!("{}", cards::render_feed(&feed.snapshot(), 0, Utc::now()));
        }
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        session::run(&feed, stdin, &mut stdout, args.json_output_dir.as_deref()).await?;
        return Ok(ExitCode::SUCCESS);
    }

    // ---- Further pages ----
    for _ in 1..args.pages {
        match feed.fetch_next_page().await {
            NextPageOutcome::Appended(0) => {
                warn!("Upstream returned an empty page; stopping early");
                break;
            }
            NextPageOutcome::Appended(_) => {}
            NextPageOutcome::Failed(e) => {
                eprintln!("Could not load more articles: {e}");
                break;
            }
            NextPageOutcome::Skipped(reason) => {
                debug!(?reason, "No further pages");
                break;
            }
            NextPageOutcome::Superseded => break,
        }
    }

    let snapshot = feed.snapshot();
    print!("{}", cards::render_feed(&snapshot, 0, Utc::now()));

    // ---- JSON export ----
    if let Some(dir) = &args.json_output_dir {
        match json::write_feed(&snapshot, dir).await {
            Ok(path) => info!(path = %path.display(), "Exported feed"),
            Err(e) => {
                error!(error = %e, "Failed to write feed JSON");
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        articles = snapshot.articles.len(),
        pages = snapshot.current_page,
        "Execution complete"
    );

    Ok(ExitCode::SUCCESS)
}
