//! Command-line interface definitions for Headline Feed.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Selection flags are plain strings here; they are validated when the
//! [`Config`](crate::config::Config) is resolved so that values coming from
//! the config file get the same checks.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Headline Feed application.
///
/// # Examples
///
/// ```sh
/// # Top general headlines for India, one page
/// NEWSAPI_KEY=... headline_feed
///
/// # Three pages of US technology news, exported to JSON
/// headline_feed -c us -k technology -n 3 -j ./json
///
/// # Browse interactively
/// headline_feed --interactive
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Two-letter country code (e.g. in, us, gb, ca, au)
    #[arg(short, long)]
    pub country: Option<String>,

    /// Category name or route path (general, business, entertainment,
    /// health, science, sports, technology)
    #[arg(short = 'k', long)]
    pub category: Option<String>,

    /// Articles per page
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub page_size: Option<u32>,

    /// Number of pages to load before printing
    #[arg(
        short = 'n',
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub pages: u32,

    /// Output directory for a JSON export of the feed
    #[arg(short, long)]
    pub json_output_dir: Option<PathBuf>,

    /// Optional path to a config.yaml file
    #[arg(long, env = "HEADLINE_FEED_CONFIG")]
    pub config: Option<PathBuf>,

    /// NewsAPI key
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the NewsAPI v2 API
    #[arg(long, env = "NEWSAPI_BASE_URL")]
    pub base_url: Option<String>,

    /// Browse with an interactive prompt instead of printing once
    #[arg(short, long)]
    pub interactive: bool,
}
