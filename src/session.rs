//! Interactive browsing.
//!
//! Reads one command per line and drives the [`Feed`] the way scrolling and
//! the category/country menus would:
//!
//! | Command | Effect |
//! |---------|--------|
//! | `n`, `next`, `more` | Load and print the next page |
//! | `c <category>`, `category <category>` | Switch category (name or route path) |
//! | `k <country>`, `country <country>` | Switch country |
//! | `r`, `retry`, `refresh` | Reload the current selection from page 1 |
//! | `l`, `list` | Print everything loaded so far |
//! | `h`, `help` | Show the command list |
//! | `q`, `quit`, `exit` | Leave |
//!
//! Input and output are generic so the loop can be driven from tests.

use crate::api::HeadlineSource;
use crate::error::ConfigError;
use crate::feed::{Feed, NextPageOutcome, ResetOutcome, SkipReason};
use crate::models::{Category, Country, Selection};
use crate::outputs::{cards, json};
use chrono::Utc;
use std::error::Error;
use std::path::Path;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, info, instrument};

const HELP: &str = "Commands:
  n, next              load the next page
  c, category <name>   switch category (general, business, entertainment,
                       health, science, sports, technology)
  k, country <code>    switch country (e.g. in, us, gb, ca, au)
  r, retry             reload the current selection
  l, list              show everything loaded so far
  h, help              show this help
  q, quit              leave
";

/// A parsed line of input.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Next,
    Category(Category),
    Country(Country),
    Retry,
    List,
    Help,
    Quit,
}

/// Why a line could not be turned into a [`Command`].
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`; type `help` for a list")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Parse one line of input.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err(CommandError::Empty);
    };
    let arg = words.next();

    match verb.to_ascii_lowercase().as_str() {
        "n" | "next" | "more" => Ok(Command::Next),
        "r" | "retry" | "refresh" => Ok(Command::Retry),
        "l" | "list" => Ok(Command::List),
        "h" | "help" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        "c" | "category" => {
            let raw = arg.ok_or(CommandError::MissingArgument("category"))?;
            Ok(Command::Category(raw.parse()?))
        }
        "k" | "country" => {
            let raw = arg.ok_or(CommandError::MissingArgument("country"))?;
            Ok(Command::Country(raw.parse()?))
        }
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// Reload `selection` from page 1 and describe the result.
async fn reload<S: HeadlineSource>(feed: &Feed<S>, selection: Selection) -> String {
    let outcome = feed.reset(selection).await;
    let mut out = cards::render_feed(&feed.snapshot(), 0, Utc::now());
    if let ResetOutcome::Failed(e) = &outcome {
        if e.is_credential_problem() {
            out.push('\n');
            out.push_str(cards::credential_help());
        }
        out.push_str("Type `r` to try again.\n");
    }
    out
}

/// Load one more page and describe the result.
async fn next_page<S: HeadlineSource>(feed: &Feed<S>) -> String {
    let before = feed.len();
    match feed.fetch_next_page().await {
        NextPageOutcome::Appended(0) => "The source returned an empty page.\n".to_string(),
        NextPageOutcome::Appended(_) => cards::render_feed(&feed.snapshot(), before, Utc::now()),
        NextPageOutcome::Skipped(SkipReason::Exhausted) => {
            "You've reached the end! No more articles to load\n".to_string()
        }
        NextPageOutcome::Skipped(SkipReason::Blocked) => {
            "Nothing is loaded yet. Type `r` to try again.\n".to_string()
        }
        NextPageOutcome::Skipped(SkipReason::Loading | SkipReason::InFlight) => {
            "Still loading...\n".to_string()
        }
        NextPageOutcome::Failed(e) => format!("Could not load more articles: {e}\n"),
        NextPageOutcome::Superseded => String::new(),
    }
}

/// Run the prompt until `quit` or end of input.
///
/// # Arguments
///
/// * `feed` - A feed that has already been reset to the starting selection
/// * `input` - Line-oriented command source (stdin in production)
/// * `output` - Where prompts and cards are written (stdout in production)
/// * `json_output_dir` - When set, the feed is exported after every change
#[instrument(level = "info", skip_all)]
pub async fn run<S, R, W>(
    feed: &Feed<S>,
    input: R,
    output: &mut W,
    json_output_dir: Option<&Path>,
) -> Result<(), Box<dyn Error>>
where
    S: HeadlineSource,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    output.write_all(b"Type `help` for commands.\n> ").await?;
    output.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let (text, changed) = match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => (HELP.to_string(), false),
            Ok(Command::List) => (
                cards::render_feed(&feed.snapshot(), 0, Utc::now()),
                false,
            ),
            Ok(Command::Next) => (next_page(feed).await, true),
            Ok(Command::Retry) => (reload(feed, feed.selection()).await, true),
            Ok(Command::Category(category)) => {
                let selection = Selection::new(feed.selection().country, category);
                (reload(feed, selection).await, true)
            }
            Ok(Command::Country(country)) => {
                let selection = Selection::new(country, feed.selection().category);
                (reload(feed, selection).await, true)
            }
            Err(CommandError::Empty) => (String::new(), false),
            Err(e) => (format!("{e}\n"), false),
        };

        output.write_all(text.as_bytes()).await?;
        if changed {
            if let Some(dir) = json_output_dir {
                if let Err(e) = json::write_feed(&feed.snapshot(), dir).await {
                    error!(error = %e, "Failed to export feed JSON");
                }
            }
        }
        output.write_all(b"> ").await?;
        output.flush().await?;
    }

    info!("Interactive session finished");
    Ok(())
}
