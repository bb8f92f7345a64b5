//! Plain-text rendering of a feed.
//!
//! Each article becomes a small card:
//!
//! ```text
//! [3] The Hindu
//!     Monsoon arrives early over Kerala
//!     IMD says the onset is a week ahead of schedule...
//!     By Staff Reporter · 5h ago
//!     Read full article: https://example.com/monsoon
//! ```
//!
//! Rendering is pure: the current time is passed in so output is stable in
//! tests.

use crate::feed::FeedSnapshot;
use crate::models::{Article, Selection};
use crate::utils::truncate_text;
use chrono::{DateTime, Datelike, Utc};

const TITLE_MAX: usize = 80;
const DESCRIPTION_MAX: usize = 120;

/// Shown in place of a missing title or description.
pub const FALLBACK_TEXT: &str = "Stay informed with the latest news updates...";

/// Human-friendly age of an article relative to `now`.
///
/// Under a day: `5h ago`. Under a week: `3d ago`. Otherwise the calendar
/// date, with the year only when it differs from `now`'s.
pub fn relative_date(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = (now - published).abs();
    if age.num_hours() < 24 {
        format!("{}h ago", age.num_hours())
    } else if age.num_days() < 7 {
        format!("{}d ago", age.num_days())
    } else if published.year() == now.year() {
        published.format("%b %-d").to_string()
    } else {
        published.format("%b %-d, %Y").to_string()
    }
}

/// Heading for a selection, e.g. `💻 Technology News · 🇺🇸 United States`.
pub fn render_header(selection: &Selection) -> String {
    let country = match selection.country.flag() {
        Some(flag) => format!("{flag} {}", selection.country.name()),
        None => selection.country.name(),
    };
    format!(
        "{} {} News · {}\nStay updated with the latest {} headlines\n",
        selection.category.icon(),
        selection.category.label(),
        country,
        selection.category
    )
}

/// One article card. `index` is the 1-based position in the feed.
pub fn render_card(index: usize, article: &Article, now: DateTime<Utc>) -> String {
    let mut card = format!(
        "[{index}] {}\n",
        article.source_name().unwrap_or("Unknown source")
    );

    let title = article
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(|t| truncate_text(t, TITLE_MAX))
        .unwrap_or_else(|| FALLBACK_TEXT.to_string());
    card.push_str(&format!("    {title}\n"));

    let description = article
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(|d| truncate_text(d, DESCRIPTION_MAX))
        .unwrap_or_else(|| FALLBACK_TEXT.to_string());
    card.push_str(&format!("    {description}\n"));

    let meta: Vec<String> = [
        article.author.as_deref().map(|a| format!("By {a}")),
        article.published_at.map(|p| relative_date(p, now)),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !meta.is_empty() {
        card.push_str(&format!("    {}\n", meta.join(" · ")));
    }

    card.push_str(&format!("    Read full article: {}\n", article.url));
    card
}

/// The whole feed: header, state placeholders or cards, and a footer.
///
/// `from` skips the first cards so interactive mode can print only the
/// newly appended ones.
pub fn render_feed(snapshot: &FeedSnapshot, from: usize, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    if from == 0 {
        out.push_str(&render_header(&snapshot.selection));
        out.push('\n');
    }

    if snapshot.loading {
        out.push_str("Loading...\n");
        return out;
    }

    if let Some(error) = &snapshot.error {
        out.push_str(&format!("Oops! Something went wrong\n{error}\n"));
        return out;
    }

    if snapshot.articles.is_empty() {
        out.push_str("No articles found\nTry selecting a different category or country\n");
        return out;
    }

    for (i, article) in snapshot.articles.iter().enumerate().skip(from) {
        out.push_str(&render_card(i + 1, article, now));
        out.push('\n');
    }

    if snapshot.has_more {
        out.push_str(&format!(
            "Showing {} of {} articles. More available.\n",
            snapshot.articles.len(),
            snapshot.total_results
        ));
    } else {
        out.push_str("You've reached the end! No more articles to load\n");
    }
    out
}

/// Steps for fixing a rejected API key.
pub fn credential_help() -> &'static str {
    "Need help with your API key?\n\
     1. Get a free key from https://newsapi.org\n\
     2. Pass it with --api-key, set NEWSAPI_KEY, or add `api_key` to your config file\n\
     3. Run headline_feed again\n"
}
