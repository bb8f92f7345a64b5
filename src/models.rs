//! Data models for headlines, selections, and upstream responses.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Article`]: A single headline as returned by NewsAPI
//! - [`Category`] and [`Country`]: The two inputs that parameterize every fetch
//! - [`Selection`] and [`FetchParams`]: The query key for one page request
//! - [`PageResult`]: One page of articles plus the upstream total
//! - [`Envelope`]: The raw JSON envelope returned by the headline endpoint
//!
//! Upstream field names are camelCase, so the wire types carry
//! `#[serde(rename_all = "camelCase")]`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// The publisher of an article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Source {
    /// NewsAPI's identifier for the publisher, if it has one.
    pub id: Option<String>,
    /// Human-readable publisher name (e.g. "BBC News").
    pub name: Option<String>,
}

/// A single headline as returned by the top-headlines endpoint.
///
/// Articles are immutable once fetched. The canonical `url` is the only field
/// the upstream guarantees; everything else may be `null`. Articles are never
/// deduplicated, so the same URL may legitimately appear on two pages.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: Source,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Canonical article URL.
    pub url: String,
    pub url_to_image: Option<String>,
    /// Publication time. An unparseable timestamp is read as `None` rather
    /// than failing the whole page.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub published_at: Option<DateTime<Utc>>,
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(s.trim())
            .map(|d| d.with_timezone(&Utc))
            .ok()
    }))
}

impl Article {
    /// Name of the publishing source, if the upstream reported one.
    pub fn source_name(&self) -> Option<&str> {
        self.source.name.as_deref().filter(|s| !s.is_empty())
    }
}

/// The fixed set of headline categories supported by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Business,
    Entertainment,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::General,
        Category::Business,
        Category::Entertainment,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    /// The query-parameter value sent upstream.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }

    /// Capitalized name used in headings, e.g. "Technology".
    pub fn label(self) -> String {
        crate::utils::upcase(self.as_str())
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::General => "📰",
            Category::Business => "💼",
            Category::Entertainment => "🎬",
            Category::Health => "🏥",
            Category::Science => "🔬",
            Category::Sports => "⚽",
            Category::Technology => "💻",
        }
    }

    /// Navigation path for this category. General news lives at the root.
    pub fn route(self) -> &'static str {
        match self {
            Category::General => "/",
            Category::Business => "/business",
            Category::Entertainment => "/entertainment",
            Category::Health => "/health",
            Category::Science => "/science",
            Category::Sports => "/sports",
            Category::Technology => "/technology",
        }
    }

    /// Resolve a navigation path such as `/sports` or `/` to its category.
    ///
    /// Both `/` and `/general` map to [`Category::General`]. Trailing slashes
    /// are ignored.
    pub fn from_route(path: &str) -> Option<Category> {
        let trimmed = path.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Some(Category::General);
        }
        let name = trimmed.strip_prefix('/')?;
        Category::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ConfigError;

    /// Accepts a category name (case-insensitive) or a route path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        if needle.starts_with('/') {
            return Category::from_route(&needle)
                .ok_or_else(|| ConfigError::InvalidCategory(s.to_string()));
        }
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| ConfigError::InvalidCategory(s.to_string()))
    }
}

/// Countries offered in the selector, as `(code, name, flag)`.
pub const KNOWN_COUNTRIES: [(&str, &str, &str); 5] = [
    ("in", "India", "🇮🇳"),
    ("us", "United States", "🇺🇸"),
    ("gb", "United Kingdom", "🇬🇧"),
    ("ca", "Canada", "🇨🇦"),
    ("au", "Australia", "🇦🇺"),
];

/// A two-letter country code, normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Country(String);

impl Country {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display name for known countries, or the upper-cased code otherwise.
    pub fn name(&self) -> String {
        KNOWN_COUNTRIES
            .iter()
            .find(|(code, _, _)| *code == self.0)
            .map(|(_, name, _)| name.to_string())
            .unwrap_or_else(|| self.0.to_ascii_uppercase())
    }

    pub fn flag(&self) -> Option<&'static str> {
        KNOWN_COUNTRIES
            .iter()
            .find(|(code, _, _)| *code == self.0)
            .map(|(_, _, flag)| *flag)
    }
}

impl Default for Country {
    fn default() -> Self {
        Country("in".to_string())
    }
}

impl FromStr for Country {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Country(code))
        } else {
            Err(ConfigError::InvalidCountry(s.to_string()))
        }
    }
}

impl TryFrom<String> for Country {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Country> for String {
    fn from(country: Country) -> Self {
        country.0
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The `(country, category)` pair that keys an accumulated feed.
///
/// Changing either half invalidates everything fetched so far.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub struct Selection {
    pub country: Country,
    pub category: Category,
}

impl Selection {
    pub fn new(country: Country, category: Category) -> Self {
        Self { country, category }
    }
}

/// Everything needed to request a single page of headlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchParams {
    pub country: Country,
    pub category: Category,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
}

impl FetchParams {
    pub fn new(selection: &Selection, page: u32, page_size: u32) -> Self {
        Self {
            country: selection.country.clone(),
            category: selection.category,
            page,
            page_size,
        }
    }
}

/// One bounded batch of articles plus the total reported for the query.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub articles: Vec<Article>,
    pub total_results: usize,
}

/// The JSON envelope returned by the headline endpoint.
///
/// A success and an error body share the same top-level `status` field, so the
/// envelope is decoded as an internally tagged enum.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope {
    Ok {
        #[serde(rename = "totalResults", default)]
        total_results: usize,
        #[serde(default)]
        articles: Vec<Article>,
    },
    Error {
        code: Option<String>,
        message: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_deserializes_with_nulls() {
        let json = r#"{
            "source": {"id": null, "name": "The Hindu"},
            "author": null,
            "title": "Monsoon arrives early",
            "description": null,
            "url": "https://example.com/monsoon",
            "urlToImage": null,
            "publishedAt": "2025-06-01T04:30:00Z",
            "content": null
        }"#;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.source_name(), Some("The Hindu"));
        assert_eq!(article.title.as_deref(), Some("Monsoon arrives early"));
        assert!(article.description.is_none());
        assert!(article.url_to_image.is_none());
        assert_eq!(
            article.published_at.unwrap().to_rfc3339(),
            "2025-06-01T04:30:00+00:00"
        );
    }

    #[test]
    fn test_article_missing_source() {
        let json = r#"{"url": "https://example.com/a"}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.source_name(), None);
        assert!(article.title.is_none());
    }

    #[test]
    fn test_article_null_source() {
        let json = r#"{"url": "https://a", "source": null}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.source, Source::default());
        assert_eq!(article.source_name(), None);
    }

    #[test]
    fn test_article_bad_timestamp_is_dropped() {
        for raw in [r#""2025-06-01 04:30:00""#, r#""2025-06-01""#, r#""""#, "null"] {
            let json = format!(r#"{{"url": "https://a", "publishedAt": {raw}}}"#);
            let article: Article = serde_json::from_str(&json).unwrap();
            assert!(article.published_at.is_none(), "{raw}");
        }

        let json = r#"{"url": "https://a", "publishedAt": "2025-06-01T10:00:00+05:30"}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(
            article.published_at.unwrap().to_rfc3339(),
            "2025-06-01T04:30:00+00:00"
        );
    }

    #[test]
    fn test_envelope_keeps_page_with_one_bad_article() {
        let json = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {"url": "https://a", "source": null, "publishedAt": "garbage"},
                {"url": "https://b", "publishedAt": "2025-06-01T04:30:00Z"}
            ]
        }"#;
        match serde_json::from_str::<Envelope>(json).unwrap() {
            Envelope::Ok { articles, .. } => {
                assert_eq!(articles.len(), 2);
                assert!(articles[0].published_at.is_none());
                assert!(articles[1].published_at.is_some());
            }
            other => panic!("unexpected envelope: {other:?}"),
        }
    }

    #[test]
    fn test_envelope_ok() {
        let json = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [{"url": "https://a"}, {"url": "https://b"}]
        }"#;
        match serde_json::from_str::<Envelope>(json).unwrap() {
            Envelope::Ok {
                total_results,
                articles,
            } => {
                assert_eq!(total_results, 2);
                assert_eq!(articles.len(), 2);
                assert_eq!(articles[1].url, "https://b");
            }
            other => panic!("unexpected envelope: {other:?}"),
        }
    }

    #[test]
    fn test_envelope_ok_without_articles() {
        let json = r#"{"status":"ok"}"#;
        match serde_json::from_str::<Envelope>(json).unwrap() {
            Envelope::Ok {
                total_results,
                articles,
            } => {
                assert_eq!(total_results, 0);
                assert!(articles.is_empty());
            }
            other => panic!("unexpected envelope: {other:?}"),
        }
    }

    #[test]
    fn test_envelope_error() {
        let json = r#"{
            "status": "error",
            "code": "parameterInvalid",
            "message": "You've requested too many results."
        }"#;
        match serde_json::from_str::<Envelope>(json).unwrap() {
            Envelope::Error { code, message } => {
                assert_eq!(code.as_deref(), Some("parameterInvalid"));
                assert_eq!(message.as_deref(), Some("You've requested too many results."));
            }
            other => panic!("unexpected envelope: {other:?}"),
        }
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Sports".parse::<Category>().unwrap(), Category::Sports);
        assert_eq!(" technology ".parse::<Category>().unwrap(), Category::Technology);
        assert_eq!("/business".parse::<Category>().unwrap(), Category::Business);
        assert_eq!("/".parse::<Category>().unwrap(), Category::General);
        assert!("politics".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_routes_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_route(category.route()), Some(category));
        }
        assert_eq!(Category::from_route("/general"), Some(Category::General));
        assert_eq!(Category::from_route("/health/"), Some(Category::Health));
        assert_eq!(Category::from_route("/weather"), None);
    }

    #[test]
    fn test_category_label_and_icon() {
        assert_eq!(Category::Entertainment.label(), "Entertainment");
        assert_eq!(Category::Science.icon(), "🔬");
    }

    #[test]
    fn test_country_parse() {
        let us: Country = "US".parse().unwrap();
        assert_eq!(us.as_str(), "us");
        assert_eq!(us.name(), "United States");
        assert_eq!(us.flag(), Some("🇺🇸"));

        let de: Country = "de".parse().unwrap();
        assert_eq!(de.name(), "DE");
        assert_eq!(de.flag(), None);

        assert!("usa".parse::<Country>().is_err());
        assert!("".parse::<Country>().is_err());
        assert!("1a".parse::<Country>().is_err());
    }

    #[test]
    fn test_default_selection() {
        let selection = Selection::default();
        assert_eq!(selection.country.as_str(), "in");
        assert_eq!(selection.category, Category::General);
    }
}
