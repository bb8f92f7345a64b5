//! Runtime configuration.
//!
//! Settings are layered, highest precedence first:
//!
//! 1. Command-line flags
//! 2. Environment variables (`NEWSAPI_KEY`, `NEWSAPI_BASE_URL`), handled by clap
//! 3. The optional YAML config file
//! 4. Built-in defaults (country `in`, category `general`, 12 per page)
//!
//! The API key has no default. Startup fails with
//! [`ConfigError::MissingApiKey`] when none of the layers provide one.
//!
//! # Config File
//!
//! ```yaml
//! api_key: "<your NewsAPI key>"
//! country: "us"
//! category: "technology"
//! page_size: 12
//! base_url: "https://newsapi.org/v2"
//! timeout_secs: 30
//! ```

use crate::api::DEFAULT_BASE_URL;
use crate::cli::Cli;
use crate::error::ConfigError;
use crate::feed::DEFAULT_PAGE_SIZE;
use crate::models::{Category, Country, Selection};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Contents of the YAML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub country: Option<String>,
    pub category: Option<String>,
    pub page_size: Option<u32>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Read and parse a config file.
    #[instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw, path)
    }

    /// Parse YAML, reporting the failing key path on error.
    pub fn parse(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let deserializer = serde_yaml::Deserializer::from_str(raw);
        serde_path_to_error::deserialize(deserializer).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            at: e.path().to_string(),
            message: e.inner().to_string(),
        })
    }
}

/// Fully resolved and validated settings.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub selection: Selection,
    pub page_size: u32,
    /// Full URL of the top-headlines resource.
    pub endpoint: Url,
    pub timeout: Duration,
}

impl Config {
    /// Resolve configuration from the CLI and, if given, the config file.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::from_path(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(cli, file)
    }

    /// Merge CLI values over file values and validate the result.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let api_key = cli
            .api_key
            .clone()
            .or(file.api_key)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let country = match cli.country.as_deref().or(file.country.as_deref()) {
            Some(raw) => raw.parse::<Country>()?,
            None => Country::default(),
        };
        let category = match cli.category.as_deref().or(file.category.as_deref()) {
            Some(raw) => raw.parse::<Category>()?,
            None => Category::default(),
        };

        let page_size = cli.page_size.or(file.page_size).unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=100).contains(&page_size) {
            return Err(ConfigError::InvalidPageSize(page_size));
        }

        let base_url = cli
            .base_url
            .as_deref()
            .or(file.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL);
        let endpoint = headlines_endpoint(base_url)?;

        let timeout = Duration::from_secs(file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));

        let config = Self {
            api_key,
            selection: Selection::new(country, category),
            page_size,
            endpoint,
            timeout,
        };
        debug!(?config, "Resolved configuration");
        Ok(config)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("selection", &self.selection)
            .field("page_size", &self.page_size)
            .field("endpoint", &self.endpoint.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Resolve `{base}/top-headlines`, tolerating a base with or without a
/// trailing slash.
fn headlines_endpoint(base: &str) -> Result<Url, ConfigError> {
    let mut normalized = base.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized)
        .and_then(|u| u.join("top-headlines"))
        .map_err(|source| ConfigError::InvalidBaseUrl {
            url: base.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use std::path::PathBuf;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["headline_feed"];
        argv.extend_from_slice(args);
        let mut cli = Cli::parse_from(argv);
        // Keep the ambient environment out of the tests.
        if !args.contains(&"--api-key") {
            cli.api_key = None;
        }
        if !args.contains(&"--base-url") {
            cli.base_url = None;
        }
        cli.config = None;
        cli
    }

    #[test]
    fn test_defaults_with_key() {
        let config = Config::resolve(&cli(&["--api-key", "abc"]), FileConfig::default()).unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.selection.country.as_str(), "in");
        assert_eq!(config.selection.category, Category::General);
        assert_eq!(config.page_size, 12);
        assert_eq!(
            config.endpoint.as_str(),
            "https://newsapi.org/v2/top-headlines"
        );
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_key_fails_fast() {
        let err = Config::resolve(&cli(&[]), FileConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));

        let blank = FileConfig {
            api_key: Some("   ".to_string()),
            ..FileConfig::default()
        };
        let err = Config::resolve(&cli(&[]), blank).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig {
            api_key: Some("from-file".to_string()),
            country: Some("gb".to_string()),
            category: Some("health".to_string()),
            page_size: Some(30),
            base_url: Some("http://localhost:8080/v2/".to_string()),
            timeout_secs: Some(5),
        };
        let config = Config::resolve(
            &cli(&["--api-key", "from-cli", "-c", "US", "-k", "/science"]),
            file,
        )
        .unwrap();

        assert_eq!(config.api_key, "from-cli");
        assert_eq!(config.selection.country.as_str(), "us");
        assert_eq!(config.selection.category, Category::Science);
        assert_eq!(config.page_size, 30);
        assert_eq!(
            config.endpoint.as_str(),
            "http://localhost:8080/v2/top-headlines"
        );
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::resolve(&cli(&["--api-key", "k", "-c", "india"]), FileConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCountry(_)));

        let err = Config::resolve(&cli(&["--api-key", "k", "-k", "weather"]), FileConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCategory(_)));

        let file = FileConfig {
            page_size: Some(500),
            ..FileConfig::default()
        };
        let err = Config::resolve(&cli(&["--api-key", "k"]), file).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPageSize(500)));

        let err = Config::resolve(
            &cli(&["--api-key", "k", "--base-url", "not a url"]),
            FileConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_parse_file() {
        let raw = "api_key: \"xyz\"\ncountry: ca\npage_size: 8\n";
        let file = FileConfig::parse(raw, Path::new("config.yaml")).unwrap();
        assert_eq!(file.api_key.as_deref(), Some("xyz"));
        assert_eq!(file.country.as_deref(), Some("ca"));
        assert_eq!(file.page_size, Some(8));
        assert!(file.category.is_none());
    }

    #[test]
    fn test_parse_file_reports_path() {
        let raw = "page_size: lots\n";
        let err = FileConfig::parse(raw, Path::new("config.yaml")).unwrap_err();
        match err {
            ConfigError::ParseFile { at, .. } => assert_eq!(at, "page_size"),
            other => panic!("unexpected error: {other:?}"),
        }

        let unknown = FileConfig::parse("apikey: nope\n", Path::new("config.yaml"));
        assert!(unknown.is_err());
    }

    #[test]
    fn test_empty_file_is_default() {
        let file = FileConfig::parse("\n", Path::new("config.yaml")).unwrap();
        assert!(file.api_key.is_none());
    }

    #[test]
    fn test_from_path() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "api_key: file-key\ncategory: sports").unwrap();

        let file = FileConfig::from_path(tmp.path()).unwrap();
        assert_eq!(file.category.as_deref(), Some("sports"));

        let missing = FileConfig::from_path(&PathBuf::from("/nonexistent/config.yaml"));
        assert!(matches!(missing, Err(ConfigError::ReadFile { .. })));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config =
            Config::resolve(&cli(&["--api-key", "supersecret"]), FileConfig::default()).unwrap();
        assert!(!format!("{config:?}").contains("supersecret"));
    }
}
