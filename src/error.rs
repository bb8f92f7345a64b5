//! Error types for fetching headlines and loading configuration.
//!
//! [`FetchError`] covers everything that can go wrong while retrieving a page:
//! the transport failing outright, a non-success HTTP status, an error-shaped
//! body behind a successful status, or a body that is not a valid envelope.
//! Its `Display` output is the human-readable message shown to the reader.

use std::path::PathBuf;
use thiserror::Error;

/// Fallback message when nothing more specific is known.
pub const GENERIC_MESSAGE: &str = "An unexpected error occurred while fetching news.";

/// Upstream error codes that point at the credential rather than the request.
const CREDENTIAL_CODES: [&str; 4] = [
    "apiKeyInvalid",
    "apiKeyMissing",
    "apiKeyDisabled",
    "apiKeyExhausted",
];

/// Failure while fetching a page of headlines.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No response was received.
    #[error("Network error: unable to reach NewsAPI ({0})")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success HTTP status.
    #[error("{}", classify_status(*status))]
    Status {
        status: u16,
        /// Message from the error body, if one could be read. Logged only.
        message: Option<String>,
    },

    /// HTTP success, but the body reported `"status": "error"`.
    #[error("{}", message.as_deref().unwrap_or(GENERIC_MESSAGE))]
    Upstream {
        code: Option<String>,
        message: Option<String>,
    },

    /// The body was not a headline envelope.
    #[error("{}", GENERIC_MESSAGE)]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Whether the failure is about the API key, so the reader should be
    /// told how to fix their configuration.
    pub fn is_credential_problem(&self) -> bool {
        match self {
            FetchError::Status { status, .. } => matches!(*status, 401 | 426),
            FetchError::Upstream { code: Some(code), .. } => {
                CREDENTIAL_CODES.contains(&code.as_str())
            }
            _ => false,
        }
    }

    /// HTTP status, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Map a non-success HTTP status to the message shown to the reader.
///
/// Known statuses get a fixed explanation; anything else is
/// [`GENERIC_MESSAGE`]. The body's own message is never shown for a failed
/// status.
pub fn classify_status(status: u16) -> &'static str {
    match status {
        401 => "Invalid API key: Please check your NewsAPI key in the .env file.",
        426 => {
            "API key issue: Please check if your NewsAPI key is valid and supports requests \
             from this domain. If running locally, ensure your key supports localhost requests."
        }
        429 => "Rate limit exceeded: You have made too many requests. Please try again later.",
        500..=599 => "Server error: NewsAPI is experiencing issues. Please try again later.",
        _ => GENERIC_MESSAGE,
    }
}

/// Invalid or incomplete configuration. Startup stops on any of these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "no NewsAPI key configured: pass --api-key, set NEWSAPI_KEY, \
         or add `api_key` to the config file"
    )]
    MissingApiKey,

    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {path} at `{at}`: {message}")]
    ParseFile {
        path: PathBuf,
        at: String,
        message: String,
    },

    #[error("invalid country code `{0}`: expected two letters such as `in` or `us`")]
    InvalidCountry(String),

    #[error(
        "unknown category `{0}`: expected one of {names}",
        names = crate::utils::category_names()
    )]
    InvalidCategory(String),

    #[error("invalid page size {0}: must be between 1 and 100")]
    InvalidPageSize(u32),

    #[error("invalid base URL `{url}`: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_statuses() {
        assert_eq!(
            classify_status(401),
            "Invalid API key: Please check your NewsAPI key in the .env file."
        );
        assert!(classify_status(426).starts_with("API key issue:"));
        assert!(classify_status(429).starts_with("Rate limit exceeded:"));
        assert!(classify_status(500).starts_with("Server error:"));
        assert!(classify_status(503).starts_with("Server error:"));
    }

    #[test]
    fn test_classify_other_statuses() {
        assert_eq!(classify_status(400), GENERIC_MESSAGE);
        assert_eq!(classify_status(404), GENERIC_MESSAGE);

        let err = FetchError::Status {
            status: 400,
            message: Some("The country parameter is invalid.".to_string()),
        };
        assert_eq!(err.to_string(), GENERIC_MESSAGE);
    }

    #[test]
    fn test_status_display() {
        let err = FetchError::Status {
            status: 429,
            message: Some("You have made too many requests".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded: You have made too many requests. Please try again later."
        );
        assert_eq!(err.status(), Some(429));
        assert!(!err.is_credential_problem());
    }

    #[test]
    fn test_upstream_display_is_verbatim() {
        let err = FetchError::Upstream {
            code: Some("parametersMissing".to_string()),
            message: Some("Required parameters are missing.".to_string()),
        };
        assert_eq!(err.to_string(), "Required parameters are missing.");

        let bare = FetchError::Upstream {
            code: None,
            message: None,
        };
        assert_eq!(bare.to_string(), GENERIC_MESSAGE);
    }

    #[test]
    fn test_credential_problem() {
        let unauthorized = FetchError::Status {
            status: 401,
            message: None,
        };
        assert!(unauthorized.is_credential_problem());

        let upgrade = FetchError::Status {
            status: 426,
            message: None,
        };
        assert!(upgrade.is_credential_problem());

        let disabled = FetchError::Upstream {
            code: Some("apiKeyDisabled".to_string()),
            message: Some("Your API key has been disabled.".to_string()),
        };
        assert!(disabled.is_credential_problem());
    }

    #[test]
    fn test_decode_display() {
        let err: FetchError = serde_json::from_str::<serde_json::Value>("not json")
            .unwrap_err()
            .into();
        assert_eq!(err.to_string(), GENERIC_MESSAGE);
    }

    #[test]
    fn test_config_error_messages() {
        assert!(ConfigError::MissingApiKey.to_string().contains("NEWSAPI_KEY"));
        let err = ConfigError::InvalidCategory("politics".to_string());
        assert_eq!(
            err.to_string(),
            "unknown category `politics`: expected one of \
             general, business, entertainment, health, science, sports, technology"
        );
    }
}
