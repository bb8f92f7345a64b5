//! HTTP access to the NewsAPI top-headlines endpoint.
//!
//! # Architecture
//!
//! The module uses a trait-based design so the feed controller does not care
//! where pages come from:
//! - [`HeadlineSource`]: Core trait defining how one page is fetched
//! - [`NewsApiClient`]: The real implementation, backed by `reqwest`
//!
//! # Request Shape
//!
//! ```text
//! GET {base}/top-headlines?country=in&category=general&apiKey=...&page=1&pageSize=12
//! ```
//!
//! Every request is a single attempt. There is no retry, backoff, or
//! cancellation; the caller decides what a failure means.

use crate::error::FetchError;
use crate::models::{Envelope, FetchParams, PageResult};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Default upstream base URL.
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

/// Trait for anything that can produce a page of headlines.
///
/// Implementors fetch exactly the page described by [`FetchParams`] and either
/// return its articles with the upstream total, or a classified [`FetchError`].
pub trait HeadlineSource {
    /// Fetch a single page.
    ///
    /// # Arguments
    ///
    /// * `params` - Country, category, 1-based page number and page size
    ///
    /// # Returns
    ///
    /// The page's articles in upstream order plus the reported total, or the
    /// reason the page could not be retrieved.
    async fn fetch_page(&self, params: &FetchParams) -> Result<PageResult, FetchError>;
}

/// Client for the top-headlines endpoint.
///
/// Holds a shared `reqwest::Client`, the resolved endpoint URL, and the API key.
/// The key is sent as the `apiKey` query parameter and is never logged.
#[derive(Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl NewsApiClient {
    /// Build a client for the given endpoint.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Full URL of the top-headlines resource
    /// * `api_key` - NewsAPI credential
    /// * `timeout` - Per-request timeout
    pub fn new(endpoint: Url, api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint,
            api_key,
        })
    }

    /// The request URL for a page, credential included.
    fn page_url(&self, params: &FetchParams) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("country", params.country.as_str())
            .append_pair("category", params.category.as_str())
            .append_pair("apiKey", &self.api_key)
            .append_pair("page", &params.page.to_string())
            .append_pair("pageSize", &params.page_size.to_string());
        url
    }
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl HeadlineSource for NewsApiClient {
    #[instrument(
        level = "info",
        skip_all,
        fields(country = %params.country, category = %params.category, page = params.page)
    )]
    async fn fetch_page(&self, params: &FetchParams) -> Result<PageResult, FetchError> {
        let t0 = Instant::now();

        // reqwest errors embed the request URL, which carries the key.
        let response = self
            .http
            .get(self.page_url(params))
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.without_url()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.without_url()))?;
        let dt = t0.elapsed();

        if !status.is_success() {
            let message = match serde_json::from_str::<Envelope>(&body) {
                Ok(Envelope::Error { message, .. }) => message,
                _ => None,
            };
            warn!(
                status = status.as_u16(),
                elapsed_ms = dt.as_millis() as u64,
                upstream_message = message.as_deref().unwrap_or(""),
                "Headline request rejected"
            );
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        match serde_json::from_str::<Envelope>(&body)? {
            Envelope::Ok {
                total_results,
                articles,
            } => {
                info!(
                    count = articles.len(),
                    total_results,
                    elapsed_ms = dt.as_millis() as u64,
                    "Fetched headline page"
                );
                Ok(PageResult {
                    articles,
                    total_results,
                })
            }
            Envelope::Error { code, message } => {
                debug!(?code, ?message, "Error-shaped body behind a success status");
                Err(FetchError::Upstream { code, message })
            }
        }
    }
}
