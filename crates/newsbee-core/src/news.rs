//! News client for the NewsAPI top-headlines endpoint.
//!
//! One GET per fetch, no retry, no backoff. Non-200 statuses and transport
//! failures come back as a typed [`NewsError`] whose `Display` is a one-line
//! notice for the UI.

use std::fmt;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Standard User-Agent header for NewsBee API requests.
pub const USER_AGENT: &str = concat!("newsbee/", env!("CARGO_PKG_VERSION"));

/// Request timeout for headline fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Headline category selector.
///
/// The fixed five categories offered by the UI; `query_value()` is what goes
/// on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Business,
    Health,
    Sports,
    Technology,
}

impl Category {
    /// Returns the lower-cased query parameter value for this category.
    pub fn query_value(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Business => "business",
            Category::Health => "health",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }

    /// Returns the display label for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Business => "Business",
            Category::Health => "Health",
            Category::Sports => "Sports",
            Category::Technology => "Technology",
        }
    }

    /// Returns all categories for iteration (e.g., in the selector).
    pub fn all() -> &'static [Category] {
        &[
            Category::General,
            Category::Business,
            Category::Health,
            Category::Sports,
            Category::Technology,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One external news item. Consumed read-only, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "urlToImage", default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub url: String,
}

/// Wire shape of the top-headlines response body.
///
/// Only `articles` is consumed; an absent field decodes as an empty list.
#[derive(Debug, Default, Deserialize)]
struct HeadlinesResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

/// Categories of fetch errors for consistent error handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsError {
    /// Non-200 HTTP status from the API.
    HttpStatus { status: u16 },
    /// Connection or timeout failure before a response arrived.
    Transport { message: String },
    /// Response body was not the expected JSON.
    Parse { message: String },
}

impl NewsError {
    /// Returns the HTTP status code, if this is a status error.
    pub fn status(&self) -> Option<u16> {
        match self {
            NewsError::HttpStatus { status } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for NewsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewsError::HttpStatus { status } => write!(
                f,
                "Failed to fetch news. Status code: {status}. Please check your API key."
            ),
            NewsError::Transport { message } => {
                write!(f, "Failed to fetch news: {message}")
            }
            NewsError::Parse { message } => {
                write!(f, "Failed to read the news response: {message}")
            }
        }
    }
}

impl std::error::Error for NewsError {}

/// Client for the top-headlines endpoint.
pub struct NewsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    country: String,
    page_size: Option<u32>,
}

impl NewsClient {
    /// Creates a client from the resolved configuration.
    ///
    /// # Errors
    /// Returns an error if no API key is available or the base URL is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.resolve_api_key()?;
        let base_url = config.resolve_base_url()?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key,
            country: config.country.clone(),
            page_size: config.page_size,
        })
    }

    /// Fetches top headlines for a category.
    ///
    /// Returns the `articles` array of the response body; an absent field is
    /// an empty list.
    ///
    /// # Errors
    /// Returns `HttpStatus` for any non-200 response, `Transport` for
    /// connection failures, and `Parse` for malformed bodies.
    pub async fn fetch(&self, category: Category) -> Result<Vec<Article>, NewsError> {
        let url = format!("{}/top-headlines", self.base_url);

        let mut query: Vec<(&str, String)> = vec![
            ("category", category.query_value().to_string()),
            ("country", self.country.clone()),
            ("apiKey", self.api_key.clone()),
        ];
        if let Some(page_size) = self.page_size {
            query.push(("pageSize", page_size.to_string()));
        }

        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| NewsError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(NewsError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body: HeadlinesResponse =
            response.json().await.map_err(|e| NewsError::Parse {
                message: e.to_string(),
            })?;

        Ok(body.articles)
    }
}
