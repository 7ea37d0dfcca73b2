//! MediaWiki category lookup.
//!
//! Lookups never fail from the caller's point of view: any transport, status
//! or decoding problem is logged and reported as "no categories", which the
//! classifier turns into `unclassified`.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::AnnotateConfig;
use crate::error::AppError;

pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";
pub const DEFAULT_USER_AGENT: &str = "domain-strata/0.1 (dataset domain annotation)";
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(50);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const CATEGORY_LIMIT: &str = "500";
const CATEGORY_PREFIX: &str = "Category:";

/// Anything that can answer "which categories does this article have?".
pub trait CategorySource {
    /// Category names for `title`; empty when the page is missing or the lookup failed.
    fn categories(&self, title: &str) -> Vec<String>;
}

/// Blocking MediaWiki API client. One session is reused for every lookup.
pub struct WikipediaClient {
    client: Client,
    api_url: String,
    delay: Duration,
}

impl WikipediaClient {
    pub fn new(
        api_url: impl Into<String>,
        user_agent: &str,
        delay: Duration,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            delay,
        })
    }

    pub fn from_config(config: &AnnotateConfig) -> Result<Self, AppError> {
        Self::new(
            config.api_url.clone(),
            &config.user_agent,
            config.request_delay,
            config.request_timeout,
        )
    }

    fn fetch_categories(&self, title: &str) -> Result<Vec<String>, String> {
        // Rate limiting: a fixed pause before every request.
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        let resp = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("titles", title),
                ("prop", "categories"),
                ("cllimit", CATEGORY_LIMIT),
            ])
            .send()
            .map_err(|e| format!("request failed: {e}"))?;

        if !resp.status().is_success() {
            return Err(format!("request failed with status {}", resp.status()));
        }

        let body: QueryResponse = resp
            .json()
            .map_err(|e| format!("failed to parse response: {e}"))?;

        Ok(body.into_categories())
    }
}

impl CategorySource for WikipediaClient {
    fn categories(&self, title: &str) -> Vec<String> {
        match self.fetch_categories(title) {
            Ok(categories) => categories,
            Err(error) => {
                debug!(title, %error, "category lookup failed; treating as uncategorized");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryBody>,
}

#[derive(Debug, Default, Deserialize)]
struct QueryBody {
    /// Keyed by page id (negative ids for missing pages), in response order.
    #[serde(default)]
    pages: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct Page {
    #[serde(default)]
    missing: Option<Value>,
    #[serde(default)]
    categories: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    #[serde(default)]
    title: String,
}

impl QueryResponse {
    /// Categories of the first page in the response.
    fn into_categories(self) -> Vec<String> {
        let Some(first) = self.query.and_then(|q| q.pages.into_iter().next()) else {
            return Vec::new();
        };
        let page: Page = serde_json::from_value(first.1).unwrap_or_default();
        if page.missing.is_some() {
            return Vec::new();
        }

        page.categories
            .into_iter()
            .map(|c| c.title.replace(CATEGORY_PREFIX, ""))
            .collect()
    }
}
