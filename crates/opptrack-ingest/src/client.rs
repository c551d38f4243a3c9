//! Remote search API client
//!
//! Wraps the paginated opportunity search endpoint. `PageStream` is the
//! record source adapter: a lazy, finite, non-restartable sequence of
//! batches, one HTTP call per batch. Any transport failure or non-success
//! status ends the sequence; errors are logged, never yielded.

use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use opptrack_common::{OppError, Opportunity, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default page size for search requests.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Default posted-date lookback window in days.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default search endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.sam.gov/opportunities/v2/search";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(OppError::Config("search base URL cannot be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(OppError::Config("timeout must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// A search query against the opportunity API.
///
/// The posted-date range defaults to the last [`DEFAULT_LOOKBACK_DAYS`] days
/// through today when unset.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub naics: Vec<String>,
    pub agencies: Vec<String>,
    pub notice_type: String,
    pub posted_from: Option<NaiveDate>,
    pub posted_to: Option<NaiveDate>,
    pub limit: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            naics: Vec::new(),
            agencies: Vec::new(),
            notice_type: "Solicitation".to_string(),
            posted_from: None,
            posted_to: None,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchQuery {
    /// Resolve the posted-date range, applying the lookback default.
    fn date_range(&self) -> (NaiveDate, NaiveDate) {
        let today = Utc::now().date_naive();
        let from = self
            .posted_from
            .unwrap_or_else(|| today - ChronoDuration::days(DEFAULT_LOOKBACK_DAYS));
        let to = self.posted_to.unwrap_or(today);
        (from, to)
    }

    /// Query parameters for one page fetch. Dates use MM/DD/YYYY, list
    /// filters are comma-joined.
    fn params(&self, api_key: &str, offset: usize) -> Vec<(&'static str, String)> {
        let (from, to) = self.date_range();

        let mut params = vec![
            ("api_key", api_key.to_string()),
            ("limit", self.limit.to_string()),
            ("offset", offset.to_string()),
            ("noticeType", self.notice_type.clone()),
            ("postedFrom", from.format("%m/%d/%Y").to_string()),
            ("postedTo", to.format("%m/%d/%Y").to_string()),
        ];

        if let Some(ref keyword) = self.keyword {
            params.push(("q", keyword.clone()));
        }
        if !self.naics.is_empty() {
            params.push(("naics", self.naics.join(",")));
        }
        if !self.agencies.is_empty() {
            params.push(("agency", self.agencies.join(",")));
        }

        params
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default, rename = "opportunitiesData")]
    opportunities_data: Vec<Opportunity>,
}

/// HTTP client for the opportunity search API.
#[derive(Debug, Clone)]
pub struct SamClient {
    http: Client,
    config: ClientConfig,
}

impl SamClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("opptrack-ingest/0.1")
            .build()
            .map_err(|e| OppError::Network(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Begin a paginated search. The returned stream is lazy: no request is
    /// made until the first `next_batch` call.
    pub fn pages(&self, query: SearchQuery) -> PageStream<'_> {
        PageStream {
            client: self,
            query,
            offset: 0,
            page_num: 0,
            done: false,
        }
    }

    /// Single-item detail lookup by solicitation number (not paginated).
    ///
    /// Returns the first matching record, or `None` when the identifier is
    /// unknown to the remote source.
    pub async fn detail(&self, solicitation_number: &str) -> Result<Option<Opportunity>> {
        let params = [
            ("api_key", self.config.api_key.as_str()),
            ("solicitationNumber", solicitation_number),
        ];

        let response = self
            .http
            .get(&self.config.base_url)
            .query(&params)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| OppError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(OppError::Network(format!("HTTP {}", response.status())));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| OppError::Network(e.to_string()))?;

        Ok(body.opportunities_data.into_iter().next())
    }

    /// Fetch one page of results at the given offset.
    async fn fetch_page(&self, query: &SearchQuery, offset: usize) -> Result<Vec<Opportunity>> {
        let params = query.params(&self.config.api_key, offset);

        let response = self
            .http
            .get(&self.config.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OppError::Network(format!(
                        "request timeout after {}s",
                        self.config.timeout_secs
                    ))
                } else {
                    OppError::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(OppError::Network(format!("HTTP {}", response.status())));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| OppError::Network(e.to_string()))?;

        Ok(body.opportunities_data)
    }
}

/// Lazy sequence of record batches from a paginated search.
///
/// The sequence ends when a page comes back short, empty, or fails. It is
/// not restartable; create a new stream to search again. Errors terminate
/// the sequence and are reported via logging, so a failed first page is
/// indistinguishable from an empty result set by design: callers must treat
/// zero batches as a valid outcome.
pub struct PageStream<'a> {
    client: &'a SamClient,
    query: SearchQuery,
    offset: usize,
    page_num: usize,
    done: bool,
}

impl PageStream<'_> {
    /// Fetch and return the next batch, or `None` when the sequence is over.
    pub async fn next_batch(&mut self) -> Option<Vec<Opportunity>> {
        if self.done {
            return None;
        }

        self.page_num += 1;
        debug!(page = self.page_num, offset = self.offset, "Fetching search page");

        match self.client.fetch_page(&self.query, self.offset).await {
            Ok(batch) => {
                info!(page = self.page_num, records = batch.len(), "Fetched search page");

                if batch.is_empty() {
                    self.done = true;
                    return None;
                }

                if batch.len() < self.query.limit {
                    // Short page: the remote source is exhausted.
                    self.done = true;
                } else {
                    self.offset += self.query.limit;
                }

                Some(batch)
            },
            Err(e) => {
                warn!(page = self.page_num, error = %e, "Search page failed, ending sequence");
                self.done = true;
                None
            },
        }
    }

    /// Number of pages fetched so far (including the terminating fetch).
    pub fn pages_fetched(&self) -> usize {
        self.page_num
    }
}
