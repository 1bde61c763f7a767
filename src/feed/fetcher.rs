//! Feed fetcher
//!
//! Retrieves the topic feed over HTTP and hands the body to the parser.

use crate::config::FeedConfig;
use crate::feed::{parse_worklist, WorklistEntry};
use crate::FeedError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Anything that can produce the ordered list of topics to visit
#[async_trait]
pub trait WorklistSource: Send + Sync {
    /// Fetches a fresh worklist
    ///
    /// A failure is fatal for the calling session; no partial list is
    /// returned.
    async fn fetch_worklist(&self) -> Result<Vec<WorklistEntry>, FeedError>;
}

/// Builds the HTTP client used for feed requests
pub fn build_http_client(config: &FeedConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Worklist source backed by the forum's RSS feed
pub struct RssWorklistSource {
    client: Client,
    feed_url: String,
    config: FeedConfig,
}

impl RssWorklistSource {
    pub fn new(feed_url: impl Into<String>, config: FeedConfig) -> Result<Self, FeedError> {
        let feed_url = feed_url.into();
        let client = build_http_client(&config).map_err(|source| FeedError::Http {
            url: feed_url.clone(),
            source,
        })?;

        Ok(Self {
            client,
            feed_url,
            config,
        })
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }
}

#[async_trait]
impl WorklistSource for RssWorklistSource {
    async fn fetch_worklist(&self) -> Result<Vec<WorklistEntry>, FeedError> {
        tracing::debug!("Fetching feed {}", self.feed_url);

        let http_error = |source| FeedError::Http {
            url: self.feed_url.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.feed_url)
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: self.feed_url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(http_error)?;
        let worklist = parse_worklist(&body, &self.config)?;

        tracing::debug!("Feed parsed: {} topics", worklist.len());
        Ok(worklist)
    }
}
