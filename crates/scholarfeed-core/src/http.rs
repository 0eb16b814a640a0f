use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::{FeedError, Result};

pub const USER_AGENT: &str = "scholarfeed/0.1";

/// Per-attempt timeout. One hung relay must not stall the whole chain.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Thin GET wrapper over reqwest: configured user agent, bounded per-request
/// latency, and non-success statuses surfaced as [`FeedError::Relay`].
pub struct RelayClient {
    client: reqwest::Client,
}

impl RelayClient {
    pub fn new() -> Self {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .gzip(true)
            .timeout(timeout)
            .build()
            .expect("failed to build reqwest client");
        Self { client }
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            return Err(FeedError::Relay(url.to_string(), format!("HTTP {status}")));
        }
        resp.text().await.map_err(FeedError::Http)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let text = self.get_text(url).await?;
        serde_json::from_str(&text).map_err(|e| FeedError::Parse(e.to_string()))
    }
}

impl Default for RelayClient {
    fn default() -> Self {
        Self::new()
    }
}
