//! HTTP JSON Fetcher
//!
//! [`JsonFetcher`] backed by `reqwest`, configured for the GitHub REST API
//! (JSON accept header, explicit user agent, bounded timeout).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;
use tracing::{debug, warn};

use super::fetch::{FetchError, JsonFetcher};
use crate::config::GithubConfig;

/// Media type GitHub recommends for REST calls
const GITHUB_JSON: &str = "application/vnd.github+json";

/// `reqwest`-based JSON fetcher
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given timeout and user agent
    pub fn new(timeout: Duration, user_agent: &str) -> reqwest::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self { http_client })
    }

    /// Create from [`GithubConfig`]
    pub fn from_config(config: &GithubConfig) -> reqwest::Result<Self> {
        Self::new(config.timeout(), &config.user_agent)
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!(url, "GET");

        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.http_client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Request rejected");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
