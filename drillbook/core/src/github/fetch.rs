//! JSON Fetching Trait
//!
//! The organization client never talks HTTP directly. It asks a
//! [`JsonFetcher`] for the JSON document at a URL, which lets the real
//! network client and an in-memory stub be swapped freely.
//!
//! # Design Philosophy
//!
//! The trait is deliberately one method wide. Anything about transport
//! (timeouts, headers, auth) belongs to the implementation, and every
//! failure is flattened into a [`FetchError`] the caller can pass through
//! untouched.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Why a JSON document could not be fetched
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Server answered with a non-success status
    #[error("GET {url} returned HTTP {status}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Request never produced a response (DNS, connect, timeout, ...)
    #[error("GET {url} failed: {message}")]
    Transport {
        /// Requested URL
        url: String,
        /// Underlying error text
        message: String,
    },

    /// Response body was not valid JSON
    #[error("GET {url} returned an undecodable body: {message}")]
    Decode {
        /// Requested URL
        url: String,
        /// Decoder error text
        message: String,
    },
}

impl FetchError {
    /// URL of the failed request
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } | Self::Transport { url, .. } | Self::Decode { url, .. } => {
                url
            }
        }
    }

    /// HTTP status, when the server answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Source of JSON documents
///
/// Implement this trait to plug a different transport (or a test double)
/// into [`GithubOrgClient`](super::GithubOrgClient).
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// Fetch and decode the JSON document at `url`
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

#[async_trait]
impl<F: JsonFetcher + ?Sized> JsonFetcher for Arc<F> {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        (**self).get_json(url).await
    }
}
