//! GitHub Organization API
//!
//! A small client for an organization's public repositories, written
//! against the [`JsonFetcher`] trait so the network can be swapped out.
//!
//! # Usage
//!
//! ```ignore
//! use drillbook_core::github::{GithubOrgClient, HttpFetcher};
//!
//! let fetcher = HttpFetcher::from_config(&config.github)?;
//! let client = GithubOrgClient::new("rust-lang", fetcher);
//! let names = client.public_repo_names(Some("apache-2.0")).await?;
//! ```

mod client;
mod fetch;
mod http;

pub use client::{ClientError, GithubOrgClient, DEFAULT_API_BASE};
pub use fetch::{FetchError, JsonFetcher};
pub use http::HttpFetcher;
