//! GitHub Organization Client
//!
//! Read-only view of one GitHub organization: its metadata document, the
//! URL of its public repository listing, and that listing (optionally
//! narrowed to one license).
//!
//! Both documents are fetched lazily and at most once per client. The
//! organization document can also be supplied up front with
//! [`GithubOrgClient::with_org_payload`], in which case it is never fetched.

use serde_json::Value;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::fetch::{FetchError, JsonFetcher};
use crate::lookup::{access_nested_map, access_nested_str, LookupError};

/// Public GitHub REST endpoint
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Errors from [`GithubOrgClient`]
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    /// A required field was absent from a payload
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// The fetcher failed; carried through unchanged
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A payload had the wrong JSON type
    #[error("expected {expected} for {what}")]
    UnexpectedShape {
        /// What was being read
        what: &'static str,
        /// The JSON type that was required
        expected: &'static str,
    },
}

/// Client for a single GitHub organization
pub struct GithubOrgClient<F> {
    org_name: String,
    api_base: String,
    fetcher: F,
    org: OnceCell<Value>,
    repos: OnceCell<Value>,
}

impl<F: JsonFetcher> GithubOrgClient<F> {
    /// Create a client for `org_name` against the public API
    pub fn new(org_name: impl Into<String>, fetcher: F) -> Self {
        Self {
            org_name: org_name.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            fetcher,
            org: OnceCell::new(),
            repos: OnceCell::new(),
        }
    }

    /// Point the client at a different API root (GitHub Enterprise, tests)
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Use `payload` as the organization document instead of fetching it
    #[must_use]
    pub fn with_org_payload(self, payload: Value) -> Self {
        Self {
            org: OnceCell::new_with(Some(payload)),
            ..self
        }
    }

    /// Organization login this client was created for
    pub fn org_name(&self) -> &str {
        &self.org_name
    }

    /// URL of the organization document
    pub fn org_url(&self) -> String {
        format!("{}/orgs/{}", self.api_base, self.org_name)
    }

    /// The fetcher this client reads through
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// The organization document, fetched on first use
    pub async fn org(&self) -> Result<&Value, ClientError> {
        let payload = self
            .org
            .get_or_try_init(|| async {
                let url = self.org_url();
                debug!(org = %self.org_name, %url, "Fetching organization");
                self.fetcher.get_json(&url).await
            })
            .await?;
        Ok(payload)
    }

    /// `repos_url` of the organization document
    pub async fn public_repos_url(&self) -> Result<String, ClientError> {
        let org = self.org().await?;
        let url = access_nested_map(org, &["repos_url"])?;
        url.as_str()
            .map(str::to_string)
            .ok_or(ClientError::UnexpectedShape {
                what: "repos_url",
                expected: "a string",
            })
    }

    /// The raw repository listing, fetched on first use
    pub async fn repos_payload(&self) -> Result<&Value, ClientError> {
        let payload = self
            .repos
            .get_or_try_init(|| async {
                let url = self.public_repos_url().await?;
                debug!(org = %self.org_name, %url, "Fetching repositories");
                Ok::<_, ClientError>(self.fetcher.get_json(&url).await?)
            })
            .await?;
        Ok(payload)
    }

    /// Public repositories, optionally only those under `license`
    pub async fn public_repos(&self, license: Option<&str>) -> Result<Vec<Value>, ClientError> {
        let repos = self
            .repos_payload()
            .await?
            .as_array()
            .ok_or(ClientError::UnexpectedShape {
                what: "repository listing",
                expected: "an array",
            })?;

        let selected: Vec<Value> = repos
            .iter()
            .filter(|repo| match license {
                Some(key) => Self::has_license(repo, key),
                None => true,
            })
            .cloned()
            .collect();

        info!(
            org = %self.org_name,
            license = license.unwrap_or("*"),
            total = repos.len(),
            selected = selected.len(),
            "Listed public repositories"
        );
        Ok(selected)
    }

    /// Names of [`public_repos`](Self::public_repos)
    pub async fn public_repo_names(&self, license: Option<&str>) -> Result<Vec<String>, ClientError> {
        self.public_repos(license)
            .await?
            .iter()
            .map(|repo| {
                access_nested_str(repo, &["name"])
                    .map(str::to_string)
                    .map_err(ClientError::from)
            })
            .collect()
    }

    /// Whether `repo` is published under `license_key`
    ///
    /// A repository without license metadata has no license.
    pub fn has_license(repo: &Value, license_key: &str) -> bool {
        access_nested_map(repo, &["license", "key"])
            .ok()
            .and_then(Value::as_str)
            .is_some_and(|key| key == license_key)
    }
}

impl<F> std::fmt::Debug for GithubOrgClient<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubOrgClient")
            .field("org_name", &self.org_name)
            .field("api_base", &self.api_base)
            .field("org_cached", &self.org.initialized())
            .field("repos_cached", &self.repos.initialized())
            .finish_non_exhaustive()
    }
}
