// Shared stubs and fixtures for the integration tests

#![allow(dead_code)]

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use drillbook_core::{FetchError, JsonFetcher};

/// What a [`StubFetcher`] does when asked for a URL
enum Outcome {
    /// Same document for every URL
    Return(Value),
    /// Same failure for every URL
    Fail(FetchError),
    /// Per-URL documents; unknown URLs are a 404
    Routes(HashMap<String, Value>),
}

/// In-memory [`JsonFetcher`] that records every URL it is asked for
pub struct StubFetcher {
    outcome: Outcome,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    fn with(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every request with `payload`
    pub fn returning(payload: Value) -> Self {
        Self::with(Outcome::Return(payload))
    }

    /// Fail every request with `error`
    pub fn failing(error: FetchError) -> Self {
        Self::with(Outcome::Fail(error))
    }

    /// Answer by URL
    pub fn routes<const N: usize>(routes: [(&str, Value); N]) -> Self {
        Self::with(Outcome::Routes(
            routes
                .into_iter()
                .map(|(url, payload)| (url.to_string(), payload))
                .collect(),
        ))
    }

    /// URLs requested so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Assert exactly one request was made, for `url`
    pub fn assert_called_once_with(&self, url: &str) {
        assert_eq!(self.calls(), vec![url.to_string()]);
    }

    pub fn assert_not_called(&self) {
        assert!(self.calls().is_empty(), "unexpected fetches: {:?}", self.calls());
    }
}

#[async_trait]
impl JsonFetcher for StubFetcher {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        self.calls.lock().push(url.to_string());
        match &self.outcome {
            Outcome::Return(payload) => Ok(payload.clone()),
            Outcome::Fail(error) => Err(error.clone()),
            Outcome::Routes(routes) => routes.get(url).cloned().ok_or(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

pub const GOOGLE_ORG_URL: &str = "https://api.github.com/orgs/google";
pub const GOOGLE_REPOS_URL: &str = "https://api.github.com/orgs/google/repos";

/// Trimmed copy of the `google` organization document
pub fn org_payload() -> Value {
    json!({
        "login": "google",
        "id": 1_342_004,
        "url": GOOGLE_ORG_URL,
        "repos_url": GOOGLE_REPOS_URL,
        "description": "Google ❤️ Open Source",
        "public_repos": 4,
        "type": "Organization"
    })
}

/// Trimmed copy of the `google` public repository listing
pub fn repos_payload() -> Value {
    json!([
        {
            "name": "episodes.dart",
            "full_name": "google/episodes.dart",
            "private": false,
            "license": {"key": "bsd-3-clause", "name": "BSD 3-Clause \"New\" or \"Revised\" License"}
        },
        {
            "name": "cpp-netlib",
            "full_name": "google/cpp-netlib",
            "private": false,
            "license": {"key": "bsl-1.0", "name": "Boost Software License 1.0"}
        },
        {
            "name": "dagger",
            "full_name": "google/dagger",
            "private": false,
            "license": {"key": "apache-2.0", "name": "Apache License 2.0"}
        },
        {
            "name": "kratu",
            "full_name": "google/kratu",
            "private": false,
            "license": null
        }
    ])
}

/// Names in [`repos_payload`]
pub fn expected_repos() -> Vec<String> {
    ["episodes.dart", "cpp-netlib", "dagger", "kratu"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Names in [`repos_payload`] under Apache 2.0
pub fn apache2_repos() -> Vec<String> {
    vec!["dagger".to_string()]
}
