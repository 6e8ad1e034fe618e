//! Drillbook Core - Cooperative Async Drills and a Testable GitHub Client
//!
//! Two independent halves live in this crate:
//!
//! 1. **Async drills**: random delays, spawned delay tasks, and fan-out that
//!    collects results in completion order, plus a paced random stream.
//! 2. **GitHub organization client**: a read-only client whose network access
//!    goes through the [`JsonFetcher`] trait, so every behaviour can be tested
//!    against an in-memory stub.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐   ┌──────────────────────────────────┐
//! │          Async drills        │   │        GitHub org client         │
//! │                              │   │                                  │
//! │  delay::wait_random          │   │  GithubOrgClient<F: JsonFetcher> │
//! │        │                     │   │     │ org()  (memoized)          │
//! │  tasks::task_wait_random     │   │     │ public_repos_url()         │
//! │        │  DelayTask          │   │     │ public_repos(license)      │
//! │  fanout::task_wait_n         │   │     ▼                            │
//! │  fanout::wait_n              │   │  JsonFetcher ──► HttpFetcher     │
//! │  stream::random_stream       │   │              └─► test stubs      │
//! └──────────────────────────────┘   └──────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use drillbook_core::{task_wait_n, GithubOrgClient, HttpFetcher, load_config};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!
//!     // Five delays, reported as they finish
//!     let delays = task_wait_n(5, config.delay.max_delay).await?;
//!     println!("{delays:?}");
//!
//!     let fetcher = HttpFetcher::from_config(&config.github)?;
//!     let client = GithubOrgClient::new("rust-lang", fetcher);
//!     println!("{:?}", client.public_repo_names(Some("mit")).await?);
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`delay`]: Randomized delay suspension
//! - [`tasks`]: Spawned delay task handles
//! - [`fanout`]: Completion-ordered fan-out and timing
//! - [`stream`]: Paced random-number stream
//! - [`lookup`]: Nested JSON key access
//! - [`github`]: GitHub organization client and fetchers
//! - [`config`]: TOML + environment configuration

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod delay;
pub mod fanout;
pub mod github;
pub mod lookup;
pub mod stream;
pub mod tasks;

// Re-exports for convenience
pub use delay::{sample_delay, wait_random, wait_random_default, wait_random_with, DEFAULT_MAX_DELAY};
pub use fanout::{measure_time, task_wait_n, wait_n};
pub use stream::{async_comprehension, measure_runtime, random_stream, random_stream_with};
pub use tasks::{task_wait_random, DelayTask, TaskError, TaskId};

// GitHub exports
pub use github::{ClientError, FetchError, GithubOrgClient, HttpFetcher, JsonFetcher};
pub use lookup::{access_nested_map, access_nested_str, LookupError};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, load_config_with_env, ConfigError, ConfigOverrides,
    ConfigSource, DelayConfig, DrillbookConfig, GithubConfig,
};
