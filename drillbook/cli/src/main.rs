//! Drillbook CLI
//!
//! Runs the async drills and queries a GitHub organization from the shell.
//!
//! # Usage
//!
//! ```bash
//! # One random delay (default bound from config, 10s out of the box)
//! drillbook wait
//!
//! # Five spawned delays, printed in completion order
//! drillbook tasks -n 5 --max-delay 3
//!
//! # Average time per delay of a fan-out
//! drillbook measure -n 10
//!
//! # Public repositories of an organization, optionally by license
//! drillbook repos rust-lang --license mit --names
//!
//! # With verbose logging
//! RUST_LOG=debug drillbook tasks
//! ```
//!
//! # Environment Variables
//!
//! - `DRILLBOOK_CONFIG`: Path to the TOML configuration file
//! - `DRILLBOOK_MAX_DELAY`, `DRILLBOOK_FAN_OUT`, `DRILLBOOK_GITHUB_API`,
//!   `DRILLBOOK_HTTP_TIMEOUT`: see `drillbook_core::config`
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use drillbook_core::{
    async_comprehension, default_config_path, load_config_with_env, measure_runtime,
    measure_time, task_wait_n, wait_n, wait_random, ConfigOverrides, DrillbookConfig,
    GithubOrgClient, HttpFetcher,
};

/// Cooperative async drills and a GitHub organization client
#[derive(Debug, Parser)]
#[command(name = "drillbook", version, about)]
struct Cli {
    /// Configuration file (defaults to the XDG config location)
    #[arg(long, global = true, env = "DRILLBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Wait one random delay and print it
    Wait {
        /// Upper bound in seconds
        #[arg(long)]
        max_delay: Option<f64>,
    },

    /// Spawn N delay tasks and print their delays as they complete
    Tasks {
        /// Number of tasks
        #[arg(short)]
        n: Option<usize>,
        /// Upper bound in seconds
        #[arg(long)]
        max_delay: Option<f64>,
    },

    /// Run N delays on one task and print them as they complete
    WaitN {
        /// Number of delays
        #[arg(short)]
        n: Option<usize>,
        /// Upper bound in seconds
        #[arg(long)]
        max_delay: Option<f64>,
    },

    /// Print the average time per delay of a fan-out
    Measure {
        /// Number of delays
        #[arg(short)]
        n: Option<usize>,
        /// Upper bound in seconds
        #[arg(long)]
        max_delay: Option<f64>,
    },

    /// Collect the paced random stream; with --parallel, time four at once
    Stream {
        /// Run four collections concurrently and print the elapsed time
        #[arg(long)]
        parallel: bool,
    },

    /// List an organization's public repositories as JSON
    Repos {
        /// Organization login
        org: String,
        /// Only repositories under this license key (e.g. "mit")
        #[arg(long)]
        license: Option<String>,
        /// Print names only
        #[arg(long)]
        names: bool,
        /// GitHub API root
        #[arg(long)]
        api_base: Option<String>,
    },
}

impl Command {
    /// Command-line values that take precedence over config and environment
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        match self {
            Self::Wait { max_delay } => overrides.max_delay = *max_delay,
            Self::Tasks { n, max_delay }
            | Self::WaitN { n, max_delay }
            | Self::Measure { n, max_delay } => {
                overrides.fan_out = *n;
                overrides.max_delay = *max_delay;
            }
            Self::Stream { .. } => {}
            Self::Repos { api_base, .. } => overrides.api_base.clone_from(api_base),
        }
        overrides
    }
}

/// Resolve configuration: file, then environment, then command line
fn resolve_config(cli: &Cli) -> anyhow::Result<DrillbookConfig> {
    resolve_config_with_env(cli, |key| std::env::var(key).ok())
}

fn resolve_config_with_env(
    cli: &Cli,
    var: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<DrillbookConfig> {
    let path = cli.config.clone().or_else(default_config_path);
    let mut config = load_config_with_env(path, var).context("Failed to load configuration")?;
    cli.command
        .overrides()
        .apply(&mut config)
        .context("Invalid command-line value")?;
    debug!(source = %config.source(), ?config, "Configuration resolved");
    Ok(config)
}

fn print_delays(delays: &[f64]) {
    for delay in delays {
        println!("{delay:.6}");
    }
}

async fn run(command: Command, config: DrillbookConfig) -> anyhow::Result<()> {
    let max_delay = config.delay.max_delay;
    let n = config.delay.fan_out;

    match command {
        Command::Wait { .. } => {
            println!("{:.6}", wait_random(max_delay).await);
        }
        Command::Tasks { .. } => {
            let delays = task_wait_n(n, max_delay)
                .await
                .context("A delay task did not finish")?;
            print_delays(&delays);
        }
        Command::WaitN { .. } => {
            print_delays(&wait_n(n, max_delay).await);
        }
        Command::Measure { .. } => {
            println!("{:.6}", measure_time(n, max_delay).await);
        }
        Command::Stream { parallel } => {
            if parallel {
                println!("{:.6}", measure_runtime().await);
            } else {
                print_delays(&async_comprehension().await);
            }
        }
        Command::Repos {
            org,
            license,
            names,
            ..
        } => {
            let fetcher =
                HttpFetcher::from_config(&config.github).context("Failed to create HTTP client")?;
            let client = GithubOrgClient::new(&org, fetcher).with_api_base(&config.github.api_base);
            let license = license.as_deref();

            if names {
                for name in client.public_repo_names(license).await? {
                    println!("{name}");
                }
            } else {
                let repos = client.public_repos(license).await?;
                println!("{}", serde_json::to_string_pretty(&repos)?);
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "drillbook={default_level},drillbook_core={default_level}"
                ))
            }),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(&cli)?;
    info!(command = ?cli.command, "Starting drillbook");

    // Single-threaded cooperative scheduling: every task shares this thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run(cli.command, config))
}
