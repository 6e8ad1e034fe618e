//! TOML Configuration File Support
//!
//! Configuration lives at `$XDG_CONFIG_HOME/drillbook/config.toml`
//! (typically `~/.config/drillbook/config.toml`).
//!
//! # Configuration Priority
//!
//! Highest first:
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [delay]
//! max_delay = 10.0
//! fan_out = 5
//!
//! [github]
//! api_base = "https://api.github.com"
//! timeout_secs = 30
//! user_agent = "drillbook/0.1.0"
//! ```
//!
//! # Environment Variables
//!
//! - `DRILLBOOK_MAX_DELAY`: delay upper bound in seconds
//! - `DRILLBOOK_FAN_OUT`: number of concurrent delays
//! - `DRILLBOOK_GITHUB_API`: GitHub API root
//! - `DRILLBOOK_HTTP_TIMEOUT`: HTTP timeout in seconds

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::delay::DEFAULT_MAX_DELAY;
use crate::github::DEFAULT_API_BASE;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where the winning configuration values came from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// Configuration Structures
// =============================================================================

/// `[delay]` section
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    /// Upper bound for random delays, in seconds
    pub max_delay: f64,
    /// How many delays the fan-out commands launch
    pub fan_out: usize,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            max_delay: DEFAULT_MAX_DELAY,
            fan_out: 5,
        }
    }
}

/// `[github]` section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// API root, without trailing slash
    pub api_base: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header (GitHub rejects requests without one)
    pub user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: 30,
            user_agent: concat!("drillbook/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl GithubConfig {
    /// Request timeout as a [`Duration`]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Complete drillbook configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillbookConfig {
    /// Delay drill settings
    pub delay: DelayConfig,
    /// GitHub client settings
    pub github: GithubConfig,

    /// Where the configuration was loaded from
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
    /// Highest-priority source that contributed a value
    #[serde(skip)]
    source: ConfigSource,
}

impl DrillbookConfig {
    /// Highest-priority source that contributed a value
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] on a negative or non-finite
    /// delay bound, a zero fan-out, a zero timeout, or an empty API root.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.delay.max_delay.is_finite() || self.delay.max_delay < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "delay.max_delay must be a non-negative number, got {}",
                self.delay.max_delay
            )));
        }
        if self.delay.fan_out == 0 {
            return Err(ConfigError::ValidationError(
                "delay.fan_out must be at least 1".to_string(),
            ));
        }
        if self.github.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "github.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.github.api_base.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "github.api_base must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("drillbook").join("config.toml"))
}

/// Load configuration from the default path, defaults, and environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the merged values fail validation. A missing file is not an error.
pub fn load_config() -> Result<DrillbookConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// `None` skips the file and uses only defaults and environment variables.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the merged
/// values fail validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<DrillbookConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// [`load_config_from_path`] reading overrides through `var` instead of the
/// process environment
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env(
    path: Option<PathBuf>,
    var: impl Fn(&str) -> Option<String>,
) -> Result<DrillbookConfig, ConfigError> {
    let mut config = match path {
        Some(ref config_path) if config_path.exists() => read_config_file(config_path)?,
        Some(ref config_path) => {
            debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
            DrillbookConfig::default()
        }
        None => DrillbookConfig::default(),
    };

    apply_env_config(&mut config, var);
    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<DrillbookConfig, ConfigError> {
    let toml_content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut config: DrillbookConfig = toml::from_str(&toml_content)?;
    config.config_file_path = Some(path.to_path_buf());
    config.source = ConfigSource::File;

    info!(path = %path.display(), "Loaded configuration from file");
    Ok(config)
}

/// Parse `raw` for `key`, warning (not failing) on garbage
fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Option<T> {
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        warn!(key, value = raw, "Ignoring unparsable environment override");
    }
    parsed
}

/// Apply environment variable overrides, reading variables through `var`
fn apply_env_config(config: &mut DrillbookConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(max_delay) = var("DRILLBOOK_MAX_DELAY")
        .and_then(|raw| parse_env::<f64>("DRILLBOOK_MAX_DELAY", &raw))
    {
        config.delay.max_delay = max_delay;
        config.source = ConfigSource::Env;
    }
    if let Some(fan_out) =
        var("DRILLBOOK_FAN_OUT").and_then(|raw| parse_env::<usize>("DRILLBOOK_FAN_OUT", &raw))
    {
        config.delay.fan_out = fan_out;
        config.source = ConfigSource::Env;
    }
    if let Some(api_base) = var("DRILLBOOK_GITHUB_API") {
        config.github.api_base = api_base;
        config.source = ConfigSource::Env;
    }
    if let Some(timeout) = var("DRILLBOOK_HTTP_TIMEOUT")
        .and_then(|raw| parse_env::<u64>("DRILLBOOK_HTTP_TIMEOUT", &raw))
    {
        config.github.timeout_secs = timeout;
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Overrides
// =============================================================================

/// Values supplied on the command line
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Delay bound override
    pub max_delay: Option<f64>,
    /// Fan-out count override
    pub fan_out: Option<usize>,
    /// GitHub API root override
    pub api_base: Option<String>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set delay bound override
    #[must_use]
    pub fn with_max_delay(mut self, max_delay: f64) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    /// Set fan-out override
    #[must_use]
    pub fn with_fan_out(mut self, fan_out: usize) -> Self {
        self.fan_out = Some(fan_out);
        self
    }

    /// Set API root override
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Whether any override is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.max_delay.is_none() && self.fan_out.is_none() && self.api_base.is_none()
    }

    /// Apply the overrides on top of `config` and re-validate
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if an override is out of range.
    pub fn apply(&self, config: &mut DrillbookConfig) -> Result<(), ConfigError> {
        if let Some(max_delay) = self.max_delay {
            config.delay.max_delay = max_delay;
        }
        if let Some(fan_out) = self.fan_out {
            config.delay.fan_out = fan_out;
        }
        if let Some(ref api_base) = self.api_base {
            config.github.api_base.clone_from(api_base);
        }
        if !self.is_empty() {
            config.source = ConfigSource::Cli;
        }
        config.validate()
    }
}
