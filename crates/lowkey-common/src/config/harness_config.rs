//! Harness configuration
//!
//! Every setting has a compiled-in default; environment variables (or a
//! `.env` file) only override them.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Preview deployment the harness targets when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://premium-social-19.preview.emergentagent.com/api";

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Base URL every request path is appended to, without a trailing `/`
    pub base_url: String,
    /// Timeout applied to each HTTP call independently
    pub request_timeout: Duration,
    /// Delay between probes of a consistency check
    pub poll_interval: Duration,
    /// Deadline of a consistency check
    pub poll_timeout: Duration,
    pub log_format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    #[must_use]
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_poll_timeout_ms() -> u64 {
    5000
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: Duration::from_secs(default_request_timeout_secs()),
            poll_interval: Duration::from_millis(default_poll_interval_ms()),
            poll_timeout: Duration::from_millis(default_poll_timeout_ms()),
            log_format: LogFormat::default(),
        }
    }
}

impl HarnessConfig {
    /// Default configuration pointed at another deployment
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that does not parse
    /// or the resulting configuration is inconsistent
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            base_url: normalize_base_url(
                lookup("LOWKEY_BASE_URL").unwrap_or_else(default_base_url),
            ),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "LOWKEY_REQUEST_TIMEOUT_SECS",
                default_request_timeout_secs,
            )?),
            poll_interval: Duration::from_millis(parse_or(
                &lookup,
                "LOWKEY_POLL_INTERVAL_MS",
                default_poll_interval_ms,
            )?),
            poll_timeout: Duration::from_millis(parse_or(
                &lookup,
                "LOWKEY_POLL_TIMEOUT_MS",
                default_poll_timeout_ms,
            )?),
            log_format: match lookup("LOWKEY_LOG_FORMAT") {
                Some(raw) => raw
                    .parse()
                    .map_err(|()| ConfigError::InvalidValue("LOWKEY_LOG_FORMAT", raw))?,
                None => LogFormat::default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every run fail for reasons unrelated
    /// to the API under test
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(
                "LOWKEY_BASE_URL",
                self.base_url.clone(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "LOWKEY_REQUEST_TIMEOUT_SECS",
                "0".to_string(),
            ));
        }
        if self.poll_interval.is_zero() || self.poll_interval > self.poll_timeout {
            return Err(ConfigError::InvalidValue(
                "LOWKEY_POLL_INTERVAL_MS",
                format!(
                    "{}ms (poll timeout is {}ms)",
                    self.poll_interval.as_millis(),
                    self.poll_timeout.as_millis()
                ),
            ));
        }
        Ok(())
    }

    /// Full URL for an API path such as `/users/123`
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn normalize_base_url(raw: String) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn parse_or<F>(lookup: &F, key: &'static str, default: fn() -> u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
