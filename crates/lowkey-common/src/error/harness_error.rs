//! Harness error types
//!
//! Every way a case can fail. None of them abort a run: the orchestrator
//! records the error against the case and moves on.

use std::fmt;

use crate::config::ConfigError;

/// Harness-wide error type
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    // Request could not be completed (connect, DNS, timeout)
    #[error("Request failed: {0}")]
    Transport(String),

    // Response arrived with the wrong status code
    #[error("Expected status {expected}, got {actual}. Body: {body}")]
    UnexpectedStatus {
        expected: u16,
        actual: u16,
        body: String,
    },

    // Body missing a field or not shaped as expected
    #[error("Invalid response: {0}")]
    Schema(String),

    // Well-formed body carrying the wrong value
    #[error("Assertion failed: {0}")]
    Assertion(String),

    // A fixture the case depends on could not be obtained
    #[error("Missing fixture: {0}")]
    MissingFixture(String),

    // Consistency check deadline exceeded
    #[error("Timed out after {waited_ms}ms waiting for {what}")]
    Timeout { what: String, waited_ms: u128 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl HarnessError {
    /// Stable tag used as a structured log field
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::UnexpectedStatus { .. } => "unexpected_status",
            Self::Schema(_) => "schema",
            Self::Assertion(_) => "assertion",
            Self::MissingFixture(_) => "missing_fixture",
            Self::Timeout { .. } => "timeout",
            Self::Config(_) => "config",
        }
    }

    /// Check if the failure happened before a usable response was received
    #[must_use]
    pub fn is_request_failure(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::UnexpectedStatus { .. })
    }

    /// Create a schema error
    #[must_use]
    pub fn schema(msg: impl fmt::Display) -> Self {
        Self::Schema(msg.to_string())
    }

    /// Create an assertion error
    #[must_use]
    pub fn assertion(msg: impl fmt::Display) -> Self {
        Self::Assertion(msg.to_string())
    }

    /// Create a missing fixture error
    #[must_use]
    pub fn missing_fixture(what: impl fmt::Display) -> Self {
        Self::MissingFixture(what.to_string())
    }
}

/// Result type alias for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;
