//! Configuration structs

mod harness_config;

pub use harness_config::{ConfigError, HarnessConfig, LogFormat, DEFAULT_BASE_URL};
