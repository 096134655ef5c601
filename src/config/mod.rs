//! Typed configuration from environment variables.
//!
//! Loads once at startup, fails fast if required vars are missing.
//! Sensitive values wrapped in secrecy::SecretString to prevent log leaks.

pub mod secrets;

use crate::error::{Error, Result};
use secrecy::SecretString;
use std::str::FromStr;
use std::time::Duration;

/// Default model used for dispatch advisories.
pub const DEFAULT_ADVISORY_MODEL: &str = "claude-sonnet-4-20250514";

#[derive(Debug)]
pub struct Config {
    pub database_url: SecretString,
    /// Absent key means the planner goes straight to the fallback heuristic.
    pub anthropic_api_key: Option<SecretString>,
    pub advisory: AdvisoryConfig,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

/// Request budget for the dispatch advisory call.
#[derive(Debug, Clone)]
pub struct AdvisoryConfig {
    pub model: String,
    pub max_tokens: u64,
    pub timeout: Duration,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_ADVISORY_MODEL.to_string(),
            max_tokens: 2000,
            timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    /// In production, systemd EnvironmentFile provides the vars.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: SecretString::from(required_var("DATABASE_URL")?),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|key| !key.is_empty())
                .map(SecretString::from),
            advisory: AdvisoryConfig::from_env()?,
            otel_endpoint: std::env::var("OTEL_ENDPOINT").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl AdvisoryConfig {
    /// Read the `ADVISORY_*` variables, defaulting any that are unset.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            model: std::env::var("ADVISORY_MODEL").unwrap_or(defaults.model),
            max_tokens: parsed_var("ADVISORY_MAX_TOKENS")?.unwrap_or(defaults.max_tokens),
            timeout: parsed_var::<u64>("ADVISORY_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| Error::Config(format!("required environment variable {name} is not set")))
}

fn parsed_var<T: FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{name} has an invalid value: {raw}"))),
        Err(_) => Ok(None),
    }
}
