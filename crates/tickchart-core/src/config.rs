//! Client configuration sourced from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `TICKCHART_ALPHAVANTAGE_API_KEY` | falls back to `ALPHA_VANTAGE_API_KEY` | provider credential |
//! | `TICKCHART_ALPHAVANTAGE_BASE_URL` | `https://www.alphavantage.co` | provider root |
//! | `TICKCHART_TIMEOUT_MS` | unset | per-request transport bound |

use std::fmt::{Debug, Formatter};

use crate::ValidationError;

pub const API_KEY_ENV: &str = "TICKCHART_ALPHAVANTAGE_API_KEY";
pub const LEGACY_API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";
pub const BASE_URL_ENV: &str = "TICKCHART_ALPHAVANTAGE_BASE_URL";
pub const TIMEOUT_ENV: &str = "TICKCHART_TIMEOUT_MS";
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

/// Opaque provider credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingApiKey);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Settings the command layer hands to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: ApiKey,
    pub timeout_ms: Option<u64>,
}

impl ClientConfig {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            api_key,
            timeout_ms: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .filter(|value| !value.trim().is_empty())
            .or_else(|| lookup(LEGACY_API_KEY_ENV))
            .ok_or(ValidationError::MissingApiKey)
            .and_then(ApiKey::new)?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|value| !value.trim().is_empty()) {
            config = config.with_base_url(base_url);
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            config = config.with_timeout_ms(Some(parse_timeout_ms(&raw)?));
        }
        Ok(config)
    }
}

pub fn parse_timeout_ms(raw: &str) -> Result<u64, ValidationError> {
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ValidationError::InvalidTimeout {
            value: raw.to_owned(),
        }),
    }
}
