use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::models::attachment::PERMANENT_KEY_PREFIX;

pub const API_URL_VAR: &str = "LIVELAUNCH_API_URL";
pub const STORAGE_URL_VAR: &str = "LIVELAUNCH_STORAGE_URL";
pub const API_TOKEN_VAR: &str = "LIVELAUNCH_API_TOKEN";
pub const REQUEST_TIMEOUT_VAR: &str = "LIVELAUNCH_REQUEST_TIMEOUT_MS";
pub const KEY_PREFIX_VAR: &str = "LIVELAUNCH_PERMANENT_KEY_PREFIX";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(rename = "apiUrl")]
    pub api_url: String,
    #[serde(rename = "storageUrl")]
    pub storage_url: Option<String>,
    /// Initial bearer token. Skipped when serialized.
    #[serde(skip)]
    pub token: Option<String>,
    #[serde(rename = "requestTimeoutMs")]
    pub request_timeout_ms: Option<u64>,
    #[serde(rename = "permanentKeyPrefix")]
    pub permanent_key_prefix: String,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            storage_url: None,
            token: None,
            request_timeout_ms: None,
            permanent_key_prefix: PERMANENT_KEY_PREFIX.to_string(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable lookup and validates it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_url = non_empty(API_URL_VAR).ok_or(ConfigError::Missing(API_URL_VAR))?;

        let request_timeout_ms = match non_empty(REQUEST_TIMEOUT_VAR) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue {
                    field: REQUEST_TIMEOUT_VAR,
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        let config = Self {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            storage_url: non_empty(STORAGE_URL_VAR)
                .map(|url| url.trim().trim_end_matches('/').to_string()),
            token: non_empty(API_TOKEN_VAR),
            request_timeout_ms,
            permanent_key_prefix: non_empty(KEY_PREFIX_VAR)
                .unwrap_or_else(|| PERMANENT_KEY_PREFIX.to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_url",
                reason: "must not be empty".to_string(),
            });
        }
        if !is_http_url(&self.api_url) {
            return Err(ConfigError::InvalidValue {
                field: "api_url",
                reason: "must start with http:// or https://".to_string(),
            });
        }
        if let Some(storage_url) = &self.storage_url {
            if !is_http_url(storage_url) {
                return Err(ConfigError::InvalidValue {
                    field: "storage_url",
                    reason: "must start with http:// or https://".to_string(),
                });
            }
        }
        if self.request_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.permanent_key_prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "permanent_key_prefix",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
