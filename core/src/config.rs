//! Client configuration.
//!
//! The base URL is injected at construction time. Embedding applications can
//! nest `ClientConfig` in their own serde config or read it from the
//! environment with `ClientConfig::from_env`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// Environment variable holding the API origin.
pub const BASE_URL_ENV: &str = "STRAPI_URL";

/// Environment variable holding the request timeout in whole seconds.
pub const TIMEOUT_ENV: &str = "STRAPI_TIMEOUT_SECS";

/// Origin used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:1337";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Origin prefixed to every resource path, e.g. `http://host:1337`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. `None` leaves the transport default in place.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: None,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Read `STRAPI_URL` / `STRAPI_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env` with an arbitrary variable source. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut config = Self::default();
        if let Some(base_url) = read(BASE_URL_ENV) {
            config.base_url = base_url.trim().to_string();
        }
        if let Some(raw) = read(TIMEOUT_ENV) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                ApiError::config(format!("{TIMEOUT_ENV}={raw:?} is not a number of seconds: {e}"))
            })?;
            config.timeout_secs = Some(secs);
        }

        tracing::debug!(base_url = %config.base_url, timeout_secs = ?config.timeout_secs, "loaded client config");
        Ok(config)
    }
}
