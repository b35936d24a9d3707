// Client configuration sourced from environment variables with an optional
// YAML override file (CAIRN_CLIENT_CONFIG).
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::time::Duration;

pub(crate) const DEFAULT_API_BASE: &str = "http://127.0.0.1:8080";
pub(crate) const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub(crate) const DEFAULT_PERMISSION_TTL_SECS: u64 = 60;
pub(crate) const DEFAULT_PERMISSION_REFRESH_SECS: u64 = 120;
pub(crate) const DEFAULT_PERMISSION_RETRIES: u32 = 2;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Cairn REST API, without a trailing slash.
    pub api_base: String,
    pub request_timeout: Duration,
    /// Freshness window for the cached permission set.
    pub permission_ttl: Duration,
    /// Interval for the background permission refresh loop.
    pub permission_refresh_interval: Duration,
    /// Automatic retries per refresh on transient failures.
    pub permission_retry_limit: u32,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
struct ClientConfigOverride {
    api_base: Option<String>,
    request_timeout_secs: Option<u64>,
    permission_ttl_secs: Option<u64>,
    permission_refresh_secs: Option<u64>,
    permission_retries: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            permission_ttl: Duration::from_secs(DEFAULT_PERMISSION_TTL_SECS),
            permission_refresh_interval: Duration::from_secs(DEFAULT_PERMISSION_REFRESH_SECS),
            permission_retry_limit: DEFAULT_PERMISSION_RETRIES,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var("CAIRN_API_BASE") {
            config.api_base = value.trim_end_matches('/').to_string();
        }
        if let Some(value) = read_u64_env("CAIRN_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(value);
        }
        if let Some(value) = read_u64_env("CAIRN_PERMISSION_TTL_SECS") {
            config.permission_ttl = Duration::from_secs(value);
        }
        if let Some(value) = read_u64_env("CAIRN_PERMISSION_REFRESH_SECS") {
            config.permission_refresh_interval = Duration::from_secs(value);
        }
        if let Some(value) = read_u32_env("CAIRN_PERMISSION_RETRIES") {
            config.permission_retry_limit = value;
        }
        Ok(config)
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("CAIRN_CLIENT_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read CAIRN_CLIENT_CONFIG: {path}"))?;
            let override_cfg: ClientConfigOverride =
                serde_yaml::from_str(&contents).context("parse client config yaml")?;
            override_cfg.apply(&mut config);
        }
        Ok(config)
    }

    /// Override the API base, trimming any trailing slash.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into();
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }
}

impl ClientConfigOverride {
    fn apply(&self, config: &mut ClientConfig) {
        if let Some(value) = &self.api_base {
            config.api_base = value.trim_end_matches('/').to_string();
        }
        if let Some(value) = self.request_timeout_secs {
            if value > 0 {
                config.request_timeout = Duration::from_secs(value);
            }
        }
        if let Some(value) = self.permission_ttl_secs {
            if value > 0 {
                config.permission_ttl = Duration::from_secs(value);
            }
        }
        if let Some(value) = self.permission_refresh_secs {
            if value > 0 {
                config.permission_refresh_interval = Duration::from_secs(value);
            }
        }
        if let Some(value) = self.permission_retries {
            config.permission_retry_limit = value;
        }
    }
}

fn read_u64_env(key: &str) -> Option<u64> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
}

fn read_u32_env(key: &str) -> Option<u32> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
}
