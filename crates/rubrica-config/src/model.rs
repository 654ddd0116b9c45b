// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Rubrica client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently ignored.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Rubrica configuration.
///
/// Every section is optional and defaults to a working local setup.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RubricaConfig {
    /// Client-wide settings.
    #[serde(default)]
    pub client: ClientConfig,

    /// Where the directory/PBX backend lives and how long to wait for it.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Connectivity monitor cadence.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Local persistence for client settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Client-wide configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Backend address and request timeouts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Full base URL (e.g. `http://pbx.local:8000`). When unset, the URL is
    /// composed from `host` and `port`.
    #[serde(default)]
    pub url: Option<String>,

    /// Host used when `url` is unset.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port used when `url` is unset.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Timeout for directory fetches and call initiation.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Timeout for a single status probe. Must not exceed the poll interval.
    #[serde(default = "default_status_timeout_secs")]
    pub status_timeout_secs: u64,
}

impl BackendConfig {
    /// Resolves the backend base URL, without a trailing slash.
    pub fn base_url(&self) -> String {
        match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("http://{}:{}", self.host.trim(), self.port),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_secs(self.status_timeout_secs)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
            status_timeout_secs: default_status_timeout_secs(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_status_timeout_secs() -> u64 {
    3
}

/// Connectivity monitor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// Seconds between status probes.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    5
}

/// Local persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// JSON file holding the saved extension and theme.
    #[serde(default = "default_settings_path")]
    pub settings_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
        }
    }
}

fn default_settings_path() -> String {
    dirs::config_dir()
        .map(|p| p.join("rubrica").join("client-state.json"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "client-state.json".to_string())
}
