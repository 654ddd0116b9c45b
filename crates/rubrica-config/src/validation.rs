// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the semantic constraints serde cannot express: URL schemes,
//! non-zero ports and intervals, and the probe timeout fitting inside the
//! poll interval.

use crate::diagnostic::ConfigError;
use crate::model::RubricaConfig;

/// Log levels accepted by `client.log_level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &RubricaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if let Some(url) = config.backend.url.as_deref().map(str::trim)
        && !url.is_empty()
        && !(url.starts_with("http://") || url.starts_with("https://"))
    {
        fail(format!(
            "backend.url `{url}` must start with http:// or https://"
        ));
    }

    let host = config.backend.host.trim();
    if host.is_empty() {
        fail("backend.host must not be empty".to_string());
    } else if !host
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | ':' | '[' | ']'))
    {
        fail(format!("backend.host `{host}` is not a valid hostname or IP address"));
    }

    if config.backend.port == 0 {
        fail("backend.port must not be 0".to_string());
    }

    if config.backend.request_timeout_secs == 0 {
        fail("backend.request_timeout_secs must be at least 1".to_string());
    }

    if config.backend.status_timeout_secs == 0 {
        fail("backend.status_timeout_secs must be at least 1".to_string());
    }

    if config.monitor.poll_interval_secs == 0 {
        fail("monitor.poll_interval_secs must be at least 1".to_string());
    }

    if config.backend.status_timeout_secs > config.monitor.poll_interval_secs {
        fail(format!(
            "backend.status_timeout_secs ({}) must not exceed monitor.poll_interval_secs ({})",
            config.backend.status_timeout_secs, config.monitor.poll_interval_secs
        ));
    }

    if config.storage.settings_path.trim().is_empty() {
        fail("storage.settings_path must not be empty".to_string());
    }

    let level = config.client.log_level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "client.log_level `{}` must be one of: {}",
            config.client.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
