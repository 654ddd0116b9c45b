// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./rubrica.toml` > `~/.config/rubrica/rubrica.toml` >
//! `/etc/rubrica/rubrica.toml`, with `RUBRICA_` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::RubricaConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/rubrica/rubrica.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "rubrica.toml";

/// Sections that `RUBRICA_<SECTION>_<KEY>` variables may address.
const ENV_SECTIONS: &[&str] = &["client", "backend", "monitor", "storage"];

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rubrica").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/rubrica/rubrica.toml`
/// 3. `~/.config/rubrica/rubrica.toml`
/// 4. `./rubrica.toml`
/// 5. `RUBRICA_*` environment variables
pub fn load_config() -> Result<RubricaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<RubricaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RubricaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RubricaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RubricaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for the standard hierarchy, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RubricaConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// Key names contain underscores, so a plain `split("_")` would turn
/// `RUBRICA_BACKEND_STATUS_TIMEOUT_SECS` into `backend.status.timeout.secs`.
fn env_provider() -> Env {
    Env::prefixed("RUBRICA_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a lowercased, prefix-stripped env var name to a dotted config key.
///
/// `backend_status_timeout_secs` becomes `backend.status_timeout_secs`.
/// Names that do not start with a known section are returned unchanged.
pub fn map_env_key(key: &str) -> String {
    ENV_SECTIONS
        .iter()
        .find_map(|section| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|rest| format!("{section}.{rest}"))
        })
        .unwrap_or_else(|| key.to_string())
}
