// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent client settings: the origin extension and the theme.
//!
//! [`ClientSettings`] is loaded once at startup and never fails to load; a
//! missing or unreadable store yields the defaults. [`JsonFileStore`] is the
//! durable [`SettingsStore`] used outside tests.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{debug, warn};

use rubrica_core::{RubricaError, SettingsStore};

/// Store key of the origin extension.
pub const EXTENSION_KEY: &str = "userExtension";

/// Store key of the theme preference, saved as `"true"` or `"false"`.
pub const DARK_MODE_KEY: &str = "darkMode";

/// The user's origin extension and theme, backed by a [`SettingsStore`].
pub struct ClientSettings {
    store: Arc<dyn SettingsStore>,
    extension: ArcSwap<String>,
    dark_mode: watch::Sender<bool>,
}

impl ClientSettings {
    /// Reads both settings from `store`, falling back to an empty extension
    /// and the light theme.
    pub fn load(store: Arc<dyn SettingsStore>) -> Self {
        let extension = read_or_default(store.as_ref(), EXTENSION_KEY).unwrap_or_default();
        let dark_mode = read_or_default(store.as_ref(), DARK_MODE_KEY)
            .is_some_and(|value| value == "true");
        debug!(extension = %extension, dark_mode, "client settings loaded");

        let (dark_mode, _) = watch::channel(dark_mode);
        Self {
            store,
            extension: ArcSwap::from_pointee(extension),
            dark_mode,
        }
    }

    /// The current origin extension, possibly empty.
    pub fn extension(&self) -> String {
        self.extension.load().as_ref().clone()
    }

    /// Replaces the origin extension.
    ///
    /// The in-memory value always changes. The store is written only for a
    /// non-empty value, so clearing the field never erases the saved one.
    pub fn set_extension(&self, value: &str) -> Result<(), RubricaError> {
        self.extension.store(Arc::new(value.to_string()));
        if value.is_empty() {
            debug!("empty extension kept in memory only");
            return Ok(());
        }
        self.persist(EXTENSION_KEY, value)
    }

    pub fn is_dark(&self) -> bool {
        *self.dark_mode.borrow()
    }

    /// Replaces the theme preference and always persists it.
    pub fn set_theme(&self, dark: bool) -> Result<(), RubricaError> {
        self.dark_mode.send_replace(dark);
        self.persist(DARK_MODE_KEY, if dark { "true" } else { "false" })
    }

    /// Observes theme changes.
    pub fn subscribe_theme(&self) -> watch::Receiver<bool> {
        self.dark_mode.subscribe()
    }

    fn persist(&self, key: &str, value: &str) -> Result<(), RubricaError> {
        self.store.set(key, value).inspect_err(|e| {
            warn!(key, error = %e, "failed to persist client setting");
        })
    }
}

fn read_or_default(store: &dyn SettingsStore, key: &str) -> Option<String> {
    store.get(key).unwrap_or_else(|e| {
        warn!(key, error = %e, "client setting unreadable, using default");
        None
    })
}

/// A [`SettingsStore`] kept as one JSON object in a file.
///
/// Every write rewrites the whole file through a temporary file in the same
/// directory followed by a rename, so readers never see a partial file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, RubricaError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(storage_error(&self.path, "read", e)),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&content).map_err(|e| RubricaError::Storage {
            message: format!("{} is not a JSON object: {e}", self.path.display()),
            source: Some(Box::new(e)),
        })
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), RubricaError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| storage_error(dir, "create", e))?;

        let content = serde_json::to_vec_pretty(map).map_err(|e| RubricaError::Internal(
            format!("failed to encode client settings: {e}"),
        ))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| storage_error(dir, "create a temporary file in", e))?;
        tmp.write_all(&content)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| storage_error(tmp.path(), "write", e))?;
        tmp.persist(&self.path)
            .map_err(|e| storage_error(&self.path, "replace", e.error))?;
        Ok(())
    }
}

fn storage_error(path: &Path, action: &str, e: std::io::Error) -> RubricaError {
    RubricaError::Storage {
        message: format!("failed to {action} {}: {e}", path.display()),
        source: Some(Box::new(e)),
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, RubricaError> {
        let map = self.read_map()?;
        Ok(map.get(key).and_then(|value| match value {
            Value::String(text) => Some(text.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), RubricaError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = self.read_map().unwrap_or_else(|e| {
            warn!(error = %e, "discarding unreadable settings file");
            Map::new()
        });
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.write_map(&map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubrica_test_utils::MemoryStore;

    fn settings_on(store: &Arc<MemoryStore>) -> ClientSettings {
        ClientSettings::load(store.clone())
    }

    #[test]
    fn defaults_when_store_is_empty() {
        let store = Arc::new(MemoryStore::new());
        let settings = settings_on(&store);
        assert_eq!(settings.extension(), "");
        assert!(!settings.is_dark());
    }

    #[test]
    fn loads_saved_values() {
        let store = Arc::new(MemoryStore::with_entries([
            (EXTENSION_KEY, "233"),
            (DARK_MODE_KEY, "true"),
        ]));
        let settings = settings_on(&store);
        assert_eq!(settings.extension(), "233");
        assert!(settings.is_dark());
    }

    #[test]
    fn unreadable_store_yields_defaults() {
        let store = Arc::new(MemoryStore::with_entries([(EXTENSION_KEY, "233")]));
        store.fail_reads(true);
        let settings = settings_on(&store);
        assert_eq!(settings.extension(), "");
        assert!(!settings.is_dark());
    }

    #[test]
    fn non_boolean_dark_mode_reads_as_light() {
        let store = Arc::new(MemoryStore::with_entries([(DARK_MODE_KEY, "yes")]));
        assert!(!settings_on(&store).is_dark());
    }

    #[test]
    fn empty_extension_is_not_persisted() {
        let store = Arc::new(MemoryStore::with_entries([(EXTENSION_KEY, "233")]));
        let settings = settings_on(&store);

        settings.set_extension("").unwrap();
        assert_eq!(settings.extension(), "");
        assert_eq!(store.raw(EXTENSION_KEY).as_deref(), Some("233"));
        assert_eq!(store.writes(), 0);

        settings.set_extension("241").unwrap();
        assert_eq!(store.raw(EXTENSION_KEY).as_deref(), Some("241"));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn theme_is_always_persisted() {
        let store = Arc::new(MemoryStore::new());
        let settings = settings_on(&store);

        settings.set_theme(true).unwrap();
        settings.set_theme(false).unwrap();
        assert_eq!(store.raw(DARK_MODE_KEY).as_deref(), Some("false"));
        assert_eq!(store.writes(), 2);
        assert!(!settings.is_dark());
    }

    #[test]
    fn theme_subscribers_see_changes() {
        let store = Arc::new(MemoryStore::new());
        let settings = settings_on(&store);
        let mut rx = settings.subscribe_theme();

        settings.set_theme(true).unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());
    }

    #[test]
    fn failed_write_keeps_the_memory_value_and_reports() {
        let store = Arc::new(MemoryStore::new());
        store.fail_writes(true);
        let settings = settings_on(&store);

        assert!(settings.set_extension("233").is_err());
        assert_eq!(settings.extension(), "233");
    }

    #[test]
    fn json_store_round_trips_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("client-state.json");

        let first = ClientSettings::load(Arc::new(JsonFileStore::new(&path)));
        first.set_extension("233").unwrap();
        first.set_theme(true).unwrap();

        let second = ClientSettings::load(Arc::new(JsonFileStore::new(&path)));
        assert_eq!(second.extension(), "233");
        assert!(second.is_dark());

        let on_disk: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk["userExtension"], "233");
        assert_eq!(on_disk["darkMode"], "true");
    }

    #[test]
    fn json_store_missing_file_reads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.get(EXTENSION_KEY).unwrap(), None);
    }

    #[test]
    fn json_store_reports_corrupt_file_and_recovers_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client-state.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.get(EXTENSION_KEY),
            Err(RubricaError::Storage { .. })
        ));

        let settings = ClientSettings::load(Arc::new(JsonFileStore::new(&path)));
        assert_eq!(settings.extension(), "");
        settings.set_theme(false).unwrap();
        assert_eq!(store.get(DARK_MODE_KEY).unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn json_store_reads_non_string_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client-state.json");
        std::fs::write(&path, r#"{"userExtension": 233, "darkMode": true}"#).unwrap();

        let settings = ClientSettings::load(Arc::new(JsonFileStore::new(&path)));
        assert_eq!(settings.extension(), "233");
        assert!(settings.is_dark());
    }
}
