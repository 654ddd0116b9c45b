// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `SettingsStore` for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use rubrica_core::{RubricaError, SettingsStore};

/// A settings store kept in a map.
///
/// Counts successful writes so tests can assert when persistence happened,
/// and can be switched into a failing mode to exercise error paths.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with the given entries.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            entries: Mutex::new(entries),
            ..Self::default()
        }
    }

    /// Number of successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw stored value, bypassing the failure switches.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn poisoned() -> RubricaError {
        RubricaError::Storage {
            message: "memory store lock poisoned".to_string(),
            source: None,
        }
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, RubricaError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RubricaError::Storage {
                message: format!("read of `{key}` failed (mock)"),
                source: None,
            });
        }
        let entries = self.entries.lock().map_err(|_| Self::poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), RubricaError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RubricaError::Storage {
                message: format!("write of `{key}` failed (mock)"),
                source: None,
            });
        }
        let mut entries = self.entries.lock().map_err(|_| Self::poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let store = MemoryStore::new();
        store.set("userExtension", "233").unwrap();
        assert_eq!(store.get("userExtension").unwrap().as_deref(), Some("233"));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn failing_modes_return_storage_errors() {
        let store = MemoryStore::with_entries([("darkMode", "true")]);
        store.fail_reads(true);
        store.fail_writes(true);
        assert!(store.get("darkMode").is_err());
        assert!(store.set("darkMode", "false").is_err());
        assert_eq!(store.raw("darkMode").as_deref(), Some("true"));
        assert_eq!(store.writes(), 0);
    }
}
