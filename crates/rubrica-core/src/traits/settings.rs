// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable key-value storage for client settings.

use crate::error::RubricaError;

/// A synchronous string key-value store that survives restarts.
///
/// Writes are durable when `set` returns.
pub trait SettingsStore: Send + Sync + 'static {
    /// Reads a key; `Ok(None)` when it was never written.
    fn get(&self, key: &str) -> Result<Option<String>, RubricaError>;

    /// Writes a key.
    fn set(&self, key: &str, value: &str) -> Result<(), RubricaError>;
}
