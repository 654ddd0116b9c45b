// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Rubrica integration tests.
//!
//! Provides a scripted backend and an in-memory settings store for fast,
//! deterministic tests without a running PBX backend.
//!
//! # Components
//!
//! - [`MockBackend`] - Status, directory, and call backend with scripted replies
//! - [`MemoryStore`] - `SettingsStore` kept in a map, with write counting

pub mod memory_store;
pub mod mock_backend;

pub use memory_store::MemoryStore;
pub use mock_backend::{MockBackend, Scripted};
