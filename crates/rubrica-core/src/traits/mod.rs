// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seams between the client core and the outside world.
//!
//! Backend traits use `#[async_trait]` so the core can hold them as
//! `Arc<dyn ...>` and tests can substitute scripted mocks.

pub mod backend;
pub mod settings;

pub use backend::{CallBackend, DirectoryBackend, StatusBackend};
pub use settings::SettingsStore;
