// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call-dispatch and PBX-status client for Rubrica.
//!
//! - [`ConnectivityMonitor`] polls the status endpoint on a fixed cadence.
//! - [`DirectoryCache`] holds the contact list fetched at startup.
//! - [`CallDispatcher`] places calls and tracks in-flight targets.
//! - [`ClientSettings`] keeps the origin extension and theme across sessions.
//! - [`RubricaClient`] wires them together over [`PbxHttpClient`].

pub mod client;
pub mod directory;
pub mod dispatcher;
pub mod http;
pub mod monitor;
pub mod settings;

pub use client::RubricaClient;
pub use directory::DirectoryCache;
pub use dispatcher::CallDispatcher;
pub use http::PbxHttpClient;
pub use monitor::ConnectivityMonitor;
pub use settings::{ClientSettings, JsonFileStore};
