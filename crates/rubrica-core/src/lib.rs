// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Rubrica directory-and-dialing client.
//!
//! This crate provides the error type, the domain types, and the backend and
//! settings-store traits used throughout the Rubrica workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RubricaError;
pub use types::{
    CallOutcome, CallReply, CallReplyBody, CallRequest, ConnectivityState, Contact,
    DialableNumber, DispatchState, NumberKind, StatusReply,
};

pub use traits::{CallBackend, DirectoryBackend, SettingsStore, StatusBackend};
