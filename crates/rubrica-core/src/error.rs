// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Rubrica client.

use thiserror::Error;

/// The error type shared by every fallible Rubrica operation.
///
/// Call initiation does not surface these directly: the dispatcher folds them
/// into a [`CallOutcome`](crate::types::CallOutcome) value.
#[derive(Debug, Error)]
pub enum RubricaError {
    /// Configuration errors (bad base URL, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// No response was received from the backend (connect failure, timeout,
    /// connection reset before the status line).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend answered with a non-success HTTP status.
    #[error("{endpoint} returned HTTP {status}")]
    HttpStatus { endpoint: String, status: u16 },

    /// The backend answered but the body could not be decoded.
    #[error("decode error: {message}")]
    Decode {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Persistent settings could not be read or written.
    #[error("storage error: {message}")]
    Storage {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RubricaError {
    /// Returns true when the error means the backend was never reached.
    pub fn is_transport(&self) -> bool {
        matches!(self, RubricaError::Transport { .. })
    }
}
