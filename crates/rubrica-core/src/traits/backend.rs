// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend traits for the three endpoints the client consumes.

use async_trait::async_trait;

use crate::error::RubricaError;
use crate::types::{CallReply, CallRequest, Contact, StatusReply};

/// `GET /api/status`.
#[async_trait]
pub trait StatusBackend: Send + Sync + 'static {
    /// Probes backend health.
    ///
    /// Returns `Ok` only for a success response with a decodable body. A
    /// non-success status, a transport failure, or a malformed body is an
    /// error.
    async fn probe_status(&self) -> Result<StatusReply, RubricaError>;
}

/// `GET /api/contacts`.
#[async_trait]
pub trait DirectoryBackend: Send + Sync + 'static {
    /// Fetches the complete contact list.
    async fn fetch_contacts(&self) -> Result<Vec<Contact>, RubricaError>;
}

/// `POST /api/call`.
#[async_trait]
pub trait CallBackend: Send + Sync + 'static {
    /// Sends one call-initiation request.
    ///
    /// Any HTTP reply, successful or not, is `Ok`; the caller decides what it
    /// means. `Err` is reserved for requests that got no reply at all.
    async fn originate(&self, request: &CallRequest) -> Result<CallReply, RubricaError>;
}
