// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock backend for deterministic testing.
//!
//! `MockBackend` implements the status, directory, and call traits with
//! pre-configured replies. Each endpoint has its own FIFO script; the last
//! entry of a script repeats once the others are consumed, so a single entry
//! scripts a steady state.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Semaphore};

use rubrica_core::types::{CALL_STATUS_SUCCESS, CallReply, CallReplyBody, CallRequest};
use rubrica_core::{CallBackend, Contact, DirectoryBackend, RubricaError, StatusBackend, StatusReply};

/// One scripted reply of a mock endpoint.
#[derive(Debug, Clone)]
pub enum Scripted<T> {
    /// The endpoint answers with this value.
    Reply(T),
    /// The endpoint answers with a non-success HTTP status.
    HttpError(u16),
    /// The backend cannot be reached.
    Unreachable,
}

impl<T> Scripted<T> {
    fn into_result(self, endpoint: &str) -> Result<T, RubricaError> {
        match self {
            Scripted::Reply(value) => Ok(value),
            Scripted::HttpError(status) => Err(RubricaError::HttpStatus {
                endpoint: endpoint.to_string(),
                status,
            }),
            Scripted::Unreachable => Err(RubricaError::Transport {
                message: format!("{endpoint}: connection refused (mock)"),
                source: None,
            }),
        }
    }
}

/// Pops the next scripted entry, keeping the last one in place.
async fn next_entry<T: Clone>(script: &Mutex<VecDeque<Scripted<T>>>) -> Option<Scripted<T>> {
    let mut script = script.lock().await;
    if script.len() > 1 {
        script.pop_front()
    } else {
        script.front().cloned()
    }
}

/// A backend that replays scripted replies and records what it was asked.
///
/// Unscripted endpoints answer with a healthy default: `connected` status,
/// an empty directory, and a successful call.
#[derive(Default)]
pub struct MockBackend {
    status: Mutex<VecDeque<Scripted<StatusReply>>>,
    contacts: Mutex<VecDeque<Scripted<Vec<Contact>>>>,
    calls: Mutex<VecDeque<Scripted<CallReply>>>,
    call_requests: Mutex<Vec<CallRequest>>,
    status_probes: AtomicUsize,
    contact_fetches: AtomicUsize,
    call_gate: Option<Arc<Semaphore>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the status endpoint.
    pub fn with_status(mut self, script: Vec<Scripted<StatusReply>>) -> Self {
        self.status = Mutex::new(script.into());
        self
    }

    /// Script the directory endpoint.
    pub fn with_contacts(mut self, script: Vec<Scripted<Vec<Contact>>>) -> Self {
        self.contacts = Mutex::new(script.into());
        self
    }

    /// Script the call endpoint.
    pub fn with_calls(mut self, script: Vec<Scripted<CallReply>>) -> Self {
        self.calls = Mutex::new(script.into());
        self
    }

    /// Hold every call request until the gate hands out a permit.
    ///
    /// Lets a test observe the dispatcher while a request is outstanding.
    pub fn with_call_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.call_gate = Some(gate);
        self
    }

    /// Append to the status script at runtime.
    pub async fn push_status(&self, entry: Scripted<StatusReply>) {
        let mut script = self.status.lock().await;
        // A lone entry is a repeating steady state; a push replaces it.
        if script.len() == 1 {
            script.clear();
        }
        script.push_back(entry);
    }

    /// Append to the directory script at runtime.
    pub async fn push_contacts(&self, entry: Scripted<Vec<Contact>>) {
        let mut script = self.contacts.lock().await;
        if script.len() == 1 {
            script.clear();
        }
        script.push_back(entry);
    }

    pub fn status_probes(&self) -> usize {
        self.status_probes.load(Ordering::SeqCst)
    }

    pub fn contact_fetches(&self) -> usize {
        self.contact_fetches.load(Ordering::SeqCst)
    }

    /// Number of call requests received, including ones still held by the gate.
    pub async fn call_count(&self) -> usize {
        self.call_requests.lock().await.len()
    }

    /// Every call request received, in arrival order.
    pub async fn call_requests(&self) -> Vec<CallRequest> {
        self.call_requests.lock().await.clone()
    }

    /// A reply the call endpoint gives for a started call.
    pub fn call_started() -> CallReply {
        CallReply {
            http_status: 200,
            body: Some(CallReplyBody {
                status: Some(CALL_STATUS_SUCCESS.to_string()),
                ..Default::default()
            }),
        }
    }

    /// A reply the call endpoint gives when it refuses a call.
    pub fn call_refused(http_status: u16, message: &str) -> CallReply {
        CallReply {
            http_status,
            body: Some(CallReplyBody {
                status: Some("error".to_string()),
                message: Some(message.to_string()),
                detail: None,
            }),
        }
    }

    /// A status reply carrying the given label.
    pub fn status_label(label: &str) -> StatusReply {
        StatusReply {
            status: Some(label.to_string()),
        }
    }
}

#[async_trait]
impl StatusBackend for MockBackend {
    async fn probe_status(&self) -> Result<StatusReply, RubricaError> {
        self.status_probes.fetch_add(1, Ordering::SeqCst);
        next_entry(&self.status)
            .await
            .unwrap_or(Scripted::Reply(StatusReply::default()))
            .into_result("/api/status")
    }
}

#[async_trait]
impl DirectoryBackend for MockBackend {
    async fn fetch_contacts(&self) -> Result<Vec<Contact>, RubricaError> {
        self.contact_fetches.fetch_add(1, Ordering::SeqCst);
        next_entry(&self.contacts)
            .await
            .unwrap_or(Scripted::Reply(Vec::new()))
            .into_result("/api/contacts")
    }
}

#[async_trait]
impl CallBackend for MockBackend {
    async fn originate(&self, request: &CallRequest) -> Result<CallReply, RubricaError> {
        self.call_requests.lock().await.push(request.clone());

        if let Some(gate) = &self.call_gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| RubricaError::Internal(format!("call gate closed: {e}")))?;
        }

        let entry = next_entry(&self.calls)
            .await
            .unwrap_or_else(|| Scripted::Reply(Self::call_started()));
        match entry {
            // A refused call still produced an HTTP reply.
            Scripted::HttpError(status) => Ok(CallReply {
                http_status: status,
                body: None,
            }),
            other => other.into_result("/api/call"),
        }
    }
}
