// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP adapter for the directory/PBX backend.
//!
//! Provides [`PbxHttpClient`], which implements the status, directory, and
//! call traits over the backend's JSON API with an explicit timeout per
//! request kind.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use rubrica_config::model::BackendConfig;
use rubrica_core::types::{CallReply, CallReplyBody, CallRequest};
use rubrica_core::{CallBackend, Contact, DirectoryBackend, RubricaError, StatusBackend, StatusReply};

const STATUS_PATH: &str = "/api/status";
const CONTACTS_PATH: &str = "/api/contacts";
const CALL_PATH: &str = "/api/call";

/// HTTP client for the backend's `/api` endpoints.
///
/// The base URL is resolved once at construction and never changes.
#[derive(Debug, Clone)]
pub struct PbxHttpClient {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
    status_timeout: Duration,
}

impl PbxHttpClient {
    /// Creates a client for `base_url`.
    ///
    /// `status_timeout` bounds each status probe; `request_timeout` bounds
    /// directory fetches and call initiation.
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        status_timeout: Duration,
    ) -> Result<Self, RubricaError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url)
            .map_err(|e| RubricaError::Config(format!("invalid backend URL `{base_url}`: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RubricaError::Config(format!(
                "backend URL `{base_url}` must use http or https"
            )));
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| RubricaError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url,
            request_timeout,
            status_timeout,
        })
    }

    /// Creates a client from the `[backend]` configuration section.
    pub fn from_config(config: &BackendConfig) -> Result<Self, RubricaError> {
        Self::new(
            &config.base_url(),
            config.request_timeout(),
            config.status_timeout(),
        )
    }

    /// Returns the resolved base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` and decode a 2xx JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<T, RubricaError> {
        let response = self
            .client
            .get(self.url(path))
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(path, e))?;

        let status = response.status();
        debug!(endpoint = path, status = %status, "backend response received");
        if !status.is_success() {
            return Err(RubricaError::HttpStatus {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| transport_error(path, e))?;
        serde_json::from_str(&body).map_err(|e| RubricaError::Decode {
            message: format!("{path} returned an unexpected body: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

fn transport_error(endpoint: &str, e: reqwest::Error) -> RubricaError {
    let message = if e.is_timeout() {
        format!("{endpoint} timed out")
    } else {
        format!("{endpoint} request failed: {e}")
    };
    RubricaError::Transport {
        message,
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl StatusBackend for PbxHttpClient {
    async fn probe_status(&self) -> Result<StatusReply, RubricaError> {
        self.get_json(STATUS_PATH, self.status_timeout).await
    }
}

#[async_trait]
impl DirectoryBackend for PbxHttpClient {
    async fn fetch_contacts(&self) -> Result<Vec<Contact>, RubricaError> {
        let records: Vec<serde_json::Value> =
            self.get_json(CONTACTS_PATH, self.request_timeout).await?;
        let total = records.len();

        let contacts: Vec<Contact> = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value(record) {
                Ok(contact) => Some(contact),
                Err(e) => {
                    warn!(error = %e, "ignoring undecodable contact record");
                    None
                }
            })
            .collect();
        debug!(total, decoded = contacts.len(), "directory fetched");

        Ok(contacts)
    }
}

#[async_trait]
impl CallBackend for PbxHttpClient {
    async fn originate(&self, request: &CallRequest) -> Result<CallReply, RubricaError> {
        let response = self
            .client
            .post(self.url(CALL_PATH))
            .timeout(self.request_timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(CALL_PATH, e))?;

        let http_status = response.status().as_u16();
        // The status line arrived, so this is a reply even if the body is unusable.
        let body = match response.text().await {
            Ok(text) => serde_json::from_str::<CallReplyBody>(&text).ok(),
            Err(e) => {
                debug!(error = %e, "failed to read call reply body");
                None
            }
        };
        debug!(http_status, decoded = body.is_some(), "call reply received");

        Ok(CallReply { http_status, body })
    }
}
