// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client lifecycle: wires settings, monitor, directory, and dispatcher.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use rubrica_config::RubricaConfig;
use rubrica_core::{
    CallBackend, CallOutcome, DirectoryBackend, RubricaError, SettingsStore, StatusBackend,
};

use crate::directory::DirectoryCache;
use crate::dispatcher::CallDispatcher;
use crate::http::PbxHttpClient;
use crate::monitor::ConnectivityMonitor;
use crate::settings::{ClientSettings, JsonFileStore};

/// The assembled client.
///
/// Settings are loaded at construction, before anything else runs.
/// [`start`](Self::start) launches the monitor and fetches the directory
/// once; [`shutdown`](Self::shutdown) stops the monitor.
pub struct RubricaClient {
    settings: ClientSettings,
    monitor: ConnectivityMonitor,
    directory: DirectoryCache,
    dispatcher: CallDispatcher,
}

impl RubricaClient {
    /// Builds a client talking HTTP to the configured backend and saving
    /// settings to the configured JSON file.
    pub fn from_config(config: &RubricaConfig) -> Result<Self, RubricaError> {
        let backend = Arc::new(PbxHttpClient::from_config(&config.backend)?);
        let store = Arc::new(JsonFileStore::new(&config.storage.settings_path));
        debug!(
            backend = backend.base_url(),
            settings = %store.path().display(),
            "building client"
        );
        Ok(Self::with_parts(backend, store, config.monitor.poll_interval()))
    }

    /// Builds a client over any backend and settings store.
    pub fn with_parts<B>(
        backend: Arc<B>,
        store: Arc<dyn SettingsStore>,
        poll_interval: Duration,
    ) -> Self
    where
        B: StatusBackend + DirectoryBackend + CallBackend,
    {
        let settings = ClientSettings::load(store);
        let status: Arc<dyn StatusBackend> = backend.clone();
        let directory: Arc<dyn DirectoryBackend> = backend.clone();
        let calls: Arc<dyn CallBackend> = backend;

        Self {
            settings,
            monitor: ConnectivityMonitor::new(status, poll_interval),
            directory: DirectoryCache::new(directory),
            dispatcher: CallDispatcher::new(calls),
        }
    }

    /// Starts polling and loads the directory. Never fails: a directory
    /// error leaves the cache empty and is only logged.
    pub async fn start(&self) {
        self.monitor.start();
        let _ = self.directory.refresh().await;
        info!(contacts = self.directory.len(), "client started");
    }

    /// Calls `number` from the saved origin extension.
    pub async fn call(&self, number: &str, display_name: Option<&str>) -> CallOutcome {
        let extension = self.settings.extension();
        self.dispatcher.dispatch(number, display_name, &extension).await
    }

    pub async fn shutdown(&self) {
        self.monitor.stop().await;
        info!("client stopped");
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn monitor(&self) -> &ConnectivityMonitor {
        &self.monitor
    }

    pub fn directory(&self) -> &DirectoryCache {
        &self.directory
    }

    pub fn dispatcher(&self) -> &CallDispatcher {
        &self.dispatcher
    }
}
