// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory contact directory.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{info, warn};

use rubrica_core::{Contact, DirectoryBackend, RubricaError};

/// The last successfully fetched contact list.
///
/// A refresh replaces the whole list in one atomic swap; a failed refresh
/// leaves the previous list in place.
pub struct DirectoryCache {
    backend: Arc<dyn DirectoryBackend>,
    contacts: ArcSwap<Vec<Contact>>,
}

impl DirectoryCache {
    pub fn new(backend: Arc<dyn DirectoryBackend>) -> Self {
        Self {
            backend,
            contacts: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Fetches the directory once and swaps it in.
    ///
    /// Returns the number of contacts now cached. Failures are logged here;
    /// callers may ignore the error.
    pub async fn refresh(&self) -> Result<usize, RubricaError> {
        let fetched = match self.backend.fetch_contacts().await {
            Ok(contacts) => contacts,
            Err(e) => {
                warn!(error = %e, cached = self.contacts.load().len(), "directory fetch failed, keeping cached contacts");
                return Err(e);
            }
        };

        let total = fetched.len();
        let contacts: Vec<Contact> = fetched.into_iter().filter(Contact::is_addressable).collect();
        if contacts.len() < total {
            warn!(
                dropped = total - contacts.len(),
                "ignoring contacts without id or number"
            );
        }

        let count = contacts.len();
        self.contacts.store(Arc::new(contacts));
        info!(count, "directory refreshed");
        Ok(count)
    }

    /// A snapshot of the cached list.
    pub fn contacts(&self) -> Arc<Vec<Contact>> {
        self.contacts.load_full()
    }

    pub fn len(&self) -> usize {
        self.contacts.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.load().is_empty()
    }

    /// Contacts whose name contains `term` (any case) or whose number
    /// contains it. A blank term matches everything.
    pub fn search(&self, term: &str) -> Vec<Contact> {
        let term = term.trim();
        let snapshot = self.contacts.load();
        if term.is_empty() {
            return snapshot.as_ref().clone();
        }
        snapshot.iter().filter(|c| c.matches(term)).cloned().collect()
    }

    /// Looks a contact up by its key (id, else number).
    pub fn find(&self, key: &str) -> Option<Contact> {
        self.contacts
            .load()
            .iter()
            .find(|c| c.key() == Some(key))
            .cloned()
    }
}
