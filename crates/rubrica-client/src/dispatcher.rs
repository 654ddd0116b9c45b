// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call dispatcher.
//!
//! Turns a (target number, origin extension) pair into exactly one call
//! request and folds the reply into a [`CallOutcome`]. Outstanding requests
//! are tracked per target number so a front end can disable re-submission.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info, warn};

use rubrica_core::types::{CallRequest, DispatchState, GENERIC_CALL_FAILURE};
use rubrica_core::{CallBackend, CallOutcome};

/// Issues call requests and tracks which target numbers are in flight.
///
/// Cheap to clone; clones share the in-flight map.
#[derive(Clone)]
pub struct CallDispatcher {
    backend: Arc<dyn CallBackend>,
    in_flight: Arc<DashMap<String, usize>>,
}

impl CallDispatcher {
    pub fn new(backend: Arc<dyn CallBackend>) -> Self {
        Self {
            backend,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Places a call from `extension` to `number`.
    ///
    /// A blank extension returns [`CallOutcome::MissingOrigin`] without any
    /// request. Otherwise exactly one request is sent and never retried.
    /// `display_name` is used in the success notice; the number stands in
    /// when it is absent or blank.
    pub async fn dispatch(
        &self,
        number: &str,
        display_name: Option<&str>,
        extension: &str,
    ) -> CallOutcome {
        let extension = extension.trim();
        if extension.is_empty() {
            info!(number, "call refused: no origin extension");
            return CallOutcome::MissingOrigin;
        }

        let _marker = InFlight::mark(&self.in_flight, number);
        let request = CallRequest {
            number: number.to_string(),
            extension: extension.to_string(),
        };
        debug!(number, extension, "sending call request");

        match self.backend.originate(&request).await {
            Err(e) => {
                warn!(number, error = %e, "call request got no reply");
                CallOutcome::ConnectionError {
                    message: e.to_string(),
                }
            }
            Ok(reply) if reply.is_success() => {
                let display_name = display_name
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .unwrap_or(number)
                    .to_string();
                info!(number, extension, "call started");
                CallOutcome::CallStarted {
                    display_name,
                    extension: extension.to_string(),
                }
            }
            Ok(reply) => {
                let message = reply.failure_message().unwrap_or(GENERIC_CALL_FAILURE);
                info!(number, http_status = reply.http_status, reason = message, "call refused by backend");
                CallOutcome::CallFailed {
                    message: message.to_string(),
                }
            }
        }
    }

    pub fn state(&self, number: &str) -> DispatchState {
        if self.is_in_flight(number) {
            DispatchState::InFlight
        } else {
            DispatchState::Idle
        }
    }

    pub fn is_in_flight(&self, number: &str) -> bool {
        self.in_flight.contains_key(number)
    }

    /// Every target number with an outstanding request, sorted.
    pub fn in_flight(&self) -> Vec<String> {
        let mut numbers: Vec<String> = self.in_flight.iter().map(|e| e.key().clone()).collect();
        numbers.sort();
        numbers
    }
}

/// Holds one in-flight count for a number and releases it on drop.
///
/// Dropping covers every exit: each outcome, a panic in the backend, and the
/// dispatch future being dropped mid-request.
struct InFlight<'a> {
    map: &'a DashMap<String, usize>,
    number: String,
}

impl<'a> InFlight<'a> {
    fn mark(map: &'a DashMap<String, usize>, number: &str) -> Self {
        *map.entry(number.to_string()).or_insert(0) += 1;
        Self {
            map,
            number: number.to_string(),
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Entry::Occupied(mut entry) = self.map.entry(std::mem::take(&mut self.number)) {
            if *entry.get() > 1 {
                *entry.get_mut() -= 1;
            } else {
                entry.remove();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubrica_core::types::CallReply;
    use rubrica_test_utils::{MockBackend, Scripted};
    use tokio::sync::Semaphore;

    fn dispatcher_on(backend: &Arc<MockBackend>) -> CallDispatcher {
        CallDispatcher::new(backend.clone())
    }

    async fn wait_for_calls(backend: &MockBackend, n: usize) {
        while backend.call_count().await < n {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn blank_extension_sends_nothing() {
        let backend = Arc::new(MockBackend::new());
        let dispatcher = dispatcher_on(&backend);

        for extension in ["", "   ", "\t\n"] {
            let outcome = dispatcher.dispatch("0612345", Some("Mario"), extension).await;
            assert_eq!(outcome, CallOutcome::MissingOrigin);
        }
        assert_eq!(backend.call_count().await, 0);
        assert!(dispatcher.in_flight().is_empty());
    }

    #[tokio::test]
    async fn success_reports_name_and_trimmed_extension() {
        let backend = Arc::new(MockBackend::new());
        let dispatcher = dispatcher_on(&backend);

        let outcome = dispatcher.dispatch("0612345", Some("Mario"), " 233 ").await;
        assert_eq!(
            outcome,
            CallOutcome::CallStarted {
                display_name: "Mario".into(),
                extension: "233".into(),
            }
        );
        assert_eq!(outcome.to_string(), "call started from extension 233 to Mario");

        let sent = backend.call_requests().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].number, "0612345");
        assert_eq!(sent[0].extension, "233");
        assert_eq!(dispatcher.state("0612345"), DispatchState::Idle);
    }

    #[tokio::test]
    async fn missing_name_falls_back_to_number() {
        let backend = Arc::new(MockBackend::new());
        let dispatcher = dispatcher_on(&backend);

        for name in [None, Some(""), Some("  ")] {
            match dispatcher.dispatch("0612345", name, "233").await {
                CallOutcome::CallStarted { display_name, .. } => {
                    assert_eq!(display_name, "0612345")
                }
                other => panic!("unexpected outcome: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn backend_message_is_surfaced() {
        let backend = Arc::new(
            MockBackend::new().with_calls(vec![Scripted::Reply(MockBackend::call_refused(
                200,
                "busy line",
            ))]),
        );
        let dispatcher = dispatcher_on(&backend);

        let outcome = dispatcher.dispatch("0612345", Some("Mario"), "233").await;
        assert_eq!(
            outcome,
            CallOutcome::CallFailed {
                message: "busy line".into()
            }
        );
        assert!(!dispatcher.is_in_flight("0612345"));
    }

    #[tokio::test]
    async fn non_2xx_with_success_status_still_fails() {
        let backend = Arc::new(MockBackend::new().with_calls(vec![Scripted::Reply(CallReply {
            http_status: 500,
            ..MockBackend::call_started()
        })]));
        let dispatcher = dispatcher_on(&backend);

        let outcome = dispatcher.dispatch("100", None, "233").await;
        assert_eq!(
            outcome,
            CallOutcome::CallFailed {
                message: GENERIC_CALL_FAILURE.into()
            }
        );
    }

    #[tokio::test]
    async fn bodiless_rejection_uses_generic_message() {
        let backend = Arc::new(MockBackend::new().with_calls(vec![Scripted::HttpError(502)]));
        let dispatcher = dispatcher_on(&backend);

        let outcome = dispatcher.dispatch("100", None, "233").await;
        assert_eq!(outcome.to_string(), format!("call failed: {GENERIC_CALL_FAILURE}"));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_connection_error() {
        let backend = Arc::new(MockBackend::new().with_calls(vec![Scripted::Unreachable]));
        let dispatcher = dispatcher_on(&backend);

        let outcome = dispatcher.dispatch("0612345", Some("Mario"), "233").await;
        assert!(matches!(outcome, CallOutcome::ConnectionError { .. }));
        assert_eq!(backend.call_count().await, 1, "no retry");
        assert!(dispatcher.in_flight().is_empty());
    }

    #[tokio::test]
    async fn number_is_in_flight_while_the_request_is_outstanding() {
        let gate = Arc::new(Semaphore::new(0));
        let backend = Arc::new(MockBackend::new().with_call_gate(gate.clone()));
        let dispatcher = dispatcher_on(&backend);

        let task = {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move { dispatcher.dispatch("0612345", Some("Mario"), "233").await })
        };

        wait_for_calls(&backend, 1).await;
        assert_eq!(dispatcher.state("0612345"), DispatchState::InFlight);
        assert_eq!(dispatcher.state("100"), DispatchState::Idle);

        gate.add_permits(1);
        assert!(task.await.unwrap().is_started());
        assert_eq!(dispatcher.state("0612345"), DispatchState::Idle);
    }

    #[tokio::test]
    async fn different_numbers_fly_together() {
        let gate = Arc::new(Semaphore::new(0));
        let backend = Arc::new(MockBackend::new().with_call_gate(gate.clone()));
        let dispatcher = dispatcher_on(&backend);

        let tasks: Vec<_> = ["200", "100"]
            .into_iter()
            .map(|number| {
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move { dispatcher.dispatch(number, None, "233").await })
            })
            .collect();

        wait_for_calls(&backend, 2).await;
        assert_eq!(dispatcher.in_flight(), ["100", "200"]);

        gate.add_permits(2);
        for task in tasks {
            assert!(task.await.unwrap().is_started());
        }
        assert!(dispatcher.in_flight().is_empty());
    }

    #[tokio::test]
    async fn same_number_twice_clears_only_after_both_settle() {
        let gate = Arc::new(Semaphore::new(0));
        let backend = Arc::new(MockBackend::new().with_call_gate(gate.clone()));
        let dispatcher = dispatcher_on(&backend);

        let spawn = || {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move { dispatcher.dispatch("100", None, "233").await })
        };
        let first = spawn();
        let second = spawn();
        wait_for_calls(&backend, 2).await;

        gate.add_permits(1);
        let settled = tokio::select! {
            r = first => r,
            r = second => r,
        };
        assert!(settled.unwrap().is_started());
        assert!(dispatcher.is_in_flight("100"), "the other request is still held");

        gate.add_permits(1);
        while dispatcher.is_in_flight("100") {
            tokio::task::yield_now().await;
        }
        assert!(dispatcher.in_flight().is_empty());
    }

    #[tokio::test]
    async fn dropped_dispatch_clears_in_flight() {
        let gate = Arc::new(Semaphore::new(0));
        let backend = Arc::new(MockBackend::new().with_call_gate(gate));
        let dispatcher = dispatcher_on(&backend);

        let task = {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move { dispatcher.dispatch("0612345", None, "233").await })
        };
        wait_for_calls(&backend, 1).await;
        assert!(dispatcher.is_in_flight("0612345"));

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert!(!dispatcher.is_in_flight("0612345"));
    }
}
