// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rubrica watch` command implementation.
//!
//! Starts the client (monitor plus one directory fetch) and prints every
//! connectivity transition until the token is cancelled.

use rubrica_client::RubricaClient;
use rubrica_core::ConnectivityState;
use tokio_util::sync::CancellationToken;

use crate::palette::{Palette, ThemedPalette};

pub async fn run_watch(client: &RubricaClient, cancel: CancellationToken, plain: bool) {
    let mut palette = ThemedPalette::new(plain, client.settings().subscribe_theme());
    let mut transitions = client.monitor().subscribe();

    client.start().await;
    println!(
        "{} {} contacts loaded, watching connectivity (Ctrl+C to stop)",
        palette.current().accent("rubrica"),
        client.directory().len()
    );
    println!("{}", render_state(&transitions.borrow_and_update(), &palette.current()));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = transitions.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = transitions.borrow_and_update().clone();
                println!("{}", render_state(&state, &palette.current()));
            }
        }
    }

    client.shutdown().await;
}

fn render_state(state: &ConnectivityState, palette: &Palette) -> String {
    let label = match state {
        ConnectivityState::Connected => palette.ok(state.label()),
        ConnectivityState::Disconnected => palette.fail(state.label()),
        ConnectivityState::Reported(label) => palette.warn(label),
    };
    format!("{} PBX {label}", palette.mark(state.is_connected()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use rubrica_test_utils::{MemoryStore, MockBackend, Scripted};

    #[test]
    fn state_lines() {
        let palette = Palette::new(false, false);
        assert_eq!(render_state(&ConnectivityState::Connected, &palette), "[OK] PBX connected");
        assert_eq!(
            render_state(&ConnectivityState::Reported("degraded".into()), &palette),
            "[FAIL] PBX degraded"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn watch_stops_the_monitor_on_cancel() {
        let backend = Arc::new(MockBackend::new().with_status(vec![Scripted::Unreachable]));
        let client = RubricaClient::with_parts(
            backend.clone(),
            Arc::new(MemoryStore::new()),
            Duration::from_secs(5),
        );
        let cancel = CancellationToken::new();

        let stopper = {
            let cancel = cancel.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(12)).await;
                cancel.cancel();
            }
        };
        tokio::join!(run_watch(&client, cancel, true), stopper);

        assert!(!client.monitor().is_running());
        let probes = backend.status_probes();
        assert_eq!(probes, 3);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(backend.status_probes(), probes);
    }
}
