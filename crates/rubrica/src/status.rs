// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rubrica status` command implementation.
//!
//! Runs one status probe against the backend and reports the connectivity
//! state. A probe failure is not an error here; it reads as disconnected.

use rubrica_client::RubricaClient;
use rubrica_core::ConnectivityState;
use serde::Serialize;

use crate::palette::Palette;

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub connected: bool,
    pub status: ConnectivityState,
    pub backend: String,
}

/// Run the `rubrica status` command. Returns whether the backend is connected.
pub async fn run_status(client: &RubricaClient, backend: &str, json: bool, plain: bool) -> bool {
    let state = client.monitor().probe_once().await;
    let output = StatusOutput {
        connected: state.is_connected(),
        status: state,
        backend: backend.to_string(),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let palette = Palette::detect(plain, client.settings().is_dark());
        print!("{}", render_status(&output, &palette));
    }
    output.connected
}

fn render_status(output: &StatusOutput, palette: &Palette) -> String {
    let label = output.status.label();
    let state = match &output.status {
        ConnectivityState::Connected => palette.ok(label),
        ConnectivityState::Disconnected => palette.fail(label),
        ConnectivityState::Reported(_) => palette.warn(label),
    };

    let mut text = String::new();
    text.push('\n');
    text.push_str(&format!("  {}\n", palette.accent("rubrica status")));
    text.push_str(&format!("  {}\n", "-".repeat(35)));
    text.push_str(&format!(
        "    PBX:      {} {state}\n",
        palette.mark(output.connected)
    ));
    text.push_str(&format!("    Backend:  {}\n", output.backend));
    text.push('\n');
    text
}
