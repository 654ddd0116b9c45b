// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rubrica call` command implementation.

use rubrica_client::RubricaClient;
use rubrica_core::CallOutcome;

use crate::palette::Palette;

/// Place one call. Returns whether the backend started it.
///
/// `extension` overrides the saved origin extension for this call only.
pub async fn run_call(
    client: &RubricaClient,
    number: &str,
    name: Option<&str>,
    extension: Option<&str>,
    json: bool,
    plain: bool,
) -> bool {
    let outcome = match extension {
        Some(extension) => client.dispatcher().dispatch(number, name, extension).await,
        None => client.call(number, name).await,
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let palette = Palette::detect(plain, client.settings().is_dark());
        println!("{}", render_outcome(&outcome, &palette));
    }
    outcome.is_started()
}

fn render_outcome(outcome: &CallOutcome, palette: &Palette) -> String {
    let notice = outcome.to_string();
    let notice = match outcome {
        CallOutcome::CallStarted { .. } => palette.ok(&notice),
        CallOutcome::MissingOrigin => palette.warn(&notice),
        CallOutcome::ConnectionError { .. } | CallOutcome::CallFailed { .. } => {
            palette.fail(&notice)
        }
    };
    let mut text = format!("{} {notice}", palette.mark(outcome.is_started()));
    if let CallOutcome::MissingOrigin = outcome {
        text.push_str(&format!(
            "\n{}",
            palette.dim("set it with `rubrica extension <EXT>` or pass --extension")
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn started_call_renders_notice() {
        let outcome = CallOutcome::CallStarted {
            display_name: "Mario".into(),
            extension: "233".into(),
        };
        assert_eq!(
            render_outcome(&outcome, &Palette::new(false, false)),
            "[OK] call started from extension 233 to Mario"
        );
    }

    #[test]
    fn missing_origin_renders_hint() {
        let text = render_outcome(&CallOutcome::MissingOrigin, &Palette::new(false, false));
        assert!(text.starts_with("[FAIL] enter your extension"));
        assert!(text.contains("rubrica extension"));
    }

    #[test]
    fn failure_renders_backend_message() {
        let outcome = CallOutcome::CallFailed {
            message: "busy line".into(),
        };
        let text = render_outcome(&outcome, &Palette::new(false, false));
        assert_eq!(text, "[FAIL] call failed: busy line");
    }
}
