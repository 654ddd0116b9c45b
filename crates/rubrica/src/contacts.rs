// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rubrica contacts` command implementation.

use rubrica_client::RubricaClient;
use rubrica_core::{Contact, RubricaError};
use tracing::debug;

use crate::palette::Palette;

/// Fetch the directory and print the contacts matching `query`.
///
/// A failed fetch is only logged; the listing is then empty.
pub async fn run_contacts(
    client: &RubricaClient,
    query: Option<&str>,
    json: bool,
    plain: bool,
) -> Result<(), RubricaError> {
    if client.directory().refresh().await.is_err() {
        debug!("listing without a fresh directory");
    }
    let hits = client.directory().search(query.unwrap_or_default());

    if json {
        let rendered = serde_json::to_string_pretty(&hits)
            .map_err(|e| RubricaError::Internal(format!("failed to encode contacts: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    let palette = Palette::detect(plain, client.settings().is_dark());
    if hits.is_empty() {
        println!("{}", palette.dim("no matching contacts"));
    }
    for contact in &hits {
        print!("{}", render_contact(contact, &palette));
    }
    Ok(())
}

fn render_contact(contact: &Contact, palette: &Palette) -> String {
    let name = contact
        .name
        .as_deref()
        .or(contact.number.as_deref())
        .unwrap_or("(unnamed)");

    let mut heading = palette.accent(name);
    if let Some(role) = &contact.role {
        heading.push_str(&format!(" {}", palette.dim(&format!("({role})"))));
    }

    let mut text = format!("{heading}\n");
    for dialable in contact.dialable_numbers() {
        text.push_str(&format!(
            "    {:<15} {}\n",
            dialable.kind.to_string(),
            dialable.number
        ));
    }
    if let Some(email) = &contact.email {
        text.push_str(&format!("    {:<15} {email}\n", "email"));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use rubrica_test_utils::{MemoryStore, MockBackend, Scripted};

    #[test]
    fn contact_lists_every_dialable_number() {
        let contact = Contact {
            id: Some("7".into()),
            name: Some("Mario Rossi".into()),
            role: Some("Sales".into()),
            number: Some("0612345".into()),
            office: Some("0612000".into()),
            short_internal: Some("233".into()),
            email: Some("mario@example.com".into()),
        };

        let text = render_contact(&contact, &Palette::new(false, false));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Mario Rossi (Sales)");
        assert!(lines[1].trim_start().starts_with("primary"));
        assert!(lines[1].ends_with("0612345"));
        assert!(lines[2].trim_start().starts_with("office"));
        assert!(lines[3].trim_start().starts_with("short_internal"));
        assert!(lines[4].ends_with("mario@example.com"));
    }

    #[tokio::test]
    async fn failed_fetch_lists_nothing_and_succeeds() {
        let backend = Arc::new(MockBackend::new().with_contacts(vec![Scripted::HttpError(503)]));
        let client = RubricaClient::with_parts(
            backend.clone(),
            Arc::new(MemoryStore::new()),
            Duration::from_secs(5),
        );

        assert!(run_contacts(&client, None, true, true).await.is_ok());
        assert_eq!(backend.contact_fetches(), 1);
        assert!(client.directory().is_empty());
    }

    #[test]
    fn unnamed_contact_falls_back_to_number() {
        let contact = Contact {
            number: Some("100".into()),
            ..Default::default()
        };
        let text = render_contact(&contact, &Palette::new(false, false));
        assert!(text.starts_with("100\n"));
    }
}
