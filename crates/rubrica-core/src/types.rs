// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the backend adapters, the client core, and the CLI.

use std::fmt;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};

/// Status label the backend reports when the PBX link is up.
pub const STATUS_CONNECTED: &str = "connected";

/// Status label the backend reports when the PBX link is down.
pub const STATUS_DISCONNECTED: &str = "disconnected";

/// Application-level success marker in a call-initiation reply.
pub const CALL_STATUS_SUCCESS: &str = "success";

/// Notice used when the backend rejects a call without explaining why.
pub const GENERIC_CALL_FAILURE: &str = "the call could not be completed";

// --- Connectivity ---

/// Connectivity to the call-control backend, as seen by the last probe.
///
/// A successful probe's `status` label is taken verbatim, so besides the two
/// well-known states the backend may report any other label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectivityState {
    /// The backend reports a live PBX link.
    Connected,
    /// The backend reports no PBX link, or the probe failed.
    #[default]
    Disconnected,
    /// The backend answered with an unrecognized label.
    Reported(String),
}

impl ConnectivityState {
    /// Maps the optional `status` label of a successful probe to a state.
    ///
    /// A missing label means the probe succeeded, hence `Connected`.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            None | Some(STATUS_CONNECTED) => ConnectivityState::Connected,
            Some(STATUS_DISCONNECTED) => ConnectivityState::Disconnected,
            Some(other) => ConnectivityState::Reported(other.to_string()),
        }
    }

    /// The label this state displays as.
    pub fn label(&self) -> &str {
        match self {
            ConnectivityState::Connected => STATUS_CONNECTED,
            ConnectivityState::Disconnected => STATUS_DISCONNECTED,
            ConnectivityState::Reported(label) => label,
        }
    }

    /// Only an explicit `Connected` counts as connected.
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectivityState::Connected)
    }
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ConnectivityState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Body of a successful `GET /api/status` reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusReply {
    #[serde(default)]
    pub status: Option<String>,
}

// --- Directory ---

/// A directory entry.
///
/// Addressed by `id`, or by `number` when the id is absent. Entries with
/// neither are not addressable and are dropped by the directory cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default, deserialize_with = "text_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text_or_number", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text_or_number", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "text_or_number", skip_serializing_if = "Option::is_none")]
    pub office: Option<String>,
    #[serde(default, deserialize_with = "text_or_number", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "text_or_number", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "text_or_number", skip_serializing_if = "Option::is_none")]
    pub short_internal: Option<String>,
}

impl Contact {
    /// The identity of this contact: its id, falling back to its number.
    pub fn key(&self) -> Option<&str> {
        self.id.as_deref().or(self.number.as_deref())
    }

    pub fn is_addressable(&self) -> bool {
        self.key().is_some()
    }

    /// Every number on this contact that can be dialed, in display order.
    pub fn dialable_numbers(&self) -> Vec<DialableNumber> {
        [
            (NumberKind::Primary, &self.number),
            (NumberKind::Office, &self.office),
            (NumberKind::ShortInternal, &self.short_internal),
        ]
        .into_iter()
        .filter_map(|(kind, number)| {
            number.as_ref().map(|number| DialableNumber {
                kind,
                number: number.clone(),
            })
        })
        .collect()
    }

    /// Substring match used by directory search.
    ///
    /// The name is compared case-insensitively, the primary number verbatim.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        let by_name = self
            .name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&needle));
        let by_number = self
            .number
            .as_deref()
            .is_some_and(|number| number.contains(term));
        by_name || by_number
    }
}

/// Which line of a contact a dialable number belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NumberKind {
    Primary,
    Office,
    ShortInternal,
}

/// One independently dialable number of a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialableNumber {
    pub kind: NumberKind,
    pub number: String,
}

/// Accepts any JSON scalar as text and normalizes blank strings to `None`.
///
/// Booleans, arrays, and objects carry no directory value and read as absent.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
        Other(IgnoredAny),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| {
        let value = match raw {
            Raw::Text(text) => text.trim().to_string(),
            Raw::Signed(n) => n.to_string(),
            Raw::Unsigned(n) => n.to_string(),
            Raw::Float(n) => n.to_string(),
            Raw::Other(_) => return None,
        };
        (!value.is_empty()).then_some(value)
    }))
}

// --- Calls ---

/// Body of `POST /api/call`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRequest {
    pub number: String,
    pub extension: String,
}

/// Body of a `POST /api/call` reply, successful or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CallReplyBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// What came back from a call-initiation request that reached the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallReply {
    /// HTTP status code of the reply.
    pub http_status: u16,
    /// Decoded body; `None` if the body was empty or not the expected JSON.
    pub body: Option<CallReplyBody>,
}

impl CallReply {
    /// Transport-level success and an explicit application-level `"success"`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.http_status)
            && self
                .body
                .as_ref()
                .and_then(|body| body.status.as_deref())
                == Some(CALL_STATUS_SUCCESS)
    }

    /// Backend-provided explanation, preferring `message` over `detail`.
    pub fn failure_message(&self) -> Option<&str> {
        let body = self.body.as_ref()?;
        body.message
            .as_deref()
            .or(body.detail.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

/// The user-visible result of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CallOutcome {
    /// No origin extension was set; nothing was sent.
    MissingOrigin,
    /// The backend could not be reached.
    ConnectionError { message: String },
    /// The backend was reached but did not start the call.
    CallFailed { message: String },
    /// The backend accepted the call.
    CallStarted {
        display_name: String,
        extension: String,
    },
}

impl CallOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, CallOutcome::CallStarted { .. })
    }
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallOutcome::MissingOrigin => {
                write!(f, "enter your extension before placing a call")
            }
            CallOutcome::ConnectionError { .. } => {
                write!(f, "could not connect to the call server")
            }
            CallOutcome::CallFailed { message } => write!(f, "call failed: {message}"),
            CallOutcome::CallStarted {
                display_name,
                extension,
            } => write!(
                f,
                "call started from extension {extension} to {display_name}"
            ),
        }
    }
}

/// Whether a dispatch for a given target number is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DispatchState {
    Idle,
    InFlight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connectivity_label_mapping() {
        assert_eq!(ConnectivityState::from_label(None), ConnectivityState::Connected);
        assert_eq!(
            ConnectivityState::from_label(Some("connected")),
            ConnectivityState::Connected
        );
        assert_eq!(
            ConnectivityState::from_label(Some("disconnected")),
            ConnectivityState::Disconnected
        );
        let other = ConnectivityState::from_label(Some("degraded"));
        assert_eq!(other, ConnectivityState::Reported("degraded".into()));
        assert_eq!(other.label(), "degraded");
        assert!(!other.is_connected());
    }

    #[test]
    fn connectivity_defaults_to_disconnected() {
        assert_eq!(ConnectivityState::default(), ConnectivityState::Disconnected);
    }

    #[test]
    fn contact_key_falls_back_to_number() {
        let with_id: Contact =
            serde_json::from_str(r#"{"id": 7, "number": "0612345"}"#).unwrap();
        assert_eq!(with_id.key(), Some("7"));

        let number_only: Contact = serde_json::from_str(r#"{"number": "0612345"}"#).unwrap();
        assert_eq!(number_only.key(), Some("0612345"));

        let neither: Contact = serde_json::from_str(r#"{"name": "Nobody"}"#).unwrap();
        assert!(!neither.is_addressable());
    }

    #[test]
    fn contact_deserializes_all_fields() {
        let json = r#"{
            "id": "c-1",
            "name": "Mario Rossi",
            "number": 3331234567,
            "office": "0612345",
            "email": "mario@example.com",
            "role": "Sales",
            "shortInternal": "233"
        }"#;
        let contact: Contact = serde_json::from_str(json).unwrap();
        assert_eq!(contact.number.as_deref(), Some("3331234567"));
        assert_eq!(contact.short_internal.as_deref(), Some("233"));
        assert_eq!(contact.role.as_deref(), Some("Sales"));
    }

    #[test]
    fn blank_fields_are_absent() {
        let contact: Contact =
            serde_json::from_str(r#"{"id": "", "number": "  ", "office": null}"#).unwrap();
        assert!(contact.id.is_none());
        assert!(contact.number.is_none());
        assert!(contact.office.is_none());
    }

    #[test]
    fn odd_field_types_do_not_reject_the_contact() {
        let contact: Contact = serde_json::from_str(
            r#"{"id": 3.0, "name": "Giulia Verdi", "number": "0698765",
                "email": false, "role": ["Sales"], "office": {"floor": 2}, "shortInternal": 2.5}"#,
        )
        .unwrap();
        assert_eq!(contact.id.as_deref(), Some("3"));
        assert_eq!(contact.name.as_deref(), Some("Giulia Verdi"));
        assert_eq!(contact.short_internal.as_deref(), Some("2.5"));
        assert!(contact.email.is_none());
        assert!(contact.role.is_none());
        assert!(contact.office.is_none());
    }

    #[test]
    fn dialable_numbers_in_display_order() {
        let contact = Contact {
            number: Some("0612345".into()),
            short_internal: Some("233".into()),
            ..Default::default()
        };
        let numbers = contact.dialable_numbers();
        assert_eq!(numbers.len(), 2);
        assert_eq!(numbers[0].kind, NumberKind::Primary);
        assert_eq!(numbers[1].kind, NumberKind::ShortInternal);
        assert_eq!(numbers[1].number, "233");
        assert!(Contact::default().dialable_numbers().is_empty());
    }

    #[test]
    fn search_matches_name_case_insensitively_and_number_verbatim() {
        let contact = Contact {
            name: Some("Mario Rossi".into()),
            number: Some("0612345".into()),
            office: Some("0699999".into()),
            ..Default::default()
        };
        assert!(contact.matches("mario"));
        assert!(contact.matches("ROSSI"));
        assert!(contact.matches("1234"));
        assert!(contact.matches(""));
        assert!(!contact.matches("9999"), "office numbers are not searched");
    }

    #[test]
    fn call_reply_success_requires_status_success() {
        let ok = CallReply {
            http_status: 200,
            body: Some(CallReplyBody {
                status: Some("success".into()),
                ..Default::default()
            }),
        };
        assert!(ok.is_success());

        let app_error = CallReply {
            http_status: 200,
            body: Some(CallReplyBody {
                status: Some("error".into()),
                message: Some("Failed to initiate call".into()),
                detail: None,
            }),
        };
        assert!(!app_error.is_success());
        assert_eq!(app_error.failure_message(), Some("Failed to initiate call"));

        let no_body = CallReply {
            http_status: 200,
            body: None,
        };
        assert!(!no_body.is_success());
        assert_eq!(no_body.failure_message(), None);

        let http_error = CallReply {
            http_status: 500,
            body: Some(CallReplyBody {
                status: Some("success".into()),
                ..Default::default()
            }),
        };
        assert!(!http_error.is_success());
    }

    #[test]
    fn failure_message_falls_back_to_detail() {
        let reply = CallReply {
            http_status: 422,
            body: Some(CallReplyBody {
                status: None,
                message: None,
                detail: Some("extension unknown".into()),
            }),
        };
        assert_eq!(reply.failure_message(), Some("extension unknown"));
    }

    #[test]
    fn call_outcome_notices() {
        let started = CallOutcome::CallStarted {
            display_name: "Mario".into(),
            extension: "233".into(),
        };
        assert!(started.is_started());
        assert_eq!(
            started.to_string(),
            "call started from extension 233 to Mario"
        );
        assert_eq!(
            CallOutcome::CallFailed {
                message: "busy line".into()
            }
            .to_string(),
            "call failed: busy line"
        );
        assert!(!CallOutcome::MissingOrigin.is_started());
    }

    #[test]
    fn call_outcome_serializes_with_tag() {
        let json = serde_json::to_string(&CallOutcome::CallFailed {
            message: "busy line".into(),
        })
        .unwrap();
        assert!(json.contains("\"outcome\":\"call_failed\""));
        assert!(json.contains("\"message\":\"busy line\""));
    }

    #[test]
    fn call_request_wire_shape() {
        let request = CallRequest {
            number: "0612345".into(),
            extension: "233".into(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"number": "0612345", "extension": "233"})
        );
    }
}
