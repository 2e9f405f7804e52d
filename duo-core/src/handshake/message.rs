// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Handshake Wire Messages
//!
//! Wire contract with the embedding host:
//!
//! ```text
//! child -> host   { "type": "IDENTITY_REQUEST" }
//! host  -> child  { "type": "IDENTITY_AUTH",
//!                   "user": { "publicId", "email", "displayName", "firstName",
//!                             "lastName", "isAdmin", "issuedAtEpochMs" },
//!                   "theme": "light" | "dark" }       (theme optional)
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::identity::AuthIdentity;
use crate::theme::ThemeMode;

/// Discriminant of the request sent to the host.
pub const IDENTITY_REQUEST_TYPE: &str = "IDENTITY_REQUEST";

/// Discriminant of the identity message sent by the host.
pub const IDENTITY_AUTH_TYPE: &str = "IDENTITY_AUTH";

/// Message posted to the parent frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    #[serde(rename = "IDENTITY_REQUEST")]
    IdentityRequest,
}

impl OutboundMessage {
    /// Serializes the message as the JSON payload posted to the host.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Message received on the page's message channel.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Origin of the sending frame, as reported by the channel.
    pub origin: String,
    /// Raw payload.
    pub payload: Value,
}

impl InboundMessage {
    /// Creates an inbound message.
    pub fn new(origin: impl Into<String>, payload: Value) -> Self {
        InboundMessage {
            origin: origin.into(),
            payload,
        }
    }
}

/// Schema validation failures for same-origin messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("Message has no type discriminant")]
    MissingType,

    #[error("Unexpected message type: {0}")]
    UnexpectedType(String),

    #[error("Invalid identity payload: {0}")]
    InvalidPayload(String),

    #[error("Identity has an empty public id")]
    EmptyPublicId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUser {
    public_id: String,
    email: String,
    display_name: String,
    first_name: String,
    last_name: String,
    is_admin: bool,
    issued_at_epoch_ms: i64,
}

#[derive(Deserialize)]
struct IdentityEnvelope {
    user: WireUser,
    #[serde(default)]
    theme: Option<ThemeMode>,
}

/// Validates an identity payload and builds the identity it asserts.
///
/// Origin is not checked here; callers must compare the sender origin first.
pub fn parse_identity_message(payload: &Value) -> Result<AuthIdentity, MessageError> {
    let kind = payload
        .get("type")
        .and_then(Value::as_str)
        .ok_or(MessageError::MissingType)?;
    if kind != IDENTITY_AUTH_TYPE {
        return Err(MessageError::UnexpectedType(kind.to_string()));
    }

    let envelope: IdentityEnvelope = serde_json::from_value(payload.clone())
        .map_err(|e| MessageError::InvalidPayload(e.to_string()))?;
    let user = envelope.user;

    if user.public_id.trim().is_empty() {
        return Err(MessageError::EmptyPublicId);
    }

    Ok(AuthIdentity {
        public_id: user.public_id,
        email: user.email,
        display_name: user.display_name,
        first_name: user.first_name,
        last_name: user.last_name,
        is_admin: user.is_admin,
        issued_at_epoch_ms: user.issued_at_epoch_ms,
        theme_hint: envelope.theme,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> Value {
        json!({
            "publicId": "m-42",
            "email": "ana@example.com",
            "displayName": "Ana B.",
            "firstName": "Ana",
            "lastName": "B",
            "isAdmin": false,
            "issuedAtEpochMs": 1_700_000_000_000i64
        })
    }

    #[test]
    fn test_request_serializes_with_type_tag() {
        let json = OutboundMessage::IdentityRequest.to_json().unwrap();
        assert_eq!(json, r#"{"type":"IDENTITY_REQUEST"}"#);
    }

    #[test]
    fn test_parse_with_theme() {
        let identity =
            parse_identity_message(&json!({"type": "IDENTITY_AUTH", "user": user(), "theme": "dark"}))
                .unwrap();
        assert_eq!(identity.public_id, "m-42");
        assert_eq!(identity.theme_hint, Some(ThemeMode::Dark));
        assert!(!identity.is_admin);
    }

    #[test]
    fn test_parse_ignores_unknown_user_fields() {
        let mut u = user();
        u["avatarUrl"] = json!("https://cdn.example/a.png");
        let identity = parse_identity_message(&json!({"type": "IDENTITY_AUTH", "user": u})).unwrap();
        assert_eq!(identity.theme_hint, None);
    }

    #[test]
    fn test_rejects_other_types() {
        let err = parse_identity_message(&json!({"type": "RESIZE", "height": 300})).unwrap_err();
        assert_eq!(err, MessageError::UnexpectedType("RESIZE".into()));

        let err = parse_identity_message(&json!("hello")).unwrap_err();
        assert_eq!(err, MessageError::MissingType);
    }

    #[test]
    fn test_rejects_wrong_field_types() {
        let mut u = user();
        u["isAdmin"] = json!("yes");
        let err = parse_identity_message(&json!({"type": "IDENTITY_AUTH", "user": u})).unwrap_err();
        assert!(matches!(err, MessageError::InvalidPayload(_)));
    }

    #[test]
    fn test_rejects_unknown_theme() {
        let err =
            parse_identity_message(&json!({"type": "IDENTITY_AUTH", "user": user(), "theme": "sepia"}))
                .unwrap_err();
        assert!(matches!(err, MessageError::InvalidPayload(_)));
    }

    #[test]
    fn test_rejects_blank_public_id() {
        let mut u = user();
        u["publicId"] = json!("  ");
        let err = parse_identity_message(&json!({"type": "IDENTITY_AUTH", "user": u})).unwrap_err();
        assert_eq!(err, MessageError::EmptyPublicId);
    }
}
