// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Authenticated identity asserted by the embedding host.

use serde::{Deserialize, Serialize};

use crate::theme::ThemeMode;

/// Identity obtained from a successful handshake.
///
/// Held in memory for the page session only; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthIdentity {
    /// Opaque external identifier (non-empty).
    pub public_id: String,
    pub email: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    /// Host payload timestamp. Diagnostic only, never used for trust.
    pub issued_at_epoch_ms: i64,
    /// Theme the host asked for, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_hint: Option<ThemeMode>,
}

impl AuthIdentity {
    /// Synthetic identity used when development mode bypasses the handshake.
    pub fn development() -> Self {
        AuthIdentity {
            public_id: "dev-user".to_string(),
            email: "dev@localhost".to_string(),
            display_name: "Dev User".to_string(),
            first_name: "Dev".to_string(),
            last_name: "User".to_string(),
            is_admin: true,
            issued_at_epoch_ms: 0,
            theme_hint: None,
        }
    }
}
