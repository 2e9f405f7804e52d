// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Well-known preference keys.

/// Member bearer token issued by PIN login.
pub const SESSION_TOKEN_KEY: &str = "duo_session_token";

/// Admin bearer token issued by admin login.
pub const ADMIN_TOKEN_KEY: &str = "duo_admin_token";

/// Last identity returned by the backend "who am I" lookup.
pub const CACHED_IDENTITY_KEY: &str = "duo_cached_identity";

/// JSON `{"participantA": .., "participantB": ..}`.
pub const NAMES_KEY: &str = "duo_participant_names";

/// Persisted mode flag.
pub const MODE_KEY: &str = "duo_mode";

/// Persisted theme preference.
pub const THEME_KEY: &str = "duo_theme";

/// Keys wiped when switching into production mode.
pub const CREDENTIAL_KEYS: &[&str] = &[SESSION_TOKEN_KEY, ADMIN_TOKEN_KEY, CACHED_IDENTITY_KEY];
