// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

/// Errors returned by [`ApiClient`](super::ApiClient).
#[derive(Debug, Error)]
pub enum ApiError {
    /// No token stored for an authenticated call. Nothing was sent.
    #[error("not signed in")]
    MissingToken,

    /// The backend rejected the call. The stored token has been cleared.
    #[error("authentication required (HTTP {status})")]
    AuthRequired {
        /// HTTP status returned by the backend.
        status: u16,
    },

    /// Network/request error
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No backend URL configured.
    #[error("no backend URL configured")]
    NoBaseUrl,
}
