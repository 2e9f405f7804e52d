// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Preference store error types.

use thiserror::Error;

/// Errors raised by a preference store backend.
#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("Preference storage unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}
