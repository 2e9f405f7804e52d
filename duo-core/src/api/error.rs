// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! API Error Types
//!
//! Unified error type for the Duo-Connecte app layer.

use thiserror::Error;

#[cfg(feature = "backend")]
use crate::backend::ApiError;
use crate::prefs::PrefsError;
use crate::session::SessionError;

/// Unified error type for app operations.
#[derive(Error, Debug)]
pub enum DuoError {
    /// Preference storage failed where it is not best-effort.
    #[error("storage error: {0}")]
    Storage(#[from] PrefsError),

    /// Session transition rejected.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Backend call failed.
    #[cfg(feature = "backend")]
    #[error("backend error: {0}")]
    Backend(#[from] ApiError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type for app operations.
pub type DuoResult<T> = Result<T, DuoError>;
