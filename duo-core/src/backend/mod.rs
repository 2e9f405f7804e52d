// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backend API Client
//!
//! Bearer-token HTTP client for the member, admin and feedback routes.
//! Tokens live in the preference store under the credential keys.

mod client;
mod error;

pub use client::{ApiClient, LoginResponse};
pub use error::ApiError;
