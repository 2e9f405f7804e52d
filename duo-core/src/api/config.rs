// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! App Configuration

use std::path::PathBuf;

use crate::handshake::{HandshakeConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_INTERVAL_MS};
use crate::mode::{Mode, DEFAULT_MODE};

/// Configuration for a [`DuoApp`](super::DuoApp).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuoConfig {
    /// Origin of the authorized embedding host.
    pub expected_origin: Option<String>,
    /// Delay between identity requests (milliseconds).
    pub request_interval_ms: u64,
    /// Number of identity requests before timing out.
    pub max_attempts: u32,
    /// Backend base URL.
    pub api_base_url: Option<String>,
    /// Path of the preference database.
    pub storage_path: PathBuf,
    /// Mode used when none is persisted.
    pub default_mode: Mode,
}

impl Default for DuoConfig {
    fn default() -> Self {
        DuoConfig {
            expected_origin: None,
            request_interval_ms: DEFAULT_REQUEST_INTERVAL_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            api_base_url: None,
            storage_path: PathBuf::from("./duo_data/prefs.db"),
            default_mode: DEFAULT_MODE,
        }
    }
}

impl DuoConfig {
    /// Reads configuration from `DUO_*` environment variables, keeping
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = DuoConfig::default();
        if let Some(origin) = lookup("DUO_EXPECTED_ORIGIN").filter(|v| !v.is_empty()) {
            config.expected_origin = Some(origin);
        }
        if let Some(url) = lookup("DUO_API_URL").filter(|v| !v.is_empty()) {
            config.api_base_url = Some(url);
        }
        if let Some(ms) = lookup("DUO_REQUEST_INTERVAL_MS").and_then(|v| v.parse().ok()) {
            config.request_interval_ms = ms;
        }
        if let Some(n) = lookup("DUO_MAX_ATTEMPTS").and_then(|v| v.parse().ok()) {
            config.max_attempts = n;
        }
        if let Some(dir) = lookup("DUO_DATA_DIR").filter(|v| !v.is_empty()) {
            config.storage_path = PathBuf::from(dir).join("prefs.db");
        }
        config
    }

    /// Sets the expected host origin.
    pub fn with_expected_origin(mut self, origin: impl Into<String>) -> Self {
        self.expected_origin = Some(origin.into());
        self
    }

    /// Sets the retry cadence.
    pub fn with_retry(mut self, request_interval_ms: u64, max_attempts: u32) -> Self {
        self.request_interval_ms = request_interval_ms;
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the backend base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Sets the preference database path.
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    /// Sets the fallback mode.
    pub fn with_default_mode(mut self, mode: Mode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Handshake configuration for the given mode.
    pub fn handshake_config(&self, mode: Mode) -> HandshakeConfig {
        HandshakeConfig {
            expected_origin: self.expected_origin.clone(),
            request_interval_ms: self.request_interval_ms,
            max_attempts: self.max_attempts,
            dev_mode_enabled: mode == Mode::Development,
        }
    }
}
