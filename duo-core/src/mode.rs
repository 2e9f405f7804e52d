// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mode Switch
//!
//! Development mode bypasses the identity handshake with a canned admin
//! identity. Entering production mode erases every cached credential and
//! asks the front end to reload.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::prefs::keys::{CREDENTIAL_KEYS, MODE_KEY};
use crate::prefs::{PreferenceStore, PreferenceStoreExt};

/// Process-wide environment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Development,
    Production,
}

/// Built-in mode when nothing valid is persisted.
pub const DEFAULT_MODE: Mode = Mode::Production;

impl Mode {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }

    /// Parses the storage representation. Only exact values are accepted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "development" => Some(Mode::Development),
            "production" => Some(Mode::Production),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`ModeSwitch::set_mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    /// Already in the requested mode.
    Unchanged,
    /// Mode updated in place; rebuild the handshake.
    Switched(Mode),
    /// Credentials wiped; the front end must reload. The in-memory mode was
    /// left untouched.
    ReloadRequired,
}

/// Mode flag backed by the preference store.
pub struct ModeSwitch {
    current: Mode,
    store: Arc<dyn PreferenceStore>,
}

impl ModeSwitch {
    /// Resolves the mode from the store, falling back to `default`.
    pub fn load(store: Arc<dyn PreferenceStore>, default: Mode) -> Self {
        let current = store
            .get_or_absent(MODE_KEY)
            .and_then(|raw| Mode::parse(&raw))
            .unwrap_or(default);
        ModeSwitch { current, store }
    }

    /// Resolves the mode from the store, falling back to [`DEFAULT_MODE`].
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self::load(store, DEFAULT_MODE)
    }

    /// Returns the current mode.
    pub fn current(&self) -> Mode {
        self.current
    }

    /// Returns true in development mode.
    pub fn is_development(&self) -> bool {
        self.current == Mode::Development
    }

    /// Changes the mode.
    ///
    /// Entering production is only skipped when both the in-memory mode and
    /// the persisted flag are exactly production; anything else wipes the
    /// credential cache and returns [`ModeChange::ReloadRequired`].
    pub fn set_mode(&mut self, target: Mode) -> ModeChange {
        match target {
            Mode::Production => {
                let persisted = self.store.get_or_absent(MODE_KEY);
                let already = self.current == Mode::Production
                    && persisted.as_deref() == Some(Mode::Production.as_str());
                if already {
                    return ModeChange::Unchanged;
                }
                for key in CREDENTIAL_KEYS {
                    self.store.remove_best_effort(key);
                }
                self.store
                    .set_best_effort(MODE_KEY, Mode::Production.as_str());
                info!("entering production mode; credentials cleared, reload required");
                ModeChange::ReloadRequired
            }
            Mode::Development => {
                self.store
                    .set_best_effort(MODE_KEY, Mode::Development.as_str());
                if self.current == Mode::Development {
                    return ModeChange::Unchanged;
                }
                self.current = Mode::Development;
                info!("entering development mode");
                ModeChange::Switched(Mode::Development)
            }
        }
    }
}
