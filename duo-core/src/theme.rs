// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Theme System
//!
//! Light/dark mode selection. The embedding host may push a theme hint with
//! its identity message; the handshake drops it into a [`ThemeSlot`] and the
//! theming layer picks it up from there.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::prefs::keys::THEME_KEY;
use crate::prefs::{PreferenceStore, PreferenceStoreExt};

/// Theme mode (light or dark)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    /// Parses the wire/storage representation. Only exact lowercase values match.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    /// Returns the wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

/// Latest theme hint received from the host.
#[derive(Debug, Clone, Default)]
pub struct ThemeSlot {
    inner: Arc<RwLock<Option<ThemeMode>>>,
}

impl ThemeSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a hint, replacing the previous one.
    pub fn publish(&self, mode: ThemeMode) {
        match self.inner.write() {
            Ok(mut slot) => *slot = Some(mode),
            Err(poison) => *poison.into_inner() = Some(mode),
        }
    }

    /// Returns the latest hint, if any.
    pub fn current(&self) -> Option<ThemeMode> {
        match self.inner.read() {
            Ok(slot) => *slot,
            Err(poison) => *poison.into_inner(),
        }
    }
}

/// Saves the user's own theme choice.
pub fn save_theme_preference(store: &dyn PreferenceStore, mode: ThemeMode) -> bool {
    store.set_best_effort(THEME_KEY, mode.as_str())
}

/// Resolves the theme to render: host hint first, then the stored
/// preference, then light.
pub fn effective_theme(slot: &ThemeSlot, store: &dyn PreferenceStore) -> ThemeMode {
    slot.current()
        .or_else(|| {
            store
                .get_or_absent(THEME_KEY)
                .and_then(|v| ThemeMode::parse(&v))
        })
        .unwrap_or(ThemeMode::Light)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPreferenceStore;

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(ThemeMode::parse("dark"), Some(ThemeMode::Dark));
        assert_eq!(ThemeMode::parse("Dark"), None);
        assert_eq!(ThemeMode::parse(""), None);
    }

    #[test]
    fn test_host_hint_wins_over_stored_preference() {
        let store = MemoryPreferenceStore::new();
        let slot = ThemeSlot::new();
        assert_eq!(effective_theme(&slot, &store), ThemeMode::Light);

        save_theme_preference(&store, ThemeMode::Dark);
        assert_eq!(effective_theme(&slot, &store), ThemeMode::Dark);

        slot.publish(ThemeMode::Light);
        assert_eq!(effective_theme(&slot, &store), ThemeMode::Light);
    }

    #[test]
    fn test_malformed_stored_theme_is_ignored() {
        let store = MemoryPreferenceStore::new();
        store.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(effective_theme(&ThemeSlot::new(), &store), ThemeMode::Light);
    }
}
