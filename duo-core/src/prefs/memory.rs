// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory preference store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::{PreferenceStore, PrefsError};

/// In-process preference store.
///
/// Can be switched to an unavailable state to simulate disabled storage or
/// an exhausted quota.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
    unavailable: AtomicBool,
}

impl MemoryPreferenceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.lock().map(|values| values.len()).unwrap_or(0)
    }

    /// Returns true if no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, PrefsError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(PrefsError::Unavailable("storage disabled".into()));
        }
        self.values
            .lock()
            .map_err(|_| PrefsError::Unavailable("lock poisoned".into()))
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PrefsError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::PreferenceStoreExt;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryPreferenceStore::new();
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("1".to_string()));

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        // Removing twice is fine
        store.remove("a").unwrap();
    }

    #[test]
    fn test_unavailable_store_degrades_to_absent() {
        let store = MemoryPreferenceStore::new();
        store.set("a", "1").unwrap();
        store.set_unavailable(true);

        assert!(store.get("a").is_err());
        assert_eq!(store.get_or_absent("a"), None);
        assert!(!store.set_best_effort("b", "2"));
        assert!(!store.remove_best_effort("a"));

        store.set_unavailable(false);
        assert_eq!(store.get_or_absent("a"), Some("1".to_string()));
        assert_eq!(store.get_or_absent("b"), None);
    }
}
