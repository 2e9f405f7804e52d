// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Local Preference Store
//!
//! Small persistent key-value surface shared by the session machine, the
//! mode switch and the credential cache. Backends return `Result`; callers
//! that treat storage as best-effort go through [`PreferenceStoreExt`], which
//! logs failures and degrades to "absent".

mod error;
pub mod keys;
mod memory;
mod sqlite;

pub use error::PrefsError;
pub use memory::MemoryPreferenceStore;
pub use sqlite::SqlitePreferenceStore;

use tracing::warn;

/// Key-value preference storage.
pub trait PreferenceStore: Send + Sync {
    /// Returns the stored value, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError>;

    /// Stores a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError>;

    /// Removes a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), PrefsError>;
}

/// Best-effort access to a [`PreferenceStore`].
///
/// Failures are logged at `warn` and never propagated.
pub trait PreferenceStoreExt: PreferenceStore {
    /// Reads a key, treating storage failures as absence.
    fn get_or_absent(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "preference read failed");
                None
            }
        }
    }

    /// Writes a key. Returns whether the write succeeded.
    fn set_best_effort(&self, key: &str, value: &str) -> bool {
        match self.set(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "preference write failed");
                false
            }
        }
    }

    /// Removes a key. Returns whether the removal succeeded.
    fn remove_best_effort(&self, key: &str) -> bool {
        match self.remove(key) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "preference removal failed");
                false
            }
        }
    }
}

impl<T: PreferenceStore + ?Sized> PreferenceStoreExt for T {}
