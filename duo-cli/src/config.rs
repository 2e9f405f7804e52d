//! CLI Configuration

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use duo_core::prefs::{PreferenceStore, SqlitePreferenceStore};
use duo_core::DuoConfig;

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Data directory for storage.
    pub data_dir: PathBuf,
    /// Origin of the embedding host.
    pub expected_origin: Option<String>,
    /// Backend base URL.
    pub api_url: Option<String>,
}

impl CliConfig {
    /// Returns the preference database path.
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("prefs.db")
    }

    /// Library configuration layered from the environment, then CLI flags.
    pub fn duo_config(&self) -> DuoConfig {
        let mut config = DuoConfig::from_env().with_storage_path(self.storage_path());
        if let Some(origin) = &self.expected_origin {
            config = config.with_expected_origin(origin.clone());
        }
        if let Some(url) = &self.api_url {
            config = config.with_api_url(url.clone());
        }
        config
    }

    /// Opens the preference store, creating it on first use.
    pub fn open_store(&self) -> Result<Arc<dyn PreferenceStore>> {
        tracing::debug!(path = %self.storage_path().display(), "opening preference store");
        let store = SqlitePreferenceStore::open(self.storage_path()).with_context(|| {
            format!(
                "Failed to open preferences at {}",
                self.storage_path().display()
            )
        })?;
        Ok(Arc::new(store))
    }
}
