//! Account Commands
//!
//! Member sign-in against the backend.

use anyhow::{anyhow, Result};
use duo_core::backend::{ApiClient, ApiError};
use duo_core::prefs::keys::CREDENTIAL_KEYS;
use duo_core::prefs::PreferenceStore;

use crate::config::CliConfig;
use crate::display;

fn client(config: &CliConfig) -> Result<ApiClient> {
    let store = config.open_store()?;
    ApiClient::from_config(&config.duo_config(), store).map_err(|e| match e {
        ApiError::NoBaseUrl => anyhow!("No backend configured. Pass --api-url or set DUO_API_URL."),
        other => other.into(),
    })
}

/// Sign in with a PIN.
pub async fn login(config: &CliConfig, pin: &str) -> Result<()> {
    let api = client(config)?;
    match api.login_with_pin(pin).await {
        Ok(member) => {
            display::success("Signed in");
            display::display_member(&member);
            Ok(())
        }
        Err(ApiError::AuthRequired { .. }) => Err(anyhow!("PIN rejected")),
        Err(e) => Err(e.into()),
    }
}

/// Show the signed-in member.
pub async fn whoami(config: &CliConfig) -> Result<()> {
    let api = client(config)?;
    match api.whoami().await {
        Ok(member) => {
            display::display_member(&member);
            Ok(())
        }
        Err(ApiError::MissingToken) => Err(anyhow!("Not signed in. Run 'duo login <pin>' first.")),
        Err(ApiError::AuthRequired { .. }) => {
            display::warning("Session expired; sign in again");
            if let Some(member) = api.cached_member() {
                display::info(&format!("Last signed in as {}", member.email));
            }
            Err(anyhow!("Session expired"))
        }
        Err(e) => Err(e.into()),
    }
}

/// Remove stored credentials. Works without a backend configured.
pub fn logout(config: &CliConfig) -> Result<()> {
    let store = config.open_store()?;
    for key in CREDENTIAL_KEYS {
        store.remove(key)?;
    }
    display::success("Signed out");
    Ok(())
}
