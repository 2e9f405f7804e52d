// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::ApiError;
use crate::api::DuoConfig;
use crate::member::{AppSettings, Feedback, Member, MemberUpdate, NewMember};
use crate::prefs::keys::{ADMIN_TOKEN_KEY, CACHED_IDENTITY_KEY, CREDENTIAL_KEYS, SESSION_TOKEN_KEY};
use crate::prefs::{PreferenceStore, PreferenceStoreExt};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Body returned by both login routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub member: Member,
}

#[derive(Serialize)]
struct PinLogin<'a> {
    pin: &'a str,
}

#[derive(Serialize)]
struct AdminLogin<'a> {
    email: &'a str,
    password: &'a str,
}

/// HTTP client for the Duo-Connecte backend.
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn PreferenceStore>,
}

impl ApiClient {
    /// Creates a client for `base_url`, reading and caching tokens in `store`.
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn PreferenceStore>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(format!(
                "Duo-Connecte/{}",
                option_env!("CARGO_PKG_VERSION").unwrap_or("0.1.0")
            ))
            .build()?;
        Ok(ApiClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
        })
    }

    /// Creates a client from the configured backend URL.
    pub fn from_config(
        config: &DuoConfig,
        store: Arc<dyn PreferenceStore>,
    ) -> Result<Self, ApiError> {
        let base_url = config.api_base_url.clone().ok_or(ApiError::NoBaseUrl)?;
        Self::new(base_url, store)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a member session token is stored.
    pub fn is_signed_in(&self) -> bool {
        self.token(SESSION_TOKEN_KEY).is_ok()
    }

    /// Last member returned by the backend, if cached and readable.
    pub fn cached_member(&self) -> Option<Member> {
        let raw = self.store.get_or_absent(CACHED_IDENTITY_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(member) => Some(member),
            Err(e) => {
                warn!(error = %e, "ignoring malformed cached identity");
                None
            }
        }
    }

    // === Auth ===

    /// Signs a member in with a PIN and caches the session token.
    pub async fn login_with_pin(&self, pin: &str) -> Result<Member, ApiError> {
        let request = self
            .client
            .post(self.url("/api/auth/pin"))
            .json(&PinLogin { pin });
        let login = self.login(request).await?;
        self.store.set_best_effort(SESSION_TOKEN_KEY, &login.token);
        self.cache_member(&login.member);
        info!(member = %login.member.id, "signed in with PIN");
        Ok(login.member)
    }

    /// Signs an administrator in and caches the admin token.
    pub async fn admin_login(&self, email: &str, password: &str) -> Result<Member, ApiError> {
        let request = self
            .client
            .post(self.url("/api/auth/admin"))
            .json(&AdminLogin { email, password });
        let login = self.login(request).await?;
        self.store.set_best_effort(ADMIN_TOKEN_KEY, &login.token);
        info!(member = %login.member.id, "signed in as administrator");
        Ok(login.member)
    }

    /// Fetches the signed-in member and refreshes the cached identity.
    pub async fn whoami(&self) -> Result<Member, ApiError> {
        let request = self.client.get(self.url("/api/auth/me"));
        let response = self.send_authed(request, SESSION_TOKEN_KEY).await?;
        let member: Member = response.json().await?;
        self.cache_member(&member);
        Ok(member)
    }

    /// Removes every stored credential.
    pub fn logout(&self) {
        for key in CREDENTIAL_KEYS {
            self.store.remove_best_effort(key);
        }
        info!("signed out");
    }

    // === Member routes ===

    pub async fn submit_feedback(&self, feedback: &Feedback) -> Result<(), ApiError> {
        let request = self.client.post(self.url("/api/feedback")).json(feedback);
        self.send_authed(request, SESSION_TOKEN_KEY).await?;
        Ok(())
    }

    // === Admin routes ===

    pub async fn get_settings(&self) -> Result<AppSettings, ApiError> {
        let request = self.client.get(self.url("/api/admin/config"));
        let response = self.send_authed(request, ADMIN_TOKEN_KEY).await?;
        Ok(response.json().await?)
    }

    pub async fn update_settings(&self, settings: &AppSettings) -> Result<(), ApiError> {
        let request = self.client.put(self.url("/api/admin/config")).json(settings);
        self.send_authed(request, ADMIN_TOKEN_KEY).await?;
        Ok(())
    }

    pub async fn list_members(&self) -> Result<Vec<Member>, ApiError> {
        let request = self.client.get(self.url("/api/admin/members"));
        let response = self.send_authed(request, ADMIN_TOKEN_KEY).await?;
        Ok(response.json().await?)
    }

    pub async fn create_member(&self, member: &NewMember) -> Result<Member, ApiError> {
        let request = self.client.post(self.url("/api/admin/members")).json(member);
        let response = self.send_authed(request, ADMIN_TOKEN_KEY).await?;
        Ok(response.json().await?)
    }

    pub async fn update_member(&self, id: &str, update: &MemberUpdate) -> Result<Member, ApiError> {
        let request = self
            .client
            .patch(self.url(&format!("/api/admin/members/{id}")))
            .json(update);
        let response = self.send_authed(request, ADMIN_TOKEN_KEY).await?;
        Ok(response.json().await?)
    }

    pub async fn delete_member(&self, id: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .delete(self.url(&format!("/api/admin/members/{id}")));
        self.send_authed(request, ADMIN_TOKEN_KEY).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn token(&self, key: &str) -> Result<String, ApiError> {
        self.store
            .get_or_absent(key)
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::MissingToken)
    }

    fn cache_member(&self, member: &Member) {
        match serde_json::to_string(member) {
            Ok(json) => {
                self.store.set_best_effort(CACHED_IDENTITY_KEY, &json);
            }
            Err(e) => warn!(error = %e, "could not serialize member"),
        }
    }

    async fn login(&self, request: RequestBuilder) -> Result<LoginResponse, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "login rejected");
            return Err(ApiError::AuthRequired {
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    /// Attaches the bearer token under `key` and sends. A rejected call
    /// clears that token.
    async fn send_authed(&self, request: RequestBuilder, key: &str) -> Result<Response, ApiError> {
        let token = self.token(key)?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), key, "backend rejected token, clearing it");
            self.store.remove_best_effort(key);
            return Err(ApiError::AuthRequired {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}
