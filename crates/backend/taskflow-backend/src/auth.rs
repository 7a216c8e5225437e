//! HTTP client for the hosted auth API: OAuth redirect with PKCE, code exchange,
//! session persistence and refresh, sign-out, and auth-state notifications.

use crate::api::{AccessTokenProvider, AuthApi};
use crate::config::BackendConfig;
use crate::error::{BackendError, BackendResult};
use crate::events::{AuthEventBus, AuthStateHandler, AuthSubscription};
use crate::http::{APIKEY_HEADER, error_from_response, read_json};
use crate::pkce::{CHALLENGE_METHOD, PkceChallenge};
use crate::storage::SessionStorage;
use crate::types::{AuthEvent, OAuthProvider, OAuthRedirect, Session};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

/// Sessions this close to expiry are refreshed before use.
const EXPIRY_MARGIN_SECONDS: i64 = 10;

pub struct HttpAuthClient {
    http: Client,
    config: Arc<BackendConfig>,
    storage: Arc<dyn SessionStorage>,
    current: RwLock<Option<Session>>,
    /// Held while an expired session is refreshed; refresh tokens are single-use.
    refreshing: Mutex<()>,
    events: AuthEventBus,
}

impl HttpAuthClient {
    pub fn new(http: Client, config: Arc<BackendConfig>, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            http,
            config,
            storage,
            current: RwLock::new(None),
            refreshing: Mutex::new(()),
            events: AuthEventBus::new(),
        }
    }

    pub fn events(&self) -> &AuthEventBus {
        &self.events
    }

    /// Session held in memory, else the one persisted in storage.
    async fn restore_session(&self) -> BackendResult<Option<Session>> {
        let cached = self.current.read().await.clone();
        if cached.is_some() {
            return Ok(cached);
        }

        let Some(raw) = self.storage.get_item(&self.config.storage_key).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => {
                debug!("Restored stored session for user {}", session.user.id);
                *self.current.write().await = Some(session.clone());
                Ok(Some(session))
            }
            Err(err) => {
                warn!("Discarding unreadable stored session: {}", err);
                self.storage.remove_item(&self.config.storage_key).await?;
                Ok(None)
            }
        }
    }

    async fn save_session(&self, session: &Session) -> BackendResult<()> {
        self.storage
            .set_item(&self.config.storage_key, serde_json::to_string(session)?)
            .await?;
        *self.current.write().await = Some(session.clone());
        Ok(())
    }

    async fn remove_session(&self) -> BackendResult<()> {
        self.storage.remove_item(&self.config.storage_key).await?;
        *self.current.write().await = None;
        Ok(())
    }

    async fn request_token(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> BackendResult<Session> {
        let mut url = self.config.auth_endpoint("token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);

        let response = self
            .http
            .post(url)
            .header(APIKEY_HEADER, &self.config.anon_key)
            .json(&body)
            .send()
            .await?;

        let session: Session = read_json(response).await?;
        Ok(session.stamp_expiry(Utc::now()))
    }

    /// Exchange a refresh token for a new session and announce it.
    pub async fn refresh_session(&self, refresh_token: &str) -> BackendResult<Session> {
        let session = self
            .request_token("refresh_token", json!({ "refresh_token": refresh_token }))
            .await?;
        self.save_session(&session).await?;

        info!("Refreshed session for user {}", session.user.id);
        self.events.emit(&AuthEvent::token_refreshed(session.clone()));
        Ok(session)
    }

    fn is_fresh(session: &Session) -> bool {
        !session.is_expired_at(Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECONDS))
    }

    async fn expire_session(&self) -> BackendResult<Option<Session>> {
        self.remove_session().await?;
        self.events.emit(&AuthEvent::signed_out());
        Ok(None)
    }
}

#[async_trait]
impl AuthApi for HttpAuthClient {
    async fn get_session(&self) -> BackendResult<Option<Session>> {
        match self.restore_session().await? {
            Some(session) if Self::is_fresh(&session) => return Ok(Some(session)),
            Some(_) => {}
            None => return Ok(None),
        }

        // Whoever held the lock before us may already have refreshed or dropped it
        let _refreshing = self.refreshing.lock().await;
        let Some(session) = self.restore_session().await? else {
            return Ok(None);
        };
        if Self::is_fresh(&session) {
            return Ok(Some(session));
        }

        if session.refresh_token.is_empty() {
            warn!("Stored session expired without a refresh token");
            return self.expire_session().await;
        }

        match self.refresh_session(&session.refresh_token).await {
            Ok(refreshed) => Ok(Some(refreshed)),
            Err(err) if err.is_auth_error() => {
                warn!("Refresh token rejected, dropping session: {}", err);
                self.expire_session().await
            }
            Err(err) => Err(err),
        }
    }

    async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> BackendResult<OAuthRedirect> {
        let mut url = self.config.auth_endpoint("authorize")?;
        let pkce = PkceChallenge::new();

        self.storage
            .set_item(&self.config.code_verifier_key(), pkce.code_verifier.clone())
            .await?;

        url.query_pairs_mut()
            .append_pair("provider", provider.as_str())
            .append_pair("redirect_to", redirect_to)
            .append_pair("code_challenge", &pkce.code_challenge)
            .append_pair("code_challenge_method", CHALLENGE_METHOD);

        debug!("Generated authorization URL for provider {}", provider);
        Ok(OAuthRedirect { provider, url })
    }

    async fn exchange_code_for_session(&self, auth_code: &str) -> BackendResult<Session> {
        let verifier_key = self.config.code_verifier_key();
        let code_verifier = self
            .storage
            .get_item(&verifier_key)
            .await?
            .ok_or(BackendError::MissingCodeVerifier)?;

        let session = self
            .request_token(
                "pkce",
                json!({ "auth_code": auth_code, "code_verifier": code_verifier }),
            )
            .await?;

        self.storage.remove_item(&verifier_key).await?;
        self.save_session(&session).await?;

        info!("Signed in user {}", session.user.id);
        self.events.emit(&AuthEvent::signed_in(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        if let Some(session) = self.restore_session().await? {
            let url = self.config.auth_endpoint("logout")?;
            let response = self
                .http
                .post(url)
                .header(APIKEY_HEADER, &self.config.anon_key)
                .bearer_auth(&session.access_token)
                .send()
                .await?;

            // A session the server no longer knows is as good as signed out
            let status = response.status();
            if !status.is_success() && !matches!(status.as_u16(), 401 | 403 | 404) {
                let err = error_from_response(response).await;
                error!("Sign out failed: {}", err);
                return Err(err);
            }
        }

        self.remove_session().await?;
        info!("Signed out");
        self.events.emit(&AuthEvent::signed_out());
        Ok(())
    }

    fn on_auth_state_change(&self, handler: AuthStateHandler) -> AuthSubscription {
        self.events.subscribe(handler)
    }
}

#[async_trait]
impl AccessTokenProvider for HttpAuthClient {
    async fn access_token(&self) -> BackendResult<Option<String>> {
        Ok(self
            .get_session()
            .await?
            .map(|session| session.access_token))
    }
}
