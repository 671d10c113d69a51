//! REST client for a Firebase-style identity toolkit, with FSM-tracked
//! session state and persisted tokens.

use crate::auth_fsm::{AuthMachine, AuthMachineInput, AuthState, RefreshConfig};
use crate::federated::{FederatedLoginStart, FederatedSession, FederatedStatus};
use crate::{
    FederatedProvider, IdentityError, IdentityProvider, IdentityResult, ProviderUser,
    SessionChangeHub, SessionChanges,
};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use hub_config_and_utils::Config;
use hub_storage::{IdentitySessionMeta, IdentitySessionStore};
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;
const DEFAULT_FEDERATED_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Opens the federated sign-in URL (normally in the user's browser).
pub type UrlOpener = Arc<dyn Fn(&str) -> std::io::Result<()> + Send + Sync>;

fn summarize_response_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}

fn map_transport_error(error: reqwest::Error) -> IdentityError {
    if error.is_connect() {
        IdentityError::NetworkUnavailable
    } else if error.is_timeout() {
        IdentityError::Timeout
    } else {
        IdentityError::Http(error)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Endpoints and timing for the identity client.
#[derive(Debug, Clone)]
pub struct IdentitySettings {
    pub api_key: String,
    pub identity_url: String,
    pub token_url: String,
    pub web_app_url: String,
    pub request_timeout: Duration,
    pub federated_timeout: Duration,
    pub federated_poll_interval: Duration,
}

impl IdentitySettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.identity_api_key.clone(),
            identity_url: config.identity_url.trim_end_matches('/').to_string(),
            token_url: config.token_url.trim_end_matches('/').to_string(),
            web_app_url: config.web_app_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout(),
            federated_timeout: config.federated_timeout(),
            federated_poll_interval: DEFAULT_FEDERATED_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

/// Response shared by `accounts:signUp` and `accounts:signInWithPassword`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default, alias = "profilePicture")]
    photo_url: Option<String>,
}

impl AuthResponse {
    fn user(&self) -> ProviderUser {
        ProviderUser {
            uid: self.local_id.clone(),
            email: non_empty(self.email.clone()),
            display_name: non_empty(self.display_name.clone()),
            photo_url: non_empty(self.photo_url.clone()),
        }
    }

    fn expires_in_secs(&self) -> i64 {
        parse_lifetime(self.expires_in.as_deref())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileRequest<'a> {
    id_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo_url: Option<&'a str>,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    #[serde(default)]
    local_id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<ProfileResponse>,
}

/// Secure-token refresh response (snake_case on the wire).
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn parse_lifetime(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
}

/// Identity client backed by the identity toolkit REST API.
pub struct FirebaseIdentity {
    http: reqwest::Client,
    settings: IdentitySettings,
    store: IdentitySessionStore,
    fsm: Mutex<AuthMachine>,
    refresh_config: RefreshConfig,
    current: RwLock<Option<ProviderUser>>,
    hub: SessionChangeHub,
    /// Serializes token refreshes.
    refresh_lock: tokio::sync::Mutex<()>,
    url_opener: UrlOpener,
}

impl FirebaseIdentity {
    pub fn new(settings: IdentitySettings, store: IdentitySessionStore) -> IdentityResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self {
            http,
            settings,
            store,
            fsm: Mutex::new(AuthMachine::new()),
            refresh_config: RefreshConfig::default(),
            current: RwLock::new(None),
            hub: SessionChangeHub::new(),
            refresh_lock: tokio::sync::Mutex::new(()),
            url_opener: Arc::new(|url: &str| {
                info!(url = %url, "Open this URL to continue signing in");
                Ok(())
            }),
        })
    }

    pub fn with_refresh_config(mut self, refresh_config: RefreshConfig) -> Self {
        self.refresh_config = refresh_config;
        self
    }

    pub fn with_url_opener(mut self, opener: UrlOpener) -> Self {
        self.url_opener = opener;
        self
    }

    /// Transition the FSM, logging state changes.
    fn transition(&self, input: &AuthMachineInput) -> IdentityResult<AuthState> {
        let mut fsm = self.fsm.lock();
        let old_state = AuthState::from(fsm.state());

        fsm.consume(input).map_err(|_| {
            IdentityError::InvalidStateTransition(format!(
                "Cannot apply {:?} in state {:?}",
                input,
                fsm.state()
            ))
        })?;

        let new_state = AuthState::from(fsm.state());
        if old_state != new_state {
            debug!(old_state = ?old_state, new_state = ?new_state, "Auth state transition");
        }
        Ok(new_state)
    }

    /// Transition where a rejection is unexpected but not fatal to the caller.
    fn advance(&self, input: &AuthMachineInput) {
        if let Err(e) = self.transition(input) {
            warn!(error = %e, "Auth state transition rejected");
        }
    }

    async fn read_response<R: DeserializeOwned>(
        response: reqwest::Response,
        operation: &str,
    ) -> IdentityResult<R> {
        let status = response.status();
        if status.is_success() {
            return response.json::<R>().await.map_err(map_transport_error);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(
            status = %status,
            operation,
            body_summary = %summarize_response_body(&body),
            "Identity request failed"
        );

        match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => Err(IdentityError::from_provider_message(&envelope.error.message)),
            Err(_) if status.is_server_error() => Err(IdentityError::ProviderInternal),
            Err(_) => Err(IdentityError::Provider {
                code: status.as_u16().to_string(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_string(),
            }),
        }
    }

    /// POST to `{identity_url}/v1/accounts:{endpoint}`.
    async fn post_accounts<B, R>(&self, endpoint: &str, body: &B) -> IdentityResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/v1/accounts:{}", self.settings.identity_url, endpoint);
        debug!(endpoint, "Identity request");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.settings.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        Self::read_response(response, endpoint).await
    }

    /// Look up the account behind an ID token. Doubles as server-side verification.
    async fn lookup(&self, id_token: &str) -> IdentityResult<ProviderUser> {
        let response: LookupResponse = self
            .post_accounts("lookup", &LookupRequest { id_token })
            .await?;

        let user = response
            .users
            .into_iter()
            .next()
            .ok_or_else(|| IdentityError::SessionInvalid("USER_NOT_FOUND".to_string()))?;

        Ok(ProviderUser {
            uid: user
                .local_id
                .ok_or_else(|| IdentityError::SessionInvalid("missing localId".to_string()))?,
            email: non_empty(user.email),
            display_name: non_empty(user.display_name),
            photo_url: non_empty(user.photo_url),
        })
    }

    /// Persist tokens and make `user` the current user.
    fn establish_session(
        &self,
        id_token: &str,
        refresh_token: &str,
        expires_in_secs: i64,
        user: &ProviderUser,
    ) -> IdentityResult<()> {
        let expires_at = Utc::now() + ChronoDuration::seconds(expires_in_secs);
        self.store.set_session(
            id_token,
            refresh_token,
            &IdentitySessionMeta {
                uid: user.uid.clone(),
                email: user.email.clone(),
                display_name: user.display_name.clone(),
                photo_url: user.photo_url.clone(),
                expires_at: expires_at.to_rfc3339(),
            },
        )?;
        *self.current.write() = Some(user.clone());
        Ok(())
    }

    /// Run a sign-in attempt under the FSM and publish the outcome.
    async fn run_sign_in<F>(&self, operation: &str, attempt: F) -> IdentityResult<ProviderUser>
    where
        F: Future<Output = IdentityResult<ProviderUser>>,
    {
        self.transition(&AuthMachineInput::SignInAttempt)?;

        match attempt.await {
            Ok(user) => {
                self.transition(&AuthMachineInput::SignInSuccess)?;
                info!(uid = %user.uid, operation, "Signed in");
                self.hub.publish(Some(user.clone()));
                Ok(user)
            }
            Err(e) => {
                let input = if self.current.read().is_some() {
                    AuthMachineInput::PriorSessionKept
                } else {
                    AuthMachineInput::SignInFailed
                };
                self.advance(&input);
                warn!(operation, error = %e, "Sign-in failed");
                Err(e)
            }
        }
    }

    async fn password_flow(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> IdentityResult<ProviderUser> {
        let response: AuthResponse = self
            .post_accounts(
                endpoint,
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;

        let user = response.user();
        self.establish_session(
            &response.id_token,
            &response.refresh_token,
            response.expires_in_secs(),
            &user,
        )?;
        Ok(user)
    }

    /// Begin the federated handoff: a login id and the URL the user must visit.
    pub fn start_federated(&self, provider: FederatedProvider) -> FederatedLoginStart {
        let login_id = Uuid::new_v4().to_string();
        let login_url = format!(
            "{}/cli-auth?login_id={}&provider={}",
            self.settings.web_app_url, login_id, provider
        );
        FederatedLoginStart {
            login_id,
            login_url,
        }
    }

    /// Poll the web app until the federated login completes, fails, or times out.
    async fn poll_federated(
        &self,
        provider: FederatedProvider,
        login_id: &str,
    ) -> IdentityResult<FederatedSession> {
        let status_url = format!("{}/api/cli-login-status", self.settings.web_app_url);
        let deadline = tokio::time::Instant::now() + self.settings.federated_timeout;

        loop {
            if tokio::time::Instant::now() >= deadline {
                return Err(IdentityError::Timeout);
            }

            let response = self
                .http
                .get(&status_url)
                .query(&[("login_id", login_id)])
                .send()
                .await
                .map_err(map_transport_error)?;
            let payload: FederatedStatus = Self::read_response(response, "cli-login-status").await?;

            match payload.status.as_str() {
                "pending" => {
                    tokio::time::sleep(self.settings.federated_poll_interval).await;
                }
                "success" => {
                    return payload.session.ok_or_else(|| IdentityError::FederatedFailed {
                        provider: provider.to_string(),
                        message: "missing session payload".to_string(),
                    });
                }
                "expired" => return Err(IdentityError::FederatedExpired),
                "cancelled" => return Err(IdentityError::FederatedCancelled),
                other => {
                    let error = payload.error.unwrap_or_else(|| other.to_string());
                    return Err(IdentityError::from_federated_error(
                        provider.as_str(),
                        &error,
                        &self.web_app_domain(),
                    ));
                }
            }
        }
    }

    fn web_app_domain(&self) -> String {
        url::Url::parse(&self.settings.web_app_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| self.settings.web_app_url.clone())
    }

    async fn federated_flow(&self, provider: FederatedProvider) -> IdentityResult<ProviderUser> {
        let start = self.start_federated(provider);
        info!(provider = %provider, login_id = %start.login_id, "Starting federated sign-in");

        (self.url_opener)(&start.login_url)
            .map_err(|e| IdentityError::Config(format!("Could not open sign-in URL: {}", e)))?;

        let session = self.poll_federated(provider, &start.login_id).await?;
        let user = self.lookup(&session.id_token).await?;
        self.establish_session(
            &session.id_token,
            &session.refresh_token,
            parse_lifetime(session.expires_in.as_deref()),
            &user,
        )?;
        Ok(user)
    }

    /// Single attempt to exchange the refresh token for a new ID token.
    async fn try_refresh(&self, refresh_token: &str) -> IdentityResult<String> {
        let url = format!("{}/v1/token", self.settings.token_url);
        debug!("Refreshing ID token");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.settings.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let data: RefreshResponse = Self::read_response(response, "token").await?;

        let previous = self.store.get_meta()?;
        let expires_at = Utc::now() + ChronoDuration::seconds(parse_lifetime(data.expires_in.as_deref()));
        let meta = IdentitySessionMeta {
            uid: data.user_id.clone(),
            email: previous.as_ref().and_then(|m| m.email.clone()),
            display_name: previous.as_ref().and_then(|m| m.display_name.clone()),
            photo_url: previous.as_ref().and_then(|m| m.photo_url.clone()),
            expires_at: expires_at.to_rfc3339(),
        };
        self.store.set_session(&data.id_token, &data.refresh_token, &meta)?;

        info!(uid = %data.user_id, "ID token refreshed");
        Ok(data.id_token)
    }

    /// Refresh with exponential backoff on transient errors. Leaves the FSM
    /// in `Refreshing`; the caller decides where it goes next.
    async fn refresh_with_backoff(&self, refresh_token: &str) -> IdentityResult<String> {
        let mut last_error = None;

        for attempt in 0..self.refresh_config.max_retries {
            match self.try_refresh(refresh_token).await {
                Ok(token) => return Ok(token),
                Err(e) if e.is_transient() => {
                    last_error = Some(e);

                    if attempt + 1 < self.refresh_config.max_retries {
                        self.advance(&AuthMachineInput::RefreshRetry);
                        let delay = self.refresh_config.delay_for_attempt(attempt);
                        debug!(
                            attempt = attempt + 1,
                            max_retries = self.refresh_config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Refresh failed with transient error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Refresh failed with non-transient error");
                    return Err(e);
                }
            }
        }

        warn!(attempts = self.refresh_config.max_retries, "Refresh retries exhausted");
        Err(last_error.unwrap_or(IdentityError::RefreshExhausted(
            self.refresh_config.max_retries,
        )))
    }

    /// Drop the local session after the provider rejected it.
    fn revoke_session(&self, input: &AuthMachineInput, reason: &IdentityError) {
        if let Err(e) = self.store.clear_session() {
            warn!(error = %e, "Failed to clear revoked session");
        }
        *self.current.write() = None;
        self.advance(input);
        warn!(error = %reason, "Session revoked");
        self.hub.publish(None);
    }

    /// Restore the persisted session, verifying or refreshing it with the
    /// provider. Publishes exactly one session change, whatever the outcome.
    pub async fn restore_session(&self) -> IdentityResult<Option<ProviderUser>> {
        self.transition(&AuthMachineInput::RestoreRequested)?;

        let result = self.restore_inner().await;
        match &result {
            Ok(user) => self.hub.publish(user.clone()),
            Err(_) => self.hub.publish(None),
        }
        result
    }

    async fn restore_inner(&self) -> IdentityResult<Option<ProviderUser>> {
        if !self.store.has_session()? {
            info!("No stored session found");
            self.transition(&AuthMachineInput::NoSession)?;
            return Ok(None);
        }

        let meta = match self.store.get_meta() {
            Ok(Some(meta)) => meta,
            other => {
                if let Err(e) = other {
                    warn!(error = %e, "Stored session metadata unreadable");
                }
                info!("Stored session incomplete, clearing");
                self.store.clear_session()?;
                self.transition(&AuthMachineInput::NoSession)?;
                return Ok(None);
            }
        };

        // An unreadable expiry is treated as expired.
        if self.store.is_session_expired().unwrap_or(true) {
            info!(uid = %meta.uid, "Stored session expired, refreshing");
            self.transition(&AuthMachineInput::SessionExpired)?;

            let refresh_token = self
                .store
                .get_refresh_token()?
                .ok_or_else(|| IdentityError::SessionInvalid("no refresh token".to_string()))?;

            return match self.refresh_with_backoff(&refresh_token).await {
                Ok(_) => {
                    self.transition(&AuthMachineInput::RefreshSuccess)?;
                    let user = ProviderUser::from_meta(&meta);
                    *self.current.write() = Some(user.clone());
                    info!(uid = %user.uid, "Session restored after refresh");
                    Ok(Some(user))
                }
                Err(e) => {
                    warn!(error = %e, "Session refresh failed on restore, clearing session");
                    self.store.clear_session()?;
                    self.transition(&AuthMachineInput::RefreshFailed)?;
                    Err(e)
                }
            };
        }

        self.transition(&AuthMachineInput::TokenNotExpired)?;

        let verified = match self.store.get_id_token()? {
            Some(id_token) => self.lookup(&id_token).await,
            None => Err(IdentityError::SessionInvalid("no ID token".to_string())),
        };

        match verified {
            Ok(user) => {
                self.transition(&AuthMachineInput::ServerVerified)?;
                self.store.set_meta(&IdentitySessionMeta {
                    uid: user.uid.clone(),
                    email: user.email.clone(),
                    display_name: user.display_name.clone(),
                    photo_url: user.photo_url.clone(),
                    expires_at: meta.expires_at.clone(),
                })?;
                *self.current.write() = Some(user.clone());
                info!(uid = %user.uid, "Session restored (verified with provider)");
                Ok(Some(user))
            }
            Err(e) => {
                warn!(uid = %meta.uid, error = %e, "Session verification failed, clearing session");
                self.store.clear_session()?;
                self.transition(&AuthMachineInput::ServerRejected)?;
                Err(e)
            }
        }
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    async fn sign_up(&self, email: &str, password: &str) -> IdentityResult<ProviderUser> {
        self.run_sign_in("sign_up", self.password_flow("signUp", email, password))
            .await
    }

    async fn update_profile(
        &self,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> IdentityResult<ProviderUser> {
        let current = self.current_user().ok_or(IdentityError::NotSignedIn)?;
        let id_token = self.id_token(false).await?.ok_or(IdentityError::NotSignedIn)?;

        let response: ProfileResponse = self
            .post_accounts(
                "update",
                &UpdateProfileRequest {
                    id_token: &id_token,
                    display_name,
                    photo_url,
                    return_secure_token: false,
                },
            )
            .await?;

        let updated = ProviderUser {
            uid: current.uid,
            email: non_empty(response.email).or(current.email),
            display_name: non_empty(response.display_name)
                .or_else(|| display_name.map(str::to_string))
                .or(current.display_name),
            photo_url: non_empty(response.photo_url)
                .or_else(|| photo_url.map(str::to_string))
                .or(current.photo_url),
        };

        if let Some(mut meta) = self.store.get_meta()? {
            meta.display_name = updated.display_name.clone();
            meta.photo_url = updated.photo_url.clone();
            self.store.set_meta(&meta)?;
        }
        *self.current.write() = Some(updated.clone());
        debug!(uid = %updated.uid, "Profile updated");
        Ok(updated)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> IdentityResult<ProviderUser> {
        self.run_sign_in(
            "sign_in_with_password",
            self.password_flow("signInWithPassword", email, password),
        )
        .await
    }

    async fn sign_in_federated(&self, provider: FederatedProvider) -> IdentityResult<ProviderUser> {
        self.run_sign_in("sign_in_federated", self.federated_flow(provider))
            .await
    }

    async fn sign_out(&self) -> IdentityResult<()> {
        if self.current.read().is_none() {
            // Nothing to sign out of; drop any stale tokens quietly.
            self.store.clear_session()?;
            debug!("Sign-out without a session");
            return Ok(());
        }

        self.advance(&AuthMachineInput::SignOutRequested);
        let cleared = self.store.clear_session();
        *self.current.write() = None;
        self.advance(&AuthMachineInput::SignOutComplete);

        info!("Signed out");
        self.hub.publish(None);
        cleared.map_err(IdentityError::from)
    }

    fn current_user(&self) -> Option<ProviderUser> {
        self.current.read().clone()
    }

    fn auth_state(&self) -> AuthState {
        AuthState::from(self.fsm.lock().state())
    }

    fn subscribe(&self) -> SessionChanges {
        self.hub.subscribe()
    }

    async fn id_token(&self, force_refresh: bool) -> IdentityResult<Option<String>> {
        if self.current.read().is_none() {
            return Ok(None);
        }

        if !force_refresh && !self.store.is_session_expired()? {
            if let Some(token) = self.store.get_id_token()? {
                return Ok(Some(token));
            }
        }

        let _guard = self.refresh_lock.lock().await;

        // Signed out while waiting for the lock.
        if self.current.read().is_none() {
            return Ok(None);
        }
        // Another caller may have refreshed while we waited.
        if !force_refresh && !self.store.is_session_expired()? {
            if let Some(token) = self.store.get_id_token()? {
                return Ok(Some(token));
            }
        }

        let Some(refresh_token) = self.store.get_refresh_token()? else {
            let reason = IdentityError::SessionInvalid("no refresh token".to_string());
            self.revoke_session(&AuthMachineInput::SessionRevoked, &reason);
            return Err(reason);
        };

        self.transition(&AuthMachineInput::TokenExpired)?;

        let refreshed = self.refresh_with_backoff(&refresh_token).await;

        if self.current.read().is_none() {
            // Signed out while the refresh was in flight; whatever it
            // persisted belongs to the old session.
            debug!("Signed out during token refresh, discarding result");
            self.store.clear_session()?;
            return Ok(None);
        }

        match refreshed {
            Ok(token) => {
                self.transition(&AuthMachineInput::RefreshSuccess)?;
                Ok(Some(token))
            }
            Err(e) if e.is_transient() => {
                self.advance(&AuthMachineInput::RefreshAbandoned);
                Err(e)
            }
            Err(e) => {
                self.revoke_session(&AuthMachineInput::RefreshFailed, &e);
                Err(e)
            }
        }
    }
}
