//! The session context: one owner for "who is signed in".
//!
//! A listener task turns identity-provider notifications into
//! [`SessionEvent`]s and publishes each resulting [`SessionSnapshot`] on a
//! watch channel. Everything else reads snapshots.

use crate::{
    guard, GuardDecision, Navigator, Notice, Notifier, ProfileDirectory, SessionError,
    SessionEvent, SessionPrincipal, SessionResult, SessionSnapshot, HOME_PATH, LOGIN_PATH,
};
use group_api_client::UserUpsert;
use identity_engine::{FederatedProvider, IdentityProvider, ProviderUser, SessionChanges};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Password rules for new accounts, checked in this order.
pub fn validate_password(password: &str) -> Result<(), String> {
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err("Password must contain at least one lowercase letter".to_string());
    }
    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }
    Ok(())
}

/// Registration form.
#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub photo_url: Option<String>,
}

/// Result of a successful sign-up or sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthOutcome {
    pub principal: SessionPrincipal,
    /// False when the backend profile could not be created or updated. The
    /// user stays signed in either way.
    pub profile_synced: bool,
    pub redirect: String,
}

/// Collaborators of a [`SessionContext`].
pub struct SessionDeps {
    pub identity: Arc<dyn IdentityProvider>,
    pub profiles: Arc<dyn ProfileDirectory>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    pub default_photo_url: String,
}

pub struct SessionContext {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileDirectory>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    default_photo_url: String,
    state: Arc<watch::Sender<SessionSnapshot>>,
    listener: Mutex<Option<JoinHandle<()>>>,
    settle_timeout: Duration,
}

impl SessionContext {
    /// Subscribe to the identity provider and start the listener task.
    /// Must be called inside a Tokio runtime.
    pub fn start(deps: SessionDeps) -> Arc<Self> {
        Self::start_with_settle_timeout(deps, DEFAULT_SETTLE_TIMEOUT)
    }

    /// Like [`SessionContext::start`], with a custom bound on how long an
    /// operation waits for its own provider notification to land.
    pub fn start_with_settle_timeout(deps: SessionDeps, settle_timeout: Duration) -> Arc<Self> {
        let (tx, _) = watch::channel(SessionSnapshot::default());
        let state = Arc::new(tx);

        let changes = deps.identity.subscribe();
        let handle = tokio::spawn(run_listener(
            changes,
            Arc::clone(&state),
            Arc::clone(&deps.profiles),
        ));

        Arc::new(Self {
            identity: deps.identity,
            profiles: deps.profiles,
            notifier: deps.notifier,
            navigator: deps.navigator,
            default_photo_url: deps.default_photo_url,
            state,
            listener: Mutex::new(Some(handle)),
            settle_timeout,
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Wait until the first provider notification has been handled. For a
    /// restored user that includes the backend profile attempt.
    pub async fn wait_initialized(&self) -> SessionSnapshot {
        let mut rx = self.state.subscribe();
        rx.wait_for(|s| s.initialized())
            .await
            .map(|snapshot| snapshot.clone())
            .unwrap_or_else(|_| self.snapshot())
    }

    pub fn guard(&self, path: &str) -> GuardDecision {
        guard(&self.snapshot(), path)
    }

    /// Apply an event to the current snapshot and publish the result.
    pub fn dispatch(&self, event: SessionEvent) {
        publish(&self.state, &event);
    }

    pub fn identity(&self) -> &Arc<dyn IdentityProvider> {
        &self.identity
    }

    /// Stop listening for provider notifications.
    pub fn shutdown(&self) {
        if let Some(handle) = self.listener.lock().take() {
            handle.abort();
        }
    }

    pub async fn sign_up(&self, form: &SignUpForm) -> SessionResult<AuthOutcome> {
        if let Err(message) = validate_password(&form.password) {
            self.notifier.notify(Notice::error(message.clone()));
            return Err(SessionError::Validation(message));
        }

        let user = match self.identity.sign_up(&form.email, &form.password).await {
            Ok(user) => user,
            Err(e) => return Err(self.fail("sign_up", e.into())),
        };

        let photo = form
            .photo_url
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(&self.default_photo_url);
        let user = match self.identity.update_profile(Some(&form.name), Some(photo)).await {
            Ok(updated) => updated,
            Err(e) => return Err(self.fail("sign_up", e.into())),
        };

        // The provider announced the account before its profile was set.
        self.settle_on(&user.uid).await;
        self.dispatch(SessionEvent::SignedIn(SessionPrincipal::from_provider(&user)));

        Ok(self
            .complete_sign_in(&user, "Successfully signed up!", HOME_PATH.to_string())
            .await)
    }

    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        redirect: Option<&str>,
    ) -> SessionResult<AuthOutcome> {
        match self.identity.sign_in_with_password(email, password).await {
            Ok(user) => {
                self.settle_on(&user.uid).await;
                Ok(self
                    .complete_sign_in(&user, "Logged in successfully!", redirect_target(redirect))
                    .await)
            }
            Err(e) => Err(self.fail("sign_in", e.into())),
        }
    }

    pub async fn federated_sign_in(
        &self,
        provider: FederatedProvider,
        redirect: Option<&str>,
    ) -> SessionResult<AuthOutcome> {
        match self.identity.sign_in_federated(provider).await {
            Ok(user) => {
                self.settle_on(&user.uid).await;
                Ok(self
                    .complete_sign_in(&user, "Logged in successfully!", redirect_target(redirect))
                    .await)
            }
            Err(e) => Err(self.fail("federated_sign_in", e.into())),
        }
    }

    /// Sign out. Succeeds without a session.
    pub async fn sign_out(&self) -> SessionResult<()> {
        match self.identity.sign_out().await {
            Ok(()) => {
                self.settle(|s| !s.is_signed_in()).await;
                info!("Signed out");
                self.notifier.notify(Notice::success("Successfully logged out!"));
                self.navigator.navigate(LOGIN_PATH);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Sign-out failed");
                self.notifier.notify(Notice::error("Failed to log out"));
                Err(e.into())
            }
        }
    }

    async fn complete_sign_in(
        &self,
        user: &ProviderUser,
        success_message: &str,
        redirect: String,
    ) -> AuthOutcome {
        let upsert = UserUpsert {
            name: user
                .display_name
                .clone()
                .unwrap_or_else(|| "User".to_string()),
            email: user.email.clone(),
            photo_url: user
                .photo_url
                .clone()
                .unwrap_or_else(|| self.default_photo_url.clone()),
            uid: user.uid.clone(),
        };

        let profile_synced = match self.profiles.sync_profile(&upsert).await {
            Ok(profile) => {
                debug!(uid = %user.uid, user_id = %profile.id, "Backend profile synced");
                self.dispatch(SessionEvent::ProfileEnriched {
                    uid: user.uid.clone(),
                    profile,
                });
                true
            }
            Err(e) => {
                warn!(uid = %user.uid, error = %e, "Backend profile sync failed; user stays signed in");
                false
            }
        };

        self.notifier.notify(Notice::success(success_message));
        self.navigator.navigate(&redirect);

        let principal = self
            .snapshot()
            .principal()
            .filter(|p| p.uid == user.uid)
            .cloned()
            .unwrap_or_else(|| SessionPrincipal::from_provider(user));

        AuthOutcome {
            principal,
            profile_synced,
            redirect,
        }
    }

    fn fail(&self, operation: &str, error: SessionError) -> SessionError {
        warn!(operation, error = %error, "Authentication failed");
        self.notifier.notify(Notice::error(error.user_message()));
        error
    }

    async fn settle_on(&self, uid: &str) {
        self.settle(|s| s.uid() == Some(uid)).await;
    }

    /// Wait for the listener to publish a snapshot matching `condition`.
    async fn settle<F>(&self, condition: F)
    where
        F: FnMut(&SessionSnapshot) -> bool,
    {
        let mut rx = self.state.subscribe();
        let settled = tokio::time::timeout(self.settle_timeout, async {
            rx.wait_for(condition).await.is_ok()
        })
        .await;
        if !matches!(settled, Ok(true)) {
            warn!(
                timeout_ms = self.settle_timeout.as_millis() as u64,
                "Session change did not arrive in time"
            );
        }
    }
}

impl Drop for SessionContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Post-login destination: the preserved origin path, or home.
fn redirect_target(redirect: Option<&str>) -> String {
    match redirect {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && path != LOGIN_PATH => {
            path.to_string()
        }
        _ => HOME_PATH.to_string(),
    }
}

fn publish(state: &watch::Sender<SessionSnapshot>, event: &SessionEvent) {
    state.send_modify(|snapshot| *snapshot = snapshot.apply(event));
}

async fn run_listener(
    mut changes: SessionChanges,
    state: Arc<watch::Sender<SessionSnapshot>>,
    profiles: Arc<dyn ProfileDirectory>,
) {
    // Dropped with the listener, which aborts any enrichment still running.
    let mut enrichments = JoinSet::new();

    while let Some(change) = changes.next().await {
        while enrichments.try_join_next().is_some() {}

        match change {
            Some(user) => {
                debug!(uid = %user.uid, "Provider reports signed-in user");
                publish(&state, &SessionEvent::SignedIn(SessionPrincipal::from_provider(&user)));
                enrichments.spawn(enrich(user.uid, Arc::clone(&state), Arc::clone(&profiles)));
            }
            None => {
                debug!("Provider reports no user");
                publish(&state, &SessionEvent::SignedOut);
            }
        }
    }
    debug!("Session change stream closed");
}

/// Best-effort backend profile fetch for a freshly signed-in uid. Runs off
/// the listener so a later sign-out is never queued behind it; a result for
/// a uid that is no longer current is dropped by the reducer.
async fn enrich(
    uid: String,
    state: Arc<watch::Sender<SessionSnapshot>>,
    profiles: Arc<dyn ProfileDirectory>,
) {
    match profiles.fetch_profile().await {
        Ok(profile) => publish(
            &state,
            &SessionEvent::ProfileEnriched {
                uid: uid.clone(),
                profile,
            },
        ),
        Err(e) => {
            warn!(uid = %uid, error = %e, "Profile fetch failed, using provider principal");
        }
    }
    publish(&state, &SessionEvent::EnrichmentSettled { uid });
}
