#![allow(dead_code)]

use async_trait::async_trait;
use group_api_client::{ApiError, ApiResult, UserProfile, UserUpsert};
use identity_engine::{
    AuthState, FederatedProvider, IdentityError, IdentityProvider, IdentityResult, ProviderUser,
    SessionChangeHub, SessionChanges,
};
use parking_lot::Mutex;
use session_propagation::{
    NavigationLog, NoticeLog, ProfileDirectory, SessionContext, SessionDeps, SessionSnapshot,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_PHOTO: &str = "https://img.test/default-avatar.png";

/// In-memory identity provider that publishes like the real one.
#[derive(Default)]
pub struct FakeIdentity {
    hub: SessionChangeHub,
    current: Mutex<Option<ProviderUser>>,
    accounts: Mutex<HashMap<String, (String, ProviderUser)>>,
    federated_error: Mutex<Option<String>>,
    fail_sign_out: AtomicBool,
}

impl FakeIdentity {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_account(&self, email: &str, password: &str) -> ProviderUser {
        let user = ProviderUser {
            uid: format!("uid-{email}"),
            email: Some(email.to_string()),
            display_name: None,
            photo_url: None,
        };
        self.accounts
            .lock()
            .insert(email.to_string(), (password.to_string(), user.clone()));
        user
    }

    /// Simulate the startup restore notification.
    pub fn restore(&self, user: Option<ProviderUser>) {
        *self.current.lock() = user.clone();
        self.hub.publish(user);
    }

    pub fn fail_federated_with(&self, code: &str) {
        *self.federated_error.lock() = Some(code.to_string());
    }

    pub fn current_user_name(&self) -> Option<String> {
        self.current.lock().as_ref().and_then(|u| u.display_name.clone())
    }

    pub fn fail_sign_out(&self) {
        self.fail_sign_out.store(true, Ordering::SeqCst);
    }

    fn establish(&self, user: ProviderUser) -> ProviderUser {
        *self.current.lock() = Some(user.clone());
        self.hub.publish(Some(user.clone()));
        user
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_up(&self, email: &str, password: &str) -> IdentityResult<ProviderUser> {
        if self.accounts.lock().contains_key(email) {
            return Err(IdentityError::EmailInUse);
        }
        let user = self.add_account(email, password);
        Ok(self.establish(user))
    }

    async fn update_profile(
        &self,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> IdentityResult<ProviderUser> {
        let mut current = self.current.lock();
        let user = current.as_mut().ok_or(IdentityError::NotSignedIn)?;
        if let Some(name) = display_name {
            user.display_name = Some(name.to_string());
        }
        if let Some(photo) = photo_url {
            user.photo_url = Some(photo.to_string());
        }
        Ok(user.clone())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> IdentityResult<ProviderUser> {
        let account = self.accounts.lock().get(email).cloned();
        match account {
            Some((expected, user)) if expected == password => Ok(self.establish(user)),
            _ => Err(IdentityError::InvalidCredentials),
        }
    }

    async fn sign_in_federated(&self, provider: FederatedProvider) -> IdentityResult<ProviderUser> {
        if let Some(code) = self.federated_error.lock().clone() {
            return Err(IdentityError::from_federated_error(
                provider.as_str(),
                &code,
                "localhost",
            ));
        }
        Ok(self.establish(ProviderUser {
            uid: "uid-google".to_string(),
            email: Some("grace@example.com".to_string()),
            display_name: Some("Grace".to_string()),
            photo_url: Some("https://img.test/grace.png".to_string()),
        }))
    }

    async fn sign_out(&self) -> IdentityResult<()> {
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(IdentityError::NetworkUnavailable);
        }
        let had_session = self.current.lock().take().is_some();
        if had_session {
            self.hub.publish(None);
        }
        Ok(())
    }

    fn current_user(&self) -> Option<ProviderUser> {
        self.current.lock().clone()
    }

    fn auth_state(&self) -> AuthState {
        if self.current.lock().is_some() {
            AuthState::SignedIn
        } else {
            AuthState::NotSignedIn
        }
    }

    fn subscribe(&self) -> SessionChanges {
        self.hub.subscribe()
    }

    async fn id_token(&self, _force_refresh: bool) -> IdentityResult<Option<String>> {
        Ok(self.current.lock().as_ref().map(|u| format!("token-{}", u.uid)))
    }
}

/// Backend profile store with switchable failures.
#[derive(Default)]
pub struct FakeProfiles {
    fail_fetch: AtomicBool,
    fail_sync: AtomicBool,
    fetches: AtomicU32,
    fetch_delay: Mutex<Option<Duration>>,
    synced: Mutex<Vec<UserUpsert>>,
}

impl FakeProfiles {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_fetch(&self) {
        self.fail_fetch.store(true, Ordering::SeqCst);
    }

    /// Make every profile fetch take `delay` before answering.
    pub fn slow_fetch(&self, delay: Duration) {
        *self.fetch_delay.lock() = Some(delay);
    }

    pub fn fail_sync(&self) {
        self.fail_sync.store(true, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn synced(&self) -> Vec<UserUpsert> {
        self.synced.lock().clone()
    }
}

#[async_trait]
impl ProfileDirectory for FakeProfiles {
    async fn fetch_profile(&self) -> ApiResult<UserProfile> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let delay = *self.fetch_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(ApiError::NotFound {
                path: "/api/users/profile".to_string(),
            });
        }
        Ok(UserProfile {
            id: "backend-1".to_string(),
            name: "Backend Name".to_string(),
            email: None,
            photo_url: None,
            uid: None,
        })
    }

    async fn sync_profile(&self, user: &UserUpsert) -> ApiResult<UserProfile> {
        self.synced.lock().push(user.clone());
        if self.fail_sync.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                message: Some("database unavailable".to_string()),
            });
        }
        Ok(UserProfile {
            id: "backend-1".to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            photo_url: Some(user.photo_url.clone()),
            uid: Some(user.uid.clone()),
        })
    }
}

pub struct Harness {
    pub identity: Arc<FakeIdentity>,
    pub profiles: Arc<FakeProfiles>,
    pub notices: Arc<NoticeLog>,
    pub navigation: Arc<NavigationLog>,
    pub context: Arc<SessionContext>,
}

impl Harness {
    pub fn start() -> Self {
        Self::start_with(FakeIdentity::new(), FakeProfiles::new())
    }

    pub fn start_with(identity: Arc<FakeIdentity>, profiles: Arc<FakeProfiles>) -> Self {
        let notices = Arc::new(NoticeLog::new());
        let navigation = Arc::new(NavigationLog::new());
        let context = SessionContext::start_with_settle_timeout(
            SessionDeps {
                identity: identity.clone(),
                profiles: profiles.clone(),
                notifier: notices.clone(),
                navigator: navigation.clone(),
                default_photo_url: DEFAULT_PHOTO.to_string(),
            },
            Duration::from_secs(1),
        );
        Self {
            identity,
            profiles,
            notices,
            navigation,
            context,
        }
    }

    /// Wait (bounded) for a snapshot matching `condition`.
    pub async fn wait_for(&self, condition: impl FnMut(&SessionSnapshot) -> bool) -> SessionSnapshot {
        let mut rx = self.context.subscribe();
        let snapshot = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(condition))
            .await
            .expect("timed out waiting for session snapshot")
            .expect("session state closed")
            .clone();
        snapshot
    }
}
