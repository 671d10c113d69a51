#![allow(dead_code)]

use async_trait::async_trait;
use group_api_client::{ApiDispatcher, HubApiClient, IdentityCredentials, RetryPolicy};
use identity_engine::{
    AuthState, FederatedProvider, IdentityError, IdentityProvider, IdentityResult, ProviderUser,
    SessionChangeHub, SessionChanges,
};
use page_controllers::PageContext;
use parking_lot::Mutex;
use session_propagation::{NavigationLog, NoticeLog, SessionContext, SessionDeps};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Identity provider with a fixed session that mints `token-1`, `token-2`, ...
#[derive(Default)]
pub struct StaticIdentity {
    hub: SessionChangeHub,
    user: Mutex<Option<ProviderUser>>,
    minted: AtomicU32,
}

impl StaticIdentity {
    pub fn new(user: Option<ProviderUser>) -> Arc<Self> {
        let identity = Self::default();
        *identity.user.lock() = user.clone();
        identity.hub.publish(user);
        Arc::new(identity)
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn sign_up(&self, _email: &str, _password: &str) -> IdentityResult<ProviderUser> {
        Err(IdentityError::EmailInUse)
    }

    async fn update_profile(
        &self,
        _display_name: Option<&str>,
        _photo_url: Option<&str>,
    ) -> IdentityResult<ProviderUser> {
        self.user.lock().clone().ok_or(IdentityError::NotSignedIn)
    }

    async fn sign_in_with_password(
        &self,
        _email: &str,
        _password: &str,
    ) -> IdentityResult<ProviderUser> {
        Err(IdentityError::InvalidCredentials)
    }

    async fn sign_in_federated(&self, _provider: FederatedProvider) -> IdentityResult<ProviderUser> {
        Err(IdentityError::FederatedCancelled)
    }

    async fn sign_out(&self) -> IdentityResult<()> {
        if self.user.lock().take().is_some() {
            self.hub.publish(None);
        }
        Ok(())
    }

    fn current_user(&self) -> Option<ProviderUser> {
        self.user.lock().clone()
    }

    fn auth_state(&self) -> AuthState {
        if self.user.lock().is_some() {
            AuthState::SignedIn
        } else {
            AuthState::NotSignedIn
        }
    }

    fn subscribe(&self) -> SessionChanges {
        self.hub.subscribe()
    }

    async fn id_token(&self, _force_refresh: bool) -> IdentityResult<Option<String>> {
        if self.user.lock().is_none() {
            return Ok(None);
        }
        let n = self.minted.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Some(format!("token-{n}")))
    }
}

pub fn ada() -> ProviderUser {
    ProviderUser {
        uid: "uid-ada".to_string(),
        email: Some("ada@example.com".to_string()),
        display_name: Some("Ada".to_string()),
        photo_url: None,
    }
}

pub struct Harness {
    pub server: MockServer,
    pub notices: Arc<NoticeLog>,
    pub navigation: Arc<NavigationLog>,
    pub ctx: PageContext,
}

impl Harness {
    /// Signed in as Ada, whose backend id is `u1`.
    pub async fn signed_in() -> Self {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "_id": "u1",
                "name": "Ada",
                "email": "ada@example.com",
                "uid": "uid-ada"
            })))
            .mount(&server)
            .await;

        let harness = Self::start(server, Some(ada())).await;
        let mut rx = harness.ctx.session.subscribe();
        tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| s.backend_id().is_some()))
            .await
            .expect("profile enrichment timed out")
            .expect("session closed");
        harness
    }

    /// Ada's session restored, with the profile answered after `delay`.
    /// Returns straight away, before the session has initialized.
    pub async fn restoring_with_slow_profile(delay: Duration) -> Self {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/profile"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "_id": "u1",
                        "name": "Ada",
                        "uid": "uid-ada"
                    }))
                    .set_delay(delay),
            )
            .mount(&server)
            .await;
        Self::start(server, Some(ada())).await
    }

    pub async fn signed_out() -> Self {
        let server = MockServer::start().await;
        let harness = Self::start(server, None).await;
        harness.ctx.session.wait_initialized().await;
        harness
    }

    async fn start(server: MockServer, user: Option<ProviderUser>) -> Self {
        let identity = StaticIdentity::new(user);
        let dispatcher = ApiDispatcher::new(
            server.uri(),
            Arc::new(IdentityCredentials::new(identity.clone())),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_retry_policy(RetryPolicy {
            max_retries: 3,
            initial_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
        });
        let api = Arc::new(HubApiClient::new(dispatcher));

        let notices = Arc::new(NoticeLog::new());
        let navigation = Arc::new(NavigationLog::new());
        let session = SessionContext::start(SessionDeps {
            identity,
            profiles: api.clone(),
            notifier: notices.clone(),
            navigator: navigation.clone(),
            default_photo_url: "https://img.test/default.png".to_string(),
        });

        let ctx = PageContext::new(api, session, notices.clone(), navigation.clone());
        Self {
            server,
            notices,
            navigation,
            ctx,
        }
    }

    pub fn notice_messages(&self) -> Vec<String> {
        self.notices
            .notices()
            .into_iter()
            .map(|n| n.message)
            .collect()
    }
}

pub fn group_json(id: &str, members: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "name": format!("Group {id}"),
        "description": "A friendly meetup",
        "imageURL": "https://img.test/group.png",
        "category": "Art",
        "location": "Lisbon",
        "maxMembers": 10,
        "startDate": "2099-05-01T18:00:00.000Z",
        "members": members
            .iter()
            .map(|m| serde_json::json!({ "_id": m, "name": m }))
            .collect::<Vec<_>>(),
        "creator": { "_id": "creator", "name": "Creator" },
        "createdAt": "2024-01-01T00:00:00.000Z"
    })
}
