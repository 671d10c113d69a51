use crate::{PageError, PageResult};
use group_api_client::{ApiError, HubApiClient};
use session_propagation::{
    guard, GuardDecision, Navigator, Notice, Notifier, SessionContext, SessionPrincipal,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// What every page controller works with.
#[derive(Clone)]
pub struct PageContext {
    pub api: Arc<HubApiClient>,
    pub session: Arc<SessionContext>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
}

impl PageContext {
    pub fn new(
        api: Arc<HubApiClient>,
        session: Arc<SessionContext>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            session,
            notifier,
            navigator,
        }
    }

    /// Run the route guard for a protected page. Without a session this
    /// navigates to the login page and fails with `SignInRequired`.
    pub async fn require_session(&self, path: &str) -> PageResult<SessionPrincipal> {
        let snapshot = self.session.wait_initialized().await;
        match guard(&snapshot, path) {
            GuardDecision::Redirect { to, from } => {
                debug!(from = %from, to = %to, "Protected page needs sign-in");
                self.navigator.navigate(&to);
                Err(PageError::SignInRequired { from })
            }
            GuardDecision::Allow | GuardDecision::Loading => {
                snapshot
                    .principal()
                    .cloned()
                    .ok_or_else(|| PageError::SignInRequired {
                        from: path.to_string(),
                    })
            }
        }
    }

    /// Backend id of the signed-in user, once the profile has been fetched.
    pub fn user_id(&self) -> Option<String> {
        self.session.snapshot().backend_id().map(str::to_string)
    }

    pub fn success(&self, message: &str) {
        self.notifier.notify(Notice::success(message));
    }

    pub fn error(&self, message: &str) {
        self.notifier.notify(Notice::error(message));
    }

    /// Show the server's message when it sent one, otherwise `fallback`.
    pub(crate) fn api_failure(&self, operation: &str, error: ApiError, fallback: &str) -> PageError {
        warn!(operation, error = %error, "Request failed");
        self.error(error.server_message().unwrap_or(fallback));
        PageError::Api(error)
    }

    /// Show `message` whatever the server said.
    pub(crate) fn request_failed(&self, operation: &str, error: ApiError, message: &str) -> PageError {
        warn!(operation, error = %error, "Request failed");
        self.error(message);
        PageError::Api(error)
    }
}
