//! Wiring: config, storage, identity, API client and session context.

use crate::output::{OutputFormat, TerminalNotifier};
use anyhow::{Context, Result};
use group_api_client::{ApiDispatcher, HubApiClient, IdentityCredentials};
use hub_config_and_utils::{Config, Paths};
use hub_storage::IdentitySessionStore;
use identity_engine::{FirebaseIdentity, IdentitySettings};
use page_controllers::PageContext;
use session_propagation::{NavigationLog, SessionContext, SessionDeps};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct App {
    pub format: OutputFormat,
    pub session: Arc<SessionContext>,
    pub pages: PageContext,
}

impl App {
    /// Build the client and restore any persisted session.
    pub async fn start(config: &Config, paths: &Paths, format: OutputFormat) -> Result<Self> {
        paths.ensure_dirs()?;
        let storage = hub_storage::create_storage(paths).context("Failed to open local storage")?;

        let identity = FirebaseIdentity::new(
            IdentitySettings::from_config(config),
            IdentitySessionStore::new(storage),
        )?
        .with_url_opener(Arc::new(|url: &str| {
            println!("Opening {} to continue signing in...", url);
            open::that(url)
        }));
        let identity = Arc::new(identity);

        if let Err(e) = identity.restore_session().await {
            warn!(error = %e, "Stored session could not be restored");
        }

        let dispatcher = ApiDispatcher::from_config(
            config,
            Arc::new(IdentityCredentials::new(identity.clone())),
        )?;
        let api = Arc::new(HubApiClient::new(dispatcher));

        let notifier = Arc::new(TerminalNotifier::new(format));
        let navigation = Arc::new(NavigationLog::new());
        let session = SessionContext::start(SessionDeps {
            identity,
            profiles: api.clone(),
            notifier: notifier.clone(),
            navigator: navigation.clone(),
            default_photo_url: config.default_photo_url.clone(),
        });
        session.wait_initialized().await;
        debug!(signed_in = session.snapshot().is_signed_in(), "Client ready");

        let pages = PageContext::new(api, session.clone(), notifier, navigation);
        Ok(Self {
            format,
            session,
            pages,
        })
    }
}
