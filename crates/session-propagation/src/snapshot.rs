//! Immutable session snapshots and the events that move between them.

use crate::SessionPrincipal;
use group_api_client::UserProfile;
use std::sync::Arc;

/// A discrete change to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(SessionPrincipal),
    SignedOut,
    /// Backend profile for the principal with this uid.
    ProfileEnriched { uid: String, profile: UserProfile },
    /// The backend profile attempt for this uid finished, either way.
    EnrichmentSettled { uid: String },
}

/// The session as of one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    principal: Option<Arc<SessionPrincipal>>,
    initialized: bool,
}

impl SessionSnapshot {
    pub fn principal(&self) -> Option<&SessionPrincipal> {
        self.principal.as_deref()
    }

    /// True once the first provider notification has been handled: a
    /// sign-out, or a sign-in whose profile attempt has settled.
    pub fn initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_signed_in(&self) -> bool {
        self.principal.is_some()
    }

    pub fn uid(&self) -> Option<&str> {
        self.principal().map(|p| p.uid.as_str())
    }

    /// Backend id of the signed-in user, once enriched.
    pub fn backend_id(&self) -> Option<&str> {
        self.principal().and_then(|p| p.backend_id.as_deref())
    }

    /// Apply an event, producing the next snapshot.
    ///
    /// Enrichment for a uid other than the current principal's is stale and
    /// ignored.
    pub fn apply(&self, event: &SessionEvent) -> SessionSnapshot {
        match event {
            SessionEvent::SignedIn(principal) => SessionSnapshot {
                principal: Some(Arc::new(principal.clone())),
                initialized: self.initialized,
            },
            SessionEvent::SignedOut => SessionSnapshot {
                principal: None,
                initialized: true,
            },
            SessionEvent::ProfileEnriched { uid, profile } => match self.principal() {
                Some(current) if current.uid == *uid => SessionSnapshot {
                    principal: Some(Arc::new(current.enriched(profile))),
                    initialized: self.initialized,
                },
                _ => self.clone(),
            },
            SessionEvent::EnrichmentSettled { uid } => match self.principal() {
                Some(current) if current.uid == *uid => SessionSnapshot {
                    principal: self.principal.clone(),
                    initialized: true,
                },
                _ => self.clone(),
            },
        }
    }
}
