//! Session propagation for the HobbyHub client.
//!
//! [`SessionContext`] is the single source of truth for who is signed in.
//! It publishes immutable [`SessionSnapshot`]s driven by discrete
//! [`SessionEvent`]s, runs the sign-up/sign-in/sign-out flows, and guards
//! protected routes.

mod context;
mod directory;
mod effects;
mod error;
mod principal;
mod routes;
mod snapshot;

pub use context::{validate_password, AuthOutcome, SessionContext, SessionDeps, SignUpForm};
pub use directory::ProfileDirectory;
pub use effects::{NavigationLog, Navigator, Notice, NoticeLevel, NoticeLog, Notifier};
pub use error::{SessionError, SessionResult};
pub use principal::SessionPrincipal;
pub use routes::{guard, GuardDecision, Route, GROUPS_PATH, HOME_PATH, LOGIN_PATH, MY_GROUPS_PATH};
pub use snapshot::{SessionEvent, SessionSnapshot};
