//! Client routes and the guard in front of the protected ones.

use crate::SessionSnapshot;
use serde::Serialize;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";
pub const GROUPS_PATH: &str = "/groups";
pub const MY_GROUPS_PATH: &str = "/my-groups";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Groups,
    GroupDetails(String),
    CreateGroup,
    UpdateGroup(String),
    MyGroups,
    Dashboard,
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["groups"] => Route::Groups,
            ["groups", id] => Route::GroupDetails(id.to_string()),
            ["create-group"] => Route::CreateGroup,
            ["update-group", id] => Route::UpdateGroup(id.to_string()),
            ["my-groups"] => Route::MyGroups,
            ["dashboard"] => Route::Dashboard,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => HOME_PATH.to_string(),
            Route::Login => LOGIN_PATH.to_string(),
            Route::Register => "/register".to_string(),
            Route::Groups => GROUPS_PATH.to_string(),
            Route::GroupDetails(id) => format!("/groups/{}", id),
            Route::CreateGroup => "/create-group".to_string(),
            Route::UpdateGroup(id) => format!("/update-group/{}", id),
            Route::MyGroups => MY_GROUPS_PATH.to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }

    /// Requires a signed-in user.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::GroupDetails(_)
                | Route::CreateGroup
                | Route::UpdateGroup(_)
                | Route::MyGroups
                | Route::Dashboard
        )
    }
}

/// What to do with a navigation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    /// The session is not known yet.
    Loading,
    Allow,
    /// Go to `to`, remembering `from` for after sign-in.
    Redirect { to: String, from: String },
}

pub fn guard(snapshot: &SessionSnapshot, path: &str) -> GuardDecision {
    if !Route::parse(path).is_protected() {
        return GuardDecision::Allow;
    }
    if !snapshot.initialized() {
        return GuardDecision::Loading;
    }
    if snapshot.is_signed_in() {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect {
            to: LOGIN_PATH.to_string(),
            from: path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SessionEvent, SessionPrincipal};

    fn signed_in() -> SessionSnapshot {
        SessionSnapshot::default().apply(&SessionEvent::SignedIn(SessionPrincipal {
            uid: "uid-ada".to_string(),
            backend_id: None,
            display_name: None,
            email: None,
            photo_url: None,
        }))
        .apply(&SessionEvent::EnrichmentSettled {
            uid: "uid-ada".to_string(),
        })
    }

    #[test]
    fn parses_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/groups"), Route::Groups);
        assert_eq!(Route::parse("/groups/g1"), Route::GroupDetails("g1".to_string()));
        assert_eq!(Route::parse("/update-group/g1/"), Route::UpdateGroup("g1".to_string()));
        assert_eq!(Route::parse("/my-groups?tab=1"), Route::MyGroups);
        assert_eq!(Route::parse("/about"), Route::NotFound);
        assert_eq!(Route::GroupDetails("g1".to_string()).path(), "/groups/g1");
    }

    #[test]
    fn public_routes_always_allowed() {
        let loading = SessionSnapshot::default();
        assert_eq!(guard(&loading, "/groups"), GuardDecision::Allow);
        assert_eq!(guard(&loading, "/login"), GuardDecision::Allow);
    }

    #[test]
    fn protected_route_waits_for_initialization() {
        assert_eq!(guard(&SessionSnapshot::default(), "/dashboard"), GuardDecision::Loading);
    }

    #[test]
    fn signed_out_redirects_with_origin() {
        let signed_out = signed_in().apply(&SessionEvent::SignedOut);
        assert_eq!(
            guard(&signed_out, "/groups/g1"),
            GuardDecision::Redirect {
                to: "/login".to_string(),
                from: "/groups/g1".to_string(),
            }
        );
    }

    #[test]
    fn signed_in_is_allowed() {
        assert_eq!(guard(&signed_in(), "/my-groups"), GuardDecision::Allow);
        assert_eq!(guard(&signed_in(), "/create-group"), GuardDecision::Allow);
    }
}
