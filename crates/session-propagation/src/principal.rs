use group_api_client::UserProfile;
use identity_engine::ProviderUser;
use serde::Serialize;

/// Who is signed in, as the rest of the client sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionPrincipal {
    pub uid: String,
    /// Backend `_id`, known after profile enrichment.
    pub backend_id: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

impl SessionPrincipal {
    pub fn from_provider(user: &ProviderUser) -> Self {
        Self {
            uid: user.uid.clone(),
            backend_id: None,
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            photo_url: user.photo_url.clone(),
        }
    }

    /// Overlay the backend profile. Backend values win where present.
    pub fn enriched(&self, profile: &UserProfile) -> Self {
        let name = Some(profile.name.clone()).filter(|n| !n.trim().is_empty());
        Self {
            uid: self.uid.clone(),
            backend_id: Some(profile.id.clone()),
            display_name: name.or_else(|| self.display_name.clone()),
            email: profile.email.clone().or_else(|| self.email.clone()),
            photo_url: profile.photo_url.clone().or_else(|| self.photo_url.clone()),
        }
    }

    pub fn is_enriched(&self) -> bool {
        self.backend_id.is_some()
    }

    /// Name to greet the user with.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_user() -> ProviderUser {
        ProviderUser {
            uid: "uid-ada".to_string(),
            email: Some("ada@example.com".to_string()),
            display_name: None,
            photo_url: Some("https://img.test/provider.png".to_string()),
        }
    }

    #[test]
    fn enrichment_overlays_backend_fields() {
        let raw = SessionPrincipal::from_provider(&provider_user());
        assert!(!raw.is_enriched());
        assert_eq!(raw.label(), "ada@example.com");

        let enriched = raw.enriched(&UserProfile {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: None,
            photo_url: None,
            uid: Some("uid-ada".to_string()),
        });

        assert_eq!(enriched.backend_id.as_deref(), Some("u1"));
        assert_eq!(enriched.label(), "Ada");
        assert_eq!(enriched.email.as_deref(), Some("ada@example.com"));
        assert_eq!(enriched.photo_url.as_deref(), Some("https://img.test/provider.png"));
    }
}
