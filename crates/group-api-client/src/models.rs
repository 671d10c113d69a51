//! Wire models for the HobbyHub REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A user record as the backend returns it, both from `/api/users/*` and
/// populated into a group's `members` and `creator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
    /// Identity-provider uid. Omitted in some populated records.
    #[serde(default)]
    pub uid: Option<String>,
}

pub type Member = UserProfile;

/// Body of `POST /api/users/create-or-update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpsert {
    pub name: String,
    pub email: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
    pub uid: String,
}

/// A hobby group. Owned by the server; the client only renders snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "imageURL", default)]
    pub image_url: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    pub max_members: u32,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub creator: Option<Member>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Group {
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.max_members as usize
    }

    pub fn is_upcoming(&self) -> bool {
        self.is_upcoming_at(Utc::now())
    }

    pub fn is_upcoming_at(&self, now: DateTime<Utc>) -> bool {
        self.start_date > now
    }

    /// `user_id` is the backend `_id`, not the provider uid.
    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m.id == user_id)
    }

    pub fn is_creator(&self, user_id: &str) -> bool {
        self.creator.as_ref().is_some_and(|c| c.id == user_id)
    }
}

/// Client-side validation failures for a group draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Name is required")]
    MissingName,
    #[error("Description is required")]
    MissingDescription,
    #[error("Location is required")]
    MissingLocation,
    #[error("Start date is required")]
    MissingStartDate,
    #[error("Maximum members must be at least 2")]
    TooFewMembers,
    #[error("Group image is required (either URL or upload)")]
    MissingImage,
}

/// Body of `POST /api/groups` and `PUT /api/groups/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub max_members: u32,
    pub start_date: Option<DateTime<Utc>>,
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

impl Default for GroupDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            category: String::new(),
            location: String::new(),
            max_members: 10,
            start_date: None,
            image_url: String::new(),
        }
    }
}

impl GroupDraft {
    /// Prefill a draft from an existing group, for editing.
    pub fn from_group(group: &Group) -> Self {
        Self {
            name: group.name.clone(),
            description: group.description.clone(),
            category: group.category.clone(),
            location: group.location.clone(),
            max_members: group.max_members,
            start_date: Some(group.start_date),
            image_url: group.image_url.clone(),
        }
    }

    /// Checks fields in form order and reports the first failure.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.name.trim().is_empty() {
            return Err(DraftError::MissingName);
        }
        if self.description.trim().is_empty() {
            return Err(DraftError::MissingDescription);
        }
        if self.location.trim().is_empty() {
            return Err(DraftError::MissingLocation);
        }
        if self.start_date.is_none() {
            return Err(DraftError::MissingStartDate);
        }
        if self.max_members < 2 {
            return Err(DraftError::TooFewMembers);
        }
        if self.image_url.trim().is_empty() {
            return Err(DraftError::MissingImage);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn member(id: &str) -> Member {
        UserProfile {
            id: id.to_string(),
            name: format!("user {id}"),
            email: None,
            photo_url: None,
            uid: None,
        }
    }

    fn valid_draft() -> GroupDraft {
        GroupDraft {
            name: "Sketch Club".to_string(),
            description: "Weekly figure drawing".to_string(),
            category: "Art".to_string(),
            location: "Lisbon".to_string(),
            max_members: 8,
            start_date: Some(Utc.with_ymd_and_hms(2030, 5, 1, 18, 0, 0).unwrap()),
            image_url: "https://img.test/sketch.png".to_string(),
        }
    }

    #[test]
    fn decodes_populated_group() {
        let json = r#"{
            "_id": "g1",
            "name": "Sketch Club",
            "description": "Weekly figure drawing",
            "imageURL": "https://img.test/sketch.png",
            "category": "Art",
            "location": "Lisbon",
            "maxMembers": 2,
            "startDate": "2030-05-01T18:00:00.000Z",
            "members": [{"_id": "u1", "name": "Ada", "photoURL": "https://img.test/ada.png"}],
            "creator": {"_id": "u1", "name": "Ada"},
            "createdAt": "2024-01-02T03:04:05.000Z",
            "__v": 0
        }"#;
        let group: Group = serde_json::from_str(json).unwrap();

        assert_eq!(group.id, "g1");
        assert_eq!(group.max_members, 2);
        assert_eq!(group.members[0].photo_url.as_deref(), Some("https://img.test/ada.png"));
        assert!(group.is_creator("u1"));
        assert!(group.is_member("u1"));
        assert!(!group.is_member("u2"));
        assert!(!group.is_full());
    }

    #[test]
    fn full_and_upcoming_predicates() {
        let start = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let group = Group {
            id: "g1".to_string(),
            name: "Chess".to_string(),
            description: String::new(),
            image_url: String::new(),
            category: "Gaming".to_string(),
            location: "Porto".to_string(),
            max_members: 2,
            start_date: start,
            members: vec![member("a"), member("b")],
            creator: None,
            created_at: None,
        };

        assert!(group.is_full());
        assert!(!group.is_creator("a"));
        assert!(group.is_upcoming_at(start - chrono::Duration::days(1)));
        assert!(!group.is_upcoming_at(start));
    }

    #[test]
    fn draft_validation_reports_first_failure() {
        assert_eq!(valid_draft().validate(), Ok(()));

        let mut draft = valid_draft();
        draft.name = "  ".to_string();
        draft.location = String::new();
        assert_eq!(draft.validate(), Err(DraftError::MissingName));

        let mut draft = valid_draft();
        draft.location = " ".to_string();
        assert_eq!(draft.validate().unwrap_err().to_string(), "Location is required");

        let mut draft = valid_draft();
        draft.start_date = None;
        assert_eq!(draft.validate(), Err(DraftError::MissingStartDate));

        let mut draft = valid_draft();
        draft.max_members = 1;
        assert_eq!(
            draft.validate().unwrap_err().to_string(),
            "Maximum members must be at least 2"
        );

        let mut draft = valid_draft();
        draft.image_url = String::new();
        assert_eq!(
            draft.validate().unwrap_err().to_string(),
            "Group image is required (either URL or upload)"
        );
    }

    #[test]
    fn draft_serializes_with_wire_names() {
        let value = serde_json::to_value(valid_draft()).unwrap();
        assert_eq!(value["maxMembers"], 8);
        assert_eq!(value["imageURL"], "https://img.test/sketch.png");
        assert_eq!(value["startDate"], "2030-05-01T18:00:00Z");
    }

    #[test]
    fn upsert_uses_photo_url_wire_name() {
        let body = UserUpsert {
            name: "Ada".to_string(),
            email: Some("ada@example.com".to_string()),
            photo_url: "https://img.test/ada.png".to_string(),
            uid: "uid-ada".to_string(),
        };
        let value = serde_json::to_value(body).unwrap();
        assert_eq!(value["photoURL"], "https://img.test/ada.png");
        assert_eq!(value["uid"], "uid-ada");
    }
}
