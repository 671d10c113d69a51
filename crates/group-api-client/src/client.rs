//! Typed HobbyHub endpoints.

use crate::models::{Group, GroupDraft, UserProfile, UserUpsert};
use crate::{ApiDispatcher, ApiError, ApiResult};
use serde::de::IgnoredAny;
use tracing::{debug, info};

/// Typed access to the HobbyHub backend.
#[derive(Debug)]
pub struct HubApiClient {
    dispatcher: ApiDispatcher,
}

impl HubApiClient {
    pub fn new(dispatcher: ApiDispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &ApiDispatcher {
        &self.dispatcher
    }

    fn group_path(id: &str) -> ApiResult<String> {
        if id.is_empty() || id.contains(|c: char| matches!(c, '/' | '?' | '#')) {
            return Err(ApiError::InvalidRequest(format!("invalid group id: {:?}", id)));
        }
        Ok(format!("/api/groups/{}", id))
    }

    /// `GET /api/groups`. Public.
    pub async fn list_groups(&self) -> ApiResult<Vec<Group>> {
        let groups: Option<Vec<Group>> = self.dispatcher.get("/api/groups").await?;
        let groups = groups.unwrap_or_default();
        debug!(count = groups.len(), "Fetched groups");
        Ok(groups)
    }

    pub async fn get_group(&self, id: &str) -> ApiResult<Group> {
        self.dispatcher.get(&Self::group_path(id)?).await
    }

    pub async fn create_group(&self, draft: &GroupDraft) -> ApiResult<Group> {
        draft
            .validate()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let group: Group = self.dispatcher.post("/api/groups", draft).await?;
        info!(group_id = %group.id, "Group created");
        Ok(group)
    }

    pub async fn update_group(&self, id: &str, draft: &GroupDraft) -> ApiResult<Group> {
        draft
            .validate()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let group: Group = self.dispatcher.put(&Self::group_path(id)?, draft).await?;
        info!(group_id = %group.id, "Group updated");
        Ok(group)
    }

    pub async fn delete_group(&self, id: &str) -> ApiResult<()> {
        let _: IgnoredAny = self.dispatcher.delete(&Self::group_path(id)?).await?;
        info!(group_id = id, "Group deleted");
        Ok(())
    }

    /// Returns the group as it stands after joining.
    pub async fn join_group(&self, id: &str) -> ApiResult<Group> {
        let path = format!("{}/join", Self::group_path(id)?);
        let group: Group = self.dispatcher.post(&path, &serde_json::json!({})).await?;
        info!(group_id = id, members = group.member_count(), "Joined group");
        Ok(group)
    }

    pub async fn leave_group(&self, id: &str) -> ApiResult<Group> {
        let path = format!("{}/leave", Self::group_path(id)?);
        let group: Group = self.dispatcher.post(&path, &serde_json::json!({})).await?;
        info!(group_id = id, members = group.member_count(), "Left group");
        Ok(group)
    }

    /// Groups the signed-in user created.
    pub async fn created_groups(&self) -> ApiResult<Vec<Group>> {
        let groups: Option<Vec<Group>> = self.dispatcher.get("/api/groups/user/created").await?;
        Ok(groups.unwrap_or_default())
    }

    /// Groups the signed-in user joined.
    pub async fn joined_groups(&self) -> ApiResult<Vec<Group>> {
        let groups: Option<Vec<Group>> = self.dispatcher.get("/api/groups/user/joined").await?;
        Ok(groups.unwrap_or_default())
    }

    pub async fn create_or_update_user(&self, user: &UserUpsert) -> ApiResult<UserProfile> {
        let profile: UserProfile = self
            .dispatcher
            .post("/api/users/create-or-update", user)
            .await?;
        debug!(user_id = %profile.id, "User profile synced");
        Ok(profile)
    }

    pub async fn user_profile(&self) -> ApiResult<UserProfile> {
        self.dispatcher.get("/api/users/profile").await
    }
}
