use async_trait::async_trait;
use group_api_client::{ApiResult, HubApiClient, UserProfile, UserUpsert};

/// Backend user profiles, as the session context needs them.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Profile of the signed-in user.
    async fn fetch_profile(&self) -> ApiResult<UserProfile>;

    /// Create or update the signed-in user's backend record.
    async fn sync_profile(&self, user: &UserUpsert) -> ApiResult<UserProfile>;
}

#[async_trait]
impl ProfileDirectory for HubApiClient {
    async fn fetch_profile(&self) -> ApiResult<UserProfile> {
        self.user_profile().await
    }

    async fn sync_profile(&self, user: &UserUpsert) -> ApiResult<UserProfile> {
        self.create_or_update_user(user).await
    }
}
