#![allow(dead_code)]

use async_trait::async_trait;
use group_api_client::{ApiDispatcher, ApiError, ApiResult, CredentialSource, HubApiClient, RetryPolicy};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

/// Credential source that mints `token-1`, `token-2`, ... on each call.
pub struct FakeCredentials {
    signed_in: AtomicBool,
    minted: AtomicU32,
    fail: AtomicBool,
}

impl FakeCredentials {
    pub fn signed_in() -> Arc<Self> {
        Arc::new(Self {
            signed_in: AtomicBool::new(true),
            minted: AtomicU32::new(0),
            fail: AtomicBool::new(false),
        })
    }

    pub fn signed_out() -> Arc<Self> {
        let creds = Self::signed_in();
        creds.signed_in.store(false, Ordering::SeqCst);
        creds
    }

    pub fn minted(&self) -> u32 {
        self.minted.load(Ordering::SeqCst)
    }

    pub fn fail_minting(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CredentialSource for FakeCredentials {
    fn has_session(&self) -> bool {
        self.signed_in.load(Ordering::SeqCst)
    }

    async fn bearer(&self, _force_refresh: bool) -> ApiResult<Option<String>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ApiError::Credential("refresh rejected".to_string()));
        }
        if !self.has_session() {
            return Ok(None);
        }
        let n = self.minted.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Some(format!("token-{n}")))
    }
}

pub fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        initial_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(20),
    }
}

pub fn client(server: &MockServer, creds: Arc<FakeCredentials>) -> HubApiClient {
    let dispatcher = ApiDispatcher::new(server.uri(), creds, Duration::from_secs(5))
        .unwrap()
        .with_retry_policy(fast_retry(3));
    HubApiClient::new(dispatcher)
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
        "startDate": "2030-05-01T18:00:00.000Z",
        "members": members
            .iter()
            .map(|m| serde_json::json!({ "_id": m, "name": m }))
            .collect::<Vec<_>>(),
        "creator": { "_id": "creator", "name": "Creator" },
        "createdAt": "2024-01-01T00:00:00.000Z"
    })
}
