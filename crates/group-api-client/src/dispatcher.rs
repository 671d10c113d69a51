//! Authenticated request dispatcher.
//!
//! Every request gets a freshly minted bearer credential when a session
//! exists and none otherwise. A 401 on an authenticated request is retried
//! with a forced refresh under [`RetryPolicy`]; mutating requests are
//! de-duplicated by [`InFlightGuard`].

use crate::{ApiError, ApiResult, CredentialSource, InFlightGuard, RetryPolicy};
use hub_config_and_utils::Config;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

/// Sends requests to the HobbyHub backend.
pub struct ApiDispatcher {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialSource>,
    retry: RetryPolicy,
    in_flight: InFlightGuard,
}

impl ApiDispatcher {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialSource>,
        request_timeout: Duration,
    ) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            retry: RetryPolicy::default(),
            in_flight: InFlightGuard::new(),
        })
    }

    pub fn from_config(config: &Config, credentials: Arc<dyn CredentialSource>) -> ApiResult<Self> {
        let base_url = config
            .api_url()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        Ok(
            Self::new(base_url.as_str(), credentials, config.request_timeout())?
                .with_retry_policy(RetryPolicy::from(&config.retry)),
        )
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_session(&self) -> bool {
        self.credentials.has_session()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = encode_body(path, body)?;
        self.send(Method::POST, path, Some(&body)).await
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = encode_body(path, body)?;
        self.send(Method::PUT, path, Some(&body)).await
    }

    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.send(Method::DELETE, path, None).await
    }

    /// Dispatch one logical request, retrying 401s per the retry policy.
    pub async fn send<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> ApiResult<R> {
        let _ticket = if method == Method::GET {
            None
        } else {
            Some(self.in_flight.acquire(method.as_str(), path)?)
        };

        let mut attempt: u32 = 0;
        loop {
            // Always a fresh credential; on a retry this is the forced refresh.
            let bearer = if self.credentials.has_session() {
                self.credentials.bearer(true).await?
            } else {
                None
            };

            let mut request = self.http.request(method.clone(), self.url(path));
            if let Some(token) = bearer.as_deref() {
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            debug!(
                method = %method,
                path,
                authenticated = bearer.is_some(),
                attempt,
                "API request"
            );

            let response = request.send().await.map_err(ApiError::Network)?;

            if response.status() == StatusCode::UNAUTHORIZED && bearer.is_some() {
                if attempt >= self.retry.max_retries {
                    warn!(
                        method = %method,
                        path,
                        attempts = attempt + 1,
                        "Request still unauthorized after retries"
                    );
                    return Err(ApiError::Unauthorized {
                        attempts: attempt + 1,
                    });
                }

                let delay = self.retry.delay_for_attempt(attempt);
                warn!(
                    method = %method,
                    path,
                    attempt = attempt + 1,
                    max_retries = self.retry.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "Request unauthorized, refreshing credential and retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            return Self::read_response(response, &method, path).await;
        }
    }

    async fn read_response<R: DeserializeOwned>(
        response: reqwest::Response,
        method: &Method,
        path: &str,
    ) -> ApiResult<R> {
        let status = response.status();
        let text = response.text().await.map_err(ApiError::Network)?;

        if status.is_success() {
            let raw = if text.trim().is_empty() { "null" } else { &text };
            return serde_json::from_str(raw).map_err(|e| ApiError::Decode {
                path: path.to_string(),
                message: e.to_string(),
            });
        }

        match status {
            StatusCode::NOT_FOUND => {
                debug!(method = %method, path, "Resource not found");
                Err(ApiError::NotFound {
                    path: path.to_string(),
                })
            }
            StatusCode::UNAUTHORIZED => {
                warn!(method = %method, path, "Request unauthorized without a session");
                Err(ApiError::Unauthorized { attempts: 1 })
            }
            _ => {
                let message = serde_json::from_str::<MessageBody>(&text)
                    .ok()
                    .map(|b| b.message);
                warn!(
                    method = %method,
                    path,
                    status = status.as_u16(),
                    message = message.as_deref().unwrap_or_default(),
                    "API request failed"
                );
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

fn encode_body<B: Serialize + ?Sized>(path: &str, body: &B) -> ApiResult<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(format!("{}: {}", path, e)))
}

impl std::fmt::Debug for ApiDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiDispatcher")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
