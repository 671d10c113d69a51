//! HobbyHub backend client.
//!
//! [`ApiDispatcher`] attaches bearer credentials, retries authorization
//! failures under one [`RetryPolicy`], and rejects duplicate in-flight
//! mutations. [`HubApiClient`] layers the typed endpoints on top; the
//! [`catalog`] and [`dashboard`] modules hold the client-side list logic.

pub mod catalog;
mod client;
mod credentials;
pub mod dashboard;
mod dispatcher;
mod error;
mod guard;
pub mod models;
mod retry;

pub use catalog::{GroupQuery, SortKey, SortOrder, ALL_CATEGORIES, CATEGORIES};
pub use client::HubApiClient;
pub use credentials::{Anonymous, CredentialSource, IdentityCredentials};
pub use dashboard::{merge_my_groups, DashboardStats};
pub use dispatcher::ApiDispatcher;
pub use error::{ApiError, ApiResult};
pub use guard::{InFlightGuard, InFlightTicket};
pub use models::{DraftError, Group, GroupDraft, Member, UserProfile, UserUpsert};
pub use retry::RetryPolicy;
