use crate::{PageContext, PageResult};
use chrono::Utc;
use group_api_client::{merge_my_groups, ApiResult, DashboardStats, Group};
use serde::Serialize;
use tracing::warn;

/// How many of the user's groups the dashboard lists.
pub const RECENT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub stats: DashboardStats,
    /// Created groups first, then joined ones.
    pub my_groups: Vec<Group>,
}

impl DashboardView {
    pub fn recent(&self) -> &[Group] {
        &self.my_groups[..self.my_groups.len().min(RECENT_LIMIT)]
    }
}

/// Load the dashboard. Failures are logged, never shown; a missing list
/// counts as empty.
pub async fn load_dashboard(ctx: &PageContext) -> PageResult<DashboardView> {
    ctx.require_session("/dashboard").await?;

    let all = empty_if_missing(ctx.api.list_groups().await)?;

    let (created, joined) = tokio::join!(ctx.api.created_groups(), ctx.api.joined_groups());
    let my_groups = merge_my_groups(empty_if_missing(created)?, empty_if_missing(joined)?);

    Ok(DashboardView {
        stats: DashboardStats::compute(&all, &my_groups, Utc::now()),
        my_groups,
    })
}

fn empty_if_missing(result: ApiResult<Vec<Group>>) -> ApiResult<Vec<Group>> {
    match result {
        Err(e) if e.is_not_found() => Ok(Vec::new()),
        Err(e) => {
            warn!(error = %e, "Error fetching dashboard data");
            Err(e)
        }
        ok => ok,
    }
}
