//! The public group catalog and the home page's featured groups.

use crate::{PageContext, PageResult};
use group_api_client::{Group, GroupQuery};
use tracing::{debug, warn};

/// Number of groups featured on the home page.
pub const FEATURED_LIMIT: usize = 8;

/// The "all groups" page: one fetch, then client-side search, filter and sort.
pub struct GroupsPage {
    ctx: PageContext,
    groups: Vec<Group>,
    pub query: GroupQuery,
}

impl GroupsPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            groups: Vec::new(),
            query: GroupQuery::default(),
        }
    }

    /// Fetch the catalog. A 404 means no groups and is not reported.
    pub async fn load(&mut self) -> PageResult<()> {
        match self.ctx.api.list_groups().await {
            Ok(groups) => {
                debug!(count = groups.len(), "Groups page loaded");
                self.groups = groups;
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                self.groups.clear();
                Ok(())
            }
            Err(e) => {
                self.groups.clear();
                Err(self.ctx.request_failed(
                    "list_groups",
                    e,
                    "Error fetching groups. Please try again later.",
                ))
            }
        }
    }

    pub fn all(&self) -> &[Group] {
        &self.groups
    }

    /// The catalog after the current query.
    pub fn visible(&self) -> Vec<Group> {
        self.query.apply(&self.groups)
    }
}

/// The first groups of the catalog, for the home page. Failures are logged
/// and yield an empty list.
pub async fn featured_groups(ctx: &PageContext) -> Vec<Group> {
    match ctx.api.list_groups().await {
        Ok(mut groups) => {
            groups.truncate(FEATURED_LIMIT);
            groups
        }
        Err(e) => {
            warn!(error = %e, "Error fetching featured groups");
            Vec::new()
        }
    }
}
