use crate::{PageContext, PageResult};
use group_api_client::Group;
use session_propagation::MY_GROUPS_PATH;
use tracing::{debug, info};

/// Groups the signed-in user created, with delete.
pub struct MyGroupsPage {
    ctx: PageContext,
    groups: Vec<Group>,
}

impl MyGroupsPage {
    pub async fn open(ctx: PageContext) -> PageResult<Self> {
        ctx.require_session(MY_GROUPS_PATH).await?;
        let mut page = Self {
            ctx,
            groups: Vec::new(),
        };
        page.load().await?;
        Ok(page)
    }

    /// Refetch. A 404 means the user has created nothing yet.
    pub async fn load(&mut self) -> PageResult<()> {
        match self.ctx.api.created_groups().await {
            Ok(groups) => {
                debug!(count = groups.len(), "Created groups loaded");
                self.groups = groups;
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                self.groups.clear();
                Ok(())
            }
            Err(e) => Err(self.ctx.request_failed("created_groups", e, "Error fetching groups")),
        }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Delete one of the user's groups and drop it from the list.
    pub async fn delete(&mut self, id: &str) -> PageResult<()> {
        match self.ctx.api.delete_group(id).await {
            Ok(()) => {
                self.groups.retain(|g| g.id != id);
                info!(group_id = id, remaining = self.groups.len(), "Group deleted");
                self.ctx.success("Group deleted successfully");
                Ok(())
            }
            Err(e) => Err(self.ctx.request_failed("delete_group", e, "Failed to delete group")),
        }
    }
}
