//! Create and update forms for groups.

use crate::{PageContext, PageError, PageResult};
use group_api_client::{Group, GroupDraft};
use session_propagation::MY_GROUPS_PATH;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Update(String),
}

pub struct GroupEditor {
    ctx: PageContext,
    mode: EditorMode,
    pub draft: GroupDraft,
}

impl GroupEditor {
    /// An empty form for a new group.
    pub async fn create(ctx: PageContext) -> PageResult<Self> {
        ctx.require_session("/create-group").await?;
        Ok(Self {
            ctx,
            mode: EditorMode::Create,
            draft: GroupDraft::default(),
        })
    }

    /// A form prefilled from an existing group. If the group cannot be
    /// loaded the user is sent to "my groups".
    pub async fn edit(ctx: PageContext, id: &str) -> PageResult<Self> {
        ctx.require_session(&format!("/update-group/{}", id)).await?;

        match ctx.api.get_group(id).await {
            Ok(group) => Ok(Self {
                draft: GroupDraft::from_group(&group),
                ctx,
                mode: EditorMode::Update(id.to_string()),
            }),
            Err(e) => {
                let err = ctx.request_failed("load_group", e, "Error loading group data");
                ctx.navigator.navigate(MY_GROUPS_PATH);
                Err(err)
            }
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    /// Validate and send the draft. Validation failures are reported without
    /// a request.
    pub async fn submit(&self) -> PageResult<Group> {
        if let Err(invalid) = self.draft.validate() {
            self.ctx.error(&invalid.to_string());
            return Err(PageError::Invalid(invalid));
        }

        let (result, done, fallback) = match &self.mode {
            EditorMode::Create => (
                self.ctx.api.create_group(&self.draft).await,
                "Group created successfully!",
                "Error creating group",
            ),
            EditorMode::Update(id) => (
                self.ctx.api.update_group(id, &self.draft).await,
                "Group updated successfully!",
                "Error updating group",
            ),
        };

        match result {
            Ok(group) => {
                self.ctx.success(done);
                self.ctx.navigator.navigate(MY_GROUPS_PATH);
                Ok(group)
            }
            Err(e) => Err(self.ctx.api_failure("submit_group", e, fallback)),
        }
    }
}
