//! The group details page: membership state and the join, leave and
//! delete actions.

use crate::{PageContext, PageResult};
use chrono::{DateTime, Utc};
use group_api_client::Group;
use serde::Serialize;
use session_propagation::{GROUPS_PATH, MY_GROUPS_PATH};
use tracing::info;

/// The primary action offered to the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipAction {
    /// The creator edits or deletes instead of joining.
    Manage,
    Join,
    Leave,
    /// The group has started, or is full and the user is not a member.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDetails {
    pub group: Group,
    pub is_creator: bool,
    pub is_member: bool,
    pub is_full: bool,
    pub is_active: bool,
    pub action: MembershipAction,
}

impl GroupDetails {
    /// `user_id` is the backend id of the signed-in user, if known.
    pub fn evaluate(group: Group, user_id: Option<&str>, now: DateTime<Utc>) -> Self {
        let is_creator = user_id.is_some_and(|id| group.is_creator(id));
        let is_member = user_id.is_some_and(|id| group.is_member(id));
        let is_full = group.is_full();
        let is_active = group.is_upcoming_at(now);

        let action = if is_creator {
            MembershipAction::Manage
        } else if !is_active || (is_full && !is_member) {
            MembershipAction::Unavailable
        } else if is_member {
            MembershipAction::Leave
        } else {
            MembershipAction::Join
        };

        Self {
            group,
            is_creator,
            is_member,
            is_full,
            is_active,
            action,
        }
    }
}

pub struct GroupDetailsPage {
    ctx: PageContext,
    details: GroupDetails,
}

impl GroupDetailsPage {
    /// Load a group. On failure the user is sent back to the catalog.
    pub async fn open(ctx: PageContext, id: &str) -> PageResult<Self> {
        ctx.require_session(&format!("{}/{}", GROUPS_PATH, id)).await?;

        match ctx.api.get_group(id).await {
            Ok(group) => {
                let details = GroupDetails::evaluate(group, ctx.user_id().as_deref(), Utc::now());
                Ok(Self { ctx, details })
            }
            Err(e) => {
                let err = ctx.api_failure("get_group", e, "Error fetching group details");
                ctx.navigator.navigate(GROUPS_PATH);
                Err(err)
            }
        }
    }

    pub fn details(&self) -> &GroupDetails {
        &self.details
    }

    /// Where the creator edits this group.
    pub fn edit_path(&self) -> String {
        format!("/update-group/{}", self.details.group.id)
    }

    fn refresh(&mut self, group: Group) {
        self.details = GroupDetails::evaluate(group, self.ctx.user_id().as_deref(), Utc::now());
    }

    pub async fn join(&mut self) -> PageResult<&GroupDetails> {
        match self.ctx.api.join_group(&self.details.group.id).await {
            Ok(group) => {
                self.refresh(group);
                self.ctx.success("Successfully joined the group!");
                Ok(&self.details)
            }
            Err(e) => Err(self.ctx.api_failure("join_group", e, "Error joining group")),
        }
    }

    pub async fn leave(&mut self) -> PageResult<&GroupDetails> {
        match self.ctx.api.leave_group(&self.details.group.id).await {
            Ok(group) => {
                self.refresh(group);
                self.ctx.success("Successfully left the group");
                Ok(&self.details)
            }
            Err(e) => Err(self.ctx.api_failure("leave_group", e, "Error leaving group")),
        }
    }

    /// Delete the group and go to "my groups". Confirmation is the caller's job.
    pub async fn delete(self) -> PageResult<()> {
        let id = self.details.group.id.clone();
        match self.ctx.api.delete_group(&id).await {
            Ok(()) => {
                info!(group_id = %id, "Group deleted from details page");
                self.ctx.success("Group deleted successfully");
                self.ctx.navigator.navigate(MY_GROUPS_PATH);
                Ok(())
            }
            Err(e) => Err(self.ctx.api_failure("delete_group", e, "Error deleting group")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use group_api_client::UserProfile;

    fn member(id: &str) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            name: id.to_string(),
            email: None,
            photo_url: None,
            uid: None,
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, 10, 0, 0).unwrap()
    }

    fn group(max_members: u32, members: &[&str]) -> Group {
        Group {
            id: "g1".to_string(),
            name: "Chess".to_string(),
            description: String::new(),
            image_url: String::new(),
            category: "Gaming".to_string(),
            location: "Porto".to_string(),
            max_members,
            start_date: start(),
            members: members.iter().map(|m| member(m)).collect(),
            creator: Some(member("owner")),
            created_at: None,
        }
    }

    #[test]
    fn creator_manages() {
        let before = start() - Duration::days(1);
        let details = GroupDetails::evaluate(group(5, &["owner"]), Some("owner"), before);
        assert!(details.is_creator);
        assert_eq!(details.action, MembershipAction::Manage);
    }

    #[test]
    fn join_or_leave_while_active() {
        let before = start() - Duration::days(1);
        assert_eq!(
            GroupDetails::evaluate(group(5, &["a"]), Some("b"), before).action,
            MembershipAction::Join
        );
        assert_eq!(
            GroupDetails::evaluate(group(5, &["a"]), Some("a"), before).action,
            MembershipAction::Leave
        );
    }

    #[test]
    fn full_group_only_blocks_outsiders() {
        let before = start() - Duration::days(1);
        let outsider = GroupDetails::evaluate(group(2, &["a", "b"]), Some("c"), before);
        assert!(outsider.is_full);
        assert_eq!(outsider.action, MembershipAction::Unavailable);

        let insider = GroupDetails::evaluate(group(2, &["a", "b"]), Some("a"), before);
        assert_eq!(insider.action, MembershipAction::Leave);
    }

    #[test]
    fn started_group_is_unavailable() {
        let after = start() + Duration::hours(1);
        let details = GroupDetails::evaluate(group(5, &["a"]), Some("a"), after);
        assert!(!details.is_active);
        assert_eq!(details.action, MembershipAction::Unavailable);
    }

    #[test]
    fn unknown_user_is_neither_member_nor_creator() {
        let before = start() - Duration::days(1);
        let details = GroupDetails::evaluate(group(5, &["owner"]), None, before);
        assert!(!details.is_creator);
        assert!(!details.is_member);
        assert_eq!(details.action, MembershipAction::Join);
    }
}
