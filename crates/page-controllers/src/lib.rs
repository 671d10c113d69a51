//! Page-level flows of the HobbyHub client.
//!
//! Each controller reads the session through a [`PageContext`], issues
//! requests through the authenticated client, and reports outcomes as
//! notices and navigation. Not-found responses on list pages mean "empty"
//! and are never shown to the user.

mod context;
pub mod dashboard;
pub mod details;
pub mod editor;
mod error;
pub mod groups;
pub mod my_groups;

pub use context::PageContext;
pub use dashboard::{load_dashboard, DashboardView};
pub use details::{GroupDetails, GroupDetailsPage, MembershipAction};
pub use editor::{EditorMode, GroupEditor};
pub use error::{PageError, PageResult};
pub use groups::{featured_groups, GroupsPage, FEATURED_LIMIT};
pub use my_groups::MyGroupsPage;
