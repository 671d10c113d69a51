//! Dashboard statistics over the group catalog.

use crate::models::Group;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardStats {
    pub total_groups: usize,
    pub my_groups: usize,
    pub total_members: usize,
    pub upcoming_events: usize,
}

impl DashboardStats {
    pub fn compute(all_groups: &[Group], my_groups: &[Group], now: DateTime<Utc>) -> Self {
        Self {
            total_groups: all_groups.len(),
            my_groups: my_groups.len(),
            total_members: all_groups.iter().map(Group::member_count).sum(),
            upcoming_events: all_groups.iter().filter(|g| g.is_upcoming_at(now)).count(),
        }
    }
}

/// Created groups first, then joined groups not already listed, by `_id`.
pub fn merge_my_groups(created: Vec<Group>, joined: Vec<Group>) -> Vec<Group> {
    let mut seen: HashSet<String> = created.iter().map(|g| g.id.clone()).collect();
    let mut merged = created;
    for group in joined {
        if seen.insert(group.id.clone()) {
            merged.push(group);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProfile;
    use chrono::{Duration, TimeZone};

    fn group(id: &str, members: usize, start: DateTime<Utc>) -> Group {
        Group {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            image_url: String::new(),
            category: "Other".to_string(),
            location: String::new(),
            max_members: 10,
            start_date: start,
            members: (0..members)
                .map(|i| UserProfile {
                    id: format!("{id}-m{i}"),
                    name: String::new(),
                    email: None,
                    photo_url: None,
                    uid: None,
                })
                .collect(),
            creator: None,
            created_at: None,
        }
    }

    #[test]
    fn merge_dedupes_and_keeps_created_first() {
        let now = Utc::now();
        let created = vec![group("a", 1, now), group("b", 1, now)];
        let joined = vec![group("b", 1, now), group("c", 1, now)];

        let merged = merge_my_groups(created, joined);
        let ids: Vec<&str> = merged.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn computes_totals_and_upcoming() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let all = vec![
            group("past", 4, now - Duration::days(3)),
            group("soon", 2, now + Duration::days(1)),
            group("later", 0, now + Duration::days(30)),
        ];
        let mine = vec![all[1].clone()];

        let stats = DashboardStats::compute(&all, &mine, now);
        assert_eq!(
            stats,
            DashboardStats {
                total_groups: 3,
                my_groups: 1,
                total_members: 6,
                upcoming_events: 2,
            }
        );
    }

    #[test]
    fn empty_catalog_is_all_zero() {
        assert_eq!(DashboardStats::compute(&[], &[], Utc::now()), DashboardStats::default());
    }
}
