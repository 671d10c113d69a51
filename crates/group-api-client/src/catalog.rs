//! Client-side search, filtering and sorting of the group catalog.

use crate::models::Group;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Categories offered when creating a group.
pub const CATEGORIES: [&str; 10] = [
    "Art",
    "Music",
    "Sports",
    "Technology",
    "Books",
    "Gaming",
    "Cooking",
    "Fitness",
    "Photography",
    "Other",
];

/// Category filter value meaning "no filter".
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Newest,
    Oldest,
    Members,
    Name,
    Location,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::Members => "members",
            SortKey::Name => "name",
            SortKey::Location => "location",
        }
    }

    /// Ordering under the default (`Desc`) order; `Asc` reverses it.
    /// Text keys read A to Z under `Desc`.
    fn compare(&self, a: &Group, b: &Group) -> Ordering {
        match self {
            SortKey::Newest => b.created_at.cmp(&a.created_at),
            SortKey::Oldest => a.created_at.cmp(&b.created_at),
            SortKey::Members => b.members.len().cmp(&a.members.len()),
            SortKey::Name => compare_text(&a.name, &b.name),
            SortKey::Location => compare_text(&a.location, &b.location),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortKey::Newest),
            "oldest" => Ok(SortKey::Oldest),
            "members" => Ok(SortKey::Members),
            "name" => Ok(SortKey::Name),
            "location" => Ok(SortKey::Location),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Search, category filter and sort applied to the group list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupQuery {
    pub search: String,
    pub category: String,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl Default for GroupQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL_CATEGORIES.to_string(),
            sort: SortKey::Newest,
            order: SortOrder::Desc,
        }
    }
}

impl GroupQuery {
    /// Selecting the current key flips the order; a new key starts descending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort == key {
            self.order = self.order.flipped();
        } else {
            self.sort = key;
            self.order = SortOrder::Desc;
        }
    }

    pub fn matches(&self, group: &Group) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || group.name.to_lowercase().contains(&needle)
            || group.description.to_lowercase().contains(&needle)
            || group.location.to_lowercase().contains(&needle);

        let matches_category = self.category.is_empty()
            || self.category == ALL_CATEGORIES
            || group.category == self.category;

        matches_search && matches_category
    }

    /// Filtered and sorted copy of `groups`. The sort is stable.
    pub fn apply(&self, groups: &[Group]) -> Vec<Group> {
        let mut result: Vec<Group> = groups.iter().filter(|g| self.matches(g)).cloned().collect();
        result.sort_by(|a, b| {
            let ordering = self.sort.compare(a, b);
            match self.order {
                SortOrder::Desc => ordering,
                SortOrder::Asc => ordering.reverse(),
            }
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProfile;
    use chrono::{TimeZone, Utc};

    fn group(id: &str, name: &str, category: &str, location: &str, members: usize, day: u32) -> Group {
        Group {
            id: id.to_string(),
            name: name.to_string(),
            description: format!("{name} meetup"),
            image_url: String::new(),
            category: category.to_string(),
            location: location.to_string(),
            max_members: 20,
            start_date: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            members: (0..members)
                .map(|i| UserProfile {
                    id: format!("u{i}"),
                    name: String::new(),
                    email: None,
                    photo_url: None,
                    uid: None,
                })
                .collect(),
            creator: None,
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()),
        }
    }

    fn catalog() -> Vec<Group> {
        vec![
            group("1", "Watercolor", "Art", "Lisbon", 3, 1),
            group("2", "chess", "Gaming", "Porto", 7, 3),
            group("3", "Jazz Jam", "Music", "Lisbon", 5, 2),
        ]
    }

    fn ids(groups: &[Group]) -> Vec<&str> {
        groups.iter().map(|g| g.id.as_str()).collect()
    }

    #[test]
    fn default_is_newest_first() {
        let result = GroupQuery::default().apply(&catalog());
        assert_eq!(ids(&result), vec!["2", "3", "1"]);
    }

    #[test]
    fn search_is_case_insensitive_over_name_description_location() {
        let mut query = GroupQuery::default();
        query.search = "LISBON".to_string();
        assert_eq!(ids(&query.apply(&catalog())), vec!["3", "1"]);

        query.search = "jam meetup".to_string();
        assert_eq!(ids(&query.apply(&catalog())), vec!["3"]);
    }

    #[test]
    fn category_filter() {
        let mut query = GroupQuery::default();
        query.category = "Art".to_string();
        assert_eq!(ids(&query.apply(&catalog())), vec!["1"]);

        query.category = ALL_CATEGORIES.to_string();
        assert_eq!(query.apply(&catalog()).len(), 3);
    }

    #[test]
    fn name_sort_ignores_case() {
        let mut query = GroupQuery::default();
        query.toggle_sort(SortKey::Name);
        assert_eq!(query.order, SortOrder::Desc);
        assert_eq!(ids(&query.apply(&catalog())), vec!["2", "3", "1"]);

        query.toggle_sort(SortKey::Name);
        assert_eq!(query.order, SortOrder::Asc);
        assert_eq!(ids(&query.apply(&catalog())), vec!["1", "3", "2"]);
    }

    #[test]
    fn new_key_resets_to_descending() {
        let mut query = GroupQuery::default();
        query.toggle_sort(SortKey::Newest);
        assert_eq!(query.order, SortOrder::Asc);

        query.toggle_sort(SortKey::Members);
        assert_eq!(query.sort, SortKey::Members);
        assert_eq!(query.order, SortOrder::Desc);
        assert_eq!(ids(&query.apply(&catalog())), vec!["2", "3", "1"]);
    }

    #[test]
    fn parses_sort_options() {
        assert_eq!("Location".parse::<SortKey>().unwrap(), SortKey::Location);
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert!("popular".parse::<SortKey>().is_err());
    }
}
