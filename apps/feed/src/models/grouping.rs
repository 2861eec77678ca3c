use chrono::{Datelike, NaiveDateTime};
use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::models::Post;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Calendar bucket for a post: (year, month), month in 1..=12.
///
/// Ordering is lexicographic on (year, month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub year: i32,
    pub month: u32,
}

impl GroupKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Key of a naive timestamp, read as UTC wall-clock with no conversion
    pub fn of(timestamp: &NaiveDateTime) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }

    /// Section title, e.g. "January, 2023"
    pub fn title(&self) -> String {
        format!("{}, {}", month_name(self.month), self.year)
    }
}

/// English month name for 1..=12, empty for anything else
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("")
}

/// Posts bucketed by month, newest month first and newest post first within a month
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedPosts {
    groups: BTreeMap<Reverse<GroupKey>, Vec<Post>>,
}

impl GroupedPosts {
    pub(crate) fn from_groups(groups: BTreeMap<Reverse<GroupKey>, Vec<Post>>) -> Self {
        Self { groups }
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn post_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn get(&self, key: GroupKey) -> Option<&[Post]> {
        self.groups.get(&Reverse(key)).map(Vec::as_slice)
    }

    /// Keys in display order (descending)
    pub fn keys(&self) -> impl Iterator<Item = GroupKey> + '_ {
        self.groups.keys().map(|k| k.0)
    }

    /// Groups in display order (descending)
    pub fn iter(&self) -> impl Iterator<Item = (GroupKey, &[Post])> + '_ {
        self.groups.iter().map(|(k, v)| (k.0, v.as_slice()))
    }

    /// All posts concatenated in display order
    pub fn into_flat(self) -> Vec<Post> {
        self.groups.into_values().flatten().collect()
    }
}
