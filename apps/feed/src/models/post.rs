use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display format of `PostRecord::date`, e.g. "Jan 15, 2023"
pub const DISPLAY_DATE_FORMAT: &str = "%b %d, %Y";

/// In-app post value used for grouping and display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub image: String,
    pub created_at: NaiveDateTime,
}

impl Post {
    pub fn new(
        id: impl Into<String>,
        author_id: impl Into<String>,
        title: impl Into<String>,
        image: impl Into<String>,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            author_id: author_id.into(),
            title: title.into(),
            image: image.into(),
            created_at,
        }
    }
}

/// Post document as persisted in the `posts` collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostRecord {
    pub post_id: String,
    pub user_id: String,
    /// Author display name at the time of posting
    pub name: String,
    pub title: String,
    pub hashtag: String,
    pub location: String,
    /// Formatted with `DISPLAY_DATE_FORMAT`; not sortable as stored
    pub date: String,
    pub photo_uri: String,
    pub reactions: BTreeMap<String, u32>,
}

impl PostRecord {
    /// Converts the record into a `Post` stamped at midnight of its display date.
    ///
    /// Returns `None` when the stored date does not parse.
    pub fn to_post(&self) -> Option<Post> {
        let day = NaiveDate::parse_from_str(self.date.trim(), DISPLAY_DATE_FORMAT).ok()?;

        Some(Post {
            id: self.post_id.clone(),
            author_id: self.user_id.clone(),
            title: self.title.clone(),
            image: self.photo_uri.clone(),
            created_at: day.and_hms_opt(0, 0, 0)?,
        })
    }

    pub fn reaction_count(&self, kind: &str) -> u32 {
        self.reactions.get(kind).copied().unwrap_or(0)
    }

    pub fn total_reactions(&self) -> u64 {
        self.reactions.values().map(|&c| u64::from(c)).sum()
    }
}
