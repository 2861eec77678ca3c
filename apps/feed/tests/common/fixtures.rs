//! Test fixtures and data builders
//!
//! Provides reusable posts, post records and user profiles.

use chrono::NaiveDate;
use savoreel_feed::models::{Post, PostRecord, UserRecord};
use savoreel_feed::store::{encode, MemoryDocumentStore};

/// Builds a post record with sensible defaults
pub struct RecordBuilder {
    record: PostRecord,
}

impl RecordBuilder {
    pub fn new(post_id: &str, user_id: &str) -> Self {
        Self {
            record: PostRecord {
                post_id: post_id.to_string(),
                user_id: user_id.to_string(),
                name: format!("name of {}", user_id),
                title: format!("title of {}", post_id),
                date: "Jan 15, 2023".to_string(),
                photo_uri: format!("https://img.example/{}.jpg", post_id),
                ..Default::default()
            },
        }
    }

    pub fn with_date(mut self, date: &str) -> Self {
        self.record.date = date.to_string();
        self
    }

    pub fn with_reaction(mut self, kind: &str, count: u32) -> Self {
        self.record.reactions.insert(kind.to_string(), count);
        self
    }

    pub fn build(self) -> PostRecord {
        self.record
    }
}

/// Post stamped at 10:00 on the given day
pub fn post_at(id: &str, year: i32, month: u32, day: u32) -> Post {
    let created_at = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(10, 0, 0))
        .expect("valid date");
    Post::new(id, "author", format!("Post {}", id), "food.jpg", created_at)
}

/// Stores `per_author` posts for every author, returning how many were stored
pub fn seed_posts(store: &MemoryDocumentStore, authors: &[String], per_author: usize) -> usize {
    let mut stored = 0;
    for author in authors {
        for n in 0..per_author {
            let id = format!("{}-post-{}", author, n);
            let record = RecordBuilder::new(&id, author).build();
            store
                .insert("posts", &id, encode(&record).expect("encode post"))
                .expect("insert post");
            stored += 1;
        }
    }
    stored
}

/// Stores a user profile following `following`
pub fn seed_user(store: &MemoryDocumentStore, user_id: &str, following: &[String]) {
    let user = UserRecord {
        user_id: user_id.to_string(),
        name: user_id.to_string(),
        following: following.to_vec(),
        followers: Vec::new(),
    };
    store
        .insert("users", user_id, encode(&user).expect("encode user"))
        .expect("insert user");
}
