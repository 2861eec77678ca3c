use serde::{Deserialize, Serialize};

/// User profile document as stored in the `users` collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRecord {
    pub user_id: String,
    pub name: String,
    pub following: Vec<String>,
    pub followers: Vec<String>,
}

impl UserRecord {
    pub fn following_count(&self) -> usize {
        self.following.len()
    }

    pub fn follower_count(&self) -> usize {
        self.followers.len()
    }
}
