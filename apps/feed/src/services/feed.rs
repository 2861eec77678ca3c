use futures_util::future::join_all;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;

use crate::auth::AuthProvider;
use crate::config::{FeedConfig, MAX_IN_QUERY_VALUES};
use crate::error::{FeedError, FeedResult};
use crate::models::{GroupedPosts, PostRecord, UserRecord};
use crate::services::grouping::group_records_by_month;
use crate::store::{decode, DocumentStore, Filter};

/// Field holding the author id on post documents
const AUTHOR_FIELD: &str = "userId";

/// Builds the set of authors whose posts make up a following feed:
/// every followed id plus the current user, deduplicated, first occurrence wins.
pub fn working_set(current_user_id: &str, following_ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    following_ids
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(current_user_id))
        .filter(|id| !id.is_empty() && seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Splits ids into chunks of at most `size` (minimum 1)
pub fn chunk_ids(ids: &[String], size: usize) -> Vec<Vec<String>> {
    ids.chunks(size.max(1)).map(<[String]>::to_vec).collect()
}

/// Fetches posts and publishes them to subscribers.
///
/// The service is the only writer of the published post list; UI code reads it
/// through `subscribe()` receivers.
pub struct FeedService {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthProvider>,
    config: FeedConfig,
    posts: watch::Sender<Vec<PostRecord>>,
}

impl FeedService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
        mut config: FeedConfig,
    ) -> Self {
        config.max_in_values = config.max_in_values.clamp(1, MAX_IN_QUERY_VALUES);
        let (posts, _) = watch::channel(Vec::new());

        Self {
            store,
            auth,
            config,
            posts,
        }
    }

    /// New read-only handle on the published post list
    pub fn subscribe(&self) -> watch::Receiver<Vec<PostRecord>> {
        self.posts.subscribe()
    }

    /// Copy of the currently published posts
    pub fn snapshot(&self) -> Vec<PostRecord> {
        self.posts.borrow().clone()
    }

    /// Published posts grouped by month
    pub fn grouped(&self) -> GroupedPosts {
        group_records_by_month(&self.posts.borrow())
    }

    /// Empties the published list
    pub fn clear(&self) {
        self.posts.send_replace(Vec::new());
    }

    /// Fetches posts by the current user and everyone they follow.
    ///
    /// Authors are queried in chunks of at most `max_in_values` ids, all chunks
    /// concurrently. Each successful chunk is appended to the published list
    /// (one publish per chunk, in completion order). A failed chunk is logged
    /// and skipped. Returns the records gathered by this call.
    pub async fn fetch_following_posts(
        &self,
        current_user_id: &str,
        following_ids: &[String],
    ) -> FeedResult<Vec<PostRecord>> {
        if current_user_id.is_empty() {
            return Err(FeedError::FetchFailed(
                "current user id is empty".to_string(),
            ));
        }

        let authors = working_set(current_user_id, following_ids);
        let chunks = chunk_ids(&authors, self.config.max_in_values);

        log::debug!(
            "Fetching posts for {} authors in {} chunks",
            authors.len(),
            chunks.len()
        );

        let results = join_all(
            chunks
                .into_iter()
                .enumerate()
                .map(|(index, chunk)| self.fetch_chunk(index, chunk)),
        )
        .await;

        Ok(results.into_iter().flatten().flatten().collect())
    }

    async fn fetch_chunk(&self, index: usize, chunk: Vec<String>) -> Option<Vec<PostRecord>> {
        let size = chunk.len();
        let filter = Filter::is_in(AUTHOR_FIELD, chunk);

        match self.store.query(&self.config.posts_collection, filter).await {
            Ok(documents) => {
                let records = decode_posts(documents);
                log::debug!(
                    "Chunk {} ({} authors) returned {} posts",
                    index,
                    size,
                    records.len()
                );
                self.posts
                    .send_modify(|published| published.extend(records.iter().cloned()));
                Some(records)
            }
            Err(e) => {
                log::error!("Error fetching posts for chunk {}: {}", index, e);
                None
            }
        }
    }

    /// Fetches the current user's own posts without touching the published list
    pub async fn fetch_own_posts(&self, current_user_id: &str) -> FeedResult<Vec<PostRecord>> {
        if current_user_id.is_empty() {
            return Err(FeedError::FetchFailed(
                "current user id is empty".to_string(),
            ));
        }

        let filter = Filter::eq(AUTHOR_FIELD, current_user_id);

        let documents = self
            .store
            .query(&self.config.posts_collection, filter)
            .await
            .map_err(|e| {
                log::error!("Error fetching current user's posts: {}", e);
                FeedError::fetch(e)
            })?;

        Ok(decode_posts(documents))
    }

    /// Reloads the following feed for the signed-in user.
    ///
    /// Reads the user's profile for its `following` list, clears the published
    /// list and refetches. The list is cleared before any chunk runs, so if
    /// every chunk fails subscribers are left with an empty feed.
    pub async fn refresh_following_feed(&self) -> FeedResult<Vec<PostRecord>> {
        let user_id = self.auth.current_user().ok_or(FeedError::NotAuthenticated)?;

        let document = self
            .store
            .get(&self.config.users_collection, &user_id)
            .await
            .map_err(|e| {
                log::error!("Error fetching following list: {}", e);
                FeedError::fetch(e)
            })?
            .ok_or_else(|| {
                log::error!("User document not found: {}", user_id);
                FeedError::FetchFailed(format!("user document not found: {}", user_id))
            })?;

        let user: UserRecord = decode(document).map_err(FeedError::fetch)?;
        if user.following_count() == 0 {
            log::info!("User {} is not following anyone", user_id);
        } else {
            log::debug!(
                "User {} follows {} and has {} followers",
                user_id,
                user.following_count(),
                user.follower_count()
            );
        }

        self.clear();
        self.fetch_following_posts(&user_id, &user.following).await
    }

    /// Fetches every post and replaces the published list with them
    pub async fn fetch_all_posts(&self) -> FeedResult<Vec<PostRecord>> {
        let documents = self
            .store
            .query(&self.config.posts_collection, Filter::All)
            .await
            .map_err(|e| {
                log::error!("Error fetching posts: {}", e);
                FeedError::fetch(e)
            })?;

        let records = decode_posts(documents);
        self.posts.send_replace(records.clone());
        Ok(records)
    }
}

/// Decodes post documents, dropping ones that do not fit the record shape
fn decode_posts(documents: Vec<Value>) -> Vec<PostRecord> {
    documents
        .into_iter()
        .filter_map(|doc| match decode::<PostRecord>(doc) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping malformed post document: {}", e);
                None
            }
        })
        .collect()
}
