use bytes::Bytes;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::config::UploadConfig;
use crate::error::{FeedError, FeedResult};
use crate::media::{MediaHost, UploadOptions};
use crate::models::{PostRecord, DISPLAY_DATE_FORMAT};
use crate::store::{encode, DocumentStore, StoreResult};

/// Input for creating a post
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    /// Author display name snapshot
    pub name: String,
    pub title: Option<String>,
    pub hashtag: Option<String>,
    pub location: Option<String>,
    pub image: Bytes,
}

/// Creates posts: image to the media host first, then the post document.
///
/// If the document write fails after the image upload succeeded the asset
/// stays on the host. Nothing is retried; callers re-invoke from scratch.
pub struct UploadService {
    auth: Arc<dyn AuthProvider>,
    store: Arc<dyn DocumentStore>,
    media: Arc<dyn MediaHost>,
    config: UploadConfig,
}

impl UploadService {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        store: Arc<dyn DocumentStore>,
        media: Arc<dyn MediaHost>,
        config: UploadConfig,
    ) -> Self {
        Self {
            auth,
            store,
            media,
            config,
        }
    }

    /// Uploads the image and saves the post, returning the new post id
    pub async fn upload_post(&self, post: NewPost) -> FeedResult<String> {
        let user_id = self.auth.current_user().ok_or(FeedError::NotAuthenticated)?;

        if post.image.is_empty() {
            return Err(FeedError::MissingPhoto);
        }

        let options = UploadOptions {
            folder: self.config.folder.clone(),
        };
        let asset = self
            .media
            .upload(post.image, &options)
            .await
            .map_err(|e| {
                log::error!("Error uploading image: {}", e);
                FeedError::upload(e)
            })?;

        let post_id = self.store.new_id(&self.config.posts_collection);
        let record = PostRecord {
            post_id: post_id.clone(),
            user_id,
            name: post.name,
            title: post.title.unwrap_or_default(),
            hashtag: post.hashtag.unwrap_or_default(),
            location: post.location.unwrap_or_default(),
            date: Utc::now().format(DISPLAY_DATE_FORMAT).to_string(),
            photo_uri: asset.url,
            reactions: BTreeMap::new(),
        };

        if let Err(e) = self.persist(&post_id, &record).await {
            log::error!("Error saving post {}: {}", post_id, e);
            log::warn!("Uploaded asset {} is orphaned", asset.public_id);
            return Err(FeedError::save(e));
        }

        log::info!("Post {} saved successfully", post_id);
        Ok(post_id)
    }

    /// Encodes and writes the record; any failure here orphans the uploaded asset
    async fn persist(&self, post_id: &str, record: &PostRecord) -> StoreResult<()> {
        let document = encode(record)?;
        self.store
            .set(&self.config.posts_collection, post_id, document)
            .await
    }
}
