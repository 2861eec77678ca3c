use crate::media::MediaError;
use crate::store::StoreError;

/// Feed and upload errors surfaced to callers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("User not logged in")]
    NotAuthenticated,

    #[error("Photo data is required")]
    MissingPhoto,

    #[error("Failed to upload image: {0}")]
    UploadFailed(String),

    #[error("Failed to save post: {0}")]
    SaveFailed(String),

    #[error("Failed to fetch posts: {0}")]
    FetchFailed(String),
}

impl FeedError {
    /// Wraps a media host failure from the asset upload phase
    pub fn upload(err: MediaError) -> Self {
        FeedError::UploadFailed(err.to_string())
    }

    /// Wraps a store failure from the record persistence phase
    pub fn save(err: StoreError) -> Self {
        FeedError::SaveFailed(err.to_string())
    }

    /// Wraps a store failure from a read
    pub fn fetch(err: StoreError) -> Self {
        FeedError::FetchFailed(err.to_string())
    }
}

/// Result type alias for feed operations
pub type FeedResult<T> = Result<T, FeedError>;
