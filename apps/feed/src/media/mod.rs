//! Media host seam.
//!
//! Image bytes go to an external media host which answers with a public URL.
//! The feed only stores that URL; the bytes never touch the document store.

pub mod cloudinary;

use async_trait::async_trait;
use bytes::Bytes;

pub use cloudinary::CloudinaryHost;

/// Media host errors
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upload rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Per-upload options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// Destination folder on the host
    pub folder: String,
}

/// An asset stored on the media host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub url: String,
    /// Host-side identifier, needed to delete or reconcile the asset later
    pub public_id: String,
}

/// Asynchronous binary upload to a media host
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Uploads `bytes`, resolving once the host has accepted or rejected them
    async fn upload(&self, bytes: Bytes, options: &UploadOptions)
        -> Result<UploadedAsset, MediaError>;
}
