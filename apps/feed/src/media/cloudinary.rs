//! Cloudinary media host.
//!
//! Performs signed uploads against the Cloudinary REST API. The image is sent
//! as a base64 data URI in a form-encoded body and signed with SHA-256.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{MediaError, MediaHost, UploadOptions, UploadedAsset};
use crate::config::MediaConfig;

/// Cloudinary upload client
pub struct CloudinaryHost {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
    #[serde(default)]
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryHost {
    /// Creates a new Cloudinary client from media configuration
    pub fn new(config: &MediaConfig) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            upload_url: format!(
                "{}/v1_1/{}/image/upload",
                config.api_base, config.cloud_name
            ),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        })
    }

    /// Signs upload parameters: sorted `k=v` pairs joined by `&`, secret appended, SHA-256 hex
    fn generate_signature(params: &[(&str, &str)], api_secret: &str) -> String {
        let mut sorted = params.to_vec();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let to_sign = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Best-effort MIME type from the leading magic bytes
fn sniff_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "application/octet-stream",
    }
}

fn data_uri(bytes: &[u8]) -> String {
    format!("data:{};base64,{}", sniff_mime(bytes), STANDARD.encode(bytes))
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    async fn upload(
        &self,
        bytes: Bytes,
        options: &UploadOptions,
    ) -> Result<UploadedAsset, MediaError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = Self::generate_signature(
            &[
                ("folder", options.folder.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            &self.api_secret,
        );

        log::info!(
            "Upload started ({} bytes to folder '{}')",
            bytes.len(),
            options.folder
        );

        let form = [
            ("file", data_uri(&bytes)),
            ("api_key", self.api_key.clone()),
            ("timestamp", timestamp),
            ("folder", options.folder.clone()),
            ("signature", signature),
            ("signature_algorithm", "sha256".to_string()),
        ];

        let response = self
            .client
            .post(&self.upload_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    log::error!("Upload timed out");
                } else {
                    log::error!("Upload request failed: {}", e);
                }
                MediaError::Request(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|r| r.error.message)
                .unwrap_or_else(|_| {
                    if body.is_empty() {
                        format!("HTTP {}", status.as_u16())
                    } else {
                        body.clone()
                    }
                });
            log::error!("Upload rejected with HTTP {}: {}", status.as_u16(), message);
            return Err(MediaError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;
        let url = parsed
            .secure_url
            .or(parsed.url)
            .ok_or_else(|| MediaError::InvalidResponse("response has no url".to_string()))?;

        log::info!("Upload finished: {}", parsed.public_id);

        Ok(UploadedAsset {
            url,
            public_id: parsed.public_id,
        })
    }
}
