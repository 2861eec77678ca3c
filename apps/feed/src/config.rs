use std::env;
use std::time::Duration;

/// Backend ceiling for values in a single "in" filter
pub const MAX_IN_QUERY_VALUES: usize = 10;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub media: MediaConfig,
    pub feed: FeedConfig,
    pub upload: UploadConfig,
}

/// Media host (Cloudinary) credentials and upload settings
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Base URL of the upload API, without the version path
    pub api_base: String,
    pub folder: String,
    pub timeout: Duration,
}

/// Feed query settings
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub posts_collection: String,
    pub users_collection: String,
    /// Max ids per chunked query, clamped to 1..=MAX_IN_QUERY_VALUES
    pub max_in_values: usize,
}

/// Post upload settings
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub posts_collection: String,
    pub folder: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let media = MediaConfig::from_env()?;
        let feed = FeedConfig::from_env();
        let upload = UploadConfig {
            posts_collection: feed.posts_collection.clone(),
            folder: media.folder.clone(),
        };

        Ok(Self {
            media,
            feed,
            upload,
        })
    }
}

impl MediaConfig {
    /// Load media host configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base = env::var("CLOUDINARY_API_BASE")
            .unwrap_or_else(|_| "https://api.cloudinary.com".to_string());
        url::Url::parse(&api_base).map_err(|_| ConfigError::InvalidUrl("CLOUDINARY_API_BASE"))?;

        let timeout_secs = match env::var("MEDIA_UPLOAD_TIMEOUT_SECS") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidNumber("MEDIA_UPLOAD_TIMEOUT_SECS"))?,
            Err(_) => 60,
        };

        Ok(Self {
            cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
            api_key: required("CLOUDINARY_API_KEY")?,
            api_secret: required("CLOUDINARY_API_SECRET")?,
            api_base: api_base.trim_end_matches('/').to_string(),
            folder: env::var("CLOUDINARY_FOLDER").unwrap_or_else(|_| "app_uploads".to_string()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl FeedConfig {
    /// Load feed configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            posts_collection: env::var("FEED_POSTS_COLLECTION")
                .unwrap_or_else(|_| "posts".to_string()),
            users_collection: env::var("FEED_USERS_COLLECTION")
                .unwrap_or_else(|_| "users".to_string()),
            max_in_values: env::var("FEED_MAX_IN_VALUES")
                .unwrap_or_else(|_| MAX_IN_QUERY_VALUES.to_string())
                .parse()
                .unwrap_or(MAX_IN_QUERY_VALUES)
                .clamp(1, MAX_IN_QUERY_VALUES),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            posts_collection: "posts".to_string(),
            users_collection: "users".to_string(),
            max_in_values: MAX_IN_QUERY_VALUES,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            posts_collection: "posts".to_string(),
            folder: "app_uploads".to_string(),
        }
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidNumber(&'static str),
    InvalidUrl(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVar(name) => {
                write!(f, "{} environment variable is required", name)
            }
            ConfigError::InvalidNumber(name) => write!(f, "{} must be a valid number", name),
            ConfigError::InvalidUrl(name) => write!(f, "{} must be a valid URL", name),
        }
    }
}

impl std::error::Error for ConfigError {}
