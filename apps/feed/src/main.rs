use bytes::Bytes;
use std::sync::Arc;

use savoreel_feed::auth::SessionAuth;
use savoreel_feed::config;
use savoreel_feed::media::CloudinaryHost;
use savoreel_feed::models::UserRecord;
use savoreel_feed::services::{FeedService, NewPost, UploadService};
use savoreel_feed::store::{encode, DocumentStore, MemoryDocumentStore};

const USAGE: &str = "usage: savoreel-feed <image-path> [title] [hashtag] [location]";

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = config::Config::from_env().map_err(|e| {
        log::error!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let mut args = std::env::args().skip(1);
    let image_path = args.next().ok_or_else(|| {
        eprintln!("{}", USAGE);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "missing image path")
    })?;
    let title = args.next();
    let hashtag = args.next();
    let location = args.next();

    let user_id = std::env::var("SAVOREEL_USER_ID").map_err(|_| {
        log::error!("SAVOREEL_USER_ID must be set to the uploading user's id");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "SAVOREEL_USER_ID not set")
    })?;
    let display_name = std::env::var("SAVOREEL_USER_NAME").unwrap_or_else(|_| user_id.clone());

    let image = tokio::fs::read(&image_path).await?;
    log::info!("Read {} bytes from {}", image.len(), image_path);

    let auth = Arc::new(SessionAuth::signed_in(user_id.clone()));
    let store = Arc::new(MemoryDocumentStore::new());
    let media = Arc::new(
        CloudinaryHost::new(&config.media).map_err(|e| std::io::Error::other(e.to_string()))?,
    );

    // Seed the profile so the following feed can resolve it
    let profile = UserRecord {
        user_id: user_id.clone(),
        name: display_name.clone(),
        ..Default::default()
    };
    let document = encode(&profile).map_err(|e| std::io::Error::other(e.to_string()))?;
    store
        .set(&config.feed.users_collection, &user_id, document)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let uploader = UploadService::new(
        auth.clone(),
        store.clone(),
        media,
        config.upload.clone(),
    );
    let feed = FeedService::new(store, auth, config.feed.clone());

    let post_id = uploader
        .upload_post(NewPost {
            name: display_name,
            title,
            hashtag,
            location,
            image: Bytes::from(image),
        })
        .await
        .map_err(|e| {
            log::error!("{}", e);
            std::io::Error::other(e.to_string())
        })?;
    log::info!("Created post {}", post_id);

    feed.refresh_following_feed()
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    for (key, posts) in feed.grouped().iter() {
        log::info!("{}: {} post(s)", key.title(), posts.len());
    }

    Ok(())
}
