//! Savoreel feed library
//!
//! Month grouping of posts, chunked following-feed fetches published through a
//! watch channel, and two-phase post uploads (media host, then document store).

pub mod auth;
pub mod config;
pub mod error;
pub mod media;
pub mod models;
pub mod services;
pub mod store;
