pub mod feed;
pub mod grouping;
pub mod upload;

pub use feed::{chunk_ids, working_set, FeedService};
pub use grouping::{group_posts_by_month, group_records_by_month};
pub use upload::{NewPost, UploadService};
