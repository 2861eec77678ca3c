pub mod grouping;
pub mod post;
pub mod user;

pub use grouping::{month_name, GroupKey, GroupedPosts};
pub use post::{Post, PostRecord, DISPLAY_DATE_FORMAT};
pub use user::UserRecord;
