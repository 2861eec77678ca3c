use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::models::{GroupKey, GroupedPosts, Post, PostRecord};

/// Groups posts by calendar month.
///
/// Each post lands under the (year, month) of its timestamp. Within a group
/// posts are sorted newest first; ties keep their input order.
pub fn group_posts_by_month<I>(posts: I) -> GroupedPosts
where
    I: IntoIterator<Item = Post>,
{
    let mut groups: BTreeMap<Reverse<GroupKey>, Vec<Post>> = BTreeMap::new();

    for post in posts {
        let key = GroupKey::of(&post.created_at);
        groups.entry(Reverse(key)).or_default().push(post);
    }

    for posts in groups.values_mut() {
        // stable
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }

    GroupedPosts::from_groups(groups)
}

/// Groups stored records, skipping any whose display date does not parse
pub fn group_records_by_month(records: &[PostRecord]) -> GroupedPosts {
    let posts = records.iter().filter_map(|record| {
        let post = record.to_post();
        if post.is_none() {
            log::warn!(
                "Skipping post {} with unparsable date '{}'",
                record.post_id,
                record.date
            );
        }
        post
    });

    group_posts_by_month(posts)
}
