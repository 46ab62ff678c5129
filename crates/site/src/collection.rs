//! Helpers for listing pages: pagination, tag filtering, related posts and
//! display formatting.

use crate::post::Post;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of related posts shown under an article.
pub const DEFAULT_RELATED_LIMIT: usize = 2;

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<'a> {
    /// Posts on this page.
    pub items: &'a [Post],
    /// 1-based page number, clamped to the valid range.
    pub page: usize,
    /// Requested page size.
    pub page_size: usize,
    /// Number of posts across all pages.
    pub total_items: usize,
    /// Number of pages; at least 1.
    pub total_pages: usize,
}

impl Page<'_> {
    /// True when a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// True when an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Returns page `page` (1-based) of `posts`.
///
/// Page numbers below 1 select the first page and numbers past the end
/// select the last. A page size of 0 is treated as 1.
pub fn paginate(posts: &[Post], page: usize, page_size: usize) -> Page<'_> {
    let page_size = page_size.max(1);
    let total_items = posts.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let start = ((page - 1) * page_size).min(total_items);
    let end = (start + page_size).min(total_items);

    Page {
        items: &posts[start..end],
        page,
        page_size,
        total_items,
        total_pages,
    }
}

/// Posts carrying the tag with `tag_slug`, in their original order.
pub fn filter_by_tag<'a>(posts: &'a [Post], tag_slug: &str) -> Vec<&'a Post> {
    posts.iter().filter(|post| post.has_tag(tag_slug)).collect()
}

/// Up to `limit` other posts sharing at least one tag with the post whose
/// id is `current_id`, in their original order.
///
/// Returns nothing when `current_id` is not in `posts`.
pub fn related_posts(posts: &[Post], current_id: u64, limit: usize) -> Vec<&Post> {
    let Some(current) = posts.iter().find(|post| post.id == current_id) else {
        return Vec::new();
    };

    posts
        .iter()
        .filter(|post| post.id != current_id && post.shares_tag_with(current))
        .take(limit)
        .collect()
}

/// Long-form date, e.g. `June 15, 2023`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Cuts `text` to `max_chars` characters and appends `...` when it was longer.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
