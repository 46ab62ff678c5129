//! Fuzzy post search over title, excerpt and tag names.
//!
//! Scoring follows the Bitap model: a field's score is
//! `edit_errors / pattern_len + match_offset / distance`, where 0 is a
//! perfect match at the start of the field. Fields scoring above the
//! threshold do not match. Exact occurrences always match and rank ahead of
//! inexact ones in the same field, with earlier occurrences scoring lower. A post's score is the product of its matching
//! field scores, each raised to a field-length norm, so more (and shorter)
//! matching fields rank higher.
//!
//! A [`SearchIndex`] is an immutable snapshot. Callers that need to follow a
//! changing post list rebuild it and publish the new snapshot through
//! [`SharedSearchIndex`].

use crate::post::Post;
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Search tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
    /// Maximum field score accepted as a match (0.0 exact, 1.0 anything).
    pub threshold: f64,
    /// Characters over which a match's offset costs a full score point.
    pub distance: usize,
    /// Score matches anywhere in a field without an offset penalty.
    #[serde(alias = "ignore_location")]
    pub ignore_location: bool,
    /// Queries with fewer characters (after trimming) return nothing.
    #[serde(alias = "min_query_len")]
    pub min_query_len: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            distance: 100,
            ignore_location: false,
            min_query_len: 2,
        }
    }
}

/// A ranked result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'a> {
    /// Matching post.
    pub post: &'a Post,
    /// Combined score; lower is better.
    pub score: f64,
}

/// Lowercased searchable text.
#[derive(Debug, Clone)]
struct Field {
    text: String,
    chars: Vec<char>,
    norm: f64,
}

impl Field {
    fn new(raw: &str) -> Self {
        let text = raw.to_lowercase();
        let chars: Vec<char> = text.chars().collect();
        let words = text.split_whitespace().count().max(1);
        Self {
            text,
            chars,
            norm: 1.0 / (words as f64).sqrt(),
        }
    }
}

/// Immutable fuzzy index over a snapshot of posts.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    posts: Vec<Post>,
    fields: Vec<Vec<Field>>,
    options: SearchOptions,
}

impl SearchIndex {
    /// Builds an index over `posts`, in their given order.
    pub fn build(posts: Vec<Post>, options: SearchOptions) -> Self {
        let fields = posts
            .iter()
            .map(|post| {
                let mut fields = Vec::with_capacity(2 + post.tags.len());
                fields.push(Field::new(&post.title));
                fields.push(Field::new(&post.excerpt));
                fields.extend(post.tags.iter().map(|tag| Field::new(&tag.name)));
                fields
            })
            .collect();

        log::debug!("Built search index over {} posts", posts.len());
        Self {
            posts,
            fields,
            options,
        }
    }

    /// Posts in the snapshot, in build order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Options the index was built with.
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Number of indexed posts.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// True when no posts are indexed.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Matching posts, best first.
    pub fn query(&self, text: &str) -> Vec<&Post> {
        self.query_scored(text)
            .into_iter()
            .map(|hit| hit.post)
            .collect()
    }

    /// Matching posts with scores, best first; ties keep build order.
    pub fn query_scored(&self, text: &str) -> Vec<SearchHit<'_>> {
        let pattern = text.trim().to_lowercase();
        let pattern_chars: Vec<char> = pattern.chars().collect();
        if pattern_chars.len() < self.options.min_query_len.max(1) {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit<'_>> = self
            .posts
            .iter()
            .zip(&self.fields)
            .filter_map(|(post, fields)| {
                self.post_score(&pattern, &pattern_chars, fields)
                    .map(|score| SearchHit { post, score })
            })
            .collect();

        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        hits
    }

    fn post_score(&self, pattern: &str, pattern_chars: &[char], fields: &[Field]) -> Option<f64> {
        let mut total: Option<f64> = None;
        for field in fields {
            if let Some(score) = field_score(pattern, pattern_chars, field, &self.options) {
                let weighted = score.max(f64::EPSILON).powf(field.norm);
                total = Some(total.unwrap_or(1.0) * weighted);
            }
        }
        total
    }
}

/// Best score of `pattern` against any substring of `field`.
///
/// An exact occurrence always matches, whatever its offset, and scores
/// below every inexact match: `(1 / len) * offset / (offset + distance)`.
/// Otherwise one approximate-substring pass (Sellers) finds, for every end
/// position, the fewest edits and the earliest start among them.
fn field_score(
    pattern: &str,
    pattern_chars: &[char],
    field: &Field,
    options: &SearchOptions,
) -> Option<f64> {
    let pattern_len = pattern_chars.len();
    if field.chars.is_empty() || pattern_len == 0 {
        return None;
    }
    let distance = options.distance.max(1) as f64;

    if let Some(byte_offset) = field.text.find(pattern) {
        if options.ignore_location {
            return Some(0.0);
        }
        let offset = field.text[..byte_offset].chars().count() as f64;
        return Some(offset / (offset + distance) / pattern_len as f64);
    }

    let max_errors = (options.threshold * pattern_len as f64 + 1e-9).floor() as usize;
    if max_errors == 0 {
        return None;
    }

    // column[i] = (edits, start) of the best match of pattern[..i] ending at
    // the current text position.
    let mut column: Vec<(usize, usize)> = (0..=pattern_len).map(|i| (i, 0)).collect();
    let mut best: Option<f64> = None;

    for (end, &c) in field.chars.iter().enumerate() {
        let consumed = end + 1;
        if !options.ignore_location {
            let earliest_start = consumed.saturating_sub(pattern_len + max_errors);
            if earliest_start as f64 / distance > options.threshold {
                break;
            }
        }

        let mut diagonal = column[0];
        column[0] = (0, consumed);
        for i in 1..=pattern_len {
            let left = column[i];
            let above = column[i - 1];
            let substitution = (diagonal.0 + usize::from(pattern_chars[i - 1] != c), diagonal.1);
            column[i] = substitution
                .min((above.0 + 1, above.1))
                .min((left.0 + 1, left.1));
            diagonal = left;
        }

        let (errors, start) = column[pattern_len];
        if errors > max_errors {
            continue;
        }
        let offset_penalty = if options.ignore_location {
            0.0
        } else {
            start as f64 / distance
        };
        let score = errors as f64 / pattern_len as f64 + offset_penalty;
        if score <= options.threshold && best.is_none_or(|current| score < current) {
            best = Some(score);
        }
    }

    best
}

/// Holder for the current index, swapped atomically on rebuild.
///
/// Readers get the fully built old snapshot or the fully built new one; a
/// rebuild runs before the swap, off the read path.
#[derive(Debug)]
pub struct SharedSearchIndex {
    current: ArcSwap<SearchIndex>,
}

impl SharedSearchIndex {
    /// Wraps an already built index.
    pub fn new(index: SearchIndex) -> Self {
        Self {
            current: ArcSwap::from_pointee(index),
        }
    }

    /// Current snapshot. Keeps working even if a swap happens meanwhile.
    pub fn load(&self) -> Arc<SearchIndex> {
        self.current.load_full()
    }

    /// Builds a new index with the current options, then publishes it.
    pub fn rebuild(&self, posts: Vec<Post>) {
        let options = *self.current.load().options();
        self.swap(SearchIndex::build(posts, options));
    }

    /// Publishes `index` and returns the previous snapshot.
    pub fn swap(&self, index: SearchIndex) -> Arc<SearchIndex> {
        self.current.swap(Arc::new(index))
    }

    /// Queries the current snapshot, cloning the matched posts out of it.
    pub fn query(&self, text: &str) -> Vec<Post> {
        self.load().query(text).into_iter().cloned().collect()
    }
}

impl Default for SharedSearchIndex {
    fn default() -> Self {
        Self::new(SearchIndex::default())
    }
}
