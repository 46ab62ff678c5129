#![deny(missing_docs)]
//! inkpost site engine: post processing, table of contents, and fuzzy search.

/// Parallel processing of many posts.
pub mod batch;
/// Listing helpers: pagination, tag filtering, related posts, display formatting.
pub mod collection;
/// Pipeline configuration loading.
pub mod config;
/// Error types for processing and configuration.
pub mod error;
/// Per-post processing pipeline and cache.
pub mod pipeline;
/// Post and tag records consumed from the content store.
pub mod post;
/// Fuzzy search index and its atomic holder.
pub mod search;
/// Table of contents extraction and heading anchor injection.
pub mod toc;

pub use batch::{
    BatchOptions, BatchOutcome, BatchResult, BatchStats, process_batch, process_batch_with,
};
pub use collection::{
    DEFAULT_RELATED_LIMIT, Page, filter_by_tag, format_date, paginate, related_posts, truncate_text,
};
pub use config::PipelineConfig;
pub use error::{ConfigError, ProcessError};
pub use pipeline::{ContentCache, PLACEHOLDER_HTML, ProcessedPost, process, process_or_placeholder};
pub use post::{Post, Tag};
pub use search::{SearchHit, SearchIndex, SearchOptions, SharedSearchIndex};
pub use toc::{Heading, TableOfContents, extract_toc, extract_toc_with_options, inject_ids};
