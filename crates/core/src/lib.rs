#![deny(missing_docs)]
//! inkpost core: frontmatter extraction, markdown rendering, heading ids and reading time.

/// Code fence detection utilities.
pub mod code_fence;
/// Diagnostic types reported by the transforms.
pub mod error;
/// Quoted-field frontmatter extraction.
pub mod frontmatter;
/// Markdown lexer and HTML renderer.
pub mod markdown;
/// Word-count based reading time estimation.
pub mod reading_time;
/// Heading id and tag slug derivation.
pub mod slug;

pub use code_fence::{FenceOpen, closes_fence, fenced_line_mask, parse_fence_open};
pub use error::{ParseDiagnostics, ParseWarning, SourceLocation};
pub use frontmatter::{Frontmatter, FrontmatterSplit, extract_frontmatter, split_frontmatter};
pub use markdown::{RenderOptions, Rendered, plain_text, render, render_with_options};
pub use reading_time::{
    DEFAULT_WORDS_PER_MINUTE, ReadingTime, ReadingTimeOptions, estimate_reading_time,
};
pub use slug::{heading_id, slugify};
