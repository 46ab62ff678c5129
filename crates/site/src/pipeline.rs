//! Post processing: one pure call turns raw markdown into everything the
//! display layer needs. Results are cached per slug by [`ContentCache`].

use crate::config::PipelineConfig;
use crate::error::ProcessError;
use crate::post::Post;
use crate::toc::{TableOfContents, extract_toc_with_options, inject_ids};
use inkpost_core::{
    Frontmatter, ParseDiagnostics, ParseWarning, ReadingTime, SourceLocation, render_with_options,
    split_frontmatter,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// HTML shown in place of content that failed to process.
pub const PLACEHOLDER_HTML: &str = "<p>Error processing content</p>";

/// Display-ready output for one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedPost {
    /// Rendered body with heading anchors.
    pub html: String,
    /// Table of contents in document order.
    pub toc: TableOfContents,
    /// Formatted reading time, e.g. `"3 min read"`.
    pub reading_time: String,
    /// Metadata from the frontmatter block.
    pub frontmatter: Frontmatter,
    /// Non-fatal issues, with line numbers relative to the raw document.
    pub diagnostics: ParseDiagnostics,
}

/// Processes a raw document: frontmatter, HTML with anchors, TOC, reading time.
pub fn process(source: &str, config: &PipelineConfig) -> Result<ProcessedPost, ProcessError> {
    let split = split_frontmatter(source);
    let frontmatter = split.block.map(Frontmatter::from_block).unwrap_or_default();

    let mut diagnostics = ParseDiagnostics::new();
    if split.unterminated {
        diagnostics.add_warning(ParseWarning::UnterminatedFrontmatter {
            location: SourceLocation::new(1, 1),
        });
    }

    let rendered = render_with_options(split.body, &config.render);
    let mut body_diagnostics = rendered.diagnostics;
    body_diagnostics.offset_lines(split.body_line_offset);
    diagnostics.extend(body_diagnostics);

    let html = inject_ids(&rendered.html)?;

    Ok(ProcessedPost {
        html,
        toc: extract_toc_with_options(source, &config.render),
        reading_time: ReadingTime::measure(source, &config.reading).to_string(),
        frontmatter,
        diagnostics,
    })
}

/// Like [`process`], but substitutes [`PLACEHOLDER_HTML`] for the body when
/// processing fails.
pub fn process_or_placeholder(source: &str, config: &PipelineConfig) -> ProcessedPost {
    process(source, config).unwrap_or_else(|err| {
        log::error!("Error processing content: {err}");
        ProcessedPost::placeholder(source, config)
    })
}

impl ProcessedPost {
    /// Output used when processing fails. Frontmatter, table of contents and
    /// reading time are infallible, so they are still filled in.
    pub fn placeholder(source: &str, config: &PipelineConfig) -> Self {
        let split = split_frontmatter(source);
        Self {
            html: PLACEHOLDER_HTML.to_string(),
            toc: extract_toc_with_options(source, &config.render),
            reading_time: ReadingTime::measure(source, &config.reading).to_string(),
            frontmatter: split.block.map(Frontmatter::from_block).unwrap_or_default(),
            diagnostics: ParseDiagnostics::new(),
        }
    }
}

/// Processed posts keyed by slug; each slug is processed once until invalidated.
#[derive(Debug, Default)]
pub struct ContentCache {
    config: PipelineConfig,
    entries: RwLock<HashMap<String, Arc<ProcessedPost>>>,
}

impl ContentCache {
    /// Creates an empty cache that processes with `config`.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached output for `post.slug`, processing it on first use.
    ///
    /// Processing happens outside the lock. If two callers race on the same
    /// slug, the first inserted result wins and both receive it.
    pub fn get_or_process(&self, post: &Post) -> Arc<ProcessedPost> {
        if let Some(hit) = self.get(&post.slug) {
            return hit;
        }

        log::debug!("Processing post '{}'", post.slug);
        let processed = Arc::new(process_or_placeholder(&post.content, &self.config));
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(post.slug.clone()).or_insert(processed))
    }

    /// Cached output for `slug`, if any.
    pub fn get(&self, slug: &str) -> Option<Arc<ProcessedPost>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(slug)
            .cloned()
    }

    /// Drops the cached output for `slug`. Returns true if an entry existed.
    pub fn invalidate(&self, slug: &str) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(slug)
            .is_some()
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of cached posts.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
