//! Heading navigation: the table of contents from markdown, and matching
//! `id` attributes on the rendered HTML.
//!
//! Both sides derive ids from the heading's visible text with
//! [`heading_id`], so `#id` links in the table of contents resolve to the
//! injected anchors. The markdown side renders heading markup with the same
//! [`RenderOptions`] as the body; the HTML side decodes entities. Duplicate
//! heading text yields duplicate ids.

use crate::error::ProcessError;
use inkpost_core::{RenderOptions, fenced_line_mask, heading_id, plain_text, split_frontmatter};
use lol_html::{RewriteStrSettings, element, rewrite_str, text};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};

/// Heading levels that receive anchors in rendered HTML.
const ANCHORED_TAGS: [&str; 3] = ["h2", "h3", "h4"];

/// One table-of-contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Anchor id.
    pub id: String,
    /// Visible heading text.
    pub text: String,
    /// 2 to 4.
    pub level: u8,
}

/// Headings in document order.
pub type TableOfContents = Vec<Heading>;

/// Collects `##`, `###` and `####` headings from a raw document rendered
/// with default options.
pub fn extract_toc(raw: &str) -> TableOfContents {
    extract_toc_with_options(raw, &RenderOptions::default())
}

/// Collects `##`, `###` and `####` headings from a raw document.
///
/// The frontmatter block and fenced code are skipped. Heading text is what
/// the heading shows once rendered with `options`.
pub fn extract_toc_with_options(raw: &str, options: &RenderOptions) -> TableOfContents {
    let body = split_frontmatter(raw).body;
    let lines: Vec<&str> = body.lines().collect();
    let fenced = fenced_line_mask(&lines);

    lines
        .iter()
        .zip(fenced)
        .filter(|(_, in_fence)| !in_fence)
        .filter_map(|(line, _)| toc_heading(line, options))
        .collect()
}

/// `#{2,4}` followed by whitespace and non-empty text.
fn toc_heading(line: &str, options: &RenderOptions) -> Option<Heading> {
    let level = line.bytes().take_while(|b| *b == b'#').count();
    if !(2..=4).contains(&level) {
        return None;
    }

    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let source = rest.trim();
    if source.is_empty() {
        return None;
    }

    let text = plain_text(source, options).trim().to_string();
    Some(Heading {
        id: heading_id(&text),
        text,
        level: level as u8,
    })
}

/// Sets `id` on every `<h2>`, `<h3>` and `<h4>` from its decoded text content.
///
/// Runs two passes over the same markup: the first collects each heading's
/// text, the second writes ids in the same element order. Existing ids are
/// replaced. Markup the parser finds ambiguous is parsed leniently rather
/// than rejected.
pub fn inject_ids(html: &str) -> Result<String, ProcessError> {
    let texts = collect_heading_texts(html)?;
    if texts.is_empty() {
        return Ok(html.to_string());
    }

    let ids: Vec<String> = texts
        .iter()
        .map(|text| heading_id(html_escape::decode_html_entities(text).trim()))
        .collect();
    let next = Cell::new(0usize);

    let handlers = ANCHORED_TAGS
        .iter()
        .map(|tag| {
            element!(tag, |el| {
                let index = next.get();
                next.set(index + 1);
                if let Some(id) = ids.get(index) {
                    el.set_attribute("id", id)?;
                }
                Ok(())
            })
        })
        .collect();

    let rewritten = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers,
            strict: false,
            ..RewriteStrSettings::new()
        },
    )?;
    Ok(rewritten)
}

/// Text content of each anchored heading, in element order.
fn collect_heading_texts(html: &str) -> Result<Vec<String>, ProcessError> {
    let texts: RefCell<Vec<String>> = RefCell::new(Vec::new());

    let mut handlers = Vec::with_capacity(ANCHORED_TAGS.len() * 2);
    for tag in ANCHORED_TAGS {
        handlers.push(element!(tag, |_el| {
            texts.borrow_mut().push(String::new());
            Ok(())
        }));
        handlers.push(text!(tag, |chunk| {
            if let Some(current) = texts.borrow_mut().last_mut() {
                current.push_str(chunk.as_str());
            }
            Ok(())
        }));
    }

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers,
            strict: false,
            ..RewriteStrSettings::new()
        },
    )?;

    let collected = texts.into_inner();
    log::debug!("Collected {} anchored headings", collected.len());
    Ok(collected)
}
