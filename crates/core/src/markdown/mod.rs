//! Markdown to HTML rendering for post bodies.
//!
//! Supported syntax: `#`–`###` headings, `**strong**`, `*emphasis*`, fenced
//! code, `` `code` ``, links, images, `-` and `N.` list items. Lines that
//! already start with block-level HTML pass through verbatim, with no inline
//! processing, so `<div>**x**</div>` keeps its asterisks. Every other
//! non-blank line becomes a paragraph. Output is trusted HTML and is not
//! sanitized.

mod html;
/// Tokenizer producing typed blocks and inline spans.
pub mod lexer;

pub use lexer::{Block, Document, Inline, ListKind, lex, parse_inlines};

use crate::error::ParseDiagnostics;
use serde::{Deserialize, Serialize};

/// Renderer options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// HTML-escape the contents of code spans and fenced blocks.
    #[serde(alias = "escape_code")]
    pub escape_code: bool,
}

/// Rendered HTML plus any non-fatal diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// HTML output.
    pub html: String,
    /// Warnings collected while scanning the body.
    pub diagnostics: ParseDiagnostics,
}

/// Renders a markdown body (frontmatter already stripped) with default options.
pub fn render(body: &str) -> String {
    render_with_options(body, &RenderOptions::default()).html
}

/// Renders a markdown body and reports diagnostics.
pub fn render_with_options(body: &str, options: &RenderOptions) -> Rendered {
    let Document {
        blocks,
        diagnostics,
    } = lex(body);
    Rendered {
        html: html::render_blocks(&blocks, options),
        diagnostics,
    }
}

/// Visible text of inline markdown once rendered with `options`.
///
/// The spans are rendered exactly as in a heading, then tags are dropped and
/// entities decoded, which is what an HTML parser reports as the element's
/// text. Link destinations and image alt text are therefore not included.
pub fn plain_text(source: &str, options: &RenderOptions) -> String {
    let html = html::render_inlines(&parse_inlines(source), options);
    html_escape::decode_html_entities(&lexer::strip_tags(&html)).into_owned()
}
