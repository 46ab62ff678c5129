//! Structural HTML emission over the lexer's block stream.

use super::RenderOptions;
use super::lexer::{Block, Inline, ListKind};
use std::borrow::Cow;

/// Renders blocks to HTML, one output line per block, joined with `\n`.
///
/// Consecutive list items of the same kind share one `<ul>`/`<ol>` wrapper.
pub(super) fn render_blocks(blocks: &[Block<'_>], options: &RenderOptions) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(blocks.len());
    let mut iter = blocks.iter().peekable();

    while let Some(block) = iter.next() {
        let html = match block {
            Block::Heading { level, content } => {
                format!("<h{level}>{}</h{level}>", render_inlines(content, options))
            }
            Block::CodeFence { language, lines } => render_fence(*language, lines, options),
            Block::ListItem { kind, content } => {
                let tag = match kind {
                    ListKind::Unordered => "ul",
                    ListKind::Ordered => "ol",
                };
                let mut list = format!("<{tag}>\n<li>{}</li>", render_inlines(content, options));
                while let Some(Block::ListItem { content, .. }) = iter.next_if(
                    |next| matches!(next, Block::ListItem { kind: next_kind, .. } if next_kind == kind),
                ) {
                    list.push_str("\n<li>");
                    list.push_str(&render_inlines(content, options));
                    list.push_str("</li>");
                }
                list.push_str(&format!("\n</{tag}>"));
                list
            }
            Block::Paragraph(content) => format!("<p>{}</p>", render_inlines(content, options)),
            Block::Html(raw) => (*raw).to_string(),
            Block::Blank => String::new(),
        };
        lines.push(html);
    }

    lines.join("\n")
}

fn render_fence(language: Option<&str>, lines: &[&str], options: &RenderOptions) -> String {
    let code = lines.join("\n");
    let mut html = String::with_capacity(code.len() + 48);
    match language {
        Some(language) => {
            html.push_str("<pre><code class=\"language-");
            html.push_str(language);
            html.push_str("\">");
        }
        None => html.push_str("<pre><code>"),
    }
    html.push_str(&code_text(&code, options));
    html.push_str("</code></pre>");
    html
}

pub(super) fn render_inlines(spans: &[Inline<'_>], options: &RenderOptions) -> String {
    let mut out = String::new();
    write_inlines(spans, options, &mut out);
    out
}

fn write_inlines(spans: &[Inline<'_>], options: &RenderOptions, out: &mut String) {
    for span in spans {
        match span {
            Inline::Text(text) => out.push_str(text),
            Inline::Strong(children) => {
                out.push_str("<strong>");
                write_inlines(children, options, out);
                out.push_str("</strong>");
            }
            Inline::Emphasis(children) => {
                out.push_str("<em>");
                write_inlines(children, options, out);
                out.push_str("</em>");
            }
            Inline::Code(code) => {
                out.push_str("<code>");
                out.push_str(&code_text(code, options));
                out.push_str("</code>");
            }
            Inline::Link { text, url } => {
                out.push_str("<a href=\"");
                out.push_str(url);
                out.push_str("\">");
                write_inlines(text, options, out);
                out.push_str("</a>");
            }
            Inline::Image { alt, url } => {
                out.push_str("<img src=\"");
                out.push_str(url);
                out.push_str("\" alt=\"");
                out.push_str(alt);
                out.push_str("\">");
            }
        }
    }
}

fn code_text<'a>(code: &'a str, options: &RenderOptions) -> Cow<'a, str> {
    if options.escape_code {
        html_escape::encode_text(code)
    } else {
        Cow::Borrowed(code)
    }
}
