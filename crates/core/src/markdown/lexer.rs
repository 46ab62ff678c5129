//! Single-pass tokenizer: source lines become typed blocks carrying inline spans.
//!
//! Every construct is recognized exactly once, from the source text, so
//! markup produced for one construct can never be matched by another
//! (emphasis inside code, italics inside an emitted `<strong>`, ...).

use crate::code_fence::{find_fence_close, parse_fence_open};
use crate::error::{ParseDiagnostics, ParseWarning, SourceLocation};

/// Inline span inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline<'a> {
    /// Literal text, emitted unchanged.
    Text(&'a str),
    /// `**text**`
    Strong(Vec<Inline<'a>>),
    /// `*text*`
    Emphasis(Vec<Inline<'a>>),
    /// `` `code` ``; contents are never interpreted.
    Code(&'a str),
    /// `[text](url)`
    Link {
        /// Link label spans.
        text: Vec<Inline<'a>>,
        /// Destination, verbatim.
        url: &'a str,
    },
    /// `![alt](url)`
    Image {
        /// Alternative text, verbatim.
        alt: &'a str,
        /// Source, verbatim.
        url: &'a str,
    },
}

/// List flavour of a list item line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `- item`
    Unordered,
    /// `1. item`
    Ordered,
}

/// One block-level token. Every source line yields exactly one block, except
/// fenced code, which consumes its delimiters and contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    /// `#`, `##` or `###` heading line.
    Heading {
        /// 1 to 3.
        level: u8,
        /// Heading spans.
        content: Vec<Inline<'a>>,
    },
    /// Terminated fenced code block.
    CodeFence {
        /// First word of the info string.
        language: Option<&'a str>,
        /// Lines between the delimiters.
        lines: Vec<&'a str>,
    },
    /// A single list item line.
    ListItem {
        /// Ordered or unordered.
        kind: ListKind,
        /// Item spans.
        content: Vec<Inline<'a>>,
    },
    /// Any other text line.
    Paragraph(Vec<Inline<'a>>),
    /// A line that already starts with a block-level HTML tag.
    Html(&'a str),
    /// Whitespace-only line.
    Blank,
}

/// Token stream for a markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'a> {
    /// Blocks in source order.
    pub blocks: Vec<Block<'a>>,
    /// Non-fatal issues found while scanning.
    pub diagnostics: ParseDiagnostics,
}

/// HTML tags that mark a line as already rendered block markup.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "details",
    "dialog",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "iframe",
    "img",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "picture",
    "pre",
    "script",
    "section",
    "style",
    "summary",
    "table",
    "ul",
    "video",
];

/// Tokenizes a markdown body (frontmatter already removed).
pub fn lex(body: &str) -> Document<'_> {
    let lines: Vec<&str> = body.lines().collect();
    let mut blocks = Vec::with_capacity(lines.len());
    let mut diagnostics = ParseDiagnostics::new();
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];

        if let Some(open) = parse_fence_open(line) {
            if let Some(close) = find_fence_close(&lines, index, open.length) {
                blocks.push(Block::CodeFence {
                    language: open.language(),
                    lines: lines[index + 1..close].to_vec(),
                });
                index = close + 1;
                continue;
            }

            log::debug!("Unclosed code fence on line {}, emitting as text", index + 1);
            diagnostics.add_warning(ParseWarning::UnclosedCodeFence {
                location: SourceLocation::new(index + 1, open.indent + 1),
                length: open.length,
                context: line.trim().to_string(),
            });
        }

        blocks.push(lex_line(line));
        index += 1;
    }

    Document {
        blocks,
        diagnostics,
    }
}

fn lex_line(line: &str) -> Block<'_> {
    if line.trim().is_empty() {
        return Block::Blank;
    }

    if let Some((level, text)) = heading_line(line) {
        return Block::Heading {
            level,
            content: parse_inlines(text.trim()),
        };
    }

    let indented = line.trim_start();
    if let Some(item) = indented.strip_prefix("- ") {
        return Block::ListItem {
            kind: ListKind::Unordered,
            content: parse_inlines(item.trim()),
        };
    }
    if let Some(item) = ordered_item(indented) {
        return Block::ListItem {
            kind: ListKind::Ordered,
            content: parse_inlines(item.trim()),
        };
    }

    if starts_with_block_tag(indented) {
        return Block::Html(line);
    }

    Block::Paragraph(parse_inlines(line.trim()))
}

/// `# `, `## ` or `### ` at the very start of the line. Deeper levels are text.
fn heading_line(line: &str) -> Option<(u8, &str)> {
    [("### ", 3), ("## ", 2), ("# ", 1)]
        .into_iter()
        .find_map(|(prefix, level)| line.strip_prefix(prefix).map(|text| (level, text)))
}

/// `N. item` with one or more digits.
fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}

fn starts_with_block_tag(line: &str) -> bool {
    let Some(rest) = line.strip_prefix('<') else {
        return false;
    };
    if rest.starts_with("!--") {
        return true;
    }

    let rest = rest.strip_prefix('/').unwrap_or(rest);
    let name_len = rest
        .bytes()
        .take_while(u8::is_ascii_alphanumeric)
        .count();
    if name_len == 0 {
        return false;
    }

    let name = rest[..name_len].to_ascii_lowercase();
    let terminated = matches!(
        rest.as_bytes().get(name_len).copied(),
        None | Some(b'>' | b' ' | b'/' | b'\t')
    );
    terminated && BLOCK_TAGS.contains(&name.as_str())
}

/// Splits inline text into spans.
///
/// Recognition order at each position: code span, image, link, strong,
/// emphasis. Anything that does not form a complete construct stays text.
pub fn parse_inlines(text: &str) -> Vec<Inline<'_>> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let matched = match bytes[i] {
            b'`' => code_span(text, i),
            b'!' if bytes.get(i + 1) == Some(&b'[') => image(text, i),
            b'[' => link(text, i),
            b'*' if bytes.get(i + 1) == Some(&b'*') => strong(text, i),
            b'*' => emphasis(text, i),
            _ => None,
        };

        match matched {
            Some((span, end)) => {
                if text_start < i {
                    spans.push(Inline::Text(&text[text_start..i]));
                }
                spans.push(span);
                i = end;
                text_start = end;
            }
            None => i += 1,
        }
    }

    if text_start < bytes.len() {
        spans.push(Inline::Text(&text[text_start..]));
    }

    spans
}

/// Returns the byte index just past a non-empty code span starting at `start`.
fn code_span_end(text: &str, start: usize) -> Option<usize> {
    let close = text[start + 1..].find('`')?;
    (close > 0).then_some(start + 1 + close + 1)
}

fn code_span(text: &str, start: usize) -> Option<(Inline<'_>, usize)> {
    let end = code_span_end(text, start)?;
    Some((Inline::Code(&text[start + 1..end - 1]), end))
}

/// Parses `[label](url)` at `start`, returning label, url and end index.
fn bracketed(text: &str, start: usize) -> Option<(&str, &str, usize)> {
    let label_start = start + 1;
    let label_end = label_start + text[label_start..].find(']')?;
    let url_start = label_end + 1;
    if text.as_bytes().get(url_start) != Some(&b'(') {
        return None;
    }
    let url_end = url_start + 1 + text[url_start + 1..].find(')')?;
    let url = &text[url_start + 1..url_end];
    if url.is_empty() {
        return None;
    }
    Some((&text[label_start..label_end], url, url_end + 1))
}

fn image(text: &str, start: usize) -> Option<(Inline<'_>, usize)> {
    let (alt, url, end) = bracketed(text, start + 1)?;
    Some((Inline::Image { alt, url }, end))
}

fn link(text: &str, start: usize) -> Option<(Inline<'_>, usize)> {
    let (label, url, end) = bracketed(text, start)?;
    if label.is_empty() {
        return None;
    }
    Some((
        Inline::Link {
            text: parse_inlines(label),
            url,
        },
        end,
    ))
}

fn strong(text: &str, start: usize) -> Option<(Inline<'_>, usize)> {
    let inner_start = start + 2;
    let close = find_delimiter(text, inner_start, true)?;
    let inner = &text[inner_start..close];
    flanked(inner).then(|| (Inline::Strong(parse_inlines(inner)), close + 2))
}

fn emphasis(text: &str, start: usize) -> Option<(Inline<'_>, usize)> {
    let inner_start = start + 1;
    let close = find_delimiter(text, inner_start, false)?;
    let inner = &text[inner_start..close];
    flanked(inner).then(|| (Inline::Emphasis(parse_inlines(inner)), close + 1))
}

/// Finds the closing `**` (`double`) or lone `*`, skipping code spans.
/// A lone-star search steps over `**` pairs so nested strong spans survive.
fn find_delimiter(text: &str, from: usize, double: bool) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut j = from;

    while j < bytes.len() {
        match bytes[j] {
            b'`' => {
                j = code_span_end(text, j).unwrap_or(j + 1);
            }
            b'*' => {
                let pair = bytes.get(j + 1) == Some(&b'*');
                if double == pair {
                    return Some(j);
                }
                j += if pair { 2 } else { 1 };
            }
            _ => j += 1,
        }
    }

    None
}

/// Emphasis content must be non-empty and must not start or end with whitespace,
/// so `2 * 3 * 4` stays literal.
fn flanked(inner: &str) -> bool {
    !inner.is_empty() && inner.trim() == inner
}

/// Removes `<tag ...>` and `</tag>` sequences; a `<` not followed by a letter,
/// `/` or `!` is text.
pub(super) fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let is_tag = after
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!');
        match after.find('>') {
            Some(close) if is_tag => rest = &after[close + 1..],
            _ => {
                out.push('<');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_before_italic() {
        let spans = parse_inlines("**bold** and *italic*");
        assert_eq!(
            spans,
            vec![
                Inline::Strong(vec![Inline::Text("bold")]),
                Inline::Text(" and "),
                Inline::Emphasis(vec![Inline::Text("italic")]),
            ]
        );
    }

    #[test]
    fn strong_nested_in_emphasis() {
        let spans = parse_inlines("*a **b** c*");
        assert_eq!(
            spans,
            vec![Inline::Emphasis(vec![
                Inline::Text("a "),
                Inline::Strong(vec![Inline::Text("b")]),
                Inline::Text(" c"),
            ])]
        );
    }

    #[test]
    fn code_span_contents_are_literal() {
        let spans = parse_inlines("`*not em*` done");
        assert_eq!(
            spans,
            vec![Inline::Code("*not em*"), Inline::Text(" done")]
        );
    }

    #[test]
    fn emphasis_skips_star_inside_code() {
        let spans = parse_inlines("*see `a*b` here*");
        assert_eq!(
            spans,
            vec![Inline::Emphasis(vec![
                Inline::Text("see "),
                Inline::Code("a*b"),
                Inline::Text(" here"),
            ])]
        );
    }

    #[test]
    fn spaced_stars_stay_literal() {
        assert_eq!(parse_inlines("2 * 3 * 4"), vec![Inline::Text("2 * 3 * 4")]);
        assert_eq!(parse_inlines("** **"), vec![Inline::Text("** **")]);
    }

    #[test]
    fn image_is_not_a_link() {
        let spans = parse_inlines("![alt](a.png)");
        assert_eq!(
            spans,
            vec![Inline::Image {
                alt: "alt",
                url: "a.png"
            }]
        );
    }

    #[test]
    fn link_label_is_parsed() {
        let spans = parse_inlines("[**Docs**](https://docs.rs)");
        assert_eq!(
            spans,
            vec![Inline::Link {
                text: vec![Inline::Strong(vec![Inline::Text("Docs")])],
                url: "https://docs.rs",
            }]
        );
    }

    #[test]
    fn incomplete_constructs_are_text() {
        assert_eq!(parse_inlines("[x] (y)"), vec![Inline::Text("[x] (y)")]);
        assert_eq!(parse_inlines("[](y)"), vec![Inline::Text("[](y)")]);
        assert_eq!(parse_inlines("`open"), vec![Inline::Text("`open")]);
        assert_eq!(parse_inlines("**open"), vec![Inline::Text("**open")]);
    }

    #[test]
    fn multibyte_text_survives() {
        let spans = parse_inlines("café *naïve* 日本");
        assert_eq!(
            spans,
            vec![
                Inline::Text("café "),
                Inline::Emphasis(vec![Inline::Text("naïve")]),
                Inline::Text(" 日本"),
            ]
        );
    }

    #[test]
    fn block_classification() {
        let doc = lex("# One\n## Two\n### Three\n#### Four\n- a\n  - b\n3. c\n<div>x</div>\n<span>y</span>\n\nplain");
        let kinds: Vec<&str> = doc
            .blocks
            .iter()
            .map(|block| match block {
                Block::Heading { .. } => "heading",
                Block::CodeFence { .. } => "fence",
                Block::ListItem {
                    kind: ListKind::Unordered,
                    ..
                } => "ul",
                Block::ListItem {
                    kind: ListKind::Ordered,
                    ..
                } => "ol",
                Block::Paragraph(_) => "p",
                Block::Html(_) => "html",
                Block::Blank => "blank",
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "heading", "heading", "heading", "p", "ul", "ul", "ol", "html", "p", "blank", "p"
            ]
        );
    }

    #[test]
    fn fence_consumes_its_lines() {
        let doc = lex("```rust\n## not a heading\n```\nafter");
        assert_eq!(
            doc.blocks,
            vec![
                Block::CodeFence {
                    language: Some("rust"),
                    lines: vec!["## not a heading"],
                },
                Block::Paragraph(vec![Inline::Text("after")]),
            ]
        );
        assert!(!doc.diagnostics.has_warnings());
    }

    #[test]
    fn unclosed_fence_is_reported() {
        let doc = lex("text\n```js\nlet x = 1;");
        assert_eq!(doc.blocks.len(), 3);
        assert_eq!(doc.diagnostics.count(), 1);
        let warning = &doc.diagnostics.warnings[0];
        assert_eq!(warning.location(), &SourceLocation::new(2, 1));
    }
}
