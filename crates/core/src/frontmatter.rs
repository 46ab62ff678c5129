use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Title used when the document does not declare one.
pub const DEFAULT_TITLE: &str = "Untitled Post";

/// Metadata record pulled from the head of a post.
///
/// Only quoted scalars and bracketed lists of quoted strings are understood;
/// anything else in the block is ignored and the field keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    /// Post title; defaults to [`DEFAULT_TITLE`].
    pub title: String,
    /// Publication date as written in the source; defaults to the extraction time (RFC 3339).
    pub date: String,
    /// Tag names in source order.
    pub tags: Vec<String>,
    /// Short summary; defaults to empty.
    pub excerpt: String,
    /// Optional cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Optional author name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl Default for Frontmatter {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            tags: Vec::new(),
            excerpt: String::new(),
            cover_image: None,
            author: None,
        }
    }
}

impl Frontmatter {
    /// Builds a record from the raw lines between the delimiters.
    pub fn from_block(block: &str) -> Self {
        let mut frontmatter = Self::default();

        if let Some(title) = quoted_field(block, "title") {
            frontmatter.title = title.to_string();
        }
        if let Some(date) = quoted_field(block, "date") {
            frontmatter.date = date.to_string();
        }
        if let Some(excerpt) = quoted_field(block, "excerpt") {
            frontmatter.excerpt = excerpt.to_string();
        }
        frontmatter.cover_image = quoted_field(block, "coverImage").map(str::to_string);
        frontmatter.author = quoted_field(block, "author").map(str::to_string);
        if let Some(tags) = list_field(block, "tags") {
            frontmatter.tags = tags;
        }

        frontmatter
    }

    /// Parses `date` as RFC 3339 or a bare `YYYY-MM-DD` (midnight UTC).
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&self.date) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Serializes the record as a JSON object string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A document split at its frontmatter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontmatterSplit<'a> {
    /// Lines between the delimiters, when a terminated block exists.
    pub block: Option<&'a str>,
    /// Markdown content following the block (the whole input when absent).
    pub body: &'a str,
    /// Number of source lines preceding `body`.
    pub body_line_offset: usize,
    /// True when an opening delimiter was found without a closing one.
    pub unterminated: bool,
}

/// Extracts the frontmatter record from a raw document. Never fails.
pub fn extract_frontmatter(input: &str) -> Frontmatter {
    match split_frontmatter(input).block {
        Some(block) => Frontmatter::from_block(block),
        None => Frontmatter::default(),
    }
}

/// Locates a `---` delimited block anchored at the very start of the input.
pub fn split_frontmatter(input: &str) -> FrontmatterSplit<'_> {
    let (without_bom, bom_len) = strip_bom(input);
    let no_block = FrontmatterSplit {
        block: None,
        body: input,
        body_line_offset: 0,
        unterminated: false,
    };

    let Some((first, block_start)) = next_line(without_bom, 0) else {
        return no_block;
    };
    if !is_fence(first) {
        return no_block;
    }

    let mut scan_cursor = block_start;
    let mut lines_seen = 1usize;
    while let Some((line, next_cursor)) = next_line(without_bom, scan_cursor) {
        lines_seen += 1;
        if is_fence(line) {
            let raw_block = &without_bom[block_start..scan_cursor];
            return FrontmatterSplit {
                block: Some(raw_block.trim_end_matches(['\r', '\n'])),
                body: &input[bom_len + next_cursor..],
                body_line_offset: lines_seen,
                unterminated: false,
            };
        }
        scan_cursor = next_cursor;
    }

    FrontmatterSplit {
        unterminated: true,
        ..no_block
    }
}

/// Finds `key: 'value'` or `key: "value"` on its own line; first match wins.
/// An empty quoted value counts as absent.
fn quoted_field<'a>(block: &'a str, key: &str) -> Option<&'a str> {
    block
        .lines()
        .find_map(|line| {
            let rest = field_value(line, key)?;
            let quote = rest.chars().next().filter(|c| *c == '\'' || *c == '"')?;
            let inner = &rest[1..];
            inner.find(quote).map(|end| &inner[..end])
        })
        .filter(|value| !value.is_empty())
}

/// Finds `key: [...]` and splits its items on commas, dropping quote characters.
fn list_field(block: &str, key: &str) -> Option<Vec<String>> {
    block.lines().find_map(|line| {
        let rest = field_value(line, key)?.strip_prefix('[')?;
        let inner = &rest[..rest.find(']')?];
        Some(
            inner
                .split(',')
                .map(|item| item.trim().replace(['\'', '"'], ""))
                .filter(|item| !item.is_empty())
                .collect(),
        )
    })
}

/// Returns the text following `key:` and any whitespace.
fn field_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line.trim_start().strip_prefix(key)?.strip_prefix(':')?;
    Some(rest.trim_start())
}

fn strip_bom(input: &str) -> (&str, usize) {
    if let Some(stripped) = input.strip_prefix('\u{feff}') {
        (stripped, '\u{feff}'.len_utf8())
    } else {
        (input, 0)
    }
}

fn next_line(input: &str, start: usize) -> Option<(&str, usize)> {
    if start >= input.len() {
        return None;
    }

    let bytes = &input.as_bytes()[start..];
    if let Some(pos) = bytes.iter().position(|b| *b == b'\n') {
        let line_end = start + pos;
        Some((&input[start..line_end], line_end + 1))
    } else {
        Some((&input[start..], input.len()))
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches('\r') == "---"
}
