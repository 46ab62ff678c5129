//! Code fence detection shared by the markdown lexer and heading scanners.
//!
//! A fence is only recognized when its closing line exists. An unterminated
//! opener is ordinary text, so every consumer must use lookahead
//! ([`find_fence_close`] / [`fenced_line_mask`]) instead of a line-by-line
//! toggle to agree with the renderer.

/// An opening fence line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceOpen<'a> {
    /// Leading whitespace count (visual columns) captured at opening.
    pub indent: usize,
    /// Length of the opening backtick run.
    pub length: usize,
    /// Trimmed info string following the backticks.
    pub info: &'a str,
}

impl<'a> FenceOpen<'a> {
    /// First word of the info string, if any.
    pub fn language(&self) -> Option<&'a str> {
        self.info.split_whitespace().next()
    }
}

/// Parses a fence opener: up to three columns of indentation, three or more
/// backticks, then an optional info string without backticks.
pub fn parse_fence_open(line: &str) -> Option<FenceOpen<'_>> {
    let (visual_indent, byte_offset) = leading_whitespace_info(line);
    if visual_indent > 3 {
        return None;
    }

    let after_indent = &line[byte_offset..];
    let length = backtick_run(after_indent);
    if length < 3 {
        return None;
    }

    let info = after_indent[length..].trim();
    if info.contains('`') {
        return None;
    }

    Some(FenceOpen {
        indent: visual_indent,
        length,
        info,
    })
}

/// Returns true if `line` closes a fence opened with `open_length` backticks.
///
/// A closer has at most three columns of indentation, at least as many
/// backticks as the opener, and nothing but whitespace after them.
pub fn closes_fence(line: &str, open_length: usize) -> bool {
    let (visual_indent, byte_offset) = leading_whitespace_info(line);
    if visual_indent > 3 {
        return false;
    }

    let after_indent = &line[byte_offset..];
    let length = backtick_run(after_indent);
    length >= 3 && length >= open_length && after_indent[length..].trim().is_empty()
}

/// Finds the index of the line closing the fence opened at `open_index`.
pub fn find_fence_close(lines: &[&str], open_index: usize, open_length: usize) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .skip(open_index + 1)
        .find(|(_, line)| closes_fence(line, open_length))
        .map(|(index, _)| index)
}

/// Marks every line that belongs to a terminated fence, delimiters included.
pub fn fenced_line_mask(lines: &[&str]) -> Vec<bool> {
    let mut mask = vec![false; lines.len()];
    let mut index = 0;

    while index < lines.len() {
        if let Some(open) = parse_fence_open(lines[index])
            && let Some(close) = find_fence_close(lines, index, open.length)
        {
            mask[index..=close].fill(true);
            index = close + 1;
            continue;
        }
        index += 1;
    }

    mask
}

/// Returns (visual_columns, byte_offset) for leading whitespace.
/// Visual columns expand tabs to 4-column boundaries.
fn leading_whitespace_info(line: &str) -> (usize, usize) {
    let mut col = 0;
    let mut bytes = 0;
    for b in line.bytes() {
        match b {
            b' ' => {
                col += 1;
                bytes += 1;
            }
            b'\t' => {
                col += 4 - (col % 4);
                bytes += 1;
            }
            _ => break,
        }
    }
    (col, bytes)
}

fn backtick_run(s: &str) -> usize {
    s.bytes().take_while(|b| *b == b'`').count()
}
