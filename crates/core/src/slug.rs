/// Derives the anchor id for a heading's visible text.
///
/// The rule is applied identically to markdown-derived and HTML-derived
/// heading text, so table-of-contents links and injected anchors agree:
/// 1. Lowercase
/// 2. Drop everything except ASCII word characters, whitespace, and hyphens
/// 3. Collapse each run of whitespace, underscores, and hyphens into one hyphen
///
/// Leading and trailing separators are kept, and duplicate headings produce
/// duplicate ids.
///
/// # Examples
///
/// ```
/// use inkpost_core::slug::heading_id;
///
/// assert_eq!(heading_id("Getting Started"), "getting-started");
/// assert_eq!(heading_id("snake_case -- name"), "snake-case-name");
/// ```
pub fn heading_id(text: &str) -> String {
    let mut id = String::with_capacity(text.len());
    let mut in_separator = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_whitespace() || ch == '_' || ch == '-' {
            if !in_separator {
                id.push('-');
                in_separator = true;
            }
        } else if ch.is_ascii_alphanumeric() {
            id.push(ch);
            in_separator = false;
        }
        // Dropped characters do not end a separator run: "a - & b" is "a-b".
    }

    id
}

/// Slugifies free text for URLs (tag slugs, post slugs).
///
/// Same character rule as [`heading_id`], but the input is trimmed first and
/// leading/trailing hyphens are removed from the result.
pub fn slugify(text: &str) -> String {
    heading_id(text.trim()).trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_basic() {
        assert_eq!(heading_id("Hello World"), "hello-world");
    }

    #[test]
    fn duplicates_are_not_suffixed() {
        assert_eq!(heading_id("Title"), heading_id("Title"));
        assert_eq!(heading_id("Title"), "title");
    }

    #[test]
    fn punctuation_is_dropped_without_breaking_runs() {
        assert_eq!(heading_id("What's new?"), "whats-new");
        assert_eq!(heading_id("TypeScript & JSX"), "typescript-jsx");
        assert_eq!(heading_id("a---b"), "a-b");
    }

    #[test]
    fn underscores_collapse_to_hyphens() {
        assert_eq!(heading_id("Using __dirname"), "using-dirname");
        assert_eq!(heading_id("snake_case"), "snake-case");
    }

    #[test]
    fn surrounding_whitespace_is_kept_as_hyphen() {
        assert_eq!(heading_id("  padded  "), "-padded-");
    }

    #[test]
    fn non_ascii_letters_are_dropped() {
        assert_eq!(heading_id("Héllo Wörld"), "hllo-wrld");
        assert_eq!(heading_id("多言語 Guide"), "-guide");
    }

    #[test]
    fn emphasis_markers_match_rendered_text() {
        // `**Bold** move` renders to `<strong>Bold</strong> move`; both ids agree.
        assert_eq!(heading_id("**Bold** move"), heading_id("Bold move"));
    }

    #[test]
    fn parity_cases() {
        let cases: Vec<(&str, &str)> = vec![
            ("Getting Started", "getting-started"),
            ("import.meta.glob", "importmetaglob"),
            ("getStaticPaths()", "getstaticpaths"),
            ("Why Rust?", "why-rust"),
            ("Step 1: Install", "step-1-install"),
            ("Hello\tWorld", "hello-world"),
            ("C++ vs. C#", "c-vs-c"),
            ("100% Done", "100-done"),
        ];

        for (input, expected) in &cases {
            let actual = heading_id(input);
            assert_eq!(
                &actual, expected,
                "Mismatch for {:?}: got {:?}, expected {:?}",
                input, actual, expected
            );
        }
    }

    #[test]
    fn slugify_trims_edges() {
        assert_eq!(slugify("  Rust Tips!  "), "rust-tips");
        assert_eq!(slugify("--Web Dev--"), "web-dev");
        assert_eq!(slugify("???"), "");
    }
}
