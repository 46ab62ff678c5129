use inkpost_core::{ReadingTime, ReadingTimeOptions, RenderOptions, render_with_options};
use inkpost_site::{Post, PipelineConfig, SearchIndex, SearchOptions, SharedSearchIndex};
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

// ============================================================================
// Config
// ============================================================================

/// Reads an optional options object, falling back to defaults when it is
/// missing or does not match the expected shape.
fn parse_options<T>(value: JsValue) -> T
where
    T: Default + serde::de::DeserializeOwned,
{
    if value.is_undefined() || value.is_null() {
        return T::default();
    }
    serde_wasm_bindgen::from_value(value).unwrap_or_default()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

fn parse_posts(posts_json: &str) -> Result<Vec<Post>, JsError> {
    serde_json::from_str(posts_json).map_err(|e| JsError::new(&format!("Invalid posts: {}", e)))
}

// ============================================================================
// Pipeline API
// ============================================================================

/// Output of [`process`], as seen from JavaScript.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessOutput {
    html: String,
    toc: inkpost_site::TableOfContents,
    reading_time: String,
    frontmatter: inkpost_core::Frontmatter,
}

/// Processes a raw post into `{html, toc, readingTime, frontmatter}`.
///
/// Never throws for bad content: failures produce the placeholder HTML and
/// an empty table of contents. `config` takes the same keys as the YAML
/// pipeline config (`reading`, `render`, `search`).
///
/// # Example (JavaScript)
///
/// ```javascript
/// import { process } from './inkpost_wasm';
///
/// const post = process("---\ntitle: 'Hello'\n---\n## Intro\nText", {
///   reading: { wordsPerMinute: 200 },
/// });
/// // post.toc = [{ id: "intro", text: "Intro", level: 2 }]
/// ```
#[wasm_bindgen]
pub fn process(source: &str, config: JsValue) -> Result<JsValue, JsError> {
    let config: PipelineConfig = parse_options(config);
    let processed = inkpost_site::process_or_placeholder(source, &config);

    to_js(&ProcessOutput {
        html: processed.html,
        toc: processed.toc,
        reading_time: processed.reading_time,
        frontmatter: processed.frontmatter,
    })
}

/// Renders a markdown body (no frontmatter handling) to HTML.
#[wasm_bindgen(js_name = renderMarkdown)]
pub fn render_markdown(body: &str, options: JsValue) -> String {
    let options: RenderOptions = parse_options(options);
    render_with_options(body, &options).html
}

/// Extracts `{id, text, level}` entries for `##`–`####` headings.
#[wasm_bindgen(js_name = extractToc)]
pub fn extract_toc(source: &str) -> Result<JsValue, JsError> {
    to_js(&inkpost_site::extract_toc(source))
}

/// Formats the reading time of `text`, e.g. `"3 min read"`.
#[wasm_bindgen(js_name = estimateReadingTime)]
pub fn estimate_reading_time(text: &str, words_per_minute: Option<u32>) -> String {
    let options = words_per_minute
        .map(|wpm| ReadingTimeOptions {
            words_per_minute: wpm as usize,
        })
        .unwrap_or_default();
    ReadingTime::measure(text, &options).to_string()
}

// ============================================================================
// Search API
// ============================================================================

/// Fuzzy search over a snapshot of posts that can be replaced in place.
#[wasm_bindgen]
pub struct SearchHandle {
    index: SharedSearchIndex,
}

#[wasm_bindgen]
impl SearchHandle {
    /// Builds an index from a JSON array of posts.
    #[wasm_bindgen(constructor)]
    pub fn new(posts_json: &str, options: JsValue) -> Result<SearchHandle, JsError> {
        let options: SearchOptions = parse_options(options);
        let posts = parse_posts(posts_json)?;
        Ok(Self {
            index: SharedSearchIndex::new(SearchIndex::build(posts, options)),
        })
    }

    /// Matching posts, best first, as an array of post objects.
    pub fn query(&self, text: &str) -> Result<js_sys::Array, JsError> {
        let snapshot = self.index.load();
        snapshot
            .query(text)
            .into_iter()
            .map(to_js)
            .collect::<Result<js_sys::Array, JsError>>()
    }

    /// Replaces the indexed posts, keeping the current options.
    pub fn rebuild(&self, posts_json: &str) -> Result<(), JsError> {
        self.index.rebuild(parse_posts(posts_json)?);
        Ok(())
    }

    /// Number of indexed posts.
    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.index.load().len()
    }
}
