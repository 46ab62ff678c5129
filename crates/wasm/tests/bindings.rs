use inkpost_wasm::{SearchHandle, estimate_reading_time, extract_toc, process, render_markdown};
use serde::Deserialize;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ProcessOutput {
    html: String,
    toc: Vec<TocEntry>,
    reading_time: String,
    frontmatter: Frontmatter,
}

#[derive(Deserialize, Debug)]
struct TocEntry {
    id: String,
    text: String,
    level: u8,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Frontmatter {
    title: String,
    tags: Vec<String>,
    cover_image: Option<String>,
}

#[derive(Deserialize, Debug)]
struct PostEntry {
    id: u64,
    slug: String,
}

const POSTS: &str = r###"[
    {"id": 1, "slug": "ownership", "title": "Understanding Ownership", "excerpt": "Borrowing explained",
     "content": "## Intro", "publishedAt": "2023-06-15T00:00:00Z", "readingTime": "1 min read",
     "tags": [{"id": 1, "name": "Rust", "slug": "rust"}]},
    {"id": 2, "slug": "tailwind", "title": "Styling with Tailwind", "excerpt": "Utility classes",
     "content": "## Intro", "publishedAt": "2023-06-16T00:00:00Z", "readingTime": "1 min read",
     "tags": [{"id": 2, "name": "CSS", "slug": "css"}]}
]"###;

#[wasm_bindgen_test]
fn process_full_post() {
    let source = "---\ntitle: 'Hello'\ntags: ['rust']\ncoverImage: '/cover.png'\n---\n## Getting Started\nThis is **bold** text.";
    let result = process(source, JsValue::UNDEFINED).expect("process should succeed");
    let result: ProcessOutput = serde_wasm_bindgen::from_value(result).expect("deserialize result");

    assert_eq!(result.frontmatter.title, "Hello");
    assert_eq!(result.frontmatter.tags, vec!["rust"]);
    assert_eq!(result.frontmatter.cover_image.as_deref(), Some("/cover.png"));
    assert!(result.html.contains(r#"<h2 id="getting-started">Getting Started</h2>"#));
    assert!(result.html.contains("<strong>bold</strong>"));
    assert_eq!(result.reading_time, "1 min read");
    assert_eq!(result.toc.len(), 1);
    assert_eq!(result.toc[0].id, "getting-started");
}

#[wasm_bindgen_test]
fn process_without_frontmatter_uses_defaults() {
    let result = process("Just text", JsValue::NULL).expect("process should succeed");
    let result: ProcessOutput = serde_wasm_bindgen::from_value(result).expect("deserialize result");

    assert_eq!(result.frontmatter.title, "Untitled Post");
    assert!(result.frontmatter.tags.is_empty());
    assert!(result.toc.is_empty());
    assert_eq!(result.html, "<p>Just text</p>");
}

#[wasm_bindgen_test]
fn render_markdown_body() {
    let html = render_markdown("# Title\n- a\n- b", JsValue::UNDEFINED);
    assert_eq!(html, "<h1>Title</h1>\n<ul>\n<li>a</li>\n<li>b</li>\n</ul>");
}

#[wasm_bindgen_test]
fn extract_toc_levels() {
    let toc = extract_toc("# Skip\n## Two\n### Three\n#### Four").expect("extract should succeed");
    let toc: Vec<TocEntry> = serde_wasm_bindgen::from_value(toc).expect("deserialize toc");

    let levels: Vec<u8> = toc.iter().map(|h| h.level).collect();
    assert_eq!(levels, vec![2, 3, 4]);
    assert_eq!(toc[1].text, "Three");
}

#[wasm_bindgen_test]
fn reading_time_with_custom_speed() {
    let text = vec!["word"; 300].join(" ");
    assert_eq!(estimate_reading_time(&text, None), "2 min read");
    assert_eq!(estimate_reading_time(&text, Some(300)), "1 min read");
    assert_eq!(estimate_reading_time("", None), "0 min read");
}

#[wasm_bindgen_test]
fn search_handle_query_and_rebuild() {
    let handle = SearchHandle::new(POSTS, JsValue::UNDEFINED).expect("valid posts");
    assert_eq!(handle.size(), 2);

    let hits: Vec<PostEntry> = handle
        .query("tailwind")
        .expect("query should succeed")
        .iter()
        .map(|value| serde_wasm_bindgen::from_value(value).expect("deserialize post"))
        .collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, 2);
    assert_eq!(hits[0].slug, "tailwind");

    assert_eq!(handle.query("a").expect("query should succeed").length(), 0);

    handle.rebuild("[]").expect("valid posts");
    assert_eq!(handle.size(), 0);
    assert_eq!(handle.query("tailwind").expect("query should succeed").length(), 0);
}

#[wasm_bindgen_test]
fn search_handle_rejects_bad_json() {
    assert!(SearchHandle::new("not json", JsValue::UNDEFINED).is_err());
}
