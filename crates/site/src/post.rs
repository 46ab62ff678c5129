use chrono::{DateTime, Utc};
use inkpost_core::slugify;
use serde::{Deserialize, Serialize};

/// A tag referenced by posts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// Store identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

impl Tag {
    /// Creates a tag whose slug is derived from its name.
    pub fn from_name(id: u64, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            slug: slugify(&name),
            name,
        }
    }
}

/// A post as delivered by the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Store identifier.
    pub id: u64,
    /// URL slug, unique per post.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Short summary.
    pub excerpt: String,
    /// Raw markdown, frontmatter included.
    pub content: String,
    /// Publication timestamp.
    pub published_at: DateTime<Utc>,
    /// Preformatted reading time, e.g. `"4 min read"`.
    pub reading_time: String,
    /// Optional cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Tags in source order.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Post {
    /// Returns true if any tag has the given slug.
    pub fn has_tag(&self, tag_slug: &str) -> bool {
        self.tags.iter().any(|tag| tag.slug == tag_slug)
    }

    /// Returns true if the two posts share at least one tag id.
    pub fn shares_tag_with(&self, other: &Post) -> bool {
        self.tags
            .iter()
            .any(|tag| other.tags.iter().any(|theirs| theirs.id == tag.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_slug_from_name() {
        let tag = Tag::from_name(3, "Web Development");
        assert_eq!(tag.slug, "web-development");
        assert_eq!(tag.name, "Web Development");
    }

    #[test]
    fn deserializes_store_json() {
        let json = r#"{
            "id": 7,
            "slug": "hello",
            "title": "Hello",
            "excerpt": "First post",
            "content": "Body",
            "publishedAt": "2023-06-15T00:00:00Z",
            "readingTime": "1 min read",
            "tags": [{"id": 1, "name": "Rust", "slug": "rust"}]
        }"#;
        let post: Post = serde_json::from_str(json).expect("valid post json");
        assert_eq!(post.id, 7);
        assert_eq!(post.cover_image, None);
        assert!(post.has_tag("rust"));
        assert!(!post.has_tag("go"));
    }
}
