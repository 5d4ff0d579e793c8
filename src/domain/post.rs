//! Blog post domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A reader comment attached to a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    /// Creation time in epoch milliseconds; doubles as the identifier.
    pub id: i64,
    pub text: String,
    pub author: String,
    /// Display date (`M/D/YYYY`).
    pub date: String,
}

impl Comment {
    /// Create a comment stamped with the given time.
    pub fn new(text: String, author: String, at: DateTime<Utc>) -> Self {
        Self {
            id: at.timestamp_millis(),
            text,
            author,
            date: at.format("%-m/%-d/%Y").to_string(),
        }
    }
}

/// A published or draft blog post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// Public numeric identifier.
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub subcategory: String,
    pub tags: Vec<String>,
    /// Display date as entered by the author.
    pub date: String,
    pub read_time: String,
    pub image: String,
    pub author: String,
    pub status: String,
    pub likes: i64,
    pub downloads: i64,
    pub comments: Vec<Comment>,
}

/// Fields accepted when creating a post.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPost {
    /// Assigned automatically when absent.
    pub id: Option<i64>,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub subcategory: String,
    pub tags: Vec<String>,
    pub date: String,
    pub read_time: String,
    pub image: String,
    pub author: String,
    pub status: String,
}

/// Partial post update; only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub tags: Option<Vec<String>>,
    pub date: Option<String>,
    pub read_time: Option<String>,
    pub image: Option<String>,
    pub author: Option<String>,
    pub status: Option<String>,
}

impl PostUpdate {
    /// Overwrite the supplied fields of `post`.
    pub fn apply(self, post: &mut BlogPost) {
        if let Some(v) = self.title {
            post.title = v;
        }
        if let Some(v) = self.excerpt {
            post.excerpt = v;
        }
        if let Some(v) = self.content {
            post.content = v;
        }
        if let Some(v) = self.category {
            post.category = v;
        }
        if let Some(v) = self.subcategory {
            post.subcategory = v;
        }
        if let Some(v) = self.tags {
            post.tags = v;
        }
        if let Some(v) = self.date {
            post.date = v;
        }
        if let Some(v) = self.read_time {
            post.read_time = v;
        }
        if let Some(v) = self.image {
            post.image = v;
        }
        if let Some(v) = self.author {
            post.author = v;
        }
        if let Some(v) = self.status {
            post.status = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_comment_stamp() {
        let at = Utc.with_ymd_and_hms(2024, 6, 5, 9, 30, 0).unwrap();
        let comment = Comment::new("Great read".into(), "ada".into(), at);
        assert_eq!(comment.id, at.timestamp_millis());
        assert_eq!(comment.date, "6/5/2024");
    }

    #[test]
    fn test_new_post_accepts_sparse_body() {
        let post: NewPost =
            serde_json::from_str(r#"{"title":"Hello","readTime":"4 min","tags":["rust"]}"#)
                .unwrap();
        assert_eq!(post.id, None);
        assert_eq!(post.title, "Hello");
        assert_eq!(post.read_time, "4 min");
        assert_eq!(post.tags, vec!["rust".to_string()]);
        assert!(post.content.is_empty());
    }

    #[test]
    fn test_post_serializes_camel_case() {
        let post = BlogPost {
            id: 1,
            title: "t".into(),
            excerpt: String::new(),
            content: String::new(),
            category: String::new(),
            subcategory: String::new(),
            tags: vec![],
            date: String::new(),
            read_time: "3 min".into(),
            image: String::new(),
            author: String::new(),
            status: "Published".into(),
            likes: 2,
            downloads: 0,
            comments: vec![],
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["readTime"], "3 min");
    }
}
