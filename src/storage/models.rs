//! Database models for Blog Core.
//!
//! These are the row types returned by SQLx queries.

use sqlx::FromRow;

use crate::domain::{Activity, BlogPost, Category, Comment, Subscriber, User};
use crate::error::BlogError;

/// Database row for posts table. Comments are loaded separately.
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub subcategory: String,
    pub tags: String,
    pub date: String,
    pub read_time: String,
    pub image: String,
    pub author: String,
    pub status: String,
    pub likes: i64,
    pub downloads: i64,
}

impl PostRow {
    pub fn into_post(self, comments: Vec<Comment>) -> Result<BlogPost, BlogError> {
        // A stored row that does not decode is a server fault, not a bad request.
        let tags = serde_json::from_str(&self.tags).map_err(|e| {
            BlogError::Internal(format!("Post {} has unreadable tags: {}", self.id, e))
        })?;

        Ok(BlogPost {
            id: self.id,
            title: self.title,
            excerpt: self.excerpt,
            content: self.content,
            category: self.category,
            subcategory: self.subcategory,
            tags,
            date: self.date,
            read_time: self.read_time,
            image: self.image,
            author: self.author,
            status: self.status,
            likes: self.likes,
            downloads: self.downloads,
            comments,
        })
    }
}

/// Database row for post_comments table.
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub post_id: i64,
    pub comment_id: i64,
    pub text: String,
    pub author: String,
    pub date: String,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.comment_id,
            text: row.text,
            author: row.author,
            date: row.date,
        }
    }
}

/// Database row for users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub avatar_url: String,
    pub bio: String,
    pub website: String,
    pub twitter: String,
    pub linkedin: String,
    pub password_hash: Option<String>,
    pub created_at: String,
    pub last_login: Option<String>,
}

impl TryFrom<UserRow> for User {
    type Error = BlogError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            role: row.role.parse().map_err(BlogError::Internal)?,
            status: row.status,
            avatar_url: row.avatar_url,
            bio: row.bio,
            website: row.website,
            twitter: row.twitter,
            linkedin: row.linkedin,
            password_hash: row.password_hash,
            created_at: row.created_at,
            last_login: row.last_login,
        })
    }
}

/// Database row for user_activities table.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityRow {
    pub post_id: i64,
    pub post_title: String,
    pub details: Option<String>,
    pub created_at: String,
}

impl From<ActivityRow> for Activity {
    fn from(row: ActivityRow) -> Self {
        Activity {
            post_id: row.post_id,
            post_title: row.post_title,
            details: row.details,
            timestamp: row.created_at,
        }
    }
}

/// Database row for categories table.
#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
        }
    }
}

/// Database row for subscribers table.
#[derive(Debug, Clone, FromRow)]
pub struct SubscriberRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub status: String,
    pub subscribed_at: String,
}

impl TryFrom<SubscriberRow> for Subscriber {
    type Error = BlogError;

    fn try_from(row: SubscriberRow) -> Result<Self, Self::Error> {
        Ok(Subscriber {
            id: row.id,
            name: row.name,
            email: row.email,
            status: row.status.parse().map_err(BlogError::Internal)?,
            subscribed_at: chrono::DateTime::parse_from_rfc3339(&row.subscribed_at)
                .map_err(|e| BlogError::Internal(e.to_string()))?
                .with_timezone(&chrono::Utc),
        })
    }
}
