//! Repository layer for database operations.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use crate::domain::{
    Activity, ActivityKind, BlogPost, Category, Comment, NewCategory, NewPost, NewSubscriber,
    NewUser, PostUpdate, Subscriber, SubscriberStatus, SubscriberUpdate, User, UserProfile,
    UserUpdate,
};
use crate::error::{BlogError, BlogResult};
use crate::storage::models::{
    ActivityRow, CategoryRow, CommentRow, PostRow, SubscriberRow, UserRow,
};

/// Map a unique-constraint violation to a client error.
fn conflict(err: sqlx::Error, message: impl FnOnce() -> String) -> BlogError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => BlogError::BadRequest(message()),
        _ => BlogError::Database(err),
    }
}

/// Repository for all blog database operations.
#[derive(Clone)]
pub struct BlogRepository {
    pool: SqlitePool,
}

impl BlogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Check the database answers.
    pub async fn ping(&self) -> BlogResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Initialize the database schema.
    pub async fn init_schema(&self) -> BlogResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                excerpt TEXT NOT NULL DEFAULT '',
                content TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT '',
                subcategory TEXT NOT NULL DEFAULT '',
                tags TEXT NOT NULL DEFAULT '[]',
                date TEXT NOT NULL DEFAULT '',
                read_time TEXT NOT NULL DEFAULT '',
                image TEXT NOT NULL DEFAULT '',
                author TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL DEFAULT '',
                likes INTEGER NOT NULL DEFAULT 0,
                downloads INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_posts_subcategory ON posts(subcategory);
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS post_comments (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id INTEGER NOT NULL,
                comment_id INTEGER NOT NULL,
                text TEXT NOT NULL,
                author TEXT NOT NULL,
                date TEXT NOT NULL,
                FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_post_comments_post ON post_comments(post_id);
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL DEFAULT '',
                role TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'active',
                avatar_url TEXT NOT NULL DEFAULT '',
                bio TEXT NOT NULL DEFAULT '',
                website TEXT NOT NULL DEFAULT '',
                twitter TEXT NOT NULL DEFAULT '',
                linkedin TEXT NOT NULL DEFAULT '',
                password_hash TEXT,
                created_at TEXT NOT NULL,
                last_login TEXT
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_activities (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                post_id INTEGER NOT NULL,
                post_title TEXT NOT NULL,
                details TEXT,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_user_activities_user ON user_activities(user_id, kind);
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS subscribers (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL UNIQUE,
                status TEXT NOT NULL,
                subscribed_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ==================== Posts ====================

    async fn comments_by_post(&self, post_id: Option<i64>) -> BlogResult<HashMap<i64, Vec<Comment>>> {
        let rows: Vec<CommentRow> = match post_id {
            Some(id) => {
                sqlx::query_as(
                    "SELECT post_id, comment_id, text, author, date FROM post_comments WHERE post_id = ? ORDER BY seq",
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT post_id, comment_id, text, author, date FROM post_comments ORDER BY seq",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        let mut grouped: HashMap<i64, Vec<Comment>> = HashMap::new();
        for row in rows {
            grouped.entry(row.post_id).or_default().push(row.into());
        }
        Ok(grouped)
    }

    async fn assemble_posts(&self, rows: Vec<PostRow>) -> BlogResult<Vec<BlogPost>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut comments = self.comments_by_post(None).await?;
        rows.into_iter()
            .map(|row| {
                let post_comments = comments.remove(&row.id).unwrap_or_default();
                row.into_post(post_comments)
            })
            .collect()
    }

    /// List all posts, newest id first.
    pub async fn list_posts(&self) -> BlogResult<Vec<BlogPost>> {
        let rows: Vec<PostRow> = sqlx::query_as("SELECT * FROM posts ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await?;

        self.assemble_posts(rows).await
    }

    /// List posts in a subcategory.
    pub async fn list_posts_by_subcategory(&self, subcategory: &str) -> BlogResult<Vec<BlogPost>> {
        let rows: Vec<PostRow> =
            sqlx::query_as("SELECT * FROM posts WHERE subcategory = ? ORDER BY id DESC")
                .bind(subcategory)
                .fetch_all(&self.pool)
                .await?;

        self.assemble_posts(rows).await
    }

    /// List posts carrying a tag.
    pub async fn list_posts_by_tag(&self, tag: &str) -> BlogResult<Vec<BlogPost>> {
        let rows: Vec<PostRow> = sqlx::query_as(
            r#"
            SELECT * FROM posts p
            WHERE EXISTS (SELECT 1 FROM json_each(p.tags) t WHERE t.value = ?)
            ORDER BY p.id DESC
            "#,
        )
        .bind(tag)
        .fetch_all(&self.pool)
        .await?;

        self.assemble_posts(rows).await
    }

    /// Every distinct tag in use, sorted.
    pub async fn list_tags(&self) -> BlogResult<Vec<String>> {
        let tags: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT t.value FROM posts p, json_each(p.tags) t ORDER BY t.value",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    /// Get a post by ID.
    pub async fn get_post(&self, id: i64) -> BlogResult<BlogPost> {
        let row: PostRow = sqlx::query_as("SELECT * FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| BlogError::NotFound(format!("Post {} not found", id)))?;

        let comments = self
            .comments_by_post(Some(id))
            .await?
            .remove(&id)
            .unwrap_or_default();
        row.into_post(comments)
    }

    /// Create a post; the id is `max + 1` when not supplied.
    pub async fn create_post(&self, post: NewPost) -> BlogResult<BlogPost> {
        let tags = serde_json::to_string(&post.tags)?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO posts (id, title, excerpt, content, category, subcategory, tags, date,
                               read_time, image, author, status, likes, downloads, created_at)
            VALUES (COALESCE(?, (SELECT COALESCE(MAX(id), 0) + 1 FROM posts)),
                    ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, 0, ?)
            RETURNING id
            "#,
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.category)
        .bind(&post.subcategory)
        .bind(&tags)
        .bind(&post.date)
        .bind(&post.read_time)
        .bind(&post.image)
        .bind(&post.author)
        .bind(&post.status)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict(e, || format!("Post {} already exists", post.id.unwrap_or_default())))?;

        self.get_post(id).await
    }

    /// Apply a partial update to a post.
    pub async fn update_post(&self, id: i64, update: PostUpdate) -> BlogResult<BlogPost> {
        let mut post = self.get_post(id).await?;
        update.apply(&mut post);

        sqlx::query(
            r#"
            UPDATE posts SET title = ?, excerpt = ?, content = ?, category = ?, subcategory = ?,
                             tags = ?, date = ?, read_time = ?, image = ?, author = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&post.title)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.category)
        .bind(&post.subcategory)
        .bind(serde_json::to_string(&post.tags)?)
        .bind(&post.date)
        .bind(&post.read_time)
        .bind(&post.image)
        .bind(&post.author)
        .bind(&post.status)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(post)
    }

    /// Delete a post and its comments.
    pub async fn delete_post(&self, id: i64) -> BlogResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BlogError::NotFound(format!("Post {} not found", id)));
        }

        sqlx::query("DELETE FROM post_comments WHERE post_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Increment the like counter; returns the new count.
    pub async fn like_post(&self, id: i64) -> BlogResult<i64> {
        sqlx::query_scalar("UPDATE posts SET likes = likes + 1 WHERE id = ? RETURNING likes")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| BlogError::NotFound(format!("Post {} not found", id)))
    }

    /// Decrement the like counter, never below zero.
    pub async fn unlike_post(&self, id: i64) -> BlogResult<i64> {
        sqlx::query_scalar(
            "UPDATE posts SET likes = likes - 1 WHERE id = ? AND likes > 0 RETURNING likes",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| BlogError::NotFound("Post not found or has no likes".to_string()))
    }

    /// Increment the download counter; returns the new count.
    pub async fn increment_downloads(&self, id: i64) -> BlogResult<i64> {
        sqlx::query_scalar(
            "UPDATE posts SET downloads = downloads + 1 WHERE id = ? RETURNING downloads",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| BlogError::NotFound(format!("Post {} not found", id)))
    }

    async fn post_title(&self, id: i64) -> BlogResult<String> {
        sqlx::query_scalar("SELECT title FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| BlogError::NotFound(format!("Post {} not found", id)))
    }

    /// Append a comment to a post.
    pub async fn add_comment(&self, post_id: i64, comment: &Comment) -> BlogResult<()> {
        self.post_title(post_id).await?;

        sqlx::query(
            "INSERT INTO post_comments (post_id, comment_id, text, author, date) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(post_id)
        .bind(comment.id)
        .bind(&comment.text)
        .bind(&comment.author)
        .bind(&comment.date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Comments on a post, oldest first.
    pub async fn list_comments(&self, post_id: i64) -> BlogResult<Vec<Comment>> {
        self.post_title(post_id).await?;

        Ok(self
            .comments_by_post(Some(post_id))
            .await?
            .remove(&post_id)
            .unwrap_or_default())
    }

    // ==================== Users ====================

    /// List all users.
    pub async fn list_users(&self) -> BlogResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Create a user; usernames are unique.
    pub async fn create_user(&self, user: NewUser) -> BlogResult<User> {
        let id = user
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let password_hash = user
            .password
            .filter(|p| !p.is_empty())
            .map(|p| User::hash_password(&p));

        sqlx::query(
            r#"
            INSERT INTO users (id, username, first_name, last_name, email, role, status,
                               password_hash, created_at)
            VALUES (?, ?, ?, ?, ?, ?, 'active', ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(user.role.to_string())
        .bind(&password_hash)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| conflict(e, || format!("User '{}' already exists", user.username)))?;

        self.get_user(&id).await
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> BlogResult<User> {
        let row: UserRow = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| BlogError::NotFound(format!("User {} not found", id)))?;

        row.try_into()
    }

    /// Get a user by username.
    pub async fn get_user_by_username(&self, username: &str) -> BlogResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.try_into()).transpose()
    }

    /// Apply a partial update to a user.
    pub async fn update_user(&self, id: &str, update: UserUpdate) -> BlogResult<User> {
        let mut user = self.get_user(id).await?;
        update.apply(&mut user);

        sqlx::query(
            r#"
            UPDATE users SET username = ?, first_name = ?, last_name = ?, email = ?, role = ?,
                             status = ?, avatar_url = ?, bio = ?, website = ?, twitter = ?,
                             linkedin = ?, password_hash = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(user.role.to_string())
        .bind(&user.status)
        .bind(&user.avatar_url)
        .bind(&user.bio)
        .bind(&user.website)
        .bind(&user.twitter)
        .bind(&user.linkedin)
        .bind(&user.password_hash)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict(e, || format!("User '{}' already exists", user.username)))?;

        Ok(user)
    }

    /// Record a successful login.
    pub async fn touch_last_login(&self, id: &str) -> BlogResult<String> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(now)
    }

    /// Delete a user and their activity.
    pub async fn delete_user(&self, id: &str) -> BlogResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BlogError::NotFound(format!("User {} not found", id)));
        }

        sqlx::query("DELETE FROM user_activities WHERE user_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Record that a user interacted with a post.
    pub async fn record_activity(
        &self,
        user_id: &str,
        kind: ActivityKind,
        post_id: i64,
        details: Option<&str>,
    ) -> BlogResult<()> {
        let title = self.post_title(post_id).await?;

        sqlx::query(
            r#"
            INSERT INTO user_activities (user_id, kind, post_id, post_title, details, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(kind.to_string())
        .bind(post_id)
        .bind(&title)
        .bind(details)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Drop the most recent matching activity; returns whether one existed.
    pub async fn remove_activity(
        &self,
        user_id: &str,
        kind: ActivityKind,
        post_id: i64,
    ) -> BlogResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_activities WHERE seq = (
                SELECT seq FROM user_activities
                WHERE user_id = ? AND kind = ? AND post_id = ?
                ORDER BY seq DESC LIMIT 1
            )
            "#,
        )
        .bind(user_id)
        .bind(kind.to_string())
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_activities(&self, user_id: &str, kind: ActivityKind) -> BlogResult<Vec<Activity>> {
        let rows: Vec<ActivityRow> = sqlx::query_as(
            r#"
            SELECT post_id, post_title, details, created_at FROM user_activities
            WHERE user_id = ? AND kind = ?
            ORDER BY seq DESC
            "#,
        )
        .bind(user_id)
        .bind(kind.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Activity::from).collect())
    }

    /// A user with their recorded comments, likes and downloads.
    pub async fn get_user_profile(&self, id: &str) -> BlogResult<UserProfile> {
        let profile = self.get_user(id).await?;

        Ok(UserProfile {
            comments: self.list_activities(id, ActivityKind::Comment).await?,
            likes: self.list_activities(id, ActivityKind::Like).await?,
            downloads: self.list_activities(id, ActivityKind::Download).await?,
            profile,
        })
    }

    // ==================== Categories ====================

    /// List all categories.
    pub async fn list_categories(&self) -> BlogResult<Vec<Category>> {
        let rows: Vec<CategoryRow> = sqlx::query_as("SELECT * FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Create a category.
    pub async fn create_category(&self, category: NewCategory) -> BlogResult<Category> {
        let category = Category::new(category.id, category.name);
        if category.id.is_empty() {
            return Err(BlogError::BadRequest("Category name is required".to_string()));
        }

        sqlx::query("INSERT INTO categories (id, name) VALUES (?, ?)")
            .bind(&category.id)
            .bind(&category.name)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict(e, || format!("Category '{}' already exists", category.id)))?;

        Ok(category)
    }

    /// Rename a category.
    pub async fn update_category(&self, id: &str, name: &str) -> BlogResult<Category> {
        let result = sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BlogError::NotFound(format!("Category {} not found", id)));
        }

        Ok(Category {
            id: id.to_string(),
            name: name.to_string(),
        })
    }

    /// Delete a category.
    pub async fn delete_category(&self, id: &str) -> BlogResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BlogError::NotFound(format!("Category {} not found", id)));
        }

        Ok(())
    }

    // ==================== Subscribers ====================

    /// List all subscribers.
    pub async fn list_subscribers(&self) -> BlogResult<Vec<Subscriber>> {
        let rows: Vec<SubscriberRow> = sqlx::query_as("SELECT * FROM subscribers ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Email addresses of active subscribers.
    pub async fn list_active_subscriber_emails(&self) -> BlogResult<Vec<String>> {
        let emails: Vec<String> =
            sqlx::query_scalar("SELECT email FROM subscribers WHERE status = ? ORDER BY id")
                .bind(SubscriberStatus::Active.to_string())
                .fetch_all(&self.pool)
                .await?;

        Ok(emails)
    }

    /// Get a subscriber by ID.
    pub async fn get_subscriber(&self, id: i64) -> BlogResult<Subscriber> {
        let row: SubscriberRow = sqlx::query_as("SELECT * FROM subscribers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| BlogError::NotFound(format!("Subscriber {} not found", id)))?;

        row.try_into()
    }

    /// Add a subscriber; email addresses are unique.
    pub async fn create_subscriber(&self, subscriber: NewSubscriber) -> BlogResult<Subscriber> {
        subscriber.validate().map_err(BlogError::BadRequest)?;
        let email = subscriber.email.trim().to_lowercase();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO subscribers (id, name, email, status, subscribed_at)
            VALUES (COALESCE(?, (SELECT COALESCE(MAX(id), 0) + 1 FROM subscribers)), ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(subscriber.id)
        .bind(subscriber.name.trim())
        .bind(&email)
        .bind(SubscriberStatus::Active.to_string())
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict(e, || format!("{} is already subscribed", email)))?;

        self.get_subscriber(id).await
    }

    /// Apply a partial update to a subscriber.
    pub async fn update_subscriber(&self, id: i64, update: SubscriberUpdate) -> BlogResult<Subscriber> {
        let mut subscriber = self.get_subscriber(id).await?;
        update.apply(&mut subscriber);

        sqlx::query("UPDATE subscribers SET name = ?, email = ?, status = ? WHERE id = ?")
            .bind(&subscriber.name)
            .bind(&subscriber.email)
            .bind(subscriber.status.to_string())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict(e, || format!("{} is already subscribed", subscriber.email)))?;

        Ok(subscriber)
    }

    /// Mark the subscriber with this email inactive.
    pub async fn unsubscribe(&self, email: &str) -> BlogResult<Subscriber> {
        let email = email.trim().to_lowercase();
        let row: SubscriberRow =
            sqlx::query_as("UPDATE subscribers SET status = ? WHERE email = ? RETURNING *")
                .bind(SubscriberStatus::Inactive.to_string())
                .bind(&email)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| BlogError::NotFound(format!("Subscriber {} not found", email)))?;

        row.try_into()
    }

    /// Delete a subscriber.
    pub async fn delete_subscriber(&self, id: i64) -> BlogResult<()> {
        let result = sqlx::query("DELETE FROM subscribers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BlogError::NotFound(format!("Subscriber {} not found", id)));
        }

        Ok(())
    }
}
