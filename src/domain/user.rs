//! User domain types.
//!
//! Readers and staff accounts. Passwords are only ever held as SHA-256 hashes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

/// User role in the system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular reader.
    #[default]
    User,
    /// Writes posts.
    Author,
    /// Full access including subscriber management and analytics.
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges.
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::User => write!(f, "user"),
            UserRole::Author => write!(f, "author"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" | "reader" => Ok(UserRole::User),
            "author" => Ok(UserRole::Author),
            "admin" => Ok(UserRole::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// A user account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// External identifier (e.g. an identity-provider UUID).
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub status: String,
    pub avatar_url: String,
    pub bio: String,
    pub website: String,
    pub twitter: String,
    pub linkedin: String,
    #[serde(skip)]
    pub password_hash: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "lastLogin", skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

impl User {
    /// Hash a password for storage/comparison.
    pub fn hash_password(password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Verify password (returns false for accounts without a password).
    pub fn verify_password(&self, password: &str) -> bool {
        match &self.password_hash {
            Some(hash) => Self::hash_password(password) == *hash,
            None => false,
        }
    }
}

/// Fields accepted when registering a user.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewUser {
    /// Generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub password: Option<String>,
}

/// Partial profile update; only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub password: Option<String>,
}

impl UserUpdate {
    /// Overwrite the supplied fields of `user`, hashing a new password.
    pub fn apply(self, user: &mut User) {
        if let Some(v) = self.username {
            user.username = v;
        }
        if let Some(v) = self.first_name {
            user.first_name = v;
        }
        if let Some(v) = self.last_name {
            user.last_name = v;
        }
        if let Some(v) = self.email {
            user.email = v;
        }
        if let Some(v) = self.role {
            user.role = v;
        }
        if let Some(v) = self.status {
            user.status = v;
        }
        if let Some(v) = self.avatar_url {
            user.avatar_url = v;
        }
        if let Some(v) = self.bio {
            user.bio = v;
        }
        if let Some(v) = self.website {
            user.website = v;
        }
        if let Some(v) = self.twitter {
            user.twitter = v;
        }
        if let Some(v) = self.linkedin {
            user.linkedin = v;
        }
        if let Some(password) = self.password.filter(|p| !p.is_empty()) {
            user.password_hash = Some(User::hash_password(&password));
        }
    }
}

/// Kind of reader interaction recorded against a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Comment,
    Like,
    Download,
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityKind::Comment => write!(f, "comment"),
            ActivityKind::Like => write!(f, "like"),
            ActivityKind::Download => write!(f, "download"),
        }
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comment" => Ok(ActivityKind::Comment),
            "like" => Ok(ActivityKind::Like),
            "download" => Ok(ActivityKind::Download),
            _ => Err(format!("Unknown activity: {}", s)),
        }
    }
}

/// One recorded interaction.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub post_id: i64,
    pub post_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub timestamp: String,
}

/// A user's profile together with their recent activity.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    pub profile: User,
    pub comments: Vec<Activity>,
    pub likes: Vec<Activity>,
    pub downloads: Vec<Activity>,
}
