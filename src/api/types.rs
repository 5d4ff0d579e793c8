//! API request and response types.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::UserRole;

// ==================== Common ====================

/// Plain confirmation message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Confirmation used by the notification endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

// ==================== Posts ====================

/// Body for adding a comment.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCommentRequest {
    pub text: String,
    pub author: String,
    /// Records the comment on this user's profile.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Optional acting user for likes and downloads.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PostInteraction {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DownloadResponse {
    pub downloads: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NewsletterResponse {
    pub recipients: usize,
}

// ==================== Subscribers ====================

#[derive(Debug, Deserialize, IntoParams)]
pub struct UnsubscribeQuery {
    pub email: String,
}

// ==================== Notifications ====================

/// Body for pushing a notification to connected clients.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub message: String,
    /// Only the client connected with this id receives it.
    #[serde(default)]
    pub user_id: Option<String>,
}

// ==================== Analytics ====================

#[derive(Debug, Deserialize, IntoParams)]
pub struct AnalyticsQuery {
    /// One of `7d`, `14d`, `1m`, `3m`, `6m`, `all`; anything else means `7d`.
    pub range: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentlyOnlineResponse {
    pub currently_online: i64,
}

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Database connectivity.
    pub database: String,
    /// Whether analytics reporting is configured.
    pub analytics: bool,
    /// Timestamp.
    pub timestamp: String,
}

// ==================== Authentication ====================

/// Login request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: UserInfo,
    /// JWT token.
    pub token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

/// User information.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub role: UserRole,
}
