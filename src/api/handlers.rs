//! HTTP request handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;

use crate::analytics::ReportAggregator;
use crate::api::types::*;
use crate::auth::Claims;
use crate::domain::{
    ActivityKind, AggregateReport, BlogPost, Category, CategoryUpdate, Comment, NewCategory,
    NewPost, NewSubscriber, NewUser, NormalizedRow, PostUpdate, RangeCode, ReportRow, Subscriber,
    SubscriberUpdate, User, UserProfile, UserUpdate,
};
use crate::error::{BlogError, BlogResult};
use crate::realtime::RECEIVE_EVENT;
use crate::AppState;

// ==================== Posts ====================

/// List all posts.
#[utoipa::path(
    get,
    path = "/api/posts",
    responses((status = 200, description = "All posts", body = Vec<BlogPost>)),
    tag = "posts"
)]
pub async fn list_posts(State(state): State<AppState>) -> BlogResult<Json<Vec<BlogPost>>> {
    Ok(Json(state.repository.list_posts().await?))
}

/// Create a post.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = NewPost,
    responses(
        (status = 201, description = "Post created", body = BlogPost),
        (status = 400, description = "Duplicate id")
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn create_post(
    State(state): State<AppState>,
    Json(request): Json<NewPost>,
) -> BlogResult<(StatusCode, Json<BlogPost>)> {
    let post = state.repository.create_post(request).await?;

    tracing::info!(post_id = %post.id, title = %post.title, "Post created");

    Ok((StatusCode::CREATED, Json(post)))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "The post", body = BlogPost),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> BlogResult<Json<BlogPost>> {
    Ok(Json(state.repository.get_post(id).await?))
}

/// Update a post; only supplied fields change.
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    request_body = PostUpdate,
    responses(
        (status = 200, description = "Updated post", body = BlogPost),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<PostUpdate>,
) -> BlogResult<Json<BlogPost>> {
    Ok(Json(state.repository.update_post(id, update).await?))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post deleted", body = MessageResponse),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> BlogResult<Json<MessageResponse>> {
    state.repository.delete_post(id).await?;

    tracing::info!(post_id = %id, "Post deleted");

    Ok(Json(MessageResponse::new("Post deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/posts/subcategory/{subcategory}",
    params(("subcategory" = String, Path, description = "Subcategory name")),
    responses((status = 200, description = "Posts in the subcategory", body = Vec<BlogPost>)),
    tag = "posts"
)]
pub async fn list_posts_by_subcategory(
    State(state): State<AppState>,
    Path(subcategory): Path<String>,
) -> BlogResult<Json<Vec<BlogPost>>> {
    Ok(Json(
        state
            .repository
            .list_posts_by_subcategory(&subcategory)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/posts/tags/{tag}",
    params(("tag" = String, Path, description = "Tag")),
    responses((status = 200, description = "Posts with the tag", body = Vec<BlogPost>)),
    tag = "posts"
)]
pub async fn list_posts_by_tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> BlogResult<Json<Vec<BlogPost>>> {
    Ok(Json(state.repository.list_posts_by_tag(&tag).await?))
}

/// Distinct tags across all posts, sorted.
#[utoipa::path(
    get,
    path = "/api/posts/tags",
    responses((status = 200, description = "Distinct tags", body = Vec<String>)),
    tag = "posts"
)]
pub async fn list_tags(State(state): State<AppState>) -> BlogResult<Json<Vec<String>>> {
    Ok(Json(state.repository.list_tags().await?))
}

async fn record_interaction(
    state: &AppState,
    user_id: Option<&str>,
    kind: ActivityKind,
    post_id: i64,
    details: Option<&str>,
) -> BlogResult<()> {
    if let Some(user_id) = user_id.filter(|id| !id.is_empty()) {
        state
            .repository
            .record_activity(user_id, kind, post_id, details)
            .await?;
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    params(("id" = i64, Path, description = "Post ID")),
    request_body(content = PostInteraction, description = "Optional acting user"),
    responses(
        (status = 200, description = "Post liked", body = MessageResponse),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
pub async fn like_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Option<Json<PostInteraction>>,
) -> BlogResult<Json<MessageResponse>> {
    state.repository.like_post(id).await?;

    let user_id = body.and_then(|Json(b)| b.user_id);
    record_interaction(&state, user_id.as_deref(), ActivityKind::Like, id, None).await?;

    Ok(Json(MessageResponse::new("Post liked successfully")))
}

/// Remove a like; with a `userId` the user's recorded like goes too.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}/like",
    params(("id" = i64, Path, description = "Post ID")),
    request_body(content = PostInteraction, description = "Optional acting user"),
    responses(
        (status = 200, description = "Post unliked", body = MessageResponse),
        (status = 404, description = "Post not found or has no likes")
    ),
    tag = "posts"
)]
pub async fn unlike_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Option<Json<PostInteraction>>,
) -> BlogResult<Json<MessageResponse>> {
    state.repository.unlike_post(id).await?;

    if let Some(user_id) = body
        .and_then(|Json(b)| b.user_id)
        .filter(|user| !user.is_empty())
    {
        state
            .repository
            .remove_activity(&user_id, ActivityKind::Like, id)
            .await?;
    }

    Ok(Json(MessageResponse::new("Post unliked successfully")))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments",
    params(("id" = i64, Path, description = "Post ID")),
    request_body = NewCommentRequest,
    responses(
        (status = 201, description = "Comment added", body = Comment),
        (status = 400, description = "Empty comment"),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<NewCommentRequest>,
) -> BlogResult<(StatusCode, Json<Comment>)> {
    if request.text.trim().is_empty() {
        return Err(BlogError::BadRequest("Comment text is required".to_string()));
    }

    let comment = Comment::new(request.text, request.author, Utc::now());
    state.repository.add_comment(id, &comment).await?;

    record_interaction(
        &state,
        request.user_id.as_deref(),
        ActivityKind::Comment,
        id,
        Some(&comment.text),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/comments",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Comments, oldest first", body = Vec<Comment>),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> BlogResult<Json<Vec<Comment>>> {
    Ok(Json(state.repository.list_comments(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/download",
    params(("id" = i64, Path, description = "Post ID")),
    request_body(content = PostInteraction, description = "Optional acting user"),
    responses(
        (status = 200, description = "Download counted", body = DownloadResponse),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
pub async fn download_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Option<Json<PostInteraction>>,
) -> BlogResult<Json<DownloadResponse>> {
    let downloads = state.repository.increment_downloads(id).await?;

    let user_id = body.and_then(|Json(b)| b.user_id);
    record_interaction(&state, user_id.as_deref(), ActivityKind::Download, id, None).await?;

    Ok(Json(DownloadResponse { downloads }))
}

/// Email the post to every active subscriber.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/newsletter",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Newsletter queued", body = NewsletterResponse),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn send_newsletter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> BlogResult<Json<NewsletterResponse>> {
    let post = state.repository.get_post(id).await?;
    let recipients = state.repository.list_active_subscriber_emails().await?;

    let recipients = state.mailer.send_newsletter(&post, &recipients);

    Ok(Json(NewsletterResponse { recipients }))
}

// ==================== Users ====================

#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "All users", body = Vec<User>)),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_users(State(state): State<AppState>) -> BlogResult<Json<Vec<User>>> {
    Ok(Json(state.repository.list_users().await?))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Username taken or missing")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<NewUser>,
) -> BlogResult<(StatusCode, Json<User>)> {
    if request.username.trim().is_empty() {
        return Err(BlogError::BadRequest("Username is required".to_string()));
    }

    let user = state.repository.create_user(request).await?;

    tracing::info!(user_id = %user.id, username = %user.username, role = %user.role, "User created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// A user with their comments, likes and downloads.
#[utoipa::path(
    get,
    path = "/api/users/{id}/profile",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile and activity", body = UserProfile),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> BlogResult<Json<UserProfile>> {
    Ok(Json(state.repository.get_user_profile(&id).await?))
}

/// Edit one's own profile; admins may edit anyone's.
#[utoipa::path(
    put,
    path = "/api/users/{id}/profile",
    params(("id" = String, Path, description = "User ID")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Another user's profile"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_user_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    claims: Option<Extension<Claims>>,
    Json(mut update): Json<UserUpdate>,
) -> BlogResult<Json<User>> {
    // Claims are absent only when authentication is disabled.
    if let Some(Extension(claims)) = claims {
        if claims.sub != id && !claims.role.is_admin() {
            tracing::warn!(user_id = %claims.sub, target = %id, "Profile edit refused");
            return Err(BlogError::Forbidden(
                "Cannot edit another user's profile".to_string(),
            ));
        }
    }

    // Self-service edits cannot change the role or account status.
    update.role = None;
    update.status = None;
    Ok(Json(state.repository.update_user(&id, update).await?))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<UserUpdate>,
) -> BlogResult<Json<User>> {
    Ok(Json(state.repository.update_user(&id, update).await?))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> BlogResult<Json<MessageResponse>> {
    state.repository.delete_user(&id).await?;

    tracing::info!(user_id = %id, "User deleted");

    Ok(Json(MessageResponse::new("User deleted successfully")))
}

// ==================== Categories ====================

#[utoipa::path(
    get,
    path = "/api/categories",
    responses((status = 200, description = "All categories", body = Vec<Category>)),
    tag = "categories"
)]
pub async fn list_categories(State(state): State<AppState>) -> BlogResult<Json<Vec<Category>>> {
    Ok(Json(state.repository.list_categories().await?))
}

/// Create a category; the id defaults to a slug of the name.
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = NewCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Duplicate or empty category")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<NewCategory>,
) -> BlogResult<(StatusCode, Json<Category>)> {
    let category = state.repository.create_category(request).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = String, Path, description = "Category ID")),
    request_body = CategoryUpdate,
    responses(
        (status = 200, description = "Updated category", body = Category),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<CategoryUpdate>,
) -> BlogResult<Json<Category>> {
    Ok(Json(
        state.repository.update_category(&id, &update.name).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> BlogResult<Json<MessageResponse>> {
    state.repository.delete_category(&id).await?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}

// ==================== Subscribers ====================

#[utoipa::path(
    get,
    path = "/api/subscribers",
    responses((status = 200, description = "All subscribers", body = Vec<Subscriber>)),
    security(("bearer_auth" = [])),
    tag = "subscribers"
)]
pub async fn list_subscribers(State(state): State<AppState>) -> BlogResult<Json<Vec<Subscriber>>> {
    Ok(Json(state.repository.list_subscribers().await?))
}

/// Subscribe to the newsletter.
///
/// Sends a welcome email and an admin alert in the background.
#[utoipa::path(
    post,
    path = "/api/subscribers",
    request_body = NewSubscriber,
    responses(
        (status = 201, description = "Subscribed", body = Subscriber),
        (status = 400, description = "Invalid or already subscribed email")
    ),
    tag = "subscribers"
)]
pub async fn create_subscriber(
    State(state): State<AppState>,
    Json(request): Json<NewSubscriber>,
) -> BlogResult<(StatusCode, Json<Subscriber>)> {
    let subscriber = state.repository.create_subscriber(request).await?;

    tracing::info!(subscriber_id = %subscriber.id, "New subscriber");
    state.mailer.notify_subscribed(&subscriber);

    Ok((StatusCode::CREATED, Json(subscriber)))
}

#[utoipa::path(
    put,
    path = "/api/subscribers/{id}",
    params(("id" = i64, Path, description = "Subscriber ID")),
    request_body = SubscriberUpdate,
    responses(
        (status = 200, description = "Updated subscriber", body = Subscriber),
        (status = 404, description = "Subscriber not found")
    ),
    security(("bearer_auth" = [])),
    tag = "subscribers"
)]
pub async fn update_subscriber(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<SubscriberUpdate>,
) -> BlogResult<Json<Subscriber>> {
    Ok(Json(state.repository.update_subscriber(id, update).await?))
}

#[utoipa::path(
    delete,
    path = "/api/subscribers/{id}",
    params(("id" = i64, Path, description = "Subscriber ID")),
    responses(
        (status = 200, description = "Subscriber deleted", body = MessageResponse),
        (status = 404, description = "Subscriber not found")
    ),
    security(("bearer_auth" = [])),
    tag = "subscribers"
)]
pub async fn delete_subscriber(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> BlogResult<Json<MessageResponse>> {
    state.repository.delete_subscriber(id).await?;
    Ok(Json(MessageResponse::new("Subscriber deleted successfully")))
}

/// Unsubscribe link target.
#[utoipa::path(
    get,
    path = "/api/subscribers/unsubscribe",
    params(UnsubscribeQuery),
    responses(
        (status = 200, description = "Subscription deactivated", body = MessageResponse),
        (status = 404, description = "Unknown email")
    ),
    tag = "subscribers"
)]
pub async fn unsubscribe(
    State(state): State<AppState>,
    Query(query): Query<UnsubscribeQuery>,
) -> BlogResult<Json<MessageResponse>> {
    let subscriber = state.repository.unsubscribe(&query.email).await?;

    tracing::info!(subscriber_id = %subscriber.id, "Subscriber unsubscribed");

    Ok(Json(MessageResponse::new(
        "You have been unsubscribed successfully",
    )))
}

// ==================== Authentication ====================

/// Login to obtain a JWT token.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> BlogResult<Json<LoginResponse>> {
    let user = state
        .repository
        .get_user_by_username(&request.username)
        .await?
        .filter(|user| user.verify_password(&request.password))
        .ok_or_else(|| {
            tracing::warn!(username = %request.username, "Failed login attempt");
            BlogError::Unauthorized("Invalid username or password".to_string())
        })?;

    state.repository.touch_last_login(&user.id).await?;
    let token = state.jwt_manager.generate_token(&user)?;

    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        user: UserInfo {
            id: user.id,
            role: user.role,
        },
        token,
        expires_in: state.jwt_manager.expires_in_secs(),
    }))
}

// ==================== Notifications ====================

/// Push a notification to connected clients.
#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = NotificationRequest,
    responses((status = 200, description = "Notification sent", body = SuccessResponse)),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn send_notification(
    State(state): State<AppState>,
    Json(request): Json<NotificationRequest>,
) -> Json<SuccessResponse> {
    let delivered = state.notifier.broadcast(
        RECEIVE_EVENT,
        serde_json::json!({ "message": request.message }),
        request.user_id.filter(|id| !id.is_empty()),
    );

    tracing::info!(delivered = delivered, "Notification pushed");

    Json(SuccessResponse {
        success: true,
        message: "Notification sent".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/notifications/health",
    responses((status = 200, description = "WebSocket server status", body = SuccessResponse)),
    tag = "notifications"
)]
pub async fn notifications_health() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        success: true,
        message: "WebSocket server is running!".to_string(),
    })
}

// ==================== Analytics ====================

fn aggregator(state: &AppState) -> BlogResult<&Arc<ReportAggregator>> {
    state
        .analytics
        .as_ref()
        .ok_or_else(|| BlogError::Unavailable("Analytics is not configured".to_string()))
}

/// Aggregated traffic report for a date range.
///
/// Every section is present or the request fails.
#[utoipa::path(
    get,
    path = "/api/analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "All report sections", body = BTreeMap<String, Vec<NormalizedRow>>),
        (status = 500, description = "Failed to fetch analytics data"),
        (status = 503, description = "Analytics not configured")
    ),
    security(("bearer_auth" = [])),
    tag = "analytics"
)]
pub async fn get_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> BlogResult<Json<AggregateReport>> {
    let aggregator = aggregator(&state)?;
    let range = RangeCode::parse_lenient(query.range.as_deref()).resolve(Utc::now().date_naive());

    Ok(Json(aggregator.aggregate(range).await?))
}

/// Daily active users as raw provider rows.
#[utoipa::path(
    get,
    path = "/api/analytics/timeseries",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Active users by date", body = Vec<ReportRow>),
        (status = 500, description = "Failed to fetch analytics data"),
        (status = 503, description = "Analytics not configured")
    ),
    security(("bearer_auth" = [])),
    tag = "analytics"
)]
pub async fn get_time_series(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> BlogResult<Json<Vec<ReportRow>>> {
    let aggregator = aggregator(&state)?;
    let range = RangeCode::parse_lenient(query.range.as_deref()).resolve(Utc::now().date_naive());

    Ok(Json(aggregator.time_series(range).await?))
}

#[utoipa::path(
    get,
    path = "/api/currently-online",
    responses(
        (status = 200, description = "Users active right now", body = CurrentlyOnlineResponse),
        (status = 500, description = "Failed to fetch analytics data"),
        (status = 503, description = "Analytics not configured")
    ),
    tag = "analytics"
)]
pub async fn currently_online(
    State(state): State<AppState>,
) -> BlogResult<Json<CurrentlyOnlineResponse>> {
    let currently_online = aggregator(&state)?.currently_online().await?;
    Ok(Json(CurrentlyOnlineResponse { currently_online }))
}

// ==================== Site ====================

/// XML sitemap of the public site.
pub async fn sitemap(State(state): State<AppState>) -> BlogResult<impl IntoResponse> {
    let posts = state.repository.list_posts().await?;
    let xml = crate::sitemap::render(&state.site.base_url, &posts, Utc::now());

    Ok(([(header::CONTENT_TYPE, "application/xml")], xml))
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = match state.repository.ping().await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
        analytics: state.analytics.is_some(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
