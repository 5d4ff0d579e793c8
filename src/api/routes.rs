//! Route definitions for the API.

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::auth::{require_admin, require_user};
use crate::config::CorsConfig;
use crate::AppState;

/// Security scheme modifier for OpenAPI.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_posts,
        handlers::create_post,
        handlers::get_post,
        handlers::update_post,
        handlers::delete_post,
        handlers::list_posts_by_subcategory,
        handlers::list_posts_by_tag,
        handlers::list_tags,
        handlers::like_post,
        handlers::unlike_post,
        handlers::add_comment,
        handlers::list_comments,
        handlers::download_post,
        handlers::send_newsletter,
        handlers::list_users,
        handlers::create_user,
        handlers::get_user_profile,
        handlers::update_user_profile,
        handlers::update_user,
        handlers::delete_user,
        handlers::list_categories,
        handlers::create_category,
        handlers::update_category,
        handlers::delete_category,
        handlers::list_subscribers,
        handlers::create_subscriber,
        handlers::update_subscriber,
        handlers::delete_subscriber,
        handlers::unsubscribe,
        handlers::login,
        handlers::send_notification,
        handlers::notifications_health,
        handlers::get_analytics,
        handlers::get_time_series,
        handlers::currently_online,
        handlers::health_check,
    ),
    components(schemas(
        crate::api::types::MessageResponse,
        crate::api::types::SuccessResponse,
        crate::api::types::LoginRequest,
        crate::api::types::LoginResponse,
        crate::api::types::UserInfo,
        crate::api::types::HealthResponse,
        crate::domain::BlogPost,
        crate::domain::Comment,
        crate::domain::User,
        crate::domain::UserRole,
        crate::domain::Category,
        crate::domain::Subscriber,
        crate::domain::SubscriberStatus,
        crate::domain::NormalizedRow,
        crate::domain::ReportRow,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "posts", description = "Blog posts, comments, likes and downloads"),
        (name = "users", description = "User accounts and activity"),
        (name = "categories", description = "Post categories"),
        (name = "subscribers", description = "Newsletter subscribers"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "notifications", description = "Realtime notifications"),
        (name = "analytics", description = "Aggregated traffic reports"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Blog Core API",
        version = "0.1.0",
        description = "Blog and newsletter backend with aggregated analytics reporting",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Routes anyone may call.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(handlers::list_posts))
        .route("/api/posts/tags", get(handlers::list_tags))
        .route("/api/posts/tags/:tag", get(handlers::list_posts_by_tag))
        .route(
            "/api/posts/subcategory/:subcategory",
            get(handlers::list_posts_by_subcategory),
        )
        .route("/api/posts/:id", get(handlers::get_post))
        .route(
            "/api/posts/:id/like",
            post(handlers::like_post).delete(handlers::unlike_post),
        )
        .route(
            "/api/posts/:id/comments",
            get(handlers::list_comments).post(handlers::add_comment),
        )
        .route("/api/posts/:id/download", post(handlers::download_post))
        .route("/api/users/:id/profile", get(handlers::get_user_profile))
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/subscribers", post(handlers::create_subscriber))
        .route("/api/subscribers/unsubscribe", get(handlers::unsubscribe))
        .route("/api/login", post(handlers::login))
        .route(
            "/api/notifications/health",
            get(handlers::notifications_health),
        )
        .route("/api/currently-online", get(handlers::currently_online))
        .route("/api/health", get(handlers::health_check))
        .route("/sitemap.xml", get(handlers::sitemap))
        .route("/ws", get(crate::realtime::ws_handler))
}

/// Routes any logged-in user may call; handlers check ownership.
fn member_routes() -> Router<AppState> {
    Router::new().route(
        "/api/users/:id/profile",
        put(handlers::update_user_profile),
    )
}

/// Routes that mutate content or expose private data.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/posts", post(handlers::create_post))
        .route(
            "/api/posts/:id",
            put(handlers::update_post).delete(handlers::delete_post),
        )
        .route("/api/posts/:id/newsletter", post(handlers::send_newsletter))
        .route(
            "/api/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/api/users/:id",
            put(handlers::update_user).delete(handlers::delete_user),
        )
        .route("/api/categories", post(handlers::create_category))
        .route(
            "/api/categories/:id",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .route("/api/subscribers", get(handlers::list_subscribers))
        .route(
            "/api/subscribers/:id",
            put(handlers::update_subscriber).delete(handlers::delete_subscriber),
        )
        .route("/api/notifications", post(handlers::send_notification))
        .route("/api/analytics", get(handlers::get_analytics))
        .route("/api/analytics/timeseries", get(handlers::get_time_series))
}

/// Build the application router.
///
/// With `auth_enabled` the admin routes require an admin bearer token and
/// profile edits require a user token; without it they are open
/// (development only).
pub fn build_router(
    state: AppState,
    auth_enabled: bool,
    cors: &CorsConfig,
    public_dir: &str,
) -> Router {
    let (member, admin) = if auth_enabled {
        (
            member_routes().route_layer(middleware::from_fn_with_state(
                state.jwt_manager.clone(),
                require_user,
            )),
            admin_routes().route_layer(middleware::from_fn_with_state(
                state.jwt_manager.clone(),
                require_admin,
            )),
        )
    } else {
        (member_routes(), admin_routes())
    };

    Router::new()
        .merge(public_routes())
        .merge(member)
        .merge(admin)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::analytics::{
        AccessToken, AnalyticsError, AnalyticsProvider, ReportAggregator,
    };
    use crate::auth::JwtManager;
    use crate::domain::{NewUser, ReportRequest, ReportRow, UserRole};
    use crate::mail::{LogMailer, MailDispatcher};
    use crate::realtime::NotificationHub;
    use crate::storage::test_support::{new_post, setup_test_db};

    struct FixedProvider {
        fail: bool,
    }

    #[async_trait]
    impl AnalyticsProvider for FixedProvider {
        async fn authorize(&self) -> Result<AccessToken, AnalyticsError> {
            Ok(AccessToken::new("t"))
        }

        async fn run_report(
            &self,
            _token: &AccessToken,
            _request: &ReportRequest,
        ) -> Result<Vec<ReportRow>, AnalyticsError> {
            if self.fail {
                return Err(AnalyticsError::Provider {
                    status: 403,
                    body: "PERMISSION_DENIED".into(),
                });
            }
            Ok(vec![ReportRow {
                dimension_values: vec!["20240610".into()],
                metric_values: vec!["5".into(), "7".into()],
            }])
        }

        async fn run_realtime_report(
            &self,
            _token: &AccessToken,
            _metrics: &[&str],
        ) -> Result<Vec<ReportRow>, AnalyticsError> {
            Ok(vec![ReportRow {
                dimension_values: vec![],
                metric_values: vec!["3".into()],
            }])
        }
    }

    async fn test_state(analytics: Option<FixedProvider>) -> AppState {
        let site = crate::mail::tests::site();
        let analytics = analytics.map(|provider| {
            Arc::new(ReportAggregator::new(Arc::new(provider), Duration::from_secs(5)).unwrap())
        });

        AppState {
            repository: setup_test_db().await,
            analytics,
            notifier: NotificationHub::new(),
            mailer: MailDispatcher::new(Arc::new(LogMailer), String::new(), &site),
            jwt_manager: JwtManager::new("router-test-secret", "blog-core".into(), 1),
            site: Arc::new(site),
        }
    }

    fn app(state: AppState, auth_enabled: bool) -> Router {
        build_router(state, auth_enabled, &CorsConfig::default(), "public")
    }

    fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(test_state(None).await, false)
            .oneshot(get("/api/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["database"], "connected");
        assert_eq!(body["analytics"], false);
    }

    #[tokio::test]
    async fn test_analytics_disabled_is_unavailable() {
        let app = app(test_state(None).await, false);
        let response = app.clone().oneshot(get("/api/analytics?range=7d")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app.oneshot(get("/api/currently-online")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_analytics_aggregate() {
        let app = app(test_state(Some(FixedProvider { fail: false })).await, false);

        let response = app.clone().oneshot(get("/api/analytics?range=bogus")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body.as_object().unwrap().len(), 9);
        assert_eq!(body["metrics"][0]["activeUsers"], 5);
        assert_eq!(body["metrics"][0]["sessions"], 7);
        assert_eq!(body["metrics"][0]["percentage"], "5%");

        let response = app.clone().oneshot(get("/api/currently-online")).await.unwrap();
        assert_eq!(read_json(response).await, json!({"currentlyOnline": 3}));

        let response = app.oneshot(get("/api/analytics/timeseries")).await.unwrap();
        let body = read_json(response).await;
        assert_eq!(body[0]["dimensionValues"][0], "20240610");
    }

    #[tokio::test]
    async fn test_analytics_failure_is_coarse() {
        let app = app(test_state(Some(FixedProvider { fail: true })).await, false);
        let response = app.oneshot(get("/api/analytics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = read_json(response).await;
        assert_eq!(body["error"], "Failed to fetch analytics data");
        assert!(!body.to_string().contains("PERMISSION_DENIED"));
    }

    #[tokio::test]
    async fn test_admin_routes_require_admin_token() {
        let state = test_state(None).await;
        let repo = state.repository.clone();
        let jwt = state.jwt_manager.clone();
        let app = app(state, true);

        let body = json!({"title": "Hello"});

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/posts", body.clone(), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let reader = repo
            .create_user(NewUser {
                id: None,
                username: "reader".into(),
                first_name: String::new(),
                last_name: String::new(),
                email: String::new(),
                role: UserRole::User,
                password: None,
            })
            .await
            .unwrap();
        let token = jwt.generate_token(&reader).unwrap();
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/posts", body.clone(), Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let admin = crate::auth::tests::user(UserRole::Admin);
        let token = jwt.generate_token(&admin).unwrap();
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/posts", body, Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(read_json(response).await["id"], 1);

        // Reading stays public.
        let response = app.oneshot(get("/api/posts/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login() {
        let state = test_state(None).await;
        state
            .repository
            .create_user(NewUser {
                id: Some("u-7".into()),
                username: "editor".into(),
                first_name: String::new(),
                last_name: String::new(),
                email: "editor@example.blog".into(),
                role: UserRole::Admin,
                password: Some("s3cret".into()),
            })
            .await
            .unwrap();
        let app = app(state, true);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/login",
                json!({"username": "editor", "password": "s3cret"}),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Login successful");
        assert_eq!(body["user"], json!({"id": "u-7", "role": "admin"}));
        assert_eq!(body["expiresIn"], 3600);

        let token = body["token"].as_str().unwrap().to_string();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/users")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let users = read_json(response).await;
        assert!(users[0]["lastLogin"].is_string());

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/login",
                json!({"username": "editor", "password": "wrong"}),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(read_json(response).await["error"], "Invalid username or password");
    }

    #[tokio::test]
    async fn test_post_interactions() {
        let state = test_state(None).await;
        let post = state
            .repository
            .create_post(new_post("Ownership", "rust", &["memory"]))
            .await
            .unwrap();
        let app = app(state, false);
        let like_uri = format!("/api/posts/{}/like", post.id);

        let response = app
            .clone()
            .oneshot(Request::builder().method("DELETE").uri(&like_uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await["error"], "Post not found or has no likes");

        let response = app
            .clone()
            .oneshot(Request::builder().method("POST").uri(&like_uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(read_json(response).await["message"], "Post liked successfully");

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/posts/{}/comments", post.id),
                json!({"text": "Great", "author": "ada"}),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(read_json(response).await["author"], "ada");

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/posts/{}/download", post.id),
                json!({}),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(read_json(response).await, json!({"downloads": 1}));

        let response = app.clone().oneshot(get("/api/posts/tags")).await.unwrap();
        assert_eq!(read_json(response).await, json!(["memory"]));

        let response = app.oneshot(get("/api/posts/99")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_subscribe_twice_is_rejected() {
        let app = app(test_state(None).await, false);
        let body = json!({"name": "Ada", "email": "ada@example.com"});

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/subscribers", body.clone(), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(read_json(response).await["status"], "active");

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/subscribers", body, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(get("/api/subscribers/unsubscribe?email=ada@example.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_sitemap_and_notifications() {
        let state = test_state(None).await;
        state
            .repository
            .create_post(new_post("A", "", &[]))
            .await
            .unwrap();
        let mut rx = state.notifier.subscribe();
        let app = app(state, false);

        let response = app.clone().oneshot(get("/sitemap.xml")).await.unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/xml"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let xml = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(xml.contains("<loc>https://example.blog/blog/1</loc>"));

        let response = app
            .clone()
            .oneshot(get("/api/notifications/health"))
            .await
            .unwrap();
        assert_eq!(
            read_json(response).await,
            json!({"success": true, "message": "WebSocket server is running!"})
        );

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/notifications",
                json!({"message": "New post is live"}),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(read_json(response).await["message"], "Notification sent");
        let pushed = rx.recv().await.unwrap();
        assert_eq!(pushed.data, json!({"message": "New post is live"}));
    }

    fn account(id: &str, username: &str, role: UserRole, password: &str) -> NewUser {
        NewUser {
            id: Some(id.into()),
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            email: format!("{}@example.blog", username),
            role,
            password: Some(password.into()),
        }
    }

    fn login_request(username: &str, password: &str) -> Request<Body> {
        json_request(
            "POST",
            "/api/login",
            json!({"username": username, "password": password}),
            None,
        )
    }

    #[tokio::test]
    async fn test_profile_edits_need_the_owner_token() {
        let state = test_state(None).await;
        let repo = state.repository.clone();
        let jwt = state.jwt_manager.clone();
        let boss = repo
            .create_user(account("adm", "boss", UserRole::Admin, "s3cret"))
            .await
            .unwrap();
        let reader = repo
            .create_user(account("u-ann", "ann", UserRole::User, "hunter2"))
            .await
            .unwrap();
        let app = app(state, true);

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/users/adm/profile",
                json!({"password": "taken"}),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let reader_token = jwt.generate_token(&reader).unwrap();
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/users/adm/profile",
                json!({"password": "taken"}),
                Some(&reader_token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app.clone().oneshot(login_request("boss", "taken")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let response = app.clone().oneshot(login_request("boss", "s3cret")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Owners edit themselves but cannot promote themselves.
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/users/u-ann/profile",
                json!({"bio": "Reads everything", "role": "admin"}),
                Some(&reader_token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["bio"], "Reads everything");
        assert_eq!(body["role"], "user");

        let boss_token = jwt.generate_token(&boss).unwrap();
        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/users/u-ann/profile",
                json!({"website": "https://ann.example"}),
                Some(&boss_token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unlike_drops_recorded_like() {
        let state = test_state(None).await;
        let repo = state.repository.clone();
        repo.create_user(account("u-ann", "ann", UserRole::User, "hunter2"))
            .await
            .unwrap();
        let post = repo.create_post(new_post("Lifetimes", "rust", &[])).await.unwrap();
        let app = app(state, false);
        let like_uri = format!("/api/posts/{}/like", post.id);
        let acting = json!({"userId": "u-ann"});

        let response = app
            .clone()
            .oneshot(json_request("POST", &like_uri, acting.clone(), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(repo.get_user_profile("u-ann").await.unwrap().likes.len(), 1);

        let response = app
            .oneshot(json_request("DELETE", &like_uri, acting, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(repo.get_user_profile("u-ann").await.unwrap().likes.is_empty());
        assert_eq!(repo.get_post(post.id).await.unwrap().likes, 0);
    }
}
