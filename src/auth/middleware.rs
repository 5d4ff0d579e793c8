//! Authentication middleware for axum.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::{Claims, JwtManager};

/// Error response for authentication failures.
#[derive(Debug, Serialize)]
pub struct AuthError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub code: String,
}

impl AuthError {
    fn unauthorized(error: &str, code: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: error.to_string(),
            code: code.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

fn authenticate(jwt_manager: &JwtManager, request: &Request<Body>) -> Result<Claims, AuthError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| AuthError::unauthorized("Missing authorization token", "MISSING_TOKEN"))?;

    jwt_manager
        .validate_token(token)
        .map_err(|_| AuthError::unauthorized("Invalid or expired token", "INVALID_TOKEN"))
}

/// Require a valid bearer token of any role.
///
/// Validated claims are added to the request extensions so handlers can
/// check ownership.
pub async fn require_user(
    State(jwt_manager): State<JwtManager>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = authenticate(&jwt_manager, &request)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Require a valid bearer token of an admin user.
///
/// Missing or invalid tokens are rejected with 401, other roles with 403.
/// Validated claims are added to the request extensions.
pub async fn require_admin(
    State(jwt_manager): State<JwtManager>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = authenticate(&jwt_manager, &request)?;

    if !claims.role.is_admin() {
        tracing::warn!(user_id = %claims.sub, role = %claims.role, "Admin route refused");
        return Err(AuthError {
            status: StatusCode::FORBIDDEN,
            error: "Insufficient permissions".to_string(),
            code: "FORBIDDEN".to_string(),
        });
    }

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
