//! JWT issuing and validation for logged-in users.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::{User, UserRole};
use crate::error::{BlogError, BlogResult};

/// JWT claims for authenticated users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    pub username: String,
    pub role: UserRole,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at time (Unix timestamp).
    pub iat: i64,
    pub iss: String,
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    /// Token validity duration in hours.
    token_duration_hours: i64,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret.
    pub fn new(secret: &str, issuer: String, token_duration_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            token_duration_hours,
        }
    }

    /// Token lifetime in seconds, as reported to clients.
    pub fn expires_in_secs(&self) -> i64 {
        self.token_duration_hours * 3600
    }

    /// Generate a token for a user.
    pub fn generate_token(&self, user: &User) -> BlogResult<String> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.token_duration_hours);

        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| BlogError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> BlogResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let token_data: TokenData<Claims> =
            decode(token, &self.decoding_key, &validation).map_err(|e| {
                tracing::debug!(error = %e, "JWT validation failed");
                BlogError::Unauthorized(format!("Invalid token: {}", e))
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn user(role: UserRole) -> User {
        User {
            id: "u-1".into(),
            username: "ada".into(),
            first_name: String::new(),
            last_name: String::new(),
            email: "ada@example.com".into(),
            role,
            status: "active".into(),
            avatar_url: String::new(),
            bio: String::new(),
            website: String::new(),
            twitter: String::new(),
            linkedin: String::new(),
            password_hash: None,
            created_at: Utc::now().to_rfc3339(),
            last_login: None,
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret-key-12345", "blog-core".to_string(), 24);

        let token = manager.generate_token(&user(UserRole::Admin)).unwrap();

        let claims = manager.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.username, "ada");
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(manager.expires_in_secs(), 86_400);
    }

    #[test]
    fn test_foreign_tokens_rejected() {
        let ours = JwtManager::new("secret-a", "blog-core".to_string(), 1);
        let theirs = JwtManager::new("secret-b", "blog-core".to_string(), 1);
        let other_issuer = JwtManager::new("secret-a", "elsewhere".to_string(), 1);

        let token = theirs.generate_token(&user(UserRole::Admin)).unwrap();
        assert!(matches!(
            ours.validate_token(&token),
            Err(BlogError::Unauthorized(_))
        ));

        let token = other_issuer.generate_token(&user(UserRole::Admin)).unwrap();
        assert!(ours.validate_token(&token).is_err());
        assert!(ours.validate_token("not.a.jwt").is_err());
    }
}
