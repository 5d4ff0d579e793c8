//! Service-account credentials for the analytics provider.
//!
//! The key is parsed and its RSA material validated once at startup, so a
//! malformed key stops the process instead of surfacing on the first request.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsError;

/// Read-only reporting scope.
pub const ANALYTICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Lifetime of a signed assertion; the provider caps it at one hour.
const ASSERTION_TTL_SECS: i64 = 3600;

/// The subset of a service-account key file we need.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// JWT-bearer assertion claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// A validated service account able to sign token requests.
#[derive(Clone)]
pub struct ServiceAccount {
    client_email: String,
    token_uri: String,
    key_id: Option<String>,
    signing_key: EncodingKey,
}

impl ServiceAccount {
    /// Decode a base64-encoded key file.
    pub fn from_base64(encoded: &str) -> Result<Self, AnalyticsError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(AnalyticsError::Credentials(
                "service account key is not configured".to_string(),
            ));
        }

        let json = STANDARD
            .decode(encoded)
            .map_err(|e| AnalyticsError::Credentials(format!("key is not valid base64: {}", e)))?;

        let key: ServiceAccountKey = serde_json::from_slice(&json)
            .map_err(|e| AnalyticsError::Credentials(format!("key is not valid JSON: {}", e)))?;

        Self::from_key(key)
    }

    /// Validate a parsed key file.
    pub fn from_key(key: ServiceAccountKey) -> Result<Self, AnalyticsError> {
        if key.client_email.trim().is_empty() {
            return Err(AnalyticsError::Credentials(
                "client_email is missing".to_string(),
            ));
        }

        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| AnalyticsError::Credentials(format!("private key is unusable: {}", e)))?;

        Ok(Self {
            client_email: key.client_email,
            token_uri: key.token_uri,
            key_id: key.private_key_id,
            signing_key,
        })
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    /// Sign an assertion requesting `scope`, issued at `now`.
    pub fn assertion(&self, scope: &str, now: DateTime<Utc>) -> Result<String, AnalyticsError> {
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: scope.to_string(),
            aud: self.token_uri.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ASSERTION_TTL_SECS)).timestamp(),
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();

        encode(&header, &claims, &self.signing_key)
            .map_err(|e| AnalyticsError::Credentials(format!("failed to sign assertion: {}", e)))
    }
}

impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}
