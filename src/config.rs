//! Configuration module for Blog Core.
//!
//! Loads configuration from YAML files and environment variables.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub mail: MailConfig,
    pub site: SiteConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Allowed browser origins. An empty list allows any origin.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Token authentication for administrative routes.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Whether admin routes require a bearer token.
    #[serde(default)]
    pub enabled: bool,
    pub jwt_secret: String,
    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,
    #[serde(default = "default_token_hours")]
    pub token_duration_hours: i64,
}

fn default_issuer() -> String {
    "blog-core".to_string()
}

fn default_token_hours() -> i64 {
    24
}

/// Google Analytics 4 Data API access.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Numeric GA4 property identifier.
    #[serde(default)]
    pub property_id: String,
    /// Service account key JSON, base64 encoded.
    #[serde(default)]
    pub service_account_base64: String,
    #[serde(default = "default_analytics_base")]
    pub api_base_url: String,
    /// Upper bound for each individual report query.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
}

fn default_analytics_base() -> String {
    "https://analyticsdata.googleapis.com/v1beta".to_string()
}

fn default_query_timeout() -> u64 {
    15
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            property_id: String::new(),
            service_account_base64: String::new(),
            api_base_url: default_analytics_base(),
            query_timeout_secs: default_query_timeout(),
        }
    }
}

/// Outgoing email relay.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// When disabled, emails are only logged.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub relay_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_from_name")]
    pub from_name: String,
    #[serde(default)]
    pub from_address: String,
    /// Receives new-subscriber alerts.
    #[serde(default)]
    pub admin_address: String,
    #[serde(default = "default_mail_timeout")]
    pub timeout_secs: u64,
}

fn default_from_name() -> String {
    "Blog".to_string()
}

fn default_mail_timeout() -> u64 {
    10
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            relay_url: String::new(),
            api_key: String::new(),
            from_name: default_from_name(),
            from_address: String::new(),
            admin_address: String::new(),
            timeout_secs: default_mail_timeout(),
        }
    }
}

/// Public site locations used in sitemaps and email links.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Public front-end root, e.g. `https://example.blog`.
    pub base_url: String,
    /// Public root of this API, used for unsubscribe links.
    pub api_url: String,
    #[serde(default)]
    pub logo_url: String,
    /// Directory served as static files.
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
}

fn default_public_dir() -> String {
    "public".to_string()
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (BLOG__*)
    /// 2. config/local.yaml (if exists)
    /// 3. config/default.yaml
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("BLOG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_defaults_fill_optional_sections() {
        let yaml = r#"
server:
  host: 127.0.0.1
  port: 3001
database:
  url: "sqlite::memory:"
auth:
  jwt_secret: secret
site:
  base_url: https://example.blog
  api_url: https://api.example.blog
"#;
        let config: Config = ConfigLoader::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(!config.auth.enabled);
        assert_eq!(config.auth.token_duration_hours, 24);
        assert!(!config.analytics.enabled);
        assert_eq!(config.analytics.query_timeout_secs, 15);
        assert!(config.analytics.api_base_url.starts_with("https://analyticsdata"));
        assert!(!config.mail.enabled);
        assert!(config.cors.allowed_origins.is_empty());
        assert_eq!(config.site.public_dir, "public");
    }
}
