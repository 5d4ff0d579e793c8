//! Blog Core - blog and newsletter backend
//!
//! Serves posts, comments, users and newsletter subscribers from SQLite,
//! pushes live notifications over WebSocket and aggregates GA4 traffic
//! reports for the admin dashboard.

use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::SqlitePool;
use tokio::net::TcpListener;

mod analytics;
mod api;
mod auth;
mod config;
mod domain;
mod error;
mod logging;
mod mail;
mod realtime;
mod sitemap;
mod storage;

use crate::analytics::{Ga4Client, ReportAggregator};
use crate::api::build_router;
use crate::auth::JwtManager;
use crate::config::{Config, SiteConfig};
use crate::mail::MailDispatcher;
use crate::realtime::NotificationHub;
use crate::storage::BlogRepository;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database repository.
    pub repository: BlogRepository,
    /// Report aggregator; `None` when analytics is not configured.
    pub analytics: Option<Arc<ReportAggregator>>,
    pub notifier: NotificationHub,
    pub mailer: MailDispatcher,
    /// JWT manager for token operations.
    pub jwt_manager: JwtManager,
    pub site: Arc<SiteConfig>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is expected in production
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    logging::init();

    tracing::info!("Starting Blog Core v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        database = %config.database.url,
        auth_enabled = %config.auth.enabled,
        analytics_enabled = %config.analytics.enabled,
        mail_enabled = %config.mail.enabled,
        "Configuration loaded"
    );

    let pool = SqlitePool::connect(&config.database.url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to database");
            anyhow::anyhow!("Database connection error: {}", e)
        })?;

    let repository = BlogRepository::new(pool);
    repository.init_schema().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize database schema");
        anyhow::anyhow!("Schema initialization error: {}", e)
    })?;

    tracing::info!("Database connected and schema initialized");

    // Credentials are decoded once; a bad key stops startup.
    let analytics = if config.analytics.enabled {
        let client = Ga4Client::from_config(&config.analytics).map_err(|e| {
            tracing::error!(error = %e, "Failed to configure analytics client");
            anyhow::anyhow!("Analytics configuration error: {}", e)
        })?;
        let aggregator = ReportAggregator::new(
            Arc::new(client),
            Duration::from_secs(config.analytics.query_timeout_secs),
        )
        .map_err(|e| anyhow::anyhow!("Report catalogue error: {}", e))?;

        tracing::info!(
            property = %config.analytics.property_id,
            query_timeout_secs = config.analytics.query_timeout_secs,
            "Analytics reporting enabled"
        );
        Some(Arc::new(aggregator))
    } else {
        tracing::info!("Analytics reporting disabled");
        None
    };

    let mailer = MailDispatcher::from_config(&config.mail, &config.site)
        .map_err(|e| anyhow::anyhow!("Mail configuration error: {}", e))?;

    let jwt_manager = JwtManager::new(
        &config.auth.jwt_secret,
        config.auth.jwt_issuer.clone(),
        config.auth.token_duration_hours,
    );

    if config.auth.enabled {
        tracing::info!("Authentication enabled");
    } else {
        tracing::warn!("Authentication is DISABLED - enable for production");
    }

    let state = AppState {
        repository,
        analytics,
        notifier: NotificationHub::new(),
        mailer,
        jwt_manager,
        site: Arc::new(config.site.clone()),
    };

    let app = build_router(
        state,
        config.auth.enabled,
        &config.cors,
        &config.site.public_dir,
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
