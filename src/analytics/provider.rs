//! Analytics provider seam.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ReportRequest, ReportRow};

/// Failures talking to the analytics provider.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("invalid service account credentials: {0}")]
    Credentials(String),

    #[error("token exchange rejected: {0}")]
    Auth(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("report '{report}' timed out after {elapsed_ms}ms")]
    Timeout { report: String, elapsed_ms: u64 },

    #[error("invalid report definition: {0}")]
    Definition(String),
}

/// Short-lived, read-only bearer credential for one batch of queries.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Trait for analytics backends.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait AnalyticsProvider: Send + Sync {
    /// Obtain a scoped access token.
    async fn authorize(&self) -> Result<AccessToken, AnalyticsError>;

    /// Run one historical report.
    async fn run_report(
        &self,
        token: &AccessToken,
        request: &ReportRequest,
    ) -> Result<Vec<ReportRow>, AnalyticsError>;

    /// Run a realtime report over the last few minutes of traffic.
    async fn run_realtime_report(
        &self,
        token: &AccessToken,
        metrics: &[&str],
    ) -> Result<Vec<ReportRow>, AnalyticsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AccessToken::new("ya29.secret");
        assert_eq!(format!("{:?}", token), "AccessToken(<redacted>)");
        assert_eq!(token.secret(), "ya29.secret");
    }
}
