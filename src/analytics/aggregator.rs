//! Report Aggregator - runs the report catalogue as one unit.
//!
//! Every report of an aggregate shares one access token and one date range.
//! The queries run concurrently and are joined all-or-nothing: the first
//! failure (provider error or per-query timeout) fails the whole aggregate.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::try_join_all;

use crate::analytics::{
    parse_count, validate_catalogue, AccessToken, AnalyticsError, AnalyticsProvider,
    ReportDefinition, REALTIME_METRICS, REPORTS, TIME_SERIES,
};
use crate::domain::{AggregateReport, DateRange, NormalizedRow, ReportRequest, ReportRow};

/// Runs named reports against a shared provider.
pub struct ReportAggregator {
    provider: Arc<dyn AnalyticsProvider>,
    query_timeout: Duration,
}

impl ReportAggregator {
    /// Create an aggregator; fails if the report catalogue is inconsistent.
    pub fn new(
        provider: Arc<dyn AnalyticsProvider>,
        query_timeout: Duration,
    ) -> Result<Self, AnalyticsError> {
        validate_catalogue()?;

        Ok(Self {
            provider,
            query_timeout,
        })
    }

    /// Fetch and normalize every catalogue report for `range`.
    pub async fn aggregate(&self, range: DateRange) -> Result<AggregateReport, AnalyticsError> {
        let token = self.provider.authorize().await?;

        let queries = REPORTS
            .iter()
            .map(|report| self.run_normalized(&token, report, range));
        let sections = try_join_all(queries).await?;

        let mut aggregate = AggregateReport::default();
        for (key, rows) in sections {
            aggregate.insert(key, rows);
        }

        tracing::info!(
            start = %range.start,
            end = %range.end,
            sections = aggregate.len(),
            "Analytics aggregate complete"
        );

        Ok(aggregate)
    }

    /// Daily active users as raw provider rows.
    pub async fn time_series(&self, range: DateRange) -> Result<Vec<ReportRow>, AnalyticsError> {
        let token = self.provider.authorize().await?;
        self.run_bounded(&token, TIME_SERIES.key, &TIME_SERIES.request(range))
            .await
    }

    /// Users active right now; `0` when the provider has nothing usable.
    pub async fn currently_online(&self) -> Result<i64, AnalyticsError> {
        let token = self.provider.authorize().await?;

        let rows = tokio::time::timeout(
            self.query_timeout,
            self.provider.run_realtime_report(&token, REALTIME_METRICS),
        )
        .await
        .map_err(|_| self.timeout_error("realtime"))??;

        Ok(active_user_count(&rows))
    }

    async fn run_normalized(
        &self,
        token: &AccessToken,
        report: &'static ReportDefinition,
        range: DateRange,
    ) -> Result<(&'static str, Vec<NormalizedRow>), AnalyticsError> {
        let rows = self
            .run_bounded(token, report.key, &report.request(range))
            .await?;

        tracing::debug!(report = report.key, rows = rows.len(), "Report fetched");

        Ok((report.key, report.normalize_rows(&rows)))
    }

    async fn run_bounded(
        &self,
        token: &AccessToken,
        key: &str,
        request: &ReportRequest,
    ) -> Result<Vec<ReportRow>, AnalyticsError> {
        let result = tokio::time::timeout(self.query_timeout, self.provider.run_report(token, request))
            .await
            .map_err(|_| self.timeout_error(key))
            .and_then(|inner| inner);

        if let Err(e) = &result {
            tracing::warn!(report = key, error = %e, "Report query failed");
        }

        result
    }

    fn timeout_error(&self, key: &str) -> AnalyticsError {
        AnalyticsError::Timeout {
            report: key.to_string(),
            elapsed_ms: u64::try_from(self.query_timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// First metric of the first row, or `0`.
pub fn active_user_count(rows: &[ReportRow]) -> i64 {
    rows.first().map(|row| parse_count(row.metric(0))).unwrap_or(0)
}
