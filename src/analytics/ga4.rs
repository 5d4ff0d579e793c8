//! Google Analytics 4 Data API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::analytics::{
    AccessToken, AnalyticsError, AnalyticsProvider, ServiceAccount, ANALYTICS_READONLY_SCOPE,
};
use crate::config::AnalyticsConfig;
use crate::domain::{ReportRequest, ReportRow};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// GA4 Data API client bound to one property.
pub struct Ga4Client {
    client: Client,
    account: ServiceAccount,
    property_id: String,
    api_base_url: String,
}

impl Ga4Client {
    /// Build a client from configuration, validating credentials eagerly.
    pub fn from_config(config: &AnalyticsConfig) -> Result<Self, AnalyticsError> {
        if config.property_id.trim().is_empty() {
            return Err(AnalyticsError::Credentials(
                "GA4 property id is not configured".to_string(),
            ));
        }

        let account = ServiceAccount::from_base64(&config.service_account_base64)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.query_timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            client,
            account,
            property_id: config.property_id.trim().to_string(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn property_id(&self) -> &str {
        &self.property_id
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/properties/{}:{}",
            self.api_base_url, self.property_id, method
        )
    }

    async fn post_report<B: Serialize + Sync>(
        &self,
        token: &AccessToken,
        method: &str,
        body: &B,
    ) -> Result<Vec<ReportRow>, AnalyticsError> {
        let response = self
            .client
            .post(self.endpoint(method))
            .bearer_auth(token.secret())
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyticsError::Provider { status, body });
        }

        let report: RunReportResponse = response.json().await?;
        Ok(report.rows.into_iter().map(ReportRow::from).collect())
    }
}

#[async_trait]
impl AnalyticsProvider for Ga4Client {
    async fn authorize(&self) -> Result<AccessToken, AnalyticsError> {
        let assertion = self
            .account
            .assertion(ANALYTICS_READONLY_SCOPE, chrono::Utc::now())?;

        let response = self
            .client
            .post(self.account.token_uri())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyticsError::Auth(format!("{}: {}", status, body)));
        }

        let token: TokenResponse = response.json().await?;
        tracing::debug!(
            client_email = %self.account.client_email(),
            expires_in = token.expires_in,
            "Obtained analytics access token"
        );

        Ok(AccessToken::new(token.access_token))
    }

    async fn run_report(
        &self,
        token: &AccessToken,
        request: &ReportRequest,
    ) -> Result<Vec<ReportRow>, AnalyticsError> {
        self.post_report(token, "runReport", &RunReportBody::from_request(request))
            .await
    }

    async fn run_realtime_report(
        &self,
        token: &AccessToken,
        metrics: &[&str],
    ) -> Result<Vec<ReportRow>, AnalyticsError> {
        let body = RunRealtimeBody {
            metrics: metrics.iter().map(|name| WireName { name }).collect(),
        };
        self.post_report(token, "runRealtimeReport", &body).await
    }
}

// ==================== Wire format ====================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunReportBody<'a> {
    date_ranges: Vec<WireDateRange>,
    metrics: Vec<WireName<'a>>,
    dimensions: Vec<WireName<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    order_bys: Vec<WireOrderBy<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

impl<'a> RunReportBody<'a> {
    fn from_request(request: &'a ReportRequest) -> Self {
        let order_bys = request
            .order_by
            .iter()
            .map(|order| {
                if request.is_metric(&order.field) {
                    WireOrderBy {
                        metric: Some(MetricOrder {
                            metric_name: &order.field,
                        }),
                        dimension: None,
                        desc: order.descending,
                    }
                } else {
                    WireOrderBy {
                        metric: None,
                        dimension: Some(DimensionOrder {
                            dimension_name: &order.field,
                        }),
                        desc: order.descending,
                    }
                }
            })
            .collect();

        Self {
            date_ranges: vec![WireDateRange {
                start_date: request.date_range.start.format("%Y-%m-%d").to_string(),
                end_date: request.date_range.end.format("%Y-%m-%d").to_string(),
            }],
            metrics: request
                .metric_names
                .iter()
                .map(|name| WireName { name })
                .collect(),
            dimensions: request
                .dimension_names
                .iter()
                .map(|name| WireName { name })
                .collect(),
            order_bys,
            limit: request.limit,
        }
    }
}

#[derive(Debug, Serialize)]
struct RunRealtimeBody<'a> {
    metrics: Vec<WireName<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireDateRange {
    start_date: String,
    end_date: String,
}

#[derive(Debug, Serialize)]
struct WireName<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct WireOrderBy<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    metric: Option<MetricOrder<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimension: Option<DimensionOrder<'a>>,
    desc: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MetricOrder<'a> {
    metric_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DimensionOrder<'a> {
    dimension_name: &'a str,
}

/// The provider omits `rows` entirely for empty reports.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunReportResponse {
    #[serde(default)]
    rows: Vec<WireRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRow {
    #[serde(default)]
    dimension_values: Vec<WireValue>,
    #[serde(default)]
    metric_values: Vec<WireValue>,
}

#[derive(Debug, Deserialize)]
struct WireValue {
    #[serde(default)]
    value: Option<String>,
}

impl From<WireRow> for ReportRow {
    fn from(row: WireRow) -> Self {
        ReportRow {
            dimension_values: row
                .dimension_values
                .into_iter()
                .map(|v| v.value.unwrap_or_default())
                .collect(),
            metric_values: row
                .metric_values
                .into_iter()
                .map(|v| v.value.unwrap_or_default())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DateRange, OrderBy};
    use chrono::NaiveDate;

    fn request(order_field: &str, descending: bool) -> ReportRequest {
        ReportRequest {
            metric_names: vec!["screenPageViews".into()],
            dimension_names: vec!["pageTitle".into(), "pagePath".into()],
            date_range: DateRange {
                start: NaiveDate::from_ymd_opt(2024, 6, 8).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            },
            order_by: Some(OrderBy {
                field: order_field.into(),
                descending,
            }),
            limit: Some(10),
        }
    }

    #[test]
    fn test_report_body_orders_by_metric() {
        let request = request("screenPageViews", true);
        let body = serde_json::to_value(RunReportBody::from_request(&request)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "dateRanges": [{"startDate": "2024-06-08", "endDate": "2024-06-15"}],
                "metrics": [{"name": "screenPageViews"}],
                "dimensions": [{"name": "pageTitle"}, {"name": "pagePath"}],
                "orderBys": [{"metric": {"metricName": "screenPageViews"}, "desc": true}],
                "limit": 10
            })
        );
    }

    #[test]
    fn test_report_body_orders_by_dimension() {
        let request = request("pagePath", false);
        let body = serde_json::to_value(RunReportBody::from_request(&request)).unwrap();
        assert_eq!(
            body["orderBys"][0],
            serde_json::json!({"dimension": {"dimensionName": "pagePath"}, "desc": false})
        );
    }

    #[test]
    fn test_response_without_rows_is_empty() {
        let parsed: RunReportResponse =
            serde_json::from_str(r#"{"kind": "analyticsData#runReport", "rowCount": 0}"#).unwrap();
        assert!(parsed.rows.is_empty());
    }

    #[test]
    fn test_missing_values_become_empty_strings() {
        let parsed: RunReportResponse = serde_json::from_str(
            r#"{"rows": [{"dimensionValues": [{"value": "20240601"}, {}], "metricValues": [{"value": "42"}]}]}"#,
        )
        .unwrap();
        let row = ReportRow::from(parsed.rows.into_iter().next().unwrap());
        assert_eq!(row.dimension_values, vec!["20240601".to_string(), String::new()]);
        assert_eq!(row.metric_values, vec!["42".to_string()]);
    }

    #[test]
    fn test_missing_property_is_rejected() {
        let config = AnalyticsConfig {
            enabled: true,
            ..AnalyticsConfig::default()
        };
        assert!(matches!(
            Ga4Client::from_config(&config),
            Err(AnalyticsError::Credentials(_))
        ));
    }
}
