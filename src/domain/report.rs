//! Analytics report value types.
//!
//! Requests sent to the analytics provider, the positional rows it returns,
//! and the normalized shape served to dashboard clients.

use std::collections::BTreeMap;

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Earliest date the provider keeps data for.
pub const ALL_TIME_START: NaiveDate = match NaiveDate::from_ymd_opt(2020, 1, 1) {
    Some(date) => date,
    None => panic!("invalid all-time start"),
};

/// Caller-supplied range code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RangeCode {
    /// Last 7 days.
    #[default]
    Last7d,
    /// Last 14 days.
    Last14d,
    /// Last calendar month.
    Last1m,
    /// Last 3 calendar months.
    Last3m,
    /// Last 6 calendar months.
    Last6m,
    /// Everything since [`ALL_TIME_START`].
    All,
}

impl RangeCode {
    /// Parse a range code, falling back to `7d` for anything unrecognized.
    pub fn parse_lenient(code: Option<&str>) -> Self {
        code.and_then(|c| c.parse().ok()).unwrap_or_default()
    }

    /// Resolve to a concrete interval ending today.
    pub fn resolve(self, today: NaiveDate) -> DateRange {
        let start = match self {
            RangeCode::Last7d => today - Duration::days(7),
            RangeCode::Last14d => today - Duration::days(14),
            RangeCode::Last1m => months_before(today, 1),
            RangeCode::Last3m => months_before(today, 3),
            RangeCode::Last6m => months_before(today, 6),
            RangeCode::All => ALL_TIME_START,
        };

        DateRange { start, end: today }
    }
}

fn months_before(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(ALL_TIME_START)
}

impl std::str::FromStr for RangeCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "7d" => Ok(RangeCode::Last7d),
            "14d" => Ok(RangeCode::Last14d),
            "1m" => Ok(RangeCode::Last1m),
            "3m" => Ok(RangeCode::Last3m),
            "6m" => Ok(RangeCode::Last6m),
            "all" => Ok(RangeCode::All),
            _ => Err(format!(
                "Invalid range: {}. Use 7d, 14d, 1m, 3m, 6m or all",
                s
            )),
        }
    }
}

/// Inclusive date interval shared by every report of one aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Sort instruction for a report. The field names one of the request's
/// metrics or dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

/// One named query against the analytics provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub metric_names: Vec<String>,
    pub dimension_names: Vec<String>,
    pub date_range: DateRange,
    pub order_by: Option<OrderBy>,
    pub limit: Option<u32>,
}

impl ReportRequest {
    /// Whether `field` is one of the request's metrics.
    pub fn is_metric(&self, field: &str) -> bool {
        self.metric_names.iter().any(|m| m == field)
    }
}

/// A positional record returned by the provider.
///
/// Values are not guaranteed to line up with the request; short rows read
/// as empty strings past their end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub dimension_values: Vec<String>,
    pub metric_values: Vec<String>,
}

impl ReportRow {
    /// Dimension value at `index`, or `""`.
    pub fn dimension(&self, index: usize) -> &str {
        self.dimension_values
            .get(index)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Metric value at `index`, or `""`.
    pub fn metric(&self, index: usize) -> &str {
        self.metric_values.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Report row with named fields.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRow {
    pub date: String,
    pub name: String,
    pub path: String,
    pub visits: i64,
    pub sessions: i64,
    pub active_users: i64,
    pub page_views: i64,
    pub bounce_rate: f64,
    pub new_users: i64,
    pub percentage: String,
}

impl Default for NormalizedRow {
    fn default() -> Self {
        Self {
            date: String::new(),
            name: String::new(),
            path: String::new(),
            visits: 0,
            sessions: 0,
            active_users: 0,
            page_views: 0,
            bounce_rate: 0.0,
            new_users: 0,
            percentage: "0%".to_string(),
        }
    }
}

/// Normalized rows keyed by report name.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct AggregateReport {
    sections: BTreeMap<String, Vec<NormalizedRow>>,
}

impl AggregateReport {
    pub fn insert(&mut self, key: impl Into<String>, rows: Vec<NormalizedRow>) {
        self.sections.insert(key.into(), rows);
    }

    pub fn get(&self, key: &str) -> Option<&[NormalizedRow]> {
        self.sections.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_range_resolution() {
        let cases = [
            ("7d", ymd(2024, 6, 8)),
            ("14d", ymd(2024, 6, 1)),
            ("1m", ymd(2024, 5, 15)),
            ("3m", ymd(2024, 3, 15)),
            ("6m", ymd(2023, 12, 15)),
            ("all", ymd(2020, 1, 1)),
        ];

        for (code, start) in cases {
            let range = RangeCode::parse_lenient(Some(code)).resolve(today());
            assert_eq!(range.start, start, "range {}", code);
            assert_eq!(range.end, today());
        }
    }

    #[test]
    fn test_unknown_range_falls_back_to_seven_days() {
        let fallback = RangeCode::parse_lenient(Some("xyz")).resolve(today());
        let seven = RangeCode::Last7d.resolve(today());
        assert_eq!(fallback, seven);
        assert_eq!(RangeCode::parse_lenient(None), RangeCode::Last7d);
        assert!("xyz".parse::<RangeCode>().is_err());
    }

    #[test]
    fn test_month_end_clamps() {
        let range = RangeCode::Last1m.resolve(ymd(2024, 3, 31));
        assert_eq!(range.start, ymd(2024, 2, 29));
    }

    #[test]
    fn test_short_row_reads_empty() {
        let row = ReportRow {
            dimension_values: vec!["20240601".into()],
            metric_values: vec![],
        };
        assert_eq!(row.dimension(0), "20240601");
        assert_eq!(row.dimension(3), "");
        assert_eq!(row.metric(0), "");
    }

    #[test]
    fn test_aggregate_serializes_as_map() {
        let mut report = AggregateReport::default();
        report.insert("topPages", vec![NormalizedRow::default()]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["topPages"][0]["percentage"], "0%");
        assert_eq!(json["topPages"][0]["pageViews"], 0);
    }
}
