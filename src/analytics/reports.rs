//! The fixed report catalogue.
//!
//! Each report declares its dimensions and metrics together with the
//! [`NormalizedRow`] field every column feeds. Decoding a provider row is then
//! a walk over that table; positions missing from the row decode as empty
//! strings and zeros.

use crate::analytics::AnalyticsError;
use crate::domain::{DateRange, NormalizedRow, OrderBy, ReportRequest, ReportRow};

/// Metrics requested by the realtime active-user query.
pub const REALTIME_METRICS: &[&str] = &["activeUsers"];

/// A named field of [`NormalizedRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    Name,
    Path,
    Visits,
    Sessions,
    ActiveUsers,
    PageViews,
    BounceRate,
    NewUsers,
}

impl Column {
    /// Text columns come from dimensions, numeric ones from metrics.
    pub fn is_text(self) -> bool {
        matches!(self, Column::Date | Column::Name | Column::Path)
    }

    fn assign(self, row: &mut NormalizedRow, raw: &str) {
        match self {
            Column::Date => row.date = raw.to_string(),
            Column::Name => row.name = raw.to_string(),
            Column::Path => row.path = raw.to_string(),
            Column::Visits => row.visits = parse_count(raw),
            Column::Sessions => row.sessions = parse_count(raw),
            Column::ActiveUsers => row.active_users = parse_count(raw),
            Column::PageViews => row.page_views = parse_count(raw),
            Column::BounceRate => row.bounce_rate = parse_ratio(raw),
            Column::NewUsers => row.new_users = parse_count(raw),
        }
    }
}

/// Parse an integer metric, truncating decimals; anything else is `0`.
pub fn parse_count(raw: &str) -> i64 {
    let raw = raw.trim();
    raw.parse::<i64>()
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.trunc() as i64)
        })
        .unwrap_or(0)
}

/// Parse a floating metric; anything unparsable is `0.0`.
pub fn parse_ratio(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// One catalogue entry.
#[derive(Debug)]
pub struct ReportDefinition {
    /// Key in the aggregate response.
    pub key: &'static str,
    pub dimensions: &'static [(&'static str, Column)],
    pub metrics: &'static [(&'static str, Column)],
    /// `(field, descending)`.
    pub order_by: Option<(&'static str, bool)>,
    pub limit: Option<u32>,
}

impl ReportDefinition {
    /// Build the provider request for `range`.
    pub fn request(&self, range: DateRange) -> ReportRequest {
        ReportRequest {
            metric_names: self.metrics.iter().map(|(n, _)| n.to_string()).collect(),
            dimension_names: self.dimensions.iter().map(|(n, _)| n.to_string()).collect(),
            date_range: range,
            order_by: self.order_by.map(|(field, descending)| OrderBy {
                field: field.to_string(),
                descending,
            }),
            limit: self.limit,
        }
    }

    /// Decode one positional row.
    pub fn normalize(&self, row: &ReportRow) -> NormalizedRow {
        let mut normalized = NormalizedRow::default();

        for (index, (_, column)) in self.dimensions.iter().enumerate() {
            column.assign(&mut normalized, row.dimension(index));
        }
        for (index, (_, column)) in self.metrics.iter().enumerate() {
            column.assign(&mut normalized, row.metric(index));
        }

        normalized.percentage = percentage(row);
        normalized
    }

    pub fn normalize_rows(&self, rows: &[ReportRow]) -> Vec<NormalizedRow> {
        rows.iter().map(|row| self.normalize(row)).collect()
    }

    /// Check the mapping table is self-consistent.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        let invalid = |reason: String| AnalyticsError::Definition(format!("{}: {}", self.key, reason));

        if self.metrics.is_empty() {
            return Err(invalid("no metrics declared".to_string()));
        }

        if let Some((name, _)) = self.dimensions.iter().find(|(_, c)| !c.is_text()) {
            return Err(invalid(format!("dimension {} maps to a numeric field", name)));
        }
        if let Some((name, _)) = self.metrics.iter().find(|(_, c)| c.is_text()) {
            return Err(invalid(format!("metric {} maps to a text field", name)));
        }

        let columns: Vec<Column> = self
            .dimensions
            .iter()
            .chain(self.metrics.iter())
            .map(|(_, c)| *c)
            .collect();
        for (i, column) in columns.iter().enumerate() {
            if columns[i + 1..].contains(column) {
                return Err(invalid(format!("{:?} is mapped twice", column)));
            }
        }

        if let Some((field, _)) = self.order_by {
            let declared = self
                .dimensions
                .iter()
                .chain(self.metrics.iter())
                .any(|(name, _)| *name == field);
            if !declared {
                return Err(invalid(format!("order field {} is not requested", field)));
            }
        }

        Ok(())
    }
}

fn percentage(row: &ReportRow) -> String {
    match row.metric_values.first().map(|v| v.trim()) {
        Some(value) if !value.is_empty() => format!("{}%", value),
        _ => "0%".to_string(),
    }
}

/// Reports fetched for the dashboard aggregate.
pub const REPORTS: &[ReportDefinition] = &[
    ReportDefinition {
        key: "metrics",
        dimensions: &[("date", Column::Date)],
        metrics: &[
            ("activeUsers", Column::ActiveUsers),
            ("sessions", Column::Sessions),
        ],
        order_by: Some(("date", false)),
        limit: None,
    },
    ReportDefinition {
        key: "topPages",
        dimensions: &[("pageTitle", Column::Name), ("pagePath", Column::Path)],
        metrics: &[("screenPageViews", Column::PageViews)],
        order_by: Some(("screenPageViews", true)),
        limit: Some(10),
    },
    ReportDefinition {
        key: "referrers",
        dimensions: &[("sessionSource", Column::Name)],
        metrics: &[("sessions", Column::Visits)],
        order_by: Some(("sessions", true)),
        limit: Some(10),
    },
    ReportDefinition {
        key: "countries",
        dimensions: &[("country", Column::Name)],
        metrics: &[("sessions", Column::Visits)],
        order_by: Some(("sessions", true)),
        limit: Some(10),
    },
    ReportDefinition {
        key: "devices",
        dimensions: &[("deviceCategory", Column::Name)],
        metrics: &[("sessions", Column::Visits)],
        order_by: Some(("sessions", true)),
        limit: None,
    },
    ReportDefinition {
        key: "operatingSystems",
        dimensions: &[("operatingSystem", Column::Name)],
        metrics: &[("sessions", Column::Visits)],
        order_by: Some(("sessions", true)),
        limit: Some(10),
    },
    ReportDefinition {
        key: "pageViews",
        dimensions: &[("date", Column::Date)],
        metrics: &[
            ("totalUsers", Column::Visits),
            ("screenPageViews", Column::PageViews),
        ],
        order_by: Some(("date", false)),
        limit: None,
    },
    ReportDefinition {
        key: "bounceRate",
        dimensions: &[("date", Column::Date)],
        metrics: &[("bounceRate", Column::BounceRate)],
        order_by: Some(("date", false)),
        limit: None,
    },
    ReportDefinition {
        key: "newUsers",
        dimensions: &[("date", Column::Date)],
        metrics: &[("newUsers", Column::NewUsers)],
        order_by: Some(("date", false)),
        limit: None,
    },
];

/// Daily active users, returned without normalization.
pub const TIME_SERIES: ReportDefinition = ReportDefinition {
    key: "timeSeries",
    dimensions: &[("date", Column::Date)],
    metrics: &[("activeUsers", Column::ActiveUsers)],
    order_by: Some(("date", false)),
    limit: None,
};

/// Validate every catalogue entry.
pub fn validate_catalogue() -> Result<(), AnalyticsError> {
    for report in REPORTS.iter().chain(std::iter::once(&TIME_SERIES)) {
        report.validate()?;
    }

    let mut keys: Vec<&str> = REPORTS.iter().map(|r| r.key).collect();
    keys.sort_unstable();
    keys.dedup();
    if keys.len() != REPORTS.len() {
        return Err(AnalyticsError::Definition(
            "duplicate report key".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(key: &str) -> &'static ReportDefinition {
        REPORTS.iter().find(|r| r.key == key).unwrap()
    }

    fn row(dimensions: &[&str], metrics: &[&str]) -> ReportRow {
        ReportRow {
            dimension_values: dimensions.iter().map(|s| s.to_string()).collect(),
            metric_values: metrics.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_catalogue_is_valid() {
        validate_catalogue().unwrap();
        assert_eq!(REPORTS.len(), 9);
    }

    #[test]
    fn test_validate_rejects_undeclared_order_field() {
        let broken = ReportDefinition {
            key: "broken",
            dimensions: &[("date", Column::Date)],
            metrics: &[("sessions", Column::Sessions)],
            order_by: Some(("screenPageViews", true)),
            limit: None,
        };
        assert!(matches!(
            broken.validate(),
            Err(AnalyticsError::Definition(_))
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_columns() {
        let broken = ReportDefinition {
            key: "broken",
            dimensions: &[],
            metrics: &[("sessions", Column::Visits), ("totalUsers", Column::Visits)],
            order_by: None,
            limit: None,
        };
        assert!(broken.validate().is_err());
    }

    #[test]
    fn test_top_pages_decoding() {
        let normalized = report("topPages").normalize(&row(&["Home", "/"], &["1520"]));
        assert_eq!(normalized.name, "Home");
        assert_eq!(normalized.path, "/");
        assert_eq!(normalized.page_views, 1520);
        assert_eq!(normalized.percentage, "1520%");
        assert_eq!(normalized.visits, 0);
    }

    #[test]
    fn test_short_row_uses_defaults() {
        let normalized = report("pageViews").normalize(&row(&[], &["17"]));
        assert_eq!(normalized.date, "");
        assert_eq!(normalized.visits, 17);
        assert_eq!(normalized.page_views, 0);

        let empty = report("topPages").normalize(&ReportRow::default());
        assert_eq!(empty, NormalizedRow::default());
    }

    #[test]
    fn test_unparsable_metrics_fall_back_to_zero() {
        let normalized = report("bounceRate").normalize(&row(&["20240601"], &["n/a"]));
        assert_eq!(normalized.bounce_rate, 0.0);
        assert_eq!(normalized.percentage, "n/a%");

        let normalized = report("newUsers").normalize(&row(&["20240601"], &["abc"]));
        assert_eq!(normalized.new_users, 0);
    }

    #[test]
    fn test_percentage() {
        let normalized = report("bounceRate").normalize(&row(&["20240601"], &["42.5"]));
        assert_eq!(normalized.percentage, "42.5%");
        assert!((normalized.bounce_rate - 42.5).abs() < f64::EPSILON);

        let normalized = report("bounceRate").normalize(&row(&["20240601"], &[]));
        assert_eq!(normalized.percentage, "0%");
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_count("12"), 12);
        assert_eq!(parse_count("12.9"), 12);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("NaN"), 0);
        assert_eq!(parse_ratio("0.4375"), 0.4375);
        assert_eq!(parse_ratio("inf"), 0.0);
    }

    #[test]
    fn test_request_shape() {
        let range = crate::domain::RangeCode::Last7d
            .resolve(chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        let request = report("topPages").request(range);
        assert_eq!(request.dimension_names, vec!["pageTitle", "pagePath"]);
        assert_eq!(request.metric_names, vec!["screenPageViews"]);
        assert!(request.order_by.as_ref().unwrap().descending);
        assert!(request.is_metric("screenPageViews"));
        assert_eq!(request.limit, Some(10));
    }
}
