//! Reporting periods.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Timestamp, ValidationError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Supported report windows. Both end on the reference day, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PeriodType {
    #[default]
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[serde(rename = "last_30_days")]
    Last30Days,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Last7Days => "last_7_days",
            PeriodType::Last30Days => "last_30_days",
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            PeriodType::Last7Days => 7,
            PeriodType::Last30Days => 30,
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last_7_days" => Ok(PeriodType::Last7Days),
            "last_30_days" => Ok(PeriodType::Last30Days),
            other => Err(ValidationError::unsupported_value("period", other)),
        }
    }
}

/// Concrete window a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub period_type: PeriodType,
    /// Midnight of the first day.
    pub start: Timestamp,
    /// Last second of the reference day.
    pub end: Timestamp,
}

impl ReportWindow {
    pub fn ending_on(period_type: PeriodType, reference_day: NaiveDate) -> Self {
        let first_day = reference_day - chrono::Duration::days(period_type.days() - 1);
        Self {
            period_type,
            start: Timestamp::start_of_day(first_day),
            end: Timestamp::end_of_day(reference_day),
        }
    }

    /// True if `at` lies within the window, bounds included.
    pub fn contains(&self, at: &Timestamp) -> bool {
        !at.is_before(&self.start) && !at.is_after(&self.end)
    }

    /// True if `at` lies strictly inside the window.
    pub fn strictly_contains(&self, at: &Timestamp) -> bool {
        at.is_after(&self.start) && at.is_before(&self.end)
    }
}

/// Parses a `YYYY-MM-DD` reference date.
pub fn parse_reference_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ValidationError::invalid_format("reference_date", "expected YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        parse_reference_date(s).unwrap()
    }

    #[test]
    fn seven_day_window_spans_reference_day_and_six_before() {
        let w = ReportWindow::ending_on(PeriodType::Last7Days, day("2024-03-15"));
        assert_eq!(w.start.date(), day("2024-03-09"));
        assert_eq!(w.end.date(), day("2024-03-15"));
        assert_eq!(w.end.as_datetime().format("%H:%M:%S").to_string(), "23:59:59");
    }

    #[test]
    fn thirty_day_window_starts_twenty_nine_days_back() {
        let w = ReportWindow::ending_on(PeriodType::Last30Days, day("2024-03-30"));
        assert_eq!(w.start.date(), day("2024-03-01"));
    }

    #[test]
    fn contains_includes_bounds_strict_excludes_them() {
        let w = ReportWindow::ending_on(PeriodType::Last7Days, day("2024-03-15"));
        assert!(w.contains(&w.start));
        assert!(w.contains(&w.end));
        assert!(!w.strictly_contains(&w.start));
        assert!(!w.contains(&w.end.plus_days(1)));
    }

    #[test]
    fn period_type_parses_known_values_only() {
        assert_eq!("last_30_days".parse::<PeriodType>().unwrap(), PeriodType::Last30Days);
        assert!("custom_range".parse::<PeriodType>().is_err());
    }

    #[test]
    fn malformed_reference_date_is_rejected() {
        assert!(parse_reference_date("15/03/2024").is_err());
    }
}
