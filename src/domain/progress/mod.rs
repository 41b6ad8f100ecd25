//! Progress module - adherence reports over a user's plans.

mod period;
mod report;

pub use period::{parse_reference_date, PeriodType, ReportWindow, DATE_FORMAT};
pub use report::{build_report, ActivityProgress, OverallSummary, ProgressReport, ReportPeriod};
