//! GenerateReportHandler - Adherence report over a user's plans.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::plan::PlanError;
use crate::domain::progress::{build_report, PeriodType, ProgressReport, ReportWindow};
use crate::ports::PlanRepository;

/// Query for a progress report.
#[derive(Debug, Clone)]
pub struct GenerateReportQuery {
    pub user_id: UserId,
    pub period: PeriodType,
    /// Last day of the window; today (UTC) when absent.
    pub reference_date: Option<NaiveDate>,
}

pub struct GenerateReportHandler {
    repository: Arc<dyn PlanRepository>,
}

impl GenerateReportHandler {
    pub fn new(repository: Arc<dyn PlanRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GenerateReportQuery) -> Result<ProgressReport, PlanError> {
        let now = Timestamp::now();
        let reference_day = query.reference_date.unwrap_or_else(|| now.date());
        let window = ReportWindow::ending_on(query.period, reference_day);

        let plans = self.repository.find_by_user(&query.user_id).await?;
        let report = build_report(query.user_id, &plans, &window, now);

        info!(
            user_id = %report.user_id,
            period = %query.period,
            plans = report.overall_summary.total_plans_considered,
            completion_rate = report.overall_summary.completion_rate,
            "progress report generated"
        );
        Ok(report)
    }
}
