//! HTTP handlers for progress endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::response::ApiResponse;
use crate::application::handlers::{GenerateReportHandler, GenerateReportQuery};
use crate::domain::foundation::UserId;
use crate::domain::progress::{parse_reference_date, PeriodType, ProgressReport};

#[derive(Clone)]
pub struct ProgressHandlers {
    report_handler: Arc<GenerateReportHandler>,
}

impl ProgressHandlers {
    pub fn new(report_handler: Arc<GenerateReportHandler>) -> Self {
        Self { report_handler }
    }
}

/// Query string of the report endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportParams {
    pub period: Option<String>,
    pub reference_date: Option<String>,
}

impl ReportParams {
    /// Period defaults to the last seven days; blank values count as absent.
    fn into_query(self, user_id: UserId) -> Result<GenerateReportQuery, ApiError> {
        let period = match self.period.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse::<PeriodType>()?,
            _ => PeriodType::default(),
        };
        let reference_date = match self.reference_date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(parse_reference_date(raw)?),
            _ => None,
        };
        Ok(GenerateReportQuery {
            user_id,
            period,
            reference_date,
        })
    }
}

/// GET /api/progress/report/:user_id?period=&reference_date=
pub async fn get_report(
    State(handlers): State<ProgressHandlers>,
    Path(user_id): Path<String>,
    Query(params): Query<ReportParams>,
) -> Result<ApiResponse<ProgressReport>, ApiError> {
    let query = params.into_query(UserId::new(user_id)?)?;
    let report = handlers.report_handler.handle(query).await?;
    Ok(ApiResponse::ok("Progress report generated", report))
}
