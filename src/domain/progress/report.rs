//! Progress report computation.
//!
//! Only plans that overlap the report window count. Active and pending
//! plans overlap if they were created before the window ends; completed
//! plans if they finished inside it or were still running during it.
//! Cancelled plans never count.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::period::{PeriodType, ReportWindow, DATE_FORMAT};
use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::plan::{Plan, PlanStatus, TaskStatus, TaskType, KEY_ACTIVITIES};

/// Dates covered by a report, formatted `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub start_date: String,
    pub end_date: String,
    pub period_type: PeriodType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OverallSummary {
    pub total_plans_considered: u32,
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub skipped_tasks: u32,
    /// completed / (total - skipped).
    pub completion_rate: f64,
    pub tasks_completed_by_type: BTreeMap<TaskType, u32>,
}

/// Adherence for one tracked activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityProgress {
    pub activity_title: String,
    pub completed_count: u32,
    pub scheduled_count: u32,
    pub adherence_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_completed_date: Option<String>,
}

impl ActivityProgress {
    fn new(title: &str) -> Self {
        Self {
            activity_title: title.to_string(),
            completed_count: 0,
            scheduled_count: 0,
            adherence_rate: 0.0,
            last_completed_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub user_id: UserId,
    pub report_period: ReportPeriod,
    pub overall_summary: OverallSummary,
    pub activity_progress: Vec<ActivityProgress>,
    pub generated_at: Timestamp,
}

/// Builds a report over `plans` for the given window.
pub fn build_report(
    user_id: UserId,
    plans: &[Plan],
    window: &ReportWindow,
    generated_at: Timestamp,
) -> ProgressReport {
    let mut summary = OverallSummary::default();
    let mut activities: Vec<(ActivityProgress, Option<Timestamp>)> = KEY_ACTIVITIES
        .iter()
        .map(|title| (ActivityProgress::new(title), None))
        .collect();

    for plan in plans.iter().filter(|p| overlaps(p, window)) {
        summary.total_plans_considered += 1;

        for task in &plan.tasks {
            summary.total_tasks += 1;

            let completed_at = task
                .completed_at
                .filter(|at| task.status == TaskStatus::Completed && window.contains(at));

            if let Some(at) = completed_at {
                summary.completed_tasks += 1;
                *summary.tasks_completed_by_type.entry(task.task_type).or_insert(0) += 1;

                if let Some((progress, last)) = activities
                    .iter_mut()
                    .find(|(p, _)| p.activity_title == task.title)
                {
                    progress.completed_count += 1;
                    if last.map_or(true, |prev| at.is_after(&prev)) {
                        *last = Some(at);
                    }
                }
            }

            if task.status == TaskStatus::Skipped && window.strictly_contains(&task.updated_at) {
                summary.skipped_tasks += 1;
            }

            if plan.status == PlanStatus::Active {
                if let Some((progress, _)) = activities
                    .iter_mut()
                    .find(|(p, _)| p.activity_title == task.title)
                {
                    progress.scheduled_count += 1;
                }
            }
        }
    }

    summary.completion_rate = ratio(
        summary.completed_tasks,
        summary.total_tasks as i64 - summary.skipped_tasks as i64,
    );

    let activity_progress = activities
        .into_iter()
        .map(|(mut progress, last)| {
            progress.adherence_rate =
                ratio(progress.completed_count, progress.scheduled_count as i64);
            progress.last_completed_date =
                last.map(|at| at.as_datetime().format(DATE_FORMAT).to_string());
            progress
        })
        .collect();

    ProgressReport {
        user_id,
        report_period: ReportPeriod {
            start_date: window.start.as_datetime().format(DATE_FORMAT).to_string(),
            end_date: window.end.as_datetime().format(DATE_FORMAT).to_string(),
            period_type: window.period_type,
        },
        overall_summary: summary,
        activity_progress,
        generated_at,
    }
}

/// `done / expected`, or 1.0 when nothing was expected but something was done.
fn ratio(done: u32, expected: i64) -> f64 {
    if expected > 0 {
        done as f64 / expected as f64
    } else if done > 0 {
        1.0
    } else {
        0.0
    }
}

fn overlaps(plan: &Plan, window: &ReportWindow) -> bool {
    let created_before_end = !plan.created_at.is_after(&window.end);
    match plan.status {
        PlanStatus::Active | PlanStatus::Pending => created_before_end,
        PlanStatus::Completed => match plan.completed_at {
            Some(done) if window.contains(&done) => true,
            Some(done) if done.is_after(&window.end) => created_before_end,
            done => created_before_end && done.map_or(true, |d| d.is_after(&window.start)),
        },
        PlanStatus::Cancelled => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PlanId, TaskId};
    use crate::domain::plan::default_plan;
    use crate::domain::progress::parse_reference_date;

    fn window() -> ReportWindow {
        ReportWindow::ending_on(PeriodType::Last7Days, parse_reference_date("2024-03-15").unwrap())
    }

    fn user() -> UserId {
        UserId::new("u1").unwrap()
    }

    fn inside() -> Timestamp {
        window().end.minus_days(2)
    }

    fn plan_created(at: Timestamp, id: i64) -> Plan {
        let base = id * 10;
        default_plan(user()).into_plan(
            PlanId::new(id),
            &[TaskId::new(base), TaskId::new(base + 1), TaskId::new(base + 2)],
            at,
        )
    }

    #[test]
    fn empty_history_reports_zeroes() {
        let report = build_report(user(), &[], &window(), Timestamp::now());
        assert_eq!(report.overall_summary.total_plans_considered, 0);
        assert_eq!(report.overall_summary.completion_rate, 0.0);
        assert_eq!(report.activity_progress.len(), KEY_ACTIVITIES.len());
        assert_eq!(report.report_period.start_date, "2024-03-09");
        assert_eq!(report.report_period.end_date, "2024-03-15");
    }

    #[test]
    fn completed_tasks_in_window_are_counted_by_type() {
        let mut plan = plan_created(window().start.minus_days(3), 1);
        plan.tasks[0].mark_completed(inside());
        plan.tasks[1].mark_completed(window().start.minus_days(1));

        let report = build_report(user(), &[plan], &window(), Timestamp::now());
        let s = &report.overall_summary;
        assert_eq!(s.total_plans_considered, 1);
        assert_eq!(s.total_tasks, 3);
        assert_eq!(s.completed_tasks, 1);
        assert_eq!(s.tasks_completed_by_type.get(&TaskType::Exercise), Some(&1));
        assert_eq!(s.tasks_completed_by_type.get(&TaskType::Habit), None);
        assert!((s.completion_rate - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn skipped_tasks_shrink_the_denominator() {
        let mut plan = plan_created(window().start.minus_days(3), 1);
        plan.tasks[0].mark_completed(inside());
        plan.tasks[1].mark_skipped(inside()).unwrap();

        let report = build_report(user(), &[plan], &window(), Timestamp::now());
        assert_eq!(report.overall_summary.skipped_tasks, 1);
        assert!((report.overall_summary.completion_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn all_skipped_but_some_completed_rates_one() {
        assert_eq!(ratio(2, 0), 1.0);
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(1, -1), 1.0);
    }

    #[test]
    fn plans_created_after_window_are_ignored() {
        let plan = plan_created(window().end.plus_days(1), 1);
        let report = build_report(user(), &[plan], &window(), Timestamp::now());
        assert_eq!(report.overall_summary.total_plans_considered, 0);
    }

    #[test]
    fn cancelled_plans_are_ignored() {
        let mut plan = plan_created(window().start, 1);
        plan.status = PlanStatus::Cancelled;
        let report = build_report(user(), &[plan], &window(), Timestamp::now());
        assert_eq!(report.overall_summary.total_plans_considered, 0);
    }

    #[test]
    fn completed_plan_finished_before_window_is_ignored() {
        let mut plan = plan_created(window().start.minus_days(20), 1);
        plan.status = PlanStatus::Completed;
        plan.completed_at = Some(window().start.minus_days(1));
        let report = build_report(user(), &[plan], &window(), Timestamp::now());
        assert_eq!(report.overall_summary.total_plans_considered, 0);
    }

    #[test]
    fn completed_plan_finished_after_window_counts() {
        let mut plan = plan_created(window().start.minus_days(20), 1);
        plan.status = PlanStatus::Completed;
        plan.completed_at = Some(window().end.plus_days(1));
        let report = build_report(user(), &[plan], &window(), Timestamp::now());
        assert_eq!(report.overall_summary.total_plans_considered, 1);
    }

    #[test]
    fn key_activity_adherence_tracks_latest_completion() {
        let mut first = plan_created(window().start.minus_days(3), 1);
        let mut second = plan_created(window().start.minus_days(2), 2);
        first.tasks[0].mark_completed(inside().minus_days(1));
        second.tasks[0].mark_completed(inside());

        let report = build_report(user(), &[first, second], &window(), Timestamp::now());
        let kegel = &report.activity_progress[0];
        assert_eq!(kegel.activity_title, "Kegel exercises");
        assert_eq!(kegel.scheduled_count, 2);
        assert_eq!(kegel.completed_count, 2);
        assert_eq!(kegel.adherence_rate, 1.0);
        assert_eq!(kegel.last_completed_date.as_deref(), Some("2024-03-13"));

        let water = &report.activity_progress[1];
        assert_eq!(water.completed_count, 0);
        assert_eq!(water.adherence_rate, 0.0);
        assert!(water.last_completed_date.is_none());
    }

    #[test]
    fn pending_plan_tasks_are_not_scheduled() {
        let mut plan = plan_created(window().start, 1);
        plan.status = PlanStatus::Pending;
        let report = build_report(user(), &[plan], &window(), Timestamp::now());
        assert_eq!(report.overall_summary.total_plans_considered, 1);
        assert_eq!(report.activity_progress[0].scheduled_count, 0);
    }
}
