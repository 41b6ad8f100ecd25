//! The starter plan every user receives.

use super::aggregate::{NewPlan, NewPlanTask};
use super::status::{PlanStatus, TaskType};
use crate::domain::foundation::UserId;

pub const DEFAULT_PLAN_TITLE: &str = "My health improvement plan";
pub const DEFAULT_PLAN_DESCRIPTION: &str = "A starter plan aimed at improving overall health.";

pub const KEGEL_TASK_TITLE: &str = "Kegel exercises";
pub const WATER_TASK_TITLE: &str = "Healthy water intake";
pub const READING_TASK_TITLE: &str = "Learn about healthy eating";

/// Activities whose adherence is reported individually.
pub const KEY_ACTIVITIES: [&str; 2] = [KEGEL_TASK_TITLE, WATER_TASK_TITLE];

/// Builds the default active plan with its three starter tasks.
pub fn default_plan(user_id: UserId) -> NewPlan {
    NewPlan {
        user_id,
        title: DEFAULT_PLAN_TITLE.to_string(),
        description: DEFAULT_PLAN_DESCRIPTION.to_string(),
        status: PlanStatus::Active,
        tasks: vec![
            task(
                TaskType::Exercise,
                KEGEL_TASK_TITLE,
                "Do Kegel exercises every day to strengthen the pelvic floor muscles.",
                "Twice daily",
                "5 minutes each",
                1,
            ),
            task(
                TaskType::Habit,
                WATER_TASK_TITLE,
                "Make sure to drink enough water every day (about 8 glasses).",
                "Daily",
                "All day",
                2,
            ),
            task(
                TaskType::Knowledge,
                READING_TASK_TITLE,
                "Read an article about balanced eating.",
                "Once this week",
                "About 15 minutes of reading",
                3,
            ),
        ],
    }
}

fn task(
    task_type: TaskType,
    title: &str,
    description: &str,
    frequency: &str,
    duration: &str,
    order: i32,
) -> NewPlanTask {
    NewPlanTask {
        task_type,
        title: title.to_string(),
        description: description.to_string(),
        frequency: frequency.to_string(),
        duration: duration.to_string(),
        order,
    }
}
