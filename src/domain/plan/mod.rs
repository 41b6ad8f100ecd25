//! Plan module - habit plans and their tasks.

mod aggregate;
mod errors;
mod status;
mod template;

pub use aggregate::{NewPlan, NewPlanTask, Plan, PlanTask};
pub use errors::PlanError;
pub use status::{PlanStatus, TaskStatus, TaskType};
pub use template::{
    default_plan, DEFAULT_PLAN_DESCRIPTION, DEFAULT_PLAN_TITLE, KEGEL_TASK_TITLE, KEY_ACTIVITIES,
    READING_TASK_TITLE, WATER_TASK_TITLE,
};
