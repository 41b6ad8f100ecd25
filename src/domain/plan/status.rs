//! Plan and task enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

macro_rules! string_enum {
    ($name:ident, $field:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ValidationError::unsupported_value($field, other)),
                }
            }
        }
    };
}

/// Lifecycle of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Active,
    Completed,
    Cancelled,
    /// Awaiting generation or user confirmation.
    #[default]
    Pending,
}

string_enum!(PlanStatus, "plan_status", {
    Active => "active",
    Completed => "completed",
    Cancelled => "cancelled",
    Pending => "pending",
});

/// Category of a plan task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Exercise,
    Habit,
    Knowledge,
    Generic,
}

string_enum!(TaskType, "task_type", {
    Exercise => "exercise",
    Habit => "habit",
    Knowledge => "knowledge",
    Generic => "generic",
});

/// Progress state of a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
    Skipped,
    Failed,
}

string_enum!(TaskStatus, "task_status", {
    Pending => "pending",
    Completed => "completed",
    Skipped => "skipped",
    Failed => "failed",
});
