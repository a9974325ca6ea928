//! CLI value enums and domain type conversions.

use clap::ValueEnum;

use crate::domain::TaskStatus;

/// Task status for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatusArg {
    /// Not started or waiting on dependencies
    Pending,
    /// Ready or being worked on
    #[value(name = "in_progress", alias = "in-progress")]
    InProgress,
    /// Done
    Completed,
    /// Cannot proceed
    Blocked,
}

impl std::fmt::Display for TaskStatusArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        TaskStatus::from(*self).fmt(f)
    }
}

impl From<TaskStatusArg> for TaskStatus {
    fn from(arg: TaskStatusArg) -> Self {
        match arg {
            TaskStatusArg::Pending => TaskStatus::Pending,
            TaskStatusArg::InProgress => TaskStatus::InProgress,
            TaskStatusArg::Completed => TaskStatus::Completed,
            TaskStatusArg::Blocked => TaskStatus::Blocked,
        }
    }
}

impl From<TaskStatus> for TaskStatusArg {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Pending => TaskStatusArg::Pending,
            TaskStatus::InProgress => TaskStatusArg::InProgress,
            TaskStatus::Completed => TaskStatusArg::Completed,
            TaskStatus::Blocked => TaskStatusArg::Blocked,
        }
    }
}
