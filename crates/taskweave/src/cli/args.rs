//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::{Parser, Subcommand};

use super::types::TaskStatusArg;
use super::validators::{validate_task_id, validate_title};
use crate::domain::TaskId;

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `create` command
#[derive(Parser, Debug, Clone)]
pub struct CreateArgs {
    /// Task title (single line, at most 255 characters)
    #[arg(long, value_parser = validate_title)]
    pub title: String,

    /// Detailed description
    #[arg(short = 'D', long)]
    pub description: Option<String>,

    /// Initial status
    #[arg(short, long, value_enum, default_value = "pending")]
    pub status: TaskStatusArg,
}

/// Arguments for the `list` command
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Filter by status
    #[arg(short, long, value_enum)]
    pub status: Option<TaskStatusArg>,

    /// Maximum number of tasks to display
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

/// Arguments for the `show` command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Task ID(s) to display
    #[arg(required = true, num_args = 1.., value_parser = validate_task_id)]
    pub task_ids: Vec<TaskId>,
}

/// Arguments for the `update` command
#[derive(Parser, Debug, Clone)]
pub struct UpdateArgs {
    /// Task ID to update
    #[arg(value_parser = validate_task_id)]
    pub task_id: TaskId,

    /// New title
    #[arg(long, value_parser = validate_title)]
    pub title: Option<String>,

    /// New description
    #[arg(short = 'D', long)]
    pub description: Option<String>,

    /// New status; dependents are re-derived
    #[arg(short, long, value_enum)]
    pub status: Option<TaskStatusArg>,
}

impl UpdateArgs {
    /// Whether no field was given.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

/// Arguments for the `delete` command
#[derive(Parser, Debug, Clone)]
pub struct DeleteArgs {
    /// Task ID to delete
    #[arg(value_parser = validate_task_id)]
    pub task_id: TaskId,
}

/// Arguments for the `dep` command
#[derive(Parser, Debug, Clone)]
pub struct DepArgs {
    /// Dependency action
    #[command(subcommand)]
    pub action: DepAction,
}

/// Dependency subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum DepAction {
    /// Make TASK depend on DEPENDS_ON
    ///
    /// Rejected if it would create a cycle.
    Add {
        /// The dependent task
        #[arg(value_parser = validate_task_id)]
        task: TaskId,

        /// The task it depends on
        #[arg(value_parser = validate_task_id)]
        depends_on: TaskId,
    },

    /// Remove the dependency TASK -> DEPENDS_ON
    Remove {
        /// The dependent task
        #[arg(value_parser = validate_task_id)]
        task: TaskId,

        /// The task it depends on
        #[arg(value_parser = validate_task_id)]
        depends_on: TaskId,
    },

    /// List the dependencies of a task
    List {
        /// Task ID
        #[arg(value_parser = validate_task_id)]
        task: TaskId,

        /// List dependents (tasks that depend on this one) instead
        #[arg(short, long)]
        reverse: bool,
    },
}

/// Arguments for the `check` command
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// The would-be dependent task
    #[arg(value_parser = validate_task_id)]
    pub task: TaskId,

    /// The task it would depend on
    #[arg(value_parser = validate_task_id)]
    pub depends_on: TaskId,
}
