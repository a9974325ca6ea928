//! Domain types for task tracking.
//!
//! This module contains the core domain types for taskweave: tasks, their
//! statuses, and the dependency edges between them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a task title, in characters.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Unique identifier for a task.
///
/// IDs are assigned sequentially by the store and are never reused within
/// a store's lifetime. Serialized as a bare JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Create a new task ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The numeric value of this ID
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for TaskId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.parse::<u64>() {
            Ok(0) => Err("Task ID must be a positive integer".to_string()),
            Ok(id) => Ok(Self(id)),
            Err(_) => Err(format!("Invalid task ID '{s}': expected a positive integer")),
        }
    }
}

/// Status of a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Waiting on dependencies or not yet started
    #[default]
    Pending,

    /// Ready to work on, or being worked on
    InProgress,

    /// Done. Never changed by automatic status derivation.
    Completed,

    /// Cannot proceed because a dependency is blocked
    Blocked,
}

impl TaskStatus {
    /// All statuses, in display order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Blocked,
    ];

    /// Whether this status is sticky against automatic demotion.
    pub fn is_terminal(self) -> bool {
        self == TaskStatus::Completed
    }

    /// The wire name of the status (`in_progress`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" | "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "blocked" => Ok(TaskStatus::Blocked),
            other => Err(format!(
                "Invalid status '{other}'. Valid values: pending, in_progress, completed, blocked"
            )),
        }
    }
}

/// Represents a task in the tracking system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for the task
    pub id: TaskId,

    /// Task title
    pub title: String,

    /// Task description
    #[serde(default)]
    pub description: String,

    /// Current status
    #[serde(default)]
    pub status: TaskStatus,

    /// Tasks this task depends on (outgoing edges)
    #[serde(default)]
    pub dependencies: Vec<Dependency>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Validate the stored task fields.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.get() == 0 || self.id.get() == u64::MAX {
            return Err(format!("Task ID {} is out of range", self.id.get()));
        }
        validate_title(&self.title)?;
        if self.dependencies.iter().any(|d| d.depends_on_id == self.id) {
            return Err(format!("Task {} depends on itself", self.id));
        }
        Ok(())
    }

    /// IDs of the tasks this task depends on.
    pub fn dependency_ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.dependencies.iter().map(|d| d.depends_on_id)
    }
}

/// A dependency edge, stored on the dependent task.
///
/// The owning task cannot be considered ready until `depends_on_id`
/// reaches a terminal-ready state.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Dependency {
    /// ID of the task this depends on
    pub depends_on_id: TaskId,

    /// When the edge was created
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new task
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    /// Task title
    pub title: String,

    /// Task description
    pub description: String,

    /// Initial status (defaults to pending)
    pub status: TaskStatus,
}

impl NewTask {
    /// Create a pending task with the given title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Validate the new task data.
    pub fn validate(&self) -> Result<(), String> {
        validate_title(&self.title)
    }
}

/// Data for updating the plain fields of an existing task.
///
/// Status changes go through [`crate::engine::update_status`] so they
/// propagate to dependents.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    /// New title (if updating)
    pub title: Option<String>,

    /// New description (if updating)
    pub description: Option<String>,
}

impl TaskUpdate {
    /// Whether the update touches no field.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Filter for listing tasks
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Only tasks with this status
    pub status: Option<TaskStatus>,

    /// Limit number of results
    pub limit: Option<usize>,
}

impl TaskFilter {
    /// Whether a task passes this filter (ignoring `limit`).
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|status| task.status == status)
    }
}

/// Validate a task title.
///
/// Titles must be non-empty after trimming, single-line, and at most
/// [`MAX_TITLE_LENGTH`] characters.
pub fn validate_title(title: &str) -> Result<(), String> {
    let trimmed = title.trim();

    if trimmed.is_empty() {
        return Err("Title cannot be empty".to_string());
    }

    let len = trimmed.chars().count();
    if len > MAX_TITLE_LENGTH {
        return Err(format!(
            "Title cannot exceed {MAX_TITLE_LENGTH} characters, got {len} characters"
        ));
    }

    if trimmed.contains('\n') || trimmed.contains('\r') {
        return Err("Title cannot contain newline characters".to_string());
    }

    Ok(())
}
