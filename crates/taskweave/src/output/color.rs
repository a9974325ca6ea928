//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success/Done:  green   (completed status)
//!   - Warning/Active: yellow (in_progress status, status changes)
//!   - Error/Blocked: red     (blocked status, cycle paths)
//!   - Info/Reference: cyan   (task IDs)
//!   - Muted:         dimmed  (field labels, pending status)

use crate::domain::{TaskId, TaskStatus};
use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply color to status text based on task status.
pub(crate) fn colorize_status(status: TaskStatus, config: &OutputConfig) -> String {
    let text = status.to_string();
    if !config.use_colors {
        return text;
    }
    match status {
        TaskStatus::Pending => text.dimmed().to_string(),
        TaskStatus::InProgress => text.yellow().to_string(),
        TaskStatus::Blocked => text.red().to_string(),
        TaskStatus::Completed => text.green().to_string(),
    }
}

/// Status icon, colored to match [`colorize_status`].
pub(crate) fn colored_status_icon(status: TaskStatus, config: &OutputConfig) -> String {
    let icon = match (status, config.use_ascii) {
        (TaskStatus::Pending, false) => "○",
        (TaskStatus::InProgress, false) => "◐",
        (TaskStatus::Completed, false) => "●",
        (TaskStatus::Blocked, false) => "⊘",
        (TaskStatus::Pending, true) => "[ ]",
        (TaskStatus::InProgress, true) => "[~]",
        (TaskStatus::Completed, true) => "[x]",
        (TaskStatus::Blocked, true) => "[!]",
    };
    if !config.use_colors {
        return icon.to_string();
    }
    match status {
        TaskStatus::Pending => icon.dimmed().to_string(),
        TaskStatus::InProgress => icon.yellow().to_string(),
        TaskStatus::Blocked => icon.red().to_string(),
        TaskStatus::Completed => icon.green().to_string(),
    }
}

/// Colorize a task ID (cyan).
pub(crate) fn colorize_id(id: TaskId, config: &OutputConfig) -> String {
    let text = format!("#{id}");
    if !config.use_colors {
        return text;
    }
    text.cyan().to_string()
}

/// Render a cycle path as `#3 -> #1 -> #2 -> #3`.
pub(crate) fn cycle_path(path: &[TaskId], config: &OutputConfig) -> String {
    let joined = path
        .iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(" -> ");
    error(&joined, config)
}

pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}
