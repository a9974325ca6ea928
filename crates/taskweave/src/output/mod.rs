//! Output formatting for CLI commands.
//!
//! Every command prints either human-readable text or JSON for programmatic
//! use. Text output goes through [`color`] for semantic coloring.

pub mod color;

use crate::domain::{Task, TaskId};
use crate::graph::{CycleRejection, StatusChange};
use serde::Serialize;
use std::env;
use std::io::{self, Write};

use color::{
    bold, colored_status_icon, colorize_id, colorize_status, cycle_path, dimmed, warning,
};

/// Configuration for output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new OutputConfig with explicit values.
    pub fn new(use_ascii: bool, use_colors: bool) -> Self {
        Self {
            use_ascii,
            use_colors,
        }
    }

    /// Create an OutputConfig by reading from environment variables.
    ///
    /// Reads:
    /// - `TASKWEAVE_ASCII`: Set to "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `TASKWEAVE_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        let use_ascii = match env::var("TASKWEAVE_ASCII") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Ok(v) => {
                tracing::warn!(
                    env_var = "TASKWEAVE_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            Err(_) => false,
        };

        // https://no-color.org/
        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("TASKWEAVE_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(false, true)
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Print a single task in the specified format
pub fn print_task(task: &Task, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let mut handle = io::stdout().lock();
            write_task_line(&mut handle, task, &OutputConfig::from_env())
        }
        OutputMode::Json => print_json(task),
    }
}

/// Print a list of tasks in the specified format
pub fn print_tasks(tasks: &[Task], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let mut handle = io::stdout().lock();
            write_task_list(&mut handle, tasks, &OutputConfig::from_env())
        }
        OutputMode::Json => print_json(&tasks),
    }
}

/// Print a task with its dependencies and dependents (text mode).
pub fn print_task_details(task: &Task, dependents: &[TaskId]) -> io::Result<()> {
    let mut handle = io::stdout().lock();
    write_task_details(&mut handle, task, dependents, &OutputConfig::from_env())
}

/// Print the status changes applied by an operation (text mode).
pub fn print_changes(changes: &[StatusChange]) -> io::Result<()> {
    let mut handle = io::stdout().lock();
    write_changes(&mut handle, changes, &OutputConfig::from_env())
}

/// Print a confirmation line for a completed mutation (text mode).
pub fn print_success(message: &str) -> io::Result<()> {
    let mut handle = io::stdout().lock();
    write_success(&mut handle, message, &OutputConfig::from_env())
}

/// Print a rejected dependency in the specified format.
///
/// JSON mode prints the `{"error": ..., "path": [...]}` object.
pub fn print_cycle_rejection(path: &[TaskId], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(&CycleRejection::new(path.to_vec())),
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            let mut handle = io::stdout().lock();
            writeln!(
                handle,
                "{}: {}",
                color::error(CycleRejection::MESSAGE, &config),
                cycle_path(path, &config)
            )
        }
    }
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let mut handle = io::stdout().lock();
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{json}")
}

fn write_success<W: Write>(w: &mut W, message: &str, config: &OutputConfig) -> io::Result<()> {
    let mark = if config.use_ascii { "ok" } else { "✓" };
    writeln!(w, "{} {message}", color::success(mark, config))
}

fn write_task_line<W: Write>(w: &mut W, task: &Task, config: &OutputConfig) -> io::Result<()> {
    writeln!(
        w,
        "{} {}  {}  {}",
        colored_status_icon(task.status, config),
        colorize_id(task.id, config),
        colorize_status(task.status, config),
        task.title
    )
}

fn write_task_list<W: Write>(w: &mut W, tasks: &[Task], config: &OutputConfig) -> io::Result<()> {
    if tasks.is_empty() {
        return writeln!(w, "No tasks found.");
    }

    writeln!(w, "Found {} task(s):", tasks.len())?;
    writeln!(w)?;
    for task in tasks {
        write_task_line(w, task, config)?;
    }
    Ok(())
}

fn write_task_details<W: Write>(
    w: &mut W,
    task: &Task,
    dependents: &[TaskId],
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {}: {}",
        colored_status_icon(task.status, config),
        colorize_id(task.id, config),
        task.title
    )?;
    writeln!(
        w,
        "{} {}",
        dimmed("Status:", config),
        colorize_status(task.status, config)
    )?;
    writeln!(
        w,
        "{} {}    {} {}",
        dimmed("Created:", config),
        task.created_at.format("%Y-%m-%d %H:%M"),
        dimmed("Updated:", config),
        task.updated_at.format("%Y-%m-%d %H:%M")
    )?;

    if !task.description.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}", bold("Description", config))?;
        for line in task.description.lines() {
            writeln!(w, "  {line}")?;
        }
    }

    if !task.dependencies.is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "{} ({}):",
            bold("Depends on", config),
            task.dependencies.len()
        )?;
        for id in task.dependency_ids() {
            writeln!(w, "  → {}", colorize_id(id, config))?;
        }
    }

    if !dependents.is_empty() {
        writeln!(w)?;
        writeln!(w, "{} ({}):", bold("Dependents", config), dependents.len())?;
        for id in dependents {
            writeln!(w, "  ← {}", colorize_id(*id, config))?;
        }
    }

    Ok(())
}

fn write_changes<W: Write>(
    w: &mut W,
    changes: &[StatusChange],
    config: &OutputConfig,
) -> io::Result<()> {
    if changes.is_empty() {
        return Ok(());
    }

    writeln!(w, "{}", warning("Status changes:", config))?;
    for change in changes {
        writeln!(
            w,
            "  {} {} -> {}",
            colorize_id(change.task_id, config),
            colorize_status(change.from, config),
            colorize_status(change.to, config)
        )?;
    }
    Ok(())
}
