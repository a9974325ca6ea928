//! Error types for taskweave operations.

use crate::domain::TaskId;
use std::io;
use thiserror::Error;

/// The error type for taskweave operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Storage backend error.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Task not found.
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    /// A task was asked to depend on itself.
    #[error("Task {0} cannot depend on itself")]
    SelfDependency(TaskId),

    /// Adding the dependency would close a cycle.
    ///
    /// `path` starts and ends at the task that would own the new edge.
    #[error("Circular dependency detected: {}", format_path(path))]
    CyclicDependency {
        /// The full cycle, including the proposed closing edge.
        path: Vec<TaskId>,
    },

    /// The dependency edge already exists.
    #[error("Dependency already exists: {task} -> {depends_on}")]
    DuplicateDependency {
        /// The dependent task.
        task: TaskId,
        /// The task it depends on.
        depends_on: TaskId,
    },

    /// The dependency edge does not exist.
    #[error("Dependency not found: {task} -> {depends_on}")]
    DependencyNotFound {
        /// The dependent task.
        task: TaskId,
        /// The task it was expected to depend on.
        depends_on: TaskId,
    },

    /// Task data failed validation.
    #[error("Invalid task: {0}")]
    InvalidTask(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `.taskweave/` directory was found in the directory tree.
    #[error("Not a taskweave repository (or any parent up to the filesystem root). Run 'taskweave init' first.")]
    NotInitialized,

    /// The repository is already initialized.
    #[error("Taskweave is already initialized in this directory. Found existing '{0}'")]
    AlreadyInitialized(String),

    /// The configuration file could not be parsed or written.
    #[error("Configuration error: {0}")]
    Invalid(String),

    /// The configured storage backend is not recognised.
    #[error("Unknown storage backend '{0}'. Valid backends: memory, jsonl")]
    UnknownBackend(String),
}

/// Storage backend errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A task record could not be serialized.
    #[error("Serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Every task ID has been handed out.
    #[error("Task ID space exhausted")]
    IdsExhausted,

    /// The in-memory graph and task index disagree.
    #[error("Graph index out of sync for task {0}")]
    Inconsistent(TaskId),
}

fn format_path(path: &[TaskId]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// A specialized Result type for taskweave operations.
pub type Result<T> = std::result::Result<T, Error>;
