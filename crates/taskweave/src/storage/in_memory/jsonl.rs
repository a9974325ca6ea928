//! JSONL persistence for in-memory storage.
//!
//! Each line of the data file is one serialized [`Task`], including its
//! outgoing dependencies. Loading is resilient: bad lines and bad edges are
//! skipped and reported as [`LoadWarning`]s instead of failing the load.

use super::graph::closes_cycle;
use super::inner::InMemoryStorageInner;
use crate::domain::{Task, TaskId};
use crate::error::{Error, Result, StorageError};
use crate::storage::TaskStorage;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::Mutex;

/// Non-fatal problems found while loading a JSONL file.
///
/// **Example:**
/// ```no_run
/// # use taskweave::storage::in_memory::{load_from_jsonl, LoadWarning};
/// # use std::path::Path;
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> anyhow::Result<()> {
/// let (storage, warnings) = load_from_jsonl(Path::new(".taskweave/tasks.jsonl")).await?;
///
/// for warning in warnings {
///     match warning {
///         LoadWarning::MalformedJson { line_number, error } => {
///             eprintln!("Skipped malformed JSON at line {}: {}", line_number, error);
///         }
///         LoadWarning::CircularDependency { task, depends_on } => {
///             eprintln!("Broke circular dependency: {} -> {}", task, depends_on);
///         }
///         other => eprintln!("{other:?}"),
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// A line that couldn't be parsed as a task. The line is skipped.
    MalformedJson {
        /// 1-based line number in the file
        line_number: usize,
        /// Parser message
        error: String,
    },

    /// A task that failed validation. The task is skipped.
    InvalidTaskData {
        /// ID of the rejected task
        task_id: TaskId,
        /// 1-based line number in the file
        line_number: usize,
        /// Validation message
        error: String,
    },

    /// A second record with an ID already seen. The later record is skipped.
    DuplicateTask {
        /// The repeated ID
        task_id: TaskId,
        /// 1-based line number of the skipped record
        line_number: usize,
    },

    /// An edge to a task that isn't in the file. The edge is dropped.
    OrphanedDependency {
        /// The dependent task
        task: TaskId,
        /// The missing dependency
        depends_on: TaskId,
    },

    /// An edge that would close a cycle. The edge is dropped to break it.
    CircularDependency {
        /// The dependent task
        task: TaskId,
        /// The dependency that closed the cycle
        depends_on: TaskId,
    },
}

/// Load storage from a JSONL file.
///
/// Loading runs in passes:
/// 1. Parse and validate every line, skipping bad or duplicate records.
/// 2. Insert all tasks and graph nodes.
/// 3. Rebuild edges in file order, dropping orphaned, repeated, and
///    cycle-closing edges. Each task's `dependencies` is rewritten to the
///    edges that were kept, so the next save persists the repaired graph.
///
/// `next_id` resumes after the highest loaded ID.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be opened or read.
pub async fn load_from_jsonl(path: &Path) -> Result<(Box<dyn TaskStorage>, Vec<LoadWarning>)> {
    let file = File::open(path).await?;
    let mut lines = BufReader::new(file).lines();

    let mut warnings = Vec::new();
    let mut tasks: Vec<Task> = Vec::new();
    let mut seen = HashSet::new();
    let mut line_number = 0;

    // First pass: parse and validate
    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }

        let task: Task = match serde_json::from_str(&line) {
            Ok(task) => task,
            Err(e) => {
                warnings.push(LoadWarning::MalformedJson {
                    line_number,
                    error: e.to_string(),
                });
                continue;
            }
        };

        if let Err(error) = task.validate() {
            warnings.push(LoadWarning::InvalidTaskData {
                task_id: task.id,
                line_number,
                error,
            });
            continue;
        }

        if !seen.insert(task.id) {
            warnings.push(LoadWarning::DuplicateTask {
                task_id: task.id,
                line_number,
            });
            continue;
        }

        tasks.push(task);
    }

    let mut inner = InMemoryStorageInner::new();

    // Second pass: tasks and nodes, with edges detached
    let mut pending_edges = Vec::new();
    for mut task in tasks {
        for dep in task.dependencies.drain(..) {
            pending_edges.push((task.id, dep));
        }
        inner.insert_task(task)?;
    }

    // Third pass: edges
    for (task_id, dep) in pending_edges {
        let depends_on = dep.depends_on_id;

        let (Some(&from), Some(&to)) = (inner.node_map.get(&task_id), inner.node_map.get(&depends_on))
        else {
            warnings.push(LoadWarning::OrphanedDependency {
                task: task_id,
                depends_on,
            });
            continue;
        };

        if inner.graph.find_edge(from, to).is_some() {
            continue;
        }

        if closes_cycle(&inner.graph, &inner.node_map, &task_id, &depends_on) {
            warnings.push(LoadWarning::CircularDependency {
                task: task_id,
                depends_on,
            });
            continue;
        }

        inner.graph.add_edge(from, to, ());
        inner
            .tasks
            .get_mut(&task_id)
            .ok_or(StorageError::Inconsistent(task_id))?
            .dependencies
            .push(dep);
    }

    if !warnings.is_empty() {
        tracing::debug!(count = warnings.len(), path = %path.display(), "Loaded with warnings");
    }

    Ok((Box::new(Arc::new(Mutex::new(inner))), warnings))
}

/// Save storage to a JSONL file with atomic writes.
///
/// Tasks are written in ID order with dependencies sorted, so repeated saves
/// of the same graph produce identical files. The data is written to a
/// temporary sibling file and renamed over `path`.
///
/// # Errors
///
/// Returns `Error::Io` if writing or renaming fails.
pub async fn save_to_jsonl(storage: &dyn TaskStorage, path: &Path) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    let mut tasks = storage.export_all().await?;

    let written = async {
        write_tasks(&temp_path, &mut tasks).await?;
        tokio::fs::rename(&temp_path, path).await?;
        Ok::<(), Error>(())
    }
    .await;

    if let Err(e) = written {
        if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await
            && cleanup.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %temp_path.display(), error = %cleanup, "Failed to remove temp file");
        }
        return Err(e);
    }

    tracing::debug!(count = tasks.len(), path = %path.display(), "Saved tasks");

    Ok(())
}

async fn write_tasks(temp_path: &Path, tasks: &mut [Task]) -> Result<()> {
    let file = File::create(temp_path).await.map_err(Error::Io)?;
    let mut writer = BufWriter::new(file);

    for task in tasks {
        task.dependencies.sort();

        let json = serde_json::to_string(&task).map_err(StorageError::Serialization)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }

    writer.flush().await.map_err(Error::Io)
}
