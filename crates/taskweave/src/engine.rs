//! Collaborator-facing operations.
//!
//! These functions are what a front end (the CLI, or any other caller)
//! invokes. Each one resolves its inputs, calls into the graph engine, and
//! persists through the store. They take `&mut` access to the store for the
//! whole operation, so within a process one operation runs to completion
//! before the next can touch the same store.
//!
//! Every function returns the status changes it applied, in order. Nothing
//! is saved to disk here; callers decide when to call `save()`.

use crate::domain::{TaskId, TaskStatus};
use crate::error::{Error, Result};
use crate::graph::{self, CycleCheck, StatusChange};
use crate::storage::{GraphStore, TaskStorage};

async fn require_task<S>(store: &S, id: &TaskId) -> Result<TaskStatus>
where
    S: GraphStore + ?Sized,
{
    store
        .get_task(id)
        .await?
        .map(|task| task.status)
        .ok_or(Error::TaskNotFound(*id))
}

/// Re-derive `id` once and, if it changed, cascade from it.
async fn settle<S>(store: &mut S, id: &TaskId, changes: &mut Vec<StatusChange>) -> Result<()>
where
    S: GraphStore + ?Sized,
{
    if let Some(change) = graph::reevaluate(store, id).await? {
        changes.push(change);
        let report = graph::propagate(store, id).await?;
        changes.extend(report.changes);
    }
    Ok(())
}

/// Check a proposed edge without adding it.
///
/// # Errors
///
/// Returns `Error::TaskNotFound` if either task doesn't exist.
pub async fn check_dependency<S>(
    store: &S,
    task: &TaskId,
    depends_on: &TaskId,
) -> Result<CycleCheck>
where
    S: GraphStore + ?Sized,
{
    require_task(store, task).await?;
    require_task(store, depends_on).await?;
    graph::detect_cycle(store, task, depends_on).await
}

/// Add the dependency `task -> depends_on`.
///
/// Runs the cycle detector before the edge is written. Once written, `task`
/// is re-derived (the new dependency may block it or send it back to
/// pending) and any change is propagated to its dependents.
///
/// # Errors
///
/// - `Error::TaskNotFound` if either task doesn't exist
/// - `Error::SelfDependency` if `task == depends_on`
/// - `Error::CyclicDependency` with the cycle path if the edge closes a cycle
/// - `Error::DuplicateDependency` if the edge already exists
pub async fn add_dependency<S>(
    store: &mut S,
    task: &TaskId,
    depends_on: &TaskId,
) -> Result<Vec<StatusChange>>
where
    S: GraphStore + ?Sized,
{
    if let CycleCheck::Cycle(path) = check_dependency(&*store, task, depends_on).await? {
        tracing::debug!(task = %task, depends_on = %depends_on, "Rejected cyclic dependency");
        return Err(if task == depends_on {
            Error::SelfDependency(*task)
        } else {
            Error::CyclicDependency { path }
        });
    }

    store.insert_edge(task, depends_on).await?;
    tracing::info!(task = %task, depends_on = %depends_on, "Dependency added");

    let mut changes = Vec::new();
    settle(store, task, &mut changes).await?;
    Ok(changes)
}

/// Remove the dependency `task -> depends_on`.
///
/// `task` is re-derived from its remaining dependencies and any change is
/// propagated. Removing the last dependency leaves the status as it is.
///
/// # Errors
///
/// Returns `Error::DependencyNotFound` if the edge doesn't exist.
pub async fn remove_dependency<S>(
    store: &mut S,
    task: &TaskId,
    depends_on: &TaskId,
) -> Result<Vec<StatusChange>>
where
    S: TaskStorage + ?Sized,
{
    store.remove_edge(task, depends_on).await?;
    tracing::info!(task = %task, depends_on = %depends_on, "Dependency removed");

    let mut changes = Vec::new();
    settle(store, task, &mut changes).await?;
    Ok(changes)
}

/// Set a task's status and propagate to every transitive dependent.
///
/// The status is written as given, including `completed`; propagation runs
/// even if the value didn't change.
///
/// # Errors
///
/// Returns `Error::TaskNotFound` if the task doesn't exist.
pub async fn update_status<S>(
    store: &mut S,
    id: &TaskId,
    status: TaskStatus,
) -> Result<Vec<StatusChange>>
where
    S: GraphStore + ?Sized,
{
    let previous = require_task(&*store, id).await?;
    store.set_status(id, status).await?;

    let mut changes = Vec::new();
    if previous != status {
        tracing::info!(task = %id, from = %previous, to = %status, "Status updated");
        changes.push(StatusChange {
            task_id: *id,
            from: previous,
            to: status,
        });
    }

    let report = graph::propagate(store, id).await?;
    changes.extend(report.changes);
    Ok(changes)
}

/// Delete a task and every edge touching it.
///
/// Each former dependent is re-derived from its remaining dependencies and
/// any change is propagated.
///
/// # Errors
///
/// Returns `Error::TaskNotFound` if the task doesn't exist.
pub async fn delete_task<S>(store: &mut S, id: &TaskId) -> Result<Vec<StatusChange>>
where
    S: TaskStorage + ?Sized,
{
    let former_dependents = store.delete(id).await?;
    tracing::info!(task = %id, dependents = former_dependents.len(), "Task deleted");

    let mut changes = Vec::new();
    for dependent in &former_dependents {
        settle(store, dependent, &mut changes).await?;
    }
    Ok(changes)
}
