//! Status derivation from a task's dependencies.
//!
//! The rule is a decision table evaluated top to bottom; the first matching
//! row wins:
//!
//! | # | guard                               | result        |
//! |---|-------------------------------------|---------------|
//! | 1 | no existing dependencies            | no change     |
//! | 2 | current status is `completed`       | no change     |
//! | 3 | any dependency is `blocked`         | `blocked`     |
//! | 4 | every dependency is `completed`     | `in_progress` |
//! | 5 | otherwise                           | `pending`     |
//!
//! The rule never assigns `completed`; only callers do.

use crate::domain::{TaskId, TaskStatus};
use crate::error::Result;
use crate::storage::GraphStore;
use serde::Serialize;

/// A status change applied by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    /// The task whose status changed
    pub task_id: TaskId,
    /// Status before the change
    pub from: TaskStatus,
    /// Status after the change
    pub to: TaskStatus,
}

/// Counts of dependency statuses relevant to the rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DependencySummary {
    /// Number of dependencies considered
    pub total: usize,
    /// How many are blocked
    pub blocked: usize,
    /// How many are completed
    pub completed: usize,
}

impl DependencySummary {
    /// Tally a set of dependency statuses.
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = TaskStatus>,
    {
        statuses
            .into_iter()
            .fold(Self::default(), |mut summary, status| {
                summary.total += 1;
                match status {
                    TaskStatus::Blocked => summary.blocked += 1,
                    TaskStatus::Completed => summary.completed += 1,
                    TaskStatus::Pending | TaskStatus::InProgress => {}
                }
                summary
            })
    }
}

/// Derive the status a task should have.
///
/// Returns `None` when the status is left alone (no dependencies, or the
/// task is completed), otherwise the derived status, which may equal
/// `current`.
pub fn derive_status(current: TaskStatus, deps: DependencySummary) -> Option<TaskStatus> {
    if deps.total == 0 {
        return None;
    }
    if current.is_terminal() {
        return None;
    }
    if deps.blocked > 0 {
        return Some(TaskStatus::Blocked);
    }
    if deps.completed == deps.total {
        return Some(TaskStatus::InProgress);
    }
    Some(TaskStatus::Pending)
}

/// Re-derive a task's status and persist it if it changed.
///
/// Returns the applied change, or `None` if the task is missing or already
/// has the derived status. Dependencies whose task has vanished are
/// ignored.
pub(crate) async fn reevaluate<S>(store: &mut S, id: &TaskId) -> Result<Option<StatusChange>>
where
    S: GraphStore + ?Sized,
{
    let Some(task) = store.get_task(id).await? else {
        return Ok(None);
    };

    let mut statuses = Vec::new();
    for dep_id in store.dependencies_of(id).await? {
        if let Some(dep) = store.get_task(&dep_id).await? {
            statuses.push(dep.status);
        }
    }

    let summary = DependencySummary::from_statuses(statuses);
    let Some(derived) = derive_status(task.status, summary) else {
        return Ok(None);
    };

    if derived == task.status {
        return Ok(None);
    }

    store.set_status(id, derived).await?;
    tracing::debug!(task = %id, from = %task.status, to = %derived, "Status recomputed");

    Ok(Some(StatusChange {
        task_id: *id,
        from: task.status,
        to: derived,
    }))
}

/// Recompute a task's status from its direct dependencies.
///
/// Returns `true` if the status changed (and was persisted). Does not
/// cascade; see [`super::propagate`] for that.
///
/// # Errors
///
/// Store read and write failures are propagated unchanged.
pub async fn recompute_status<S>(store: &mut S, id: &TaskId) -> Result<bool>
where
    S: GraphStore + ?Sized,
{
    Ok(reevaluate(store, id).await?.is_some())
}
