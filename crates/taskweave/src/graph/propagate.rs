//! Cascading status propagation to dependents.
//!
//! Propagation runs as an explicit worklist rather than recursion, so deep
//! chains cannot exhaust the call stack and every task is processed at most
//! once per pass.

use super::status::{StatusChange, reevaluate};
use crate::domain::TaskId;
use crate::error::Result;
use crate::storage::GraphStore;
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

/// What a propagation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropagationReport {
    /// Status changes, in the order they were applied
    pub changes: Vec<StatusChange>,

    /// Number of dependents whose status was re-derived
    pub evaluated: usize,

    /// Dependents never processed because they sit on a cycle.
    ///
    /// Always empty while the graph is a DAG.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stalled: Vec<TaskId>,
}

impl PropagationReport {
    /// Whether any status changed.
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Re-derive the status of every transitive dependent of `origin` whose
/// inputs changed, persisting each change.
///
/// # Algorithm
///
/// 1. Collect the affected set: every transitive dependent of `origin`
///    (breadth-first over incoming edges, vanished tasks skipped).
/// 2. Process the affected set in dependency order with a Kahn-style
///    worklist: a task becomes ready once every affected task it depends on
///    has been processed, so it is evaluated against final inputs.
/// 3. A ready task is re-derived only if it depends directly on `origin` or
///    on a task that changed earlier in this pass. If it changes, its own
///    dependents are marked for re-derivation.
///
/// Each task enters the worklist once, so a pass costs O(V + E) over the
/// affected subgraph. On a graph corrupted with a cycle, the tasks on the
/// cycle never become ready; they are reported in
/// [`PropagationReport::stalled`] instead of looping.
///
/// # Errors
///
/// Store failures abort the pass; changes already written stay written.
pub async fn propagate<S>(store: &mut S, origin: &TaskId) -> Result<PropagationReport>
where
    S: GraphStore + ?Sized,
{
    // Phase 1: affected set and the dependents of each visited task
    let mut affected: Vec<TaskId> = Vec::new();
    let mut seen: HashSet<TaskId> = HashSet::from([*origin]);
    let mut dependents: HashMap<TaskId, Vec<TaskId>> = HashMap::new();
    let mut queue: VecDeque<TaskId> = VecDeque::from([*origin]);

    while let Some(current) = queue.pop_front() {
        let mut live = Vec::new();
        for dependent in store.dependents_of(&current).await? {
            if store.get_task(&dependent).await?.is_none() {
                continue;
            }
            if seen.insert(dependent) {
                affected.push(dependent);
                queue.push_back(dependent);
            }
            live.push(dependent);
        }
        dependents.insert(current, live);
    }

    // Phase 2: number of unprocessed affected dependencies per task
    let affected_set: HashSet<TaskId> = affected.iter().copied().collect();
    let mut waiting_on: HashMap<TaskId, usize> = affected.iter().map(|id| (*id, 0)).collect();
    for id in &affected {
        for dependent in dependents.get(id).into_iter().flatten() {
            if let Some(count) = waiting_on.get_mut(dependent) {
                *count += 1;
            }
        }
    }

    let mut dirty: HashSet<TaskId> = dependents
        .get(origin)
        .into_iter()
        .flatten()
        .copied()
        .collect();
    let mut ready: VecDeque<TaskId> = affected
        .iter()
        .copied()
        .filter(|id| waiting_on.get(id) == Some(&0))
        .collect();
    let mut processed: HashSet<TaskId> = HashSet::new();
    let mut report = PropagationReport::default();

    // Phase 3: worklist
    while let Some(current) = ready.pop_front() {
        if !processed.insert(current) {
            continue;
        }

        if dirty.contains(&current) {
            report.evaluated += 1;
            if let Some(change) = reevaluate(store, &current).await? {
                report.changes.push(change);
                dirty.extend(dependents.get(&current).into_iter().flatten().copied());
            }
        }

        for dependent in dependents.get(&current).into_iter().flatten() {
            if !affected_set.contains(dependent) {
                continue;
            }
            if let Some(count) = waiting_on.get_mut(dependent) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    ready.push_back(*dependent);
                }
            }
        }
    }

    report.stalled = affected
        .into_iter()
        .filter(|id| !processed.contains(id))
        .collect();

    if !report.stalled.is_empty() {
        tracing::warn!(
            origin = %origin,
            stalled = ?report.stalled,
            "Dependency cycle among dependents; propagation stopped early"
        );
    }

    if report.changed() {
        tracing::info!(
            origin = %origin,
            changed = report.changes.len(),
            evaluated = report.evaluated,
            "Propagated status change"
        );
    } else {
        tracing::debug!(
            origin = %origin,
            evaluated = report.evaluated,
            "Propagation made no changes"
        );
    }

    Ok(report)
}
