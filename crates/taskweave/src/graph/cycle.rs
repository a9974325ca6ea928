//! Cycle detection for proposed dependency edges.

use crate::domain::TaskId;
use crate::error::Result;
use crate::storage::GraphStore;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Outcome of checking a proposed edge for cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleCheck {
    /// The edge is safe to add.
    Acyclic,

    /// The edge would close a cycle.
    ///
    /// The path starts and ends at the proposed edge's source, and its second
    /// element is the proposed target.
    Cycle(Vec<TaskId>),
}

impl CycleCheck {
    /// Whether the proposed edge would close a cycle.
    pub fn is_cycle(&self) -> bool {
        matches!(self, CycleCheck::Cycle(_))
    }

    /// The cycle path, or an empty slice if there is none.
    pub fn path(&self) -> &[TaskId] {
        match self {
            CycleCheck::Acyclic => &[],
            CycleCheck::Cycle(path) => path,
        }
    }
}

/// Client-facing rendering of a rejected edge.
///
/// Serializes as `{"error": "Circular dependency detected", "path": [3, 1, 2, 3]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleRejection {
    /// Fixed error message
    pub error: &'static str,
    /// The cycle, starting and ending at the rejected edge's source
    pub path: Vec<TaskId>,
}

impl CycleRejection {
    /// Message used for every cycle rejection.
    pub const MESSAGE: &'static str = "Circular dependency detected";

    /// Wrap a cycle path.
    pub fn new(path: Vec<TaskId>) -> Self {
        Self {
            error: Self::MESSAGE,
            path,
        }
    }
}

/// Check whether adding the edge `source -> target` would close a cycle.
///
/// The edge is unsafe iff `target` can already reach `source` by following
/// existing dependency edges. A self-edge is always a cycle and reports
/// `[source, target]`.
///
/// # Algorithm
///
/// Depth-first search from `target` with an explicit stack. Each node
/// records the node it was first reached from, and the cycle path is
/// rebuilt from those links once `source` is reached. Nodes are expanded at
/// most once (global visited set), so the search costs O(V + E) and
/// terminates on any finite graph, including graphs that already contain
/// unrelated cycles. The returned path is a real path but not necessarily
/// the shortest one.
///
/// Tasks that no longer exist are skipped, ending that branch. The
/// traversal is read-only.
///
/// # Errors
///
/// Only store read failures are propagated.
pub async fn detect_cycle<S>(store: &S, source: &TaskId, target: &TaskId) -> Result<CycleCheck>
where
    S: GraphStore + ?Sized,
{
    if source == target {
        return Ok(CycleCheck::Cycle(vec![*source, *target]));
    }

    let mut visited: HashSet<TaskId> = HashSet::new();
    let mut reached_from: HashMap<TaskId, TaskId> = HashMap::new();
    let mut stack: Vec<TaskId> = vec![*target];

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }

        // Vanished task: dead branch.
        if store.get_task(&current).await?.is_none() {
            continue;
        }

        for next in store.dependencies_of(&current).await? {
            if visited.contains(&next) {
                continue;
            }
            reached_from.entry(next).or_insert(current);
            if next == *source {
                let cycle = cycle_path(&reached_from, source, target);
                tracing::debug!(source = %source, target = %target, len = cycle.len(), "Cycle found");
                return Ok(CycleCheck::Cycle(cycle));
            }
            stack.push(next);
        }
    }

    Ok(CycleCheck::Acyclic)
}

/// `[source, target, ..., source]`, following `reached_from` back from
/// `source` to `target`.
fn cycle_path(
    reached_from: &HashMap<TaskId, TaskId>,
    source: &TaskId,
    target: &TaskId,
) -> Vec<TaskId> {
    let mut path = vec![*source];
    let mut current = *source;
    while current != *target {
        match reached_from.get(&current) {
            Some(previous) => {
                current = *previous;
                path.push(current);
            }
            None => break,
        }
    }
    path.push(*source);
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskStatus::Pending;
    use crate::storage::MapGraphStore;

    fn ids(raw: &[u64]) -> Vec<TaskId> {
        raw.iter().copied().map(TaskId).collect()
    }

    fn chain() -> MapGraphStore {
        // 1 -> 2 -> 3
        MapGraphStore::new()
            .with_task(1, Pending)
            .with_task(2, Pending)
            .with_task(3, Pending)
            .with_edge(1, 2)
            .with_edge(2, 3)
    }

    #[tokio::test]
    async fn test_closing_edge_reports_full_path() {
        let store = chain();
        let check = detect_cycle(&store, &TaskId(3), &TaskId(1)).await.unwrap();
        assert_eq!(check, CycleCheck::Cycle(ids(&[3, 1, 2, 3])));
    }

    #[tokio::test]
    async fn test_forward_edge_is_acyclic() {
        let store = chain();
        let check = detect_cycle(&store, &TaskId(1), &TaskId(3)).await.unwrap();
        assert_eq!(check, CycleCheck::Acyclic);
        assert!(check.path().is_empty());
    }

    #[tokio::test]
    async fn test_self_edge_reports_pair() {
        let store = MapGraphStore::new().with_task(5, Pending);
        let check = detect_cycle(&store, &TaskId(5), &TaskId(5)).await.unwrap();
        assert!(check.is_cycle());
        assert_eq!(check.path(), ids(&[5, 5]).as_slice());
    }

    #[tokio::test]
    async fn test_target_without_dependencies_is_acyclic() {
        let store = chain();
        let check = detect_cycle(&store, &TaskId(2), &TaskId(3)).await.unwrap();
        assert_eq!(check, CycleCheck::Acyclic);
    }

    #[tokio::test]
    async fn test_two_node_cycle() {
        let store = MapGraphStore::new()
            .with_task(1, Pending)
            .with_task(2, Pending)
            .with_edge(1, 2);
        let check = detect_cycle(&store, &TaskId(2), &TaskId(1)).await.unwrap();
        assert_eq!(check.path(), ids(&[2, 1, 2]).as_slice());
    }

    #[tokio::test]
    async fn test_diamond_visits_shared_node_once() {
        // 1 -> {2, 3} -> 4 -> 5
        let store = MapGraphStore::new()
            .with_task(1, Pending)
            .with_task(2, Pending)
            .with_task(3, Pending)
            .with_task(4, Pending)
            .with_task(5, Pending)
            .with_edge(1, 2)
            .with_edge(1, 3)
            .with_edge(2, 4)
            .with_edge(3, 4)
            .with_edge(4, 5);

        let check = detect_cycle(&store, &TaskId(5), &TaskId(1)).await.unwrap();
        let path = check.path();
        assert_eq!(path.first(), Some(&TaskId(5)));
        assert_eq!(path.get(1), Some(&TaskId(1)));
        assert_eq!(path.last(), Some(&TaskId(5)));
        assert_eq!(path.len(), 5);
    }

    #[tokio::test]
    async fn test_unrelated_cycle_does_not_hang_or_leak() {
        // 1 -> 2, plus a pre-existing 3 <-> 4 loop reachable from 2.
        let store = MapGraphStore::new()
            .with_task(1, Pending)
            .with_task(2, Pending)
            .with_task(3, Pending)
            .with_task(4, Pending)
            .with_task(9, Pending)
            .with_edge(1, 2)
            .with_edge(2, 3)
            .with_edge(3, 4)
            .with_edge(4, 3);

        let check = detect_cycle(&store, &TaskId(9), &TaskId(1)).await.unwrap();
        assert_eq!(check, CycleCheck::Acyclic);
    }

    #[tokio::test]
    async fn test_vanished_task_is_dead_branch() {
        let mut store = chain();
        store.vanish(2);
        let check = detect_cycle(&store, &TaskId(3), &TaskId(1)).await.unwrap();
        assert_eq!(check, CycleCheck::Acyclic);
    }

    #[test]
    fn test_rejection_json_shape() {
        let rejection = CycleRejection::new(ids(&[3, 1, 2, 3]));
        let json = serde_json::to_value(&rejection).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": "Circular dependency detected", "path": [3, 1, 2, 3]})
        );
    }
}
