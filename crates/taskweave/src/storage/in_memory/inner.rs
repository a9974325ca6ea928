//! Core in-memory storage data structures.
//!
//! `InMemoryStorageInner` owns the tasks and the dependency graph and keeps
//! them in step. It is not thread-safe on its own; the trait implementation
//! wraps it in `Arc<Mutex<>>`.

use crate::domain::{Dependency, Task, TaskId};
use crate::error::{Error, Result, StorageError};
use chrono::Utc;
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use std::collections::HashMap;

/// Inner storage structure (not thread-safe).
///
/// Invariant: every key of `tasks` has an entry in `node_map`, and every
/// edge in `graph` is mirrored in the source task's `dependencies`.
pub(crate) struct InMemoryStorageInner {
    /// Tasks indexed by ID
    pub(super) tasks: HashMap<TaskId, Task>,

    /// Dependency graph. Edge direction: dependent -> dependency.
    pub(super) graph: StableDiGraph<TaskId, ()>,

    /// Mapping from TaskId to graph NodeIndex
    pub(super) node_map: HashMap<TaskId, NodeIndex>,

    /// ID handed to the next created task
    pub(super) next_id: u64,
}

impl InMemoryStorageInner {
    /// Create a new empty storage instance
    pub(crate) fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            graph: StableDiGraph::new(),
            node_map: HashMap::new(),
            next_id: 1,
        }
    }

    /// Reserve the next task ID.
    ///
    /// `u64::MAX` is never handed out, so `next_id` can always sit above
    /// the highest stored ID.
    pub(super) fn allocate_id(&mut self) -> Result<TaskId> {
        let id = TaskId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(StorageError::IdsExhausted)?;
        Ok(id)
    }

    /// Insert a task and its graph node. Edges are not touched.
    ///
    /// Keeps `next_id` ahead of every stored ID.
    pub(super) fn insert_task(&mut self, task: Task) -> Result<()> {
        let id = task.id;
        let after = id.get().checked_add(1).ok_or(StorageError::IdsExhausted)?;
        if !self.node_map.contains_key(&id) {
            let node = self.graph.add_node(id);
            self.node_map.insert(id, node);
        }
        self.next_id = self.next_id.max(after);
        self.tasks.insert(id, task);
        Ok(())
    }

    pub(super) fn node(&self, id: &TaskId) -> Result<NodeIndex> {
        if !self.tasks.contains_key(id) {
            return Err(Error::TaskNotFound(*id));
        }
        self.node_map
            .get(id)
            .copied()
            .ok_or_else(|| StorageError::Inconsistent(*id).into())
    }

    /// Neighbours of `id` in the given direction, ascending by ID.
    ///
    /// Unknown IDs have no neighbours.
    pub(super) fn neighbors(&self, id: &TaskId, direction: Direction) -> Vec<TaskId> {
        let Some(&node) = self.node_map.get(id) else {
            return Vec::new();
        };

        let mut ids: Vec<TaskId> = self
            .graph
            .neighbors_directed(node, direction)
            .map(|n| self.graph[n])
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Add the edge `task -> depends_on` and mirror it on the task record.
    pub(super) fn add_edge(&mut self, task: &TaskId, depends_on: &TaskId) -> Result<()> {
        if task == depends_on {
            return Err(Error::SelfDependency(*task));
        }

        let from = self.node(task)?;
        let to = self.node(depends_on)?;

        if self.graph.find_edge(from, to).is_some() {
            return Err(Error::DuplicateDependency {
                task: *task,
                depends_on: *depends_on,
            });
        }

        self.graph.add_edge(from, to, ());

        let now = Utc::now();
        let record = self
            .tasks
            .get_mut(task)
            .ok_or(Error::TaskNotFound(*task))?;
        record.dependencies.push(Dependency {
            depends_on_id: *depends_on,
            created_at: now,
        });
        record.updated_at = now;

        Ok(())
    }

    /// Remove the edge `task -> depends_on` and its mirror on the task record.
    pub(super) fn remove_edge(&mut self, task: &TaskId, depends_on: &TaskId) -> Result<()> {
        let not_found = || Error::DependencyNotFound {
            task: *task,
            depends_on: *depends_on,
        };

        let (Some(&from), Some(&to)) = (self.node_map.get(task), self.node_map.get(depends_on))
        else {
            return Err(not_found());
        };

        let edge = self.graph.find_edge(from, to).ok_or_else(not_found)?;
        self.graph.remove_edge(edge);

        if let Some(record) = self.tasks.get_mut(task) {
            record.dependencies.retain(|d| d.depends_on_id != *depends_on);
            record.updated_at = Utc::now();
        }

        Ok(())
    }

    /// Remove a task, its node, and every edge touching it.
    ///
    /// Returns the former dependents; their `dependencies` mirrors are
    /// updated to drop the deleted task.
    pub(super) fn remove_task(&mut self, id: &TaskId) -> Result<Vec<TaskId>> {
        let node = self.node(id)?;
        let dependents = self.neighbors(id, Direction::Incoming);

        // StableGraph drops incident edges with the node.
        self.graph.remove_node(node);
        self.node_map.remove(id);
        self.tasks.remove(id);

        let now = Utc::now();
        for dependent in &dependents {
            if let Some(record) = self.tasks.get_mut(dependent) {
                record.dependencies.retain(|d| d.depends_on_id != *id);
                record.updated_at = now;
            }
        }

        Ok(dependents)
    }

    /// All tasks, ordered by ID.
    pub(super) fn sorted_tasks(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.values().cloned().collect();
        tasks.sort_by_key(|t| t.id);
        tasks
    }
}
