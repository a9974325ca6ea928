//! Storage abstraction layer for taskweave.
//!
//! Two traits split the storage surface:
//!
//! - [`GraphStore`]: the narrow access contract the dependency graph engine
//!   needs (get a task, list outgoing and incoming edges, set a status,
//!   insert an edge). The engine never sees anything else.
//! - [`TaskStorage`]: everything a collaborator needs on top of that for
//!   plain CRUD and persistence.
//!
//! The in-memory backend implements both; the JSONL backend is the
//! in-memory backend wrapped so that `save()` writes the data file.
//!
//! # Edge Direction
//!
//! Edges point from the **dependent** to the **dependency**: for
//! "A depends on B" the edge is `A -> B`. `dependencies_of(A)` returns `[B]`
//! and `dependents_of(B)` returns `[A]`.
//!
//! # Example
//!
//! ```no_run
//! use taskweave::domain::NewTask;
//! use taskweave::storage::{create_storage, StorageBackend};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let mut storage = create_storage(StorageBackend::InMemory).await?;
//!     let task = storage.create(NewTask::titled("Write release notes")).await?;
//!     println!("Created task {}", task.id);
//!     Ok(())
//! }
//! ```

use crate::domain::{NewTask, Task, TaskFilter, TaskId, TaskStatus, TaskUpdate};
use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub mod in_memory;

/// Graph access contract used by the cycle detector and status propagator.
///
/// Lookups of unknown IDs are not errors: `get_task` returns `None` and the
/// edge listings return an empty vector, so a task vanishing between two
/// calls ends that branch of a traversal instead of failing it.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Get a task by ID.
    async fn get_task(&self, id: &TaskId) -> Result<Option<Task>>;

    /// IDs of the tasks `id` depends on (outgoing edges).
    async fn dependencies_of(&self, id: &TaskId) -> Result<Vec<TaskId>>;

    /// IDs of the tasks that depend on `id` (incoming edges).
    async fn dependents_of(&self, id: &TaskId) -> Result<Vec<TaskId>>;

    /// Persist a new status for a task.
    ///
    /// # Errors
    ///
    /// Returns `Error::TaskNotFound` if the task doesn't exist.
    async fn set_status(&mut self, id: &TaskId, status: TaskStatus) -> Result<()>;

    /// Persist the edge `task -> depends_on`.
    ///
    /// The store enforces uniqueness but does **not** check for cycles; that
    /// is the cycle detector's job and must happen before this call.
    ///
    /// # Errors
    ///
    /// - `Error::TaskNotFound` if either task doesn't exist
    /// - `Error::SelfDependency` if `task == depends_on`
    /// - `Error::DuplicateDependency` if the edge already exists
    async fn insert_edge(&mut self, task: &TaskId, depends_on: &TaskId) -> Result<()>;
}

/// Full storage surface for collaborators (CLI, library callers).
#[async_trait]
pub trait TaskStorage: GraphStore {
    /// Create a new task with the next sequential ID.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTask` if the title fails validation.
    async fn create(&mut self, task: NewTask) -> Result<Task>;

    /// Update the plain fields of a task. Returns the updated task.
    ///
    /// # Errors
    ///
    /// - `Error::TaskNotFound` if the task doesn't exist
    /// - `Error::InvalidTask` if the new title fails validation
    async fn update(&mut self, id: &TaskId, updates: TaskUpdate) -> Result<Task>;

    /// Delete a task together with every edge touching it.
    ///
    /// Returns the IDs of the tasks that depended on the deleted task.
    ///
    /// # Errors
    ///
    /// Returns `Error::TaskNotFound` if the task doesn't exist.
    async fn delete(&mut self, id: &TaskId) -> Result<Vec<TaskId>>;

    /// Remove the edge `task -> depends_on`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DependencyNotFound` if the edge doesn't exist.
    async fn remove_edge(&mut self, task: &TaskId, depends_on: &TaskId) -> Result<()>;

    /// List tasks matching the filter, ordered by ID.
    async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Export every task, ordered by ID.
    async fn export_all(&self) -> Result<Vec<Task>>;

    /// Write changes to persistent storage. A no-op for in-memory storage.
    async fn save(&self) -> Result<()>;

    /// Discard in-memory changes and restore the persisted state.
    ///
    /// A no-op for in-memory storage.
    async fn reload(&mut self) -> Result<()>;
}

/// Storage backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-memory storage (ephemeral)
    InMemory,

    /// In-memory storage persisted to a JSONL file
    Jsonl(PathBuf),
}

impl StorageBackend {
    /// Returns the data file path for file-based backends.
    pub fn data_path(&self) -> Option<&Path> {
        match self {
            StorageBackend::Jsonl(path) => Some(path),
            StorageBackend::InMemory => None,
        }
    }
}

/// In-memory storage that writes itself to a JSONL file on `save()`.
struct JsonlBackedStorage {
    inner: Box<dyn TaskStorage>,
    path: PathBuf,
}

impl JsonlBackedStorage {
    async fn open(path: PathBuf) -> Result<Self> {
        let inner = load_or_empty(&path).await?;
        Ok(Self { inner, path })
    }
}

async fn load_or_empty(path: &Path) -> Result<Box<dyn TaskStorage>> {
    if !path.exists() {
        return Ok(in_memory::new_in_memory_storage());
    }

    let (storage, warnings) = in_memory::load_from_jsonl(path).await?;
    for warning in &warnings {
        tracing::warn!(warning = ?warning, "JSONL load warning");
    }
    Ok(storage)
}

#[async_trait]
impl GraphStore for JsonlBackedStorage {
    async fn get_task(&self, id: &TaskId) -> Result<Option<Task>> {
        self.inner.get_task(id).await
    }

    async fn dependencies_of(&self, id: &TaskId) -> Result<Vec<TaskId>> {
        self.inner.dependencies_of(id).await
    }

    async fn dependents_of(&self, id: &TaskId) -> Result<Vec<TaskId>> {
        self.inner.dependents_of(id).await
    }

    async fn set_status(&mut self, id: &TaskId, status: TaskStatus) -> Result<()> {
        self.inner.set_status(id, status).await
    }

    async fn insert_edge(&mut self, task: &TaskId, depends_on: &TaskId) -> Result<()> {
        self.inner.insert_edge(task, depends_on).await
    }
}

#[async_trait]
impl TaskStorage for JsonlBackedStorage {
    async fn create(&mut self, task: NewTask) -> Result<Task> {
        self.inner.create(task).await
    }

    async fn update(&mut self, id: &TaskId, updates: TaskUpdate) -> Result<Task> {
        self.inner.update(id, updates).await
    }

    async fn delete(&mut self, id: &TaskId) -> Result<Vec<TaskId>> {
        self.inner.delete(id).await
    }

    async fn remove_edge(&mut self, task: &TaskId, depends_on: &TaskId) -> Result<()> {
        self.inner.remove_edge(task, depends_on).await
    }

    async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        self.inner.list(filter).await
    }

    async fn export_all(&self) -> Result<Vec<Task>> {
        self.inner.export_all().await
    }

    async fn save(&self) -> Result<()> {
        in_memory::save_to_jsonl(self.inner.as_ref(), &self.path).await
    }

    async fn reload(&mut self) -> Result<()> {
        self.inner = load_or_empty(&self.path).await?;
        Ok(())
    }
}

/// Create a storage instance for the given backend.
///
/// # Errors
///
/// - `Error::Io` if the JSONL data file exists but cannot be read
pub async fn create_storage(backend: StorageBackend) -> Result<Box<dyn TaskStorage>> {
    match backend {
        StorageBackend::InMemory => Ok(in_memory::new_in_memory_storage()),
        StorageBackend::Jsonl(path) => Ok(Box::new(JsonlBackedStorage::open(path).await?)),
    }
}

// ========== Test Utilities ==========

/// Minimal map-backed [`GraphStore`] for exercising the graph engine.
///
/// Unlike the in-memory backend, edges may point at tasks that don't exist,
/// which makes "task vanished mid-traversal" reproducible. Every
/// `set_status` call is recorded in [`MapGraphStore::writes`].
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct MapGraphStore {
    tasks: std::collections::HashMap<TaskId, Task>,
    edges: std::collections::BTreeSet<(TaskId, TaskId)>,
    /// Status writes in the order they happened.
    pub writes: Vec<(TaskId, TaskStatus)>,
}

#[cfg(any(test, feature = "test-util"))]
impl MapGraphStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a task with the given status.
    pub fn with_task(mut self, id: u64, status: TaskStatus) -> Self {
        let now = chrono::Utc::now();
        let id = TaskId(id);
        self.tasks.insert(
            id,
            Task {
                id,
                title: format!("task {id}"),
                description: String::new(),
                status,
                dependencies: vec![],
                created_at: now,
                updated_at: now,
            },
        );
        self
    }

    /// Add the edge `task -> depends_on` without any validation.
    pub fn with_edge(mut self, task: u64, depends_on: u64) -> Self {
        self.edges.insert((TaskId(task), TaskId(depends_on)));
        self
    }

    /// Remove a task record but leave its edges dangling.
    pub fn vanish(&mut self, id: u64) {
        self.tasks.remove(&TaskId(id));
    }

    /// Current status of a task, if it exists.
    pub fn status(&self, id: u64) -> Option<TaskStatus> {
        self.tasks.get(&TaskId(id)).map(|t| t.status)
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl GraphStore for MapGraphStore {
    async fn get_task(&self, id: &TaskId) -> Result<Option<Task>> {
        Ok(self.tasks.get(id).cloned())
    }

    async fn dependencies_of(&self, id: &TaskId) -> Result<Vec<TaskId>> {
        Ok(self
            .edges
            .iter()
            .filter(|(from, _)| from == id)
            .map(|(_, to)| *to)
            .collect())
    }

    async fn dependents_of(&self, id: &TaskId) -> Result<Vec<TaskId>> {
        Ok(self
            .edges
            .iter()
            .filter(|(_, to)| to == id)
            .map(|(from, _)| *from)
            .collect())
    }

    async fn set_status(&mut self, id: &TaskId, status: TaskStatus) -> Result<()> {
        let task = self
            .tasks
            .get_mut(id)
            .ok_or(crate::error::Error::TaskNotFound(*id))?;
        task.status = status;
        self.writes.push((*id, status));
        Ok(())
    }

    async fn insert_edge(&mut self, task: &TaskId, depends_on: &TaskId) -> Result<()> {
        if !self.edges.insert((*task, *depends_on)) {
            return Err(crate::error::Error::DuplicateDependency {
                task: *task,
                depends_on: *depends_on,
            });
        }
        Ok(())
    }
}
