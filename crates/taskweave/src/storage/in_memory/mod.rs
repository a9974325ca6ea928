//! In-memory storage backend using HashMap and petgraph.
//!
//! All data is held in RAM and **lost when the process exits** unless it is
//! written out with [`save_to_jsonl`]. [`load_from_jsonl`] restores a store
//! from disk.
//!
//! # Architecture
//!
//! - `HashMap<TaskId, Task>` for O(1) task lookups
//! - `petgraph::stable_graph::StableDiGraph` for the dependency edges. The
//!   stable variant keeps node indices valid when a task is deleted, so the
//!   `TaskId -> NodeIndex` map never needs rebuilding.
//! - A monotonically increasing `next_id` counter for task IDs
//!
//! ## Edge Direction
//!
//! Edges point from the **dependent** to the **dependency**: if task A
//! depends on task B the graph holds `A -> B`. Each task's `dependencies`
//! vector mirrors its outgoing edges so the task serializes on its own.
//!
//! The store does not check for cycles when an edge is inserted; callers go
//! through [`crate::engine::add_dependency`], which runs the cycle detector
//! first.
//!
//! # Thread Safety
//!
//! The storage is wrapped in `Arc<Mutex<InMemoryStorageInner>>`. Each trait
//! call holds the lock for its own duration only.

mod graph;
mod inner;
mod jsonl;
mod trait_impl;

use crate::storage::TaskStorage;
use inner::InMemoryStorageInner;
use std::sync::Arc;
use tokio::sync::Mutex;

pub use jsonl::{LoadWarning, load_from_jsonl, save_to_jsonl};

/// Thread-safe in-memory storage.
pub(crate) type InMemoryStorage = Arc<Mutex<InMemoryStorageInner>>;

/// Create a new, empty in-memory storage instance.
///
/// # Example
///
/// ```
/// use taskweave::storage::in_memory::new_in_memory_storage;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let storage = new_in_memory_storage();
///     // Use storage...
/// }
/// ```
pub fn new_in_memory_storage() -> Box<dyn TaskStorage> {
    Box::new(Arc::new(Mutex::new(InMemoryStorageInner::new())))
}
