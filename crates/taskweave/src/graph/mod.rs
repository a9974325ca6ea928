//! Dependency graph engine.
//!
//! Two components work over any [`GraphStore`](crate::storage::GraphStore):
//!
//! - **Cycle detection** ([`detect_cycle`]): decides whether a proposed edge
//!   would close a cycle and, if so, returns the cycle path.
//! - **Status propagation** ([`recompute_status`], [`propagate`]): re-derives
//!   task statuses from their dependencies and cascades changes to
//!   dependents.
//!
//! The engine holds no state between calls. Every operation reads the store
//! afresh, so the graph may change freely between operations.
//!
//! Edge direction follows the store: `A -> B` means A depends on B.
//! Propagation walks edges backwards (from a dependency to its dependents);
//! cycle detection walks them forwards.

mod cycle;
mod propagate;
mod status;

pub use cycle::{CycleCheck, CycleRejection, detect_cycle};
pub use propagate::{PropagationReport, propagate};
pub use status::{DependencySummary, StatusChange, derive_status, recompute_status};

pub(crate) use status::reevaluate;
