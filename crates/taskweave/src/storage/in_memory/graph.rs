//! Store-side graph checks used while rebuilding a graph from disk.
//!
//! Interactive edge insertion goes through the engine's cycle detector,
//! which reports the full path. Loading only needs a yes/no answer per
//! edge, so it uses petgraph directly.

use crate::domain::TaskId;
use petgraph::algo;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use std::collections::HashMap;

/// Whether adding `from -> to` would close a cycle.
///
/// True if `to` can already reach `from`. Unknown IDs never close a cycle.
pub(super) fn closes_cycle(
    graph: &StableDiGraph<TaskId, ()>,
    node_map: &HashMap<TaskId, NodeIndex>,
    from: &TaskId,
    to: &TaskId,
) -> bool {
    let (Some(&from_node), Some(&to_node)) = (node_map.get(from), node_map.get(to)) else {
        return false;
    };
    algo::has_path_connecting(graph, to_node, from_node, None)
}
