//! Augmenting path search over residual graphs
//!
//! The search is a plain depth-first walk with an explicit frame stack:
//! it returns the first simple source-to-sink path it runs into, with no
//! preference for short or wide paths. Which path that is depends on arc
//! order and is not part of any contract.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::residual::{ResidualArc, ResidualGraph};
use crate::algorithm::traits::NodeId;
use crate::data_structures::graph::Capacity;

/// Frontier discipline for reachability traversals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Traversal {
    #[default]
    DepthFirst,
    BreadthFirst,
}

/// Simple source-to-sink path through a residual graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentingPath {
    /// Vertices from source to sink
    pub vertices: Vec<NodeId>,
    /// `arcs[i]` connects `vertices[i]` to `vertices[i + 1]`
    pub arcs: Vec<ResidualArc>,
}

impl AugmentingPath {
    /// Smallest residual capacity along the path, `None` for a trivial path
    pub fn bottleneck(&self) -> Option<Capacity> {
        self.arcs.iter().map(|arc| arc.residual).min()
    }

    /// Number of arcs on the path
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }
}

/// Find some simple path from `source` to `sink`, or `None` if the sink is
/// unreachable
///
/// When `source == sink` the result is the one-vertex path without arcs.
pub fn find_path(residual: &ResidualGraph, source: NodeId, sink: NodeId) -> Option<AugmentingPath> {
    search(residual, source, sink).0
}

/// [`find_path`] that also reports how many vertices were entered
pub(crate) fn search(
    residual: &ResidualGraph,
    source: NodeId,
    sink: NodeId,
) -> (Option<AugmentingPath>, usize) {
    let vertex_count = residual.vertex_count();
    if source >= vertex_count || sink >= vertex_count {
        return (None, 0);
    }

    let mut visited = vec![false; vertex_count];
    // Each frame is a vertex and the position of the next arc to try.
    let mut stack: Vec<(NodeId, usize)> = vec![(source, 0)];
    let mut arcs: Vec<ResidualArc> = Vec::new();
    visited[source] = true;
    let mut explored = 1;

    while let Some(frame) = stack.last_mut() {
        let vertex = frame.0;
        if vertex == sink {
            let vertices = stack.iter().map(|&(v, _)| v).collect();
            return (Some(AugmentingPath { vertices, arcs }), explored);
        }

        match residual.arc_at(vertex, frame.1) {
            Some(&arc) => {
                frame.1 += 1;
                if !visited[arc.to] {
                    visited[arc.to] = true;
                    explored += 1;
                    stack.push((arc.to, 0));
                    arcs.push(arc);
                }
            }
            None => {
                stack.pop();
                arcs.pop();
            }
        }
    }

    (None, explored)
}

/// Mark every vertex reachable from `source` through residual arcs
pub fn reachable_from(residual: &ResidualGraph, source: NodeId, traversal: Traversal) -> Vec<bool> {
    let mut seen = vec![false; residual.vertex_count()];
    if source >= seen.len() {
        return seen;
    }

    let mut frontier = VecDeque::from([source]);
    seen[source] = true;

    loop {
        let next = match traversal {
            Traversal::DepthFirst => frontier.pop_back(),
            Traversal::BreadthFirst => frontier.pop_front(),
        };
        let Some(vertex) = next else { break };

        for arc in residual.arcs_from(vertex) {
            if !seen[arc.to] {
                seen[arc.to] = true;
                frontier.push_back(arc.to);
            }
        }
    }

    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::graph::max_flow::FlowAssignment;
    use crate::algorithm::graph::residual::ArcDirection;
    use crate::data_structures::graph::FlowNetwork;

    fn residual_of(network: &FlowNetwork) -> ResidualGraph {
        ResidualGraph::build(network, &FlowAssignment::zeroed(network))
    }

    #[test]
    fn test_path_follows_arcs_in_order() {
        let network =
            FlowNetwork::from_edges(4, [(0, 1, 3), (0, 2, 2), (1, 3, 2), (2, 3, 3)]).unwrap();
        let path = find_path(&residual_of(&network), 0, 3).unwrap();

        assert_eq!(path.vertices, vec![0, 1, 3]);
        assert_eq!(path.len(), 2);
        assert_eq!(path.bottleneck(), Some(2));
    }

    #[test]
    fn test_dead_end_is_backtracked() {
        let network = FlowNetwork::from_edges(4, [(0, 1, 1), (0, 2, 1), (2, 3, 1)]).unwrap();
        let path = find_path(&residual_of(&network), 0, 3).unwrap();

        assert_eq!(path.vertices, vec![0, 2, 3]);
        assert!(path.arcs.iter().all(|arc| arc.direction == ArcDirection::Forward));
    }

    #[test]
    fn test_unreachable_sink() {
        let network = FlowNetwork::from_edges(3, [(0, 1, 1), (2, 1, 1)]).unwrap();
        assert_eq!(find_path(&residual_of(&network), 0, 2), None);
    }

    #[test]
    fn test_cycles_do_not_trap_search() {
        let network =
            FlowNetwork::from_edges(4, [(0, 1, 1), (1, 2, 1), (2, 0, 1), (2, 3, 1)]).unwrap();
        let path = find_path(&residual_of(&network), 0, 3).unwrap();

        assert_eq!(path.vertices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_trivial_path_when_source_is_sink() {
        let network = FlowNetwork::from_edges(2, [(0, 1, 1)]).unwrap();
        let path = find_path(&residual_of(&network), 0, 0).unwrap();

        assert_eq!(path.vertices, vec![0]);
        assert!(path.is_empty());
        assert_eq!(path.bottleneck(), None);
    }

    #[test]
    fn test_reachability_agrees_across_traversals() {
        let network =
            FlowNetwork::from_edges(5, [(0, 1, 1), (1, 2, 1), (0, 3, 1), (4, 0, 1)]).unwrap();
        let residual = residual_of(&network);

        let depth = reachable_from(&residual, 0, Traversal::DepthFirst);
        let breadth = reachable_from(&residual, 0, Traversal::BreadthFirst);

        assert_eq!(depth, vec![true, true, true, true, false]);
        assert_eq!(depth, breadth);
    }
}
