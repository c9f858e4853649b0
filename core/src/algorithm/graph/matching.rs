//! Bipartite Maximum Matching
//!
//! Maximum-cardinality matching on bipartite graphs by reduction to maximum
//! flow. The input graph is first two-colored; a super-source is wired to
//! every left vertex and every right vertex to a super-sink with unit
//! capacities, the original edges are oriented left to right, and the edges
//! that carry flow in a maximum flow form a maximum matching.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::graph::max_flow::{FlowError, MaxFlowSolver, SolverConfig};
use crate::algorithm::traits::{Algorithm, AlgorithmError, NodeId};
use crate::data_structures::graph::FlowNetwork;

// ═══════════════════════════════════════════════════════════════════════════════════════
// TWO-COLORING
// ═══════════════════════════════════════════════════════════════════════════════════════

/// Side of the bipartition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Color 0, wired to the super-source
    Left,
    /// Color 1, wired to the super-sink
    Right,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::Left => Color::Right,
            Color::Right => Color::Left,
        }
    }
}

/// A proper two-coloring of every vertex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coloring {
    colors: Vec<Color>,
}

impl Coloring {
    pub fn color_of(&self, vertex: NodeId) -> Option<Color> {
        self.colors.get(vertex).copied()
    }

    pub fn left_vertices(&self) -> Vec<NodeId> {
        self.vertices_colored(Color::Left)
    }

    pub fn right_vertices(&self) -> Vec<NodeId> {
        self.vertices_colored(Color::Right)
    }

    fn vertices_colored(&self, color: Color) -> Vec<NodeId> {
        self.colors
            .iter()
            .enumerate()
            .filter_map(|(vertex, &c)| (c == color).then_some(vertex))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════════════
// MATCHING
// ═══════════════════════════════════════════════════════════════════════════════════════

/// Matched pairs, each oriented `(left, right)`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matching {
    pairs: Vec<(NodeId, NodeId)>,
}

impl Matching {
    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The vertex matched with `vertex`, if any
    pub fn partner_of(&self, vertex: NodeId) -> Option<NodeId> {
        self.pairs.iter().find_map(|&(left, right)| {
            if left == vertex {
                Some(right)
            } else if right == vertex {
                Some(left)
            } else {
                None
            }
        })
    }
}

/// Matching errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchingError {
    /// The graph has an odd cycle; an expected outcome callers branch on
    #[error("Graph is not bipartite: {vertex} and {neighbor} need the same color")]
    NotBipartite { vertex: NodeId, neighbor: NodeId },

    #[error(transparent)]
    Flow(#[from] FlowError),
}

/// Maximum bipartite matching through a flow reduction
#[derive(Debug, Clone, Default)]
pub struct BipartiteMatcher {
    solver: MaxFlowSolver,
}

impl BipartiteMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matcher whose inner max-flow solver uses `config`
    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            solver: MaxFlowSolver::with_config(config),
        }
    }

    /// Two-color `graph`, treating every directed edge as undirected adjacency
    ///
    /// Components are colored in order of their smallest vertex, each starting
    /// from [`Color::Left`]. The first edge found with equally colored ends
    /// fails the whole coloring.
    pub fn two_color(&self, graph: &FlowNetwork) -> Result<Coloring, MatchingError> {
        let vertex_count = graph.vertex_count();
        let mut adjacency = vec![Vec::new(); vertex_count];
        for edge in graph.edges() {
            adjacency[edge.from].push(edge.to);
            adjacency[edge.to].push(edge.from);
        }

        let mut colors: Vec<Option<Color>> = vec![None; vertex_count];
        let mut stack = Vec::new();

        for start in 0..vertex_count {
            if colors[start].is_some() {
                continue;
            }
            colors[start] = Some(Color::Left);
            stack.push((start, Color::Left));

            while let Some((vertex, color)) = stack.pop() {
                for &neighbor in &adjacency[vertex] {
                    match colors[neighbor] {
                        None => {
                            colors[neighbor] = Some(color.opposite());
                            stack.push((neighbor, color.opposite()));
                        }
                        Some(existing) if existing == color => {
                            debug!("Odd cycle through {} -> {}", vertex, neighbor);
                            return Err(MatchingError::NotBipartite { vertex, neighbor });
                        }
                        Some(_) => {}
                    }
                }
            }
        }

        Ok(Coloring {
            colors: colors.into_iter().flatten().collect(),
        })
    }

    /// Build the flow network whose maximum flow value is the size of a
    /// maximum matching
    ///
    /// Returns the network with its super-source `n` and super-sink `n + 1`.
    /// Super-source and super-sink edges have unit capacity; each original
    /// edge keeps its own capacity and is added once, oriented from its left
    /// end. An undirected pair stored as two directed edges contributes only
    /// the left-to-right one.
    pub fn reduction_network(
        &self,
        graph: &FlowNetwork,
        coloring: &Coloring,
    ) -> Result<(FlowNetwork, NodeId, NodeId), FlowError> {
        let vertex_count = graph.vertex_count();
        let (source, sink) = (vertex_count, vertex_count + 1);
        let mut network = FlowNetwork::new(vertex_count + 2);

        for vertex in 0..vertex_count {
            match coloring.color_of(vertex) {
                Some(Color::Left) => {
                    network.add_directed_edge(source, vertex, 1)?;
                }
                Some(Color::Right) => {
                    network.add_directed_edge(vertex, sink, 1)?;
                }
                None => {}
            }
        }

        for edge in graph.edges() {
            if coloring.color_of(edge.from) == Some(Color::Left) {
                network.add_directed_edge(edge.from, edge.to, edge.capacity)?;
            } else if !graph.has_edge(edge.to, edge.from) {
                network.add_directed_edge(edge.to, edge.from, edge.capacity)?;
            }
        }

        Ok((network, source, sink))
    }

    /// Maximum-cardinality matching of `graph`
    ///
    /// Fails with [`MatchingError::NotBipartite`] when `graph` has an odd
    /// cycle. Every returned pair is an original edge, oriented
    /// `(left, right)`, and no vertex appears in two pairs.
    pub fn maximum_matching(&self, graph: &FlowNetwork) -> Result<Matching, MatchingError> {
        let coloring = self.two_color(graph)?;
        let (network, source, sink) = self.reduction_network(graph, &coloring)?;
        let result = self.solver.solve(&network, source, sink)?;

        let vertex_count = graph.vertex_count();
        let pairs: Vec<_> = result
            .flow
            .iter(&network)
            .filter(|&(from, to, flow)| flow > 0 && from < vertex_count && to < vertex_count)
            .map(|(from, to, _)| (from, to))
            .collect();

        info!(
            "Matched {} pairs among {} vertices",
            pairs.len(),
            vertex_count
        );
        Ok(Matching { pairs })
    }
}

impl Algorithm for BipartiteMatcher {
    fn name(&self) -> &'static str {
        "Bipartite Matching"
    }

    fn category(&self) -> &'static str {
        "matching"
    }

    fn description(&self) -> &'static str {
        "Maximum-cardinality bipartite matching by two-coloring and reduction to Ford-Fulkerson maximum flow."
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        self.solver.set_parameter(name, value)
    }

    fn get_parameter(&self, name: &str) -> Option<String> {
        self.solver.get_parameter(name)
    }

    fn get_parameters(&self) -> HashMap<String, String> {
        self.solver.get_parameters()
    }
}
