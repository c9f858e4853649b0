//! Residual graph construction
//!
//! A residual graph is a snapshot: it is derived from a network and a flow
//! assignment, read, and thrown away. It holds no reference into the live
//! flow, so the solver rebuilds it after every augmentation.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::trace;

use crate::algorithm::graph::max_flow::FlowAssignment;
use crate::algorithm::traits::NodeId;
use crate::data_structures::graph::{Capacity, EdgeId, FlowNetwork};

/// Whether an arc pushes more flow along its edge or cancels existing flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcDirection {
    /// Same orientation as the network edge, weight `capacity - flow`
    Forward,
    /// Opposite orientation, weight `flow`
    Backward,
}

/// Arc of the residual graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidualArc {
    pub from: NodeId,
    pub to: NodeId,
    /// Residual capacity, always positive
    pub residual: Capacity,
    /// Network edge this arc was derived from
    pub edge: EdgeId,
    pub direction: ArcDirection,
}

/// Residual graph with per-vertex arc lists
#[derive(Debug, Clone)]
pub struct ResidualGraph {
    vertex_count: usize,
    arcs: Vec<ResidualArc>,
    adjacency: Vec<Vec<usize>>,
}

impl ResidualGraph {
    /// Derive the residual graph of `network` under `flow`
    ///
    /// For each edge `(u, v)` with capacity `c` and flow `f`, a forward arc
    /// `u -> v` of weight `c - f` is emitted iff `f < c`, and a backward arc
    /// `v -> u` of weight `f` iff `f > 0`. Forward and backward arcs between
    /// the same pair stay separate.
    pub fn build(network: &FlowNetwork, flow: &FlowAssignment) -> Self {
        let vertex_count = network.vertex_count();
        let mut graph = Self {
            vertex_count,
            arcs: Vec::with_capacity(network.edge_count()),
            adjacency: vec![Vec::new(); vertex_count],
        };

        for (edge, network_edge) in network.edges().iter().enumerate() {
            let current = flow.edge_flow(edge);

            let forward = network_edge.capacity.saturating_sub(current);
            if forward > 0 {
                graph.push(ResidualArc {
                    from: network_edge.from,
                    to: network_edge.to,
                    residual: forward,
                    edge,
                    direction: ArcDirection::Forward,
                });
            }

            if current > 0 {
                graph.push(ResidualArc {
                    from: network_edge.to,
                    to: network_edge.from,
                    residual: current,
                    edge,
                    direction: ArcDirection::Backward,
                });
            }
        }

        trace!(
            "Residual graph built: {} vertices, {} arcs",
            graph.vertex_count,
            graph.arcs.len()
        );
        graph
    }

    fn push(&mut self, arc: ResidualArc) {
        self.adjacency[arc.from].push(self.arcs.len());
        self.arcs.push(arc);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Arcs leaving `vertex`, in construction order
    pub fn arcs_from(&self, vertex: NodeId) -> impl Iterator<Item = &ResidualArc> + '_ {
        self.adjacency
            .get(vertex)
            .into_iter()
            .flatten()
            .map(move |&index| &self.arcs[index])
    }

    /// The `position`-th arc leaving `vertex`
    pub(crate) fn arc_at(&self, vertex: NodeId, position: usize) -> Option<&ResidualArc> {
        let index = *self.adjacency.get(vertex)?.get(position)?;
        self.arcs.get(index)
    }

    /// Combined residual capacity of every arc `from -> to`
    pub fn residual_capacity(&self, from: NodeId, to: NodeId) -> Capacity {
        self.arcs_from(from)
            .filter(|arc| arc.to == to)
            .fold(0, |sum: Capacity, arc| sum.saturating_add(arc.residual))
    }
}
