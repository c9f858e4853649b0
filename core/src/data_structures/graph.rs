//! Capacitated directed graph for flow computations
//!
//! The network is an arena of directed edges with a per-vertex list of
//! outgoing edge ids. Vertices are plain indices in `[0, n)`; edges are
//! identified by their position in the arena, which is also how flow
//! assignments index into them.
//!
//! Adding an edge between an ordered pair that already has one increases
//! the stored capacity instead of creating a parallel edge, so every
//! ordered pair owns at most one edge.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::max_flow::FlowError;
use crate::algorithm::traits::NodeId;

/// Integral edge capacity and flow quantity
pub type Capacity = u64;

/// Position of an edge in the network's edge arena
pub type EdgeId = usize;

/// Directed edge with its (coalesced) capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    /// Tail vertex
    pub from: NodeId,
    /// Head vertex
    pub to: NodeId,
    /// Total capacity of all insertions between `from` and `to`
    pub capacity: Capacity,
}

/// Flow network with arena-allocated edges
///
/// The sum of all capacities is maintained with checked arithmetic, so any
/// flow value or cut capacity derived from this network fits in a
/// [`Capacity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EdgeList", into = "EdgeList")]
pub struct FlowNetwork {
    vertex_count: usize,
    /// Outgoing edge ids per vertex, in insertion order
    adjacency: Vec<Vec<EdgeId>>,
    edges: Vec<FlowEdge>,
    total_capacity: Capacity,
}

impl FlowNetwork {
    /// Create an edgeless network over `vertex_count` vertices
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            adjacency: vec![Vec::new(); vertex_count],
            edges: Vec::new(),
            total_capacity: 0,
        }
    }

    /// Build a network from `(from, to, capacity)` triples
    pub fn from_edges<I>(vertex_count: usize, edges: I) -> Result<Self, FlowError>
    where
        I: IntoIterator<Item = (NodeId, NodeId, Capacity)>,
    {
        let mut network = Self::new(vertex_count);
        for (from, to, capacity) in edges {
            network.add_directed_edge(from, to, capacity)?;
        }
        Ok(network)
    }

    /// Build a network where every triple is an undirected edge
    pub fn from_undirected_edges<I>(vertex_count: usize, edges: I) -> Result<Self, FlowError>
    where
        I: IntoIterator<Item = (NodeId, NodeId, Capacity)>,
    {
        let mut network = Self::new(vertex_count);
        for (u, v, capacity) in edges {
            network.add_undirected_edge(u, v, capacity)?;
        }
        Ok(network)
    }

    /// Add `capacity` to the directed edge `from -> to`, creating it if absent
    ///
    /// A zero capacity is accepted; the edge then exists but carries nothing.
    pub fn add_directed_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        capacity: Capacity,
    ) -> Result<EdgeId, FlowError> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;

        let total_capacity = self
            .total_capacity
            .checked_add(capacity)
            .ok_or(FlowError::CapacityOverflow)?;

        let id = match self.find_edge(from, to) {
            Some(id) => {
                let edge = &mut self.edges[id];
                edge.capacity = edge
                    .capacity
                    .checked_add(capacity)
                    .ok_or(FlowError::CapacityOverflow)?;
                id
            }
            None => {
                let id = self.edges.len();
                self.edges.push(FlowEdge { from, to, capacity });
                self.adjacency[from].push(id);
                id
            }
        };

        self.total_capacity = total_capacity;
        Ok(id)
    }

    /// Add `u -> v` and `v -> u`, each with `capacity`
    ///
    /// The two directions are independent edges afterwards.
    pub fn add_undirected_edge(
        &mut self,
        u: NodeId,
        v: NodeId,
        capacity: Capacity,
    ) -> Result<(), FlowError> {
        self.add_directed_edge(u, v, capacity)?;
        self.add_directed_edge(v, u, capacity)?;
        Ok(())
    }

    /// Capacity of `from -> to`, or zero when there is no such edge
    pub fn capacity_of(&self, from: NodeId, to: NodeId) -> Capacity {
        self.find_edge(from, to)
            .map(|id| self.edges[id].capacity)
            .unwrap_or(0)
    }

    /// Id of the edge `from -> to`, if present
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.adjacency
            .get(from)?
            .iter()
            .copied()
            .find(|&id| self.edges[id].to == to)
    }

    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.find_edge(from, to).is_some()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge(&self, id: EdgeId) -> Option<&FlowEdge> {
        self.edges.get(id)
    }

    /// All edges in arena order; the position is the edge id
    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    /// Ids of the edges leaving `vertex`
    pub fn out_edges(&self, vertex: NodeId) -> &[EdgeId] {
        self.adjacency.get(vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sum of every edge capacity in the network
    pub fn total_capacity(&self) -> Capacity {
        self.total_capacity
    }

    /// Sum of the capacities leaving `source`; bounds the number of augmentations
    pub fn source_capacity(&self, source: NodeId) -> Capacity {
        // Cannot overflow: bounded by `total_capacity`.
        self.out_edges(source)
            .iter()
            .map(|&id| self.edges[id].capacity)
            .sum()
    }

    pub(crate) fn check_vertex(&self, vertex: NodeId) -> Result<(), FlowError> {
        if vertex < self.vertex_count {
            Ok(())
        } else {
            Err(FlowError::InvalidVertex {
                vertex,
                vertex_count: self.vertex_count,
            })
        }
    }
}

/// Serialized form of a [`FlowNetwork`]
///
/// Deserialization replays every edge through
/// [`FlowNetwork::add_directed_edge`], so malformed input is rejected the
/// same way malformed construction is.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EdgeList {
    vertex_count: usize,
    edges: Vec<(NodeId, NodeId, Capacity)>,
}

impl TryFrom<EdgeList> for FlowNetwork {
    type Error = FlowError;

    fn try_from(list: EdgeList) -> Result<Self, Self::Error> {
        FlowNetwork::from_edges(list.vertex_count, list.edges)
    }
}

impl From<FlowNetwork> for EdgeList {
    fn from(network: FlowNetwork) -> Self {
        Self {
            vertex_count: network.vertex_count,
            edges: network
                .edges
                .into_iter()
                .map(|edge| (edge.from, edge.to, edge.capacity))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_insertions_coalesce() {
        let mut network = FlowNetwork::new(3);
        let first = network.add_directed_edge(0, 1, 3).unwrap();
        let second = network.add_directed_edge(0, 1, 4).unwrap();

        assert_eq!(first, second);
        assert_eq!(network.edge_count(), 1);
        assert_eq!(network.capacity_of(0, 1), 7);
        assert_eq!(network.total_capacity(), 7);
    }

    #[test]
    fn test_missing_edge_has_zero_capacity() {
        let network = FlowNetwork::from_edges(3, [(0, 1, 5)]).unwrap();

        assert_eq!(network.capacity_of(1, 0), 0);
        assert_eq!(network.capacity_of(2, 2), 0);
        assert_eq!(network.capacity_of(7, 9), 0);
        assert!(!network.has_edge(1, 0));
    }

    #[test]
    fn test_zero_capacity_edge_exists() {
        let network = FlowNetwork::from_edges(2, [(0, 1, 0)]).unwrap();

        assert!(network.has_edge(0, 1));
        assert_eq!(network.capacity_of(0, 1), 0);
    }

    #[test]
    fn test_undirected_edge_adds_both_directions() {
        let mut network = FlowNetwork::new(2);
        network.add_undirected_edge(0, 1, 2).unwrap();
        network.add_directed_edge(0, 1, 1).unwrap();

        assert_eq!(network.capacity_of(0, 1), 3);
        assert_eq!(network.capacity_of(1, 0), 2);
        assert_eq!(network.edge_count(), 2);
    }

    #[test]
    fn test_invalid_vertex_rejected() {
        let mut network = FlowNetwork::new(2);

        assert!(matches!(
            network.add_directed_edge(0, 2, 1),
            Err(FlowError::InvalidVertex { vertex: 2, vertex_count: 2 })
        ));
        assert_eq!(network.edge_count(), 0);
    }

    #[test]
    fn test_capacity_overflow_detected() {
        let mut network = FlowNetwork::new(3);
        network.add_directed_edge(0, 1, Capacity::MAX).unwrap();

        assert!(matches!(
            network.add_directed_edge(1, 2, 1),
            Err(FlowError::CapacityOverflow)
        ));
        // The failed insertion leaves no trace.
        assert_eq!(network.edge_count(), 1);
        assert_eq!(network.total_capacity(), Capacity::MAX);
    }

    #[test]
    fn test_serde_revalidates_edges() {
        let network = FlowNetwork::from_edges(3, [(0, 1, 2), (1, 2, 5)]).unwrap();
        let json = serde_json::to_string(&network).unwrap();
        let restored: FlowNetwork = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, network);

        let bad = r#"{"vertex_count":2,"edges":[[0,5,1]]}"#;
        assert!(serde_json::from_str::<FlowNetwork>(bad).is_err());
    }
}
