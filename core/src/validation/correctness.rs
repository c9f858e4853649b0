//! Correctness checks for flows, cuts and matchings
//!
//! [`FlowValidator`] inspects a finished result against the network it was
//! computed on and reports every broken invariant instead of stopping at the
//! first one. The solver uses it when `verify` is configured; the test suite
//! uses it directly.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use crate::algorithm::graph::max_flow::{FlowAssignment, MinCut};
use crate::algorithm::traits::NodeId;
use crate::data_structures::graph::{Capacity, FlowNetwork};

/// A broken flow, cut or matching invariant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("flow covers {found} edges, network has {expected}")]
    EdgeCountMismatch { expected: usize, found: usize },

    #[error("flow {flow} on {from} -> {to} exceeds capacity {capacity}")]
    CapacityExceeded {
        from: NodeId,
        to: NodeId,
        flow: Capacity,
        capacity: Capacity,
    },

    #[error("vertex {vertex} receives {inflow} but sends {outflow}")]
    ConservationBroken {
        vertex: NodeId,
        inflow: u128,
        outflow: u128,
    },

    #[error("source sends net {source_outflow} but sink receives net {sink_inflow}")]
    EndpointImbalance { source_outflow: i128, sink_inflow: i128 },

    #[error("sink {sink} lies on the source side of the cut")]
    CutNotSeparating { sink: NodeId },

    #[error("flow value {flow_value} differs from cut capacity {cut_capacity}")]
    DualityGap {
        flow_value: i128,
        cut_capacity: u128,
    },

    #[error("vertex {vertex} is matched more than once")]
    VertexMatchedTwice { vertex: NodeId },

    #[error("matched pair {0} - {1} is not an edge of the graph")]
    UnknownMatchingEdge(NodeId, NodeId),
}

/// Invariant checker bound to one network
#[derive(Debug, Clone, Copy)]
pub struct FlowValidator<'a> {
    network: &'a FlowNetwork,
}

impl<'a> FlowValidator<'a> {
    pub fn new(network: &'a FlowNetwork) -> Self {
        Self { network }
    }

    /// Capacity respect on every edge and conservation at every vertex other
    /// than `source` and `sink`, plus source/sink balance
    pub fn check_flow(
        &self,
        flow: &FlowAssignment,
        source: NodeId,
        sink: NodeId,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();
        let expected = self.network.edge_count();
        if flow.len() != expected {
            violations.push(Violation::EdgeCountMismatch {
                expected,
                found: flow.len(),
            });
            return violations;
        }

        let vertex_count = self.network.vertex_count();
        let mut inflow = vec![0u128; vertex_count];
        let mut outflow = vec![0u128; vertex_count];

        for (edge, network_edge) in self.network.edges().iter().enumerate() {
            let amount = flow.edge_flow(edge);
            if amount > network_edge.capacity {
                violations.push(Violation::CapacityExceeded {
                    from: network_edge.from,
                    to: network_edge.to,
                    flow: amount,
                    capacity: network_edge.capacity,
                });
            }
            outflow[network_edge.from] += u128::from(amount);
            inflow[network_edge.to] += u128::from(amount);
        }

        for vertex in (0..vertex_count).filter(|&v| v != source && v != sink) {
            if inflow[vertex] != outflow[vertex] {
                violations.push(Violation::ConservationBroken {
                    vertex,
                    inflow: inflow[vertex],
                    outflow: outflow[vertex],
                });
            }
        }

        if source < vertex_count && sink < vertex_count {
            let source_outflow = net(outflow[source], inflow[source]);
            let sink_inflow = net(inflow[sink], outflow[sink]);
            if source_outflow != sink_inflow {
                violations.push(Violation::EndpointImbalance {
                    source_outflow,
                    sink_inflow,
                });
            }
        }

        violations
    }

    /// [`FlowValidator::check_flow`] plus the cut conditions: the cut
    /// separates source from sink and its capacity equals the flow value
    pub fn check_max_flow(
        &self,
        flow: &FlowAssignment,
        source: NodeId,
        sink: NodeId,
        cut: &MinCut,
    ) -> Vec<Violation> {
        let mut violations = self.check_flow(flow, source, sink);
        if !violations.is_empty() {
            return violations;
        }

        if cut.contains(sink) {
            violations.push(Violation::CutNotSeparating { sink });
        }

        let (mut source_in, mut source_out) = (0u128, 0u128);
        for (from, to, amount) in flow.iter(self.network) {
            if from == source {
                source_out += u128::from(amount);
            }
            if to == source {
                source_in += u128::from(amount);
            }
        }
        let flow_value = net(source_out, source_in);

        let cut_capacity: u128 = cut
            .cut_edges(self.network)
            .iter()
            .map(|edge| u128::from(edge.capacity))
            .sum();
        if i128::try_from(cut_capacity).ok() != Some(flow_value) {
            violations.push(Violation::DualityGap {
                flow_value,
                cut_capacity,
            });
        }

        violations
    }

    /// Every pair is a network edge (either direction) and no vertex is used twice
    pub fn check_matching(&self, pairs: &[(NodeId, NodeId)]) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut used = vec![false; self.network.vertex_count()];

        for &(u, v) in pairs {
            if !self.network.has_edge(u, v) && !self.network.has_edge(v, u) {
                violations.push(Violation::UnknownMatchingEdge(u, v));
                continue;
            }
            for vertex in [u, v] {
                if used[vertex] {
                    violations.push(Violation::VertexMatchedTwice { vertex });
                }
                used[vertex] = true;
            }
        }

        violations
    }
}

fn net(incoming: u128, outgoing: u128) -> i128 {
    // Per-vertex sums of u64 flows stay far below i128::MAX.
    incoming as i128 - outgoing as i128
}
