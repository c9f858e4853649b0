//! Maximum flow by augmenting paths
//!
//! Ford-Fulkerson over an explicit residual graph: every iteration derives a
//! fresh residual graph from the network and the current flow, searches it
//! depth-first for a source-to-sink path, and pushes the path's bottleneck
//! along it. The loop ends when the sink is unreachable, at which point the
//! vertices still reachable from the source form a minimum cut.
//!
//! Capacities are integral, so each augmentation adds at least one unit of
//! flow and the loop runs at most `source_capacity(source)` times.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{BTreeSet, HashMap};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::path_search::{self, AugmentingPath, Traversal};
use crate::algorithm::graph::residual::{ArcDirection, ResidualGraph};
use crate::algorithm::traits::{
    parse_flag, Algorithm, AlgorithmError, AlgorithmMetrics, AlgorithmProfiler, NodeId,
};
use crate::data_structures::graph::{Capacity, EdgeId, FlowEdge, FlowNetwork};
use crate::validation::correctness::FlowValidator;

/// Flow algorithm errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("Vertex {vertex} is outside a network of {vertex_count} vertices")]
    InvalidVertex { vertex: NodeId, vertex_count: usize },
    #[error("Source and sink are both vertex {0}")]
    DegenerateEndpoints(NodeId),
    #[error("Capacity or flow exceeds the representable range")]
    CapacityOverflow,
    #[error("Insufficient capacity for flow on {from} -> {to}")]
    InsufficientCapacity { from: NodeId, to: NodeId },
    #[error("Augmentation limit of {limit} reached before saturation")]
    AugmentationLimit { limit: usize },
    #[error("Flow invariant violated: {0}")]
    InvariantViolation(String),
}

/// Solver configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Keep every augmenting path in [`MaxFlowResult::flow_paths`]
    pub record_paths: bool,
    /// Fail with [`FlowError::AugmentationLimit`] instead of augmenting more often
    pub augmentation_limit: Option<usize>,
    /// Traversal used to read the minimum cut off the final residual graph
    pub cut_traversal: Traversal,
    /// Check capacity, conservation and duality after solving
    pub verify: bool,
}

impl SolverConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Lifecycle of a solve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverPhase {
    /// Searching for and applying augmenting paths
    Augmenting,
    /// No augmenting path remains; terminal
    Saturated,
}

/// Flow value per network edge, indexed by [`EdgeId`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowAssignment {
    flows: Vec<Capacity>,
}

impl FlowAssignment {
    /// Zero flow on every edge of `network`
    pub fn zeroed(network: &FlowNetwork) -> Self {
        Self {
            flows: vec![0; network.edge_count()],
        }
    }

    /// Flow on edge `edge`; zero for ids this assignment does not cover
    pub fn edge_flow(&self, edge: EdgeId) -> Capacity {
        self.flows.get(edge).copied().unwrap_or(0)
    }

    pub(crate) fn set(&mut self, edge: EdgeId, value: Capacity) {
        self.flows[edge] = value;
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    pub fn as_slice(&self) -> &[Capacity] {
        &self.flows
    }

    /// Flow on the network edge `from -> to`, zero if there is none
    pub fn flow_between(&self, network: &FlowNetwork, from: NodeId, to: NodeId) -> Capacity {
        network
            .find_edge(from, to)
            .map(|edge| self.edge_flow(edge))
            .unwrap_or(0)
    }

    /// `(from, to, flow)` for every edge of `network`
    pub fn iter<'a>(
        &'a self,
        network: &'a FlowNetwork,
    ) -> impl Iterator<Item = (NodeId, NodeId, Capacity)> + 'a {
        network
            .edges()
            .iter()
            .enumerate()
            .map(move |(edge, e)| (e.from, e.to, self.edge_flow(edge)))
    }

    /// Total flow entering and leaving `vertex`
    pub fn throughput(
        &self,
        network: &FlowNetwork,
        vertex: NodeId,
    ) -> Result<(Capacity, Capacity), FlowError> {
        let mut inflow: Capacity = 0;
        let mut outflow: Capacity = 0;
        for (from, to, flow) in self.iter(network) {
            if to == vertex {
                inflow = inflow.checked_add(flow).ok_or(FlowError::CapacityOverflow)?;
            }
            if from == vertex {
                outflow = outflow.checked_add(flow).ok_or(FlowError::CapacityOverflow)?;
            }
        }
        Ok((inflow, outflow))
    }

    /// Net flow leaving `source`
    pub fn value(&self, network: &FlowNetwork, source: NodeId) -> Result<Capacity, FlowError> {
        let (inflow, outflow) = self.throughput(network, source)?;
        Ok(outflow.saturating_sub(inflow))
    }
}

/// One augmentation: the path used and the flow pushed along it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowPath {
    pub path: Vec<NodeId>,
    pub flow: Capacity,
}

/// Outcome of [`MaxFlowSolver::solve`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxFlowResult {
    pub source: NodeId,
    pub sink: NodeId,
    /// Maximum flow value
    pub value: Capacity,
    pub flow: FlowAssignment,
    /// Augmentations in application order; empty unless `record_paths` is set
    pub flow_paths: Vec<FlowPath>,
    pub metrics: AlgorithmMetrics,
}

/// Source side of a minimum s-t cut
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinCut {
    vertex_count: usize,
    source_side: BTreeSet<NodeId>,
}

impl MinCut {
    fn from_reachable(reachable: &[bool]) -> Self {
        Self {
            vertex_count: reachable.len(),
            source_side: reachable
                .iter()
                .enumerate()
                .filter_map(|(vertex, &seen)| seen.then_some(vertex))
                .collect(),
        }
    }

    /// Vertices reachable from the source in the final residual graph
    pub fn source_side(&self) -> &BTreeSet<NodeId> {
        &self.source_side
    }

    pub fn sink_side(&self) -> BTreeSet<NodeId> {
        (0..self.vertex_count)
            .filter(|vertex| !self.source_side.contains(vertex))
            .collect()
    }

    pub fn contains(&self, vertex: NodeId) -> bool {
        self.source_side.contains(&vertex)
    }

    /// Network edges leaving the source side
    pub fn cut_edges<'a>(&self, network: &'a FlowNetwork) -> Vec<&'a FlowEdge> {
        network
            .edges()
            .iter()
            .filter(|edge| self.contains(edge.from) && !self.contains(edge.to))
            .collect()
    }

    /// Total capacity of [`MinCut::cut_edges`]
    pub fn capacity(&self, network: &FlowNetwork) -> Capacity {
        // Bounded by the network's total capacity.
        self.cut_edges(network).iter().map(|edge| edge.capacity).sum()
    }
}

/// Ford-Fulkerson maximum flow solver
#[derive(Debug, Clone, Default)]
pub struct MaxFlowSolver {
    config: SolverConfig,
}

impl MaxFlowSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Compute a maximum flow from `source` to `sink`
    ///
    /// Endpoints are validated before any work is done. Every call starts
    /// from the zero flow and owns its flow assignment until it returns it.
    pub fn solve(
        &self,
        network: &FlowNetwork,
        source: NodeId,
        sink: NodeId,
    ) -> Result<MaxFlowResult, FlowError> {
        network.check_vertex(source)?;
        network.check_vertex(sink)?;
        if source == sink {
            return Err(FlowError::DegenerateEndpoints(source));
        }

        let mut profiler = AlgorithmProfiler::new();
        profiler.start();

        let mut flow = FlowAssignment::zeroed(network);
        let mut flow_paths = Vec::new();
        let mut value: Capacity = 0;
        let mut augmentations = 0usize;
        let mut phase = SolverPhase::Augmenting;

        while phase == SolverPhase::Augmenting {
            let residual = ResidualGraph::build(network, &flow);
            profiler.record_residual_build();

            let (path, explored) = path_search::search(&residual, source, sink);
            profiler.record_node_exploration(explored);

            let Some(path) = path else {
                phase = SolverPhase::Saturated;
                continue;
            };

            if let Some(limit) = self.config.augmentation_limit {
                if augmentations >= limit {
                    return Err(FlowError::AugmentationLimit { limit });
                }
            }

            let bottleneck = augment(network, &mut flow, &path)?;
            value = value
                .checked_add(bottleneck)
                .ok_or(FlowError::CapacityOverflow)?;
            augmentations += 1;
            profiler.record_step();

            debug!(
                "Augmentation {}: {} arcs, bottleneck {}, flow {}",
                augmentations,
                path.len(),
                bottleneck,
                value
            );

            if self.config.record_paths {
                flow_paths.push(FlowPath {
                    path: path.vertices,
                    flow: bottleneck,
                });
            }
        }

        profiler.stop();
        let metrics = profiler.get_metrics();
        info!(
            "Max flow {} -> {}: value {} after {} augmentations in {:?}",
            source, sink, value, metrics.steps_executed, metrics.execution_time
        );

        let result = MaxFlowResult {
            source,
            sink,
            value,
            flow,
            flow_paths,
            metrics,
        };

        if self.config.verify {
            self.verify(network, &result)?;
        }

        Ok(result)
    }

    /// Value of a maximum flow from `source` to `sink`
    pub fn max_flow_value(
        &self,
        network: &FlowNetwork,
        source: NodeId,
        sink: NodeId,
    ) -> Result<Capacity, FlowError> {
        self.solve(network, source, sink).map(|result| result.value)
    }

    /// Read the minimum cut off the residual graph of a final flow
    ///
    /// Returns the set of vertices reachable from `source`. Calling it again
    /// with the same flow yields the same cut.
    pub fn min_cut(
        &self,
        network: &FlowNetwork,
        source: NodeId,
        flow: &FlowAssignment,
    ) -> Result<MinCut, FlowError> {
        network.check_vertex(source)?;
        if flow.len() != network.edge_count() {
            return Err(FlowError::InvariantViolation(format!(
                "flow covers {} edges, network has {}",
                flow.len(),
                network.edge_count()
            )));
        }

        let residual = ResidualGraph::build(network, flow);
        let reachable = path_search::reachable_from(&residual, source, self.config.cut_traversal);
        Ok(MinCut::from_reachable(&reachable))
    }

    fn verify(&self, network: &FlowNetwork, result: &MaxFlowResult) -> Result<(), FlowError> {
        let cut = self.min_cut(network, result.source, &result.flow)?;
        let violations = FlowValidator::new(network).check_max_flow(
            &result.flow,
            result.source,
            result.sink,
            &cut,
        );

        if violations.is_empty() {
            Ok(())
        } else {
            let report = violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            Err(FlowError::InvariantViolation(report))
        }
    }
}

/// Push the path's bottleneck along it and return the amount pushed
///
/// Forward arcs add flow to their edge; backward arcs cancel flow on the
/// edge they were derived from. This is the only place flows change.
fn augment(
    network: &FlowNetwork,
    flow: &mut FlowAssignment,
    path: &AugmentingPath,
) -> Result<Capacity, FlowError> {
    let bottleneck = path
        .bottleneck()
        .ok_or(FlowError::DegenerateEndpoints(path.vertices[0]))?;

    for arc in &path.arcs {
        let current = flow.edge_flow(arc.edge);
        let capacity = network.edges()[arc.edge].capacity;
        let insufficient = FlowError::InsufficientCapacity {
            from: arc.from,
            to: arc.to,
        };

        let updated = match arc.direction {
            ArcDirection::Forward => {
                let raised = current
                    .checked_add(bottleneck)
                    .ok_or(FlowError::CapacityOverflow)?;
                if raised > capacity {
                    return Err(insufficient);
                }
                raised
            }
            ArcDirection::Backward => current.checked_sub(bottleneck).ok_or(insufficient)?,
        };
        flow.set(arc.edge, updated);
    }

    Ok(bottleneck)
}

impl Algorithm for MaxFlowSolver {
    fn name(&self) -> &'static str {
        "Ford-Fulkerson"
    }

    fn category(&self) -> &'static str {
        "max_flow"
    }

    fn description(&self) -> &'static str {
        "Depth-first augmenting paths over a freshly built residual graph, with the minimum cut read off the final residual graph."
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        match name {
            "record_paths" => self.config.record_paths = parse_flag(name, value)?,
            "verify" => self.config.verify = parse_flag(name, value)?,
            "augmentation_limit" => {
                self.config.augmentation_limit = match value {
                    "none" => None,
                    _ => Some(value.parse::<usize>().map_err(|_| {
                        AlgorithmError::invalid(name, "expected a non-negative integer or none")
                    })?),
                };
            }
            "cut_traversal" => {
                self.config.cut_traversal = match value {
                    "depth_first" => Traversal::DepthFirst,
                    "breadth_first" => Traversal::BreadthFirst,
                    _ => {
                        return Err(AlgorithmError::invalid(
                            name,
                            "expected depth_first or breadth_first",
                        ))
                    }
                };
            }
            _ => return Err(AlgorithmError::invalid(name, "unknown parameter")),
        }
        Ok(())
    }

    fn get_parameter(&self, name: &str) -> Option<String> {
        self.get_parameters().remove(name)
    }

    fn get_parameters(&self) -> HashMap<String, String> {
        let config = &self.config;
        let limit = config
            .augmentation_limit
            .map_or_else(|| "none".to_string(), |limit| limit.to_string());
        let traversal = match config.cut_traversal {
            Traversal::DepthFirst => "depth_first",
            Traversal::BreadthFirst => "breadth_first",
        };

        HashMap::from([
            ("record_paths".to_string(), config.record_paths.to_string()),
            ("augmentation_limit".to_string(), limit),
            ("cut_traversal".to_string(), traversal.to_string()),
            ("verify".to_string(), config.verify.to_string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> FlowNetwork {
        FlowNetwork::from_edges(4, [(0, 1, 3), (0, 2, 2), (1, 3, 2), (2, 3, 3)]).unwrap()
    }

    #[test]
    fn test_diamond_max_flow() {
        let network = diamond();
        let result = MaxFlowSolver::new().solve(&network, 0, 3).unwrap();

        assert_eq!(result.value, 4);
        assert_eq!(result.flow.flow_between(&network, 0, 1), 2);
        assert_eq!(result.flow.flow_between(&network, 0, 2), 2);
        assert_eq!(result.flow.flow_between(&network, 1, 3), 2);
        assert_eq!(result.flow.flow_between(&network, 2, 3), 2);
        assert_eq!(result.flow.value(&network, 0), Ok(4));
    }

    #[test]
    fn test_metrics_count_final_residual_build() {
        let network = diamond();
        let result = MaxFlowSolver::new().solve(&network, 0, 3).unwrap();

        assert_eq!(result.metrics.steps_executed, 2);
        assert_eq!(result.metrics.residual_builds, 3);
        assert!(result.flow_paths.is_empty());
    }

    #[test]
    fn test_recorded_paths_sum_to_value() {
        let network = diamond();
        let solver = MaxFlowSolver::with_config(SolverConfig {
            record_paths: true,
            ..SolverConfig::default()
        });
        let result = solver.solve(&network, 0, 3).unwrap();

        assert_eq!(result.flow_paths.len(), 2);
        assert_eq!(result.flow_paths[0], FlowPath { path: vec![0, 1, 3], flow: 2 });
        let pushed: Capacity = result.flow_paths.iter().map(|p| p.flow).sum();
        assert_eq!(pushed, result.value);
    }

    #[test]
    fn test_cancelling_flow_through_backward_arc() {
        // The first depth-first path is 0-1-2-3; reaching the optimum requires
        // pushing back along 1-2.
        let network =
            FlowNetwork::from_edges(4, [(0, 1, 1), (1, 2, 1), (0, 2, 1), (1, 3, 1), (2, 3, 1)])
                .unwrap();
        let solver = MaxFlowSolver::with_config(SolverConfig {
            record_paths: true,
            ..SolverConfig::default()
        });
        let result = solver.solve(&network, 0, 3).unwrap();

        assert_eq!(result.value, 2);
        assert_eq!(result.flow_paths[0].path, vec![0, 1, 2, 3]);
        assert_eq!(result.flow_paths[1].path, vec![0, 2, 1, 3]);
        assert_eq!(result.flow.flow_between(&network, 1, 2), 0);
    }

    #[test]
    fn test_path_graph_min_cut() {
        let network = FlowNetwork::from_edges(3, [(0, 1, 1), (1, 2, 1)]).unwrap();
        let solver = MaxFlowSolver::new();
        let result = solver.solve(&network, 0, 2).unwrap();
        let cut = solver.min_cut(&network, 0, &result.flow).unwrap();

        assert_eq!(result.value, 1);
        assert_eq!(cut.source_side(), &BTreeSet::from([0]));
        assert_eq!(cut.sink_side(), BTreeSet::from([1, 2]));
        assert_eq!(cut.capacity(&network), 1);
    }

    #[test]
    fn test_min_cut_is_idempotent() {
        let network = diamond();
        let solver = MaxFlowSolver::new();
        let result = solver.solve(&network, 0, 3).unwrap();

        let first = solver.min_cut(&network, 0, &result.flow).unwrap();
        let second = solver.min_cut(&network, 0, &result.flow).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.capacity(&network), result.value);
    }

    #[test]
    fn test_endpoint_validation() {
        let network = diamond();
        let solver = MaxFlowSolver::new();

        assert_eq!(
            solver.solve(&network, 2, 2).unwrap_err(),
            FlowError::DegenerateEndpoints(2)
        );
        assert_eq!(
            solver.solve(&network, 0, 4).unwrap_err(),
            FlowError::InvalidVertex { vertex: 4, vertex_count: 4 }
        );
    }

    #[test]
    fn test_disconnected_sink_has_zero_flow() {
        let network = FlowNetwork::from_edges(3, [(0, 1, 5)]).unwrap();
        let result = MaxFlowSolver::new().solve(&network, 0, 2).unwrap();

        assert_eq!(result.value, 0);
        assert_eq!(result.metrics.steps_executed, 0);
    }

    #[test]
    fn test_large_capacities_do_not_overflow() {
        let big = Capacity::MAX / 4;
        let network =
            FlowNetwork::from_edges(3, [(0, 1, big), (1, 2, big), (0, 2, big)]).unwrap();
        let result = MaxFlowSolver::new().solve(&network, 0, 2).unwrap();

        assert_eq!(result.value, 2 * big);
    }

    #[test]
    fn test_augmentation_limit() {
        let network = diamond();
        let solver = MaxFlowSolver::with_config(SolverConfig {
            augmentation_limit: Some(1),
            ..SolverConfig::default()
        });

        assert_eq!(
            solver.solve(&network, 0, 3).unwrap_err(),
            FlowError::AugmentationLimit { limit: 1 }
        );
    }

    #[test]
    fn test_verified_solve_succeeds() {
        let network = diamond();
        let solver = MaxFlowSolver::with_config(SolverConfig {
            verify: true,
            cut_traversal: Traversal::BreadthFirst,
            ..SolverConfig::default()
        });

        assert_eq!(solver.max_flow_value(&network, 0, 3), Ok(4));
    }

    #[test]
    fn test_min_cut_rejects_foreign_flow() {
        let network = diamond();
        let other = FlowNetwork::from_edges(2, [(0, 1, 1)]).unwrap();
        let flow = FlowAssignment::zeroed(&other);

        assert!(matches!(
            MaxFlowSolver::new().min_cut(&network, 0, &flow),
            Err(FlowError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_parameter_setting() {
        let mut solver = MaxFlowSolver::new();

        assert!(solver.set_parameter("record_paths", "true").is_ok());
        assert!(solver.set_parameter("augmentation_limit", "50").is_ok());
        assert!(solver.set_parameter("cut_traversal", "breadth_first").is_ok());
        assert_eq!(solver.get_parameter("augmentation_limit"), Some("50".to_string()));
        assert_eq!(solver.config().cut_traversal, Traversal::BreadthFirst);

        assert!(solver.set_parameter("augmentation_limit", "none").is_ok());
        assert_eq!(solver.config().augmentation_limit, None);

        assert!(solver.set_parameter("invalid_param", "value").is_err());
        assert!(solver.set_parameter("augmentation_limit", "-3").is_err());
        assert!(solver.set_parameter("cut_traversal", "sideways").is_err());
        assert_eq!(solver.name(), "Ford-Fulkerson");
        assert_eq!(solver.category(), "max_flow");
    }

    #[test]
    fn test_config_from_json() {
        let config = SolverConfig::from_json(
            r#"{"record_paths": true, "cut_traversal": "breadth_first"}"#,
        )
        .unwrap();

        assert!(config.record_paths);
        assert_eq!(config.cut_traversal, Traversal::BreadthFirst);
        assert_eq!(config.augmentation_limit, None);
        assert!(!config.verify);
        assert!(SolverConfig::from_json(r#"{"cut_traversal": "sideways"}"#).is_err());
    }
}
