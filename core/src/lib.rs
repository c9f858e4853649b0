//! Flowmatch computational core
//!
//! Maximum flow by depth-first augmenting paths over explicit residual
//! graphs, minimum s-t cuts read off the final residual graph, and maximum
//! bipartite matching by reduction to maximum flow.
//!
//! ```
//! use flowmatch_core::{FlowNetwork, MaxFlowSolver};
//!
//! let network = FlowNetwork::from_edges(4, [(0, 1, 3), (0, 2, 2), (1, 3, 2), (2, 3, 3)])?;
//! let solver = MaxFlowSolver::new();
//! let result = solver.solve(&network, 0, 3)?;
//! let cut = solver.min_cut(&network, 0, &result.flow)?;
//!
//! assert_eq!(result.value, 4);
//! assert_eq!(cut.capacity(&network), result.value);
//! # Ok::<(), flowmatch_core::FlowError>(())
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod data_structures;
pub mod validation;

pub use crate::algorithm::graph::{
    BipartiteMatcher, Coloring, FlowAssignment, FlowError, Matching, MatchingError,
    MaxFlowResult, MaxFlowSolver, MinCut, SolverConfig,
};
pub use crate::algorithm::traits::{Algorithm, AlgorithmError, NodeId};
pub use crate::data_structures::graph::{Capacity, FlowNetwork};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
