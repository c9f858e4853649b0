//! Flow and matching algorithms over capacitated graphs
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod residual;
pub mod path_search;
pub mod max_flow;
pub mod matching;

pub use self::residual::{ArcDirection, ResidualArc, ResidualGraph};
pub use self::path_search::{find_path, reachable_from, AugmentingPath, Traversal};
pub use self::max_flow::{
    FlowAssignment, FlowError, FlowPath, MaxFlowResult, MaxFlowSolver, MinCut, SolverConfig,
    SolverPhase,
};
pub use self::matching::{BipartiteMatcher, Color, Coloring, Matching, MatchingError};
