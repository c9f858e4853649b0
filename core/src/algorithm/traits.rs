//! Core algorithm trait definitions
//!
//! Every solver in this crate exposes the same small surface: a name, a
//! category, a description and a string-keyed parameter interface that maps
//! onto its typed configuration. Execution metrics are gathered through
//! [`AlgorithmProfiler`].
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;
use std::fmt::Debug;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Vertex identifier; identity is positional in `[0, n)`
pub type NodeId = usize;

/// Errors raised by the parameter interface
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlgorithmError {
    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl AlgorithmError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Execution metrics of a single run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmMetrics {
    /// Augmentations applied
    pub steps_executed: usize,
    /// Residual graphs built, including the final one that proved saturation
    pub residual_builds: usize,
    /// Vertices entered by augmenting-path searches
    pub nodes_explored: usize,
    pub execution_time: Duration,
}

/// Common surface of the solvers
pub trait Algorithm: Debug {
    /// Returns the algorithm's descriptive name
    fn name(&self) -> &'static str;

    /// Returns the algorithm's category (e.g. max_flow, matching)
    fn category(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Sets a parameter from its string form, validating name and value
    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError>;

    /// Gets a parameter in its string form
    fn get_parameter(&self, name: &str) -> Option<String>;

    /// All parameters with their current values
    fn get_parameters(&self) -> HashMap<String, String>;
}

/// Collects [`AlgorithmMetrics`] while a solver runs
#[derive(Debug, Default)]
pub struct AlgorithmProfiler {
    metrics: AlgorithmMetrics,
    start_time: Option<Instant>,
}

impl AlgorithmProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.metrics.execution_time = start.elapsed();
        }
    }

    pub fn record_step(&mut self) {
        self.metrics.steps_executed += 1;
    }

    pub fn record_residual_build(&mut self) {
        self.metrics.residual_builds += 1;
    }

    pub fn record_node_exploration(&mut self, count: usize) {
        self.metrics.nodes_explored += count;
    }

    pub fn get_metrics(&self) -> AlgorithmMetrics {
        self.metrics.clone()
    }
}

/// Parses a boolean parameter value
pub(crate) fn parse_flag(name: &str, value: &str) -> Result<bool, AlgorithmError> {
    value
        .parse::<bool>()
        .map_err(|_| AlgorithmError::invalid(name, "expected true or false"))
}
