//! Benchmark parameter types.

use std::fmt;

/// Parameters for a diversification benchmark run.
#[derive(Clone, Debug)]
pub struct DiversifyBenchParams {
    /// Number of vertices in the network.
    pub vertex_count: usize,
    /// Number of seed vertices.
    pub terminal_count: usize,
    /// Maximum number of trees collected.
    pub target_count: usize,
}

impl fmt::Display for DiversifyBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={},t={},k={}",
            self.vertex_count, self.terminal_count, self.target_count
        )
    }
}

/// Parameters for a single-solve benchmark run.
#[derive(Clone, Debug)]
pub struct SolverBenchParams {
    /// Number of vertices in the network.
    pub vertex_count: usize,
    /// Pruning applied by the solver.
    pub pruning: &'static str,
}

impl fmt::Display for SolverBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},{}", self.vertex_count, self.pruning)
    }
}
