use std::num::NonZeroUsize;

use robust_core::{
    Network, PcstSolver, Selection, SolverError, SolverInput, TerminalSet, Tree,
};
use robust_providers_pcst::GrowthSolver;

pub fn network(edges: &[(&str, &str)]) -> Network {
    Network::from_edges(edges.iter().copied())
}

pub fn terminals(labels: &[&str]) -> TerminalSet {
    TerminalSet::new(labels.iter().copied()).expect("fixture terminals are non-empty")
}

/// Sorted vertex labels of `tree`.
pub fn labels(tree: &Tree) -> Vec<String> {
    tree.vertex_set().iter().map(|label| label.to_string()).collect()
}

/// Growth solver that ignores the requested cluster count and returns up to
/// `clusters` trees at once.
pub struct ForestSolver {
    pub clusters: NonZeroUsize,
}

impl PcstSolver for ForestSolver {
    fn name(&self) -> &str {
        "forest"
    }

    fn solve(&self, input: &SolverInput<'_>) -> Result<Selection, SolverError> {
        let widened = SolverInput {
            clusters: self.clusters,
            ..*input
        };
        GrowthSolver::new().solve(&widened)
    }
}
