use std::num::NonZeroUsize;

use robust_core::{EdgeKey, Pruning, RootMode, Selection, SolverInput, VertexId};

/// Owned instance from which borrowed solver inputs are derived.
#[derive(Debug)]
pub(crate) struct Instance {
    edges: Vec<EdgeKey>,
    costs: Vec<f64>,
    pub(crate) prizes: Vec<f64>,
}

impl Instance {
    pub(crate) fn new(edges: &[(usize, usize, f64)], prizes: &[f64]) -> Self {
        Self {
            edges: edges
                .iter()
                .map(|&(left, right, _)| EdgeKey::new(VertexId::new(left), VertexId::new(right)))
                .collect(),
            costs: edges.iter().map(|&(_, _, cost)| cost).collect(),
            prizes: prizes.to_vec(),
        }
    }

    /// Five-vertex unit path with prizes on the ends.
    pub(crate) fn path(end_prize: f64, inner_prize: f64) -> Self {
        Self::new(
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0)],
            &[end_prize, inner_prize, inner_prize, inner_prize, end_prize],
        )
    }

    pub(crate) fn input(&self, pruning: Pruning) -> SolverInput<'_> {
        SolverInput {
            edges: &self.edges,
            prizes: &self.prizes,
            costs: &self.costs,
            root: RootMode::Unrooted,
            clusters: NonZeroUsize::MIN,
            pruning,
        }
    }
}

/// Selected vertex and edge ids, each sorted.
pub(crate) fn sorted_ids(selection: &Selection) -> (Vec<usize>, Vec<usize>) {
    let mut vertices: Vec<usize> = selection.vertices.iter().map(|id| id.get()).collect();
    let mut edges: Vec<usize> = selection.edges.iter().map(|id| id.get()).collect();
    vertices.sort_unstable();
    edges.sort_unstable();
    (vertices, edges)
}
