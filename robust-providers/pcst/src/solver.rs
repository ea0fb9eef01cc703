//! [`PcstSolver`] implementation combining growth, pruning, and cluster
//! ranking.

use robust_core::{
    EdgeId, PcstSolver, RootMode, Selection, SolverError, SolverInput, VertexId,
};
use tracing::{debug, instrument, warn};

use crate::{
    graph::Graph,
    growth::grow,
    prune::{Cluster, prune},
};

/// Deterministic greedy prize-collecting Steiner tree solver.
///
/// One tree is grown per connected component, from its highest-prize vertex
/// (or from the root in rooted mode). Trees are pruned, ranked by prize minus
/// cost, and the best `clusters` are returned together.
///
/// In unrooted mode a component whose seed carries the instance's maximum
/// prize is never dropped: when more such components exist than `clusters`,
/// the solve fails with [`SolverError::Disconnected`].
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// use robust_core::{EdgeKey, PcstSolver, Pruning, RootMode, SolverInput, VertexId};
/// use robust_providers_pcst::GrowthSolver;
///
/// let edges = [
///     EdgeKey::new(VertexId::new(0), VertexId::new(1)),
///     EdgeKey::new(VertexId::new(1), VertexId::new(2)),
/// ];
/// let input = SolverInput {
///     edges: &edges,
///     prizes: &[5.0, 0.0, 5.0],
///     costs: &[1.0, 1.0],
///     root: RootMode::Unrooted,
///     clusters: NonZeroUsize::MIN,
///     pruning: Pruning::Strong,
/// };
/// let selection = GrowthSolver::new().solve(&input)?;
/// assert_eq!(selection.vertices.len(), 3);
/// assert_eq!(selection.edges.len(), 2);
/// # Ok::<(), robust_core::SolverError>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct GrowthSolver;

impl GrowthSolver {
    /// Creates the solver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PcstSolver for GrowthSolver {
    fn name(&self) -> &str {
        "growth"
    }

    #[instrument(
        name = "pcst.solve",
        err,
        skip_all,
        fields(
            vertices = input.prizes.len(),
            edges = input.edges.len(),
            pruning = ?input.pruning,
            clusters = input.clusters.get(),
        ),
    )]
    fn solve(&self, input: &SolverInput<'_>) -> Result<Selection, SolverError> {
        input.validate()?;
        let graph = Graph::new(input);

        let mut clusters: Vec<Cluster> = match input.root {
            RootMode::Rooted(root) => vec![cluster_from(&graph, root.get(), input)],
            RootMode::Unrooted => graph
                .components()
                .iter()
                .filter_map(|component| {
                    let seed = best_seed(&graph, component)?;
                    Some(if component.len() == 1 {
                        Cluster::singleton(&graph, seed)
                    } else {
                        cluster_from(&graph, seed, input)
                    })
                })
                .collect(),
        };
        let candidates = clusters.len();
        if input.root == RootMode::Unrooted {
            check_anchored(&graph, &clusters, input.clusters.get())?;
        }
        clusters.sort_by(|left, right| {
            right
                .net_value
                .total_cmp(&left.net_value)
                .then_with(|| left.seed.cmp(&right.seed))
        });
        clusters.truncate(input.clusters.get());
        debug!(
            candidates,
            returned = clusters.len(),
            "clusters ranked"
        );

        let mut selection = Selection::default();
        for cluster in clusters {
            selection
                .vertices
                .extend(cluster.vertices.into_iter().map(VertexId::new));
            selection
                .edges
                .extend(cluster.edges.into_iter().map(EdgeId::new));
        }
        Ok(selection)
    }
}

/// Fails when components seeded at the maximum prize outnumber `requested`.
fn check_anchored(
    graph: &Graph<'_>,
    clusters: &[Cluster],
    requested: usize,
) -> Result<(), SolverError> {
    let top = graph.max_prize();
    if top <= 0.0 {
        return Ok(());
    }
    let components = clusters
        .iter()
        .filter(|cluster| graph.prize(cluster.seed) >= top)
        .count();
    if components > requested {
        warn!(components, requested, "top-prize components would be dropped");
        return Err(SolverError::Disconnected {
            components,
            requested,
        });
    }
    Ok(())
}

fn cluster_from(graph: &Graph<'_>, seed: usize, input: &SolverInput<'_>) -> Cluster {
    prune(graph, &grow(graph, seed), input.pruning)
}

/// Highest-prize vertex of `component`, lowest id on ties.
fn best_seed(graph: &Graph<'_>, component: &[usize]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for &vertex in component {
        if best.is_none_or(|current| graph.prize(vertex) > graph.prize(current)) {
            best = Some(vertex);
        }
    }
    best
}
