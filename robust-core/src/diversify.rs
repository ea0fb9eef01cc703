//! Iterative solve-and-penalise loop producing diverse Steiner trees.
//!
//! Terminals are priced high enough that every connecting path pays for
//! itself, non-terminals receive a small fraction of the cheapest edge, and
//! each emitted tree scales down the prize of the non-terminals it used.

use std::{iter::FusedIterator, num::NonZeroUsize, sync::Arc, time::Instant};

use tracing::{debug, info, instrument};

use crate::{
    Result,
    builder::DiversifierParams,
    cost::EdgeCost,
    error::RobustError,
    index::VertexId,
    instance::InstanceModel,
    network::{Network, TerminalSet},
    solution_set::SolutionSet,
    solver::{PcstSolver, Pruning, RootMode, Selection, SolverInput},
    tree::Tree,
};

/// Entry point for diversified tree generation.
///
/// # Examples
/// ```
/// use robust_core::{
///     DiversifierBuilder, EdgeCostPolicy, EdgeId, Network, PcstSolver, Selection,
///     SolverError, SolverInput, TerminalSet, VertexId,
/// };
///
/// // Always answers with the single edge a-b.
/// struct FirstEdge;
///
/// impl PcstSolver for FirstEdge {
///     fn name(&self) -> &str { "first-edge" }
///     fn solve(&self, _: &SolverInput<'_>) -> Result<Selection, SolverError> {
///         Ok(Selection {
///             vertices: vec![VertexId::new(0), VertexId::new(1)],
///             edges: vec![EdgeId::new(0)],
///         })
///     }
/// }
///
/// let network = Network::from_edges([("a", "b"), ("b", "c")]);
/// let terminals = TerminalSet::new(["a", "b"])?;
/// let diversifier = DiversifierBuilder::new().build()?;
/// let solutions = diversifier.run(&network, &terminals, &EdgeCostPolicy::Uniform, &FirstEdge)?;
/// assert_eq!(solutions.len(), 1);
/// # Ok::<(), robust_core::RobustError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Diversifier {
    params: DiversifierParams,
}

impl Diversifier {
    pub(crate) fn new(params: DiversifierParams) -> Self {
        Self { params }
    }

    /// Returns the validated parameters.
    #[must_use]
    #[rustfmt::skip]
    pub fn params(&self) -> &DiversifierParams { &self.params }

    /// Prepares the instance and returns the unbounded stream of trees.
    ///
    /// Terminal prizes are set to `m · d · max_cost` and non-terminal prizes
    /// to `f · min_cost` before the first solve.
    ///
    /// # Errors
    /// Returns [`RobustError::EmptyNetwork`], [`RobustError::NoEdges`],
    /// [`RobustError::EmptyTerminals`] or [`RobustError::UnknownTerminal`]
    /// for degenerate input, and any error raised while building the
    /// [`InstanceModel`].
    #[instrument(
        name = "diversify.trees",
        err,
        skip_all,
        fields(
            vertices = network.vertex_count(),
            edges = network.edge_count(),
            terminals = terminals.len(),
            solver = %solver.name(),
        ),
    )]
    pub fn trees<'s, C, S>(
        &self,
        network: &Network,
        terminals: &TerminalSet,
        cost: &C,
        solver: &'s S,
    ) -> Result<DiverseTrees<'s, S>>
    where
        C: EdgeCost + ?Sized,
        S: PcstSolver + ?Sized,
    {
        if network.vertex_count() == 0 {
            return Err(RobustError::EmptyNetwork);
        }
        if network.edge_count() == 0 {
            return Err(RobustError::NoEdges);
        }
        if terminals.is_empty() {
            return Err(RobustError::EmptyTerminals);
        }
        terminals.check_subset_of(network)?;

        let mut instance = InstanceModel::new(network, cost)?;
        let (Some(min_cost), Some(max_cost)) = (instance.min_cost(), instance.max_cost()) else {
            return Err(RobustError::NoEdges);
        };
        let terminal_prize =
            self.params.terminal_prize_multiple * self.params.graph_diameter * max_cost;
        let steiner_prize = self.params.initial_fraction * min_cost;

        let is_terminal: Vec<bool> = instance
            .vertex_index()
            .iter()
            .map(|(_, label)| terminals.contains(label))
            .collect();
        let initial: Vec<(Arc<str>, f64)> = instance
            .vertex_index()
            .iter()
            .zip(&is_terminal)
            .map(|((_, label), &terminal)| {
                let prize = if terminal { terminal_prize } else { steiner_prize };
                (Arc::clone(label), prize)
            })
            .collect();
        instance.update_vertex_prizes(initial)?;

        debug!(
            min_cost,
            max_cost, terminal_prize, steiner_prize, "initial prizes assigned"
        );
        Ok(DiverseTrees {
            instance,
            is_terminal,
            terminal_count: terminals.len(),
            solver,
            solver_name: Arc::from(solver.name()),
            reduction_factor: self.params.reduction_factor,
            iterations: 0,
            failed: false,
        })
    }

    /// Collects up to `target_count` distinct trees.
    ///
    /// Stops early, without keeping it, at the first tree whose vertex set
    /// was already collected.
    ///
    /// # Errors
    /// Propagates every error from [`Self::trees`] and from the stream.
    #[instrument(
        name = "diversify.run",
        err,
        skip_all,
        fields(target = self.params.target_count.get(), solver = %solver.name()),
    )]
    pub fn run<C, S>(
        &self,
        network: &Network,
        terminals: &TerminalSet,
        cost: &C,
        solver: &S,
    ) -> Result<SolutionSet>
    where
        C: EdgeCost + ?Sized,
        S: PcstSolver + ?Sized,
    {
        let mut stream = self.trees(network, terminals, cost, solver)?;
        let mut solutions = SolutionSet::new(terminals.clone());
        let target = self.params.target_count;
        let mut repeated = false;
        while solutions.len() < target.get() {
            let Some(tree) = stream.next() else {
                break;
            };
            if !solutions.insert(tree?) {
                repeated = true;
                break;
            }
        }
        info!(
            trees = solutions.len(),
            iterations = stream.iterations(),
            repeated,
            "diversification completed"
        );
        Ok(solutions)
    }
}

/// Unbounded stream of trees produced by [`Diversifier::trees`].
///
/// Each call to [`Iterator::next`] solves the current instance, validates
/// the selection, and penalises the non-terminals of the emitted tree. The
/// stream never ends on its own; after the first error it yields `None`.
///
/// The penalty is applied before `next` returns, so [`DiverseTrees::instance`]
/// already shows the reduced prizes of the tree just received.
pub struct DiverseTrees<'s, S: ?Sized> {
    instance: InstanceModel,
    is_terminal: Vec<bool>,
    terminal_count: usize,
    solver: &'s S,
    solver_name: Arc<str>,
    reduction_factor: f64,
    iterations: usize,
    failed: bool,
}

impl<S> DiverseTrees<'_, S>
where
    S: PcstSolver + ?Sized,
{
    /// Returns the instance in its current, partially penalised state.
    #[must_use]
    #[rustfmt::skip]
    pub fn instance(&self) -> &InstanceModel { &self.instance }

    /// Returns the number of trees emitted so far.
    #[must_use]
    #[rustfmt::skip]
    pub fn iterations(&self) -> usize { self.iterations }

    #[instrument(
        name = "diversify.solve",
        err,
        skip(self),
        fields(iteration = self.iterations, solver = %self.solver_name),
    )]
    fn solve(&self) -> Result<Selection> {
        let input = SolverInput {
            edges: self.instance.edges(),
            prizes: self.instance.prizes(),
            costs: self.instance.costs(),
            root: RootMode::Unrooted,
            clusters: NonZeroUsize::MIN,
            pruning: Pruning::Strong,
        };
        let started = Instant::now();
        let selection = self
            .solver
            .solve(&input)
            .map_err(|error| RobustError::Solver {
                solver: Arc::clone(&self.solver_name),
                error,
            })?;
        record_solve(started);
        Ok(selection)
    }

    fn step(&mut self) -> Result<Tree> {
        let selection = self.solve()?;
        let tree = Tree::from_selection(&self.instance, &selection).map_err(|err| match err {
            RobustError::InvalidTree { reason } => RobustError::SolverContract {
                solver: Arc::clone(&self.solver_name),
                reason,
            },
            other => other,
        })?;

        let mut penalised = 0_usize;
        for &id in &selection.vertices {
            if !self.terminal(id) {
                self.instance.scale_prize(id, self.reduction_factor)?;
                penalised += 1;
            }
        }
        self.iterations += 1;
        record_penalised(penalised);

        let covered = tree.vertex_count() - penalised;
        debug!(
            iteration = self.iterations,
            vertices = tree.vertex_count(),
            covered_terminals = covered,
            terminals = self.terminal_count,
            penalised,
            "tree emitted"
        );
        Ok(tree)
    }

    fn terminal(&self, id: VertexId) -> bool {
        self.is_terminal.get(id.get()).copied().unwrap_or(false)
    }
}

impl<S> Iterator for DiverseTrees<'_, S>
where
    S: PcstSolver + ?Sized,
{
    type Item = Result<Tree>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.step();
        self.failed = result.is_err();
        Some(result)
    }
}

impl<S> FusedIterator for DiverseTrees<'_, S> where S: PcstSolver + ?Sized {}

impl<S: ?Sized> std::fmt::Debug for DiverseTrees<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiverseTrees")
            .field("solver", &self.solver_name)
            .field("iterations", &self.iterations)
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "metrics")]
fn record_solve(started: Instant) {
    metrics::counter!("diversify_solves_total").increment(1);
    metrics::histogram!("diversify_solve_latency_seconds")
        .record(started.elapsed().as_secs_f64());
}

#[cfg(not(feature = "metrics"))]
fn record_solve(_started: Instant) {}

#[cfg(feature = "metrics")]
fn record_penalised(count: usize) {
    metrics::counter!("diversify_penalised_vertices_total").increment(count as u64);
}

#[cfg(not(feature = "metrics"))]
fn record_penalised(_count: usize) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DiversifierBuilder, EdgeCostPolicy,
        test_utils::{ScriptedSolver, path_network},
    };
    use rstest::rstest;

    #[rstest]
    fn initial_prizes_follow_cost_extremes() {
        let network = Network::from_edges([("a", "b"), ("b", "c")]);
        let terminals = TerminalSet::new(["a"]).expect("non-empty");
        let cost = |left: &str, right: &str| if left == "c" || right == "c" { 4.0 } else { 2.0 };
        let diversifier = DiversifierBuilder::new()
            .with_initial_fraction(0.5)
            .with_terminal_prize_multiple(3.0)
            .with_graph_diameter(2.0)
            .build()
            .expect("parameters are valid");
        let solver = ScriptedSolver::new(Vec::new());
        let stream = diversifier
            .trees(&network, &terminals, &cost, &solver)
            .expect("input is valid");
        // terminal: 3 · 2 · 4; others: 0.5 · 2
        assert_eq!(stream.instance().prizes(), [24.0, 1.0, 1.0]);
        assert_eq!(stream.iterations(), 0);
    }

    #[rstest]
    fn penalises_only_non_terminals_of_emitted_tree() {
        let network = path_network();
        let terminals = TerminalSet::new(["a", "c"]).expect("non-empty");
        let solver = ScriptedSolver::repeating(&[0, 1, 2], &[0, 1]);
        let diversifier = DiversifierBuilder::new()
            .with_reduction_factor(0.5)
            .build()
            .expect("parameters are valid");
        let mut stream = diversifier
            .trees(&network, &terminals, &EdgeCostPolicy::Uniform, &solver)
            .expect("input is valid");
        let before = stream.instance().prizes().to_vec();
        stream
            .next()
            .expect("stream is unbounded")
            .expect("selection is a tree");
        let after = stream.instance().prizes();
        assert_eq!(after[0], before[0]);
        assert_eq!(after[1], before[1] * 0.5);
        assert_eq!(after[2], before[2]);
        assert_eq!(after[3], before[3]);
        assert_eq!(after[4], before[4]);
    }

    #[rstest]
    fn solver_sees_penalties_from_previous_iteration() {
        let network = path_network();
        let terminals = TerminalSet::new(["a", "e"]).expect("non-empty");
        let solver = ScriptedSolver::repeating(&[0, 1, 2, 3, 4], &[0, 1, 2, 3]);
        let diversifier = DiversifierBuilder::new()
            .with_initial_fraction(0.1)
            .with_reduction_factor(0.5)
            .with_graph_diameter(4.0)
            .build()
            .expect("parameters are valid");
        let stream = diversifier
            .trees(&network, &terminals, &EdgeCostPolicy::Uniform, &solver)
            .expect("input is valid");
        let trees: Vec<Tree> = stream
            .take(3)
            .collect::<Result<_>>()
            .expect("selections are trees");
        assert_eq!(trees.len(), 3);

        let seen = solver.seen_prizes();
        assert_eq!(seen[0], [8.0, 0.1, 0.1, 0.1, 8.0]);
        assert_eq!(seen[1], [8.0, 0.05, 0.05, 0.05, 8.0]);
        assert_eq!(seen[2], [8.0, 0.025, 0.025, 0.025, 8.0]);
    }

    #[rstest]
    fn solver_failure_is_wrapped_with_solver_name() {
        let network = path_network();
        let terminals = TerminalSet::new(["a"]).expect("non-empty");
        let solver = ScriptedSolver::new(Vec::new());
        let diversifier = DiversifierBuilder::new().build().expect("defaults are valid");
        let err = diversifier
            .run(&network, &terminals, &EdgeCostPolicy::Uniform, &solver)
            .expect_err("exhausted script fails");
        assert_eq!(err.code().as_str(), "ROBUST_SOLVER_FAILURE");
        assert_eq!(err.solver_code().map(|code| code.as_str()), Some("SOLVER_BACKEND"));
    }

    #[rstest]
    fn stream_fuses_after_contract_violation() {
        let network = path_network();
        let terminals = TerminalSet::new(["a"]).expect("non-empty");
        // two vertices without a connecting edge
        let solver = ScriptedSolver::repeating(&[0, 4], &[]);
        let diversifier = DiversifierBuilder::new().build().expect("defaults are valid");
        let mut stream = diversifier
            .trees(&network, &terminals, &EdgeCostPolicy::Uniform, &solver)
            .expect("input is valid");
        let err = stream
            .next()
            .expect("first item is the error")
            .expect_err("selection is a forest");
        assert!(matches!(err, RobustError::SolverContract { ref solver, .. } if &**solver == "scripted"));
        assert!(stream.next().is_none());
        assert_eq!(stream.iterations(), 0);
    }
}
