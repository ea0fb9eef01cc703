//! Seam between the diversification engine and a prize-collecting Steiner
//! tree solver.
//!
//! The engine hands a solver borrowed views of the [`crate::InstanceModel`]
//! arrays and receives vertex and edge ids back. Solvers live in provider
//! crates; the core only depends on this trait.

use std::num::NonZeroUsize;

use crate::{
    error::SolverError,
    index::{EdgeId, EdgeKey, VertexId},
};

/// Whether the solver may choose its own root.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RootMode {
    /// The solver picks the best tree anywhere in the graph.
    #[default]
    Unrooted,
    /// The tree must contain the given vertex.
    Rooted(VertexId),
}

/// Post-processing strictness applied to a grown tree.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Pruning {
    /// Keep the tree as grown.
    None,
    /// Drop leaves worth less than their attaching edge.
    Simple,
    /// Drop every subtree whose prizes do not pay for its edges.
    #[default]
    Strong,
}

/// Borrowed numeric instance passed to [`PcstSolver::solve`].
#[derive(Clone, Copy, Debug)]
pub struct SolverInput<'a> {
    /// Edges as canonical vertex-id pairs; position equals [`EdgeId`].
    pub edges: &'a [EdgeKey],
    /// Per-vertex prizes indexed by [`VertexId`].
    pub prizes: &'a [f64],
    /// Per-edge costs indexed by [`EdgeId`].
    pub costs: &'a [f64],
    /// Root constraint.
    pub root: RootMode,
    /// Number of trees to return.
    pub clusters: NonZeroUsize,
    /// Pruning strictness.
    pub pruning: Pruning,
}

impl SolverInput<'_> {
    /// Checks array lengths, endpoint ranges, weights, and the root.
    ///
    /// Solvers may call this before doing any work.
    ///
    /// # Errors
    /// Returns the first [`SolverError`] found.
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.prizes.is_empty() {
            return Err(SolverError::EmptyInstance);
        }
        if self.edges.len() != self.costs.len() {
            return Err(SolverError::CostLengthMismatch {
                edges: self.edges.len(),
                costs: self.costs.len(),
            });
        }
        let vertices = self.prizes.len();
        for (edge, key) in self.edges.iter().enumerate() {
            for vertex in [key.low(), key.high()] {
                if vertex.get() >= vertices {
                    return Err(SolverError::EndpointOutOfRange {
                        edge,
                        vertex: vertex.get(),
                        vertices,
                    });
                }
            }
        }
        check_weights("prize", self.prizes)?;
        check_weights("cost", self.costs)?;
        if let RootMode::Rooted(root) = self.root
            && root.get() >= vertices
        {
            return Err(SolverError::RootOutOfRange {
                root: root.get(),
                vertices,
            });
        }
        Ok(())
    }
}

fn check_weights(kind: &'static str, values: &[f64]) -> Result<(), SolverError> {
    match values
        .iter()
        .enumerate()
        .find(|(_, value)| !value.is_finite() || **value < 0.0)
    {
        Some((index, &value)) => Err(SolverError::InvalidWeight { kind, index, value }),
        None => Ok(()),
    }
}

/// Vertex and edge ids chosen by a solver.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Selection {
    /// Selected vertices.
    pub vertices: Vec<VertexId>,
    /// Selected edges.
    pub edges: Vec<EdgeId>,
}

/// A prize-collecting Steiner tree solver.
///
/// Implementations must be deterministic for the engine to be; the engine
/// never retries a failed call.
///
/// # Examples
/// ```
/// use robust_core::{PcstSolver, Selection, SolverError, SolverInput, VertexId};
///
/// struct Singleton;
///
/// impl PcstSolver for Singleton {
///     fn name(&self) -> &str { "singleton" }
///     fn solve(&self, input: &SolverInput<'_>) -> Result<Selection, SolverError> {
///         input.validate()?;
///         Ok(Selection { vertices: vec![VertexId::new(0)], edges: Vec::new() })
///     }
/// }
///
/// assert_eq!(Singleton.name(), "singleton");
/// ```
pub trait PcstSolver {
    /// Returns a short name used in logs and errors.
    fn name(&self) -> &str;

    /// Solves the instance.
    ///
    /// # Errors
    /// Returns [`SolverError`] when the input is malformed or the backend
    /// fails.
    fn solve(&self, input: &SolverInput<'_>) -> Result<Selection, SolverError>;
}

impl<S> PcstSolver for &S
where
    S: PcstSolver + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&self, input: &SolverInput<'_>) -> Result<Selection, SolverError> {
        (**self).solve(input)
    }
}
