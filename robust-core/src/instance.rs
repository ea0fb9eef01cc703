//! Numeric PCST instance with cheap point updates.
//!
//! Building the indices and evaluating the cost policy is the expensive part
//! of preparing a solve, so an [`InstanceModel`] is built once per run and
//! afterwards only mutated through [`InstanceModel::update_vertex_prizes`] and
//! [`InstanceModel::update_edge_costs`]. Array lengths never change.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    Result,
    cost::EdgeCost,
    error::{IndexError, RobustError},
    index::{EdgeId, EdgeIndex, EdgeKey, VertexId, VertexIndex},
    network::Network,
};

/// Edge list, per-edge costs, and per-vertex prizes in solver-ready form.
///
/// # Examples
/// ```
/// use robust_core::{EdgeCostPolicy, InstanceModel, Network};
///
/// let network = Network::from_edges([("a", "b"), ("b", "c")]);
/// let mut instance = InstanceModel::new(&network, &EdgeCostPolicy::Uniform)?;
/// assert_eq!(instance.costs(), [1.0, 1.0]);
/// assert_eq!(instance.prizes(), [0.0, 0.0, 0.0]);
///
/// instance.update_vertex_prizes([("b", 4.0)])?;
/// assert_eq!(instance.vertex_prize("b")?, 4.0);
/// # Ok::<(), robust_core::RobustError>(())
/// ```
#[derive(Clone, Debug)]
pub struct InstanceModel {
    vertices: VertexIndex,
    edge_index: EdgeIndex,
    costs: Vec<f64>,
    prizes: Vec<f64>,
}

impl InstanceModel {
    /// Builds an instance with every prize set to zero.
    ///
    /// # Errors
    /// See [`Self::build`].
    pub fn new<C>(network: &Network, cost: &C) -> Result<Self>
    where
        C: EdgeCost + ?Sized,
    {
        Self::build(network, cost, |_| 0.0)
    }

    /// Builds an instance, evaluating `cost` exactly once per unique edge and
    /// `initial_prize` once per vertex.
    ///
    /// # Errors
    /// Returns [`RobustError::InvalidEdgeCost`] or [`RobustError::InvalidPrize`]
    /// when a produced value is negative or non-finite.
    #[instrument(
        name = "instance.build",
        err,
        skip(network, cost, initial_prize),
        fields(vertices = network.vertex_count(), edges = network.edge_count()),
    )]
    pub fn build<C, P>(network: &Network, cost: &C, initial_prize: P) -> Result<Self>
    where
        C: EdgeCost + ?Sized,
        P: Fn(&str) -> f64,
    {
        let vertices = VertexIndex::new(network.vertices().iter().cloned());
        let edge_index = EdgeIndex::new(network, &vertices)?;

        let mut costs = Vec::with_capacity(edge_index.len());
        for key in edge_index.keys() {
            let left = vertices.label(key.low())?;
            let right = vertices.label(key.high())?;
            let value = cost.cost(left, right);
            if !is_admissible(value) {
                return Err(RobustError::InvalidEdgeCost {
                    left: Arc::clone(left),
                    right: Arc::clone(right),
                    cost: value,
                });
            }
            costs.push(value);
        }

        let mut prizes = Vec::with_capacity(vertices.len());
        for (_, label) in vertices.iter() {
            let value = initial_prize(label);
            if !is_admissible(value) {
                return Err(RobustError::InvalidPrize {
                    label: Arc::clone(label),
                    prize: value,
                });
            }
            prizes.push(value);
        }

        debug!(
            vertices = prizes.len(),
            edges = costs.len(),
            "instance arrays built"
        );
        Ok(Self {
            vertices,
            edge_index,
            costs,
            prizes,
        })
    }

    /// Returns the vertex index used by this instance.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertex_index(&self) -> &VertexIndex { &self.vertices }

    /// Returns the edge index used by this instance.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_index(&self) -> &EdgeIndex { &self.edge_index }

    /// Returns the edges as canonical id pairs; position equals [`EdgeId`].
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[EdgeKey] { self.edge_index.keys() }

    /// Returns the per-edge costs.
    #[must_use]
    #[rustfmt::skip]
    pub fn costs(&self) -> &[f64] { &self.costs }

    /// Returns the per-vertex prizes.
    #[must_use]
    #[rustfmt::skip]
    pub fn prizes(&self) -> &[f64] { &self.prizes }

    /// Returns the number of vertices.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertex_count(&self) -> usize { self.prizes.len() }

    /// Returns the number of edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_count(&self) -> usize { self.costs.len() }

    /// Returns the smallest edge cost, or `None` without edges.
    #[must_use]
    pub fn min_cost(&self) -> Option<f64> {
        self.costs.iter().copied().reduce(f64::min)
    }

    /// Returns the largest edge cost, or `None` without edges.
    #[must_use]
    pub fn max_cost(&self) -> Option<f64> {
        self.costs.iter().copied().reduce(f64::max)
    }

    /// Returns the prize of `label`.
    ///
    /// # Errors
    /// Returns [`RobustError::Index`] when `label` is unknown.
    pub fn vertex_prize(&self, label: &str) -> Result<f64> {
        let id = self.vertices.id(label)?;
        self.prize_of(id)
    }

    /// Returns the prize of the vertex with id `id`.
    ///
    /// # Errors
    /// Returns [`RobustError::Index`] when `id` is out of range.
    pub fn prize_of(&self, id: VertexId) -> Result<f64> {
        self.prizes.get(id.get()).copied().ok_or_else(|| {
            RobustError::from(IndexError::UnknownVertexId {
                id: id.get(),
                len: self.prizes.len(),
            })
        })
    }

    /// Returns the cost of the edge `{left, right}`.
    ///
    /// # Errors
    /// Returns [`RobustError::Index`] when the pair is not an indexed edge.
    pub fn edge_cost(&self, left: &str, right: &str) -> Result<f64> {
        let id = self.edge_index.id(&self.vertices, left, right)?;
        self.cost_of(id)
    }

    /// Returns the cost of the edge with id `id`.
    ///
    /// # Errors
    /// Returns [`RobustError::Index`] when `id` is out of range.
    pub fn cost_of(&self, id: EdgeId) -> Result<f64> {
        self.costs.get(id.get()).copied().ok_or_else(|| {
            RobustError::from(IndexError::UnknownEdgeId {
                id: id.get(),
                len: self.costs.len(),
            })
        })
    }

    /// Overwrites the prizes of the given vertices.
    ///
    /// Every label is resolved and every value checked before the first
    /// write, so a failing batch leaves the instance unchanged.
    ///
    /// # Errors
    /// Returns [`RobustError::Index`] for unknown labels and
    /// [`RobustError::InvalidPrize`] for negative or non-finite prizes.
    pub fn update_vertex_prizes<I, L>(&mut self, updates: I) -> Result<()>
    where
        I: IntoIterator<Item = (L, f64)>,
        L: AsRef<str>,
    {
        let resolved = updates
            .into_iter()
            .map(|(label, prize)| {
                let label = label.as_ref();
                let id = self.vertices.id(label)?;
                if !is_admissible(prize) {
                    return Err(RobustError::InvalidPrize {
                        label: Arc::from(label),
                        prize,
                    });
                }
                Ok((id, prize))
            })
            .collect::<Result<Vec<_>>>()?;
        for (id, prize) in resolved {
            self.set_prize(id, prize)?;
        }
        Ok(())
    }

    /// Overwrites the costs of the given edges.
    ///
    /// Like [`Self::update_vertex_prizes`], the batch is validated before
    /// any write is applied.
    ///
    /// # Errors
    /// Returns [`RobustError::Index`] for pairs that are not indexed edges
    /// and [`RobustError::InvalidEdgeCost`] for negative or non-finite costs.
    pub fn update_edge_costs<I, L>(&mut self, updates: I) -> Result<()>
    where
        I: IntoIterator<Item = ((L, L), f64)>,
        L: AsRef<str>,
    {
        let resolved = updates
            .into_iter()
            .map(|((left, right), cost)| {
                let (left, right) = (left.as_ref(), right.as_ref());
                let id = self.edge_index.id(&self.vertices, left, right)?;
                if !is_admissible(cost) {
                    return Err(RobustError::InvalidEdgeCost {
                        left: Arc::from(left),
                        right: Arc::from(right),
                        cost,
                    });
                }
                Ok((id, cost))
            })
            .collect::<Result<Vec<_>>>()?;
        for (id, cost) in resolved {
            let len = self.costs.len();
            let slot = self.costs.get_mut(id.get()).ok_or(
                IndexError::UnknownEdgeId { id: id.get(), len },
            )?;
            *slot = cost;
        }
        Ok(())
    }

    /// Multiplies the prize of vertex `id` by `factor`.
    pub(crate) fn scale_prize(&mut self, id: VertexId, factor: f64) -> Result<()> {
        let current = self.prize_of(id)?;
        self.set_prize(id, current * factor)
    }

    fn set_prize(&mut self, id: VertexId, prize: f64) -> Result<()> {
        let len = self.prizes.len();
        let slot = self
            .prizes
            .get_mut(id.get())
            .ok_or(IndexError::UnknownVertexId { id: id.get(), len })?;
        *slot = prize;
        Ok(())
    }
}

fn is_admissible(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
