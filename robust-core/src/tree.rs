//! Trees materialised over vertex labels.

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    sync::Arc,
};

use crate::{
    Result,
    cost::EdgeCost,
    error::RobustError,
    index::EdgeId,
    instance::InstanceModel,
    solver::Selection,
    union_find::DisjointSet,
};

/// A connected acyclic subgraph of a network.
///
/// Two trees are considered the same solution when their vertex sets match;
/// see [`Tree::same_vertices`].
///
/// # Examples
/// ```
/// use robust_core::{EdgeCostPolicy, Tree};
///
/// let tree = Tree::new(["a", "b", "c"], [("a", "b"), ("c", "b")])?;
/// assert_eq!(tree.vertex_count(), 3);
/// assert_eq!(tree.cost(&EdgeCostPolicy::Uniform), 2.0);
///
/// assert!(Tree::new(["a", "b", "c"], [("a", "b")]).is_err());
/// # Ok::<(), robust_core::RobustError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree {
    order: Vec<Arc<str>>,
    members: BTreeSet<Arc<str>>,
    edges: Vec<(Arc<str>, Arc<str>)>,
}

impl Tree {
    /// Builds a tree from labels, checking that the edges span the vertices
    /// without cycles.
    ///
    /// # Errors
    /// Returns [`RobustError::InvalidTree`] describing the first violated
    /// property.
    pub fn new<V, E, L>(vertices: V, edges: E) -> Result<Self>
    where
        V: IntoIterator<Item = L>,
        E: IntoIterator<Item = (L, L)>,
        L: AsRef<str>,
    {
        let order: Vec<Arc<str>> = vertices
            .into_iter()
            .map(|label| Arc::from(label.as_ref()))
            .collect();
        let edges: Vec<(Arc<str>, Arc<str>)> = edges
            .into_iter()
            .map(|(left, right)| (Arc::from(left.as_ref()), Arc::from(right.as_ref())))
            .collect();
        Self::checked(order, edges)
    }

    /// Materialises a solver selection over the labels of `instance`.
    ///
    /// # Errors
    /// Returns [`RobustError::InvalidTree`] when an id is out of range,
    /// repeated, or the selection is not a spanning tree of its vertices.
    pub fn from_selection(instance: &InstanceModel, selection: &Selection) -> Result<Self> {
        let vertices = instance.vertex_index();
        let mut seen_vertices = HashSet::with_capacity(selection.vertices.len());
        let mut order = Vec::with_capacity(selection.vertices.len());
        for &id in &selection.vertices {
            if !seen_vertices.insert(id) {
                return Err(invalid(format!("vertex id {id} selected twice")));
            }
            let label = vertices
                .label(id)
                .map_err(|_| invalid(format!("vertex id {id} is out of range")))?;
            order.push(Arc::clone(label));
        }

        let mut seen_edges: HashSet<EdgeId> = HashSet::with_capacity(selection.edges.len());
        let mut edges = Vec::with_capacity(selection.edges.len());
        for &id in &selection.edges {
            if !seen_edges.insert(id) {
                return Err(invalid(format!("edge id {id} selected twice")));
            }
            let (low, high) = instance
                .edge_index()
                .labels(vertices, id)
                .map_err(|_| invalid(format!("edge id {id} is out of range")))?;
            edges.push((Arc::clone(low), Arc::clone(high)));
        }

        Self::checked(order, edges)
    }

    fn checked(order: Vec<Arc<str>>, edges: Vec<(Arc<str>, Arc<str>)>) -> Result<Self> {
        if order.is_empty() {
            return Err(invalid("selection contains no vertices".to_owned()));
        }
        let positions: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(position, label)| (&**label, position))
            .collect();
        if positions.len() != order.len() {
            return Err(invalid("a vertex label appears twice".to_owned()));
        }
        if edges.len() + 1 != order.len() {
            return Err(invalid(format!(
                "{} edges cannot span {} vertices",
                edges.len(),
                order.len()
            )));
        }

        let mut components = DisjointSet::new(order.len());
        for (left, right) in &edges {
            let (Some(&l), Some(&r)) = (positions.get(&**left), positions.get(&**right)) else {
                return Err(invalid(format!(
                    "edge ({left}, {right}) has an endpoint outside the selection"
                )));
            };
            match components.union(l, r) {
                Some(true) => {}
                Some(false) => {
                    return Err(invalid(format!("edge ({left}, {right}) closes a cycle")));
                }
                None => return Err(invalid(format!("edge ({left}, {right}) is out of range"))),
            }
        }

        let members = order.iter().cloned().collect();
        Ok(Self {
            order,
            members,
            edges,
        })
    }

    /// Iterates over the vertices in selection order.
    pub fn vertices(&self) -> impl Iterator<Item = &Arc<str>> {
        self.order.iter()
    }

    /// Returns the vertex set.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertex_set(&self) -> &BTreeSet<Arc<str>> { &self.members }

    /// Returns the edges as label pairs.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[(Arc<str>, Arc<str>)] { &self.edges }

    /// Returns the number of vertices.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertex_count(&self) -> usize { self.order.len() }

    /// Returns whether `label` is a vertex of the tree.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.members.contains(label)
    }

    /// Returns whether both trees cover exactly the same vertices.
    #[must_use]
    pub fn same_vertices(&self, other: &Self) -> bool {
        self.members == other.members
    }

    /// Sums `cost` over the tree's edges.
    #[must_use]
    pub fn cost<C>(&self, cost: &C) -> f64
    where
        C: EdgeCost + ?Sized,
    {
        self.edges
            .iter()
            .map(|(left, right)| cost.cost(left, right))
            .sum()
    }
}

fn invalid(reason: String) -> RobustError {
    RobustError::InvalidTree { reason }
}
