//! Undirected interaction networks and terminal sets.
//!
//! [`Network`] stores an unweighted simple graph over opaque string labels.
//! Vertex order is first-seen order and is the order in which
//! [`crate::VertexIndex`] assigns ids, so building the same network twice
//! yields identical numeric instances.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use tracing::debug;

use crate::{Result, error::RobustError};

/// Undirected simple graph with string vertex labels.
///
/// # Examples
/// ```
/// use robust_core::Network;
///
/// let network = Network::from_edges([("a", "b"), ("b", "c"), ("c", "b")]);
/// assert_eq!(network.vertex_count(), 3);
/// assert_eq!(network.edge_count(), 2);
/// assert_eq!(network.degree("b"), Some(2));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Network {
    vertices: Vec<Arc<str>>,
    positions: HashMap<Arc<str>, usize>,
    edges: Vec<(Arc<str>, Arc<str>)>,
    seen_edges: HashSet<(usize, usize)>,
    degrees: Vec<usize>,
}

impl Network {
    /// Creates an empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a network from label pairs.
    ///
    /// Repeated undirected edges are collapsed and self-loops are dropped.
    #[must_use]
    pub fn from_edges<I, L>(edges: I) -> Self
    where
        I: IntoIterator<Item = (L, L)>,
        L: AsRef<str>,
    {
        let mut network = Self::new();
        for (left, right) in edges {
            network.add_edge(left.as_ref(), right.as_ref());
        }
        network
    }

    /// Adds isolated vertices (or no-ops for vertices already present).
    #[must_use]
    pub fn with_vertices<I, L>(mut self, vertices: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        for label in vertices {
            self.add_vertex(label.as_ref());
        }
        self
    }

    /// Inserts a vertex and returns its position in first-seen order.
    pub fn add_vertex(&mut self, label: &str) -> usize {
        if let Some(&position) = self.positions.get(label) {
            return position;
        }
        let position = self.vertices.len();
        let label: Arc<str> = Arc::from(label);
        self.vertices.push(Arc::clone(&label));
        self.positions.insert(label, position);
        self.degrees.push(0);
        position
    }

    /// Inserts an undirected edge, returning `false` when it was a self-loop
    /// or already present.
    pub fn add_edge(&mut self, left: &str, right: &str) -> bool {
        let left_pos = self.add_vertex(left);
        let right_pos = self.add_vertex(right);
        if left_pos == right_pos {
            debug!(vertex = left, "dropping self-loop");
            return false;
        }
        let key = (left_pos.min(right_pos), left_pos.max(right_pos));
        if !self.seen_edges.insert(key) {
            return false;
        }
        for position in [left_pos, right_pos] {
            if let Some(degree) = self.degrees.get_mut(position) {
                *degree += 1;
            }
        }
        let (Some(left_label), Some(right_label)) =
            (self.vertices.get(left_pos), self.vertices.get(right_pos))
        else {
            return false;
        };
        self.edges
            .push((Arc::clone(left_label), Arc::clone(right_label)));
        true
    }

    /// Returns the number of vertices.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertex_count(&self) -> usize { self.vertices.len() }

    /// Returns the number of distinct undirected edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Returns the vertices in first-seen order.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertices(&self) -> &[Arc<str>] { &self.vertices }

    /// Returns the edges in insertion order, endpoints as first supplied.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[(Arc<str>, Arc<str>)] { &self.edges }

    /// Returns whether `label` is a vertex of the network.
    #[must_use]
    pub fn contains_vertex(&self, label: &str) -> bool {
        self.positions.contains_key(label)
    }

    /// Returns the degree of `label`, or `None` when it is not a vertex.
    #[must_use]
    pub fn degree(&self, label: &str) -> Option<usize> {
        self.positions
            .get(label)
            .and_then(|&position| self.degrees.get(position).copied())
    }

    /// Returns `2|E| / |V|`, or zero for an empty network.
    #[must_use]
    pub fn average_degree(&self) -> f64 {
        if self.vertices.is_empty() {
            return 0.0;
        }
        (2 * self.edges.len()) as f64 / self.vertices.len() as f64
    }
}

/// Non-empty set of terminal (seed) labels in first-occurrence order.
///
/// # Examples
/// ```
/// use robust_core::{Network, TerminalSet};
///
/// let network = Network::from_edges([("a", "b")]);
/// let (terminals, dropped) = TerminalSet::restricted_to(["a", "z", "a"], &network)?;
/// assert_eq!(terminals.len(), 1);
/// assert_eq!(dropped, 1);
/// # Ok::<(), robust_core::RobustError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerminalSet {
    labels: Vec<Arc<str>>,
    members: HashSet<Arc<str>>,
}

impl TerminalSet {
    /// Builds a terminal set, removing repeated labels.
    ///
    /// # Errors
    /// Returns [`RobustError::EmptyTerminals`] when no label is supplied.
    pub fn new<I, L>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let mut members = HashSet::new();
        let mut ordered = Vec::new();
        for label in labels {
            let label: Arc<str> = Arc::from(label.as_ref());
            if members.insert(Arc::clone(&label)) {
                ordered.push(label);
            }
        }
        if ordered.is_empty() {
            return Err(RobustError::EmptyTerminals);
        }
        Ok(Self {
            labels: ordered,
            members,
        })
    }

    /// Builds a terminal set from the labels that are vertices of `network`,
    /// returning the set together with the number of distinct labels dropped.
    ///
    /// # Errors
    /// Returns [`RobustError::EmptyTerminals`] when no label survives.
    pub fn restricted_to<I, L>(labels: I, network: &Network) -> Result<(Self, usize)>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let mut dropped = HashSet::new();
        let mut kept = Vec::new();
        for label in labels {
            let label = label.as_ref();
            if network.contains_vertex(label) {
                kept.push(label.to_owned());
            } else {
                dropped.insert(label.to_owned());
            }
        }
        if !dropped.is_empty() {
            debug!(dropped = dropped.len(), "terminals missing from network");
        }
        Ok((Self::new(kept)?, dropped.len()))
    }

    /// Returns whether `label` is a terminal.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.members.contains(label)
    }

    /// Returns the number of terminals.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.labels.len() }

    /// Returns whether the set is empty, which a constructed set never is.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.labels.is_empty() }

    /// Iterates over the terminals in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<str>> {
        self.labels.iter()
    }

    /// Ensures every terminal is a vertex of `network`.
    ///
    /// # Errors
    /// Returns [`RobustError::UnknownTerminal`] for the first missing label.
    pub fn check_subset_of(&self, network: &Network) -> Result<()> {
        match self
            .labels
            .iter()
            .find(|label| !network.contains_vertex(label))
        {
            Some(label) => Err(RobustError::UnknownTerminal {
                label: Arc::clone(label),
            }),
            None => Ok(()),
        }
    }
}
