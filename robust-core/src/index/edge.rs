//! Canonical undirected edge keys and their dense ids.

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{error::IndexError, network::Network};

use super::vertex::{VertexId, VertexIndex};

/// Canonical undirected edge key with `low <= high`.
///
/// # Examples
/// ```
/// use robust_core::{EdgeKey, VertexId};
///
/// let forward = EdgeKey::new(VertexId::new(4), VertexId::new(1));
/// let backward = EdgeKey::new(VertexId::new(1), VertexId::new(4));
/// assert_eq!(forward, backward);
/// assert_eq!(forward.low().get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    low: VertexId,
    high: VertexId,
}

impl EdgeKey {
    /// Canonicalises the endpoint pair.
    #[must_use]
    pub fn new(left: VertexId, right: VertexId) -> Self {
        Self {
            low: left.min(right),
            high: left.max(right),
        }
    }

    /// Returns the smaller endpoint id.
    #[must_use]
    #[rustfmt::skip]
    pub const fn low(self) -> VertexId { self.low }

    /// Returns the larger endpoint id.
    #[must_use]
    #[rustfmt::skip]
    pub const fn high(self) -> VertexId { self.high }
}

/// Dense identifier of an edge, equal to its position in the cost array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

impl EdgeId {
    /// Wraps a raw position.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: usize) -> Self { Self(id) }

    /// Returns the raw position.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> usize { self.0 }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bijection between canonical edge keys and dense edge ids.
///
/// Unique keys are sorted ascending before numbering, so ids depend only on
/// the vertex ids and not on edge insertion order.
#[derive(Clone, Debug, Default)]
pub struct EdgeIndex {
    keys: Vec<EdgeKey>,
    ids: HashMap<EdgeKey, EdgeId>,
}

impl EdgeIndex {
    /// Indexes every edge of `network`.
    ///
    /// # Errors
    /// Returns [`IndexError::UnknownLabel`] when an endpoint is missing from
    /// `vertices`.
    pub fn new(network: &Network, vertices: &VertexIndex) -> Result<Self, IndexError> {
        let mut keys = network
            .edges()
            .iter()
            .map(|(left, right)| Ok(EdgeKey::new(vertices.id(left)?, vertices.id(right)?)))
            .collect::<Result<Vec<_>, IndexError>>()?;
        keys.sort_unstable();
        keys.dedup();
        Ok(Self::from_sorted_keys(keys))
    }

    fn from_sorted_keys(keys: Vec<EdgeKey>) -> Self {
        let ids = keys
            .iter()
            .enumerate()
            .map(|(position, key)| (*key, EdgeId(position)))
            .collect();
        Self { keys, ids }
    }

    /// Returns the canonical key of an edge given by labels.
    ///
    /// The key is symmetric: `key(u, v) == key(v, u)`.
    ///
    /// # Errors
    /// Returns [`IndexError::UnknownLabel`] when an endpoint is not indexed.
    pub fn key(
        &self,
        vertices: &VertexIndex,
        left: &str,
        right: &str,
    ) -> Result<EdgeKey, IndexError> {
        Ok(EdgeKey::new(vertices.id(left)?, vertices.id(right)?))
    }

    /// Resolves an edge given by labels to its id.
    ///
    /// # Errors
    /// Returns [`IndexError::UnknownLabel`] for unknown endpoints and
    /// [`IndexError::UnknownEdge`] when the pair is not an edge.
    pub fn id(&self, vertices: &VertexIndex, left: &str, right: &str) -> Result<EdgeId, IndexError> {
        let key = self.key(vertices, left, right)?;
        self.id_of_key(key).ok_or_else(|| IndexError::UnknownEdge {
            left: Arc::from(left),
            right: Arc::from(right),
        })
    }

    /// Resolves a canonical key to its id, if it is an indexed edge.
    #[must_use]
    pub fn id_of_key(&self, key: EdgeKey) -> Option<EdgeId> {
        self.ids.get(&key).copied()
    }

    /// Returns the canonical key stored at `id`.
    ///
    /// # Errors
    /// Returns [`IndexError::UnknownEdgeId`] when `id` is out of range.
    pub fn key_of(&self, id: EdgeId) -> Result<EdgeKey, IndexError> {
        self.keys
            .get(id.get())
            .copied()
            .ok_or(IndexError::UnknownEdgeId {
                id: id.get(),
                len: self.keys.len(),
            })
    }

    /// Returns the endpoint labels of the edge stored at `id`, lower id first.
    ///
    /// # Errors
    /// Returns [`IndexError::UnknownEdgeId`] when `id` is out of range.
    pub fn labels<'v>(
        &self,
        vertices: &'v VertexIndex,
        id: EdgeId,
    ) -> Result<(&'v Arc<str>, &'v Arc<str>), IndexError> {
        let key = self.key_of(id)?;
        Ok((vertices.label(key.low())?, vertices.label(key.high())?))
    }

    /// Returns the keys in id order.
    #[must_use]
    #[rustfmt::skip]
    pub fn keys(&self) -> &[EdgeKey] { &self.keys }

    /// Returns the number of indexed edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.keys.len() }

    /// Returns whether no edge was indexed.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.keys.is_empty() }
}
