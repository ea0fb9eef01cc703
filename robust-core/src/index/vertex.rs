//! Bijection between vertex labels and dense ids.

use std::{collections::HashMap, fmt, sync::Arc};

use crate::error::IndexError;

/// Dense identifier of a vertex within one [`VertexIndex`].
///
/// # Examples
/// ```
/// use robust_core::VertexId;
///
/// let id = VertexId::new(3);
/// assert_eq!(id.get(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(usize);

impl VertexId {
    /// Wraps a raw position.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: usize) -> Self { Self(id) }

    /// Returns the raw position.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> usize { self.0 }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable `id → label` array plus its inverse map.
///
/// Ids follow the iteration order of the labels passed to [`Self::new`];
/// repeated labels keep their first id.
///
/// # Examples
/// ```
/// use robust_core::VertexIndex;
///
/// let index = VertexIndex::new(["p53", "mdm2"]);
/// let id = index.id("mdm2")?;
/// assert_eq!(id.get(), 1);
/// assert_eq!(&**index.label(id)?, "mdm2");
/// # Ok::<(), robust_core::IndexError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct VertexIndex {
    labels: Vec<Arc<str>>,
    ids: HashMap<Arc<str>, VertexId>,
}

impl VertexIndex {
    /// Assigns ids to `labels` in iteration order.
    #[must_use]
    pub fn new<I, L>(labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Arc<str>>,
    {
        let mut index = Self::default();
        for label in labels {
            let label = label.into();
            if index.ids.contains_key(&label) {
                continue;
            }
            let id = VertexId(index.labels.len());
            index.labels.push(Arc::clone(&label));
            index.ids.insert(label, id);
        }
        index
    }

    /// Resolves `label` to its id.
    ///
    /// # Errors
    /// Returns [`IndexError::UnknownLabel`] when the label was not indexed.
    pub fn id(&self, label: &str) -> Result<VertexId, IndexError> {
        self.ids
            .get(label)
            .copied()
            .ok_or_else(|| IndexError::UnknownLabel {
                label: Arc::from(label),
            })
    }

    /// Resolves `id` to its label.
    ///
    /// # Errors
    /// Returns [`IndexError::UnknownVertexId`] when `id` is out of range.
    pub fn label(&self, id: VertexId) -> Result<&Arc<str>, IndexError> {
        self.labels
            .get(id.get())
            .ok_or(IndexError::UnknownVertexId {
                id: id.get(),
                len: self.labels.len(),
            })
    }

    /// Returns the number of indexed vertices.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.labels.len() }

    /// Returns whether the index is empty.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.labels.is_empty() }

    /// Iterates over `(id, label)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &Arc<str>)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(position, label)| (VertexId(position), label))
    }
}
