//! Dense integer identifiers for vertex labels and undirected edges.
//!
//! Both indices are built once per [`crate::InstanceModel`] in O(V + E) and
//! never rebuilt while prizes and costs are updated.

mod edge;
mod vertex;

pub use edge::{EdgeId, EdgeIndex, EdgeKey};
pub use vertex::{VertexId, VertexIndex};
