//! Error types for the ROBUST core library.
//!
//! Defines the error enums exposed by the public API, their stable
//! machine-readable codes, and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// A lookup outside the domain fixed when an index was constructed.
///
/// These are contract violations: callers must only query labels and ids
/// produced by the same construction.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum IndexError {
    /// The label was not part of the indexed network.
    #[error("vertex `{label}` is not part of the indexed network")]
    UnknownLabel {
        /// Label that failed to resolve.
        label: Arc<str>,
    },
    /// The vertex id exceeded the number of indexed vertices.
    #[error("vertex id {id} is out of bounds for {len} vertices")]
    UnknownVertexId {
        /// Offending id.
        id: usize,
        /// Number of indexed vertices.
        len: usize,
    },
    /// The vertex pair is not an edge of the indexed network.
    #[error("edge ({left}, {right}) is not part of the indexed network")]
    UnknownEdge {
        /// First endpoint as supplied.
        left: Arc<str>,
        /// Second endpoint as supplied.
        right: Arc<str>,
    },
    /// The edge id exceeded the number of indexed edges.
    #[error("edge id {id} is out of bounds for {len} edges")]
    UnknownEdgeId {
        /// Offending id.
        id: usize,
        /// Number of indexed edges.
        len: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`IndexError`] variants.
    enum IndexErrorCode for IndexError {
        /// The label was not part of the indexed network.
        UnknownLabel => UnknownLabel { .. } => "INDEX_UNKNOWN_LABEL",
        /// The vertex id exceeded the number of indexed vertices.
        UnknownVertexId => UnknownVertexId { .. } => "INDEX_UNKNOWN_VERTEX_ID",
        /// The vertex pair is not an edge of the indexed network.
        UnknownEdge => UnknownEdge { .. } => "INDEX_UNKNOWN_EDGE",
        /// The edge id exceeded the number of indexed edges.
        UnknownEdgeId => UnknownEdgeId { .. } => "INDEX_UNKNOWN_EDGE_ID",
    }
}

/// An error reported by a [`crate::PcstSolver`] implementation.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SolverError {
    /// The cost array length did not match the edge array length.
    #[error("expected {edges} edge costs but received {costs}")]
    CostLengthMismatch {
        /// Number of edges supplied.
        edges: usize,
        /// Number of costs supplied.
        costs: usize,
    },
    /// An edge referenced a vertex beyond the prize array.
    #[error("edge {edge} references vertex {vertex}, but only {vertices} prizes were given")]
    EndpointOutOfRange {
        /// Position of the offending edge.
        edge: usize,
        /// Out-of-range vertex id.
        vertex: usize,
        /// Number of prizes supplied.
        vertices: usize,
    },
    /// A prize or cost was negative, NaN, or infinite.
    #[error("{kind} at position {index} is not a finite non-negative value ({value})")]
    InvalidWeight {
        /// Either `"prize"` or `"cost"`.
        kind: &'static str,
        /// Position of the offending value.
        index: usize,
        /// The offending value.
        value: f64,
    },
    /// The requested root vertex does not exist.
    #[error("root vertex {root} is out of bounds for {vertices} vertices")]
    RootOutOfRange {
        /// Requested root id.
        root: usize,
        /// Number of vertices.
        vertices: usize,
    },
    /// The instance had no vertices to select from.
    #[error("the instance contains no vertices")]
    EmptyInstance,
    /// More disconnected components hold a top-prize vertex than clusters
    /// were requested.
    #[error(
        "{components} disconnected components hold a top-prize vertex but only {requested} cluster(s) were requested"
    )]
    Disconnected {
        /// Components containing a vertex of maximum prize.
        components: usize,
        /// Number of clusters the caller asked for.
        requested: usize,
    },
    /// The backend failed for a reason of its own.
    #[error("solver backend failed: {message}")]
    Backend {
        /// Backend-provided description.
        message: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`SolverError`] variants.
    enum SolverErrorCode for SolverError {
        /// The cost array length did not match the edge array length.
        CostLengthMismatch => CostLengthMismatch { .. } => "SOLVER_COST_LENGTH_MISMATCH",
        /// An edge referenced a vertex beyond the prize array.
        EndpointOutOfRange => EndpointOutOfRange { .. } => "SOLVER_ENDPOINT_OUT_OF_RANGE",
        /// A prize or cost was negative, NaN, or infinite.
        InvalidWeight => InvalidWeight { .. } => "SOLVER_INVALID_WEIGHT",
        /// The requested root vertex does not exist.
        RootOutOfRange => RootOutOfRange { .. } => "SOLVER_ROOT_OUT_OF_RANGE",
        /// The instance had no vertices to select from.
        EmptyInstance => EmptyInstance => "SOLVER_EMPTY_INSTANCE",
        /// More disconnected components hold a top-prize vertex than clusters
        /// were requested.
        Disconnected => Disconnected { .. } => "SOLVER_DISCONNECTED",
        /// The backend failed for a reason of its own.
        Backend => Backend { .. } => "SOLVER_BACKEND",
    }
}

/// Error type produced when configuring or running the diversification
/// pipeline.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RobustError {
    /// A configuration parameter was outside its admissible range.
    #[error("{name} must be {expected} (got {value})")]
    InvalidParameter {
        /// Parameter name as exposed by the builder.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Human-readable admissible range.
        expected: &'static str,
    },
    /// The network contained no vertices.
    #[error("the network contains no vertices")]
    EmptyNetwork,
    /// The network contained no edges.
    #[error("the network contains no edges")]
    NoEdges,
    /// The terminal set was empty.
    #[error("the terminal set is empty")]
    EmptyTerminals,
    /// A terminal was not a vertex of the network.
    #[error("terminal `{label}` is not a vertex of the network")]
    UnknownTerminal {
        /// The offending terminal label.
        label: Arc<str>,
    },
    /// The cost policy produced a negative or non-finite cost.
    #[error("edge ({left}, {right}) received invalid cost {cost}")]
    InvalidEdgeCost {
        /// First endpoint.
        left: Arc<str>,
        /// Second endpoint.
        right: Arc<str>,
        /// The rejected cost.
        cost: f64,
    },
    /// A prize update carried a negative or non-finite value.
    #[error("vertex `{label}` received invalid prize {prize}")]
    InvalidPrize {
        /// The vertex whose prize was rejected.
        label: Arc<str>,
        /// The rejected prize.
        prize: f64,
    },
    /// A label or id lookup violated the index contract.
    #[error(transparent)]
    Index {
        /// Underlying lookup failure.
        #[from]
        source: IndexError,
    },
    /// The external solver failed.
    #[error("solver `{solver}` failed: {error}")]
    Solver {
        /// Name reported by the solver.
        solver: Arc<str>,
        #[source]
        /// Underlying solver error.
        error: SolverError,
    },
    /// The solver returned a selection that is not a tree.
    #[error("solver `{solver}` returned a selection that is not a tree: {reason}")]
    SolverContract {
        /// Name reported by the solver.
        solver: Arc<str>,
        /// Description of the violated property.
        reason: String,
    },
    /// A vertex and edge selection did not form a tree.
    #[error("selection is not a tree: {reason}")]
    InvalidTree {
        /// Description of the violated property.
        reason: String,
    },
    /// An aggregate was requested from an empty solution set.
    #[error("the solution set is empty")]
    EmptySolutionSet,
}

define_error_codes! {
    /// Stable codes describing [`RobustError`] variants.
    enum RobustErrorCode for RobustError {
        /// A configuration parameter was outside its admissible range.
        InvalidParameter => InvalidParameter { .. } => "ROBUST_INVALID_PARAMETER",
        /// The network contained no vertices.
        EmptyNetwork => EmptyNetwork => "ROBUST_EMPTY_NETWORK",
        /// The network contained no edges.
        NoEdges => NoEdges => "ROBUST_NO_EDGES",
        /// The terminal set was empty.
        EmptyTerminals => EmptyTerminals => "ROBUST_EMPTY_TERMINALS",
        /// A terminal was not a vertex of the network.
        UnknownTerminal => UnknownTerminal { .. } => "ROBUST_UNKNOWN_TERMINAL",
        /// The cost policy produced a negative or non-finite cost.
        InvalidEdgeCost => InvalidEdgeCost { .. } => "ROBUST_INVALID_EDGE_COST",
        /// A prize update carried a negative or non-finite value.
        InvalidPrize => InvalidPrize { .. } => "ROBUST_INVALID_PRIZE",
        /// A label or id lookup violated the index contract.
        Index => Index { .. } => "ROBUST_INDEX",
        /// The external solver failed.
        SolverFailure => Solver { .. } => "ROBUST_SOLVER_FAILURE",
        /// The solver returned a selection that is not a tree.
        SolverContract => SolverContract { .. } => "ROBUST_SOLVER_CONTRACT",
        /// A vertex and edge selection did not form a tree.
        InvalidTree => InvalidTree { .. } => "ROBUST_INVALID_TREE",
        /// An aggregate was requested from an empty solution set.
        EmptySolutionSet => EmptySolutionSet => "ROBUST_EMPTY_SOLUTION_SET",
    }
}

impl RobustError {
    /// Retrieve the inner [`IndexErrorCode`] when the error originated in an index lookup.
    #[must_use]
    pub const fn index_code(&self) -> Option<IndexErrorCode> {
        match self {
            Self::Index { source } => Some(source.code()),
            _ => None,
        }
    }

    /// Retrieve the inner [`SolverErrorCode`] when the error originated in the solver.
    #[must_use]
    pub const fn solver_code(&self) -> Option<SolverErrorCode> {
        match self {
            Self::Solver { error, .. } => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, RobustError>;
