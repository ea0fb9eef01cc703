//! Edge-cost policies.
//!
//! A policy maps the two endpoint labels of an edge to a non-negative cost.
//! Whole-network statistics (average degree, average bias) are computed once
//! when the policy is constructed and closed over afterwards.

use std::{collections::HashMap, sync::Arc};

use tracing::warn;

use crate::network::Network;

/// Capability shared by every edge-cost policy.
///
/// Closures of the shape `Fn(&str, &str) -> f64` implement the trait, which
/// keeps ad-hoc policies cheap to express in tests.
///
/// # Examples
/// ```
/// use robust_core::{EdgeCost, EdgeCostPolicy};
///
/// assert_eq!(EdgeCostPolicy::Uniform.cost("a", "b"), 1.0);
/// let doubled = |_: &str, _: &str| 2.0;
/// assert_eq!(doubled.cost("a", "b"), 2.0);
/// ```
pub trait EdgeCost {
    /// Returns the cost of the undirected edge `{left, right}`.
    fn cost(&self, left: &str, right: &str) -> f64;
}

impl<F> EdgeCost for F
where
    F: Fn(&str, &str) -> f64,
{
    fn cost(&self, left: &str, right: &str) -> f64 {
        self(left, right)
    }
}

/// Interpolation weight `λ ∈ [0, 1]` used by the non-uniform policies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lambda(f64);

impl Lambda {
    /// Accepts `value` when it lies in `[0, 1]`; otherwise logs a warning and
    /// falls back to `0.0`.
    ///
    /// # Examples
    /// ```
    /// use robust_core::Lambda;
    ///
    /// assert_eq!(Lambda::new_or_default(0.5).get(), 0.5);
    /// assert_eq!(Lambda::new_or_default(1.5).get(), 0.0);
    /// ```
    #[must_use]
    pub fn new_or_default(value: f64) -> Self {
        if (0.0..=1.0).contains(&value) {
            Self(value)
        } else {
            warn!(lambda = value, "lambda outside [0, 1], using 0.0");
            Self(0.0)
        }
    }

    /// Returns the wrapped value.
    #[must_use]
    #[rustfmt::skip]
    pub const fn get(self) -> f64 { self.0 }
}

/// Per-vertex study-bias weights; vertices missing from the table weigh `1.0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BiasWeights {
    weights: HashMap<Arc<str>, f64>,
}

impl BiasWeights {
    /// Builds a table from `(label, weight)` pairs; later entries win.
    #[must_use]
    pub fn new<I, L>(entries: I) -> Self
    where
        I: IntoIterator<Item = (L, f64)>,
        L: AsRef<str>,
    {
        Self {
            weights: entries
                .into_iter()
                .map(|(label, weight)| (Arc::from(label.as_ref()), weight))
                .collect(),
        }
    }

    /// Returns the weight of `label`, defaulting to `1.0`.
    #[must_use]
    pub fn weight(&self, label: &str) -> f64 {
        self.weights.get(label).copied().unwrap_or(1.0)
    }

    /// Returns the number of explicit entries.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.weights.len() }

    /// Returns whether the table has no explicit entries.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.weights.is_empty() }

    /// Averages the weight over every vertex of `network`.
    #[must_use]
    pub fn average_over(&self, network: &Network) -> f64 {
        if network.vertex_count() == 0 {
            return 0.0;
        }
        let total: f64 = network
            .vertices()
            .iter()
            .map(|label| self.weight(label))
            .sum();
        total / network.vertex_count() as f64
    }
}

/// Configurable edge-cost policy.
///
/// # Examples
/// ```
/// use robust_core::{EdgeCost, EdgeCostPolicy, Lambda, Network};
///
/// let network = Network::from_edges([("hub", "a"), ("hub", "b"), ("hub", "c")]);
/// let policy = EdgeCostPolicy::hub_penalty(&network, Lambda::new_or_default(1.0));
/// // 0.5 * (deg(hub) + deg(a)) = 0.5 * (3 + 1)
/// assert_eq!(policy.cost("hub", "a"), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeCostPolicy {
    /// Every edge costs `1.0`; Steiner trees then minimise their size.
    Uniform,
    /// Penalises high-degree endpoints:
    /// `(1 - λ)·avg_degree + λ·0.5·(deg u + deg v)`.
    HubPenalty {
        /// Interpolation weight.
        lambda: Lambda,
        /// Average degree of the network.
        average_degree: f64,
        /// Degree of every vertex.
        degrees: HashMap<Arc<str>, usize>,
    },
    /// Additive study-bias weighting:
    /// `max(0, (1 - λ·avg_bias) + 0.5·λ·(b u + b v))`.
    BiasAdditive {
        /// Interpolation weight.
        lambda: Lambda,
        /// Average bias over the network's vertices.
        average_bias: f64,
        /// Per-vertex bias table.
        weights: BiasWeights,
    },
    /// Exponential study-bias weighting: `max(0, (b u + b v)^λ)`.
    BiasExponential {
        /// Exponent.
        lambda: Lambda,
        /// Per-vertex bias table.
        weights: BiasWeights,
    },
}

impl EdgeCostPolicy {
    /// Builds the hub-penalising policy, precomputing degrees once.
    #[must_use]
    pub fn hub_penalty(network: &Network, lambda: Lambda) -> Self {
        let degrees = network
            .vertices()
            .iter()
            .map(|label| (Arc::clone(label), network.degree(label).unwrap_or(0)))
            .collect();
        Self::HubPenalty {
            lambda,
            average_degree: network.average_degree(),
            degrees,
        }
    }

    /// Builds the additive bias policy, precomputing the average bias once.
    #[must_use]
    pub fn bias_additive(network: &Network, weights: BiasWeights, lambda: Lambda) -> Self {
        Self::BiasAdditive {
            lambda,
            average_bias: weights.average_over(network),
            weights,
        }
    }

    /// Builds the exponential bias policy.
    #[must_use]
    pub fn bias_exponential(weights: BiasWeights, lambda: Lambda) -> Self {
        Self::BiasExponential { lambda, weights }
    }

    /// Returns a short stable name for logs and summaries.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::HubPenalty { .. } => "hub-penalty",
            Self::BiasAdditive { .. } => "bias-additive",
            Self::BiasExponential { .. } => "bias-exponential",
        }
    }
}

impl EdgeCost for EdgeCostPolicy {
    fn cost(&self, left: &str, right: &str) -> f64 {
        match self {
            Self::Uniform => 1.0,
            Self::HubPenalty {
                lambda,
                average_degree,
                degrees,
            } => {
                let degree = |label: &str| degrees.get(label).copied().unwrap_or(0) as f64;
                let lambda = lambda.get();
                (1.0 - lambda) * average_degree + lambda * 0.5 * (degree(left) + degree(right))
            }
            Self::BiasAdditive {
                lambda,
                average_bias,
                weights,
            } => {
                let lambda = lambda.get();
                let cost = (1.0 - lambda * average_bias)
                    + 0.5 * lambda * (weights.weight(left) + weights.weight(right));
                cost.max(0.0)
            }
            Self::BiasExponential { lambda, weights } => {
                let cost = (weights.weight(left) + weights.weight(right)).powf(lambda.get());
                if cost >= 0.0 { cost } else { 0.0 }
            }
        }
    }
}
