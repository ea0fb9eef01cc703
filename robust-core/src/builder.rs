//! Builder for configuring the diversification engine.
//!
//! Exposes the tunable parameters of [`Diversifier`] and validates them
//! before an engine is constructed.

use std::num::NonZeroUsize;

use crate::{Result, diversify::Diversifier, error::RobustError};

/// Validated parameter set shared by [`Diversifier`] and its tree stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiversifierParams {
    /// Fraction of the smallest edge cost given to non-terminals as prize.
    pub initial_fraction: f64,
    /// Factor applied to the prize of every reused non-terminal.
    pub reduction_factor: f64,
    /// Multiple of `diameter · max_cost` given to terminals as prize.
    pub terminal_prize_multiple: f64,
    /// Estimated graph diameter.
    pub graph_diameter: f64,
    /// Number of trees the bounded driver collects at most.
    pub target_count: NonZeroUsize,
}

/// Configures and constructs [`Diversifier`] instances.
///
/// # Examples
/// ```
/// use robust_core::DiversifierBuilder;
///
/// let diversifier = DiversifierBuilder::new()
///     .with_initial_fraction(0.25)
///     .with_reduction_factor(0.9)
///     .with_target_count(30)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(diversifier.params().target_count.get(), 30);
/// ```
#[derive(Debug, Clone)]
pub struct DiversifierBuilder {
    initial_fraction: f64,
    reduction_factor: f64,
    terminal_prize_multiple: f64,
    graph_diameter: f64,
    target_count: usize,
}

impl Default for DiversifierBuilder {
    fn default() -> Self {
        Self {
            initial_fraction: 0.1,
            reduction_factor: 0.3,
            terminal_prize_multiple: 2.0,
            graph_diameter: 8.0,
            target_count: 10,
        }
    }
}

impl DiversifierBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use robust_core::DiversifierBuilder;
    ///
    /// let builder = DiversifierBuilder::new();
    /// assert_eq!(builder.initial_fraction(), 0.1);
    /// assert_eq!(builder.reduction_factor(), 0.3);
    /// assert_eq!(builder.target_count(), 10);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the non-terminal prize fraction `f`.
    #[must_use]
    pub fn with_initial_fraction(mut self, fraction: f64) -> Self {
        self.initial_fraction = fraction;
        self
    }

    /// Returns the configured non-terminal prize fraction.
    #[must_use]
    pub fn initial_fraction(&self) -> f64 {
        self.initial_fraction
    }

    /// Overrides the prize reduction factor `r`.
    #[must_use]
    pub fn with_reduction_factor(mut self, factor: f64) -> Self {
        self.reduction_factor = factor;
        self
    }

    /// Returns the configured prize reduction factor.
    #[must_use]
    pub fn reduction_factor(&self) -> f64 {
        self.reduction_factor
    }

    /// Overrides the terminal prize multiple `m`.
    #[must_use]
    pub fn with_terminal_prize_multiple(mut self, multiple: f64) -> Self {
        self.terminal_prize_multiple = multiple;
        self
    }

    /// Returns the configured terminal prize multiple.
    #[must_use]
    pub fn terminal_prize_multiple(&self) -> f64 {
        self.terminal_prize_multiple
    }

    /// Overrides the graph diameter estimate `d`.
    #[must_use]
    pub fn with_graph_diameter(mut self, diameter: f64) -> Self {
        self.graph_diameter = diameter;
        self
    }

    /// Returns the configured graph diameter estimate.
    #[must_use]
    pub fn graph_diameter(&self) -> f64 {
        self.graph_diameter
    }

    /// Overrides the number of trees `n` collected by [`Diversifier::run`].
    #[must_use]
    pub fn with_target_count(mut self, count: usize) -> Self {
        self.target_count = count;
        self
    }

    /// Returns the configured target count.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// Validates the configuration and constructs a [`Diversifier`].
    ///
    /// # Errors
    /// Returns [`RobustError::InvalidParameter`] naming the first parameter
    /// outside its admissible range.
    ///
    /// # Examples
    /// ```
    /// use robust_core::{DiversifierBuilder, RobustError};
    ///
    /// let err = DiversifierBuilder::new()
    ///     .with_reduction_factor(1.0)
    ///     .build()
    ///     .expect_err("reduction factor must be below one");
    /// assert!(matches!(err, RobustError::InvalidParameter { name: "reduction_factor", .. }));
    /// ```
    pub fn build(self) -> Result<Diversifier> {
        check(
            "initial_fraction",
            self.initial_fraction,
            "finite and > 0",
            |v| v > 0.0,
        )?;
        check(
            "reduction_factor",
            self.reduction_factor,
            "in the open interval (0, 1)",
            |v| v > 0.0 && v < 1.0,
        )?;
        check(
            "terminal_prize_multiple",
            self.terminal_prize_multiple,
            "finite and >= 1",
            |v| v >= 1.0,
        )?;
        check(
            "graph_diameter",
            self.graph_diameter,
            "finite and > 0",
            |v| v > 0.0,
        )?;
        let target_count =
            NonZeroUsize::new(self.target_count).ok_or(RobustError::InvalidParameter {
                name: "target_count",
                value: 0.0,
                expected: ">= 1",
            })?;

        Ok(Diversifier::new(DiversifierParams {
            initial_fraction: self.initial_fraction,
            reduction_factor: self.reduction_factor,
            terminal_prize_multiple: self.terminal_prize_multiple,
            graph_diameter: self.graph_diameter,
            target_count,
        }))
    }
}

fn check(
    name: &'static str,
    value: f64,
    expected: &'static str,
    admissible: impl Fn(f64) -> bool,
) -> Result<()> {
    if value.is_finite() && admissible(value) {
        Ok(())
    } else {
        Err(RobustError::InvalidParameter {
            name,
            value,
            expected,
        })
    }
}
