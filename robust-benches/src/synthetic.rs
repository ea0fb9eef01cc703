//! Seeded synthetic interaction networks.
//!
//! Networks grow by preferential attachment, so a few hubs collect most of
//! the edges, as in protein interaction data. Generation is deterministic
//! for a given seed.

use rand::{Rng, SeedableRng, rngs::SmallRng, seq::index::sample};
use robust_core::{Network, RobustError, TerminalSet};

/// Errors raised by [`SyntheticNetwork::generate`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// Fewer than two vertices were requested.
    #[error("a network needs at least two vertices, got {vertex_count}")]
    TooFewVertices {
        /// Requested vertex count.
        vertex_count: usize,
    },
    /// Each new vertex must attach to at least one existing vertex.
    #[error("attachments per vertex must be at least one")]
    ZeroAttachments,
    /// No seed vertices were requested.
    #[error("at least one terminal is required")]
    ZeroTerminals,
    /// More seeds were requested than there are vertices.
    #[error("{terminal_count} terminals requested from {vertex_count} vertices")]
    TerminalsExceedVertices {
        /// Requested terminal count.
        terminal_count: usize,
        /// Requested vertex count.
        vertex_count: usize,
    },
}

/// Configuration for [`SyntheticNetwork::generate`].
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Number of vertices.
    pub vertex_count: usize,
    /// Edges added for every vertex after the first.
    pub attachments: usize,
    /// Number of seed vertices, drawn uniformly.
    pub terminal_count: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// A generated network together with its seeds.
#[derive(Clone, Debug)]
pub struct SyntheticNetwork {
    /// Connected interaction network labelled `v0`, `v1`, ...
    pub network: Network,
    /// Seed labels, all vertices of `network`.
    pub terminals: TerminalSet,
}

impl SyntheticNetwork {
    /// Generates a connected preferential-attachment network.
    ///
    /// # Errors
    /// Returns [`SyntheticError`] when the configuration is degenerate.
    ///
    /// # Examples
    /// ```
    /// use robust_benches::synthetic::{SyntheticConfig, SyntheticNetwork};
    ///
    /// let synthetic = SyntheticNetwork::generate(&SyntheticConfig {
    ///     vertex_count: 50,
    ///     attachments: 2,
    ///     terminal_count: 5,
    ///     seed: 7,
    /// })?;
    /// assert_eq!(synthetic.network.vertex_count(), 50);
    /// assert_eq!(synthetic.terminals.len(), 5);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn generate(config: &SyntheticConfig) -> Result<Self, SyntheticError> {
        validate(config)?;
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let label = |vertex: usize| format!("v{vertex}");

        let mut network = Network::new();
        // every edge contributes both endpoints, so sampling from this list
        // picks vertices proportionally to their degree
        let mut endpoints: Vec<usize> = Vec::new();
        network.add_edge(&label(0), &label(1));
        endpoints.extend([0, 1]);
        for vertex in 2..config.vertex_count {
            let wanted = config.attachments.min(vertex);
            let mut added = 0;
            let mut attempts = 0;
            while added < wanted && attempts < wanted.saturating_mul(8) {
                attempts += 1;
                let target = endpoints
                    .get(rng.gen_range(0..endpoints.len()))
                    .copied()
                    .unwrap_or(0);
                if network.add_edge(&label(vertex), &label(target)) {
                    endpoints.extend([vertex, target]);
                    added += 1;
                }
            }
            if added == 0 {
                let target = rng.gen_range(0..vertex);
                network.add_edge(&label(vertex), &label(target));
                endpoints.extend([vertex, target]);
            }
        }

        let chosen = sample(&mut rng, config.vertex_count, config.terminal_count);
        let terminals = TerminalSet::new(chosen.iter().map(label))
            .map_err(|_: RobustError| SyntheticError::ZeroTerminals)?;
        Ok(Self { network, terminals })
    }
}

const fn validate(config: &SyntheticConfig) -> Result<(), SyntheticError> {
    if config.vertex_count < 2 {
        return Err(SyntheticError::TooFewVertices {
            vertex_count: config.vertex_count,
        });
    }
    if config.attachments == 0 {
        return Err(SyntheticError::ZeroAttachments);
    }
    if config.terminal_count == 0 {
        return Err(SyntheticError::ZeroTerminals);
    }
    if config.terminal_count > config.vertex_count {
        return Err(SyntheticError::TerminalsExceedVertices {
            terminal_count: config.terminal_count,
            vertex_count: config.vertex_count,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn config(vertex_count: usize, attachments: usize, terminal_count: usize) -> SyntheticConfig {
        SyntheticConfig {
            vertex_count,
            attachments,
            terminal_count,
            seed: 42,
        }
    }

    #[rstest]
    #[case(2, 1, 1)]
    #[case(100, 1, 10)]
    #[case(100, 3, 10)]
    fn generates_requested_sizes(
        #[case] vertex_count: usize,
        #[case] attachments: usize,
        #[case] terminal_count: usize,
    ) -> Result<(), SyntheticError> {
        let synthetic = SyntheticNetwork::generate(&config(vertex_count, attachments, terminal_count))?;
        assert_eq!(synthetic.network.vertex_count(), vertex_count);
        assert!(synthetic.network.edge_count() >= vertex_count - 1);
        assert_eq!(synthetic.terminals.len(), terminal_count);
        assert!(synthetic.terminals.check_subset_of(&synthetic.network).is_ok());
        Ok(())
    }

    #[rstest]
    fn single_attachment_yields_a_tree() -> Result<(), SyntheticError> {
        let synthetic = SyntheticNetwork::generate(&config(64, 1, 4))?;
        assert_eq!(synthetic.network.edge_count(), 63);
        Ok(())
    }

    #[rstest]
    fn same_seed_same_network() -> Result<(), SyntheticError> {
        let first = SyntheticNetwork::generate(&config(200, 2, 8))?;
        let second = SyntheticNetwork::generate(&config(200, 2, 8))?;
        assert_eq!(first.network.edges(), second.network.edges());
        let labels = |set: &TerminalSet| set.iter().cloned().collect::<Vec<_>>();
        assert_eq!(labels(&first.terminals), labels(&second.terminals));
        Ok(())
    }

    #[rstest]
    #[case::one_vertex(config(1, 1, 1), SyntheticError::TooFewVertices { vertex_count: 1 })]
    #[case::no_attachments(config(10, 0, 1), SyntheticError::ZeroAttachments)]
    #[case::no_terminals(config(10, 1, 0), SyntheticError::ZeroTerminals)]
    #[case::too_many_terminals(
        config(10, 1, 11),
        SyntheticError::TerminalsExceedVertices { terminal_count: 11, vertex_count: 10 }
    )]
    fn rejects_degenerate_configs(#[case] config: SyntheticConfig, #[case] expected: SyntheticError) {
        assert_eq!(SyntheticNetwork::generate(&config).err(), Some(expected));
    }
}
