//! Single-solve benchmarks of the growth solver.
//!
//! Builds the numeric instance once with the initial ROBUST prizes and
//! times one solve per pruning mode, isolating the solver from the
//! penalty loop.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use std::num::NonZeroUsize;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use robust_benches::{
    error::BenchSetupError,
    params::SolverBenchParams,
    synthetic::{SyntheticConfig, SyntheticNetwork},
};
use robust_core::{
    EdgeCostPolicy, InstanceModel, PcstSolver, Pruning, RootMode, SolverInput,
};
use robust_providers_pcst::GrowthSolver;

/// Seed used for all synthetic network generation in this benchmark.
const SEED: u64 = 7;

/// Network sizes to benchmark.
const VERTEX_COUNTS: &[usize] = &[500, 2_000, 5_000];

/// Seeds drawn per network.
const TERMINALS: usize = 12;

/// Prize of a seed vertex; edges cost one.
const TERMINAL_PRIZE: f64 = 16.0;

/// Prize of every other vertex.
const STEINER_PRIZE: f64 = 0.25;

const MODES: &[(Pruning, &str)] = &[
    (Pruning::None, "none"),
    (Pruning::Simple, "simple"),
    (Pruning::Strong, "strong"),
];

fn growth_solve_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("growth_solve");
    group.sample_size(20);
    let solver = GrowthSolver::new();

    for &vertex_count in VERTEX_COUNTS {
        let synthetic = SyntheticNetwork::generate(&SyntheticConfig {
            vertex_count,
            attachments: 2,
            terminal_count: TERMINALS,
            seed: SEED,
        })?;
        let terminals = &synthetic.terminals;
        let instance = InstanceModel::build(
            &synthetic.network,
            &EdgeCostPolicy::Uniform,
            |label: &str| {
                if terminals.contains(label) {
                    TERMINAL_PRIZE
                } else {
                    STEINER_PRIZE
                }
            },
        )?;

        for &(pruning, name) in MODES {
            let input = SolverInput {
                edges: instance.edges(),
                prizes: instance.prizes(),
                costs: instance.costs(),
                root: RootMode::Unrooted,
                clusters: NonZeroUsize::MIN,
                pruning,
            };
            solver.solve(&input)?;
            let params = SolverBenchParams {
                vertex_count,
                pruning: name,
            };
            group.bench_with_input(BenchmarkId::from_parameter(&params), &input, |b, input| {
                b.iter(|| {
                    let _selection = solver.solve(input);
                });
            });
        }
    }

    group.finish();
    Ok(())
}

fn growth_solve(c: &mut Criterion) {
    if let Err(err) = growth_solve_impl(c) {
        panic!("growth_solve benchmark setup failed: {err}");
    }
}

criterion_group!(benches, growth_solve);
criterion_main!(benches);
