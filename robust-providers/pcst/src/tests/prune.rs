use robust_core::Pruning;
use rstest::rstest;

use super::support::Instance;
use crate::{
    graph::Graph,
    growth::{Attachment, GrownTree, grow},
    prune::prune,
};

/// Star around vertex 0 grown without pruning: leaf 1 pays for its edge,
/// leaf 2 does not, and the chain 3-4 only pays as a whole.
fn star() -> Instance {
    Instance::new(
        &[(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0), (3, 4, 1.0)],
        &[10.0, 3.0, 0.5, 0.5, 3.0],
    )
}

fn kept(mode: Pruning) -> (Vec<usize>, f64) {
    let instance = star();
    let input = instance.input(mode);
    let graph = Graph::new(&input);
    let mut tree = grow(&graph, 0);
    // force vertex 2 in so pruning has something to remove
    tree.vertices.push(2);
    if let Some(slot) = tree.attachments.get_mut(2) {
        *slot = Some(Attachment {
            parent: 0,
            edge: 1,
            cost: 1.0,
        });
    }
    let cluster = prune(&graph, &tree, mode);
    let mut vertices = cluster.vertices;
    vertices.sort_unstable();
    (vertices, cluster.net_value)
}

#[rstest]
fn growth_alone_skips_unprofitable_leaf() {
    let instance = star();
    let input = instance.input(Pruning::None);
    let graph = Graph::new(&input);
    let mut vertices = grow(&graph, 0).vertices;
    vertices.sort_unstable();
    assert_eq!(vertices, [0, 1, 3, 4]);
}

#[rstest]
#[case::none(Pruning::None, &[0, 1, 2, 3, 4])]
#[case::simple(Pruning::Simple, &[0, 1, 3, 4])]
#[case::strong(Pruning::Strong, &[0, 1, 3, 4])]
fn pruning_modes_remove_cheap_leaves(#[case] mode: Pruning, #[case] expected: &[usize]) {
    let (vertices, _) = kept(mode);
    assert_eq!(vertices, expected);
}

#[rstest]
fn net_value_counts_prizes_minus_edges() {
    let (_, value) = kept(Pruning::Strong);
    // prizes 10 + 3 + 0.5 + 3, edges 3
    assert!((value - 13.5).abs() < 1e-12);
}

#[rstest]
fn strong_pruning_drops_subtrees_that_only_simple_keeps() {
    // 0 -(1)- 1 -(3)- 2: leaf 2 pays for its own edge, the pair does not
    let instance = Instance::new(&[(0, 1, 1.0), (1, 2, 3.0)], &[1.0, 0.0, 3.5]);
    let input = instance.input(Pruning::None);
    let graph = Graph::new(&input);
    let tree = GrownTree {
        seed: 0,
        vertices: vec![0, 1, 2],
        attachments: vec![
            None,
            Some(Attachment {
                parent: 0,
                edge: 0,
                cost: 1.0,
            }),
            Some(Attachment {
                parent: 1,
                edge: 1,
                cost: 3.0,
            }),
        ],
    };

    let simple = prune(&graph, &tree, Pruning::Simple);
    assert_eq!(simple.vertices, [0, 1, 2]);
    assert_eq!(simple.edges, [0, 1]);
    let strong = prune(&graph, &tree, Pruning::Strong);
    assert_eq!(strong.vertices, [0]);
    assert!(strong.edges.is_empty());
    assert!((strong.net_value - 1.0).abs() < 1e-12);
}
