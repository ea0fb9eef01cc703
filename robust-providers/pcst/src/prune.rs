//! Post-processing of grown trees.

use robust_core::Pruning;

use crate::{graph::Graph, growth::GrownTree};

/// A cluster ready to be reported.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Cluster {
    pub(crate) seed: usize,
    pub(crate) vertices: Vec<usize>,
    pub(crate) edges: Vec<usize>,
    pub(crate) net_value: f64,
}

impl Cluster {
    pub(crate) fn singleton(graph: &Graph<'_>, seed: usize) -> Self {
        Self {
            seed,
            vertices: vec![seed],
            edges: Vec::new(),
            net_value: graph.prize(seed),
        }
    }
}

/// Applies `mode` to `tree`; the seed is always kept.
pub(crate) fn prune(graph: &Graph<'_>, tree: &GrownTree, mode: Pruning) -> Cluster {
    let n = graph.len();
    let mut keep = vec![false; n];
    for &vertex in &tree.vertices {
        if let Some(flag) = keep.get_mut(vertex) {
            *flag = true;
        }
    }
    match mode {
        Pruning::None => {}
        Pruning::Simple => drop_cheap_leaves(graph, tree, &mut keep),
        Pruning::Strong => drop_unprofitable_subtrees(graph, tree, &mut keep),
    }

    let mut cluster = Cluster {
        seed: tree.seed,
        vertices: Vec::new(),
        edges: Vec::new(),
        net_value: 0.0,
    };
    for &vertex in &tree.vertices {
        if !keep.get(vertex).copied().unwrap_or(false) {
            continue;
        }
        cluster.vertices.push(vertex);
        cluster.net_value += graph.prize(vertex);
        if let Some(attachment) = tree.attachment(vertex) {
            cluster.edges.push(attachment.edge);
            cluster.net_value -= attachment.cost;
        }
    }
    cluster
}

fn drop_cheap_leaves(graph: &Graph<'_>, tree: &GrownTree, keep: &mut [bool]) {
    let mut children = vec![0_usize; graph.len()];
    for &vertex in &tree.vertices {
        if let Some(attachment) = tree.attachment(vertex)
            && let Some(count) = children.get_mut(attachment.parent)
        {
            *count += 1;
        }
    }

    let mut changed = true;
    while changed {
        changed = false;
        for &vertex in tree.vertices.iter().rev() {
            let Some(attachment) = tree.attachment(vertex) else {
                continue;
            };
            let is_live_leaf = keep.get(vertex).copied().unwrap_or(false)
                && children.get(vertex).copied().unwrap_or(0) == 0;
            if is_live_leaf && graph.prize(vertex) < attachment.cost {
                if let Some(flag) = keep.get_mut(vertex) {
                    *flag = false;
                }
                if let Some(count) = children.get_mut(attachment.parent) {
                    *count = count.saturating_sub(1);
                }
                changed = true;
            }
        }
    }
}

fn drop_unprofitable_subtrees(graph: &Graph<'_>, tree: &GrownTree, keep: &mut [bool]) {
    let mut value = vec![0.0_f64; graph.len()];
    for &vertex in tree.vertices.iter().rev() {
        let own = graph.prize(vertex) + value.get(vertex).copied().unwrap_or(0.0);
        let Some(attachment) = tree.attachment(vertex) else {
            continue;
        };
        let net = own - attachment.cost;
        if net > 0.0 {
            if let Some(parent_value) = value.get_mut(attachment.parent) {
                *parent_value += net;
            }
        } else if let Some(flag) = keep.get_mut(vertex) {
            *flag = false;
        }
    }

    // children of a dropped subtree go with it
    for &vertex in &tree.vertices {
        if let Some(attachment) = tree.attachment(vertex)
            && !keep.get(attachment.parent).copied().unwrap_or(false)
            && let Some(flag) = keep.get_mut(vertex)
        {
            *flag = false;
        }
    }
}
