//! Greedy prize-collecting growth from a single seed.
//!
//! Each round runs a multi-source Dijkstra from the current tree and
//! attaches the path whose newly collected prize exceeds its cost by the
//! largest margin. Growth stops when no path pays for itself.

use std::{cmp::Ordering, collections::BinaryHeap};

use crate::graph::Graph;

/// How a non-seed vertex hangs off its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Attachment {
    pub(crate) parent: usize,
    pub(crate) edge: usize,
    pub(crate) cost: f64,
}

/// Tree rooted at `seed`; `vertices` lists parents before their children.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GrownTree {
    pub(crate) seed: usize,
    pub(crate) vertices: Vec<usize>,
    pub(crate) attachments: Vec<Option<Attachment>>,
}

impl GrownTree {
    pub(crate) fn attachment(&self, vertex: usize) -> Option<Attachment> {
        self.attachments.get(vertex).copied().flatten()
    }
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    dist: f64,
    collected: f64,
    vertex: usize,
}

// Max-heap order: shorter distance first, then more collected prize, then
// lower vertex id.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| self.collected.total_cmp(&other.collected))
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

struct Frontier {
    dist: Vec<f64>,
    collected: Vec<f64>,
    via: Vec<Option<Attachment>>,
}

fn shortest_paths(graph: &Graph<'_>, in_tree: &[bool]) -> Frontier {
    let n = graph.len();
    let mut frontier = Frontier {
        dist: vec![f64::INFINITY; n],
        collected: vec![0.0; n],
        via: vec![None; n],
    };
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();
    for (vertex, _) in in_tree.iter().enumerate().filter(|(_, inside)| **inside) {
        if let Some(dist) = frontier.dist.get_mut(vertex) {
            *dist = 0.0;
        }
        heap.push(Entry {
            dist: 0.0,
            collected: 0.0,
            vertex,
        });
    }

    while let Some(Entry {
        dist,
        collected,
        vertex,
    }) = heap.pop()
    {
        match settled.get_mut(vertex) {
            Some(done) if !*done => *done = true,
            _ => continue,
        }
        for link in graph.arcs(vertex) {
            if in_tree.get(link.to).copied().unwrap_or(true)
                || settled.get(link.to).copied().unwrap_or(true)
            {
                continue;
            }
            let next_dist = dist + link.cost;
            let next_collected = collected + graph.prize(link.to);
            let (Some(best_dist), Some(best_collected), Some(via)) = (
                frontier.dist.get_mut(link.to),
                frontier.collected.get_mut(link.to),
                frontier.via.get_mut(link.to),
            ) else {
                continue;
            };
            let improves = next_dist < *best_dist
                || (next_dist == *best_dist && next_collected > *best_collected);
            if improves {
                *best_dist = next_dist;
                *best_collected = next_collected;
                *via = Some(Attachment {
                    parent: vertex,
                    edge: link.edge,
                    cost: link.cost,
                });
                heap.push(Entry {
                    dist: next_dist,
                    collected: next_collected,
                    vertex: link.to,
                });
            }
        }
    }
    frontier
}

fn best_target(frontier: &Frontier, in_tree: &[bool]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (vertex, (&dist, &collected)) in frontier.dist.iter().zip(&frontier.collected).enumerate() {
        if in_tree.get(vertex).copied().unwrap_or(true) || !dist.is_finite() {
            continue;
        }
        let gain = collected - dist;
        if gain <= 0.0 {
            continue;
        }
        if best.is_none_or(|(_, best_gain)| gain > best_gain) {
            best = Some((vertex, gain));
        }
    }
    best.map(|(vertex, _)| vertex)
}

/// Grows a tree from `seed` until no path has positive gain.
pub(crate) fn grow(graph: &Graph<'_>, seed: usize) -> GrownTree {
    let n = graph.len();
    let mut in_tree = vec![false; n];
    if let Some(flag) = in_tree.get_mut(seed) {
        *flag = true;
    }
    let mut tree = GrownTree {
        seed,
        vertices: vec![seed],
        attachments: vec![None; n],
    };

    loop {
        let frontier = shortest_paths(graph, &in_tree);
        let Some(target) = best_target(&frontier, &in_tree) else {
            break;
        };

        let mut path = Vec::new();
        let mut vertex = target;
        while !in_tree.get(vertex).copied().unwrap_or(true) {
            let Some(step) = frontier.via.get(vertex).copied().flatten() else {
                break;
            };
            path.push((vertex, step));
            vertex = step.parent;
        }
        if path.is_empty() {
            break;
        }
        for (vertex, step) in path.into_iter().rev() {
            if let Some(flag) = in_tree.get_mut(vertex) {
                *flag = true;
            }
            if let Some(slot) = tree.attachments.get_mut(vertex) {
                *slot = Some(step);
            }
            tree.vertices.push(vertex);
        }
    }
    tree
}
