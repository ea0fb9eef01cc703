//! Deduplicated collection of trees and the statistics derived from it.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use crate::{
    Result,
    cost::EdgeCost,
    error::RobustError,
    network::TerminalSet,
    tree::Tree,
    union_find::DisjointSet,
};

/// Append-only ordered set of trees, unique by vertex set.
///
/// Cost statistics always use the cost function passed to the query, never
/// the penalised values the solver searched with.
///
/// # Examples
/// ```
/// use robust_core::{EdgeCostPolicy, SolutionSet, TerminalSet, Tree};
///
/// let mut set = SolutionSet::new(TerminalSet::new(["a", "c"])?);
/// assert!(set.insert(Tree::new(["a", "b", "c"], [("a", "b"), ("b", "c")])?));
/// // same vertices, different edges
/// assert!(!set.insert(Tree::new(["a", "b", "c"], [("a", "b"), ("a", "c")])?));
/// assert!(set.insert(Tree::new(["a", "d", "c"], [("a", "d"), ("d", "c")])?));
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.occurrence_fraction("b")?, 0.5);
/// assert_eq!(set.avg_cost(&EdgeCostPolicy::Uniform)?, 2.0);
/// # Ok::<(), robust_core::RobustError>(())
/// ```
#[derive(Clone, Debug)]
pub struct SolutionSet {
    terminals: TerminalSet,
    trees: Vec<Tree>,
}

/// One row of the per-vertex occurrence table.
#[derive(Clone, Debug, PartialEq)]
pub struct OccurrenceRow {
    /// Vertex label.
    pub label: Arc<str>,
    /// Number of considered trees containing the vertex.
    pub count: usize,
    /// `count` divided by the number of considered trees.
    pub fraction: f64,
    /// Whether the vertex is a terminal.
    pub is_terminal: bool,
}

/// Aggregate figures reported after a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolutionSummary {
    /// Number of trees.
    pub trees: usize,
    /// Number of distinct vertices across all trees.
    pub distinct_vertices: usize,
    /// Mean vertex count.
    pub avg_size: f64,
    /// Cheapest tree.
    pub min_cost: f64,
    /// Mean tree cost.
    pub avg_cost: f64,
    /// Most expensive tree.
    pub max_cost: f64,
}

struct Tally {
    label: Arc<str>,
    count: usize,
    trees: Vec<usize>,
}

impl SolutionSet {
    /// Creates an empty set for trees over `terminals`.
    #[must_use]
    pub fn new(terminals: TerminalSet) -> Self {
        Self {
            terminals,
            trees: Vec::new(),
        }
    }

    /// Appends `tree` unless a tree with the same vertex set is present.
    ///
    /// Returns whether the tree was added.
    pub fn insert(&mut self, tree: Tree) -> bool {
        if self.contains(&tree) {
            return false;
        }
        self.trees.push(tree);
        true
    }

    /// Returns whether a tree with the same vertex set is present.
    #[must_use]
    pub fn contains(&self, tree: &Tree) -> bool {
        self.trees.iter().any(|existing| existing.same_vertices(tree))
    }

    /// Returns the number of trees.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.trees.len() }

    /// Returns whether no tree has been collected.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.trees.is_empty() }

    /// Returns the tree at `position` in insertion order.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Tree> {
        self.trees.get(position)
    }

    /// Iterates over the trees in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }

    /// Returns the terminal set the trees were built for.
    #[must_use]
    #[rustfmt::skip]
    pub fn terminals(&self) -> &TerminalSet { &self.terminals }

    /// Returns the union of all vertex sets in first-encounter order.
    #[must_use]
    pub fn vertices(&self) -> Vec<Arc<str>> {
        let mut seen = HashSet::new();
        self.trees
            .iter()
            .flat_map(Tree::vertices)
            .filter(|label| seen.insert(Arc::clone(label)))
            .cloned()
            .collect()
    }

    /// Returns the number of distinct vertices across all trees.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    /// Returns the cheapest tree cost under `cost`.
    ///
    /// # Errors
    /// Returns [`RobustError::EmptySolutionSet`] when no tree was collected.
    pub fn min_cost<C>(&self, cost: &C) -> Result<f64>
    where
        C: EdgeCost + ?Sized,
    {
        self.costs(cost)
            .reduce(f64::min)
            .ok_or(RobustError::EmptySolutionSet)
    }

    /// Returns the most expensive tree cost under `cost`.
    ///
    /// # Errors
    /// Returns [`RobustError::EmptySolutionSet`] when no tree was collected.
    pub fn max_cost<C>(&self, cost: &C) -> Result<f64>
    where
        C: EdgeCost + ?Sized,
    {
        self.costs(cost)
            .reduce(f64::max)
            .ok_or(RobustError::EmptySolutionSet)
    }

    /// Returns the mean tree cost under `cost`.
    ///
    /// # Errors
    /// Returns [`RobustError::EmptySolutionSet`] when no tree was collected.
    pub fn avg_cost<C>(&self, cost: &C) -> Result<f64>
    where
        C: EdgeCost + ?Sized,
    {
        let total: f64 = self.costs(cost).sum();
        Ok(total / self.non_empty_len()? as f64)
    }

    /// Returns the mean number of vertices per tree.
    ///
    /// # Errors
    /// Returns [`RobustError::EmptySolutionSet`] when no tree was collected.
    pub fn avg_size(&self) -> Result<f64> {
        let total: usize = self.trees.iter().map(Tree::vertex_count).sum();
        Ok(total as f64 / self.non_empty_len()? as f64)
    }

    /// Collects every aggregate in one pass over the set.
    ///
    /// # Errors
    /// Returns [`RobustError::EmptySolutionSet`] when no tree was collected.
    pub fn summary<C>(&self, cost: &C) -> Result<SolutionSummary>
    where
        C: EdgeCost + ?Sized,
    {
        Ok(SolutionSummary {
            trees: self.non_empty_len()?,
            distinct_vertices: self.vertex_count(),
            avg_size: self.avg_size()?,
            min_cost: self.min_cost(cost)?,
            avg_cost: self.avg_cost(cost)?,
            max_cost: self.max_cost(cost)?,
        })
    }

    /// Returns the number of trees containing `label`.
    #[must_use]
    pub fn occurrence_count(&self, label: &str) -> usize {
        self.trees.iter().filter(|tree| tree.contains(label)).count()
    }

    /// Returns the share of trees containing `label`.
    ///
    /// # Errors
    /// Returns [`RobustError::EmptySolutionSet`] when no tree was collected.
    pub fn occurrence_fraction(&self, label: &str) -> Result<f64> {
        let len = self.non_empty_len()?;
        Ok(self.occurrence_count(label) as f64 / len as f64)
    }

    /// Builds the per-vertex occurrence table.
    ///
    /// Only the first `first_n` trees are considered when given. Rows are
    /// sorted by count, descending; equal counts keep encounter order.
    ///
    /// # Errors
    /// Returns [`RobustError::EmptySolutionSet`] when no tree was collected
    /// and [`RobustError::InvalidParameter`] when `first_n` is zero.
    pub fn occurrences(
        &self,
        include_terminals: bool,
        first_n: Option<usize>,
    ) -> Result<Vec<OccurrenceRow>> {
        let len = self.non_empty_len()?;
        let considered = match first_n {
            Some(0) => {
                return Err(RobustError::InvalidParameter {
                    name: "first_n",
                    value: 0.0,
                    expected: ">= 1",
                });
            }
            Some(limit) => limit.min(len),
            None => len,
        };
        let mut rows: Vec<OccurrenceRow> = self
            .tally(considered)
            .into_iter()
            .map(|tally| OccurrenceRow {
                is_terminal: self.terminals.contains(&tally.label),
                fraction: tally.count as f64 / considered as f64,
                count: tally.count,
                label: tally.label,
            })
            .filter(|row| include_terminals || !row.is_terminal)
            .collect();
        rows.sort_by(|left, right| right.count.cmp(&left.count));
        Ok(rows)
    }

    /// Returns the union graph induced on vertices whose occurrence fraction
    /// is at least `threshold`.
    ///
    /// A threshold of `0.0` keeps the union of all trees; `1.0` keeps their
    /// intersection.
    ///
    /// # Errors
    /// Returns [`RobustError::EmptySolutionSet`] when no tree was collected
    /// and [`RobustError::InvalidParameter`] when `threshold` is outside
    /// `[0, 1]`.
    pub fn subgraph(&self, threshold: f64) -> Result<ModuleGraph> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(RobustError::InvalidParameter {
                name: "threshold",
                value: threshold,
                expected: "in [0, 1]",
            });
        }
        let len = self.non_empty_len()?;
        let nodes: Vec<ModuleNode> = self
            .tally(len)
            .into_iter()
            .map(|tally| ModuleNode {
                is_terminal: self.terminals.contains(&tally.label),
                fraction: tally.count as f64 / len as f64,
                count: tally.count,
                trees: tally.trees,
                label: tally.label,
            })
            .filter(|node| node.fraction >= threshold)
            .collect();
        let positions: HashMap<Arc<str>, usize> = nodes
            .iter()
            .enumerate()
            .map(|(position, node)| (Arc::clone(&node.label), position))
            .collect();

        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for (left, right) in self.trees.iter().flat_map(Tree::edges) {
            let (Some(&l), Some(&r)) = (positions.get(left), positions.get(right)) else {
                continue;
            };
            if seen.insert((l.min(r), l.max(r))) {
                edges.push((l, r));
            }
        }
        Ok(ModuleGraph { nodes, edges })
    }

    fn costs<'a, C>(&'a self, cost: &'a C) -> impl Iterator<Item = f64> + 'a
    where
        C: EdgeCost + ?Sized,
    {
        self.trees.iter().map(move |tree| tree.cost(cost))
    }

    fn non_empty_len(&self) -> Result<usize> {
        if self.trees.is_empty() {
            Err(RobustError::EmptySolutionSet)
        } else {
            Ok(self.trees.len())
        }
    }

    fn tally(&self, considered: usize) -> Vec<Tally> {
        let mut positions: HashMap<Arc<str>, usize> = HashMap::new();
        let mut tallies: Vec<Tally> = Vec::new();
        for (tree_position, tree) in self.trees.iter().take(considered).enumerate() {
            for label in tree.vertices() {
                let position = *positions.entry(Arc::clone(label)).or_insert_with(|| {
                    tallies.push(Tally {
                        label: Arc::clone(label),
                        count: 0,
                        trees: Vec::new(),
                    });
                    tallies.len() - 1
                });
                if let Some(tally) = tallies.get_mut(position) {
                    tally.count += 1;
                    tally.trees.push(tree_position);
                }
            }
        }
        tallies
    }
}

impl<'a> IntoIterator for &'a SolutionSet {
    type Item = &'a Tree;
    type IntoIter = std::slice::Iter<'a, Tree>;

    fn into_iter(self) -> Self::IntoIter {
        self.trees.iter()
    }
}

/// Vertex of a [`ModuleGraph`] with its occurrence attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleNode {
    /// Vertex label.
    pub label: Arc<str>,
    /// Whether the vertex is a terminal.
    pub is_terminal: bool,
    /// Number of trees containing the vertex.
    pub count: usize,
    /// Share of trees containing the vertex.
    pub fraction: f64,
    /// Positions of the trees containing the vertex.
    pub trees: Vec<usize>,
}

/// Thresholded union of a [`SolutionSet`]'s trees.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModuleGraph {
    nodes: Vec<ModuleNode>,
    edges: Vec<(usize, usize)>,
}

impl ModuleGraph {
    /// Returns the nodes in first-encounter order.
    #[must_use]
    #[rustfmt::skip]
    pub fn nodes(&self) -> &[ModuleNode] { &self.nodes }

    /// Returns the node labelled `label`.
    #[must_use]
    pub fn node(&self, label: &str) -> Option<&ModuleNode> {
        self.nodes.iter().find(|node| &*node.label == label)
    }

    /// Returns whether the graph has no nodes.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Iterates over the edges as label pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&Arc<str>, &Arc<str>)> {
        self.edges.iter().filter_map(|&(left, right)| {
            Some((&self.nodes.get(left)?.label, &self.nodes.get(right)?.label))
        })
    }

    /// Returns the number of edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Groups node labels by connected component, largest component first;
    /// equal sizes keep the order of their first node.
    #[must_use]
    pub fn connected_components(&self) -> Vec<Vec<Arc<str>>> {
        let mut components = DisjointSet::new(self.nodes.len());
        for &(left, right) in &self.edges {
            components.union(left, right);
        }
        let mut groups: Vec<Vec<Arc<str>>> = Vec::new();
        let mut group_of_root: HashMap<usize, usize> = HashMap::new();
        for (position, node) in self.nodes.iter().enumerate() {
            let root = components.find(position).unwrap_or(position);
            let group = *group_of_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            if let Some(members) = groups.get_mut(group) {
                members.push(Arc::clone(&node.label));
            }
        }
        groups.sort_by(|left, right| right.len().cmp(&left.len()));
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EdgeCostPolicy;
    use rstest::{fixture, rstest};

    fn tree(vertices: &[&str], edges: &[(&str, &str)]) -> Tree {
        Tree::new(vertices.iter().copied(), edges.iter().copied()).expect("fixture is a tree")
    }

    #[fixture]
    fn set() -> SolutionSet {
        let mut set = SolutionSet::new(TerminalSet::new(["a", "e"]).expect("non-empty"));
        set.insert(tree(&["a", "b", "e"], &[("a", "b"), ("b", "e")]));
        set.insert(tree(&["a", "c", "e"], &[("a", "c"), ("c", "e")]));
        set.insert(tree(
            &["a", "b", "c", "e"],
            &[("a", "b"), ("b", "c"), ("c", "e")],
        ));
        set
    }

    #[rstest]
    fn aggregates_over_empty_set_fail() {
        let empty = SolutionSet::new(TerminalSet::new(["a"]).expect("non-empty"));
        assert_eq!(empty.avg_size(), Err(RobustError::EmptySolutionSet));
        assert_eq!(
            empty.avg_cost(&EdgeCostPolicy::Uniform),
            Err(RobustError::EmptySolutionSet)
        );
        assert_eq!(
            empty.min_cost(&EdgeCostPolicy::Uniform),
            Err(RobustError::EmptySolutionSet)
        );
        assert!(empty.occurrences(true, None).is_err());
        assert!(empty.subgraph(0.5).is_err());
        assert_eq!(empty.occurrence_count("a"), 0);
    }

    #[rstest]
    fn cost_statistics_use_supplied_cost(set: SolutionSet) {
        let doubled = |_: &str, _: &str| 2.0;
        assert_eq!(set.min_cost(&doubled), Ok(4.0));
        assert_eq!(set.max_cost(&doubled), Ok(6.0));
        let avg = set.avg_cost(&doubled).expect("set is not empty");
        assert!((avg - 14.0 / 3.0).abs() < 1e-12);
        let size = set.avg_size().expect("set is not empty");
        assert!((size - 10.0 / 3.0).abs() < 1e-12);
    }

    #[rstest]
    fn occurrence_table_sorts_by_count_with_stable_ties(set: SolutionSet) {
        let rows = set.occurrences(true, None).expect("set is not empty");
        let labels: Vec<&str> = rows.iter().map(|row| &*row.label).collect();
        assert_eq!(labels, ["a", "e", "b", "c"]);
        let counts: Vec<usize> = rows.iter().map(|row| row.count).collect();
        assert_eq!(counts, [3, 3, 2, 2]);
        assert!(rows.iter().take(2).all(|row| row.is_terminal));
    }

    #[rstest]
    fn occurrence_table_can_skip_terminals_and_limit_trees(set: SolutionSet) {
        let rows = set.occurrences(false, Some(2)).expect("set is not empty");
        assert_eq!(
            rows,
            [
                OccurrenceRow {
                    label: Arc::from("b"),
                    count: 1,
                    fraction: 0.5,
                    is_terminal: false,
                },
                OccurrenceRow {
                    label: Arc::from("c"),
                    count: 1,
                    fraction: 0.5,
                    is_terminal: false,
                },
            ]
        );
    }

    #[rstest]
    #[case(1.0, &["a", "e"])]
    #[case(0.5, &["a", "b", "e", "c"])]
    #[case(0.0, &["a", "b", "e", "c"])]
    fn subgraph_keeps_vertices_above_threshold(
        set: SolutionSet,
        #[case] threshold: f64,
        #[case] expected: &[&str],
    ) {
        let graph = set.subgraph(threshold).expect("threshold is valid");
        let labels: Vec<&str> = graph.nodes().iter().map(|node| &*node.label).collect();
        assert_eq!(labels, expected);
    }

    #[rstest]
    fn subgraph_intersection_has_no_edges_between_terminals(set: SolutionSet) {
        let graph = set.subgraph(1.0).expect("threshold is valid");
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.connected_components().len(), 2);
        let node = graph.node("a").expect("a is kept");
        assert_eq!(node.trees, [0, 1, 2]);
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.5)]
    #[case(f64::NAN)]
    fn subgraph_rejects_threshold_outside_unit_interval(set: SolutionSet, #[case] threshold: f64) {
        let err = set.subgraph(threshold).expect_err("threshold is invalid");
        assert!(matches!(err, RobustError::InvalidParameter { name: "threshold", .. }));
    }

    #[rstest]
    fn components_are_ordered_largest_first() {
        let mut set = SolutionSet::new(TerminalSet::new(["x"]).expect("non-empty"));
        set.insert(tree(&["x"], &[]));
        set.insert(tree(&["p", "q", "r"], &[("p", "q"), ("q", "r")]));
        let components = set
            .subgraph(0.0)
            .expect("threshold is valid")
            .connected_components();
        let sizes: Vec<usize> = components.iter().map(Vec::len).collect();
        assert_eq!(sizes, [3, 1]);
        assert_eq!(&*components[1][0], "x");
    }
}
