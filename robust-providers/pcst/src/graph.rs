//! Adjacency view over a [`SolverInput`].

use robust_core::SolverInput;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Link {
    pub(crate) to: usize,
    pub(crate) edge: usize,
    pub(crate) cost: f64,
}

/// Undirected adjacency lists with prizes, built once per solve.
#[derive(Debug)]
pub(crate) struct Graph<'a> {
    pub(crate) prizes: &'a [f64],
    adjacency: Vec<Vec<Link>>,
}

impl<'a> Graph<'a> {
    /// Builds adjacency lists; the input must already be validated.
    pub(crate) fn new(input: &SolverInput<'a>) -> Self {
        let mut adjacency = vec![Vec::new(); input.prizes.len()];
        for (edge, (key, &cost)) in input.edges.iter().zip(input.costs).enumerate() {
            let (low, high) = (key.low().get(), key.high().get());
            if let Some(arcs) = adjacency.get_mut(low) {
                arcs.push(Link {
                    to: high,
                    edge,
                    cost,
                });
            }
            if let Some(arcs) = adjacency.get_mut(high) {
                arcs.push(Link {
                    to: low,
                    edge,
                    cost,
                });
            }
        }
        Self {
            prizes: input.prizes,
            adjacency,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub(crate) fn prize(&self, vertex: usize) -> f64 {
        self.prizes.get(vertex).copied().unwrap_or(0.0)
    }

    /// Largest prize in the instance, `0.0` when there is none.
    pub(crate) fn max_prize(&self) -> f64 {
        self.prizes.iter().copied().fold(0.0, f64::max)
    }

    pub(crate) fn arcs(&self, vertex: usize) -> &[Link] {
        self.adjacency.get(vertex).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the connected components, each sorted by vertex id, ordered
    /// by their smallest vertex.
    pub(crate) fn components(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.len()];
        let mut components = Vec::new();
        for start in 0..self.len() {
            if seen.get(start).copied().unwrap_or(true) {
                continue;
            }
            let mut members = Vec::new();
            let mut stack = vec![start];
            if let Some(flag) = seen.get_mut(start) {
                *flag = true;
            }
            while let Some(vertex) = stack.pop() {
                members.push(vertex);
                for arc in self.arcs(vertex) {
                    if let Some(flag) = seen.get_mut(arc.to)
                        && !*flag
                    {
                        *flag = true;
                        stack.push(arc.to);
                    }
                }
            }
            members.sort_unstable();
            components.push(members);
        }
        components
    }
}
