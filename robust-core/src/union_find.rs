//! Union-find over dense ids, used to detect cycles in solver selections and
//! to label connected components.

#[derive(Clone, Debug)]
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Returns the representative of `node`, or `None` when out of range.
    pub(crate) fn find(&mut self, mut node: usize) -> Option<usize> {
        let mut root = node;
        loop {
            let parent = *self.parent.get(root)?;
            if parent == root {
                break;
            }
            root = parent;
        }

        while node != root {
            let slot = self.parent.get_mut(node)?;
            node = std::mem::replace(slot, root);
        }

        Some(root)
    }

    /// Merges the sets of `left` and `right`.
    ///
    /// Returns `Some(false)` when both were already in the same set.
    pub(crate) fn union(&mut self, left: usize, right: usize) -> Option<bool> {
        let mut left = self.find(left)?;
        let mut right = self.find(right)?;
        if left == right {
            return Some(false);
        }
        let left_rank = *self.rank.get(left)?;
        let right_rank = *self.rank.get(right)?;
        if left_rank < right_rank {
            std::mem::swap(&mut left, &mut right);
        }
        *self.parent.get_mut(right)? = left;
        if left_rank == right_rank {
            *self.rank.get_mut(left)? = left_rank.saturating_add(1);
        }
        Some(true)
    }
}
