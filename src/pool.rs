use itertools::Itertools;

use crate::graph::Weight;

/// The weights in `1..=num_edges` not currently given to any edge.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct WeightPool {
    // index 0 is unused
    available: Vec<bool>,
    len: usize,
}

impl WeightPool {
    pub(crate) fn full(num_edges: usize) -> Self {
        let mut available = vec![true; num_edges + 1];
        available[0] = false;
        Self { available, len: num_edges }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn contains(&self, weight: Weight) -> bool {
        self.available.get(weight as usize).copied().unwrap_or(false)
    }

    pub(crate) fn take(&mut self, weight: Weight) {
        debug_assert!(self.contains(weight), "weight {weight} is not in the pool");
        self.available[weight as usize] = false;
        self.len -= 1;
    }

    pub(crate) fn give_back(&mut self, weight: Weight) {
        debug_assert!(!self.contains(weight), "weight {weight} is already in the pool");
        self.available[weight as usize] = true;
        self.len += 1;
    }

    /// Available weights, ascending.
    pub(crate) fn to_sorted_vec(&self) -> Vec<Weight> {
        let weights = self.available.iter()
            .positions(|available| *available)
            .map(|weight| weight as Weight)
            .collect_vec();
        debug_assert_eq!(weights.len(), self.len);
        weights
    }
}
