//! Ordered tuples of distinct weights with a fixed sum.

use itertools::Itertools;

use crate::graph::Weight;

/// Enumerates ordered `k`-tuples of distinct values from a pool whose sum is exactly `target_sum`.
///
/// Tuples are positional rather than symmetry-reduced: if both `(a, b)` and `(b, a)` sum to the target, both are produced.
///
/// Output order is deterministic: ascending by pool index at the first position, then at the second, and so on.
///
/// ```
/// use edgeperm::permutations::PermutationsWithSum;
///
/// let pool = (1..=10).collect::<Vec<_>>();
/// let mut found = Vec::new();
/// PermutationsWithSum::new(&pool, 2, 19).run(|tuple| found.push(tuple.to_vec()));
/// assert_eq!(found, vec![vec![9, 10], vec![10, 9]]);
/// ```
pub struct PermutationsWithSum<'a> {
    pool: &'a [Weight],
    used: Vec<bool>,
    perm: Vec<Weight>,
    target_sum: i64,
}

impl<'a> PermutationsWithSum<'a> {
    /// Prepare to enumerate `k`-tuples from `pool` summing to `target_sum`.
    ///
    /// `pool` must be sorted in ascending order with no duplicates.
    pub fn new(pool: &'a [Weight], k: usize, target_sum: i64) -> Self {
        debug_assert!(pool.iter().tuple_windows().all(|(a, b)| a < b), "pool must be strictly ascending");
        Self {
            pool,
            used: vec![false; pool.len()],
            perm: vec![0; k],
            target_sum,
        }
    }

    /// Call `consumer` with every matching tuple.
    pub fn run<F>(mut self, mut consumer: F)
    where
        F: FnMut(&[Weight]),
    {
        let k = self.perm.len();
        if self.target_sum < 0 || k > self.pool.len() {
            return;
        }
        if k == 0 {
            // the empty tuple sums to 0
            if self.target_sum == 0 {
                consumer(self.perm.as_slice());
            }
            return;
        }

        let max_possible_sum: i64 = self.pool[self.pool.len() - k..].iter().copied().map(i64::from).sum();
        if max_possible_sum < self.target_sum {
            return;
        }

        self.fill_from(0, 0, &mut consumer);
    }

    /// Collect every matching tuple.
    pub fn collect_vec(self) -> Vec<Vec<Weight>> {
        let mut found = Vec::new();
        self.run(|tuple| found.push(tuple.to_vec()));
        found
    }

    fn fill_from<F>(&mut self, pos: usize, cur_sum: i64, consumer: &mut F)
    where
        F: FnMut(&[Weight]),
    {
        debug_assert!(cur_sum <= self.target_sum);

        if pos == self.perm.len() - 1 {
            // only one value can finish the tuple
            let Ok(needed) = Weight::try_from(self.target_sum - cur_sum) else {
                return;
            };
            if let Ok(index) = self.pool.binary_search(&needed) {
                if !self.used[index] {
                    self.perm[pos] = needed;
                    consumer(self.perm.as_slice());
                }
            }
            return;
        }

        for index in 0..self.pool.len() {
            let value = self.pool[index];
            // the pool is ascending, so every later candidate overshoots too
            if cur_sum + i64::from(value) > self.target_sum {
                break;
            }
            if self.used[index] {
                continue;
            }

            self.perm[pos] = value;
            self.used[index] = true;
            self.fill_from(pos + 1, cur_sum + i64::from(value), consumer);
            self.used[index] = false;
        }
    }
}
