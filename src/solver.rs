use std::fmt::{Display, Formatter};
use std::mem;
use std::num::NonZero;

use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, trace, warn};
use unordered_pair::UnorderedPair;

use crate::config::{LeftoverPolicy, SolveConfig};
use crate::graph::{canonical, EdgeWeights, Puzzle, VertexId, Weight};
use crate::path::PathFinder;
use crate::permutations::PermutationsWithSum;
use crate::pool::WeightPool;

/// Reasons a [`Solver`] may refuse to solve a puzzle.
///
/// An unsatisfiable puzzle is not a failure; it simply yields no solutions.
#[derive(Debug, Error)]
pub enum SolverFailure {
    /// Some unfilled edges touch no vertex with a sum-of-weights constraint and the configured
    /// [`LeftoverPolicy`] is [`Reject`](LeftoverPolicy::Reject).
    #[error("{} unfilled edge(s) touch no vertex with a sum-of-weights constraint", .unfilled_edges.len())]
    UnsupportedConfiguration {
        /// The offending edges.
        unfilled_edges: Vec<UnorderedPair<VertexId>>,
    },
}

/// A complete weighting satisfying every constraint of a [`Puzzle`].
///
/// Displays as one `(v1, v2) => weight` line per edge, lower vertex id first, edges in ascending order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Solution {
    // same order as Puzzle::edges
    weights: Vec<((VertexId, VertexId), Weight)>,
}

impl Solution {
    fn capture(puzzle: &Puzzle, weights: &EdgeWeights) -> Self {
        Self {
            weights: puzzle.edges.iter()
                .map(|&(v1, v2)| ((v1, v2), weights.get(v1, v2)))
                .collect_vec(),
        }
    }

    /// The weight of the edge between `v1` and `v2`, or [`None`] if they are not adjacent.
    pub fn weight(&self, v1: VertexId, v2: VertexId) -> Option<Weight> {
        self.weights
            .binary_search_by_key(&canonical(v1, v2), |(edge, _)| *edge)
            .ok()
            .map(|index| self.weights[index].1)
    }

    /// Every edge with its weight, in the order of [`Puzzle::edges`].
    pub fn edges(&self) -> impl Iterator<Item = (UnorderedPair<VertexId>, Weight)> + '_ {
        self.weights.iter().map(|&((v1, v2), weight)| (UnorderedPair(v1, v2), weight))
    }

    /// Just the weights, in the order of [`Puzzle::edges`].
    pub fn weights(&self) -> impl Iterator<Item = Weight> + '_ {
        self.weights.iter().map(|(_, weight)| *weight)
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for ((v1, v2), weight) in &self.weights {
            writeln!(f, "({v1}, {v2}) => {weight}")?;
        }
        Ok(())
    }
}

/// Counters describing the work done by one [`Solver::solve`] call.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SolveStats {
    /// Search frames entered, including the final validation frames.
    pub frames: u64,
    /// Candidate tuples tried, whether or not they led anywhere.
    pub candidates: u64,
    /// Path constraints evaluated against complete weightings.
    pub path_checks: u64,
    /// Solutions reported.
    pub solutions: u64,
}

/// The mutable half of a search: edge weights and the weights still unassigned.
///
/// Filled edges and the pool always partition `1..=num_edges`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct SearchState {
    pub(crate) weights: EdgeWeights,
    pub(crate) pool: WeightPool,
}

/// Edges filled by [`SearchState::assign`], to be handed back to [`SearchState::restore`].
#[must_use = "touched edges must be restored before the next candidate is tried"]
pub(crate) struct Touched {
    edges: Vec<(VertexId, VertexId, Weight)>,
}

impl SearchState {
    pub(crate) fn from_puzzle(puzzle: &Puzzle) -> Self {
        Self {
            weights: puzzle.initial_weights.clone(),
            pool: puzzle.initial_pool(),
        }
    }

    /// Give `values[j]` to `edges[j]` for every `j`, taking the values out of the pool.
    pub(crate) fn assign(&mut self, edges: &[(VertexId, VertexId)], values: &[Weight]) -> Touched {
        debug_assert_eq!(edges.len(), values.len());
        let edges = edges.iter()
            .zip(values)
            .map(|(&(v1, v2), &weight)| {
                debug_assert_eq!(self.weights.get(v1, v2), 0, "edge ({v1}, {v2}) is already filled");
                self.weights.set(v1, v2, weight);
                self.pool.take(weight);
                (v1, v2, weight)
            })
            .collect_vec();

        Touched { edges }
    }

    pub(crate) fn restore(&mut self, touched: Touched) {
        for (v1, v2, weight) in touched.edges {
            debug_assert_eq!(self.weights.get(v1, v2), weight);
            self.weights.set(v1, v2, 0);
            self.pool.give_back(weight);
        }
    }
}

/// Backtracking search over every edge weighting of a [`Puzzle`].
///
/// Vertices with a sum-of-weights constraint are visited in ascending order of their target.
/// At each one, the unfilled incident edges receive every ordered tuple of unused weights making up the remaining sum.
/// Once all such vertices are satisfied, any edges outside every sum constraint are handled per [`LeftoverPolicy`],
/// and the complete weighting is checked against the path constraints, shortest first.
///
/// The search always runs to exhaustion; every solution goes to the handler passed to [`Self::solve`].
pub struct Solver<'a> {
    puzzle: &'a Puzzle,
    config: SolveConfig,
    frontier: Vec<VertexId>,
    path_constraints: Vec<(VertexId, Weight)>,
}

impl<'a> From<&'a Puzzle> for Solver<'a> {
    fn from(puzzle: &'a Puzzle) -> Self {
        Self::with_config(puzzle, SolveConfig::default())
    }
}

impl<'a> Solver<'a> {
    /// A solver with the default [`SolveConfig`].
    pub fn new(puzzle: &'a Puzzle) -> Self {
        Self::from(puzzle)
    }

    /// A solver using `config`.
    pub fn with_config(puzzle: &'a Puzzle, config: SolveConfig) -> Self {
        let frontier = puzzle.vertices.iter()
            .enumerate()
            .filter_map(|(v, vertex)| vertex.sum_of_weights.map(|sum| (v, sum)))
            .sorted_by_key(|(_, sum)| *sum)
            .map(|(v, _)| v)
            .collect_vec();

        let path_constraints = puzzle.vertices.iter()
            .enumerate()
            .flat_map(|(v, vertex)| vertex.path_weights.iter().map(move |weight| (v, weight.get())))
            .sorted_by_key(|(_, weight)| *weight)
            .collect_vec();

        Self {
            puzzle,
            config,
            frontier,
            path_constraints,
        }
    }

    /// Sum-constrained vertices in the order the search visits them.
    pub fn frontier(&self) -> &[VertexId] {
        &self.frontier
    }

    /// Unfilled edges with no sum-constrained endpoint.
    pub fn leftover_edges(&self) -> Vec<UnorderedPair<VertexId>> {
        self.leftover_pairs().into_iter().map(|(v1, v2)| UnorderedPair(v1, v2)).collect_vec()
    }

    fn leftover_pairs(&self) -> Vec<(VertexId, VertexId)> {
        let constrained = |v: VertexId| self.puzzle.vertices[v].sum_of_weights.is_some();
        self.puzzle.edges.iter()
            .copied()
            .filter(|&(v1, v2)| self.puzzle.initial_weights.get(v1, v2) == 0 && !constrained(v1) && !constrained(v2))
            .collect_vec()
    }

    /// Search exhaustively, calling `handler` with each solution in the order found.
    ///
    /// Returns statistics on the search, or [`SolverFailure`] if the puzzle is refused before searching.
    pub fn solve<F>(&self, handler: F) -> Result<SolveStats, SolverFailure>
    where
        F: FnMut(&Solution),
    {
        let mut search = self.start_search(handler)?;
        search.descend(0);
        debug_assert_eq!(search.state, SearchState::from_puzzle(self.puzzle), "search did not restore its state");

        let stats = search.stats;
        debug!(
            event = "solve_end",
            frames = stats.frames,
            candidates = stats.candidates,
            path_checks = stats.path_checks,
            solutions = stats.solutions,
        );
        Ok(stats)
    }

    /// Search exhaustively and collect every solution.
    pub fn solutions(&self) -> Result<Vec<Solution>, SolverFailure> {
        let mut found = Vec::new();
        self.solve(|solution| found.push(solution.clone()))?;
        Ok(found)
    }

    pub(crate) fn start_search<F>(&self, handler: F) -> Result<Search<'_, F>, SolverFailure>
    where
        F: FnMut(&Solution),
    {
        let leftover = self.leftover_pairs();
        if !leftover.is_empty() && self.config.leftover_edges == LeftoverPolicy::Reject {
            warn!(event = "unsupported_configuration", unfilled_edges = leftover.len());
            return Err(SolverFailure::UnsupportedConfiguration {
                unfilled_edges: leftover.into_iter().map(|(v1, v2)| UnorderedPair(v1, v2)).collect_vec(),
            });
        }

        debug!(
            event = "solve_start",
            vertices = self.puzzle.num_vertices(),
            edges = self.puzzle.num_edges(),
            frontier = self.frontier.len(),
            path_constraints = self.path_constraints.len(),
            leftover_edges = leftover.len(),
            leftover_policy = %self.config.leftover_edges,
        );

        Ok(Search {
            puzzle: self.puzzle,
            frontier: &self.frontier,
            path_constraints: &self.path_constraints,
            leftover,
            state: SearchState::from_puzzle(self.puzzle),
            path_finder: PathFinder::new(self.puzzle.num_vertices()),
            stats: SolveStats::default(),
            handler,
        })
    }
}

/// One run of a [`Solver`], owning all state mutated while searching.
pub(crate) struct Search<'s, F> {
    puzzle: &'s Puzzle,
    frontier: &'s [VertexId],
    path_constraints: &'s [(VertexId, Weight)],
    leftover: Vec<(VertexId, VertexId)>,
    pub(crate) state: SearchState,
    path_finder: PathFinder,
    pub(crate) stats: SolveStats,
    handler: F,
}

impl<F> Search<'_, F>
where
    F: FnMut(&Solution),
{
    /// Satisfy `frontier[index]` in every possible way, recursing into the next vertex for each.
    pub(crate) fn descend(&mut self, index: usize) {
        self.stats.frames += 1;

        let frontier = self.frontier;
        let Some(&v) = frontier.get(index) else {
            self.fill_leftover();
            return;
        };

        let puzzle = self.puzzle;
        let vertex = &puzzle.vertices[v];
        let target = vertex.sum_of_weights.map_or(0, NonZero::get);

        let mut partial_sum = 0i64;
        let mut unfilled = Vec::with_capacity(vertex.neighbors.len());
        for &neighbor in &vertex.neighbors {
            let weight = self.state.weights.get(v, neighbor);
            partial_sum += i64::from(weight);
            if weight == 0 {
                unfilled.push((v, neighbor));
            }
        }

        // when every incident edge is already filled this is a k = 0 run, which still checks the sum
        let residual = i64::from(target) - partial_sum;
        let pool = self.state.pool.to_sorted_vec();
        PermutationsWithSum::new(&pool, unfilled.len(), residual).run(|values| {
            self.stats.candidates += 1;
            let touched = self.state.assign(&unfilled, values);
            self.descend(index + 1);
            self.state.restore(touched);
        });
    }

    fn fill_leftover(&mut self) {
        if self.state.pool.is_empty() {
            self.validate();
            return;
        }

        // every edge touching a sum-constrained vertex is filled by now, so exactly the leftover edges remain
        let leftover = mem::take(&mut self.leftover);
        debug_assert_eq!(leftover.len(), self.state.pool.len());

        let pool = self.state.pool.to_sorted_vec();
        let everything = pool.iter().copied().map(i64::from).sum();
        PermutationsWithSum::new(&pool, leftover.len(), everything).run(|values| {
            self.stats.candidates += 1;
            let touched = self.state.assign(&leftover, values);
            self.validate();
            self.state.restore(touched);
        });

        self.leftover = leftover;
    }

    fn validate(&mut self) {
        let puzzle = self.puzzle;
        let path_constraints = self.path_constraints;
        for &(start, target) in path_constraints {
            self.stats.path_checks += 1;
            if !self.path_finder.exists(&puzzle.vertices, &self.state.weights, start, target) {
                return;
            }
        }

        self.stats.solutions += 1;
        trace!(event = "solution", index = self.stats.solutions);
        let solution = Solution::capture(puzzle, &self.state.weights);
        (self.handler)(&solution);
    }
}
