use std::num::NonZero;

use ndarray::Array2;
use unordered_pair::UnorderedPair;

use crate::pool::WeightPool;
use crate::solver::{Solution, SolveStats, Solver, SolverFailure};

/// Index of a vertex, in `0..num_vertices`.
pub type VertexId = usize;
/// An edge weight. `0` marks an edge which has not been filled yet.
pub type Weight = u32;

/// The largest number of vertices a [`Puzzle`] may have.
pub const MAX_VERTICES: usize = 18;

#[inline]
pub(crate) fn canonical(v1: VertexId, v2: VertexId) -> (VertexId, VertexId) {
    if v1 < v2 { (v1, v2) } else { (v2, v1) }
}

/// A vertex of a [`Puzzle`] along with the constraints placed on it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Vertex {
    // sorted, no duplicates
    pub(crate) neighbors: Vec<VertexId>,
    pub(crate) sum_of_weights: Option<NonZero<Weight>>,
    pub(crate) path_weights: Vec<NonZero<Weight>>,
}

impl Vertex {
    /// Ids of adjacent vertices, in ascending order.
    pub fn neighbors(&self) -> &[VertexId] {
        &self.neighbors
    }

    /// The required sum of the weights of all incident edges, if constrained.
    pub fn sum_of_weights(&self) -> Option<NonZero<Weight>> {
        self.sum_of_weights
    }

    /// Weights for which some simple path starting at this vertex must exist.
    pub fn path_weights(&self) -> &[NonZero<Weight>] {
        &self.path_weights
    }
}

/// Weights of every vertex pair, addressed in either order.
///
/// Only pairs listed as neighbors on a [`Vertex`] are meaningful.
/// Vertex ids are validated once when the [`Puzzle`] is built and never again here.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EdgeWeights {
    // upper triangle only
    weights: Array2<Weight>,
}

impl EdgeWeights {
    pub(crate) fn new(num_vertices: usize) -> Self {
        Self { weights: Array2::zeros((num_vertices, num_vertices)) }
    }

    #[inline]
    pub(crate) fn get(&self, v1: VertexId, v2: VertexId) -> Weight {
        self.weights[canonical(v1, v2)]
    }

    #[inline]
    pub(crate) fn set(&mut self, v1: VertexId, v2: VertexId, weight: Weight) {
        self.weights[canonical(v1, v2)] = weight;
    }
}

/// A validated puzzle: an undirected graph, a partial weighting of its edges, and the constraints the full weighting must meet.
///
/// Build one with a [`PuzzleBuilder`](crate::builder::PuzzleBuilder) or parse one with [`input::parse`](crate::input::parse).
#[derive(Clone, Debug)]
pub struct Puzzle {
    pub(crate) vertices: Vec<Vertex>,
    // canonical, ascending
    pub(crate) edges: Vec<(VertexId, VertexId)>,
    pub(crate) initial_weights: EdgeWeights,
    pub(crate) secret_vertices: (VertexId, VertexId),
}

impl Puzzle {
    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges, which is also the largest weight.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// The vertex with id `v`.
    ///
    /// # Panics
    /// If `v` is not below [`Self::num_vertices`].
    pub fn vertex(&self, v: VertexId) -> &Vertex {
        &self.vertices[v]
    }

    /// All vertices, indexed by id.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Every edge, in ascending order of `(lower id, higher id)`.
    pub fn edges(&self) -> impl Iterator<Item = UnorderedPair<VertexId>> + '_ {
        self.edges.iter().map(|&(v1, v2)| UnorderedPair(v1, v2))
    }

    /// The weight given to the edge between `v1` and `v2` before solving, if any.
    ///
    /// Returns [`None`] both for unfilled edges and for pairs which are not adjacent.
    pub fn initial_weight(&self, v1: VertexId, v2: VertexId) -> Option<Weight> {
        if v1.max(v2) >= self.num_vertices() {
            return None;
        }
        Some(self.initial_weights.get(v1, v2)).filter(|weight| *weight != 0)
    }

    /// Weights in `1..=num_edges` not given to any edge before solving, in ascending order.
    pub fn available_weights(&self) -> Vec<Weight> {
        self.initial_pool().to_sorted_vec()
    }

    pub(crate) fn initial_pool(&self) -> WeightPool {
        let mut pool = WeightPool::full(self.num_edges());
        for &(v1, v2) in &self.edges {
            match self.initial_weights.get(v1, v2) {
                0 => {}
                weight => pool.take(weight),
            }
        }
        pool
    }

    /// Solve this puzzle with the default [`SolveConfig`](crate::config::SolveConfig), calling `handler` with every solution.
    ///
    /// Defers to [`Solver::solve`].
    pub fn solve<F>(&self, handler: F) -> Result<SolveStats, SolverFailure>
    where
        F: FnMut(&Solution),
    {
        Solver::from(self).solve(handler)
    }

    /// The `(start, final)` auxiliary vertices carried by the puzzle description.
    ///
    /// These are validated but take no part in solving.
    pub fn secret_vertices(&self) -> (VertexId, VertexId) {
        self.secret_vertices
    }
}
