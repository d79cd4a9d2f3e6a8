//! Validated construction of a [`Puzzle`].

use std::num::NonZero;

use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;
use thiserror::Error;

use crate::graph::{canonical, EdgeWeights, Puzzle, Vertex, VertexId, Weight, MAX_VERTICES};

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum BuilderInvalidReason {
    /// The number of vertices is zero or above [`MAX_VERTICES`].
    #[error("number of vertices {0} is not in 1..={max}", max = MAX_VERTICES)]
    VertexCountOutOfRange(usize),
    /// The number of edges is zero or more than a simple graph on the given vertices can hold.
    #[error("number of edges {0} is not possible for the number of vertices")]
    EdgeCountOutOfRange(usize),
    /// A vertex id is not below the number of vertices.
    #[error("invalid vertex id {0}")]
    VertexOutOfRange(VertexId),
    /// An edge joins a vertex to itself.
    #[error("edge ({0}, {0}) joins a vertex to itself")]
    SelfLoop(VertexId),
    /// The same pair of vertices was joined twice.
    #[error("duplicate edge ({0}, {1})")]
    DuplicateEdge(VertexId, VertexId),
    /// A pre-filled weight is above the number of edges.
    #[error("invalid weight {weight}, weights go up to {num_edges}")]
    WeightOutOfRange {
        /// The offending weight.
        weight: Weight,
        /// The declared number of edges.
        num_edges: usize,
    },
    /// Two edges were pre-filled with the same weight.
    #[error("weight {0} was already used")]
    WeightReused(Weight),
    /// A sum-of-weights constraint of zero.
    #[error("invalid sum of edge weights for vertex {0}, must be positive")]
    ZeroSum(VertexId),
    /// A path weight constraint of zero.
    #[error("invalid path weight for vertex {0}, must be positive")]
    ZeroPathWeight(VertexId),
    /// Fewer edges were added than declared.
    #[error("expected {expected} edges, found {found}")]
    EdgeCountMismatch {
        /// The declared number of edges.
        expected: usize,
        /// The number of edges added.
        found: usize,
    },
}

/// Assembles and validates a [`Puzzle`].
///
/// Every method validates its arguments as it goes. The first problem found puts the builder in an invalid state,
/// after which further calls do nothing and [`Self::build`] reports the problem.
///
/// ```
/// use edgeperm::PuzzleBuilder;
///
/// let puzzle = PuzzleBuilder::with_dims(3, 3)
///     .add_edge(0, 1)
///     .add_edge(1, 2)
///     .add_weighted_edge(0, 2, 3)
///     .constrain_sum(0, 4)
///     .build()
///     .unwrap();
///
/// assert_eq!(puzzle.initial_weight(2, 0), Some(3));
/// assert_eq!(puzzle.available_weights(), vec![1, 2]);
/// ```
#[derive(Clone)]
pub struct PuzzleBuilder {
    num_vertices: usize,
    num_edges: usize,
    // edge weights, 0 if unfilled
    graph: UnGraphMap<VertexId, Weight>,
    used_weights: Vec<bool>,
    sums: Vec<Option<NonZero<Weight>>>,
    path_weights: Vec<Vec<NonZero<Weight>>>,
    secret_vertices: (VertexId, VertexId),
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl PuzzleBuilder {
    /// Start a puzzle on `num_vertices` vertices which will have exactly `num_edges` edges.
    ///
    /// May leave the builder invalid with [`VertexCountOutOfRange`](BuilderInvalidReason::VertexCountOutOfRange)
    /// or [`EdgeCountOutOfRange`](BuilderInvalidReason::EdgeCountOutOfRange).
    pub fn with_dims(num_vertices: usize, num_edges: usize) -> Self {
        let mut builder = Self {
            num_vertices,
            num_edges,
            graph: UnGraphMap::new(),
            used_weights: Vec::new(),
            sums: Vec::new(),
            path_weights: Vec::new(),
            secret_vertices: (0, 0),
            invalid_reasons: Vec::new(),
        };

        if num_vertices == 0 || num_vertices > MAX_VERTICES {
            builder.invalid_reasons.push(BuilderInvalidReason::VertexCountOutOfRange(num_vertices));
            return builder;
        }
        if num_edges == 0 || num_edges > num_vertices * (num_vertices - 1) / 2 {
            builder.invalid_reasons.push(BuilderInvalidReason::EdgeCountOutOfRange(num_edges));
            return builder;
        }

        builder.graph = UnGraphMap::with_capacity(num_vertices, num_edges);
        for v in 0..num_vertices {
            builder.graph.add_node(v);
        }
        // index 0 is unused
        builder.used_weights = vec![false; num_edges + 1];
        builder.sums = vec![None; num_vertices];
        builder.path_weights = vec![Vec::new(); num_vertices];

        builder
    }

    fn check_vertex(&mut self, v: VertexId) -> bool {
        if v >= self.num_vertices {
            self.invalid_reasons.push(BuilderInvalidReason::VertexOutOfRange(v));
            return false;
        }
        true
    }

    /// Join `v1` and `v2` with an edge whose weight is left for the solver.
    pub fn add_edge(&mut self, v1: VertexId, v2: VertexId) -> &mut Self {
        self.add_weighted_edge(v1, v2, 0)
    }

    /// Join `v1` and `v2` with an edge of fixed `weight`, or an unfilled edge if `weight` is 0.
    ///
    /// May cause the builder to become invalid if either vertex is out of range, the vertices are equal or already joined,
    /// or the weight is out of range or already used.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_weighted_edge(&mut self, v1: VertexId, v2: VertexId, weight: Weight) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !self.check_vertex(v1) || !self.check_vertex(v2) {
            return self;
        }
        if v1 == v2 {
            self.invalid_reasons.push(BuilderInvalidReason::SelfLoop(v1));
            return self;
        }
        if self.graph.contains_edge(v1, v2) {
            let (lower, higher) = canonical(v1, v2);
            self.invalid_reasons.push(BuilderInvalidReason::DuplicateEdge(lower, higher));
            return self;
        }

        if weight != 0 {
            match self.used_weights.get_mut(weight as usize) {
                None => {
                    self.invalid_reasons.push(BuilderInvalidReason::WeightOutOfRange { weight, num_edges: self.num_edges });
                    return self;
                }
                Some(true) => {
                    self.invalid_reasons.push(BuilderInvalidReason::WeightReused(weight));
                    return self;
                }
                Some(used) => *used = true,
            }
        }

        self.graph.add_edge(v1, v2, weight);
        self
    }

    /// Require the weights of the edges incident to `v` to add up to `sum`.
    ///
    /// A later call for the same vertex replaces the earlier one.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn constrain_sum(&mut self, v: VertexId, sum: Weight) -> &mut Self {
        if !self.invalid_reasons.is_empty() || !self.check_vertex(v) {
            return self;
        }

        match NonZero::new(sum) {
            None => self.invalid_reasons.push(BuilderInvalidReason::ZeroSum(v)),
            Some(sum) => self.sums[v] = Some(sum),
        }
        self
    }

    /// Require some simple path starting at `v` to weigh exactly `path_weight`.
    ///
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn constrain_path(&mut self, v: VertexId, path_weight: Weight) -> &mut Self {
        if !self.invalid_reasons.is_empty() || !self.check_vertex(v) {
            return self;
        }

        match NonZero::new(path_weight) {
            None => self.invalid_reasons.push(BuilderInvalidReason::ZeroPathWeight(v)),
            Some(path_weight) => self.path_weights[v].push(path_weight),
        }
        self
    }

    /// Record the auxiliary start and final vertices. They are only validated and carried along.
    ///
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn secret_vertices(&mut self, start: VertexId, final_vertex: VertexId) -> &mut Self {
        if !self.invalid_reasons.is_empty() || !self.check_vertex(start) || !self.check_vertex(final_vertex) {
            return self;
        }

        self.secret_vertices = (start, final_vertex);
        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some` with the reasons otherwise.
    pub fn is_valid(&self) -> Option<&[BuilderInvalidReason]> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Puzzle`].
    ///
    /// Besides any problem already recorded, fails with [`EdgeCountMismatch`](BuilderInvalidReason::EdgeCountMismatch)
    /// if fewer edges were added than declared.
    pub fn build(&self) -> Result<Puzzle, Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(self.invalid_reasons.clone());
        }
        if self.graph.edge_count() != self.num_edges {
            return Err(vec![BuilderInvalidReason::EdgeCountMismatch {
                expected: self.num_edges,
                found: self.graph.edge_count(),
            }]);
        }

        let vertices = (0..self.num_vertices)
            .map(|v| Vertex {
                neighbors: self.graph.neighbors(v).sorted().collect_vec(),
                sum_of_weights: self.sums[v],
                path_weights: self.path_weights[v].clone(),
            })
            .collect_vec();

        let edges = self.graph.all_edges()
            .map(|(v1, v2, _)| canonical(v1, v2))
            .sorted()
            .collect_vec();

        let mut initial_weights = EdgeWeights::new(self.num_vertices);
        for (v1, v2, weight) in self.graph.all_edges() {
            initial_weights.set(v1, v2, *weight);
        }

        Ok(Puzzle {
            vertices,
            edges,
            initial_weights,
            secret_vertices: self.secret_vertices,
        })
    }
}
