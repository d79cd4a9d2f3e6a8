#![warn(missing_docs)]

//! # `edgeperm`
//!
//! A solver for edge weight permutation puzzles.
//! A puzzle is a small undirected graph with `E` edges, some of which may already carry a weight.
//! Every edge must receive a distinct weight from `1..=E` such that
//! 1. each vertex with a sum-of-weights constraint has incident edges adding up to its target, and
//! 2. each vertex with a path weight constraint starts some simple path weighing exactly that much.
//!
//! Begin by building a [`Puzzle`] with a [`PuzzleBuilder`] or parsing one from text with [`input::parse`].
//! Then call [`Puzzle::solve`], or create a [`Solver`] with a [`SolveConfig`](config::SolveConfig),
//! and receive every [`Solution`] through a handler.
//!
//! # Internals
//! The search is a backtracking walk over the sum-constrained vertices in ascending order of target.
//! At each vertex, the [`PermutationsWithSum`](permutations::PermutationsWithSum) generator yields every ordered tuple of unused weights
//! adding up to what the vertex still lacks, and each tuple is written to the unfilled incident edges before descending to the next vertex.
//! Every write is undone on the way back up, so the one set of edge weights is shared by the whole search.
//!
//! Edges not incident to any sum-constrained vertex are filled with every permutation of the remaining weights,
//! or refused outright, according to [`LeftoverPolicy`](config::LeftoverPolicy).
//! Complete weightings are then checked against the path constraints by depth-first search, and survivors are reported.

pub use builder::PuzzleBuilder;
pub use graph::{Puzzle, Vertex, VertexId, Weight, MAX_VERTICES};
pub use solver::{Solution, SolveStats, Solver, SolverFailure};

pub mod builder;
pub mod config;
pub(crate) mod graph;
pub mod input;
pub(crate) mod path;
pub mod permutations;
pub(crate) mod pool;
pub(crate) mod solver;
