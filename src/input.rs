//! The plain text puzzle format.
//!
//! A puzzle is a sequence of whitespace-separated integers. `#` starts a comment which runs to the end of its line.
//! The integers are, in order:
//!
//! 1. the number of vertices `n` and the number of edges `E`;
//! 2. `E` edges `v1 v2 weight`, where a weight of 0 leaves the edge for the solver;
//! 3. a count followed by that many sum-of-weights constraints `vertex sum`;
//! 4. a count followed by that many path weight constraints `vertex path_weight`;
//! 5. the auxiliary start and final vertices.
//!
//! ```
//! let puzzle: edgeperm::Puzzle = "
//!     3 3   # triangle
//!     0 1 0
//!     1 2 0
//!     0 2 0
//!     1     # sum constraints
//!     0 3
//!     0     # path constraints
//!     0 2   # start, final
//! ".parse().unwrap();
//!
//! assert_eq!(puzzle.num_edges(), 3);
//! assert_eq!(puzzle.secret_vertices(), (0, 2));
//! ```

use std::str::FromStr;
use std::vec;

use itertools::Itertools;
use thiserror::Error;

use crate::builder::{BuilderInvalidReason, PuzzleBuilder};
use crate::graph::{Puzzle, Weight};

/// Reasons puzzle text could not be read.
#[derive(Debug, Error)]
pub enum InputError {
    /// The text ended early.
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEnd(&'static str),
    /// A token is not an integer.
    #[error("line {line}: expected {what}, found {token:?}")]
    NotAnInteger {
        /// 1-based line number.
        line: usize,
        /// What was being read.
        what: &'static str,
        /// The offending token.
        token: String,
    },
    /// An integer is negative or too large for what it describes.
    #[error("line {line}: {what} {value} is out of range")]
    OutOfRange {
        /// 1-based line number.
        line: usize,
        /// What was being read.
        what: &'static str,
        /// The offending value.
        value: i64,
    },
    /// Something follows the last field.
    #[error("line {line}: unexpected trailing input {token:?}")]
    TrailingInput {
        /// 1-based line number.
        line: usize,
        /// The first extra token.
        token: String,
    },
    /// The text is well formed but does not describe a valid puzzle.
    #[error("invalid puzzle: {}", .0.iter().join("; "))]
    Invalid(Vec<BuilderInvalidReason>),
}

struct Tokens<'a> {
    // (line number, token)
    tokens: vec::IntoIter<(usize, &'a str)>,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        let tokens = input.lines()
            .enumerate()
            .flat_map(|(index, line)| {
                let code = line.split_once('#').map_or(line, |(code, _)| code);
                code.split_whitespace().map(move |token| (index + 1, token))
            })
            .collect_vec();

        Self { tokens: tokens.into_iter() }
    }

    fn next_int(&mut self, what: &'static str) -> Result<(usize, i64), InputError> {
        let (line, token) = self.tokens.next().ok_or(InputError::UnexpectedEnd(what))?;
        match token.parse() {
            Ok(value) => Ok((line, value)),
            Err(_) => Err(InputError::NotAnInteger { line, what, token: token.to_owned() }),
        }
    }

    fn next_usize(&mut self, what: &'static str) -> Result<usize, InputError> {
        let (line, value) = self.next_int(what)?;
        usize::try_from(value).map_err(|_| InputError::OutOfRange { line, what, value })
    }

    fn next_weight(&mut self, what: &'static str) -> Result<Weight, InputError> {
        let (line, value) = self.next_int(what)?;
        Weight::try_from(value).map_err(|_| InputError::OutOfRange { line, what, value })
    }

    fn finish(mut self) -> Result<(), InputError> {
        match self.tokens.next() {
            None => Ok(()),
            Some((line, token)) => Err(InputError::TrailingInput { line, token: token.to_owned() }),
        }
    }
}

fn still_valid(builder: &PuzzleBuilder) -> Result<(), InputError> {
    match builder.is_valid() {
        None => Ok(()),
        Some(reasons) => Err(InputError::Invalid(reasons.to_vec())),
    }
}

/// Read a puzzle in the format described in the [module documentation](self).
pub fn parse(input: &str) -> Result<Puzzle, InputError> {
    let mut tokens = Tokens::new(input);

    let num_vertices = tokens.next_usize("number of vertices")?;
    let num_edges = tokens.next_usize("number of edges")?;
    let mut builder = PuzzleBuilder::with_dims(num_vertices, num_edges);
    still_valid(&builder)?;

    for _ in 0..num_edges {
        let v1 = tokens.next_usize("edge vertex")?;
        let v2 = tokens.next_usize("edge vertex")?;
        let weight = tokens.next_weight("edge weight")?;
        still_valid(builder.add_weighted_edge(v1, v2, weight))?;
    }

    let num_sums = tokens.next_usize("number of sum constraints")?;
    for _ in 0..num_sums {
        let v = tokens.next_usize("constrained vertex")?;
        let sum = tokens.next_weight("sum of edge weights")?;
        still_valid(builder.constrain_sum(v, sum))?;
    }

    let num_paths = tokens.next_usize("number of path constraints")?;
    for _ in 0..num_paths {
        let v = tokens.next_usize("constrained vertex")?;
        let path_weight = tokens.next_weight("path weight")?;
        still_valid(builder.constrain_path(v, path_weight))?;
    }

    let start = tokens.next_usize("secret start vertex")?;
    let final_vertex = tokens.next_usize("secret final vertex")?;
    still_valid(builder.secret_vertices(start, final_vertex))?;

    tokens.finish()?;
    builder.build().map_err(InputError::Invalid)
}

impl FromStr for Puzzle {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
