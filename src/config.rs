//! Options controlling a solve, loadable from TOML.
//!
//! ```
//! use edgeperm::config::{LeftoverPolicy, SolveConfig};
//!
//! let config = SolveConfig::from_toml_str(r#"leftover_edges = "reject""#).unwrap();
//! assert_eq!(config.leftover_edges, LeftoverPolicy::Reject);
//!
//! // a missing file just means defaults
//! let config = SolveConfig::load("does-not-exist.toml").unwrap_or_default();
//! assert_eq!(config.leftover_edges, LeftoverPolicy::Enumerate);
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use strum::{Display, EnumString, VariantArray};
use thiserror::Error;

/// Reasons a [`SolveConfig`] could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML or does not describe a [`SolveConfig`].
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// What to do with unfilled edges which touch no vertex carrying a sum-of-weights constraint.
///
/// No sum constraint decides such an edge, so once every constrained vertex is satisfied the remaining weights are still unassigned.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize, Display, EnumString, VariantArray)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeftoverPolicy {
    /// Try every permutation of the remaining weights over those edges before checking path constraints.
    #[default]
    Enumerate,
    /// Refuse to solve such a puzzle with [`SolverFailure::UnsupportedConfiguration`](crate::SolverFailure::UnsupportedConfiguration).
    Reject,
}

/// Options for a [`Solver`](crate::Solver).
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SolveConfig {
    /// Handling of edges no sum constraint covers.
    #[serde(default)]
    pub leftover_edges: LeftoverPolicy,
}

impl SolveConfig {
    /// Parse a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Read and parse the TOML file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Replace the leftover edge policy.
    pub fn with_leftover_edges(mut self, policy: LeftoverPolicy) -> Self {
        self.leftover_edges = policy;
        self
    }
}
