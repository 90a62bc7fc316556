//! CLI command implementations.

pub mod quote;
pub mod validate;

use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors shared by the file-driven commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Could not read an input file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// Could not parse an input file.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    /// The charge plan violated a tier invariant.
    #[error("Invalid charge plan: {0}")]
    InvalidPlan(#[from] threadpress_checkout::rates::PlanValidationError),
}

/// Read and parse a YAML input file.
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, CommandError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CommandError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| CommandError::Parse {
        path: path.display().to_string(),
        source,
    })
}
