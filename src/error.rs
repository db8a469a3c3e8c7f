//! Error types for the simulator and the catalog
//!
//! Step verdicts are never errors. These variants cover contract violations
//! by the caller and catalog files that cannot be used.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulatorError {
    #[error("step {index} is out of range (test case has {count} steps)")]
    StepOutOfRange { index: usize, count: usize },

    #[error("test case '{0}' has no steps")]
    EmptyCase(String),

    #[error("step {step} cannot pass: step {blocking} has not passed")]
    PrerequisitesNotMet { step: usize, blocking: usize },
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("invalid catalog pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to read catalog file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("unsupported catalog file {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("test case '{id}' in {path} has no steps")]
    EmptyCase { id: String, path: PathBuf },

    #[error("test case '{id}' in {path} numbers more than one step {number}")]
    DuplicateStep {
        id: String,
        number: usize,
        path: PathBuf,
    },
}
