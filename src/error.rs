use std::path::PathBuf;

use thiserror::Error;

/// Structural failures that abort a pipeline run.
///
/// Malformed field values never surface here; the parsers degrade those to
/// missing values instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input file not found: {0}")]
    InputMissing(PathBuf),

    #[error("column containing '{needle}' not found; available columns: {available:?}")]
    ColumnNotFound {
        needle: String,
        available: Vec<String>,
    },

    #[error("artifact {path} not found; run `hh-level {hint}` first")]
    ArtifactMissing { path: PathBuf, hint: &'static str },

    #[error("empty dataset: {0}")]
    EmptyDataset(String),

    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },
}
