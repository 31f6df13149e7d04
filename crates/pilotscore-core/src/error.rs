//! Pipeline error types.
//!
//! Only run-wide conditions surface as errors. A malformed line or an
//! unparsable score is recovered where it happens and never reaches here.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source file does not exist.
    #[error("file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The source file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not a single line of the source parsed as a JSON object.
    #[error("no valid JSON objects found in {}", .0.display())]
    NoRecords(PathBuf),

    /// Every row lost all of its scores during cleaning.
    #[error("no rows contained evaluation scores after cleaning")]
    NoScores,

    /// The configuration was rejected before the run started.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    /// Returns `true` if the error comes from the input data rather than
    /// from the environment or configuration.
    pub fn is_data_error(&self) -> bool {
        matches!(self, PipelineError::NoRecords(_) | PipelineError::NoScores)
    }
}
