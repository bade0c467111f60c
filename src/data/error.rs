use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop the statistics pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("load: input file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("load: malformed input: {0}")]
    Format(String),

    #[error("summarize: no samples survived outlier filtering")]
    EmptyInput,

    #[error("{stage}: series length mismatch (expected {expected}, got {actual})")]
    LengthMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("load: I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("load: CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("load: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("load: Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("load: Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl PipelineError {
    pub fn format(msg: impl Into<String>) -> Self {
        PipelineError::Format(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
