use std::path::PathBuf;
use thiserror::Error;

/// Failure taxonomy for log reading, aggregation and chart rendering.
///
/// Every variant is fatal: callers propagate it to the process boundary and
/// exit non-zero. There is no retry or partial output on failure.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("{}: header mismatch: expected `{expected}`, found `{found}`", path.display())]
    Schema {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("{}:{line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("cannot aggregate an empty series")]
    EmptyInput,

    #[error("percentile must be within [0, 100], got {0}")]
    InvalidPercentile(f64),

    #[error("zero-length measurement window, throughput is undefined")]
    ZeroWindow,

    #[error("invalid chart configuration: {0}")]
    Render(String),
}
