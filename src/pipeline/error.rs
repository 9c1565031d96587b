use thiserror::Error;

use crate::transport::FetchError;

/// Faults surfaced to the diagnostics sink. Never returned to callers of the
/// validator, which only ever see a (possibly shorter) result list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A worker panicked; the candidate is dropped and the run continues.
    #[error("worker fault while {stage} {url}: {message}")]
    WorkerFault {
        stage: String,
        url: String,
        message: String,
    },

    /// The runtime cancelled a worker before it finished.
    #[error("worker cancelled: {message}")]
    WorkerCancelled { message: String },
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Why a single candidate did not make it into the result set.
#[derive(Error, Debug)]
pub enum Rejection {
    #[error("probe failed: {0}")]
    Probe(#[from] FetchError),

    #[error("perceptual duplicate of an accepted image")]
    Duplicate,

    #[error("license blocked: {0}")]
    LicenseBlocked(String),

    #[error("classified as {0}")]
    Classified(String),

    #[error("deadline expired")]
    DeadlineExpired,
}
