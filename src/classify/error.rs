use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("vision model request failed: {0}")]
    Request(String),

    #[error("vision model returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("no image supplied for classification")]
    NoImage,
}

pub type ClassifyResult<T> = Result<T, ClassifyError>;
