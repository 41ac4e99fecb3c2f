use thiserror::Error;

pub type Result<T, E = SensorError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("capture device not found: {0}")]
    NotFound(String),
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("backend error: {0}")]
    Backend(String),
}
