use thiserror::Error;

pub type Result<T, E = VoiceError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("backend error: {0}")]
    Backend(String),
}
