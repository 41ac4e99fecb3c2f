use thiserror::Error;

pub type Result<T, E = SessionError> = core::result::Result<T, E>;

/// Collaborator failures that end a session. Interaction-level problems
/// (no route, unresolved destination, confirmation timeouts) are recovered
/// in-session and never surface here.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Sensor(#[from] marker_vision::SensorError),
    #[error(transparent)]
    Voice(#[from] voice_io::VoiceError),
}
