//! voice-io: spoken input and audible output traits with mock backends
//!
//! [`VoiceInput`] abstracts a speech-to-text microphone session,
//! [`AudioOutput`] a text-to-speech announcer. Both are blocking from the
//! engine's point of view. The default `mock` backends script input replies
//! and record announcements, which is what the session tests drive.

mod types;
pub use types::{ListenConfig, SpeechConfig};

mod error;
pub use error::{Result, VoiceError};

mod traits;
pub use traits::{AudioOutput, VoiceInput};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{RecordingSpeaker, ScriptedVoice};
