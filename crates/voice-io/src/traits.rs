use crate::Result;
use std::time::Duration;

/// Blocking speech-to-text input.
pub trait VoiceInput {
    /// Optionally announce `prompt` through the paired output, then listen
    /// for one utterance. `Ok(None)` means timeout or unintelligible
    /// speech; the caller is expected to re-prompt.
    fn listen(&mut self, prompt: Option<&str>) -> Result<Option<String>>;
}

/// Blocking text-to-speech output.
pub trait AudioOutput {
    /// Speak one phrase; returns once it has been fully spoken.
    fn announce(&mut self, text: &str) -> Result<()>;

    /// Speak a sequence of steps with a pause between them.
    fn announce_steps(&mut self, steps: &[String], pause: Duration) -> Result<()> {
        for (i, step) in steps.iter().enumerate() {
            self.announce(step)?;
            if i + 1 < steps.len() && !pause.is_zero() {
                std::thread::sleep(pause);
            }
        }
        Ok(())
    }
}
