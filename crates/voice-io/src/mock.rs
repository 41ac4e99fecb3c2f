use crate::{AudioOutput, Result, VoiceInput};
use std::collections::VecDeque;

/// Scripted voice input. Each listen pops the next scripted reply;
/// `None` entries simulate a timeout or unintelligible speech. An
/// exhausted script keeps returning `None`.
#[derive(Debug, Default)]
pub struct ScriptedVoice {
    replies: VecDeque<Option<String>>,
    prompts_heard: Vec<String>,
}

impl ScriptedVoice {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(|r| r.map(Into::into)).collect(),
            prompts_heard: Vec::new(),
        }
    }

    pub fn push_reply(&mut self, reply: Option<&str>) {
        self.replies.push_back(reply.map(str::to_string));
    }

    /// Prompts passed to `listen`, in order.
    pub fn prompts_heard(&self) -> &[String] {
        &self.prompts_heard
    }
}

impl VoiceInput for ScriptedVoice {
    fn listen(&mut self, prompt: Option<&str>) -> Result<Option<String>> {
        if let Some(p) = prompt {
            self.prompts_heard.push(p.to_string());
        }
        Ok(self.replies.pop_front().flatten())
    }
}

/// Records everything announced instead of speaking it.
#[derive(Debug, Default)]
pub struct RecordingSpeaker {
    spoken: Vec<String>,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> &[String] {
        &self.spoken
    }

    /// True if any recorded announcement contains `needle`.
    pub fn heard(&self, needle: &str) -> bool {
        self.spoken.iter().any(|s| s.contains(needle))
    }
}

impl AudioOutput for RecordingSpeaker {
    fn announce(&mut self, text: &str) -> Result<()> {
        tracing::trace!(%text, "mock announce");
        self.spoken.push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn scripted_replies_drain_in_order() {
        let mut voice = ScriptedVoice::new([Some("nearest"), None, Some("yes")]);
        assert_eq!(
            voice.listen(Some("pick an action")).unwrap().as_deref(),
            Some("nearest")
        );
        assert_eq!(voice.listen(None).unwrap(), None);
        assert_eq!(voice.listen(None).unwrap().as_deref(), Some("yes"));
        assert_eq!(voice.listen(None).unwrap(), None);
        assert_eq!(voice.prompts_heard(), ["pick an action".to_string()]);
    }

    #[test]
    fn speaker_records_step_sequences() {
        let mut speaker = RecordingSpeaker::new();
        let steps = vec!["turn right".to_string(), "walk ahead".to_string()];
        speaker
            .announce_steps(&steps, Duration::ZERO)
            .unwrap();
        assert_eq!(speaker.spoken(), steps.as_slice());
        assert!(speaker.heard("turn right"));
    }
}
