use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenConfig {
    /// How long to wait for speech to start before giving up.
    #[serde(default = "default_listen_timeout")]
    pub timeout_s: u64,
    /// Hard cap on a single utterance.
    #[serde(default = "default_phrase_limit")]
    pub phrase_limit_s: u64,
}

fn default_listen_timeout() -> u64 {
    5
}

fn default_phrase_limit() -> u64 {
    4
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            timeout_s: default_listen_timeout(),
            phrase_limit_s: default_phrase_limit(),
        }
    }
}

impl ListenConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    pub voice: Option<String>,
    /// Pause inserted between consecutive instruction steps.
    #[serde(default = "default_step_pause")]
    pub step_pause_s: u64,
}

fn default_step_pause() -> u64 {
    3
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            voice: None,
            step_pause_s: default_step_pause(),
        }
    }
}

impl SpeechConfig {
    pub fn step_pause(&self) -> Duration {
        Duration::from_secs(self.step_pause_s)
    }
}
