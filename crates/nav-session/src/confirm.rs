use crate::{CancelToken, Result};
use marker_vision::PositionSensor;
use std::time::{Duration, Instant};
use voice_io::AudioOutput;

/// Bounds on one confirmation/locate run. The sensor is always polled at
/// least once before either budget can fire.
#[derive(Debug, Clone)]
pub struct ConfirmPolicy {
    /// Delay between consecutive polls.
    pub poll_interval: Duration,
    /// Wall-clock budget; `None` polls until cancelled.
    pub deadline: Option<Duration>,
    /// Poll-count budget; `None` is unlimited.
    pub max_attempts: Option<u32>,
}

impl Default for ConfirmPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(200),
            deadline: Some(Duration::from_secs(90)),
            max_attempts: None,
        }
    }
}

impl ConfirmPolicy {
    /// Test-friendly policy: no pacing, bounded by attempt count only.
    pub fn attempts(max_attempts: u32) -> Self {
        Self {
            poll_interval: Duration::ZERO,
            deadline: None,
            max_attempts: Some(max_attempts),
        }
    }
}

/// Outcome of confirming arrival at an expected waypoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed { attempts: u32 },
    TimedOut { attempts: u32 },
    Cancelled,
}

/// Outcome of locating the current waypoint (no expectation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateOutcome {
    Located { node_id: String, attempts: u32 },
    TimedOut { attempts: u32 },
    Cancelled,
}

/// Drives one edge-traversal step: poll the position sensor until it
/// reports the expected waypoint, a budget runs out, or the session is
/// cancelled. Mismatched markers are announced and polling continues;
/// empty frames poll on silently.
pub struct ConfirmationLoop {
    policy: ConfirmPolicy,
    cancel: CancelToken,
}

impl ConfirmationLoop {
    pub fn new(policy: ConfirmPolicy, cancel: CancelToken) -> Self {
        Self { policy, cancel }
    }

    pub fn confirm_arrival<S, A>(
        &self,
        sensor: &mut S,
        audio: &mut A,
        expected: &str,
    ) -> Result<ConfirmOutcome>
    where
        S: PositionSensor,
        A: AudioOutput,
    {
        let started = Instant::now();
        let mut attempts = 0u32;
        loop {
            if self.cancel.is_cancelled() {
                return Ok(ConfirmOutcome::Cancelled);
            }
            if self.attempts_spent(attempts) {
                return Ok(ConfirmOutcome::TimedOut { attempts });
            }

            let detections = sensor.poll()?;
            attempts += 1;

            if detections.iter().any(|d| d.node_id == expected) {
                tracing::debug!(expected, attempts, "arrival confirmed");
                return Ok(ConfirmOutcome::Confirmed { attempts });
            }
            if !detections.is_empty() {
                tracing::debug!(
                    expected,
                    seen = ?detections.iter().map(|d| d.node_id.as_str()).collect::<Vec<_>>(),
                    "marker mismatch"
                );
                audio.announce("Scanned marker does not match. Please scan the correct marker.")?;
            }

            if self.deadline_elapsed(started) {
                return Ok(ConfirmOutcome::TimedOut { attempts });
            }
            self.pace();
        }
    }

    /// Locate mode: the first reported candidate wins, with no mismatch
    /// branch.
    pub fn locate<S>(&self, sensor: &mut S) -> Result<LocateOutcome>
    where
        S: PositionSensor,
    {
        let started = Instant::now();
        let mut attempts = 0u32;
        loop {
            if self.cancel.is_cancelled() {
                return Ok(LocateOutcome::Cancelled);
            }
            if self.attempts_spent(attempts) {
                return Ok(LocateOutcome::TimedOut { attempts });
            }

            let detections = sensor.poll()?;
            attempts += 1;

            if let Some(found) = detections.into_iter().next() {
                tracing::debug!(node_id = %found.node_id, attempts, "position located");
                return Ok(LocateOutcome::Located {
                    node_id: found.node_id,
                    attempts,
                });
            }

            if self.deadline_elapsed(started) {
                return Ok(LocateOutcome::TimedOut { attempts });
            }
            self.pace();
        }
    }

    fn attempts_spent(&self, attempts: u32) -> bool {
        self.policy
            .max_attempts
            .is_some_and(|max| attempts >= max)
    }

    fn deadline_elapsed(&self, started: Instant) -> bool {
        self.policy
            .deadline
            .is_some_and(|deadline| started.elapsed() >= deadline)
    }

    fn pace(&self) {
        if !self.policy.poll_interval.is_zero() {
            std::thread::sleep(self.policy.poll_interval);
        }
    }
}
