use crate::ConfirmPolicy;
use std::time::Duration;
use uuid::Uuid;

/// Where the session currently is in its interaction loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Locating,
    AwaitingAction,
    ResolvingDestination,
    ScanningTarget,
    RouteComputed,
    Navigating(usize),
    Arrived,
    AwaitingRepeat,
    Exited,
}

/// How the user chooses a destination. A closed set, checked exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Point the camera at the destination's marker.
    ScanNearest,
    /// Speak the destination room name.
    SpeakDestination,
}

/// A recognized yes/no/quit reply at a decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Affirmative,
    Negative,
    Quit,
    Unrecognized,
}

impl Reply {
    pub fn parse(text: &str) -> Self {
        let text = text.trim().to_lowercase();
        if ["quit", "stop", "exit"].iter().any(|w| text.contains(w)) {
            Reply::Quit
        } else if text.contains("yes") {
            Reply::Affirmative
        } else if text.contains("no") {
            Reply::Negative
        } else {
            Reply::Unrecognized
        }
    }
}

impl SessionAction {
    /// Accepts the spoken keyword or its menu ordinal.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().to_lowercase();
        if text.contains("nearest") || text == "1" || text == "one" {
            Some(SessionAction::ScanNearest)
        } else if text.contains("destination") || text == "2" || text == "two" {
            Some(SessionAction::SpeakDestination)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Budgets for per-step arrival confirmation.
    pub confirm: ConfirmPolicy,
    /// Budgets for locate-mode scans (current position and target marker).
    pub locate: ConfirmPolicy,
    /// How many unrecognized or missed replies a prompt tolerates before
    /// the trip is aborted.
    pub max_prompt_retries: u32,
    /// Pause between consecutive instruction steps.
    pub step_pause: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            confirm: ConfirmPolicy::default(),
            locate: ConfirmPolicy::default(),
            max_prompt_retries: 5,
            step_pause: Duration::from_secs(3),
        }
    }
}

/// Mutable per-session state. Created at session start, owned and mutated
/// only by the session, discarded when it exits.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub id: Uuid,
    pub phase: Phase,
    pub current_node: Option<String>,
    pub destination: Option<String>,
    pub route_index: usize,
    /// Sensor polls spent on the current step.
    pub retry_count: u32,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: Phase::Idle,
            current_node: None,
            destination: None,
            route_index: 0,
            retry_count: 0,
        }
    }

    /// Reset everything trip-scoped, keeping the session id. The current
    /// node is cleared too: every trip starts from a fresh locate.
    pub fn reset_trip(&mut self) {
        self.current_node = None;
        self.destination = None;
        self.route_index = 0;
        self.retry_count = 0;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub trips_completed: u32,
    pub trips_aborted: u32,
}
