use crate::{
    CancelToken, ConfirmOutcome, ConfirmationLoop, LocateOutcome, Phase, Reply, Result,
    SessionAction, SessionConfig, SessionState, SessionSummary,
};
use marker_vision::PositionSensor;
use room_resolver::Resolver;
use voice_io::{AudioOutput, VoiceInput};
use waypoint_graph::{sequence, shortest_path, InstructionPlan, WaypointGraph};

/// Top-level interaction state machine for one person's guidance session.
///
/// Owns the position sensor and both voice collaborators for its whole
/// lifetime; they are released by drop on every exit path, cancellation
/// included. Trips repeat until the user declines or quits.
pub struct NavigationSession<'g, S, V, A> {
    graph: &'g WaypointGraph,
    resolver: Resolver,
    sensor: S,
    voice: V,
    audio: A,
    config: SessionConfig,
    cancel: CancelToken,
    state: SessionState,
    plan: InstructionPlan,
}

impl<'g, S, V, A> NavigationSession<'g, S, V, A>
where
    S: PositionSensor,
    V: VoiceInput,
    A: AudioOutput,
{
    pub fn new(
        graph: &'g WaypointGraph,
        resolver: Resolver,
        sensor: S,
        voice: V,
        audio: A,
        config: SessionConfig,
    ) -> Self {
        Self {
            graph,
            resolver,
            sensor,
            voice,
            audio,
            config,
            cancel: CancelToken::new(),
            state: SessionState::new(),
            plan: Vec::new(),
        }
    }

    /// Handle that interrupts the session from outside the loop.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Drive the state machine from `Idle` to `Exited`.
    pub fn run(&mut self) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        tracing::info!(session = %self.state.id, "guidance session starting");

        while self.state.phase != Phase::Exited {
            if self.cancel.is_cancelled() {
                tracing::info!(session = %self.state.id, "session cancelled");
                self.set_phase(Phase::Exited);
                break;
            }
            match self.state.phase {
                Phase::Idle => {
                    self.state.reset_trip();
                    self.plan.clear();
                    self.set_phase(Phase::Locating);
                }
                Phase::Locating => self.locate_current(&mut summary)?,
                Phase::AwaitingAction => self.choose_action(&mut summary)?,
                Phase::ResolvingDestination => self.resolve_destination(&mut summary)?,
                Phase::ScanningTarget => self.scan_target(&mut summary)?,
                Phase::RouteComputed => self.compute_route(&mut summary)?,
                Phase::Navigating(step) => self.navigate_step(step, &mut summary)?,
                Phase::Arrived => {
                    self.audio.announce("You have arrived at your destination!")?;
                    summary.trips_completed += 1;
                    self.set_phase(Phase::AwaitingRepeat);
                }
                Phase::AwaitingRepeat => self.ask_repeat()?,
                Phase::Exited => {}
            }
        }

        tracing::info!(
            session = %self.state.id,
            completed = summary.trips_completed,
            aborted = summary.trips_aborted,
            "guidance session exited"
        );
        Ok(summary)
    }

    fn locate_current(&mut self, summary: &mut SessionSummary) -> Result<()> {
        self.audio
            .announce("Please scan the nearest marker to locate your current position.")?;
        let looper = ConfirmationLoop::new(self.config.locate.clone(), self.cancel.clone());
        match looper.locate(&mut self.sensor)? {
            LocateOutcome::Located { node_id, .. } => {
                if !self.graph.contains(&node_id) {
                    self.audio
                        .announce("That marker is not part of this building.")?;
                    self.abort_trip(summary);
                    return Ok(());
                }
                let name = self.graph.display_name(&node_id).to_string();
                self.audio
                    .announce(&format!("Location detected: {name}."))?;
                self.state.current_node = Some(node_id);
                self.set_phase(Phase::AwaitingAction);
            }
            LocateOutcome::TimedOut { attempts } => {
                self.state.retry_count = attempts;
                self.audio.announce("I could not detect a marker.")?;
                self.abort_trip(summary);
            }
            LocateOutcome::Cancelled => self.set_phase(Phase::Exited),
        }
        Ok(())
    }

    fn choose_action(&mut self, summary: &mut SessionSummary) -> Result<()> {
        let prompt = "Say 'nearest' to scan the destination marker, \
                      or 'destination' to say where you want to go.";
        let mut tries = 0;
        while tries < self.config.max_prompt_retries {
            if self.cancel.is_cancelled() {
                self.set_phase(Phase::Exited);
                return Ok(());
            }
            let heard = self.voice.listen(Some(prompt))?;
            tries += 1;
            let Some(text) = heard else {
                self.audio
                    .announce("I didn't catch that. Please say again.")?;
                continue;
            };
            if Reply::parse(&text) == Reply::Quit {
                return self.exit_with_goodbye();
            }
            match SessionAction::parse(&text) {
                Some(SessionAction::ScanNearest) => {
                    self.set_phase(Phase::ScanningTarget);
                    return Ok(());
                }
                Some(SessionAction::SpeakDestination) => {
                    self.set_phase(Phase::ResolvingDestination);
                    return Ok(());
                }
                None => self
                    .audio
                    .announce("Please say 'nearest' or 'destination'.")?,
            }
        }
        self.audio
            .announce("I couldn't understand. Stopping this trip.")?;
        self.abort_trip(summary);
        Ok(())
    }

    fn resolve_destination(&mut self, summary: &mut SessionSummary) -> Result<()> {
        let prompt = "Where do you want to go? Please say your destination room now.";
        let mut tries = 0;
        while tries < self.config.max_prompt_retries {
            if self.cancel.is_cancelled() {
                self.set_phase(Phase::Exited);
                return Ok(());
            }
            let heard = self.voice.listen(Some(prompt))?;
            tries += 1;
            let Some(text) = heard else {
                self.audio
                    .announce("I didn't catch that. Please say again.")?;
                continue;
            };
            if Reply::parse(&text) == Reply::Quit {
                return self.exit_with_goodbye();
            }
            match self.resolver.resolve(&text) {
                Some(room) => {
                    self.audio
                        .announce(&format!("Destination set to {}.", room.label))?;
                    self.state.destination = Some(room.node_id);
                    self.set_phase(Phase::RouteComputed);
                    return Ok(());
                }
                None => self
                    .audio
                    .announce("Room not recognized. Please say again.")?,
            }
        }
        self.audio
            .announce("I couldn't understand. Stopping this trip.")?;
        self.abort_trip(summary);
        Ok(())
    }

    fn scan_target(&mut self, summary: &mut SessionSummary) -> Result<()> {
        self.audio.announce("Please scan the destination marker.")?;
        let looper = ConfirmationLoop::new(self.config.locate.clone(), self.cancel.clone());
        match looper.locate(&mut self.sensor)? {
            LocateOutcome::Located { node_id, .. } => {
                if !self.graph.contains(&node_id) {
                    self.audio
                        .announce("That marker is not part of this building.")?;
                    self.abort_trip(summary);
                    return Ok(());
                }
                let name = self.graph.display_name(&node_id).to_string();
                self.audio
                    .announce(&format!("Destination set to {name}."))?;
                self.state.destination = Some(node_id);
                self.set_phase(Phase::RouteComputed);
            }
            LocateOutcome::TimedOut { attempts } => {
                self.state.retry_count = attempts;
                self.audio.announce("I could not detect a marker.")?;
                self.abort_trip(summary);
            }
            LocateOutcome::Cancelled => self.set_phase(Phase::Exited),
        }
        Ok(())
    }

    fn compute_route(&mut self, summary: &mut SessionSummary) -> Result<()> {
        let (Some(current), Some(destination)) = (
            self.state.current_node.clone(),
            self.state.destination.clone(),
        ) else {
            // Can only happen if a phase was skipped; treat as an aborted trip.
            self.abort_trip(summary);
            return Ok(());
        };

        match shortest_path(self.graph, &current, &destination) {
            Err(err) => {
                tracing::warn!(%err, "trip aborted");
                self.audio.announce(&format!(
                    "No route found from {} to {}.",
                    self.graph.display_name(&current),
                    self.graph.display_name(&destination)
                ))?;
                self.abort_trip(summary);
            }
            Ok(route) => {
                tracing::info!(
                    session = %self.state.id,
                    cost = route.cost,
                    steps = route.steps(),
                    "route computed"
                );
                self.plan = sequence(self.graph, &route);
                if self.plan.is_empty() {
                    self.audio.announce(&format!(
                        "You are already at {}.",
                        self.graph.display_name(&destination)
                    ))?;
                    self.set_phase(Phase::Arrived);
                } else {
                    self.audio.announce(&format!(
                        "Starting navigation from {} to {}.",
                        self.graph.display_name(&current),
                        self.graph.display_name(&destination)
                    ))?;
                    self.state.route_index = 0;
                    self.set_phase(Phase::Navigating(0));
                }
            }
        }
        Ok(())
    }

    fn navigate_step(&mut self, step_index: usize, summary: &mut SessionSummary) -> Result<()> {
        let Some(step) = self.plan.get(step_index).cloned() else {
            self.set_phase(Phase::Arrived);
            return Ok(());
        };

        // Step instructions are always announced before polling begins.
        self.audio
            .announce_steps(&step.instructions, self.config.step_pause)?;
        let to_name = self.graph.display_name(&step.to).to_string();
        self.audio
            .announce(&format!("Please scan the marker at {to_name} to continue."))?;

        let looper = ConfirmationLoop::new(self.config.confirm.clone(), self.cancel.clone());
        match looper.confirm_arrival(&mut self.sensor, &mut self.audio, &step.to)? {
            ConfirmOutcome::Confirmed { attempts } => {
                tracing::debug!(step = step_index, attempts, "step confirmed");
                self.audio
                    .announce(&format!("{to_name} confirmed. Proceeding."))?;
                self.state.current_node = Some(step.to.clone());
                self.state.route_index = step_index + 1;
                self.state.retry_count = 0;
                if step_index + 1 >= self.plan.len() {
                    self.set_phase(Phase::Arrived);
                } else {
                    self.set_phase(Phase::Navigating(step_index + 1));
                }
            }
            ConfirmOutcome::TimedOut { attempts } => {
                self.state.retry_count = attempts;
                self.audio
                    .announce(&format!("I could not confirm {to_name}. Stopping this trip."))?;
                self.abort_trip(summary);
            }
            ConfirmOutcome::Cancelled => self.set_phase(Phase::Exited),
        }
        Ok(())
    }

    fn ask_repeat(&mut self) -> Result<()> {
        let prompt =
            "Do you want to start another navigation? Say 'yes' to continue or 'no' to exit.";
        let mut tries = 0;
        while tries < self.config.max_prompt_retries {
            if self.cancel.is_cancelled() {
                self.set_phase(Phase::Exited);
                return Ok(());
            }
            let heard = self.voice.listen(Some(prompt))?;
            tries += 1;
            match heard.as_deref().map(Reply::parse) {
                Some(Reply::Affirmative) => {
                    self.set_phase(Phase::Idle);
                    return Ok(());
                }
                Some(Reply::Negative) | Some(Reply::Quit) => {
                    return self.exit_with_goodbye();
                }
                Some(Reply::Unrecognized) => {
                    self.audio.announce("Please say 'yes' or 'no'.")?;
                }
                None => {
                    self.audio
                        .announce("I didn't catch that. Please say again.")?;
                }
            }
        }
        // Silence at the final decision point ends the session.
        self.exit_with_goodbye()
    }

    fn exit_with_goodbye(&mut self) -> Result<()> {
        self.audio.announce("Goodbye!")?;
        self.set_phase(Phase::Exited);
        Ok(())
    }

    fn abort_trip(&mut self, summary: &mut SessionSummary) {
        summary.trips_aborted += 1;
        self.set_phase(Phase::AwaitingRepeat);
    }

    fn set_phase(&mut self, next: Phase) {
        tracing::debug!(from = ?self.state.phase, to = ?next, "phase transition");
        self.state.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfirmPolicy;
    use marker_vision::{MockSensor, PositionSensor};
    use room_resolver::{Resolver, ResolverConfig, RoomIndex};
    use std::time::Duration;
    use voice_io::{RecordingSpeaker, ScriptedVoice};
    use waypoint_graph::{Edge, Node};

    fn test_graph() -> WaypointGraph {
        WaypointGraph::build(
            ["A", "B", "C"].map(Node::new),
            vec![
                Edge::new("A", "B", 2.0).with_instructions(["turn right"]),
                Edge::new("B", "C", 3.0),
            ],
        )
        .unwrap()
    }

    fn test_resolver() -> Resolver {
        Resolver::new(
            RoomIndex::from_pairs([("11", "C"), ("12", "B")]),
            ResolverConfig::default(),
        )
    }

    fn test_config() -> SessionConfig {
        SessionConfig {
            confirm: ConfirmPolicy::attempts(5),
            locate: ConfirmPolicy::attempts(5),
            max_prompt_retries: 3,
            step_pause: Duration::ZERO,
        }
    }

    fn session<'g>(
        graph: &'g WaypointGraph,
        sensor: MockSensor,
        voice: ScriptedVoice,
    ) -> NavigationSession<'g, MockSensor, ScriptedVoice, RecordingSpeaker> {
        NavigationSession::new(
            graph,
            test_resolver(),
            sensor,
            voice,
            RecordingSpeaker::new(),
            test_config(),
        )
    }

    #[test]
    fn full_trip_by_spoken_destination() {
        let graph = test_graph();
        let mut sensor = MockSensor::open("mock0").unwrap();
        sensor.push_marker("A"); // locate
        sensor.push_marker("B"); // confirm step A -> B
        sensor.push_marker("C"); // confirm step B -> C
        let voice = ScriptedVoice::new([Some("destination"), Some("eleven"), Some("no")]);

        let mut s = session(&graph, sensor, voice);
        let summary = s.run().unwrap();

        assert_eq!(summary.trips_completed, 1);
        assert_eq!(summary.trips_aborted, 0);
        assert_eq!(s.state().phase, Phase::Exited);

        let audio = s.audio();
        assert!(audio.heard("Location detected: A"));
        assert!(audio.heard("Destination set to 11"));
        assert!(audio.heard("Starting navigation from A to C"));
        assert!(audio.heard("turn right"));
        assert!(audio.heard("Walk from B to C"));
        assert!(audio.heard("You have arrived"));
        assert!(audio.heard("Goodbye"));
    }

    #[test]
    fn instructions_precede_confirmation_announcements() {
        let graph = test_graph();
        let mut sensor = MockSensor::open("mock0").unwrap();
        sensor.push_marker("A");
        sensor.push_marker("B");
        sensor.push_marker("C");
        let voice = ScriptedVoice::new([Some("destination"), Some("eleven"), Some("no")]);

        let mut s = session(&graph, sensor, voice);
        s.run().unwrap();

        let spoken = s.audio().spoken();
        let pos = |needle: &str| {
            spoken
                .iter()
                .position(|line| line.contains(needle))
                .unwrap_or_else(|| panic!("never announced: {needle}"))
        };
        assert!(pos("turn right") < pos("Please scan the marker at B"));
        assert!(pos("B confirmed") < pos("Walk from B to C"));
        assert!(pos("Walk from B to C") < pos("Please scan the marker at C"));
    }

    #[test]
    fn full_trip_by_scanned_target() {
        let graph = test_graph();
        let mut sensor = MockSensor::open("mock0").unwrap();
        sensor.push_marker("A"); // locate current
        sensor.push_marker("B"); // scan destination marker
        sensor.push_marker("B"); // confirm step A -> B
        let voice = ScriptedVoice::new([Some("nearest"), Some("no")]);

        let mut s = session(&graph, sensor, voice);
        let summary = s.run().unwrap();

        assert_eq!(summary.trips_completed, 1);
        assert!(s.audio().heard("Destination set to B"));
        assert!(s.audio().heard("turn right"));
    }

    #[test]
    fn no_route_aborts_the_trip_not_the_session() {
        let graph = WaypointGraph::build(["A", "D"].map(Node::new), vec![]).unwrap();
        let mut sensor = MockSensor::open("mock0").unwrap();
        sensor.push_marker("A");
        let voice = ScriptedVoice::new([Some("destination"), Some("room 13"), Some("no")]);

        let resolver = Resolver::new(
            RoomIndex::from_pairs([("room 13", "D")]),
            ResolverConfig::default(),
        );
        let mut s = NavigationSession::new(
            &graph,
            resolver,
            sensor,
            voice,
            RecordingSpeaker::new(),
            test_config(),
        );
        let summary = s.run().unwrap();

        assert_eq!(summary.trips_completed, 0);
        assert_eq!(summary.trips_aborted, 1);
        assert!(s.audio().heard("No route found from A to D"));
        assert!(s.audio().heard("Goodbye"));
    }

    #[test]
    fn already_at_destination_counts_as_arrival() {
        let graph = test_graph();
        let mut sensor = MockSensor::open("mock0").unwrap();
        sensor.push_marker("C");
        let voice = ScriptedVoice::new([Some("destination"), Some("eleven"), Some("no")]);

        let mut s = session(&graph, sensor, voice);
        let summary = s.run().unwrap();

        assert_eq!(summary.trips_completed, 1);
        assert!(s.audio().heard("You are already at C"));
    }

    #[test]
    fn confirmation_timeout_aborts_the_trip() {
        let graph = test_graph();
        let mut sensor = MockSensor::open("mock0").unwrap();
        sensor.push_marker("A");
        // Step A -> B only ever sees the wrong marker.
        for _ in 0..5 {
            sensor.push_marker("C");
        }
        let voice = ScriptedVoice::new([Some("destination"), Some("twelve"), Some("no")]);

        let mut s = session(&graph, sensor, voice);
        let summary = s.run().unwrap();

        assert_eq!(summary.trips_completed, 0);
        assert_eq!(summary.trips_aborted, 1);
        assert!(s.audio().heard("does not match"));
        assert!(s.audio().heard("I could not confirm B"));
        assert_eq!(s.state().retry_count, 5);
    }

    #[test]
    fn unknown_marker_aborts_the_trip() {
        let graph = test_graph();
        let mut sensor = MockSensor::open("mock0").unwrap();
        sensor.push_marker("Z");
        let voice = ScriptedVoice::new([Some("no")]);

        let mut s = session(&graph, sensor, voice);
        let summary = s.run().unwrap();

        assert_eq!(summary.trips_aborted, 1);
        assert!(s.audio().heard("not part of this building"));
    }

    #[test]
    fn exhausted_prompts_abort_then_exit() {
        let graph = test_graph();
        let mut sensor = MockSensor::open("mock0").unwrap();
        sensor.push_marker("A");
        let voice = ScriptedVoice::new(Vec::<Option<String>>::new());

        let mut s = session(&graph, sensor, voice);
        let summary = s.run().unwrap();

        // Action prompt budget aborts the trip; the repeat prompt budget
        // then ends the session instead of spinning.
        assert_eq!(summary.trips_aborted, 1);
        assert_eq!(s.state().phase, Phase::Exited);
    }

    #[test]
    fn quit_reply_exits_immediately() {
        let graph = test_graph();
        let mut sensor = MockSensor::open("mock0").unwrap();
        sensor.push_marker("A");
        let voice = ScriptedVoice::new([Some("quit")]);

        let mut s = session(&graph, sensor, voice);
        let summary = s.run().unwrap();

        assert_eq!(summary, SessionSummary::default());
        assert!(s.audio().heard("Goodbye"));
        assert_eq!(s.state().phase, Phase::Exited);
    }

    #[test]
    fn cancel_token_stops_the_session() {
        let graph = test_graph();
        let sensor = MockSensor::open("mock0").unwrap();
        let voice = ScriptedVoice::new(Vec::<Option<String>>::new());

        let mut s = session(&graph, sensor, voice);
        s.cancel_token().cancel();
        let summary = s.run().unwrap();

        assert_eq!(summary, SessionSummary::default());
        assert_eq!(s.state().phase, Phase::Exited);
        assert!(s.audio().spoken().is_empty());
    }

    #[test]
    fn repeat_runs_a_second_trip() {
        let graph = test_graph();
        let mut sensor = MockSensor::open("mock0").unwrap();
        // Trip one: locate A, walk to B.
        sensor.push_marker("A");
        sensor.push_marker("B");
        // Trip two: locate B, walk to C.
        sensor.push_marker("B");
        sensor.push_marker("C");
        let voice = ScriptedVoice::new([
            Some("destination"),
            Some("twelve"),
            Some("yes"),
            Some("destination"),
            Some("eleven"),
            Some("no"),
        ]);

        let mut s = session(&graph, sensor, voice);
        let summary = s.run().unwrap();

        assert_eq!(summary.trips_completed, 2);
        assert_eq!(summary.trips_aborted, 0);
    }
}
