//! wayfind: building guidance from the terminal
//!
//! Inspect a waypoint graph, compute routes, test destination resolution,
//! and run a full guidance session with the keyboard standing in for the
//! marker sensor and the microphone.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::info;

use marker_vision::{Detection, PositionSensor};
use nav_session::{ConfirmPolicy, NavigationSession, SessionConfig};
use room_resolver::{load_room_index, Resolver, ResolverConfig};
use voice_io::{AudioOutput, VoiceInput};
use waypoint_graph::{loader, sequence, shortest_path};

#[derive(Parser, Debug)]
#[command(
    name = "wayfind",
    version,
    about = "Indoor navigation guidance engine",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a graph file and print its shape
    GraphCheck {
        /// Graph JSON file
        #[arg(long, default_value = "configs/hallway_graph.json")]
        graph: String,
    },
    /// Compute the shortest route between two waypoints
    Route {
        #[arg(long, default_value = "configs/hallway_graph.json")]
        graph: String,
        /// Source node id
        #[arg(long)]
        from: String,
        /// Destination node id
        #[arg(long)]
        to: String,
        /// Emit the route as JSON instead of text
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// Resolve a spoken/typed phrase against the room index
    Resolve {
        #[arg(long, default_value = "configs/rooms.json")]
        rooms: String,
        /// Phrase to resolve, e.g. "room twelve"
        phrase: String,
    },
    /// Run an interactive guidance session on the console
    Guide {
        #[arg(long, default_value = "configs/hallway_graph.json")]
        graph: String,
        #[arg(long, default_value = "configs/rooms.json")]
        rooms: String,
        /// Per-step confirmation deadline in seconds
        #[arg(long, default_value_t = 90u64)]
        confirm_deadline_s: u64,
        /// Pause between spoken instruction steps in seconds
        #[arg(long, default_value_t = 0u64)]
        step_pause_s: u64,
    },
}

fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::GraphCheck { graph } => {
            let g = loader::load_graph(&graph)?;
            println!("graph ok: {} nodes, {} edges", g.len(), g.edge_count());
            let mut ids: Vec<&str> = g.node_ids().collect();
            ids.sort_unstable();
            for id in ids {
                println!("  {} ({})", id, g.display_name(id));
            }
            Ok(())
        }
        Commands::Route {
            graph,
            from,
            to,
            json,
        } => run_route(&graph, &from, &to, json),
        Commands::Resolve { rooms, phrase } => {
            let index = load_room_index(&rooms)?;
            let resolver = Resolver::new(index, ResolverConfig::default());
            match resolver.resolve(&phrase) {
                Some(room) => println!("{} -> {}", room.label, room.node_id),
                None => println!("no room matched"),
            }
            Ok(())
        }
        Commands::Guide {
            graph,
            rooms,
            confirm_deadline_s,
            step_pause_s,
        } => run_guide(&graph, &rooms, confirm_deadline_s, step_pause_s),
    }
}

fn run_route(graph: &str, from: &str, to: &str, json: bool) -> Result<()> {
    let g = loader::load_graph(graph)?;
    let route = shortest_path(&g, from, to)?;
    let plan = sequence(&g, &route);

    if json {
        let steps: Vec<serde_json::Value> = plan
            .iter()
            .map(|step| {
                serde_json::json!({
                    "from": step.from,
                    "to": step.to,
                    "instructions": step.instructions,
                })
            })
            .collect();
        let out = serde_json::json!({
            "nodes": route.nodes,
            "cost": route.cost,
            "steps": steps,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("route: {} (cost {})", route.nodes.join(" -> "), route.cost);
    for (i, step) in plan.iter().enumerate() {
        println!("step {}: {} -> {}", i + 1, step.from, step.to);
        for line in &step.instructions {
            println!("    {line}");
        }
    }
    Ok(())
}

fn run_guide(graph: &str, rooms: &str, confirm_deadline_s: u64, step_pause_s: u64) -> Result<()> {
    let g = loader::load_graph(graph)?;
    let index = load_room_index(rooms)?;
    let resolver = Resolver::new(index, ResolverConfig::default());

    let sensor = KeyboardSensor::open("stdin")
        .map_err(|e| anyhow::anyhow!("opening keyboard sensor: {e}"))?;
    let policy = ConfirmPolicy {
        // The keyboard sensor blocks on input, so no pacing is needed.
        poll_interval: Duration::ZERO,
        deadline: Some(Duration::from_secs(confirm_deadline_s)),
        max_attempts: None,
    };
    let config = SessionConfig {
        confirm: policy.clone(),
        locate: policy,
        max_prompt_retries: 5,
        step_pause: Duration::from_secs(step_pause_s),
    };

    println!("Interactive guidance session.");
    println!("  - When asked to scan, type the marker id you are looking at (blank for none).");
    println!("  - Answer prompts in plain text; 'quit' exits.");
    println!();

    let mut session = NavigationSession::new(
        &g,
        resolver,
        sensor,
        ConsoleVoice::default(),
        ConsoleSpeaker,
        config,
    );
    let summary = session.run()?;
    info!(
        completed = summary.trips_completed,
        aborted = summary.trips_aborted,
        "session finished"
    );
    println!(
        "session finished: {} trip(s) completed, {} aborted",
        summary.trips_completed, summary.trips_aborted
    );
    Ok(())
}

/// Console stand-in for the text-to-speech announcer.
struct ConsoleSpeaker;

impl AudioOutput for ConsoleSpeaker {
    fn announce(&mut self, text: &str) -> voice_io::Result<()> {
        println!("[voice] {text}");
        Ok(())
    }
}

/// Console stand-in for the microphone: prints the prompt, reads one line.
#[derive(Default)]
struct ConsoleVoice;

impl VoiceInput for ConsoleVoice {
    fn listen(&mut self, prompt: Option<&str>) -> voice_io::Result<Option<String>> {
        if let Some(p) = prompt {
            println!("[voice] {p}");
        }
        let line = read_line("you> ").map_err(|e| voice_io::VoiceError::Io(e.to_string()))?;
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        Ok(Some(line.to_string()))
    }
}

/// Keyboard stand-in for the marker sensor: each poll asks which marker the
/// camera would be seeing right now.
struct KeyboardSensor;

impl PositionSensor for KeyboardSensor {
    fn open(_spec: &str) -> marker_vision::Result<Self> {
        Ok(Self)
    }

    fn poll(&mut self) -> marker_vision::Result<Vec<Detection>> {
        let line =
            read_line("scan> ").map_err(|e| marker_vision::SensorError::Io(e.to_string()))?;
        let line = line.trim();
        if line.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![Detection::new(line, 120)])
    }
}

fn read_line(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
