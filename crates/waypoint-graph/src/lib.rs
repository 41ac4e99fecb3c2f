//! waypoint-graph: building waypoint model, shortest-path routing, and
//! turn-by-turn instruction sequencing
//!
//! The graph is loaded once, validated at construction, and shared read-only
//! with the rest of the engine. Routing is deterministic for a fixed input:
//! equal-cost frontier entries expand in lexicographic node-id order.

mod types;
pub use types::{Edge, Node};

mod error;
pub use error::{GraphError, Result};

mod graph;
pub use graph::WaypointGraph;

mod route;
pub use route::{shortest_path, Route};

mod plan;
pub use plan::{sequence, InstructionPlan, PlanStep};

pub mod loader;
