use serde::{Deserialize, Serialize};

/// A discrete physical location the user can stand at and the position
/// sensor can recognize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Human-readable label; falls back to the id for unnamed waypoints.
    pub name: String,
    #[serde(default)]
    pub coordinates: Option<(f64, f64)>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            coordinates: None,
        }
    }

    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinates: None,
        }
    }
}

/// A directed, weighted connection between two waypoints. Traversal in the
/// opposite direction is a separate edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub weight: f64,
    /// Ordered turn-by-turn steps for walking this edge; may be empty.
    #[serde(default, rename = "instruction")]
    pub instructions: Vec<String>,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, weight: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight,
            instructions: Vec::new(),
        }
    }

    pub fn with_instructions<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instructions = steps.into_iter().map(Into::into).collect();
        self
    }
}
