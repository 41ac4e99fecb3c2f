use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One decoded waypoint marker from a single captured frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Node id encoded in the marker, normalized to upper case.
    pub node_id: String,
    /// Apparent marker width in pixels; larger means closer.
    pub px_width: u32,
    pub ts: Option<OffsetDateTime>,
}

impl Detection {
    pub fn new(node_id: impl Into<String>, px_width: u32) -> Self {
        Self {
            node_id: node_id.into().trim().to_uppercase(),
            px_width,
            ts: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Device index or path understood by the backend.
    pub device: String,
    /// Marker colors to pre-filter for before the grayscale fallback.
    #[serde(default = "default_colors")]
    pub color_filters: Vec<String>,
}

fn default_colors() -> Vec<String> {
    vec!["red".to_string(), "green".to_string(), "blue".to_string()]
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            device: "0".to_string(),
            color_filters: default_colors(),
        }
    }
}
