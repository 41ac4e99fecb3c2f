//! JSON graph loading.
//!
//! The on-disk format mirrors the surveyed building files: a `nodes` object
//! keyed by node id and an `edges` array. Node values are either a bare
//! coordinate pair or an object with a label and optional coordinates; the
//! bare form gets its id as display name.

use crate::{Edge, Node, WaypointGraph};
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct GraphFile {
    nodes: BTreeMap<String, NodeRecord>,
    #[serde(default)]
    edges: Vec<Edge>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeRecord {
    Coordinates([f64; 2]),
    Full {
        name: Option<String>,
        #[serde(default)]
        coordinates: Option<[f64; 2]>,
    },
}

impl NodeRecord {
    fn into_node(self, id: String) -> Node {
        match self {
            NodeRecord::Coordinates([x, y]) => Node {
                name: id.clone(),
                id,
                coordinates: Some((x, y)),
            },
            NodeRecord::Full { name, coordinates } => Node {
                name: name.unwrap_or_else(|| id.clone()),
                id,
                coordinates: coordinates.map(|[x, y]| (x, y)),
            },
        }
    }
}

pub fn load_graph_str(raw: &str) -> anyhow::Result<WaypointGraph> {
    let file: GraphFile = serde_json::from_str(raw).context("parsing graph json")?;
    let nodes = file
        .nodes
        .into_iter()
        .map(|(id, record)| record.into_node(id));
    let graph = WaypointGraph::build(nodes, file.edges).context("validating graph")?;
    Ok(graph)
}

pub fn load_graph(path: impl AsRef<Path>) -> anyhow::Result<WaypointGraph> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading graph file: {}", path.display()))?;
    let graph =
        load_graph_str(&raw).with_context(|| format!("loading graph: {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        nodes = graph.len(),
        edges = graph.edge_count(),
        "graph loaded"
    );
    Ok(graph)
}
