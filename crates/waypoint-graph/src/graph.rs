use crate::{Edge, GraphError, Node, Result};
use std::collections::HashMap;

/// Immutable directed graph of waypoints with weighted, instruction-bearing
/// edges. Every edge endpoint is checked against the node set at build time;
/// queries never have to re-validate.
#[derive(Debug, Clone)]
pub struct WaypointGraph {
    nodes: HashMap<String, Node>,
    edges: Vec<Edge>,
    adjacency: HashMap<String, Vec<usize>>,
}

impl WaypointGraph {
    pub fn build<N, E>(nodes: N, edges: E) -> Result<Self>
    where
        N: IntoIterator<Item = Node>,
        E: IntoIterator<Item = Edge>,
    {
        let mut node_map: HashMap<String, Node> = HashMap::new();
        for node in nodes {
            if node_map.insert(node.id.clone(), node.clone()).is_some() {
                return Err(GraphError::DuplicateNode(node.id));
            }
        }

        let edges: Vec<Edge> = edges.into_iter().collect();
        let mut adjacency: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, edge) in edges.iter().enumerate() {
            for endpoint in [&edge.from, &edge.to] {
                if !node_map.contains_key(endpoint) {
                    return Err(GraphError::UnknownNode {
                        from: edge.from.clone(),
                        to: edge.to.clone(),
                        node: endpoint.clone(),
                    });
                }
            }
            if edge.weight < 0.0 {
                return Err(GraphError::NegativeWeight {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    weight: edge.weight,
                });
            }
            adjacency.entry(edge.from.clone()).or_default().push(idx);
        }

        tracing::debug!(
            nodes = node_map.len(),
            edges = edges.len(),
            "waypoint graph built"
        );

        Ok(Self {
            nodes: node_map,
            edges,
            adjacency,
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Human-readable label for a node, or the raw id when unknown.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.nodes.get(id).map_or(id, |n| n.name.as_str())
    }

    /// Outgoing edges of a node; empty for unknown ids.
    pub fn neighbors(&self, id: &str) -> impl Iterator<Item = &Edge> {
        self.adjacency
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&idx| &self.edges[idx])
    }

    /// The first edge connecting `from` directly to `to`, if any.
    pub fn edge_between(&self, from: &str, to: &str) -> Option<&Edge> {
        self.neighbors(from).find(|edge| edge.to == to)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(ids: &[&str]) -> Vec<Node> {
        ids.iter().map(|id| Node::new(*id)).collect()
    }

    #[test]
    fn build_validates_edge_endpoints() {
        let err = WaypointGraph::build(nodes(&["A"]), vec![Edge::new("A", "Z", 1.0)]);
        assert!(matches!(err, Err(GraphError::UnknownNode { ref node, .. }) if node == "Z"));
    }

    #[test]
    fn build_rejects_negative_weight() {
        let err = WaypointGraph::build(nodes(&["A", "B"]), vec![Edge::new("A", "B", -0.5)]);
        assert!(matches!(err, Err(GraphError::NegativeWeight { .. })));
    }

    #[test]
    fn build_rejects_duplicate_node_ids() {
        let err = WaypointGraph::build(nodes(&["A", "A"]), vec![]);
        assert!(matches!(err, Err(GraphError::DuplicateNode(ref id)) if id == "A"));
    }

    #[test]
    fn neighbors_are_directed() {
        let graph = WaypointGraph::build(
            nodes(&["A", "B"]),
            vec![Edge::new("A", "B", 2.0)],
        )
        .unwrap();
        assert_eq!(graph.neighbors("A").count(), 1);
        assert_eq!(graph.neighbors("B").count(), 0);
        assert_eq!(graph.neighbors("missing").count(), 0);
    }

    #[test]
    fn edge_lookup_and_names() {
        let graph = WaypointGraph::build(
            vec![Node::named("F", "Washroom"), Node::new("G")],
            vec![Edge::new("G", "F", 1.0).with_instructions(["turn left"])],
        )
        .unwrap();
        let edge = graph.edge_between("G", "F").unwrap();
        assert_eq!(edge.instructions, vec!["turn left".to_string()]);
        assert!(graph.edge_between("F", "G").is_none());
        assert_eq!(graph.display_name("F"), "Washroom");
        assert_eq!(graph.display_name("G"), "G");
    }
}
