use crate::{GraphError, Result, WaypointGraph};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

/// An ordered walk through the graph: first node is the source, last is the
/// destination, every consecutive pair is connected by an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub nodes: Vec<String>,
    pub cost: f64,
}

impl Route {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edge traversals the route requires.
    pub fn steps(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes
            .windows(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }
}

// Min-frontier entry: ordered by accumulated cost, then lexicographic node
// id so equal-cost expansion order is stable across runs.
#[derive(Debug, Clone, PartialEq)]
struct FrontierEntry {
    cost: f64,
    node: String,
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Minimum-cost path between two waypoints.
///
/// Classic Dijkstra over the graph's adjacency view: expand the cheapest
/// unvisited frontier node, relax its outgoing edges, finalize nodes on
/// first dequeue, stop as soon as the destination is dequeued. Fails with
/// [`GraphError::NoRoute`] when either endpoint is missing or the
/// destination is unreachable.
pub fn shortest_path(graph: &WaypointGraph, source: &str, destination: &str) -> Result<Route> {
    let no_route = || GraphError::NoRoute {
        source: source.to_string(),
        destination: destination.to_string(),
    };

    if !graph.contains(source) || !graph.contains(destination) {
        return Err(no_route());
    }
    if source == destination {
        return Ok(Route {
            nodes: vec![source.to_string()],
            cost: 0.0,
        });
    }

    let mut frontier = BinaryHeap::new();
    let mut best: HashMap<String, f64> = HashMap::new();
    let mut came_from: HashMap<String, String> = HashMap::new();
    let mut visited: HashSet<String> = HashSet::new();

    best.insert(source.to_string(), 0.0);
    frontier.push(Reverse(FrontierEntry {
        cost: 0.0,
        node: source.to_string(),
    }));

    while let Some(Reverse(entry)) = frontier.pop() {
        if !visited.insert(entry.node.clone()) {
            continue;
        }
        if entry.node == destination {
            let mut nodes = vec![entry.node.clone()];
            let mut cursor = entry.node.as_str();
            while let Some(prev) = came_from.get(cursor) {
                nodes.push(prev.clone());
                cursor = prev;
            }
            nodes.reverse();
            tracing::debug!(
                source,
                destination,
                cost = entry.cost,
                hops = nodes.len() - 1,
                "route found"
            );
            return Ok(Route {
                nodes,
                cost: entry.cost,
            });
        }

        for edge in graph.neighbors(&entry.node) {
            if visited.contains(&edge.to) {
                continue;
            }
            let tentative = entry.cost + edge.weight;
            let improved = best
                .get(&edge.to)
                .map_or(true, |&known| tentative < known);
            if improved {
                best.insert(edge.to.clone(), tentative);
                came_from.insert(edge.to.clone(), entry.node.clone());
                frontier.push(Reverse(FrontierEntry {
                    cost: tentative,
                    node: edge.to.clone(),
                }));
            }
        }
    }

    Err(no_route())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Edge, Node};

    fn graph(node_ids: &[&str], edges: Vec<Edge>) -> WaypointGraph {
        let nodes = node_ids.iter().map(|id| Node::new(*id));
        WaypointGraph::build(nodes, edges).unwrap()
    }

    #[test]
    fn finds_minimum_cost_path() {
        let g = graph(
            &["A", "B", "C"],
            vec![
                Edge::new("A", "B", 2.0),
                Edge::new("B", "C", 3.0),
                Edge::new("A", "C", 10.0),
            ],
        );
        let route = shortest_path(&g, "A", "C").unwrap();
        assert_eq!(route.nodes, vec!["A", "B", "C"]);
        assert_eq!(route.cost, 5.0);
    }

    #[test]
    fn route_uses_only_existing_edges() {
        let g = graph(
            &["A", "B", "C", "D"],
            vec![
                Edge::new("A", "B", 1.0),
                Edge::new("B", "C", 1.0),
                Edge::new("C", "D", 1.0),
            ],
        );
        let route = shortest_path(&g, "A", "D").unwrap();
        for (from, to) in route.pairs() {
            assert!(g.edge_between(from, to).is_some());
        }
    }

    #[test]
    fn same_source_and_destination_is_trivial() {
        let g = graph(&["A", "B"], vec![Edge::new("A", "B", 1.0)]);
        let route = shortest_path(&g, "A", "A").unwrap();
        assert_eq!(route.nodes, vec!["A"]);
        assert_eq!(route.cost, 0.0);
        assert_eq!(route.steps(), 0);
    }

    #[test]
    fn unreachable_destination_is_no_route() {
        // D has no incoming or outgoing edges.
        let g = graph(&["A", "B", "D"], vec![Edge::new("A", "B", 2.0)]);
        let err = shortest_path(&g, "A", "D");
        assert!(matches!(err, Err(GraphError::NoRoute { .. })));
    }

    #[test]
    fn missing_endpoints_are_no_route() {
        let g = graph(&["A"], vec![]);
        assert!(matches!(
            shortest_path(&g, "A", "Z"),
            Err(GraphError::NoRoute { .. })
        ));
        assert!(matches!(
            shortest_path(&g, "Z", "A"),
            Err(GraphError::NoRoute { .. })
        ));
    }

    #[test]
    fn zero_weight_edges_are_legal() {
        let g = graph(
            &["A", "B", "C"],
            vec![Edge::new("A", "B", 0.0), Edge::new("B", "C", 0.0)],
        );
        let route = shortest_path(&g, "A", "C").unwrap();
        assert_eq!(route.cost, 0.0);
        assert_eq!(route.nodes, vec!["A", "B", "C"]);
    }

    #[test]
    fn equal_cost_ties_break_lexicographically() {
        // Two cost-2 paths to D, through B or through C. The B branch must
        // win because B sorts before C.
        let g = graph(
            &["A", "B", "C", "D"],
            vec![
                Edge::new("A", "C", 1.0),
                Edge::new("A", "B", 1.0),
                Edge::new("C", "D", 1.0),
                Edge::new("B", "D", 1.0),
            ],
        );
        let route = shortest_path(&g, "A", "D").unwrap();
        assert_eq!(route.nodes, vec!["A", "B", "D"]);
    }
}
