use crate::{Route, WaypointGraph};

/// One edge traversal worth of guidance.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanStep {
    pub from: String,
    pub to: String,
    /// Always non-empty: edges without instructions get the generic walk
    /// step.
    pub instructions: Vec<String>,
}

pub type InstructionPlan = Vec<PlanStep>;

/// Expand a route into per-edge instruction groups, one entry per
/// consecutive node pair. Pure function of the graph and route.
pub fn sequence(graph: &WaypointGraph, route: &Route) -> InstructionPlan {
    route
        .pairs()
        .map(|(from, to)| {
            let instructions = graph
                .edge_between(from, to)
                .map(|edge| edge.instructions.clone())
                .filter(|steps| !steps.is_empty())
                .unwrap_or_else(|| {
                    vec![format!(
                        "Walk from {} to {}",
                        graph.display_name(from),
                        graph.display_name(to)
                    )]
                });
            PlanStep {
                from: from.to_string(),
                to: to.to_string(),
                instructions,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{shortest_path, Edge, Node, WaypointGraph};

    #[test]
    fn plan_aligns_with_route_pairs() {
        let graph = WaypointGraph::build(
            ["A", "B", "C"].map(Node::new),
            vec![
                Edge::new("A", "B", 2.0).with_instructions(["turn right"]),
                Edge::new("B", "C", 3.0),
            ],
        )
        .unwrap();
        let route = shortest_path(&graph, "A", "C").unwrap();
        let plan = sequence(&graph, &route);

        assert_eq!(plan.len(), route.len() - 1);
        assert_eq!(plan[0].instructions, vec!["turn right".to_string()]);
        assert_eq!(plan[1].instructions, vec!["Walk from B to C".to_string()]);
        for step in &plan {
            assert!(!step.instructions.is_empty());
        }
    }

    #[test]
    fn generic_step_uses_display_names() {
        let graph = WaypointGraph::build(
            vec![Node::named("F", "Washroom"), Node::named("G", "Room 8")],
            vec![Edge::new("G", "F", 1.0)],
        )
        .unwrap();
        let route = Route {
            nodes: vec!["G".to_string(), "F".to_string()],
            cost: 1.0,
        };
        let plan = sequence(&graph, &route);
        assert_eq!(
            plan[0].instructions,
            vec!["Walk from Room 8 to Washroom".to_string()]
        );
    }

    #[test]
    fn trivial_route_yields_empty_plan() {
        let graph = WaypointGraph::build(vec![Node::new("A")], vec![]).unwrap();
        let route = shortest_path(&graph, "A", "A").unwrap();
        assert!(sequence(&graph, &route).is_empty());
    }
}
