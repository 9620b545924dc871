use crate::graph::{Graph, NodeId};

/// Serialize a route to its table form: node names joined by single spaces.
///
/// An empty route serializes to the empty string, which the route table
/// reads as "no movement this period".
pub fn route_to_string(graph: &Graph, route: &[NodeId]) -> String {
    route
        .iter()
        .map(|&node| graph.name(node))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a space-separated route string back into node ids.
///
/// Returns `None` if any name is not a node of the graph; the caller decides
/// whether that is a skip or a diagnostic. An empty or whitespace-only string
/// parses to an empty route.
pub fn string_to_route(graph: &Graph, s: &str) -> Option<Vec<NodeId>> {
    s.split_whitespace().map(|name| graph.id(name)).collect()
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn graph() -> Graph {
        Graph::parse("G A101 5 0\nA101 A102 7 0\n").unwrap()
    }

    #[test]
    fn round_trip_preserves_the_string() {
        let graph = graph();
        for s in ["G A101", "G A101 A102", "A102 A101 G"] {
            let route = string_to_route(&graph, s).unwrap();
            assert_eq!(route_to_string(&graph, &route), s);
        }
    }

    #[test]
    fn empty_string_is_the_empty_route() {
        let graph = graph();
        assert_eq!(string_to_route(&graph, ""), Some(vec![]));
        assert_eq!(string_to_route(&graph, "   "), Some(vec![]));
        assert_eq!(route_to_string(&graph, &[]), "");
    }

    #[test]
    fn unknown_node_fails_the_parse() {
        let graph = graph();
        assert_eq!(string_to_route(&graph, "G B999"), None);
    }
}
