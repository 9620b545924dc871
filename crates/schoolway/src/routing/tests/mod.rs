mod edge_cases;
mod monotonic;

use crate::graph::{Graph, NodeId};

use super::period::PeriodOptimizer;
use super::serialize::string_to_route;

/// Corridor layout shared across the optimizer tests.
///
/// ```text
///   G --5-- A1 --2-- X1 --2-- B1 --6-- G
///           A1 --7-- A2 --3-- B1
/// ```
///
/// A1 -> B1 runs 4 via the X1 junction and 10 via A2, so the junction
/// corridor is the natural bottleneck once several students share it.
fn school() -> Graph {
    Graph::parse(
        "G A1 5 0\n\
         G B1 6 0\n\
         A1 X1 2 0\n\
         X1 B1 2 0\n\
         A1 A2 7 0\n\
         A2 B1 3 0\n",
    )
    .unwrap()
}

/// Parse a route string against a graph, panicking on unknown nodes.
fn route(graph: &Graph, s: &str) -> Vec<NodeId> {
    string_to_route(graph, s).unwrap()
}

/// Seed a period optimizer with (student, route-string) pairs.
fn seed(graph: &Graph, routes: &[(&str, &str)]) -> PeriodOptimizer {
    let routes = routes
        .iter()
        .map(|&(student, r)| (student.to_owned(), route(graph, r)))
        .collect();
    PeriodOptimizer::new(graph, 2, routes)
}

/// Drive an optimizer for whole batches, returning the accepted total after
/// each batch boundary.
fn run_batches(
    optimizer: &mut PeriodOptimizer,
    graph: &Graph,
    batches: usize,
    batch_size: usize,
) -> Vec<f64> {
    let mut accepted = Vec::with_capacity(batches);
    for _ in 0..batches {
        for _ in 0..batch_size {
            optimizer.step(graph).unwrap();
        }
        optimizer.rebaseline(graph);
        accepted.push(optimizer.best_sum());
    }
    accepted
}
