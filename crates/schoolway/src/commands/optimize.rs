use std::path::Path;

use crate::graph::Graph;
use crate::routing::{DayOptimizer, OptimizerConfig};
use crate::state::RouteState;

/// Run the day optimizer: load the graph and route state, seed every active
/// period, and iterate until the budget runs out or the process is stopped.
/// Checkpoints land next to the input as `<route-file>_<day>.json`.
pub fn run(
    paths: &Path,
    route_file: &Path,
    day: usize,
    config: OptimizerConfig,
) -> anyhow::Result<()> {
    let graph = Graph::load(paths)?;
    log::info!(
        "loaded graph: {} nodes from {}",
        graph.node_count(),
        paths.display()
    );

    let mut state = RouteState::load(route_file)?;
    eprintln!(
        "Optimizing day {} from iteration {} ({} students)",
        day,
        state.iter_for_day(day),
        state.routes.len()
    );

    let mut optimizer = DayOptimizer::new(&graph, &state, day, config)?;
    optimizer.run(&mut state, route_file)
}
