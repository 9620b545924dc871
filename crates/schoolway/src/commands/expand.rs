use std::path::Path;

use colored::Colorize;

use crate::apsp::{self, ShortestPaths};
use crate::graph::Graph;
use crate::state::RouteState;
use crate::timetable;

/// Expand a weekly timetable into the initial route-state file.
///
/// The room-pair table comes from a precomputed shortest-paths file when one
/// is given, otherwise from an in-process Floyd-Warshall run.
pub fn run(
    timetable_path: &Path,
    paths: &Path,
    shortest_paths: Option<&Path>,
    output: &Path,
) -> anyhow::Result<()> {
    let graph = Graph::load(paths)?;
    let tt = timetable::load(timetable_path)?;
    eprintln!(
        "Expanding {} students over {} nodes",
        tt.len(),
        graph.node_count()
    );

    let table = match shortest_paths {
        Some(path) => apsp::load_pair_routes(&graph, path)?,
        None => ShortestPaths::compute(&graph).room_pair_table(&graph),
    };
    log::debug!("room-pair table has {} entries", table.len());

    let routes = timetable::expand(&graph, &table, &tt);
    RouteState::initial(routes).save(output)?;

    eprintln!("Wrote {}", output.display().to_string().bold());
    Ok(())
}
