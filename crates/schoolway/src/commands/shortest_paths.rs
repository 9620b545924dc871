use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;

use crate::apsp::ShortestPaths;
use crate::graph::Graph;
use crate::routing::serialize::route_to_string;

/// Compute APSP and write the room-pair table: concatenated room-pair key to
/// space-separated route string, for every ordered pair of distinct
/// room-like nodes.
pub fn run(paths: &Path, output: &Path) -> anyhow::Result<()> {
    let graph = Graph::load(paths)?;
    eprintln!("Running Floyd-Warshall over {} nodes", graph.node_count());

    let table = ShortestPaths::compute(&graph).room_pair_table(&graph);
    let json: BTreeMap<String, String> = table
        .iter()
        .map(|(&(from, to), route)| {
            (
                format!("{}{}", graph.name(from), graph.name(to)),
                route_to_string(&graph, route),
            )
        })
        .collect();

    let contents = serde_json::to_string(&json).context("failed to serialize the table")?;
    std::fs::write(output, contents)
        .with_context(|| format!("failed to write {}", output.display()))?;

    eprintln!(
        "Wrote {} room pairs to {}",
        json.len(),
        output.display().to_string().bold()
    );
    Ok(())
}
