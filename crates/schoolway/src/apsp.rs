use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::graph::{Graph, NodeId};

const INF: u32 = u32::MAX;
const NO_PRED: u32 = u32::MAX;

/// Precomputed routes between ordered pairs of room-like nodes: the table S
/// that seeds timetable expansion.
pub type PairRoutes = BTreeMap<(NodeId, NodeId), Vec<NodeId>>;

/// Load a shortest-paths file: a JSON map from concatenated room-pair key to
/// space-separated route string.
///
/// The concatenated keys cannot be split back into two names unambiguously,
/// so each entry's endpoints are taken from the route itself. Entries naming
/// unknown nodes are logged and skipped.
pub fn load_pair_routes(graph: &Graph, path: &Path) -> Result<PairRoutes> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to open shortest-paths file {}", path.display()))?;
    let raw: BTreeMap<String, String> = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse shortest-paths file {}", path.display()))?;

    let mut table = PairRoutes::new();
    for (key, value) in raw {
        let Some(route) = crate::routing::serialize::string_to_route(graph, &value) else {
            log::warn!("shortest-paths entry {key} references unknown nodes, skipping");
            continue;
        };
        if route.len() < 2 {
            continue;
        }
        table.insert((route[0], route[route.len() - 1]), route);
    }
    Ok(table)
}

/// All-pairs shortest paths over the school graph (Floyd–Warshall).
///
/// Distance and predecessor matrices are flat `|V|²` vectors indexed by
/// interned node ids, row-major: entry `(u, v)` lives at `u * n + v`.
pub struct ShortestPaths {
    n: usize,
    dist: Vec<u32>,
    pred: Vec<u32>,
}

impl ShortestPaths {
    /// Run Floyd–Warshall on the full graph.
    ///
    /// The relaxation over rows is independent for a fixed pivot, so each
    /// pivot's pass runs in parallel across rows. The pivot row is copied
    /// first; relaxing the pivot row against itself is a no-op.
    pub fn compute(graph: &Graph) -> Self {
        let n = graph.node_count();
        if n == 0 {
            return Self {
                n,
                dist: Vec::new(),
                pred: Vec::new(),
            };
        }
        let mut dist = vec![INF; n * n];
        let mut pred = vec![NO_PRED; n * n];

        for i in 0..n {
            dist[i * n + i] = 0;
        }
        for u in graph.nodes() {
            for edge in graph.neighbors(u) {
                dist[u.index() * n + edge.to.index()] = edge.weight;
                pred[u.index() * n + edge.to.index()] = u.index() as u32;
            }
        }

        for k in 0..n {
            let dist_k = dist[k * n..(k + 1) * n].to_vec();
            let pred_k = pred[k * n..(k + 1) * n].to_vec();

            dist.par_chunks_mut(n)
                .zip(pred.par_chunks_mut(n))
                .for_each(|(dist_row, pred_row)| {
                    let via = dist_row[k];
                    if via == INF {
                        return;
                    }
                    for j in 0..n {
                        if dist_k[j] == INF {
                            continue;
                        }
                        let through = via.saturating_add(dist_k[j]);
                        if through < dist_row[j] {
                            dist_row[j] = through;
                            pred_row[j] = pred_k[j];
                        }
                    }
                });
        }

        Self { n, dist, pred }
    }

    /// Shortest-path distance between two nodes, or `None` if unreachable.
    pub fn distance(&self, u: NodeId, v: NodeId) -> Option<u32> {
        let d = self.dist[u.index() * self.n + v.index()];
        (d != INF).then_some(d)
    }

    /// Reconstruct the shortest path from `u` to `v` by walking predecessors
    /// back from `v`. Returns an empty path if the pair is unreachable (or if
    /// `u == v`, which has no predecessor entry).
    pub fn path(&self, u: NodeId, v: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        if self.pred[u.index() * self.n + v.index()] == NO_PRED {
            return path;
        }
        let mut at = v;
        while at != u {
            path.push(at);
            at = NodeId::from_index(self.pred[u.index() * self.n + at.index()] as usize);
        }
        path.push(u);
        path.reverse();
        path
    }

    /// The derived room-pair table: for every ordered pair of distinct
    /// room-like nodes with a path between them, the full node sequence.
    /// Keys are iteration-order-independent (sorted by node id pair).
    pub fn room_pair_table(&self, graph: &Graph) -> PairRoutes {
        let rooms: Vec<NodeId> = graph.nodes().filter(|&n| graph.is_room_like(n)).collect();
        let mut table = BTreeMap::new();
        for &u in &rooms {
            for &v in &rooms {
                if u == v {
                    continue;
                }
                let path = self.path(u, v);
                if !path.is_empty() {
                    table.insert((u, v), path);
                }
            }
        }
        table
    }
}
