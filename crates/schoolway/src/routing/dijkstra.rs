use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::graph::{Graph, NodeId};

use super::congestion::Congestion;
use super::types::CONGESTION_PENALTY;

const NO_PREV: u32 = u32::MAX;

/// Shortest path from `start` to `end` under congestion-penalized weights.
///
/// Each traversal of `(u, v)` costs `w(u, v) + CONGESTION_PENALTY * c(u, v)`
/// where `c` is the directed congestion count. Costs accumulate in `u64`
/// with `u64::MAX` as the unreached sentinel, so there is no overflow and no
/// floating point in the search.
///
/// Ties between equal-cost frontier nodes break on the smaller node id, which
/// makes the returned path deterministic for a fixed graph and congestion.
///
/// `start == end` returns the two-node stationary sentinel `[G, G]`, which
/// the performance index scores as zero. Returns `None` when `end` is
/// unreachable; the room-to-room subgraph is expected to be connected, so the
/// caller treats that as a fatal invariant violation rather than recovering.
pub fn penalized_path(
    graph: &Graph,
    congestion: &Congestion,
    start: NodeId,
    end: NodeId,
) -> Option<Vec<NodeId>> {
    if start == end {
        let ground = graph.ground().unwrap_or(start);
        return Some(vec![ground, ground]);
    }

    let n = graph.node_count();
    let mut dist = vec![u64::MAX; n];
    let mut prev = vec![NO_PREV; n];
    dist[start.index()] = 0;

    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, start)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        // Skip stale entries for nodes already settled at a lower cost.
        if cost > dist[node.index()] {
            continue;
        }
        if node == end {
            break;
        }

        for edge in graph.neighbors(node) {
            let penalty = CONGESTION_PENALTY * congestion.count(node, edge.to) as u64;
            let next = cost.saturating_add(edge.weight as u64 + penalty);
            if next < dist[edge.to.index()] {
                dist[edge.to.index()] = next;
                prev[edge.to.index()] = node.index() as u32;
                heap.push(Reverse((next, edge.to)));
            }
        }
    }

    if prev[end.index()] == NO_PREV {
        return None;
    }

    let mut path = vec![end];
    let mut at = end;
    while at != start {
        at = NodeId::from_index(prev[at.index()] as usize);
        path.push(at);
    }
    path.reverse();
    Some(path)
}
