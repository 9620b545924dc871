use crate::graph::{Graph, NodeId};

use super::congestion::Congestion;
use super::types::{CONGESTION_KNEE, CONGESTION_SLOPE};

/// Whether a route is the stationary sentinel `[G, G]` (spare period, no
/// movement).
pub fn is_stationary(graph: &Graph, route: &[NodeId]) -> bool {
    match (graph.ground(), route) {
        (Some(ground), [a, b]) => *a == ground && *b == ground,
        _ => false,
    }
}

/// Performance index of one route under the given congestion.
///
/// Sums `w * (2 + tanh((c - 300) / 200))` over the route's consecutive
/// pairs. The factor stays within (1, 3): an empty corridor costs about its
/// plain length, a saturated one about triple. Pairs touching the ground
/// node are excluded, since ground-floor traffic is not the optimization
/// target, and the stationary sentinel scores zero.
pub fn performance_index(graph: &Graph, route: &[NodeId], congestion: &Congestion) -> f64 {
    if is_stationary(graph, route) {
        return 0.0;
    }

    let ground = graph.ground();
    let mut rperf = 0.0;

    for pair in route.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if Some(from) == ground || Some(to) == ground {
            continue;
        }
        let Some(weight) = graph.weight(from, to) else {
            // Routes come from the graph's own paths, so a missing edge means
            // corrupted input. Skip the pair rather than poisoning the run.
            log::warn!(
                "route references missing edge {} -> {}",
                graph.name(from),
                graph.name(to)
            );
            continue;
        };
        let load = congestion.count(from, to) as f64;
        let factor = 2.0 + ((load - CONGESTION_KNEE) / CONGESTION_SLOPE).tanh();
        rperf += weight as f64 * factor;
    }

    rperf
}
