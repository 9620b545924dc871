use std::collections::BinaryHeap;

use anyhow::{bail, Result};

use crate::graph::{Graph, NodeId};

use super::congestion::Congestion;
use super::dijkstra::penalized_path;
use super::perf::performance_index;
use super::types::StudentPath;

/// Priority-driven local search over the student routes of one period.
///
/// A max-heap keeps the worst-scoring route on top; each inner step reroutes
/// that student under the congestion-penalized weights and keeps the result
/// only if its score improves. Students whose reroute failed to improve move
/// to the stuck list and sit out the rest of the batch. Every batch boundary
/// rebuilds the congestion from the full route pool, drains both pools into
/// a rescored heap, and either commits the batch as the new best state or
/// reverts to the previous one.
pub struct PeriodOptimizer {
    period: usize,
    heap: BinaryHeap<StudentPath>,
    /// Routes removed from the heap during the current batch because their
    /// last reroute did not improve. They keep counting toward congestion
    /// and the period total, and rejoin the heap at the batch boundary.
    stuck: Vec<StudentPath>,
    congestion: Congestion,
    sum_rperf: f64,
    /// Best accepted state: the heap and total as of the last committed
    /// batch boundary.
    best_heap: BinaryHeap<StudentPath>,
    best_sum: f64,
    /// Lowest accepted total ever observed, for progress reporting.
    best_ever: f64,
    /// Endpoint pair of the most recent failed reroute. Heap entries with the
    /// same endpoints are diverted straight to the stuck list without a
    /// search, so the optimizer does not spin on one unimprovable pair.
    last_pair: Option<(NodeId, NodeId)>,
}

impl PeriodOptimizer {
    /// Seed the optimizer from the committed routes of one (day, period).
    ///
    /// Congestion counts every consecutive directed pair across all seeded
    /// routes; scores are computed under those counts. The initial state is
    /// also the initial best snapshot.
    pub fn new(graph: &Graph, period: usize, routes: Vec<(String, Vec<NodeId>)>) -> Self {
        let congestion = Congestion::from_routes(routes.iter().map(|(_, route)| route.as_slice()));

        let mut heap = BinaryHeap::with_capacity(routes.len());
        let mut sum_rperf = 0.0;
        for (student, route) in routes {
            let rperf = performance_index(graph, &route, &congestion);
            sum_rperf += rperf;
            heap.push(StudentPath::new(student, rperf, route));
        }

        Self {
            period,
            best_heap: heap.clone(),
            best_sum: sum_rperf,
            best_ever: sum_rperf,
            heap,
            stuck: Vec::new(),
            congestion,
            sum_rperf,
            last_pair: None,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Running total of all students' scores. Between batch boundaries this
    /// is an approximation: scores in the heap go stale as congestion shifts.
    pub fn sum_rperf(&self) -> f64 {
        self.sum_rperf
    }

    pub fn best_ever(&self) -> f64 {
        self.best_ever
    }

    /// Every route currently in play (working heap plus stuck list), without
    /// disturbing the optimizer state. Used by checkpoints.
    pub fn routes(&self) -> impl Iterator<Item = &StudentPath> {
        self.heap.iter().chain(self.stuck.iter())
    }

    /// Routes still in the working heap; the rest sit on the stuck list
    /// until the next batch boundary.
    pub fn pending(&self) -> usize {
        self.heap.len()
    }

    /// One inner step: pop the worst offender, reroute it under the current
    /// congestion, and accept locally or divert to the stuck list.
    ///
    /// Entries matching the last failed endpoint pair are diverted without a
    /// search. If the heap drains before a different pair surfaces, the step
    /// is a no-op and the period rests until the next batch boundary.
    pub fn step(&mut self, graph: &Graph) -> Result<()> {
        let candidate = loop {
            let Some(worst) = self.heap.pop() else {
                return Ok(());
            };
            if self.last_pair.is_some() && worst.endpoints() == self.last_pair {
                self.stuck.push(worst);
                continue;
            }
            break worst;
        };

        let Some((start, end)) = candidate.endpoints() else {
            // An empty route cannot be rerouted; park it.
            self.stuck.push(candidate);
            return Ok(());
        };

        self.sum_rperf -= candidate.rperf;

        let Some(new_route) = penalized_path(graph, &self.congestion, start, end) else {
            bail!(
                "no route from {} to {} in period {}: room subgraph is disconnected",
                graph.name(start),
                graph.name(end),
                self.period
            );
        };
        let new_rperf = performance_index(graph, &new_route, &self.congestion);

        if new_rperf < candidate.rperf {
            self.sum_rperf += new_rperf;
            self.heap
                .push(StudentPath::new(candidate.student, new_rperf, new_route));
        } else {
            // No improvement possible under the current congestion; remember
            // the pair so siblings are diverted without a search.
            self.sum_rperf += candidate.rperf;
            self.last_pair = Some((start, end));
            self.stuck.push(candidate);
        }

        self.best_ever = self.best_ever.min(self.sum_rperf);
        Ok(())
    }

    /// Batch boundary: rebuild congestion from the full pool, drain the
    /// working heap and the stuck list into a fresh heap rescored under the
    /// fresh counts, and apply the acceptance rule.
    ///
    /// The stuck list empties out here: its members rejoin the live heap and
    /// are candidates again in the next batch. Accepted batches become the
    /// new best snapshot. Rejected batches are discarded: the working state
    /// drops back to the snapshot, and the snapshot's own worst offender is
    /// retired to the stuck list so the next batch explores different
    /// candidates instead of relitigating the same one.
    pub fn rebaseline(&mut self, graph: &Graph) {
        let congestion = Congestion::from_routes(self.routes().map(|path| path.route.as_slice()));

        let mut sum_rperf = 0.0;
        let mut heap = BinaryHeap::with_capacity(self.heap.len() + self.stuck.len());
        for path in self.heap.iter().chain(self.stuck.iter()) {
            let rperf = performance_index(graph, &path.route, &congestion);
            sum_rperf += rperf;
            heap.push(StudentPath::new(
                path.student.clone(),
                rperf,
                path.route.clone(),
            ));
        }
        self.stuck.clear();

        if sum_rperf > self.best_sum {
            // Regression: revert to the best accepted state.
            if let Some(demoted) = self.best_heap.pop() {
                self.stuck.push(demoted);
            }
            self.heap = self.best_heap.clone();
            self.sum_rperf = self.best_sum;
            let restored = Congestion::from_routes(self.routes().map(|path| path.route.as_slice()));
            self.congestion = restored;
        } else {
            self.best_heap = heap.clone();
            self.best_sum = sum_rperf;
            self.heap = heap;
            self.sum_rperf = sum_rperf;
            self.congestion = congestion;
        }

        self.best_ever = self.best_ever.min(self.sum_rperf);
    }

    /// Total accepted at the last committed batch boundary.
    pub fn best_sum(&self) -> f64 {
        self.best_sum
    }

    /// The congestion the next search will run under.
    pub fn congestion(&self) -> &Congestion {
        &self.congestion
    }
}
