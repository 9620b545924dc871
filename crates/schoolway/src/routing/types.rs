use std::cmp::Ordering;

use crate::graph::NodeId;

/// Extra effective weight charged per unit of edge congestion by the
/// penalized search.
pub const CONGESTION_PENALTY: u64 = 10_000;

/// Congestion count at which the performance-index factor crosses its
/// midpoint (factor 2).
pub const CONGESTION_KNEE: f64 = 300.0;

/// Spread of the performance-index saturation around the knee.
pub const CONGESTION_SLOPE: f64 = 200.0;

/// Daily period indices with corridor traffic worth optimizing. The missing
/// indices are full-attendance class periods: nobody is in the corridors.
pub const ACTIVE_PERIODS: [usize; 8] = [0, 2, 4, 5, 6, 7, 9, 11];

/// Period indices run 0 (morning arrival) through 11 (end-of-day return).
pub const PERIODS_PER_DAY: usize = 12;

/// School days covered by a weekly timetable.
pub const DAYS_PER_WEEK: usize = 5;

/// Students with numeric ids below this are seniors, who return to the
/// ground floor over lunch.
pub const SENIOR_ID_LIMIT: u32 = 22_000;

/// A student's route for one period, scored against the congestion it was
/// last evaluated under.
///
/// These are the work items of the optimizer: a max-heap ordered on `rperf`
/// keeps the worst-performing route on top. The score goes stale as
/// congestion shifts during a batch; the heap is a hint about which student
/// to try next, not ground truth, and is rebaselined at every batch boundary.
#[derive(Debug, Clone)]
pub struct StudentPath {
    pub student: String,
    pub rperf: f64,
    pub route: Vec<NodeId>,
}

impl StudentPath {
    pub fn new(student: String, rperf: f64, route: Vec<NodeId>) -> Self {
        Self {
            student,
            rperf,
            route,
        }
    }

    /// First node of the route, if any.
    pub fn start(&self) -> Option<NodeId> {
        self.route.first().copied()
    }

    /// Last node of the route, if any.
    pub fn end(&self) -> Option<NodeId> {
        self.route.last().copied()
    }

    /// The (start, end) endpoint pair used for stuck-pair tracking.
    pub fn endpoints(&self) -> Option<(NodeId, NodeId)> {
        Some((self.start()?, self.end()?))
    }
}

impl PartialEq for StudentPath {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for StudentPath {}

impl Ord for StudentPath {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher rperf = higher priority (BinaryHeap is a max-heap).
        self.rperf
            .partial_cmp(&other.rperf)
            .unwrap_or(Ordering::Equal)
            // Deterministic tie-break for equal scores.
            .then_with(|| self.student.cmp(&other.student).reverse())
            .then_with(|| self.route.cmp(&other.route))
    }
}

impl PartialOrd for StudentPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Tunables for the optimizer loop.
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Inner steps between congestion rebuilds (the batch boundary).
    pub batch_size: u64,
    /// Outer iterations between checkpoint writes.
    pub save_steps: u64,
    /// Overall iteration budget. `None` runs until the process is stopped;
    /// the latest checkpoint file is the recovery point.
    pub iterations: Option<u64>,
    /// Suppress the per-step `0` protocol lines. Checkpoint lines are always
    /// emitted.
    pub quiet: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            save_steps: 500,
            iterations: None,
            quiet: false,
        }
    }
}
