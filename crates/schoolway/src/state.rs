use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::routing::types::DAYS_PER_WEEK;

/// student -> day -> period-index -> space-separated route string.
/// An empty string means no movement that period.
pub type RouteTable = BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>;

/// day -> period-index -> last accepted period total, truncated to integer.
pub type PerfIndices = BTreeMap<String, BTreeMap<String, i64>>;

/// The route-state file: everything needed to resume an optimization run.
///
/// `iter` holds one counter per school day; the optimizer for day `d` reads
/// and writes `iter[d - 1]`. All maps are `BTreeMap`s so serialization is
/// key-sorted and byte-deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteState {
    pub iter: Vec<u64>,
    #[serde(default)]
    pub indices: PerfIndices,
    pub routes: RouteTable,
}

impl RouteState {
    /// Fresh state around an expanded route table: zeroed counters, no
    /// performance indices yet.
    pub fn initial(routes: RouteTable) -> Self {
        Self {
            iter: vec![0; DAYS_PER_WEEK],
            indices: PerfIndices::new(),
            routes,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to open route-state file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse route-state file {}", path.display()))
    }

    /// Write compact JSON atomically: to a sibling temp file first, then
    /// rename over the destination, so a crash mid-write never leaves a
    /// truncated checkpoint behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self).context("failed to serialize route state")?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("failed to move checkpoint into {}", path.display()))?;
        Ok(())
    }

    /// Checkpoint destination for one day: the state path with a `_<day>.json`
    /// suffix appended, so per-day runs never clobber each other's output.
    pub fn day_file(base: &Path, day: usize) -> PathBuf {
        PathBuf::from(format!("{}_{}.json", base.display(), day))
    }

    /// Iteration counter for a 1-based day. Missing entries read as zero.
    pub fn iter_for_day(&self, day: usize) -> u64 {
        day.checked_sub(1)
            .and_then(|index| self.iter.get(index))
            .copied()
            .unwrap_or(0)
    }

    pub fn set_iter_for_day(&mut self, day: usize, value: u64) {
        let Some(index) = day.checked_sub(1) else {
            return;
        };
        if self.iter.len() <= index {
            self.iter.resize(index + 1, 0);
        }
        self.iter[index] = value;
    }

    pub fn set_route(&mut self, student: &str, day: usize, period: usize, route: String) {
        self.routes
            .entry(student.to_owned())
            .or_default()
            .entry(day.to_string())
            .or_default()
            .insert(period.to_string(), route);
    }

    pub fn route(&self, student: &str, day: usize, period: usize) -> Option<&str> {
        self.routes
            .get(student)?
            .get(&day.to_string())?
            .get(&period.to_string())
            .map(String::as_str)
    }

    pub fn set_index(&mut self, day: usize, period: usize, value: i64) {
        self.indices
            .entry(day.to_string())
            .or_default()
            .insert(period.to_string(), value);
    }
}
