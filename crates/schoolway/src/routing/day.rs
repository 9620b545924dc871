use std::path::Path;

use anyhow::{bail, Result};

use crate::graph::{Graph, GROUND};
use crate::state::RouteState;

use super::perf::is_stationary;
use super::period::PeriodOptimizer;
use super::serialize::{route_to_string, string_to_route};
use super::types::{OptimizerConfig, ACTIVE_PERIODS};

/// Runs the period optimizers of one school day interleaved.
///
/// Each outer iteration performs one inner step per active period, in fixed
/// period order, evaluating every period's batch boundary independently.
/// Every `save_steps` outer iterations the committed route table is updated
/// from all periods and written to the day-tagged output file; the iteration
/// counter stored there lets a later run resume where this one stopped.
///
/// Progress protocol on stdout, one line per inner step:
///
/// ```text
/// 0 <iter> <day> <period> <sum> <best-sum-ever>
/// ```
///
/// with tag `1` for a successful checkpoint write and `!` for a failed one
/// (the run continues; a later checkpoint may succeed).
pub struct DayOptimizer<'g> {
    graph: &'g Graph,
    day: usize,
    periods: Vec<PeriodOptimizer>,
    config: OptimizerConfig,
}

impl<'g> DayOptimizer<'g> {
    /// Seed one optimizer per active period from the committed route table.
    ///
    /// An empty or absent cell means the student does not move that period
    /// and seeds as the stationary sentinel. A cell naming a node missing
    /// from the graph is corrupt input: it is logged and seeded stationary
    /// rather than aborting the whole day.
    pub fn new(
        graph: &'g Graph,
        state: &RouteState,
        day: usize,
        config: OptimizerConfig,
    ) -> Result<Self> {
        let Some(ground) = graph.ground() else {
            bail!("graph has no ground node {GROUND}");
        };
        let day_key = day.to_string();

        let mut periods = Vec::with_capacity(ACTIVE_PERIODS.len());
        for &period in &ACTIVE_PERIODS {
            let period_key = period.to_string();
            let mut routes = Vec::with_capacity(state.routes.len());
            for (student, week) in &state.routes {
                let cell = week
                    .get(&day_key)
                    .and_then(|today| today.get(&period_key))
                    .map(String::as_str)
                    .unwrap_or("");
                let route = match string_to_route(graph, cell) {
                    Some(route) if route.len() >= 2 => route,
                    Some(_) => vec![ground, ground],
                    None => {
                        log::warn!(
                            "student {student}, day {day}, period {period}: \
                             route references unknown nodes, seeding as stationary"
                        );
                        vec![ground, ground]
                    }
                };
                routes.push((student.clone(), route));
            }
            periods.push(PeriodOptimizer::new(graph, period, routes));
        }

        Ok(Self {
            graph,
            day,
            periods,
            config,
        })
    }

    /// Run until the iteration budget is exhausted. With no budget set this
    /// runs forever; the caller stops the process and resumes from the last
    /// checkpoint.
    ///
    /// The starting iteration comes from the route-state file's per-day
    /// counter, so a resumed run continues the numbering of the run that
    /// produced its input.
    pub fn run(&mut self, state: &mut RouteState, out_base: &Path) -> Result<()> {
        let batch_size = self.config.batch_size.max(1);
        let save_steps = self.config.save_steps.max(1);

        let mut iteration = state.iter_for_day(self.day);
        loop {
            iteration += 1;
            if self
                .config
                .iterations
                .is_some_and(|limit| iteration > limit)
            {
                break;
            }

            for period in &mut self.periods {
                period.step(self.graph)?;
                if iteration % batch_size == 0 {
                    period.rebaseline(self.graph);
                }
                if !self.config.quiet {
                    println!(
                        "0 {} {} {} {:.0} {:.0}",
                        iteration,
                        self.day,
                        period.period(),
                        period.sum_rperf(),
                        period.best_ever()
                    );
                }
            }

            if iteration % save_steps == 0 {
                self.checkpoint(state, out_base, iteration);
            }
        }
        Ok(())
    }

    /// Write the composite `{ iter, indices, routes }` checkpoint.
    ///
    /// Every period's pool is drained non-destructively into the route
    /// table; optimization continues unaffected afterwards. A write failure
    /// is reported on the protocol stream and swallowed.
    pub fn checkpoint(&self, state: &mut RouteState, out_base: &Path, iteration: u64) {
        for period in &self.periods {
            for path in period.routes() {
                let route = if is_stationary(self.graph, &path.route) {
                    String::new()
                } else {
                    route_to_string(self.graph, &path.route)
                };
                state.set_route(&path.student, self.day, period.period(), route);
            }
            // The index records the committed best, not the live total: a
            // save can land mid-batch, where the running sum is a transient
            // approximation.
            state.set_index(self.day, period.period(), period.best_sum() as i64);
        }
        state.set_iter_for_day(self.day, iteration);

        let out = RouteState::day_file(out_base, self.day);
        let lead = &self.periods[0];
        let tag = match state.save(&out) {
            Ok(()) => "1",
            Err(err) => {
                log::warn!("checkpoint write to {} failed: {err:#}", out.display());
                "!"
            }
        };
        println!(
            "{} {} {} {} {:.0} {:.0}",
            tag,
            iteration,
            self.day,
            lead.period(),
            lead.sum_rperf(),
            lead.best_ever()
        );
    }

    /// The per-period optimizers, in active-period order.
    pub fn periods(&self) -> &[PeriodOptimizer] {
        &self.periods
    }
}
