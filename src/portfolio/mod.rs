//! Portfolio scheduling: time-sliced strategies under a global budget.
//!
//! The scheduler picks quick and fallback schedules from the problem's
//! property, runs each slice with `min(slice budget, remaining budget)`,
//! remembers strategy codes that already failed, and stops at the first
//! conclusive verdict. Every slice runs in a fresh context, so no interned
//! state crosses slice boundaries.

pub mod property;
pub mod schedules;

pub use property::{ProblemCategory, Property};

use crate::error::{ProverError, Result};
use crate::logic::SliceContext;
use crate::options::Options;
use crate::problem::ProblemCnf;
use crate::saturation::{saturate, SaturationResult};
use crate::timer::{CancellationToken, SliceTimer, MS_PER_DECISECOND};
use indexmap::IndexSet;
use std::time::Instant;

/// Split a slice string `<code>_<tdeci>` into the code and its budget.
pub fn get_slice_time(slice: &str) -> Result<(String, u32)> {
    let (code, time) = slice
        .rsplit_once('_')
        .ok_or_else(|| ProverError::User(format!("slice `{}` has no time suffix", slice)))?;
    let deciseconds: u32 = time
        .parse()
        .map_err(|_| ProverError::User(format!("slice `{}` has a bad time suffix", slice)))?;
    Ok((code.to_string(), deciseconds))
}

/// Runs schedules against one problem under a global wall clock
pub struct Portfolio<'a> {
    problem: &'a ProblemCnf,
    base: Options,
    total_budget_deciseconds: u32,
    cancel: CancellationToken,
    start: Instant,
    /// Strategy codes already tried and failed
    remember: IndexSet<String>,
}

impl<'a> Portfolio<'a> {
    pub fn new(
        problem: &'a ProblemCnf,
        base: Options,
        total_budget_deciseconds: u32,
        cancel: CancellationToken,
    ) -> Self {
        Portfolio {
            problem,
            base,
            total_budget_deciseconds,
            cancel,
            start: Instant::now(),
            remember: IndexSet::new(),
        }
    }

    /// Quick schedule, then fallback, then give up.
    pub fn run(&mut self) -> Result<SaturationResult> {
        let property = Property::of(self.problem);
        let category = property.category();
        log::info!(
            "portfolio: {} clauses, category {:?}, budget {} ds",
            property.clause_count,
            category,
            self.total_budget_deciseconds
        );

        if let Some(result) = self.run_schedule(schedules::quick_schedule(category))? {
            return Ok(result);
        }
        if let Some(result) = self.run_schedule(schedules::fallback_schedule(category))? {
            return Ok(result);
        }
        Ok(SaturationResult::RefutationNotFound)
    }

    fn remaining_deciseconds(&self) -> u32 {
        let elapsed_ds = (self.start.elapsed().as_millis() as u64 / MS_PER_DECISECOND) as u32;
        self.total_budget_deciseconds.saturating_sub(elapsed_ds)
    }

    /// Run one schedule; `Ok(None)` means it failed and the caller may try
    /// the next one.
    fn run_schedule(&mut self, slices: &[&str]) -> Result<Option<SaturationResult>> {
        for &slice in slices {
            let (code, slice_time) = get_slice_time(slice)?;
            if self.remember.contains(&code) {
                continue;
            }
            let remaining = self.remaining_deciseconds();
            if remaining == 0 {
                return Ok(None);
            }
            let budget = slice_time.min(remaining);
            let result = self.run_slice(&code, budget)?;
            if self.cancel.is_cancelled() {
                return Err(ProverError::Interrupted);
            }
            if result.is_conclusive() {
                return Ok(Some(result));
            }
            self.remember.insert(code);
        }
        Ok(None)
    }

    fn run_slice(&mut self, code: &str, budget_deciseconds: u32) -> Result<SaturationResult> {
        let patch = schedules::decode_strategy(code)
            .ok_or_else(|| ProverError::User(format!("unknown strategy code `{}`", code)))?;
        let mut opts = self.base.patched(&patch);
        opts.time_limit_deciseconds = budget_deciseconds;

        log::info!("slice {} for {} ds", code, budget_deciseconds);
        let mut ctx = SliceContext::new();
        let clauses = self.problem.load(&mut ctx);
        let timer = SliceTimer::new(budget_deciseconds, self.cancel.clone())
            .with_simulated(opts.simulated_time_limit);
        let (result, stats) = saturate(&mut ctx, clauses, &opts, &timer)?;
        log::info!(
            "slice {}: {} ({} activations)",
            code,
            result.name(),
            stats.activations
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_slice_time() {
        let (code, time) = get_slice_time("aw11_300").unwrap();
        assert_eq!(code, "aw11");
        assert_eq!(time, 300);

        // Only the trailing component is the budget
        let (code, time) = get_slice_time("lrs_2_600").unwrap();
        assert_eq!(code, "lrs_2");
        assert_eq!(time, 600);

        assert!(get_slice_time("nobudget").is_err());
        assert!(get_slice_time("bad_x").is_err());
    }
}
