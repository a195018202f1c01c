//! The given-clause saturation loop with the limited resource strategy.
//!
//! The loop drains unprocessed clauses through forward/backward
//! simplification into the passive container, then activates one passive
//! clause per iteration and generates inferences with the active set.
//! Periodically it estimates how many more clauses can be activated in the
//! remaining time and tightens the passive limits to match; once limits
//! bind, completeness is lost and exhaustion no longer proves
//! satisfiability.

use super::containers::{ActiveSet, SimplifyingSet, UnprocessedQueue};
use super::inferences::{generate, NewClause};
use super::passive::PassiveContainer;
use super::simplify::{backward_simplify, forward_simplify, BackwardChange, ForwardResult};
use super::SaturationResult;
use crate::logic::{ClauseArena, InferenceKind, LiteralId, Proof, SliceContext, StoreTag};
use crate::options::Options;
use crate::ordering::{DemodulatorChecks, Kbo};
use crate::timer::SliceTimer;
use serde::Serialize;

/// Counters reported after a slice
#[derive(Debug, Clone, Default, Serialize)]
pub struct SaturationStats {
    pub initial_clauses: usize,
    pub generated: usize,
    pub activations: usize,
    pub forward_deleted: usize,
    pub backward_deleted: usize,
    pub evicted_by_limits: usize,
    pub limit_updates: usize,
}

/// The empty clause was derived; carries its id
#[derive(Debug)]
struct RefutationFound(usize);

/// State of one saturation run
pub struct LrsSaturation<'a> {
    ctx: &'a mut SliceContext,
    opts: &'a Options,
    timer: &'a SliceTimer,
    kbo: Kbo,
    demod: DemodulatorChecks,
    arena: ClauseArena,
    unprocessed: UnprocessedQueue,
    passive: PassiveContainer,
    active: ActiveSet,
    simpl: SimplifyingSet,
    /// Freshly derived clauses not yet moved to unprocessed
    new_clauses: Vec<usize>,
    /// Call counter driving the limit-update cadence
    limit_check_counter: u32,
    complete: bool,
    stats: SaturationStats,
}

impl<'a> LrsSaturation<'a> {
    pub fn new(
        ctx: &'a mut SliceContext,
        opts: &'a Options,
        timer: &'a SliceTimer,
        kbo: Kbo,
        input: Vec<Vec<LiteralId>>,
    ) -> Self {
        let mut arena = ClauseArena::new();
        let mut new_clauses = Vec::new();
        for literals in input {
            let weight = literals.iter().map(|&l| ctx.literals.weight(l)).sum();
            let id = arena.create(literals, 0, weight, Vec::new(), InferenceKind::Input);
            new_clauses.push(id);
        }
        let stats = SaturationStats {
            initial_clauses: new_clauses.len(),
            ..Default::default()
        };
        LrsSaturation {
            ctx,
            opts,
            timer,
            kbo,
            demod: DemodulatorChecks::new(),
            arena,
            unprocessed: UnprocessedQueue::new(),
            passive: PassiveContainer::new(opts.age_ratio, opts.weight_ratio),
            active: ActiveSet::new(),
            simpl: SimplifyingSet::new(),
            new_clauses,
            limit_check_counter: 0,
            complete: opts.complete,
            stats,
        }
    }

    /// Run the loop to a verdict.
    pub fn run(mut self) -> (SaturationResult, SaturationStats) {
        let result = match self.saturate() {
            Ok(result) => result,
            Err(RefutationFound(goal)) => {
                let proof = Proof::extract(
                    &self.arena,
                    &self.ctx.sig,
                    &self.ctx.terms,
                    &self.ctx.literals,
                    goal,
                );
                SaturationResult::Refutation(proof)
            }
        };
        log::info!(
            "saturation finished: {}, {} activations, {} clauses generated",
            result.name(),
            self.stats.activations,
            self.stats.generated
        );
        (result, self.stats)
    }

    fn saturate(&mut self) -> Result<SaturationResult, RefutationFound> {
        loop {
            self.new_clauses_to_unprocessed();

            while let Some(c) = self.unprocessed.pop() {
                if self.arena.get(c).is_empty() {
                    return Err(RefutationFound(c));
                }

                let mut in_passive = false;
                match forward_simplify(
                    self.ctx,
                    &self.arena,
                    &self.kbo,
                    &mut self.demod,
                    &self.simpl,
                    c,
                ) {
                    ForwardResult::Retained => {
                        let changes = backward_simplify(
                            self.ctx,
                            &self.arena,
                            &self.kbo,
                            &mut self.demod,
                            &self.simpl,
                            c,
                        );
                        self.apply_backward_changes(changes)?;
                        in_passive = self.add_to_passive(c);
                    }
                    ForwardResult::Deleted => {
                        self.stats.forward_deleted += 1;
                    }
                    ForwardResult::Replaced(nc) => {
                        self.stats.forward_deleted += 1;
                        self.create_clause(nc)?;
                    }
                }
                if in_passive {
                    debug_assert_eq!(self.arena.store(c), StoreTag::Passive);
                    self.simpl.add(self.ctx, &self.arena, c);
                } else {
                    self.arena.set_store(c, StoreTag::None);
                }

                self.new_clauses_to_unprocessed();

                if self.timer.time_limit_reached() {
                    return Ok(SaturationResult::TimeLimit);
                }
                if self.memory_limit_reached() {
                    return Ok(SaturationResult::MemoryLimit);
                }
                if self.should_update_limits() {
                    let estimated = self.estimated_reachable_count();
                    if estimated >= 0 {
                        let evicted = self.passive.update_limits(&self.arena, estimated as u64);
                        self.stats.limit_updates += 1;
                        self.stats.evicted_by_limits += evicted.len();
                        for id in evicted {
                            self.arena.set_store(id, StoreTag::None);
                            self.simpl.remove(self.ctx, &self.arena, id);
                        }
                        if self.complete && self.passive.limits().active() {
                            log::info!(
                                "resource limits active (age {}, weight {}), dropping completeness",
                                self.passive.limits().age_limit,
                                self.passive.limits().weight_limit
                            );
                            self.complete = false;
                        }
                    }
                }
            }

            self.on_all_processed();
            if !self.clauses_flushed() {
                continue;
            }

            if self.passive.is_empty() {
                return Ok(if self.complete {
                    SaturationResult::Satisfiable
                } else {
                    SaturationResult::RefutationNotFound
                });
            }

            match self.passive.pop_selected(&self.arena) {
                None => {
                    return Ok(if self.complete {
                        SaturationResult::Satisfiable
                    } else {
                        SaturationResult::RefutationNotFound
                    });
                }
                Some(c) => {
                    self.arena.set_store(c, StoreTag::Selected);
                    if !self.activate(c)? {
                        self.handle_unsuccessful_activation(c);
                    }
                }
            }

            if self.timer.time_limit_reached() {
                return Ok(SaturationResult::TimeLimit);
            }
        }
    }

    /// Move buffered clauses into the unprocessed queue.
    fn new_clauses_to_unprocessed(&mut self) {
        for id in std::mem::take(&mut self.new_clauses) {
            self.arena.set_store(id, StoreTag::Unprocessed);
            self.unprocessed.push(id);
        }
    }

    fn clauses_flushed(&self) -> bool {
        self.new_clauses.is_empty()
    }

    /// Hook run when the unprocessed queue empties. Nothing to do here, but
    /// the loop structure keeps the flush check it pairs with.
    fn on_all_processed(&mut self) {}

    /// Register a derived clause; the empty clause escapes as a refutation.
    fn create_clause(&mut self, nc: NewClause) -> Result<usize, RefutationFound> {
        let age = nc
            .parents
            .iter()
            .map(|&p| self.arena.get(p).age)
            .max()
            .map(|a| a + 1)
            .unwrap_or(0);
        let weight = nc
            .literals
            .iter()
            .map(|&l| self.ctx.literals.weight(l))
            .sum();
        let id = self
            .arena
            .create(nc.literals, age, weight, nc.parents, nc.inference);
        self.stats.generated += 1;
        if self.arena.get(id).is_empty() {
            return Err(RefutationFound(id));
        }
        self.new_clauses.push(id);
        Ok(id)
    }

    fn add_to_passive(&mut self, c: usize) -> bool {
        if self.passive.add(&self.arena, c) {
            self.arena.set_store(c, StoreTag::Passive);
            true
        } else {
            false
        }
    }

    fn apply_backward_changes(
        &mut self,
        changes: Vec<BackwardChange>,
    ) -> Result<(), RefutationFound> {
        for change in changes {
            match change {
                BackwardChange::Delete(d) => {
                    self.stats.backward_deleted += 1;
                    self.remove_everywhere(d);
                }
                BackwardChange::Replace(d, nc) => {
                    self.stats.backward_deleted += 1;
                    self.remove_everywhere(d);
                    self.create_clause(nc)?;
                }
            }
        }
        Ok(())
    }

    /// Detach a clause from whichever containers hold it.
    fn remove_everywhere(&mut self, id: usize) {
        match self.arena.store(id) {
            StoreTag::Active => {
                self.active.remove(self.ctx, id);
                self.simpl.remove(self.ctx, &self.arena, id);
            }
            StoreTag::Passive => {
                self.passive.remove(id);
                self.simpl.remove(self.ctx, &self.arena, id);
            }
            StoreTag::Unprocessed | StoreTag::Selected | StoreTag::None => {}
        }
        self.arena.set_store(id, StoreTag::None);
    }

    /// Move the given clause to active, select its literals, and generate.
    /// Returns false when the clause is no longer eligible.
    fn activate(&mut self, c: usize) -> Result<bool, RefutationFound> {
        if self.arena.store(c) != StoreTag::Selected {
            return Ok(false);
        }
        let literals = self.arena.get(c).literals.clone();
        let indices =
            self.kbo
                .selected_literal_indices(self.ctx, &literals, self.opts.literal_selection);
        let selected: Vec<LiteralId> = indices.into_iter().map(|i| literals[i]).collect();

        self.arena.set_store(c, StoreTag::Active);
        self.active.add(self.ctx, c, selected.clone());
        self.stats.activations += 1;
        log::trace!("activated clause {} ({} selected)", c, selected.len());

        let conclusions = generate(
            self.ctx,
            &self.arena,
            &self.kbo,
            &self.active,
            c,
            &selected,
        );
        for nc in conclusions {
            self.create_clause(nc)?;
        }
        Ok(true)
    }

    fn handle_unsuccessful_activation(&mut self, c: usize) {
        self.arena.set_store(c, StoreTag::None);
    }

    /// Limit-update cadence: every 500 checks, or every 50 once limits are
    /// active. The constants are empirical carryovers and intentionally
    /// conservative.
    fn should_update_limits(&mut self) -> bool {
        self.limit_check_counter += 1;
        if self.limit_check_counter == 500
            || (self.passive.limits().active() && self.limit_check_counter > 50)
        {
            self.limit_check_counter = 0;
            return true;
        }
        false
    }

    /// Estimate of the number of clauses that can still be activated in the
    /// remaining (possibly simulated) time. Negative means "no estimate".
    fn estimated_reachable_count(&self) -> i64 {
        let processed = self.stats.activations as i64;
        let elapsed = self.timer.elapsed_ms() as i64;
        // percent of the budget, in ms: percent x deciseconds = ms
        let first_check =
            self.opts.lrs_first_time_check as i64 * self.opts.time_limit_deciseconds as i64;
        if elapsed < first_check {
            return -1;
        }
        let time_left = self.timer.perceived_limit_ms() as i64 - elapsed;
        if time_left <= 0 || processed <= 10 {
            return -1;
        }
        processed * time_left / elapsed
    }

    fn memory_limit_reached(&self) -> bool {
        match self.opts.memory_limit_mb {
            Some(mb) => self.arena.memory_bytes() >= mb * 1024 * 1024,
            None => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn estimate_for_test(&self) -> i64 {
        self.estimated_reachable_count()
    }

    #[cfg(test)]
    pub(crate) fn force_activations(&mut self, n: usize) {
        self.stats.activations = n;
    }
}
