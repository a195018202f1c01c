//! Unprocessed, active, and simplification clause containers.

use crate::index::LiteralIndex;
use crate::logic::{LiteralId, SliceContext};
use indexmap::{IndexMap, IndexSet};
use std::collections::VecDeque;

/// FIFO of freshly derived clauses awaiting forward simplification
#[derive(Debug, Default)]
pub struct UnprocessedQueue {
    queue: VecDeque<usize>,
}

impl UnprocessedQueue {
    pub fn new() -> Self {
        UnprocessedQueue::default()
    }

    pub fn push(&mut self, id: usize) {
        self.queue.push_back(id);
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Activated clauses with the literal index over their selected literals
#[derive(Debug, Default)]
pub struct ActiveSet {
    /// Clause id -> its selected literals
    selected: IndexMap<usize, Vec<LiteralId>>,
    /// Index over the selected literals, for generating inferences
    pub index: LiteralIndex,
}

impl ActiveSet {
    pub fn new() -> Self {
        ActiveSet::default()
    }

    pub fn add(&mut self, ctx: &mut SliceContext, id: usize, selected: Vec<LiteralId>) {
        for &lit in &selected {
            self.index.insert(ctx, lit, id);
        }
        self.selected.insert(id, selected);
    }

    pub fn remove(&mut self, ctx: &mut SliceContext, id: usize) {
        if let Some(selected) = self.selected.shift_remove(&id) {
            for lit in selected {
                self.index.remove(ctx, lit, id);
            }
        }
    }

    pub fn contains(&self, id: usize) -> bool {
        self.selected.contains_key(&id)
    }

    pub fn selected_literals(&self, id: usize) -> Option<&[LiteralId]> {
        self.selected.get(&id).map(|v| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Passive and active clauses indexed for forward/backward simplification.
/// All literals are indexed, and positive unit equalities are tracked
/// separately as rewrite candidates.
#[derive(Debug, Default)]
pub struct SimplifyingSet {
    members: IndexSet<usize>,
    unit_equalities: IndexSet<usize>,
    pub index: LiteralIndex,
}

impl SimplifyingSet {
    pub fn new() -> Self {
        SimplifyingSet::default()
    }

    pub fn add(&mut self, ctx: &mut SliceContext, arena: &crate::logic::ClauseArena, id: usize) {
        let literals = arena.get(id).literals.clone();
        for &lit in &literals {
            self.index.insert(ctx, lit, id);
        }
        if literals.len() == 1 && ctx.literals.is_positive_equality(literals[0]) {
            self.unit_equalities.insert(id);
        }
        self.members.insert(id);
    }

    pub fn remove(&mut self, ctx: &mut SliceContext, arena: &crate::logic::ClauseArena, id: usize) {
        if self.members.shift_remove(&id) {
            let literals = arena.get(id).literals.clone();
            for lit in literals {
                self.index.remove(ctx, lit, id);
            }
            self.unit_equalities.shift_remove(&id);
        }
    }

    pub fn contains(&self, id: usize) -> bool {
        self.members.contains(&id)
    }

    pub fn members(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().copied()
    }

    pub fn unit_equalities(&self) -> impl Iterator<Item = usize> + '_ {
        self.unit_equalities.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }
}
