//! Clauses, clause storage, and proof extraction.
//!
//! A clause is a multiset of literal ids plus derivation metadata. All
//! clauses of a slice live in a `ClauseArena`; the arena index is the clause
//! id. After creation only the `store` tag mutates; literals, age, weight,
//! parents and inference kind are fixed.

use crate::logic::literal::{LiteralBank, LiteralDisplay, LiteralId};
use crate::logic::signature::Signature;
use crate::logic::term::TermBank;
use serde::Serialize;
use std::fmt;

/// Which container currently owns a clause
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum StoreTag {
    /// Not held by any container
    #[default]
    None,
    Unprocessed,
    Passive,
    /// Popped from passive, not yet activated
    Selected,
    Active,
}

/// How a clause came to exist
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum InferenceKind {
    Input,
    Resolution,
    Factoring,
    EqualityResolution,
    Superposition,
    Demodulation,
    DuplicateLiteralRemoval,
}

impl InferenceKind {
    pub fn name(&self) -> &'static str {
        match self {
            InferenceKind::Input => "input",
            InferenceKind::Resolution => "resolution",
            InferenceKind::Factoring => "factoring",
            InferenceKind::EqualityResolution => "equality resolution",
            InferenceKind::Superposition => "superposition",
            InferenceKind::Demodulation => "demodulation",
            InferenceKind::DuplicateLiteralRemoval => "duplicate literal removal",
        }
    }
}

/// A clause: literal multiset plus derivation metadata
#[derive(Debug, Clone)]
pub struct Clause {
    pub literals: Vec<LiteralId>,
    pub age: u32,
    pub weight: u32,
    pub parents: Vec<usize>,
    pub inference: InferenceKind,
    pub store: StoreTag,
}

impl Clause {
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

/// Slice-owned storage for all clauses; the index is the clause id
#[derive(Debug, Default)]
pub struct ClauseArena {
    clauses: Vec<Clause>,
}

impl ClauseArena {
    pub fn new() -> Self {
        ClauseArena::default()
    }

    /// Create a clause and return its id
    pub fn create(
        &mut self,
        literals: Vec<LiteralId>,
        age: u32,
        weight: u32,
        parents: Vec<usize>,
        inference: InferenceKind,
    ) -> usize {
        let id = self.clauses.len();
        self.clauses.push(Clause {
            literals,
            age,
            weight,
            parents,
            inference,
            store: StoreTag::None,
        });
        id
    }

    pub fn get(&self, id: usize) -> &Clause {
        &self.clauses[id]
    }

    pub fn get_mut(&mut self, id: usize) -> &mut Clause {
        &mut self.clauses[id]
    }

    pub fn set_store(&mut self, id: usize, store: StoreTag) {
        self.clauses[id].store = store;
    }

    pub fn store(&self, id: usize) -> StoreTag {
        self.clauses[id].store
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Rough memory footprint of clause storage in bytes
    pub fn memory_bytes(&self) -> usize {
        self.clauses.len() * std::mem::size_of::<Clause>()
            + self
                .clauses
                .iter()
                .map(|c| {
                    c.literals.capacity() * std::mem::size_of::<LiteralId>()
                        + c.parents.capacity() * std::mem::size_of::<usize>()
                })
                .sum::<usize>()
    }
}

/// One step of an extracted proof
#[derive(Debug, Clone, Serialize)]
pub struct ProofStep {
    pub id: usize,
    pub clause: String,
    pub inference: InferenceKind,
    pub parents: Vec<usize>,
}

/// A refutation: the derivation DAG of the empty clause, parents first
#[derive(Debug, Clone, Serialize)]
pub struct Proof {
    pub steps: Vec<ProofStep>,
}

impl Proof {
    /// Walk parent links from `goal` and produce a topologically ordered proof.
    pub fn extract(
        arena: &ClauseArena,
        sig: &Signature,
        terms: &TermBank,
        literals: &LiteralBank,
        goal: usize,
    ) -> Proof {
        let mut visited = vec![false; arena.len()];
        let mut order = Vec::new();
        let mut stack = vec![(goal, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if visited[id] {
                continue;
            }
            visited[id] = true;
            stack.push((id, true));
            for &p in arena.get(id).parents.iter().rev() {
                if !visited[p] {
                    stack.push((p, false));
                }
            }
        }

        let steps = order
            .into_iter()
            .map(|id| {
                let clause = arena.get(id);
                ProofStep {
                    id,
                    clause: clause_to_string(clause, sig, terms, literals),
                    inference: clause.inference,
                    parents: clause.parents.clone(),
                }
            })
            .collect();
        Proof { steps }
    }
}

impl fmt::Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "{}. {} [{}", step.id, step.clause, step.inference.name())?;
            for p in &step.parents {
                write!(f, " {}", p)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

/// Render a clause as a disjunction; the empty clause prints as `$false`.
pub fn clause_to_string(
    clause: &Clause,
    sig: &Signature,
    terms: &TermBank,
    literals: &LiteralBank,
) -> String {
    if clause.is_empty() {
        return "$false".to_string();
    }
    clause
        .literals
        .iter()
        .map(|&lit| {
            format!(
                "{}",
                LiteralDisplay {
                    bank: terms,
                    literals,
                    sig,
                    literal: lit
                }
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}
