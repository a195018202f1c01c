//! Scoped substitutions with trail-based backtracking.
//!
//! Variables from different clauses (or from the index's internal patterns)
//! are distinguished by a scope tag instead of being renamed apart up front.
//! Bindings are recorded on a trail so retrieval iterators can unwind to a
//! choice point in O(bindings undone).

use crate::logic::signature::Signature;
use crate::logic::term::{TermBank, TermId, TermView};
use std::collections::HashMap;

/// A variable tagged with its scope
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ScopedVar {
    pub scope: u8,
    pub var: u32,
}

/// A term paired with the scope its variables live in
pub type ScopedTerm = (TermId, u8);

/// Substitution over scoped variables.
///
/// `unify` and `match_term` record bindings on the trail but do not undo
/// them on failure; callers `mark()` before the attempt and `backtrack()` if
/// it fails.
#[derive(Debug, Clone, Default)]
pub struct Substitution {
    map: HashMap<ScopedVar, ScopedTerm>,
    trail: Vec<ScopedVar>,
}

impl Substitution {
    pub fn new() -> Self {
        Substitution::default()
    }

    #[inline]
    pub fn mark(&self) -> usize {
        self.trail.len()
    }

    #[inline]
    pub fn backtrack(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let v = self.trail.pop().unwrap();
            self.map.remove(&v);
        }
    }

    #[inline]
    pub fn bind(&mut self, v: ScopedVar, term: TermId, scope: u8) {
        debug_assert!(!self.map.contains_key(&v), "variable bound twice");
        self.trail.push(v);
        self.map.insert(v, (term, scope));
    }

    #[inline]
    pub fn lookup(&self, v: ScopedVar) -> Option<ScopedTerm> {
        self.map.get(&v).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Chase top-level variable bindings until a non-variable or an unbound
    /// variable is reached.
    pub fn resolve(&self, bank: &TermBank, t: TermId, scope: u8) -> ScopedTerm {
        let mut current = (t, scope);
        loop {
            match bank.view(current.0) {
                TermView::Var(v) => {
                    let sv = ScopedVar {
                        scope: current.1,
                        var: v,
                    };
                    match self.lookup(sv) {
                        Some(next) => current = next,
                        None => return current,
                    }
                }
                _ => return current,
            }
        }
    }

    /// Does `v` occur in `t` under the current bindings?
    pub fn occurs(&self, bank: &TermBank, v: ScopedVar, t: TermId, scope: u8) -> bool {
        let (t, scope) = self.resolve(bank, t, scope);
        match bank.view(t) {
            TermView::Var(w) => ScopedVar { scope, var: w } == v,
            TermView::App(_, args) => args.iter().any(|&a| self.occurs(bank, v, a, scope)),
        }
    }

    /// Robinson unification over scoped terms, recording bindings on the trail.
    pub fn unify(&mut self, bank: &TermBank, t1: TermId, s1: u8, t2: TermId, s2: u8) -> bool {
        let (t1, s1) = self.resolve(bank, t1, s1);
        let (t2, s2) = self.resolve(bank, t2, s2);
        if t1 == t2 && s1 == s2 {
            return true;
        }
        match (bank.view(t1), bank.view(t2)) {
            (TermView::Var(v), _) => {
                let sv = ScopedVar { scope: s1, var: v };
                if self.occurs(bank, sv, t2, s2) {
                    return false;
                }
                self.bind(sv, t2, s2);
                true
            }
            (_, TermView::Var(v)) => {
                let sv = ScopedVar { scope: s2, var: v };
                if self.occurs(bank, sv, t1, s1) {
                    return false;
                }
                self.bind(sv, t1, s1);
                true
            }
            (TermView::App(f, args1), TermView::App(g, args2)) => {
                if f != g {
                    return false;
                }
                let pairs: Vec<(TermId, TermId)> =
                    args1.iter().copied().zip(args2.iter().copied()).collect();
                pairs.iter().all(|&(a1, a2)| self.unify(bank, a1, s1, a2, s2))
            }
        }
    }

    /// One-sided matching: only variables of the pattern scope may bind;
    /// the target is rigid.
    pub fn match_term(
        &mut self,
        bank: &TermBank,
        pattern: TermId,
        pscope: u8,
        target: TermId,
        tscope: u8,
    ) -> bool {
        match bank.view(pattern) {
            TermView::Var(v) => {
                let sv = ScopedVar {
                    scope: pscope,
                    var: v,
                };
                match self.lookup(sv) {
                    Some((bound, bscope)) => bound == target && bscope == tscope,
                    None => {
                        self.bind(sv, target, tscope);
                        true
                    }
                }
            }
            TermView::App(f, pargs) => match bank.view(target) {
                TermView::App(g, targs) if f == g => {
                    let pairs: Vec<(TermId, TermId)> =
                        pargs.iter().copied().zip(targs.iter().copied()).collect();
                    pairs
                        .iter()
                        .all(|&(p, t)| self.match_term(bank, p, pscope, t, tscope))
                }
                _ => false,
            },
        }
    }

    /// Build the instance of `t` under this substitution, renaming variables
    /// that remain unbound through `renamer` (for inference conclusions).
    pub fn apply(
        &self,
        bank: &mut TermBank,
        sig: &Signature,
        t: TermId,
        scope: u8,
        renamer: &mut VarRenamer,
    ) -> TermId {
        let (t, scope) = self.resolve(bank, t, scope);
        enum Level {
            Var(u32),
            App(crate::logic::signature::FunctionId, Vec<TermId>),
        }
        let level = match bank.view(t) {
            TermView::Var(v) => Level::Var(v),
            TermView::App(f, args) => Level::App(f, args.to_vec()),
        };
        match level {
            Level::Var(v) => {
                let fresh = renamer.rename(ScopedVar { scope, var: v });
                bank.mk_var(fresh)
            }
            Level::App(f, args) => {
                let new_args = args
                    .into_iter()
                    .map(|a| self.apply(bank, sig, a, scope, renamer))
                    .collect();
                bank.mk_app(sig, f, new_args)
            }
        }
    }

    /// Build the instance of `t`, keeping unbound variables as themselves
    /// (for rewriting inside an existing clause context).
    pub fn instantiate(&self, bank: &mut TermBank, sig: &Signature, t: TermId, scope: u8) -> TermId {
        let (t, scope) = self.resolve(bank, t, scope);
        enum Level {
            Var(u32),
            App(crate::logic::signature::FunctionId, Vec<TermId>),
        }
        let level = match bank.view(t) {
            TermView::Var(v) => Level::Var(v),
            TermView::App(f, args) => Level::App(f, args.to_vec()),
        };
        match level {
            Level::Var(v) => bank.mk_var(v),
            Level::App(f, args) => {
                let new_args = args
                    .into_iter()
                    .map(|a| self.instantiate(bank, sig, a, scope))
                    .collect();
                bank.mk_app(sig, f, new_args)
            }
        }
    }
}

/// Consistent fresh renaming for variables surviving a substitution
#[derive(Debug, Default)]
pub struct VarRenamer {
    next: u32,
    map: HashMap<ScopedVar, u32>,
}

impl VarRenamer {
    pub fn new() -> Self {
        VarRenamer::default()
    }

    pub fn rename(&mut self, v: ScopedVar) -> u32 {
        if let Some(&r) = self.map.get(&v) {
            return r;
        }
        let r = self.next;
        self.next += 1;
        self.map.insert(v, r);
        r
    }
}
