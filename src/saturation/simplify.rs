//! Forward and backward simplification.
//!
//! Forward: the new clause is simplified against the simplification set
//! (duplicate literals, tautology deletion, subsumption via generalization
//! retrieval, demodulation with compiled ordering checks). Backward: the
//! new clause simplifies the set (subsumption via instance retrieval,
//! demodulation when the new clause is a unit equality).

use super::containers::SimplifyingSet;
use super::inferences::NewClause;
use crate::logic::substitution::Substitution;
use crate::logic::{ClauseArena, InferenceKind, LiteralId, SliceContext};
use crate::ordering::{DemodulatorChecks, EqSide, Kbo};
use std::collections::HashSet;

/// Outcome of forward simplification
#[derive(Debug)]
pub enum ForwardResult {
    /// The clause survives unchanged
    Retained,
    /// The clause is redundant and disappears
    Deleted,
    /// The clause is replaced by a simpler one
    Replaced(NewClause),
}

/// What backward simplification does to an older clause
#[derive(Debug)]
pub enum BackwardChange {
    Delete(usize),
    Replace(usize, NewClause),
}

pub fn forward_simplify(
    ctx: &mut SliceContext,
    arena: &ClauseArena,
    kbo: &Kbo,
    demod: &mut DemodulatorChecks,
    simpl: &SimplifyingSet,
    id: usize,
) -> ForwardResult {
    let literals = arena.get(id).literals.clone();

    // Duplicate literal removal: multiset members share literal ids
    let mut seen = HashSet::new();
    let deduped: Vec<LiteralId> = literals
        .iter()
        .copied()
        .filter(|&l| seen.insert(l))
        .collect();
    if deduped.len() < literals.len() {
        return ForwardResult::Replaced(NewClause {
            literals: deduped,
            inference: InferenceKind::DuplicateLiteralRemoval,
            parents: vec![id],
        });
    }

    if is_tautology(ctx, &literals) {
        return ForwardResult::Deleted;
    }

    if forward_subsumed(ctx, arena, simpl, id, &literals) {
        return ForwardResult::Deleted;
    }

    if let Some(replacement) = forward_demodulate(ctx, arena, kbo, demod, simpl, id, &literals) {
        return ForwardResult::Replaced(replacement);
    }

    ForwardResult::Retained
}

pub fn backward_simplify(
    ctx: &mut SliceContext,
    arena: &ClauseArena,
    kbo: &Kbo,
    demod: &mut DemodulatorChecks,
    simpl: &SimplifyingSet,
    id: usize,
) -> Vec<BackwardChange> {
    let mut changes = Vec::new();
    let literals = arena.get(id).literals.clone();

    // Backward subsumption: older clauses with an instance of one of our
    // literals are candidates
    let mut candidates: Vec<usize> = Vec::new();
    let mut seen = HashSet::new();
    for &lit in &literals {
        let found: Vec<usize> = simpl
            .index
            .get_instances(ctx, lit, false, false)
            .map(|r| r.clause)
            .collect();
        for d in found {
            if d != id && seen.insert(d) {
                candidates.push(d);
            }
        }
    }
    for d in candidates {
        let d_lits = arena.get(d).literals.clone();
        if literals.len() <= d_lits.len() && subsumes(ctx, &literals, &d_lits) {
            changes.push(BackwardChange::Delete(d));
        }
    }

    // Backward demodulation: a new unit equality rewrites older clauses
    if literals.len() == 1 && ctx.literals.is_positive_equality(literals[0]) {
        let deleted: HashSet<usize> = changes
            .iter()
            .map(|c| match c {
                BackwardChange::Delete(d) | BackwardChange::Replace(d, _) => *d,
            })
            .collect();
        let members: Vec<usize> = simpl.members().filter(|&d| d != id).collect();
        for d in members {
            if deleted.contains(&d) {
                continue;
            }
            let d_lits = arena.get(d).literals.clone();
            if let Some((lits, eq_clause)) =
                demodulate_once(ctx, kbo, demod, &d_lits, &[id], arena)
            {
                changes.push(BackwardChange::Replace(
                    d,
                    NewClause {
                        literals: lits,
                        inference: InferenceKind::Demodulation,
                        parents: vec![d, eq_clause],
                    },
                ));
            }
        }
    }

    changes
}

/// Complementary literal pair or reflexive positive equality
fn is_tautology(ctx: &SliceContext, literals: &[LiteralId]) -> bool {
    for (i, &l1) in literals.iter().enumerate() {
        if ctx.literals.is_positive_equality(l1) {
            let args = ctx.literals.args(l1);
            if args[0] == args[1] {
                return true;
            }
        }
        for &l2 in &literals[i + 1..] {
            if ctx.literals.predicate(l1) == ctx.literals.predicate(l2)
                && ctx.literals.polarity(l1) != ctx.literals.polarity(l2)
                && ctx.literals.args(l1) == ctx.literals.args(l2)
            {
                return true;
            }
        }
    }
    false
}

fn forward_subsumed(
    ctx: &mut SliceContext,
    arena: &ClauseArena,
    simpl: &SimplifyingSet,
    id: usize,
    literals: &[LiteralId],
) -> bool {
    let mut candidates: Vec<usize> = Vec::new();
    let mut seen = HashSet::new();
    for &lit in literals {
        let found: Vec<usize> = simpl
            .index
            .get_generalizations(ctx, lit, false, false)
            .map(|r| r.clause)
            .collect();
        for d in found {
            if d != id && seen.insert(d) {
                candidates.push(d);
            }
        }
    }
    for d in candidates {
        let d_lits = arena.get(d).literals.clone();
        if d_lits.len() <= literals.len() && subsumes(ctx, &d_lits, literals) {
            return true;
        }
    }
    false
}

/// Does `general` subsume `specific`: one substitution maps the general
/// literal multiset injectively into the specific one?
pub fn subsumes(ctx: &SliceContext, general: &[LiteralId], specific: &[LiteralId]) -> bool {
    let mut subst = Substitution::new();
    let mut used = vec![false; specific.len()];
    try_match(ctx, &mut subst, general, specific, &mut used, 0)
}

fn try_match(
    ctx: &SliceContext,
    subst: &mut Substitution,
    general: &[LiteralId],
    specific: &[LiteralId],
    used: &mut Vec<bool>,
    k: usize,
) -> bool {
    if k == general.len() {
        return true;
    }
    let gl = general[k];
    for i in 0..specific.len() {
        if used[i] {
            continue;
        }
        let sl = specific[i];
        if ctx.literals.predicate(gl) != ctx.literals.predicate(sl)
            || ctx.literals.polarity(gl) != ctx.literals.polarity(sl)
        {
            continue;
        }
        let mark = subst.mark();
        let matched = ctx
            .literals
            .args(gl)
            .iter()
            .zip(ctx.literals.args(sl).iter())
            .all(|(&g, &s)| subst.match_term(&ctx.terms, g, 0, s, 1));
        if matched {
            used[i] = true;
            if try_match(ctx, subst, general, specific, used, k + 1) {
                return true;
            }
            used[i] = false;
        }
        subst.backtrack(mark);
    }
    false
}

fn forward_demodulate(
    ctx: &mut SliceContext,
    arena: &ClauseArena,
    kbo: &Kbo,
    demod: &mut DemodulatorChecks,
    simpl: &SimplifyingSet,
    id: usize,
    literals: &[LiteralId],
) -> Option<NewClause> {
    let rewriters: Vec<usize> = simpl.unit_equalities().filter(|&e| e != id).collect();
    let (lits, eq_clause) = demodulate_once(ctx, kbo, demod, literals, &rewriters, arena)?;
    Some(NewClause {
        literals: lits,
        inference: InferenceKind::Demodulation,
        parents: vec![id, eq_clause],
    })
}

/// Try one demodulation step on `literals` with any of the unit equalities.
/// Returns the rewritten literal list and the equation clause used.
fn demodulate_once(
    ctx: &mut SliceContext,
    kbo: &Kbo,
    demod: &mut DemodulatorChecks,
    literals: &[LiteralId],
    rewriters: &[usize],
    arena: &ClauseArena,
) -> Option<(Vec<LiteralId>, usize)> {
    for &e in rewriters {
        let e_lits = &arena.get(e).literals;
        if e_lits.len() != 1 || !ctx.literals.is_positive_equality(e_lits[0]) {
            continue;
        }
        let eq_lit = e_lits[0];
        let eq_args = ctx.literals.args(eq_lit).to_vec();

        for side in [EqSide::LeftToRight, EqSide::RightToLeft] {
            let (lhs, rhs) = match side {
                EqSide::LeftToRight => (eq_args[0], eq_args[1]),
                EqSide::RightToLeft => (eq_args[1], eq_args[0]),
            };
            if ctx.terms.is_var(lhs) {
                continue;
            }

            for (li, &lit) in literals.iter().enumerate() {
                let args = ctx.literals.args(lit).to_vec();
                for (ai, &arg) in args.iter().enumerate() {
                    for u in ctx.terms.subterms(arg) {
                        if ctx.terms.is_var(u) {
                            continue;
                        }
                        let mut subst = Substitution::new();
                        if !subst.match_term(&ctx.terms, lhs, 0, u, 1) {
                            continue;
                        }
                        if !demod.is_greater_under(kbo, ctx, eq_lit, side, &subst, 0) {
                            continue;
                        }
                        let r_inst = subst.instantiate(&mut ctx.terms, &ctx.sig, rhs, 0);
                        let new_arg = ctx.terms.replace(&ctx.sig, arg, u, r_inst);
                        let mut new_args = args.clone();
                        new_args[ai] = new_arg;
                        let pred = ctx.literals.predicate(lit);
                        let pol = ctx.literals.polarity(lit);
                        let new_lit = ctx
                            .literals
                            .mk_literal(&ctx.sig, &ctx.terms, pred, pol, new_args);
                        let mut new_lits = literals.to_vec();
                        new_lits[li] = new_lit;
                        return Some((new_lits, e));
                    }
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::kbo::{KboWeightMap, Precedence};
    use crate::saturation::containers::SimplifyingSet;

    struct Setup {
        ctx: SliceContext,
        arena: ClauseArena,
        simpl: SimplifyingSet,
        demod: DemodulatorChecks,
    }

    impl Setup {
        fn new() -> Self {
            Setup {
                ctx: SliceContext::new(),
                arena: ClauseArena::new(),
                simpl: SimplifyingSet::new(),
                demod: DemodulatorChecks::new(),
            }
        }

        fn kbo(&self) -> Kbo {
            Kbo::new(
                KboWeightMap::uniform(self.ctx.sig.function_count()),
                Precedence::default_for(&self.ctx.sig),
            )
        }

        fn clause(&mut self, literals: Vec<LiteralId>) -> usize {
            let weight = literals.iter().map(|&l| self.ctx.literals.weight(l)).sum();
            self.arena
                .create(literals, 0, weight, vec![], InferenceKind::Input)
        }

        fn add_to_simpl(&mut self, id: usize) {
            self.simpl.add(&mut self.ctx, &self.arena, id);
        }
    }

    #[test]
    fn test_tautology_deleted() {
        let mut s = Setup::new();
        let p = s.ctx.sig.intern_predicate("p", 1);
        let a = s.ctx.sig.intern_function("a", 0);
        let ta = s.ctx.terms.mk_const(&s.ctx.sig, a);
        let pa = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, p, true, vec![ta]);
        let npa = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, p, false, vec![ta]);

        let kbo = s.kbo();
        let c = s.clause(vec![pa, npa]);
        let result = forward_simplify(&mut s.ctx, &s.arena, &kbo, &mut s.demod, &s.simpl, c);
        assert!(matches!(result, ForwardResult::Deleted));

        // Reflexive equality is a tautology too
        let refl = s
            .ctx
            .literals
            .mk_equality(&s.ctx.sig, &s.ctx.terms, true, ta, ta);
        let c2 = s.clause(vec![refl]);
        let result = forward_simplify(&mut s.ctx, &s.arena, &kbo, &mut s.demod, &s.simpl, c2);
        assert!(matches!(result, ForwardResult::Deleted));
    }

    #[test]
    fn test_duplicate_literals_removed() {
        let mut s = Setup::new();
        let p = s.ctx.sig.intern_predicate("p", 1);
        let x = s.ctx.terms.mk_var(0);
        let px = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, p, true, vec![x]);

        let kbo = s.kbo();
        let c = s.clause(vec![px, px]);
        let result = forward_simplify(&mut s.ctx, &s.arena, &kbo, &mut s.demod, &s.simpl, c);
        match result {
            ForwardResult::Replaced(nc) => {
                assert_eq!(nc.literals, vec![px]);
                assert_eq!(nc.inference, InferenceKind::DuplicateLiteralRemoval);
            }
            other => panic!("expected replacement, got {:?}", other),
        }
    }

    #[test]
    fn test_forward_subsumption() {
        let mut s = Setup::new();
        let p = s.ctx.sig.intern_predicate("p", 1);
        let q = s.ctx.sig.intern_predicate("q", 1);
        let a = s.ctx.sig.intern_function("a", 0);
        let ta = s.ctx.terms.mk_const(&s.ctx.sig, a);
        let x = s.ctx.terms.mk_var(0);

        let px = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, p, true, vec![x]);
        let pa = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, p, true, vec![ta]);
        let qa = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, q, true, vec![ta]);

        let kbo = s.kbo();
        // p(X) is stored; p(a) | q(a) is subsumed by it
        let general = s.clause(vec![px]);
        s.add_to_simpl(general);

        let c = s.clause(vec![pa, qa]);
        let result = forward_simplify(&mut s.ctx, &s.arena, &kbo, &mut s.demod, &s.simpl, c);
        assert!(matches!(result, ForwardResult::Deleted));
    }

    #[test]
    fn test_subsumption_respects_nonlinearity() {
        let mut s = Setup::new();
        let p = s.ctx.sig.intern_predicate("p", 2);
        let a = s.ctx.sig.intern_function("a", 0);
        let b = s.ctx.sig.intern_function("b", 0);
        let ta = s.ctx.terms.mk_const(&s.ctx.sig, a);
        let tb = s.ctx.terms.mk_const(&s.ctx.sig, b);
        let x = s.ctx.terms.mk_var(0);

        let pxx = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, p, true, vec![x, x]);
        let pab = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, p, true, vec![ta, tb]);

        let kbo = s.kbo();
        let general = s.clause(vec![pxx]);
        s.add_to_simpl(general);

        // p(a,b) is not an instance of p(X,X)
        let c = s.clause(vec![pab]);
        let result = forward_simplify(&mut s.ctx, &s.arena, &kbo, &mut s.demod, &s.simpl, c);
        assert!(matches!(result, ForwardResult::Retained));
    }

    #[test]
    fn test_forward_demodulation() {
        let mut s = Setup::new();
        let p = s.ctx.sig.intern_predicate("p", 1);
        let f = s.ctx.sig.intern_function("f", 1);
        let a = s.ctx.sig.intern_function("a", 0);
        let b = s.ctx.sig.intern_function("b", 0);
        let ta = s.ctx.terms.mk_const(&s.ctx.sig, a);
        let tb = s.ctx.terms.mk_const(&s.ctx.sig, b);
        let x = s.ctx.terms.mk_var(0);
        let fx = s.ctx.terms.mk_app(&s.ctx.sig, f, vec![x]);
        let fa = s.ctx.terms.mk_app(&s.ctx.sig, f, vec![ta]);

        // Rewrite rule: f(X) = b
        let eq = s
            .ctx
            .literals
            .mk_equality(&s.ctx.sig, &s.ctx.terms, true, fx, tb);
        let rule = s.clause(vec![eq]);
        s.add_to_simpl(rule);

        // p(f(a)) demodulates to p(b)
        let pfa = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, p, true, vec![fa]);
        let kbo = s.kbo();
        let c = s.clause(vec![pfa]);
        let result = forward_simplify(&mut s.ctx, &s.arena, &kbo, &mut s.demod, &s.simpl, c);
        match result {
            ForwardResult::Replaced(nc) => {
                assert_eq!(nc.inference, InferenceKind::Demodulation);
                let pb = s
                    .ctx
                    .literals
                    .mk_literal(&s.ctx.sig, &s.ctx.terms, p, true, vec![tb]);
                assert_eq!(nc.literals, vec![pb]);
                assert_eq!(nc.parents, vec![c, rule]);
            }
            other => panic!("expected demodulation, got {:?}", other),
        }
    }

    #[test]
    fn test_backward_subsumption_and_demodulation() {
        let mut s = Setup::new();
        let p = s.ctx.sig.intern_predicate("p", 1);
        let q = s.ctx.sig.intern_predicate("q", 1);
        let a = s.ctx.sig.intern_function("a", 0);
        let f = s.ctx.sig.intern_function("f", 1);
        let b = s.ctx.sig.intern_function("b", 0);
        let ta = s.ctx.terms.mk_const(&s.ctx.sig, a);
        let tb = s.ctx.terms.mk_const(&s.ctx.sig, b);
        let fa = s.ctx.terms.mk_app(&s.ctx.sig, f, vec![ta]);
        let x = s.ctx.terms.mk_var(0);

        let pa = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, p, true, vec![ta]);
        let qfa = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, q, true, vec![fa]);

        let kbo = s.kbo();
        // Older clauses: p(a) | q(f(a)) and q(f(a))
        let old1 = s.clause(vec![pa, qfa]);
        s.add_to_simpl(old1);
        let old2 = s.clause(vec![qfa]);
        s.add_to_simpl(old2);

        // New clause p(X) subsumes old1 backward
        let px = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, p, true, vec![x]);
        let c = s.clause(vec![px]);
        let changes = backward_simplify(&mut s.ctx, &s.arena, &kbo, &mut s.demod, &s.simpl, c);
        assert!(changes
            .iter()
            .any(|ch| matches!(ch, BackwardChange::Delete(d) if *d == old1)));

        // New unit equality f(a) = b rewrites old2 backward
        let eq = s
            .ctx
            .literals
            .mk_equality(&s.ctx.sig, &s.ctx.terms, true, fa, tb);
        let e = s.clause(vec![eq]);
        let changes = backward_simplify(&mut s.ctx, &s.arena, &kbo, &mut s.demod, &s.simpl, e);
        let qb = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, q, true, vec![tb]);
        assert!(changes.iter().any(|ch| matches!(
            ch,
            BackwardChange::Replace(d, nc) if *d == old2 && nc.literals == vec![qb]
        )));
    }
}
