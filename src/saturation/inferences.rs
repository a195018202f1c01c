//! Generating inferences for the given clause.
//!
//! Binary resolution retrieves partners through the active set's literal
//! index; factoring and equality resolution work within the given clause;
//! superposition rewrites with oriented unit equalities, both from the
//! given equality into active clauses and from active equalities into the
//! given clause.

use crate::index::RetrievalSubst;
use crate::logic::substitution::{Substitution, VarRenamer};
use crate::logic::{ClauseArena, InferenceKind, LiteralId, SliceContext, TermId};
use crate::ordering::Kbo;
use crate::saturation::containers::ActiveSet;
use std::collections::HashSet;

/// A derived clause before it enters the arena
#[derive(Debug, Clone)]
pub struct NewClause {
    pub literals: Vec<LiteralId>,
    pub inference: InferenceKind,
    pub parents: Vec<usize>,
}

/// All inferences between the given clause and the active set.
pub fn generate(
    ctx: &mut SliceContext,
    arena: &ClauseArena,
    kbo: &Kbo,
    active: &ActiveSet,
    given: usize,
    given_selected: &[LiteralId],
) -> Vec<NewClause> {
    let mut out = Vec::new();
    resolution(ctx, arena, active, given, given_selected, &mut out);
    factoring(ctx, arena, given, given_selected, &mut out);
    equality_resolution(ctx, arena, given, given_selected, &mut out);
    superposition(ctx, arena, kbo, active, given, given_selected, &mut out);
    dedup(out)
}

fn resolution(
    ctx: &mut SliceContext,
    arena: &ClauseArena,
    active: &ActiveSet,
    given: usize,
    given_selected: &[LiteralId],
    out: &mut Vec<NewClause>,
) {
    for &lit in given_selected {
        let results: Vec<_> = active.index.get_unifications(ctx, lit, true, true).collect();
        for r in results {
            let Some(rsubst) = r.subst else { continue };
            let mut renamer = VarRenamer::new();
            let mut literals = Vec::new();

            let mut removed = false;
            for &l in &arena.get(given).literals {
                if !removed && l == lit {
                    removed = true;
                    continue;
                }
                literals.push(apply_query_literal(ctx, &rsubst, l, &mut renamer));
            }
            let mut removed = false;
            for &l in &arena.get(r.clause).literals {
                if !removed && l == r.literal {
                    removed = true;
                    continue;
                }
                literals.push(apply_stored_literal(ctx, &rsubst, l, &mut renamer));
            }

            out.push(NewClause {
                literals,
                inference: InferenceKind::Resolution,
                parents: vec![given, r.clause],
            });
        }
    }
}

fn factoring(
    ctx: &mut SliceContext,
    arena: &ClauseArena,
    given: usize,
    given_selected: &[LiteralId],
    out: &mut Vec<NewClause>,
) {
    let lits = arena.get(given).literals.clone();
    for (i, &li) in lits.iter().enumerate() {
        if !given_selected.contains(&li) {
            continue;
        }
        for (j, &lj) in lits.iter().enumerate() {
            if j == i || li == lj {
                continue;
            }
            if ctx.literals.predicate(li) != ctx.literals.predicate(lj)
                || ctx.literals.polarity(li) != ctx.literals.polarity(lj)
            {
                continue;
            }
            let args_i = ctx.literals.args(li).to_vec();
            let args_j = ctx.literals.args(lj).to_vec();
            let mut subst = Substitution::new();
            let unified = args_i
                .iter()
                .zip(args_j.iter())
                .all(|(&a, &b)| subst.unify(&ctx.terms, a, 0, b, 0));
            if !unified {
                continue;
            }
            let mut renamer = VarRenamer::new();
            let mut literals = Vec::new();
            for (k, &lk) in lits.iter().enumerate() {
                if k == j {
                    continue;
                }
                literals.push(apply_plain_literal(ctx, &subst, lk, 0, &mut renamer));
            }
            out.push(NewClause {
                literals,
                inference: InferenceKind::Factoring,
                parents: vec![given],
            });
        }
    }
}

fn equality_resolution(
    ctx: &mut SliceContext,
    arena: &ClauseArena,
    given: usize,
    given_selected: &[LiteralId],
    out: &mut Vec<NewClause>,
) {
    let lits = arena.get(given).literals.clone();
    for (i, &li) in lits.iter().enumerate() {
        if !given_selected.contains(&li) {
            continue;
        }
        if !ctx.literals.is_equality(li) || ctx.literals.polarity(li) {
            continue;
        }
        let args = ctx.literals.args(li).to_vec();
        let mut subst = Substitution::new();
        if !subst.unify(&ctx.terms, args[0], 0, args[1], 0) {
            continue;
        }
        let mut renamer = VarRenamer::new();
        let mut literals = Vec::new();
        for (k, &lk) in lits.iter().enumerate() {
            if k == i {
                continue;
            }
            literals.push(apply_plain_literal(ctx, &subst, lk, 0, &mut renamer));
        }
        out.push(NewClause {
            literals,
            inference: InferenceKind::EqualityResolution,
            parents: vec![given],
        });
    }
}

fn superposition(
    ctx: &mut SliceContext,
    arena: &ClauseArena,
    kbo: &Kbo,
    active: &ActiveSet,
    given: usize,
    given_selected: &[LiteralId],
    out: &mut Vec<NewClause>,
) {
    // The given equality rewrites into every active clause (itself included)
    if let Some(&eq_lit) = single_positive_equality(ctx, arena, given) {
        if let Some((l, r)) = kbo.orient_equation(ctx, eq_lit) {
            let targets: Vec<usize> = active.iter().collect();
            for target in targets {
                let Some(sel) = active.selected_literals(target) else {
                    continue;
                };
                let sel = sel.to_vec();
                superpose_into(ctx, arena, given, l, r, target, &sel, out);
            }
        }
    }

    // Active unit equalities rewrite into the given clause
    let rewriters: Vec<usize> = active.iter().filter(|&e| e != given).collect();
    for e in rewriters {
        let Some(&eq_lit) = single_positive_equality(ctx, arena, e) else {
            continue;
        };
        let Some((l, r)) = kbo.orient_equation(ctx, eq_lit) else {
            continue;
        };
        superpose_into(ctx, arena, e, l, r, given, given_selected, out);
    }
}

fn single_positive_equality<'a>(
    ctx: &SliceContext,
    arena: &'a ClauseArena,
    id: usize,
) -> Option<&'a LiteralId> {
    let clause = arena.get(id);
    match clause.literals.as_slice() {
        [lit] if ctx.literals.is_positive_equality(*lit) => Some(&clause.literals[0]),
        _ => None,
    }
}

/// Superpose `l = r` (clause `eq_clause`, oriented) into the selected
/// literals of `target`, at every non-variable subterm unifiable with `l`.
#[allow(clippy::too_many_arguments)]
fn superpose_into(
    ctx: &mut SliceContext,
    arena: &ClauseArena,
    eq_clause: usize,
    l: TermId,
    r: TermId,
    target: usize,
    target_selected: &[LiteralId],
    out: &mut Vec<NewClause>,
) {
    let tlits = arena.get(target).literals.clone();
    for &tl in target_selected {
        let args = ctx.literals.args(tl).to_vec();
        let mut sites: Vec<TermId> = Vec::new();
        let mut seen = HashSet::new();
        for &a in &args {
            for s in ctx.terms.subterms(a) {
                if !ctx.terms.is_var(s) && seen.insert(s) {
                    sites.push(s);
                }
            }
        }

        for u in sites {
            let mut subst = Substitution::new();
            if !subst.unify(&ctx.terms, l, 0, u, 1) {
                continue;
            }
            let mut renamer = VarRenamer::new();
            let l_inst = subst.apply(&mut ctx.terms, &ctx.sig, l, 0, &mut renamer);
            let r_inst = subst.apply(&mut ctx.terms, &ctx.sig, r, 0, &mut renamer);

            let mut literals = Vec::new();
            let mut rewritten = false;
            for &cl_lit in &tlits {
                if !rewritten && cl_lit == tl {
                    rewritten = true;
                    let pred = ctx.literals.predicate(cl_lit);
                    let pol = ctx.literals.polarity(cl_lit);
                    let mut new_args = Vec::new();
                    for &a in &ctx.literals.args(cl_lit).to_vec() {
                        let a_inst = subst.apply(&mut ctx.terms, &ctx.sig, a, 1, &mut renamer);
                        new_args.push(ctx.terms.replace(&ctx.sig, a_inst, l_inst, r_inst));
                    }
                    literals.push(
                        ctx.literals
                            .mk_literal(&ctx.sig, &ctx.terms, pred, pol, new_args),
                    );
                } else {
                    literals.push(apply_plain_literal(ctx, &subst, cl_lit, 1, &mut renamer));
                }
            }
            out.push(NewClause {
                literals,
                inference: InferenceKind::Superposition,
                parents: vec![eq_clause, target],
            });
        }
    }
}

fn apply_query_literal(
    ctx: &mut SliceContext,
    subst: &RetrievalSubst,
    lit: LiteralId,
    renamer: &mut VarRenamer,
) -> LiteralId {
    let pred = ctx.literals.predicate(lit);
    let pol = ctx.literals.polarity(lit);
    let args = ctx.literals.args(lit).to_vec();
    let mut new_args = Vec::new();
    for a in args {
        new_args.push(subst.apply_to_query(&mut ctx.terms, &ctx.sig, a, renamer));
    }
    ctx.literals
        .mk_literal(&ctx.sig, &ctx.terms, pred, pol, new_args)
}

fn apply_stored_literal(
    ctx: &mut SliceContext,
    subst: &RetrievalSubst,
    lit: LiteralId,
    renamer: &mut VarRenamer,
) -> LiteralId {
    let pred = ctx.literals.predicate(lit);
    let pol = ctx.literals.polarity(lit);
    let args = ctx.literals.args(lit).to_vec();
    let mut new_args = Vec::new();
    for a in args {
        new_args.push(subst.apply_to_stored(&mut ctx.terms, &ctx.sig, a, renamer));
    }
    ctx.literals
        .mk_literal(&ctx.sig, &ctx.terms, pred, pol, new_args)
}

fn apply_plain_literal(
    ctx: &mut SliceContext,
    subst: &Substitution,
    lit: LiteralId,
    scope: u8,
    renamer: &mut VarRenamer,
) -> LiteralId {
    let pred = ctx.literals.predicate(lit);
    let pol = ctx.literals.polarity(lit);
    let args = ctx.literals.args(lit).to_vec();
    let mut new_args = Vec::new();
    for a in args {
        new_args.push(subst.apply(&mut ctx.terms, &ctx.sig, a, scope, renamer));
    }
    ctx.literals
        .mk_literal(&ctx.sig, &ctx.terms, pred, pol, new_args)
}

/// Drop conclusions identical up to literal order with the same parents.
fn dedup(clauses: Vec<NewClause>) -> Vec<NewClause> {
    let mut seen = HashSet::new();
    clauses
        .into_iter()
        .filter(|nc| {
            let mut key = nc.literals.clone();
            key.sort_unstable();
            seen.insert((key, nc.parents.clone(), nc.inference))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::LiteralSelection;
    use crate::ordering::kbo::{KboWeightMap, Precedence};

    struct Setup {
        ctx: SliceContext,
        arena: ClauseArena,
        active: ActiveSet,
    }

    impl Setup {
        fn new() -> Self {
            Setup {
                ctx: SliceContext::new(),
                arena: ClauseArena::new(),
                active: ActiveSet::new(),
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

        fn activate(&mut self, id: usize, kbo: &Kbo) {
            let lits = self.arena.get(id).literals.clone();
            let sel = kbo.selected_literal_indices(&self.ctx, &lits, LiteralSelection::SelectAll);
            let selected = sel.into_iter().map(|i| lits[i]).collect();
            self.active.add(&mut self.ctx, id, selected);
        }
    }

    #[test]
    fn test_binary_resolution_produces_empty_clause() {
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
        let c1 = s.clause(vec![pa]);
        s.activate(c1, &kbo);
        let c2 = s.clause(vec![npa]);
        s.activate(c2, &kbo);

        let out = generate(&mut s.ctx, &s.arena, &kbo, &s.active, c2, &[npa]);
        assert!(
            out.iter()
                .any(|nc| nc.literals.is_empty() && nc.inference == InferenceKind::Resolution),
            "expected the empty clause, got {:?}",
            out
        );
    }

    #[test]
    fn test_resolution_instantiates_both_sides() {
        let mut s = Setup::new();
        let p = s.ctx.sig.intern_predicate("p", 1);
        let q = s.ctx.sig.intern_predicate("q", 1);
        let a = s.ctx.sig.intern_function("a", 0);
        let ta = s.ctx.terms.mk_const(&s.ctx.sig, a);
        let x = s.ctx.terms.mk_var(0);

        // Active: ~p(X) | q(X); given: p(a). Resolvent: q(a)
        let npx = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, p, false, vec![x]);
        let qx = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, q, true, vec![x]);
        let pa = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, p, true, vec![ta]);

        let kbo = s.kbo();
        let c1 = s.clause(vec![npx, qx]);
        s.activate(c1, &kbo);
        let c2 = s.clause(vec![pa]);
        s.activate(c2, &kbo);

        let out = generate(&mut s.ctx, &s.arena, &kbo, &s.active, c2, &[pa]);
        let qa = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, q, true, vec![ta]);
        assert!(
            out.iter().any(|nc| nc.literals == vec![qa]),
            "expected q(a), got {:?}",
            out
        );
    }

    #[test]
    fn test_factoring_collapses_unifiable_literals() {
        let mut s = Setup::new();
        let p = s.ctx.sig.intern_predicate("p", 1);
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

        let kbo = s.kbo();
        let c = s.clause(vec![px, pa]);
        let out = generate(&mut s.ctx, &s.arena, &kbo, &s.active, c, &[px, pa]);
        assert!(
            out.iter().any(|nc| {
                nc.inference == InferenceKind::Factoring && nc.literals.len() == 1
            }),
            "expected a unit factor, got {:?}",
            out
        );
    }

    #[test]
    fn test_equality_resolution() {
        let mut s = Setup::new();
        let q = s.ctx.sig.intern_predicate("q", 1);
        let x = s.ctx.terms.mk_var(0);
        let a = s.ctx.sig.intern_function("a", 0);
        let ta = s.ctx.terms.mk_const(&s.ctx.sig, a);

        // X != a | q(X)  derives  q(a)
        let neq = s
            .ctx
            .literals
            .mk_equality(&s.ctx.sig, &s.ctx.terms, false, x, ta);
        let qx = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, q, true, vec![x]);

        let kbo = s.kbo();
        let c = s.clause(vec![neq, qx]);
        let out = generate(&mut s.ctx, &s.arena, &kbo, &s.active, c, &[neq, qx]);

        let qa = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, q, true, vec![ta]);
        assert!(
            out.iter().any(|nc| nc.literals == vec![qa]
                && nc.inference == InferenceKind::EqualityResolution),
            "expected q(a), got {:?}",
            out
        );
    }

    #[test]
    fn test_superposition_rewrites_active_clause() {
        let mut s = Setup::new();
        let p = s.ctx.sig.intern_predicate("p", 1);
        let f = s.ctx.sig.intern_function("f", 1);
        let a = s.ctx.sig.intern_function("a", 0);
        let b = s.ctx.sig.intern_function("b", 0);
        let ta = s.ctx.terms.mk_const(&s.ctx.sig, a);
        let tb = s.ctx.terms.mk_const(&s.ctx.sig, b);
        let fa = s.ctx.terms.mk_app(&s.ctx.sig, f, vec![ta]);

        // Active: p(f(a)); given: f(a) = b. Superposition gives p(b)
        let pfa = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, p, true, vec![fa]);
        let eq = s
            .ctx
            .literals
            .mk_equality(&s.ctx.sig, &s.ctx.terms, true, fa, tb);

        let kbo = s.kbo();
        let c1 = s.clause(vec![pfa]);
        s.activate(c1, &kbo);
        let c2 = s.clause(vec![eq]);
        s.activate(c2, &kbo);

        let out = generate(&mut s.ctx, &s.arena, &kbo, &s.active, c2, &[eq]);
        let pb = s
            .ctx
            .literals
            .mk_literal(&s.ctx.sig, &s.ctx.terms, p, true, vec![tb]);
        assert!(
            out.iter().any(|nc| nc.literals == vec![pb]
                && nc.inference == InferenceKind::Superposition),
            "expected p(b), got {:?}",
            out
        );
    }
}
