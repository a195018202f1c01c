//! Compiled ordering checks for demodulation.
//!
//! Rewriting with an equation `l = r` is only sound when `lσ ≻ rσ` for the
//! match substitution σ. For statically oriented equations KBO closure under
//! substitution settles this once; for unoriented ones the question recurs
//! for every match. Each (equation, side) pair therefore compiles once into
//! a short instruction stream executed against σ, memoised in a cache owned
//! by the slice.
//!
//! Execution keeps a running weight accumulator (plus the substituted
//! variable condition) and short-circuits to greater / not-greater.

use super::kbo::Kbo;
use super::TermOrder;
use crate::logic::substitution::{ScopedVar, Substitution};
use crate::logic::{LiteralId, SliceContext, TermId, TermView};
use std::collections::HashMap;
use std::rc::Rc;

/// Which side of the equation plays the rewrite left-hand side
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EqSide {
    LeftToRight,
    RightToLeft,
}

/// One step of a compiled ordering check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Weight balance between the instantiated sides: the accumulator starts
    /// at `base` and adds `coeff * (W(σx) - W(var))` per variable. Also
    /// verifies the substituted variable condition from the same
    /// coefficients. Negative → not greater, positive → greater, zero →
    /// fall through to the comparison instructions.
    Weight { coeffs: Vec<(u32, i64)>, base: i64 },
    /// Compare the instances of two equation variables
    CompareVV { lhs: u32, rhs: u32 },
    /// Compare a variable instance against an instantiated rigid subterm
    CompareVT { lhs: u32, rhs: TermId },
    CompareTV { lhs: TermId, rhs: u32 },
    /// The side is greater under every substitution
    Success,
}

enum Emit {
    Continue,
    Stop,
}

/// Cache of compiled checks, keyed by (equation literal, side)
#[derive(Debug, Default)]
pub struct DemodulatorChecks {
    cache: HashMap<(LiteralId, EqSide), Rc<Vec<Instruction>>>,
}

impl DemodulatorChecks {
    pub fn new() -> Self {
        DemodulatorChecks::default()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Decide whether `lhsσ ≻ rhsσ`, where `lhs` is the `side` of `eq` and
    /// σ binds the equation's variables at `eq_scope` in `subst`.
    pub fn is_greater_under(
        &mut self,
        kbo: &Kbo,
        ctx: &mut SliceContext,
        eq: LiteralId,
        side: EqSide,
        subst: &Substitution,
        eq_scope: u8,
    ) -> bool {
        let prog = match self.cache.get(&(eq, side)) {
            Some(p) => p.clone(),
            None => {
                let args = ctx.literals.args(eq);
                let (lhs, rhs) = match side {
                    EqSide::LeftToRight => (args[0], args[1]),
                    EqSide::RightToLeft => (args[1], args[0]),
                };
                let p = Rc::new(compile(kbo, ctx, lhs, rhs));
                self.cache.insert((eq, side), p.clone());
                p
            }
        };
        execute(kbo, ctx, &prog, subst, eq_scope)
    }
}

/// Compile the check for `lhs ≻ rhs` under arbitrary substitutions.
fn compile(kbo: &Kbo, ctx: &SliceContext, lhs: TermId, rhs: TermId) -> Vec<Instruction> {
    match kbo.compare(ctx, lhs, rhs) {
        // KBO is closed under substitution: a decided side stays decided
        TermOrder::Greater => vec![Instruction::Success],
        TermOrder::Equal | TermOrder::Less => vec![],
        TermOrder::Incomparable => {
            let mut coeffs: HashMap<u32, i64> = HashMap::new();
            for (v, n) in ctx.terms.vars_of(lhs) {
                *coeffs.entry(v).or_insert(0) += n as i64;
            }
            for (v, n) in ctx.terms.vars_of(rhs) {
                *coeffs.entry(v).or_insert(0) -= n as i64;
            }
            let mut coeffs: Vec<(u32, i64)> = coeffs
                .into_iter()
                .filter(|&(_, c)| c != 0)
                .collect();
            coeffs.sort_unstable();

            let base = kbo.term_weight(ctx, lhs) as i64 - kbo.term_weight(ctx, rhs) as i64;
            let mut prog = vec![Instruction::Weight { coeffs, base }];
            emit_lex(kbo, ctx, lhs, rhs, &mut prog);
            prog
        }
    }
}

/// Emit comparison instructions for the weight-tie case, walking the static
/// lexicographic comparison of `s` and `t`.
fn emit_lex(kbo: &Kbo, ctx: &SliceContext, s: TermId, t: TermId, prog: &mut Vec<Instruction>) -> Emit {
    if s == t {
        return Emit::Continue;
    }
    match (ctx.terms.view(s), ctx.terms.view(t)) {
        (TermView::Var(x), TermView::Var(y)) => {
            prog.push(Instruction::CompareVV { lhs: x, rhs: y });
            Emit::Continue
        }
        (TermView::Var(x), TermView::App(..)) => {
            prog.push(Instruction::CompareVT { lhs: x, rhs: t });
            Emit::Continue
        }
        (TermView::App(..), TermView::Var(y)) => {
            prog.push(Instruction::CompareTV { lhs: s, rhs: y });
            Emit::Continue
        }
        (TermView::App(f, _), TermView::App(g, _)) => {
            if f != g {
                if kbo.prec.cmp_functions(f, g) == std::cmp::Ordering::Greater {
                    prog.push(Instruction::Success);
                }
                // A lesser head ends the stream: falling off means not greater
                return Emit::Stop;
            }
            let (args_s, args_t) = match (ctx.terms.view(s), ctx.terms.view(t)) {
                (TermView::App(_, a), TermView::App(_, b)) => (a.to_vec(), b.to_vec()),
                _ => unreachable!(),
            };
            for (&si, &ti) in args_s.iter().zip(args_t.iter()) {
                match emit_lex(kbo, ctx, si, ti, prog) {
                    Emit::Stop => return Emit::Stop,
                    Emit::Continue => {}
                }
            }
            Emit::Continue
        }
    }
}

/// Run a compiled check against a match substitution.
fn execute(
    kbo: &Kbo,
    ctx: &mut SliceContext,
    prog: &[Instruction],
    subst: &Substitution,
    eq_scope: u8,
) -> bool {
    for ins in prog {
        match ins {
            Instruction::Weight { coeffs, base } => {
                let mut acc = *base;
                let mut balance: HashMap<(u32, u8), i64> = HashMap::new();
                for &(x, c) in coeffs {
                    let sv = ScopedVar {
                        scope: eq_scope,
                        var: x,
                    };
                    let (tx, sx) = match subst.lookup(sv) {
                        Some(b) => b,
                        // An unbound variable with an unbalanced count
                        // cannot be certified
                        None => return false,
                    };
                    acc += c * (weight_under(kbo, ctx, subst, tx, sx)
                        - kbo.variable_weight() as i64);
                    counts_under(ctx, subst, tx, sx, c, &mut balance);
                }
                if acc < 0 || balance.values().any(|&n| n < 0) {
                    return false;
                }
                if acc > 0 {
                    return true;
                }
                // Weight tie: the comparison instructions decide
            }
            Instruction::CompareVV { lhs, rhs } => {
                let t1 = materialize_var(ctx, subst, *lhs, eq_scope);
                let t2 = materialize_var(ctx, subst, *rhs, eq_scope);
                match kbo.compare(ctx, t1, t2) {
                    TermOrder::Greater => return true,
                    TermOrder::Equal => {}
                    _ => return false,
                }
            }
            Instruction::CompareVT { lhs, rhs } => {
                let t1 = materialize_var(ctx, subst, *lhs, eq_scope);
                let t2 = materialize_term(ctx, subst, *rhs, eq_scope);
                match kbo.compare(ctx, t1, t2) {
                    TermOrder::Greater => return true,
                    TermOrder::Equal => {}
                    _ => return false,
                }
            }
            Instruction::CompareTV { lhs, rhs } => {
                let t1 = materialize_term(ctx, subst, *lhs, eq_scope);
                let t2 = materialize_var(ctx, subst, *rhs, eq_scope);
                match kbo.compare(ctx, t1, t2) {
                    TermOrder::Greater => return true,
                    TermOrder::Equal => {}
                    _ => return false,
                }
            }
            Instruction::Success => return true,
        }
    }
    false
}

/// KBO weight of `t` under the substitution, chasing bindings
fn weight_under(
    kbo: &Kbo,
    ctx: &SliceContext,
    subst: &Substitution,
    t: TermId,
    scope: u8,
) -> i64 {
    let (t, scope) = subst.resolve(&ctx.terms, t, scope);
    match ctx.terms.view(t) {
        TermView::Var(_) => kbo.variable_weight() as i64,
        TermView::App(f, args) => {
            let mut w = kbo.func_weights.function_weight(&ctx.sig, f) as i64;
            for &a in args {
                w += weight_under(kbo, ctx, subst, a, scope);
            }
            w
        }
    }
}

/// Accumulate `mult` per variable occurrence of `t` under the substitution
fn counts_under(
    ctx: &SliceContext,
    subst: &Substitution,
    t: TermId,
    scope: u8,
    mult: i64,
    out: &mut HashMap<(u32, u8), i64>,
) {
    let (t, scope) = subst.resolve(&ctx.terms, t, scope);
    match ctx.terms.view(t) {
        TermView::Var(v) => *out.entry((v, scope)).or_insert(0) += mult,
        TermView::App(_, args) => {
            for &a in args {
                counts_under(ctx, subst, a, scope, mult, out);
            }
        }
    }
}

fn materialize_var(ctx: &mut SliceContext, subst: &Substitution, v: u32, scope: u8) -> TermId {
    let var_term = ctx.terms.mk_var(v);
    materialize_term(ctx, subst, var_term, scope)
}

fn materialize_term(ctx: &mut SliceContext, subst: &Substitution, t: TermId, scope: u8) -> TermId {
    subst.instantiate(&mut ctx.terms, &ctx.sig, t, scope)
}
