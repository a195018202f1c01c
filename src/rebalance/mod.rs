//! Rebalancing inverters: isolate a subterm of an interpreted term.
//!
//! Given `t = w` and an argument position `i` of `t`, the inverter decides
//! whether `t.args[i]` can be solved for, and builds the inverse context.
//! This is what turns equalities into assignments: `store(a,i,x) = s`
//! becomes `x = select(s,i)`, `x + c = w` becomes `x = w + (-c)`.

use crate::logic::{Interpretation, NumSort, SliceContext, TermId, TermView};

/// A subterm position to isolate against a value
#[derive(Debug, Clone, Copy)]
pub struct InversionContext {
    /// The term whose argument is isolated
    pub top_term: TermId,
    /// Which argument
    pub top_idx: usize,
    /// The value the whole term equals
    pub to_wrap: TermId,
}

/// Can the argument at `top_idx` be isolated?
pub fn can_invert_top(ctx: &SliceContext, inv: &InversionContext) -> bool {
    let (f, args) = match ctx.terms.view(inv.top_term) {
        TermView::App(f, args) => (f, args),
        TermView::Var(_) => return false,
    };
    debug_assert!(inv.top_idx < args.len());
    let entry = ctx.sig.function(f);
    match entry.interpretation {
        Some(Interpretation::Add(_)) | Some(Interpretation::Minus(_)) => true,
        Some(Interpretation::Mul(NumSort::Int)) => {
            // Only multiplication by a unit is invertible over the integers
            partner_numeral(ctx, args, inv.top_idx)
                .map(|n| n.is_one() || n.is_minus_one())
                .unwrap_or(false)
        }
        Some(Interpretation::Mul(_)) => partner_numeral(ctx, args, inv.top_idx)
            .map(|n| !n.is_zero())
            .unwrap_or(false),
        // store(a, i, x) = s solves only for the value position
        Some(Interpretation::ArrayStore) => inv.top_idx == 2,
        Some(_) => false,
        None => entry.term_algebra_cons,
    }
}

/// Build the inverse: the term the isolated argument equals.
/// Precondition: `can_invert_top` holds; violation is a bug.
pub fn invert_top(ctx: &mut SliceContext, inv: &InversionContext) -> TermId {
    assert!(can_invert_top(ctx, inv), "invert_top precondition violated");
    let (f, args) = match ctx.terms.view(inv.top_term) {
        TermView::App(f, args) => (f, args.to_vec()),
        TermView::Var(_) => unreachable!(),
    };
    let interp = ctx.sig.function(f).interpretation;
    let w = inv.to_wrap;
    match interp {
        Some(Interpretation::Add(sort)) => {
            // x + other = w  ==>  x = w + (-other)
            let other = args[1 - inv.top_idx];
            let minus = ctx.sig.interpreted_function(Interpretation::Minus(sort));
            let add = ctx.sig.interpreted_function(Interpretation::Add(sort));
            let neg_other = ctx.terms.mk_app(&ctx.sig, minus, vec![other]);
            ctx.terms.mk_app(&ctx.sig, add, vec![w, neg_other])
        }
        Some(Interpretation::Minus(sort)) => {
            let minus = ctx.sig.interpreted_function(Interpretation::Minus(sort));
            ctx.terms.mk_app(&ctx.sig, minus, vec![w])
        }
        Some(Interpretation::Mul(NumSort::Int)) => {
            let other = args[1 - inv.top_idx];
            let n = ctx
                .sig
                .as_numeral(head_of(ctx, other).expect("unit partner"))
                .expect("unit partner");
            if n.is_one() {
                w
            } else {
                let mul = ctx
                    .sig
                    .interpreted_function(Interpretation::Mul(NumSort::Int));
                ctx.terms.mk_app(&ctx.sig, mul, vec![other, w])
            }
        }
        Some(Interpretation::Mul(sort)) => {
            // x * other = w  ==>  x = w * (1 / other)
            let other = args[1 - inv.top_idx];
            let mul = ctx.sig.interpreted_function(Interpretation::Mul(sort));
            let div = ctx.sig.interpreted_function(Interpretation::Div(sort));
            let one = ctx.sig.interpreted_function(Interpretation::One(sort));
            let t_one = ctx.terms.mk_app(&ctx.sig, one, vec![]);
            let recip = ctx.terms.mk_app(&ctx.sig, div, vec![t_one, other]);
            ctx.terms.mk_app(&ctx.sig, mul, vec![w, recip])
        }
        Some(Interpretation::ArrayStore) => {
            // store(a, i, x) = s  ==>  x = select(s, i)
            let select = ctx.sig.interpreted_function(Interpretation::ArraySelect);
            let idx = args[1];
            ctx.terms.mk_app(&ctx.sig, select, vec![w, idx])
        }
        Some(_) => unreachable!("not invertible"),
        None => {
            // Term-algebra constructor: the positional destructor
            let dtor = ctx.sig.function(f).destructors[inv.top_idx];
            ctx.terms.mk_app(&ctx.sig, dtor, vec![w])
        }
    }
}

/// The numeral value of the partner argument, if it is one
fn partner_numeral(
    ctx: &SliceContext,
    args: &[TermId],
    idx: usize,
) -> Option<crate::logic::Numeral> {
    if args.len() != 2 {
        return None;
    }
    let other = args[1 - idx];
    match ctx.terms.view(other) {
        TermView::App(g, _) => ctx.sig.as_numeral(g),
        TermView::Var(_) => None,
    }
}

fn head_of(ctx: &SliceContext, t: TermId) -> Option<crate::logic::FunctionId> {
    match ctx.terms.view(t) {
        TermView::App(f, _) => Some(f),
        TermView::Var(_) => None,
    }
}
