//! Literal index scenarios: the retrieval modes over a populated tree.

use resolute::{LiteralIndex, SliceContext};

struct Fixture {
    ctx: SliceContext,
    index: LiteralIndex,
}

impl Fixture {
    fn new() -> Self {
        Fixture {
            ctx: SliceContext::new(),
            index: LiteralIndex::new(),
        }
    }
}

fn sorted_clauses(results: impl Iterator<Item = resolute::QueryResult>) -> Vec<usize> {
    let mut ids: Vec<usize> = results.map(|r| r.clause).collect();
    ids.sort_unstable();
    ids
}

#[test]
fn test_generalizations_and_instances_scenario() {
    let mut fx = Fixture::new();
    let ctx = &mut fx.ctx;

    let f = ctx.sig.intern_function("f", 1);
    let g = ctx.sig.intern_function("g", 1);
    let c = ctx.sig.intern_function("c", 0);
    let p = ctx.sig.intern_predicate("p", 1);

    let x = ctx.terms.mk_var(0);
    let y = ctx.terms.mk_var(1);
    let z = ctx.terms.mk_var(2);
    let fx_t = ctx.terms.mk_app(&ctx.sig, f, vec![x]);
    let gy = ctx.terms.mk_app(&ctx.sig, g, vec![y]);
    let fgy = ctx.terms.mk_app(&ctx.sig, f, vec![gy]);
    let tc = ctx.terms.mk_const(&ctx.sig, c);
    let gc = ctx.terms.mk_app(&ctx.sig, g, vec![tc]);
    let fgc = ctx.terms.mk_app(&ctx.sig, f, vec![gc]);

    // Populate with p(f(x)), p(f(g(y))), p(z)
    let sig = ctx.sig.clone();
    let p_fx = ctx
        .literals
        .mk_literal(&sig, &ctx.terms, p, true, vec![fx_t]);
    let p_fgy = ctx
        .literals
        .mk_literal(&sig, &ctx.terms, p, true, vec![fgy]);
    let p_z = ctx.literals.mk_literal(&sig, &ctx.terms, p, true, vec![z]);

    fx.index.insert(&mut fx.ctx, p_fx, 1);
    fx.index.insert(&mut fx.ctx, p_fgy, 2);
    fx.index.insert(&mut fx.ctx, p_z, 3);

    // Generalizations of p(f(g(c))): all three stored literals
    let ctx = &mut fx.ctx;
    let q = ctx
        .literals
        .mk_literal(&sig, &ctx.terms, p, true, vec![fgc]);
    assert_eq!(
        sorted_clauses(fx.index.get_generalizations(&fx.ctx, q, false, false)),
        vec![1, 2, 3]
    );

    // Instances of p(f(x)): p(f(x)) and p(f(g(y)))
    assert_eq!(
        sorted_clauses(fx.index.get_instances(&fx.ctx, p_fx, false, false)),
        vec![1, 2]
    );

    // Unifications of p(f(x)): all three stored literals unify
    assert_eq!(
        sorted_clauses(fx.index.get_unifications(&fx.ctx, p_fx, false, false)),
        vec![1, 2, 3]
    );

    // Variants of p(f(x)): only itself
    assert_eq!(
        sorted_clauses(fx.index.get_variants(&fx.ctx, p_fx, false, false)),
        vec![1]
    );
}

#[test]
fn test_unification_soundness_and_exactly_once() {
    let mut fx = Fixture::new();
    let ctx = &mut fx.ctx;

    let f = ctx.sig.intern_function("f", 1);
    let a = ctx.sig.intern_function("a", 0);
    let b = ctx.sig.intern_function("b", 0);
    let p = ctx.sig.intern_predicate("p", 2);

    let x = ctx.terms.mk_var(0);
    let ta = ctx.terms.mk_const(&ctx.sig, a);
    let tb = ctx.terms.mk_const(&ctx.sig, b);
    let fa = ctx.terms.mk_app(&ctx.sig, f, vec![ta]);
    let fb = ctx.terms.mk_app(&ctx.sig, f, vec![tb]);
    let fx_t = ctx.terms.mk_app(&ctx.sig, f, vec![x]);

    let sig = ctx.sig.clone();
    // Stored: p(f(a), a) as 1; p(f(b), b) as 2; p(f(X), X) as 3
    let l1 = ctx
        .literals
        .mk_literal(&sig, &ctx.terms, p, true, vec![fa, ta]);
    let l2 = ctx
        .literals
        .mk_literal(&sig, &ctx.terms, p, true, vec![fb, tb]);
    let l3 = ctx
        .literals
        .mk_literal(&sig, &ctx.terms, p, true, vec![fx_t, x]);

    fx.index.insert(&mut fx.ctx, l1, 1);
    fx.index.insert(&mut fx.ctx, l2, 2);
    fx.index.insert(&mut fx.ctx, l3, 3);

    // Query p(f(a), Y): must unify with 1 (Y=a) and 3 (X=a, Y=a) but not 2
    let ctx = &mut fx.ctx;
    let y = ctx.terms.mk_var(7);
    let q = ctx
        .literals
        .mk_literal(&sig, &ctx.terms, p, true, vec![fa, y]);

    let found = sorted_clauses(fx.index.get_unifications(&fx.ctx, q, false, true));
    assert_eq!(found, vec![1, 3], "sound and exactly once");
}

#[test]
fn test_variant_symmetry_property() {
    let mut fx = Fixture::new();
    let ctx = &mut fx.ctx;

    let f = ctx.sig.intern_function("f", 2);
    let p = ctx.sig.intern_predicate("p", 1);
    let x = ctx.terms.mk_var(0);
    let y = ctx.terms.mk_var(1);
    let u = ctx.terms.mk_var(5);
    let v = ctx.terms.mk_var(6);

    let fxy = ctx.terms.mk_app(&ctx.sig, f, vec![x, y]);
    let fuv = ctx.terms.mk_app(&ctx.sig, f, vec![u, v]);
    let fxx = ctx.terms.mk_app(&ctx.sig, f, vec![x, x]);

    let sig = ctx.sig.clone();
    let l_xy = ctx
        .literals
        .mk_literal(&sig, &ctx.terms, p, true, vec![fxy]);
    let l_uv = ctx
        .literals
        .mk_literal(&sig, &ctx.terms, p, true, vec![fuv]);
    let l_xx = ctx
        .literals
        .mk_literal(&sig, &ctx.terms, p, true, vec![fxx]);

    fx.index.insert(&mut fx.ctx, l_xy, 1);
    fx.index.insert(&mut fx.ctx, l_uv, 2);
    fx.index.insert(&mut fx.ctx, l_xx, 3);

    // l_xy and l_uv are variants of each other; l_xx is not
    let from_xy = sorted_clauses(fx.index.get_variants(&fx.ctx, l_xy, false, false));
    assert_eq!(from_xy, vec![1, 2]);

    let from_uv = sorted_clauses(fx.index.get_variants(&fx.ctx, l_uv, false, false));
    assert_eq!(from_uv, vec![1, 2], "variant relation is symmetric");

    let from_xx = sorted_clauses(fx.index.get_variants(&fx.ctx, l_xx, false, false));
    assert_eq!(from_xx, vec![3]);
}

#[test]
fn test_retrieval_is_deterministic() {
    let build = || {
        let mut fx = Fixture::new();
        let ctx = &mut fx.ctx;
        let p = ctx.sig.intern_predicate("p", 1);
        let f = ctx.sig.intern_function("f", 1);
        let sig = ctx.sig.clone();
        let mut lits = Vec::new();
        for i in 0..6u32 {
            let base = ctx.terms.mk_var(i);
            let t = if i % 2 == 0 {
                ctx.terms.mk_app(&sig, f, vec![base])
            } else {
                base
            };
            lits.push(
                ctx.literals
                    .mk_literal(&sig, &ctx.terms, p, true, vec![t]),
            );
        }
        for (i, &l) in lits.iter().enumerate() {
            fx.index.insert(&mut fx.ctx, l, i);
        }
        let ctx = &mut fx.ctx;
        let qx = ctx.terms.mk_var(9);
        let q = ctx
            .literals
            .mk_literal(&sig, &ctx.terms, p, true, vec![qx]);
        let order: Vec<usize> = fx
            .index
            .get_unifications(&fx.ctx, q, false, false)
            .map(|r| r.clause)
            .collect();
        order
    };

    // Identical insertion histories enumerate in the same order
    assert_eq!(build(), build());
}
