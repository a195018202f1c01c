//! Knuth-Bendix ordering on hash-consed terms and literals.
//!
//! Weight maps carry one weight per function symbol plus special weights for
//! variables, numerals, and symbols introduced during search. Precedence is
//! an injective ranking, independent for functions and predicates;
//! predicates additionally group into levels compared before ranks.

use super::TermOrder;
use crate::error::{ProverError, Result};
use crate::logic::{
    FunctionId, LiteralId, NumSort, PredicateId, Signature, SliceContext, TermId, TermView,
    EQUALITY,
};
use crate::options::{LiteralSelection, Options};
use std::collections::HashMap;
use std::path::Path;

pub type KboWeight = u32;

/// Weights for symbol classes outside the per-functor table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialWeights {
    pub variable: KboWeight,
    pub num_int: KboWeight,
    pub num_rat: KboWeight,
    pub num_real: KboWeight,
}

impl Default for SpecialWeights {
    fn default() -> Self {
        SpecialWeights {
            variable: 1,
            num_int: 1,
            num_rat: 1,
            num_real: 1,
        }
    }
}

/// KBO weight assignment for one symbol kind
#[derive(Debug, Clone)]
pub struct KboWeightMap {
    per_symbol: Vec<KboWeight>,
    default_weight: KboWeight,
    /// Weight of symbols introduced during proof search
    pub introduced: KboWeight,
    pub special: SpecialWeights,
}

impl KboWeightMap {
    /// Every symbol weighs 1
    pub fn uniform(symbol_count: usize) -> Self {
        KboWeightMap {
            per_symbol: vec![1; symbol_count],
            default_weight: 1,
            introduced: 1,
            special: SpecialWeights::default(),
        }
    }

    pub fn function_weight(&self, sig: &Signature, f: FunctionId) -> KboWeight {
        if let Some(n) = sig.as_numeral(f) {
            return match n.sort() {
                NumSort::Int => self.special.num_int,
                NumSort::Rat => self.special.num_rat,
                NumSort::Real => self.special.num_real,
            };
        }
        if sig.function(f).introduced {
            return self.introduced;
        }
        self.per_symbol
            .get(f.as_u32() as usize)
            .copied()
            .unwrap_or(self.default_weight)
    }

    /// Override one symbol's weight
    pub fn set_symbol_weight(&mut self, index: u32, weight: KboWeight) {
        if (index as usize) < self.per_symbol.len() {
            self.per_symbol[index as usize] = weight;
        }
    }

    pub fn predicate_weight(&self, sig: &Signature, p: PredicateId) -> KboWeight {
        if sig.predicate(p).introduced {
            return self.introduced;
        }
        self.per_symbol
            .get(p.as_u32() as usize)
            .copied()
            .unwrap_or(self.default_weight)
    }

    /// Parse a weight file: one `<name> <weight>` pair per line, `%` starts
    /// a comment. Special identifiers: `$var`, `$introduced`, `$default`,
    /// `$int`, `$rat`, `$real`.
    pub fn from_file(names: &[(String, u32)], path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut named: HashMap<&str, KboWeight> = HashMap::new();
        let mut special = SpecialWeights::default();
        let mut introduced = 1;
        let mut default_weight = 1;

        for (lineno, line) in content.lines().enumerate() {
            let line = line.split('%').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            let (name, weight) = match (parts.next(), parts.next(), parts.next()) {
                (Some(n), Some(w), None) => (n, w),
                _ => {
                    return Err(ProverError::User(format!(
                        "{}:{}: expected `<name> <weight>`",
                        path.display(),
                        lineno + 1
                    )))
                }
            };
            let weight: KboWeight = weight.parse().map_err(|_| {
                ProverError::User(format!(
                    "{}:{}: weight `{}` is not a non-negative integer",
                    path.display(),
                    lineno + 1,
                    weight
                ))
            })?;
            match name {
                "$var" => special.variable = weight,
                "$introduced" => introduced = weight,
                "$default" => default_weight = weight,
                "$int" => special.num_int = weight,
                "$rat" => special.num_rat = weight,
                "$real" => special.num_real = weight,
                _ => {
                    named.insert(name, weight);
                }
            }
        }

        let per_symbol = names
            .iter()
            .map(|(name, _)| named.get(name.as_str()).copied().unwrap_or(default_weight))
            .collect();
        Ok(KboWeightMap {
            per_symbol,
            default_weight,
            introduced,
            special,
        })
    }
}

/// Injective symbol rankings; higher rank means greater in precedence
#[derive(Debug, Clone)]
pub struct Precedence {
    func: Vec<i32>,
    pred: Vec<i32>,
    pred_levels: Vec<i32>,
}

impl Precedence {
    /// Default precedence: symbols ranked by (arity, id) ascending.
    /// Equality gets the minimal predicate level; everything else level 1.
    pub fn default_for(sig: &Signature) -> Self {
        let mut func_ids: Vec<u32> = (0..sig.function_count() as u32).collect();
        func_ids.sort_by_key(|&id| (sig.function(FunctionId(id)).arity, id));
        let mut func = vec![0; func_ids.len()];
        for (rank, &id) in func_ids.iter().enumerate() {
            func[id as usize] = rank as i32;
        }

        let mut pred_ids: Vec<u32> = (0..sig.predicate_count() as u32).collect();
        pred_ids.sort_by_key(|&id| (sig.predicate(PredicateId(id)).arity, id));
        let mut pred = vec![0; pred_ids.len()];
        for (rank, &id) in pred_ids.iter().enumerate() {
            pred[id as usize] = rank as i32;
        }

        let pred_levels = (0..sig.predicate_count() as u32)
            .map(|id| if PredicateId(id) == EQUALITY { 0 } else { 1 })
            .collect();

        Precedence {
            func,
            pred,
            pred_levels,
        }
    }

    /// Rank of a function symbol; symbols interned after construction rank
    /// above all ranked ones, in id order.
    pub fn func_rank(&self, f: FunctionId) -> i64 {
        let idx = f.as_u32() as usize;
        match self.func.get(idx) {
            Some(&r) => r as i64,
            None => idx as i64,
        }
    }

    pub fn pred_rank(&self, p: PredicateId) -> i64 {
        let idx = p.as_u32() as usize;
        match self.pred.get(idx) {
            Some(&r) => r as i64,
            None => idx as i64,
        }
    }

    pub fn pred_level(&self, p: PredicateId) -> i32 {
        if p == EQUALITY {
            return 0;
        }
        self.pred_levels
            .get(p.as_u32() as usize)
            .copied()
            .unwrap_or(1)
    }

    pub fn cmp_functions(&self, f: FunctionId, g: FunctionId) -> std::cmp::Ordering {
        self.func_rank(f).cmp(&self.func_rank(g))
    }

    /// Highest function rank currently assigned
    fn max_func_rank(&self) -> i64 {
        self.func
            .iter()
            .map(|&r| r as i64)
            .max()
            .unwrap_or(-1)
            .max(self.func.len() as i64 - 1)
    }
}

/// An admissibility violation of the weight/precedence combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KboAdmissibilityIssue {
    /// Variables must weigh at least 1
    ZeroVariableWeight,
    /// A constant may not weigh less than a variable
    ConstantBelowVariableWeight(FunctionId),
    /// Only unary symbols may have weight zero
    ZeroWeightNonUnary(FunctionId),
    /// A zero-weight unary symbol must be maximal in precedence
    ZeroWeightUnaryNotMaximal(FunctionId),
}

impl KboAdmissibilityIssue {
    pub fn describe(&self, sig: &Signature) -> String {
        match self {
            KboAdmissibilityIssue::ZeroVariableWeight => {
                "variable weight must be at least 1".into()
            }
            KboAdmissibilityIssue::ConstantBelowVariableWeight(f) => format!(
                "constant `{}` weighs less than a variable",
                sig.function(*f).name
            ),
            KboAdmissibilityIssue::ZeroWeightNonUnary(f) => format!(
                "symbol `{}` has weight 0 but is not unary",
                sig.function(*f).name
            ),
            KboAdmissibilityIssue::ZeroWeightUnaryNotMaximal(f) => format!(
                "zero-weight unary `{}` is not maximal in precedence",
                sig.function(*f).name
            ),
        }
    }
}

/// The Knuth-Bendix ordering
#[derive(Debug, Clone)]
pub struct Kbo {
    pub func_weights: KboWeightMap,
    /// Optional per-predicate weights; disabled unless a file is given
    pub pred_weights: Option<KboWeightMap>,
    pub prec: Precedence,
    pub reverse_literal_comparison: bool,
}

impl Kbo {
    pub fn new(func_weights: KboWeightMap, prec: Precedence) -> Self {
        Kbo {
            func_weights,
            pred_weights: None,
            prec,
            reverse_literal_comparison: false,
        }
    }

    /// Build the ordering from options: weight files, default precedence,
    /// and an admissibility check that turns violations into a user error.
    pub fn from_options(sig: &Signature, opts: &Options) -> Result<Kbo> {
        let func_names: Vec<(String, u32)> = (0..sig.function_count() as u32)
            .map(|id| (sig.function(FunctionId(id)).name.clone(), id))
            .collect();
        let func_weights = match &opts.kbo_func_weight_file {
            Some(path) => KboWeightMap::from_file(&func_names, path)?,
            None => KboWeightMap::uniform(sig.function_count()),
        };
        let pred_weights = match &opts.kbo_pred_weight_file {
            Some(path) => {
                let pred_names: Vec<(String, u32)> = (0..sig.predicate_count() as u32)
                    .map(|id| (sig.predicate(PredicateId(id)).name.clone(), id))
                    .collect();
                Some(KboWeightMap::from_file(&pred_names, path)?)
            }
            None => None,
        };

        let kbo = Kbo {
            func_weights,
            pred_weights,
            prec: Precedence::default_for(sig),
            reverse_literal_comparison: opts.reverse_literal_comparison,
        };

        let mut issues = Vec::new();
        kbo.check_admissibility(sig, |issue| issues.push(issue));
        if !issues.is_empty() {
            let msgs: Vec<String> = issues.iter().map(|i| i.describe(sig)).collect();
            return Err(ProverError::User(format!(
                "KBO parameters not admissible: {}",
                msgs.join("; ")
            )));
        }
        Ok(kbo)
    }

    /// Report every admissibility violation through the handler.
    pub fn check_admissibility<F: FnMut(KboAdmissibilityIssue)>(
        &self,
        sig: &Signature,
        mut handle: F,
    ) {
        let var_weight = self.func_weights.special.variable;
        if var_weight == 0 {
            handle(KboAdmissibilityIssue::ZeroVariableWeight);
        }
        let max_rank = self.prec.max_func_rank();
        for id in 0..sig.function_count() as u32 {
            let f = FunctionId(id);
            let arity = sig.function(f).arity;
            let w = self.func_weights.function_weight(sig, f);
            if arity == 0 && w < var_weight {
                handle(KboAdmissibilityIssue::ConstantBelowVariableWeight(f));
            }
            if w == 0 && arity >= 2 {
                handle(KboAdmissibilityIssue::ZeroWeightNonUnary(f));
            }
            if w == 0 && arity == 1 && self.prec.func_rank(f) != max_rank {
                handle(KboAdmissibilityIssue::ZeroWeightUnaryNotMaximal(f));
            }
        }
    }

    pub fn variable_weight(&self) -> KboWeight {
        self.func_weights.special.variable
    }

    /// KBO weight of a term under the function weight map
    pub fn term_weight(&self, ctx: &SliceContext, t: TermId) -> u64 {
        match ctx.terms.view(t) {
            TermView::Var(_) => self.variable_weight() as u64,
            TermView::App(f, args) => {
                let mut w = self.func_weights.function_weight(&ctx.sig, f) as u64;
                for &a in args {
                    w += self.term_weight(ctx, a);
                }
                w
            }
        }
    }

    /// Compare two terms under KBO.
    ///
    /// Hash-consing makes the `Equal` case an id comparison; ground terms
    /// are always comparable.
    pub fn compare(&self, ctx: &SliceContext, s: TermId, t: TermId) -> TermOrder {
        if s == t {
            return TermOrder::Equal;
        }
        let bank = &ctx.terms;
        match (bank.view(s), bank.view(t)) {
            (TermView::Var(_), TermView::Var(_)) => TermOrder::Incomparable,
            (TermView::Var(x), TermView::App(..)) => {
                if bank.contains_var(t, x) {
                    TermOrder::Less
                } else {
                    TermOrder::Incomparable
                }
            }
            (TermView::App(..), TermView::Var(y)) => {
                if bank.contains_var(s, y) {
                    TermOrder::Greater
                } else {
                    TermOrder::Incomparable
                }
            }
            (TermView::App(f, _), TermView::App(g, _)) => {
                let vars_s = bank.vars_of(s);
                let vars_t = bank.vars_of(t);
                let cond_st = Self::covers(&vars_s, &vars_t);
                let cond_ts = Self::covers(&vars_t, &vars_s);

                let ws = self.term_weight(ctx, s);
                let wt = self.term_weight(ctx, t);

                if ws > wt {
                    return if cond_st {
                        TermOrder::Greater
                    } else {
                        TermOrder::Incomparable
                    };
                }
                if ws < wt {
                    return if cond_ts {
                        TermOrder::Less
                    } else {
                        TermOrder::Incomparable
                    };
                }

                if f != g {
                    return match self.prec.cmp_functions(f, g) {
                        std::cmp::Ordering::Greater => {
                            if cond_st {
                                TermOrder::Greater
                            } else {
                                TermOrder::Incomparable
                            }
                        }
                        std::cmp::Ordering::Less => {
                            if cond_ts {
                                TermOrder::Less
                            } else {
                                TermOrder::Incomparable
                            }
                        }
                        std::cmp::Ordering::Equal => {
                            unreachable!("precedence ranks are injective")
                        }
                    };
                }

                // Same head, equal weight: first differing argument decides
                let (args_s, args_t) = match (bank.view(s), bank.view(t)) {
                    (TermView::App(_, a), TermView::App(_, b)) => (a.to_vec(), b.to_vec()),
                    _ => unreachable!(),
                };
                for (&si, &ti) in args_s.iter().zip(args_t.iter()) {
                    match self.compare(ctx, si, ti) {
                        TermOrder::Equal => continue,
                        TermOrder::Greater => {
                            return if cond_st {
                                TermOrder::Greater
                            } else {
                                TermOrder::Incomparable
                            }
                        }
                        TermOrder::Less => {
                            return if cond_ts {
                                TermOrder::Less
                            } else {
                                TermOrder::Incomparable
                            }
                        }
                        TermOrder::Incomparable => return TermOrder::Incomparable,
                    }
                }
                // Identical structure would have interned to the same id
                unreachable!("distinct terms with identical structure")
            }
        }
    }

    /// Does `big` contain every variable of `small` at least as often?
    fn covers(big: &HashMap<u32, u32>, small: &HashMap<u32, u32>) -> bool {
        small
            .iter()
            .all(|(v, n)| big.get(v).copied().unwrap_or(0) >= *n)
    }

    /// Compare literals: predicate levels first, then equality literals by a
    /// four-way multiset comparison of their sides, other literals by
    /// predicate rank and argument comparison. For equal atoms the negative
    /// literal is greater.
    pub fn compare_literals(&self, ctx: &SliceContext, l1: LiteralId, l2: LiteralId) -> TermOrder {
        if l1 == l2 {
            return TermOrder::Equal;
        }
        let lits = &ctx.literals;
        let p1 = lits.predicate(l1);
        let p2 = lits.predicate(l2);

        let lv1 = self.prec.pred_level(p1);
        let lv2 = self.prec.pred_level(p2);
        if lv1 != lv2 {
            let ord = if lv1 > lv2 {
                TermOrder::Greater
            } else {
                TermOrder::Less
            };
            return if self.reverse_literal_comparison {
                ord.reverse()
            } else {
                ord
            };
        }

        if p1 == EQUALITY && p2 == EQUALITY {
            return self.compare_equality_literals(ctx, l1, l2);
        }

        if p1 != p2 {
            if let Some(pw) = &self.pred_weights {
                let w1 = pw.predicate_weight(&ctx.sig, p1);
                let w2 = pw.predicate_weight(&ctx.sig, p2);
                if w1 != w2 {
                    return if w1 > w2 {
                        TermOrder::Greater
                    } else {
                        TermOrder::Less
                    };
                }
            }
            return if self.prec.pred_rank(p1) > self.prec.pred_rank(p2) {
                TermOrder::Greater
            } else {
                TermOrder::Less
            };
        }

        for (&a1, &a2) in lits.args(l1).iter().zip(lits.args(l2).iter()) {
            match self.compare(ctx, a1, a2) {
                TermOrder::Equal => continue,
                other => return other,
            }
        }
        // Same atom, different literal: polarity must differ
        Self::polarity_order(lits.polarity(l1), lits.polarity(l2))
    }

    fn compare_equality_literals(
        &self,
        ctx: &SliceContext,
        l1: LiteralId,
        l2: LiteralId,
    ) -> TermOrder {
        let lits = &ctx.literals;
        let mut m1 = lits.args(l1).to_vec();
        let mut m2 = lits.args(l2).to_vec();

        // Cancel common elements of the side multisets
        let mut i = 0;
        while i < m1.len() {
            if let Some(j) = m2.iter().position(|&t| t == m1[i]) {
                m1.remove(i);
                m2.remove(j);
            } else {
                i += 1;
            }
        }

        match (m1.len(), m2.len()) {
            (0, 0) => Self::polarity_order(lits.polarity(l1), lits.polarity(l2)),
            (1, 1) => self.compare(ctx, m1[0], m2[0]),
            (2, 2) => {
                let dominates = |xs: &[TermId], ys: &[TermId]| {
                    ys.iter().all(|&y| {
                        xs.iter()
                            .any(|&x| self.compare(ctx, x, y) == TermOrder::Greater)
                    })
                };
                if dominates(&m1, &m2) {
                    TermOrder::Greater
                } else if dominates(&m2, &m1) {
                    TermOrder::Less
                } else {
                    TermOrder::Incomparable
                }
            }
            _ => unreachable!("equality sides are two-element multisets"),
        }
    }

    fn polarity_order(pol1: bool, pol2: bool) -> TermOrder {
        match (pol1, pol2) {
            (false, true) => TermOrder::Greater,
            (true, false) => TermOrder::Less,
            _ => TermOrder::Equal,
        }
    }

    /// Indices of literals eligible for inferences under the selection strategy
    pub fn selected_literal_indices(
        &self,
        ctx: &SliceContext,
        literals: &[LiteralId],
        selection: LiteralSelection,
    ) -> Vec<usize> {
        match selection {
            LiteralSelection::SelectAll => (0..literals.len()).collect(),
            LiteralSelection::SelectMaximal => (0..literals.len())
                .filter(|&i| {
                    literals.iter().enumerate().all(|(j, &other)| {
                        j == i
                            || self.compare_literals(ctx, other, literals[i]) != TermOrder::Greater
                    })
                })
                .collect(),
        }
    }

    /// Sides of a positive equality oriented so the left is greater, if the
    /// comparison decides one way.
    pub fn orient_equation(&self, ctx: &SliceContext, lit: LiteralId) -> Option<(TermId, TermId)> {
        if !ctx.literals.is_positive_equality(lit) {
            return None;
        }
        let args = ctx.literals.args(lit);
        let (lhs, rhs) = (args[0], args[1]);
        match self.compare(ctx, lhs, rhs) {
            TermOrder::Greater => Some((lhs, rhs)),
            TermOrder::Less => Some((rhs, lhs)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ctx {
        ctx: SliceContext,
    }

    impl Ctx {
        fn new() -> Self {
            Ctx {
                ctx: SliceContext::new(),
            }
        }

        fn func(&mut self, name: &str, arity: u8) -> FunctionId {
            self.ctx.sig.intern_function(name, arity)
        }

        fn app(&mut self, f: FunctionId, args: Vec<TermId>) -> TermId {
            self.ctx.terms.mk_app(&self.ctx.sig, f, args)
        }

        fn var(&mut self, v: u32) -> TermId {
            self.ctx.terms.mk_var(v)
        }

        fn kbo(&self) -> Kbo {
            Kbo::new(
                KboWeightMap::uniform(self.ctx.sig.function_count()),
                Precedence::default_for(&self.ctx.sig),
            )
        }
    }

    #[test]
    fn test_variable_conditions() {
        let mut c = Ctx::new();
        let f = c.func("f", 1);
        let a = c.func("a", 0);
        let x = c.var(0);
        let y = c.var(1);
        let ta = c.app(a, vec![]);
        let fx = c.app(f, vec![x]);
        let kbo = c.kbo();

        // Distinct variables are incomparable
        assert_eq!(kbo.compare(&c.ctx, x, y), TermOrder::Incomparable);
        // A constant does not dominate a variable
        assert_eq!(kbo.compare(&c.ctx, ta, x), TermOrder::Incomparable);
        // A term dominates its proper variable subterms
        assert_eq!(kbo.compare(&c.ctx, fx, x), TermOrder::Greater);
        assert_eq!(kbo.compare(&c.ctx, x, fx), TermOrder::Less);
    }

    #[test]
    fn test_weight_decides() {
        let mut c = Ctx::new();
        let f = c.func("f", 1);
        let a = c.func("a", 0);
        let ta = c.app(a, vec![]);
        let fa = c.app(f, vec![ta]);
        let ffa = c.app(f, vec![fa]);
        let kbo = c.kbo();

        assert_eq!(kbo.compare(&c.ctx, ffa, fa), TermOrder::Greater);
        assert_eq!(kbo.compare(&c.ctx, fa, ffa), TermOrder::Less);
    }

    #[test]
    fn test_precedence_decides_on_weight_tie() {
        let mut c = Ctx::new();
        // Default precedence ranks by (arity, id): b > a among constants
        let a = c.func("a", 0);
        let b = c.func("b", 0);
        let ta = c.app(a, vec![]);
        let tb = c.app(b, vec![]);
        let kbo = c.kbo();

        assert_eq!(kbo.compare(&c.ctx, tb, ta), TermOrder::Greater);
        assert_eq!(kbo.compare(&c.ctx, ta, tb), TermOrder::Less);
    }

    #[test]
    fn test_lex_on_same_head() {
        let mut c = Ctx::new();
        let g = c.func("g", 2);
        let a = c.func("a", 0);
        let b = c.func("b", 0);
        let ta = c.app(a, vec![]);
        let tb = c.app(b, vec![]);
        let gba = c.app(g, vec![tb, ta]);
        let gab = c.app(g, vec![ta, tb]);
        let kbo = c.kbo();

        // First argument decides: b > a
        assert_eq!(kbo.compare(&c.ctx, gba, gab), TermOrder::Greater);
    }

    #[test]
    fn test_ground_terms_always_comparable() {
        let mut c = Ctx::new();
        let f = c.func("f", 2);
        let g = c.func("g", 1);
        let a = c.func("a", 0);
        let b = c.func("b", 0);
        let ta = c.app(a, vec![]);
        let tb = c.app(b, vec![]);
        let ga = c.app(g, vec![ta]);
        let t1 = c.app(f, vec![ga, tb]);
        let t2 = c.app(f, vec![tb, ga]);
        let kbo = c.kbo();

        assert_ne!(kbo.compare(&c.ctx, t1, t2), TermOrder::Incomparable);
        assert_eq!(
            kbo.compare(&c.ctx, t1, t2),
            kbo.compare(&c.ctx, t2, t1).reverse()
        );
    }

    #[test]
    fn test_custom_weights_change_orientation() {
        let mut c = Ctx::new();
        let f = c.func("f", 2);
        let a = c.func("a", 0);
        let b = c.func("b", 0);
        let ta = c.app(a, vec![]);
        let tb = c.app(b, vec![]);
        let fab = c.app(f, vec![ta, tb]);
        let fba = c.app(f, vec![tb, ta]);

        // w(a)=1, w(b)=2: f(a,b) and f(b,a) tie on weight, a-vs-b lex decides
        let mut weights = KboWeightMap::uniform(c.ctx.sig.function_count());
        weights.per_symbol[a.as_u32() as usize] = 1;
        weights.per_symbol[b.as_u32() as usize] = 2;
        let kbo = Kbo::new(weights, Precedence::default_for(&c.ctx.sig));

        assert_eq!(kbo.compare(&c.ctx, fba, fab), TermOrder::Greater);
        assert_eq!(kbo.compare(&c.ctx, fab, fba), TermOrder::Less);
    }

    #[test]
    fn test_admissibility_issues() {
        let mut c = Ctx::new();
        let f = c.func("f", 2);
        let g = c.func("g", 1);
        let a = c.func("a", 0);

        let mut weights = KboWeightMap::uniform(c.ctx.sig.function_count());
        weights.per_symbol[f.as_u32() as usize] = 0; // zero-weight binary
        weights.per_symbol[a.as_u32() as usize] = 0; // constant below variable
        weights.per_symbol[g.as_u32() as usize] = 0; // zero unary, not maximal
        let kbo = Kbo::new(weights, Precedence::default_for(&c.ctx.sig));

        let mut issues = Vec::new();
        kbo.check_admissibility(&c.ctx.sig, |i| issues.push(i));
        assert!(issues.contains(&KboAdmissibilityIssue::ZeroWeightNonUnary(f)));
        assert!(issues.contains(&KboAdmissibilityIssue::ConstantBelowVariableWeight(a)));
        assert!(issues.contains(&KboAdmissibilityIssue::ZeroWeightUnaryNotMaximal(g)));
    }

    #[test]
    fn test_zero_weight_maximal_unary_is_admissible() {
        let mut c = Ctx::new();
        let _a = c.func("a", 0);
        let g = c.func("g", 1);
        // g is unary and ranked above the constant by default precedence

        let mut weights = KboWeightMap::uniform(c.ctx.sig.function_count());
        weights.per_symbol[g.as_u32() as usize] = 0;
        let kbo = Kbo::new(weights, Precedence::default_for(&c.ctx.sig));

        let mut issues = Vec::new();
        kbo.check_admissibility(&c.ctx.sig, |i| issues.push(i));
        assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    }

    #[test]
    fn test_literal_ordering_equality_smallest() {
        let mut c = Ctx::new();
        let p = c.ctx.sig.intern_predicate("p", 1);
        let a = c.func("a", 0);
        let b = c.func("b", 0);
        let ta = c.app(a, vec![]);
        let tb = c.app(b, vec![]);
        let kbo = c.kbo();

        let sig = c.ctx.sig.clone();
        let eq = c
            .ctx
            .literals
            .mk_equality(&sig, &c.ctx.terms, true, ta, tb);
        let pa = c
            .ctx
            .literals
            .mk_literal(&sig, &c.ctx.terms, p, true, vec![ta]);

        assert_eq!(kbo.compare_literals(&c.ctx, pa, eq), TermOrder::Greater);
        assert_eq!(kbo.compare_literals(&c.ctx, eq, pa), TermOrder::Less);
    }

    #[test]
    fn test_negative_literal_greater_on_same_atom() {
        let mut c = Ctx::new();
        let p = c.ctx.sig.intern_predicate("p", 1);
        let a = c.func("a", 0);
        let ta = c.app(a, vec![]);
        let kbo = c.kbo();

        let sig = c.ctx.sig.clone();
        let pos = c
            .ctx
            .literals
            .mk_literal(&sig, &c.ctx.terms, p, true, vec![ta]);
        let neg = c
            .ctx
            .literals
            .mk_literal(&sig, &c.ctx.terms, p, false, vec![ta]);

        assert_eq!(kbo.compare_literals(&c.ctx, neg, pos), TermOrder::Greater);
    }

    #[test]
    fn test_maximal_selection() {
        let mut c = Ctx::new();
        let p = c.ctx.sig.intern_predicate("p", 1);
        let f = c.func("f", 1);
        let a = c.func("a", 0);
        let ta = c.app(a, vec![]);
        let fa = c.app(f, vec![ta]);
        let kbo = c.kbo();

        let sig = c.ctx.sig.clone();
        let small = c
            .ctx
            .literals
            .mk_literal(&sig, &c.ctx.terms, p, true, vec![ta]);
        let big = c
            .ctx
            .literals
            .mk_literal(&sig, &c.ctx.terms, p, true, vec![fa]);

        let lits = vec![small, big];
        let selected = kbo.selected_literal_indices(&c.ctx, &lits, LiteralSelection::SelectMaximal);
        assert_eq!(selected, vec![1]);

        let all = kbo.selected_literal_indices(&c.ctx, &lits, LiteralSelection::SelectAll);
        assert_eq!(all, vec![0, 1]);
    }

    #[test]
    fn test_orient_equation() {
        let mut c = Ctx::new();
        let f = c.func("f", 1);
        let a = c.func("a", 0);
        let ta = c.app(a, vec![]);
        let fa = c.app(f, vec![ta]);
        let kbo = c.kbo();

        let sig = c.ctx.sig.clone();
        let eq = c
            .ctx
            .literals
            .mk_equality(&sig, &c.ctx.terms, true, ta, fa);
        assert_eq!(kbo.orient_equation(&c.ctx, eq), Some((fa, ta)));

        let x = c.var(0);
        let y = c.var(1);
        let unoriented = c.ctx.literals.mk_equality(&sig, &c.ctx.terms, true, x, y);
        assert_eq!(kbo.orient_equation(&c.ctx, unoriented), None);
    }
}
