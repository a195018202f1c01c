//! Literal indexing.
//!
//! `LiteralIndex` keeps one substitution tree per (predicate, polarity)
//! class and routes queries to the right tree, optionally to the
//! complementary one. Stored literals are variable-normalized on insertion
//! so that α-equivalent literals share tree paths.

pub mod substitution_tree;

pub use substitution_tree::{
    LeafDatum, QueryResult, RetrievalMode, RetrievalSubst, SubstitutionTree, TreeRetrieval,
    QUERY_SCOPE, SPECIAL_SCOPE, STORED_SCOPE,
};

use crate::logic::{LiteralId, PredicateId, SliceContext, TermId, TermView};
use indexmap::IndexMap;
use std::collections::HashMap;

/// One substitution tree per (predicate, polarity) top structure
#[derive(Debug, Default)]
pub struct LiteralIndex {
    trees: IndexMap<(PredicateId, bool), SubstitutionTree>,
}

impl LiteralIndex {
    pub fn new() -> Self {
        LiteralIndex::default()
    }

    /// Insert or remove, routed by the literal's top structure.
    pub fn handle_literal(
        &mut self,
        ctx: &mut SliceContext,
        lit: LiteralId,
        clause: usize,
        insert: bool,
    ) {
        if insert {
            self.insert(ctx, lit, clause);
        } else {
            self.remove(ctx, lit, clause);
        }
    }

    pub fn insert(&mut self, ctx: &mut SliceContext, lit: LiteralId, clause: usize) {
        let key = (ctx.literals.predicate(lit), ctx.literals.polarity(lit));
        let arity = ctx.literals.args(lit).len();
        let (norm_args, renaming) = normalize_literal(ctx, lit);
        let tree = self
            .trees
            .entry(key)
            .or_insert_with(|| SubstitutionTree::new(arity));
        tree.insert(ctx, &norm_args, clause, lit, renaming);
    }

    pub fn remove(&mut self, ctx: &mut SliceContext, lit: LiteralId, clause: usize) {
        let key = (ctx.literals.predicate(lit), ctx.literals.polarity(lit));
        let (norm_args, _) = normalize_literal(ctx, lit);
        if let Some(tree) = self.trees.get_mut(&key) {
            tree.remove(ctx, &norm_args, clause, lit);
        }
    }

    fn tree_for<'a>(
        &'a self,
        ctx: &SliceContext,
        lit: LiteralId,
        complementary: bool,
    ) -> Option<&'a SubstitutionTree> {
        let polarity = ctx.literals.polarity(lit) ^ complementary;
        self.trees.get(&(ctx.literals.predicate(lit), polarity))
    }

    fn retrieve<'a>(
        &'a self,
        ctx: &'a SliceContext,
        lit: LiteralId,
        complementary: bool,
        mode: RetrievalMode,
        retrieve_substitutions: bool,
    ) -> impl Iterator<Item = QueryResult> + 'a {
        self.tree_for(ctx, lit, complementary)
            .map(move |tree| {
                tree.retrieve(ctx, ctx.literals.args(lit), mode, retrieve_substitutions)
            })
            .into_iter()
            .flatten()
    }

    /// Stored literals unifiable with `lit` (or its complement)
    pub fn get_unifications<'a>(
        &'a self,
        ctx: &'a SliceContext,
        lit: LiteralId,
        complementary: bool,
        retrieve_substitutions: bool,
    ) -> impl Iterator<Item = QueryResult> + 'a {
        self.retrieve(
            ctx,
            lit,
            complementary,
            RetrievalMode::Unifications,
            retrieve_substitutions,
        )
    }

    /// Unifications with interpreted-head clashes deferred as constraints
    pub fn get_unifications_with_constraints<'a>(
        &'a self,
        ctx: &'a SliceContext,
        lit: LiteralId,
        complementary: bool,
        retrieve_substitutions: bool,
    ) -> impl Iterator<Item = QueryResult> + 'a {
        self.retrieve(
            ctx,
            lit,
            complementary,
            RetrievalMode::UnificationsWithConstraints,
            retrieve_substitutions,
        )
    }

    /// Stored literals of which `lit` is an instance
    pub fn get_generalizations<'a>(
        &'a self,
        ctx: &'a SliceContext,
        lit: LiteralId,
        complementary: bool,
        retrieve_substitutions: bool,
    ) -> impl Iterator<Item = QueryResult> + 'a {
        self.retrieve(
            ctx,
            lit,
            complementary,
            RetrievalMode::Generalizations,
            retrieve_substitutions,
        )
    }

    /// Stored literals that are instances of `lit`
    pub fn get_instances<'a>(
        &'a self,
        ctx: &'a SliceContext,
        lit: LiteralId,
        complementary: bool,
        retrieve_substitutions: bool,
    ) -> impl Iterator<Item = QueryResult> + 'a {
        self.retrieve(
            ctx,
            lit,
            complementary,
            RetrievalMode::Instances,
            retrieve_substitutions,
        )
    }

    /// Stored literals equal to `lit` up to variable renaming
    pub fn get_variants<'a>(
        &'a self,
        ctx: &'a SliceContext,
        lit: LiteralId,
        complementary: bool,
        retrieve_substitutions: bool,
    ) -> impl Iterator<Item = QueryResult> + 'a {
        self.retrieve(
            ctx,
            lit,
            complementary,
            RetrievalMode::Variants,
            retrieve_substitutions,
        )
    }

    /// Every stored (clause, literal) pair
    pub fn get_all(&self) -> impl Iterator<Item = (usize, LiteralId)> + '_ {
        self.trees
            .values()
            .flat_map(|t| t.iter_data().map(|d| (d.clause, d.literal)))
    }

    pub fn is_empty(&self) -> bool {
        self.trees.values().all(|t| t.is_empty())
    }

    pub fn len(&self) -> usize {
        self.trees.values().map(|t| t.len()).sum()
    }
}

/// Rename a literal's variables to 0..k in first-occurrence order.
/// Returns the normalized argument terms and the normalized-to-original map.
fn normalize_literal(ctx: &mut SliceContext, lit: LiteralId) -> (Vec<TermId>, Vec<u32>) {
    let args: Vec<TermId> = ctx.literals.args(lit).to_vec();
    let mut map: HashMap<u32, u32> = HashMap::new();
    let mut renaming: Vec<u32> = Vec::new();
    let norm_args = args
        .iter()
        .map(|&a| normalize_term(ctx, a, &mut map, &mut renaming))
        .collect();
    (norm_args, renaming)
}

fn normalize_term(
    ctx: &mut SliceContext,
    t: TermId,
    map: &mut HashMap<u32, u32>,
    renaming: &mut Vec<u32>,
) -> TermId {
    enum Level {
        Var(u32),
        App(crate::logic::FunctionId, Vec<TermId>),
    }
    let level = match ctx.terms.view(t) {
        TermView::Var(v) => Level::Var(v),
        TermView::App(f, args) => Level::App(f, args.to_vec()),
    };
    match level {
        Level::Var(v) => {
            let n = *map.entry(v).or_insert_with(|| {
                renaming.push(v);
                (renaming.len() - 1) as u32
            });
            ctx.terms.mk_var(n)
        }
        Level::App(f, args) => {
            let new_args = args
                .into_iter()
                .map(|a| normalize_term(ctx, a, map, renaming))
                .collect();
            ctx.terms.mk_app(&ctx.sig, f, new_args)
        }
    }
}
