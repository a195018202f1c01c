//! Substitution tree over literal argument vectors.
//!
//! Internal nodes discriminate on the next internal variable to bind;
//! children are keyed by the shape of the binding (a stored variable or a
//! functor application over fresh internal variables). Along every
//! root-to-leaf path the union of bindings is a most general pattern of the
//! literals stored at the leaf.
//!
//! Nodes live in an arena and refer to each other by index. Retrieval is a
//! lazy backtracking descent over a three-scope substitution: scope 0 holds
//! query variables, scope 1 the stored literals' normalized variables, and
//! scope 2 the tree's internal variables. The bind trail is unwound at each
//! choice point, so one iterator allocation serves the whole enumeration.

use crate::logic::substitution::{ScopedVar, Substitution, VarRenamer};
use crate::logic::{FunctionId, LiteralId, Signature, SliceContext, TermBank, TermId, TermView};
use std::collections::HashMap;

/// Scope of query variables in retrieval substitutions
pub const QUERY_SCOPE: u8 = 0;
/// Scope of stored (normalized) literal variables
pub const STORED_SCOPE: u8 = 1;
/// Scope of the tree's internal discrimination variables
pub const SPECIAL_SCOPE: u8 = 2;
/// Renamer key scope for stored-clause variables outside the indexed literal
const UNSEEN_STORED_SCOPE: u8 = 3;

/// What a retrieval asks for
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RetrievalMode {
    /// Stored literals unifiable with the query
    Unifications,
    /// Unifiable, with clashes between interpreted heads deferred as
    /// theory constraints
    UnificationsWithConstraints,
    /// Stored literals of which the query is an instance
    Generalizations,
    /// Stored literals that are instances of the query
    Instances,
    /// Stored literals equal to the query up to variable renaming
    Variants,
}

/// One entry stored at a leaf
#[derive(Debug, Clone)]
pub struct LeafDatum {
    pub clause: usize,
    pub literal: LiteralId,
    /// Normalized variable index -> original variable id
    renaming: Vec<u32>,
}

/// Child edge: the binding shape and the pattern it stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Shape {
    Var(u32),
    App(FunctionId),
}

#[derive(Debug, Clone)]
enum Pattern {
    /// A stored variable (normalized id) with its interned var term
    Var(u32, TermId),
    /// An application over fresh internal variables
    App {
        term: TermId,
        arg_svars: Vec<u32>,
    },
}

impl Pattern {
    fn term(&self) -> TermId {
        match self {
            Pattern::Var(_, t) => *t,
            Pattern::App { term, .. } => *term,
        }
    }

    fn scope(&self) -> u8 {
        match self {
            Pattern::Var(..) => STORED_SCOPE,
            Pattern::App { .. } => SPECIAL_SCOPE,
        }
    }
}

#[derive(Debug, Clone)]
struct Edge {
    shape: Shape,
    pattern: Pattern,
    child: usize,
}

#[derive(Debug)]
enum Node {
    Inner { svar: u32, children: Vec<Edge> },
    Leaf { data: Vec<LeafDatum> },
}

/// A substitution tree for one (predicate, polarity) class
#[derive(Debug)]
pub struct SubstitutionTree {
    nodes: Vec<Node>,
    root: Option<usize>,
    arity: usize,
    next_svar: u32,
    /// Interned `Var(s)` terms for internal variables, indexed by id
    svar_terms: Vec<TermId>,
    entries: usize,
}

impl SubstitutionTree {
    pub fn new(arity: usize) -> Self {
        SubstitutionTree {
            nodes: Vec::new(),
            root: None,
            arity,
            next_svar: arity as u32,
            svar_terms: Vec::new(),
            entries: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    fn svar_term(&self, s: u32) -> TermId {
        self.svar_terms[s as usize]
    }

    fn ensure_svar_terms(&mut self, bank: &mut TermBank, upto: u32) {
        while (self.svar_terms.len() as u32) < upto {
            let id = self.svar_terms.len() as u32;
            self.svar_terms.push(bank.mk_var(id));
        }
    }

    /// Insert a datum for the normalized argument vector.
    pub fn insert(
        &mut self,
        ctx: &mut SliceContext,
        norm_args: &[TermId],
        clause: usize,
        literal: LiteralId,
        renaming: Vec<u32>,
    ) {
        debug_assert_eq!(norm_args.len(), self.arity);
        let datum = LeafDatum {
            clause,
            literal,
            renaming,
        };
        self.entries += 1;

        if self.arity == 0 {
            if self.root.is_none() {
                self.nodes.push(Node::Leaf { data: Vec::new() });
                self.root = Some(self.nodes.len() - 1);
            }
            if let Node::Leaf { data } = &mut self.nodes[self.root.unwrap()] {
                data.push(datum);
            }
            return;
        }

        self.ensure_svar_terms(&mut ctx.terms, self.arity as u32);
        if self.root.is_none() {
            self.nodes.push(Node::Inner {
                svar: 0,
                children: Vec::new(),
            });
            self.root = Some(self.nodes.len() - 1);
        }

        let mut values: HashMap<u32, TermId> = HashMap::new();
        for (i, &a) in norm_args.iter().enumerate() {
            values.insert(i as u32, a);
        }
        let mut pending: Vec<u32> = (0..self.arity as u32).rev().collect();
        let mut cur = self.root.unwrap();

        loop {
            if matches!(self.nodes[cur], Node::Leaf { .. }) {
                if let Node::Leaf { data } = &mut self.nodes[cur] {
                    data.push(datum);
                }
                return;
            }

            let svar = match &self.nodes[cur] {
                Node::Inner { svar, .. } => *svar,
                Node::Leaf { .. } => unreachable!(),
            };
            let popped = pending.pop().expect("pending variable for inner node");
            debug_assert_eq!(popped, svar, "tree path out of order");
            let value = values[&svar];
            let shape = match ctx.terms.view(value) {
                TermView::Var(v) => Shape::Var(v),
                TermView::App(f, _) => Shape::App(f),
            };

            let pos = match &self.nodes[cur] {
                Node::Inner { children, .. } => {
                    children.binary_search_by(|e| e.shape.cmp(&shape))
                }
                _ => unreachable!(),
            };

            match pos {
                Ok(i) => {
                    // Follow the existing edge
                    let (child, arg_svars) = match &self.nodes[cur] {
                        Node::Inner { children, .. } => {
                            let edge = &children[i];
                            let svars = match &edge.pattern {
                                Pattern::App { arg_svars, .. } => arg_svars.clone(),
                                Pattern::Var(..) => Vec::new(),
                            };
                            (edge.child, svars)
                        }
                        _ => unreachable!(),
                    };
                    if !arg_svars.is_empty() {
                        let args: Vec<TermId> = match ctx.terms.view(value) {
                            TermView::App(_, args) => args.to_vec(),
                            _ => unreachable!(),
                        };
                        for (&sv, &arg) in arg_svars.iter().zip(args.iter()) {
                            values.insert(sv, arg);
                        }
                        for &sv in arg_svars.iter().rev() {
                            pending.push(sv);
                        }
                    }
                    cur = child;
                }
                Err(i) => {
                    // Create the edge and the subtree below it
                    enum Level {
                        Var(u32),
                        App(FunctionId, Vec<TermId>),
                    }
                    let level = match ctx.terms.view(value) {
                        TermView::Var(v) => Level::Var(v),
                        TermView::App(f, args) => Level::App(f, args.to_vec()),
                    };
                    let pattern = match level {
                        Level::Var(v) => {
                            let vt = ctx.terms.mk_var(v);
                            Pattern::Var(v, vt)
                        }
                        Level::App(f, args) => {
                            let first = self.next_svar;
                            self.next_svar += args.len() as u32;
                            let arg_svars: Vec<u32> = (first..self.next_svar).collect();
                            self.ensure_svar_terms(&mut ctx.terms, self.next_svar);
                            let svar_args: Vec<TermId> =
                                arg_svars.iter().map(|&s| self.svar_term(s)).collect();
                            let term = ctx.terms.mk_app(&ctx.sig, f, svar_args);
                            for (&sv, &arg) in arg_svars.iter().zip(args.iter()) {
                                values.insert(sv, arg);
                            }
                            for &sv in arg_svars.iter().rev() {
                                pending.push(sv);
                            }
                            Pattern::App { term, arg_svars }
                        }
                    };
                    let child = if pending.is_empty() {
                        self.nodes.push(Node::Leaf { data: Vec::new() });
                        self.nodes.len() - 1
                    } else {
                        let svar = *pending.last().unwrap();
                        self.nodes.push(Node::Inner {
                            svar,
                            children: Vec::new(),
                        });
                        self.nodes.len() - 1
                    };
                    if let Node::Inner { children, .. } = &mut self.nodes[cur] {
                        children.insert(
                            i,
                            Edge {
                                shape,
                                pattern,
                                child,
                            },
                        );
                    }
                    cur = child;
                }
            }
        }
    }

    /// Remove the datum for (clause, literal). The argument vector must be
    /// the same normalized form used at insertion.
    pub fn remove(
        &mut self,
        ctx: &SliceContext,
        norm_args: &[TermId],
        clause: usize,
        literal: LiteralId,
    ) {
        let Some(root) = self.root else { return };

        if self.arity == 0 {
            if let Node::Leaf { data } = &mut self.nodes[root] {
                if let Some(pos) = data
                    .iter()
                    .position(|d| d.clause == clause && d.literal == literal)
                {
                    data.remove(pos);
                    self.entries -= 1;
                }
            }
            return;
        }

        let mut values: HashMap<u32, TermId> = HashMap::new();
        for (i, &a) in norm_args.iter().enumerate() {
            values.insert(i as u32, a);
        }
        let mut pending: Vec<u32> = (0..self.arity as u32).rev().collect();
        let mut cur = root;
        // (node, edge position) path for pruning
        let mut path: Vec<(usize, usize)> = Vec::new();

        loop {
            match &self.nodes[cur] {
                Node::Leaf { .. } => break,
                Node::Inner { svar, children } => {
                    let svar = *svar;
                    let popped = pending.pop().expect("pending variable for inner node");
                    debug_assert_eq!(popped, svar);
                    let value = values[&svar];
                    let shape = match ctx.terms.view(value) {
                        TermView::Var(v) => Shape::Var(v),
                        TermView::App(f, _) => Shape::App(f),
                    };
                    let Ok(i) = children.binary_search_by(|e| e.shape.cmp(&shape)) else {
                        debug_assert!(false, "removing a literal that was never inserted");
                        return;
                    };
                    let edge = &children[i];
                    if let Pattern::App { arg_svars, .. } = &edge.pattern {
                        let args: Vec<TermId> = match ctx.terms.view(value) {
                            TermView::App(_, args) => args.to_vec(),
                            _ => unreachable!(),
                        };
                        for (&sv, &arg) in arg_svars.iter().zip(args.iter()) {
                            values.insert(sv, arg);
                        }
                        for &sv in arg_svars.iter().rev() {
                            pending.push(sv);
                        }
                    }
                    let child = edge.child;
                    path.push((cur, i));
                    cur = child;
                }
            }
        }

        if let Node::Leaf { data } = &mut self.nodes[cur] {
            if let Some(pos) = data
                .iter()
                .position(|d| d.clause == clause && d.literal == literal)
            {
                data.remove(pos);
                self.entries -= 1;
            }
        }

        // Prune edges whose subtree became empty
        for &(node, edge_pos) in path.iter().rev() {
            let child = match &self.nodes[node] {
                Node::Inner { children, .. } => children[edge_pos].child,
                _ => unreachable!(),
            };
            let child_empty = match &self.nodes[child] {
                Node::Leaf { data } => data.is_empty(),
                Node::Inner { children, .. } => children.is_empty(),
            };
            if !child_empty {
                break;
            }
            if let Node::Inner { children, .. } = &mut self.nodes[node] {
                children.remove(edge_pos);
            }
        }
        let root_empty = match &self.nodes[root] {
            Node::Leaf { data } => data.is_empty(),
            Node::Inner { children, .. } => children.is_empty(),
        };
        if root_empty {
            self.root = None;
            self.nodes.clear();
            self.next_svar = self.arity as u32;
            self.svar_terms.clear();
        }
    }

    /// Lazy retrieval of stored literals related to the query arguments.
    pub fn retrieve<'a>(
        &'a self,
        ctx: &'a SliceContext,
        query_args: &[TermId],
        mode: RetrievalMode,
        retrieve_substitutions: bool,
    ) -> TreeRetrieval<'a> {
        let mut subst = Substitution::new();
        let mut stack = Vec::new();
        let mut leaf = None;

        if let Some(root) = self.root {
            for (i, &a) in query_args.iter().enumerate() {
                subst.bind(
                    ScopedVar {
                        scope: SPECIAL_SCOPE,
                        var: i as u32,
                    },
                    a,
                    QUERY_SCOPE,
                );
            }
            match &self.nodes[root] {
                Node::Leaf { .. } => leaf = Some((root, 0)),
                Node::Inner { .. } => {
                    let mark = subst.mark();
                    stack.push(Frame {
                        node: root,
                        next_edge: 0,
                        mark,
                        constraints_len: 0,
                        bijection_len: 0,
                    });
                }
            }
        }

        TreeRetrieval {
            tree: self,
            ctx,
            mode,
            retrieve_substitutions,
            subst,
            constraints: Vec::new(),
            s2q: HashMap::new(),
            bijection_trail: Vec::new(),
            stack,
            leaf,
        }
    }

    /// Every datum in the tree, in arena order.
    pub fn iter_data(&self) -> impl Iterator<Item = &LeafDatum> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Leaf { data } => Some(data.iter()),
            _ => None,
        }).flatten()
    }
}

/// Choice point of the retrieval descent
#[derive(Debug)]
struct Frame {
    node: usize,
    next_edge: usize,
    mark: usize,
    constraints_len: usize,
    bijection_len: usize,
}

/// Substitution snapshot attached to a query result
#[derive(Debug, Clone)]
pub struct RetrievalSubst {
    subst: Substitution,
    /// Original stored variable id -> normalized id
    stored_to_norm: HashMap<u32, u32>,
    constraints: Vec<((TermId, u8), (TermId, u8))>,
}

impl RetrievalSubst {
    /// Instance of a query-side term under the unifier
    pub fn apply_to_query(
        &self,
        bank: &mut TermBank,
        sig: &Signature,
        t: TermId,
        renamer: &mut VarRenamer,
    ) -> TermId {
        self.subst.apply(bank, sig, t, QUERY_SCOPE, renamer)
    }

    /// Instance of a stored-clause term under the unifier. Variables of the
    /// stored clause that did not occur in the indexed literal are renamed
    /// consistently.
    pub fn apply_to_stored(
        &self,
        bank: &mut TermBank,
        sig: &Signature,
        t: TermId,
        renamer: &mut VarRenamer,
    ) -> TermId {
        enum Level {
            Var(u32),
            App(FunctionId, Vec<TermId>),
        }
        let level = match bank.view(t) {
            TermView::Var(v) => Level::Var(v),
            TermView::App(f, args) => Level::App(f, args.to_vec()),
        };
        match level {
            Level::Var(v) => match self.stored_to_norm.get(&v) {
                Some(&n) => {
                    let vt = bank.mk_var(n);
                    self.subst.apply(bank, sig, vt, STORED_SCOPE, renamer)
                }
                None => {
                    // Not part of the indexed literal: rename apart from
                    // both query and stored-normalized variables
                    let fresh = renamer.rename(ScopedVar {
                        scope: UNSEEN_STORED_SCOPE,
                        var: v,
                    });
                    bank.mk_var(fresh)
                }
            },
            Level::App(f, args) => {
                let new_args = args
                    .into_iter()
                    .map(|a| self.apply_to_stored(bank, sig, a, renamer))
                    .collect();
                bank.mk_app(sig, f, new_args)
            }
        }
    }

    /// Deferred theory constraint pairs, materialized as concrete terms
    pub fn constraints(
        &self,
        bank: &mut TermBank,
        sig: &Signature,
        renamer: &mut VarRenamer,
    ) -> Vec<(TermId, TermId)> {
        self.constraints
            .iter()
            .map(|&((t1, s1), (t2, s2))| {
                (
                    self.subst.apply(bank, sig, t1, s1, renamer),
                    self.subst.apply(bank, sig, t2, s2, renamer),
                )
            })
            .collect()
    }

    pub fn has_constraints(&self) -> bool {
        !self.constraints.is_empty()
    }
}

/// One retrieved datum
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub clause: usize,
    pub literal: LiteralId,
    pub subst: Option<RetrievalSubst>,
}

/// Lazy backtracking iterator over matching leaf data
pub struct TreeRetrieval<'a> {
    tree: &'a SubstitutionTree,
    ctx: &'a SliceContext,
    mode: RetrievalMode,
    retrieve_substitutions: bool,
    subst: Substitution,
    constraints: Vec<((TermId, u8), (TermId, u8))>,
    /// Variant mode: stored variable -> query variable
    s2q: HashMap<u32, u32>,
    bijection_trail: Vec<u32>,
    stack: Vec<Frame>,
    leaf: Option<(usize, usize)>,
}

impl<'a> TreeRetrieval<'a> {
    fn var_bindable(&self, scope: u8) -> bool {
        match scope {
            SPECIAL_SCOPE => true,
            QUERY_SCOPE => matches!(
                self.mode,
                RetrievalMode::Unifications
                    | RetrievalMode::UnificationsWithConstraints
                    | RetrievalMode::Instances
            ),
            STORED_SCOPE => matches!(
                self.mode,
                RetrievalMode::Unifications
                    | RetrievalMode::UnificationsWithConstraints
                    | RetrievalMode::Generalizations
            ),
            _ => false,
        }
    }

    /// Mode-aware unification of a resolved pair.
    fn descend(&mut self, t1: TermId, s1: u8, t2: TermId, s2: u8) -> bool {
        let bank = &self.ctx.terms;
        let (t1, s1) = self.subst.resolve(bank, t1, s1);
        let (t2, s2) = self.subst.resolve(bank, t2, s2);
        if t1 == t2 && s1 == s2 {
            return true;
        }
        match (bank.view(t1), bank.view(t2)) {
            (TermView::Var(v1), TermView::Var(v2)) => {
                if self.mode == RetrievalMode::Variants {
                    return self.bind_variant_pair(t1, v1, s1, t2, v2, s2);
                }
                if self.var_bindable(s1) {
                    self.subst.bind(ScopedVar { scope: s1, var: v1 }, t2, s2);
                    true
                } else if self.var_bindable(s2) {
                    self.subst.bind(ScopedVar { scope: s2, var: v2 }, t1, s1);
                    true
                } else {
                    false
                }
            }
            (TermView::Var(v1), TermView::App(..)) => {
                let sv = ScopedVar { scope: s1, var: v1 };
                if !self.var_bindable(s1) {
                    return false;
                }
                if self.mode == RetrievalMode::Variants && s1 != SPECIAL_SCOPE {
                    return false;
                }
                if self.subst.occurs(bank, sv, t2, s2) {
                    return false;
                }
                self.subst.bind(sv, t2, s2);
                true
            }
            (TermView::App(..), TermView::Var(v2)) => {
                let sv = ScopedVar { scope: s2, var: v2 };
                if !self.var_bindable(s2) {
                    return false;
                }
                if self.mode == RetrievalMode::Variants && s2 != SPECIAL_SCOPE {
                    return false;
                }
                if self.subst.occurs(bank, sv, t1, s1) {
                    return false;
                }
                self.subst.bind(sv, t1, s1);
                true
            }
            (TermView::App(f, _), TermView::App(g, _)) => {
                if f != g {
                    if self.mode == RetrievalMode::UnificationsWithConstraints
                        && self.ctx.sig.is_interpreted(f)
                        && self.ctx.sig.is_interpreted(g)
                    {
                        self.constraints.push(((t1, s1), (t2, s2)));
                        return true;
                    }
                    return false;
                }
                let pairs: Vec<(TermId, TermId)> = match (bank.view(t1), bank.view(t2)) {
                    (TermView::App(_, a1), TermView::App(_, a2)) => {
                        a1.iter().copied().zip(a2.iter().copied()).collect()
                    }
                    _ => unreachable!(),
                };
                pairs.iter().all(|&(a1, a2)| self.descend(a1, s1, a2, s2))
            }
        }
    }

    /// Variant mode: two variables must form a consistent bijective pair.
    /// Internal variables stay structural.
    fn bind_variant_pair(&mut self, t1: TermId, v1: u32, s1: u8, t2: TermId, v2: u32, s2: u8) -> bool {
        if s1 == SPECIAL_SCOPE {
            self.subst.bind(ScopedVar { scope: s1, var: v1 }, t2, s2);
            return true;
        }
        if s2 == SPECIAL_SCOPE {
            self.subst.bind(ScopedVar { scope: s2, var: v2 }, t1, s1);
            return true;
        }
        match (s1, s2) {
            (QUERY_SCOPE, STORED_SCOPE) => {
                // A stored variable already claimed by a different query
                // variable breaks the bijection; an identical pair would
                // have been resolved away before we got here.
                if self.s2q.contains_key(&v2) {
                    return false;
                }
                self.s2q.insert(v2, v1);
                self.bijection_trail.push(v2);
                self.subst.bind(
                    ScopedVar {
                        scope: QUERY_SCOPE,
                        var: v1,
                    },
                    t2,
                    s2,
                );
                true
            }
            _ => false,
        }
    }

    fn try_edge(&mut self, svar: u32, edge: &Edge) -> bool {
        let s_term = self.tree.svar_term(svar);
        self.descend(s_term, SPECIAL_SCOPE, edge.pattern.term(), edge.pattern.scope())
    }

    fn make_result(&self, datum: &LeafDatum) -> QueryResult {
        let subst = if self.retrieve_substitutions {
            let stored_to_norm = datum
                .renaming
                .iter()
                .enumerate()
                .map(|(n, &orig)| (orig, n as u32))
                .collect();
            Some(RetrievalSubst {
                subst: self.subst.clone(),
                stored_to_norm,
                constraints: self.constraints.clone(),
            })
        } else {
            None
        };
        QueryResult {
            clause: datum.clause,
            literal: datum.literal,
            subst,
        }
    }
}

impl<'a> Iterator for TreeRetrieval<'a> {
    type Item = QueryResult;

    fn next(&mut self) -> Option<QueryResult> {
        let tree = self.tree;
        loop {
            if let Some((leaf_node, idx)) = self.leaf {
                let data = match &tree.nodes[leaf_node] {
                    Node::Leaf { data } => data,
                    _ => unreachable!(),
                };
                if idx < data.len() {
                    self.leaf = Some((leaf_node, idx + 1));
                    return Some(self.make_result(&data[idx]));
                }
                self.leaf = None;
            }

            let frame = self.stack.last()?;
            let node = frame.node;
            let mark = frame.mark;
            let constraints_len = frame.constraints_len;
            let bijection_len = frame.bijection_len;

            // Undo the previous edge attempt at this node
            self.subst.backtrack(mark);
            self.constraints.truncate(constraints_len);
            while self.bijection_trail.len() > bijection_len {
                let v = self.bijection_trail.pop().unwrap();
                self.s2q.remove(&v);
            }

            let (svar, children) = match &tree.nodes[node] {
                Node::Inner { svar, children } => (*svar, children),
                Node::Leaf { .. } => unreachable!("leaf frames are not stacked"),
            };
            let next_edge = {
                let frame = self.stack.last_mut().unwrap();
                let i = frame.next_edge;
                frame.next_edge += 1;
                i
            };
            if next_edge >= children.len() {
                self.stack.pop();
                continue;
            }
            let edge = &children[next_edge];

            if !self.try_edge(svar, edge) {
                continue;
            }

            match &tree.nodes[edge.child] {
                Node::Leaf { .. } => {
                    self.leaf = Some((edge.child, 0));
                }
                Node::Inner { .. } => {
                    let mark = self.subst.mark();
                    let constraints_len = self.constraints.len();
                    let bijection_len = self.bijection_trail.len();
                    self.stack.push(Frame {
                        node: edge.child,
                        next_edge: 0,
                        mark,
                        constraints_len,
                        bijection_len,
                    });
                }
            }
        }
    }
}
