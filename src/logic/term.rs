//! Hash-consed first-order terms.
//!
//! All terms of a slice live in one `TermBank`. Structurally equal terms
//! receive the same `TermId`, so equality is id equality and shared subterms
//! are stored once. Each entry caches its symbol-count weight and a ground
//! bit, both computed from child caches at interning time.

use crate::logic::signature::{FunctionId, Signature};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// ID of an interned term
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TermId(pub(crate) u32);

impl TermId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Structural key of a term, used for interning
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum TermKey {
    Var(u32),
    App(FunctionId, Vec<TermId>),
}

#[derive(Debug, Clone)]
struct TermEntry {
    key: TermKey,
    weight: u32,
    ground: bool,
}

/// A borrowed view of one term level
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TermView<'a> {
    Var(u32),
    App(FunctionId, &'a [TermId]),
}

/// Interning arena for terms
#[derive(Debug, Clone, Default)]
pub struct TermBank {
    entries: Vec<TermEntry>,
    lookup: HashMap<TermKey, u32>,
}

impl TermBank {
    pub fn new() -> Self {
        TermBank::default()
    }

    /// Intern a variable
    pub fn mk_var(&mut self, var: u32) -> TermId {
        self.intern(TermKey::Var(var), 1, false)
    }

    /// Intern a compound term. Panics on arity mismatch (a caller bug).
    pub fn mk_app(&mut self, sig: &Signature, f: FunctionId, args: Vec<TermId>) -> TermId {
        assert_eq!(
            sig.function(f).arity as usize,
            args.len(),
            "arity mismatch constructing {}",
            sig.function(f).name
        );
        let weight = 1 + args.iter().map(|&a| self.weight(a)).sum::<u32>();
        let ground = args.iter().all(|&a| self.is_ground(a));
        self.intern(TermKey::App(f, args), weight, ground)
    }

    /// Intern a constant (nullary application)
    pub fn mk_const(&mut self, sig: &Signature, f: FunctionId) -> TermId {
        self.mk_app(sig, f, Vec::new())
    }

    fn intern(&mut self, key: TermKey, weight: u32, ground: bool) -> TermId {
        if let Some(&id) = self.lookup.get(&key) {
            return TermId(id);
        }
        let id = self.entries.len() as u32;
        self.entries.push(TermEntry {
            key: key.clone(),
            weight,
            ground,
        });
        self.lookup.insert(key, id);
        TermId(id)
    }

    pub fn view(&self, t: TermId) -> TermView<'_> {
        match &self.entries[t.0 as usize].key {
            TermKey::Var(v) => TermView::Var(*v),
            TermKey::App(f, args) => TermView::App(*f, args),
        }
    }

    /// Cached symbol-count weight (variables and symbols count 1)
    pub fn weight(&self, t: TermId) -> u32 {
        self.entries[t.0 as usize].weight
    }

    /// Cached ground bit
    pub fn is_ground(&self, t: TermId) -> bool {
        self.entries[t.0 as usize].ground
    }

    pub fn is_var(&self, t: TermId) -> bool {
        matches!(self.view(t), TermView::Var(_))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Multiset of variable occurrences
    pub fn vars_of(&self, t: TermId) -> HashMap<u32, u32> {
        let mut counts = HashMap::new();
        self.count_vars(t, &mut counts);
        counts
    }

    pub(crate) fn count_vars(&self, t: TermId, counts: &mut HashMap<u32, u32>) {
        match self.view(t) {
            TermView::Var(v) => *counts.entry(v).or_insert(0) += 1,
            TermView::App(_, args) => {
                for &a in args {
                    self.count_vars(a, counts);
                }
            }
        }
    }

    /// Does variable `v` occur in `t`?
    pub fn contains_var(&self, t: TermId, v: u32) -> bool {
        if self.is_ground(t) {
            return false;
        }
        match self.view(t) {
            TermView::Var(w) => w == v,
            TermView::App(_, args) => args.iter().any(|&a| self.contains_var(a, v)),
        }
    }

    /// All subterms of `t` including `t` itself, in preorder, deduplicated.
    pub fn subterms(&self, t: TermId) -> Vec<TermId> {
        let mut out = Vec::new();
        let mut seen = std::collections::HashSet::new();
        self.collect_subterms(t, &mut out, &mut seen);
        out
    }

    fn collect_subterms(
        &self,
        t: TermId,
        out: &mut Vec<TermId>,
        seen: &mut std::collections::HashSet<TermId>,
    ) {
        if !seen.insert(t) {
            return;
        }
        out.push(t);
        if let TermView::App(_, args) = self.view(t) {
            for &a in args {
                self.collect_subterms(a, out, seen);
            }
        }
    }

    /// Replace every occurrence of subterm `from` in `t` by `to`.
    pub fn replace(&mut self, sig: &Signature, t: TermId, from: TermId, to: TermId) -> TermId {
        let mut memo = HashMap::new();
        self.replace_memo(sig, t, from, to, &mut memo)
    }

    fn replace_memo(
        &mut self,
        sig: &Signature,
        t: TermId,
        from: TermId,
        to: TermId,
        memo: &mut HashMap<TermId, TermId>,
    ) -> TermId {
        if t == from {
            return to;
        }
        if let Some(&r) = memo.get(&t) {
            return r;
        }
        let result = match self.view(t) {
            TermView::Var(_) => t,
            TermView::App(f, args) => {
                let args: Vec<TermId> = args.to_vec();
                let new_args: Vec<TermId> = args
                    .iter()
                    .map(|&a| self.replace_memo(sig, a, from, to, memo))
                    .collect();
                if new_args == args {
                    t
                } else {
                    self.mk_app(sig, f, new_args)
                }
            }
        };
        memo.insert(t, result);
        result
    }
}

/// Display wrapper resolving symbol names through the signature
pub struct TermDisplay<'a> {
    pub bank: &'a TermBank,
    pub sig: &'a Signature,
    pub term: TermId,
}

impl<'a> fmt::Display for TermDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bank.view(self.term) {
            TermView::Var(v) => write!(f, "X{}", v),
            TermView::App(func, args) => {
                write!(f, "{}", self.sig.function(func).name)?;
                if !args.is_empty() {
                    write!(f, "(")?;
                    for (i, &arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(
                            f,
                            "{}",
                            TermDisplay {
                                bank: self.bank,
                                sig: self.sig,
                                term: arg
                            }
                        )?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}
