//! Hash-consed literals.
//!
//! Like terms, literals are interned: a `LiteralId` identifies a
//! (predicate, polarity, arguments) triple uniquely within a slice.
//! Equality literals use the reserved equality predicate.

use crate::logic::signature::{PredicateId, Signature, EQUALITY};
use crate::logic::term::{TermBank, TermDisplay, TermId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// ID of an interned literal
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LiteralId(pub(crate) u32);

impl LiteralId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LiteralKey {
    predicate: PredicateId,
    polarity: bool,
    args: Vec<TermId>,
}

#[derive(Debug, Clone)]
struct LiteralEntry {
    key: LiteralKey,
    weight: u32,
    ground: bool,
}

/// Interning arena for literals
#[derive(Debug, Clone, Default)]
pub struct LiteralBank {
    entries: Vec<LiteralEntry>,
    lookup: HashMap<LiteralKey, u32>,
}

impl LiteralBank {
    pub fn new() -> Self {
        LiteralBank::default()
    }

    /// Intern a literal. Panics on arity mismatch (a caller bug).
    pub fn mk_literal(
        &mut self,
        sig: &Signature,
        bank: &TermBank,
        predicate: PredicateId,
        polarity: bool,
        args: Vec<TermId>,
    ) -> LiteralId {
        assert_eq!(
            sig.predicate(predicate).arity as usize,
            args.len(),
            "arity mismatch constructing literal {}",
            sig.predicate(predicate).name
        );
        let weight = 1 + args.iter().map(|&a| bank.weight(a)).sum::<u32>();
        let ground = args.iter().all(|&a| bank.is_ground(a));
        let key = LiteralKey {
            predicate,
            polarity,
            args,
        };
        if let Some(&id) = self.lookup.get(&key) {
            return LiteralId(id);
        }
        let id = self.entries.len() as u32;
        self.entries.push(LiteralEntry {
            key: key.clone(),
            weight,
            ground,
        });
        self.lookup.insert(key, id);
        LiteralId(id)
    }

    /// Intern an equality literal
    pub fn mk_equality(
        &mut self,
        sig: &Signature,
        bank: &TermBank,
        polarity: bool,
        lhs: TermId,
        rhs: TermId,
    ) -> LiteralId {
        self.mk_literal(sig, bank, EQUALITY, polarity, vec![lhs, rhs])
    }

    /// The literal with opposite polarity
    pub fn complement(&mut self, sig: &Signature, bank: &TermBank, lit: LiteralId) -> LiteralId {
        let entry = &self.entries[lit.0 as usize];
        let predicate = entry.key.predicate;
        let polarity = !entry.key.polarity;
        let args = entry.key.args.clone();
        self.mk_literal(sig, bank, predicate, polarity, args)
    }

    pub fn predicate(&self, lit: LiteralId) -> PredicateId {
        self.entries[lit.0 as usize].key.predicate
    }

    pub fn polarity(&self, lit: LiteralId) -> bool {
        self.entries[lit.0 as usize].key.polarity
    }

    pub fn args(&self, lit: LiteralId) -> &[TermId] {
        &self.entries[lit.0 as usize].key.args
    }

    pub fn is_equality(&self, lit: LiteralId) -> bool {
        self.predicate(lit) == EQUALITY
    }

    pub fn is_positive_equality(&self, lit: LiteralId) -> bool {
        self.is_equality(lit) && self.polarity(lit)
    }

    /// Cached weight: predicate symbol plus argument weights
    pub fn weight(&self, lit: LiteralId) -> u32 {
        self.entries[lit.0 as usize].weight
    }

    pub fn is_ground(&self, lit: LiteralId) -> bool {
        self.entries[lit.0 as usize].ground
    }

    /// Variable occurrence multiset across all arguments
    pub fn vars_of(&self, bank: &TermBank, lit: LiteralId) -> HashMap<u32, u32> {
        let mut counts = HashMap::new();
        for &a in self.args(lit) {
            bank.count_vars(a, &mut counts);
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Display wrapper resolving names through the signature
pub struct LiteralDisplay<'a> {
    pub bank: &'a TermBank,
    pub literals: &'a LiteralBank,
    pub sig: &'a Signature,
    pub literal: LiteralId,
}

impl<'a> fmt::Display for LiteralDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lit = self.literal;
        let args = self.literals.args(lit);
        if self.literals.is_equality(lit) {
            let op = if self.literals.polarity(lit) { "=" } else { "!=" };
            return write!(
                f,
                "{} {} {}",
                TermDisplay {
                    bank: self.bank,
                    sig: self.sig,
                    term: args[0]
                },
                op,
                TermDisplay {
                    bank: self.bank,
                    sig: self.sig,
                    term: args[1]
                }
            );
        }
        if !self.literals.polarity(lit) {
            write!(f, "~")?;
        }
        write!(f, "{}", self.sig.predicate(self.literals.predicate(lit)).name)?;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_interning() {
        let mut sig = Signature::new();
        let mut bank = TermBank::new();
        let mut lits = LiteralBank::new();

        let p = sig.intern_predicate("p", 1);
        let a = sig.intern_function("a", 0);
        let ta = bank.mk_const(&sig, a);

        let l1 = lits.mk_literal(&sig, &bank, p, true, vec![ta]);
        let l2 = lits.mk_literal(&sig, &bank, p, true, vec![ta]);
        let l3 = lits.mk_literal(&sig, &bank, p, false, vec![ta]);

        assert_eq!(l1, l2);
        assert_ne!(l1, l3);
        assert_eq!(lits.complement(&sig, &bank, l1), l3);
        assert_eq!(lits.weight(l1), 2);
        assert!(lits.is_ground(l1));
    }

    #[test]
    fn test_equality_literal() {
        let mut sig = Signature::new();
        let mut bank = TermBank::new();
        let mut lits = LiteralBank::new();

        let a = sig.intern_function("a", 0);
        let ta = bank.mk_const(&sig, a);
        let x = bank.mk_var(0);

        let eq = lits.mk_equality(&sig, &bank, true, ta, x);
        assert!(lits.is_equality(eq));
        assert!(lits.is_positive_equality(eq));
        assert!(!lits.is_ground(eq));

        let neq = lits.mk_equality(&sig, &bank, false, ta, x);
        assert!(!lits.is_positive_equality(neq));
    }
}
