//! Core first-order data model: signature, hash-consed terms and literals,
//! clauses, and scoped substitutions.

pub mod clause;
pub mod literal;
pub mod signature;
pub mod substitution;
pub mod term;

pub use clause::{clause_to_string, Clause, ClauseArena, InferenceKind, Proof, ProofStep, StoreTag};
pub use literal::{LiteralBank, LiteralDisplay, LiteralId};
pub use signature::{
    FunctionId, Interpretation, NumSort, Numeral, PredicateId, Signature, EQUALITY,
};
pub use substitution::{ScopedVar, Substitution, VarRenamer};
pub use term::{TermBank, TermDisplay, TermId, TermView};

/// Everything one strategy slice owns: the symbol tables and both interning
/// banks. Threaded explicitly through the engine; nothing reads globals.
#[derive(Debug, Default)]
pub struct SliceContext {
    pub sig: Signature,
    pub terms: TermBank,
    pub literals: LiteralBank,
}

impl SliceContext {
    pub fn new() -> Self {
        SliceContext {
            sig: Signature::new(),
            terms: TermBank::new(),
            literals: LiteralBank::new(),
        }
    }

    /// Render a literal for logs and proofs
    pub fn literal_to_string(&self, lit: LiteralId) -> String {
        format!(
            "{}",
            LiteralDisplay {
                bank: &self.terms,
                literals: &self.literals,
                sig: &self.sig,
                literal: lit
            }
        )
    }

    /// Render a term for logs and proofs
    pub fn term_to_string(&self, t: TermId) -> String {
        format!(
            "{}",
            TermDisplay {
                bank: &self.terms,
                sig: &self.sig,
                term: t
            }
        )
    }
}
