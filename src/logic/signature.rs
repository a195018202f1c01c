//! Function and predicate symbol tables.
//!
//! Symbols are interned by (name, arity) and referred to by copyable ids.
//! The table also records theory interpretations (numeric operations, array
//! store/select, numeral constants) and term-algebra constructor metadata,
//! which the rebalancing inverters consult.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// ID of an interned function symbol
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionId(pub(crate) u32);

/// ID of an interned predicate symbol
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PredicateId(pub(crate) u32);

impl FunctionId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl PredicateId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

impl fmt::Display for PredicateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Numeric sorts with interpreted arithmetic
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumSort {
    Int,
    Rat,
    Real,
}

/// An interpreted numeral constant.
///
/// Rationals and reals are kept as exact fractions; no floating point enters
/// the term language.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Numeral {
    Int(i64),
    Rat(i64, u64),
    Real(i64, u64),
}

impl Numeral {
    pub fn sort(&self) -> NumSort {
        match self {
            Numeral::Int(_) => NumSort::Int,
            Numeral::Rat(..) => NumSort::Rat,
            Numeral::Real(..) => NumSort::Real,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Numeral::Int(n) => *n == 0,
            Numeral::Rat(n, _) | Numeral::Real(n, _) => *n == 0,
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            Numeral::Int(n) => *n == 1,
            Numeral::Rat(n, d) | Numeral::Real(n, d) => *n == 1 && *d == 1,
        }
    }

    pub fn is_minus_one(&self) -> bool {
        match self {
            Numeral::Int(n) => *n == -1,
            Numeral::Rat(n, d) | Numeral::Real(n, d) => *n == -1 && *d == 1,
        }
    }
}

impl fmt::Display for Numeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeral::Int(n) => write!(f, "{}", n),
            Numeral::Rat(n, d) | Numeral::Real(n, d) => write!(f, "{}/{}", n, d),
        }
    }
}

/// Theory interpretation of a function symbol
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interpretation {
    Add(NumSort),
    /// Unary minus
    Minus(NumSort),
    Mul(NumSort),
    Div(NumSort),
    /// The constant 1 of the sort
    One(NumSort),
    ArrayStore,
    ArraySelect,
    Numeral(Numeral),
}

impl Interpretation {
    fn arity(&self) -> u8 {
        match self {
            Interpretation::Add(_) | Interpretation::Mul(_) | Interpretation::Div(_) => 2,
            Interpretation::Minus(_) => 1,
            Interpretation::One(_) | Interpretation::Numeral(_) => 0,
            Interpretation::ArrayStore => 3,
            Interpretation::ArraySelect => 2,
        }
    }

    fn canonical_name(&self) -> String {
        let sort_tag = |s: &NumSort| match s {
            NumSort::Int => "int",
            NumSort::Rat => "rat",
            NumSort::Real => "real",
        };
        match self {
            Interpretation::Add(s) => format!("$sum_{}", sort_tag(s)),
            Interpretation::Minus(s) => format!("$uminus_{}", sort_tag(s)),
            Interpretation::Mul(s) => format!("$product_{}", sort_tag(s)),
            Interpretation::Div(s) => format!("$quotient_{}", sort_tag(s)),
            Interpretation::One(s) => format!("$one_{}", sort_tag(s)),
            Interpretation::ArrayStore => "$store".into(),
            Interpretation::ArraySelect => "$select".into(),
            Interpretation::Numeral(n) => format!("${}", n),
        }
    }
}

/// Entry for one function symbol
#[derive(Debug, Clone)]
pub struct FunctionEntry {
    pub name: String,
    pub arity: u8,
    pub interpretation: Option<Interpretation>,
    /// True for term-algebra constructors
    pub term_algebra_cons: bool,
    /// Per-argument destructor functions of a term-algebra constructor
    pub destructors: Vec<FunctionId>,
    /// True for symbols introduced during proof search (they take the
    /// dedicated introduced KBO weight)
    pub introduced: bool,
}

/// Entry for one predicate symbol
#[derive(Debug, Clone)]
pub struct PredicateEntry {
    pub name: String,
    pub arity: u8,
    pub introduced: bool,
}

/// Interned symbol tables for one slice.
///
/// Predicate id 0 is always equality. The table is append-only while a
/// slice runs; the portfolio builds a fresh one per slice.
#[derive(Debug, Clone)]
pub struct Signature {
    functions: Vec<FunctionEntry>,
    predicates: Vec<PredicateEntry>,
    function_lookup: HashMap<(String, u8), u32>,
    predicate_lookup: HashMap<(String, u8), u32>,
    interpreted: HashMap<Interpretation, FunctionId>,
    /// Set once problem loading is done; later symbols count as introduced
    frozen: bool,
}

/// The reserved equality predicate
pub const EQUALITY: PredicateId = PredicateId(0);

impl Signature {
    pub fn new() -> Self {
        let mut sig = Signature {
            functions: Vec::new(),
            predicates: Vec::new(),
            function_lookup: HashMap::new(),
            predicate_lookup: HashMap::new(),
            interpreted: HashMap::new(),
            frozen: false,
        };
        let eq = sig.intern_predicate("=", 2);
        debug_assert_eq!(eq, EQUALITY);
        sig
    }

    /// Intern a function symbol (get-or-create)
    pub fn intern_function(&mut self, name: &str, arity: u8) -> FunctionId {
        if let Some(&id) = self.function_lookup.get(&(name.to_string(), arity)) {
            return FunctionId(id);
        }
        let id = self.functions.len() as u32;
        self.functions.push(FunctionEntry {
            name: name.to_string(),
            arity,
            interpretation: None,
            term_algebra_cons: false,
            destructors: Vec::new(),
            introduced: self.frozen,
        });
        self.function_lookup.insert((name.to_string(), arity), id);
        FunctionId(id)
    }

    /// Intern a predicate symbol (get-or-create)
    pub fn intern_predicate(&mut self, name: &str, arity: u8) -> PredicateId {
        if let Some(&id) = self.predicate_lookup.get(&(name.to_string(), arity)) {
            return PredicateId(id);
        }
        let id = self.predicates.len() as u32;
        self.predicates.push(PredicateEntry {
            name: name.to_string(),
            arity,
            introduced: self.frozen,
        });
        self.predicate_lookup.insert((name.to_string(), arity), id);
        PredicateId(id)
    }

    /// Get or create the symbol carrying a theory interpretation
    pub fn interpreted_function(&mut self, interp: Interpretation) -> FunctionId {
        if let Some(&id) = self.interpreted.get(&interp) {
            return id;
        }
        let id = self.intern_function(&interp.canonical_name(), interp.arity());
        self.functions[id.0 as usize].interpretation = Some(interp);
        self.interpreted.insert(interp, id);
        id
    }

    /// The symbol for an interpretation, if it was ever interned
    pub fn find_interpreted(&self, interp: Interpretation) -> Option<FunctionId> {
        self.interpreted.get(&interp).copied()
    }

    pub fn numeral(&mut self, n: Numeral) -> FunctionId {
        self.interpreted_function(Interpretation::Numeral(n))
    }

    /// Register a term-algebra constructor with its per-position destructors.
    ///
    /// Destructor count must match the constructor arity.
    pub fn register_term_algebra(&mut self, ctor: FunctionId, destructors: Vec<FunctionId>) {
        let entry = &mut self.functions[ctor.0 as usize];
        assert_eq!(
            entry.arity as usize,
            destructors.len(),
            "destructor count must match constructor arity"
        );
        entry.term_algebra_cons = true;
        entry.destructors = destructors;
    }

    /// Stop treating new symbols as problem symbols
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn function(&self, id: FunctionId) -> &FunctionEntry {
        &self.functions[id.0 as usize]
    }

    pub fn predicate(&self, id: PredicateId) -> &PredicateEntry {
        &self.predicates[id.0 as usize]
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    pub fn get_function(&self, name: &str, arity: u8) -> Option<FunctionId> {
        self.function_lookup
            .get(&(name.to_string(), arity))
            .map(|&id| FunctionId(id))
    }

    pub fn get_predicate(&self, name: &str, arity: u8) -> Option<PredicateId> {
        self.predicate_lookup
            .get(&(name.to_string(), arity))
            .map(|&id| PredicateId(id))
    }

    /// Numeral value of a symbol, if it is one
    pub fn as_numeral(&self, id: FunctionId) -> Option<Numeral> {
        match self.function(id).interpretation {
            Some(Interpretation::Numeral(n)) => Some(n),
            _ => None,
        }
    }

    pub fn is_interpreted(&self, id: FunctionId) -> bool {
        self.function(id).interpretation.is_some()
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::new()
    }
}
