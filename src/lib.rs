//! resolute: a saturation-based first-order reasoning engine.
//!
//! The core is the given-clause algorithm with a limited resource strategy,
//! ordered resolution and unit superposition under a Knuth-Bendix ordering,
//! substitution-tree literal indexing, and a portfolio scheduler that
//! multiplexes strategy slices under a global wall clock.

pub mod error;
pub mod index;
pub mod logic;
pub mod options;
pub mod ordering;
pub mod portfolio;
pub mod problem;
pub mod rebalance;
pub mod saturation;
pub mod timer;

pub use error::{ProverError, Result};
pub use index::{LiteralIndex, QueryResult, RetrievalSubst};
pub use logic::{
    Clause, ClauseArena, InferenceKind, LiteralBank, LiteralId, Proof, ProofStep, Signature,
    SliceContext, StoreTag, TermBank, TermId,
};
pub use options::{LiteralSelection, Options, OptionsPatch};
pub use ordering::{DemodulatorChecks, EqSide, Kbo, KboWeightMap, Precedence, TermOrder};
pub use portfolio::{get_slice_time, Portfolio, ProblemCategory, Property};
pub use problem::{InputClause, InputLiteral, InputTerm, ProblemCnf};
pub use rebalance::{can_invert_top, invert_top, InversionContext};
pub use saturation::{saturate, SaturationResult, SaturationStats};
pub use timer::{CancellationToken, SliceTimer};
