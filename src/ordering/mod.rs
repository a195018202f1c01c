//! Term and literal ordering.
//!
//! The engine's single simplification ordering is KBO; the compiled
//! demodulator checks in `demodulator` answer the common "is this instance
//! still oriented?" question without a full comparison.

pub mod demodulator;
pub mod kbo;


pub use demodulator::{DemodulatorChecks, EqSide, Instruction};
pub use kbo::{Kbo, KboAdmissibilityIssue, KboWeight, KboWeightMap, Precedence, SpecialWeights};

/// Result of comparing two terms or literals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermOrder {
    Greater,
    Less,
    Equal,
    Incomparable,
}

impl TermOrder {
    pub fn reverse(self) -> TermOrder {
        match self {
            TermOrder::Greater => TermOrder::Less,
            TermOrder::Less => TermOrder::Greater,
            other => other,
        }
    }
}
