//! Saturation: containers, inferences, simplification, and the LRS loop.

pub mod containers;
pub mod inferences;
pub mod limits;
pub mod lrs;
pub mod passive;
pub mod simplify;

pub use limits::Limits;
pub use lrs::{LrsSaturation, SaturationStats};
pub use passive::PassiveContainer;

use crate::error::Result;
use crate::logic::{LiteralId, Proof, SliceContext};
use crate::options::Options;
use crate::ordering::Kbo;
use crate::timer::SliceTimer;

/// Verdict of one saturation slice
#[derive(Debug)]
pub enum SaturationResult {
    /// The empty clause was derived
    Refutation(Proof),
    /// Saturated under a complete calculus
    Satisfiable,
    /// Saturated, but completeness was lost on the way
    RefutationNotFound,
    TimeLimit,
    MemoryLimit,
    Unknown,
}

impl SaturationResult {
    pub fn name(&self) -> &'static str {
        match self {
            SaturationResult::Refutation(_) => "refutation",
            SaturationResult::Satisfiable => "satisfiable",
            SaturationResult::RefutationNotFound => "refutation not found",
            SaturationResult::TimeLimit => "time limit",
            SaturationResult::MemoryLimit => "memory limit",
            SaturationResult::Unknown => "unknown",
        }
    }

    /// Did this slice settle the problem?
    pub fn is_conclusive(&self) -> bool {
        matches!(
            self,
            SaturationResult::Refutation(_) | SaturationResult::Satisfiable
        )
    }
}

/// Run one saturation slice over already-interned clauses.
pub fn saturate(
    ctx: &mut SliceContext,
    clauses: Vec<Vec<LiteralId>>,
    opts: &Options,
    timer: &SliceTimer,
) -> Result<(SaturationResult, SaturationStats)> {
    opts.validate()?;
    let kbo = Kbo::from_options(&ctx.sig, opts)?;
    let saturation = LrsSaturation::new(ctx, opts, timer, kbo, clauses);
    Ok(saturation.run())
}
