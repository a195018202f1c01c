//! Engine options and strategy patches.
//!
//! `Options` carries every knob the saturation core recognises. A strategy
//! code from the portfolio decodes to an `OptionsPatch` applied on top of a
//! base configuration.

use crate::error::{ProverError, Result};
use std::path::PathBuf;

/// Literal selection strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralSelection {
    /// Every literal is eligible for inferences
    SelectAll,
    /// Only literals maximal under the ordering are eligible
    SelectMaximal,
}

/// Configuration for one saturation slice
#[derive(Debug, Clone)]
pub struct Options {
    /// Slice budget in deciseconds; 0 means no limit
    pub time_limit_deciseconds: u32,
    /// Overrides the perceived budget for the limited resource strategy
    pub simulated_time_limit: Option<u32>,
    /// Percent of the budget that must elapse before limits may tighten
    pub lrs_first_time_check: u32,
    /// Whether the calculus is complete on this problem
    pub complete: bool,
    /// Passive-heap alternation: picks from the age heap per cycle
    pub age_ratio: u32,
    /// Passive-heap alternation: picks from the weight heap per cycle
    pub weight_ratio: u32,
    /// Override file for KBO function symbol weights
    pub kbo_func_weight_file: Option<PathBuf>,
    /// Override file for KBO predicate symbol weights
    pub kbo_pred_weight_file: Option<PathBuf>,
    /// Toggles the direction of predicate-level comparison
    pub reverse_literal_comparison: bool,
    pub literal_selection: LiteralSelection,
    /// Approximate memory cap for clause storage in MB
    pub memory_limit_mb: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            time_limit_deciseconds: 600,
            simulated_time_limit: None,
            lrs_first_time_check: 5,
            complete: true,
            age_ratio: 1,
            weight_ratio: 1,
            kbo_func_weight_file: None,
            kbo_pred_weight_file: None,
            reverse_literal_comparison: false,
            literal_selection: LiteralSelection::SelectMaximal,
            memory_limit_mb: None,
        }
    }
}

impl Options {
    /// Reject inconsistent combinations before a slice starts.
    pub fn validate(&self) -> Result<()> {
        if self.age_ratio == 0 && self.weight_ratio == 0 {
            return Err(ProverError::User(
                "at least one of age_ratio and weight_ratio must be non-zero".into(),
            ));
        }
        if self.lrs_first_time_check > 100 {
            return Err(ProverError::User(format!(
                "lrs_first_time_check is a percentage, got {}",
                self.lrs_first_time_check
            )));
        }
        Ok(())
    }

    pub fn patched(&self, patch: &OptionsPatch) -> Options {
        let mut opts = self.clone();
        if let Some(v) = patch.age_ratio {
            opts.age_ratio = v;
        }
        if let Some(v) = patch.weight_ratio {
            opts.weight_ratio = v;
        }
        if let Some(v) = patch.lrs_first_time_check {
            opts.lrs_first_time_check = v;
        }
        if let Some(v) = patch.complete {
            opts.complete = v;
        }
        if let Some(v) = patch.reverse_literal_comparison {
            opts.reverse_literal_comparison = v;
        }
        if let Some(v) = patch.literal_selection {
            opts.literal_selection = v;
        }
        opts
    }
}

/// Partial options produced by decoding a strategy code
#[derive(Debug, Clone, Default)]
pub struct OptionsPatch {
    pub age_ratio: Option<u32>,
    pub weight_ratio: Option<u32>,
    pub lrs_first_time_check: Option<u32>,
    pub complete: Option<bool>,
    pub reverse_literal_comparison: Option<bool>,
    pub literal_selection: Option<LiteralSelection>,
}
