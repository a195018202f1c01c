//! Strategy schedules and the strategy-code table.
//!
//! A slice is written `<code>_<tdeci>`: an opaque strategy code plus its
//! decisecond budget. Codes decode to option patches through a fixed table;
//! schedules are ordered lists tuned per problem category.

use super::property::ProblemCategory;
use crate::options::{LiteralSelection, OptionsPatch};

/// First schedule tried for a category
pub fn quick_schedule(category: ProblemCategory) -> &'static [&'static str] {
    match category {
        ProblemCategory::Fof => &["aw11_300", "aw15_300", "lrs2aw11_600", "awall_300"],
        ProblemCategory::Sat => &["awall_300", "aw11_300", "aw15_600"],
        ProblemCategory::Epr => &["aw11_300", "awall_300", "aw51_300"],
    }
}

/// Schedule tried when the quick one fails
pub fn fallback_schedule(category: ProblemCategory) -> &'static [&'static str] {
    match category {
        ProblemCategory::Fof => &["aw51_600", "aw11rl_600", "lrs20aw15_1200"],
        ProblemCategory::Sat => &["a1_600", "aw51_600"],
        ProblemCategory::Epr => &["aw51_600", "w1_600", "aw11rl_600"],
    }
}

/// Decode a strategy code into an options patch. Unknown codes are the
/// caller's error.
pub fn decode_strategy(code: &str) -> Option<OptionsPatch> {
    let patch = match code {
        "aw11" => OptionsPatch {
            age_ratio: Some(1),
            weight_ratio: Some(1),
            ..Default::default()
        },
        "aw15" => OptionsPatch {
            age_ratio: Some(1),
            weight_ratio: Some(5),
            ..Default::default()
        },
        "aw51" => OptionsPatch {
            age_ratio: Some(5),
            weight_ratio: Some(1),
            ..Default::default()
        },
        "a1" => OptionsPatch {
            age_ratio: Some(1),
            weight_ratio: Some(0),
            ..Default::default()
        },
        "w1" => OptionsPatch {
            age_ratio: Some(0),
            weight_ratio: Some(1),
            ..Default::default()
        },
        "awall" => OptionsPatch {
            age_ratio: Some(1),
            weight_ratio: Some(1),
            literal_selection: Some(LiteralSelection::SelectAll),
            ..Default::default()
        },
        "aw11rl" => OptionsPatch {
            age_ratio: Some(1),
            weight_ratio: Some(1),
            reverse_literal_comparison: Some(true),
            ..Default::default()
        },
        "lrs2aw11" => OptionsPatch {
            age_ratio: Some(1),
            weight_ratio: Some(1),
            lrs_first_time_check: Some(2),
            ..Default::default()
        },
        "lrs20aw15" => OptionsPatch {
            age_ratio: Some(1),
            weight_ratio: Some(5),
            lrs_first_time_check: Some(20),
            ..Default::default()
        },
        _ => return None,
    };
    Some(patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_scheduled_code_decodes() {
        for category in [
            ProblemCategory::Fof,
            ProblemCategory::Sat,
            ProblemCategory::Epr,
        ] {
            for slice in quick_schedule(category)
                .iter()
                .chain(fallback_schedule(category))
            {
                let (code, time) = crate::portfolio::get_slice_time(slice).unwrap();
                assert!(time > 0, "{} has no budget", slice);
                assert!(
                    decode_strategy(&code).is_some(),
                    "{} does not decode",
                    code
                );
            }
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert!(decode_strategy("zzz").is_none());
    }
}
