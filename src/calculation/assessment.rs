//! Switch assessment and comparison summaries.

use rust_decimal::Decimal;

use super::format_brl;
use crate::models::{Advantage, ComparisonBasis, ComparisonResult, Regime, SwitchAssessment, SwitchVerdict};

/// Assesses whether moving from `current` to the other regime pays off.
///
/// The difference is the other regime's equivalent minus the current one.
/// It must exceed `threshold` in either direction to be material.
///
/// # Examples
///
/// A CLT employee offered a PJ contract that nets R$ 1.618,46 more per month
/// gets a [`SwitchVerdict::Favorable`] assessment with the default R$ 200,00
/// threshold.
pub fn assess_switch(
    comparison: &ComparisonResult,
    current: Regime,
    threshold: Decimal,
) -> SwitchAssessment {
    let proposed = current.other();
    let difference = comparison.equivalent_for(proposed) - comparison.equivalent_for(current);

    let verdict = if difference > threshold {
        SwitchVerdict::Favorable
    } else if difference < -threshold {
        SwitchVerdict::Unfavorable
    } else {
        SwitchVerdict::Equivalent
    };

    let message = match verdict {
        SwitchVerdict::Favorable => format!(
            "Switching from {} to {} adds {} per month. The switch is financially worthwhile.",
            current.label(),
            proposed.label(),
            format_brl(difference)
        ),
        SwitchVerdict::Unfavorable => format!(
            "Switching from {} to {} loses {} per month. Accepting it would be a pay cut.",
            current.label(),
            proposed.label(),
            format_brl(difference.abs())
        ),
        SwitchVerdict::Equivalent => format!(
            "Switching from {} to {} changes monthly income by {}, within the {} margin. Weigh the non-financial factors.",
            current.label(),
            proposed.label(),
            format_brl(difference),
            format_brl(threshold)
        ),
    };

    SwitchAssessment {
        current,
        proposed,
        difference,
        threshold,
        verdict,
        message,
    }
}

/// Describes a comparison in one sentence.
pub fn summarize(comparison: &ComparisonResult) -> String {
    let basis = match comparison.basis {
        ComparisonBasis::TakeHome => "take-home pay",
        ComparisonBasis::BenefitAdjusted => "benefit-adjusted value",
    };

    let winner = match comparison.advantage {
        Advantage::Salaried => Regime::Salaried,
        Advantage::Contractor => Regime::Contractor,
        Advantage::Tie => {
            return format!(
                "CLT and PJ are equivalent on {}: {} vs {} per month.",
                basis,
                format_brl(comparison.salaried_equivalent),
                format_brl(comparison.contractor_equivalent)
            );
        }
    };

    format!(
        "{} comes out ahead on {} by {} per month ({} vs {}).",
        winner.label(),
        basis,
        format_brl(comparison.delta),
        format_brl(comparison.equivalent_for(winner)),
        format_brl(comparison.equivalent_for(winner.other()))
    )
}
