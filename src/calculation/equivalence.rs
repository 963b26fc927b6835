//! Benefit-adjusted equivalent values.
//!
//! A CLT employee receives a 13th salary, a one-third vacation bonus and an
//! FGTS deposit on top of the monthly net. A PJ contractor receives none of
//! these and has to set money aside for the months without revenue. Spreading
//! both over twelve months puts the two regimes on the same footing.

use rust_decimal::Decimal;

use super::{check_amount, round_half_up};
use crate::config::ComparisonSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ComparisonBasis, ContractorEquivalence, EquivalenceAdjustments, RegimeResult,
    SalariedEquivalence,
};

/// Monthly equivalents of both regimes on a given basis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalentValues {
    /// The salaried monthly equivalent.
    pub salaried: Decimal,
    /// The contractor monthly equivalent.
    pub contractor: Decimal,
    /// The components applied, for the benefit-adjusted basis.
    pub adjustments: Option<EquivalenceAdjustments>,
}

/// Computes the monthly value of CLT benefits.
///
/// * 13th salary: net / 12
/// * Vacation bonus: net / 36 (one third of a salary per year)
/// * FGTS: gross × FGTS rate
/// * Extra benefits (meal vouchers, health plan) as given
pub fn salaried_equivalence(
    result: &RegimeResult,
    fgts_rate: Decimal,
    extra_benefits: Decimal,
) -> SalariedEquivalence {
    SalariedEquivalence {
        thirteenth: round_half_up(result.net_amount / Decimal::from(12)),
        vacation_bonus: round_half_up(result.net_amount / Decimal::from(36)),
        fgts: round_half_up(result.gross_amount * fgts_rate),
        extra_benefits: round_half_up(extra_benefits),
    }
}

/// Computes what a contractor should set aside each month to fund a 13th
/// salary and a paid month of vacation.
pub fn contractor_equivalence(result: &RegimeResult) -> ContractorEquivalence {
    let provision = round_half_up(result.net_amount / Decimal::from(12));
    ContractorEquivalence {
        thirteenth_provision: provision,
        vacation_provision: provision,
    }
}

/// Computes both equivalents on the requested basis.
///
/// On [`ComparisonBasis::TakeHome`] the equivalents are the nets themselves.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if `extra_benefits` is negative or
/// exceeds [`MAX_MONTHLY_AMOUNT`](super::MAX_MONTHLY_AMOUNT).
pub fn equivalent_values(
    basis: ComparisonBasis,
    salaried: &RegimeResult,
    contractor: &RegimeResult,
    settings: &ComparisonSettings,
    extra_benefits: Decimal,
) -> EngineResult<EquivalentValues> {
    if extra_benefits < Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: "extra_benefits".to_string(),
            message: format!("must not be negative, got {}", extra_benefits),
        });
    }
    let extra_benefits = check_amount("extra_benefits", extra_benefits)?;

    match basis {
        ComparisonBasis::TakeHome => Ok(EquivalentValues {
            salaried: salaried.net_amount,
            contractor: contractor.net_amount,
            adjustments: None,
        }),
        ComparisonBasis::BenefitAdjusted => {
            let salaried_adjustment =
                salaried_equivalence(salaried, settings.fgts_rate, extra_benefits);
            let contractor_adjustment = contractor_equivalence(contractor);

            Ok(EquivalentValues {
                salaried: salaried.net_amount + salaried_adjustment.total(),
                contractor: contractor.net_amount - contractor_adjustment.total(),
                adjustments: Some(EquivalenceAdjustments {
                    salaried: salaried_adjustment,
                    contractor: contractor_adjustment,
                }),
            })
        }
    }
}
