//! Comparison models.
//!
//! A [`ComparisonResult`] ranks the salaried and contractor outcomes on a
//! common monthly basis. A [`ComparisonReport`] wraps it with the optional
//! switch assessment and market benchmarks produced by the engine facade.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{MarketBenchmark, Regime, RegimeResult};

/// The figure both regimes are ranked on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonBasis {
    /// Monthly take-home pay as computed by the regime calculators.
    #[default]
    TakeHome,
    /// Take-home pay adjusted for CLT benefits and PJ provisions.
    BenefitAdjusted,
}

/// Which regime comes out ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advantage {
    /// The salaried net is larger.
    Salaried,
    /// The contractor net is larger.
    Contractor,
    /// The difference is below the configured epsilon.
    Tie,
}

impl From<Regime> for Advantage {
    fn from(regime: Regime) -> Self {
        match regime {
            Regime::Salaried => Advantage::Salaried,
            Regime::Contractor => Advantage::Contractor,
        }
    }
}

/// Monthly value of the benefits a CLT employee receives on top of salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalariedEquivalence {
    /// One twelfth of the net 13th salary.
    pub thirteenth: Decimal,
    /// One twelfth of the one-third vacation bonus.
    pub vacation_bonus: Decimal,
    /// Employer FGTS deposit.
    pub fgts: Decimal,
    /// Other monthly benefits declared by the caller (meal vouchers, health plan).
    pub extra_benefits: Decimal,
}

impl SalariedEquivalence {
    /// Sum of all benefit components.
    pub fn total(&self) -> Decimal {
        self.thirteenth + self.vacation_bonus + self.fgts + self.extra_benefits
    }
}

/// Monthly amounts a contractor must set aside to match CLT protections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractorEquivalence {
    /// Provision for a self-funded 13th payment.
    pub thirteenth_provision: Decimal,
    /// Provision for an unpaid month of vacation.
    pub vacation_provision: Decimal,
}

impl ContractorEquivalence {
    /// Sum of all provisions.
    pub fn total(&self) -> Decimal {
        self.thirteenth_provision + self.vacation_provision
    }
}

/// The adjustments applied under [`ComparisonBasis::BenefitAdjusted`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivalenceAdjustments {
    /// Benefits added to the salaried net.
    pub salaried: SalariedEquivalence,
    /// Provisions subtracted from the contractor net.
    pub contractor: ContractorEquivalence,
}

/// The ranked comparison of both regimes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// The figure the regimes were ranked on.
    pub basis: ComparisonBasis,
    /// The salaried calculation.
    pub salaried: RegimeResult,
    /// The contractor calculation.
    pub contractor: RegimeResult,
    /// Salaried monthly figure on the chosen basis.
    pub salaried_equivalent: Decimal,
    /// Contractor monthly figure on the chosen basis.
    pub contractor_equivalent: Decimal,
    /// Benefit adjustments, present for the benefit-adjusted basis.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub adjustments: Option<EquivalenceAdjustments>,
    /// The regime with the larger monthly figure.
    pub advantage: Advantage,
    /// Absolute difference between the two monthly figures.
    pub delta: Decimal,
}

impl ComparisonResult {
    /// Returns the monthly figure for `regime` on the comparison basis.
    pub fn equivalent_for(&self, regime: Regime) -> Decimal {
        match regime {
            Regime::Salaried => self.salaried_equivalent,
            Regime::Contractor => self.contractor_equivalent,
        }
    }
}

/// Whether switching away from the current regime pays off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchVerdict {
    /// The other regime pays more than the threshold above the current one.
    Favorable,
    /// The other regime pays more than the threshold below the current one.
    Unfavorable,
    /// The difference is within the threshold.
    Equivalent,
}

/// The assessment of moving from the caller's current regime to the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchAssessment {
    /// The regime the caller works under today.
    pub current: Regime,
    /// The regime being considered.
    pub proposed: Regime,
    /// Proposed minus current monthly figure.
    pub difference: Decimal,
    /// The materiality threshold used.
    pub threshold: Decimal,
    /// The verdict.
    pub verdict: SwitchVerdict,
    /// Human-readable explanation.
    pub message: String,
}

/// Everything the engine returns for one comparison request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Effective date of the table set used.
    pub table_version: NaiveDate,
    /// The ranked comparison.
    pub comparison: ComparisonResult,
    /// Present when the request named a current regime.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub switch_assessment: Option<SwitchAssessment>,
    /// Market benchmarks, when reference data matched the request.
    #[serde(default)]
    pub market_benchmarks: Vec<MarketBenchmark>,
    /// One-paragraph summary combining the above.
    pub summary: String,
}
