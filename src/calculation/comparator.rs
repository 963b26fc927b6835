//! Regime comparison.
//!
//! Both regimes are calculated from monthly gross figures and ranked by
//! their monthly equivalent. Ranking does not depend on argument order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    ContractorOptions, SalariedOptions, calculate_contractor, calculate_salaried,
    equivalent_values,
};
use crate::config::{ComparisonSettings, TableSet};
use crate::error::{EngineError, EngineResult};
use crate::models::{Advantage, ComparisonBasis, ComparisonResult, GrossIncome, Regime, RegimeResult};

/// Everything needed to compare the two regimes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonInput {
    /// Monthly CLT gross salary.
    pub salaried_gross: Decimal,
    /// Monthly PJ gross revenue.
    pub contractor_gross: Decimal,
    /// Options for the salaried calculation.
    #[serde(default)]
    pub salaried: SalariedOptions,
    /// Options for the contractor calculation.
    #[serde(default)]
    pub contractor: ContractorOptions,
    /// Monthly value of CLT benefits such as meal vouchers.
    #[serde(default)]
    pub extra_benefits: Decimal,
    /// The basis the regimes are ranked on.
    #[serde(default)]
    pub basis: ComparisonBasis,
}

impl ComparisonInput {
    /// Creates an input with default options and the take-home basis.
    pub fn new(salaried_gross: Decimal, contractor_gross: Decimal) -> Self {
        Self {
            salaried_gross,
            contractor_gross,
            salaried: SalariedOptions::default(),
            contractor: ContractorOptions::default(),
            extra_benefits: Decimal::ZERO,
            basis: ComparisonBasis::TakeHome,
        }
    }
}

/// Compares a CLT salary with a PJ revenue on the take-home basis.
///
/// # Errors
///
/// Returns [`EngineError::NegativeGross`] if either amount is negative.
///
/// # Examples
///
/// ```no_run
/// use tradupay_engine::calculation::compare;
/// use tradupay_engine::config::ConfigLoader;
/// use tradupay_engine::models::Advantage;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/brazil").unwrap();
/// let result = compare(
///     Decimal::new(10000, 0),
///     Decimal::new(10000, 0),
///     loader.latest_table_set(),
///     loader.comparison_settings(),
/// )
/// .unwrap();
/// assert_eq!(result.advantage, Advantage::Contractor);
/// ```
pub fn compare(
    salaried_gross: Decimal,
    contractor_gross: Decimal,
    tables: &TableSet,
    settings: &ComparisonSettings,
) -> EngineResult<ComparisonResult> {
    compare_with(
        &ComparisonInput::new(salaried_gross, contractor_gross),
        tables,
        settings,
    )
}

/// Compares two incomes given in either order.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] unless exactly one income is
/// salaried and the other is a contractor revenue.
pub fn compare_incomes(
    first: GrossIncome,
    second: GrossIncome,
    tables: &TableSet,
    settings: &ComparisonSettings,
) -> EngineResult<ComparisonResult> {
    let (salaried, contractor) = match (first.regime, second.regime) {
        (Regime::Salaried, Regime::Contractor) => (first, second),
        (Regime::Contractor, Regime::Salaried) => (second, first),
        (regime, _) => {
            return Err(EngineError::InvalidInput {
                field: "regime".to_string(),
                message: format!("both incomes are {}; one of each regime is required", regime),
            });
        }
    };

    compare(salaried.amount, contractor.amount, tables, settings)
}

/// Compares the two regimes with explicit options.
pub fn compare_with(
    input: &ComparisonInput,
    tables: &TableSet,
    settings: &ComparisonSettings,
) -> EngineResult<ComparisonResult> {
    let salaried = calculate_salaried(input.salaried_gross, tables, &input.salaried)?;
    let contractor = calculate_contractor(input.contractor_gross, tables, &input.contractor)?;

    let values = equivalent_values(
        input.basis,
        &salaried,
        &contractor,
        settings,
        input.extra_benefits,
    )?;

    let (advantage, delta) = rank_values(
        (Regime::Salaried, values.salaried),
        (Regime::Contractor, values.contractor),
        settings.tie_epsilon,
    );

    debug!(
        basis = ?input.basis,
        salaried = %values.salaried,
        contractor = %values.contractor,
        advantage = ?advantage,
        delta = %delta,
        "Compared regimes"
    );

    Ok(ComparisonResult {
        basis: input.basis,
        salaried,
        contractor,
        salaried_equivalent: values.salaried,
        contractor_equivalent: values.contractor,
        adjustments: values.adjustments,
        advantage,
        delta,
    })
}

/// Ranks two regime results by net amount.
///
/// Returns the advantaged regime and the absolute difference. Differences
/// below `epsilon` are a [`Advantage::Tie`].
pub fn rank(first: &RegimeResult, second: &RegimeResult, epsilon: Decimal) -> (Advantage, Decimal) {
    rank_values(
        (first.regime, first.net_amount),
        (second.regime, second.net_amount),
        epsilon,
    )
}

fn rank_values(
    first: (Regime, Decimal),
    second: (Regime, Decimal),
    epsilon: Decimal,
) -> (Advantage, Decimal) {
    let delta = (first.1 - second.1).abs();
    if delta < epsilon {
        return (Advantage::Tie, delta);
    }

    let winner = if first.1 > second.1 { first.0 } else { second.0 };
    (Advantage::from(winner), delta)
}
