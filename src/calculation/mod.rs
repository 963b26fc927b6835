//! Calculation logic for the TraduPay engine.
//!
//! This module contains the progressive table evaluator, the salaried (CLT)
//! calculator, the contractor (PJ) calculator with its Fator R annex
//! optimization, benefit-adjusted equivalents, the regime comparator, switch
//! assessment and market benchmarks.

mod assessment;
mod comparator;
mod contractor;
mod equivalence;
mod market;
mod money;
mod progressive;
mod salaried;

pub use assessment::{assess_switch, summarize};
pub use comparator::{ComparisonInput, compare, compare_incomes, compare_with, rank};
pub use contractor::{
    ContractorOptions, MONTHS_PER_YEAR, SIMPLES_CEILING_WARNING, calculate_contractor,
    pro_labore_for,
};
pub use equivalence::{
    EquivalentValues, contractor_equivalence, equivalent_values, salaried_equivalence,
};
pub use market::benchmark;
pub use money::{MAX_MONTHLY_AMOUNT, ceil_cents, check_amount, format_brl, round_half_up};
pub use progressive::{TaxEvaluation, compute_tax, evaluate_table};
pub use salaried::{SalariedOptions, calculate_salaried};
