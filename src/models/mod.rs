//! Core data models for the TraduPay engine.
//!
//! This module contains all the domain models used throughout the engine.

mod comparison;
mod market;
mod regime;
mod regime_result;
mod tax_table;

pub use comparison::{
    Advantage, ComparisonBasis, ComparisonReport, ComparisonResult, ContractorEquivalence,
    EquivalenceAdjustments, SalariedEquivalence, SwitchAssessment, SwitchVerdict,
};
pub use market::{MarketBenchmark, MarketPosition, Seniority};
pub use regime::{GrossIncome, Regime};
pub use regime_result::{
    AnnexKind, AnnexScenario, AnnexSelection, AuditStep, AuditTrace, AuditWarning, RegimeResult,
    TaxLine,
};
pub use tax_table::{TaxBracket, TaxTable};
