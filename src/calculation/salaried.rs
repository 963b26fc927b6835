//! Salaried (CLT) net income calculation.
//!
//! The employee's INSS contribution is computed on the gross salary, then
//! IRRF is withheld on what remains after INSS and the dependent deduction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{check_amount, evaluate_table, round_half_up};
use crate::config::TableSet;
use crate::error::EngineResult;
use crate::models::{AuditStep, AuditTrace, Regime, RegimeResult, TaxLine};

/// Options for the salaried calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalariedOptions {
    /// Number of IRRF dependents.
    #[serde(default)]
    pub dependents: u32,
    /// Use the simplified monthly discount when it beats the legal deductions.
    #[serde(default)]
    pub use_simplified_discount: bool,
}

/// Calculates the monthly net income of a CLT employee.
///
/// 1. INSS on the gross salary, capped at the contribution ceiling
/// 2. Taxable base = gross − INSS − dependents × dependent deduction,
///    or gross − simplified discount when that is larger and enabled
/// 3. IRRF on the taxable base
///
/// The result's breakdown is `[INSS, IRRF]`.
///
/// # Errors
///
/// Returns [`EngineError::NegativeGross`](crate::error::EngineError::NegativeGross)
/// if `gross` is negative and
/// [`EngineError::InvalidInput`](crate::error::EngineError::InvalidInput) if it exceeds
/// [`MAX_MONTHLY_AMOUNT`](super::MAX_MONTHLY_AMOUNT).
///
/// # Examples
///
/// ```no_run
/// use tradupay_engine::calculation::{SalariedOptions, calculate_salaried};
/// use tradupay_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/brazil").unwrap();
/// let result = calculate_salaried(
///     Decimal::new(10000, 0),
///     loader.latest_table_set(),
///     &SalariedOptions::default(),
/// )
/// .unwrap();
/// assert_eq!(result.net_amount, Decimal::new(746880, 2));
/// ```
pub fn calculate_salaried(
    gross: Decimal,
    tables: &TableSet,
    options: &SalariedOptions,
) -> EngineResult<RegimeResult> {
    let gross = check_amount("salaried_gross", gross)?;

    let mut audit_trace = AuditTrace::default();

    let inss = evaluate_table(gross, tables.inss(), 1)?;
    audit_trace.steps.push(inss.audit_step);

    let rules = tables.salaried();
    let dependent_total = round_half_up(Decimal::from(options.dependents) * rules.dependent_deduction);
    let legal_deductions = inss.tax + dependent_total;
    let (deductions, method) = match rules.simplified_discount {
        Some(discount) if options.use_simplified_discount && discount > legal_deductions => {
            (discount, "simplified")
        }
        _ => (legal_deductions, "legal"),
    };
    let taxable_base = round_half_up((gross - deductions).max(Decimal::ZERO));

    audit_trace.steps.push(AuditStep {
        step_number: 2,
        rule_id: "irrf_taxable_base".to_string(),
        rule_name: "IRRF Taxable Base".to_string(),
        legal_ref: tables.irrf().legal_ref().to_string(),
        input: serde_json::json!({
            "gross": gross.to_string(),
            "inss": inss.tax.to_string(),
            "dependents": options.dependents,
            "dependent_deduction": rules.dependent_deduction.to_string(),
            "use_simplified_discount": options.use_simplified_discount
        }),
        output: serde_json::json!({
            "deductions": deductions.to_string(),
            "method": method,
            "taxable_base": taxable_base.to_string()
        }),
        reasoning: format!(
            "Taxable base {} = {} - {} ({} deductions)",
            taxable_base, gross, deductions, method
        ),
    });

    let irrf = evaluate_table(taxable_base, tables.irrf(), 3)?;
    audit_trace.steps.push(irrf.audit_step);

    let total_tax = inss.tax + irrf.tax;
    let net_amount = gross - total_tax;

    Ok(RegimeResult {
        regime: Regime::Salaried,
        gross_amount: gross,
        total_tax,
        expenses: Decimal::ZERO,
        net_amount,
        breakdown: vec![
            TaxLine {
                table_name: tables.inss().name().to_string(),
                tax_owed: inss.tax,
            },
            TaxLine {
                table_name: tables.irrf().name().to_string(),
                tax_owed: irrf.tax,
            },
        ],
        annex_selection: None,
        audit_trace,
    })
}
