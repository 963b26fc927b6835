//! Contractor (PJ) net income calculation with Fator R optimization.
//!
//! A contractor company taxed under Simples Nacional falls into Anexo III or
//! Anexo V depending on Fator R, the ratio of payroll (here the partner's
//! pró-labore) to revenue. Raising the pró-labore to reach the threshold
//! moves the revenue to the cheaper Anexo III but costs INSS and IRRF on the
//! pró-labore itself, so both scenarios are evaluated and the cheaper one is
//! chosen.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ceil_cents, check_amount, evaluate_table, round_half_up};
use crate::config::TableSet;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AnnexKind, AnnexScenario, AnnexSelection, AuditStep, AuditTrace, AuditWarning, Regime,
    RegimeResult, TaxLine,
};

/// Months used to annualize a steady monthly revenue into RBT12.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Warning code raised when annualized revenue exceeds the Simples ceiling.
pub const SIMPLES_CEILING_WARNING: &str = "SIMPLES_REVENUE_CEILING";

/// Options for the contractor calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractorOptions {
    /// Share of gross revenue spent on business costs (accountant, fees).
    #[serde(default)]
    pub expenses_ratio: Decimal,
}

/// Calculates the monthly net income of a PJ contractor.
///
/// Both annex scenarios are always evaluated and recorded in the result's
/// [`AnnexSelection`]. Among the scenarios whose Fator R places them in
/// their annex, the one with the lowest total tax is chosen; exact ties go
/// to the first annex in [`AnnexKind::PREFERENCE`].
///
/// The result's breakdown is `[<chosen annex table>, INSS_PRO_LABORE, IRRF]`.
///
/// # Errors
///
/// Returns [`EngineError::NegativeGross`] if `gross` is negative,
/// [`EngineError::InvalidInput`] if it exceeds
/// [`MAX_MONTHLY_AMOUNT`](super::MAX_MONTHLY_AMOUNT) and
/// [`EngineError::InvalidRatio`] if `expenses_ratio` is outside `[0, 1]`.
pub fn calculate_contractor(
    gross: Decimal,
    tables: &TableSet,
    options: &ContractorOptions,
) -> EngineResult<RegimeResult> {
    let gross = check_amount("contractor_gross", gross)?;
    if options.expenses_ratio < Decimal::ZERO || options.expenses_ratio > Decimal::ONE {
        return Err(EngineError::InvalidRatio {
            field: "expenses_ratio".to_string(),
            value: options.expenses_ratio,
        });
    }

    let rules = tables.contractor();
    let mut audit_trace = AuditTrace::default();
    let mut step_number = 1;

    let annual_revenue = gross
        .checked_mul(Decimal::from(MONTHS_PER_YEAR))
        .ok_or_else(|| EngineError::InvalidInput {
            field: "contractor_gross".to_string(),
            message: format!("{} cannot be annualized", gross),
        })?;
    audit_trace.steps.push(AuditStep {
        step_number,
        rule_id: "rbt12".to_string(),
        rule_name: "Annualized Revenue (RBT12)".to_string(),
        legal_ref: "LC 123/2006 art. 18".to_string(),
        input: serde_json::json!({ "monthly_gross": gross.to_string() }),
        output: serde_json::json!({ "rbt12": annual_revenue.to_string() }),
        reasoning: format!(
            "Steady revenue assumed: {} x {} = {}",
            gross, MONTHS_PER_YEAR, annual_revenue
        ),
    });
    step_number += 1;

    if let Some(ceiling) = rules
        .simples_revenue_ceiling
        .filter(|ceiling| annual_revenue > *ceiling)
    {
        warn!(
            rbt12 = %annual_revenue,
            ceiling = %ceiling,
            "Annual revenue exceeds the Simples Nacional ceiling"
        );
        audit_trace.warnings.push(AuditWarning {
            code: SIMPLES_CEILING_WARNING.to_string(),
            message: format!(
                "Annual revenue {} exceeds the Simples Nacional ceiling {}; the company would be excluded from the regime",
                annual_revenue, ceiling
            ),
            severity: "high".to_string(),
        });
    }

    let scenarios = [
        evaluate_scenario(
            AnnexKind::AnexoIii,
            gross,
            annual_revenue,
            tables,
            &mut step_number,
            &mut audit_trace,
        )?,
        evaluate_scenario(
            AnnexKind::AnexoV,
            gross,
            annual_revenue,
            tables,
            &mut step_number,
            &mut audit_trace,
        )?,
    ];

    let chosen = scenarios
        .iter()
        .filter(|scenario| scenario.eligible)
        .min_by(|a, b| {
            a.total_tax
                .cmp(&b.total_tax)
                .then(a.annex.preference_rank().cmp(&b.annex.preference_rank()))
        })
        .cloned()
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("no annex scenario is eligible for gross {}", gross),
        })?;

    debug!(
        gross = %gross,
        chosen = chosen.annex.label(),
        fator_r = %chosen.fator_r,
        total_tax = %chosen.total_tax,
        "Selected Simples Nacional annex"
    );

    audit_trace.steps.push(AuditStep {
        step_number,
        rule_id: "annex_selection".to_string(),
        rule_name: "Fator R Annex Selection".to_string(),
        legal_ref: "LC 123/2006 art. 18 §5-J".to_string(),
        input: serde_json::json!({
            "threshold": rules.fator_r_threshold.to_string(),
            "scenarios": scenarios
                .iter()
                .map(|s| serde_json::json!({
                    "annex": s.annex,
                    "eligible": s.eligible,
                    "total_tax": s.total_tax.to_string()
                }))
                .collect::<Vec<_>>()
        }),
        output: serde_json::json!({
            "chosen": chosen.annex,
            "pro_labore": chosen.pro_labore.to_string(),
            "fator_r": chosen.fator_r.to_string()
        }),
        reasoning: format!(
            "{} has the lowest total tax ({}) with pró-labore {} and Fator R {}",
            chosen.annex.label(),
            chosen.total_tax,
            chosen.pro_labore,
            chosen.fator_r
        ),
    });
    step_number += 1;

    let expenses = round_half_up(gross * options.expenses_ratio);
    if !expenses.is_zero() {
        audit_trace.steps.push(AuditStep {
            step_number,
            rule_id: "business_expenses".to_string(),
            rule_name: "Business Expenses".to_string(),
            legal_ref: String::new(),
            input: serde_json::json!({
                "gross": gross.to_string(),
                "expenses_ratio": options.expenses_ratio.to_string()
            }),
            output: serde_json::json!({ "expenses": expenses.to_string() }),
            reasoning: format!(
                "{} x {} = {} deducted as business expenses",
                gross, options.expenses_ratio, expenses
            ),
        });
    }

    let breakdown = vec![
        TaxLine {
            table_name: tables.annex(chosen.annex).name().to_string(),
            tax_owed: chosen.simples_tax,
        },
        TaxLine {
            table_name: tables.pro_labore_inss().name().to_string(),
            tax_owed: chosen.pro_labore_inss,
        },
        TaxLine {
            table_name: tables.irrf().name().to_string(),
            tax_owed: chosen.pro_labore_irrf,
        },
    ];
    let total_tax = chosen.total_tax;

    Ok(RegimeResult {
        regime: Regime::Contractor,
        gross_amount: gross,
        total_tax,
        expenses,
        net_amount: gross - total_tax - expenses,
        breakdown,
        annex_selection: Some(AnnexSelection {
            chosen: chosen.annex,
            fator_r: chosen.fator_r,
            threshold: rules.fator_r_threshold,
            scenarios,
        }),
        audit_trace,
    })
}

/// Returns the pró-labore a scenario pays for the given monthly revenue.
///
/// The Anexo V scenario pays the minimum pró-labore. The Anexo III scenario
/// pays just enough for Fator R to reach the threshold, never less than the
/// minimum. Neither exceeds the revenue itself.
pub fn pro_labore_for(annex: AnnexKind, gross: Decimal, tables: &TableSet) -> Decimal {
    let rules = tables.contractor();
    let target = match annex {
        AnnexKind::AnexoV => rules.minimum_pro_labore,
        AnnexKind::AnexoIii => rules
            .minimum_pro_labore
            .max(ceil_cents(gross * rules.fator_r_threshold)),
    };
    target.min(gross)
}

fn evaluate_scenario(
    annex: AnnexKind,
    gross: Decimal,
    annual_revenue: Decimal,
    tables: &TableSet,
    step_number: &mut u32,
    audit_trace: &mut AuditTrace,
) -> EngineResult<AnnexScenario> {
    let threshold = tables.contractor().fator_r_threshold;
    let pro_labore = pro_labore_for(annex, gross, tables);

    let ratio = if gross.is_zero() {
        Decimal::ZERO
    } else {
        pro_labore / gross
    };
    let eligible = match annex {
        AnnexKind::AnexoIii => ratio >= threshold,
        AnnexKind::AnexoV => ratio < threshold,
    };

    let annual = evaluate_table(annual_revenue, tables.annex(annex), *step_number)?;
    audit_trace.steps.push(annual.audit_step);
    *step_number += 1;
    let simples_tax = round_half_up(annual.tax / Decimal::from(MONTHS_PER_YEAR));

    let inss = evaluate_table(pro_labore, tables.pro_labore_inss(), *step_number)?;
    audit_trace.steps.push(inss.audit_step);
    *step_number += 1;

    let irrf = evaluate_table(pro_labore - inss.tax, tables.irrf(), *step_number)?;
    audit_trace.steps.push(irrf.audit_step);
    *step_number += 1;

    Ok(AnnexScenario {
        annex,
        pro_labore,
        fator_r: ratio.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero),
        eligible,
        simples_tax,
        pro_labore_inss: inss.tax,
        pro_labore_irrf: irrf.tax,
        total_tax: simples_tax + inss.tax + irrf.tax,
    })
}
