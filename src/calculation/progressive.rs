//! Progressive tax table evaluation.
//!
//! Every Brazilian table the engine uses is published in the "parcela a
//! deduzir" form: the whole base is multiplied by the marginal rate of its
//! bracket and a fixed deduction is subtracted. This gives the same result
//! as slicing the base across brackets, provided the deductions are the ones
//! published with the table.

use rust_decimal::Decimal;
use tracing::debug;

use super::round_half_up;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, TaxTable};

/// The detailed result of evaluating one table.
#[derive(Debug, Clone)]
pub struct TaxEvaluation {
    /// Index of the bracket that applied.
    pub bracket_index: usize,
    /// The amount after the table's ceiling was applied.
    pub base: Decimal,
    /// The marginal rate of the bracket.
    pub rate: Decimal,
    /// The deduction of the bracket.
    pub deduction: Decimal,
    /// The tax owed, rounded to the cent and never negative.
    pub tax: Decimal,
    /// The audit step recording this evaluation.
    pub audit_step: AuditStep,
}

/// Evaluates a table and records how the tax was derived.
///
/// # Arguments
///
/// * `amount` - The amount to tax (monthly salary, pró-labore or annual revenue)
/// * `table` - The table to evaluate
/// * `step_number` - The sequence number for the audit step
///
/// # Errors
///
/// Returns [`EngineError::NegativeGross`] if `amount` is negative and
/// [`EngineError::InvalidInput`] if the tax cannot be represented.
///
/// # Examples
///
/// ```
/// use tradupay_engine::calculation::evaluate_table;
/// use tradupay_engine::models::{TaxBracket, TaxTable};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let table = TaxTable::new(
///     "FLAT".to_string(),
///     "example".to_string(),
///     None,
///     vec![TaxBracket {
///         lower_bound: dec("0"),
///         upper_bound: None,
///         rate: dec("0.11"),
///         deduction: dec("0"),
///     }],
/// )
/// .unwrap();
///
/// let evaluation = evaluate_table(dec("2800.00"), &table, 1).unwrap();
/// assert_eq!(evaluation.tax, dec("308.00"));
/// assert_eq!(evaluation.audit_step.rule_id, "FLAT");
/// ```
pub fn evaluate_table(
    amount: Decimal,
    table: &TaxTable,
    step_number: u32,
) -> EngineResult<TaxEvaluation> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(EngineError::NegativeGross {
            field: table.name().to_string(),
            amount,
        });
    }

    let base = match table.base_ceiling() {
        Some(ceiling) if amount > ceiling => ceiling,
        _ => amount,
    };

    let (bracket_index, bracket) =
        table
            .bracket_for(base)
            .ok_or_else(|| EngineError::CalculationError {
                message: format!("no bracket of table '{}' covers {}", table.name(), base),
            })?;

    let raw = base
        .checked_mul(bracket.rate)
        .and_then(|product| product.checked_sub(bracket.deduction))
        .ok_or_else(|| EngineError::InvalidInput {
            field: table.name().to_string(),
            message: format!("{} is out of range for the table", amount),
        })?;
    let tax = round_half_up(raw.max(Decimal::ZERO));

    debug!(
        table = table.name(),
        base = %base,
        bracket = bracket_index,
        tax = %tax,
        "Evaluated tax table"
    );

    let capped = base < amount;
    let audit_step = AuditStep {
        step_number,
        rule_id: table.name().to_string(),
        rule_name: format!("{} progressive table", table.name()),
        legal_ref: table.legal_ref().to_string(),
        input: serde_json::json!({
            "amount": amount.to_string(),
            "base_ceiling": table.base_ceiling().map(|c| c.to_string()),
        }),
        output: serde_json::json!({
            "base": base.to_string(),
            "bracket_index": bracket_index,
            "rate": bracket.rate.to_string(),
            "deduction": bracket.deduction.to_string(),
            "tax": tax.to_string()
        }),
        reasoning: if capped {
            format!(
                "{} capped at ceiling {}; {} x {} - {} = {}",
                amount, base, base, bracket.rate, bracket.deduction, tax
            )
        } else {
            format!(
                "{} falls in bracket {}; {} x {} - {} = {}",
                base,
                bracket_index + 1,
                base,
                bracket.rate,
                bracket.deduction,
                tax
            )
        },
    };

    Ok(TaxEvaluation {
        bracket_index,
        base,
        rate: bracket.rate,
        deduction: bracket.deduction,
        tax,
        audit_step,
    })
}

/// Computes the tax owed on `amount` under `table`.
///
/// The amount is capped at the table's ceiling, the bracket containing it is
/// located (lower bound inclusive) and the tax is `base × rate − deduction`,
/// clamped at zero and rounded half-up to the cent.
///
/// # Errors
///
/// Returns [`EngineError::NegativeGross`] if `amount` is negative and
/// [`EngineError::InvalidInput`] if the tax cannot be represented.
pub fn compute_tax(amount: Decimal, table: &TaxTable) -> EngineResult<Decimal> {
    evaluate_table(amount, table, 0).map(|evaluation| evaluation.tax)
}
