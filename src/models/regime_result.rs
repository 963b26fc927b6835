//! Regime calculation result models.
//!
//! This module contains the [`RegimeResult`] type and its associated structures
//! that capture everything a regime calculator produces: the tax breakdown,
//! the contractor annex selection and an audit trace explaining each step.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Regime;

/// One line of a regime's tax breakdown.
///
/// # Example
///
/// ```
/// use tradupay_engine::models::TaxLine;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let line = TaxLine {
///     table_name: "INSS".to_string(),
///     tax_owed: Decimal::from_str("951.63").unwrap(),
/// };
/// assert_eq!(line.table_name, "INSS");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLine {
    /// The name of the table that produced the amount.
    pub table_name: String,
    /// The monthly amount owed under that table.
    pub tax_owed: Decimal,
}

/// The two Simples Nacional service schedules a contractor can fall under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnexKind {
    /// Anexo III: lower rates, requires Fator R at or above the threshold.
    AnexoIii,
    /// Anexo V: higher rates, applies when Fator R is below the threshold.
    AnexoV,
}

impl AnnexKind {
    /// Preference order used to break exact ties.
    ///
    /// Anexo V comes first: it needs only the minimum pró-labore and no
    /// monthly Fator R monitoring.
    pub const PREFERENCE: [AnnexKind; 2] = [AnnexKind::AnexoV, AnnexKind::AnexoIii];

    /// Returns the position of the annex in [`AnnexKind::PREFERENCE`].
    pub fn preference_rank(self) -> usize {
        Self::PREFERENCE
            .iter()
            .position(|kind| *kind == self)
            .unwrap_or(Self::PREFERENCE.len())
    }

    /// Returns the schedule's display name.
    pub fn label(self) -> &'static str {
        match self {
            AnnexKind::AnexoIii => "Anexo III",
            AnnexKind::AnexoV => "Anexo V",
        }
    }
}

/// One evaluated contractor scenario.
///
/// Each scenario fixes a pró-labore, which determines Fator R and therefore
/// which annex the revenue is taxed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnexScenario {
    /// The annex the scenario is taxed under.
    pub annex: AnnexKind,
    /// The monthly pró-labore paid to the partner.
    pub pro_labore: Decimal,
    /// Pró-labore divided by monthly revenue.
    pub fator_r: Decimal,
    /// Whether Fator R places the revenue in this annex.
    pub eligible: bool,
    /// Monthly Simples Nacional tax.
    pub simples_tax: Decimal,
    /// INSS withheld on the pró-labore.
    pub pro_labore_inss: Decimal,
    /// IRRF withheld on the pró-labore.
    pub pro_labore_irrf: Decimal,
    /// Sum of the three taxes above.
    pub total_tax: Decimal,
}

/// The outcome of the Fator R optimization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnexSelection {
    /// The annex that was selected.
    pub chosen: AnnexKind,
    /// Fator R of the chosen scenario.
    pub fator_r: Decimal,
    /// The Fator R threshold in force.
    pub threshold: Decimal,
    /// Both evaluated scenarios, Anexo III first.
    pub scenarios: [AnnexScenario; 2],
}

impl AnnexSelection {
    /// Returns the scenario for the chosen annex.
    pub fn chosen_scenario(&self) -> Option<&AnnexScenario> {
        self.scenarios.iter().find(|s| s.annex == self.chosen)
    }

    /// Returns the scenario that was not chosen.
    pub fn rejected_scenario(&self) -> Option<&AnnexScenario> {
        self.scenarios.iter().find(|s| s.annex != self.chosen)
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The legal basis of the rule or table.
    pub legal_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a regime calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The net income of one regime.
///
/// Invariants: `total_tax` is the sum of `breakdown`, and
/// `net_amount = gross_amount - total_tax - expenses`.
///
/// # Example
///
/// ```
/// use tradupay_engine::models::{AuditTrace, Regime, RegimeResult, TaxLine};
/// use rust_decimal::Decimal;
///
/// let result = RegimeResult {
///     regime: Regime::Salaried,
///     gross_amount: Decimal::ZERO,
///     total_tax: Decimal::ZERO,
///     expenses: Decimal::ZERO,
///     net_amount: Decimal::ZERO,
///     breakdown: vec![],
///     annex_selection: None,
///     audit_trace: AuditTrace::default(),
/// };
/// assert_eq!(result.effective_rate(), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeResult {
    /// The regime the income was calculated under.
    pub regime: Regime,
    /// Monthly gross salary or revenue.
    pub gross_amount: Decimal,
    /// Monthly sum of all taxes.
    pub total_tax: Decimal,
    /// Monthly business expenses (contractor only).
    pub expenses: Decimal,
    /// Monthly take-home income.
    pub net_amount: Decimal,
    /// Ordered tax lines, one per table applied.
    pub breakdown: Vec<TaxLine>,
    /// The Fator R decision (contractor only).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub annex_selection: Option<AnnexSelection>,
    /// Step-by-step explanation of the calculation.
    pub audit_trace: AuditTrace,
}

impl RegimeResult {
    /// Returns total tax as a fraction of gross, rounded to four places.
    pub fn effective_rate(&self) -> Decimal {
        if self.gross_amount.is_zero() {
            return Decimal::ZERO;
        }
        (self.total_tax / self.gross_amount).round_dp(4)
    }

    /// Returns the amount owed under the named table, if it was applied.
    pub fn tax_for(&self, table_name: &str) -> Option<Decimal> {
        self.breakdown
            .iter()
            .find(|line| line.table_name == table_name)
            .map(|line| line.tax_owed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_result() -> RegimeResult {
        RegimeResult {
            regime: Regime::Salaried,
            gross_amount: dec("10000.00"),
            total_tax: dec("2531.20"),
            expenses: Decimal::ZERO,
            net_amount: dec("7468.80"),
            breakdown: vec![
                TaxLine {
                    table_name: "INSS".to_string(),
                    tax_owed: dec("951.63"),
                },
                TaxLine {
                    table_name: "IRRF".to_string(),
                    tax_owed: dec("1579.57"),
                },
            ],
            annex_selection: None,
            audit_trace: AuditTrace::default(),
        }
    }

    fn scenario(annex: AnnexKind, total: &str) -> AnnexScenario {
        AnnexScenario {
            annex,
            pro_labore: dec("1518.00"),
            fator_r: dec("0.1518"),
            eligible: true,
            simples_tax: dec(total),
            pro_labore_inss: Decimal::ZERO,
            pro_labore_irrf: Decimal::ZERO,
            total_tax: dec(total),
        }
    }

    #[test]
    fn test_breakdown_sums_to_total_tax() {
        let result = sample_result();
        let sum: Decimal = result.breakdown.iter().map(|l| l.tax_owed).sum();

        assert_eq!(sum, result.total_tax);
        assert_eq!(
            result.gross_amount - result.total_tax - result.expenses,
            result.net_amount
        );
    }

    #[test]
    fn test_effective_rate() {
        assert_eq!(sample_result().effective_rate(), dec("0.2531"));
    }

    #[test]
    fn test_tax_for_finds_table() {
        let result = sample_result();

        assert_eq!(result.tax_for("IRRF"), Some(dec("1579.57")));
        assert_eq!(result.tax_for("SIMPLES_ANEXO_V"), None);
    }

    #[test]
    fn test_annex_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&AnnexKind::AnexoIii).unwrap(),
            "\"anexo_iii\""
        );
        assert_eq!(
            serde_json::to_string(&AnnexKind::AnexoV).unwrap(),
            "\"anexo_v\""
        );
    }

    #[test]
    fn test_preference_order_matches_rank() {
        for (index, annex) in AnnexKind::PREFERENCE.iter().enumerate() {
            assert_eq!(annex.preference_rank(), index);
        }
    }

    #[test]
    fn test_anexo_v_ranks_first() {
        assert!(AnnexKind::AnexoV.preference_rank() < AnnexKind::AnexoIii.preference_rank());
    }

    #[test]
    fn test_annex_selection_serializes_both_scenarios() {
        let selection = AnnexSelection {
            chosen: AnnexKind::AnexoIii,
            fator_r: dec("0.28"),
            threshold: dec("0.28"),
            scenarios: [
                scenario(AnnexKind::AnexoIii, "912.74"),
                scenario(AnnexKind::AnexoV, "1716.98"),
            ],
        };

        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(json["scenarios"].as_array().unwrap().len(), 2);

        let back: AnnexSelection = serde_json::from_value(json).unwrap();
        assert_eq!(back, selection);
    }

    #[test]
    fn test_annex_selection_accessors() {
        let selection = AnnexSelection {
            chosen: AnnexKind::AnexoV,
            fator_r: dec("0.1518"),
            threshold: dec("0.28"),
            scenarios: [
                scenario(AnnexKind::AnexoIii, "900.00"),
                scenario(AnnexKind::AnexoV, "800.00"),
            ],
        };

        assert_eq!(
            selection.chosen_scenario().unwrap().annex,
            AnnexKind::AnexoV
        );
        assert_eq!(
            selection.rejected_scenario().unwrap().annex,
            AnnexKind::AnexoIii
        );
    }

    #[test]
    fn test_salaried_result_omits_annex_selection() {
        let json = serde_json::to_string(&sample_result()).unwrap();

        assert!(!json.contains("annex_selection"));
        assert!(json.contains("\"regime\":\"salaried\""));
        assert!(json.contains("\"net_amount\":\"7468.80\""));
        assert!(json.contains("\"audit_trace\":{"));
    }

    #[test]
    fn test_audit_warning_serialization() {
        let warning = AuditWarning {
            code: "SIMPLES_CEILING_EXCEEDED".to_string(),
            message: "Annual revenue above the Simples Nacional ceiling".to_string(),
            severity: "high".to_string(),
        };

        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains("\"code\":\"SIMPLES_CEILING_EXCEEDED\""));
        assert!(json.contains("\"severity\":\"high\""));
    }
}
