//! Employment regime and gross income types.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The employment regime an income is earned under.
///
/// Accepts the Brazilian shorthands `clt` and `pj` when deserializing.
///
/// # Example
///
/// ```
/// use tradupay_engine::models::Regime;
///
/// let regime: Regime = serde_json::from_str("\"pj\"").unwrap();
/// assert_eq!(regime, Regime::Contractor);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Salaried employee (CLT): INSS and IRRF withheld through payroll.
    #[serde(alias = "clt")]
    Salaried,
    /// Independent contractor (PJ): taxed through the Simples Nacional.
    #[serde(alias = "pj")]
    Contractor,
}

impl Regime {
    /// Returns the other regime.
    pub fn other(self) -> Self {
        match self {
            Regime::Salaried => Regime::Contractor,
            Regime::Contractor => Regime::Salaried,
        }
    }

    /// Returns the short label used in Brazil ("CLT" or "PJ").
    pub fn label(self) -> &'static str {
        match self {
            Regime::Salaried => "CLT",
            Regime::Contractor => "PJ",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::Salaried => write!(f, "salaried"),
            Regime::Contractor => write!(f, "contractor"),
        }
    }
}

/// A monthly gross figure tagged with its regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrossIncome {
    /// Monthly gross salary (CLT) or monthly gross revenue (PJ).
    pub amount: Decimal,
    /// The regime the amount is earned under.
    pub regime: Regime,
}

impl GrossIncome {
    /// Creates a salaried gross income.
    pub fn salaried(amount: Decimal) -> Self {
        Self {
            amount,
            regime: Regime::Salaried,
        }
    }

    /// Creates a contractor gross income.
    pub fn contractor(amount: Decimal) -> Self {
        Self {
            amount,
            regime: Regime::Contractor,
        }
    }
}
