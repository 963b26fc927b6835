//! Progressive tax table model.
//!
//! A [`TaxTable`] is an ordered list of [`TaxBracket`]s that partitions
//! `[0, ∞)` exactly once. Tables are validated on construction and never
//! mutated afterwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A single bracket of a progressive table.
///
/// Brackets are lower-inclusive and upper-exclusive: an amount equal to
/// `upper_bound` belongs to the next bracket. The deduction is the
/// precomputed "parcela a deduzir" so that `amount × rate − deduction`
/// equals the cumulative marginal tax.
///
/// # Example
///
/// ```
/// use tradupay_engine::models::TaxBracket;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let bracket = TaxBracket {
///     lower_bound: Decimal::from_str("1518.00").unwrap(),
///     upper_bound: Some(Decimal::from_str("2793.88").unwrap()),
///     rate: Decimal::from_str("0.09").unwrap(),
///     deduction: Decimal::from_str("22.77").unwrap(),
/// };
/// assert!(bracket.contains(Decimal::from_str("1518.00").unwrap()));
/// assert!(!bracket.contains(Decimal::from_str("2793.88").unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive lower bound of the bracket.
    pub lower_bound: Decimal,
    /// Exclusive upper bound, or `None` for the unbounded top bracket.
    #[serde(default)]
    pub upper_bound: Option<Decimal>,
    /// The marginal rate as a fraction (0.14 for 14%).
    pub rate: Decimal,
    /// The amount subtracted from `amount × rate`.
    #[serde(default)]
    pub deduction: Decimal,
}

impl TaxBracket {
    /// Returns true if `amount` falls within `[lower_bound, upper_bound)`.
    pub fn contains(&self, amount: Decimal) -> bool {
        amount >= self.lower_bound && self.upper_bound.is_none_or(|upper| amount < upper)
    }
}

/// A named, validated progressive table (INSS, IRRF, Simples annexes).
///
/// The optional `base_ceiling` caps the amount before bracket lookup. It
/// models the INSS contribution ceiling ("teto"): salaries above it pay the
/// same contribution as a salary equal to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxTable {
    name: String,
    legal_ref: String,
    base_ceiling: Option<Decimal>,
    brackets: Vec<TaxBracket>,
}

impl TaxTable {
    /// Creates a table after checking that its brackets partition `[0, ∞)`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MalformedTable`] when the table is empty, does
    /// not start at zero, has a gap, an overlap, an empty bracket, a rate
    /// outside `[0, 1]`, a bounded top bracket, an unbounded bracket before
    /// the top, or a non-positive ceiling.
    ///
    /// # Example
    ///
    /// ```
    /// use tradupay_engine::models::{TaxBracket, TaxTable};
    /// use rust_decimal::Decimal;
    ///
    /// let flat = TaxTable::new(
    ///     "FLAT",
    ///     "example",
    ///     None,
    ///     vec![TaxBracket {
    ///         lower_bound: Decimal::ZERO,
    ///         upper_bound: None,
    ///         rate: Decimal::new(10, 2),
    ///         deduction: Decimal::ZERO,
    ///     }],
    /// );
    /// assert!(flat.is_ok());
    /// ```
    pub fn new(
        name: impl Into<String>,
        legal_ref: impl Into<String>,
        base_ceiling: Option<Decimal>,
        brackets: Vec<TaxBracket>,
    ) -> EngineResult<Self> {
        let name = name.into();

        if let Err(message) = validate_partition(base_ceiling, &brackets) {
            return Err(EngineError::MalformedTable {
                table: name,
                message,
            });
        }

        Ok(Self {
            name,
            legal_ref: legal_ref.into(),
            base_ceiling,
            brackets,
        })
    }

    /// Returns the table name (e.g., "INSS").
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the legal reference the table is published under.
    pub fn legal_ref(&self) -> &str {
        &self.legal_ref
    }

    /// Returns the amount ceiling applied before lookup, if any.
    pub fn base_ceiling(&self) -> Option<Decimal> {
        self.base_ceiling
    }

    /// Returns the brackets in ascending order.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Finds the bracket containing `amount` along with its index.
    ///
    /// Always returns `Some` for non-negative amounts because the brackets
    /// cover `[0, ∞)`.
    pub fn bracket_for(&self, amount: Decimal) -> Option<(usize, &TaxBracket)> {
        self.brackets
            .iter()
            .enumerate()
            .find(|(_, bracket)| bracket.contains(amount))
    }
}

fn validate_partition(base_ceiling: Option<Decimal>, brackets: &[TaxBracket]) -> Result<(), String> {
    if let Some(ceiling) = base_ceiling.filter(|ceiling| *ceiling <= Decimal::ZERO) {
        return Err(format!("base ceiling {} must be positive", ceiling));
    }

    let Some(first) = brackets.first() else {
        return Err("table has no brackets".to_string());
    };

    if !first.lower_bound.is_zero() {
        return Err(format!(
            "first bracket starts at {}, expected 0",
            first.lower_bound
        ));
    }

    let last_index = brackets.len() - 1;

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(format!(
                "bracket {} has rate {} outside [0, 1]",
                index, bracket.rate
            ));
        }

        match bracket.upper_bound {
            Some(upper) if upper <= bracket.lower_bound => {
                return Err(format!(
                    "bracket {} is empty: upper bound {} is not above lower bound {}",
                    index, upper, bracket.lower_bound
                ));
            }
            Some(upper) if index == last_index => {
                return Err(format!(
                    "last bracket ends at {}; the top bracket must be unbounded",
                    upper
                ));
            }
            Some(upper) => {
                let next_lower = brackets[index + 1].lower_bound;
                if upper < next_lower {
                    return Err(format!("gap between {} and {}", upper, next_lower));
                }
                if upper > next_lower {
                    return Err(format!(
                        "overlap between brackets {} and {} ({} > {})",
                        index,
                        index + 1,
                        upper,
                        next_lower
                    ));
                }
            }
            None if index != last_index => {
                return Err(format!(
                    "bracket {} is unbounded but is not the last bracket",
                    index
                ));
            }
            None => {}
        }
    }

    Ok(())
}
