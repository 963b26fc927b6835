//! Market reference models.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Regime;

/// Career level used to key the market reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seniority {
    /// Entry level.
    #[serde(alias = "Júnior")]
    Junior,
    /// Mid level.
    #[serde(alias = "Pleno")]
    Pleno,
    /// Senior level.
    #[serde(alias = "Sênior")]
    Senior,
}

impl fmt::Display for Seniority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Seniority::Junior => "Júnior",
            Seniority::Pleno => "Pleno",
            Seniority::Senior => "Sênior",
        };
        write!(f, "{}", label)
    }
}

/// Where a proposal sits relative to the market average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPosition {
    /// At or above the market average.
    Above,
    /// Below the market average.
    Below,
}

/// A proposal measured against the market average for its regime.
///
/// # Example
///
/// ```
/// use tradupay_engine::models::{MarketBenchmark, MarketPosition, Regime};
/// use rust_decimal::Decimal;
///
/// let benchmark = MarketBenchmark {
///     regime: Regime::Salaried,
///     proposal: Decimal::new(11000, 0),
///     market_average: Decimal::new(10000, 0),
///     percentage_diff: Decimal::new(1000, 2),
///     position: MarketPosition::Above,
/// };
/// assert!(benchmark.is_above());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketBenchmark {
    /// The regime being benchmarked.
    pub regime: Regime,
    /// The caller's gross figure for that regime.
    pub proposal: Decimal,
    /// The market average gross figure.
    pub market_average: Decimal,
    /// `(proposal - market) / market * 100`, two decimal places.
    pub percentage_diff: Decimal,
    /// Above or below the average.
    pub position: MarketPosition,
}

impl MarketBenchmark {
    /// Returns true if the proposal is at or above the market average.
    pub fn is_above(&self) -> bool {
        self.position == MarketPosition::Above
    }
}
