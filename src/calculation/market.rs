//! Market salary benchmarks.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::MarketRate;
use crate::models::{MarketBenchmark, MarketPosition, Regime};

/// Compares a proposal with the market average for one regime.
///
/// Returns `None` when the reference row has no positive average for the
/// regime, or when the difference cannot be represented; an absent
/// benchmark is not an error.
pub fn benchmark(regime: Regime, proposal: Decimal, rate: &MarketRate) -> Option<MarketBenchmark> {
    let market_average = match regime {
        Regime::Salaried => Some(rate.clt_average),
        Regime::Contractor => rate.pj_average,
    }
    .filter(|average| *average > Decimal::ZERO)?;

    let percentage_diff = proposal
        .checked_sub(market_average)?
        .checked_div(market_average)?
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let position = if percentage_diff >= Decimal::ZERO {
        MarketPosition::Above
    } else {
        MarketPosition::Below
    };

    Some(MarketBenchmark {
        regime,
        proposal,
        market_average,
        percentage_diff,
        position,
    })
}
