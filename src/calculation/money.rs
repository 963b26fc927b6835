//! Currency rounding and formatting.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// The largest monthly amount accepted as input: R$ 1.000.000.000,00.
///
/// Annualizing it and applying any table stays far inside `Decimal` range.
pub const MAX_MONTHLY_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Checks that a monthly input amount is between zero and
/// [`MAX_MONTHLY_AMOUNT`].
///
/// # Errors
///
/// Returns [`EngineError::NegativeGross`] below zero and
/// [`EngineError::InvalidInput`] above the maximum.
pub fn check_amount(field: &str, amount: Decimal) -> EngineResult<Decimal> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(EngineError::NegativeGross {
            field: field.to_string(),
            amount,
        });
    }
    if amount > MAX_MONTHLY_AMOUNT {
        return Err(EngineError::InvalidInput {
            field: field.to_string(),
            message: format!(
                "{} exceeds the maximum monthly amount of {}",
                amount,
                format_brl(MAX_MONTHLY_AMOUNT)
            ),
        });
    }
    Ok(amount)
}

/// Rounds a decimal value to the cent using half-up rounding.
///
/// Values at exactly half a cent are rounded away from zero.
///
/// # Examples
///
/// ```
/// use tradupay_engine::calculation::round_half_up;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_half_up(Decimal::from_str("951.6344").unwrap()), Decimal::from_str("951.63").unwrap());
/// assert_eq!(round_half_up(Decimal::from_str("0.005").unwrap()), Decimal::from_str("0.01").unwrap());
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a decimal value up to the next cent.
///
/// Used where an amount must reach a minimum, such as the pró-labore that
/// keeps Fator R at its threshold.
pub fn ceil_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::AwayFromZero)
}

/// Formats an amount as Brazilian reais, e.g. `R$ 1.234,56`.
///
/// # Examples
///
/// ```
/// use tradupay_engine::calculation::format_brl;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(format_brl(Decimal::from_str("7468.8").unwrap()), "R$ 7.468,80");
/// assert_eq!(format_brl(Decimal::from_str("-200").unwrap()), "-R$ 200,00");
/// ```
pub fn format_brl(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let plain = format!("{:.2}", rounded.abs());
    let (integer, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{}R$ {},{}", sign, grouped, cents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec("123.454")), dec("123.45"));
    }

    #[test]
    fn test_round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec("123.455")), dec("123.46"));
    }

    #[test]
    fn test_round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec("-123.455")), dec("-123.46"));
    }

    #[test]
    fn test_ceil_cents_rounds_any_fraction_up() {
        assert_eq!(ceil_cents(dec("1517.8801")), dec("1517.89"));
        assert_eq!(ceil_cents(dec("2800")), dec("2800"));
    }

    #[test]
    fn test_format_brl_groups_thousands() {
        assert_eq!(format_brl(dec("1234567.891")), "R$ 1.234.567,89");
        assert_eq!(format_brl(dec("100000")), "R$ 100.000,00");
    }

    #[test]
    fn test_format_brl_small_values() {
        assert_eq!(format_brl(dec("0")), "R$ 0,00");
        assert_eq!(format_brl(dec("0.5")), "R$ 0,50");
        assert_eq!(format_brl(dec("999.99")), "R$ 999,99");
    }

    #[test]
    fn test_check_amount_accepts_range() {
        assert_eq!(check_amount("gross", Decimal::ZERO).unwrap(), Decimal::ZERO);
        assert_eq!(
            check_amount("gross", MAX_MONTHLY_AMOUNT).unwrap(),
            dec("1000000000")
        );
    }

    #[test]
    fn test_check_amount_rejects_negative() {
        assert!(matches!(
            check_amount("gross", dec("-0.01")),
            Err(EngineError::NegativeGross { .. })
        ));
    }

    #[test]
    fn test_check_amount_rejects_above_maximum() {
        let err = check_amount("contractor_gross", Decimal::MAX).unwrap_err();

        match &err {
            EngineError::InvalidInput { field, message } => {
                assert_eq!(field, "contractor_gross");
                assert!(message.contains("R$ 1.000.000.000,00"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_format_brl_negative_values() {
        assert_eq!(format_brl(dec("-1618.46")), "-R$ 1.618,46");
        assert_eq!(format_brl(dec("-0.001")), "R$ 0,00");
    }
}
