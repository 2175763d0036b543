//! Money helpers.
//!
//! Amounts are `rust_decimal::Decimal` end to end (PostgreSQL `NUMERIC`,
//! decimal strings in JSON). Rounding is half away from zero to two places.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::CoreError;

/// Number of decimal places kept for every monetary amount.
pub const MONEY_SCALE: u32 = 2;

/// Default French VAT rate (20 %).
pub const DEFAULT_VAT_RATE: Decimal = Decimal::from_parts(2000, 0, 0, false, 2);

/// Round to two decimal places, half away from zero, with a fixed scale of 2.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Format an amount with exactly two decimals (`"540.00"`).
pub fn format_money(value: Decimal) -> String {
    round_money(value).to_string()
}

/// Parse a user-supplied amount. Accepts a comma as decimal separator.
pub fn parse_money(input: &str) -> Result<Decimal, CoreError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    Decimal::from_str(&cleaned)
        .map_err(|_| CoreError::Validation(format!("Invalid amount '{input}'")))
}

/// `amount × rate / 100`, unrounded.
pub fn percent_of(amount: Decimal, rate: Decimal) -> Decimal {
    amount * rate / Decimal::ONE_HUNDRED
}

/// Validate that a percentage (discount, VAT rate) lies in `[0, 100]`.
pub fn validate_percentage(field: &str, value: Decimal) -> Result<(), CoreError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(CoreError::Validation(format!(
            "{field} must be between 0 and 100 (got {value})"
        )));
    }
    Ok(())
}
