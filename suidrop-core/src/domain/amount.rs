//! Amount conversion between user-entered decimals and base units (MIST)
//!
//! All arithmetic goes through `rust_decimal` so that `0.1` SUI is exactly
//! 100_000_000 MIST and never a float approximation.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::result::{Error, Result};

/// Decimal places of the SUI coin (1 SUI = 10^9 MIST)
pub const SUI_DECIMALS: u32 = 9;

/// Fully qualified coin type of the native coin
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// Largest scale we accept; 10^18 still fits in a u64 multiplier
const MAX_DECIMALS: u32 = 18;

/// Clean up a raw amount string typed by a user.
///
/// Surrounding whitespace is removed and the first `,` is treated as the
/// decimal separator, so `"10,5"` and `"10.5"` are equivalent.
pub fn normalize_amount_input(raw: &str) -> String {
    raw.trim().replacen(',', ".", 1)
}

/// Parse a user-entered amount into base units.
///
/// Fails for non-numeric input, zero or negative amounts, amounts that round
/// to zero base units and amounts too large for a u64.
pub fn parse_amount(raw: &str, decimals: u32) -> Result<u64> {
    let cleaned = normalize_amount_input(raw);
    if cleaned.is_empty() {
        return Err(Error::InvalidAmount("amount is empty".to_string()));
    }

    let amount = Decimal::from_str(&cleaned)
        .map_err(|_| Error::InvalidAmount(format!("'{}' is not a number", raw.trim())))?;

    to_base_units(amount, decimals)
}

/// Convert a display amount into base units, rounding half away from zero.
pub fn to_base_units(amount: Decimal, decimals: u32) -> Result<u64> {
    if decimals > MAX_DECIMALS {
        return Err(Error::validation(format!(
            "coin decimals must be at most {}, got {}",
            MAX_DECIMALS, decimals
        )));
    }

    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount(format!(
            "{} must be greater than zero",
            amount
        )));
    }

    let multiplier = Decimal::from(10u64.pow(decimals));
    let scaled = amount
        .checked_mul(multiplier)
        .ok_or_else(|| Error::InvalidAmount(format!("{} is too large", amount)))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    let units = scaled
        .to_u64()
        .ok_or_else(|| Error::InvalidAmount(format!("{} is too large", amount)))?;

    if units == 0 {
        return Err(Error::InvalidAmount(format!(
            "{} is smaller than the smallest unit (10^-{})",
            amount, decimals
        )));
    }

    Ok(units)
}

/// Convert base units back into a display amount.
///
/// `decimals` must be at most 28 (the scale limit of `Decimal`).
pub fn from_base_units(units: u64, decimals: u32) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(units), decimals).normalize()
}

/// Render base units as a human-readable amount without trailing zeros
pub fn format_amount(units: u64, decimals: u32) -> String {
    from_base_units(units, decimals).to_string()
}

/// Total base units needed to pay `amount` to `count` recipients
pub fn total_required(amount: u64, count: usize) -> u128 {
    u128::from(amount) * count as u128
}
