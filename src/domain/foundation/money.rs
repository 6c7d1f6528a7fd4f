//! Conversion between major-unit amounts and processor minor units.
//!
//! Fees are stored as `Decimal` major units (500 means $500.00). The payment
//! processor works in integer cents.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::ValidationError;

/// Converts a positive major-unit amount into integer minor units.
///
/// Rejects zero, negatives and sub-cent precision.
pub fn to_minor_units(amount: Decimal) -> Result<i64, ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::not_positive("cost", amount));
    }

    let minor = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| ValidationError::invalid_format("cost", "amount too large"))?;

    if !minor.fract().is_zero() {
        return Err(ValidationError::invalid_format(
            "cost",
            "more than two decimal places",
        ));
    }

    minor
        .to_i64()
        .ok_or_else(|| ValidationError::invalid_format("cost", "amount too large"))
}

/// Converts integer minor units back into a major-unit amount.
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2).normalize()
}
