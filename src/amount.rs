//! Conversions between integer cents and dollar decimals.
//!
//! ACH amounts travel as whole cents. Reporting layers usually want dollars,
//! so these helpers go through `rust_decimal` rather than floating point.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Number of decimal places in a dollar amount.
pub const SCALE: u32 = 2;

/// Converts cents to a dollar amount with exactly two decimal places.
///
/// ```
/// use ach_engine::amount;
///
/// assert_eq!(amount::to_dollars(799).to_string(), "7.99");
/// ```
pub fn to_dollars(cents: i64) -> Decimal {
    Decimal::new(cents, SCALE)
}

/// Converts a dollar amount to cents.
///
/// Returns `None` for sub-cent precision or values that do not fit in `i64`.
pub fn from_dollars(dollars: Decimal) -> Option<i64> {
    let cents = dollars.checked_mul(Decimal::ONE_HUNDRED)?;
    if !cents.fract().is_zero() {
        return None;
    }
    cents.to_i64()
}
