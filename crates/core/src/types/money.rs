//! Exact currency conversion helpers.
//!
//! All monetary values in the system are `rust_decimal::Decimal`. Floating
//! point never touches currency math; the only conversion is to the integer
//! minor-unit representation (cents) the payment gateway expects.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Minor units per major unit for two-decimal currencies (USD, EUR, ...).
const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Convert a decimal amount in major units to integer minor units (cents).
///
/// Rounds to the nearest cent, away from zero on midpoints (the behavior
/// customers expect on receipts). Returns `None` if the amount does not fit
/// in an `i64` after scaling.
#[must_use]
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    (amount * Decimal::from(MINOR_UNITS_PER_MAJOR))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Convert integer minor units (cents) back to a decimal amount in major units.
#[must_use]
pub fn from_minor_units(cents: i64) -> Decimal {
    Decimal::new(cents, 2).normalize()
}

/// Compute `percentage` percent of `amount`, exactly.
///
/// The result is normalized so that whole amounts render without trailing
/// zeros (e.g. 30% of 100000 is `30000`, not `30000.00`).
#[must_use]
pub fn percentage_of(amount: Decimal, percentage: u32) -> Decimal {
    (amount * Decimal::from(percentage) / Decimal::from(100_u32)).normalize()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_to_minor_units_exact() {
        assert_eq!(to_minor_units(Decimal::from_str("89.99").unwrap()), Some(8999));
        assert_eq!(to_minor_units(Decimal::from(250)), Some(25000));
        assert_eq!(to_minor_units(Decimal::ZERO), Some(0));
    }

    #[test]
    fn test_to_minor_units_rounds_midpoint_away_from_zero() {
        assert_eq!(to_minor_units(Decimal::from_str("1.005").unwrap()), Some(101));
        assert_eq!(to_minor_units(Decimal::from_str("-1.005").unwrap()), Some(-101));
    }

    #[test]
    fn test_from_minor_units() {
        assert_eq!(from_minor_units(8999), Decimal::from_str("89.99").unwrap());
        assert_eq!(from_minor_units(25000).to_string(), "250");
    }

    #[test]
    fn test_percentage_of_renders_without_trailing_zeros() {
        let deposit = percentage_of(Decimal::from(100_000), 30);
        assert_eq!(deposit.to_string(), "30000");

        let deposit = percentage_of(Decimal::from(100_000), 25);
        assert_eq!(deposit.to_string(), "25000");
    }

    #[test]
    fn test_percentage_of_fractional_budget() {
        let deposit = percentage_of(Decimal::from_str("999.99").unwrap(), 25);
        assert_eq!(deposit.to_string(), "249.9975");
    }
}
