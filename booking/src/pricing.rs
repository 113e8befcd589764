//! Price quotes for a parking stay.
//!
//! A quote is billed on the exact duration of the stay (no rounding up to
//! whole hours). The platform service fee and the tax are both levied on the
//! space subtotal only; the tax is never applied to the fee.

use crate::types::{BasisPoints, Money, ParkingSpace};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Platform service fee: 15% of the subtotal
pub const SERVICE_FEE_RATE: BasisPoints = BasisPoints::new(1500);

/// Tax: 8% of the subtotal
pub const TAX_RATE: BasisPoints = BasisPoints::new(800);

const MILLIS_PER_HOUR: u128 = 3_600_000;

/// Reasons a quote cannot be produced
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Check-out is not strictly after check-in
    #[error("check-out ({check_out}) must be after check-in ({check_in})")]
    InvalidInterval {
        /// Requested start
        check_in: DateTime<Utc>,
        /// Requested end
        check_out: DateTime<Utc>,
    },

    /// The stay is too long or too expensive to be represented in cents
    #[error("quote amount overflows")]
    AmountOverflow,
}

/// Price breakdown for one space and one interval
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Billed duration in hours (fractional)
    pub hours: f64,
    /// Hourly rate x duration
    pub subtotal: Money,
    /// Service fee rate applied to the subtotal
    pub service_fee_rate: BasisPoints,
    /// Service fee amount
    pub service_fee: Money,
    /// Tax rate applied to the subtotal
    pub tax_rate: BasisPoints,
    /// Tax amount
    pub tax: Money,
    /// Subtotal + service fee + tax
    pub total: Money,
}

/// Prices a stay at `space` from `check_in` to `check_out`.
///
/// Amounts are rounded half-up to the cent at each line item and the total is
/// the exact sum of the rounded line items, so the breakdown always adds up.
///
/// # Errors
///
/// - [`PricingError::InvalidInterval`] if `check_out <= check_in`
/// - [`PricingError::AmountOverflow`] if an amount does not fit in cents
pub fn quote(
    space: &ParkingSpace,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
) -> Result<Quote, PricingError> {
    if check_out <= check_in {
        return Err(PricingError::InvalidInterval {
            check_in,
            check_out,
        });
    }

    // Positive by the check above
    let millis = u128::try_from((check_out - check_in).num_milliseconds())
        .map_err(|_| PricingError::AmountOverflow)?;

    let rate_cents = u128::from(space.hourly_rate.cents());
    let subtotal_cents = (rate_cents * millis + MILLIS_PER_HOUR / 2) / MILLIS_PER_HOUR;
    let subtotal = u64::try_from(subtotal_cents)
        .map(Money::from_cents)
        .map_err(|_| PricingError::AmountOverflow)?;

    let service_fee = subtotal
        .checked_apply_rate(SERVICE_FEE_RATE)
        .ok_or(PricingError::AmountOverflow)?;
    let tax = subtotal
        .checked_apply_rate(TAX_RATE)
        .ok_or(PricingError::AmountOverflow)?;
    let total = subtotal
        .checked_add(service_fee)
        .and_then(|sum| sum.checked_add(tax))
        .ok_or(PricingError::AmountOverflow)?;

    #[allow(clippy::cast_precision_loss)] // display value only
    let hours = millis as f64 / MILLIS_PER_HOUR as f64;

    Ok(Quote {
        hours,
        subtotal,
        service_fee_rate: SERVICE_FEE_RATE,
        service_fee,
        tax_rate: TAX_RATE,
        tax,
        total,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::SpaceId;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn space(rate_cents: u64) -> ParkingSpace {
        ParkingSpace {
            id: SpaceId::new("space_1"),
            title: "Downtown Garage".to_string(),
            address: "123 Main St".to_string(),
            hourly_rate: Money::from_cents(rate_cents),
            images: Vec::new(),
        }
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 25, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_full_day_at_fifteen_dollars() {
        let quote = quote(&space(1500), at(9, 0), at(18, 0)).unwrap();

        assert!((quote.hours - 9.0).abs() < f64::EPSILON);
        assert_eq!(quote.subtotal, Money::from_cents(13_500));
        assert_eq!(quote.service_fee, Money::from_cents(2_025));
        assert_eq!(quote.tax, Money::from_cents(1_080));
        assert_eq!(quote.total, Money::from_cents(16_605));
        assert_eq!(quote.total.to_string(), "$166.05");
    }

    #[test]
    fn test_partial_hours_are_not_rounded_up() {
        let quote = quote(&space(1000), at(9, 0), at(10, 30)).unwrap();

        assert!((quote.hours - 1.5).abs() < f64::EPSILON);
        assert_eq!(quote.subtotal, Money::from_cents(1_500));
    }

    #[test]
    fn test_tax_is_not_levied_on_the_fee() {
        let quote = quote(&space(10_000), at(9, 0), at(10, 0)).unwrap();

        // Compounded tax would be 8% of $115.00 = $9.20
        assert_eq!(quote.tax, Money::from_cents(800));
        assert_eq!(quote.total, Money::from_cents(12_300));
    }

    #[test]
    fn test_equal_times_are_invalid() {
        let result = quote(&space(1500), at(9, 0), at(9, 0));
        assert_eq!(
            result,
            Err(PricingError::InvalidInterval {
                check_in: at(9, 0),
                check_out: at(9, 0),
            })
        );
    }

    #[test]
    fn test_inverted_interval_is_invalid() {
        let result = quote(&space(1500), at(18, 0), at(9, 0));
        assert!(matches!(result, Err(PricingError::InvalidInterval { .. })));
    }

    #[test]
    fn test_free_space_quotes_zero() {
        let quote = quote(&space(0), at(9, 0), at(18, 0)).unwrap();
        assert_eq!(quote.total, Money::ZERO);
    }

    #[test]
    fn test_quote_is_idempotent() {
        let listing = space(1234);
        let first = quote(&listing, at(7, 13), at(19, 41)).unwrap();
        let second = quote(&listing, at(7, 13), at(19, 41)).unwrap();
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_total_is_sum_of_line_items(
            rate in 0u64..100_000,
            start in 0i64..10_000_000,
            minutes in 1i64..(60 * 24 * 90),
        ) {
            let check_in = Utc.timestamp_opt(1_700_000_000 + start, 0).unwrap();
            let check_out = check_in + Duration::minutes(minutes);
            let quote = quote(&space(rate), check_in, check_out).unwrap();

            prop_assert_eq!(
                quote.total.cents(),
                quote.subtotal.cents() + quote.service_fee.cents() + quote.tax.cents()
            );
            prop_assert_eq!(
                Some(quote.service_fee),
                quote.subtotal.checked_apply_rate(SERVICE_FEE_RATE)
            );
            prop_assert_eq!(Some(quote.tax), quote.subtotal.checked_apply_rate(TAX_RATE));
        }

        #[test]
        fn prop_non_positive_intervals_are_rejected(
            rate in 0u64..100_000,
            start in 0i64..10_000_000,
            back in 0i64..(60 * 24 * 90),
        ) {
            let check_in = Utc.timestamp_opt(1_700_000_000 + start, 0).unwrap();
            let check_out = check_in - Duration::minutes(back);
            let is_invalid = matches!(
                quote(&space(rate), check_in, check_out),
                Err(PricingError::InvalidInterval { .. })
            );
            prop_assert!(is_invalid);
        }
    }
}
