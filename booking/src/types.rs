//! Domain types for the booking engine.
//!
//! Listings, vehicles and payment methods are owned by other services; the
//! wizard only ever holds read-only copies of them. Identifiers are opaque
//! strings because they are minted elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an identifier issued by the owning service
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the raw identifier
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a parking space listing
    SpaceId
);
string_id!(
    /// Identifier of a registered vehicle
    VehicleId
);
string_id!(
    /// Identifier of a stored payment method
    PaymentMethodId
);
string_id!(
    /// Identifier of a persisted booking
    BookingId
);

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Represents money in cents to avoid floating-point arithmetic errors
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Returns the amount in dollars (rounded down)
    #[must_use]
    pub const fn dollars(&self) -> u64 {
        self.0 / 100
    }

    /// Adds two money amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Applies a rate, rounding half-up to the cent
    ///
    /// Returns `None` if the result does not fit in `u64` cents.
    #[must_use]
    pub fn checked_apply_rate(self, rate: BasisPoints) -> Option<Self> {
        let scaled = u128::from(self.0) * u128::from(rate.get());
        let cents = (scaled + u128::from(BasisPoints::ONE_HUNDRED_PERCENT / 2))
            / u128::from(BasisPoints::ONE_HUNDRED_PERCENT);
        u64::try_from(cents).ok().map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.dollars(), self.0 % 100)
    }
}

/// A rate expressed in basis points (1 bp = 0.01%)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// 100% in basis points
    pub const ONE_HUNDRED_PERCENT: u32 = 10_000;

    /// Creates a rate from basis points
    #[must_use]
    pub const fn new(bps: u32) -> Self {
        Self(bps)
    }

    /// Raw basis points
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        match self.0 % 100 {
            0 => write!(f, "{whole}%"),
            frac => write!(f, "{whole}.{frac:02}%"),
        }
    }
}

// ============================================================================
// External records
// ============================================================================

/// A parking space listing, as supplied by the listing service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpace {
    /// Listing ID
    pub id: SpaceId,
    /// Display title
    pub title: String,
    /// Street address
    pub address: String,
    /// Price per hour
    pub hourly_rate: Money,
    /// Image URLs
    #[serde(default)]
    pub images: Vec<String>,
}

/// A vehicle registered to the signed-in user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// Vehicle ID
    pub id: VehicleId,
    /// Manufacturer
    pub make: String,
    /// Model name
    pub model: String,
    /// Model year
    pub year: u16,
    /// Paint color
    pub color: String,
    /// License plate
    pub license_plate: String,
    /// Whether the user marked this vehicle as their default
    #[serde(default)]
    pub is_default: bool,
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.year, self.make, self.model, self.license_plate
        )
    }
}

/// A stored payment card
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    /// Payment method ID
    pub id: PaymentMethodId,
    /// Card brand (visa, mastercard, ...)
    pub brand: String,
    /// Last four digits of the card number
    pub last4: String,
    /// Expiry month (1-12)
    pub expiry_month: u8,
    /// Expiry year
    pub expiry_year: u16,
    /// Name on the card
    pub holder_name: String,
    /// Whether the user marked this card as their default
    #[serde(default)]
    pub is_default: bool,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ending in {} (exp {:02}/{})",
            self.brand, self.last4, self.expiry_month, self.expiry_year
        )
    }
}

/// Records that can be marked as the user's default choice
pub trait DefaultSelectable {
    /// True when the user flagged this record as their default
    fn is_default(&self) -> bool;
}

impl DefaultSelectable for Vehicle {
    fn is_default(&self) -> bool {
        self.is_default
    }
}

impl DefaultSelectable for PaymentMethod {
    fn is_default(&self) -> bool {
        self.is_default
    }
}

// ============================================================================
// Booking record (returned by the submission gateway)
// ============================================================================

/// Lifecycle status reported by the booking service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Awaiting host or payment confirmation
    Pending,
    /// Confirmed and paid
    Confirmed,
}

/// A persisted booking
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    /// Booking ID
    pub id: BookingId,
    /// Booked space
    pub space_id: SpaceId,
    /// Vehicle that will park
    pub vehicle_id: VehicleId,
    /// Payment method charged
    pub payment_method_id: PaymentMethodId,
    /// Start of the stay
    pub check_in: DateTime<Utc>,
    /// End of the stay
    pub check_out: DateTime<Utc>,
    /// Amount charged
    pub total_amount: Money,
    /// Booking status
    pub status: BookingStatus,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(16_605).to_string(), "$166.05");
        assert_eq!(Money::from_cents(7).to_string(), "$0.07");
        assert_eq!(Money::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_apply_rate_rounds_half_up() {
        // 15% of $0.10 is 1.5 cents
        assert_eq!(
            Money::from_cents(10).checked_apply_rate(BasisPoints::new(1500)),
            Some(Money::from_cents(2))
        );
        // 8% of $0.06 is 0.48 cents
        assert_eq!(
            Money::from_cents(6).checked_apply_rate(BasisPoints::new(800)),
            Some(Money::from_cents(0))
        );
    }

    #[test]
    fn test_apply_rate_overflow() {
        assert_eq!(
            Money::from_cents(u64::MAX).checked_apply_rate(BasisPoints::new(20_000)),
            None
        );
    }

    #[test]
    fn test_basis_points_display() {
        assert_eq!(BasisPoints::new(1500).to_string(), "15%");
        assert_eq!(BasisPoints::new(825).to_string(), "8.25%");
    }

    #[test]
    fn test_records_use_camel_case_on_the_wire() {
        let json = serde_json::json!({
            "id": "veh_1",
            "make": "Honda",
            "model": "Civic",
            "year": 2020,
            "color": "Blue",
            "licensePlate": "ABC-1234",
            "isDefault": true
        });

        let vehicle: Vehicle = serde_json::from_value(json).unwrap();
        assert_eq!(vehicle.id, VehicleId::new("veh_1"));
        assert!(vehicle.is_default);
        assert_eq!(vehicle.to_string(), "2020 Honda Civic (ABC-1234)");
    }
}
