//! Sample listings and account records.
//!
//! Used by the offline demo and by the test suites. All times are UTC and
//! fall on 2024-10-25, the day after [`sample_start`].

use crate::types::{
    Money, ParkingSpace, PaymentMethod, PaymentMethodId, SpaceId, Vehicle, VehicleId,
};
use chrono::{DateTime, TimeZone, Utc};

/// A $15/hour downtown garage
#[must_use]
pub fn downtown_garage() -> ParkingSpace {
    ParkingSpace {
        id: SpaceId::new("space_downtown"),
        title: "Downtown Garage".to_string(),
        address: "123 Main St".to_string(),
        hourly_rate: Money::from_cents(1_500),
        images: vec!["https://images.parkwise.example/downtown-1.jpg".to_string()],
    }
}

/// The user's default vehicle
#[must_use]
pub fn default_vehicle() -> Vehicle {
    Vehicle {
        id: VehicleId::new("veh_civic"),
        make: "Honda".to_string(),
        model: "Civic".to_string(),
        year: 2020,
        color: "Blue".to_string(),
        license_plate: "ABC-1234".to_string(),
        is_default: true,
    }
}

/// A second, non-default vehicle
#[must_use]
pub fn second_vehicle() -> Vehicle {
    Vehicle {
        id: VehicleId::new("veh_model3"),
        make: "Tesla".to_string(),
        model: "Model 3".to_string(),
        year: 2023,
        color: "White".to_string(),
        license_plate: "EV-0042".to_string(),
        is_default: false,
    }
}

/// The user's default card
#[must_use]
pub fn default_card() -> PaymentMethod {
    PaymentMethod {
        id: PaymentMethodId::new("pm_visa"),
        brand: "visa".to_string(),
        last4: "4242".to_string(),
        expiry_month: 12,
        expiry_year: 2027,
        holder_name: "Jordan Lee".to_string(),
        is_default: true,
    }
}

/// A second, non-default card
#[must_use]
pub fn second_card() -> PaymentMethod {
    PaymentMethod {
        id: PaymentMethodId::new("pm_mastercard"),
        brand: "mastercard".to_string(),
        last4: "5555".to_string(),
        expiry_month: 3,
        expiry_year: 2026,
        holder_name: "Jordan Lee".to_string(),
        is_default: false,
    }
}

/// When the sample booking attempt starts: 2024-10-24 12:00:00 UTC
#[must_use]
pub fn sample_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 24, 12, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// `hour`:00 on 2024-10-25
///
/// Hours past 23 roll over into the following days.
#[must_use]
pub fn morning(hour: u32) -> DateTime<Utc> {
    let midnight = Utc
        .with_ymd_and_hms(2024, 10, 25, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    midnight + chrono::Duration::hours(i64::from(hour))
}
