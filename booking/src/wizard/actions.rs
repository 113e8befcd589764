//! Wizard actions.

use crate::gateway::SubmissionError;
use crate::types::{BookingRecord, ParkingSpace, PaymentMethod, Vehicle};
use chrono::{DateTime, Utc};

/// Everything the booking wizard reacts to
///
/// The first group is user input. The second group is produced by effects;
/// each carries the session it was issued for so late answers from an
/// abandoned session can be told apart.
#[derive(Clone, Debug, PartialEq)]
pub enum WizardAction {
    // User input
    /// Open the wizard for a listing
    Start {
        /// Listing to book
        space: ParkingSpace,
    },
    /// Choose the stay interval (step 1)
    SetInterval {
        /// Requested start
        check_in: DateTime<Utc>,
        /// Requested end
        check_out: DateTime<Utc>,
    },
    /// Choose a vehicle (step 2)
    SetVehicle {
        /// Selected vehicle
        vehicle: Vehicle,
    },
    /// Choose a payment method (step 3)
    SetPaymentMethod {
        /// Selected payment method
        payment_method: PaymentMethod,
    },
    /// Move forward if the current step is complete
    Continue,
    /// Move back one step
    Back,
    /// Ask to abandon the booking
    Cancel,
    /// Confirm abandoning the booking
    ConfirmCancel,
    /// Keep editing after a cancel request
    DismissCancel,
    /// Submit the booking (step 4, or retry after a failure)
    Submit,
    /// Hide the inline message
    DismissWarning,

    // Effect feedback
    /// Vehicle lookup finished
    VehiclesLoaded {
        /// Session the lookup was issued for
        session: u64,
        /// The user's vehicles
        vehicles: Vec<Vehicle>,
    },
    /// Vehicle lookup failed
    VehiclesUnavailable {
        /// Session the lookup was issued for
        session: u64,
        /// Failure description
        reason: String,
    },
    /// Payment method lookup finished
    PaymentMethodsLoaded {
        /// Session the lookup was issued for
        session: u64,
        /// The user's payment methods
        payment_methods: Vec<PaymentMethod>,
    },
    /// Payment method lookup failed
    PaymentMethodsUnavailable {
        /// Session the lookup was issued for
        session: u64,
        /// Failure description
        reason: String,
    },
    /// The booking was persisted
    SubmissionSucceeded {
        /// Session the submission was issued for
        session: u64,
        /// The persisted booking
        booking: BookingRecord,
    },
    /// The booking could not be persisted
    SubmissionFailed {
        /// Session the submission was issued for
        session: u64,
        /// What went wrong
        error: SubmissionError,
    },
}

impl WizardAction {
    /// True for the actions that end a submission
    #[must_use]
    pub const fn is_submission_outcome(&self) -> bool {
        matches!(
            self,
            Self::SubmissionSucceeded { .. } | Self::SubmissionFailed { .. }
        )
    }

    /// Short name for logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::SetInterval { .. } => "set_interval",
            Self::SetVehicle { .. } => "set_vehicle",
            Self::SetPaymentMethod { .. } => "set_payment_method",
            Self::Continue => "continue",
            Self::Back => "back",
            Self::Cancel => "cancel",
            Self::ConfirmCancel => "confirm_cancel",
            Self::DismissCancel => "dismiss_cancel",
            Self::Submit => "submit",
            Self::DismissWarning => "dismiss_warning",
            Self::VehiclesLoaded { .. } => "vehicles_loaded",
            Self::VehiclesUnavailable { .. } => "vehicles_unavailable",
            Self::PaymentMethodsLoaded { .. } => "payment_methods_loaded",
            Self::PaymentMethodsUnavailable { .. } => "payment_methods_unavailable",
            Self::SubmissionSucceeded { .. } => "submission_succeeded",
            Self::SubmissionFailed { .. } => "submission_failed",
        }
    }
}
