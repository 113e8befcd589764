//! The in-progress booking and the store that owns it.
//!
//! Field mutators never check which wizard step is showing. Whether a change
//! is allowed is decided by [`crate::validator`]; the draft only records
//! what changed.

use crate::gateway::SubmissionRequest;
use crate::pricing::{self, PricingError, Quote};
use crate::types::{ParkingSpace, PaymentMethod, Vehicle};
use crate::validator::StepError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position in the booking wizard
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    /// Step 1: choose check-in and check-out
    #[default]
    DateTime,
    /// Step 2: choose a vehicle
    Vehicle,
    /// Step 3: choose a payment method
    Payment,
    /// Step 4: review and confirm
    Confirm,
}

impl WizardStep {
    /// One-based step number as shown to the user
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::DateTime => 1,
            Self::Vehicle => 2,
            Self::Payment => 3,
            Self::Confirm => 4,
        }
    }

    /// The following step, bounded at [`WizardStep::Confirm`]
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::DateTime => Self::Vehicle,
            Self::Vehicle => Self::Payment,
            Self::Payment | Self::Confirm => Self::Confirm,
        }
    }

    /// The preceding step, bounded at [`WizardStep::DateTime`]
    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            Self::DateTime | Self::Vehicle => Self::DateTime,
            Self::Payment => Self::Vehicle,
            Self::Confirm => Self::Payment,
        }
    }

    /// Title shown in the wizard header
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::DateTime => "Date & Time",
            Self::Vehicle => "Vehicle",
            Self::Payment => "Payment",
            Self::Confirm => "Confirm",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.title())
    }
}

/// A booking being assembled by the wizard
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingDraft {
    /// The listing being booked; fixed for the lifetime of the draft
    space: ParkingSpace,
    /// Requested start, unset until step 1 is filled in
    pub check_in: Option<DateTime<Utc>>,
    /// Requested end, unset until step 1 is filled in
    pub check_out: Option<DateTime<Utc>>,
    /// Chosen vehicle
    pub vehicle: Option<Vehicle>,
    /// Chosen payment method
    pub payment_method: Option<PaymentMethod>,
    /// Current wizard position
    pub step: WizardStep,
    /// When the user started this booking attempt
    pub started_at: DateTime<Utc>,
}

impl BookingDraft {
    /// The listing being booked
    #[must_use]
    pub const fn space(&self) -> &ParkingSpace {
        &self.space
    }

    /// Both interval ends, if both are set
    #[must_use]
    pub fn interval(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.check_in.zip(self.check_out)
    }

    /// Quote over the current space and interval
    ///
    /// `None` while the interval is incomplete. Always recomputed, so it can
    /// never disagree with the interval it was derived from.
    #[must_use]
    pub fn quote(&self) -> Option<Result<Quote, PricingError>> {
        self.interval()
            .map(|(check_in, check_out)| pricing::quote(&self.space, check_in, check_out))
    }
}

/// Single-owner container for the active draft
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DraftStore {
    draft: Option<BookingDraft>,
}

impl DraftStore {
    /// Creates an empty store
    #[must_use]
    pub const fn new() -> Self {
        Self { draft: None }
    }

    /// Begins a new booking attempt for `space` on step 1
    ///
    /// Any previous draft, including its interval and selections, is discarded.
    pub fn start_draft(&mut self, space: ParkingSpace, now: DateTime<Utc>) -> &BookingDraft {
        self.draft.insert(BookingDraft {
            space,
            check_in: None,
            check_out: None,
            vehicle: None,
            payment_method: None,
            step: WizardStep::DateTime,
            started_at: now,
        })
    }

    /// True while a draft exists
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.draft.is_some()
    }

    /// The active draft
    #[must_use]
    pub const fn draft(&self) -> Option<&BookingDraft> {
        self.draft.as_ref()
    }

    /// The active draft, mutably
    pub fn draft_mut(&mut self) -> Option<&mut BookingDraft> {
        self.draft.as_mut()
    }

    /// Sets the stay interval. Returns false if there is no draft.
    pub fn set_interval(&mut self, check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> bool {
        self.draft_mut()
            .map(|draft| {
                draft.check_in = Some(check_in);
                draft.check_out = Some(check_out);
            })
            .is_some()
    }

    /// Sets the vehicle. Returns false if there is no draft.
    pub fn set_vehicle(&mut self, vehicle: Vehicle) -> bool {
        self.draft_mut()
            .map(|draft| draft.vehicle = Some(vehicle))
            .is_some()
    }

    /// Sets the payment method. Returns false if there is no draft.
    pub fn set_payment_method(&mut self, payment_method: PaymentMethod) -> bool {
        self.draft_mut()
            .map(|draft| draft.payment_method = Some(payment_method))
            .is_some()
    }

    /// Quote for the current draft, `None` if there is no draft or the
    /// interval is incomplete
    #[must_use]
    pub fn current_quote(&self) -> Option<Result<Quote, PricingError>> {
        self.draft.as_ref().and_then(BookingDraft::quote)
    }

    /// Builds the submission for the current draft
    ///
    /// # Errors
    ///
    /// Returns the first [`StepError`] that blocks the booking: no draft,
    /// an incomplete or invalid interval, or a missing selection.
    pub fn finalize(&self) -> Result<SubmissionRequest, StepError> {
        let draft = self.draft.as_ref().ok_or(StepError::NoActiveDraft)?;
        let (check_in, check_out) = draft.interval().ok_or(StepError::MissingInterval)?;
        let quote = pricing::quote(&draft.space, check_in, check_out)?;
        let vehicle = draft
            .vehicle
            .as_ref()
            .ok_or(StepError::NoVehicleSelected)?;
        let payment_method = draft
            .payment_method
            .as_ref()
            .ok_or(StepError::NoPaymentSelected)?;

        Ok(SubmissionRequest {
            space_id: draft.space.id.clone(),
            vehicle_id: vehicle.id.clone(),
            payment_method_id: payment_method.id.clone(),
            check_in,
            check_out,
            total_amount: quote.total,
        })
    }

    /// Discards the draft
    pub fn clear(&mut self) -> Option<BookingDraft> {
        self.draft.take()
    }
}
