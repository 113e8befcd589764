//! Step guards for the booking wizard.
//!
//! Two questions are answered here: may the user leave the current step
//! ([`can_advance`]) and may a field be changed on the step being shown
//! ([`can_edit`]). Both are pure functions over the draft.

use crate::draft::{BookingDraft, WizardStep};
use crate::pricing::{self, PricingError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A draft field that is owned by exactly one wizard step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Check-in and check-out
    Interval,
    /// Vehicle selection
    Vehicle,
    /// Payment method selection
    PaymentMethod,
}

impl Field {
    /// The step on which this field may be edited
    #[must_use]
    pub const fn owning_step(self) -> WizardStep {
        match self {
            Self::Interval => WizardStep::DateTime,
            Self::Vehicle => WizardStep::Vehicle,
            Self::PaymentMethod => WizardStep::Payment,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Interval => "date and time",
            Self::Vehicle => "vehicle",
            Self::PaymentMethod => "payment method",
        })
    }
}

/// Why the wizard refused an input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    /// Check-in or check-out has not been chosen
    #[error("select check-in and check-out times")]
    MissingInterval,

    /// Check-out is not after check-in
    #[error("check-out must be after check-in")]
    InvalidInterval,

    /// No vehicle has been chosen
    #[error("select a vehicle")]
    NoVehicleSelected,

    /// No payment method has been chosen
    #[error("select a payment method")]
    NoPaymentSelected,

    /// The field cannot be changed on the step being shown
    #[error("the {field} cannot be changed on {step}")]
    FieldLocked {
        /// Field the user tried to change
        field: Field,
        /// Step being shown at the time
        step: WizardStep,
    },

    /// There is no booking in progress
    #[error("no booking in progress")]
    NoActiveDraft,

    /// Another booking must be finished or cancelled first
    #[error("a booking is already in progress")]
    DraftInProgress,

    /// The interval is valid but could not be priced
    #[error("unable to price this stay: {0}")]
    Pricing(PricingError),
}

impl From<PricingError> for StepError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidInterval { .. } => Self::InvalidInterval,
            other @ PricingError::AmountOverflow => Self::Pricing(other),
        }
    }
}

/// Checks whether the draft may move on from its current step
///
/// Step 1 needs a priceable interval, step 2 a vehicle and step 3 a payment
/// method. Step 4 has no forward transition of its own (submission is a
/// separate operation) so it always passes.
///
/// # Errors
///
/// Returns the [`StepError`] describing what the current step is missing.
pub fn can_advance(draft: &BookingDraft) -> Result<(), StepError> {
    match draft.step {
        WizardStep::DateTime => {
            let (check_in, check_out) = draft.interval().ok_or(StepError::MissingInterval)?;
            pricing::quote(draft.space(), check_in, check_out)?;
            Ok(())
        },
        WizardStep::Vehicle => draft
            .vehicle
            .as_ref()
            .map(|_| ())
            .ok_or(StepError::NoVehicleSelected),
        WizardStep::Payment => draft
            .payment_method
            .as_ref()
            .map(|_| ())
            .ok_or(StepError::NoPaymentSelected),
        WizardStep::Confirm => Ok(()),
    }
}

/// Checks whether `field` may be edited while `step` is shown
///
/// # Errors
///
/// Returns [`StepError::FieldLocked`] unless `step` owns `field`.
pub fn can_edit(step: WizardStep, field: Field) -> Result<(), StepError> {
    if field.owning_step() == step {
        Ok(())
    } else {
        Err(StepError::FieldLocked { field, step })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::draft::DraftStore;
    use crate::fixtures::{default_card, default_vehicle, downtown_garage, morning, sample_start};

    fn draft_on(step: WizardStep) -> DraftStore {
        let mut store = DraftStore::new();
        store.start_draft(downtown_garage(), sample_start());
        store.draft_mut().unwrap().step = step;
        store
    }

    #[test]
    fn test_step_one_requires_an_interval() {
        let store = draft_on(WizardStep::DateTime);
        assert_eq!(
            can_advance(store.draft().unwrap()),
            Err(StepError::MissingInterval)
        );
    }

    #[test]
    fn test_step_one_rejects_half_an_interval() {
        let mut store = draft_on(WizardStep::DateTime);
        store.draft_mut().unwrap().check_in = Some(morning(9));

        assert_eq!(
            can_advance(store.draft().unwrap()),
            Err(StepError::MissingInterval)
        );
    }

    #[test]
    fn test_step_one_rejects_inverted_interval() {
        let mut store = draft_on(WizardStep::DateTime);
        store.set_interval(morning(18), morning(9));

        assert_eq!(
            can_advance(store.draft().unwrap()),
            Err(StepError::InvalidInterval)
        );
    }

    #[test]
    fn test_step_one_passes_with_valid_interval() {
        let mut store = draft_on(WizardStep::DateTime);
        store.set_interval(morning(9), morning(18));

        assert_eq!(can_advance(store.draft().unwrap()), Ok(()));
    }

    #[test]
    fn test_selection_steps_require_a_choice() {
        let mut store = draft_on(WizardStep::Vehicle);
        assert_eq!(
            can_advance(store.draft().unwrap()),
            Err(StepError::NoVehicleSelected)
        );
        store.set_vehicle(default_vehicle());
        assert_eq!(can_advance(store.draft().unwrap()), Ok(()));

        store.draft_mut().unwrap().step = WizardStep::Payment;
        assert_eq!(
            can_advance(store.draft().unwrap()),
            Err(StepError::NoPaymentSelected)
        );
        store.set_payment_method(default_card());
        assert_eq!(can_advance(store.draft().unwrap()), Ok(()));
    }

    #[test]
    fn test_confirm_step_always_passes() {
        let store = draft_on(WizardStep::Confirm);
        assert_eq!(can_advance(store.draft().unwrap()), Ok(()));
    }

    #[test]
    fn test_fields_are_editable_only_on_their_step() {
        assert_eq!(can_edit(WizardStep::DateTime, Field::Interval), Ok(()));
        assert_eq!(can_edit(WizardStep::Vehicle, Field::Vehicle), Ok(()));
        assert_eq!(can_edit(WizardStep::Payment, Field::PaymentMethod), Ok(()));

        assert_eq!(
            can_edit(WizardStep::Payment, Field::Interval),
            Err(StepError::FieldLocked {
                field: Field::Interval,
                step: WizardStep::Payment,
            })
        );
        assert!(can_edit(WizardStep::Confirm, Field::Vehicle).is_err());
    }

    #[test]
    fn test_pricing_errors_map_to_step_errors() {
        let invalid = PricingError::InvalidInterval {
            check_in: morning(10),
            check_out: morning(9),
        };
        assert_eq!(StepError::from(invalid), StepError::InvalidInterval);
        assert_eq!(
            StepError::from(PricingError::AmountOverflow),
            StepError::Pricing(PricingError::AmountOverflow)
        );
    }

    #[test]
    fn test_locked_field_message_names_the_step() {
        let err = can_edit(WizardStep::Confirm, Field::PaymentMethod).unwrap_err();
        assert_eq!(
            err.to_string(),
            "the payment method cannot be changed on step 4 (Confirm)"
        );
    }
}
