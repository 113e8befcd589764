//! Reducer for the booking wizard.

use super::{Listing, WizardAction, WizardEnvironment, WizardState, WizardStatus};
use crate::draft::WizardStep;
use crate::types::{ParkingSpace, PaymentMethod, Vehicle};
use crate::validator::{self, Field, StepError};
use chrono::{DateTime, Utc};
use parkwise_core::{SmallVec, async_effect, effect::Effect, reducer::Reducer, smallvec};

type Effects = SmallVec<[Effect<WizardAction>; 4]>;

/// Drives the four-step booking wizard
///
/// Field edits are step-scoped through [`validator::can_edit`], forward
/// moves are gated by [`validator::can_advance`], and the only I/O (catalog
/// lookups on entering steps 2 and 3, and the final submission) is returned
/// as effects.
#[derive(Clone, Copy, Debug, Default)]
pub struct WizardReducer;

impl WizardReducer {
    /// Creates the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn start(state: &mut WizardState, space: ParkingSpace, env: &WizardEnvironment) -> Effects {
        if state.drafts.is_active() {
            tracing::warn!(
                session = state.session,
                "Start ignored: a booking is already in progress"
            );
            state.warning = Some(StepError::DraftInProgress);
            return SmallVec::new();
        }

        state.session += 1;
        tracing::info!(session = state.session, space_id = %space.id, "Booking wizard opened");

        state.drafts.start_draft(space, env.clock().now());
        state.status = WizardStatus::Editing;
        state.warning = None;
        state.confirming_cancel = false;
        state.vehicles = Listing::NotLoaded;
        state.payment_methods = Listing::NotLoaded;
        SmallVec::new()
    }

    /// The step being edited, or `None` if input is currently ignored
    fn editable_step(state: &WizardState, action: &'static str) -> Option<WizardStep> {
        if state.status != WizardStatus::Editing || state.confirming_cancel {
            tracing::debug!(action, status = ?state.status, "Input ignored");
            return None;
        }
        state.step()
    }

    /// Checks that `field` may change now, surfacing the reason if not
    fn may_edit(state: &mut WizardState, field: Field, action: &'static str) -> bool {
        let Some(step) = Self::editable_step(state, action) else {
            return false;
        };
        match validator::can_edit(step, field) {
            Ok(()) => true,
            Err(reason) => {
                tracing::warn!(%field, step = step.number(), "Edit rejected");
                state.warning = Some(reason);
                false
            },
        }
    }

    fn set_interval(state: &mut WizardState, check_in: DateTime<Utc>, check_out: DateTime<Utc>) {
        if !Self::may_edit(state, Field::Interval, "set_interval") {
            return;
        }
        state.drafts.set_interval(check_in, check_out);

        // Shown inline right away; advancing is still blocked by the validator
        state.warning = (check_out <= check_in).then_some(StepError::InvalidInterval);
        tracing::debug!(%check_in, %check_out, "Interval set");
    }

    fn set_vehicle(state: &mut WizardState, vehicle: Vehicle) {
        if !Self::may_edit(state, Field::Vehicle, "set_vehicle") {
            return;
        }
        tracing::debug!(vehicle_id = %vehicle.id, "Vehicle selected");
        state.drafts.set_vehicle(vehicle);
        state.warning = None;
    }

    fn set_payment_method(state: &mut WizardState, payment_method: PaymentMethod) {
        if !Self::may_edit(state, Field::PaymentMethod, "set_payment_method") {
            return;
        }
        tracing::debug!(payment_method_id = %payment_method.id, "Payment method selected");
        state.drafts.set_payment_method(payment_method);
        state.warning = None;
    }

    fn advance(state: &mut WizardState, env: &WizardEnvironment) -> Effects {
        let Some(step) = Self::editable_step(state, "continue") else {
            return SmallVec::new();
        };
        if step == WizardStep::Confirm {
            tracing::debug!("Continue on the confirm step does nothing; submit instead");
            return SmallVec::new();
        }

        let verdict = state
            .draft()
            .map_or(Err(StepError::NoActiveDraft), validator::can_advance);

        match verdict {
            Ok(()) => {
                state.warning = None;
                tracing::info!(from = step.number(), to = step.next().number(), "Step advanced");
                Self::move_to(state, step.next(), env)
            },
            Err(reason) => {
                tracing::info!(step = step.number(), %reason, "Advance blocked");
                metrics::counter!("wizard.advance.blocked", "step" => step.title()).increment(1);
                state.warning = Some(reason);
                SmallVec::new()
            },
        }
    }

    fn retreat(state: &mut WizardState, env: &WizardEnvironment) -> Effects {
        if state.confirming_cancel {
            tracing::debug!("Back ignored while a cancel awaits confirmation");
            return SmallVec::new();
        }
        match state.status {
            WizardStatus::Editing => {},
            WizardStatus::Failed { .. } => {
                tracing::info!("Leaving failed submission to edit the booking");
                state.status = WizardStatus::Editing;
            },
            _ => {
                tracing::debug!(status = ?state.status, "Back ignored");
                return SmallVec::new();
            },
        }

        let Some(step) = state.step() else {
            return SmallVec::new();
        };
        state.warning = None;
        if step == WizardStep::DateTime {
            return SmallVec::new();
        }

        tracing::info!(from = step.number(), to = step.previous().number(), "Step retreated");
        Self::move_to(state, step.previous(), env)
    }

    /// Moves the draft to `step` and loads the list that step needs
    fn move_to(state: &mut WizardState, step: WizardStep, env: &WizardEnvironment) -> Effects {
        if let Some(draft) = state.drafts.draft_mut() {
            draft.step = step;
        }
        Self::preselect_defaults(state);

        let session = state.session;
        match step {
            WizardStep::Vehicle if state.vehicles.needs_fetch() => {
                tracing::debug!(session, "Loading vehicles");
                state.vehicles = Listing::Loading;
                let lookup = env.catalog().vehicles();
                smallvec![async_effect! {
                    match lookup.await {
                        Ok(vehicles) => Some(WizardAction::VehiclesLoaded { session, vehicles }),
                        Err(error) => Some(WizardAction::VehiclesUnavailable {
                            session,
                            reason: error.to_string(),
                        }),
                    }
                }]
            },
            WizardStep::Payment if state.payment_methods.needs_fetch() => {
                tracing::debug!(session, "Loading payment methods");
                state.payment_methods = Listing::Loading;
                let lookup = env.catalog().payment_methods();
                smallvec![async_effect! {
                    match lookup.await {
                        Ok(payment_methods) => {
                            Some(WizardAction::PaymentMethodsLoaded { session, payment_methods })
                        },
                        Err(error) => Some(WizardAction::PaymentMethodsUnavailable {
                            session,
                            reason: error.to_string(),
                        }),
                    }
                }]
            },
            _ => SmallVec::new(),
        }
    }

    /// Fills an empty selection on the step that owns it from a loaded list
    ///
    /// Lists can arrive after the user has moved on; the default is then
    /// applied the next time its step is entered.
    fn preselect_defaults(state: &mut WizardState) {
        let Some(step) = state.step() else {
            return;
        };
        let vehicle = (step == Field::Vehicle.owning_step())
            .then(|| state.vehicles.default_item())
            .flatten();
        let payment_method = (step == Field::PaymentMethod.owning_step())
            .then(|| state.payment_methods.default_item())
            .flatten();

        if let Some(draft) = state.drafts.draft_mut() {
            if draft.vehicle.is_none() {
                draft.vehicle = vehicle;
            }
            if draft.payment_method.is_none() {
                draft.payment_method = payment_method;
            }
        }
    }

    fn request_cancel(state: &mut WizardState) {
        match state.status {
            WizardStatus::Editing | WizardStatus::Failed { .. } if state.drafts.is_active() => {
                tracing::debug!(session = state.session, "Cancel requested");
                state.confirming_cancel = true;
            },
            WizardStatus::Submitting => {
                tracing::warn!("Cancel ignored: submission in flight");
            },
            _ => tracing::debug!(status = ?state.status, "Cancel ignored"),
        }
    }

    fn confirm_cancel(state: &mut WizardState) {
        if !state.confirming_cancel {
            tracing::debug!("Confirm cancel ignored: no cancel requested");
            return;
        }

        tracing::info!(session = state.session, "Booking abandoned");
        state.drafts.clear();
        state.status = WizardStatus::Closed;
        state.warning = None;
        state.confirming_cancel = false;
        state.vehicles = Listing::NotLoaded;
        state.payment_methods = Listing::NotLoaded;
    }

    fn submit(state: &mut WizardState, env: &WizardEnvironment) -> Effects {
        if state.is_submitting() {
            tracing::warn!(session = state.session, "Submit ignored: submission already in flight");
            metrics::counter!("wizard.submissions.suppressed").increment(1);
            return SmallVec::new();
        }
        if !state.can_submit() {
            tracing::debug!(status = ?state.status, step = ?state.step(), "Submit ignored");
            return SmallVec::new();
        }

        let request = match state.drafts.finalize() {
            Ok(request) => request,
            Err(reason) => {
                tracing::warn!(%reason, "Submit blocked");
                state.warning = Some(reason);
                return SmallVec::new();
            },
        };

        let session = state.session;
        tracing::info!(
            session,
            space_id = %request.space_id,
            total = %request.total_amount,
            "Submitting booking"
        );
        metrics::counter!("wizard.submissions.started").increment(1);

        state.status = WizardStatus::Submitting;
        state.warning = None;

        let submission = env.gateway().submit(request);
        smallvec![async_effect! {
            match submission.await {
                Ok(booking) => Some(WizardAction::SubmissionSucceeded { session, booking }),
                Err(error) => Some(WizardAction::SubmissionFailed { session, error }),
            }
        }]
    }

    /// Feedback is applied only to the session that asked for it
    fn is_current(state: &WizardState, session: u64, action: &'static str) -> bool {
        let current = session == state.session && state.drafts.is_active();
        if !current {
            tracing::debug!(action, session, current = state.session, "Dropping stale feedback");
        }
        current
    }
}

impl Reducer for WizardReducer {
    type State = WizardState;
    type Action = WizardAction;
    type Environment = WizardEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::trace!(action = action.name(), session = state.session, "Reducing");

        match action {
            WizardAction::Start { space } => Self::start(state, space, env),

            WizardAction::SetInterval {
                check_in,
                check_out,
            } => {
                Self::set_interval(state, check_in, check_out);
                SmallVec::new()
            },

            WizardAction::SetVehicle { vehicle } => {
                Self::set_vehicle(state, vehicle);
                SmallVec::new()
            },

            WizardAction::SetPaymentMethod { payment_method } => {
                Self::set_payment_method(state, payment_method);
                SmallVec::new()
            },

            WizardAction::Continue => Self::advance(state, env),

            WizardAction::Back => Self::retreat(state, env),

            WizardAction::Cancel => {
                Self::request_cancel(state);
                SmallVec::new()
            },

            WizardAction::ConfirmCancel => {
                Self::confirm_cancel(state);
                SmallVec::new()
            },

            WizardAction::DismissCancel => {
                state.confirming_cancel = false;
                SmallVec::new()
            },

            WizardAction::Submit => Self::submit(state, env),

            WizardAction::DismissWarning => {
                state.warning = None;
                SmallVec::new()
            },

            WizardAction::VehiclesLoaded { session, vehicles } => {
                if Self::is_current(state, session, "vehicles_loaded") {
                    tracing::debug!(count = vehicles.len(), "Vehicles loaded");
                    state.vehicles = Listing::Ready(vehicles);
                    Self::preselect_defaults(state);
                }
                SmallVec::new()
            },

            WizardAction::VehiclesUnavailable { session, reason } => {
                if Self::is_current(state, session, "vehicles_unavailable") {
                    tracing::warn!(%reason, "Vehicle list unavailable");
                    state.vehicles = Listing::Unavailable { reason };
                }
                SmallVec::new()
            },

            WizardAction::PaymentMethodsLoaded {
                session,
                payment_methods,
            } => {
                if Self::is_current(state, session, "payment_methods_loaded") {
                    tracing::debug!(count = payment_methods.len(), "Payment methods loaded");
                    state.payment_methods = Listing::Ready(payment_methods);
                    Self::preselect_defaults(state);
                }
                SmallVec::new()
            },

            WizardAction::PaymentMethodsUnavailable { session, reason } => {
                if Self::is_current(state, session, "payment_methods_unavailable") {
                    tracing::warn!(%reason, "Payment method list unavailable");
                    state.payment_methods = Listing::Unavailable { reason };
                }
                SmallVec::new()
            },

            WizardAction::SubmissionSucceeded { session, booking } => {
                if Self::is_current(state, session, "submission_succeeded")
                    && state.is_submitting()
                {
                    tracing::info!(booking_id = %booking.id, "Booking confirmed");
                    metrics::counter!("wizard.submissions.completed", "outcome" => "succeeded")
                        .increment(1);
                    state.drafts.clear();
                    state.status = WizardStatus::Submitted { booking };
                    state.warning = None;
                }
                SmallVec::new()
            },

            WizardAction::SubmissionFailed { session, error } => {
                if Self::is_current(state, session, "submission_failed") && state.is_submitting() {
                    tracing::warn!(%error, "Booking submission failed; draft kept for retry");
                    metrics::counter!("wizard.submissions.completed", "outcome" => "failed")
                        .increment(1);
                    state.status = WizardStatus::Failed { error };
                }
                SmallVec::new()
            },
        }
    }
}
