//! Wizard state.

use crate::draft::{BookingDraft, DraftStore, WizardStep};
use crate::gateway::SubmissionError;
use crate::pricing::{PricingError, Quote};
use crate::types::{BookingRecord, DefaultSelectable, PaymentMethod, Vehicle};
use crate::validator::StepError;

/// Where the wizard is in its lifecycle
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum WizardStatus {
    /// No booking attempt is open
    #[default]
    Closed,
    /// The user is moving through steps 1-4
    Editing,
    /// A submission is in flight; the trigger is disabled
    Submitting,
    /// The booking was persisted and the draft cleared
    Submitted {
        /// The persisted booking, handed to the "my bookings" view
        booking: BookingRecord,
    },
    /// The last submission failed; the draft is kept for a retry
    Failed {
        /// What went wrong
        error: SubmissionError,
    },
}

/// Load state of a list fetched from the account catalog
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Listing<T> {
    /// Not requested during this session
    #[default]
    NotLoaded,
    /// Request in flight
    Loading,
    /// Loaded, in the order the catalog returned
    Ready(Vec<T>),
    /// The lookup failed; the step offers nothing to choose from
    Unavailable {
        /// Failure description for the inline prompt
        reason: String,
    },
}

impl<T> Listing<T> {
    /// Items to choose from. Empty unless loaded.
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Ready(items) => items,
            _ => &[],
        }
    }

    /// True while a request is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// True if entering the owning step should issue a lookup
    ///
    /// A failed lookup is retried the next time the step is entered.
    #[must_use]
    pub const fn needs_fetch(&self) -> bool {
        matches!(self, Self::NotLoaded | Self::Unavailable { .. })
    }
}

impl<T: DefaultSelectable + Clone> Listing<T> {
    /// The record the user flagged as default, if loaded
    #[must_use]
    pub fn default_item(&self) -> Option<T> {
        self.items().iter().find(|item| item.is_default()).cloned()
    }
}

/// State of one booking wizard
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WizardState {
    /// The in-progress booking
    pub drafts: DraftStore,
    /// Lifecycle position
    pub status: WizardStatus,
    /// The single inline message shown to the user
    pub warning: Option<StepError>,
    /// A cancel was requested and awaits confirmation
    pub confirming_cancel: bool,
    /// The user's vehicles
    pub vehicles: Listing<Vehicle>,
    /// The user's payment methods
    pub payment_methods: Listing<PaymentMethod>,
    /// Incremented on every `Start`; feedback for older sessions is dropped
    pub session: u64,
}

impl WizardState {
    /// Creates a closed wizard
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The active draft
    #[must_use]
    pub const fn draft(&self) -> Option<&BookingDraft> {
        self.drafts.draft()
    }

    /// The step being shown, if a draft is open
    #[must_use]
    pub fn step(&self) -> Option<WizardStep> {
        self.draft().map(|draft| draft.step)
    }

    /// Live quote for the draft
    #[must_use]
    pub fn quote(&self) -> Option<Result<Quote, PricingError>> {
        self.drafts.current_quote()
    }

    /// True while a submission is in flight
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.status, WizardStatus::Submitting)
    }

    /// Whether the submit trigger is enabled
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.confirming_cancel
            && match self.status {
                WizardStatus::Editing => self.step() == Some(WizardStep::Confirm),
                WizardStatus::Failed { .. } => self.drafts.is_active(),
                _ => false,
            }
    }

    /// The persisted booking, once submission succeeded
    #[must_use]
    pub const fn booking(&self) -> Option<&BookingRecord> {
        match &self.status {
            WizardStatus::Submitted { booking } => Some(booking),
            _ => None,
        }
    }
}
