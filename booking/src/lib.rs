//! # Parkwise Booking
//!
//! The reservation workflow engine: a four-step wizard that takes a user from
//! picking a time window, through vehicle and payment selection, to a priced
//! and confirmed booking.
//!
//! ## Components
//!
//! - [`pricing`]: pure quote computation (subtotal, 15% service fee, 8% tax)
//! - [`draft`]: the in-progress booking and its single-owner store
//! - [`validator`]: per-step gating and field scoping
//! - [`wizard`]: the controller, as a [`Reducer`](parkwise_core::reducer::Reducer)
//! - [`gateway`] and [`catalog`]: the external collaborators, with HTTP and
//!   in-memory implementations
//!
//! ## Example
//!
//! ```ignore
//! use parkwise_booking::wizard::{WizardAction, WizardEnvironment, WizardReducer, WizardState};
//! use parkwise_runtime::Store;
//!
//! let store = Store::new(WizardState::new(), WizardReducer::new(), env);
//! store.send(WizardAction::Start { space }).await?;
//! store.send(WizardAction::SetInterval { check_in, check_out }).await?;
//! store.send(WizardAction::Continue).await?;
//! ```

pub mod catalog;
pub mod config;
pub mod draft;
pub mod fixtures;
pub mod gateway;
pub mod http;
pub mod pricing;
pub mod types;
pub mod validator;
pub mod wizard;

pub use catalog::{AccountCatalog, CatalogError, HttpAccountCatalog, InMemoryAccountCatalog};
pub use config::{Config, ConfigError, Mode};
pub use draft::{BookingDraft, DraftStore, WizardStep};
pub use gateway::{
    HttpSubmissionGateway, MockOutcome, MockSubmissionGateway, SubmissionError, SubmissionGateway,
    SubmissionRequest,
};
pub use pricing::{PricingError, Quote};
pub use types::{
    BookingId, BookingRecord, BookingStatus, Money, ParkingSpace, PaymentMethod, PaymentMethodId,
    SpaceId, Vehicle, VehicleId,
};
pub use validator::{Field, StepError};
pub use wizard::{
    Listing, WizardAction, WizardEnvironment, WizardReducer, WizardState, WizardStatus,
};

use parkwise_core::environment::Clock;
use std::sync::Arc;

/// Builds the wizard environment for `config`
///
/// Offline mode serves the sample records from [`fixtures`] and accepts every
/// booking; live mode talks to the booking API.
#[must_use]
pub fn environment_for(config: &Config, clock: Arc<dyn Clock>) -> WizardEnvironment {
    match config.mode {
        Mode::Offline => WizardEnvironment::new(
            clock,
            Arc::new(InMemoryAccountCatalog::new(
                vec![fixtures::default_vehicle(), fixtures::second_vehicle()],
                vec![fixtures::default_card(), fixtures::second_card()],
            )),
            Arc::new(MockSubmissionGateway::new()),
        ),
        Mode::Live => {
            let client = http::ApiClient::new(&config.api);
            WizardEnvironment::new(
                clock,
                Arc::new(HttpAccountCatalog::new(
                    client.clone(),
                    config.api.catalog_timeout(),
                )),
                Arc::new(HttpSubmissionGateway::new(client, config.api.request_timeout())),
            )
        },
    }
}
