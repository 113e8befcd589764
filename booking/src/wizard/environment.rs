//! Dependencies injected into the wizard reducer.

use crate::catalog::AccountCatalog;
use crate::gateway::SubmissionGateway;
use parkwise_core::environment::Clock;
use std::sync::Arc;

/// Clock, account catalog and submission gateway
///
/// Production wires the HTTP adapters and `SystemClock`; tests use
/// `FixedClock` with the in-memory catalog and mock gateway.
#[derive(Clone)]
pub struct WizardEnvironment {
    clock: Arc<dyn Clock>,
    catalog: Arc<dyn AccountCatalog>,
    gateway: Arc<dyn SubmissionGateway>,
}

impl WizardEnvironment {
    /// Creates an environment
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        catalog: Arc<dyn AccountCatalog>,
        gateway: Arc<dyn SubmissionGateway>,
    ) -> Self {
        Self {
            clock,
            catalog,
            gateway,
        }
    }

    /// Time source for draft timestamps
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Vehicle and payment method lookups
    #[must_use]
    pub fn catalog(&self) -> &dyn AccountCatalog {
        self.catalog.as_ref()
    }

    /// Booking persistence
    #[must_use]
    pub fn gateway(&self) -> &dyn SubmissionGateway {
        self.gateway.as_ref()
    }
}
