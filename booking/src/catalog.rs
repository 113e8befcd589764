//! The signed-in user's vehicles and payment methods.
//!
//! The wizard only reads these lists. A failed lookup degrades the matching
//! step (nothing to choose from) but never aborts the booking attempt.

use crate::http::{self, ApiClient};
use crate::types::{PaymentMethod, Vehicle};
use futures::future::BoxFuture;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;

/// Why a list could not be loaded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The account service could not be reached or returned an error
    #[error("account service unavailable: {0}")]
    Unavailable(String),

    /// The token was missing or rejected
    #[error("not signed in")]
    Unauthorized,

    /// The service answered with something that is not a list
    #[error("unexpected account response: {0}")]
    InvalidResponse(String),
}

/// Read access to the user's saved records
pub trait AccountCatalog: Send + Sync {
    /// Registered vehicles
    fn vehicles(&self) -> BoxFuture<'static, Result<Vec<Vehicle>, CatalogError>>;

    /// Stored payment methods
    fn payment_methods(&self) -> BoxFuture<'static, Result<Vec<PaymentMethod>, CatalogError>>;
}

/// `GET {base}/vehicles` and `GET {base}/payment-methods`
#[derive(Clone, Debug)]
pub struct HttpAccountCatalog {
    client: ApiClient,
    timeout: Duration,
}

impl HttpAccountCatalog {
    /// Creates a catalog over `client` with a per-lookup timeout
    #[must_use]
    pub const fn new(client: ApiClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn fetch<T>(&self, path: &'static str) -> BoxFuture<'static, Result<Vec<T>, CatalogError>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let builder = self.client.request(Method::GET, path, self.timeout);

        Box::pin(async move {
            let response = builder
                .send()
                .await
                .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

            match response.status() {
                status if status.is_success() => response
                    .json::<Vec<T>>()
                    .await
                    .map_err(|e| CatalogError::InvalidResponse(e.to_string())),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(CatalogError::Unauthorized),
                _ => {
                    let (status, message) = http::error_message(response).await;
                    tracing::warn!(path, status = status.as_u16(), "Account lookup failed");
                    Err(CatalogError::Unavailable(format!("{status}: {message}")))
                },
            }
        })
    }
}

impl AccountCatalog for HttpAccountCatalog {
    fn vehicles(&self) -> BoxFuture<'static, Result<Vec<Vehicle>, CatalogError>> {
        self.fetch("/vehicles")
    }

    fn payment_methods(&self) -> BoxFuture<'static, Result<Vec<PaymentMethod>, CatalogError>> {
        self.fetch("/payment-methods")
    }
}

/// Fixed lists held in memory
///
/// Either list can be made to fail, which is how tests exercise a degraded
/// vehicle or payment step. Lookups are counted.
#[derive(Clone, Debug)]
pub struct InMemoryAccountCatalog {
    vehicles: Result<Vec<Vehicle>, CatalogError>,
    payment_methods: Result<Vec<PaymentMethod>, CatalogError>,
    vehicle_lookups: Arc<AtomicUsize>,
    payment_method_lookups: Arc<AtomicUsize>,
}

impl InMemoryAccountCatalog {
    /// Creates a catalog serving the given lists
    #[must_use]
    pub fn new(vehicles: Vec<Vehicle>, payment_methods: Vec<PaymentMethod>) -> Self {
        Self {
            vehicles: Ok(vehicles),
            payment_methods: Ok(payment_methods),
            vehicle_lookups: Arc::default(),
            payment_method_lookups: Arc::default(),
        }
    }

    /// Makes the vehicle lookup fail
    #[must_use]
    pub fn failing_vehicles(mut self, error: CatalogError) -> Self {
        self.vehicles = Err(error);
        self
    }

    /// Makes the payment method lookup fail
    #[must_use]
    pub fn failing_payment_methods(mut self, error: CatalogError) -> Self {
        self.payment_methods = Err(error);
        self
    }

    /// How many times vehicles were requested
    #[must_use]
    pub fn vehicle_lookups(&self) -> usize {
        self.vehicle_lookups.load(Ordering::SeqCst)
    }

    /// How many times payment methods were requested
    #[must_use]
    pub fn payment_method_lookups(&self) -> usize {
        self.payment_method_lookups.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryAccountCatalog {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl AccountCatalog for InMemoryAccountCatalog {
    fn vehicles(&self) -> BoxFuture<'static, Result<Vec<Vehicle>, CatalogError>> {
        self.vehicle_lookups.fetch_add(1, Ordering::SeqCst);
        let result = self.vehicles.clone();
        Box::pin(async move { result })
    }

    fn payment_methods(&self) -> BoxFuture<'static, Result<Vec<PaymentMethod>, CatalogError>> {
        self.payment_method_lookups.fetch_add(1, Ordering::SeqCst);
        let result = self.payment_methods.clone();
        Box::pin(async move { result })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures::{default_card, default_vehicle, second_vehicle};

    #[tokio::test]
    async fn test_in_memory_serves_lists_and_counts_lookups() {
        let catalog = InMemoryAccountCatalog::new(
            vec![default_vehicle(), second_vehicle()],
            vec![default_card()],
        );

        let vehicles = catalog.vehicles().await.unwrap();
        let cards = catalog.payment_methods().await.unwrap();
        let _ = catalog.vehicles().await;

        assert_eq!(vehicles.len(), 2);
        assert_eq!(cards, vec![default_card()]);
        assert_eq!(catalog.vehicle_lookups(), 2);
        assert_eq!(catalog.payment_method_lookups(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_failure_is_per_list() {
        let catalog = InMemoryAccountCatalog::new(vec![default_vehicle()], vec![default_card()])
            .failing_payment_methods(CatalogError::Unavailable("maintenance".to_string()));

        assert!(catalog.vehicles().await.is_ok());
        assert_eq!(
            catalog.payment_methods().await,
            Err(CatalogError::Unavailable("maintenance".to_string()))
        );
    }
}
