//! Booking submission.
//!
//! [`SubmissionGateway`] is the seam between the wizard and whatever persists
//! bookings. [`HttpSubmissionGateway`] talks to the booking API;
//! [`MockSubmissionGateway`] records calls and answers from a script.

use crate::http::{self, ApiClient};
use crate::types::{
    BookingId, BookingRecord, BookingStatus, Money, PaymentMethodId, SpaceId, VehicleId,
};
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

/// Payload sent to persist a booking
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    /// Space being booked
    pub space_id: SpaceId,
    /// Vehicle that will park
    pub vehicle_id: VehicleId,
    /// Payment method to charge
    pub payment_method_id: PaymentMethodId,
    /// Start of the stay
    pub check_in: DateTime<Utc>,
    /// End of the stay
    pub check_out: DateTime<Utc>,
    /// Quoted total, in cents
    pub total_amount: Money,
}

/// Why a submission did not produce a booking
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The booking service refused the request
    #[error("booking rejected (status {status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Message from the service
        message: String,
    },

    /// The request never got an answer
    #[error("booking request failed: {0}")]
    Transport(String),

    /// The service answered with something that is not a booking
    #[error("unexpected booking response: {0}")]
    InvalidResponse(String),
}

/// Persists bookings
pub trait SubmissionGateway: Send + Sync {
    /// Submits one booking
    ///
    /// The returned future owns everything it needs so it can be run from a
    /// spawned effect.
    fn submit(
        &self,
        request: SubmissionRequest,
    ) -> BoxFuture<'static, Result<BookingRecord, SubmissionError>>;
}

// ============================================================================
// HTTP
// ============================================================================

/// `POST {base}/bookings`
#[derive(Clone, Debug)]
pub struct HttpSubmissionGateway {
    client: ApiClient,
    timeout: Duration,
}

impl HttpSubmissionGateway {
    /// Creates a gateway over `client` with a request timeout
    #[must_use]
    pub const fn new(client: ApiClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

impl SubmissionGateway for HttpSubmissionGateway {
    fn submit(
        &self,
        request: SubmissionRequest,
    ) -> BoxFuture<'static, Result<BookingRecord, SubmissionError>> {
        let builder = self
            .client
            .request(Method::POST, "/bookings", self.timeout)
            .json(&request);

        Box::pin(async move {
            tracing::debug!(space_id = %request.space_id, "Posting booking");

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    SubmissionError::Transport("request timed out".to_string())
                } else {
                    SubmissionError::Transport(e.to_string())
                }
            })?;

            if !response.status().is_success() {
                let (status, message) = http::error_message(response).await;
                tracing::warn!(status = status.as_u16(), "Booking rejected");
                return Err(SubmissionError::Rejected {
                    status: status.as_u16(),
                    message,
                });
            }

            response
                .json::<BookingRecord>()
                .await
                .map_err(|e| SubmissionError::InvalidResponse(e.to_string()))
        })
    }
}

// ============================================================================
// Mock
// ============================================================================

/// Scripted answer for one [`MockSubmissionGateway`] call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockOutcome {
    /// Persist and return a confirmed booking
    Succeed,
    /// Fail with the given error
    Fail(SubmissionError),
}

#[derive(Debug)]
struct MockInner {
    calls: Mutex<Vec<SubmissionRequest>>,
    script: Mutex<VecDeque<MockOutcome>>,
    released: watch::Sender<bool>,
}

/// In-memory gateway for tests and offline runs
///
/// Every call is recorded. Outcomes are taken from a queue and default to
/// [`MockOutcome::Succeed`] once the queue is empty. While [`hold`] is in
/// effect, calls are recorded immediately but do not answer until
/// [`release`] is called.
///
/// [`hold`]: MockSubmissionGateway::hold
/// [`release`]: MockSubmissionGateway::release
#[derive(Clone, Debug)]
pub struct MockSubmissionGateway {
    inner: Arc<MockInner>,
}

impl MockSubmissionGateway {
    /// Creates a gateway that accepts every booking immediately
    #[must_use]
    pub fn new() -> Self {
        let (released, _) = watch::channel(true);
        Self {
            inner: Arc::new(MockInner {
                calls: Mutex::new(Vec::new()),
                script: Mutex::new(VecDeque::new()),
                released,
            }),
        }
    }

    /// Queues an outcome for a future call
    pub fn push_outcome(&self, outcome: MockOutcome) {
        self.inner
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
    }

    /// Makes the next call fail with `error`
    #[must_use]
    pub fn failing_once(self, error: SubmissionError) -> Self {
        self.push_outcome(MockOutcome::Fail(error));
        self
    }

    /// Parks subsequent calls until [`MockSubmissionGateway::release`]
    pub fn hold(&self) {
        self.inner.released.send_replace(false);
    }

    /// Lets parked and future calls answer
    pub fn release(&self) {
        self.inner.released.send_replace(true);
    }

    /// Requests received so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<SubmissionRequest> {
        self.inner
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.inner
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for MockSubmissionGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionGateway for MockSubmissionGateway {
    fn submit(
        &self,
        request: SubmissionRequest,
    ) -> BoxFuture<'static, Result<BookingRecord, SubmissionError>> {
        self.inner
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let outcome = self
            .inner
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(MockOutcome::Succeed);

        let mut released = self.inner.released.subscribe();

        Box::pin(async move {
            // A closed channel means the gateway is gone and nothing can hold us
            let _ = released.wait_for(|released| *released).await;

            match outcome {
                MockOutcome::Succeed => Ok(BookingRecord {
                    id: BookingId::new(format!("bk_{}", uuid::Uuid::new_v4().simple())),
                    space_id: request.space_id,
                    vehicle_id: request.vehicle_id,
                    payment_method_id: request.payment_method_id,
                    check_in: request.check_in,
                    check_out: request.check_out,
                    total_amount: request.total_amount,
                    status: BookingStatus::Confirmed,
                }),
                MockOutcome::Fail(error) => Err(error),
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures::{default_card, default_vehicle, downtown_garage, morning};

    fn request() -> SubmissionRequest {
        SubmissionRequest {
            space_id: downtown_garage().id,
            vehicle_id: default_vehicle().id,
            payment_method_id: default_card().id,
            check_in: morning(9),
            check_out: morning(18),
            total_amount: Money::from_cents(16_605),
        }
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let json = serde_json::to_value(request()).unwrap();

        assert_eq!(json["spaceId"], "space_downtown");
        assert_eq!(json["vehicleId"], "veh_civic");
        assert_eq!(json["paymentMethodId"], "pm_visa");
        assert_eq!(json["totalAmount"], 16_605);
        assert_eq!(json["checkIn"], "2024-10-25T09:00:00Z");
    }

    #[tokio::test]
    async fn test_mock_succeeds_by_default() {
        let gateway = MockSubmissionGateway::new();

        let record = gateway.submit(request()).await.unwrap();

        assert!(record.id.as_str().starts_with("bk_"));
        assert_eq!(record.status, BookingStatus::Confirmed);
        assert_eq!(record.total_amount, Money::from_cents(16_605));
        assert_eq!(gateway.calls(), vec![request()]);
    }

    #[tokio::test]
    async fn test_mock_follows_script_then_succeeds() {
        let error = SubmissionError::Rejected {
            status: 409,
            message: "space unavailable".to_string(),
        };
        let gateway = MockSubmissionGateway::new().failing_once(error.clone());

        assert_eq!(gateway.submit(request()).await, Err(error));
        assert!(gateway.submit(request()).await.is_ok());
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_hold_parks_calls_until_release() {
        let gateway = MockSubmissionGateway::new();
        gateway.hold();

        let pending = tokio::spawn(gateway.submit(request()));
        tokio::task::yield_now().await;

        assert_eq!(gateway.call_count(), 1);
        assert!(!pending.is_finished());

        gateway.release();
        let record = pending.await.unwrap().unwrap();
        assert_eq!(record.space_id, downtown_garage().id);
    }
}
