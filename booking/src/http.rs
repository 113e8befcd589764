//! Shared HTTP plumbing for the booking API adapters.

use crate::config::ApiConfig;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use std::time::Duration;

/// Thin wrapper over `reqwest::Client` that knows the API base URL and token
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client from API settings
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    /// Full URL for an endpoint path such as `/bookings`
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Starts a request with auth and a per-request timeout applied
    #[must_use]
    pub fn request(&self, method: Method, path: &str, timeout: Duration) -> RequestBuilder {
        let builder = self
            .client
            .request(method, self.url(path))
            .header("accept", "application/json")
            .timeout(timeout);

        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

/// Reads an error body, tolerating unreadable payloads
pub(crate) async fn error_message(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body
    };
    (status, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slashes() {
        let client = ApiClient::new(&ApiConfig {
            base_url: "https://api.parkwise.example/v1/".to_string(),
            ..ApiConfig::default()
        });

        assert_eq!(
            client.url("/bookings"),
            "https://api.parkwise.example/v1/bookings"
        );
        assert_eq!(
            client.url("vehicles"),
            "https://api.parkwise.example/v1/vehicles"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let client = ApiClient::new(&ApiConfig {
            token: Some("secret".to_string()),
            ..ApiConfig::default()
        });

        let rendered = format!("{client:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("authenticated: true"));
    }
}
