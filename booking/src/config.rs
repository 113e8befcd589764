//! Runtime configuration.
//!
//! Read from `PARKWISE_*` environment variables (a `.env` file is honored by
//! the binary through `dotenvy`). Every value has a default except the API
//! token, which is only required in live mode.
//!
//! | Variable | Default |
//! |---|---|
//! | `PARKWISE_MODE` | `offline` |
//! | `PARKWISE_API_URL` | `http://localhost:8080/api` |
//! | `PARKWISE_API_TOKEN` | unset |
//! | `PARKWISE_REQUEST_TIMEOUT_SECS` | `30` |
//! | `PARKWISE_CATALOG_TIMEOUT_SECS` | `10` |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default booking API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Default submission timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default account catalog timeout in seconds
pub const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 10;

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is present but cannot be parsed
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },

    /// A variable required by the selected mode is missing
    #[error("{0} must be set")]
    Missing(&'static str),

    /// Configuration validation failed
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

/// Which adapters back the wizard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// In-memory catalog and mock gateway
    #[default]
    Offline,
    /// HTTP adapters against the booking API
    Live,
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "offline" | "mock" => Ok(Self::Offline),
            "live" | "http" => Ok(Self::Live),
            _ => Err(ConfigError::InvalidValue {
                var: "PARKWISE_MODE",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => write!(f, "offline"),
            Self::Live => write!(f, "live"),
        }
    }
}

/// Booking API connection settings
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL; endpoint paths are appended to it
    pub base_url: String,
    /// Bearer token for the signed-in user
    pub token: Option<String>,
    /// Timeout for booking submission
    pub request_timeout_secs: u64,
    /// Timeout for vehicle and payment method lookups
    pub catalog_timeout_secs: u64,
}

impl ApiConfig {
    /// Submission timeout as a `Duration`
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Catalog timeout as a `Duration`
    #[must_use]
    pub const fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            catalog_timeout_secs: DEFAULT_CATALOG_TIMEOUT_SECS,
        }
    }
}

// Keep the token out of logs
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("catalog_timeout_secs", &self.catalog_timeout_secs)
            .finish()
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Adapter selection
    pub mode: Mode,
    /// Booking API settings
    pub api: ApiConfig,
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is malformed or the result
    /// fails [`Config::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = lookup("PARKWISE_MODE")
            .map(|raw| raw.parse::<Mode>())
            .transpose()?
            .unwrap_or_default();

        let base_url = lookup("PARKWISE_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let token = lookup("PARKWISE_API_TOKEN").filter(|token| !token.trim().is_empty());

        let request_timeout_secs = parse_secs(
            &lookup,
            "PARKWISE_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        let catalog_timeout_secs = parse_secs(
            &lookup,
            "PARKWISE_CATALOG_TIMEOUT_SECS",
            DEFAULT_CATALOG_TIMEOUT_SECS,
        )?;

        let config = Self {
            mode,
            api: ApiConfig {
                base_url,
                token,
                request_timeout_secs,
                catalog_timeout_secs,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the base URL is not http(s), a timeout is
    /// zero, or live mode has no token.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.api.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "PARKWISE_API_URL must be an http(s) URL, got {url:?}"
            )));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "PARKWISE_REQUEST_TIMEOUT_SECS must be > 0".to_string(),
            ));
        }
        if self.api.catalog_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "PARKWISE_CATALOG_TIMEOUT_SECS must be > 0".to_string(),
            ));
        }
        if self.mode == Mode::Live && self.api.token.is_none() {
            return Err(ConfigError::Missing("PARKWISE_API_TOKEN"));
        }
        Ok(())
    }
}

fn parse_secs<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value: raw })
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.mode, Mode::Offline);
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.api.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.api.catalog_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_live_mode_with_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PARKWISE_MODE", "live"),
            ("PARKWISE_API_URL", "https://api.parkwise.example/v2/"),
            ("PARKWISE_API_TOKEN", "secret"),
            ("PARKWISE_REQUEST_TIMEOUT_SECS", "45"),
        ]))
        .unwrap();

        assert_eq!(config.mode, Mode::Live);
        assert_eq!(config.api.base_url, "https://api.parkwise.example/v2");
        assert_eq!(config.api.token.as_deref(), Some("secret"));
        assert_eq!(config.api.request_timeout_secs, 45);
        assert_eq!(config.api.catalog_timeout_secs, 10);
    }

    #[test]
    fn test_live_mode_requires_token() {
        let err = Config::from_lookup(lookup_from(&[
            ("PARKWISE_MODE", "live"),
            ("PARKWISE_API_TOKEN", "   "),
        ]))
        .unwrap_err();

        assert_eq!(err, ConfigError::Missing("PARKWISE_API_TOKEN"));
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[("PARKWISE_CATALOG_TIMEOUT_SECS", "ten")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                var: "PARKWISE_CATALOG_TIMEOUT_SECS",
                value: "ten".to_string(),
            }
        );

        assert!(Config::from_lookup(lookup_from(&[("PARKWISE_MODE", "staging")])).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout_and_bad_url() {
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("PARKWISE_REQUEST_TIMEOUT_SECS", "0")])),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("PARKWISE_API_URL", "ftp://files")])),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let api = ApiConfig {
            token: Some("super-secret".to_string()),
            ..ApiConfig::default()
        };
        let rendered = format!("{api:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
