//! Centralized environment configuration.
//!
//! All environment variables and their defaults are defined here. The binary
//! loads an optional `.env` file through `dotenvy` before calling
//! [`Config::from_env`].

use std::time::Duration;

use crate::error::ConfigError;
use crate::wizard::photos::PhotoPolicy;

/// Default API base URL when `NEIGHBORLY_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/";

/// Runtime configuration for the CLI and its live adapters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend API, always ending in `/`.
    pub api_url: String,
    /// Bearer token for the backend. `None` means the session is anonymous.
    pub api_token: Option<String>,
    /// Delay between a successful submission and the redirect home.
    pub redirect_delay: Duration,
    /// Photo staging policy (capped with size checks, or unbounded).
    pub photo_policy: PhotoPolicy,
    /// Timeout applied to every HTTP request.
    pub http_timeout: Duration,
}

impl Config {
    /// Build config from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut api_url =
            lookup("NEIGHBORLY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !api_url.ends_with('/') {
            api_url.push('/');
        }

        let api_token = lookup("NEIGHBORLY_API_TOKEN").filter(|t| !t.trim().is_empty());

        let redirect_delay = match lookup("NEIGHBORLY_REDIRECT_DELAY_MS") {
            Some(raw) => Duration::from_millis(raw.trim().parse().map_err(|_| {
                ConfigError::Invalid {
                    name: "NEIGHBORLY_REDIRECT_DELAY_MS",
                    value: raw.clone(),
                    reason: "expected a number of milliseconds",
                }
            })?),
            None => Duration::from_millis(2000),
        };

        let photo_policy = match lookup("NEIGHBORLY_PHOTO_LIMIT") {
            Some(raw) if raw.trim().eq_ignore_ascii_case("unbounded") => PhotoPolicy::unbounded(),
            Some(raw) => {
                let cap: usize = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    name: "NEIGHBORLY_PHOTO_LIMIT",
                    value: raw.clone(),
                    reason: "expected a positive number or \"unbounded\"",
                })?;
                if cap == 0 {
                    return Err(ConfigError::Invalid {
                        name: "NEIGHBORLY_PHOTO_LIMIT",
                        value: raw,
                        reason: "expected a positive number or \"unbounded\"",
                    });
                }
                PhotoPolicy::capped(cap)
            }
            None => PhotoPolicy::default(),
        };

        let http_timeout = match lookup("NEIGHBORLY_HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse().map_err(|_| {
                ConfigError::Invalid {
                    name: "NEIGHBORLY_HTTP_TIMEOUT_SECS",
                    value: raw.clone(),
                    reason: "expected a number of seconds",
                }
            })?),
            None => Duration::from_secs(30),
        };

        Ok(Self { api_url, api_token, redirect_delay, photo_policy, http_timeout })
    }

    /// Config for tests. Authenticated, no redirect delay, default photo cap.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            api_url: "http://localhost:8000/api/".to_string(),
            api_token: Some("test-token".to_string()),
            redirect_delay: Duration::ZERO,
            photo_policy: PhotoPolicy::default(),
            http_timeout: Duration::from_secs(5),
        }
    }
}
