use crate::constants::{DEFAULT_BASE_URL, DEFAULT_LOOKUP_CONCURRENCY, DEFAULT_TIMEOUT_SECS};
use crate::utils::config::get_env_or_default;
use dotenv::dotenv;
use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq)]
/// Main configuration for the Robinhood API client
///
/// Credentials are deliberately absent: they are supplied per login by a
/// [`CredentialProvider`](crate::application::credentials::CredentialProvider).
pub struct Config {
    /// REST API configuration
    pub rest_api: RestApiConfig,
    /// Rate limiter configuration for API requests
    pub rate_limiter: RateLimiterConfig,
    /// Maximum number of in-flight requests during batch instrument lookups
    pub instrument_lookup_concurrency: usize,
}

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq)]
/// Configuration for the REST API
pub struct RestApiConfig {
    /// Base URL every endpoint address is built from
    pub base_url: String,
    /// Timeout in seconds for REST API requests
    pub timeout: u64,
}

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq)]
/// Configuration for rate limiting API requests
pub struct RateLimiterConfig {
    /// Maximum number of requests allowed per period
    pub max_requests: u32,
    /// Time period in seconds for the rate limit
    pub period_seconds: u64,
    /// Burst size - maximum number of requests that can be made at once
    pub burst_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Creates a configuration from the environment
    ///
    /// A `.env` file in the working directory is loaded first when present.
    /// Unset or unparsable variables fall back to their defaults.
    pub fn new() -> Self {
        match dotenv() {
            Ok(_) => debug!("Successfully loaded .env file"),
            Err(e) => debug!("Failed to load .env file: {e}"),
        }

        Config {
            rest_api: RestApiConfig {
                base_url: get_env_or_default("RH_REST_BASE_URL", String::from(DEFAULT_BASE_URL)),
                timeout: get_env_or_default("RH_REST_TIMEOUT", DEFAULT_TIMEOUT_SECS),
            },
            rate_limiter: RateLimiterConfig {
                max_requests: get_env_or_default("RH_RATE_LIMIT_MAX_REQUESTS", 60),
                period_seconds: get_env_or_default("RH_RATE_LIMIT_PERIOD_SECONDS", 60),
                burst_size: get_env_or_default("RH_RATE_LIMIT_BURST_SIZE", 10),
            },
            instrument_lookup_concurrency: get_env_or_default(
                "RH_INSTRUMENT_LOOKUP_CONCURRENCY",
                DEFAULT_LOOKUP_CONCURRENCY,
            )
            .max(1),
        }
    }

    /// Creates a configuration pointing at another base URL
    ///
    /// Everything else keeps its environment-derived value. Used to target
    /// staging hosts and local mock servers.
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        let mut config = Self::new();
        config.rest_api.base_url = base_url.trim_end_matches('/').to_string();
        config
    }
}
