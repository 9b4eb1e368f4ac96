//! Startup configuration passed explicitly into adapter construction.
//!
//! # Environment Variables
//!
//! | Setting | Primary Env Var | Fallback Env Var |
//! |---------|-----------------|------------------|
//! | Congress.gov key | `ALMANAC_CONGRESS_API_KEY` | `CONGRESS_API_KEY` |
//! | FRED key | `ALMANAC_FRED_API_KEY` | `FRED_API_KEY` |
//! | CourtListener token | `ALMANAC_COURTLISTENER_TOKEN` | `COURTLISTENER_API_TOKEN` |
//! | Regulations.gov key | `ALMANAC_REGULATIONS_API_KEY` | `REGULATIONS_GOV_API_KEY` |
//! | Adapter timeout | `ALMANAC_ADAPTER_TIMEOUT_MS` | - |
//!
//! Treasury Fiscal Data is public and needs no credential.

use std::env;
use std::fmt::{Debug, Formatter};
use std::time::Duration;

use crate::{ProviderId, RetryConfig, ValidationError};

pub const DEFAULT_ADAPTER_TIMEOUT: Duration = Duration::from_secs(8);

/// Upstream credentials. Blank values are treated as absent.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub congress_api_key: Option<String>,
    pub fred_api_key: Option<String>,
    pub courtlistener_token: Option<String>,
    pub regulations_api_key: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            congress_api_key: env_with_fallback("ALMANAC_CONGRESS_API_KEY", "CONGRESS_API_KEY"),
            fred_api_key: env_with_fallback("ALMANAC_FRED_API_KEY", "FRED_API_KEY"),
            courtlistener_token: env_with_fallback(
                "ALMANAC_COURTLISTENER_TOKEN",
                "COURTLISTENER_API_TOKEN",
            ),
            regulations_api_key: env_with_fallback(
                "ALMANAC_REGULATIONS_API_KEY",
                "REGULATIONS_GOV_API_KEY",
            ),
        }
    }

    /// Credential for `provider`, or `None` when it is missing or the provider needs none.
    pub fn for_provider(&self, provider: ProviderId) -> Option<&str> {
        let value = match provider {
            ProviderId::Congress => self.congress_api_key.as_deref(),
            ProviderId::Fred => self.fred_api_key.as_deref(),
            ProviderId::CourtListener => self.courtlistener_token.as_deref(),
            ProviderId::Regulations => self.regulations_api_key.as_deref(),
            ProviderId::Treasury => None,
        };
        value.filter(|key| !key.trim().is_empty())
    }
}

// Keys must never reach logs.
impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mark = |value: &Option<String>| if value.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("congress_api_key", &mark(&self.congress_api_key))
            .field("fred_api_key", &mark(&self.fred_api_key))
            .field("courtlistener_token", &mark(&self.courtlistener_token))
            .field("regulations_api_key", &mark(&self.regulations_api_key))
            .finish()
    }
}

/// Process-wide settings built once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AlmanacConfig {
    pub credentials: Credentials,
    pub adapter_timeout: Duration,
    pub retry: RetryConfig,
    pub user_agent: String,
}

impl Default for AlmanacConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            adapter_timeout: DEFAULT_ADAPTER_TIMEOUT,
            retry: RetryConfig::default(),
            user_agent: String::from(concat!("almanac/", env!("CARGO_PKG_VERSION"))),
        }
    }
}

impl AlmanacConfig {
    pub fn from_env() -> Result<Self, ValidationError> {
        let mut config = Self {
            credentials: Credentials::from_env(),
            ..Self::default()
        };

        if let Ok(raw) = env::var("ALMANAC_ADAPTER_TIMEOUT_MS") {
            config.adapter_timeout = parse_timeout_ms(&raw)?;
        }

        Ok(config)
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_adapter_timeout(mut self, timeout: Duration) -> Self {
        self.adapter_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Upstream HTTP timeout; kept under the adapter budget so a retry can still fit.
    pub fn request_timeout_ms(&self) -> u64 {
        let budget = self.adapter_timeout.as_millis().min(u128::from(u64::MAX)) as u64;
        (budget / 2).max(1)
    }
}

fn parse_timeout_ms(raw: &str) -> Result<Duration, ValidationError> {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ValidationError::InvalidConfig {
            key: "ALMANAC_ADAPTER_TIMEOUT_MS",
            value: raw.to_owned(),
        }),
    }
}

fn env_with_fallback(primary: &str, fallback: &str) -> Option<String> {
    env::var(primary)
        .or_else(|_| env::var(fallback))
        .ok()
        .filter(|value| !value.trim().is_empty())
}
