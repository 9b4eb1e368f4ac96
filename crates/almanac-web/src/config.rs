//! Listener configuration for the feed server.
//!
//! | Setting | Env Var | Default |
//! |---------|---------|---------|
//! | Bind host | `ALMANAC_WEB_HOST` | `0.0.0.0` |
//! | Bind port | `ALMANAC_WEB_PORT` | `3000` |

use std::env;

use almanac_core::ValidationError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
        }
    }
}

impl WebConfig {
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ValidationError> {
        let mut config = Self::default();

        if let Some(host) = lookup("ALMANAC_WEB_HOST").filter(|host| !host.trim().is_empty()) {
            config.host = host.trim().to_owned();
        }

        if let Some(raw) = lookup("ALMANAC_WEB_PORT") {
            config.port = raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ValidationError::InvalidConfig {
                    key: "ALMANAC_WEB_PORT",
                    value: raw.clone(),
                })?;
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
