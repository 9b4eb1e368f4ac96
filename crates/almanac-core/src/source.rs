use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Category, ValidationError};

/// Canonical provider identifiers used in record ids, logs and source listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Congress,
    Fred,
    Treasury,
    CourtListener,
    Regulations,
}

impl ProviderId {
    pub const ALL: [Self; 5] = [
        Self::Congress,
        Self::Fred,
        Self::Treasury,
        Self::CourtListener,
        Self::Regulations,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Congress => "congress",
            Self::Fred => "fred",
            Self::Treasury => "treasury",
            Self::CourtListener => "courtlistener",
            Self::Regulations => "regulations",
        }
    }

    /// Human-readable provenance label written into `NormalizedRecord::source`.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Congress => "Congress.gov",
            Self::Fred => "FRED",
            Self::Treasury => "U.S. Treasury Fiscal Data",
            Self::CourtListener => "CourtListener",
            Self::Regulations => "Regulations.gov",
        }
    }

    pub const fn category(self) -> Category {
        match self {
            Self::Congress => Category::Congressional,
            Self::Fred | Self::Treasury => Category::Economic,
            Self::CourtListener => Category::Judicial,
            Self::Regulations => Category::Regulatory,
        }
    }

    /// Builds a record id carrying this provider's tag.
    pub fn record_id(self, local_id: impl Display) -> String {
        format!("{}-{}", self.as_str(), local_id)
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "congress" => Ok(Self::Congress),
            "fred" => Ok(Self::Fred),
            "treasury" => Ok(Self::Treasury),
            "courtlistener" => Ok(Self::CourtListener),
            "regulations" => Ok(Self::Regulations),
            other => Err(ValidationError::InvalidSource {
                value: other.to_owned(),
            }),
        }
    }
}
