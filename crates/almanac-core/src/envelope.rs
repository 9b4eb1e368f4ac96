use serde::{Deserialize, Serialize};

use crate::{NormalizedRecord, UtcDateTime};

pub const LIVE_SOURCE: &str = "live";
pub const FALLBACK_SOURCE: &str = "fallback";

/// Envelope for records produced by live aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveEnvelope {
    pub events: Vec<NormalizedRecord>,
    pub count: usize,
    pub source: String,
    pub timestamp: UtcDateTime,
}

impl LiveEnvelope {
    pub fn new(events: Vec<NormalizedRecord>) -> Self {
        Self {
            count: events.len(),
            events,
            source: String::from(LIVE_SOURCE),
            timestamp: UtcDateTime::now(),
        }
    }
}

/// Envelope served instead of a hard failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackEnvelope {
    pub error: String,
    pub events: Vec<NormalizedRecord>,
    pub source: String,
}

impl FallbackEnvelope {
    pub fn new(error: impl Into<String>, events: Vec<NormalizedRecord>) -> Self {
        Self {
            error: error.into(),
            events,
            source: String::from(FALLBACK_SOURCE),
        }
    }
}

/// Body of every feed response; both variants are served with a success status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedResponse {
    Live(LiveEnvelope),
    Fallback(FallbackEnvelope),
}

impl FeedResponse {
    pub fn events(&self) -> &[NormalizedRecord] {
        match self {
            Self::Live(envelope) => &envelope.events,
            Self::Fallback(envelope) => &envelope.events,
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Self::Live(envelope) => &envelope.source,
            Self::Fallback(envelope) => &envelope.source,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Live(_) => None,
            Self::Fallback(envelope) => Some(&envelope.error),
        }
    }

    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}
