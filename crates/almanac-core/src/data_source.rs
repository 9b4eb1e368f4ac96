//! Provider adapter contract and request/error types.
//!
//! Every upstream source implements [`DataSource`]. Adapters report failures
//! from [`DataSource::fetch_records`] as [`SourceError`]s; callers go through
//! the provided [`DataSource::fetch`], which contains those failures, logs a
//! warning and yields an empty batch instead.
//!
//! # Example Implementation
//!
//! ```rust,ignore
//! use almanac_core::{DataSource, FetchRequest, NormalizedRecord, ProviderId, SourceError};
//!
//! struct StaticAdapter;
//!
//! impl DataSource for StaticAdapter {
//!     fn id(&self) -> ProviderId {
//!         ProviderId::Treasury
//!     }
//!
//!     fn fetch_records<'a>(&'a self, req: &'a FetchRequest) -> RecordsFuture<'a> {
//!         Box::pin(async move { Ok(Vec::new()) })
//!     }
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use time::{Date, OffsetDateTime};
use tracing::warn;

use crate::{Category, CategoryFilter, NormalizedRecord, ProviderId};

/// Largest page size requested from any upstream.
pub const MAX_PAGE_SIZE: usize = 250;

/// Parameters shared by every adapter for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub filter: CategoryFilter,
    /// Upstream page size, always within `1..=MAX_PAGE_SIZE`.
    pub page_size: usize,
    /// Reference day used to build upstream date windows.
    pub as_of: Date,
    /// Supreme Court term (year the term opens in October).
    pub term: Option<i32>,
}

impl FetchRequest {
    pub fn new(filter: CategoryFilter, limit: i64) -> Self {
        Self {
            filter,
            page_size: limit.clamp(1, MAX_PAGE_SIZE as i64) as usize,
            as_of: OffsetDateTime::now_utc().date(),
            term: None,
        }
    }

    pub fn with_as_of(mut self, as_of: Date) -> Self {
        self.as_of = as_of;
        self
    }

    pub fn with_term(mut self, term: Option<i32>) -> Self {
        self.term = term;
        self
    }
}

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    MissingCredential,
    Unavailable,
    RateLimited,
    InvalidResponse,
    Internal,
}

/// Structured adapter failure. Never leaves the adapter boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn missing_credential(provider: ProviderId) -> Self {
        Self {
            kind: SourceErrorKind::MissingCredential,
            message: format!("no credential configured for '{provider}'"),
            retryable: false,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidResponse,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::MissingCredential => "source.missing_credential",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidResponse => "source.invalid_response",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

pub type RecordsFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<NormalizedRecord>, SourceError>> + Send + 'a>>;

/// Provider adapter contract.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one aggregator drives them concurrently.
pub trait DataSource: Send + Sync {
    /// Returns the unique provider identifier.
    fn id(&self) -> ProviderId;

    /// Category this adapter's records belong to.
    fn category(&self) -> Category {
        self.id().category()
    }

    /// Whether the adapter has what it needs to call its upstream.
    fn configured(&self) -> bool {
        true
    }

    /// Queries the upstream and normalizes its payload.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the credential is missing, the transport
    /// fails, the upstream answers with a non-success status, or the payload
    /// cannot be parsed.
    fn fetch_records<'a>(&'a self, req: &'a FetchRequest) -> RecordsFuture<'a>;

    /// Infallible fetch: failures become an empty batch plus a warning.
    fn fetch<'a>(
        &'a self,
        req: &'a FetchRequest,
    ) -> Pin<Box<dyn Future<Output = Vec<NormalizedRecord>> + Send + 'a>> {
        Box::pin(async move {
            match self.fetch_records(req).await {
                Ok(records) => records,
                Err(error) => {
                    warn!(
                        provider = %self.id(),
                        code = error.code(),
                        retryable = error.retryable(),
                        "adapter failed, continuing without its records: {}",
                        error.message()
                    );
                    Vec::new()
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    struct BrokenSource;

    impl DataSource for BrokenSource {
        fn id(&self) -> ProviderId {
            ProviderId::Regulations
        }

        fn fetch_records<'a>(&'a self, _req: &'a FetchRequest) -> RecordsFuture<'a> {
            Box::pin(async move { Err(SourceError::unavailable("connection refused")) })
        }
    }

    #[test]
    fn page_size_is_clamped_to_upstream_bounds() {
        assert_eq!(FetchRequest::new(CategoryFilter::All, 0).page_size, 1);
        assert_eq!(FetchRequest::new(CategoryFilter::All, -7).page_size, 1);
        assert_eq!(FetchRequest::new(CategoryFilter::All, 50).page_size, 50);
        assert_eq!(FetchRequest::new(CategoryFilter::All, 10_000).page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn as_of_can_be_pinned() {
        let day = Date::from_calendar_date(2024, Month::February, 1).expect("valid");
        let request = FetchRequest::new(CategoryFilter::All, 5).with_as_of(day);
        assert_eq!(request.as_of, day);
    }

    #[test]
    fn codes_are_namespaced() {
        assert_eq!(
            SourceError::missing_credential(ProviderId::Fred).code(),
            "source.missing_credential"
        );
        assert_eq!(SourceError::rate_limited("slow down").code(), "source.rate_limited");
    }

    #[tokio::test]
    async fn fetch_contains_adapter_failures() {
        let request = FetchRequest::new(CategoryFilter::All, 10);
        let records = BrokenSource.fetch(&request).await;
        assert!(records.is_empty());
    }

    #[test]
    fn default_category_follows_provider() {
        assert_eq!(BrokenSource.category(), Category::Regulatory);
        assert!(BrokenSource.configured());
    }
}
