//! # Almanac Core
//!
//! Multi-source civic calendar aggregation: congressional meetings, economic
//! releases and auctions, Supreme Court dockets and regulatory documents,
//! normalized into one record shape.
//!
//! ## Overview
//!
//! - **Canonical record model** shared by every source ([`NormalizedRecord`])
//! - **Provider adapters** behind one [`DataSource`] contract; adapter failures
//!   never escape [`DataSource::fetch`]
//! - **Aggregator** fanning out concurrently with a per-adapter timeout
//! - **Sorter/limiter** with a stable, total date order
//! - **Fallback generator** producing fixed, versioned substitute records
//! - **Feeds** wrapping it all into live or fallback response envelopes
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Congress.gov, FRED, Treasury, CourtListener and Regulations.gov adapters |
//! | [`aggregator`] | Adapter registry, fan-out and builder |
//! | [`classify`] | Ordered keyword rules for impact levels |
//! | [`config`] | Startup configuration and credentials |
//! | [`data_source`] | Adapter trait, fetch request and source errors |
//! | [`domain`] | Records, categories, impact levels, timestamps |
//! | [`envelope`] | Live and fallback response envelopes |
//! | [`error`] | Core error types |
//! | [`fallback`] | Deterministic fallback sets |
//! | [`feed`] | Request-facing feeds |
//! | [`http_client`] | HTTP client abstraction |
//! | [`retry`] | Bounded retry with backoff |
//! | [`sort`] | Date ordering and limits |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use almanac_core::{AggregatorBuilder, AlmanacConfig, Feed, FeedKind, FeedQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let aggregator = Arc::new(AggregatorBuilder::new(AlmanacConfig::from_env()?).build());
//!     let feed = Feed::new(FeedKind::Events, aggregator);
//!
//!     let query = FeedQuery::default().with_category("economic").with_limit("5");
//!     let response = feed.respond(&query).await;
//!     println!("{} events from {}", response.events().len(), response.source());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Web / CLI      │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Feed           │────▶│ Fallback         │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Aggregator     │────▶│ Sort / Limit     │
//! └────────┬────────┘     └──────────────────┘
//!          │ join_all
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Data Source     │────▶│ HTTP Client      │
//! │ (Adapter Trait) │     │ (reqwest + retry)│
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Security
//!
//! - Credentials are passed in through [`AlmanacConfig`] and never logged
//! - Transport errors are stripped of URLs, which may carry query-string keys

pub mod adapters;
pub mod aggregator;
pub mod classify;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod fallback;
pub mod feed;
pub mod http_client;
pub mod retry;
pub mod sort;
pub mod source;

// Adapter implementations
pub use adapters::{
    CongressAdapter, CourtListenerAdapter, FredAdapter, RegulationsAdapter, TreasuryAdapter,
    UNKNOWN_DATE,
};

// Aggregation
pub use aggregator::{AggregateError, Aggregation, Aggregator, AggregatorBuilder, SourceSnapshot};

// Classification
pub use classify::{classify_impact, ImpactRule, BASELINE_IMPACT};

// Configuration
pub use config::{AlmanacConfig, Credentials, DEFAULT_ADAPTER_TIMEOUT};

// Data source trait and types
pub use data_source::{
    DataSource, FetchRequest, RecordsFuture, SourceError, SourceErrorKind, MAX_PAGE_SIZE,
};

// Domain models
pub use domain::{
    format_date, parse_date, record_instant, Category, CategoryFilter, ImpactLevel,
    NormalizedRecord, UtcDateTime,
};

// Envelope types
pub use envelope::{FallbackEnvelope, FeedResponse, LiveEnvelope, FALLBACK_SOURCE, LIVE_SOURCE};

// Error types
pub use error::ValidationError;

// Fallback
pub use fallback::{fallback_records, is_fallback_record, FALLBACK_MARKER, FALLBACK_SET_VERSION};

// Feeds
pub use feed::{Feed, FeedKind, FeedQuery};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};

// Retry logic
pub use retry::{execute_with_retry, Backoff, RetryConfig};

// Sorting
pub use sort::{parse_limit, sort_and_limit, SortOrder, DEFAULT_LIMIT};

// Source identifiers
pub use source::ProviderId;
