//! Request-facing feeds: parameter parsing, aggregation and the degradation policy.
//!
//! A feed never surfaces a hard failure. Missing data, an unknown category or
//! a fault escaping aggregation all produce a [`FallbackEnvelope`].

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use time::Date;
use tracing::{info, warn};

use crate::aggregator::{AggregateError, Aggregator};
use crate::data_source::FetchRequest;
use crate::envelope::{FallbackEnvelope, FeedResponse, LiveEnvelope};
use crate::fallback::fallback_records;
use crate::sort::{parse_limit, sort_and_limit, SortOrder};
use crate::{Category, CategoryFilter};

/// The three published feeds. They share one pipeline and differ in scope and order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    /// Upcoming calendar items across categories, soonest first.
    Events,
    /// Supreme Court case activity, most recent first.
    Scotus,
    /// Regulatory publications, newest first.
    Regulations,
}

impl FeedKind {
    pub const ALL: [Self; 3] = [Self::Events, Self::Scotus, Self::Regulations];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Scotus => "scotus",
            Self::Regulations => "regulations",
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Self::Events => "/api/events",
            Self::Scotus => "/api/scotus",
            Self::Regulations => "/api/regulations",
        }
    }

    pub const fn order(self) -> SortOrder {
        match self {
            Self::Events => SortOrder::Ascending,
            Self::Scotus | Self::Regulations => SortOrder::Descending,
        }
    }

    /// Category pinned by the feed, or `None` when the request chooses.
    pub const fn fixed_category(self) -> Option<Category> {
        match self {
            Self::Events => None,
            Self::Scotus => Some(Category::Judicial),
            Self::Regulations => Some(Category::Regulatory),
        }
    }
}

/// Raw query parameters of one feed request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedQuery {
    /// `type` parameter; takes precedence over `category`.
    pub kind: Option<String>,
    pub category: Option<String>,
    pub limit: Option<String>,
    pub term: Option<String>,
}

impl FeedQuery {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "type" => &mut query.kind,
                "category" => &mut query.category,
                "limit" => &mut query.limit,
                "term" => &mut query.term,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        query
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_limit(mut self, limit: impl Into<String>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    pub fn category_param(&self) -> Option<&str> {
        self.kind.as_deref().or(self.category.as_deref())
    }
}

/// One published feed bound to a shared aggregator.
#[derive(Clone)]
pub struct Feed {
    kind: FeedKind,
    aggregator: Arc<Aggregator>,
    as_of: Option<Date>,
}

impl Feed {
    pub fn new(kind: FeedKind, aggregator: Arc<Aggregator>) -> Self {
        Self {
            kind,
            aggregator,
            as_of: None,
        }
    }

    /// Pins the reference day instead of using today (UTC).
    pub fn with_as_of(mut self, as_of: Date) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub const fn kind(&self) -> FeedKind {
        self.kind
    }

    /// Serves `query`. Always yields a body; failures become fallback envelopes.
    pub async fn respond(&self, query: &FeedQuery) -> FeedResponse {
        let limit = parse_limit(query.limit.as_deref());
        let order = self.kind.order();

        let filter = match self.resolve_filter(query) {
            Ok(filter) => filter,
            Err(error) => return self.fallback(error, CategoryFilter::All, limit),
        };

        let mut request = FetchRequest::new(filter, limit).with_term(self.resolve_term(query));
        if let Some(as_of) = self.as_of {
            request = request.with_as_of(as_of);
        }

        let outcome = AssertUnwindSafe(self.aggregator.aggregate(&request))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(AggregateError::Fault {
                    message: panic_message(panic.as_ref()),
                })
            });

        match outcome {
            Ok(aggregation) => {
                let events = sort_and_limit(aggregation.records, limit, order);
                info!(
                    feed = self.kind.as_str(),
                    count = events.len(),
                    latency_ms = aggregation.latency_ms,
                    "serving live records"
                );
                FeedResponse::Live(LiveEnvelope::new(events))
            }
            Err(error) => self.fallback(error.to_string(), filter, limit),
        }
    }

    /// [`respond`](Self::respond) rendered as a JSON body.
    pub async fn respond_json(&self, query: &FeedQuery) -> String {
        let response = self.respond(query).await;
        serde_json::to_string(&response).unwrap_or_else(|error| {
            warn!(feed = self.kind.as_str(), "response serialization failed: {error}");
            let filter = self
                .kind
                .fixed_category()
                .map_or(CategoryFilter::All, CategoryFilter::Only);
            let substitute = FeedResponse::Fallback(FallbackEnvelope::new(
                format!("response serialization failed: {error}"),
                fallback_records(filter),
            ));
            serde_json::to_string(&substitute).unwrap_or_else(|_| {
                String::from(r#"{"error":"response serialization failed","events":[],"source":"fallback"}"#)
            })
        })
    }

    fn resolve_filter(&self, query: &FeedQuery) -> Result<CategoryFilter, String> {
        if let Some(category) = self.kind.fixed_category() {
            return Ok(CategoryFilter::Only(category));
        }
        CategoryFilter::parse(query.category_param()).map_err(|error| error.to_string())
    }

    fn resolve_term(&self, query: &FeedQuery) -> Option<i32> {
        if self.kind != FeedKind::Scotus {
            return None;
        }
        let raw = query.term.as_deref().map(str::trim).filter(|raw| !raw.is_empty())?;
        match raw.parse::<i32>() {
            Ok(term) => Some(term),
            Err(_) => {
                warn!(feed = self.kind.as_str(), term = raw, "ignoring non-numeric term");
                None
            }
        }
    }

    fn fallback(&self, error: String, filter: CategoryFilter, limit: i64) -> FeedResponse {
        let events = sort_and_limit(fallback_records(filter), limit, self.kind.order());
        warn!(
            feed = self.kind.as_str(),
            count = events.len(),
            "serving fallback records: {error}"
        );
        FeedResponse::Fallback(FallbackEnvelope::new(error, events))
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("unexpected panic during aggregation")
    }
}
