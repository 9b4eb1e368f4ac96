//! # Almanac Web
//!
//! axum router serving the feeds over HTTP.
//!
//! | Path | Feed |
//! |------|------|
//! | `/api/events` | calendar items across categories, soonest first |
//! | `/api/scotus` | Supreme Court activity, most recent first |
//! | `/api/regulations` | regulatory documents, newest first |
//!
//! GET and HEAD always answer 200 with a live or fallback envelope. Any other
//! method on a feed path answers 405.

pub mod config;
pub mod error;

use std::collections::HashMap;
use std::sync::Arc;

use almanac_core::{Aggregator, Feed, FeedKind, FeedQuery};
use axum::{
    extract::{Query, State},
    http::{header, Request, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::WebConfig;
pub use error::WebError;

/// Feeds shared by every request. Holds no per-request state.
#[derive(Clone)]
pub struct AppState {
    events: Feed,
    scotus: Feed,
    regulations: Feed,
}

impl AppState {
    pub fn new(aggregator: Arc<Aggregator>) -> Self {
        Self {
            events: Feed::new(FeedKind::Events, Arc::clone(&aggregator)),
            scotus: Feed::new(FeedKind::Scotus, Arc::clone(&aggregator)),
            regulations: Feed::new(FeedKind::Regulations, aggregator),
        }
    }

    pub fn feed(&self, kind: FeedKind) -> &Feed {
        match kind {
            FeedKind::Events => &self.events,
            FeedKind::Scotus => &self.scotus,
            FeedKind::Regulations => &self.regulations,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            FeedKind::Events.path(),
            get(events).fallback(method_not_allowed),
        )
        .route(
            FeedKind::Scotus.path(),
            get(scotus).fallback(method_not_allowed),
        )
        .route(
            FeedKind::Regulations.path(),
            get(regulations).fallback(method_not_allowed),
        )
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        // Method and path only: query strings stay out of the logs.
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}

async fn events(
    State(state): State<AppState>,
    query: Option<Query<HashMap<String, String>>>,
) -> Response {
    serve(state.feed(FeedKind::Events), query).await
}

async fn scotus(
    State(state): State<AppState>,
    query: Option<Query<HashMap<String, String>>>,
) -> Response {
    serve(state.feed(FeedKind::Scotus), query).await
}

async fn regulations(
    State(state): State<AppState>,
    query: Option<Query<HashMap<String, String>>>,
) -> Response {
    serve(state.feed(FeedKind::Regulations), query).await
}

// A malformed query string is treated as an empty one.
async fn serve(feed: &Feed, query: Option<Query<HashMap<String, String>>>) -> Response {
    let query = query
        .map(|Query(params)| FeedQuery::from_pairs(params))
        .unwrap_or_default();
    let body = feed.respond_json(&query).await;
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody {
            error: "Method not allowed",
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use almanac_core::{
        AggregatorBuilder, AlmanacConfig, Category, DataSource, FetchRequest, ImpactLevel,
        NormalizedRecord, ProviderId, RecordsFuture, SourceError,
    };
    use axum::body::{to_bytes, Body};
    use axum::http::Method;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    struct CourtDocket;

    impl DataSource for CourtDocket {
        fn id(&self) -> ProviderId {
            ProviderId::CourtListener
        }

        fn fetch_records<'a>(&'a self, _req: &'a FetchRequest) -> RecordsFuture<'a> {
            Box::pin(async move {
                ["2024-04-15", "2024-06-28"]
                    .iter()
                    .enumerate()
                    .map(|(index, date)| {
                        NormalizedRecord::new(
                            ProviderId::CourtListener.record_id(index),
                            format!("Docket {index}"),
                            *date,
                            Category::Judicial,
                            ImpactLevel::High,
                            "Supreme Court of the United States, Washington, DC",
                            "",
                            "CourtListener",
                        )
                        .map_err(|e| SourceError::internal(e.to_string()))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
        }
    }

    fn router(sources: Vec<Arc<dyn DataSource>>) -> Router {
        let mut builder = AggregatorBuilder::new(AlmanacConfig::default()).without_builtin_adapters();
        for source in sources {
            builder = builder.with_adapter(source);
        }
        app(AppState::new(Arc::new(builder.build())))
    }

    async fn send(router: Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("valid request");
        let response = router.oneshot(request).await.expect("infallible service");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }

    #[tokio::test]
    async fn scotus_serves_live_records_newest_first() {
        let (status, body) = send(router(vec![Arc::new(CourtDocket)]), Method::GET, "/api/scotus").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "live");
        assert_eq!(body["count"], 2);
        assert_eq!(body["events"][0]["date"], "2024-06-28");
        assert_eq!(body["events"][0]["impactLevel"], "high");
    }

    #[tokio::test]
    async fn limit_is_read_from_the_query_string() {
        let (_, body) = send(
            router(vec![Arc::new(CourtDocket)]),
            Method::GET,
            "/api/scotus?limit=1",
        )
        .await;

        assert_eq!(body["count"], 1);
    }

    #[tokio::test]
    async fn missing_data_is_still_a_success() {
        let (status, body) = send(router(Vec::new()), Method::GET, "/api/events?category=economic").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "fallback");
        assert!(body["error"].is_string());
        assert!(body["events"]
            .as_array()
            .is_some_and(|events| events.iter().all(|event| event["category"] == "economic")));
    }

    #[tokio::test]
    async fn invalid_category_is_still_a_success() {
        let (status, body) = send(
            router(vec![Arc::new(CourtDocket)]),
            Method::GET,
            "/api/events?type=weather",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "fallback");
        assert!(body["error"].as_str().is_some_and(|error| error.contains("weather")));
    }

    #[tokio::test]
    async fn head_is_a_read_method() {
        let (status, _) = send(router(Vec::new()), Method::HEAD, "/api/regulations").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn write_methods_are_rejected() {
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
            for kind in FeedKind::ALL {
                let (status, body) = send(router(Vec::new()), method.clone(), kind.path()).await;

                assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {}", kind.path());
                assert_eq!(body, serde_json::json!({ "error": "Method not allowed" }));
            }
        }
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let (status, _) = send(router(Vec::new()), Method::GET, "/api/unknown").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
