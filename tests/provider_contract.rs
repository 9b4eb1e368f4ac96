//! Contract tests every production adapter must satisfy.
//!
//! Each adapter is driven through a canned HTTP client: it must tag its ids,
//! stay inside its category, keep credentials out of URLs where the upstream
//! takes them as headers, and turn every upstream failure into an empty batch.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use almanac_core::{
    CategoryFilter, CongressAdapter, CourtListenerAdapter, DataSource, FetchRequest, FredAdapter,
    HttpClient, HttpError, HttpRequest, HttpResponse, ProviderId, RegulationsAdapter, RetryConfig,
    SourceErrorKind, TreasuryAdapter,
};
use time::{Date, Month};

struct CannedHttpClient {
    response: Result<HttpResponse, HttpError>,
    calls: AtomicUsize,
}

impl CannedHttpClient {
    fn json(body: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(HttpResponse::ok_json(body)),
            calls: AtomicUsize::new(0),
        })
    }

    fn status(status: u16) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(HttpResponse::with_status(status, "upstream error")),
            calls: AtomicUsize::new(0),
        })
    }

    fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            response: Err(HttpError::new("connection refused")),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HttpClient for CannedHttpClient {
    fn execute<'a>(
        &'a self,
        _request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self.response.clone();
        Box::pin(async move { response })
    }
}

const CONGRESS_BODY: &str = r#"{"committeeMeetings":[{"eventId":"1","chamber":"Senate","date":"2024-06-13T14:00:00Z"}]}"#;
const FRED_BODY: &str = r#"{"release_dates":[{"release_id":10,"release_name":"Consumer Price Index","date":"2024-06-12"}]}"#;
const TREASURY_BODY: &str = r#"{"data":[{"cusip":"91282CKQ3","security_type":"Note","security_term":"10-Year","auction_date":"2024-06-11"}]}"#;
const COURTLISTENER_BODY: &str = r#"{"results":[{"id":68541,"case_name":"Loper Bright Enterprises v. Raimondo","date_terminated":"2024-06-28"}]}"#;
const REGULATIONS_BODY: &str = r#"{"data":[{"id":"SEC-2024-0031-0001","attributes":{"title":"Disclosure Rule","postedDate":"2024-06-03T04:00:00Z"}}]}"#;

fn adapter_for(
    provider: ProviderId,
    client: Arc<CannedHttpClient>,
    credential: Option<&str>,
) -> Arc<dyn DataSource> {
    let key = credential.map(str::to_owned);
    let retry = RetryConfig::no_retry();
    match provider {
        ProviderId::Congress => Arc::new(CongressAdapter::new(client, key).with_retry(retry)),
        ProviderId::Fred => Arc::new(FredAdapter::new(client, key).with_retry(retry)),
        ProviderId::Treasury => Arc::new(TreasuryAdapter::new(client).with_retry(retry)),
        ProviderId::CourtListener => {
            Arc::new(CourtListenerAdapter::new(client, key).with_retry(retry))
        }
        ProviderId::Regulations => Arc::new(RegulationsAdapter::new(client, key).with_retry(retry)),
    }
}

fn body_for(provider: ProviderId) -> &'static str {
    match provider {
        ProviderId::Congress => CONGRESS_BODY,
        ProviderId::Fred => FRED_BODY,
        ProviderId::Treasury => TREASURY_BODY,
        ProviderId::CourtListener => COURTLISTENER_BODY,
        ProviderId::Regulations => REGULATIONS_BODY,
    }
}

fn request() -> FetchRequest {
    FetchRequest::new(CategoryFilter::All, 10)
        .with_as_of(Date::from_calendar_date(2024, Month::June, 10).expect("valid date"))
}

// =============================================================================
// Normalization contract
// =============================================================================

#[tokio::test]
async fn every_adapter_emits_valid_tagged_records_in_its_category() {
    for provider in ProviderId::ALL {
        let client = CannedHttpClient::json(body_for(provider));
        let adapter = adapter_for(provider, client, Some("test-credential"));

        assert_eq!(adapter.id(), provider);
        assert_eq!(adapter.category(), provider.category());
        assert!(adapter.configured(), "provider={provider}");

        let records = adapter.fetch(&request()).await;
        assert_eq!(records.len(), 1, "provider={provider}");

        let record = &records[0];
        record.validate().expect("adapter emits valid records");
        assert!(
            record.id.starts_with(&format!("{}-", provider.as_str())),
            "id={}",
            record.id
        );
        assert_eq!(record.category, provider.category());
        assert_eq!(record.source, provider.label());
        assert!(!record.location.is_empty());
    }
}

// =============================================================================
// Failure containment contract
// =============================================================================

#[tokio::test]
async fn upstream_errors_become_empty_batches() {
    for provider in ProviderId::ALL {
        for client in [
            CannedHttpClient::status(500),
            CannedHttpClient::status(429),
            CannedHttpClient::json("not json"),
            CannedHttpClient::unreachable(),
        ] {
            let adapter = adapter_for(provider, client, Some("test-credential"));
            assert!(adapter.fetch(&request()).await.is_empty(), "provider={provider}");
        }
    }
}

#[tokio::test]
async fn rate_limiting_is_reported_distinctly() {
    let adapter = adapter_for(ProviderId::Fred, CannedHttpClient::status(429), Some("key"));
    let error = adapter
        .fetch_records(&request())
        .await
        .expect_err("429 is a failure");
    assert_eq!(error.kind(), SourceErrorKind::RateLimited);
    assert!(error.retryable());
}

#[tokio::test]
async fn missing_credentials_never_touch_the_network() {
    for provider in ProviderId::ALL {
        if provider == ProviderId::Treasury {
            continue;
        }

        let client = CannedHttpClient::json(body_for(provider));
        let adapter = adapter_for(provider, Arc::clone(&client), None);

        assert!(!adapter.configured(), "provider={provider}");
        let error = adapter
            .fetch_records(&request())
            .await
            .expect_err("credential required");
        assert_eq!(error.kind(), SourceErrorKind::MissingCredential);
        assert!(adapter.fetch(&request()).await.is_empty());
        assert_eq!(client.calls(), 0, "provider={provider}");
    }
}

#[tokio::test]
async fn treasury_needs_no_credential() {
    let client = CannedHttpClient::json(TREASURY_BODY);
    let adapter = adapter_for(ProviderId::Treasury, Arc::clone(&client), None);

    assert!(adapter.configured());
    assert_eq!(adapter.fetch(&request()).await.len(), 1);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn default_retry_makes_one_extra_attempt() {
    let client = CannedHttpClient::status(503);
    let adapter = FredAdapter::new(client.clone(), Some(String::from("key")))
        .with_retry(RetryConfig::fixed(std::time::Duration::from_millis(1), 1));

    assert!(adapter.fetch(&request()).await.is_empty());
    assert_eq!(client.calls(), 2);
}
