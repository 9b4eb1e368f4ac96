//! Provider adapters, one per upstream source.

mod congress;
mod courtlistener;
mod fred;
mod regulations;
mod treasury;

pub use congress::CongressAdapter;
pub use courtlistener::CourtListenerAdapter;
pub use fred::FredAdapter;
pub use regulations::RegulationsAdapter;
pub use treasury::TreasuryAdapter;

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::data_source::SourceError;
use crate::http_client::{HttpClient, HttpRequest};
use crate::retry::{execute_with_retry, RetryConfig};
use crate::{NormalizedRecord, ProviderId, ValidationError};

/// Date placeholder used when an upstream row carries no usable date.
pub const UNKNOWN_DATE: &str = "TBD";

/// Executes `request` with retry and decodes a JSON body.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &dyn HttpClient,
    request: HttpRequest,
    retry: &RetryConfig,
    provider: ProviderId,
) -> Result<T, SourceError> {
    let response = execute_with_retry(client, request, retry)
        .await
        .map_err(|e| SourceError::unavailable(format!("{provider} transport error: {}", e.message())))?;

    if response.status == 429 {
        return Err(SourceError::rate_limited(format!(
            "{provider} rejected the request with status 429"
        )));
    }

    if !response.is_success() {
        return Err(SourceError::unavailable(format!(
            "{provider} returned status {}",
            response.status
        )));
    }

    serde_json::from_str(&response.body).map_err(|e| {
        SourceError::invalid_response(format!("failed to parse {provider} response: {e}"))
    })
}

/// First non-blank candidate in precedence order, or [`UNKNOWN_DATE`].
pub(crate) fn first_date<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> String {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map_or_else(|| String::from(UNKNOWN_DATE), str::to_owned)
}

/// Trimmed `value`, or `default` when it is absent or blank.
pub(crate) fn or_default(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
        .to_owned()
}

/// Drops rows that cannot form a valid record; the rest of the batch survives.
pub(crate) fn keep_valid(
    provider: ProviderId,
    rows: impl IntoIterator<Item = Result<NormalizedRecord, ValidationError>>,
) -> Vec<NormalizedRecord> {
    rows.into_iter()
        .filter_map(|row| match row {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(provider = %provider, "skipping upstream row: {error}");
                None
            }
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::test_support::RecordingHttpClient;
    use super::*;
    use crate::data_source::SourceErrorKind;

    #[derive(Debug, serde::Deserialize)]
    struct Payload {
        count: u32,
    }

    async fn fetch(client: &RecordingHttpClient) -> Result<Payload, SourceError> {
        get_json(
            client,
            HttpRequest::get("https://upstream.test"),
            &RetryConfig::no_retry(),
            ProviderId::Fred,
        )
        .await
    }

    #[tokio::test]
    async fn decodes_success_bodies() {
        let payload = fetch(&RecordingHttpClient::json(r#"{"count": 3}"#))
            .await
            .expect("decodes");
        assert_eq!(payload.count, 3);
    }

    #[tokio::test]
    async fn maps_status_and_parse_failures() {
        let limited = fetch(&RecordingHttpClient::status(429)).await.expect_err("429");
        assert_eq!(limited.kind(), SourceErrorKind::RateLimited);

        let down = fetch(&RecordingHttpClient::status(502)).await.expect_err("502");
        assert_eq!(down.kind(), SourceErrorKind::Unavailable);

        let garbage = fetch(&RecordingHttpClient::json("<html>")).await.expect_err("html");
        assert_eq!(garbage.kind(), SourceErrorKind::InvalidResponse);

        let transport = fetch(&RecordingHttpClient::failure()).await.expect_err("refused");
        assert_eq!(transport.kind(), SourceErrorKind::Unavailable);
    }

    #[test]
    fn first_date_follows_precedence() {
        assert_eq!(first_date([None, Some(" "), Some("2024-06-28")]), "2024-06-28");
        assert_eq!(first_date([Some("2024-01-01"), Some("2024-06-28")]), "2024-01-01");
        assert_eq!(first_date([None, None]), UNKNOWN_DATE);
    }

    #[test]
    fn or_default_replaces_blank_values() {
        assert_eq!(or_default(Some("  "), "Joint"), "Joint");
        assert_eq!(or_default(None, "Joint"), "Joint");
        assert_eq!(or_default(Some(" House "), "Joint"), "House");
    }
}
