use std::sync::Arc;

use serde::Deserialize;
use time::Duration;

use crate::adapters::{first_date, get_json, keep_valid, or_default};
use crate::classify::{classification_text, classify_impact, ImpactRule};
use crate::data_source::{DataSource, FetchRequest, RecordsFuture, SourceError};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};
use crate::retry::RetryConfig;
use crate::{format_date, ImpactLevel, NormalizedRecord, ProviderId, ValidationError};

const ENDPOINT: &str = "https://api.regulations.gov/v4/documents";
const LOOKBACK_DAYS: i64 = 30;
// Regulations.gov rejects page sizes outside 5..=250.
const MIN_PAGE_SIZE: usize = 5;

const DEFAULT_TITLE: &str = "Federal Regulatory Document";
const DEFAULT_AGENCY: &str = "Unknown Agency";
const DEFAULT_DOCUMENT_TYPE: &str = "Other";

const IMPACT_RULES: &[ImpactRule] = &[
    ImpactRule::new(ImpactLevel::Critical, &["interim final", "emergency", "final rule"]),
    ImpactRule::new(ImpactLevel::High, &["proposed rule"]),
    ImpactRule::new(ImpactLevel::Low, &["supporting", "notice of meeting", "other"]),
];

/// Regulations.gov document feed.
#[derive(Clone)]
pub struct RegulationsAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: Option<String>,
    retry: RetryConfig,
    timeout_ms: u64,
}

impl RegulationsAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: Option<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            retry: RetryConfig::default(),
            timeout_ms: 5_000,
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn build_request(&self, req: &FetchRequest, api_key: &str) -> HttpRequest {
        let since = req
            .as_of
            .checked_sub(Duration::days(LOOKBACK_DAYS))
            .unwrap_or(req.as_of);

        HttpRequest::get(ENDPOINT)
            .with_query("filter[postedDate][ge]", format_date(since))
            .with_query("sort", "-postedDate")
            .with_query("page[size]", req.page_size.max(MIN_PAGE_SIZE).to_string())
            .with_auth(&HttpAuth::header("X-Api-Key", api_key))
            .with_timeout_ms(self.timeout_ms)
    }

    async fn fetch_documents(
        &self,
        req: &FetchRequest,
    ) -> Result<Vec<NormalizedRecord>, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::missing_credential(ProviderId::Regulations))?;

        let payload: DocumentsResponse = get_json(
            self.http_client.as_ref(),
            self.build_request(req, api_key),
            &self.retry,
            ProviderId::Regulations,
        )
        .await?;

        let rows = payload
            .data
            .into_iter()
            .enumerate()
            .map(|(index, document)| document.into_record(index));

        Ok(keep_valid(ProviderId::Regulations, rows))
    }
}

impl DataSource for RegulationsAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Regulations
    }

    fn configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn fetch_records<'a>(&'a self, req: &'a FetchRequest) -> RecordsFuture<'a> {
        Box::pin(self.fetch_documents(req))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DocumentsResponse {
    data: Vec<Document>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Document {
    id: Option<String>,
    attributes: DocumentAttributes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DocumentAttributes {
    title: Option<String>,
    document_type: Option<String>,
    posted_date: Option<String>,
    last_modified_date: Option<String>,
    agency_id: Option<String>,
    docket_id: Option<String>,
    comment_end_date: Option<String>,
}

impl Document {
    fn into_record(self, index: usize) -> Result<NormalizedRecord, ValidationError> {
        let attributes = self.attributes;
        let title = or_default(attributes.title.as_deref(), DEFAULT_TITLE);
        let document_type = or_default(attributes.document_type.as_deref(), DEFAULT_DOCUMENT_TYPE);
        let agency = or_default(attributes.agency_id.as_deref(), DEFAULT_AGENCY);
        // Regulations.gov labels final rules plainly as "Rule".
        let kind = if document_type.eq_ignore_ascii_case("rule") {
            "final rule"
        } else {
            document_type.as_str()
        };
        let local_id = match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_owned(),
            _ => format!("row{index}"),
        };
        let comment_end = attributes
            .comment_end_date
            .as_deref()
            .map(str::trim)
            .filter(|date| !date.is_empty());

        let mut description = format!("{document_type} posted by {agency}");
        if let Some(deadline) = comment_end {
            description.push_str(&format!("; comments due {deadline}"));
        }

        let mut record = NormalizedRecord::new(
            ProviderId::Regulations.record_id(local_id),
            title.as_str(),
            first_date([
                attributes.posted_date.as_deref(),
                attributes.last_modified_date.as_deref(),
            ]),
            ProviderId::Regulations.category(),
            classify_impact(&classification_text([kind, title.as_str()]), IMPACT_RULES),
            format!("{agency}, Washington, DC"),
            description,
            ProviderId::Regulations.label(),
        )?
        .with_extra("documentType", document_type.as_str())
        .with_extra("agencyId", agency);

        if let Some(docket_id) = attributes.docket_id.filter(|id| !id.trim().is_empty()) {
            record = record.with_extra("docketId", docket_id);
        }
        if let Some(deadline) = comment_end {
            record = record.with_extra("commentEndDate", deadline);
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::RecordingHttpClient;
    use crate::CategoryFilter;
    use time::{Date, Month};

    const DOCUMENTS: &str = r#"{
        "data": [
            {
                "id": "SEC-2024-0031-0001",
                "type": "documents",
                "attributes": {
                    "title": "Enhanced Disclosure Requirements for Fund Advisers",
                    "documentType": "Proposed Rule",
                    "postedDate": "2024-06-03T04:00:00Z",
                    "agencyId": "SEC",
                    "docketId": "SEC-2024-0031",
                    "commentEndDate": "2024-08-02T03:59:59Z"
                }
            },
            {
                "id": "EPA-HQ-OAR-2023-0100-0412",
                "type": "documents",
                "attributes": {
                    "title": "Air Quality Standards Revision",
                    "documentType": "Rule",
                    "lastModifiedDate": "2024-06-20T12:00:00Z",
                    "agencyId": "EPA"
                }
            },
            {"id": "XYZ-0001", "attributes": {}}
        ]
    }"#;

    fn request() -> FetchRequest {
        FetchRequest::new(CategoryFilter::All, 2)
            .with_as_of(Date::from_calendar_date(2024, Month::June, 30).expect("valid date"))
    }

    #[tokio::test]
    async fn sends_key_as_header_and_filters_last_thirty_days() {
        let client = Arc::new(RecordingHttpClient::json(DOCUMENTS));
        let adapter = RegulationsAdapter::new(client.clone(), Some(String::from("regs-key")));

        adapter.fetch_records(&request()).await.expect("fetch succeeds");

        let requests = client.recorded_requests();
        let request = &requests[0];
        assert!(request
            .url
            .contains("filter%5BpostedDate%5D%5Bge%5D=2024-05-31"));
        assert!(request.url.contains("sort=-postedDate"));
        assert!(request.url.contains("page%5Bsize%5D=5"));
        assert!(!request.url.contains("regs-key"));
        assert_eq!(
            request.headers.get("x-api-key").map(String::as_str),
            Some("regs-key")
        );
    }

    #[tokio::test]
    async fn normalizes_documents() {
        let client = Arc::new(RecordingHttpClient::json(DOCUMENTS));
        let adapter = RegulationsAdapter::new(client, Some(String::from("regs-key")));

        let records = adapter.fetch_records(&request()).await.expect("fetch succeeds");
        assert_eq!(records.len(), 3);

        let proposed = &records[0];
        assert_eq!(proposed.id, "regulations-SEC-2024-0031-0001");
        assert_eq!(proposed.impact_level, ImpactLevel::High);
        assert_eq!(proposed.extra_str("commentEndDate"), Some("2024-08-02T03:59:59Z"));
        assert!(proposed.description.contains("comments due"));

        let final_rule = &records[1];
        assert_eq!(final_rule.date, "2024-06-20T12:00:00Z");
        assert_eq!(final_rule.impact_level, ImpactLevel::Critical);
        assert_eq!(final_rule.location, "EPA, Washington, DC");

        let bare = &records[2];
        assert_eq!(bare.title, DEFAULT_TITLE);
        assert_eq!(bare.date, "TBD");
        assert_eq!(bare.extra_str("agencyId"), Some(DEFAULT_AGENCY));
        assert_eq!(bare.impact_level, ImpactLevel::Low);
    }

    #[tokio::test]
    async fn words_containing_a_keyword_do_not_downgrade_impact() {
        let body = r#"{
            "data": [
                {
                    "id": "FNS-2024-0007-0001",
                    "attributes": {
                        "title": "Mother and Infant Nutrition Program Expansion",
                        "documentType": "Notice",
                        "postedDate": "2024-06-12T04:00:00Z",
                        "agencyId": "FNS"
                    }
                }
            ]
        }"#;
        let adapter = RegulationsAdapter::new(
            Arc::new(RecordingHttpClient::json(body)),
            Some(String::from("regs-key")),
        );

        let records = adapter.fetch_records(&request()).await.expect("fetch succeeds");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].impact_level, ImpactLevel::Medium);
    }
}
