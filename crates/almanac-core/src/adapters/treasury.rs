use std::sync::Arc;

use serde::Deserialize;

use crate::adapters::{first_date, get_json, keep_valid, or_default};
use crate::classify::{classification_text, classify_impact, ImpactRule};
use crate::data_source::{DataSource, FetchRequest, RecordsFuture, SourceError};
use crate::http_client::{HttpClient, HttpRequest};
use crate::retry::RetryConfig;
use crate::{format_date, ImpactLevel, NormalizedRecord, ProviderId, ValidationError};

const ENDPOINT: &str =
    "https://api.fiscaldata.treasury.gov/services/api/fiscal_service/v1/accounting/od/upcoming_auctions";

const DEFAULT_TITLE: &str = "Treasury Securities Auction";
const DEFAULT_LOCATION: &str = "U.S. Department of the Treasury, Washington, DC";

const IMPACT_RULES: &[ImpactRule] = &[
    ImpactRule::new(ImpactLevel::Critical, &["10-year", "30-year"]),
    ImpactRule::new(ImpactLevel::High, &["note", "bond", "tips", "frn"]),
    ImpactRule::new(ImpactLevel::Low, &["cash management", "cmb"]),
];

/// Treasury Fiscal Data upcoming auctions. Public, no credential.
#[derive(Clone)]
pub struct TreasuryAdapter {
    http_client: Arc<dyn HttpClient>,
    retry: RetryConfig,
    timeout_ms: u64,
}

impl TreasuryAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
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

    fn build_request(&self, req: &FetchRequest) -> HttpRequest {
        HttpRequest::get(ENDPOINT)
            .with_query("filter", format!("auction_date:gte:{}", format_date(req.as_of)))
            .with_query("sort", "auction_date")
            .with_query("page[size]", req.page_size.to_string())
            .with_timeout_ms(self.timeout_ms)
    }

    async fn fetch_auctions(&self, req: &FetchRequest) -> Result<Vec<NormalizedRecord>, SourceError> {
        let payload: AuctionsResponse = get_json(
            self.http_client.as_ref(),
            self.build_request(req),
            &self.retry,
            ProviderId::Treasury,
        )
        .await?;

        let rows = payload
            .data
            .into_iter()
            .enumerate()
            .map(|(index, auction)| auction.into_record(index));

        Ok(keep_valid(ProviderId::Treasury, rows))
    }
}

impl DataSource for TreasuryAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Treasury
    }

    fn fetch_records<'a>(&'a self, req: &'a FetchRequest) -> RecordsFuture<'a> {
        Box::pin(self.fetch_auctions(req))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AuctionsResponse {
    data: Vec<Auction>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Auction {
    cusip: Option<String>,
    security_type: Option<String>,
    security_term: Option<String>,
    offering_amt: Option<String>,
    auction_date: Option<String>,
    issue_date: Option<String>,
    announcemt_date: Option<String>,
}

impl Auction {
    fn into_record(self, index: usize) -> Result<NormalizedRecord, ValidationError> {
        let security_type = self.security_type.as_deref().map(str::trim).unwrap_or_default();
        let security_term = self.security_term.as_deref().map(str::trim).unwrap_or_default();
        let security = classification_text([security_term, security_type]);

        let title = if security.is_empty() {
            String::from(DEFAULT_TITLE)
        } else {
            format!("{security} Auction")
        };
        let date = first_date([
            self.auction_date.as_deref(),
            self.issue_date.as_deref(),
            self.announcemt_date.as_deref(),
        ]);
        let cusip = or_default(self.cusip.as_deref(), "");
        let local_id = if cusip.is_empty() {
            format!("row{index}-{date}")
        } else {
            format!("{cusip}-{date}")
        };
        let description = match self.offering_amt.as_deref().map(str::trim) {
            Some(amount) if !amount.is_empty() && amount != "null" => {
                format!("{title}; offering amount ${amount}")
            }
            _ => format!("{title}; offering amount to be announced"),
        };

        let mut record = NormalizedRecord::new(
            ProviderId::Treasury.record_id(local_id),
            title.as_str(),
            date,
            ProviderId::Treasury.category(),
            classify_impact(&title, IMPACT_RULES),
            DEFAULT_LOCATION,
            description,
            ProviderId::Treasury.label(),
        )?;

        if !cusip.is_empty() {
            record = record.with_extra("cusip", cusip);
        }
        if !security_type.is_empty() {
            record = record.with_extra("securityType", security_type);
        }
        if !security_term.is_empty() {
            record = record.with_extra("securityTerm", security_term);
        }
        if let Some(amount) = self.offering_amt.filter(|amount| amount != "null") {
            record = record.with_extra("offeringAmount", amount);
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

    const AUCTIONS: &str = r#"{
        "data": [
            {
                "record_date": "2024-06-06",
                "security_type": "Note",
                "security_term": "10-Year",
                "reopening": "Yes",
                "cusip": "91282CKQ3",
                "offering_amt": "39000000000",
                "announcemt_date": "2024-06-06",
                "auction_date": "2024-06-11",
                "issue_date": "2024-06-17"
            },
            {
                "security_type": "Bill",
                "security_term": "42-Day",
                "cusip": "912797KZ9",
                "offering_amt": "null",
                "announcemt_date": "2024-06-11",
                "issue_date": "2024-06-18"
            },
            {}
        ],
        "meta": {"count": 3}
    }"#;

    fn request() -> FetchRequest {
        FetchRequest::new(CategoryFilter::All, 25)
            .with_as_of(Date::from_calendar_date(2024, Month::June, 10).expect("valid date"))
    }

    #[tokio::test]
    async fn filters_on_auction_date_without_credentials() {
        let client = Arc::new(RecordingHttpClient::json(AUCTIONS));
        let adapter = TreasuryAdapter::new(client.clone());
        assert!(adapter.configured());

        adapter.fetch_records(&request()).await.expect("fetch succeeds");

        let requests = client.recorded_requests();
        let request = &requests[0];
        assert!(request.url.contains("filter=auction_date%3Agte%3A2024-06-10"));
        assert!(request.url.contains("page%5Bsize%5D=25"));
        assert!(request.headers.is_empty());
    }

    #[tokio::test]
    async fn resolves_dates_by_precedence() {
        let client = Arc::new(RecordingHttpClient::json(AUCTIONS));
        let records = TreasuryAdapter::new(client)
            .fetch_records(&request())
            .await
            .expect("fetch succeeds");

        assert_eq!(records.len(), 3);

        let note = &records[0];
        assert_eq!(note.title, "10-Year Note Auction");
        assert_eq!(note.date, "2024-06-11");
        assert_eq!(note.impact_level, ImpactLevel::Critical);
        assert_eq!(note.extra_str("offeringAmount"), Some("39000000000"));

        let bill = &records[1];
        assert_eq!(bill.date, "2024-06-18");
        assert_eq!(bill.impact_level, ImpactLevel::Medium);
        assert!(bill.extra.get("offeringAmount").is_none());

        let empty = &records[2];
        assert_eq!(empty.title, DEFAULT_TITLE);
        assert_eq!(empty.date, "TBD");
        assert_eq!(empty.location, DEFAULT_LOCATION);
    }

    #[tokio::test]
    async fn fallback_auctions_match_live_classification() {
        let records = TreasuryAdapter::new(Arc::new(RecordingHttpClient::json(AUCTIONS)))
            .fetch_records(&request())
            .await
            .expect("fetch succeeds");
        let live = &records[0];

        let fallback = crate::fallback_records(CategoryFilter::Only(crate::Category::Economic));
        let auctions: Vec<_> = fallback
            .iter()
            .filter(|record| record.source.starts_with(ProviderId::Treasury.label()))
            .collect();

        assert!(!auctions.is_empty());
        for auction in auctions {
            assert_eq!(
                auction.impact_level,
                classify_impact(&auction.title, IMPACT_RULES),
                "{}",
                auction.title
            );
        }
        let note = fallback
            .iter()
            .find(|record| record.title == live.title)
            .expect("fallback carries the 10-year note");
        assert_eq!(note.impact_level, live.impact_level);
    }
}
