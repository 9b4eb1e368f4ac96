use std::sync::Arc;

use serde::Deserialize;
use time::Duration;

use crate::adapters::{first_date, get_json, keep_valid, or_default};
use crate::classify::{classify_impact, ImpactRule};
use crate::data_source::{DataSource, FetchRequest, RecordsFuture, SourceError};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};
use crate::retry::RetryConfig;
use crate::{format_date, ImpactLevel, NormalizedRecord, ProviderId, ValidationError};

const ENDPOINT: &str = "https://api.stlouisfed.org/fred/releases/dates";
const WINDOW_DAYS: i64 = 60;

const DEFAULT_TITLE: &str = "Economic Data Release";
const DEFAULT_LOCATION: &str = "Washington, DC";

const IMPACT_RULES: &[ImpactRule] = &[
    ImpactRule::new(
        ImpactLevel::Critical,
        &[
            "consumer price index",
            "employment situation",
            "gross domestic product",
            "federal open market committee",
            "fomc",
            "personal income and outlays",
        ],
    ),
    ImpactRule::new(
        ImpactLevel::High,
        &[
            "producer price",
            "retail sales",
            "unemployment insurance",
            "industrial production",
            "housing starts",
            "job openings",
        ],
    ),
    ImpactRule::new(ImpactLevel::Low, &["weekly", "daily", "interest rate spreads"]),
];

/// FRED (Federal Reserve Bank of St. Louis) release calendar.
#[derive(Clone)]
pub struct FredAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: Option<String>,
    retry: RetryConfig,
    timeout_ms: u64,
}

impl FredAdapter {
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
        let until = req
            .as_of
            .checked_add(Duration::days(WINDOW_DAYS))
            .unwrap_or(req.as_of);

        HttpRequest::get(ENDPOINT)
            .with_query("file_type", "json")
            .with_query("realtime_start", format_date(req.as_of))
            .with_query("realtime_end", format_date(until))
            .with_query("include_release_dates_with_no_data", "true")
            .with_query("sort_order", "asc")
            .with_query("limit", req.page_size.to_string())
            .with_auth(&HttpAuth::query_param("api_key", api_key))
            .with_timeout_ms(self.timeout_ms)
    }

    async fn fetch_release_dates(
        &self,
        req: &FetchRequest,
    ) -> Result<Vec<NormalizedRecord>, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::missing_credential(ProviderId::Fred))?;

        let payload: ReleaseDatesResponse = get_json(
            self.http_client.as_ref(),
            self.build_request(req, api_key),
            &self.retry,
            ProviderId::Fred,
        )
        .await?;

        let rows = payload
            .release_dates
            .into_iter()
            .enumerate()
            .map(|(index, release)| release.into_record(index));

        Ok(keep_valid(ProviderId::Fred, rows))
    }
}

impl DataSource for FredAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Fred
    }

    fn configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn fetch_records<'a>(&'a self, req: &'a FetchRequest) -> RecordsFuture<'a> {
        Box::pin(self.fetch_release_dates(req))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReleaseDatesResponse {
    release_dates: Vec<ReleaseDate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReleaseDate {
    release_id: Option<u64>,
    release_name: Option<String>,
    date: Option<String>,
}

impl ReleaseDate {
    fn into_record(self, index: usize) -> Result<NormalizedRecord, ValidationError> {
        let title = or_default(self.release_name.as_deref(), DEFAULT_TITLE);
        let date = first_date([self.date.as_deref()]);
        let local_id = match self.release_id {
            Some(release_id) => format!("{release_id}-{date}"),
            None => format!("row{index}-{date}"),
        };

        let mut record = NormalizedRecord::new(
            ProviderId::Fred.record_id(local_id),
            title.as_str(),
            date,
            ProviderId::Fred.category(),
            classify_impact(&title, IMPACT_RULES),
            DEFAULT_LOCATION,
            format!("Scheduled publication of {title}"),
            ProviderId::Fred.label(),
        )?;

        if let Some(release_id) = self.release_id {
            record = record.with_extra("releaseId", release_id);
        }
        Ok(record)
    }
}
