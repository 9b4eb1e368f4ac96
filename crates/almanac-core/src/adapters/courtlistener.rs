use std::sync::Arc;

use serde::Deserialize;
use time::{Date, Duration, Month};

use crate::adapters::{first_date, get_json, keep_valid, or_default};
use crate::classify::{classification_text, classify_impact, ImpactRule};
use crate::data_source::{DataSource, FetchRequest, RecordsFuture, SourceError};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};
use crate::retry::RetryConfig;
use crate::{format_date, ImpactLevel, NormalizedRecord, ProviderId, ValidationError};

const ENDPOINT: &str = "https://www.courtlistener.com/api/rest/v4/dockets/";
const SITE: &str = "https://www.courtlistener.com";
const FILED_LOOKBACK_DAYS: i64 = 365;

const DEFAULT_TITLE: &str = "Supreme Court Case";
const DEFAULT_DOCKET: &str = "Unassigned";
const COURT_LOCATION: &str = "Supreme Court of the United States, Washington, DC";

const IMPACT_RULES: &[ImpactRule] = &[
    ImpactRule::new(ImpactLevel::Low, &["dismissed", "denied"]),
    ImpactRule::new(
        ImpactLevel::Critical,
        &[
            "united states",
            "securities and exchange commission",
            "environmental protection agency",
            "federal reserve",
        ],
    ),
    ImpactRule::new(ImpactLevel::High, &["decided", "commission", "department", "agency"]),
    ImpactRule::new(ImpactLevel::Low, &["pending"]),
];

/// CourtListener Supreme Court dockets.
#[derive(Clone)]
pub struct CourtListenerAdapter {
    http_client: Arc<dyn HttpClient>,
    token: Option<String>,
    retry: RetryConfig,
    timeout_ms: u64,
}

impl CourtListenerAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, token: Option<String>) -> Self {
        Self {
            http_client,
            token: token.filter(|token| !token.trim().is_empty()),
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

    /// October-to-September window of the term opening in `term`.
    pub fn term_window(term: i32) -> Option<(Date, Date)> {
        let opens = Date::from_calendar_date(term, Month::October, 1).ok()?;
        let closes = Date::from_calendar_date(term.checked_add(1)?, Month::September, 30).ok()?;
        Some((opens, closes))
    }

    fn build_request(&self, req: &FetchRequest, token: &str) -> HttpRequest {
        let request = HttpRequest::get(ENDPOINT).with_query("court", "scotus");

        let request = match req.term.and_then(Self::term_window) {
            Some((opens, closes)) => request
                .with_query("date_argued__gte", format_date(opens))
                .with_query("date_argued__lte", format_date(closes))
                .with_query("order_by", "-date_argued"),
            None => {
                let since = req
                    .as_of
                    .checked_sub(Duration::days(FILED_LOOKBACK_DAYS))
                    .unwrap_or(req.as_of);
                request
                    .with_query("date_filed__gte", format_date(since))
                    .with_query("order_by", "-date_filed")
            }
        };

        request
            .with_query("page_size", req.page_size.min(100).to_string())
            .with_auth(&HttpAuth::header("Authorization", format!("Token {token}")))
            .with_timeout_ms(self.timeout_ms)
    }

    async fn fetch_dockets(&self, req: &FetchRequest) -> Result<Vec<NormalizedRecord>, SourceError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| SourceError::missing_credential(ProviderId::CourtListener))?;

        let payload: DocketsResponse = get_json(
            self.http_client.as_ref(),
            self.build_request(req, token),
            &self.retry,
            ProviderId::CourtListener,
        )
        .await?;

        let rows = payload
            .results
            .into_iter()
            .enumerate()
            .map(|(index, docket)| docket.into_record(index));

        Ok(keep_valid(ProviderId::CourtListener, rows))
    }
}

impl DataSource for CourtListenerAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::CourtListener
    }

    fn configured(&self) -> bool {
        self.token.is_some()
    }

    fn fetch_records<'a>(&'a self, req: &'a FetchRequest) -> RecordsFuture<'a> {
        Box::pin(self.fetch_dockets(req))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DocketsResponse {
    results: Vec<Docket>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Docket {
    id: Option<u64>,
    case_name: Option<String>,
    docket_number: Option<String>,
    court_id: Option<String>,
    date_filed: Option<String>,
    date_argued: Option<String>,
    date_reargued: Option<String>,
    date_terminated: Option<String>,
    absolute_url: Option<String>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl Docket {
    fn status(&self) -> &'static str {
        if present(&self.date_terminated) {
            "decided"
        } else if present(&self.date_reargued) || present(&self.date_argued) {
            "argued"
        } else {
            "pending"
        }
    }

    fn into_record(self, index: usize) -> Result<NormalizedRecord, ValidationError> {
        let title = or_default(self.case_name.as_deref(), DEFAULT_TITLE);
        let docket_number = or_default(self.docket_number.as_deref(), DEFAULT_DOCKET);
        let status = self.status();
        let date = first_date([
            self.date_terminated.as_deref(),
            self.date_reargued.as_deref(),
            self.date_argued.as_deref(),
            self.date_filed.as_deref(),
        ]);
        let local_id = self
            .id
            .map_or_else(|| format!("row{index}"), |id| id.to_string());

        let mut record = NormalizedRecord::new(
            ProviderId::CourtListener.record_id(local_id),
            title.as_str(),
            date,
            ProviderId::CourtListener.category(),
            classify_impact(&classification_text([title.as_str(), status]), IMPACT_RULES),
            COURT_LOCATION,
            format!("Docket {docket_number}; {status}"),
            ProviderId::CourtListener.label(),
        )?
        .with_extra("docketNumber", docket_number)
        .with_extra("court", or_default(self.court_id.as_deref(), "scotus"))
        .with_extra("status", status);

        if let Some(path) = self.absolute_url.as_deref().filter(|path| !path.is_empty()) {
            record = record.with_extra("url", format!("{SITE}{path}"));
        }
        Ok(record)
    }
}
