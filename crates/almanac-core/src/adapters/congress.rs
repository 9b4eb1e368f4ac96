use std::sync::Arc;

use serde::Deserialize;
use time::{Date, Duration};

use crate::adapters::{first_date, get_json, keep_valid, or_default};
use crate::classify::{classification_text, classify_impact, ImpactRule};
use crate::data_source::{DataSource, FetchRequest, RecordsFuture, SourceError};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};
use crate::retry::RetryConfig;
use crate::{format_date, ImpactLevel, NormalizedRecord, ProviderId};

const BASE_URL: &str = "https://api.congress.gov/v3/committee-meeting";
const WINDOW_DAYS: i64 = 30;

const DEFAULT_TITLE: &str = "Congressional Committee Meeting";
const DEFAULT_LOCATION: &str = "U.S. Capitol, Washington, DC";
const DEFAULT_CHAMBER: &str = "Joint";

const IMPACT_RULES: &[ImpactRule] = &[
    ImpactRule::new(ImpactLevel::Low, &["cancelled", "canceled", "postponed"]),
    ImpactRule::new(
        ImpactLevel::Critical,
        &["appropriations", "monetary policy", "federal reserve", "debt limit"],
    ),
    ImpactRule::new(ImpactLevel::High, &["markup", "nomination", "budget", "oversight"]),
    ImpactRule::new(ImpactLevel::Low, &["field hearing", "roundtable", "briefing"]),
];

/// Congress.gov committee meeting calendar.
#[derive(Clone)]
pub struct CongressAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: Option<String>,
    retry: RetryConfig,
    timeout_ms: u64,
}

impl CongressAdapter {
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

    /// Congress in session during `day`'s year (the 1st Congress first met in 1789).
    pub fn congress_for(day: Date) -> i32 {
        (day.year() - 1789) / 2 + 1
    }

    fn build_request(&self, req: &FetchRequest, api_key: &str) -> HttpRequest {
        let until = req
            .as_of
            .checked_add(Duration::days(WINDOW_DAYS))
            .unwrap_or(req.as_of);

        HttpRequest::get(format!("{BASE_URL}/{}", Self::congress_for(req.as_of)))
            .with_query("format", "json")
            .with_query("fromDateTime", format!("{}T00:00:00Z", format_date(req.as_of)))
            .with_query("toDateTime", format!("{}T23:59:59Z", format_date(until)))
            .with_query("limit", req.page_size.to_string())
            .with_auth(&HttpAuth::query_param("api_key", api_key))
            .with_timeout_ms(self.timeout_ms)
    }

    async fn fetch_meetings(&self, req: &FetchRequest) -> Result<Vec<NormalizedRecord>, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::missing_credential(ProviderId::Congress))?;

        let payload: MeetingsResponse = get_json(
            self.http_client.as_ref(),
            self.build_request(req, api_key),
            &self.retry,
            ProviderId::Congress,
        )
        .await?;

        let rows = payload
            .committee_meetings
            .into_iter()
            .enumerate()
            .map(|(index, meeting)| meeting.into_record(index));

        Ok(keep_valid(ProviderId::Congress, rows))
    }
}

impl DataSource for CongressAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Congress
    }

    fn configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn fetch_records<'a>(&'a self, req: &'a FetchRequest) -> RecordsFuture<'a> {
        Box::pin(self.fetch_meetings(req))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MeetingsResponse {
    committee_meetings: Vec<Meeting>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Meeting {
    event_id: Option<String>,
    chamber: Option<String>,
    congress: Option<u32>,
    date: Option<String>,
    update_date: Option<String>,
    title: Option<String>,
    meeting_status: Option<String>,
    #[serde(rename = "type")]
    meeting_type: Option<String>,
    committees: Vec<Committee>,
    location: Option<MeetingLocation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Committee {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MeetingLocation {
    building: Option<String>,
    room: Option<String>,
}

impl MeetingLocation {
    fn display(&self) -> Option<String> {
        let building = self.building.as_deref().map(str::trim).filter(|b| !b.is_empty())?;
        Some(match self.room.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            Some(room) => format!("{room} {building}, Washington, DC"),
            None => format!("{building}, Washington, DC"),
        })
    }
}

impl Meeting {
    fn into_record(self, index: usize) -> Result<NormalizedRecord, crate::ValidationError> {
        let local_id = match self.event_id.as_deref().map(str::trim) {
            Some(event_id) if !event_id.is_empty() => event_id.to_owned(),
            _ => format!("{}-{index}", self.congress.unwrap_or_default()),
        };
        let title = or_default(self.title.as_deref(), DEFAULT_TITLE);
        let chamber = or_default(self.chamber.as_deref(), DEFAULT_CHAMBER);
        let committee = self
            .committees
            .iter()
            .find_map(|committee| committee.name.as_deref())
            .map(str::to_owned);
        let status = or_default(self.meeting_status.as_deref(), "Scheduled");
        let meeting_type = or_default(self.meeting_type.as_deref(), "Meeting");

        let impact = classify_impact(
            &classification_text([
                title.as_str(),
                status.as_str(),
                meeting_type.as_str(),
                committee.as_deref().unwrap_or_default(),
            ]),
            IMPACT_RULES,
        );

        let description = match committee.as_deref() {
            Some(name) => format!("{chamber} {meeting_type}: {name} ({status})"),
            None => format!("{chamber} {meeting_type} ({status})"),
        };
        let location = self
            .location
            .as_ref()
            .and_then(MeetingLocation::display)
            .unwrap_or_else(|| String::from(DEFAULT_LOCATION));

        let mut record = NormalizedRecord::new(
            ProviderId::Congress.record_id(local_id),
            title,
            first_date([self.date.as_deref(), self.update_date.as_deref()]),
            ProviderId::Congress.category(),
            impact,
            location,
            description,
            ProviderId::Congress.label(),
        )?
        .with_extra("chamber", chamber)
        .with_extra("meetingStatus", status)
        .with_extra("meetingType", meeting_type);

        if let Some(congress) = self.congress {
            record = record.with_extra("congress", congress);
        }
        if let Some(committee) = committee {
            record = record.with_extra("committee", committee);
        }
        Ok(record)
    }
}
