//! Google Calendar events client.
//!
//! Low-level HTTP client for the events endpoint: issues paginated list
//! requests, follows the page cursor under a hard page cap, and converts
//! event records into busy intervals clipped to the query window.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{debug, warn};

use freeslot_core::{BusyInterval, TimeWindow, clip_to_window, parse_instant};

use crate::error::{ProviderError, ProviderResult, truncate_body};
use crate::google::config::ERROR_SNIPPET_LIMIT;

/// Hard bound on page requests per fetch.
///
/// Protects against unbounded cost and latency from pathological or
/// malicious responses. Reaching the cap is not an error: the fetch stops
/// and silently truncates the result.
pub const MAX_EVENT_PAGES: usize = 4;

/// Page size requested from the API.
pub const MAX_RESULTS_PER_PAGE: usize = 2500;

/// Cap on logged response-body prefixes, in bytes.
pub const BODY_LOG_LIMIT: usize = 2000;

/// Result of a busy-interval fetch.
#[derive(Debug)]
pub struct BusyFetch {
    /// Busy intervals clipped to the query window, in response order.
    pub intervals: Vec<BusyInterval>,
    /// Total event records seen across all pages, including skipped ones.
    pub events_seen: usize,
    /// Number of page requests issued.
    pub pages_fetched: usize,
}

/// Client for the calendar events endpoint.
#[derive(Debug)]
pub struct EventsClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl EventsClient {
    /// Creates a new events client against the given API base URL.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Fetches the busy intervals for a calendar within the query window.
    ///
    /// Issues GET requests against the events endpoint, following the
    /// `nextPageToken` cursor up to [`MAX_EVENT_PAGES`] requests. Event
    /// records are converted to intervals (`dateTime` preferred, else
    /// `date` at midnight in the event's zone, else `time_zone`, else UTC),
    /// clipped to the window; records with missing or unparsable times are
    /// skipped.
    ///
    /// # Errors
    ///
    /// A non-2xx status or a non-JSON body on any page fails the entire
    /// fetch with a page-fetch error; results from earlier pages are
    /// discarded, not returned.
    pub async fn fetch_busy_intervals(
        &self,
        access_token: &str,
        calendar_id: &str,
        window: &TimeWindow,
        time_zone: Option<&str>,
    ) -> ProviderResult<BusyFetch> {
        let default_tz = resolve_zone(time_zone);

        let mut intervals = Vec::new();
        let mut events_seen = 0;
        let mut pages_fetched = 0;
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .fetch_page(
                    access_token,
                    calendar_id,
                    window,
                    time_zone,
                    page_token.as_deref(),
                    pages_fetched + 1,
                )
                .await?;
            pages_fetched += 1;
            events_seen += page.items.len();

            for event in &page.items {
                if let Some(interval) = event_interval(event, default_tz, window) {
                    intervals.push(interval);
                }
            }

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
            if pages_fetched >= MAX_EVENT_PAGES {
                debug!(
                    calendar = calendar_id,
                    pages = pages_fetched,
                    "page cap reached, truncating results"
                );
                break;
            }
        }

        debug!(
            calendar = calendar_id,
            busy = intervals.len(),
            events = events_seen,
            pages = pages_fetched,
            "busy intervals fetched"
        );

        Ok(BusyFetch {
            intervals,
            events_seen,
            pages_fetched,
        })
    }

    /// Fetches a single page of events.
    async fn fetch_page(
        &self,
        access_token: &str,
        calendar_id: &str,
        window: &TimeWindow,
        time_zone: Option<&str>,
        page_token: Option<&str>,
        page: usize,
    ) -> ProviderResult<EventListResponse> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        );

        let mut request = self
            .http_client
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("timeMin", window.start.to_rfc3339()),
                ("timeMax", window.end.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
                ("maxResults", MAX_RESULTS_PER_PAGE.to_string()),
            ]);

        if let Some(tz) = time_zone {
            request = request.query(&[("timeZone", tz)]);
        }

        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::network("events request timeout")
            } else if e.is_connect() {
                ProviderError::network(format!("connection failed: {e}"))
            } else {
                ProviderError::network(format!("events request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read events response: {e}")))?;

        if !status.is_success() {
            return Err(ProviderError::page_fetch(format!(
                "events page {page} failed: {}",
                truncate_body(&body, ERROR_SNIPPET_LIMIT)
            ))
            .with_status(status.as_u16()));
        }

        debug!(
            calendar = calendar_id,
            page,
            body_prefix = truncate_body(&body, BODY_LOG_LIMIT),
            "events page response"
        );

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::page_fetch(format!("events page {page} is not valid JSON"))
                .with_status(status.as_u16())
                .with_source(e)
        })
    }
}

/// Converts an event record into a busy interval clipped to the window.
///
/// Returns `None` for cancelled events, events missing usable start or end
/// times, and events wholly outside the window.
fn event_interval(event: &ApiEvent, default_tz: Tz, window: &TimeWindow) -> Option<BusyInterval> {
    if event.status.as_deref() == Some("cancelled") {
        return None;
    }

    let start = bound_instant(event.start.as_ref()?, default_tz)?;
    let end = bound_instant(event.end.as_ref()?, default_tz)?;
    clip_to_window(start, end, window)
}

/// Resolves one event time bound to a UTC instant.
///
/// `dateTime` is preferred; a date-only value is midnight of that date in
/// the bound's own timezone, else `default_tz`. Unparsable values are
/// skipped, not fatal.
fn bound_instant(bound: &ApiEventTime, default_tz: Tz) -> Option<DateTime<Utc>> {
    if let Some(date_time) = &bound.date_time {
        return match parse_instant(date_time) {
            Ok(instant) => Some(instant),
            Err(e) => {
                warn!("skipping event with malformed dateTime: {e}");
                None
            }
        };
    }

    let date = bound.date.as_ref()?;
    let parsed = match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("skipping event with malformed date {date:?}: {e}");
            return None;
        }
    };

    let tz = bound
        .time_zone
        .as_deref()
        .and_then(|name| resolve_named_zone(name))
        .unwrap_or(default_tz);
    midnight_in_zone(parsed, tz)
}

/// Midnight of `date` in `tz`, as a UTC instant.
fn midnight_in_zone(date: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    match midnight.and_local_timezone(tz).earliest() {
        Some(instant) => Some(instant.with_timezone(&Utc)),
        None => {
            warn!("skipping event: midnight of {date} does not exist in {tz}");
            None
        }
    }
}

/// Parses an IANA zone name, warning once per failure.
fn resolve_named_zone(name: &str) -> Option<Tz> {
    match name.parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(_) => {
            warn!(zone = name, "unrecognized timezone, falling back");
            None
        }
    }
}

/// The default zone for date-only events: the configured zone when it
/// resolves, else UTC.
fn resolve_zone(time_zone: Option<&str>) -> Tz {
    time_zone
        .and_then(resolve_named_zone)
        .unwrap_or(chrono_tz::UTC)
}

/// Response from the events list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
    next_page_token: Option<String>,
}

/// A single event from the events list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEvent {
    status: Option<String>,
    start: Option<ApiEventTime>,
    end: Option<ApiEventTime>,
}

/// Event time from the API: a specific instant or an all-day date.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    date: Option<String>,
    date_time: Option<String>,
    time_zone: Option<String>,
}
