//! Minimal `OuraClient` trait and supporting types for the Oura v2 API.

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use secrecy::SecretString;
use std::sync::Arc;
use thiserror::Error;

pub mod http_client;
pub mod transform;

#[derive(Debug, Error)]
pub enum OuraError {
    #[error("Oura API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("decoding response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The four vendor collections this client knows how to query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Sleep,
    DailySleep,
    DailyReadiness,
    DailyResilience,
}

impl Endpoint {
    /// URL path segment under `/v2/usercollection/`.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Sleep => "sleep",
            Endpoint::DailySleep => "daily_sleep",
            Endpoint::DailyReadiness => "daily_readiness",
            Endpoint::DailyResilience => "daily_resilience",
        }
    }
}

/// Inclusive calendar-date range for a collection query. The vendor accepts
/// start > end without complaint, so no ordering is enforced here either.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range; `end` defaults to `start` when omitted.
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self {
            start,
            end: end.unwrap_or(start),
        }
    }

    pub fn single(day: NaiveDate) -> Self {
        Self::new(day, None)
    }

    /// Single-day range for today's local calendar date.
    pub fn today() -> Self {
        Self::single(Local::now().date_naive())
    }
}

#[async_trait]
pub trait OuraClient: Send + Sync + 'static {
    /// Fetch the raw per-day records for one collection and date range.
    async fn fetch_records(
        &self,
        endpoint: Endpoint,
        range: DateRange,
    ) -> Result<Vec<serde_json::Value>, OuraError>;

    /// Probe the API with the held token. Returns `Ok(false)` only when the
    /// vendor rejects the token outright (HTTP 401); transport failures are
    /// reported as errors rather than as an invalid token.
    async fn validate_token(&self) -> Result<bool, OuraError>;
}

/// Builds a client scoped to one tool invocation. Tokens arrive per request,
/// so the server holds a factory rather than a long-lived client.
pub trait OuraClientFactory: Send + Sync + 'static {
    fn client_for(&self, access_token: SecretString) -> Arc<dyn OuraClient>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths_match_vendor_collections() {
        assert_eq!(Endpoint::Sleep.path(), "sleep");
        assert_eq!(Endpoint::DailySleep.path(), "daily_sleep");
        assert_eq!(Endpoint::DailyReadiness.path(), "daily_readiness");
        assert_eq!(Endpoint::DailyResilience.path(), "daily_resilience");
    }

    #[test]
    fn date_range_end_defaults_to_start() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let range = DateRange::new(day, None);
        assert_eq!(range.start, range.end);

        let end = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let range = DateRange::new(day, Some(end));
        assert_eq!(range.end, end);
    }

    #[test]
    fn single_day_range_covers_one_date() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(DateRange::single(day), DateRange::new(day, None));
    }
}
