//! HTTP client implementation for the Oura v2 API.
//!
//! This module provides a reqwest-based implementation of the
//! [`OuraClient`](crate::OuraClient) trait.

use crate::{DateRange, Endpoint, OuraClient, OuraClientFactory, OuraError};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Response envelope the vendor wraps every collection in. A missing `data`
/// key deserializes as an empty list.
#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

/// Client for the Oura API using reqwest. One instance per tool invocation;
/// it owns the caller's bearer token for exactly that long.
#[derive(Clone, Debug)]
pub struct ReqwestOuraClient {
    base_url: String,
    access_token: SecretString,
    client: reqwest::Client,
}

impl ReqwestOuraClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the Oura API (e.g., "https://api.ouraring.com")
    /// * `access_token` - The caller's personal access token
    pub fn new(base_url: &str, access_token: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client build should not fail");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
            client,
        }
    }

    fn collection_url(&self, endpoint: Endpoint) -> String {
        format!("{}/v2/usercollection/{}", self.base_url, endpoint.path())
    }

    /// Build an authenticated GET request for a collection.
    fn get_request(&self, endpoint: Endpoint, range: DateRange) -> reqwest::RequestBuilder {
        self.client
            .get(self.collection_url(endpoint))
            .bearer_auth(self.access_token.expose_secret())
            .query(&[
                ("start_date", range.start.to_string()),
                ("end_date", range.end.to_string()),
            ])
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> OuraError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        OuraError::Api {
            status,
            body: body_snippet,
        }
    }
}

#[async_trait]
impl OuraClient for ReqwestOuraClient {
    async fn fetch_records(
        &self,
        endpoint: Endpoint,
        range: DateRange,
    ) -> Result<Vec<serde_json::Value>, OuraError> {
        tracing::debug!(
            endpoint = endpoint.path(),
            start = %range.start,
            end = %range.end,
            "fetching collection"
        );
        metrics::counter!("oura_api_requests", "endpoint" => endpoint.path()).increment(1);

        let resp = self.get_request(endpoint, range).send().await?;
        if !resp.status().is_success() {
            metrics::counter!("oura_api_errors", "endpoint" => endpoint.path()).increment(1);
            return Err(self.error_from_response(resp).await);
        }

        let text = resp.text().await?;
        let envelope: Envelope = serde_json::from_str(&text)?;
        Ok(envelope.data)
    }

    async fn validate_token(&self) -> Result<bool, OuraError> {
        // Probe a fixed historical day; any answer other than 401 means the
        // token was accepted.
        let day = DateRange::single(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid probe date"),
        );
        let resp = self.get_request(Endpoint::Sleep, day).send().await?;
        Ok(resp.status().as_u16() != 401)
    }
}

/// Factory producing [`ReqwestOuraClient`] instances against a fixed base URL.
#[derive(Clone, Debug)]
pub struct ReqwestClientFactory {
    base_url: String,
}

impl ReqwestClientFactory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl OuraClientFactory for ReqwestClientFactory {
    fn client_for(&self, access_token: SecretString) -> Arc<dyn OuraClient> {
        Arc::new(ReqwestOuraClient::new(&self.base_url, access_token))
    }
}
